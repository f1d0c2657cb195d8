//! Test environments.
//!
//! `TrackerWorld` wires an in-memory store, a scripted clock and a memory
//! catalog into a `Tracker` for service-level tests. `TestWorld` owns a
//! temp data directory and drives the built `worktrace` binary for CLI
//! integration tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use assert_cmd::Command;
use chrono::{DateTime, Utc};
use tempfile::TempDir;

use worktrace_runtime::{Clock, Config, Identity, Tracker};
use worktrace_store::{Database, ProjectRecord, TaskRecord};
use worktrace_types::{ActorId, ProjectId, TaskId, TenantId};

use crate::catalog::MemoryCatalog;
use crate::clock::ManualClock;

/// Service-level test environment: every part the tracker needs, with the
/// clock and catalog held separately so tests can script them.
pub struct TrackerWorld {
    pub db: Arc<Database>,
    pub clock: Arc<ManualClock>,
    pub catalog: Arc<MemoryCatalog>,
    pub identity: Identity,
    tracker: Tracker,
}

impl Default for TrackerWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerWorld {
    pub fn new() -> Self {
        let db = Arc::new(Database::open_in_memory().expect("open in-memory store"));
        let clock = Arc::new(ManualClock::epoch());
        let catalog = Arc::new(MemoryCatalog::new());
        let identity = Identity {
            tenant_id: TenantId::generate(),
            actor_id: ActorId::generate(),
        };
        let config = Config {
            tenant_id: Some(identity.tenant_id),
            actor_id: Some(identity.actor_id),
        };
        let tracker = Tracker::with_parts(db.clone(), catalog.clone(), clock.clone(), config);

        Self {
            db,
            clock,
            catalog,
            identity,
            tracker,
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn advance_ms(&self, ms: i64) {
        self.clock.advance_ms(ms);
    }

    /// Seed a task owned by this world's tenant.
    pub fn seed_task(&self, name: &str) -> TaskRecord {
        self.seed_task_record(name, self.identity.tenant_id, None)
    }

    pub fn seed_task_in_project(&self, name: &str, project_id: ProjectId) -> TaskRecord {
        self.seed_task_record(name, self.identity.tenant_id, Some(project_id))
    }

    /// Seed a task owned by a different tenant, for access checks.
    pub fn seed_foreign_task(&self, name: &str) -> TaskRecord {
        self.seed_task_record(name, TenantId::generate(), None)
    }

    pub fn seed_project(&self, name: &str) -> ProjectRecord {
        let project = ProjectRecord {
            id: ProjectId::generate(),
            tenant_id: self.identity.tenant_id,
            name: name.to_string(),
        };
        self.catalog.insert_project(project.clone());
        project
    }

    fn seed_task_record(
        &self,
        name: &str,
        tenant_id: TenantId,
        project_id: Option<ProjectId>,
    ) -> TaskRecord {
        let task = TaskRecord {
            id: TaskId::generate(),
            tenant_id,
            name: name.to_string(),
            project_id,
            done: false,
        };
        self.catalog.insert_task(task.clone());
        task
    }
}

/// CLI test environment: an isolated data directory plus helpers to run
/// the `worktrace` binary against it.
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".worktrace");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            data_dir,
            env_vars: HashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir").arg(self.data_dir());
        cmd.current_dir(self.temp_dir.path());

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `worktrace` binary with the given arguments.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("worktrace")
            .map_err(|e| anyhow::anyhow!("Failed to find worktrace binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Execute with `--format json` and parse stdout.
    pub fn run_json(&self, args: &[&str]) -> Result<serde_json::Value> {
        let mut full_args = args.to_vec();
        full_args.push("--format");
        full_args.push("json");

        let result = self.run(&full_args)?;
        if !result.success() {
            anyhow::bail!(
                "command {:?} failed with {}: {}",
                args,
                result.status,
                result.stderr
            );
        }
        result.json()
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
