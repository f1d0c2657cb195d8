use std::path::Path;
use std::sync::Arc;

use worktrace_store::Database;
use worktrace_types::{ActorId, TenantId};

use crate::catalog::TaskCatalog;
use crate::client::{ProjectOps, SessionOps, TaskOps};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::model::Identity;
use crate::{Error, Result};

/// Entry point to the tracker: owns the store handle, the collaborator
/// catalog, the clock, and the configured default identity, and hands out
/// the operation groups.
pub struct Tracker {
    db: Arc<Database>,
    catalog: Arc<dyn TaskCatalog>,
    clock: Arc<dyn Clock>,
    config: Config,
}

impl Tracker {
    /// Open the tracker over a data directory, creating the database and a
    /// config (with a freshly provisioned identity) on first run.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let db_path = data_dir.join("worktrace.db");
        let config_path = data_dir.join("config.toml");

        #[allow(clippy::arc_with_non_send_sync)]
        let db = Arc::new(Database::open(&db_path)?);
        let config = Config::load_or_init(&config_path)?;

        Ok(Self {
            catalog: db.clone(),
            db,
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// Assemble a tracker from externally built parts. Test harnesses use
    /// this to swap in a scripted clock and an in-memory catalog.
    pub fn with_parts(
        db: Arc<Database>,
        catalog: Arc<dyn TaskCatalog>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        Self {
            db,
            catalog,
            clock,
            config,
        }
    }

    /// Resolve the identity for an operation: explicit arguments win,
    /// config defaults fill the gaps.
    pub fn identity(
        &self,
        tenant_id: Option<TenantId>,
        actor_id: Option<ActorId>,
    ) -> Result<Identity> {
        let tenant_id = tenant_id.or(self.config.tenant_id).ok_or_else(|| {
            Error::Config(
                "no tenant configured; pass --tenant or set tenant_id in config.toml".to_string(),
            )
        })?;
        let actor_id = actor_id.or(self.config.actor_id).ok_or_else(|| {
            Error::Config(
                "no actor configured; pass --actor or set actor_id in config.toml".to_string(),
            )
        })?;
        Ok(Identity {
            tenant_id,
            actor_id,
        })
    }

    pub fn sessions(&self) -> SessionOps {
        SessionOps::new(self.db.clone(), self.catalog.clone(), self.clock.clone())
    }

    pub fn tasks(&self) -> TaskOps {
        TaskOps::new(self.db.clone(), self.catalog.clone(), self.clock.clone())
    }

    pub fn projects(&self) -> ProjectOps {
        ProjectOps::new(self.db.clone(), self.catalog.clone(), self.clock.clone())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
