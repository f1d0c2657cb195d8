use worktrace_store::{ProjectRecord, TaskRecord};

use super::short_id;

pub fn print_task(task: &TaskRecord) {
    println!("Registered task {} ({})", task.name, task.id);
    if let Some(project_id) = task.project_id {
        println!("  project: {}", project_id);
    }
}

pub fn print_project(project: &ProjectRecord) {
    println!("Registered project {} ({})", project.name, project.id);
}

pub fn print_listing(tasks: &[TaskRecord], projects: &[ProjectRecord]) {
    if tasks.is_empty() && projects.is_empty() {
        println!("Catalog is empty. Add entries with 'worktrace catalog add-task <name>'.");
        return;
    }

    if !projects.is_empty() {
        println!("{:<10} NAME", "PROJECT");
        for project in projects {
            println!("{:<10} {}", short_id(project.id), project.name);
        }
    }

    if !tasks.is_empty() {
        if !projects.is_empty() {
            println!();
        }
        println!("{:<10} {:<6} {:<10} NAME", "TASK", "DONE", "PROJECT");
        for task in tasks {
            println!(
                "{:<10} {:<6} {:<10} {}",
                short_id(task.id),
                if task.done { "yes" } else { "no" },
                task.project_id.map(|id| short_id(id)).unwrap_or_default(),
                task.name
            );
        }
    }
}
