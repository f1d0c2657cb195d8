mod projects;
mod sessions;
mod tasks;
mod tracker;

pub use projects::ProjectOps;
pub use sessions::SessionOps;
pub use tasks::TaskOps;
pub use tracker::Tracker;
