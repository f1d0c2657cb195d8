pub mod catalog;
pub mod project;
pub mod session;
pub mod task;
