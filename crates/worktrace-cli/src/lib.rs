mod args;
mod commands;
mod handlers;
mod output;
pub mod types;

pub use args::{CatalogCommand, Cli, Commands, ProjectCommand, SessionCommand, TaskCommand};
pub use commands::run;
