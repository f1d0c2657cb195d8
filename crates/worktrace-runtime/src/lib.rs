//! Service layer of the tracker. Wires the store, the derivation engine,
//! the collaborator catalog, and the clock into the operations the CLI
//! (or any other frontend) calls.

mod catalog;
mod client;
mod clock;
mod config;
mod error;
mod model;

pub use catalog::TaskCatalog;
pub use client::{ProjectOps, SessionOps, TaskOps, Tracker};
pub use clock::{Clock, SystemClock};
pub use config::{Config, resolve_data_path};
pub use error::{Error, Result};
pub use model::{Identity, SessionFilter, SessionOverview, SessionView, TaskSessionMetadata};
