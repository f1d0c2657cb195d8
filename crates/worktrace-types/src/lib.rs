pub mod error;
pub mod event;
pub mod ids;
pub mod session;

pub use error::{Error, Result};
pub use event::*;
pub use ids::*;
pub use session::*;
