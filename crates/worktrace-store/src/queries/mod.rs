pub(crate) mod catalog;
pub(crate) mod event;
pub(crate) mod session;
