//! Command handlers. Each one logs in on its own; nothing is shared between
//! invocations.

pub mod login;
pub mod scrape;
pub mod watch;
