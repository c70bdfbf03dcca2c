//! System-level modules
//!
//! Process plumbing that is independent of the link domain.

pub mod logging;

pub use logging::init_logging;
