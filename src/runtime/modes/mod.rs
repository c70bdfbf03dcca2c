//! Mode routing
//!
//! Only the HTTP server mode exists; the CLI just picks between serving and
//! printing a sample configuration.

pub mod server;

pub use server::run_server;
