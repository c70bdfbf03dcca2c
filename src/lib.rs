//! linkpulse - an in-memory URL shortener with click telemetry
//!
//! Short codes map to destination URLs, expire after a configurable
//! time-to-live, and record one click event per redirect. Every significant
//! operation is relayed, fire-and-forget, to an external log collector.
//!
//! # Architecture
//! - `registry`: code → record map, code generation, click accounting
//! - `telemetry`: non-blocking relay to the remote collector
//! - `api`: HTTP services and middleware
//! - `runtime`: startup wiring and the server loop
//! - `config`: TOML + environment configuration
//! - `system`: logging initialization
//!
//! State lives in memory only; a restart clears every link.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod registry;
pub mod runtime;
pub mod system;
pub mod telemetry;
pub mod utils;
