//! HTTP API module.
//!
//! Provides the HTTP server, the response types, and the SSE log stream
//! for the FastForm backend.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::start_server;
pub use types::*;
