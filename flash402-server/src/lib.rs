//! Library surface of the demo paid API server.

pub mod config;
