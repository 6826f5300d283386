//! HTTP handlers for the server.

pub mod decode;
pub mod models;
