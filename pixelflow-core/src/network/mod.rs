//! Transport to the remote display.

pub mod connection;

pub use connection::{Connection, ConnectionInfo, DEFAULT_HOST, DEFAULT_PORT};
