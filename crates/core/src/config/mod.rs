//! Store connection configuration and its layered resolution.

mod connection_config;
mod resolver;

pub use connection_config::*;
pub use resolver::*;
