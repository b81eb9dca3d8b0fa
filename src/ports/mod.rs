//! Port traits: the boundary between the domain and its data and config sources.

pub mod config_port;
pub mod data_port;
