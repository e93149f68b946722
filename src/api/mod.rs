//! Upstream API access

pub mod gateway;

pub use gateway::HttpGateway;
