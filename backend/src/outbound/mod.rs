//! Outbound adapters implementing the domain's driven ports.

pub mod geocoding;
pub mod persistence;
