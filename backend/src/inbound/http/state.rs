//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{RegionsCommand, RegionsQuery, UsersCommand, UsersQuery};

/// Dependency bundle handed to HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users_command: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub regions_command: Arc<dyn RegionsCommand>,
    pub regions_query: Arc<dyn RegionsQuery>,
}
