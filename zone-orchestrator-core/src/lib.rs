//! Zone Orchestrator Core Library
//!
//! Provides the service layer over octoDNS zone documents, including:
//! - Scope routing (scope + zone name → zone file and branch)
//! - Record Service (read, create, update, delete one record type)
//! - Subdomain Service (read every record of a subdomain)
//!
//! Persistence is abstracted behind [`ZoneRepository`]. Every change is a
//! fetch → edit → serialize → commit cycle, repeated on a conflicting commit.

pub mod adapters;
pub mod config;
pub mod error;
pub mod retry;
pub mod scope;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use adapters::FileZoneRepository;
pub use config::GatewayConfig;
pub use error::{CoreError, CoreResult};
pub use retry::RetryingRepository;
pub use scope::{Scope, ScopeRegistry};
pub use services::{RecordService, ServiceContext, SubdomainService};
pub use traits::{InMemoryZoneRepository, ZoneRepository};
