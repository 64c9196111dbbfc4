//! Persistence gateway abstraction trait definition

mod zone_repository;

pub use zone_repository::{CommitRecord, InMemoryZoneRepository, RepositoryError, ZoneRepository};
