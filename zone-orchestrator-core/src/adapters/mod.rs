//! Storage adapters for [`ZoneRepository`](crate::traits::ZoneRepository).

mod fs;

pub use fs::FileZoneRepository;
