//! Type definition module

mod location;
mod record;
mod resource_id;

pub use location::{CommitAuthor, ZoneBlob, ZoneChange, ZoneLocation};
pub use record::{RecordSnapshot, SubdomainSnapshot, WriteRecordRequest};
pub use resource_id::ResourceId;
