//! # zone-orchestrator-model
//!
//! A structure-preserving editor for octoDNS-style YAML zone documents.
//!
//! A zone document is a root mapping from subdomain name to its record
//! entries. The entries of one subdomain are either a single record mapping
//! or a sequence of them:
//!
//! ```yaml
//! '':
//!   - ttl: 3600
//!     type: A
//!     values:
//!       - 1.2.3.4
//!       - 1.2.3.5
//!   - type: MX
//!     value:
//!       exchange: mx.unit.tests.
//!       preference: 10
//! www:
//!   type: CNAME
//!   value: unit.tests.
//! ```
//!
//! ## Layers
//!
//! | Layer | Module | Role |
//! |-------|--------|------|
//! | Value codec | [`codec`] | Presentation-format text ⇄ [`RecordValue`], with per-type validation |
//! | Value projection | [`value`] | [`RecordValue`] ⇄ YAML node |
//! | Record | [`record`] | Decoded entry: type, TTL, values, [`Extension`] |
//! | Subdomain view | [`subdomain`] | Cached per-type access to one subdomain |
//! | Zone document | [`zone`] | Owns the tree, subdomain CRUD, serialization |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zone_orchestrator_model::{RecordType, Zone};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut zone = Zone::from_yaml("www:\n  type: CNAME\n  value: unit.tests.\n")?;
//!
//!     let mut www = zone.find_subdomain("www")?;
//!     let txt = www.create_type(RecordType::Txt)?;
//!     txt.add_value_from_text("v=spf1 -all")?;
//!     www.write_back(RecordType::Txt)?;
//!     drop(www);
//!
//!     println!("{}", zone.to_yaml()?);
//!     Ok(())
//! }
//! ```
//!
//! Records never hold a reference into the tree. They carry a
//! [`RecordLocator`] and re-resolve their node on every write-back, so
//! promoting a bare mapping to a sequence cannot leave a record pointing at
//! a stale node.

pub mod codec;
pub mod error;
pub mod extension;
pub mod record;
pub mod rtype;
pub mod subdomain;
pub mod value;
pub mod zone;

mod yaml;

pub use codec::{decode, encode};
pub use error::{Result, ValidationError, ZoneError};
pub use extension::{
    AzureDnsMeta, AzureHealthcheck, CloudflareMeta, Extension, OctodnsMeta, TerraformMeta,
};
pub use record::{Record, RecordLocator};
pub use rtype::RecordType;
pub use subdomain::Subdomain;
pub use value::{
    CaaTag, CaaValue, LatDirection, LocValue, LongDirection, MxValue, NaptrValue, RecordValue,
    SrvValue, SshfpValue, UrlfwdValue,
};
pub use zone::{APEX_MARKER, Zone};
