//! Provider extension metadata
//!
//! Extension blocks ride along with a record without changing its DNS
//! meaning:
//!
//! ```yaml
//! octodns:
//!   azuredns:
//!     healthcheck:
//!       interval: 30
//!       num_failures: 3
//!       timeout: 10
//!   cloudflare:
//!     auto_ttl: true
//!     proxied: true
//! terraform:
//!   hash: 7d1b6e7f
//! ```
//!
//! Every field is omitted when at its zero value. Keys this module does not
//! know about are left in place on write-back.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Result, ZoneError};
use crate::yaml::node;

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(v: &bool) -> bool {
    !*v
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &u32) -> bool {
    *v == 0
}

/// Extension metadata attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform: Option<TerraformMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub octodns: Option<OctodnsMeta>,
}

/// Bookkeeping written by the Terraform provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerraformMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hash: String,
}

/// The octoDNS provider-specific block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OctodnsMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudflare: Option<CloudflareMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azuredns: Option<AzureDnsMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudflareMeta {
    /// Route traffic through the Cloudflare proxy.
    #[serde(default, skip_serializing_if = "is_false")]
    pub proxied: bool,
    /// Let Cloudflare pick the TTL.
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_ttl: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureDnsMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<AzureHealthcheck>,
}

/// Azure Traffic Manager probe settings, in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureHealthcheck {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub num_failures: u32,
}

/// A nested block whose fields this crate writes.
struct Block {
    key: &'static str,
    fields: &'static [&'static str],
    children: &'static [Block],
}

const TERRAFORM: Block = Block {
    key: "terraform",
    fields: &["hash"],
    children: &[],
};

const OCTODNS: Block = Block {
    key: "octodns",
    fields: &[],
    children: &[
        Block {
            key: "azuredns",
            fields: &[],
            children: &[Block {
                key: "healthcheck",
                fields: &["interval", "num_failures", "timeout"],
                children: &[],
            }],
        },
        Block {
            key: "cloudflare",
            fields: &["auto_ttl", "proxied"],
            children: &[],
        },
    ],
};

impl Extension {
    /// Whether no extension field is set.
    pub fn is_empty(&self) -> bool {
        let terraform = self.terraform.as_ref().is_none_or(|t| t.hash.is_empty());
        let octodns = self.octodns.as_ref().is_none_or(|o| {
            let cloudflare = o
                .cloudflare
                .as_ref()
                .is_none_or(|c| !c.proxied && !c.auto_ttl);
            let azuredns = o
                .azuredns
                .as_ref()
                .and_then(|a| a.healthcheck.as_ref())
                .is_none_or(|h| h.interval == 0 && h.timeout == 0 && h.num_failures == 0);
            cloudflare && azuredns
        });
        terraform && octodns
    }

    /// Read the `terraform` and `octodns` blocks of a record entry.
    pub(crate) fn from_entry(entry: &Mapping, location: &str) -> Result<Self> {
        let mut blocks = Mapping::new();
        for key in [TERRAFORM.key, OCTODNS.key] {
            if let Some(block) = entry.get(key).filter(|v| !v.is_null()) {
                blocks.insert(Value::String(key.to_string()), block.clone());
            }
        }
        serde_yaml::from_value(Value::Mapping(blocks))
            .map_err(|e| ZoneError::structural(location, format!("invalid extension: {e}")))
    }

    fn to_mapping(&self) -> std::result::Result<Mapping, serde_yaml::Error> {
        match serde_yaml::to_value(self)? {
            Value::Mapping(m) => Ok(m),
            _ => Ok(Mapping::new()),
        }
    }

    /// Merge into a record entry, touching only fields whose value differs.
    pub(crate) fn merge_into(&self, entry: &mut Mapping) -> std::result::Result<(), serde_yaml::Error> {
        let desired = self.to_mapping()?;
        for block in [&TERRAFORM, &OCTODNS] {
            let wanted = desired.get(block.key).and_then(Value::as_mapping);
            merge_block(entry, block, wanted);
        }
        Ok(())
    }
}

fn merge_block(parent: &mut Mapping, block: &Block, desired: Option<&Mapping>) {
    let mut current = parent
        .get(block.key)
        .and_then(Value::as_mapping)
        .cloned()
        .unwrap_or_default();
    for field in block.fields {
        let wanted = desired.and_then(|d| d.get(*field)).cloned();
        node::set_field(&mut current, field, wanted);
    }
    for child in block.children {
        let wanted = desired
            .and_then(|d| d.get(child.key))
            .and_then(Value::as_mapping);
        merge_block(&mut current, child, wanted);
    }
    let value = (!current.is_empty()).then_some(Value::Mapping(current));
    node::set_field(parent, block.key, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(yaml: &str) -> Mapping {
        match serde_yaml::from_str(yaml) {
            Ok(Value::Mapping(m)) => m,
            _ => Mapping::new(),
        }
    }

    #[test]
    fn reads_known_blocks() {
        let m = entry(
            "octodns:\n  cloudflare:\n    proxied: true\nterraform:\n  hash: abc\ntype: A\nvalue: 1.2.3.4\n",
        );
        let res = Extension::from_entry(&m, "www");
        assert!(res.is_ok(), "{res:?}");
        let Ok(ext) = res else { return };
        assert_eq!(
            ext.octodns.and_then(|o| o.cloudflare),
            Some(CloudflareMeta {
                proxied: true,
                auto_ttl: false,
            })
        );
        assert_eq!(ext.terraform.map(|t| t.hash), Some("abc".to_string()));
    }

    #[test]
    fn merge_keeps_unknown_provider_keys() {
        let mut m = entry("octodns:\n  cloudflare:\n    proxied: true\n  ns1:\n    monitor: true\ntype: A\n");
        let ext = Extension::default();
        assert!(ext.merge_into(&mut m).is_ok());
        let octodns = m.get("octodns").and_then(Value::as_mapping);
        assert!(octodns.is_some_and(|o| o.contains_key("ns1") && !o.contains_key("cloudflare")));
    }

    #[test]
    fn merge_removes_emptied_blocks() {
        let mut m = entry("octodns:\n  cloudflare:\n    proxied: true\nterraform:\n  hash: abc\ntype: A\n");
        assert!(Extension::default().merge_into(&mut m).is_ok());
        assert_eq!(m, entry("type: A\n"));
    }

    #[test]
    fn merge_inserts_blocks_in_key_order() {
        let mut m = entry("ttl: 300\ntype: A\nvalue: 1.2.3.4\n");
        let ext = Extension {
            terraform: Some(TerraformMeta { hash: "abc".into() }),
            octodns: Some(OctodnsMeta {
                cloudflare: None,
                azuredns: Some(AzureDnsMeta {
                    healthcheck: Some(AzureHealthcheck {
                        interval: 30,
                        timeout: 10,
                        num_failures: 3,
                    }),
                }),
            }),
        };
        assert!(ext.merge_into(&mut m).is_ok());
        let keys: Vec<_> = m.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["octodns", "terraform", "ttl", "type", "value"]);

        let res = Extension::from_entry(&m, "www");
        assert_eq!(res, Ok(ext));
    }

    #[test]
    fn zero_values_are_empty() {
        let ext = Extension {
            terraform: Some(TerraformMeta::default()),
            octodns: Some(OctodnsMeta {
                cloudflare: Some(CloudflareMeta::default()),
                azuredns: None,
            }),
        };
        assert!(ext.is_empty());
    }
}
