//! Subdomain query service

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{RecordSnapshot, SubdomainSnapshot};

/// Subdomain query service
pub struct SubdomainService {
    ctx: Arc<ServiceContext>,
}

impl SubdomainService {
    /// Create subdomain service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Every record of a subdomain, in document order
    pub async fn read_subdomain(
        &self,
        zone: &str,
        scope: &str,
        name: &str,
    ) -> CoreResult<SubdomainSnapshot> {
        let mut document = self.ctx.read_zone(scope, zone).await?;
        let mut subdomain = document.find_subdomain(name)?;
        let name = subdomain.name().to_string();
        let types = subdomain.find_all_types()?;
        let mut records = Vec::with_capacity(types.len());
        for record_type in types {
            let record = subdomain.get_type(record_type)?;
            records.push(RecordSnapshot::from_record(&name, record));
        }
        Ok(SubdomainSnapshot { name, records })
    }

    /// Subdomain names of a zone in document order; the apex is `""`
    pub async fn list_subdomains(&self, zone: &str, scope: &str) -> CoreResult<Vec<String>> {
        let document = self.ctx.read_zone(scope, zone).await?;
        Ok(document.subdomain_names())
    }
}
