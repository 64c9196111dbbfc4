//! Record management service

use std::sync::Arc;

use zone_orchestrator_model::{Record, RecordType, Zone};

use super::display_name;
use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{RecordSnapshot, WriteRecordRequest};

/// Record management service
///
/// One call reads or changes one record type of one subdomain, committing
/// the whole zone file.
pub struct RecordService {
    ctx: Arc<ServiceContext>,
}

/// Replace values, TTL and extension of `record` from a request.
fn apply_request(record: &mut Record, request: &WriteRecordRequest) -> CoreResult<()> {
    record.set_values_from_text(&request.values)?;
    record.set_ttl(request.ttl);
    record.set_extension(request.extension.clone());
    Ok(())
}

/// Write the cached record of `rtype` back and snapshot it.
fn write_and_snapshot(
    document: &mut Zone,
    name: &str,
    rtype: RecordType,
    request: &WriteRecordRequest,
    create: bool,
) -> CoreResult<RecordSnapshot> {
    let mut subdomain = document.find_subdomain(name)?;
    let name = subdomain.name().to_string();
    let record = if create {
        subdomain.create_type(rtype)?
    } else {
        subdomain.get_type(rtype)?
    };
    apply_request(record, request)?;
    subdomain.write_back(rtype)?;
    let record = subdomain.get_type(rtype)?;
    Ok(RecordSnapshot::from_record(&name, record))
}

impl RecordService {
    /// Create record service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Read one record
    pub async fn read_record(
        &self,
        zone: &str,
        scope: &str,
        name: &str,
        record_type: RecordType,
    ) -> CoreResult<RecordSnapshot> {
        let document = self.ctx.read_zone(scope, zone).await?;
        let record = document.get_record(name, record_type)?;
        let name = if name == zone_orchestrator_model::APEX_MARKER {
            ""
        } else {
            name
        };
        Ok(RecordSnapshot::from_record(name, &record))
    }

    /// Create a record type in a subdomain, creating the subdomain if needed
    pub async fn create_record(&self, request: &WriteRecordRequest) -> CoreResult<RecordSnapshot> {
        let message = format!(
            "chore({}): create {} record for {}",
            request.zone,
            request.record_type,
            display_name(&request.name)
        );
        self.ctx
            .modify_zone(&request.scope, &request.zone, &message, |document| {
                if !document.has_subdomain(&request.name) {
                    document.create_subdomain(&request.name)?;
                }
                write_and_snapshot(document, &request.name, request.record_type, request, true)
            })
            .await
    }

    /// Replace values, TTL and extension of an existing record
    pub async fn update_record(&self, request: &WriteRecordRequest) -> CoreResult<RecordSnapshot> {
        let message = format!(
            "chore({}): update {} record for {}",
            request.zone,
            request.record_type,
            display_name(&request.name)
        );
        self.ctx
            .modify_zone(&request.scope, &request.zone, &message, |document| {
                write_and_snapshot(document, &request.name, request.record_type, request, false)
            })
            .await
    }

    /// Delete a record type; the subdomain goes too once it holds nothing
    pub async fn delete_record(
        &self,
        zone: &str,
        scope: &str,
        name: &str,
        record_type: RecordType,
    ) -> CoreResult<()> {
        let message = format!(
            "chore({zone}): delete {record_type} record for {}",
            display_name(name)
        );
        self.ctx
            .modify_zone(scope, zone, &message, |document| {
                document.find_subdomain(name)?.delete_type(record_type)?;
                document.delete_subdomain_if_empty(name)?;
                Ok(())
            })
            .await
    }
}
