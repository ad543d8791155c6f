//! Export assembly: records to envelope bytes

use crate::envelope;
use crate::error::{Result, RosterError};
use crate::types::{Record, WireRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

/// ISO-8601 form used on the wire, e.g. `2024-01-02T03:04:05.678Z`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Project a single record onto the wire schema
pub fn to_wire(record: &Record) -> Result<WireRecord> {
    project(0, record)
}

fn project(index: usize, record: &Record) -> Result<WireRecord> {
    let id = i32::try_from(record.id).map_err(|_| {
        RosterError::schema(index, format!("id {} does not fit in int32", record.id))
    })?;

    Ok(WireRecord {
        id,
        email: record.email.clone(),
        role: record.role.to_wire(),
        status: record.status.to_wire(),
        created_at: format_timestamp(&record.created_at),
        signature: record.signature.clone(),
    })
}

/// Assemble the export envelope for a full record set
///
/// Either the whole set encodes or the call fails with
/// [`RosterError::SchemaViolation`]; no partial envelope is returned.
pub fn assemble(records: &[Record]) -> Result<Vec<u8>> {
    let wire = records
        .iter()
        .enumerate()
        .map(|(index, record)| project(index, record))
        .collect::<Result<Vec<_>>>()?;

    let bytes = envelope::encode(&wire)?;

    debug!(records = wire.len(), bytes = bytes.len(), "Assembled export envelope");

    Ok(bytes)
}
