//! Binary envelope codec
//!
//! The envelope is the protobuf `UserList` message (see `proto/user.proto`).
//! It carries no version tag: encoder and decoder agree on field numbers and
//! on the role/status integer mapping out of band, and changing either is a
//! breaking change that the decoder cannot detect.

use crate::error::{Result, RosterError};
use crate::types::{Role, Status, UserList, WireRecord};
use prost::Message;

/// Check a single wire record against the schema
///
/// `index` is the record's position in the batch and is reported in the
/// resulting [`RosterError::SchemaViolation`].
pub fn validate(index: usize, record: &WireRecord) -> Result<()> {
    if Role::from_wire(record.role).is_none() {
        return Err(RosterError::schema(
            index,
            format!("unmapped role value {}", record.role),
        ));
    }
    if Status::from_wire(record.status).is_none() {
        return Err(RosterError::schema(
            index,
            format!("unmapped status value {}", record.status),
        ));
    }
    if record.email.is_empty() {
        return Err(RosterError::schema(index, "email is required"));
    }
    if record.created_at.is_empty() {
        return Err(RosterError::schema(index, "createdAt is required"));
    }
    if chrono::DateTime::parse_from_rfc3339(&record.created_at).is_err() {
        return Err(RosterError::schema(
            index,
            format!("createdAt '{}' is not an RFC 3339 timestamp", record.created_at),
        ));
    }
    if record.signature.is_empty() {
        return Err(RosterError::schema(index, "signature is required"));
    }
    if record.signature.len() % 2 != 0
        || !record.signature.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return Err(RosterError::schema(index, "signature is not hex encoded"));
    }
    Ok(())
}

/// Encode a batch of wire records into an envelope
///
/// Every record is validated before any byte is produced, so a schema
/// violation never yields a partial envelope.
pub fn encode(records: &[WireRecord]) -> Result<Vec<u8>> {
    for (index, record) in records.iter().enumerate() {
        validate(index, record)?;
    }

    let envelope = UserList {
        users: records.to_vec(),
    };
    Ok(envelope.encode_to_vec())
}

/// Decode an envelope back into wire records, preserving order
///
/// Fails with [`RosterError::MalformedEnvelope`] on truncated or otherwise
/// invalid protobuf; there is no partial recovery. An empty input is a valid
/// empty envelope.
pub fn decode(bytes: &[u8]) -> Result<Vec<WireRecord>> {
    let envelope = UserList::decode(bytes)?;
    Ok(envelope.users)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `UserList` with one record: id 1, a@b.com, USER, INACTIVE,
    /// 2024-01-01T00:00:00.000Z, signature "abcd"
    const GOLDEN_ENVELOPE: &str = "0a2f080112076140622e636f6d180120012a18323032342d30312d30315430303a30303a30302e3030305a320461626364";

    fn record(id: i32, email: &str) -> WireRecord {
        WireRecord {
            id,
            email: email.to_string(),
            role: 1,
            status: 0,
            created_at: "2024-05-06T07:08:09.010Z".to_string(),
            signature: "00ff".to_string(),
        }
    }

    #[test]
    fn test_golden_envelope_bytes() {
        let r = WireRecord {
            id: 1,
            email: "a@b.com".into(),
            role: 1,
            status: 1,
            created_at: "2024-01-01T00:00:00.000Z".into(),
            signature: "abcd".into(),
        };
        let bytes = encode(&[r.clone()]).unwrap();
        assert_eq!(hex::encode(&bytes), GOLDEN_ENVELOPE);
        assert_eq!(decode(&bytes).unwrap(), vec![r]);
    }

    #[test]
    fn test_roundtrip_preserves_order() {
        let records = vec![record(3, "c@x.io"), record(1, "a@x.io"), record(2, "b@x.io")];
        let decoded = decode(&encode(&records).unwrap()).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_empty_envelope() {
        let bytes = encode(&[]).unwrap();
        assert!(bytes.is_empty());
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_unmapped_role_rejected_before_encoding() {
        let mut bad = record(2, "b@x.io");
        bad.role = 2;
        let err = encode(&[record(1, "a@x.io"), bad]).unwrap_err();
        assert_eq!(
            err,
            RosterError::SchemaViolation {
                index: 1,
                reason: "unmapped role value 2".into()
            }
        );
    }

    #[test]
    fn test_unmapped_status_rejected() {
        let mut bad = record(1, "a@x.io");
        bad.status = -1;
        assert!(matches!(
            encode(&[bad]),
            Err(RosterError::SchemaViolation { index: 0, .. })
        ));
    }

    #[test]
    fn test_required_fields() {
        let mut no_email = record(1, "");
        no_email.email.clear();
        assert!(matches!(encode(&[no_email]), Err(RosterError::SchemaViolation { .. })));

        let mut no_ts = record(1, "a@x.io");
        no_ts.created_at.clear();
        assert!(matches!(encode(&[no_ts]), Err(RosterError::SchemaViolation { .. })));

        let mut bad_ts = record(1, "a@x.io");
        bad_ts.created_at = "yesterday".into();
        assert!(matches!(encode(&[bad_ts]), Err(RosterError::SchemaViolation { .. })));

        let mut no_sig = record(1, "a@x.io");
        no_sig.signature.clear();
        assert!(matches!(encode(&[no_sig]), Err(RosterError::SchemaViolation { .. })));

        let mut odd_sig = record(1, "a@x.io");
        odd_sig.signature = "abc".into();
        assert!(matches!(encode(&[odd_sig]), Err(RosterError::SchemaViolation { .. })));

        let mut non_hex = record(1, "a@x.io");
        non_hex.signature = "zz".into();
        assert!(matches!(encode(&[non_hex]), Err(RosterError::SchemaViolation { .. })));
    }

    #[test]
    fn test_truncated_envelope_is_malformed() {
        let bytes = encode(&[record(1, "a@x.io"), record(2, "b@x.io")]).unwrap();
        for cut in 1..bytes.len() {
            // A cut exactly on a record boundary is itself a valid shorter envelope
            if let Ok(records) = decode(&bytes[..cut]) {
                assert_eq!(records, vec![record(1, "a@x.io")]);
                continue;
            }
            assert!(matches!(
                decode(&bytes[..cut]),
                Err(RosterError::MalformedEnvelope(_))
            ));
        }
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            decode(&[0xff, 0xff, 0xff]),
            Err(RosterError::MalformedEnvelope(_))
        ));
        // field 1, length 10, only two bytes follow
        assert!(matches!(
            decode(&[0x0a, 0x0a, 0x08, 0x01]),
            Err(RosterError::MalformedEnvelope(_))
        ));
    }
}
