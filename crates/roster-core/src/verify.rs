//! Remote verification of export envelopes
//!
//! A verifier needs only the distributed SPKI public key. For each decoded
//! record it recomputes `digest(email)` and checks the RSA PKCS#1 v1.5 /
//! SHA-384 signature over the digest's hex text, exactly mirroring
//! [`crate::signer`].
//!
//! Only the email is covered by a signature. Role, status, id and createdAt
//! are carried alongside but are not attested.

use crate::crypto::PublicKey;
use crate::envelope;
use crate::error::Result;
use crate::signer::{digest, Digest};
use crate::types::WireRecord;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use sha2::Sha384;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a single record was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The signature field is not a hex-encoded byte string
    #[error("signature is not valid hex: {0}")]
    InvalidSignatureEncoding(String),

    /// The signature does not match the record's email under this key
    #[error("signature does not match email")]
    SignatureMismatch,
}

/// A record that failed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub record: WireRecord,
    pub reason: RejectReason,
}

/// Result of verifying a batch: two partitions, each in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    pub verified: Vec<WireRecord>,
    pub rejected: Vec<Rejected>,
}

impl Verification {
    /// Total number of records examined
    pub fn total(&self) -> usize {
        self.verified.len() + self.rejected.len()
    }

    /// True when every record verified
    pub fn all_verified(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Verifies record signatures against a distributed public key
#[derive(Debug, Clone)]
pub struct RemoteVerifier {
    verifying_key: VerifyingKey<Sha384>,
}

impl RemoteVerifier {
    pub fn new(public_key: &PublicKey) -> Self {
        Self {
            verifying_key: VerifyingKey::<Sha384>::new(public_key.as_rsa().clone()),
        }
    }

    /// Build a verifier from the SPKI PEM served by the public-key endpoint
    ///
    /// Fails with [`crate::RosterError::KeyFormat`] if the key cannot be imported.
    pub fn from_spki_pem(pem: &str) -> Result<Self> {
        let public_key = PublicKey::from_spki_pem(pem)?;
        Ok(Self::new(&public_key))
    }

    /// Check raw signature bytes over a digest
    pub fn verify_signature(&self, digest: &Digest, signature: &[u8]) -> std::result::Result<(), RejectReason> {
        let signature =
            Signature::try_from(signature).map_err(|_| RejectReason::SignatureMismatch)?;
        self.verifying_key
            .verify(digest.signed_message(), &signature)
            .map_err(|_| RejectReason::SignatureMismatch)
    }

    /// Check a single wire record
    pub fn verify_record(&self, record: &WireRecord) -> std::result::Result<(), RejectReason> {
        let signature = hex::decode(&record.signature)
            .map_err(|e| RejectReason::InvalidSignatureEncoding(e.to_string()))?;
        self.verify_signature(&digest(&record.email), &signature)
    }

    /// Partition already-decoded records into verified and rejected
    pub fn verify_records(&self, records: Vec<WireRecord>) -> Verification {
        let mut verification = Verification::default();

        for record in records {
            match self.verify_record(&record) {
                Ok(()) => verification.verified.push(record),
                Err(reason) => {
                    warn!(id = record.id, reason = %reason, "Rejected exported record");
                    verification.rejected.push(Rejected { record, reason });
                }
            }
        }

        debug!(
            verified = verification.verified.len(),
            rejected = verification.rejected.len(),
            "Verified export batch"
        );

        verification
    }

    /// Decode an envelope and verify every record in it
    ///
    /// Decoding errors fail the call; per-record signature failures only
    /// move that record into the rejected partition.
    pub fn verify(&self, envelope_bytes: &[u8]) -> Result<Verification> {
        let records = envelope::decode(envelope_bytes)?;
        Ok(self.verify_records(records))
    }
}

/// Verify an envelope with an SPKI PEM public key
pub fn verify_envelope(envelope_bytes: &[u8], spki_pem: &str) -> Result<Verification> {
    RemoteVerifier::from_spki_pem(spki_pem)?.verify(envelope_bytes)
}
