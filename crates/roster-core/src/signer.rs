//! Record signing scheme
//!
//! This module is the single definition of what gets hashed and what gets
//! signed. The verifier reuses [`digest`] and [`Digest::signed_message`], so
//! both sides agree byte for byte:
//!
//! 1. `digest = lowercase_hex(SHA-384(utf8(email)))`, 96 characters
//! 2. `signature = RSASSA-PKCS1-v1_5(SHA-384, private_key, utf8(digest))`
//! 3. the persisted signature is `lowercase_hex(signature)`
//!
//! Step 2 signs the hex *text* of the digest, not the 48 raw digest bytes.
//! Any other implementation must do the same or every record will fail
//! verification.

use crate::crypto::KeyPair;
use crate::error::Result;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest as _, Sha384};
use std::fmt;
use tracing::debug;

/// Length of a hex-encoded SHA-384 digest
pub const DIGEST_HEX_LEN: usize = 96;

/// Hex-encoded SHA-384 digest of an identity field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// Accept an already computed digest; must be 96 lowercase hex characters
    pub fn parse(hex_text: &str) -> Option<Self> {
        let well_formed = hex_text.len() == DIGEST_HEX_LEN
            && hex_text
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Digest(hex_text.to_string()))
    }

    /// The digest as lowercase hex text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The exact bytes covered by the signature: the UTF-8 hex text
    pub fn signed_message(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the digest of an identity field (the record's email)
pub fn digest(identity: &str) -> Digest {
    Digest(hex::encode(Sha384::digest(identity.as_bytes())))
}

/// Signs record digests with the private half of a [`KeyPair`]
#[derive(Clone)]
pub struct RecordSigner {
    signing_key: SigningKey<Sha384>,
}

impl fmt::Debug for RecordSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSigner")
            .field("scheme", &"rsa-pkcs1v15-sha384")
            .finish()
    }
}

impl RecordSigner {
    pub fn new(key_pair: &KeyPair) -> Self {
        Self {
            signing_key: SigningKey::<Sha384>::new(key_pair.private_key().clone()),
        }
    }

    /// Sign the hex text of a digest, returning raw signature bytes
    pub fn sign(&self, digest: &Digest) -> Result<Vec<u8>> {
        let signature = self.signing_key.try_sign(digest.signed_message())?;
        Ok(signature.to_vec())
    }

    /// Digest and sign an identity field, returning the hex signature to persist
    pub fn sign_identity(&self, identity: &str) -> Result<String> {
        let digest = digest(identity);
        let signature = hex::encode(self.sign(&digest)?);
        debug!(digest = %digest, "Signed record identity");
        Ok(signature)
    }
}
