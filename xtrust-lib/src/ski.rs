//! Subject Key Identifier resolution.
//!
//! Returns the declared SKI extension value when present; otherwise the
//! identifier can be computed from the public key. The computation is
//! fixed to SHA-1 over the SubjectPublicKeyInfo BIT STRING content
//! (RFC 5280 Section 4.2.1.2, method 1), independent of the certificate's
//! own signature algorithm, so that every party derives the same
//! identifier for the same key.

use crate::asn1;
use crate::fingerprint::compute_digest;
use crate::oid;
use crate::token::{CertificateToken, DigestAlgorithm};
use crate::XtrustError;

/// Return the certificate's Subject Key Identifier.
///
/// When the SKI extension is declared, its decoded value is returned.
/// When absent and `compute_if_missing` is set, a SHA-1 identifier is
/// computed from the public key; otherwise `None` is returned without
/// any computation.
///
/// Two certificates with byte-identical public keys always produce the
/// same computed identifier, even when their surrounding encodings
/// differ. This is what allows matching a historical certificate to its
/// reissued successor.
pub fn get_ski(
    cert: &CertificateToken,
    compute_if_missing: bool,
) -> Result<Option<Vec<u8>>, XtrustError> {
    match cert.extension_value(oid::EXT_SUBJECT_KEY_ID) {
        Some(payload) => {
            // SubjectKeyIdentifier ::= KeyIdentifier (OCTET STRING)
            let obj = asn1::parse(payload).map_err(|e| XtrustError::MalformedExtension {
                oid: oid::EXT_SUBJECT_KEY_ID.to_string(),
                reason: e.to_string(),
            })?;
            let ki = asn1::octet_string(&obj).map_err(|e| XtrustError::MalformedExtension {
                oid: oid::EXT_SUBJECT_KEY_ID.to_string(),
                reason: e.to_string(),
            })?;
            Ok(Some(ki.to_vec()))
        }
        None if compute_if_missing => {
            log::debug!(
                "no declared SKI for {}, computing from public key",
                cert.human_readable_name()
            );
            Ok(Some(compute_ski(cert)))
        }
        None => Ok(None),
    }
}

/// Compute the key identifier from the certificate's public key,
/// disregarding any declared SKI extension.
pub fn compute_ski(cert: &CertificateToken) -> Vec<u8> {
    compute_digest(cert.public_key_bits(), DigestAlgorithm::Sha1)
}
