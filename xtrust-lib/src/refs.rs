//! Certificate reference values with structural equality.
//!
//! During signature validation the same certificate may be referenced
//! from several places (signed attributes, archival attributes, key
//! info). References collected independently must merge by value, so
//! equality and hashing are derived over the full field tuple rather
//! than object identity.

use crate::token::DigestAlgorithm;
use serde::Serialize;

/// Where a certificate reference was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CertificateRefOrigin {
    /// KeyInfo of the signature itself.
    KeyInfo,
    /// Signing-certificate signed attribute.
    SigningCertificateAttribute,
    /// Complete-certificate-refs unsigned attribute.
    CompleteCertificateRefs,
    /// Attribute-certificate-refs unsigned attribute.
    AttributeCertificateRefs,
}

/// A digest algorithm paired with a digest value.
///
/// Used both for certificate references and for policy-document
/// integrity values. Whether the value length matches the algorithm's
/// output size is the consumer's concern; construction does not check it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DigestAlgoAndValue {
    pub algorithm: DigestAlgorithm,
    pub value: Vec<u8>,
}

/// A certificate reference: origin plus the optional identifying pieces
/// that were present at the collection site.
///
/// Two references are equal iff origin, issuer-serial bytes and digest
/// all match structurally; they then hash identically, so a `HashSet`
/// deduplicates references collected from different attribute sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CertificateRef {
    /// Collection site of this reference.
    pub origin: CertificateRefOrigin,
    /// Raw IssuerSerial encoding, when the reference carried one.
    pub issuer_serial: Option<Vec<u8>>,
    /// Certificate digest, when the reference carried one.
    pub digest: Option<DigestAlgoAndValue>,
}

impl CertificateRef {
    pub fn new(
        origin: CertificateRefOrigin,
        issuer_serial: Option<Vec<u8>>,
        digest: Option<DigestAlgoAndValue>,
    ) -> Self {
        CertificateRef {
            origin,
            issuer_serial,
            digest,
        }
    }
}

impl std::fmt::Display for CertificateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CertificateRef origin='{:?}'", self.origin)
    }
}
