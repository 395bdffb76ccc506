//! Certificate data types.
//!
//! [`CertificateToken`] is an immutable wrapper around one decoded X.509
//! certificate. Identity is defined by the encoded bytes: two tokens are
//! equal iff their DER encodings are byte-identical, regardless of how they
//! were loaded. Tokens own only decoded in-memory values and are safe to
//! share across threads once constructed.

use crate::fingerprint::{compute_digest, compute_fingerprint};
use crate::util;
use serde::Serialize;

/// Digest algorithm for fingerprint and reference-digest computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
    Sha1,
}

/// Distinguished name with ordered components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistinguishedName {
    /// Ordered list of (attribute_type, value) pairs.
    /// Attribute types use short names where known (e.g., "CN", "O", "C").
    pub components: Vec<(String, String)>,
}

impl DistinguishedName {
    /// Format as a comma-separated one-line string.
    /// Example: "C = US, O = Org, CN = example.com"
    ///
    /// Values containing commas, equals signs, or backslashes are escaped
    /// to prevent ambiguous output.
    pub fn to_oneline(&self) -> String {
        let mut result = String::new();
        for (i, (k, v)) in self.components.iter().enumerate() {
            if i > 0 {
                result.push_str(", ");
            }
            result.push_str(k);
            result.push_str(" = ");
            for ch in v.chars() {
                match ch {
                    '\\' => result.push_str("\\\\"),
                    ',' => result.push_str("\\,"),
                    '=' => result.push_str("\\="),
                    _ => result.push(ch),
                }
            }
        }
        result
    }

    /// Return the first value of the given attribute short name, if any.
    pub fn attribute(&self, short_name: &str) -> Option<&str> {
        self.components
            .iter()
            .find(|(k, _)| k == short_name)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_oneline())
    }
}

/// Date-time representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTime {
    /// ISO 8601 formatted string.
    pub iso8601: String,
    /// Unix timestamp.
    pub timestamp: i64,
}

/// One raw X.509v3 extension: OID, criticality and undecoded payload.
///
/// Payload decoding is deferred to the extraction functions so that each
/// call works from the certificate's own bytes.
#[derive(Debug, Clone, Serialize)]
pub struct RawExtension {
    /// OID as a dotted-decimal string.
    pub oid: String,
    /// Whether this extension is marked critical.
    pub critical: bool,
    /// Raw DER payload (the content of the extnValue OCTET STRING).
    pub value: Vec<u8>,
}

/// An immutable, decoded X.509 certificate.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateToken {
    pub(crate) subject: DistinguishedName,
    pub(crate) issuer: DistinguishedName,
    /// Raw DER encoding of the subject Name, for candidate prefiltering.
    #[serde(skip)]
    pub(crate) subject_raw: Vec<u8>,
    /// Raw DER encoding of the issuer Name.
    #[serde(skip)]
    pub(crate) issuer_raw: Vec<u8>,
    /// Serial number as big-endian bytes, leading zeros stripped.
    pub(crate) serial: Vec<u8>,
    /// Full SubjectPublicKeyInfo DER encoding.
    #[serde(skip)]
    pub(crate) spki_der: Vec<u8>,
    /// Content of the SubjectPublicKeyInfo BIT STRING (the bare key).
    #[serde(skip)]
    pub(crate) public_key_bits: Vec<u8>,
    pub(crate) not_before: DateTime,
    pub(crate) not_after: DateTime,
    pub(crate) extensions: Vec<RawExtension>,
    /// Raw DER bytes of the entire certificate.
    #[serde(skip)]
    pub(crate) raw_der: Vec<u8>,
}

impl CertificateToken {
    /// Subject distinguished name.
    pub fn subject(&self) -> &DistinguishedName {
        &self.subject
    }

    /// Issuer distinguished name.
    pub fn issuer(&self) -> &DistinguishedName {
        &self.issuer
    }

    /// Serial number as big-endian bytes (leading zeros stripped).
    pub fn serial_bytes(&self) -> &[u8] {
        &self.serial
    }

    /// Serial number as a colon-separated uppercase hex string.
    pub fn serial_hex(&self) -> String {
        util::hex_colon_upper(&self.serial)
    }

    /// Full SubjectPublicKeyInfo DER encoding of the public key.
    pub fn public_key_der(&self) -> &[u8] {
        &self.spki_der
    }

    /// Bare public key: the content of the SubjectPublicKeyInfo BIT STRING.
    pub fn public_key_bits(&self) -> &[u8] {
        &self.public_key_bits
    }

    /// Validity start.
    pub fn not_before(&self) -> &DateTime {
        &self.not_before
    }

    /// Validity end.
    pub fn not_after(&self) -> &DateTime {
        &self.not_after
    }

    /// All extensions, in certificate order.
    pub fn extensions(&self) -> &[RawExtension] {
        &self.extensions
    }

    /// Raw payload of the extension with the given OID, if present.
    pub fn extension_value(&self, ext_oid: &str) -> Option<&[u8]> {
        self.extensions
            .iter()
            .find(|e| e.oid == ext_oid)
            .map(|e| e.value.as_slice())
    }

    /// Raw DER encoding of the whole certificate.
    pub fn der(&self) -> &[u8] {
        &self.raw_der
    }

    /// Whether subject and issuer names are byte-identical.
    pub fn is_self_issued(&self) -> bool {
        self.subject_raw == self.issuer_raw
    }

    /// Digest of the DER encoding with the given algorithm.
    pub fn digest(&self, algorithm: DigestAlgorithm) -> Vec<u8> {
        compute_digest(&self.raw_der, algorithm)
    }

    /// Fingerprint of the DER encoding as colon-separated uppercase hex.
    pub fn fingerprint(&self, algorithm: DigestAlgorithm) -> String {
        compute_fingerprint(&self.raw_der, algorithm)
    }

    /// The subject Common Name attribute, if present.
    pub fn subject_common_name(&self) -> Option<&str> {
        self.subject.attribute("CN")
    }

    /// A short human-readable identifier: CN, then O, then OU, then the
    /// serial in hex when the subject carries none of those.
    pub fn human_readable_name(&self) -> String {
        for key in ["CN", "O", "OU"] {
            if let Some(v) = self.subject.attribute(key) {
                return v.to_string();
            }
        }
        self.serial_hex()
    }
}

impl PartialEq for CertificateToken {
    fn eq(&self, other: &Self) -> bool {
        self.raw_der == other.raw_der
    }
}

impl Eq for CertificateToken {}

impl std::hash::Hash for CertificateToken {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw_der.hash(state);
    }
}

impl std::fmt::Display for CertificateToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (serial {})", self.subject, self.serial_hex())
    }
}
