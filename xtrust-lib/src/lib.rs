//! xtrust-lib: Library for extracting trust information from X.509
//! certificates and matching certificate chains.
//!
//! Provides the extension-extraction and pairwise-matching primitives a
//! signature validator consumes: Authority Information Access and CRL
//! distribution URLs, certificate policies with CPS URIs, qualified
//! statements, OCSP-signing detection, Subject Key Identifier resolution
//! (declared or computed from the public key), IssuerSerial reference
//! decoding, cycle-safe trust-chain walking and signature-policy digest
//! computation.
//!
//! The library owns no I/O: certificate bytes come from the caller, URLs
//! extracted here are fetched by the caller, and cryptographic signature
//! verification is supplied to the chain walker as a predicate. All types
//! are immutable once constructed and safe to share across threads.

pub mod asn1;
mod attributes;
mod extensions;
mod fingerprint;
mod issuer_serial;
mod parser;
mod policy;
mod refs;
mod ski;
mod token;
mod util;
mod walker;

pub mod oid;

pub use attributes::AttributeTable;
pub use extensions::{
    get_ca_access_locations, get_certificate_policies, get_crl_urls, get_extended_key_usage,
    get_ocsp_access_locations, get_qc_statements_id_list, has_id_pkix_ocsp_no_check_extension,
    is_ocsp_signing, AccessLocationSet, CertificatePolicy,
};
pub use fingerprint::{compute_digest, compute_fingerprint};
pub use issuer_serial::{get_issuer_info, IssuerSerialInfo};
pub use parser::{parse_base64, parse_cert, parse_der, parse_pem};
pub use policy::{get_signature_policy_digest, get_signature_policy_digest_value};
pub use refs::{CertificateRef, CertificateRefOrigin, DigestAlgoAndValue};
pub use ski::{compute_ski, get_ski};
pub use token::{CertificateToken, DateTime, DigestAlgorithm, DistinguishedName, RawExtension};
pub use walker::ChainWalker;

/// Errors returned by xtrust-lib.
#[derive(Debug, thiserror::Error)]
pub enum XtrustError {
    #[error("Failed to parse certificate: {0}")]
    ParseError(String),

    #[error("Invalid PEM format: {0}")]
    PemError(String),

    #[error("Malformed DER encoding: {0}")]
    MalformedEncoding(String),

    #[error("Malformed extension {oid}: {reason}")]
    MalformedExtension { oid: String, reason: String },

    #[error("Malformed IssuerSerial structure: {0}")]
    MalformedIssuerSerial(String),
}
