//! Signature-policy digest computation.
//!
//! A signature policy document (RFC 3125) is a DER structure:
//!
//! ```text
//! SignaturePolicy ::= SEQUENCE {
//!     signPolicyHashAlg  AlgorithmIdentifier,
//!     signPolicyInfo     SignPolicyInfo,
//!     signPolicyHash     SignPolicyHash OPTIONAL }
//! ```
//!
//! The digest carried in a signature's policy-identifier attribute is
//! computed over the concatenated DER encodings of the first two fields;
//! the optional embedded hash is excluded from its own computation. This
//! is a pure function of the algorithm and the document bytes.

use crate::asn1;
use crate::fingerprint::compute_digest;
use crate::refs::DigestAlgoAndValue;
use crate::token::DigestAlgorithm;
use crate::XtrustError;

/// Compute the digest of a signature-policy document as it would appear
/// in a signature's policy-identifier attribute.
pub fn get_signature_policy_digest(
    algorithm: DigestAlgorithm,
    policy_bytes: &[u8],
) -> Result<Vec<u8>, XtrustError> {
    let (tag, content_len, header_len) = asn1::read_header(policy_bytes)?;
    if tag != 0x30 {
        return Err(XtrustError::MalformedEncoding(format!(
            "signature policy must be a SEQUENCE, found tag 0x{:02x}",
            tag
        )));
    }
    let content = policy_bytes
        .get(header_len..header_len + content_len)
        .ok_or_else(|| XtrustError::MalformedEncoding("truncated signature policy".into()))?;

    let (hash_alg_raw, rest) = split_field(content, "signPolicyHashAlg")?;
    let (policy_info_raw, _) = split_field(rest, "signPolicyInfo")?;

    // Both fields must decode as SEQUENCEs before being digested raw.
    asn1::children(&asn1::parse(hash_alg_raw)?)?;
    asn1::children(&asn1::parse(policy_info_raw)?)?;

    let mut digested = Vec::with_capacity(hash_alg_raw.len() + policy_info_raw.len());
    digested.extend_from_slice(hash_alg_raw);
    digested.extend_from_slice(policy_info_raw);
    Ok(compute_digest(&digested, algorithm))
}

/// Like [`get_signature_policy_digest`], paired with the algorithm for
/// direct comparison against a claimed policy hash.
pub fn get_signature_policy_digest_value(
    algorithm: DigestAlgorithm,
    policy_bytes: &[u8],
) -> Result<DigestAlgoAndValue, XtrustError> {
    Ok(DigestAlgoAndValue {
        algorithm,
        value: get_signature_policy_digest(algorithm, policy_bytes)?,
    })
}

/// Split the raw TLV of the next field off `input`.
fn split_field<'a>(input: &'a [u8], what: &str) -> Result<(&'a [u8], &'a [u8]), XtrustError> {
    let (_, content_len, header_len) = asn1::read_header(input)
        .map_err(|e| XtrustError::MalformedEncoding(format!("{}: {}", what, e)))?;
    let total = header_len + content_len;
    let raw = input
        .get(..total)
        .ok_or_else(|| XtrustError::MalformedEncoding(format!("truncated {}", what)))?;
    Ok((raw, input.get(total..).unwrap_or(&[])))
}
