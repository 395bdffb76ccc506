//! Certificate parsing from PEM, DER and base64-encoded DER.

use crate::token::{CertificateToken, DateTime, DistinguishedName, RawExtension};
use crate::util;
use crate::XtrustError;
use base64::Engine;
use x509_parser::prelude::*;

/// Parse a certificate from PEM or DER (auto-detected).
///
/// If the input begins with `-----BEGIN` (after stripping whitespace), it is
/// treated as PEM. Otherwise it is treated as DER.
pub fn parse_cert(input: &[u8]) -> Result<CertificateToken, XtrustError> {
    if input.is_empty() {
        return Err(XtrustError::ParseError("empty input".into()));
    }

    if util::is_pem(input) {
        parse_pem(input)
    } else {
        parse_der(input)
    }
}

/// Parse a certificate from PEM format.
pub fn parse_pem(input: &[u8]) -> Result<CertificateToken, XtrustError> {
    let (_, pem) = x509_parser::pem::parse_x509_pem(input)
        .map_err(|e| XtrustError::PemError(format!("{}", e)))?;

    if pem.label != "CERTIFICATE"
        && pem.label != "TRUSTED CERTIFICATE"
        && pem.label != "X509 CERTIFICATE"
    {
        return Err(XtrustError::PemError(format!(
            "expected CERTIFICATE, got {}",
            pem.label
        )));
    }

    parse_der(&pem.contents)
}

/// Parse a certificate from base64-encoded DER (no PEM armor).
pub fn parse_base64(input: &str) -> Result<CertificateToken, XtrustError> {
    let der = base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| XtrustError::ParseError(format!("invalid base64: {}", e)))?;
    parse_der(&der)
}

/// Parse a certificate from DER format.
pub fn parse_der(input: &[u8]) -> Result<CertificateToken, XtrustError> {
    let (remaining, x509) =
        X509Certificate::from_der(input).map_err(|e| XtrustError::ParseError(format!("{}", e)))?;

    // Use only the actual certificate bytes, not any trailing data,
    // so that fingerprints are computed over the correct content.
    let cert_len = input.len() - remaining.len();
    let cert_der = input.get(..cert_len).unwrap_or(input);
    build_token(&x509, cert_der)
}

/// Build a CertificateToken from a parsed X509Certificate.
fn build_token(x509: &X509Certificate, raw_der: &[u8]) -> Result<CertificateToken, XtrustError> {
    let tbs = &x509.tbs_certificate;

    let raw_version = tbs.version.0;
    if raw_version > 2 {
        return Err(XtrustError::ParseError(format!(
            "unsupported X.509 version {} (expected v1, v2, or v3)",
            raw_version + 1
        )));
    }

    let subject = build_dn(&tbs.subject);
    let issuer = build_dn(&tbs.issuer);

    let serial = strip_serial(tbs.raw_serial()).to_vec();

    let not_before = build_datetime(&tbs.validity.not_before);
    let not_after = build_datetime(&tbs.validity.not_after);

    let public_key_bits = tbs.subject_pki.subject_public_key.data.to_vec();
    let spki_der = build_spki_der(&tbs.subject_pki)?;

    let extensions = tbs
        .extensions()
        .iter()
        .map(|ext| RawExtension {
            oid: ext.oid.to_id_string(),
            critical: ext.critical,
            value: ext.value.to_vec(),
        })
        .collect();

    Ok(CertificateToken {
        subject,
        issuer,
        subject_raw: tbs.subject.as_raw().to_vec(),
        issuer_raw: tbs.issuer.as_raw().to_vec(),
        serial,
        spki_der,
        public_key_bits,
        not_before,
        not_after,
        extensions,
        raw_der: raw_der.to_vec(),
    })
}

/// Strip leading zero bytes from a serial, keeping at least one byte.
fn strip_serial(raw: &[u8]) -> &[u8] {
    match raw.iter().position(|&b| b != 0) {
        Some(pos) => raw.get(pos..).unwrap_or(raw),
        None => raw.get(raw.len().saturating_sub(1)..).unwrap_or(raw),
    }
}

pub(crate) fn build_dn(name: &X509Name) -> DistinguishedName {
    let mut components = Vec::new();
    for rdn in name.iter() {
        for attr in rdn.iter() {
            let key = util::oid_short_name(&attr.attr_type().to_id_string());
            let value = attr.as_str().unwrap_or("<binary>").to_string();
            components.push((key, value));
        }
    }
    DistinguishedName { components }
}

fn build_datetime(asn1_time: &ASN1Time) -> DateTime {
    let ts = asn1_time.timestamp();
    let iso = match ::time::OffsetDateTime::from_unix_timestamp(ts) {
        Ok(dt) => format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            dt.year(),
            u8::from(dt.month()),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        ),
        Err(_) => format!("{}", ts),
    };
    DateTime {
        iso8601: iso,
        timestamp: ts,
    }
}

/// Re-encode the SubjectPublicKeyInfo structure to its DER form.
///
/// The parser hands out the algorithm identifier and key bit string as
/// separate borrowed pieces; downstream consumers need the whole SPKI
/// encoding (key equality across certificates is defined over it).
fn build_spki_der(spki: &SubjectPublicKeyInfo) -> Result<Vec<u8>, XtrustError> {
    use x509_parser::der_parser::asn1_rs::ToDer;

    let oid_der = spki.algorithm.algorithm.to_der_vec().map_err(|e| {
        XtrustError::ParseError(format!("failed to encode algorithm OID: {}", e))
    })?;
    let params_der = match &spki.algorithm.parameters {
        Some(any) => any.to_der_vec().map_err(|e| {
            XtrustError::ParseError(format!("failed to encode algorithm parameters: {}", e))
        })?,
        None => Vec::new(), // absent parameters (e.g. EdDSA per RFC 8410)
    };

    let key_data = &spki.subject_public_key.data;

    // Build AlgorithmIdentifier SEQUENCE content
    let mut algo_content = Vec::new();
    algo_content.extend_from_slice(&oid_der);
    algo_content.extend_from_slice(&params_der);

    // Build BIT STRING content (unused-bits byte + key data)
    let mut bitstring_content = Vec::with_capacity(1 + key_data.len());
    bitstring_content.push(0x00); // unused bits
    bitstring_content.extend_from_slice(key_data);

    // Wrap each in its TLV envelope, then wrap in outer SEQUENCE
    let algo_seq = der_wrap(0x30, &algo_content)?;
    let bitstring = der_wrap(0x03, &bitstring_content)?;

    let mut outer_content = Vec::new();
    outer_content.extend_from_slice(&algo_seq);
    outer_content.extend_from_slice(&bitstring);
    der_wrap(0x30, &outer_content)
}

/// Maximum content length for DER TLV encoding with a 3-byte length field.
const MAX_DER_CONTENT_LEN: usize = 0xFF_FFFF; // 16 MiB

/// Wrap content bytes in a DER tag-length-value envelope.
///
/// Supports content lengths up to [`MAX_DER_CONTENT_LEN`] (16 MiB).
/// Returns an error if content exceeds this limit.
fn der_wrap(tag: u8, content: &[u8]) -> Result<Vec<u8>, XtrustError> {
    let len = content.len();
    if len > MAX_DER_CONTENT_LEN {
        return Err(XtrustError::ParseError(format!(
            "DER content length {} exceeds maximum supported ({})",
            len, MAX_DER_CONTENT_LEN
        )));
    }
    let mut buf = Vec::with_capacity(1 + 4 + len);
    buf.push(tag);
    if len < 0x80 {
        buf.push(len as u8);
    } else if len < 0x100 {
        buf.push(0x81);
        buf.push(len as u8);
    } else if len < 0x1_0000 {
        buf.push(0x82);
        buf.push((len >> 8) as u8);
        buf.push(len as u8);
    } else {
        buf.push(0x83);
        buf.push((len >> 16) as u8);
        buf.push((len >> 8) as u8);
        buf.push(len as u8);
    }
    buf.extend_from_slice(content);
    Ok(buf)
}
