//! IssuerSerial decoding and matching.
//!
//! Decodes the `IssuerSerial` value embedded in signing-certificate
//! references (ESSCertID / ESSCertIDv2) into an issuer name and serial
//! number. Two encodings occur in the wild: the legacy shape wraps the
//! issuer in GeneralNames, the V2 shape places the [4]-tagged name
//! directly inside the outer SEQUENCE. The shape is detected from the
//! structure itself; callers never specify a variant.

use crate::asn1;
use crate::parser::build_dn;
use crate::token::{CertificateToken, DistinguishedName};
use crate::util;
use crate::XtrustError;
use serde::Serialize;
use x509_parser::prelude::{FromDer, X509Name};

/// GeneralName CHOICE tag for directoryName.
const GN_TAG_DIRECTORY_NAME: u32 = 4;

/// A decoded issuer/serial reference.
///
/// Both fields are populated together or the whole decode fails; no
/// partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuerSerialInfo {
    /// Referenced issuer distinguished name.
    pub issuer_name: DistinguishedName,
    /// Referenced serial number, big-endian with leading zeros stripped.
    pub serial_number: Vec<u8>,
}

impl IssuerSerialInfo {
    /// Serial number as a colon-separated uppercase hex string.
    pub fn serial_hex(&self) -> String {
        util::hex_colon_upper(&self.serial_number)
    }

    /// Whether this reference designates the given certificate: issuer
    /// name and serial number both match.
    pub fn matches_certificate(&self, cert: &CertificateToken) -> bool {
        self.serial_number == cert.serial_bytes() && &self.issuer_name == cert.issuer()
    }
}

/// Decode an `IssuerSerial` binary value.
///
/// ```text
/// IssuerSerial ::= SEQUENCE { issuer GeneralNames, serialNumber CertificateSerialNumber }
/// ```
///
/// The [4]-tagged directoryName may appear inside GeneralNames (legacy)
/// or directly inside the outer SEQUENCE (V2). Fails with
/// [`XtrustError::MalformedIssuerSerial`] when neither shape matches.
pub fn get_issuer_info(binaries: &[u8]) -> Result<IssuerSerialInfo, XtrustError> {
    let root = asn1::parse(binaries).map_err(into_malformed)?;
    let fields = asn1::children(&root).map_err(into_malformed)?;

    let mut issuer_name = None;
    let mut serial_number = None;

    for field in fields {
        if let Ok(serial) = asn1::integer_bytes(field) {
            serial_number = Some(serial.to_vec());
            continue;
        }
        if let Some((GN_TAG_DIRECTORY_NAME, name_bytes)) = asn1::context_tag(field) {
            // V2 shape: tagged name directly in the outer SEQUENCE
            issuer_name = Some(decode_directory_name(name_bytes)?);
            continue;
        }
        if let Ok(general_names) = asn1::children(field) {
            // legacy shape: GeneralNames wrapping the tagged name
            for gn in general_names {
                if let Some((GN_TAG_DIRECTORY_NAME, name_bytes)) = asn1::context_tag(gn) {
                    issuer_name = Some(decode_directory_name(name_bytes)?);
                }
            }
        }
    }

    match (issuer_name, serial_number) {
        (Some(issuer_name), Some(serial_number)) => Ok(IssuerSerialInfo {
            issuer_name,
            serial_number,
        }),
        (None, _) => Err(XtrustError::MalformedIssuerSerial(
            "no directoryName issuer found".into(),
        )),
        (_, None) => Err(XtrustError::MalformedIssuerSerial(
            "no serial number found".into(),
        )),
    }
}

/// Decode the Name structure wrapped by a [4] directoryName tag.
fn decode_directory_name(name_bytes: &[u8]) -> Result<DistinguishedName, XtrustError> {
    let (_, name) = X509Name::from_der(name_bytes)
        .map_err(|e| XtrustError::MalformedIssuerSerial(format!("invalid issuer name: {}", e)))?;
    Ok(build_dn(&name))
}

fn into_malformed(err: XtrustError) -> XtrustError {
    XtrustError::MalformedIssuerSerial(err.to_string())
}
