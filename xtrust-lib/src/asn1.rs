//! Depth-limited DER decoding and typed accessors.
//!
//! Thin decode-or-fail boundary over `der_parser` (reached through the
//! `x509_parser` re-export): raw bytes go in, a typed [`BerObject`] tree
//! comes out, or the call fails with [`XtrustError::MalformedEncoding`].
//! Callers decide whether a decode failure is fatal or merely means an
//! extension is absent.
//!
//! Nesting depth is capped so a maliciously nested input cannot trigger
//! unbounded recursion.

use crate::XtrustError;
use x509_parser::der_parser::asn1_rs::Class;
use x509_parser::der_parser::ber::{BerObject, BerObjectContent};
use x509_parser::der_parser::der::parse_der_recursive;

/// Maximum ASN.1 nesting depth accepted by [`parse`].
pub const MAX_NESTING_DEPTH: usize = 32;

/// Parse a single DER object from the start of `input`.
///
/// Trailing bytes after the first complete object are ignored, matching
/// how certificates embed independently-encoded substructures.
pub fn parse(input: &[u8]) -> Result<BerObject<'_>, XtrustError> {
    let (_, obj) = parse_der_recursive(input, MAX_NESTING_DEPTH)
        .map_err(|e| XtrustError::MalformedEncoding(format!("{}", e)))?;
    Ok(obj)
}

/// Parse a concatenation of DER objects until `input` is exhausted.
///
/// Needed for implicitly-tagged `SEQUENCE OF` content, where the inner
/// TLVs appear back to back without an enclosing SEQUENCE header.
pub fn parse_all(input: &[u8]) -> Result<Vec<BerObject<'_>>, XtrustError> {
    let mut rest = input;
    let mut out = Vec::new();
    while !rest.is_empty() {
        let (rem, obj) = parse_der_recursive(rest, MAX_NESTING_DEPTH)
            .map_err(|e| XtrustError::MalformedEncoding(format!("{}", e)))?;
        // A parser that consumes nothing would loop forever on the same input.
        if rem.len() == rest.len() {
            return Err(XtrustError::MalformedEncoding(
                "zero-length DER object".into(),
            ));
        }
        out.push(obj);
        rest = rem;
    }
    Ok(out)
}

/// Read the tag, content length and header length of the TLV at the start
/// of `input`, without decoding the content.
///
/// Used where the raw encoding of individual fields is needed (e.g. to
/// digest a substructure exactly as it appears on the wire).
pub fn read_header(input: &[u8]) -> Result<(u8, usize, usize), XtrustError> {
    let tag = *input
        .first()
        .ok_or_else(|| XtrustError::MalformedEncoding("empty input".into()))?;
    let first_len = *input
        .get(1)
        .ok_or_else(|| XtrustError::MalformedEncoding("truncated length".into()))?;
    if first_len & 0x80 == 0 {
        return Ok((tag, first_len as usize, 2));
    }
    let num_bytes = (first_len & 0x7f) as usize;
    if num_bytes == 0 || num_bytes > 4 {
        return Err(XtrustError::MalformedEncoding(format!(
            "unsupported DER length encoding ({} length bytes)",
            num_bytes
        )));
    }
    let len_bytes = input
        .get(2..2 + num_bytes)
        .ok_or_else(|| XtrustError::MalformedEncoding("truncated length".into()))?;
    let mut len: usize = 0;
    for b in len_bytes {
        len = (len << 8) | *b as usize;
    }
    Ok((tag, len, 2 + num_bytes))
}

/// Interpret an object as a SEQUENCE or SET and return its children.
pub fn children<'a, 'b>(obj: &'b BerObject<'a>) -> Result<&'b [BerObject<'a>], XtrustError> {
    match &obj.content {
        BerObjectContent::Sequence(items) | BerObjectContent::Set(items) => Ok(items),
        _ => Err(XtrustError::MalformedEncoding(format!(
            "expected SEQUENCE, found {:?}",
            obj.header.tag()
        ))),
    }
}

/// Interpret an object as an OBJECT IDENTIFIER, returned in dotted form.
pub fn oid_string(obj: &BerObject) -> Result<String, XtrustError> {
    let oid = obj
        .as_oid()
        .map_err(|e| XtrustError::MalformedEncoding(format!("expected OID: {}", e)))?;
    Ok(oid.to_id_string())
}

/// Interpret an object as an OCTET STRING and return its content.
pub fn octet_string<'a>(obj: &BerObject<'a>) -> Result<&'a [u8], XtrustError> {
    match obj.content {
        BerObjectContent::OctetString(data) => Ok(data),
        _ => Err(XtrustError::MalformedEncoding(format!(
            "expected OCTET STRING, found {:?}",
            obj.header.tag()
        ))),
    }
}

/// Interpret an object as an INTEGER and return its big-endian content
/// bytes with any leading zero padding stripped (at least one byte kept).
pub fn integer_bytes<'a>(obj: &BerObject<'a>) -> Result<&'a [u8], XtrustError> {
    match obj.content {
        BerObjectContent::Integer(data) => {
            let stripped = match data.iter().position(|&b| b != 0) {
                Some(pos) => data.get(pos..).unwrap_or(data),
                None => data.get(data.len().saturating_sub(1)..).unwrap_or(data),
            };
            Ok(stripped)
        }
        _ => Err(XtrustError::MalformedEncoding(format!(
            "expected INTEGER, found {:?}",
            obj.header.tag()
        ))),
    }
}

/// Interpret an object as a character string.
///
/// Accepts the string types that appear in certificate extensions:
/// IA5String, UTF8String, PrintableString, VisibleString and BMPString
/// (UTF-16-BE, used by user-notice policy qualifiers).
pub fn text_string(obj: &BerObject) -> Result<String, XtrustError> {
    match &obj.content {
        BerObjectContent::IA5String(s)
        | BerObjectContent::UTF8String(s)
        | BerObjectContent::PrintableString(s)
        | BerObjectContent::VisibleString(s) => Ok((*s).to_string()),
        BerObjectContent::BmpString(raw) => decode_utf16_be(raw.as_bytes()),
        _ => Err(XtrustError::MalformedEncoding(format!(
            "expected character string, found {:?}",
            obj.header.tag()
        ))),
    }
}

/// If `obj` is a context-specific tagged field, return its tag number and
/// raw content bytes.
///
/// Context-specific fields come out of the generic parser as opaque
/// objects; the caller re-parses the content when the tag is constructed.
pub fn context_tag<'a>(obj: &BerObject<'a>) -> Option<(u32, &'a [u8])> {
    if obj.header.class() != Class::ContextSpecific {
        return None;
    }
    let tag = obj.header.tag().0;
    match obj.as_slice() {
        Ok(data) => Some((tag, data)),
        Err(_) => None,
    }
}

/// Decode UTF-16-BE bytes (BMPString content) into a `String`.
fn decode_utf16_be(raw: &[u8]) -> Result<String, XtrustError> {
    if raw.len() % 2 != 0 {
        return Err(XtrustError::MalformedEncoding(
            "BMPString with odd byte length".into(),
        ));
    }
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes(pair.try_into().unwrap_or([0, 0])))
        .collect();
    String::from_utf16(&units)
        .map_err(|_| XtrustError::MalformedEncoding("invalid UTF-16 in BMPString".into()))
}
