use crate::error::{GatewayError, Result};

/// Longest value a two-digit length field can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// A single decoded tag/length/value triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    pub tag: String,
    pub value: String,
}

/// Formats one TLV field.
///
/// An empty `value` yields an empty string so optional fields drop out of the
/// payload entirely. Values longer than [`MAX_VALUE_LEN`] are rejected rather
/// than truncated, since truncation would desynchronize the checksum.
pub fn field(tag: &str, value: &str) -> Result<String> {
    if tag.len() != 2 || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GatewayError::InvalidTag(tag.to_string()));
    }
    if value.is_empty() {
        return Ok(String::new());
    }
    if !value.is_ascii() {
        return Err(GatewayError::NonAscii {
            tag: tag.to_string(),
        });
    }
    if value.len() > MAX_VALUE_LEN {
        return Err(GatewayError::ValueTooLong {
            tag: tag.to_string(),
            len: value.len(),
        });
    }
    Ok(format!("{tag}{:02}{value}", value.len()))
}

/// Splits a flat TLV string into its fields, in order.
pub fn decode(data: &str) -> Result<Vec<TlvField>> {
    if !data.is_ascii() {
        return Err(GatewayError::Malformed("payload is not ASCII".to_string()));
    }

    let mut fields = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        if rest.len() < 4 {
            return Err(GatewayError::Malformed(format!(
                "truncated field header {rest:?}"
            )));
        }
        let (tag, tail) = rest.split_at(2);
        let (len, tail) = tail.split_at(2);
        let len: usize = len
            .parse()
            .map_err(|_| GatewayError::Malformed(format!("bad length {len:?} for tag {tag}")))?;
        if tail.len() < len {
            return Err(GatewayError::Malformed(format!(
                "tag {tag} declares {len} characters but only {} remain",
                tail.len()
            )));
        }
        let (value, tail) = tail.split_at(len);
        fields.push(TlvField {
            tag: tag.to_string(),
            value: value.to_string(),
        });
        rest = tail;
    }
    Ok(fields)
}
