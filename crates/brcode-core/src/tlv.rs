//! Tag-length-value fields.
//!
//! A field is serialized as `tag ++ len ++ value` where `tag` is two ASCII
//! digits and `len` is the byte length of `value`, zero-padded to two digits.
//! Values are therefore limited to [`MAX_VALUE_LEN`] bytes.

use crate::error::{BrCodeError, Result};

/// Largest value length expressible by the two-digit length prefix.
pub const MAX_VALUE_LEN: usize = 99;

/// Bytes taken by `tag ++ len`.
pub const HEADER_LEN: usize = 4;

/// A field borrowed from a serialized payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field<'a> {
    /// Two-digit tag.
    pub tag: &'a str,
    /// Raw value.
    pub value: &'a str,
    /// Byte offset of the tag inside the walked text.
    pub offset: usize,
}

impl<'a> Field<'a> {
    /// Parse this field's value as a nested TLV sequence.
    pub fn nested(&self) -> Result<Vec<Field<'a>>> {
        TlvReader::new(self.value)
            .map(|f| {
                f.map_err(|e| match e {
                    BrCodeError::Malformed { offset, reason } => BrCodeError::Malformed {
                        offset: self.offset + HEADER_LEN + offset,
                        reason,
                    },
                    other => other,
                })
            })
            .collect()
    }
}

fn check_tag(tag: &str) -> Result<()> {
    if tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(BrCodeError::InvalidTag(tag.to_string()))
    }
}

/// Append one encoded field to `out`.
pub fn write_field(out: &mut String, tag: &str, value: &str) -> Result<()> {
    check_tag(tag)?;
    if value.len() > MAX_VALUE_LEN {
        return Err(BrCodeError::FieldTooLong {
            tag: tag.to_string(),
            len: value.len(),
            max: MAX_VALUE_LEN,
        });
    }
    out.reserve(HEADER_LEN + value.len());
    out.push_str(tag);
    out.push_str(&format!("{:02}", value.len()));
    out.push_str(value);
    Ok(())
}

/// Encode a single field as `tag ++ len ++ value`.
pub fn encode_field(tag: &str, value: &str) -> Result<String> {
    let mut out = String::with_capacity(HEADER_LEN + value.len());
    write_field(&mut out, tag, value)?;
    Ok(out)
}

/// Iterator over the fields of a TLV string.
///
/// Yields an error and then stops as soon as the structure is broken.
pub struct TlvReader<'a> {
    text: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> TlvReader<'a> {
    /// Start walking `text` from its first byte.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            failed: false,
        }
    }

    fn malformed(&mut self, reason: impl Into<String>) -> Option<Result<Field<'a>>> {
        self.failed = true;
        Some(Err(BrCodeError::Malformed {
            offset: self.pos,
            reason: reason.into(),
        }))
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = Result<Field<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.text.len() {
            return None;
        }
        let bytes = self.text.as_bytes();
        let rest = bytes.len() - self.pos;
        if rest < HEADER_LEN {
            return self.malformed(format!("{rest} trailing bytes, need a 4-byte header"));
        }
        let header = &bytes[self.pos..self.pos + HEADER_LEN];
        if !header.iter().all(|b| b.is_ascii_digit()) {
            return self.malformed("tag and length must be ASCII digits");
        }
        let len = usize::from(header[2] - b'0') * 10 + usize::from(header[3] - b'0');
        let start = self.pos + HEADER_LEN;
        let end = start + len;
        let value = match self.text.get(start..end) {
            Some(v) => v,
            None => {
                return self.malformed(format!(
                    "value of {len} bytes runs past the end of the text"
                ))
            }
        };
        let field = Field {
            tag: &self.text[self.pos..self.pos + 2],
            value,
            offset: self.pos,
        };
        self.pos = end;
        Some(Ok(field))
    }
}

/// Walk `text` into its top-level fields.
pub fn parse_fields(text: &str) -> Result<Vec<Field<'_>>> {
    TlvReader::new(text).collect()
}
