//! # Table Layout
//!
//! ```text
//! +-----------+-----------+-----------+-----+---------+---------+-----+
//! | total u32 | offset[0] | offset[1] | ... | field 0 | field 1 | ... |
//! +-----------+-----------+-----------+-----+---------+---------+-----+
//! ```
//!
//! All integers are little-endian. Each offset is the position of its field
//! measured from the start of the table; the last field ends at `total`.
//! The number of fields is implied by the first offset: `offset[0] / 4 - 1`.

use shared_types::BYTE32_LEN;

use crate::error::CodecError;

/// Width of the length header and of every offset slot.
pub const HEADER_UNIT: usize = 4;

/// Serializes one table field by field.
#[derive(Debug, Default)]
pub struct TableWriter {
    fields: Vec<Vec<u8>>,
}

impl TableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fixed 32-byte field, rejecting any other length.
    pub fn byte32(mut self, field: &'static str, value: &[u8]) -> Result<Self, CodecError> {
        if value.len() != BYTE32_LEN {
            return Err(CodecError::InvalidFieldSize {
                field,
                expected: BYTE32_LEN,
                actual: value.len(),
            });
        }
        self.fields.push(value.to_vec());
        Ok(self)
    }

    /// Append a little-endian `u32` field.
    pub fn uint32(mut self, value: u32) -> Self {
        self.fields.push(value.to_le_bytes().to_vec());
        self
    }

    /// Append a length-prefixed byte string.
    pub fn bytes(mut self, value: &[u8]) -> Result<Self, CodecError> {
        let len = checked_u32(value.len())?;
        let mut field = Vec::with_capacity(HEADER_UNIT + value.len());
        field.extend_from_slice(&len.to_le_bytes());
        field.extend_from_slice(value);
        self.fields.push(field);
        Ok(self)
    }

    /// Append a count-prefixed sequence of already encoded items.
    pub fn vector(mut self, items: Vec<Vec<u8>>) -> Result<Self, CodecError> {
        let count = checked_u32(items.len())?;
        let body: usize = items.iter().map(Vec::len).sum();
        let mut field = Vec::with_capacity(HEADER_UNIT + body);
        field.extend_from_slice(&count.to_le_bytes());
        for item in items {
            field.extend(item);
        }
        self.fields.push(field);
        Ok(self)
    }

    /// Lay out the header and concatenate the fields.
    pub fn finish(self) -> Result<Vec<u8>, CodecError> {
        let header_len = HEADER_UNIT * (1 + self.fields.len());
        let body_len: usize = self.fields.iter().map(Vec::len).sum();
        let total = header_len + body_len;
        let total_u32 = checked_u32(total)?;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&total_u32.to_le_bytes());

        let mut offset = header_len;
        for field in &self.fields {
            out.extend_from_slice(&(offset as u32).to_le_bytes());
            offset += field.len();
        }
        for field in self.fields {
            out.extend(field);
        }
        Ok(out)
    }
}

/// Validated view over an encoded table.
#[derive(Debug)]
pub struct TableReader<'a> {
    data: &'a [u8],
    /// Field start positions followed by the table's total length.
    bounds: Vec<usize>,
}

impl<'a> TableReader<'a> {
    /// Parse and validate a table header.
    ///
    /// With `compatible` set, tables declaring more than `expected` fields are
    /// accepted and the extra trailing fields are ignored. Fewer fields than
    /// expected is always an error.
    pub fn parse(data: &'a [u8], expected: usize, compatible: bool) -> Result<Self, CodecError> {
        let total = read_u32_at(data, 0)
            .ok_or_else(|| CodecError::malformed("truncated length header"))?
            as usize;
        if total != data.len() {
            return Err(CodecError::malformed(format!(
                "declared length {} does not match {} available bytes",
                total,
                data.len()
            )));
        }

        if expected == 0 && total == HEADER_UNIT {
            return Ok(Self {
                data,
                bounds: vec![total],
            });
        }

        let header_len = read_u32_at(data, HEADER_UNIT)
            .ok_or_else(|| CodecError::malformed("truncated offset header"))?
            as usize;
        if header_len % HEADER_UNIT != 0 || header_len < 2 * HEADER_UNIT {
            return Err(CodecError::malformed(format!(
                "first offset {} is not a valid header length",
                header_len
            )));
        }
        if header_len > total {
            return Err(CodecError::malformed(format!(
                "header length {} exceeds table length {}",
                header_len, total
            )));
        }

        let field_count = header_len / HEADER_UNIT - 1;
        if field_count < expected || (field_count > expected && !compatible) {
            return Err(CodecError::malformed(format!(
                "expected {} fields, header declares {}",
                expected, field_count
            )));
        }

        let mut bounds = Vec::with_capacity(field_count + 1);
        let mut previous = header_len;
        for index in 0..field_count {
            // In range: header_len <= total was checked above.
            let offset = read_u32_at(data, HEADER_UNIT * (index + 1))
                .ok_or_else(|| CodecError::malformed("truncated offset header"))?
                as usize;
            if index == 0 && offset != header_len {
                return Err(CodecError::malformed("first offset must end the header"));
            }
            if offset < previous || offset > total {
                return Err(CodecError::malformed(format!(
                    "offset {} of field {} is out of range or non-monotonic",
                    offset, index
                )));
            }
            bounds.push(offset);
            previous = offset;
        }
        bounds.push(total);

        Ok(Self { data, bounds })
    }

    /// Number of fields declared by the header.
    pub fn field_count(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Raw bytes of field `index`.
    pub fn field(&self, index: usize) -> Result<&'a [u8], CodecError> {
        let start = self.bounds.get(index);
        let end = index.checked_add(1).and_then(|next| self.bounds.get(next));
        match (start, end) {
            (Some(&start), Some(&end)) => Ok(&self.data[start..end]),
            _ => Err(CodecError::malformed(format!(
                "field {} requested from a table of {}",
                index,
                self.field_count()
            ))),
        }
    }
}

/// Read a fixed 32-byte field.
pub fn read_byte32(slice: &[u8], field: &'static str) -> Result<[u8; 32], CodecError> {
    slice.try_into().map_err(|_| {
        CodecError::malformed(format!(
            "field `{}` must be {} bytes, got {}",
            field,
            BYTE32_LEN,
            slice.len()
        ))
    })
}

/// Read a little-endian `u32` field that must be exactly four bytes.
pub fn read_uint32(slice: &[u8], field: &'static str) -> Result<u32, CodecError> {
    if slice.len() != HEADER_UNIT {
        return Err(CodecError::malformed(format!(
            "field `{}` must be 4 bytes, got {}",
            field,
            slice.len()
        )));
    }
    read_u32_at(slice, 0).ok_or_else(|| CodecError::malformed("unreachable short u32"))
}

/// Read a length-prefixed byte string that must fill its slice exactly.
pub fn read_bytes(slice: &[u8], field: &'static str) -> Result<Vec<u8>, CodecError> {
    let len = read_u32_at(slice, 0)
        .ok_or_else(|| CodecError::malformed(format!("field `{}` missing length", field)))?
        as usize;
    if HEADER_UNIT.checked_add(len) != Some(slice.len()) {
        return Err(CodecError::malformed(format!(
            "field `{}` declares {} bytes, slice holds {}",
            field,
            len,
            slice.len() - HEADER_UNIT
        )));
    }
    Ok(slice[HEADER_UNIT..].to_vec())
}

/// Split a count-prefixed sequence of fixed-size items.
pub fn read_fixed_vector<'a>(
    slice: &'a [u8],
    item_size: usize,
    field: &'static str,
) -> Result<Vec<&'a [u8]>, CodecError> {
    let count = read_u32_at(slice, 0)
        .ok_or_else(|| CodecError::malformed(format!("field `{}` missing count", field)))?
        as usize;
    let expected = count
        .checked_mul(item_size)
        .and_then(|body| body.checked_add(HEADER_UNIT));
    if expected != Some(slice.len()) {
        return Err(CodecError::malformed(format!(
            "field `{}` declares {} items of {} bytes, slice holds {} bytes",
            field,
            count,
            item_size,
            slice.len()
        )));
    }
    Ok(slice[HEADER_UNIT..].chunks_exact(item_size).collect())
}

fn read_u32_at(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at.checked_add(HEADER_UNIT)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn checked_u32(size: usize) -> Result<u32, CodecError> {
    u32::try_from(size).map_err(|_| CodecError::RecordTooLarge { size })
}
