//! The eager binary decoder.
//!
//! Parses a byte buffer into a fully materialized [`Value`] tree. Both
//! definite- and indefinite-length items are accepted; indefinite strings are
//! concatenated from their chunks, indefinite containers accumulate items
//! until the break marker. Resource consumption is bounded by
//! [`DecodeLimits`].

use crate::float::{f16_bits_to_f64, f32_bits_to_f64};
use crate::wire::{
    self, AI_INDEFINITE, BREAK, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NINT, MAJOR_TAG,
    MAJOR_TEXT, MAJOR_UINT,
};
use crate::{DecodeLimits, Error, ErrorCode, KeyOrder, Object, Value};

/// Decodes a buffer holding exactly one encoded item into a [`Value`].
///
/// Objects are materialized with the [`KeyOrder::Sorted`] policy and default
/// limits; use [`decode_with`] to choose otherwise. Trailing bytes after the
/// single item are an error.
///
/// # Errors
///
/// Returns an end-of-input or invalid-encoding error for malformed input,
/// and [`ErrorCode::TrailingBytes`] if the buffer extends past the item.
pub fn decode(bytes: &[u8]) -> Result<Value, Error> {
    decode_with(bytes, KeyOrder::Sorted, DecodeLimits::default())
}

/// Decodes a buffer holding exactly one encoded item, with an explicit
/// object-ordering policy and limits.
///
/// # Errors
///
/// As [`decode`].
pub fn decode_with(bytes: &[u8], order: KeyOrder, limits: DecodeLimits) -> Result<Value, Error> {
    let (value, consumed) = decode_prefix(bytes, 0, order, limits)?;
    if consumed != bytes.len() {
        return Err(Error::new(ErrorCode::TrailingBytes, consumed));
    }
    Ok(value)
}

/// Decodes the single encoded item starting at `pos` and returns it together
/// with the number of bytes consumed.
///
/// Bytes after the item are left untouched; this is the entry point view
/// materialization uses.
///
/// # Errors
///
/// Returns an end-of-input or invalid-encoding error for malformed input.
pub fn decode_prefix(
    bytes: &[u8],
    pos: usize,
    order: KeyOrder,
    limits: DecodeLimits,
) -> Result<(Value, usize), Error> {
    let mut parser = Parser {
        data: bytes,
        pos,
        order,
        limits,
        items_seen: 0,
    };
    let value = parser.parse_value(0)?;
    Ok((value, parser.pos - pos))
}

struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
    order: KeyOrder,
    limits: DecodeLimits,
    items_seen: usize,
}

impl Parser<'_> {
    fn read_header(&mut self) -> Result<(u8, u8, usize), Error> {
        let off = self.pos;
        let ib = wire::read_u8(self.data, &mut self.pos)?;
        Ok((ib >> 5, ib & 0x1f, off))
    }

    fn bump_items(&mut self, add: usize, off: usize) -> Result<(), Error> {
        self.items_seen = self
            .items_seen
            .checked_add(add)
            .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, off))?;
        if self.items_seen > self.limits.max_total_items {
            return Err(Error::new(ErrorCode::TotalItemsLimitExceeded, off));
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize, off: usize) -> Result<(), Error> {
        if depth >= self.limits.max_depth {
            return Err(Error::new(ErrorCode::DepthLimitExceeded, off));
        }
        Ok(())
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, Error> {
        let (major, ai, off) = self.read_header()?;
        match major {
            MAJOR_UINT => {
                let v = wire::read_uint(self.data, &mut self.pos, ai, off)?;
                Ok(Value::UInt(v))
            }
            MAJOR_NINT => {
                let n = wire::read_uint(self.data, &mut self.pos, ai, off)?;
                let n = i64::try_from(n)
                    .map_err(|_| Error::new(ErrorCode::IntegerOutOfRange, off))?;
                Ok(Value::Int(-1 - n))
            }
            MAJOR_BYTES => self.parse_bytes(ai, off).map(Value::Bytes),
            MAJOR_TEXT => self.parse_text(ai, off).map(Value::Text),
            MAJOR_ARRAY => self.parse_array(ai, off, depth),
            MAJOR_MAP => self.parse_object(ai, off, depth),
            MAJOR_TAG => Err(Error::new(ErrorCode::UnsupportedTag, off)),
            _ => self.parse_simple(ai, off),
        }
    }

    fn parse_bytes(&mut self, ai: u8, off: usize) -> Result<Vec<u8>, Error> {
        match wire::read_len(self.data, &mut self.pos, ai, off)? {
            Some(len) => {
                self.limits.check_bytes_len(len, off)?;
                Ok(wire::read_exact(self.data, &mut self.pos, len)?.to_vec())
            }
            None => {
                let mut out = Vec::new();
                self.for_each_chunk(MAJOR_BYTES, |limits, total, chunk_off| {
                    limits.check_bytes_len(total, chunk_off)
                }, |chunk, _| {
                    out.extend_from_slice(chunk);
                    Ok(())
                })?;
                Ok(out)
            }
        }
    }

    fn parse_text(&mut self, ai: u8, off: usize) -> Result<String, Error> {
        match wire::read_len(self.data, &mut self.pos, ai, off)? {
            Some(len) => {
                self.limits.check_text_len(len, off)?;
                let raw = wire::read_exact(self.data, &mut self.pos, len)?;
                let s = crate::utf8::validate(raw)
                    .ok_or_else(|| Error::new(ErrorCode::InvalidUtf8, off))?;
                Ok(s.to_owned())
            }
            None => {
                let mut out = String::new();
                self.for_each_chunk(MAJOR_TEXT, |limits, total, chunk_off| {
                    limits.check_text_len(total, chunk_off)
                }, |chunk, chunk_off| {
                    // Every chunk must itself be well-formed UTF-8.
                    let s = crate::utf8::validate(chunk)
                        .ok_or_else(|| Error::new(ErrorCode::InvalidUtf8, chunk_off))?;
                    out.push_str(s);
                    Ok(())
                })?;
                Ok(out)
            }
        }
    }

    /// Walks the definite chunks of an indefinite-length string, handing each
    /// payload to `consume` after `check` has approved the accumulated size.
    fn for_each_chunk(
        &mut self,
        major: u8,
        check: impl Fn(&DecodeLimits, usize, usize) -> Result<(), Error>,
        mut consume: impl FnMut(&[u8], usize) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let mut total = 0usize;
        loop {
            let off = self.pos;
            let ib = wire::read_u8(self.data, &mut self.pos)?;
            if ib == BREAK {
                return Ok(());
            }
            if ib >> 5 != major {
                return Err(Error::new(ErrorCode::InvalidChunk, off));
            }
            let ai = ib & 0x1f;
            let Some(len) = wire::read_len(self.data, &mut self.pos, ai, off)? else {
                return Err(Error::new(ErrorCode::InvalidChunk, off));
            };
            total = total
                .checked_add(len)
                .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, off))?;
            check(&self.limits, total, off)?;
            let chunk = wire::read_exact(self.data, &mut self.pos, len)?;
            consume(chunk, off)?;
        }
    }

    fn parse_array(&mut self, ai: u8, off: usize, depth: usize) -> Result<Value, Error> {
        self.check_depth(depth, off)?;
        match wire::read_len(self.data, &mut self.pos, ai, off)? {
            Some(len) => {
                self.limits.check_array_len(len, off)?;
                self.bump_items(len, off)?;
                let mut items = Vec::with_capacity(len.min(self.data.len() - self.pos + 1));
                for _ in 0..len {
                    items.push(self.parse_value(depth + 1)?);
                }
                Ok(Value::Array(items))
            }
            None => {
                let mut items = Vec::new();
                while wire::peek_u8(self.data, self.pos)? != BREAK {
                    self.bump_items(1, self.pos)?;
                    self.limits.check_array_len(items.len() + 1, off)?;
                    items.push(self.parse_value(depth + 1)?);
                }
                self.pos += 1;
                Ok(Value::Array(items))
            }
        }
    }

    fn parse_object(&mut self, ai: u8, off: usize, depth: usize) -> Result<Value, Error> {
        self.check_depth(depth, off)?;
        match wire::read_len(self.data, &mut self.pos, ai, off)? {
            Some(len) => {
                self.limits.check_object_len(len, off)?;
                let items = len
                    .checked_mul(2)
                    .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, off))?;
                self.bump_items(items, off)?;
                let mut obj = Object::with_capacity(self.order, len.min(self.data.len()));
                for _ in 0..len {
                    let key = self.parse_key()?;
                    let value = self.parse_value(depth + 1)?;
                    obj.insert(key, value);
                }
                Ok(Value::Object(obj))
            }
            None => {
                let mut obj = Object::new(self.order);
                let mut pairs = 0usize;
                while wire::peek_u8(self.data, self.pos)? != BREAK {
                    pairs += 1;
                    self.limits.check_object_len(pairs, off)?;
                    self.bump_items(2, self.pos)?;
                    let key = self.parse_key()?;
                    let value = self.parse_value(depth + 1)?;
                    obj.insert(key, value);
                }
                self.pos += 1;
                Ok(Value::Object(obj))
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, Error> {
        let (major, ai, off) = self.read_header()?;
        if major != MAJOR_TEXT {
            return Err(Error::new(ErrorCode::InvalidMapKey, off));
        }
        self.parse_text(ai, off)
    }

    fn parse_simple(&mut self, ai: u8, off: usize) -> Result<Value, Error> {
        match ai {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            // 22 is null; 23 (undefined) has no distinct model variant.
            22 | 23 => Ok(Value::Null),
            25 => {
                let bits = wire::read_be_u16(self.data, &mut self.pos)?;
                Ok(Value::Float(f16_bits_to_f64(bits)))
            }
            26 => {
                let bits = wire::read_be_u32(self.data, &mut self.pos)?;
                Ok(Value::Float(f32_bits_to_f64(bits)))
            }
            27 => {
                let bits = wire::read_be_u64(self.data, &mut self.pos)?;
                Ok(Value::Float(f64::from_bits(bits)))
            }
            0..=19 | 24 => Err(Error::new(ErrorCode::UnsupportedSimpleValue, off)),
            AI_INDEFINITE => Err(Error::new(ErrorCode::UnexpectedBreak, off)),
            _ => Err(Error::new(ErrorCode::ReservedAdditionalInfo, off)),
        }
    }
}
