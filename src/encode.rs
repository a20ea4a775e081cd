//! The binary encoder.
//!
//! Encoding is a recursive descent over a [`Value`] emitting definite-length
//! items only: integers take the smallest sufficient header argument, floats
//! are always written in the 64-bit encoding, and objects emit their entries
//! in whichever order the object holds — sorted objects in key order,
//! insertion-ordered objects verbatim, duplicates included.
//!
//! Encoding a well-formed [`Value`] is total. The streaming [`Encoder`]
//! additionally offers closure-scoped array/map builders that enforce the
//! declared arity; only builder misuse can fail.

use crate::convert::Convert;
use crate::wire::{MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NINT, MAJOR_TEXT, MAJOR_UINT};
use crate::{Error, ErrorCode, Value};

/// Encodes any contract-bearing value to wire bytes.
///
/// The value is converted through its [`Convert`] contract first; use
/// [`encode_value`] to avoid the intermediate tree when you already hold a
/// [`Value`].
#[must_use]
pub fn encode<T: Convert>(value: &T) -> Vec<u8> {
    encode_value(&value.encode())
}

/// Encodes a [`Value`] tree to wire bytes.
#[must_use]
pub fn encode_value(value: &Value) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.value(value);
    enc.into_vec()
}

fn write_major_uint(buf: &mut Vec<u8>, major: u8, value: u64) {
    debug_assert!(major <= 7);
    if let Ok(v8) = u8::try_from(value) {
        if v8 < 24 {
            buf.push((major << 5) | v8);
            return;
        }
        buf.push((major << 5) | 24);
        buf.push(v8);
        return;
    }
    if let Ok(v16) = u16::try_from(value) {
        buf.push((major << 5) | 25);
        buf.extend_from_slice(&v16.to_be_bytes());
        return;
    }
    if let Ok(v32) = u32::try_from(value) {
        buf.push((major << 5) | 26);
        buf.extend_from_slice(&v32.to_be_bytes());
        return;
    }
    buf.push((major << 5) | 27);
    buf.extend_from_slice(&value.to_be_bytes());
}

fn write_text(buf: &mut Vec<u8>, s: &str) {
    let b = s.as_bytes();
    write_major_uint(buf, MAJOR_TEXT, b.len() as u64);
    buf.extend_from_slice(b);
}

fn write_bytes(buf: &mut Vec<u8>, b: &[u8]) {
    write_major_uint(buf, MAJOR_BYTES, b.len() as u64);
    buf.extend_from_slice(b);
}

fn write_int(buf: &mut Vec<u8>, v: i64) {
    if v >= 0 {
        write_major_uint(buf, MAJOR_UINT, v as u64);
    } else {
        // Wire representation of a negative integer is -(1 + n).
        write_major_uint(buf, MAJOR_NINT, (-1 - v) as u64);
    }
}

fn write_float(buf: &mut Vec<u8>, v: f64) {
    buf.push(0xfb);
    buf.extend_from_slice(&v.to_bits().to_be_bytes());
}

/// Streaming encoder writing wire bytes directly into a `Vec<u8>`.
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Creates a new encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates an encoder with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// The number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no bytes have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrows the bytes emitted so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the encoder and returns the encoded bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Encodes null.
    pub fn null(&mut self) {
        self.buf.push(0xf6);
    }

    /// Encodes a boolean.
    pub fn bool(&mut self, v: bool) {
        self.buf.push(if v { 0xf5 } else { 0xf4 });
    }

    /// Encodes a signed integer.
    pub fn int(&mut self, v: i64) {
        write_int(&mut self.buf, v);
    }

    /// Encodes an unsigned integer.
    pub fn uint(&mut self, v: u64) {
        write_major_uint(&mut self.buf, MAJOR_UINT, v);
    }

    /// Encodes a float in the 64-bit encoding.
    pub fn float(&mut self, v: f64) {
        write_float(&mut self.buf, v);
    }

    /// Encodes a text string.
    pub fn text(&mut self, s: &str) {
        write_text(&mut self.buf, s);
    }

    /// Encodes a byte string.
    pub fn bytes(&mut self, b: &[u8]) {
        write_bytes(&mut self.buf, b);
    }

    /// Encodes a full [`Value`] tree.
    pub fn value(&mut self, v: &Value) {
        match v {
            Value::Null => self.null(),
            Value::Bool(b) => self.bool(*b),
            Value::Int(i) => self.int(*i),
            Value::UInt(u) => self.uint(*u),
            Value::Float(f) => self.float(*f),
            Value::Text(s) => self.text(s),
            Value::Bytes(b) => self.bytes(b),
            Value::Array(items) => {
                write_major_uint(&mut self.buf, MAJOR_ARRAY, items.len() as u64);
                for item in items {
                    self.value(item);
                }
            }
            Value::Object(obj) => {
                write_major_uint(&mut self.buf, MAJOR_MAP, obj.len() as u64);
                for (k, item) in obj.iter() {
                    self.text(k);
                    self.value(item);
                }
            }
        }
    }

    /// Encodes any contract-bearing value.
    pub fn convert<T: Convert>(&mut self, v: &T) {
        self.value(&v.encode());
    }

    /// Encodes a definite-length array and fills it via the builder.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorCode::LengthMismatch`] if the builder emits a
    /// different number of items than declared; the buffer is restored to its
    /// state before the call.
    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ArrayEncoder<'_>) -> Result<(), Error>,
    {
        let start = self.buf.len();
        write_major_uint(&mut self.buf, MAJOR_ARRAY, len as u64);
        let mut a = ArrayEncoder {
            enc: self,
            remaining: len,
        };
        let remaining = match f(&mut a) {
            Ok(()) => a.remaining,
            Err(err) => {
                self.buf.truncate(start);
                return Err(err);
            }
        };
        if remaining != 0 {
            let err = Error::new(ErrorCode::LengthMismatch, self.buf.len());
            self.buf.truncate(start);
            return Err(err);
        }
        Ok(())
    }

    /// Encodes a definite-length map and fills it via the builder.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorCode::LengthMismatch`] if the builder emits a
    /// different number of entries than declared; the buffer is restored to
    /// its state before the call.
    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut MapEncoder<'_>) -> Result<(), Error>,
    {
        let start = self.buf.len();
        write_major_uint(&mut self.buf, MAJOR_MAP, len as u64);
        let mut m = MapEncoder {
            enc: self,
            remaining: len,
        };
        let remaining = match f(&mut m) {
            Ok(()) => m.remaining,
            Err(err) => {
                self.buf.truncate(start);
                return Err(err);
            }
        };
        if remaining != 0 {
            let err = Error::new(ErrorCode::LengthMismatch, self.buf.len());
            self.buf.truncate(start);
            return Err(err);
        }
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for writing array elements into the stream.
pub struct ArrayEncoder<'a> {
    enc: &'a mut Encoder,
    remaining: usize,
}

impl ArrayEncoder<'_> {
    fn consume_one(&mut self) -> Result<(), Error> {
        if self.remaining == 0 {
            return Err(Error::new(ErrorCode::LengthMismatch, self.enc.len()));
        }
        self.remaining -= 1;
        Ok(())
    }

    /// Encodes null as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded.
    pub fn null(&mut self) -> Result<(), Error> {
        self.consume_one()?;
        self.enc.null();
        Ok(())
    }

    /// Encodes a boolean as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded.
    pub fn bool(&mut self, v: bool) -> Result<(), Error> {
        self.consume_one()?;
        self.enc.bool(v);
        Ok(())
    }

    /// Encodes a signed integer as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded.
    pub fn int(&mut self, v: i64) -> Result<(), Error> {
        self.consume_one()?;
        self.enc.int(v);
        Ok(())
    }

    /// Encodes an unsigned integer as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded.
    pub fn uint(&mut self, v: u64) -> Result<(), Error> {
        self.consume_one()?;
        self.enc.uint(v);
        Ok(())
    }

    /// Encodes a float as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded.
    pub fn float(&mut self, v: f64) -> Result<(), Error> {
        self.consume_one()?;
        self.enc.float(v);
        Ok(())
    }

    /// Encodes a text string as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded.
    pub fn text(&mut self, s: &str) -> Result<(), Error> {
        self.consume_one()?;
        self.enc.text(s);
        Ok(())
    }

    /// Encodes a byte string as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded.
    pub fn bytes(&mut self, b: &[u8]) -> Result<(), Error> {
        self.consume_one()?;
        self.enc.bytes(b);
        Ok(())
    }

    /// Encodes a [`Value`] tree as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded.
    pub fn value(&mut self, v: &Value) -> Result<(), Error> {
        self.consume_one()?;
        self.enc.value(v);
        Ok(())
    }

    /// Encodes any contract-bearing value as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded.
    pub fn convert<T: Convert>(&mut self, v: &T) -> Result<(), Error> {
        self.consume_one()?;
        self.enc.convert(v);
        Ok(())
    }

    /// Encodes a nested array as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded or the nested builder
    /// misbehaves.
    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ArrayEncoder<'_>) -> Result<(), Error>,
    {
        self.consume_one()?;
        self.enc.array(len, f)
    }

    /// Encodes a nested map as the next element.
    ///
    /// # Errors
    ///
    /// Fails if the declared array length is exceeded or the nested builder
    /// misbehaves.
    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut MapEncoder<'_>) -> Result<(), Error>,
    {
        self.consume_one()?;
        self.enc.map(len, f)
    }
}

/// Builder for writing map entries into the stream.
pub struct MapEncoder<'a> {
    enc: &'a mut Encoder,
    remaining: usize,
}

impl MapEncoder<'_> {
    /// Encodes one `key, value` entry; the value is written by the closure.
    ///
    /// Entries are emitted in call order; the builder does not sort or
    /// deduplicate.
    ///
    /// # Errors
    ///
    /// Fails if the declared map length is exceeded, or propagates the value
    /// closure's error.
    pub fn entry<F>(&mut self, key: &str, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Encoder) -> Result<(), Error>,
    {
        if self.remaining == 0 {
            return Err(Error::new(ErrorCode::LengthMismatch, self.enc.len()));
        }
        self.remaining -= 1;
        self.enc.text(key);
        f(self.enc)
    }

    /// Encodes one entry whose value is a [`Value`] tree.
    ///
    /// # Errors
    ///
    /// Fails if the declared map length is exceeded.
    pub fn field(&mut self, key: &str, v: &Value) -> Result<(), Error> {
        self.entry(key, |enc| {
            enc.value(v);
            Ok(())
        })
    }
}
