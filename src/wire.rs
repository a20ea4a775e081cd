//! Byte-level primitives shared by the decoder and the view navigator.
//!
//! Nothing here interprets document semantics; these helpers read header
//! bytes, length arguments, and compute the byte span of a single encoded
//! item (the *skip* primitive).

use crate::{Error, ErrorCode};

/// Major types of the wire format.
pub(crate) const MAJOR_UINT: u8 = 0;
pub(crate) const MAJOR_NINT: u8 = 1;
pub(crate) const MAJOR_BYTES: u8 = 2;
pub(crate) const MAJOR_TEXT: u8 = 3;
pub(crate) const MAJOR_ARRAY: u8 = 4;
pub(crate) const MAJOR_MAP: u8 = 5;
pub(crate) const MAJOR_TAG: u8 = 6;

/// Additional-info value signalling an indefinite length.
pub(crate) const AI_INDEFINITE: u8 = 31;

/// The lone break byte terminating indefinite-length items.
pub(crate) const BREAK: u8 = 0xff;

pub(crate) fn read_u8(data: &[u8], pos: &mut usize) -> Result<u8, Error> {
    let off = *pos;
    let b = *data
        .get(*pos)
        .ok_or_else(|| Error::new(ErrorCode::UnexpectedEof, off))?;
    *pos += 1;
    Ok(b)
}

pub(crate) fn peek_u8(data: &[u8], pos: usize) -> Result<u8, Error> {
    data.get(pos)
        .copied()
        .ok_or_else(|| Error::new(ErrorCode::UnexpectedEof, pos))
}

pub(crate) fn read_exact<'a>(
    data: &'a [u8],
    pos: &mut usize,
    n: usize,
) -> Result<&'a [u8], Error> {
    let off = *pos;
    let end = pos
        .checked_add(n)
        .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, off))?;
    if end > data.len() {
        return Err(Error::new(ErrorCode::UnexpectedEof, off));
    }
    let s = &data[*pos..end];
    *pos = end;
    Ok(s)
}

pub(crate) fn read_be_u16(data: &[u8], pos: &mut usize) -> Result<u16, Error> {
    let s = read_exact(data, pos, 2)?;
    Ok(u16::from_be_bytes([s[0], s[1]]))
}

pub(crate) fn read_be_u32(data: &[u8], pos: &mut usize) -> Result<u32, Error> {
    let s = read_exact(data, pos, 4)?;
    Ok(u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
}

pub(crate) fn read_be_u64(data: &[u8], pos: &mut usize) -> Result<u64, Error> {
    let s = read_exact(data, pos, 8)?;
    Ok(u64::from_be_bytes([
        s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7],
    ]))
}

/// Reads the unsigned argument selected by the additional-info field.
///
/// `ai` 0–23 is the literal value; 24/25/26/27 select 1/2/4/8 following
/// big-endian bytes. 28–31 are rejected — callers peel off the indefinite
/// marker before calling this.
pub(crate) fn read_uint(data: &[u8], pos: &mut usize, ai: u8, off: usize) -> Result<u64, Error> {
    match ai {
        0..=23 => Ok(u64::from(ai)),
        24 => Ok(u64::from(read_u8(data, pos)?)),
        25 => Ok(u64::from(read_be_u16(data, pos)?)),
        26 => Ok(u64::from(read_be_u32(data, pos)?)),
        27 => Ok(read_be_u64(data, pos)?),
        _ => Err(Error::new(ErrorCode::ReservedAdditionalInfo, off)),
    }
}

/// Reads a length argument; `None` signals an indefinite-length item.
pub(crate) fn read_len(
    data: &[u8],
    pos: &mut usize,
    ai: u8,
    off: usize,
) -> Result<Option<usize>, Error> {
    if ai == AI_INDEFINITE {
        return Ok(None);
    }
    let len = read_uint(data, pos, ai, off)?;
    Ok(Some(len_to_usize(len, off)?))
}

pub(crate) fn len_to_usize(len: u64, off: usize) -> Result<usize, Error> {
    usize::try_from(len).map_err(|_| Error::new(ErrorCode::LengthOverflow, off))
}

/// One nesting frame of the skip scan.
enum Pending {
    /// This many items remain in a definite-length container.
    Items(usize),
    /// Items continue until a break marker.
    UntilBreak,
}

/// Computes the end offset of the single encoded item starting at `start`.
///
/// The scan reads headers and string payloads' lengths only; container
/// contents are traversed with an explicit stack, so arbitrarily deep input
/// cannot overflow the call stack. Indefinite-length strings, arrays, and
/// maps are tracked through their break markers.
///
/// Malformed input fails with the same error taxonomy as the eager decoder,
/// at the offset where the defect was detected.
pub(crate) fn skip_item(data: &[u8], start: usize) -> Result<usize, Error> {
    let mut pos = start;
    let mut stack: Vec<Pending> = vec![Pending::Items(1)];

    while let Some(top) = stack.last_mut() {
        match top {
            Pending::Items(0) => {
                stack.pop();
                continue;
            }
            Pending::Items(n) => *n -= 1,
            Pending::UntilBreak => {
                if peek_u8(data, pos)? == BREAK {
                    pos += 1;
                    stack.pop();
                    continue;
                }
            }
        }

        let off = pos;
        let ib = read_u8(data, &mut pos)?;
        let major = ib >> 5;
        let ai = ib & 0x1f;

        match major {
            MAJOR_UINT | MAJOR_NINT => {
                let _ = read_uint(data, &mut pos, ai, off)?;
            }
            MAJOR_BYTES | MAJOR_TEXT => match read_len(data, &mut pos, ai, off)? {
                Some(len) => {
                    let _ = read_exact(data, &mut pos, len)?;
                }
                None => skip_string_chunks(data, &mut pos, major)?,
            },
            MAJOR_ARRAY => match read_len(data, &mut pos, ai, off)? {
                Some(len) => stack.push(Pending::Items(len)),
                None => stack.push(Pending::UntilBreak),
            },
            MAJOR_MAP => match read_len(data, &mut pos, ai, off)? {
                Some(len) => {
                    let items = len
                        .checked_mul(2)
                        .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, off))?;
                    stack.push(Pending::Items(items));
                }
                None => stack.push(Pending::UntilBreak),
            },
            MAJOR_TAG => return Err(Error::new(ErrorCode::UnsupportedTag, off)),
            _ => skip_simple(data, &mut pos, ai, off)?,
        }
    }

    Ok(pos)
}

/// Consumes the chunks of an indefinite-length string up to its break marker.
///
/// Every chunk must be a definite-length string of the same major type.
pub(crate) fn skip_string_chunks(data: &[u8], pos: &mut usize, major: u8) -> Result<(), Error> {
    loop {
        let off = *pos;
        let ib = read_u8(data, pos)?;
        if ib == BREAK {
            return Ok(());
        }
        if ib >> 5 != major {
            return Err(Error::new(ErrorCode::InvalidChunk, off));
        }
        let ai = ib & 0x1f;
        let Some(len) = read_len(data, pos, ai, off)? else {
            return Err(Error::new(ErrorCode::InvalidChunk, off));
        };
        let _ = read_exact(data, pos, len)?;
    }
}

fn skip_simple(data: &[u8], pos: &mut usize, ai: u8, off: usize) -> Result<(), Error> {
    match ai {
        20..=23 => Ok(()),
        25 => read_be_u16(data, pos).map(|_| ()),
        26 => read_be_u32(data, pos).map(|_| ()),
        27 => read_be_u64(data, pos).map(|_| ()),
        0..=19 | 24 => Err(Error::new(ErrorCode::UnsupportedSimpleValue, off)),
        31 => Err(Error::new(ErrorCode::UnexpectedBreak, off)),
        _ => Err(Error::new(ErrorCode::ReservedAdditionalInfo, off)),
    }
}
