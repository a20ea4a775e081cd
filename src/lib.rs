//! # bindoc
//!
//! An extensible document-value library: a dynamically-typed JSON-like
//! [`Value`] model, a compile-time conversion contract letting arbitrary
//! external types map onto that model, and a compact CBOR wire codec that can
//! both materialize full value trees and navigate encoded bytes lazily.
//!
//! ## Design principles
//!
//! - **One model, two object policies.**
//!   [`Object`] carries its key-ordering policy ([`KeyOrder`]): sorted with
//!   unique keys, or insertion-ordered with duplicates retained. Everything
//!   downstream — equality, encoding, decoding — respects the active policy.
//! - **Extensibility is static.**
//!   The [`Convert`] contract (`is` / `decode` / `encode`) is resolved per
//!   type at compile time through generics. There is no runtime registry and
//!   no shared mutable state; conversions from independent call sites are
//!   inherently data-race-free. `#[derive(Convert)]` derives the contract
//!   mechanically from a struct's field list.
//! - **Navigation without materialization.**
//!   A [`View`] answers structural queries — type tests, key and index
//!   lookup, leaf extraction — directly over encoded bytes by skip-scanning,
//!   touching only the sub-items a query passes over. Any view can
//!   [`materialize`](View::materialize) its sub-tree or
//!   [`convert`](View::convert) a leaf on demand.
//!
//! ## Wire format
//!
//! The codec speaks CBOR's core data model: one header byte carrying a 3-bit
//! major type and 5-bit additional info, big-endian length arguments,
//! definite- and indefinite-length strings and containers, and the lone break
//! byte terminating indefinite forms. The encoder emits definite-length items
//! only, with smallest-width headers; the decoder and views accept both
//! forms. Tags (major 6) are outside the data model and rejected.
//!
//! ## Errors
//!
//! All failures are explicit [`Error`] values classified by [`ErrorKind`]:
//! end-of-input, invalid encoding, type mismatch, or conversion failure.
//! Absent keys and out-of-range indices are *not* errors — lookups return
//! `Ok(None)`, and structural `is` tests return `false` rather than failing.
//!
//! ## Feature flags
//!
//! - `simdutf8`: SIMD-accelerated UTF-8 validation where supported.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod convert;
mod decode;
mod encode;
mod error;
mod float;
mod limits;
mod macros;
mod object;
pub(crate) mod utf8;
mod value;
mod view;
mod wire;

pub use crate::convert::{from_value, to_value, Convert, Element};
pub use crate::decode::{decode, decode_prefix, decode_with};
pub use crate::encode::{encode, encode_value, ArrayEncoder, Encoder, MapEncoder};
pub use crate::error::{Error, ErrorCode, ErrorKind};
pub use crate::limits::{DecodeLimits, DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_DEPTH};
pub use crate::object::{KeyOrder, Object};
pub use crate::value::Value;
pub use crate::view::{view, ArrayIter, ArrayView, Kind, ObjectIter, ObjectView, PathElem, View};

pub use bindoc_derive::Convert;
