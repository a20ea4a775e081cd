//! The type conversion contract.
//!
//! [`Convert`] is the customization point binding an external type to the
//! [`Value`] model: a pure structural membership test, a fallible decode, and
//! a total encode. The association is resolved at compile time through
//! generics — there is no runtime registry and no shared mutable state, so
//! independent call sites convert concurrently without coordination.
//!
//! Implementations for the primitive categories, `Option`, sequences, and
//! string-keyed mappings live here; `#[derive(Convert)]` derives the contract
//! for user structs from their field list.

use std::collections::{BTreeMap, HashMap};

use crate::{Error, ErrorCode, KeyOrder, Object, Value};

/// The three-operation contract binding a type to the [`Value`] model.
///
/// - [`is`](Convert::is) must be a pure, side-effect-free structural
///   predicate; it never fails.
/// - [`decode`](Convert::decode) may fail when structurally plausible input
///   still cannot be interpreted; field-scoped failures should carry the
///   field name (see [`Error::in_field`]).
/// - [`encode`](Convert::encode) is total over valid instances.
pub trait Convert: Sized {
    /// Structural membership test: could `value` decode as `Self`?
    fn is(value: &Value) -> bool;

    /// Decodes `value` into `Self`.
    ///
    /// # Errors
    ///
    /// Returns a type-mismatch error when the stored variant cannot satisfy
    /// `Self`, or a conversion error when a structurally plausible value is
    /// still uninterpretable.
    fn decode(value: &Value) -> Result<Self, Error>;

    /// Encodes `self` as a [`Value`].
    fn encode(&self) -> Value;
}

/// Marker trait for types that convert as array elements.
///
/// This gates the blanket `Vec<T>` conversion so that `Vec<u8>` can map to
/// [`Value::Bytes`] without overlapping impls; `u8` deliberately does not
/// implement it.
pub trait Element {}

/// Encodes any contract-bearing value as a [`Value`].
pub fn to_value<T: Convert>(value: &T) -> Value {
    value.encode()
}

/// Decodes a [`Value`] into any contract-bearing type.
///
/// # Errors
///
/// Propagates the contract's decode error.
pub fn from_value<T: Convert>(value: &Value) -> Result<T, Error> {
    T::decode(value)
}

impl Value {
    /// Structural test against `T`'s conversion contract.
    ///
    /// Never fails; returns `false` for any value `T` would reject.
    #[must_use]
    pub fn is<T: Convert>(&self) -> bool {
        T::is(self)
    }

    /// Typed extraction through `T`'s conversion contract.
    ///
    /// # Errors
    ///
    /// Returns the contract's type-mismatch or conversion error.
    pub fn to<T: Convert>(&self) -> Result<T, Error> {
        T::decode(self)
    }
}

fn expected(code: ErrorCode) -> Error {
    Error::new(code, 0)
}

fn int_from_value(value: &Value) -> Result<i64, Error> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::UInt(v) => {
            i64::try_from(*v).map_err(|_| expected(ErrorCode::IntegerOverflow))
        }
        _ => Err(expected(ErrorCode::ExpectedInteger)),
    }
}

fn uint_from_value(value: &Value) -> Result<u64, Error> {
    match value {
        Value::UInt(v) => Ok(*v),
        Value::Int(v) => {
            u64::try_from(*v).map_err(|_| expected(ErrorCode::IntegerOverflow))
        }
        _ => Err(expected(ErrorCode::ExpectedInteger)),
    }
}

impl Convert for Value {
    fn is(_value: &Value) -> bool {
        true
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        Ok(value.clone())
    }

    fn encode(&self) -> Value {
        self.clone()
    }
}

impl Convert for bool {
    fn is(value: &Value) -> bool {
        value.is_bool()
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        value.as_bool().ok_or_else(|| expected(ErrorCode::ExpectedBool))
    }

    fn encode(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_convert_signed {
    ($($ty:ty),*) => {
        $(
            impl Convert for $ty {
                fn is(value: &Value) -> bool {
                    int_from_value(value).is_ok_and(|v| <$ty>::try_from(v).is_ok())
                }

                fn decode(value: &Value) -> Result<Self, Error> {
                    let v = int_from_value(value)?;
                    <$ty>::try_from(v).map_err(|_| expected(ErrorCode::IntegerOverflow))
                }

                fn encode(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }
        )*
    };
}

impl_convert_signed!(i8, i16, i32);

impl Convert for i64 {
    fn is(value: &Value) -> bool {
        int_from_value(value).is_ok()
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        int_from_value(value)
    }

    fn encode(&self) -> Value {
        Value::Int(*self)
    }
}

impl Convert for isize {
    fn is(value: &Value) -> bool {
        int_from_value(value).is_ok_and(|v| Self::try_from(v).is_ok())
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        let v = int_from_value(value)?;
        Self::try_from(v).map_err(|_| expected(ErrorCode::IntegerOverflow))
    }

    fn encode(&self) -> Value {
        // isize fits i64 on every supported target.
        Value::Int(*self as i64)
    }
}

macro_rules! impl_convert_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Convert for $ty {
                fn is(value: &Value) -> bool {
                    uint_from_value(value).is_ok_and(|v| <$ty>::try_from(v).is_ok())
                }

                fn decode(value: &Value) -> Result<Self, Error> {
                    let v = uint_from_value(value)?;
                    <$ty>::try_from(v).map_err(|_| expected(ErrorCode::IntegerOverflow))
                }

                fn encode(&self) -> Value {
                    Value::UInt(u64::from(*self))
                }
            }
        )*
    };
}

impl_convert_unsigned!(u8, u16, u32);

impl Convert for u64 {
    fn is(value: &Value) -> bool {
        uint_from_value(value).is_ok()
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        uint_from_value(value)
    }

    fn encode(&self) -> Value {
        Value::UInt(*self)
    }
}

impl Convert for usize {
    fn is(value: &Value) -> bool {
        uint_from_value(value).is_ok_and(|v| Self::try_from(v).is_ok())
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        let v = uint_from_value(value)?;
        Self::try_from(v).map_err(|_| expected(ErrorCode::IntegerOverflow))
    }

    fn encode(&self) -> Value {
        Value::UInt(*self as u64)
    }
}

impl Convert for f64 {
    fn is(value: &Value) -> bool {
        value.is_number()
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        // An explicit numeric conversion may widen integers; the model's
        // accessors never do this implicitly.
        match value {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as Self),
            Value::UInt(v) => Ok(*v as Self),
            _ => Err(expected(ErrorCode::ExpectedFloat)),
        }
    }

    fn encode(&self) -> Value {
        Value::Float(*self)
    }
}

impl Convert for f32 {
    fn is(value: &Value) -> bool {
        Self::decode(value).is_ok()
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        let v = value
            .as_f64()
            .ok_or_else(|| expected(ErrorCode::ExpectedFloat))?;
        if v.is_nan() {
            return Ok(Self::NAN);
        }
        let narrowed = v as Self;
        if f64::from(narrowed) == v {
            Ok(narrowed)
        } else {
            Err(expected(ErrorCode::InexactFloat))
        }
    }

    fn encode(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl Convert for String {
    fn is(value: &Value) -> bool {
        value.is_string()
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| expected(ErrorCode::ExpectedText))
    }

    fn encode(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl Convert for Vec<u8> {
    fn is(value: &Value) -> bool {
        value.is_bytes()
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| expected(ErrorCode::ExpectedBytes))
    }

    fn encode(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl<T: Convert> Convert for Option<T> {
    fn is(value: &Value) -> bool {
        value.is_null() || T::is(value)
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        if value.is_null() {
            Ok(None)
        } else {
            T::decode(value).map(Some)
        }
    }

    fn encode(&self) -> Value {
        self.as_ref().map_or(Value::Null, Convert::encode)
    }
}

impl<T: Convert + Element> Convert for Vec<T> {
    fn is(value: &Value) -> bool {
        value
            .as_array()
            .is_some_and(|items| items.iter().all(T::is))
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        let items = value
            .as_array()
            .ok_or_else(|| expected(ErrorCode::ExpectedArray))?;
        items.iter().map(T::decode).collect()
    }

    fn encode(&self) -> Value {
        Value::Array(self.iter().map(Convert::encode).collect())
    }
}

impl<V: Convert> Convert for BTreeMap<String, V> {
    fn is(value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|obj| obj.iter().all(|(_, v)| V::is(v)))
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        let obj = value
            .as_object()
            .ok_or_else(|| expected(ErrorCode::ExpectedObject))?;
        let mut out = Self::new();
        for (k, v) in obj.iter() {
            // Duplicate keys from insertion-ordered objects: last wins.
            out.insert(k.to_owned(), V::decode(v)?);
        }
        Ok(out)
    }

    fn encode(&self) -> Value {
        let mut obj = Object::with_capacity(KeyOrder::Sorted, self.len());
        for (k, v) in self {
            obj.insert(k.clone(), v.encode());
        }
        Value::Object(obj)
    }
}

impl<V: Convert> Convert for HashMap<String, V> {
    fn is(value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|obj| obj.iter().all(|(_, v)| V::is(v)))
    }

    fn decode(value: &Value) -> Result<Self, Error> {
        let obj = value
            .as_object()
            .ok_or_else(|| expected(ErrorCode::ExpectedObject))?;
        let mut out = Self::with_capacity(obj.len());
        for (k, v) in obj.iter() {
            out.insert(k.to_owned(), V::decode(v)?);
        }
        Ok(out)
    }

    fn encode(&self) -> Value {
        // Sorted output keeps encoding deterministic regardless of hash order.
        let mut obj = Object::with_capacity(KeyOrder::Sorted, self.len());
        for (k, v) in self {
            obj.insert(k.clone(), v.encode());
        }
        Value::Object(obj)
    }
}

impl Element for bool {}
impl Element for i8 {}
impl Element for i16 {}
impl Element for i32 {}
impl Element for i64 {}
impl Element for isize {}
impl Element for u16 {}
impl Element for u32 {}
impl Element for u64 {}
impl Element for usize {}
impl Element for f32 {}
impl Element for f64 {}
impl Element for String {}
impl Element for Value {}
impl<T: Element> Element for Option<T> {}
impl<T: Element> Element for Vec<T> {}
impl<V: Element> Element for BTreeMap<String, V> {}
impl<V: Element> Element for HashMap<String, V> {}
