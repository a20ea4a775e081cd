//! Value construction macro.
//!
//! [`value!`] builds [`crate::Value`] trees with a JSON-like literal syntax.
//! Object literals produce sorted/unique objects; build insertion-ordered
//! objects through [`crate::Object::insertion`] when entry order matters.
//!
//! Map key rules:
//! - `{ a: 1 }` uses the literal key `"a"` (identifier stringized)
//! - `{ "a": 1 }` uses the literal string key `"a"`
//! - `{ (k): 1 }` uses the expression `k` as the key

/// Construct a [`crate::Value`] using a JSON-like literal syntax.
///
/// Supported forms:
/// - `value!(null)`
/// - `value!(true)` / `value!(false)`
/// - `value!("text")`
/// - `value!([ ... ])`
/// - `value!({ key: value, "key": value, (expr_key): value, ... })`
/// - `value!(expr)` where `expr` implements `Into<Value>`
///
/// ```
/// use bindoc::value;
///
/// let user_key = "dynamic";
/// let v = value!({
///     a: 1,
///     (user_key): [true, null, 1.5],
/// });
/// assert!(v.get("dynamic").is_some());
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    (true) => {
        $crate::Value::Bool(true)
    };
    (false) => {
        $crate::Value::Bool(false)
    };

    // Array literal: value!([ ... ])
    ([ $($elem:tt),* $(,)? ]) => {{
        let items: ::std::vec::Vec<$crate::Value> = ::std::vec![
            $($crate::value!($elem)),*
        ];
        $crate::Value::Array(items)
    }};

    // Object literal: value!({ ... })
    ({ $($key:tt : $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut obj = $crate::Object::sorted();
        $(
            obj.insert($crate::__value_key!($key), $crate::value!($val));
        )*
        $crate::Value::Object(obj)
    }};

    // Fallback: convert an expression into a Value.
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

/// Internal helper for map keys.
///
/// - `ident` becomes `"ident"`
/// - `"literal"` must be a string literal
/// - `(expr)` uses the runtime expression as key
#[doc(hidden)]
#[macro_export]
macro_rules! __value_key {
    ($key:ident) => {
        ::core::stringify!($key)
    };
    (($key:expr)) => {
        $key
    };
    ($key:literal) => {
        $key
    };
}

/// Construct a path slice for view navigation.
///
/// ```
/// use bindoc::{encode_value, value, view, path};
///
/// let bytes = encode_value(&value!({items: [{id: 7}]}));
/// let id = view(&bytes).at(path!["items", 0, "id"]).unwrap().unwrap();
/// assert_eq!(id.int().unwrap(), 7);
/// ```
#[macro_export]
macro_rules! path {
    ($($seg:expr),* $(,)?) => {
        &[$($crate::PathElem::from($seg)),*]
    };
}
