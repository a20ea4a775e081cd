use core::fmt;

/// The high-level class of an error.
///
/// The crate distinguishes:
/// - **`EndOfInput`**: the buffer ran out mid-item.
/// - **`InvalidEncoding`**: the bytes do not form well-formed CBOR (bad header,
///   invalid UTF-8, misplaced break marker, resource-limit violations).
/// - **`TypeMismatch`**: a structurally valid value did not have the requested
///   variant, or a numeric conversion would lose information.
/// - **`Conversion`**: a [`Convert`](crate::Convert) implementation rejected
///   structurally plausible input.
///
/// Absent keys and out-of-range indices are *not* errors; lookups report them
/// as `Ok(None)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Buffer exhausted mid-item.
    EndOfInput,
    /// Malformed encoded bytes.
    InvalidEncoding,
    /// Requested variant or width not satisfiable.
    TypeMismatch,
    /// A conversion contract rejected its input.
    Conversion,
}

/// A structured error code identifying the reason an operation failed.
///
/// Codes are stable and string-free; [`Error::kind`] projects them onto the
/// coarse [`ErrorKind`] taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Unexpected end-of-input while decoding.
    UnexpectedEof,
    /// Arithmetic overflow while computing a length/offset.
    LengthOverflow,

    /// Reserved additional-info value (28..30) was used.
    ReservedAdditionalInfo,
    /// A break marker appeared outside an indefinite-length container.
    UnexpectedBreak,
    /// Invalid UTF-8 in a text string.
    InvalidUtf8,
    /// An indefinite-length string contained a chunk of the wrong shape.
    InvalidChunk,
    /// Map key was not a text string.
    InvalidMapKey,
    /// Unsupported simple value.
    UnsupportedSimpleValue,
    /// CBOR tags are outside this crate's data model.
    UnsupportedTag,
    /// Input contains trailing bytes after the single data item.
    TrailingBytes,
    /// A wire integer cannot be represented by the value model.
    IntegerOutOfRange,

    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// Total items limit exceeded.
    TotalItemsLimitExceeded,
    /// Array length exceeds decode limits.
    ArrayLenLimitExceeded,
    /// Map length exceeds decode limits.
    MapLenLimitExceeded,
    /// Byte string length exceeds decode limits.
    BytesLenLimitExceeded,
    /// Text string length exceeds decode limits.
    TextLenLimitExceeded,

    /// Expected an object.
    ExpectedObject,
    /// Expected an array.
    ExpectedArray,
    /// Expected a text string.
    ExpectedText,
    /// Expected a byte string.
    ExpectedBytes,
    /// Expected an integer.
    ExpectedInteger,
    /// Expected a float.
    ExpectedFloat,
    /// Expected a boolean.
    ExpectedBool,
    /// Expected null.
    ExpectedNull,
    /// A stored integer does not fit the requested width.
    IntegerOverflow,
    /// A stored float does not round-trip through the requested width.
    InexactFloat,

    /// A required field was absent during conversion.
    MissingField,
    /// Input passed the structural test but could not be interpreted.
    InvalidStructure,
    /// A builder emitted a different number of items than declared.
    LengthMismatch,
}

impl ErrorCode {
    /// The coarse class this code belongs to.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::UnexpectedEof | Self::LengthOverflow => ErrorKind::EndOfInput,

            Self::ReservedAdditionalInfo
            | Self::UnexpectedBreak
            | Self::InvalidUtf8
            | Self::InvalidChunk
            | Self::InvalidMapKey
            | Self::UnsupportedSimpleValue
            | Self::UnsupportedTag
            | Self::TrailingBytes
            | Self::IntegerOutOfRange
            | Self::DepthLimitExceeded
            | Self::TotalItemsLimitExceeded
            | Self::ArrayLenLimitExceeded
            | Self::MapLenLimitExceeded
            | Self::BytesLenLimitExceeded
            | Self::TextLenLimitExceeded => ErrorKind::InvalidEncoding,

            Self::ExpectedObject
            | Self::ExpectedArray
            | Self::ExpectedText
            | Self::ExpectedBytes
            | Self::ExpectedInteger
            | Self::ExpectedFloat
            | Self::ExpectedBool
            | Self::ExpectedNull
            | Self::IntegerOverflow
            | Self::InexactFloat => ErrorKind::TypeMismatch,

            Self::MissingField | Self::InvalidStructure | Self::LengthMismatch => {
                ErrorKind::Conversion
            }
        }
    }
}

/// An error with a stable code, a byte offset, and an optional field name.
///
/// Offsets are meaningful for decode and view errors; errors raised by the
/// in-memory value model carry offset `0`. `field` is populated by conversion
/// contracts when the failure is scoped to a named field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset into the input where the error was detected.
    pub offset: usize,
    /// The field a conversion failure is scoped to, when applicable.
    pub field: Option<&'static str>,
}

impl Error {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self {
            code,
            offset,
            field: None,
        }
    }

    /// Construct a conversion error scoped to `field`.
    #[inline]
    #[must_use]
    pub const fn for_field(code: ErrorCode, field: &'static str) -> Self {
        Self {
            code,
            offset: 0,
            field: Some(field),
        }
    }

    /// Attach a field name to an existing error.
    #[inline]
    #[must_use]
    pub const fn in_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    /// The coarse class of this error.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::UnexpectedEof => "unexpected end of input",
            ErrorCode::LengthOverflow => "length overflow",

            ErrorCode::ReservedAdditionalInfo => "reserved additional info value",
            ErrorCode::UnexpectedBreak => "break marker outside indefinite-length item",
            ErrorCode::InvalidUtf8 => "text must be valid UTF-8",
            ErrorCode::InvalidChunk => "indefinite-length string chunk has the wrong shape",
            ErrorCode::InvalidMapKey => "map keys must be text strings",
            ErrorCode::UnsupportedSimpleValue => "unsupported simple value",
            ErrorCode::UnsupportedTag => "tags are not supported",
            ErrorCode::TrailingBytes => "trailing bytes after single item",
            ErrorCode::IntegerOutOfRange => "integer not representable by the value model",

            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
            ErrorCode::TotalItemsLimitExceeded => "total items limit exceeded",
            ErrorCode::ArrayLenLimitExceeded => "array length exceeds decode limits",
            ErrorCode::MapLenLimitExceeded => "map length exceeds decode limits",
            ErrorCode::BytesLenLimitExceeded => "byte string length exceeds decode limits",
            ErrorCode::TextLenLimitExceeded => "text string length exceeds decode limits",

            ErrorCode::ExpectedObject => "expected an object",
            ErrorCode::ExpectedArray => "expected an array",
            ErrorCode::ExpectedText => "expected a text string",
            ErrorCode::ExpectedBytes => "expected a byte string",
            ErrorCode::ExpectedInteger => "expected an integer",
            ErrorCode::ExpectedFloat => "expected a float",
            ErrorCode::ExpectedBool => "expected a boolean",
            ErrorCode::ExpectedNull => "expected null",
            ErrorCode::IntegerOverflow => "integer does not fit the requested width",
            ErrorCode::InexactFloat => "float does not round-trip through the requested width",

            ErrorCode::MissingField => "required field is absent",
            ErrorCode::InvalidStructure => "value cannot be interpreted as the requested type",
            ErrorCode::LengthMismatch => "builder emitted a different number of items",
        };

        match (self.kind(), self.field) {
            (_, Some(field)) => write!(f, "conversion failed for field `{field}`: {msg}"),
            (ErrorKind::Conversion, None) => write!(f, "conversion failed: {msg}"),
            (ErrorKind::TypeMismatch, None) => write!(f, "type mismatch: {msg}"),
            (_, None) => write!(f, "decode failed at {}: {msg}", self.offset),
        }
    }
}

impl std::error::Error for Error {}
