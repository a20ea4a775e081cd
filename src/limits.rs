use crate::{Error, ErrorCode};

/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum container length limit for arrays/objects.
///
/// This is a safety limit; adjust explicitly for your deployment.
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 1 << 16;

/// Decode-time resource limits for the eager decoder.
///
/// Limits are enforced deterministically as the input is parsed; a violation
/// surfaces as an error with the offset of the offending header. The view
/// navigator does not apply limits — its work is bounded by the bytes it
/// touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum nesting depth.
    pub max_depth: usize,
    /// Maximum total count of container items:
    /// `sum(array_len) + sum(2 * object_pairs)` across the entire decoded item
    /// (objects count both keys and values). Indefinite-length containers
    /// count items as they are encountered.
    pub max_total_items: usize,
    /// Maximum array length.
    pub max_array_len: usize,
    /// Maximum object length (pairs).
    pub max_object_len: usize,
    /// Maximum byte-string length.
    pub max_bytes_len: usize,
    /// Maximum text-string length in UTF-8 bytes.
    pub max_text_len: usize,
}

impl DecodeLimits {
    /// Construct conservative limits derived from a maximum message size.
    ///
    /// The defaults are:
    /// - `max_total_items = max_message_bytes`
    /// - `max_bytes_len = max_message_bytes`
    /// - `max_text_len = max_message_bytes`
    /// - `max_array_len` and `max_object_len` are capped by
    ///   [`DEFAULT_MAX_CONTAINER_LEN`]
    ///
    /// This is a pragmatic baseline. Production deployments should tune these
    /// explicitly.
    #[must_use]
    pub fn for_bytes(max_message_bytes: usize) -> Self {
        let max_container_len = max_message_bytes.min(DEFAULT_MAX_CONTAINER_LEN);
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_items: max_message_bytes.max(1),
            max_array_len: max_container_len,
            max_object_len: max_container_len,
            max_bytes_len: max_message_bytes,
            max_text_len: max_message_bytes,
        }
    }

    pub(crate) fn check_array_len(&self, len: usize, off: usize) -> Result<(), Error> {
        if len > self.max_array_len {
            return Err(Error::new(ErrorCode::ArrayLenLimitExceeded, off));
        }
        Ok(())
    }

    pub(crate) fn check_object_len(&self, len: usize, off: usize) -> Result<(), Error> {
        if len > self.max_object_len {
            return Err(Error::new(ErrorCode::MapLenLimitExceeded, off));
        }
        Ok(())
    }

    pub(crate) fn check_bytes_len(&self, len: usize, off: usize) -> Result<(), Error> {
        if len > self.max_bytes_len {
            return Err(Error::new(ErrorCode::BytesLenLimitExceeded, off));
        }
        Ok(())
    }

    pub(crate) fn check_text_len(&self, len: usize, off: usize) -> Result<(), Error> {
        if len > self.max_text_len {
            return Err(Error::new(ErrorCode::TextLenLimitExceeded, off));
        }
        Ok(())
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_items: usize::MAX,
            max_array_len: usize::MAX,
            max_object_len: usize::MAX,
            max_bytes_len: usize::MAX,
            max_text_len: usize::MAX,
        }
    }
}
