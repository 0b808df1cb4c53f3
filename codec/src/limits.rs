//! Limits for decoding untrusted input.

/// Limits enforced while checking, encoding and decoding values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum nesting depth of values.
    pub max_depth: usize,
    /// Maximum element count of a sequence or map.
    pub max_container_len: usize,
    /// Maximum size of an input buffer passed to decode.
    pub max_input_bytes: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_container_len: 1 << 20,
            max_input_bytes: 16 * 1024 * 1024,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_depth: 16,
            max_container_len: 64,
            max_input_bytes: 4096,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_container_len: usize::MAX,
            max_input_bytes: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_reasonable() {
        let limits = CodecLimits::default();
        assert!(limits.max_depth >= 32);
        assert!(limits.max_container_len >= 1024);
        assert!(limits.max_input_bytes >= 64 * 1024);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = CodecLimits::for_testing();
        let default_limits = CodecLimits::default();
        assert!(test_limits.max_depth < default_limits.max_depth);
        assert!(test_limits.max_container_len < default_limits.max_container_len);
        assert!(test_limits.max_input_bytes < default_limits.max_input_bytes);
    }

    #[test]
    fn unlimited_limits() {
        let limits = CodecLimits::unlimited();
        assert_eq!(limits.max_depth, usize::MAX);
        assert_eq!(limits.max_input_bytes, usize::MAX);
    }
}
