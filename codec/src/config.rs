//! Codec configuration.

use crate::CodecLimits;

/// How map entries are ordered on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapOrder {
    /// Entries are written in the order the value holds them.
    #[default]
    Preserve,
    /// Entries are sorted by their encoded key bytes.
    Canonical,
}

/// What decode does with bytes left over after the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingBytes {
    /// Fail with [`CodecError::TrailingBytes`](crate::CodecError::TrailingBytes).
    #[default]
    Reject,
    /// Ignore them.
    Allow,
}

/// Configuration shared by encode and decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecConfig {
    pub limits: CodecLimits,
    pub map_order: MapOrder,
    pub trailing_bytes: TrailingBytes,
}

impl CodecConfig {
    /// Configuration with [`CodecLimits::for_testing`].
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            limits: CodecLimits::for_testing(),
            map_order: MapOrder::Preserve,
            trailing_bytes: TrailingBytes::Reject,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: CodecLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_map_order(mut self, map_order: MapOrder) -> Self {
        self.map_order = map_order;
        self
    }

    #[must_use]
    pub fn with_trailing_bytes(mut self, trailing_bytes: TrailingBytes) -> Self {
        self.trailing_bytes = trailing_bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_strict() {
        let config = CodecConfig::default();
        assert_eq!(config.map_order, MapOrder::Preserve);
        assert_eq!(config.trailing_bytes, TrailingBytes::Reject);
        assert_eq!(config.limits, CodecLimits::default());
    }

    #[test]
    fn builder_methods_override() {
        let config = CodecConfig::default()
            .with_map_order(MapOrder::Canonical)
            .with_trailing_bytes(TrailingBytes::Allow)
            .with_limits(CodecLimits::unlimited());
        assert_eq!(config.map_order, MapOrder::Canonical);
        assert_eq!(config.trailing_bytes, TrailingBytes::Allow);
        assert_eq!(config.limits.max_depth, usize::MAX);
    }
}
