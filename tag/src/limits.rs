//! Configurable limits for bounded tag decoding.

/// Limits enforced while decoding a network tag.
///
/// Every length prefix and nesting level is checked against these values
/// before any allocation or recursion happens, so a hostile payload cannot
/// make the reader allocate or recurse without bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLimits {
    /// Maximum compound nesting depth (the root compound is depth 1).
    pub max_depth: usize,

    /// Maximum length of a single string or key, in bytes.
    pub max_string_len: usize,

    /// Maximum number of elements in an int array.
    pub max_array_len: usize,

    /// Maximum number of entries in a single compound.
    pub max_compound_entries: usize,
}

impl Default for TagLimits {
    fn default() -> Self {
        Self {
            // Block-entity payloads nest three levels at most
            max_depth: 32,
            max_string_len: i16::MAX as usize,
            // A piston moves at most a dozen blocks, three ints each
            max_array_len: 64 * 1024,
            max_compound_entries: 1024,
        }
    }
}

impl TagLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_depth: 8,
            max_string_len: 256,
            max_array_len: 256,
            max_compound_entries: 64,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_string_len: usize::MAX,
            max_array_len: usize::MAX,
            max_compound_entries: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_string_len() {
        assert_eq!(TagLimits::default().max_string_len, 32767);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = TagLimits::for_testing();
        let default_limits = TagLimits::default();

        assert!(test_limits.max_depth < default_limits.max_depth);
        assert!(test_limits.max_string_len < default_limits.max_string_len);
        assert!(test_limits.max_array_len < default_limits.max_array_len);
        assert!(test_limits.max_compound_entries < default_limits.max_compound_entries);
    }

    #[test]
    fn unlimited_is_max() {
        let limits = TagLimits::unlimited();
        assert_eq!(limits.max_depth, usize::MAX);
        assert_eq!(limits.max_array_len, usize::MAX);
    }
}
