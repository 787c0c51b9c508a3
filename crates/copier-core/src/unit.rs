//! Character units and the eligibility rules applied before a write.

/// Returned by a source when no data is available.
pub const NO_DATA: char = '\0';

/// Stop signal. Never copied.
pub const NEWLINE: char = '\n';

/// Whether a single unit may be written: anything but [`NO_DATA`] or [`NEWLINE`].
pub fn is_copyable(c: char) -> bool {
    c != NO_DATA && c != NEWLINE
}

/// Whether a batch may be written at all.
///
/// An empty batch, or one whose first unit is [`NEWLINE`], is discarded
/// wholesale.
pub fn is_batch_copyable(batch: &[char]) -> bool {
    batch.first().is_some_and(|&c| c != NEWLINE)
}

/// The longest prefix of `batch` before the first [`NEWLINE`], exclusive.
pub fn until_newline(batch: &[char]) -> &[char] {
    match batch.iter().position(|&c| c == NEWLINE) {
        Some(end) => &batch[..end],
        None => batch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_and_newline_are_not_copyable() {
        assert!(!is_copyable(NO_DATA));
        assert!(!is_copyable(NEWLINE));
    }

    #[test]
    fn ordinary_characters_are_copyable() {
        for c in ['I', ' ', 'z', '\t', '\r', 'é'] {
            assert!(is_copyable(c), "expected {c:?} to be copyable");
        }
    }

    #[test]
    fn empty_batch_is_not_copyable() {
        assert!(!is_batch_copyable(&[]));
    }

    #[test]
    fn batch_starting_with_newline_is_not_copyable() {
        assert!(!is_batch_copyable(&['\n']));
        assert!(!is_batch_copyable(&['\n', 'd']));
        assert!(!is_batch_copyable(&['\n', 'f', 's', 'e', 'r']));
    }

    #[test]
    fn batch_with_later_newline_is_copyable() {
        assert!(is_batch_copyable(&['r', 'd', '\n', 'e']));
    }

    #[test]
    fn until_newline_truncates_before_first_newline() {
        assert_eq!(until_newline(&['r', 'd', '\n', 'e']), &['r', 'd']);
        assert_eq!(until_newline(&['a', '\n', 'b', '\n']), &['a']);
    }

    #[test]
    fn until_newline_keeps_batch_without_newline() {
        let batch = ['I', ' ', 'l', 'o', 'v', 'e'];
        assert_eq!(until_newline(&batch), &batch);
    }
}
