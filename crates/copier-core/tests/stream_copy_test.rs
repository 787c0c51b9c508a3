//! End-to-end copies through the `std::io` adapters.

use std::io::Cursor;

use copier_core::{Copier, CopyError, ReaderSource, Step, StopReason, WriterDestination};

fn run(input: &str, count: Option<usize>) -> (String, StopReason) {
    let source = ReaderSource::new(Cursor::new(input.as_bytes().to_vec()));
    let destination = WriterDestination::new(Vec::new());
    let mut copier = Copier::new(source, destination);

    let summary = match count {
        Some(count) => copier.copy_all_multiple(count).unwrap(),
        None => copier.copy_all().unwrap(),
    };

    let (_, destination) = copier.into_parts();
    let output = String::from_utf8(destination.into_inner()).unwrap();
    (output, summary.reason)
}

#[test]
fn first_line_is_copied_unit_by_unit() {
    let (output, reason) = run("héllo wörld\nsecond line\n", None);
    assert_eq!(output, "héllo wörld");
    assert_eq!(reason, StopReason::Newline);
}

#[test]
fn first_line_is_copied_in_batches() {
    for count in [1, 2, 3, 5, 64] {
        let (output, reason) = run("the quick brown fox\njumps", Some(count));
        assert_eq!(output, "the quick brown fox", "count {count}");
        assert_eq!(reason, StopReason::Newline, "count {count}");
    }
}

#[test]
fn input_without_newline_is_copied_until_end() {
    let (output, reason) = run("no trailing newline", Some(4));
    assert_eq!(output, "no trailing newline");
    assert_eq!(reason, StopReason::EmptyBatch);

    let (output, reason) = run("no trailing newline", None);
    assert_eq!(output, "no trailing newline");
    assert_eq!(reason, StopReason::NoData);
}

#[test]
fn batch_ending_exactly_at_newline_boundary() {
    // Second batch starts with the newline and is discarded.
    let (output, reason) = run("abcd\nefgh", Some(4));
    assert_eq!(output, "abcd");
    assert_eq!(reason, StopReason::Newline);
}

#[test]
fn empty_input_writes_nothing() {
    let (output, reason) = run("", Some(8));
    assert!(output.is_empty());
    assert_eq!(reason, StopReason::EmptyBatch);
}

#[test]
fn decoded_units_survive_a_mid_batch_decode_error() {
    let source = ReaderSource::new(Cursor::new(b"ab\xffc".to_vec()));
    let destination = WriterDestination::new(Vec::new());
    let mut copier = Copier::new(source, destination);

    assert_eq!(copier.copy_multiple(4).unwrap(), Step::Copied(2));
    assert!(matches!(copier.copy_multiple(4), Err(CopyError::Source(_))));
    assert_eq!(copier.copy_multiple(4).unwrap(), Step::Copied(1));

    let (_, destination) = copier.into_parts();
    assert_eq!(String::from_utf8(destination.into_inner()).unwrap(), "abc");
}
