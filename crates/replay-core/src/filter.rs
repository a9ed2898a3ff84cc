//! Blob eligibility filter.
//!
//! A pure predicate over listing descriptors: only genuine, non-empty JSON
//! data files are worth fetching. No side effects, no content access.

use replay_types::BlobDescriptor;

/// Capture writes a fixed placeholder for windows with no traffic; anything
/// at or below this size has no message content.
pub const EMPTY_CAPTURE_THRESHOLD_BYTES: u64 = 508;

/// The only data-file extension handled. Avro capture output is deferred.
const DATA_FILE_EXTENSION: &str = "json";

/// Decide whether a blob qualifies for replay.
///
/// Rules, in order: the name's final dot-segment must be exactly `json`
/// (names without at least two dot-segments are rejected, which also guards
/// against `.json` appearing as a directory segment rather than a true
/// extension), and the listed size must exceed the placeholder threshold.
pub fn is_eligible(blob: &BlobDescriptor) -> bool {
    has_data_extension(&blob.name) && blob.size_bytes > EMPTY_CAPTURE_THRESHOLD_BYTES
}

fn has_data_extension(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => ext == DATA_FILE_EXTENSION,
        None => false,
    }
}
