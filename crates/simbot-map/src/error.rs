//! Error types for loading and parsing map descriptions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a map load.
///
/// Every variant is fatal: there is no partial map and no skip-and-continue.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map file could not be read.
    #[error("cannot read map file {}: {source}", path.display())]
    MapFileUnreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A record's fields do not match the shape its tag requires.
    #[error("line {line}: malformed record `{record}`: {reason}")]
    MalformedRecord {
        /// 1-based line number in the map text.
        line: usize,
        /// The offending record, whitespace-trimmed.
        record: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The leading tag is not one of the known record kinds.
    #[error("line {line}: unrecognized record type `{tag}`")]
    UnrecognizedRecordType {
        /// 1-based line number in the map text.
        line: usize,
        /// The tag field as written.
        tag: String,
    },
}

impl MapError {
    /// Line number of a parse error, if the error came from the text itself.
    pub fn line(&self) -> Option<usize> {
        match self {
            MapError::MapFileUnreadable { .. } => None,
            MapError::MalformedRecord { line, .. } | MapError::UnrecognizedRecordType { line, .. } => {
                Some(*line)
            }
        }
    }
}
