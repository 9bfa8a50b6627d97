use thiserror::Error;

/// A violation of the sync database format. Every variant is fatal to the
/// current parse run; there is no recovery or partial-result mode.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("unknown field marker {0:?}")]
    UnknownMarker(String),
    #[error("entry content contains a NUL byte")]
    EmbeddedNul,
    #[error("field marker without a value line")]
    MissingValue,
    #[error("expected digits in numeric field, got {0:?}")]
    NotDigits(String),
    #[error("malformed date {0:?}")]
    BadDate(String),
    #[error("integer not in signed 64-bit range: {0:?}")]
    BadInteger(String),
    #[error("invalid filename {0:?}")]
    BadFilename(String),
    #[error("extended data entry without '=': {0:?}")]
    BadExtendedData(String),
    #[error("malformed package specifier {0:?}")]
    BadSpecifier(String),
    #[error("unsupported entry {0:?} in sync db")]
    UnsupportedEntry(String),
    #[error("sparse entry {0:?} in sync db")]
    SparseEntry(String),
    #[error("fragment does not match package identity: {0:?}")]
    IdentityMismatch(String),
}

/// Render raw db bytes for an error message.
pub(crate) fn lossy(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}
