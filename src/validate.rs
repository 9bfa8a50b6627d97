/// Field value validators for the sync db line grammar
use crate::error::{lossy, FormatError};
use memchr::memchr;

/// Whitespace per the date grammar. Note: a plain space is not included.
fn is_space(c: u8) -> bool {
    matches!(c, b'\x0c' | b'\n' | b'\r' | b'\t' | b'\x0b')
}

/// A `%FILENAME%` value must be a plain file name: no leading dot, no path
/// separator, at most 4096 bytes.
pub fn validate_filename(value: &[u8]) -> Result<(), FormatError> {
    if value.starts_with(b".") || memchr(b'/', value).is_some() || value.len() > 4096 {
        return Err(FormatError::BadFilename(lossy(value)));
    }
    Ok(())
}

/// Parse a base-10 signed integer, rejecting anything outside the i64 range.
pub fn validate_int64(value: &[u8]) -> Result<i64, FormatError> {
    let s = std::str::from_utf8(value).map_err(|_| FormatError::BadInteger(lossy(value)))?;
    // A build date may reach us with the leading whitespace its grammar allows
    s.trim()
        .parse::<i64>()
        .map_err(|_| FormatError::BadInteger(lossy(value)))
}

/// Non-empty, ASCII digits only.
pub fn validate_all_digits(value: &[u8]) -> Result<(), FormatError> {
    if value.is_empty() || !value.iter().all(|c| c.is_ascii_digit()) {
        return Err(FormatError::NotDigits(lossy(value)));
    }
    Ok(())
}

/// Check a `%BUILDDATE%` value: optional leading whitespace, optional sign,
/// then digits. The raw bytes are kept as-is; range conversion happens when
/// the aggregator stores the field.
pub fn validate_date(line: &[u8]) -> Result<(), FormatError> {
    let mut pos = 0;
    while pos < line.len() && is_space(line[pos]) {
        pos += 1;
    }
    if pos < line.len() && (line[pos] == b'+' || line[pos] == b'-') {
        pos += 1;
    }
    validate_all_digits(&line[pos..]).map_err(|_| FormatError::BadDate(lossy(line)))
}

#[test]
fn test_filename() {
    assert!(validate_filename(b"foo-1.0-1-x86_64.pkg.tar.zst").is_ok());
    assert!(validate_filename(b".hidden").is_err());
    assert!(validate_filename(b"a/b").is_err());
    assert!(validate_filename(&[b'a'; 4096]).is_ok());
    assert!(validate_filename(&[b'a'; 4097]).is_err());
}

#[test]
fn test_int64() {
    assert_eq!(validate_int64(b"9223372036854775807"), Ok(i64::MAX));
    assert_eq!(validate_int64(b"-9223372036854775808"), Ok(i64::MIN));
    assert!(validate_int64(b"9223372036854775808").is_err());
    assert!(validate_int64(b"12a").is_err());
    assert_eq!(validate_int64(b"\t+123"), Ok(123));
}

#[test]
fn test_all_digits() {
    assert!(validate_all_digits(b"0123").is_ok());
    assert!(validate_all_digits(b"").is_err());
    assert!(validate_all_digits(b"12 3").is_err());
    assert!(validate_all_digits(b"-1").is_err());
}

#[test]
fn test_date() {
    assert!(validate_date(b"1644370627").is_ok());
    assert!(validate_date(b"\t+123").is_ok());
    assert!(validate_date(b"-123").is_ok());
    assert!(validate_date(b"+").is_err());
    assert!(validate_date(b"").is_err());
    assert!(validate_date(b"12a").is_err());
    assert!(validate_date(b" 123").is_err());
}
