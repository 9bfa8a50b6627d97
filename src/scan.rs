/// Scan pacman sync db entries into typed field tokens
use crate::error::{lossy, FormatError};
use crate::types::{parse_dependency, Dependency};
use crate::validate::{validate_all_digits, validate_date};
use memchr::memchr;

/// One decoded field block of a sync db entry. Numeric fields keep their raw
/// digit bytes here; conversion happens when the aggregator stores them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldToken {
    Name(Vec<u8>),
    Version(Vec<u8>),
    Filename(Vec<u8>),
    Base(Vec<u8>),
    Description(Vec<u8>),
    Url(Vec<u8>),
    Architecture(Vec<u8>),
    Packager(Vec<u8>),
    Md5Sum(Vec<u8>),
    Sha256Sum(Vec<u8>),
    Signature(Vec<u8>),
    BuildDate(Vec<u8>),
    CompressedSize(Vec<u8>),
    InstalledSize(Vec<u8>),
    Groups(Vec<Vec<u8>>),
    License(Vec<Vec<u8>>),
    Files(Vec<Vec<u8>>),
    Replaces(Vec<Dependency>),
    Depends(Vec<Dependency>),
    OptionalDepends(Vec<Dependency>),
    MakeDepends(Vec<Dependency>),
    CheckDepends(Vec<Dependency>),
    Conflicts(Vec<Dependency>),
    Provides(Vec<Dependency>),
    ExtendedData(Vec<(Vec<u8>, Vec<u8>)>),
    /// Blank separator or list terminator, passed through untouched.
    Raw(Vec<u8>),
}

/// Cursor over the newline-terminated lines of one entry's content. Yields
/// `(value, suffix)` with the terminating `\n` split off into `suffix`; the
/// final line of an entry may lack one.
struct LineCursor<'a> {
    rest: &'a [u8],
    line: usize,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a [u8]) -> Self {
        LineCursor { rest: content, line: 0 }
    }

    fn next_line(&mut self) -> Result<Option<(&'a [u8], &'a [u8])>, FormatError> {
        if self.rest.is_empty() {
            return Ok(None);
        }
        let rest = self.rest;
        let (value, suffix) = match memchr(b'\n', rest) {
            Some(pos) => {
                self.rest = &rest[pos + 1..];
                (&rest[..pos], &rest[pos..pos + 1])
            }
            None => {
                self.rest = &[];
                (rest, &rest[rest.len()..])
            }
        };
        self.line += 1;
        // Checked before any marker recognition
        if memchr(0, value).is_some() {
            return Err(FormatError::EmbeddedNul);
        }
        Ok(Some((value, suffix)))
    }
}

/// Single-pass scanner over one entry's content. Holds no state between
/// entries; create a fresh one per fragment.
pub struct Scanner<'a> {
    cursor: LineCursor<'a>,
    // A list terminator waiting to be emitted after its list token
    pending: Option<FieldToken>,
}

impl<'a> Scanner<'a> {
    pub fn new(content: &'a [u8]) -> Self {
        Scanner {
            cursor: LineCursor::new(content),
            pending: None,
        }
    }

    /// 1-based number of the last consumed line, for error context.
    pub fn line(&self) -> usize {
        self.cursor.line
    }

    /// Produce the next field token, or `None` once the entry is exhausted.
    pub fn next_token(&mut self) -> Result<Option<FieldToken>, FormatError> {
        if let Some(token) = self.pending.take() {
            return Ok(Some(token));
        }
        let (line, suffix) = match self.cursor.next_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        let token = match line {
            b"%NAME%" => FieldToken::Name(self.value()?),
            b"%VERSION%" => FieldToken::Version(self.value()?),
            b"%FILENAME%" => FieldToken::Filename(self.value()?),
            b"%BASE%" => FieldToken::Base(self.value()?),
            b"%DESC%" => FieldToken::Description(self.value()?),
            b"%URL%" => FieldToken::Url(self.value()?),
            b"%ARCH%" => FieldToken::Architecture(self.value()?),
            b"%PACKAGER%" => FieldToken::Packager(self.value()?),
            b"%MD5SUM%" => FieldToken::Md5Sum(self.value()?),
            b"%SHA256SUM%" => FieldToken::Sha256Sum(self.value()?),
            b"%PGPSIG%" => FieldToken::Signature(self.value()?),
            b"%BUILDDATE%" => {
                let value = self.value()?;
                validate_date(&value)?;
                FieldToken::BuildDate(value)
            }
            b"%CSIZE%" => {
                let value = self.value()?;
                validate_all_digits(&value)?;
                FieldToken::CompressedSize(value)
            }
            b"%ISIZE%" => {
                let value = self.value()?;
                validate_all_digits(&value)?;
                FieldToken::InstalledSize(value)
            }
            b"%GROUPS%" => FieldToken::Groups(self.list()?),
            b"%LICENSE%" => FieldToken::License(self.list()?),
            b"%FILES%" => FieldToken::Files(self.list()?),
            b"%REPLACES%" => FieldToken::Replaces(self.dependency_list()?),
            b"%DEPENDS%" => FieldToken::Depends(self.dependency_list()?),
            b"%OPTDEPENDS%" => FieldToken::OptionalDepends(self.dependency_list()?),
            b"%MAKEDEPENDS%" => FieldToken::MakeDepends(self.dependency_list()?),
            b"%CHECKDEPENDS%" => FieldToken::CheckDepends(self.dependency_list()?),
            b"%CONFLICTS%" => FieldToken::Conflicts(self.dependency_list()?),
            b"%PROVIDES%" => FieldToken::Provides(self.dependency_list()?),
            b"%DATA%" => FieldToken::ExtendedData(self.data_list()?),
            b"" => FieldToken::Raw(suffix.to_vec()),
            _ => return Err(FormatError::UnknownMarker(lossy(line))),
        };
        Ok(Some(token))
    }

    /// Exactly one value line follows a scalar marker.
    fn value(&mut self) -> Result<Vec<u8>, FormatError> {
        match self.cursor.next_line()? {
            Some((value, _)) => Ok(value.to_vec()),
            None => Err(FormatError::MissingValue),
        }
    }

    /// Lines up to a blank terminator. The terminator is queued as a `Raw`
    /// token behind the list token; a list cut off by the end of the entry
    /// is tolerated and the terminator degrades to an empty sentinel.
    fn list(&mut self) -> Result<Vec<Vec<u8>>, FormatError> {
        let mut values = Vec::new();
        loop {
            match self.cursor.next_line()? {
                Some((value, suffix)) => {
                    if value.is_empty() {
                        self.pending = Some(FieldToken::Raw(suffix.to_vec()));
                        return Ok(values);
                    }
                    values.push(value.to_vec());
                }
                None => {
                    self.pending = Some(FieldToken::Raw(Vec::new()));
                    return Ok(values);
                }
            }
        }
    }

    fn dependency_list(&mut self) -> Result<Vec<Dependency>, FormatError> {
        Ok(self
            .list()?
            .iter()
            .map(|line| parse_dependency(line))
            .collect())
    }

    /// `%DATA%` entries are `key=value`, split once on the first `=`.
    fn data_list(&mut self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, FormatError> {
        let mut pairs = Vec::new();
        for entry in self.list()? {
            let pos = memchr(b'=', &entry)
                .ok_or_else(|| FormatError::BadExtendedData(lossy(&entry)))?;
            pairs.push((entry[..pos].to_vec(), entry[pos + 1..].to_vec()));
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::DepModifier;

    fn scan_all(content: &[u8]) -> Result<Vec<FieldToken>, FormatError> {
        let mut scanner = Scanner::new(content);
        let mut tokens = Vec::new();
        while let Some(token) = scanner.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    #[test]
    fn scan_scalars() {
        let tokens = scan_all(b"%NAME%\nfoo\n%VERSION%\n1.0-1\n\n%CSIZE%\n42\n").unwrap();
        assert_eq!(
            tokens,
            vec![
                FieldToken::Name(b"foo".to_vec()),
                FieldToken::Version(b"1.0-1".to_vec()),
                FieldToken::Raw(b"\n".to_vec()),
                FieldToken::CompressedSize(b"42".to_vec()),
            ]
        );
    }

    #[test]
    fn scan_lists() {
        let tokens = scan_all(b"%DEPENDS%\nbar>=2\nbaz\n\n%LICENSE%\nGPL\n\n").unwrap();
        match &tokens[0] {
            FieldToken::Depends(deps) => {
                assert_eq!(deps.len(), 2);
                assert_eq!(deps[0].name, b"bar");
                assert_eq!(deps[0].modifier, DepModifier::Ge);
                assert_eq!(deps[1].modifier, DepModifier::Any);
            }
            other => panic!("expected a depends token, got {other:?}"),
        }
        assert_eq!(tokens[1], FieldToken::Raw(b"\n".to_vec()));
        assert_eq!(tokens[2], FieldToken::License(vec![b"GPL".to_vec()]));
        assert_eq!(tokens[3], FieldToken::Raw(b"\n".to_vec()));
    }

    #[test]
    fn unterminated_list_degrades_to_empty_sentinel() {
        let tokens = scan_all(b"%FILES%\nusr/bin/foo\nusr/bin/bar\n").unwrap();
        assert_eq!(
            tokens,
            vec![
                FieldToken::Files(vec![b"usr/bin/foo".to_vec(), b"usr/bin/bar".to_vec()]),
                FieldToken::Raw(Vec::new()),
            ]
        );
    }

    #[test]
    fn extended_data_splits_once() {
        let tokens = scan_all(b"%DATA%\nkey=a=b\n\n").unwrap();
        assert_eq!(
            tokens[0],
            FieldToken::ExtendedData(vec![(b"key".to_vec(), b"a=b".to_vec())])
        );
        assert!(matches!(
            scan_all(b"%DATA%\nnopair\n\n"),
            Err(FormatError::BadExtendedData(_))
        ));
    }

    #[test]
    fn rejects_unknown_marker() {
        assert_eq!(
            scan_all(b"%BOGUS%\nx\n"),
            Err(FormatError::UnknownMarker("%BOGUS%".to_string()))
        );
        // A bare value line with no marker before it is just as bad
        assert!(scan_all(b"stray\n").is_err());
    }

    #[test]
    fn rejects_nul_anywhere() {
        assert_eq!(scan_all(b"%NAME%\nf\x00o\n"), Err(FormatError::EmbeddedNul));
        assert_eq!(scan_all(b"\x00%NAME%\nfoo\n"), Err(FormatError::EmbeddedNul));
    }

    #[test]
    fn rejects_marker_without_value() {
        assert_eq!(scan_all(b"%NAME%\n"), Err(FormatError::MissingValue));
    }

    #[test]
    fn numeric_fields_checked_at_scan_time() {
        assert!(matches!(
            scan_all(b"%CSIZE%\n12a\n"),
            Err(FormatError::NotDigits(_))
        ));
        assert!(scan_all(b"%BUILDDATE%\n+1644370627\n").is_ok());
        assert!(matches!(
            scan_all(b"%BUILDDATE%\nsoon\n"),
            Err(FormatError::BadDate(_))
        ));
    }
}
