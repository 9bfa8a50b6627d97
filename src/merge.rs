/// Fold scanned field tokens into a package record
use crate::error::{lossy, FormatError};
use crate::scan::FieldToken;
use crate::types::Package;
use crate::validate::{validate_filename, validate_int64};
use memchr::memchr;

/// Apply one token to the package under construction. The identity fields
/// must agree with what the entry path declared; scalar fields overwrite,
/// list fields accumulate across fragments without deduplication, and
/// `Files` replaces as a whole.
pub fn apply(pkg: &mut Package, token: FieldToken) -> Result<(), FormatError> {
    match token {
        FieldToken::Name(value) => {
            if pkg.name != value {
                return Err(FormatError::IdentityMismatch(lossy(&value)));
            }
        }
        FieldToken::Version(value) => {
            // Declared as `version-release`, split on the first hyphen
            let pos = memchr(b'-', &value)
                .ok_or_else(|| FormatError::IdentityMismatch(lossy(&value)))?;
            if pkg.version != value[..pos] || pkg.release != value[pos + 1..] {
                return Err(FormatError::IdentityMismatch(lossy(&value)));
            }
        }
        FieldToken::Filename(value) => {
            validate_filename(&value)?;
            pkg.filename = Some(value);
        }
        FieldToken::Base(value) => pkg.base = Some(value),
        FieldToken::Description(value) => pkg.description = Some(value),
        FieldToken::Url(value) => pkg.url = Some(value),
        FieldToken::Architecture(value) => pkg.architecture = Some(value),
        FieldToken::Packager(value) => pkg.packager = Some(value),
        FieldToken::Md5Sum(value) => pkg.md5sum = Some(value),
        FieldToken::Sha256Sum(value) => pkg.sha256sum = Some(value),
        FieldToken::Signature(value) => pkg.base64_signature = Some(value),
        FieldToken::BuildDate(value) => pkg.build_date = Some(validate_int64(&value)?),
        FieldToken::CompressedSize(value) => {
            pkg.compressed_size = Some(validate_int64(&value)?)
        }
        FieldToken::InstalledSize(value) => {
            pkg.installed_size = Some(validate_int64(&value)?)
        }
        FieldToken::Groups(values) => pkg.groups.extend(values),
        FieldToken::License(values) => pkg.licenses.extend(values),
        FieldToken::Files(values) => pkg.files = Some(values),
        FieldToken::Replaces(values) => pkg.replaces.extend(values),
        FieldToken::Depends(values) => pkg.depends.extend(values),
        FieldToken::OptionalDepends(values) => pkg.optional_depends.extend(values),
        FieldToken::MakeDepends(values) => pkg.make_depends.extend(values),
        FieldToken::CheckDepends(values) => pkg.check_depends.extend(values),
        FieldToken::Conflicts(values) => pkg.conflicts.extend(values),
        FieldToken::Provides(values) => pkg.provides.extend(values),
        FieldToken::ExtendedData(values) => pkg.extended_data.extend(values),
        FieldToken::Raw(_) => (),
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn pkg() -> Package {
        Package::new(b"foo".to_vec(), b"1.0".to_vec(), b"1".to_vec())
    }

    #[test]
    fn identity_must_match() {
        let mut pkg = pkg();
        assert!(apply(&mut pkg, FieldToken::Name(b"foo".to_vec())).is_ok());
        assert!(apply(&mut pkg, FieldToken::Name(b"bar".to_vec())).is_err());
        assert!(apply(&mut pkg, FieldToken::Version(b"1.0-1".to_vec())).is_ok());
        assert!(apply(&mut pkg, FieldToken::Version(b"1.0-2".to_vec())).is_err());
        assert!(apply(&mut pkg, FieldToken::Version(b"2.0-1".to_vec())).is_err());
        // No release half at all
        assert!(apply(&mut pkg, FieldToken::Version(b"1.0".to_vec())).is_err());
    }

    #[test]
    fn scalars_overwrite_lists_accumulate() {
        let mut pkg = pkg();
        apply(&mut pkg, FieldToken::Description(b"first".to_vec())).unwrap();
        apply(&mut pkg, FieldToken::Description(b"second".to_vec())).unwrap();
        assert_eq!(pkg.description.as_deref(), Some(&b"second"[..]));

        apply(&mut pkg, FieldToken::Groups(vec![b"base".to_vec()])).unwrap();
        apply(&mut pkg, FieldToken::Groups(vec![b"base".to_vec()])).unwrap();
        assert_eq!(pkg.groups.len(), 2);

        apply(&mut pkg, FieldToken::Files(vec![b"usr".to_vec()])).unwrap();
        apply(&mut pkg, FieldToken::Files(vec![b"opt".to_vec()])).unwrap();
        assert_eq!(pkg.files, Some(vec![b"opt".to_vec()]));

        apply(&mut pkg, FieldToken::BuildDate(b"1644370627".to_vec())).unwrap();
        assert_eq!(pkg.build_date, Some(1644370627));
    }

    #[test]
    fn filename_is_validated_on_store() {
        let mut pkg = pkg();
        assert!(apply(&mut pkg, FieldToken::Filename(b".bad".to_vec())).is_err());
        assert!(pkg.filename.is_none());
        apply(&mut pkg, FieldToken::Filename(b"foo-1.0-1.pkg.tar.zst".to_vec())).unwrap();
        assert_eq!(pkg.filename.as_deref(), Some(&b"foo-1.0-1.pkg.tar.zst"[..]));
    }
}
