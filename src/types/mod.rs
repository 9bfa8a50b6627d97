mod dependency;

pub use dependency::{parse_dependency, DepModifier, Dependency};

use crate::error::{lossy, FormatError};
use memchr::memchr;

/// Identity triple encoded in a sync db entry path, `name-version-release/...`.
/// Transient; only used to seed or look up a [`Package`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PkgSpecifier {
    pub name: Vec<u8>,
    pub version: Vec<u8>,
    pub release: Vec<u8>,
}

impl PkgSpecifier {
    /// Split the leading path component from the right on two hyphens.
    /// Package names may themselves contain hyphens, so only the two
    /// rightmost ones delimit version and release.
    pub fn from_entry_path(path: &[u8]) -> Result<Self, FormatError> {
        let dir = match memchr(b'/', path) {
            Some(pos) => &path[..pos],
            None => path,
        };
        let mut fields = dir.rsplitn(3, |c| *c == b'-');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(release), Some(version), Some(name)) => Ok(PkgSpecifier {
                name: name.to_vec(),
                version: version.to_vec(),
                release: release.to_vec(),
            }),
            _ => Err(FormatError::BadSpecifier(lossy(dir))),
        }
    }
}

/// Aggregate metadata of one package, merged from its `desc`, `depends` and
/// `files` fragments. The identity triple is fixed at creation; every
/// fragment must agree with it. All payloads stay raw bytes since sync dbs
/// are not guaranteed to hold UTF-8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub filename: Option<Vec<u8>>,
    pub base: Option<Vec<u8>>,
    pub name: Vec<u8>,
    pub version: Vec<u8>,
    pub release: Vec<u8>,
    pub description: Option<Vec<u8>>,
    pub url: Option<Vec<u8>>,
    pub packager: Option<Vec<u8>>,
    pub md5sum: Option<Vec<u8>>,
    pub sha256sum: Option<Vec<u8>>,
    pub base64_signature: Option<Vec<u8>>,
    pub architecture: Option<Vec<u8>>,
    pub build_date: Option<i64>,

    pub compressed_size: Option<i64>,
    pub installed_size: Option<i64>,

    pub licenses: Vec<Vec<u8>>,
    pub replaces: Vec<Dependency>,
    pub groups: Vec<Vec<u8>>,
    pub depends: Vec<Dependency>,
    pub optional_depends: Vec<Dependency>,
    pub check_depends: Vec<Dependency>,
    pub make_depends: Vec<Dependency>,
    pub conflicts: Vec<Dependency>,
    pub provides: Vec<Dependency>,

    pub files: Option<Vec<Vec<u8>>>,

    pub extended_data: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Package {
    /// Empty record seeded with the identity of the first-seen entry path.
    pub fn new(name: Vec<u8>, version: Vec<u8>, release: Vec<u8>) -> Self {
        Package {
            filename: None,
            base: None,
            name,
            version,
            release,
            description: None,
            url: None,
            packager: None,
            md5sum: None,
            sha256sum: None,
            base64_signature: None,
            architecture: None,
            build_date: None,
            compressed_size: None,
            installed_size: None,
            licenses: Vec::new(),
            replaces: Vec::new(),
            groups: Vec::new(),
            depends: Vec::new(),
            optional_depends: Vec::new(),
            check_depends: Vec::new(),
            make_depends: Vec::new(),
            conflicts: Vec::new(),
            provides: Vec::new(),
            files: None,
            extended_data: Vec::new(),
        }
    }
}
