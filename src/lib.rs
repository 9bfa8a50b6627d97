//! Decoder for pacman repository sync databases.
//!
//! A sync db is a (usually gzip-compressed) tar archive holding one
//! directory per package, with `desc`, `depends` and `files` entries that
//! each contribute a subset of the package's metadata. [`import`] reads such
//! an archive into a table of [`Package`] records, merging the fragments of
//! each package and failing on the first malformed line — there is no
//! repair or partial-result mode.

mod error;

pub mod db;
pub mod merge;
pub mod scan;
pub mod types;
pub mod validate;

pub use db::{import, read_entries, PackageDb};
pub use error::FormatError;
pub use scan::{FieldToken, Scanner};
pub use types::{parse_dependency, DepModifier, Dependency, Package, PkgSpecifier};
