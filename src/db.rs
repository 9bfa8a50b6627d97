/// The sync db reader
use crate::{
    error::{lossy, FormatError},
    merge,
    scan::Scanner,
    types::{Package, PkgSpecifier},
};
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use memchr::memrchr;
use std::{collections::HashMap, fs::File, io::Read, path::Path};
use tar::{Archive, EntryType};
use tracing::{debug, trace};

/// All packages of one repository, keyed by package name.
pub type PackageDb = HashMap<Vec<u8>, Package>;

/// Read a gzip-compressed sync db from disk. The table is handed back only
/// after the whole archive decoded cleanly.
pub fn import(db: &Path) -> Result<PackageDb> {
    let f = File::open(db).with_context(|| format!("Failed to open sync db {}", db.display()))?;
    let gzipdecoder = GzDecoder::new(f);
    let mut tar = Archive::new(gzipdecoder);

    let mut packages = PackageDb::new();
    read_entries(&mut tar, &mut packages)
        .with_context(|| format!("Failed to read sync db {}", db.display()))?;
    debug!("imported {} packages from {}", packages.len(), db.display());
    Ok(packages)
}

/// Decode every entry of an uncompressed tar stream into `db`, in archive
/// order, one pass. On error the table may hold partially merged records and
/// must be discarded by the caller.
pub fn read_entries<R: Read>(tar: &mut Archive<R>, db: &mut PackageDb) -> Result<()> {
    for entry in tar.entries()? {
        let mut entry = entry?;
        let kind = entry.header().entry_type();
        if kind.is_dir() {
            continue;
        }
        let path = entry.path_bytes().into_owned();
        if kind == EntryType::GNUSparse {
            return Err(FormatError::SparseEntry(lossy(&path)).into());
        }
        match entry_filename(&path) {
            Some(b"desc" | b"depends" | b"files") => (),
            _ => return Err(FormatError::UnsupportedEntry(lossy(&path)).into()),
        }
        trace!("decoding sync db entry {}", lossy(&path));
        let specifier = PkgSpecifier::from_entry_path(&path)?;
        let package = db
            .entry(specifier.name.clone())
            .or_insert_with(|| Package::new(specifier.name, specifier.version, specifier.release));
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        read_fragment(&content, package)
            .with_context(|| format!("Malformed sync db entry {}", lossy(&path)))?;
    }
    Ok(())
}

/// Trailing path component, if the entry sits inside a package directory.
fn entry_filename(path: &[u8]) -> Option<&[u8]> {
    memrchr(b'/', path).map(|pos| &path[pos + 1..])
}

fn read_fragment(content: &[u8], package: &mut Package) -> Result<()> {
    let mut scanner = Scanner::new(content);
    loop {
        match scanner.next_token() {
            Ok(Some(token)) => merge::apply(package, token)
                .with_context(|| format!("at line {}", scanner.line()))?,
            Ok(None) => return Ok(()),
            Err(e) => return Err(e).with_context(|| format!("at line {}", scanner.line())),
        }
    }
}
