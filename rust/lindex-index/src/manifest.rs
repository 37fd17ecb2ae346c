//! Input manifest: a file count followed by that many file paths.

use std::path::{Path, PathBuf};

use lindex_common::{Result, error::Error};
use lindex_text::is_space_byte;

use crate::file_queue::FileQueue;

/// The list of input files read from a manifest.
///
/// The manifest is a whitespace-separated token stream: a non-negative
/// integer `N`, then `N` paths. Paths therefore cannot contain whitespace.
/// Tokens after the `N`-th path are ignored. Relative paths are resolved
/// against the process working directory, not the manifest's location.
///
/// The manifest is read as bytes. On Unix a path token is used verbatim,
/// so paths need not be valid UTF-8; elsewhere invalid sequences are
/// replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    source: PathBuf,
    files: Vec<PathBuf>,
}

impl Manifest {
    /// Reads and parses the manifest at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Manifest> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::io(format!("read manifest {}", path.display()), e))?;
        Manifest::parse(bytes, path)
    }

    /// Parses manifest content; `source` is only used in error messages.
    pub fn parse(input: impl AsRef<[u8]>, source: impl Into<PathBuf>) -> Result<Manifest> {
        let source = source.into();
        let mut tokens = input
            .as_ref()
            .split(|&b| is_space_byte(b))
            .filter(|token| !token.is_empty());

        let count_token = tokens
            .next()
            .ok_or_else(|| Error::manifest(&source, "missing file count"))?;
        let count: u32 = std::str::from_utf8(count_token)
            .ok()
            .and_then(|token| token.parse().ok())
            .ok_or_else(|| {
                Error::manifest(
                    &source,
                    format!(
                        "malformed file count '{}'",
                        String::from_utf8_lossy(count_token)
                    ),
                )
            })?;

        let mut files = Vec::new();
        for found in 0..count {
            let path = tokens.next().ok_or_else(|| {
                Error::manifest(
                    &source,
                    format!("expected {count} file paths, found {found}"),
                )
            })?;
            files.push(path_from_bytes(path));
        }

        if tokens.next().is_some() {
            log::warn!(
                "ignoring trailing tokens in manifest {}",
                source.display()
            );
        }
        Ok(Manifest { source, files })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Moves the listed files, in order, into a [`FileQueue`].
    pub fn into_file_queue(self) -> FileQueue {
        self.files.into_iter().collect()
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
