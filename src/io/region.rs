// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Read-only file regions backed by a memory map or an owned buffer

use super::chunk::ByteRange;
use crate::error::ResourceError;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Block size for the buffered backend
const READ_BLOCK_LEN: usize = 1 << 20;

/// How a file is brought into memory for an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapBackend {
    /// Memory-map, falling back to buffered reads if mapping fails
    #[default]
    Auto,
    /// Native read-only memory map
    Mmap,
    /// Read the file block by block into one owned buffer
    Buffered,
}

impl MapBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapBackend::Auto => "auto",
            MapBackend::Mmap => "mmap",
            MapBackend::Buffered => "buffered",
        }
    }

}

impl FromStr for MapBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(MapBackend::Auto),
            "mmap" => Ok(MapBackend::Mmap),
            "buffered" => Ok(MapBackend::Buffered),
            _ => Err(format!("unknown backend '{s}' (auto, mmap, buffered)")),
        }
    }
}

enum Storage {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

/// The whole content of one file as an immutable byte slice.
///
/// Dropping the region releases the mapping; scanners only ever borrow from
/// it, so it necessarily outlives them.
pub struct FileRegion {
    path: PathBuf,
    storage: Storage,
}

impl FileRegion {
    pub fn open(path: impl AsRef<Path>, backend: MapBackend) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ResourceError::from_io(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| ResourceError::from_io(path, e))?
            .len();

        if len == 0 {
            return Err(ResourceError::Empty {
                path: path.to_path_buf(),
            });
        }

        let storage = match backend {
            MapBackend::Mmap => Storage::Mapped(map_file(&file, path)?),
            MapBackend::Buffered => Storage::Buffered(read_blocks(file, len, path)?),
            MapBackend::Auto => match map_file(&file, path) {
                Ok(map) => Storage::Mapped(map),
                Err(e) => {
                    warn!("memory map unavailable for {}, reading instead: {}", path.display(), e);
                    Storage::Buffered(read_blocks(file, len, path)?)
                }
            },
        };

        let region = Self {
            path: path.to_path_buf(),
            storage,
        };
        if region.bytes().is_empty() {
            return Err(ResourceError::Empty {
                path: region.path.clone(),
            });
        }

        debug!(
            "opened {} ({} bytes, {})",
            region.path.display(),
            region.bytes().len(),
            region.backend().as_str()
        );
        Ok(region)
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Mapped(map) => &map[..],
            Storage::Buffered(buf) => buf.as_slice(),
        }
    }

    /// Range covering the whole file
    pub fn range(&self) -> ByteRange {
        ByteRange::full(self.bytes())
    }

    /// The backend actually in use, never `Auto`
    pub fn backend(&self) -> MapBackend {
        match self.storage {
            Storage::Mapped(_) => MapBackend::Mmap,
            Storage::Buffered(_) => MapBackend::Buffered,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileRegion {
    fn drop(&mut self) {
        debug!("released {} ({})", self.path.display(), self.backend().as_str());
    }
}

fn map_file(file: &File, path: &Path) -> Result<Mmap, ResourceError> {
    // SAFETY: the map is read-only and lives inside `FileRegion`, which hands
    // out shared slices only. Truncation of the file by another process while
    // mapped is outside what this crate can guard against.
    unsafe { Mmap::map(file) }.map_err(|e| ResourceError::Unreadable {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_blocks(mut file: File, len_hint: u64, path: &Path) -> Result<Vec<u8>, ResourceError> {
    let mut buf = Vec::with_capacity(usize::try_from(len_hint).unwrap_or(0));
    let mut block = vec![0u8; READ_BLOCK_LEN];

    loop {
        let n = match file.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ResourceError::from_io(path, e)),
        };
        buf.extend_from_slice(&block[..n]);
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_backends_expose_same_bytes() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "v 1 2 3\nv 4 5 6\n")?;

        let mapped = FileRegion::open(file.path(), MapBackend::Mmap)?;
        let buffered = FileRegion::open(file.path(), MapBackend::Buffered)?;
        let auto = FileRegion::open(file.path(), MapBackend::Auto)?;

        assert_eq!(mapped.bytes(), buffered.bytes());
        assert_eq!(mapped.bytes(), auto.bytes());
        assert_eq!(mapped.backend(), MapBackend::Mmap);
        assert_eq!(buffered.backend(), MapBackend::Buffered);
        assert_ne!(auto.backend(), MapBackend::Auto);
        assert_eq!(mapped.range(), ByteRange::new(0, 16));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = FileRegion::open("/definitely/not/here.obj", MapBackend::Auto);
        assert!(matches!(result, Err(ResourceError::NotFound { .. })));
    }

    #[test]
    fn test_empty_file() -> anyhow::Result<()> {
        let file = NamedTempFile::new()?;
        for backend in [MapBackend::Mmap, MapBackend::Buffered, MapBackend::Auto] {
            let result = FileRegion::open(file.path(), backend);
            assert!(matches!(result, Err(ResourceError::Empty { .. })));
        }
        Ok(())
    }

    #[test]
    fn test_backend_names() {
        for backend in [MapBackend::Auto, MapBackend::Mmap, MapBackend::Buffered] {
            assert_eq!(backend.as_str().parse::<MapBackend>(), Ok(backend));
        }
        assert_eq!("MMAP".parse::<MapBackend>(), Ok(MapBackend::Mmap));
        assert!("stream".parse::<MapBackend>().is_err());
    }
}
