//! Zip container access.
//!
//! Packages are held fully in memory between commits. A commit rewrites the
//! whole container, keeping entry order and the stored/deflated choice of each
//! existing entry, then loads it again so the next read sees what is on disk.

use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::Error;

/// Storage the document package reads parts from and writes parts to.
pub trait Archive {
    /// Returns `None` when the entry does not exist.
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Adds the entry, or replaces its contents if it already exists.
    fn write_entry(&mut self, name: &str, data: Vec<u8>) -> Result<(), Error>;

    fn contains_entry(&self, name: &str) -> bool;

    /// Persist every pending write, then reopen.
    fn commit(&mut self) -> Result<(), Error>;
}

struct Entry {
    name: String,
    data: Vec<u8>,
    method: CompressionMethod,
    is_dir: bool,
}

#[derive(Default)]
struct Entries {
    entries: Vec<Entry>,
}

impl Entries {
    fn load<R: Read + Seek>(reader: R) -> Result<Self, zip::result::ZipError> {
        let mut zip = zip::ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            // The header's declared size is untrusted, so the buffer grows as it reads.
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(Entry {
                name: file.name().to_string(),
                method: file.compression(),
                is_dir: file.is_dir(),
                data,
            });
        }
        Ok(Self { entries })
    }

    fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name && !e.is_dir)
    }

    fn put(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.data = data;
                entry.is_dir = false;
            }
            None => self.entries.push(Entry {
                name: name.to_string(),
                data,
                method: CompressionMethod::Deflated,
                is_dir: false,
            }),
        }
    }

    fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W, Error> {
        let mut zip = zip::ZipWriter::new(writer);
        for entry in &self.entries {
            // Only stored and deflated are written back; anything else is recompressed.
            let method = match entry.method {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);
            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), options)?;
            } else {
                zip.start_file(entry.name.as_str(), options)?;
                zip.write_all(&entry.data)?;
            }
        }
        Ok(zip.finish()?)
    }
}

/// A zip package backed by a file on disk.
pub struct ZipFileArchive {
    path: PathBuf,
    entries: Entries,
    dirty: bool,
}

impl ZipFileArchive {
    /// Open the package at `path`. With `create_if_missing`, a missing file
    /// starts out as an empty package and is created on the first commit.
    pub fn open(path: impl AsRef<Path>, create_if_missing: bool) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let entries = match File::open(&path) {
            Ok(file) => Entries::load(file).map_err(|e| Error::ArchiveOpen {
                path: path.clone(),
                source: Box::new(e),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && create_if_missing => {
                log::debug!(
                    "{} does not exist, starting an empty package",
                    path.display()
                );
                Entries::default()
            }
            Err(e) => {
                return Err(Error::ArchiveOpen {
                    path,
                    source: Box::new(e),
                });
            }
        };
        Ok(Self {
            dirty: !path.exists(),
            path,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reopen(&mut self) -> Result<(), Error> {
        let file = File::open(&self.path).map_err(|e| Error::ArchiveOpen {
            path: self.path.clone(),
            source: Box::new(e),
        })?;
        self.entries = Entries::load(file).map_err(|e| Error::ArchiveOpen {
            path: self.path.clone(),
            source: Box::new(e),
        })?;
        Ok(())
    }
}

impl Archive for ZipFileArchive {
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.entries.get(name).map(|e| e.data.clone()))
    }

    fn write_entry(&mut self, name: &str, data: Vec<u8>) -> Result<(), Error> {
        self.entries.put(name, data);
        self.dirty = true;
        Ok(())
    }

    fn contains_entry(&self, name: &str) -> bool {
        self.entries.get(name).is_some()
    }

    fn commit(&mut self) -> Result<(), Error> {
        if !self.dirty {
            return Ok(());
        }
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let tmp = tempfile::NamedTempFile::new_in(&dir)?;
        if let Ok(meta) = std::fs::metadata(&self.path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        let tmp = self.entries.write_to(tmp)?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        self.dirty = false;
        log::debug!(
            "Committed {} entries to {}",
            self.entries.entries.len(),
            self.path.display()
        );
        self.reopen()
    }
}

/// A zip package held in memory, for hosts that never touch the filesystem.
#[derive(Default)]
pub struct MemoryArchive {
    entries: Entries,
    bytes: Vec<u8>,
}

impl MemoryArchive {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        let entries =
            Entries::load(Cursor::new(bytes.as_slice())).map_err(|e| Error::ArchiveOpen {
                path: PathBuf::from("<memory>"),
                source: Box::new(e),
            })?;
        Ok(Self { entries, bytes })
    }

    /// Serialized package as of the last commit.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Archive for MemoryArchive {
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.entries.get(name).map(|e| e.data.clone()))
    }

    fn write_entry(&mut self, name: &str, data: Vec<u8>) -> Result<(), Error> {
        self.entries.put(name, data);
        Ok(())
    }

    fn contains_entry(&self, name: &str) -> bool {
        self.entries.get(name).is_some()
    }

    fn commit(&mut self) -> Result<(), Error> {
        let cursor = self.entries.write_to(Cursor::new(Vec::new()))?;
        self.bytes = cursor.into_inner();
        self.entries = Entries::load(Cursor::new(self.bytes.as_slice()))?;
        Ok(())
    }
}
