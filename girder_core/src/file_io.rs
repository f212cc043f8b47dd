//! # File I/O Module
//!
//! Archive and library files on disk:
//! - **Atomic saves**: write to `.tmp`, sync, rename into place
//! - **Uniform failures**: unreadable files and malformed JSON both come
//!   back as `InvalidFileFormat`
//!
//! ## File Format
//!
//! An archive file is the JSON form of [`Archive`]. A girder library file is
//! an archive whose root holds one `GirderLibraryEntry` unit per entry.
//!
//! ## Example
//!
//! ```rust,no_run
//! use girder_core::file_io::{load_library_file, save_library_file};
//! use girder_core::families::BeamFamily;
//! use girder_core::library::{GirderEntry, GirderLibrary};
//! use std::path::Path;
//!
//! let mut library = GirderLibrary::new();
//! library.insert("UF60G5", GirderEntry::new(BeamFamily::UBeam2));
//!
//! let path = Path::new("girders.json");
//! save_library_file(&library, path)?;
//! let loaded = load_library_file(path)?;
//! assert_eq!(loaded, library);
//! # Ok::<(), girder_core::errors::SectionError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::errors::{SectionError, SectionResult};
use crate::library::{load_library, save_library, GirderLibrary};
use crate::persistence::{Archive, ArchiveWriter};

fn file_error(path: &Path, operation: &str, reason: impl std::fmt::Display) -> SectionError {
    SectionError::invalid_file_format(path.display().to_string(), format!("{}: {}", operation, reason))
}

/// Read a whole file as text.
pub(crate) fn read_text(path: &Path) -> SectionResult<String> {
    let mut file = File::open(path).map_err(|e| file_error(path, "open", e))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| file_error(path, "read", e))?;
    Ok(contents)
}

/// Write `contents` to `path` atomically.
fn write_atomic(path: &Path, contents: &str) -> SectionResult<()> {
    let tmp_path = path.with_extension("tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| file_error(&tmp_path, "create temp file", e))?;
    tmp_file
        .write_all(contents.as_bytes())
        .map_err(|e| file_error(&tmp_path, "write temp file", e))?;
    tmp_file
        .sync_all()
        .map_err(|e| file_error(&tmp_path, "sync temp file", e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        file_error(path, "rename to final", e)
    })?;

    Ok(())
}

/// Save an archive as JSON with an atomic write.
pub fn save_archive(archive: &Archive, path: &Path) -> SectionResult<()> {
    let json = serde_json::to_string_pretty(archive).map_err(|e| file_error(path, "serialize", e))?;
    write_atomic(path, &json)?;
    log::debug!("saved archive to {}", path.display());
    Ok(())
}

/// Load an archive saved by [`save_archive`].
pub fn load_archive(path: &Path) -> SectionResult<Archive> {
    let contents = read_text(path)?;
    serde_json::from_str(&contents).map_err(|e| file_error(path, "parse", e))
}

/// Save every entry of `library` to a library file.
pub fn save_library_file(library: &GirderLibrary, path: &Path) -> SectionResult<()> {
    let mut writer = ArchiveWriter::new();
    save_library(&mut writer, library)?;
    save_archive(&writer.finish()?, path)
}

/// Load a library file, migrating entries written by older versions.
pub fn load_library_file(path: &Path) -> SectionResult<GirderLibrary> {
    let archive = load_archive(path)?;
    load_library(&mut archive.reader())
}
