use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use grabber_logging::{grab_info, grab_warn};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// `archive` was written with `files` entries and the directory removed.
    Archived { archive: PathBuf, files: usize },
    /// The directory held no files; it was removed and no archive written.
    RemovedEmpty { dir: PathBuf },
    /// Nothing to do, the directory does not exist.
    Missing { dir: PathBuf },
}

/// `<dir>.zip`, next to the directory.
pub fn archive_path_for(dir: &Path) -> PathBuf {
    let mut name = OsString::from(dir.as_os_str());
    name.push(".zip");
    PathBuf::from(name)
}

/// Compresses `dir` into `<dir>.zip` and removes the directory.
///
/// Entries are stored relative to the directory's parent, so extracting the
/// archive recreates the directory itself. A directory without any files is
/// removed and produces no archive. On failure the directory is left alone
/// and any partial archive is deleted.
pub fn archive_directory(dir: &Path) -> Result<ArchiveOutcome, ArchiveError> {
    if !dir.is_dir() {
        grab_warn!("Folder {:?} does not exist, skipping archiving", dir);
        return Ok(ArchiveOutcome::Missing {
            dir: dir.to_path_buf(),
        });
    }

    let files = collect_files(dir)?;
    if files.is_empty() {
        fs::remove_dir_all(dir)?;
        grab_info!("Folder {:?} is empty, removed without archiving", dir);
        return Ok(ArchiveOutcome::RemovedEmpty {
            dir: dir.to_path_buf(),
        });
    }

    let archive = archive_path_for(dir);
    grab_info!("Creating archive {:?}", archive);
    if let Err(err) = write_zip(dir, &files, &archive) {
        if let Err(cleanup) = fs::remove_file(&archive) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                grab_warn!("Could not remove partial archive {:?}: {}", archive, cleanup);
            }
        }
        return Err(err);
    }

    fs::remove_dir_all(dir)?;
    grab_info!("Archived {} file(s) into {:?} and removed {:?}", files.len(), archive, dir);
    Ok(ArchiveOutcome::Archived {
        archive,
        files: files.len(),
    })
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| ArchiveError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn write_zip(dir: &Path, files: &[PathBuf], archive: &Path) -> Result<(), ArchiveError> {
    let base = dir.parent().unwrap_or_else(|| Path::new(""));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut writer = ZipWriter::new(File::create(archive)?);
    for path in files {
        writer.start_file(entry_name(base, path), options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut writer)?;
    }
    writer.finish()?;
    Ok(())
}

/// Archive entry name: path relative to `base`, `/`-separated.
fn entry_name(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
