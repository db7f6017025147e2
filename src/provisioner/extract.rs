//! Pulls the ws4sql executable out of a release archive.

use super::{
    cache::CacheLocation,
    error::{Error, ErrorExt, Result},
};
use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

/// Extracts the first archive entry whose base name is the expected
/// executable name into the cache, replacing any previous executable.
///
/// The entry is written to a temporary file in the cache directory, marked
/// executable and then renamed into place, so the final path only ever holds
/// a complete file. Every other entry is skipped without being written.
pub async fn extract_executable(
    archive: File,
    location: &CacheLocation,
    source_url: &str,
) -> Result<PathBuf> {
    let name = location.executable_name().to_string();
    let dir = location.dir().to_path_buf();
    let target = location.executable_path().to_path_buf();
    let source_url = source_url.to_string();

    tokio::task::spawn_blocking(move || {
        extract_blocking(archive, &name, &dir, &target, &source_url)?;
        Ok(target)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Archive extraction task panicked: {e}")))?
}

fn extract_blocking(
    archive: File,
    name: &str,
    dir: &Path,
    target: &Path,
    source_url: &str,
) -> Result<()> {
    let mut zip = zip::ZipArchive::new(BufReader::new(archive))?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let entry_name = entry.name().to_string();
        let base_name = Path::new(&entry_name)
            .file_name()
            .and_then(|file_name| file_name.to_str());
        if base_name != Some(name) {
            log::trace!("Skipping archive entry {}", entry_name);
            continue;
        }

        log::debug!("Extracting {} to {}", entry_name, target.display());

        let mut staged = tempfile::Builder::new()
            .prefix(".ws4sql-extract-")
            .tempfile_in(dir)
            .fs_context("creating temporary executable", dir)?;
        io::copy(&mut entry, staged.as_file_mut())
            .fs_context("writing extracted executable", staged.path())?;
        staged
            .as_file()
            .sync_all()
            .fs_context("flushing extracted executable", staged.path())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(0o755))
                .fs_context("marking executable", staged.path())?;
        }

        staged.persist(target).map_err(|e| Error::Filesystem {
            context: "moving executable into cache".to_string(),
            path: target.to_path_buf(),
            source: e.error,
        })?;
        return Ok(());
    }

    Err(Error::ExecutableNotFound {
        name: name.to_string(),
        url: source_url.to_string(),
    })
}
