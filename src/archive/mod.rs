use crate::error::Result;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Extracts every member of `zip_path` into `dest_dir` at its archived
/// relative path, overwriting existing files. Returns the number of files written.
///
/// Archived unix modes are applied once everything is written, so a read-only
/// member never blocks its own directory's contents or a later re-extraction.
pub fn extract_zip(zip_path: &Path, dest_dir: &Path) -> Result<usize> {
    tracing::info!("Extracting {:?} to {:?}", zip_path, dest_dir);

    fs::create_dir_all(dest_dir)?;

    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut extracted = 0;
    let mut modes: Vec<(PathBuf, u32, bool)> = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let relative = match entry.enclosed_name() {
            Some(path) => path.to_owned(),
            None => {
                tracing::warn!("Skipping unsafe archive member {:?}", entry.name());
                continue;
            }
        };
        let out_path = dest_dir.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            make_owner_writable(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
                make_owner_writable(parent)?;
            }
            if out_path.exists() {
                make_owner_writable(&out_path)?;
            }
            let mut out_file = File::create(&out_path)?;
            io::copy(&mut entry, &mut out_file)?;
            extracted += 1;
            tracing::debug!("Extracted {:?}", relative);
        }

        if let Some(mode) = entry.unix_mode() {
            modes.push((out_path, mode, entry.is_dir()));
        }
    }

    // files first, then directories deepest first
    modes.sort_by_key(|(path, _, is_dir)| (*is_dir, std::cmp::Reverse(path.components().count())));
    for (path, mode, _) in &modes {
        apply_mode(path, *mode);
    }

    tracing::info!("Extracted {} files", extracted);
    Ok(extracted)
}

/// Grants the owner write access to `path` if it lacks it.
pub fn make_owner_writable(path: &Path) -> Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = permissions.mode();
        if mode & 0o200 != 0 {
            return Ok(());
        }
        permissions.set_mode(mode | 0o200);
    }
    #[cfg(not(unix))]
    {
        if !permissions.readonly() {
            return Ok(());
        }
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
    }

    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777)) {
        tracing::warn!("Could not set mode {:o} on {:?}: {}", mode, path, e);
    }
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) {}
