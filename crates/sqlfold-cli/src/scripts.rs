//! Migration script discovery for `sqlfold merge`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// `.sql` files under `dir`, sorted by path.
///
/// `skip` is left out when it resolves to one of the found files, so a
/// merge writing into the scanned directory never reads its own output.
pub fn discover_scripts(dir: &Path, skip: Option<&Path>) -> Vec<PathBuf> {
    let skip = skip.and_then(|p| p.canonicalize().ok());
    let mut scripts: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("sql"))
        .filter(|path| match &skip {
            Some(skip) => path.canonicalize().ok().as_ref() != Some(skip),
            None => true,
        })
        .collect();
    scripts.sort();
    scripts
}

/// Contents of `scripts` in order, joined by a newline
pub fn concatenate(scripts: &[PathBuf]) -> Result<String, (PathBuf, io::Error)> {
    let mut parts = Vec::with_capacity(scripts.len());
    for script in scripts {
        tracing::debug!("reading {}", script.display());
        parts.push(fs::read_to_string(script).map_err(|e| (script.clone(), e))?);
    }
    Ok(parts.join("\n"))
}
