//! Saving backend blobs (reports, history exports) to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Write `bytes` into `dir` under `preferred_name`, appending
/// ` (n)` before the extension instead of overwriting an existing
/// file.
pub fn save_download(dir: &Path, preferred_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating download dir {}", dir.display()))?;
    let path = unique_path(dir, preferred_name);
    std::fs::write(&path, bytes)
        .with_context(|| format!("writing download {}", path.display()))?;
    tracing::info!("saved download to {}", path.display());
    Ok(path)
}

fn unique_path(dir: &Path, preferred_name: &str) -> PathBuf {
    let candidate = dir.join(preferred_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match preferred_name.rfind('.') {
        Some(idx) => (&preferred_name[..idx], &preferred_name[idx..]),
        None => (preferred_name, ""),
    };
    for n in 1.. {
        let candidate = dir.join(format!("{} ({}){}", stem, n, ext));
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!()
}
