use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

fn find_upwards(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut dir = if start.is_dir() {
        start.to_path_buf()
    } else {
        start.parent().unwrap_or(start).to_path_buf()
    };

    loop {
        let candidate = dir.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        if !dir.pop() {
            break;
        }
    }

    None
}

/// Directory holding `matrix.yaml`, searched upwards from the current directory and then from this crate.
pub fn workspace_root() -> Result<PathBuf> {
    let start = std::env::current_dir()?;
    let found = find_upwards(&start, "matrix.yaml")
        .or_else(|| find_upwards(Path::new(env!("CARGO_MANIFEST_DIR")), "matrix.yaml"))
        .ok_or_else(|| anyhow!("matrix.yaml not found (run from within the repo or pass --config)"))?;

    Ok(found.parent().unwrap_or(found.as_path()).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_workspace_manifest_from_crate_dir() {
        let here = Path::new(env!("CARGO_MANIFEST_DIR"));
        let found = find_upwards(here, "Cargo.toml").unwrap();
        assert_eq!(found, here.join("Cargo.toml"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let here = Path::new(env!("CARGO_MANIFEST_DIR"));
        assert!(find_upwards(here, "no-such-file.bootcode").is_none());
    }
}
