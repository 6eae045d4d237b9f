//! Settings file discovery and loading.
//!
//! `viper-template.toml` is looked up in two directories, lowest priority
//! first: the platform config directory (`~/.config/viper-template/` on
//! Linux) and the current working directory. Every file found is returned,
//! so the resolver can layer them. Missing files are skipped; other I/O
//! errors are propagated.
//!
//! An explicitly named settings file comes last and must exist.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TemplateError;

pub const APP_NAME: &str = "viper-template";
pub const SETTINGS_FILE: &str = "viper-template.toml";

/// Directories searched for [`SETTINGS_FILE`], lowest priority first.
pub fn settings_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(proj) = directories::ProjectDirs::from("", "", APP_NAME) {
        dirs.push(proj.config_dir().to_path_buf());
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    dirs
}

/// Read every settings file found in `dirs`, then `explicit` if given.
pub fn load_settings_files(
    dirs: &[PathBuf],
    explicit: Option<&Path>,
) -> Result<Vec<(PathBuf, String)>, TemplateError> {
    let mut results = Vec::new();
    for dir in dirs {
        let file_path = dir.join(SETTINGS_FILE);
        match std::fs::read_to_string(&file_path) {
            Ok(content) => {
                debug!(path = %file_path.display(), "found settings file");
                results.push((file_path, content));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(TemplateError::Io {
                    path: file_path,
                    source: e,
                });
            }
        }
    }

    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        results.push((path.to_path_buf(), content));
    }

    Ok(results)
}
