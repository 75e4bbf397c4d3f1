use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::APP_DIR_NAME;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model file not found: {}", .0.display())]
    ExplicitMissing(PathBuf),
    #[error("model {name} is not installed (searched: {})", display_paths(.searched))]
    NotInstalled { name: String, searched: Vec<PathBuf> },
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Where to look for a model and whether it may be fetched.
#[derive(Clone, Debug, Default)]
pub struct ModelSource {
    /// A user-supplied file; when set, nothing else is searched.
    pub explicit_path: Option<PathBuf>,
    /// Directory shipped alongside the binary.
    pub bundled_dir: Option<PathBuf>,
    /// Download location used only when no installed copy exists.
    pub download_url: Option<String>,
}

/// Resolve a model file by name.
///
/// Resolution order:
/// 1. Explicit path (must exist)
/// 2. User cache directory (platform-specific)
/// 3. Bundled directory
/// 4. Download from `download_url` to the cache, if configured
pub fn resolve(
    name: &str,
    source: &ModelSource,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    resolve_in(&model_cache_dir()?, name, source, progress)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    source: &ModelSource,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = &source.explicit_path {
        return if path.is_file() {
            Ok(path.clone())
        } else {
            Err(ModelResolveError::ExplicitMissing(path.clone()))
        };
    }

    let cached_path = cache_dir.join(name);
    if cached_path.is_file() {
        return Ok(cached_path);
    }

    let mut searched = vec![cached_path.clone()];
    if let Some(dir) = &source.bundled_dir {
        let bundled_path = dir.join(name);
        if bundled_path.is_file() {
            return Ok(bundled_path);
        }
        searched.push(bundled_path);
    }

    match &source.download_url {
        Some(url) => {
            log::info!("Downloading {name} from {url}");
            fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
            download(url, &cached_path, progress)?;
            Ok(cached_path)
        }
        None => Err(ModelResolveError::NotInstalled {
            name: name.to_string(),
            searched,
        }),
    }
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/Visage/models/`
/// - Linux: `$XDG_CACHE_HOME/Visage/models/` or `~/.cache/Visage/models/`
/// - Windows: `%LOCALAPPDATA%/Visage/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

/// `models/` next to the running executable, if it can be determined.
pub fn default_bundled_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("models")))
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");

    let result = download_inner(url, dest, &temp_path, progress);

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn download_inner(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), ModelResolveError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ModelResolveError::Write { path, source }
    };

    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let mut file = fs::File::create(temp_path).map_err(write_err(temp_path))?;

    // Stream in chunks; the model never sits fully in memory.
    let mut buf = vec![0u8; 256 * 1024];
    loop {
        let n = response.read(&mut buf).map_err(write_err(temp_path))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err(temp_path))?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(write_err(temp_path))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(write_err(dest))?;
    Ok(())
}
