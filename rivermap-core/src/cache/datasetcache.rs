//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::cache::fetcher::{Fetcher, HttpFetcher};
use crate::core::config::{ApplicationCfg, Config};
use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Download directory for remote datasets.
///
/// A dataset is fetched once. Any later request for the same file name
/// is served from disk, even if the file is stale.
pub struct DatasetCache<F: Fetcher> {
    pub basepath: PathBuf,
    pub fetcher: F,
    /// Additional attempts after a failed download
    pub retries: u32,
    /// Delay before the first retry, doubled for every further attempt
    pub retry_delay: Duration,
}

/// Local file name derived from the last path segment of `url`
pub fn filename_from_url(url: &str) -> Result<String> {
    let without_query = url
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let name = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    if name.is_empty() || without_query.ends_with("://") || name.contains(':') {
        return Err(Error::config(format!(
            "Can't derive a file name from url '{}'",
            url
        )));
    }
    Ok(name.to_string())
}

impl<F: Fetcher> DatasetCache<F> {
    pub fn new<P: AsRef<Path>>(basepath: P, fetcher: F) -> DatasetCache<F> {
        DatasetCache {
            basepath: basepath.as_ref().to_path_buf(),
            fetcher,
            retries: 0,
            retry_delay: Duration::from_millis(0),
        }
    }

    pub fn info(&self) -> String {
        format!("Dataset cache directory: {}", self.basepath.display())
    }

    /// Local path of a dataset, downloading it first if it is not cached yet.
    pub fn ensure_local(&self, url: &str, filename: Option<&str>) -> Result<PathBuf> {
        let filename = match filename {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => filename_from_url(url)?,
        };
        let path = self.basepath.join(&filename);
        if path.exists() {
            debug!("Cache hit {}", path.display());
            return Ok(path);
        }
        fs::create_dir_all(&self.basepath).map_err(|e| Error::Io(e, self.basepath.clone()))?;

        let mut attempt = 0;
        loop {
            info!("Downloading {} to {}", url, path.display());
            match self.download(url, &path) {
                Ok(bytes) => {
                    info!("Downloaded {} bytes", bytes);
                    return Ok(path);
                }
                Err(e @ Error::Fetch { .. }) if attempt < self.retries => {
                    let delay = self.retry_delay * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    warn!("{} - retrying in {:?} ({}/{})", e, delay, attempt, self.retries);
                    thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Fetch into a temporary file in the cache directory and rename it on success.
    /// Partial downloads are removed when the temporary file is dropped.
    fn download(&self, url: &str, path: &Path) -> Result<u64> {
        let mut tmp =
            NamedTempFile::new_in(&self.basepath).map_err(|e| Error::Io(e, self.basepath.clone()))?;
        let bytes = self.fetcher.fetch(url, tmp.as_file_mut())?;
        tmp.as_file_mut()
            .flush()
            .map_err(|e| Error::Io(e, tmp.path().to_path_buf()))?;
        tmp.persist(path)
            .map_err(|e| Error::Io(e.error, path.to_path_buf()))?;
        Ok(bytes)
    }
}

impl<'a> Config<'a, ApplicationCfg> for DatasetCache<HttpFetcher> {
    fn from_config(config: &ApplicationCfg) -> Result<Self> {
        let cfg = &config.cache;
        if cfg.chunk_size == 0 {
            return Err(Error::config("cache.chunk_size must be positive"));
        }
        Ok(DatasetCache {
            basepath: PathBuf::from(&cfg.dir),
            fetcher: HttpFetcher::new(cfg.chunk_size, cfg.progress),
            retries: cfg.retries,
            retry_delay: Duration::from_millis(cfg.retry_delay_ms),
        })
    }
    fn gen_config() -> String {
        let toml = r#"
[cache]
# Download directory
dir = "."
# Additional attempts after a failed download
retries = 2
retry_delay_ms = 1000
# Download buffer size in bytes
chunk_size = 8192
#progress = true
"#;
        toml.to_string()
    }
    fn gen_runtime_config(&self) -> String {
        format!(
            r#"
[cache]
dir = "{}"
retries = {}
retry_delay_ms = {}
chunk_size = {}
progress = {}
"#,
            self.basepath.display(),
            self.retries,
            self.retry_delay.as_millis(),
            self.fetcher.chunk_size,
            self.fetcher.progress
        )
    }
}
