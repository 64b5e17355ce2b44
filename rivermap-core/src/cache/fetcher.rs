//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::error::{Error, Result};
use curl::easy::Easy;
use pbr::{ProgressBar, Units};
use std::io::{self, stderr, Write};
use std::time::Duration;

/// Transport used to download datasets
pub trait Fetcher {
    /// Stream the resource at `url` into `dest`. Returns the number of bytes written.
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// HTTP(S) downloads with libcurl
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    /// Receive buffer size in bytes
    pub chunk_size: usize,
    /// Show a download progress bar on stderr
    pub progress: bool,
    pub connect_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(chunk_size: usize, progress: bool) -> HttpFetcher {
        HttpFetcher {
            chunk_size,
            progress,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

fn fetch_error<E: ToString>(url: &str, err: E) -> Error {
    Error::Fetch {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

fn progress_bar(url: &str) -> ProgressBar<io::Stderr> {
    let mut pb = ProgressBar::on(stderr(), 0);
    pb.set_units(Units::Bytes);
    let name = url.rsplit('/').next().unwrap_or(url);
    pb.message(&format!("{} ", name));
    pb.show_speed = false;
    pb.show_time_left = false;
    pb
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let mut easy = Easy::new();
        easy.url(url).map_err(|e| fetch_error(url, e))?;
        easy.follow_location(true)
            .map_err(|e| fetch_error(url, e))?;
        // Non-2xx responses are errors instead of a downloaded error page
        easy.fail_on_error(true)
            .map_err(|e| fetch_error(url, e))?;
        easy.buffer_size(self.chunk_size)
            .map_err(|e| fetch_error(url, e))?;
        easy.connect_timeout(self.connect_timeout)
            .map_err(|e| fetch_error(url, e))?;
        easy.useragent(concat!("rivermap/", env!("CARGO_PKG_VERSION")))
            .map_err(|e| fetch_error(url, e))?;
        easy.progress(self.progress)
            .map_err(|e| fetch_error(url, e))?;

        let mut written: u64 = 0;
        let mut write_error: Option<io::Error> = None;
        let mut pb = if self.progress {
            Some(progress_bar(url))
        } else {
            None
        };
        let result = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match dest.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        write_error = Some(e);
                        // Short write aborts the transfer
                        Ok(0)
                    }
                })
                .map_err(|e| fetch_error(url, e))?;
            if let Some(pb) = pb.as_mut() {
                transfer
                    .progress_function(move |dltotal, dlnow, _, _| {
                        if dltotal > 0.0 {
                            pb.total = dltotal as u64;
                        }
                        pb.set(dlnow as u64);
                        true
                    })
                    .map_err(|e| fetch_error(url, e))?;
            }
            transfer.perform()
        };
        if let Some(err) = write_error {
            return Err(fetch_error(url, err));
        }
        result.map_err(|e| fetch_error(url, e))?;

        // file:// and other non-HTTP schemes report 0
        let code = easy.response_code().map_err(|e| fetch_error(url, e))?;
        if code != 0 && !(200..300).contains(&code) {
            return Err(fetch_error(url, format!("HTTP status {}", code)));
        }
        if let Some(mut pb) = pb {
            pb.finish();
        }
        Ok(written)
    }
}
