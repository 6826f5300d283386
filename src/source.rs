//! # Capture Sources
//!
//! Loads a captured print job from a local file, standard input (`-`) or
//! an http(s) URL.

use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::error::PtdecodeError;

const USER_AGENT: &str = concat!("ptdecode/", env!("CARGO_PKG_VERSION"));

/// Largest capture the CLI downloads (256 MB).
pub const MAX_DOWNLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Where a capture comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
    Url(String),
}

impl Source {
    pub fn parse(input: &str) -> Self {
        if input == "-" {
            Source::Stdin
        } else if input.starts_with("http://") || input.starts_with("https://") {
            Source::Url(input.to_string())
        } else {
            Source::File(PathBuf::from(input))
        }
    }

    /// Read the whole capture into memory.
    pub async fn load(&self) -> Result<Vec<u8>, PtdecodeError> {
        let data = match self {
            Source::Stdin => {
                let mut data = Vec::new();
                tokio::io::stdin().read_to_end(&mut data).await?;
                data
            }
            Source::File(path) => tokio::fs::read(path).await.map_err(|e| {
                PtdecodeError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
            })?,
            Source::Url(url) => fetch(&http_client()?, url, MAX_DOWNLOAD_BYTES).await?,
        };

        log::info!("Loaded {} bytes from {}", data.len(), self);
        Ok(data)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Stdin => write!(f, "stdin"),
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

/// HTTP client used for capture downloads.
pub fn http_client() -> Result<reqwest::Client, PtdecodeError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| PtdecodeError::Fetch(format!("HTTP client error: {}", e)))
}

/// Download a capture of at most `limit` bytes.
///
/// A declared `Content-Length` over the limit is rejected before the body
/// is read; otherwise the body is read chunk by chunk and the download is
/// dropped as soon as it passes the limit.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    limit: usize,
) -> Result<Vec<u8>, PtdecodeError> {
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PtdecodeError::Fetch(format!("{}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PtdecodeError::Fetch(format!("{}: HTTP {}", url, status)));
    }

    if let Some(declared) = response.content_length() {
        if declared > limit as u64 {
            return Err(PtdecodeError::TooLarge {
                size: declared,
                limit,
            });
        }
    }

    let mut data = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| PtdecodeError::Fetch(format!("{}: {}", url, e)))?
    {
        if data.len() + chunk.len() > limit {
            return Err(PtdecodeError::TooLarge {
                size: (data.len() + chunk.len()) as u64,
                limit,
            });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
