use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::Engine as _;
use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::foundation::error::{BackgroundError, BackgroundResult};

/// Source of media bytes for natural-size resolution.
///
/// Hosts with network access supply their own implementation; [`LocalFetcher`] covers inline
/// `data:` URIs and files on disk.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, BackgroundResult<Vec<u8>>>;
}

/// Fetcher for `data:` URIs, `file://` URLs and paths relative to a root directory.
#[derive(Clone, Debug)]
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Synchronous core of [`ImageFetcher::fetch`].
    pub fn read(&self, url: &str) -> BackgroundResult<Vec<u8>> {
        let url = url.trim();
        let lower = url.to_ascii_lowercase();

        if lower.starts_with("data:") {
            return decode_data_uri(url);
        }
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("blob:")
        {
            return Err(BackgroundError::fetch(format!(
                "'{url}' needs a network-capable fetcher"
            )));
        }

        let path = match url.strip_prefix("file://") {
            Some(abs) => {
                let decoded = urlencoding::decode(abs).context("decode file url")?;
                PathBuf::from(decoded.into_owned())
            }
            None => self.root.join(Path::new(&normalize_rel_path(url)?)),
        };
        std::fs::read(&path)
            .with_context(|| format!("read media bytes from '{}'", path.display()))
            .map_err(BackgroundError::from)
    }
}

impl Default for LocalFetcher {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ImageFetcher for LocalFetcher {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, BackgroundResult<Vec<u8>>> {
        future::ready(self.read(url)).boxed_local()
    }
}

/// Decode the payload of a `data:` URI (base64 or percent-encoded).
pub fn decode_data_uri(uri: &str) -> BackgroundResult<Vec<u8>> {
    let rest = uri
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &uri[5..])
        .ok_or_else(|| BackgroundError::fetch("not a data: uri"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| BackgroundError::fetch("data: uri has no ',' separator"))?;

    let is_base64 = header
        .split(';')
        .any(|param| param.trim().eq_ignore_ascii_case("base64"));
    if is_base64 {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let cleaned = urlencoding::decode(&cleaned)
            .map(|c| c.into_owned())
            .unwrap_or(cleaned);
        base64::engine::general_purpose::STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| BackgroundError::fetch(format!("invalid base64 payload: {e}")))
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// Normalize and validate media paths relative to the fetcher root.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> BackgroundResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(BackgroundError::fetch("media paths must be relative"));
    }
    if s.is_empty() {
        return Err(BackgroundError::fetch("media path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(BackgroundError::fetch("media paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(BackgroundError::fetch("media path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
