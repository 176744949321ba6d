use crossbeam_channel::Sender;
use std::path::PathBuf;
use std::{fs, thread};

use crate::model::{Info, RawSizeMap};

/// Where the viewer reads its payloads from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// HTTP endpoint serving `size_tree.json` and `info`.
    Remote { base: String },
    /// Directory holding `size_tree.json` and `info.json`.
    Local { dir: PathBuf },
}

#[derive(Debug, Clone)]
pub enum LoadMsg {
    Done { raw: RawSizeMap, info: Info },
    Error(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("fetch worker died")]
    Worker,
}

pub struct Loader {
    source: DataSource,
}

impl Loader {
    pub fn new(source: DataSource) -> Self {
        Self { source }
    }

    /// Fetch the size tree and its companion info, then emit exactly one
    /// terminal message on `tx`.
    pub fn load(&self, tx: Sender<LoadMsg>) {
        match self.load_inner() {
            Ok((raw, info)) => {
                tracing::info!(entries = raw.len(), sep = %info.sep, "size tree loaded");
                let _ = tx.send(LoadMsg::Done { raw, info });
            }
            Err(e) => {
                tracing::error!(error = %e, "load failed");
                let _ = tx.send(LoadMsg::Error(e.to_string()));
            }
        }
    }

    fn load_inner(&self) -> Result<(RawSizeMap, Info), LoadError> {
        let source = self.source.clone();
        let info_worker = thread::spawn(move || fetch_info(&source));
        let raw = fetch_size_tree(&self.source)?;
        let info = info_worker.join().map_err(|_| LoadError::Worker)??;
        Ok((raw, info))
    }
}

fn fetch_size_tree(source: &DataSource) -> Result<RawSizeMap, LoadError> {
    match source {
        DataSource::Remote { base } => {
            let url = format!("{}/size_tree.json", base.trim_end_matches('/'));
            tracing::debug!(%url, "fetching size tree");
            // Timestamp query keeps intermediaries from serving a stale tree.
            let raw = reqwest::blocking::Client::new()
                .get(&url)
                .query(&[("t", chrono::Utc::now().timestamp_millis())])
                .send()?
                .error_for_status()?
                .json()?;
            Ok(raw)
        }
        DataSource::Local { dir } => {
            let path = dir.join("size_tree.json");
            tracing::debug!(path = %path.display(), "reading size tree");
            Ok(serde_json::from_slice(&fs::read(path)?)?)
        }
    }
}

fn fetch_info(source: &DataSource) -> Result<Info, LoadError> {
    match source {
        DataSource::Remote { base } => {
            let url = format!("{}/info", base.trim_end_matches('/'));
            tracing::debug!(%url, "fetching info");
            Ok(reqwest::blocking::get(&url)?.error_for_status()?.json()?)
        }
        DataSource::Local { dir } => {
            let path = dir.join("info.json");
            tracing::debug!(path = %path.display(), "reading info");
            Ok(serde_json::from_slice(&fs::read(path)?)?)
        }
    }
}
