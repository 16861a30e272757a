//! Loading task records from JSON.
//!
//! The input is a JSON array of records with camelCase field names.
//! Unknown fields are ignored; a missing or `null` crew or dependency list
//! falls back to an empty one.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::TaskRecord;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read task records from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed task records: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn load_from_str(json: &str) -> Result<Vec<TaskRecord>, LoaderError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<TaskRecord>, LoaderError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load records from a JSON file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<TaskRecord>, LoaderError> {
    let path = path.as_ref();
    let result = File::open(path)
        .map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|file| load_from_reader(BufReader::new(file)));

    match &result {
        Ok(records) => {
            tracing::info!("Loaded {} task records from {}", records.len(), path.display())
        }
        Err(e) => tracing::error!("Failed to load task records from {}: {}", path.display(), e),
    }
    result
}
