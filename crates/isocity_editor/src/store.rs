//! Map document persistence.
//!
//! The store is the editor's only persistence collaborator: it accepts a
//! whole map document and either writes it completely or not at all. A
//! document that fails validation is rejected before the target file is
//! touched, and the write itself goes through a temp file + rename so a
//! failure mid-write never leaves a truncated document behind.

use isocity_core::MapDocument;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug)]
pub enum StoreError {
    /// Document failed validation; nothing was written.
    InvalidDocument(String),
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::InvalidDocument(e) => write!(f, "Invalid map document: {}", e),
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
            StoreError::ParseError(e) => write!(f, "Parse error: {}", e),
            StoreError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Wire-shaped save result: `{"status": "success"|"error", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub status: String,
    pub message: String,
}

impl SaveResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Check the invariants every stored document must satisfy: a positive
/// size and every tile inside `0 <= x, y < size`.
pub fn validate_document(doc: &MapDocument) -> Result<(), StoreError> {
    if doc.size == 0 {
        return Err(StoreError::InvalidDocument("size must be at least 1".to_string()));
    }
    for tile in &doc.tiles {
        if tile.x < 0 || tile.y < 0 || tile.x as u32 >= doc.size || tile.y as u32 >= doc.size {
            return Err(StoreError::InvalidDocument(format!(
                "tile ({}, {}) outside grid of size {}",
                tile.x, tile.y, doc.size
            )));
        }
    }
    Ok(())
}

/// Load a map document from `path`.
pub fn load_document(path: &Path) -> Result<MapDocument, StoreError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| StoreError::IoError(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| StoreError::ParseError(e.to_string()))
}

/// Validate `doc` and write it to `path` atomically.
pub fn write_document(path: &Path, doc: &MapDocument) -> Result<(), StoreError> {
    validate_document(doc)?;

    let content = serde_json::to_string_pretty(doc)
        .map_err(|e| StoreError::SerializeError(e.to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::IoError(e.to_string()))?;
        }
    }

    // Write the whole document to a sibling temp file, then rename it over
    // the target so the target is never partially written.
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content).map_err(|e| StoreError::IoError(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| StoreError::IoError(e.to_string()))?;

    Ok(())
}

/// Write `doc` to `path`, folding the outcome into the wire response shape.
pub fn save_document(path: &Path, doc: &MapDocument) -> SaveResponse {
    match write_document(path, doc) {
        Ok(()) => SaveResponse::success("Map saved successfully!"),
        Err(e) => SaveResponse::error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isocity_core::TileRecord;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("isocity_store_{}_{}", std::process::id(), name))
    }

    fn sample_document() -> MapDocument {
        MapDocument {
            size: 2,
            tiles: vec![
                TileRecord {
                    x: 0,
                    y: 0,
                    ground: Some("A".to_string()),
                    ..Default::default()
                },
                TileRecord {
                    x: 1,
                    y: 1,
                    ground: Some("B".to_string()),
                    building: Some("C".to_string()),
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let path = temp_path("round_trip.json");
        let doc = sample_document();

        write_document(&path, &doc).expect("write succeeds");
        let loaded = load_document(&path).expect("load succeeds");
        assert_eq!(loaded, doc);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_out_of_bounds_without_writing() {
        let path = temp_path("reject.json");
        let good = sample_document();
        write_document(&path, &good).expect("write succeeds");

        let mut bad = sample_document();
        bad.tiles.push(TileRecord {
            x: 5,
            y: 0,
            ground: Some("X".to_string()),
            ..Default::default()
        });
        let err = write_document(&path, &bad).expect_err("invalid document rejected");
        assert!(matches!(err, StoreError::InvalidDocument(_)));

        // Target still holds the previous document.
        let loaded = load_document(&path).expect("load succeeds");
        assert_eq!(loaded, good);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_zero_size() {
        let doc = MapDocument { size: 0, tiles: vec![] };
        assert!(matches!(
            validate_document(&doc),
            Err(StoreError::InvalidDocument(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_document(&temp_path("does_not_exist.json")).expect_err("no file");
        assert!(matches!(err, StoreError::IoError(_)));
    }

    #[test]
    fn save_document_folds_into_response() {
        let path = temp_path("response.json");
        let response = save_document(&path, &sample_document());
        assert!(response.is_success());
        assert_eq!(response.message, "Map saved successfully!");

        let bad = MapDocument { size: 0, tiles: vec![] };
        let response = save_document(&path, &bad);
        assert!(!response.is_success());
        assert_eq!(response.status, "error");

        std::fs::remove_file(&path).ok();
    }
}
