use std::path::Path;

use serde_json::json;
use tokio::fs;

use super::table::Record;
use crate::error::IngestError;

/// Renders one `index` action line plus one document line per record.
pub fn build_bulk_payload(records: &[Record], index_name: &str) -> Result<String, IngestError> {
    let action = json!({"index": {"_index": index_name}}).to_string();
    let mut payload = String::new();
    for record in records {
        payload.push_str(&action);
        payload.push('\n');
        payload.push_str(&serde_json::to_string(record)?);
        payload.push('\n');
    }
    Ok(payload)
}

/// Keeps a copy of the exact request body on disk for debugging.
pub async fn write_inspection_copy(payload: &str, path: &Path) -> Result<(), IngestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| IngestError::io(parent, e))?;
        }
    }
    fs::write(path, payload)
        .await
        .map_err(|e| IngestError::io(path, e))
}
