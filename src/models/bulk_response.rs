use serde_json::Value;

/// Top-level fields of a `_bulk` response. Items are counted, never inspected.
#[derive(Debug, Clone, Default)]
pub struct BulkResponse {
    took: Option<u64>,
    errors: bool,
    item_count: usize,
}

impl BulkResponse {
    pub fn new(json_value: &Value) -> Self {
        let took = json_value["took"].as_u64();
        let errors = json_value["errors"].as_bool().unwrap_or(false);
        let item_count = json_value["items"].as_array().map(Vec::len).unwrap_or(0);

        Self {
            took,
            errors,
            item_count,
        }
    }

    pub fn get_took(&self) -> Option<u64> {
        self.took
    }
    pub fn has_errors(&self) -> bool {
        self.errors
    }
    pub fn get_item_count(&self) -> usize {
        self.item_count
    }
}
