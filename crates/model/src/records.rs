use serde_json::{Map, Value};

/// One record as returned by the paging API. The API omits null/empty
/// fields from the object entirely, so an absent key is the only null
/// signal a record carries.
pub type Record = Map<String, Value>;

#[cfg(test)]
pub fn record_from_json(json: &str) -> Record {
    serde_json::from_str(json).expect("valid record json")
}
