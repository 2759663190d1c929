use serde::{Deserialize, Serialize};

/// Identifies one externally hosted dataset. Owned by the catalog; the
/// engine treats it as read-only input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub name: String,
    pub api_id: String,
    pub provider: String,
}

impl DatasetDescriptor {
    pub fn new(name: &str, api_id: &str, provider: &str) -> Self {
        DatasetDescriptor {
            name: sanitize_name(name),
            api_id: api_id.to_string(),
            provider: sanitize_name(provider),
        }
    }
}

/// Strips every character outside `[A-Za-z0-9 ]`. Catalog names come from an
/// external report and routinely carry commas and quotes that would corrupt
/// downstream CSV rows and row ids.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_alphanumerics_and_spaces() {
        assert_eq!(
            sanitize_name("Crime Rates, 2017 (per 100,000)"),
            "Crime Rates 2017 per 100000"
        );
    }

    #[test]
    fn sanitize_passes_clean_names_through() {
        assert_eq!(sanitize_name("Toll Rates"), "Toll Rates");
    }

    #[test]
    fn descriptor_sanitizes_name_and_provider() {
        let desc = DatasetDescriptor::new("A&B Report", "abcd-1234", "Dept. of Planning");
        assert_eq!(desc.name, "AB Report");
        assert_eq!(desc.provider, "Dept of Planning");
        assert_eq!(desc.api_id, "abcd-1234");
    }
}
