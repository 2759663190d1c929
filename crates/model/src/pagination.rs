use crate::records::Record;

/// Parameters for one paged request, derived fresh before each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub api_id: String,
    pub limit: usize,
    pub offset: usize,
    /// Records accumulated across all prior pages of this dataset. Drives
    /// the API convention of omitting `$offset` on the first page.
    pub cumulative: usize,
}

impl PageRequest {
    pub fn new(api_id: &str, limit: usize, offset: usize, cumulative: usize) -> Self {
        PageRequest {
            api_id: api_id.to_string(),
            limit,
            offset,
            cumulative,
        }
    }

    /// Request URL for this page. `$offset` is included only once the
    /// cumulative record count has reached the limit, matching the paging
    /// API's convention for follow-up pages.
    pub fn url(&self, root: &str) -> String {
        let root = root.trim_end_matches('/');
        if self.cumulative >= self.limit {
            format!(
                "{root}/{}.json?$limit={}&$offset={}",
                self.api_id, self.limit, self.offset
            )
        } else {
            format!("{root}/{}.json?$limit={}", self.api_id, self.limit)
        }
    }
}

/// Shape of one page, decided once at the API boundary. Downstream logic
/// never re-inspects the raw response.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Records(Vec<Record>),
    Empty,
    TransportError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "https://opendata.example.gov/resource";

    #[test]
    fn first_page_url_omits_offset() {
        let req = PageRequest::new("abcd-1234", 10000, 0, 0);
        assert_eq!(
            req.url(ROOT),
            "https://opendata.example.gov/resource/abcd-1234.json?$limit=10000"
        );
    }

    #[test]
    fn follow_up_page_url_carries_offset() {
        let req = PageRequest::new("abcd-1234", 10000, 10000, 10000);
        assert_eq!(
            req.url(ROOT),
            "https://opendata.example.gov/resource/abcd-1234.json?$limit=10000&$offset=10000"
        );
    }

    #[test]
    fn trailing_slash_on_root_is_tolerated() {
        let req = PageRequest::new("abcd-1234", 50, 0, 0);
        assert_eq!(
            req.url("https://opendata.example.gov/resource/"),
            "https://opendata.example.gov/resource/abcd-1234.json?$limit=50"
        );
    }
}
