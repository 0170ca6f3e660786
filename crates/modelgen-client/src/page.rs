//! Collection response envelope.

use serde::Deserialize;

/// One page of a collection response.
///
/// Octane wraps every collection in `{"total_count": n, "data": [...]}`.
///
/// # Examples
///
/// ```
/// use modelgen_client::Page;
///
/// let page: Page<serde_json::Value> =
///     serde_json::from_str(r#"{"total_count": 3, "data": [{}, {}]}"#).unwrap();
/// assert!(page.has_more(0));
/// assert!(!page.has_more(1));
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Total number of matching records, when the server reports it
    #[serde(default)]
    pub total_count: Option<usize>,
    /// Records of this page
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Returns `true` if records remain after this page.
    ///
    /// `offset` is the offset this page was requested with. An empty page
    /// always ends the scan.
    #[must_use]
    pub fn has_more(&self, offset: usize) -> bool {
        if self.data.is_empty() {
            return false;
        }
        self.total_count
            .is_some_and(|total| offset + self.data.len() < total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_page_without_total_count_ends_scan() {
        let page: Page<Value> = serde_json::from_str(r#"{"data": [{"id": "1"}]}"#).unwrap();
        assert!(!page.has_more(0));
    }

    #[test]
    fn test_empty_page_ends_scan() {
        let page: Page<Value> = serde_json::from_str(r#"{"total_count": 10, "data": []}"#).unwrap();
        assert!(!page.has_more(4));
    }
}
