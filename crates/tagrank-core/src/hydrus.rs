//! Hydrus client API adapter
//!
//! Thin synchronous HTTP client implementing [`SearchProvider`] against a
//! running Hydrus instance. Only the three endpoints the ranking engine needs
//! are covered; failures map to [`TagrankError::Provider`] and are never
//! retried here.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, TagrankError};
use crate::provider::{FileId, PageKey, SearchProvider};

const ACCESS_KEY_HEADER: &str = "Hydrus-Client-API-Access-Key";

/// Hydrus sort type "import time"; the order is irrelevant to ranking but
/// keeps result pages stable for a human inspecting them.
const FILE_SORT_IMPORT_TIME: &str = "13";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Hydrus client API
pub struct HydrusClient {
    agent: ureq::Agent,
    api_url: String,
    access_key: String,
}

impl HydrusClient {
    pub fn new(api_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        HydrusClient {
            agent,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn post_json(&self, path: &str, body: serde_json::Value, operation: &str) -> Result<()> {
        self.agent
            .post(&self.endpoint(path))
            .set(ACCESS_KEY_HEADER, &self.access_key)
            .send_json(body)
            .map_err(|e| provider_error(operation, &e))?;
        Ok(())
    }
}

impl SearchProvider for HydrusClient {
    fn search_files(&self, query: &[String]) -> Result<Vec<FileId>> {
        // The API expects the predicate list as a JSON-encoded query parameter
        let tags = serde_json::to_string(query)?;

        let response = self
            .agent
            .get(&self.endpoint("/get_files/search_files"))
            .set(ACCESS_KEY_HEADER, &self.access_key)
            .query("tags", &tags)
            .query("file_sort_type", FILE_SORT_IMPORT_TIME)
            .call()
            .map_err(|e| provider_error("search_files", &e))?;

        let parsed: SearchFilesResponse = response
            .into_json()
            .map_err(|e| TagrankError::provider("search_files", e))?;
        Ok(parsed.file_ids)
    }

    fn locate_destination(&self, name: &str) -> Result<Option<PageKey>> {
        let response = self
            .agent
            .get(&self.endpoint("/manage_pages/get_pages"))
            .set(ACCESS_KEY_HEADER, &self.access_key)
            .call()
            .map_err(|e| provider_error("get_pages", &e))?;

        let parsed: GetPagesResponse = response
            .into_json()
            .map_err(|e| TagrankError::provider("get_pages", e))?;
        Ok(find_page_key(&parsed.pages, name).map(PageKey::new))
    }

    fn deliver(&self, destination: &PageKey, file_ids: &[FileId]) -> Result<()> {
        self.post_json(
            "/manage_pages/add_files",
            serde_json::json!({
                "page_key": destination.as_str(),
                "file_ids": file_ids,
            }),
            "add_files",
        )?;

        // Best-effort: bring the page to the front of the client
        if let Err(e) = self.post_json(
            "/manage_pages/focus_page",
            serde_json::json!({ "page_key": destination.as_str() }),
            "focus_page",
        ) {
            tracing::debug!(error = %e, "focus_page failed");
        }

        Ok(())
    }
}

fn provider_error(operation: &str, err: &ureq::Error) -> TagrankError {
    let reason = match err {
        ureq::Error::Status(code, _) => format!("HTTP {}", code),
        ureq::Error::Transport(t) => t.to_string(),
    };
    TagrankError::provider(operation, reason)
}

#[derive(Debug, Deserialize)]
struct SearchFilesResponse {
    file_ids: Vec<FileId>,
}

#[derive(Debug, Deserialize)]
struct GetPagesResponse {
    pages: PageNode,
}

/// One node of the client's page tree
#[derive(Debug, Deserialize)]
struct PageNode {
    #[serde(default)]
    name: String,
    #[serde(default)]
    page_key: String,
    #[serde(default)]
    pages: Vec<PageNode>,
}

/// Find the first page with the given name, in pre-order.
///
/// Explicit stack instead of recursion; the tree is user-shaped and its depth
/// is not under our control.
fn find_page_key<'a>(root: &'a PageNode, name: &str) -> Option<&'a str> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.name == name {
            return Some(&node.page_key);
        }
        // Reverse push keeps left-to-right visit order
        for child in node.pages.iter().rev() {
            stack.push(child);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> PageNode {
        serde_json::from_value(serde_json::json!({
            "name": "top pages notebook",
            "page_key": "root",
            "pages": [
                { "name": "inbox", "page_key": "k-inbox" },
                {
                    "name": "collections",
                    "page_key": "k-collections",
                    "pages": [
                        { "name": "archive", "page_key": "k-archive-nested" },
                        { "name": "misc", "page_key": "k-misc" }
                    ]
                },
                { "name": "archive", "page_key": "k-archive-late" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_find_page_key_preorder_first_match() {
        let root = tree();
        // The nested "archive" comes before the top-level one in pre-order
        assert_eq!(find_page_key(&root, "archive"), Some("k-archive-nested"));
        assert_eq!(find_page_key(&root, "inbox"), Some("k-inbox"));
        assert_eq!(find_page_key(&root, "misc"), Some("k-misc"));
    }

    #[test]
    fn test_find_page_key_missing() {
        let root = tree();
        assert_eq!(find_page_key(&root, "does-not-exist"), None);
    }

    #[test]
    fn test_page_tree_tolerates_missing_fields() {
        let root: PageNode = serde_json::from_value(serde_json::json!({
            "name": "top"
        }))
        .unwrap();
        assert_eq!(find_page_key(&root, "anything"), None);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = HydrusClient::new("http://127.0.0.1:45869/", "key");
        assert_eq!(
            client.endpoint("/get_files/search_files"),
            "http://127.0.0.1:45869/get_files/search_files"
        );
    }

    #[test]
    fn test_query_predicates_encode_as_json_array() {
        let query = vec!["elf".to_string(), "-gore".to_string()];
        let encoded = serde_json::to_string(&query).unwrap();
        assert_eq!(encoded, r#"["elf","-gore"]"#);
    }
}
