//! Script page fetching and content-block extraction
//!
//! One fetch is exactly one GET: there are no retries, and a failed attempt
//! is terminal for its work item. The content block is located with
//! [`dom::find_all`] and a predicate requiring a non-empty element of the
//! configured tag, because the archive serves a placeholder container even
//! for unknown titles and only a non-empty container represents real
//! content.

use std::sync::Arc;

use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node};

use crate::config::Config;
use crate::dom;
use crate::error::{Result, ScrapeError};

/// A fetched script page with its located content block
///
/// Holds the parsed document plus the node id of the single content block.
/// `Html` is not `Send`, so a page must be flattened and dropped before the
/// owning task reaches its next await point.
#[derive(Debug)]
pub struct ScriptPage {
    html: Html,
    content_id: NodeId,
}

impl ScriptPage {
    /// The located content-block node
    pub fn content(&self) -> NodeRef<'_, Node> {
        // The id was taken from this page's own tree, so the lookup always
        // succeeds; the root fallback keeps the accessor infallible.
        self.html
            .tree
            .get(self.content_id)
            .unwrap_or_else(|| self.html.tree.root())
    }
}

/// Fetches script pages and extracts their content block
#[derive(Clone)]
pub struct ScriptFetcher {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl ScriptFetcher {
    /// Create a fetcher with the configured request timeout
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Build the request URL for a title
    ///
    /// Spaces become underscores (the archive's convention) and the result
    /// is percent-encoded as a single path segment.
    fn script_url(&self, title: &str) -> String {
        let formatted = title.replace(' ', "_");
        format!(
            "{}/{}.html",
            self.config.fetch.endpoint.trim_end_matches('/'),
            urlencoding::encode(&formatted)
        )
    }

    /// Fetch the page for `title` and locate its single content block
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Transport`] on connect/timeout/body-read failures
    /// - [`ScrapeError::UnexpectedStatus`] on any non-2xx response
    /// - [`ScrapeError::MatchCount`] when the page holds zero or more than
    ///   one non-empty content block
    pub async fn fetch(&self, title: &str) -> std::result::Result<ScriptPage, ScrapeError> {
        let url = self.script_url(title);

        tracing::debug!(title, url = %url, "fetching script page");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let html = Html::parse_document(&body);

        let content_tag = self.config.fetch.content_tag.as_str();
        let matches = dom::find_all(html.tree.root(), &|node: NodeRef<'_, Node>| {
            // Unknown titles still get a page with an empty container, so
            // only a container with children counts as content.
            node.value()
                .as_element()
                .is_some_and(|e| e.name() == content_tag)
                && node.children().next().is_some()
        });

        if matches.len() != 1 {
            return Err(ScrapeError::MatchCount {
                found: matches.len(),
            });
        }

        let content_id = matches[0].id();
        Ok(ScriptPage { html, content_id })
    }
}
