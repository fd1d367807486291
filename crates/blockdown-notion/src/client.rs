//! Blocking Notion REST client.

use std::time::Duration;

use blockdown::{BlockPage, BlockSource, SourceError};
use tracing::debug;

use crate::config::ApiSettings;
use crate::parser::parse_blocks_pagination;

/// [`BlockSource`] backed by `GET /v1/blocks/{id}/children`
pub struct NotionClient {
    agent: ureq::Agent,
    token: String,
    base_url: String,
    notion_version: String,
    page_size: u32,
}

impl NotionClient {
    pub fn new(token: impl Into<String>, api: &ApiSettings) -> Self {
        Self {
            agent: agent(api),
            token: token.into(),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            notion_version: api.notion_version.clone(),
            page_size: api.page_size.clamp(1, 100),
        }
    }

    fn children_url(&self, block_id: &str) -> String {
        format!("{}/blocks/{}/children", self.base_url, block_id)
    }
}

impl BlockSource for NotionClient {
    fn list_children(&self, block_id: &str, cursor: Option<&str>) -> Result<BlockPage, SourceError> {
        let url = self.children_url(block_id);
        debug!(block = block_id, cursor = cursor.unwrap_or(""), "listing children");

        let mut request = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Notion-Version", &self.notion_version)
            .query("page_size", &self.page_size.to_string());
        if let Some(cursor) = cursor {
            request = request.query("start_cursor", cursor);
        }

        let body = request
            .call()
            .map_err(source_error)?
            .into_string()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        parse_blocks_pagination(&body)
    }
}

pub(crate) fn agent(api: &ApiSettings) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(api.timeout_secs))
        .user_agent(concat!("blockdown/", env!("CARGO_PKG_VERSION")))
        .build()
}

fn source_error(err: ureq::Error) -> SourceError {
    match err {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_string()
                .ok()
                .and_then(|body| api_message(&body))
                .unwrap_or_else(|| format!("HTTP {}", status));
            SourceError::Api { status, message }
        }
        ureq::Error::Transport(transport) => SourceError::Transport(transport.to_string()),
    }
}

/// `message` of a Notion error object
fn api_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}
