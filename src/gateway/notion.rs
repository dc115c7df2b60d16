//! Notion Gateway
//!
//! `reqwest` implementation of `HabitGateway` against the Notion REST API.
//! Every request carries the same fixed header set; see `request`.

use async_trait::async_trait;
use reqwest::header::{CONNECTION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::traits::HabitGateway;
use crate::domain::{DomainError, DomainResult, RawBlock};

pub const NOTION_API_VERSION: &str = "2022-06-28";
pub const DEFAULT_BASE_ENDPOINT: &str = "https://api.notion.com/v1/";

#[derive(Deserialize)]
struct ResultList<T> {
    results: Vec<T>,
}

#[derive(Deserialize)]
struct ObjectRef {
    id: String,
}

#[derive(Clone)]
pub struct NotionGateway {
    client: Client,
    base: String,
    token: String,
}

impl NotionGateway {
    pub fn new(base_endpoint: &str, token: &str) -> DomainResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| DomainError::Transport(format!("Failed to build client: {}", e)))?;
        Ok(Self::with_client(client, base_endpoint, token))
    }

    pub fn with_client(client: Client, base_endpoint: &str, token: &str) -> Self {
        Self {
            client,
            base: base_endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn base_endpoint(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .header("Notion-Version", NOTION_API_VERSION)
            .header(CONNECTION, "close")
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> DomainResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DomainError::Transport(format!(
                "{} returned {}: {}",
                what,
                status.as_u16(),
                body
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| DomainError::Decode(format!("{} response: {}", what, e)))
    }
}

#[async_trait]
impl HabitGateway for NotionGateway {
    async fn resolve_database(&self, name_query: &str) -> DomainResult<String> {
        let body = json!({
            "query": name_query,
            "filter": {"value": "database", "property": "object"},
            "sort": {"direction": "ascending", "timestamp": "last_edited_time"}
        });
        let request = self.request(Method::POST, "search").json(&body);
        let found: ResultList<ObjectRef> = self.send_json(request, "search").await?;

        found
            .results
            .into_iter()
            .next()
            .map(|database| database.id)
            .ok_or_else(|| DomainError::NotFound(format!("no database matches \"{}\"", name_query)))
    }

    async fn list_pages(&self, database_id: &str) -> DomainResult<Vec<String>> {
        let request = self
            .request(Method::POST, &format!("databases/{}/query", database_id))
            .json(&json!({}));
        let pages: ResultList<ObjectRef> = self.send_json(request, "database query").await?;
        Ok(pages.results.into_iter().map(|page| page.id).collect())
    }

    async fn list_blocks(&self, page_id: &str) -> DomainResult<Vec<RawBlock>> {
        let request = self.request(Method::GET, &format!("blocks/{}/children", page_id));
        let blocks: ResultList<RawBlock> = self.send_json(request, "block children").await?;
        Ok(blocks.results)
    }

    async fn patch_checklist_item(&self, block_id: &str, checked: bool) -> DomainResult<()> {
        let response = self
            .request(Method::PATCH, &format!("blocks/{}", block_id))
            .json(&json!({"to_do": {"checked": checked}}))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(DomainError::RemoteRejected {
                status: status.as_u16(),
            }),
        }
    }
}
