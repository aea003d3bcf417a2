//! Task store backed by the hosted Tasks REST API (v1).
//!
//! Only the endpoints the dashboard needs are wrapped. The access token is
//! taken as-is from configuration; obtaining or refreshing it happens
//! elsewhere.
//!
//! Sorting happens client-side after each listing, as the API returns
//! records in its own order.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::provider::{StoreError, TaskStore};
use super::sort::{SortKey, sort_items, sort_lists};
use super::types::{ItemQuery, ItemRecord, ItemStatus, ListRecord, NewItem};

pub const DEFAULT_BASE_URL: &str = "https://tasks.googleapis.com/tasks/v1";

/// Envelope used by every collection endpoint. `items` is omitted when empty.
#[derive(Deserialize, Debug)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Serialize, Debug)]
struct ListBody<'a> {
    title: &'a str,
}

#[derive(Serialize, Debug)]
struct StatusPatch {
    status: ItemStatus,
    /// Clearing the completion timestamp is required when reopening a task.
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<Option<String>>,
}

pub struct HttpStore {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: Option<String>, access_token: String) -> Result<Self, StoreError> {
        if access_token.trim().is_empty() {
            return Err(StoreError::Config(
                "no access token configured (set GTASKS_ACCESS_TOKEN or [http] access_token, or use --offline)"
                    .to_string(),
            ));
        }
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        info!("HTTP task store using {}", base_url);
        Ok(Self {
            base_url,
            access_token,
            client: reqwest::Client::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        debug!("Tasks API response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Tasks API error: {} - {}", status, err_body);
            return Err(StoreError::Api {
                status,
                message: err_body,
            });
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn patch_status(
        &self,
        list_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<ItemRecord, StoreError> {
        let patch = StatusPatch {
            status,
            completed: (!status.is_completed()).then_some(None),
        };
        let request = self
            .client
            .patch(self.url(&format!("/lists/{list_id}/tasks/{item_id}")))
            .json(&patch);
        self.fetch(request).await
    }
}

#[async_trait]
impl TaskStore for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_lists(&self, sort: SortKey) -> Result<Vec<ListRecord>, StoreError> {
        let request = self.client.get(self.url("/users/@me/lists"));
        let mut lists = self.fetch::<Collection<ListRecord>>(request).await?.items;
        // Per-list open counts would cost one request per list
        sort_lists(&mut lists, sort, |_| 0);
        Ok(lists)
    }

    async fn create_list(&self, title: &str) -> Result<ListRecord, StoreError> {
        let request = self
            .client
            .post(self.url("/users/@me/lists"))
            .json(&ListBody { title });
        self.fetch(request).await
    }

    async fn get_list(&self, list_id: &str) -> Result<ListRecord, StoreError> {
        let request = self
            .client
            .get(self.url(&format!("/users/@me/lists/{list_id}")));
        self.fetch(request).await
    }

    async fn delete_list(&self, list_id: &str) -> Result<(), StoreError> {
        let request = self
            .client
            .delete(self.url(&format!("/users/@me/lists/{list_id}")));
        self.send(request).await.map(|_| ())
    }

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<ItemRecord>, StoreError> {
        let request = self
            .client
            .get(self.url(&format!("/lists/{}/tasks", query.list_id)))
            .query(&[
                ("showCompleted", query.include_completed.to_string()),
                ("showHidden", query.include_hidden.to_string()),
            ]);
        let mut items = self.fetch::<Collection<ItemRecord>>(request).await?.items;
        sort_items(&mut items, query.sort);
        Ok(items)
    }

    async fn create_item(&self, list_id: &str, item: &NewItem) -> Result<ItemRecord, StoreError> {
        let request = self
            .client
            .post(self.url(&format!("/lists/{list_id}/tasks")))
            .json(item);
        self.fetch(request).await
    }

    async fn complete_item(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<ItemRecord, StoreError> {
        self.patch_status(list_id, item_id, ItemStatus::Completed)
            .await
    }

    async fn uncomplete_item(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<ItemRecord, StoreError> {
        self.patch_status(list_id, item_id, ItemStatus::NeedsAction)
            .await
    }

    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<(), StoreError> {
        let request = self
            .client
            .delete(self.url(&format!("/lists/{list_id}/tasks/{item_id}")));
        self.send(request).await.map(|_| ())
    }
}
