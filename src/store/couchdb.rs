// Copyright 2025 The Drasi Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CouchDB implementation of [`DocumentStore`].

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::error::{ErrorBody, StoreError};
use super::{DocumentStore, StoredDocument, ViewParams, ViewResponse, DESIGN_PREFIX};

/// Client for the CouchDB HTTP API.
///
/// Cheap to share: the underlying `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct CouchDbClient {
    client: Client,
    base_url: Url,
    credentials: Option<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct RevisionResponse {
    rev: String,
}

impl CouchDbClient {
    /// Build a client for the server at `host:port` without contacting it.
    ///
    /// `host` may carry an `http://` or `https://` scheme; plain hosts use
    /// `http`. `connect_timeout` bounds the TCP handshake of every request.
    pub fn new(host: &str, port: u16, connect_timeout: Duration) -> Result<Self, StoreError> {
        let raw = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}:{port}/", host.trim_end_matches('/'))
        } else {
            format!("http://{host}:{port}/")
        };
        let base_url = Url::parse(&raw).map_err(|_| StoreError::InvalidUrl(raw.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(raw));
        }

        let client = Client::builder().connect_timeout(connect_timeout).build()?;

        Ok(Self {
            client,
            base_url,
            credentials: None,
        })
    }

    /// Build a client and verify that the server answers.
    pub async fn connect(
        host: &str,
        port: u16,
        connect_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Self::new(host, port, connect_timeout)?;
        client.ping().await?;
        Ok(client)
    }

    /// Authenticate every request with HTTP basic auth.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Request the server's welcome document.
    ///
    /// Transport failures are reported as [`StoreError::Unavailable`].
    pub async fn ping(&self) -> Result<(), StoreError> {
        let url = self.url(&[]);
        let response = self
            .authorize(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|source| StoreError::Unavailable {
                url: url.to_string(),
                source,
            })?;
        Self::check(response).await?;
        debug!("CouchDB at {url} is reachable");
        Ok(())
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Path segments of a document id. Design documents keep their slash.
    fn doc_segments<'a>(db: &'a str, id: &'a str) -> Vec<&'a str> {
        match id.strip_prefix(DESIGN_PREFIX) {
            Some(name) => vec![db, "_design", name],
            None => vec![db, id],
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((username, password)) => builder.basic_auth(username, Some(password)),
            None => builder,
        }
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response, StoreError> {
        self.send_builder(self.client.request(method, url)).await
    }

    async fn send_builder(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = self.authorize(builder).send().await?;
        Self::check(response).await
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        Err(StoreError::from_status(status.as_u16(), body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DocumentStore for CouchDbClient {
    async fn list_databases(&self) -> Result<Vec<String>, StoreError> {
        debug!("Listing CouchDB databases");
        let response = self.send(Method::GET, self.url(&["_all_dbs"])).await?;
        Self::decode(response).await
    }

    async fn create_database(&self, name: &str) -> Result<(), StoreError> {
        debug!("Creating CouchDB database '{name}'");
        self.send(Method::PUT, self.url(&[name])).await?;
        Ok(())
    }

    async fn delete_database(&self, name: &str) -> Result<(), StoreError> {
        debug!("Deleting CouchDB database '{name}'");
        self.send(Method::DELETE, self.url(&[name])).await?;
        Ok(())
    }

    async fn read(&self, db: &str, id: &str) -> Result<StoredDocument, StoreError> {
        debug!("Reading document '{id}' from '{db}'");
        let url = self.url(&Self::doc_segments(db, id));
        let response = self.send(Method::GET, url).await?;
        let body: Value = Self::decode(response).await?;
        let rev = body
            .get("_rev")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                <serde_json::Error as serde::de::Error>::custom(format!(
                    "document '{id}' has no _rev"
                ))
            })?;
        Ok(StoredDocument { rev, body })
    }

    async fn save(
        &self,
        db: &str,
        id: &str,
        body: &Value,
        rev: Option<&str>,
    ) -> Result<String, StoreError> {
        debug!("Saving document '{id}' to '{db}'");
        let mut url = self.url(&Self::doc_segments(db, id));
        if let Some(rev) = rev {
            url.query_pairs_mut().append_pair("rev", rev);
        }
        let response = self
            .send_builder(self.client.put(url).json(body))
            .await?;
        let saved: RevisionResponse = Self::decode(response).await?;
        Ok(saved.rev)
    }

    async fn delete(&self, db: &str, id: &str, rev: &str) -> Result<String, StoreError> {
        debug!("Deleting document '{id}' from '{db}'");
        let mut url = self.url(&Self::doc_segments(db, id));
        url.query_pairs_mut().append_pair("rev", rev);
        let response = self.send(Method::DELETE, url).await?;
        let deleted: RevisionResponse = Self::decode(response).await?;
        Ok(deleted.rev)
    }

    async fn query_view(
        &self,
        db: &str,
        design: &str,
        view: &str,
        params: &ViewParams,
    ) -> Result<ViewResponse, StoreError> {
        debug!("Querying view '{design}/{view}' in '{db}'");
        let mut url = self.url(&[db, "_design", design, "_view", view]);
        {
            let pairs = params.to_query_pairs();
            if !pairs.is_empty() {
                let mut query = url.query_pairs_mut();
                for (key, value) in pairs {
                    query.append_pair(key, &value);
                }
            }
        }
        let response = self.send(Method::GET, url).await?;
        Self::decode(response).await
    }
}
