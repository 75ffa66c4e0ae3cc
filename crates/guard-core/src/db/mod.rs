//! Remote database access layer
//!
//! The hosted database exposes tables and stored procedures over a
//! PostgREST-style REST interface. `RemoteDb` is an explicitly constructed
//! handle (cheap to clone) that the entry point builds once and passes to
//! every service.
//!
//! This module is organized by table:
//! - `goals` - Savings goals
//! - `accounts` - Money accounts
//! - `transactions` - Income/expense rows and the balance-adjusting RPC
//! - `subscriptions` - Recurring charges
//! - `envelopes` - Monthly budget envelopes
//! - `categories` - Global and personal categories
//! - `settings` - Per-user display preferences

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

mod accounts;
mod categories;
mod envelopes;
mod goals;
mod query;
mod settings;
mod subscriptions;
mod transaction_filter;
mod transactions;

pub use query::Query;
pub use transaction_filter::TransactionFilter;

/// Path prefix of the REST interface
const REST_PREFIX: &str = "/rest/v1";

/// Row body scoped to the owning user
#[derive(Serialize)]
struct Owned<'a, T: Serialize> {
    user_id: &'a str,
    #[serde(flatten)]
    row: &'a T,
}

/// Error body returned by the REST interface
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    message: Option<String>,
}

/// Handle to the hosted database
#[derive(Clone)]
pub struct RemoteDb {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for RemoteDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDb")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteDb {
    /// Build a client for the configured project
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Base URL of the project
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}{}/{}", self.base_url, REST_PREFIX, table)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Fetch rows matching `query`
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<T>> {
        debug!("GET {} {:?}", table, query);
        let response = self
            .request(Method::GET, self.table_url(table))
            .query(&query.params())
            .send()
            .await?;
        read_rows(response).await
    }

    /// Fetch the first row matching `query`
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
    ) -> Result<Option<T>> {
        let rows: Vec<T> = self.select(table, &query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row and return it as stored
    pub async fn insert<T, B>(&self, table: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("POST {}", table);
        let response = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = read_rows(response).await?;
        rows.into_iter().next().ok_or_else(|| Error::Remote {
            status: 200,
            message: format!("insert into {} returned no row", table),
        })
    }

    /// Insert a row owned by `user_id`
    pub async fn insert_owned<T, B>(&self, table: &str, user_id: &str, row: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.insert(table, &Owned { user_id, row }).await
    }

    /// Patch rows matching `query`; returns the first updated row
    pub async fn update<T, B>(&self, table: &str, query: &Query, body: &B) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("PATCH {} {:?}", table, query);
        let response = self
            .request(Method::PATCH, self.table_url(table))
            .query(&query.params())
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = read_rows(response).await?;
        Ok(rows.into_iter().next())
    }

    /// Delete rows matching `query`
    pub async fn delete(&self, table: &str, query: &Query) -> Result<()> {
        debug!("DELETE {} {:?}", table, query);
        let response = self
            .request(Method::DELETE, self.table_url(table))
            .query(&query.params())
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Call a stored procedure, discarding its result
    pub async fn rpc<B: Serialize + ?Sized>(&self, function: &str, params: &B) -> Result<()> {
        debug!("RPC {}", function);
        let response = self
            .request(Method::POST, self.table_url(&format!("rpc/{}", function)))
            .json(params)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Decode a successful response body; malformed rows surface as `Error::Json`
async fn read_rows<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = check_status(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Turn a non-2xx response into `Error::Remote`
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RemoteErrorBody>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or(body);

    Err(Error::Remote {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests;
