//! Test utilities for guard-core
//!
//! This module provides a mock of the hosted database's REST interface that
//! can be used for development and integration tests. Tables live in memory
//! as JSON rows; the subset of PostgREST query syntax the client emits
//! (`eq`, `gte`, `lte`, `in`, `order`, `limit`) is honored.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::config::DatabaseConfig;
use crate::db::RemoteDb;
use crate::models::de::parse_datetime;

/// API key the mock accepts
pub const MOCK_API_KEY: &str = "test-service-key";

type Params = Vec<(String, String)>;

#[derive(Default)]
struct MockData {
    tables: HashMap<String, Vec<Value>>,
    rpc_calls: Vec<(String, Value)>,
    next_id: u64,
    fail_rpc: bool,
}

#[derive(Clone, Default)]
struct MockState {
    data: Arc<Mutex<MockData>>,
}

/// Mock remote database server for testing and development
pub struct MockRemoteDb {
    addr: SocketAddr,
    state: MockState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockRemoteDb {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/rest/v1/rpc/:function", post(handle_rpc))
            .route(
                "/rest/v1/:table",
                get(handle_select)
                    .post(handle_insert)
                    .patch(handle_update)
                    .delete(handle_delete),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Connection settings pointing at this server
    pub fn config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url(),
            api_key: MOCK_API_KEY.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Client connected to this server
    pub fn client(&self) -> RemoteDb {
        RemoteDb::new(&self.config()).unwrap()
    }

    /// Append rows to a table
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut data = self.state.data.lock().unwrap();
        data.tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Current contents of a table
    pub fn rows(&self, table: &str) -> Vec<Value> {
        let data = self.state.data.lock().unwrap();
        data.tables.get(table).cloned().unwrap_or_default()
    }

    /// Stored procedure calls received so far, as (function, params)
    pub fn rpc_calls(&self) -> Vec<(String, Value)> {
        self.state.data.lock().unwrap().rpc_calls.clone()
    }

    /// Make every stored procedure call fail with a 500
    pub fn fail_rpc(&self, fail: bool) {
        self.state.data.lock().unwrap().fail_rpc = fail;
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockRemoteDb {
    fn drop(&mut self) {
        self.stop();
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// Both the `apikey` header and the bearer token must carry the key
fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if apikey == Some(MOCK_API_KEY) && bearer == Some(MOCK_API_KEY) {
        Ok(())
    } else {
        Err(error_response(StatusCode::UNAUTHORIZED, "Invalid API key"))
    }
}

async fn handle_select(
    State(state): State<MockState>,
    Path(table): Path<String>,
    Query(params): Query<Params>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let data = state.data.lock().unwrap();
    let mut rows: Vec<Value> = data
        .tables
        .get(&table)
        .map(|rows| rows.iter().filter(|r| matches_all(r, &params)).cloned().collect())
        .unwrap_or_default();
    drop(data);

    if let Some((_, order)) = params.iter().find(|(k, _)| k == "order") {
        sort_rows(&mut rows, order);
    }
    if let Some(limit) = params
        .iter()
        .find(|(k, _)| k == "limit")
        .and_then(|(_, v)| v.parse::<usize>().ok())
    {
        rows.truncate(limit);
    }

    Json(Value::Array(rows)).into_response()
}

async fn handle_insert(
    State(state): State<MockState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let incoming = match body {
        Value::Array(rows) => rows,
        row @ Value::Object(_) => vec![row],
        _ => return error_response(StatusCode::BAD_REQUEST, "Body must be an object"),
    };

    let mut data = state.data.lock().unwrap();
    let mut inserted = Vec::with_capacity(incoming.len());
    for mut row in incoming {
        data.next_id += 1;
        let id = format!("{}-{}", table, data.next_id);
        if let Some(obj) = row.as_object_mut() {
            obj.entry("id").or_insert_with(|| json!(id));
            obj.entry("created_at")
                .or_insert_with(|| json!(Utc::now().to_rfc3339()));
        }
        inserted.push(row);
    }
    data.tables
        .entry(table)
        .or_default()
        .extend(inserted.iter().cloned());

    (StatusCode::CREATED, Json(Value::Array(inserted))).into_response()
}

async fn handle_update(
    State(state): State<MockState>,
    Path(table): Path<String>,
    Query(params): Query<Params>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    let Some(changes) = body.as_object() else {
        return error_response(StatusCode::BAD_REQUEST, "Body must be an object");
    };

    let mut data = state.data.lock().unwrap();
    let mut updated = Vec::new();
    if let Some(rows) = data.tables.get_mut(&table) {
        for row in rows.iter_mut().filter(|r| matches_all(r, &params)) {
            if let Some(obj) = row.as_object_mut() {
                for (key, value) in changes {
                    obj.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
    }

    Json(Value::Array(updated)).into_response()
}

async fn handle_delete(
    State(state): State<MockState>,
    Path(table): Path<String>,
    Query(params): Query<Params>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let mut data = state.data.lock().unwrap();
    if let Some(rows) = data.tables.get_mut(&table) {
        rows.retain(|r| !matches_all(r, &params));
    }

    StatusCode::NO_CONTENT.into_response()
}

/// Stored procedures; `adjust_account_balance` updates the accounts table
async fn handle_rpc(
    State(state): State<MockState>,
    Path(function): Path<String>,
    headers: HeaderMap,
    Json(params): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let mut data = state.data.lock().unwrap();
    data.rpc_calls.push((function.clone(), params.clone()));
    if data.fail_rpc {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "rpc failed");
    }

    match function.as_str() {
        "adjust_account_balance" => {
            let account_id = params["account_id_param"].as_str().unwrap_or_default();
            let amount = params["amount_param"].as_f64().unwrap_or_default();
            if let Some(account) = data
                .tables
                .get_mut("accounts")
                .and_then(|rows| rows.iter_mut().find(|r| r["id"] == json!(account_id)))
            {
                let balance = account["balance"].as_f64().unwrap_or_default();
                account["balance"] = json!(balance + amount);
            }
            Json(Value::Null).into_response()
        }
        _ => error_response(
            StatusCode::NOT_FOUND,
            &format!("Could not find the function {}", function),
        ),
    }
}

/// Every `column=op.value` filter and `or=(..)` group matches the row
fn matches_all(row: &Value, params: &Params) -> bool {
    params
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "select" | "order" | "limit"))
        .all(|(key, filter)| match key.as_str() {
            "or" => matches_any(row, filter),
            column => matches_filter(row.get(column), filter),
        })
}

/// `(col.op.value,col.op.value)`: at least one condition holds
fn matches_any(row: &Value, conditions: &str) -> bool {
    parse_in_list(conditions).iter().any(|condition| {
        condition
            .split_once('.')
            .is_some_and(|(column, filter)| matches_filter(row.get(column), filter))
    })
}

fn matches_filter(value: Option<&Value>, filter: &str) -> bool {
    let Some((op, expected)) = filter.split_once('.') else {
        return false;
    };
    let actual = value.map(cell_text).unwrap_or_else(|| "null".to_string());

    match op {
        "eq" | "is" => actual == expected,
        "gte" => compare_cells(&actual, expected) != Ordering::Less,
        "lte" => compare_cells(&actual, expected) != Ordering::Greater,
        "in" => parse_in_list(expected).iter().any(|v| *v == actual),
        _ => false,
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Numbers compare numerically, dates chronologically, anything else as text
fn compare_cells(a: &str, b: &str) -> Ordering {
    if let (Ok(x), Ok(y)) = (a.parse::<f64>(), b.parse::<f64>()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if let (Some(x), Some(y)) = (parse_datetime(a), parse_datetime(b)) {
        return x.cmp(&y);
    }
    a.cmp(b)
}

/// `("a","b,c")` -> `["a", "b,c"]`
fn parse_in_list(list: &str) -> Vec<String> {
    let inner = list.trim_start_matches('(').trim_end_matches(')');
    let mut values = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' if quoted => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '"' => quoted = !quoted,
            ',' if !quoted => values.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !inner.is_empty() {
        values.push(current);
    }
    values
}

fn sort_rows(rows: &mut [Value], order: &str) {
    let keys: Vec<(&str, bool)> = order
        .split(',')
        .filter_map(|key| key.rsplit_once('.'))
        .map(|(column, direction)| (column, direction != "desc"))
        .collect();

    rows.sort_by(|a, b| {
        for (column, ascending) in &keys {
            let x = a.get(*column).map(cell_text).unwrap_or_default();
            let y = b.get(*column).map(cell_text).unwrap_or_default();
            let ordering = compare_cells(&x, &y);
            if ordering != Ordering::Equal {
                return if *ascending { ordering } else { ordering.reverse() };
            }
        }
        Ordering::Equal
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_in_list() {
        assert_eq!(parse_in_list("(\"a\",\"b,c\")"), vec!["a", "b,c"]);
        assert_eq!(parse_in_list("(x,y)"), vec!["x", "y"]);
        assert!(parse_in_list("()").is_empty());
    }

    #[test]
    fn test_filters() {
        let row = json!({"date": "2024-01-15T10:00:00Z", "month": 3, "note": null});
        assert!(matches_filter(row.get("date"), "gte.2024-01-01"));
        assert!(matches_filter(row.get("date"), "lte.2024-01-31T23:59:59.999Z"));
        assert!(!matches_filter(row.get("date"), "gte.2024-02-01T00:00:00+00:00"));
        assert!(matches_filter(row.get("month"), "eq.3"));
        assert!(matches_filter(row.get("note"), "eq.null"));
    }

    #[test]
    fn test_or_group_and_is_null() {
        let global = json!({"id": "c1", "name": "Food"});
        let own = json!({"id": "c2", "user_id": "u1"});
        let other = json!({"id": "c3", "user_id": "u2"});
        let group = "(user_id.is.null,user_id.eq.u1)";

        assert!(matches_any(&global, group));
        assert!(matches_any(&own, group));
        assert!(!matches_any(&other, group));
    }

    #[test]
    fn test_sort_rows() {
        let mut rows = vec![json!({"n": 2}), json!({"n": 10}), json!({"n": 1})];
        sort_rows(&mut rows, "n.desc");
        assert_eq!(rows, vec![json!({"n": 10}), json!({"n": 2}), json!({"n": 1})]);
    }
}
