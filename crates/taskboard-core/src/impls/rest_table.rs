//! RestTaskTable - ホスト型 BaaS（PostgREST 方言）のテーブル実装
//!
//! - `GET    /rest/v1/{table}?user_id=eq.{uid}&select=*`
//! - `POST   /rest/v1/{table}`
//! - `PATCH  /rest/v1/{table}?id=eq.{id}`
//! - `DELETE /rest/v1/{table}?id=eq.{id}`
//!
//! 認証は `apikey` ヘッダと Bearer トークン。行レベルのポリシーで弾かれた
//! 場合は 401/403 が返り、Permission に分類される。

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};

use crate::domain::{ErrorKind, TableError, UserId};
use crate::ports::{TaskChanges, TaskRow, TaskTable};

pub const DEFAULT_TABLE: &str = "tasks";

pub struct RestTaskTable {
    client: reqwest::Client,
    base_url: String,
    table: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestTaskTable {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            table: DEFAULT_TABLE.to_string(),
            api_key: api_key.into(),
            access_token: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// The signed-in user's access token. Without it, the api key is sent as
    /// the bearer token and only anonymous policies apply.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        self.client
            .request(method, self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TableError> {
        let response = request
            .send()
            .await
            .map_err(|e| TableError::transient(format!("request to {} failed: {e}", self.table)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TableError::new(
            classify_status(status),
            format!("HTTP {status}: {body}"),
        ))
    }
}

/// PostgREST equality filter value.
pub fn eq_filter(value: &str) -> String {
    format!("eq.{value}")
}

pub fn classify_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Permission,
        s if s.is_client_error() => ErrorKind::Rejected,
        _ => ErrorKind::Transient,
    }
}

#[async_trait]
impl TaskTable for RestTaskTable {
    async fn select_for_user(&self, user_id: &UserId) -> Result<Vec<TaskRow>, TableError> {
        let request = self.request(Method::GET).query(&[
            ("user_id", eq_filter(user_id.as_str())),
            ("select", "*".to_string()),
        ]);
        self.send(request)
            .await?
            .json::<Vec<TaskRow>>()
            .await
            .map_err(|e| TableError::malformed(format!("cannot decode rows: {e}")))
    }

    async fn insert(&self, row: TaskRow) -> Result<(), TableError> {
        let request = self
            .request(Method::POST)
            .header("Prefer", "return=minimal")
            .json(&row);
        self.send(request).await.map(drop)
    }

    async fn update_by_id(&self, id: &str, changes: TaskChanges) -> Result<(), TableError> {
        let request = self
            .request(Method::PATCH)
            .header("Prefer", "return=minimal")
            .query(&[("id", eq_filter(id))])
            .json(&changes);
        self.send(request).await.map(drop)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), TableError> {
        let request = self
            .request(Method::DELETE)
            .query(&[("id", eq_filter(id))]);
        self.send(request).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED, ErrorKind::Permission)]
    #[case(StatusCode::FORBIDDEN, ErrorKind::Permission)]
    #[case(StatusCode::CONFLICT, ErrorKind::Rejected)]
    #[case(StatusCode::BAD_REQUEST, ErrorKind::Rejected)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Transient)]
    #[case(StatusCode::BAD_GATEWAY, ErrorKind::Transient)]
    fn statuses_map_to_error_kinds(#[case] status: StatusCode, #[case] kind: ErrorKind) {
        assert_eq!(classify_status(status), kind);
    }

    #[test]
    fn endpoint_joins_base_and_table() {
        let table = RestTaskTable::new("https://example.supabase.co/", "anon");
        assert_eq!(table.endpoint(), "https://example.supabase.co/rest/v1/tasks");

        let table = table.with_table("board_tasks");
        assert_eq!(table.endpoint(), "https://example.supabase.co/rest/v1/board_tasks");
    }

    #[test]
    fn filters_use_postgrest_syntax() {
        assert_eq!(eq_filter("u1"), "eq.u1");
    }

    #[test]
    fn request_carries_auth_headers() {
        let table = RestTaskTable::new("http://localhost:54321", "anon").with_access_token("jwt");
        let request = table.request(Method::GET).build().unwrap();
        assert_eq!(request.headers()["apikey"], "anon");
        assert_eq!(request.headers()["authorization"], "Bearer jwt");
        assert_eq!(request.url().path(), "/rest/v1/tasks");
    }
}
