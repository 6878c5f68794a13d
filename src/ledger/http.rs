// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reqwest-backed ledger client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{
    Balance, LedgerClient, LedgerError, LedgerTransaction, LedgerUser, RankingBoard, TransferAck,
};
use crate::{
    auth::Role,
    models::{ActivityDraft, LoginRequest},
    transfer::TransferRequest,
};

/// Error body shape used by the backend for non-2xx answers.
#[derive(Debug, Deserialize)]
struct BackendMessage {
    #[serde(default)]
    message: Option<String>,
}

/// Ledger client talking JSON over HTTP to `BACKEND_URL`.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    base_url: Url,
    http: Client,
}

impl HttpLedgerClient {
    /// Build a client whose every call is bounded by `timeout`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, LedgerError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, LedgerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LedgerError::InvalidResponse(format!(
                    "backend URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and return the raw 2xx body.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Vec<u8>, LedgerError> {
        let path = url.path().to_string();
        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;

        debug!(%method, path = %path, status = status.as_u16(), "ledger call completed");

        if !status.is_success() {
            return Err(rejection(status, &bytes));
        }

        Ok(bytes.to_vec())
    }

    async fn send_json<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, LedgerError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let path = url.path().to_string();
        let bytes = self.send(method.clone(), url, body).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| LedgerError::InvalidResponse(format!("{method} {path} invalid JSON: {e}")))
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<LedgerUser, LedgerError> {
        let url = self.endpoint(&["login"])?;
        self.send_json(Method::POST, url, Some(credentials)).await
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<TransferAck, LedgerError> {
        let url = self.endpoint(&["transfer"])?;
        let bytes = self.send(Method::POST, url, Some(request)).await?;
        // Any 2xx is an acknowledgement, whatever the body
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }

    async fn balance(&self, user_id: &str) -> Result<Balance, LedgerError> {
        let url = self.endpoint(&["users", user_id, "balance"])?;
        self.send_json(Method::GET, url, None::<&Value>).await
    }

    async fn transactions(&self, hash: &str) -> Result<Vec<LedgerTransaction>, LedgerError> {
        let url = self.endpoint(&["transactions", hash])?;
        self.send_json(Method::GET, url, None::<&Value>).await
    }

    async fn ranking(&self, board: RankingBoard) -> Result<Value, LedgerError> {
        let url = self.endpoint(&[board.collection(), "ranking"])?;
        self.send_json(Method::GET, url, None::<&Value>).await
    }

    async fn sign_up(&self, role: Role, body: &Value) -> Result<Value, LedgerError> {
        let collection = match role {
            Role::Student => "users",
            Role::Club => "clubs",
        };
        let url = self.endpoint(&[collection])?;
        self.send_json(Method::POST, url, Some(body)).await
    }

    async fn list_activities(&self, club_id: Option<&str>) -> Result<Value, LedgerError> {
        let mut url = self.endpoint(&["activities"])?;
        if let Some(club_id) = club_id {
            url.query_pairs_mut().append_pair("club_id", club_id);
        }
        self.send_json(Method::GET, url, None::<&Value>).await
    }

    async fn create_activity(&self, draft: &ActivityDraft) -> Result<Value, LedgerError> {
        let url = self.endpoint(&["activities"])?;
        self.send_json(Method::POST, url, Some(draft)).await
    }

    async fn update_activity(
        &self,
        id: &str,
        draft: &ActivityDraft,
    ) -> Result<Value, LedgerError> {
        let url = self.endpoint(&["activities", id])?;
        self.send_json(Method::PUT, url, Some(draft)).await
    }

    async fn delete_activity(&self, id: &str) -> Result<Value, LedgerError> {
        let url = self.endpoint(&["activities", id])?;
        let bytes = self.send(Method::DELETE, url, None::<&Value>).await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| LedgerError::InvalidResponse(format!("DELETE activity invalid JSON: {e}")))
    }

    async fn probe(&self) -> Result<(), LedgerError> {
        self.http
            .get(self.base_url.clone())
            .send()
            .await
            .map(|_| ())
            .map_err(map_transport_error)
    }
}

fn map_transport_error(error: reqwest::Error) -> LedgerError {
    if error.is_timeout() {
        LedgerError::Timeout(error.to_string())
    } else {
        LedgerError::Transport(error.to_string())
    }
}

/// Build a rejection, keeping the backend's `message` when the body has one.
fn rejection(status: StatusCode, body: &[u8]) -> LedgerError {
    let message = serde_json::from_slice::<BackendMessage>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    LedgerError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::TransferRequest;
    use axum::{
        extract::{Path, Query},
        http::StatusCode as AxumStatus,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    /// Serve `app` on an ephemeral port and return a client pointed at it.
    async fn client_for(app: Router, timeout: Duration) -> HttpLedgerClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let base = Url::parse(&format!("http://{addr}/")).unwrap();
        HttpLedgerClient::new(base, timeout).unwrap()
    }

    fn sample_request() -> TransferRequest {
        TransferRequest {
            sender_hash: "club_sada".to_string(),
            receiver_hash: "stu_hash_abc".to_string(),
            amount: 500,
            title: "Event participation reward".to_string(),
            transaction_type: None,
        }
    }

    #[test]
    fn endpoint_encodes_path_segments() {
        let client = HttpLedgerClient::new(
            Url::parse("http://ledger.local/api/").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        let url = client.endpoint(&["transactions", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://ledger.local/api/transactions/a%2Fb%20c");
    }

    #[test]
    fn rejection_falls_back_when_body_has_no_message() {
        let err = rejection(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert_eq!(
            err,
            LedgerError::Rejected {
                status: 500,
                message: None
            }
        );
    }

    #[tokio::test]
    async fn transfer_posts_wire_body_and_reads_ack() {
        let app = Router::new().route(
            "/transfer",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["sender_hash"], "club_sada");
                assert_eq!(body["receiver_hash"], "stu_hash_abc");
                assert_eq!(body["amount"], 500);
                Json(json!({"success": true, "message": "ok"}))
            }),
        );
        let client = client_for(app, Duration::from_secs(5)).await;

        let ack = client.transfer(&sample_request()).await.unwrap();
        assert_eq!(ack.success, Some(true));
        assert_eq!(ack.message.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn transfer_rejection_carries_backend_message() {
        let app = Router::new().route(
            "/transfer",
            post(|| async {
                (
                    AxumStatus::NOT_FOUND,
                    Json(json!({"message": "user not found"})),
                )
            }),
        );
        let client = client_for(app, Duration::from_secs(5)).await;

        let err = client.transfer(&sample_request()).await.unwrap_err();
        assert_eq!(
            err,
            LedgerError::Rejected {
                status: 404,
                message: Some("user not found".to_string())
            }
        );
    }

    #[tokio::test]
    async fn slow_backend_is_reported_as_timeout() {
        let app = Router::new().route(
            "/transfer",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"success": true}))
            }),
        );
        let client = client_for(app, Duration::from_millis(100)).await;

        let err = client.transfer(&sample_request()).await.unwrap_err();
        assert!(matches!(err, LedgerError::Timeout(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpLedgerClient::new(
            Url::parse(&format!("http://{addr}/")).unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.balance("20231234").await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }

    #[tokio::test]
    async fn balance_and_activity_queries_hit_expected_paths() {
        let app = Router::new()
            .route(
                "/users/{id}/balance",
                get(|Path(id): Path<String>| async move {
                    assert_eq!(id, "20231234");
                    Json(json!({"balance": 1500}))
                }),
            )
            .route(
                "/activities",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    Json(json!([{"id": 1, "club_id": q.get("club_id")}]))
                }),
            );
        let client = client_for(app, Duration::from_secs(5)).await;

        let balance = client.balance("20231234").await.unwrap();
        assert_eq!(balance.balance, 1500.0);

        let list = client.list_activities(Some("sada")).await.unwrap();
        assert_eq!(list[0]["club_id"], "sada");
    }
}
