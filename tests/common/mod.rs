//! Shared harness for the container-backed integration tests.
//!
//! Each test starts its own Postgres container, applies the embedded schema
//! and drives the full router with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

pub mod postgres;
pub mod runtime;

use anyhow::{Context, Result};
use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{
        HeaderMap, Method, Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use jobportal::api::{self, AuthConfig, AuthState};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use tower::ServiceExt;

use self::postgres::PostgresContainer;

const FRONTEND_BASE_URL: &str = "http://localhost:5173";
const JWT_SECRET: &str = "integration-test-secret";
const BODY_LIMIT: usize = 1024 * 1024;

pub struct TestApp {
    _postgres: PostgresContainer,
    pub pool: PgPool,
    router: Router,
}

impl TestApp {
    /// Start Postgres, apply the schema and build the application router.
    ///
    /// Callers check `runtime::ensure_container_runtime` first; every failure here
    /// is a test failure.
    pub async fn new() -> Result<Self> {
        let postgres = PostgresContainer::start().await?;
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&postgres.dsn())
            .await
            .context("failed to connect test pool")?;
        api::apply_schema(&pool).await?;

        let auth_state = Arc::new(AuthState::with_postgres(
            AuthConfig::new(FRONTEND_BASE_URL.to_string()),
            pool.clone(),
            &SecretString::from(JWT_SECRET.to_string()),
        ));
        let router = api::app(pool.clone(), auth_state)?;

        Ok(Self {
            _postgres: postgres,
            pool,
            router,
        })
    }

    /// Send one request and decode the JSON body (`Value::Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let (status, _headers, bytes) = self.send_raw(method, uri, token, body).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok((status, value))
    }

    /// Send one request and return the undecoded response.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, HeaderMap, Bytes)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await?;
        Ok((status, headers, bytes))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, token, Some(body)).await
    }
}

/// Pull `token` out of a signup or login response.
pub fn token_of(body: &Value) -> Result<String> {
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("response has no token")
}
