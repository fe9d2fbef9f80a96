//! GraphQL client and response envelope assertions.
//!
//! One [`GraphQLClient::query_with`] call is one HTTP round trip. Assertions on
//! the returned [`Envelope`] panic with the expected value, the actual value and
//! the full response body.

use axum::Router;
use axum_test::TestServer;
use serde_json::{Value, json};

use storefront_schema::users;

use crate::auth::force_login_token;
use crate::fixture::FixtureError;

pub const GRAPHQL_PATH: &str = "/graphql";

/// In-process client for the storefront GraphQL endpoint.
pub struct GraphQLClient {
    server: TestServer,
    token: Option<String>,
}

impl GraphQLClient {
    pub fn new(app: Router) -> Result<Self, FixtureError> {
        let server = TestServer::new(app).map_err(|e| FixtureError::Server(e.to_string()))?;
        Ok(Self {
            server,
            token: None,
        })
    }

    /// Send subsequent requests as `user`.
    pub fn force_login(&mut self, user: &users::Model) -> Result<(), FixtureError> {
        self.token = Some(force_login_token(user)?);
        Ok(())
    }

    /// Send subsequent requests with an arbitrary bearer token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn query(&self, query: &str) -> Envelope {
        self.query_with(query, Value::Null).await
    }

    pub async fn query_with(&self, query: &str, variables: Value) -> Envelope {
        let mut body = json!({ "query": query });
        if !variables.is_null() {
            body["variables"] = variables;
        }

        let mut request = self.server.post(GRAPHQL_PATH).json(&body);
        if let Some(token) = &self.token {
            request = request.authorization_bearer(token);
        }
        let response = request.await;
        Envelope::new(response.status_code().as_u16(), response.text())
    }

    /// Plain GET, for non-GraphQL routes such as `/readyz`.
    pub async fn get(&self, path: &str) -> (u16, String) {
        let response = self.server.get(path).await;
        (response.status_code().as_u16(), response.text())
    }
}

/// Decoded GraphQL response.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub status: u16,
    /// `Value::Null` when the body is not JSON.
    pub body: Value,
    pub raw: String,
}

impl Envelope {
    pub fn new(status: u16, raw: String) -> Self {
        let body = serde_json::from_str(&raw).unwrap_or(Value::Null);
        Self { status, body, raw }
    }

    /// Walk a dotted path such as `data.products.edges.0.node.id`.
    /// Missing segments yield `Value::Null`.
    pub fn at(&self, path: &str) -> &Value {
        path.split('.')
            .filter(|s| !s.is_empty())
            .fold(&self.body, |cur, seg| match seg.parse::<usize>() {
                Ok(i) if cur.is_array() => &cur[i],
                _ => &cur[seg],
            })
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// Top-level GraphQL errors, empty when absent.
    pub fn errors(&self) -> &[Value] {
        self.body["errors"].as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    /// `extensions.code` of every top-level error.
    pub fn error_codes(&self) -> Vec<&str> {
        self.errors()
            .iter()
            .filter_map(|e| e["extensions"]["code"].as_str())
            .collect()
    }

    /// `true` if any string inside `data` contains `needle` verbatim.
    pub fn echoes(&self, needle: &str) -> bool {
        contains_string(self.data(), needle)
    }

    pub fn assert_transport_ok(&self) -> &Self {
        assert_eq!(
            self.status, 200,
            "expected HTTP 200, got {}; body: {}",
            self.status, self.raw
        );
        assert!(
            self.body.is_object(),
            "expected a JSON object body; body: {}",
            self.raw
        );
        self
    }

    /// HTTP 200 with `data` and/or `errors` present.
    pub fn assert_well_formed(&self) -> &Self {
        self.assert_transport_ok();
        assert!(
            self.body.get("data").is_some() || self.body.get("errors").is_some(),
            "expected `data` or `errors` in envelope; body: {}",
            self.raw
        );
        self
    }

    pub fn assert_no_errors(&self) -> &Self {
        self.assert_transport_ok();
        assert!(
            self.errors().is_empty(),
            "expected no top-level errors, got {:?}; body: {}",
            self.errors(),
            self.raw
        );
        self
    }

    pub fn assert_has_errors(&self) -> &Self {
        self.assert_transport_ok();
        assert!(
            !self.errors().is_empty(),
            "expected top-level errors, got none; body: {}",
            self.raw
        );
        self
    }

    pub fn assert_error_code(&self, code: &str) -> &Self {
        self.assert_has_errors();
        assert!(
            self.error_codes().contains(&code),
            "expected top-level error code {code}, got {:?}; body: {}",
            self.error_codes(),
            self.raw
        );
        self
    }

    /// Mutation `payload` succeeded: present, with an empty `errors` list.
    pub fn assert_payload_ok(&self, payload: &str) -> &Self {
        self.assert_no_errors();
        let node = self.at(&format!("data.{payload}"));
        assert!(
            node.is_object(),
            "expected payload data.{payload}, got {node}; body: {}",
            self.raw
        );
        let errors = &node["errors"];
        assert!(
            errors.as_array().is_some_and(Vec::is_empty),
            "expected empty data.{payload}.errors, got {errors}; body: {}",
            self.raw
        );
        self
    }

    /// Mutation `payload` reported a user error on `field` with `code`.
    pub fn assert_payload_rejected(&self, payload: &str, field: &str, code: &str) -> &Self {
        self.assert_no_errors();
        let errors = self.at(&format!("data.{payload}.errors"));
        let found = errors.as_array().is_some_and(|list| {
            list.iter()
                .any(|e| e["field"].as_str() == Some(field) && e["code"].as_str() == Some(code))
        });
        assert!(
            found,
            "expected data.{payload}.errors to contain {{field: {field}, code: {code}}}, \
             got {errors}; body: {}",
            self.raw
        );
        self
    }

    /// Exactly one of `data.{payload}.{object}` and `data.{payload}.errors` is populated.
    pub fn assert_exclusive(&self, payload: &str, object: &str) -> &Self {
        self.assert_no_errors();
        let node = self.at(&format!("data.{payload}.{object}"));
        let errors = self.at(&format!("data.{payload}.errors"));
        let has_errors = errors.as_array().is_some_and(|l| !l.is_empty());
        match (node.is_null(), has_errors) {
            (false, false) => {
                let id = node["id"].as_str().unwrap_or_default();
                assert!(
                    !id.is_empty(),
                    "expected non-empty data.{payload}.{object}.id; body: {}",
                    self.raw
                );
            }
            (true, true) => {}
            _ => panic!(
                "expected exactly one of data.{payload}.{object} and errors, \
                 got {object}={node} errors={errors}; body: {}",
                self.raw
            ),
        }
        self
    }

    pub fn assert_equals(&self, path: &str, expected: Value) -> &Self {
        let actual = self.at(path);
        assert_eq!(
            actual, &expected,
            "expected {path} = {expected}, got {actual}; body: {}",
            self.raw
        );
        self
    }

    pub fn assert_null(&self, path: &str) -> &Self {
        let actual = self.at(path);
        assert!(
            actual.is_null(),
            "expected {path} to be null, got {actual}; body: {}",
            self.raw
        );
        self
    }

    /// Adversarial input must not be reflected verbatim anywhere in `data`.
    pub fn assert_not_echoed(&self, needle: &str) -> &Self {
        assert!(
            !self.echoes(needle),
            "expected data not to echo {needle:?}; body: {}",
            self.raw
        );
        self
    }
}

fn contains_string(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.contains(needle),
        Value::Array(items) => items.iter().any(|v| contains_string(v, needle)),
        Value::Object(map) => map.values().any(|v| contains_string(v, needle)),
        _ => false,
    }
}
