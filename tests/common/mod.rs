#![allow(dead_code)]

use async_trait::async_trait;
use rest_binding::{parse_schemas, HttpRequest, Method, RestConfig, RestState, Transport, TransportError};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

struct Expectation {
    method: Method,
    url: String,
    reply: Result<Value, TransportError>,
}

/// Scripted transport: answers requests in the order they were expected and
/// records everything it was sent.
#[derive(Default)]
pub struct MockTransport {
    expected: Mutex<VecDeque<Expectation>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn expect(&self, method: Method, url: &str, body: Value) {
        self.expected.lock().unwrap().push_back(Expectation {
            method,
            url: url.to_string(),
            reply: Ok(body),
        });
    }

    pub fn expect_failure(&self, method: Method, url: &str, status: u16, body: Value) {
        self.expected.lock().unwrap().push_back(Expectation {
            method,
            url: url.to_string(),
            reply: Err(TransportError::Status { status, body }),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.seen.lock().unwrap().last().cloned().expect("no request was sent")
    }

    pub fn verify(&self) {
        let pending = self.expected.lock().unwrap();
        assert!(
            pending.is_empty(),
            "unsent requests: {:?}",
            pending.iter().map(|e| format!("{} {}", e.method, e.url)).collect::<Vec<_>>()
        );
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, request: HttpRequest) -> Result<Value, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        let next = self
            .expected
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request {} {}", request.method, request.url));
        assert_eq!(next.method, request.method, "method for {}", request.url);
        assert_eq!(next.url, request.url);
        next.reply
    }
}

pub const SCHEMAS: &str = r#"{
    "user": {
        "route": "/users",
        "properties": {
            "id": { "sync": false },
            "firstName": {},
            "lastName": {},
            "username": {},
            "managerId": {}
        },
        "relations": {
            "job": { "resource": "project" },
            "manager": { "resource": "user", "property": "managerId" }
        },
        "dataListLocation": "response.data.users",
        "dataItemLocation": "response.data.user"
    },
    "project": {
        "route": "/projects",
        "idProperty": "projectId",
        "properties": {
            "projectId": { "sync": false },
            "name": {}
        },
        "relations": {
            "team": { "resource": "team", "flatten": false }
        },
        "dataListLocation": "response.data.projects",
        "dataItemLocation": "response.data.project"
    },
    "team": {
        "route": "/teams",
        "properties": {
            "id": { "sync": false },
            "name": {}
        },
        "dataListLocation": "response.data.teams",
        "dataItemLocation": "response.data.team"
    }
}"#;

pub fn setup_with(config: RestConfig) -> (RestState, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::default());
    let state = RestState::new(config, mock.clone());
    state.schemas().add_all(parse_schemas(SCHEMAS).unwrap());
    (state, mock)
}

pub fn setup() -> (RestState, Arc<MockTransport>) {
    setup_with(RestConfig::default())
}

pub fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
