use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Uri, header::AUTHORIZATION},
    response::IntoResponse,
};
use serde_json::{Value, json};

use super::*;

fn store() -> FirestoreStore {
    let config = FirestoreConfig::new("demo").with_emulator("localhost:8080");
    FirestoreStore::new(config).unwrap()
}

#[test]
fn rejects_empty_project() {
    let result = FirestoreStore::new(FirestoreConfig::new("  "));
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn rejects_unparsable_endpoint() {
    let cfg = FirestoreConfig::new("demo").with_endpoint("not a url");
    let result = FirestoreStore::new(cfg);
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn builds_document_urls() {
    let store = store();
    let url = store.document_url("challenges", &ChallengeId::from("abc"));
    assert_eq!(
        url.as_str(),
        "http://localhost:8080/v1/projects/demo/databases/(default)/documents/challenges/abc"
    );
}

#[test]
fn builds_run_query_url() {
    let url = store().run_query_url();
    assert_eq!(
        url.as_str(),
        "http://localhost:8080/v1/projects/demo/databases/(default)/documents:runQuery"
    );
}

#[test]
fn path_like_ids_are_not_addressable() {
    assert!(is_addressable(&ChallengeId::from("k2Xw9")));
    assert!(!is_addressable(&ChallengeId::from("a/b")));
    assert!(!is_addressable(&ChallengeId::from("..")));
    assert!(!is_addressable(&ChallengeId::from(" ")));
}

#[tokio::test]
async fn get_with_unaddressable_id_is_absent_without_network() {
    let doc = store()
        .get("challenges", &ChallengeId::from("x/y"))
        .await
        .unwrap();
    assert!(doc.is_none());
}

// =============================================================================
// Requests against a local Firestore stand-in
// =============================================================================

const DOCS: &str = "/v1/projects/demo/databases/(default)/documents";

#[derive(Debug)]
struct Exchange {
    method: Method,
    uri: String,
    auth: Option<String>,
    body: Value,
}

#[derive(Default)]
struct FakeState {
    replies: VecDeque<(StatusCode, Value)>,
    seen: Vec<Exchange>,
}

/// Answers every request with the next scripted reply and records what it saw.
#[derive(Clone, Default)]
struct FakeFirestore(Arc<Mutex<FakeState>>);

impl FakeFirestore {
    fn reply(self, status: StatusCode, body: Value) -> Self {
        self.0.lock().unwrap().replies.push_back((status, body));
        self
    }

    fn single_request(&self) -> Exchange {
        let mut state = self.0.lock().unwrap();
        assert_eq!(state.seen.len(), 1, "unexpected requests: {:?}", state.seen);
        state.seen.remove(0)
    }

    async fn start(&self) -> FirestoreStore {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(answer).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = FirestoreConfig::new("demo")
            .with_emulator(&addr.to_string())
            .with_token("t0k");
        FirestoreStore::new(config).unwrap()
    }
}

async fn answer(
    State(fake): State<FakeFirestore>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let exchange = Exchange {
        method,
        uri: uri.to_string(),
        auth: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };

    let (status, reply) = {
        let mut state = fake.0.lock().unwrap();
        state.seen.push(exchange);
        state
            .replies
            .pop_front()
            .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, Value::Null))
    };
    (status, Json(reply))
}

fn wire_challenge(id: &str) -> Value {
    json!({
        "name": format!("projects/demo/databases/(default)/documents/challenges/{id}"),
        "fields": {
            "user_id": { "stringValue": "u1" },
            "target": { "integerValue": "5" },
            "progress": { "integerValue": "2" },
        }
    })
}

#[tokio::test]
async fn query_keeps_only_items_with_documents() {
    let fake = FakeFirestore::default().reply(
        StatusCode::OK,
        json!([
            { "readTime": "2024-05-01T10:00:00Z" },
            { "document": wire_challenge("a1"), "readTime": "2024-05-01T10:00:00Z" },
        ]),
    );
    let store = fake.start().await;

    let docs = store
        .query_eq("challenges", "user_id", &FieldValue::from("u1"))
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id.as_str(), "a1");
    assert_eq!(
        docs[0].fields.get("progress"),
        Some(&FieldValue::Integer(2))
    );

    let sent = fake.single_request();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.uri, format!("{DOCS}:runQuery"));
    assert_eq!(sent.auth.as_deref(), Some("Bearer t0k"));
    let filter = &sent.body["structuredQuery"]["where"]["fieldFilter"];
    assert_eq!(filter["op"], "EQUAL");
    assert_eq!(filter["value"], json!({ "stringValue": "u1" }));
}

#[tokio::test]
async fn get_decodes_document_and_treats_404_as_absent() {
    let fake = FakeFirestore::default()
        .reply(StatusCode::OK, wire_challenge("abc"))
        .reply(StatusCode::NOT_FOUND, json!({ "error": { "code": 404 } }));
    let store = fake.start().await;

    let found = store
        .get("challenges", &ChallengeId::from("abc"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id.as_str(), "abc");
    assert_eq!(found.fields.get("user_id"), Some(&FieldValue::from("u1")));

    let missing = store
        .get("challenges", &ChallengeId::from("gone"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn create_takes_id_from_resource_name() {
    let fake = FakeFirestore::default()
        .reply(StatusCode::OK, wire_challenge("gen42"));
    let store = fake.start().await;

    let mut fields = Record::new();
    fields.insert("user_id".to_string(), FieldValue::from("u1"));
    fields.insert("progress".to_string(), FieldValue::Integer(0));
    let id = store.create("challenges", fields).await.unwrap();

    assert_eq!(id.as_str(), "gen42");
    let sent = fake.single_request();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.uri, format!("{DOCS}/challenges"));
    assert_eq!(
        sent.body["fields"]["progress"],
        json!({ "integerValue": "0" })
    );
}

#[tokio::test]
async fn update_patches_masked_fields_of_existing_document() {
    let fake = FakeFirestore::default()
        .reply(StatusCode::OK, wire_challenge("abc"));
    let store = fake.start().await;

    let mut fields = Record::new();
    fields.insert("progress".to_string(), FieldValue::Integer(4));
    store
        .update("challenges", &ChallengeId::from("abc"), fields)
        .await
        .unwrap();

    let sent = fake.single_request();
    assert_eq!(sent.method, Method::PATCH);
    assert_eq!(
        sent.uri,
        format!(
            "{DOCS}/challenges/abc?updateMask.fieldPaths=progress&currentDocument.exists=true"
        )
    );
    let expected = json!({ "fields": { "progress": { "integerValue": "4" } } });
    assert_eq!(sent.body, expected);
}

#[tokio::test]
async fn update_of_missing_document_is_not_found() {
    let fake = FakeFirestore::default()
        .reply(StatusCode::NOT_FOUND, json!({}));
    let store = fake.start().await;

    let err = store
        .update("challenges", &ChallengeId::from("abc"), Record::new())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(id) if id == "abc"));
}

#[tokio::test]
async fn delete_succeeds_whether_or_not_document_exists() {
    let fake = FakeFirestore::default()
        .reply(StatusCode::OK, json!({}))
        .reply(StatusCode::NOT_FOUND, json!({}));
    let store = fake.start().await;

    store
        .delete("challenges", &ChallengeId::from("abc"))
        .await
        .unwrap();
    store
        .delete("challenges", &ChallengeId::from("abc"))
        .await
        .unwrap();

    let state = fake.0.lock().unwrap();
    let seen = &state.seen;
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|e| e.method == Method::DELETE));
    assert_eq!(seen[0].uri, format!("{DOCS}/challenges/abc"));
}

#[tokio::test]
async fn error_statuses_are_reported_with_body() {
    let fake = FakeFirestore::default()
        .reply(StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "backend down" }));
    let store = fake.start().await;

    let err = store
        .get("challenges", &ChallengeId::from("abc"))
        .await
        .unwrap_err();

    match err {
        StoreError::Status { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("backend down"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
