use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{CourseStatus, EntityKind, RecordId},
    error::{ApiException, ErrorCode},
    protocol::{CourseFields, InstructorFields},
};
use tokio::{net::TcpListener, sync::Mutex};

use super::*;

const TEST_TOKEN: &str = "test-token";

/// In-memory stand-in for the remote record gateway. Records every write so
/// tests can assert the exact request bodies the client produced.
#[derive(Clone, Default)]
struct GatewayState {
    records: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
}

#[derive(Debug, Clone)]
struct RecordedWrite {
    method: &'static str,
    path: String,
    body: Value,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(&format!("Bearer {TEST_TOKEN}"))
}

async fn list_records(
    State(state): State<GatewayState>,
    Path(app_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let records = state.records.lock().await;
    Ok(Json(Value::Array(
        records.get(&app_id).cloned().unwrap_or_default(),
    )))
}

async fn create_record(
    State(state): State<GatewayState>,
    Path(app_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let record_id = uuid::Uuid::new_v4().to_string();
    state.writes.lock().await.push(RecordedWrite {
        method: "POST",
        path: format!("/apps/{app_id}/records"),
        body: body.clone(),
    });
    state
        .records
        .lock()
        .await
        .entry(app_id)
        .or_default()
        .push(json!({"record_id": record_id, "fields": body["fields"]}));
    Ok(Json(json!({ "record_id": record_id })))
}

async fn update_record(
    State(state): State<GatewayState>,
    Path((app_id, record_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<StatusCode, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    state.writes.lock().await.push(RecordedWrite {
        method: "PUT",
        path: format!("/apps/{app_id}/records/{record_id}"),
        body: body.clone(),
    });
    let mut records = state.records.lock().await;
    let Some(existing) = records
        .get_mut(&app_id)
        .and_then(|list| list.iter_mut().find(|r| r["record_id"] == record_id.as_str()))
    else {
        return Err(StatusCode::NOT_FOUND);
    };
    existing["fields"] = body["fields"].clone();
    Ok(StatusCode::OK)
}

async fn delete_record(
    State(state): State<GatewayState>,
    Path((app_id, record_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    state.writes.lock().await.push(RecordedWrite {
        method: "DELETE",
        path: format!("/apps/{app_id}/records/{record_id}"),
        body: Value::Null,
    });
    let mut records = state.records.lock().await;
    let Some(list) = records.get_mut(&app_id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    let before = list.len();
    list.retain(|r| r["record_id"] != record_id.as_str());
    if list.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::OK)
}

async fn spawn_gateway(state: GatewayState) -> Result<String> {
    let app = Router::new()
        .route("/apps/:app_id/records", get(list_records).post(create_record))
        .route(
            "/apps/:app_id/records/:record_id",
            put(update_record).delete(delete_record),
        )
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn store_for(url: &str, token: &str) -> HttpRecordStore {
    HttpRecordStore::new(StoreConfig::new(url, token).expect("store config"))
}

async fn seed(state: &GatewayState, kind: EntityKind, records: Vec<Value>) {
    state
        .records
        .lock()
        .await
        .insert(kind.app_id().to_string(), records);
}

#[tokio::test]
async fn lists_records_for_the_entity_collection() {
    let state = GatewayState::default();
    seed(
        &state,
        EntityKind::Instructors,
        vec![
            json!({"record_id": "rec_1", "fields": {"name": "Dr. Weber", "fachgebiet": "Informatik"}}),
            json!({"record_id": "rec_2", "fields": {"name": "Prof. Klein"}}),
        ],
    )
    .await;
    let url = spawn_gateway(state).await.expect("spawn gateway");

    let store = store_for(&url, TEST_TOKEN);
    let instructors = store.list_instructors().await.expect("list");

    assert_eq!(instructors.len(), 2);
    assert_eq!(instructors[0].fields.name, "Dr. Weber");
    assert_eq!(
        instructors[0].fields.fachgebiet.as_deref(),
        Some("Informatik")
    );
    assert_eq!(instructors[1].fields.email, None);
}

#[tokio::test]
async fn create_course_sends_exactly_the_set_fields() {
    let state = GatewayState::default();
    let url = spawn_gateway(state.clone()).await.expect("spawn gateway");
    let store = store_for(&url, TEST_TOKEN);

    let fields = CourseFields {
        titel: "Intro to Design".to_string(),
        status: Some(CourseStatus::Planned),
        ..CourseFields::default()
    };
    store.create_course(&fields).await.expect("create");

    let writes = state.writes.lock().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, "POST");
    assert_eq!(
        writes[0].path,
        format!("/apps/{}/records", EntityKind::Courses.app_id())
    );
    assert_eq!(
        writes[0].body,
        json!({"fields": {"titel": "Intro to Design", "status": "geplant"}})
    );
}

#[tokio::test]
async fn update_and_delete_address_the_record_path() {
    let state = GatewayState::default();
    let url = spawn_gateway(state.clone()).await.expect("spawn gateway");
    let store = store_for(&url, TEST_TOKEN);

    let record_id = store
        .create_instructor(&InstructorFields {
            name: "Dr. Weber".to_string(),
            ..InstructorFields::default()
        })
        .await
        .expect("create");

    store
        .update_instructor(
            &record_id,
            &InstructorFields {
                name: "Dr. Weber-Schmidt".to_string(),
                ..InstructorFields::default()
            },
        )
        .await
        .expect("update");
    store.delete_instructor(&record_id).await.expect("delete");

    let expected_path = format!(
        "/apps/{}/records/{}",
        EntityKind::Instructors.app_id(),
        record_id
    );
    let writes = state.writes.lock().await;
    assert_eq!(writes[1].method, "PUT");
    assert_eq!(writes[1].path, expected_path);
    assert_eq!(writes[2].method, "DELETE");
    assert_eq!(writes[2].path, expected_path);

    let records = state.records.lock().await;
    assert!(records[EntityKind::Instructors.app_id()].is_empty());
}

#[tokio::test]
async fn bad_token_surfaces_as_unauthorized() {
    let state = GatewayState::default();
    let url = spawn_gateway(state).await.expect("spawn gateway");
    let store = store_for(&url, "wrong-token");

    let err = store.list_rooms().await.expect_err("must fail");
    let api = err
        .downcast_ref::<ApiException>()
        .expect("api exception in chain");
    assert_eq!(api.code, ErrorCode::Unauthorized);
}

#[tokio::test]
async fn missing_record_surfaces_as_not_found() {
    let state = GatewayState::default();
    let url = spawn_gateway(state).await.expect("spawn gateway");
    let store = store_for(&url, TEST_TOKEN);

    let err = store
        .delete_room(&RecordId::new("rec_missing"))
        .await
        .expect_err("must fail");
    let api = err
        .downcast_ref::<ApiException>()
        .expect("api exception in chain");
    assert_eq!(api.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn unparsable_references_from_the_store_decode_to_none() {
    let state = GatewayState::default();
    seed(
        &state,
        EntityKind::Courses,
        vec![json!({
            "record_id": "rec_k1",
            "fields": {
                "titel": "Rust für Einsteiger",
                "dozent": "gar keine referenz",
                "status": "geplant"
            }
        })],
    )
    .await;
    let url = spawn_gateway(state).await.expect("spawn gateway");
    let store = store_for(&url, TEST_TOKEN);

    let courses = store.list_courses().await.expect("list");
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].fields.dozent, None);
}

#[test]
fn store_config_rejects_garbage_urls() {
    assert!(StoreConfig::new("not a url", "token").is_err());
    assert!(StoreConfig::new("ftp://records.example", "token").is_err());
    let config = StoreConfig::new("https://records.example/gateway/", "token").expect("config");
    assert_eq!(config.base_url(), "https://records.example/gateway");
}
