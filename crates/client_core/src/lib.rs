//! Client-side core for the Kursmanager dashboard: the HTTP record-store
//! client and the per-entity view controllers that drive every tab.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{EntityKind, RecordId},
    error::{ApiException, ErrorCode},
    protocol::{
        CourseFields, CourseRecord, EnrollmentFields, EnrollmentRecord, InstructorFields,
        InstructorRecord, ParticipantFields, ParticipantRecord, Record, RecordCreated,
        RecordWrite, RoomFields, RoomRecord,
    },
};
use url::Url;

pub mod controller;
pub mod forms;
pub mod overview;

pub use controller::{
    CoursesController, CoursesSnapshot, EditorState, EnrollmentsController, EnrollmentsSnapshot,
    InstructorsController, InstructorsSnapshot, ParticipantsController, ParticipantsSnapshot,
    RoomsController, RoomsSnapshot,
};
pub use forms::{CourseDraft, EnrollmentDraft, InstructorDraft, ParticipantDraft, RoomDraft};
pub use overview::{DashboardStats, OverviewController, OverviewSnapshot};

/// Connection settings for the remote record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    base_url: String,
    api_token: String,
}

impl StoreConfig {
    pub fn new(base_url: &str, api_token: impl Into<String>) -> Result<Self> {
        let parsed =
            Url::parse(base_url).with_context(|| format!("invalid store base url '{base_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("unsupported store url scheme '{}'", parsed.scheme());
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Typed CRUD surface of the record store. One method per entity kind and
/// operation so controllers stay free of serialization details; the trait is
/// the seam test doubles implement.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_instructors(&self) -> Result<Vec<InstructorRecord>>;
    async fn create_instructor(&self, fields: &InstructorFields) -> Result<RecordId>;
    async fn update_instructor(&self, id: &RecordId, fields: &InstructorFields) -> Result<()>;
    async fn delete_instructor(&self, id: &RecordId) -> Result<()>;

    async fn list_rooms(&self) -> Result<Vec<RoomRecord>>;
    async fn create_room(&self, fields: &RoomFields) -> Result<RecordId>;
    async fn update_room(&self, id: &RecordId, fields: &RoomFields) -> Result<()>;
    async fn delete_room(&self, id: &RecordId) -> Result<()>;

    async fn list_participants(&self) -> Result<Vec<ParticipantRecord>>;
    async fn create_participant(&self, fields: &ParticipantFields) -> Result<RecordId>;
    async fn update_participant(&self, id: &RecordId, fields: &ParticipantFields) -> Result<()>;
    async fn delete_participant(&self, id: &RecordId) -> Result<()>;

    async fn list_courses(&self) -> Result<Vec<CourseRecord>>;
    async fn create_course(&self, fields: &CourseFields) -> Result<RecordId>;
    async fn update_course(&self, id: &RecordId, fields: &CourseFields) -> Result<()>;
    async fn delete_course(&self, id: &RecordId) -> Result<()>;

    async fn list_enrollments(&self) -> Result<Vec<EnrollmentRecord>>;
    async fn create_enrollment(&self, fields: &EnrollmentFields) -> Result<RecordId>;
    async fn update_enrollment(&self, id: &RecordId, fields: &EnrollmentFields) -> Result<()>;
    async fn delete_enrollment(&self, id: &RecordId) -> Result<()>;
}

/// reqwest-backed implementation speaking the store's gateway protocol.
pub struct HttpRecordStore {
    http: Client,
    config: StoreConfig,
}

impl HttpRecordStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn records_url(&self, kind: EntityKind) -> String {
        format!(
            "{}/apps/{}/records",
            self.config.base_url,
            kind.app_id()
        )
    }

    fn record_url(&self, kind: EntityKind, id: &RecordId) -> String {
        format!("{}/{}", self.records_url(kind), id)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            format!("store returned {status}")
        } else {
            body
        };
        Err(ApiException::new(ErrorCode::from_status(status.as_u16()), message).into())
    }

    async fn list_records<F>(&self, kind: EntityKind) -> Result<Vec<Record<F>>>
    where
        F: DeserializeOwned,
    {
        tracing::debug!(?kind, "store: list records");
        let response = self
            .http
            .get(self.records_url(kind))
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;
        let records = Self::check(response).await?.json().await?;
        Ok(records)
    }

    async fn create_record<F>(&self, kind: EntityKind, fields: &F) -> Result<RecordId>
    where
        F: Serialize + Sync,
    {
        tracing::debug!(?kind, "store: create record");
        let response = self
            .http
            .post(self.records_url(kind))
            .bearer_auth(&self.config.api_token)
            .json(&RecordWrite { fields })
            .send()
            .await?;
        let created: RecordCreated = Self::check(response).await?.json().await?;
        Ok(created.record_id)
    }

    async fn update_record<F>(&self, kind: EntityKind, id: &RecordId, fields: &F) -> Result<()>
    where
        F: Serialize + Sync,
    {
        tracing::debug!(?kind, record_id = %id, "store: update record");
        let response = self
            .http
            .put(self.record_url(kind, id))
            .bearer_auth(&self.config.api_token)
            .json(&RecordWrite { fields })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_record(&self, kind: EntityKind, id: &RecordId) -> Result<()> {
        tracing::debug!(?kind, record_id = %id, "store: delete record");
        let response = self
            .http
            .delete(self.record_url(kind, id))
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list_instructors(&self) -> Result<Vec<InstructorRecord>> {
        self.list_records(EntityKind::Instructors).await
    }

    async fn create_instructor(&self, fields: &InstructorFields) -> Result<RecordId> {
        self.create_record(EntityKind::Instructors, fields).await
    }

    async fn update_instructor(&self, id: &RecordId, fields: &InstructorFields) -> Result<()> {
        self.update_record(EntityKind::Instructors, id, fields).await
    }

    async fn delete_instructor(&self, id: &RecordId) -> Result<()> {
        self.delete_record(EntityKind::Instructors, id).await
    }

    async fn list_rooms(&self) -> Result<Vec<RoomRecord>> {
        self.list_records(EntityKind::Rooms).await
    }

    async fn create_room(&self, fields: &RoomFields) -> Result<RecordId> {
        self.create_record(EntityKind::Rooms, fields).await
    }

    async fn update_room(&self, id: &RecordId, fields: &RoomFields) -> Result<()> {
        self.update_record(EntityKind::Rooms, id, fields).await
    }

    async fn delete_room(&self, id: &RecordId) -> Result<()> {
        self.delete_record(EntityKind::Rooms, id).await
    }

    async fn list_participants(&self) -> Result<Vec<ParticipantRecord>> {
        self.list_records(EntityKind::Participants).await
    }

    async fn create_participant(&self, fields: &ParticipantFields) -> Result<RecordId> {
        self.create_record(EntityKind::Participants, fields).await
    }

    async fn update_participant(&self, id: &RecordId, fields: &ParticipantFields) -> Result<()> {
        self.update_record(EntityKind::Participants, id, fields).await
    }

    async fn delete_participant(&self, id: &RecordId) -> Result<()> {
        self.delete_record(EntityKind::Participants, id).await
    }

    async fn list_courses(&self) -> Result<Vec<CourseRecord>> {
        self.list_records(EntityKind::Courses).await
    }

    async fn create_course(&self, fields: &CourseFields) -> Result<RecordId> {
        self.create_record(EntityKind::Courses, fields).await
    }

    async fn update_course(&self, id: &RecordId, fields: &CourseFields) -> Result<()> {
        self.update_record(EntityKind::Courses, id, fields).await
    }

    async fn delete_course(&self, id: &RecordId) -> Result<()> {
        self.delete_record(EntityKind::Courses, id).await
    }

    async fn list_enrollments(&self) -> Result<Vec<EnrollmentRecord>> {
        self.list_records(EntityKind::Enrollments).await
    }

    async fn create_enrollment(&self, fields: &EnrollmentFields) -> Result<RecordId> {
        self.create_record(EntityKind::Enrollments, fields).await
    }

    async fn update_enrollment(&self, id: &RecordId, fields: &EnrollmentFields) -> Result<()> {
        self.update_record(EntityKind::Enrollments, id, fields).await
    }

    async fn delete_enrollment(&self, id: &RecordId) -> Result<()> {
        self.delete_record(EntityKind::Enrollments, id).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
