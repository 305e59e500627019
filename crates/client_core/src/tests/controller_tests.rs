use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{CourseStatus, EntityKind, RecordId},
    protocol::{
        CourseFields, CourseRecord, EnrollmentFields, EnrollmentRecord, InstructorFields,
        InstructorRecord, ParticipantFields, ParticipantRecord, Record, RoomFields, RoomRecord,
    },
    reference::RecordRef,
};
use tokio::sync::Mutex;

use super::*;
use crate::{
    forms::{CourseDraft, EnrollmentDraft},
    overview::OverviewController,
    RecordStore,
};

/// Scripted record-store double: a plain in-memory table per entity with
/// per-operation failure switches and captured write calls.
#[derive(Default)]
struct InMemoryStore {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    instructors: Vec<InstructorRecord>,
    rooms: Vec<RoomRecord>,
    participants: Vec<ParticipantRecord>,
    courses: Vec<CourseRecord>,
    enrollments: Vec<EnrollmentRecord>,
    next_id: usize,
    fail_list_rooms: bool,
    fail_create_course: bool,
    fail_delete_course: bool,
    course_creates: Vec<CourseFields>,
    course_updates: Vec<(RecordId, CourseFields)>,
    enrollment_creates: Vec<EnrollmentFields>,
}

impl StoreState {
    fn mint(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId::new(format!("rec_{}", self.next_id))
    }
}

impl InMemoryStore {
    async fn script(&self, apply: impl FnOnce(&mut StoreState)) {
        apply(&mut *self.state.lock().await);
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list_instructors(&self) -> Result<Vec<InstructorRecord>> {
        Ok(self.state.lock().await.instructors.clone())
    }

    async fn create_instructor(&self, fields: &InstructorFields) -> Result<RecordId> {
        let mut state = self.state.lock().await;
        let record_id = state.mint();
        state.instructors.push(Record {
            record_id: record_id.clone(),
            fields: fields.clone(),
        });
        Ok(record_id)
    }

    async fn update_instructor(&self, id: &RecordId, fields: &InstructorFields) -> Result<()> {
        let mut state = self.state.lock().await;
        let record = state
            .instructors
            .iter_mut()
            .find(|r| &r.record_id == id)
            .ok_or_else(|| anyhow!("no such instructor {id}"))?;
        record.fields = fields.clone();
        Ok(())
    }

    async fn delete_instructor(&self, id: &RecordId) -> Result<()> {
        self.state.lock().await.instructors.retain(|r| &r.record_id != id);
        Ok(())
    }

    async fn list_rooms(&self) -> Result<Vec<RoomRecord>> {
        let state = self.state.lock().await;
        if state.fail_list_rooms {
            return Err(anyhow!("rooms list unavailable"));
        }
        Ok(state.rooms.clone())
    }

    async fn create_room(&self, fields: &RoomFields) -> Result<RecordId> {
        let mut state = self.state.lock().await;
        let record_id = state.mint();
        state.rooms.push(Record {
            record_id: record_id.clone(),
            fields: fields.clone(),
        });
        Ok(record_id)
    }

    async fn update_room(&self, id: &RecordId, fields: &RoomFields) -> Result<()> {
        let mut state = self.state.lock().await;
        let record = state
            .rooms
            .iter_mut()
            .find(|r| &r.record_id == id)
            .ok_or_else(|| anyhow!("no such room {id}"))?;
        record.fields = fields.clone();
        Ok(())
    }

    async fn delete_room(&self, id: &RecordId) -> Result<()> {
        self.state.lock().await.rooms.retain(|r| &r.record_id != id);
        Ok(())
    }

    async fn list_participants(&self) -> Result<Vec<ParticipantRecord>> {
        Ok(self.state.lock().await.participants.clone())
    }

    async fn create_participant(&self, fields: &ParticipantFields) -> Result<RecordId> {
        let mut state = self.state.lock().await;
        let record_id = state.mint();
        state.participants.push(Record {
            record_id: record_id.clone(),
            fields: fields.clone(),
        });
        Ok(record_id)
    }

    async fn update_participant(&self, id: &RecordId, fields: &ParticipantFields) -> Result<()> {
        let mut state = self.state.lock().await;
        let record = state
            .participants
            .iter_mut()
            .find(|r| &r.record_id == id)
            .ok_or_else(|| anyhow!("no such participant {id}"))?;
        record.fields = fields.clone();
        Ok(())
    }

    async fn delete_participant(&self, id: &RecordId) -> Result<()> {
        self.state
            .lock()
            .await
            .participants
            .retain(|r| &r.record_id != id);
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<CourseRecord>> {
        Ok(self.state.lock().await.courses.clone())
    }

    async fn create_course(&self, fields: &CourseFields) -> Result<RecordId> {
        let mut state = self.state.lock().await;
        if state.fail_create_course {
            return Err(anyhow!("store rejected the course"));
        }
        state.course_creates.push(fields.clone());
        let record_id = state.mint();
        state.courses.push(Record {
            record_id: record_id.clone(),
            fields: fields.clone(),
        });
        Ok(record_id)
    }

    async fn update_course(&self, id: &RecordId, fields: &CourseFields) -> Result<()> {
        let mut state = self.state.lock().await;
        state.course_updates.push((id.clone(), fields.clone()));
        let record = state
            .courses
            .iter_mut()
            .find(|r| &r.record_id == id)
            .ok_or_else(|| anyhow!("no such course {id}"))?;
        record.fields = fields.clone();
        Ok(())
    }

    async fn delete_course(&self, id: &RecordId) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.fail_delete_course {
            return Err(anyhow!("store refused to delete"));
        }
        state.courses.retain(|r| &r.record_id != id);
        Ok(())
    }

    async fn list_enrollments(&self) -> Result<Vec<EnrollmentRecord>> {
        Ok(self.state.lock().await.enrollments.clone())
    }

    async fn create_enrollment(&self, fields: &EnrollmentFields) -> Result<RecordId> {
        let mut state = self.state.lock().await;
        state.enrollment_creates.push(fields.clone());
        let record_id = state.mint();
        state.enrollments.push(Record {
            record_id: record_id.clone(),
            fields: fields.clone(),
        });
        Ok(record_id)
    }

    async fn update_enrollment(&self, id: &RecordId, fields: &EnrollmentFields) -> Result<()> {
        let mut state = self.state.lock().await;
        let record = state
            .enrollments
            .iter_mut()
            .find(|r| &r.record_id == id)
            .ok_or_else(|| anyhow!("no such enrollment {id}"))?;
        record.fields = fields.clone();
        Ok(())
    }

    async fn delete_enrollment(&self, id: &RecordId) -> Result<()> {
        self.state
            .lock()
            .await
            .enrollments
            .retain(|r| &r.record_id != id);
        Ok(())
    }
}

fn instructor(id: &str, name: &str) -> InstructorRecord {
    Record {
        record_id: RecordId::new(id),
        fields: InstructorFields {
            name: name.to_string(),
            ..InstructorFields::default()
        },
    }
}

fn course_with_instructor(id: &str, titel: &str, instructor_id: &str) -> CourseRecord {
    Record {
        record_id: RecordId::new(id),
        fields: CourseFields {
            titel: titel.to_string(),
            dozent: Some(RecordRef::new(EntityKind::Instructors, instructor_id)),
            status: Some(CourseStatus::Planned),
            ..CourseFields::default()
        },
    }
}

fn enrollment(id: &str, paid: bool) -> EnrollmentRecord {
    Record {
        record_id: RecordId::new(id),
        fields: EnrollmentFields {
            teilnehmer: Some(RecordRef::new(EntityKind::Participants, "rec_t1")),
            kurs: Some(RecordRef::new(EntityKind::Courses, "rec_k1")),
            anmeldedatum: Some("2026-08-01".to_string()),
            bezahlt: paid,
        },
    }
}

#[tokio::test]
async fn load_replaces_items_with_store_contents() {
    let store = Arc::new(InMemoryStore::default());
    store
        .script(|state| {
            state.instructors.push(instructor("rec_1", "Dr. Weber"));
            state.instructors.push(instructor("rec_2", "Prof. Klein"));
        })
        .await;

    let mut controller = InstructorsController::new(store);
    controller.load().await.expect("load");

    assert!(!controller.loading);
    assert_eq!(controller.items.len(), 2);
    assert_eq!(controller.items[0].fields.name, "Dr. Weber");
}

#[tokio::test]
async fn failed_related_fetch_applies_nothing_and_clears_loading() {
    let store = Arc::new(InMemoryStore::default());
    store
        .script(|state| {
            state.courses.push(course_with_instructor("rec_k1", "UX", "rec_1"));
            state.fail_list_rooms = true;
        })
        .await;

    let mut controller = CoursesController::new(store);
    let err = controller.load().await.expect_err("join must fail");

    assert!(err.to_string().contains("rooms list unavailable"));
    assert!(!controller.loading);
    assert!(controller.items.is_empty());
    assert!(controller.instructors.is_empty());
}

#[tokio::test]
async fn save_with_blank_title_is_a_no_op() {
    let store = Arc::new(InMemoryStore::default());
    let mut controller = CoursesController::new(store.clone());
    controller.open_create();

    controller
        .save(CourseDraft {
            titel: "   ".to_string(),
            ..CourseDraft::default()
        })
        .await
        .expect("no-op save");

    assert!(controller.editor.is_some(), "editor stays open");
    assert!(store.state.lock().await.course_creates.is_empty());
}

#[tokio::test]
async fn minimal_course_create_sends_exact_fields_and_reloads() {
    let store = Arc::new(InMemoryStore::default());
    let mut controller = CoursesController::new(store.clone());
    controller.load().await.expect("initial load");
    assert!(controller.items.is_empty());

    controller.open_create();
    controller
        .save(CourseDraft {
            titel: "Intro to Design".to_string(),
            ..CourseDraft::default()
        })
        .await
        .expect("save");

    {
        let state = store.state.lock().await;
        assert_eq!(state.course_creates.len(), 1);
        assert_eq!(
            serde_json::to_value(&state.course_creates[0]).expect("serialize"),
            serde_json::json!({"titel": "Intro to Design", "status": "geplant"})
        );
    }

    assert!(controller.editor.is_none());
    assert!(!controller.saving);
    assert_eq!(controller.items.len(), 1);
    assert_eq!(controller.items[0].fields.titel, "Intro to Design");
    assert_eq!(
        controller.items[0].fields.status.expect("status").label(),
        "Geplant"
    );

    // Mutate-then-reload means the visible list is already what a fresh
    // load would produce.
    let after_save = controller.items.clone();
    controller.load().await.expect("reload");
    assert_eq!(controller.items, after_save);
}

#[tokio::test]
async fn open_edit_then_save_round_trips_the_original_fields() {
    let store = Arc::new(InMemoryStore::default());
    let original = CourseFields {
        titel: "Grundlagen UX".to_string(),
        beschreibung: Some("Workshop".to_string()),
        startdatum: Some("2026-09-01".to_string()),
        enddatum: Some("2026-09-02".to_string()),
        max_teilnehmer: Some(18),
        preis: Some(299.5),
        dozent: Some(RecordRef::new(EntityKind::Instructors, "rec_1")),
        raum: Some(RecordRef::new(EntityKind::Rooms, "rec_r1")),
        status: Some(CourseStatus::Active),
    };
    store
        .script(|state| {
            state.courses.push(Record {
                record_id: RecordId::new("rec_k1"),
                fields: original.clone(),
            });
        })
        .await;

    let mut controller = CoursesController::new(store.clone());
    controller.load().await.expect("load");
    controller.open_edit(&RecordId::new("rec_k1"));
    let seeded = controller.editor.as_ref().expect("editor open").draft.clone();

    controller.save(seeded).await.expect("save");

    let state = store.state.lock().await;
    assert_eq!(state.course_updates.len(), 1);
    assert_eq!(state.course_updates[0].0, RecordId::new("rec_k1"));
    assert_eq!(state.course_updates[0].1, original);
}

#[tokio::test]
async fn failed_save_keeps_editor_open_and_clears_saving() {
    let store = Arc::new(InMemoryStore::default());
    store.script(|state| state.fail_create_course = true).await;

    let mut controller = CoursesController::new(store);
    controller.open_create();
    let err = controller
        .save(CourseDraft {
            titel: "Intro to Design".to_string(),
            ..CourseDraft::default()
        })
        .await
        .expect_err("save must fail");

    assert!(err.to_string().contains("rejected"));
    assert!(!controller.saving);
    assert!(controller.editor.is_some(), "editor stays open for retry");
}

#[tokio::test]
async fn delete_flow_clears_pending_id_only_on_success() {
    let store = Arc::new(InMemoryStore::default());
    store
        .script(|state| {
            state.courses.push(course_with_instructor("rec_k1", "UX", "rec_1"));
            state.fail_delete_course = true;
        })
        .await;

    let mut controller = CoursesController::new(store.clone());
    controller.load().await.expect("load");

    controller.request_delete(RecordId::new("rec_k1"));
    controller.confirm_delete().await.expect_err("delete fails");
    assert_eq!(controller.pending_delete, Some(RecordId::new("rec_k1")));

    store.script(|state| state.fail_delete_course = false).await;
    controller.confirm_delete().await.expect("delete succeeds");
    assert_eq!(controller.pending_delete, None);
    assert!(controller.items.is_empty());
}

#[tokio::test]
async fn dangling_reference_resolves_to_no_match() {
    let store = Arc::new(InMemoryStore::default());
    store
        .script(|state| {
            state.instructors.push(instructor("rec_1", "Dr. Weber"));
            state.courses.push(course_with_instructor("rec_k1", "UX", "rec_1"));
        })
        .await;

    let mut controller = CoursesController::new(store.clone());
    controller.load().await.expect("load");
    let reference = controller.items[0].fields.dozent.clone();
    assert_eq!(
        controller.snapshot().instructor_name(reference.as_ref()),
        Some("Dr. Weber")
    );

    // Deleting the referenced instructor leaves the course reference
    // dangling; the next reload resolves it to no match instead of failing.
    store
        .script(|state| state.instructors.clear())
        .await;
    controller.load().await.expect("reload");
    let reference = controller.items[0].fields.dozent.clone();
    assert_eq!(controller.snapshot().instructor_name(reference.as_ref()), None);
}

#[tokio::test]
async fn enrollment_save_requires_both_references() {
    let store = Arc::new(InMemoryStore::default());
    let mut controller = EnrollmentsController::new(store.clone());
    controller.open_create();

    controller
        .save(EnrollmentDraft {
            teilnehmer: "rec_t1".to_string(),
            ..EnrollmentDraft::default()
        })
        .await
        .expect("no-op save");

    assert!(controller.editor.is_some());
    assert!(store.state.lock().await.enrollment_creates.is_empty());
}

#[tokio::test]
async fn overview_derives_counts_and_payment_rate() {
    let store = Arc::new(InMemoryStore::default());
    store
        .script(|state| {
            for n in 0..10 {
                state
                    .enrollments
                    .push(enrollment(&format!("rec_a{n}"), n < 4));
            }
            state.courses.push(course_with_instructor("rec_k1", "UX", "rec_1"));
            state.instructors.push(instructor("rec_1", "Dr. Weber"));
        })
        .await;

    let mut overview = OverviewController::new(store);
    overview.load().await.expect("load");

    let stats = overview.stats.expect("stats");
    assert_eq!(stats.anmeldungen, 10);
    assert_eq!(stats.bezahlt, 4);
    assert_eq!(stats.kurse, 1);
    assert_eq!(stats.payment_rate_label(), "40 %");
    assert_eq!(stats.payment_sub_label(), "4 von 10");
}

#[tokio::test]
async fn overview_without_enrollments_shows_the_placeholder() {
    let store = Arc::new(InMemoryStore::default());
    let mut overview = OverviewController::new(store);
    overview.load().await.expect("load");

    let stats = overview.stats.expect("stats");
    assert_eq!(stats.anmeldungen, 0);
    assert_eq!(stats.payment_rate_label(), "—");
}
