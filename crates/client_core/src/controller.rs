//! Per-entity view controllers.
//!
//! Every tab follows the same contract: the displayed list is either
//! "currently loading" or exactly what the store returned on the last
//! completed load. Mutations never touch local state directly; a successful
//! create/update/delete is followed by a full reload, and related lists are
//! fetched together with the primary list in one all-or-nothing join.

use std::sync::Arc;

use anyhow::Result;
use shared::{
    domain::RecordId,
    protocol::{
        CourseRecord, EnrollmentRecord, InstructorRecord, ParticipantRecord, RoomRecord,
    },
    reference::RecordRef,
};

use crate::{
    forms::{CourseDraft, EnrollmentDraft, InstructorDraft, ParticipantDraft, RoomDraft},
    RecordStore,
};

/// Open edit surface: the record being edited (None while creating) and the
/// draft the dialog was seeded with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState<D> {
    pub target: Option<RecordId>,
    pub draft: D,
}

macro_rules! delete_flow {
    ($self:ident, $delete:ident) => {{
        // Pending id survives a failed delete so the confirm dialog stays up.
        let Some(id) = $self.pending_delete.clone() else {
            return Ok(());
        };
        $self.store.$delete(&id).await?;
        $self.pending_delete = None;
        $self.load().await
    }};
}

pub struct InstructorsController {
    store: Arc<dyn RecordStore>,
    pub items: Vec<InstructorRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<InstructorDraft>>,
    pub pending_delete: Option<RecordId>,
}

#[derive(Debug, Clone, Default)]
pub struct InstructorsSnapshot {
    pub items: Vec<InstructorRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<InstructorDraft>>,
    pub pending_delete: Option<RecordId>,
}

impl InstructorsController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            items: Vec::new(),
            loading: false,
            saving: false,
            editor: None,
            pending_delete: None,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.store.list_instructors().await;
        self.loading = false;
        self.items = result?;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.editor = Some(EditorState {
            target: None,
            draft: InstructorDraft::default(),
        });
    }

    pub fn open_edit(&mut self, id: &RecordId) {
        if let Some(record) = self.items.iter().find(|r| &r.record_id == id) {
            self.editor = Some(EditorState {
                target: Some(record.record_id.clone()),
                draft: InstructorDraft::from_record(record),
            });
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub async fn save(&mut self, draft: InstructorDraft) -> Result<()> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        editor.draft = draft;
        let Some(fields) = editor.draft.to_fields() else {
            return Ok(());
        };
        let target = editor.target.clone();
        self.saving = true;
        let result = match &target {
            Some(id) => self.store.update_instructor(id, &fields).await,
            None => self.store.create_instructor(&fields).await.map(|_| ()),
        };
        self.saving = false;
        result?;
        self.editor = None;
        self.load().await
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> Result<()> {
        delete_flow!(self, delete_instructor)
    }

    pub fn snapshot(&self) -> InstructorsSnapshot {
        InstructorsSnapshot {
            items: self.items.clone(),
            loading: self.loading,
            saving: self.saving,
            editor: self.editor.clone(),
            pending_delete: self.pending_delete.clone(),
        }
    }
}

pub struct RoomsController {
    store: Arc<dyn RecordStore>,
    pub items: Vec<RoomRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<RoomDraft>>,
    pub pending_delete: Option<RecordId>,
}

#[derive(Debug, Clone, Default)]
pub struct RoomsSnapshot {
    pub items: Vec<RoomRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<RoomDraft>>,
    pub pending_delete: Option<RecordId>,
}

impl RoomsController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            items: Vec::new(),
            loading: false,
            saving: false,
            editor: None,
            pending_delete: None,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.store.list_rooms().await;
        self.loading = false;
        self.items = result?;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.editor = Some(EditorState {
            target: None,
            draft: RoomDraft::default(),
        });
    }

    pub fn open_edit(&mut self, id: &RecordId) {
        if let Some(record) = self.items.iter().find(|r| &r.record_id == id) {
            self.editor = Some(EditorState {
                target: Some(record.record_id.clone()),
                draft: RoomDraft::from_record(record),
            });
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub async fn save(&mut self, draft: RoomDraft) -> Result<()> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        editor.draft = draft;
        let Some(fields) = editor.draft.to_fields() else {
            return Ok(());
        };
        let target = editor.target.clone();
        self.saving = true;
        let result = match &target {
            Some(id) => self.store.update_room(id, &fields).await,
            None => self.store.create_room(&fields).await.map(|_| ()),
        };
        self.saving = false;
        result?;
        self.editor = None;
        self.load().await
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> Result<()> {
        delete_flow!(self, delete_room)
    }

    pub fn snapshot(&self) -> RoomsSnapshot {
        RoomsSnapshot {
            items: self.items.clone(),
            loading: self.loading,
            saving: self.saving,
            editor: self.editor.clone(),
            pending_delete: self.pending_delete.clone(),
        }
    }
}

pub struct ParticipantsController {
    store: Arc<dyn RecordStore>,
    pub items: Vec<ParticipantRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<ParticipantDraft>>,
    pub pending_delete: Option<RecordId>,
}

#[derive(Debug, Clone, Default)]
pub struct ParticipantsSnapshot {
    pub items: Vec<ParticipantRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<ParticipantDraft>>,
    pub pending_delete: Option<RecordId>,
}

impl ParticipantsController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            items: Vec::new(),
            loading: false,
            saving: false,
            editor: None,
            pending_delete: None,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.store.list_participants().await;
        self.loading = false;
        self.items = result?;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.editor = Some(EditorState {
            target: None,
            draft: ParticipantDraft::default(),
        });
    }

    pub fn open_edit(&mut self, id: &RecordId) {
        if let Some(record) = self.items.iter().find(|r| &r.record_id == id) {
            self.editor = Some(EditorState {
                target: Some(record.record_id.clone()),
                draft: ParticipantDraft::from_record(record),
            });
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub async fn save(&mut self, draft: ParticipantDraft) -> Result<()> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        editor.draft = draft;
        let Some(fields) = editor.draft.to_fields() else {
            return Ok(());
        };
        let target = editor.target.clone();
        self.saving = true;
        let result = match &target {
            Some(id) => self.store.update_participant(id, &fields).await,
            None => self.store.create_participant(&fields).await.map(|_| ()),
        };
        self.saving = false;
        result?;
        self.editor = None;
        self.load().await
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> Result<()> {
        delete_flow!(self, delete_participant)
    }

    pub fn snapshot(&self) -> ParticipantsSnapshot {
        ParticipantsSnapshot {
            items: self.items.clone(),
            loading: self.loading,
            saving: self.saving,
            editor: self.editor.clone(),
            pending_delete: self.pending_delete.clone(),
        }
    }
}

/// Courses resolve instructor and room references for display and selection,
/// so a course load always refreshes those two lists as well.
pub struct CoursesController {
    store: Arc<dyn RecordStore>,
    pub items: Vec<CourseRecord>,
    pub instructors: Vec<InstructorRecord>,
    pub rooms: Vec<RoomRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<CourseDraft>>,
    pub pending_delete: Option<RecordId>,
}

#[derive(Debug, Clone, Default)]
pub struct CoursesSnapshot {
    pub items: Vec<CourseRecord>,
    pub instructors: Vec<InstructorRecord>,
    pub rooms: Vec<RoomRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<CourseDraft>>,
    pub pending_delete: Option<RecordId>,
}

impl CoursesSnapshot {
    pub fn instructor_name(&self, reference: Option<&RecordRef>) -> Option<&str> {
        let reference = reference?;
        self.instructors
            .iter()
            .find(|r| r.record_id == reference.record_id)
            .map(|r| r.fields.name.as_str())
    }

    pub fn room_name(&self, reference: Option<&RecordRef>) -> Option<&str> {
        let reference = reference?;
        self.rooms
            .iter()
            .find(|r| r.record_id == reference.record_id)
            .map(|r| r.fields.raumname.as_str())
    }
}

impl CoursesController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            items: Vec::new(),
            instructors: Vec::new(),
            rooms: Vec::new(),
            loading: false,
            saving: false,
            editor: None,
            pending_delete: None,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = tokio::try_join!(
            self.store.list_courses(),
            self.store.list_instructors(),
            self.store.list_rooms(),
        );
        self.loading = false;
        // All-or-nothing: a failed join leaves every list untouched.
        let (items, instructors, rooms) = result?;
        self.items = items;
        self.instructors = instructors;
        self.rooms = rooms;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.editor = Some(EditorState {
            target: None,
            draft: CourseDraft::default(),
        });
    }

    pub fn open_edit(&mut self, id: &RecordId) {
        if let Some(record) = self.items.iter().find(|r| &r.record_id == id) {
            self.editor = Some(EditorState {
                target: Some(record.record_id.clone()),
                draft: CourseDraft::from_record(record),
            });
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub async fn save(&mut self, draft: CourseDraft) -> Result<()> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        editor.draft = draft;
        let Some(fields) = editor.draft.to_fields() else {
            return Ok(());
        };
        let target = editor.target.clone();
        self.saving = true;
        let result = match &target {
            Some(id) => self.store.update_course(id, &fields).await,
            None => self.store.create_course(&fields).await.map(|_| ()),
        };
        self.saving = false;
        result?;
        self.editor = None;
        self.load().await
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> Result<()> {
        delete_flow!(self, delete_course)
    }

    pub fn snapshot(&self) -> CoursesSnapshot {
        CoursesSnapshot {
            items: self.items.clone(),
            instructors: self.instructors.clone(),
            rooms: self.rooms.clone(),
            loading: self.loading,
            saving: self.saving,
            editor: self.editor.clone(),
            pending_delete: self.pending_delete.clone(),
        }
    }
}

pub struct EnrollmentsController {
    store: Arc<dyn RecordStore>,
    pub items: Vec<EnrollmentRecord>,
    pub participants: Vec<ParticipantRecord>,
    pub courses: Vec<CourseRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<EnrollmentDraft>>,
    pub pending_delete: Option<RecordId>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentsSnapshot {
    pub items: Vec<EnrollmentRecord>,
    pub participants: Vec<ParticipantRecord>,
    pub courses: Vec<CourseRecord>,
    pub loading: bool,
    pub saving: bool,
    pub editor: Option<EditorState<EnrollmentDraft>>,
    pub pending_delete: Option<RecordId>,
}

impl EnrollmentsSnapshot {
    pub fn participant_name(&self, reference: Option<&RecordRef>) -> Option<&str> {
        let reference = reference?;
        self.participants
            .iter()
            .find(|r| r.record_id == reference.record_id)
            .map(|r| r.fields.name.as_str())
    }

    pub fn course_title(&self, reference: Option<&RecordRef>) -> Option<&str> {
        let reference = reference?;
        self.courses
            .iter()
            .find(|r| r.record_id == reference.record_id)
            .map(|r| r.fields.titel.as_str())
    }

    pub fn paid_count(&self) -> usize {
        self.items.iter().filter(|r| r.fields.bezahlt).count()
    }

    pub fn open_count(&self) -> usize {
        self.items.len() - self.paid_count()
    }
}

impl EnrollmentsController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            items: Vec::new(),
            participants: Vec::new(),
            courses: Vec::new(),
            loading: false,
            saving: false,
            editor: None,
            pending_delete: None,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = tokio::try_join!(
            self.store.list_enrollments(),
            self.store.list_participants(),
            self.store.list_courses(),
        );
        self.loading = false;
        let (items, participants, courses) = result?;
        self.items = items;
        self.participants = participants;
        self.courses = courses;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.editor = Some(EditorState {
            target: None,
            draft: EnrollmentDraft::for_today(),
        });
    }

    pub fn open_edit(&mut self, id: &RecordId) {
        if let Some(record) = self.items.iter().find(|r| &r.record_id == id) {
            self.editor = Some(EditorState {
                target: Some(record.record_id.clone()),
                draft: EnrollmentDraft::from_record(record),
            });
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub async fn save(&mut self, draft: EnrollmentDraft) -> Result<()> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        editor.draft = draft;
        let Some(fields) = editor.draft.to_fields() else {
            return Ok(());
        };
        let target = editor.target.clone();
        self.saving = true;
        let result = match &target {
            Some(id) => self.store.update_enrollment(id, &fields).await,
            None => self.store.create_enrollment(&fields).await.map(|_| ()),
        };
        self.saving = false;
        result?;
        self.editor = None;
        self.load().await
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> Result<()> {
        delete_flow!(self, delete_enrollment)
    }

    pub fn snapshot(&self) -> EnrollmentsSnapshot {
        EnrollmentsSnapshot {
            items: self.items.clone(),
            participants: self.participants.clone(),
            courses: self.courses.clone(),
            loading: self.loading,
            saving: self.saving,
            editor: self.editor.clone(),
            pending_delete: self.pending_delete.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
