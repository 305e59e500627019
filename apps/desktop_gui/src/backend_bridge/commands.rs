//! Backend commands queued from UI to the store worker.

use client_core::{CourseDraft, EnrollmentDraft, InstructorDraft, ParticipantDraft, RoomDraft};
use shared::domain::RecordId;

/// The five entity tabs. The overview is addressed separately because it has
/// no editor or delete flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityTab {
    Instructors,
    Rooms,
    Participants,
    Courses,
    Enrollments,
}

pub enum BackendCommand {
    LoadOverview,
    Load(EntityTab),
    OpenCreate(EntityTab),
    OpenEdit(EntityTab, RecordId),
    CloseEditor(EntityTab),
    RequestDelete(EntityTab, RecordId),
    CancelDelete(EntityTab),
    ConfirmDelete(EntityTab),
    SaveInstructor(InstructorDraft),
    SaveRoom(RoomDraft),
    SaveParticipant(ParticipantDraft),
    SaveCourse(CourseDraft),
    SaveEnrollment(EnrollmentDraft),
}
