//! Form drafts for the edit dialogs.
//!
//! Drafts keep every input as the raw string the user typed (numbers
//! included) and only convert to wire field sets on submit. Reference fields
//! hold the bare record id selected in the picker; `to_fields` re-encodes
//! them as typed references.

use chrono::Local;
use shared::{
    domain::{CourseStatus, EntityKind},
    protocol::{
        CourseFields, CourseRecord, EnrollmentFields, EnrollmentRecord, InstructorFields,
        InstructorRecord, ParticipantFields, ParticipantRecord, RoomFields, RoomRecord,
    },
    reference::RecordRef,
};

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn optional_ref(kind: EntityKind, raw_id: &str) -> Option<RecordRef> {
    let trimmed = raw_id.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(RecordRef::new(kind, trimmed))
    }
}

fn ref_id(reference: &Option<RecordRef>) -> String {
    reference
        .as_ref()
        .map(|r| r.record_id.0.clone())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructorDraft {
    pub name: String,
    pub email: String,
    pub telefon: String,
    pub fachgebiet: String,
}

impl InstructorDraft {
    pub fn from_record(record: &InstructorRecord) -> Self {
        Self {
            name: record.fields.name.clone(),
            email: record.fields.email.clone().unwrap_or_default(),
            telefon: record.fields.telefon.clone().unwrap_or_default(),
            fachgebiet: record.fields.fachgebiet.clone().unwrap_or_default(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn to_fields(&self) -> Option<InstructorFields> {
        if !self.is_valid() {
            return None;
        }
        Some(InstructorFields {
            name: self.name.clone(),
            email: optional(&self.email),
            telefon: optional(&self.telefon),
            fachgebiet: optional(&self.fachgebiet),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomDraft {
    pub raumname: String,
    pub gebaeude: String,
    pub kapazitaet: String,
}

impl RoomDraft {
    pub fn from_record(record: &RoomRecord) -> Self {
        Self {
            raumname: record.fields.raumname.clone(),
            gebaeude: record.fields.gebaeude.clone().unwrap_or_default(),
            kapazitaet: record
                .fields
                .kapazitaet
                .map(|n| n.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.raumname.trim().is_empty()
    }

    pub fn to_fields(&self) -> Option<RoomFields> {
        if !self.is_valid() {
            return None;
        }
        Some(RoomFields {
            raumname: self.raumname.clone(),
            gebaeude: optional(&self.gebaeude),
            kapazitaet: self.kapazitaet.trim().parse().ok(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantDraft {
    pub name: String,
    pub email: String,
    pub telefon: String,
    pub geburtsdatum: String,
}

impl ParticipantDraft {
    pub fn from_record(record: &ParticipantRecord) -> Self {
        Self {
            name: record.fields.name.clone(),
            email: record.fields.email.clone().unwrap_or_default(),
            telefon: record.fields.telefon.clone().unwrap_or_default(),
            geburtsdatum: record.fields.geburtsdatum.clone().unwrap_or_default(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn to_fields(&self) -> Option<ParticipantFields> {
        if !self.is_valid() {
            return None;
        }
        Some(ParticipantFields {
            name: self.name.clone(),
            email: optional(&self.email),
            telefon: optional(&self.telefon),
            geburtsdatum: optional(&self.geburtsdatum),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseDraft {
    pub titel: String,
    pub beschreibung: String,
    pub startdatum: String,
    pub enddatum: String,
    pub max_teilnehmer: String,
    pub preis: String,
    /// Raw record id of the selected instructor, empty for "Kein Dozent".
    pub dozent: String,
    /// Raw record id of the selected room, empty for "Kein Raum".
    pub raum: String,
    pub status: CourseStatus,
}

impl CourseDraft {
    pub fn from_record(record: &CourseRecord) -> Self {
        Self {
            titel: record.fields.titel.clone(),
            beschreibung: record.fields.beschreibung.clone().unwrap_or_default(),
            startdatum: record.fields.startdatum.clone().unwrap_or_default(),
            enddatum: record.fields.enddatum.clone().unwrap_or_default(),
            max_teilnehmer: record
                .fields
                .max_teilnehmer
                .map(|n| n.to_string())
                .unwrap_or_default(),
            preis: record
                .fields
                .preis
                .map(|p| p.to_string())
                .unwrap_or_default(),
            dozent: ref_id(&record.fields.dozent),
            raum: ref_id(&record.fields.raum),
            status: record.fields.status.unwrap_or_default(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.titel.trim().is_empty()
    }

    pub fn to_fields(&self) -> Option<CourseFields> {
        if !self.is_valid() {
            return None;
        }
        Some(CourseFields {
            titel: self.titel.clone(),
            beschreibung: optional(&self.beschreibung),
            startdatum: optional(&self.startdatum),
            enddatum: optional(&self.enddatum),
            max_teilnehmer: self.max_teilnehmer.trim().parse().ok(),
            preis: self.preis.trim().parse().ok(),
            dozent: optional_ref(EntityKind::Instructors, &self.dozent),
            raum: optional_ref(EntityKind::Rooms, &self.raum),
            status: Some(self.status),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrollmentDraft {
    /// Raw record id of the selected participant.
    pub teilnehmer: String,
    /// Raw record id of the selected course.
    pub kurs: String,
    pub anmeldedatum: String,
    pub bezahlt: bool,
}

impl EnrollmentDraft {
    /// Empty draft with the enrollment date preset to today, as the create
    /// dialog seeds it.
    pub fn for_today() -> Self {
        Self {
            anmeldedatum: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn from_record(record: &EnrollmentRecord) -> Self {
        Self {
            teilnehmer: ref_id(&record.fields.teilnehmer),
            kurs: ref_id(&record.fields.kurs),
            anmeldedatum: record.fields.anmeldedatum.clone().unwrap_or_default(),
            bezahlt: record.fields.bezahlt,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.teilnehmer.trim().is_empty() && !self.kurs.trim().is_empty()
    }

    pub fn to_fields(&self) -> Option<EnrollmentFields> {
        if !self.is_valid() {
            return None;
        }
        Some(EnrollmentFields {
            teilnehmer: optional_ref(EntityKind::Participants, &self.teilnehmer),
            kurs: optional_ref(EntityKind::Courses, &self.kurs),
            anmeldedatum: optional(&self.anmeldedatum),
            bezahlt: self.bezahlt,
        })
    }
}
