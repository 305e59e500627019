use serde::{Deserialize, Serialize};

use crate::{
    domain::{CourseStatus, RecordId},
    reference::{self, RecordRef},
};

/// Envelope the store wraps every persisted entity in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<F> {
    pub record_id: RecordId,
    pub fields: F,
}

pub type InstructorRecord = Record<InstructorFields>;
pub type RoomRecord = Record<RoomFields>;
pub type ParticipantRecord = Record<ParticipantFields>;
pub type CourseRecord = Record<CourseFields>;
pub type EnrollmentRecord = Record<EnrollmentFields>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructorFields {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fachgebiet: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomFields {
    pub raumname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gebaeude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kapazitaet: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantFields {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefon: Option<String>,
    /// ISO date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geburtsdatum: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseFields {
    pub titel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beschreibung: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startdatum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enddatum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_teilnehmer: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preis: Option<f64>,
    #[serde(
        default,
        deserialize_with = "reference::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub dozent: Option<RecordRef>,
    #[serde(
        default,
        deserialize_with = "reference::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub raum: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CourseStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentFields {
    #[serde(
        default,
        deserialize_with = "reference::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub teilnehmer: Option<RecordRef>,
    #[serde(
        default,
        deserialize_with = "reference::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub kurs: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anmeldedatum: Option<String>,
    #[serde(default)]
    pub bezahlt: bool,
}

/// Body shape for create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordWrite<F> {
    pub fields: F,
}

/// Store answer to a create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCreated {
    pub record_id: RecordId,
}
