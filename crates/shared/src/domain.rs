use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(RecordId);
id_newtype!(AppId);

/// The five record collections the store manages. Each maps to a fixed
/// application id in the store's URL namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Instructors,
    Rooms,
    Participants,
    Courses,
    Enrollments,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Instructors,
        EntityKind::Rooms,
        EntityKind::Participants,
        EntityKind::Courses,
        EntityKind::Enrollments,
    ];

    pub fn app_id(self) -> &'static str {
        match self {
            EntityKind::Instructors => "6751be2a9c41d3e8f20a71c4",
            EntityKind::Rooms => "6751be2a9c41d3e8f20a71c5",
            EntityKind::Participants => "6751be2a9c41d3e8f20a71c6",
            EntityKind::Courses => "6751be2a9c41d3e8f20a71c7",
            EntityKind::Enrollments => "6751be2a9c41d3e8f20a71c8",
        }
    }

    pub fn from_app_id(app_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.app_id() == app_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CourseStatus {
    #[default]
    #[serde(rename = "geplant")]
    Planned,
    #[serde(rename = "aktiv")]
    Active,
    #[serde(rename = "abgeschlossen")]
    Completed,
    #[serde(rename = "abgesagt")]
    Cancelled,
}

impl CourseStatus {
    pub const ALL: [CourseStatus; 4] = [
        CourseStatus::Planned,
        CourseStatus::Active,
        CourseStatus::Completed,
        CourseStatus::Cancelled,
    ];

    /// Display label as shown on the status badge.
    pub fn label(self) -> &'static str {
        match self {
            CourseStatus::Planned => "Geplant",
            CourseStatus::Active => "Aktiv",
            CourseStatus::Completed => "Abgeschlossen",
            CourseStatus::Cancelled => "Abgesagt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_status_uses_store_wire_values() {
        assert_eq!(
            serde_json::to_string(&CourseStatus::Planned).expect("serialize"),
            "\"geplant\""
        );
        assert_eq!(
            serde_json::from_str::<CourseStatus>("\"abgesagt\"").expect("deserialize"),
            CourseStatus::Cancelled
        );
    }

    #[test]
    fn course_status_labels_are_capitalized_german() {
        assert_eq!(CourseStatus::Planned.label(), "Geplant");
        assert_eq!(CourseStatus::Completed.label(), "Abgeschlossen");
    }

    #[test]
    fn entity_kind_round_trips_through_app_id() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_app_id(kind.app_id()), Some(kind));
        }
        assert_eq!(EntityKind::from_app_id("not-an-app"), None);
    }
}
