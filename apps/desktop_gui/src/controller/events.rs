//! UI/backend events and error modeling for the dashboard controller layer.

use client_core::{
    CoursesSnapshot, EnrollmentsSnapshot, InstructorsSnapshot, OverviewSnapshot,
    ParticipantsSnapshot, RoomsSnapshot,
};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    Overview(OverviewSnapshot),
    Instructors(InstructorsSnapshot),
    Rooms(RoomsSnapshot),
    Participants(ParticipantsSnapshot),
    Courses(CoursesSnapshot),
    Enrollments(EnrollmentsSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Startup,
    Load,
    Save,
    Delete,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("invalid token")
            || message_lower.contains("invalid credential")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("validation")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("dns")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Auth => "Authentifizierung",
        UiErrorCategory::Transport => "Verbindung",
        UiErrorCategory::Validation => "Validierung",
        UiErrorCategory::Unknown => "Unerwarteter Fehler",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_unauthorized_store_answers_as_auth() {
        let err = UiError::from_message(UiErrorContext::Load, "Unauthorized: store returned 401");
        assert_eq!(err.category(), UiErrorCategory::Auth);
        assert_eq!(err.context(), UiErrorContext::Load);
    }

    #[test]
    fn classifies_unreachable_store_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::Startup,
            "error sending request: connection refused",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn everything_else_is_unknown() {
        let err = UiError::from_message(UiErrorContext::Save, "boom");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.message(), "boom");
    }
}
