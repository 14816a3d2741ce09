//! Observable session status and the flattened view a screen renders.

/// Status of the current attempt. Observers get snapshots; only the session writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Done { message: String, is_error: bool },
}

impl SessionStatus {
    pub fn success(message: impl Into<String>) -> Self {
        SessionStatus::Done {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SessionStatus::Done {
            message: message.into(),
            is_error: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionStatus::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SessionStatus::Done { is_error: true, .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SessionStatus::Done { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn ui_state(&self) -> UiState {
        UiState {
            is_loading: self.is_loading(),
            message: self.message().map(str::to_string),
            error: self.is_error(),
        }
    }
}

/// Loading flag, optional message, error flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub is_loading: bool,
    pub message: Option<String>,
    pub error: bool,
}
