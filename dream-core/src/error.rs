use thiserror::Error;

/// Failures surfaced by the remote booking backend.
///
/// The backend is consumed as an opaque RPC surface; rejected mutations come
/// back as plain text, so [`BackendError::from_message`] classifies the known
/// rejection strings into typed variants. Everything else stays verbatim.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("No available seats")]
    NoSeats,

    #[error("Transport option not found")]
    OptionNotFound,

    #[error("Booking type does not match the transport option type")]
    TypeMismatch,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// Classify a raw backend error message by the substrings the backend is
    /// known to emit for rejected bookings. Unrecognized messages pass
    /// through as [`BackendError::Other`].
    pub fn from_message(message: &str) -> Self {
        if message.contains("No available seats") {
            BackendError::NoSeats
        } else if message.contains("Transport option not found") {
            BackendError::OptionNotFound
        } else if message.contains("does not match") {
            BackendError::TypeMismatch
        } else {
            BackendError::Other(message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_rejection_substrings() {
        assert!(matches!(
            BackendError::from_message("Error: No available seats for option 7"),
            BackendError::NoSeats
        ));
        assert!(matches!(
            BackendError::from_message("Transport option not found"),
            BackendError::OptionNotFound
        ));
        assert!(matches!(
            BackendError::from_message("booking type does not match transport type"),
            BackendError::TypeMismatch
        ));
    }

    #[test]
    fn unknown_messages_pass_through_verbatim() {
        let err = BackendError::from_message("backend temporarily overloaded");
        match err {
            BackendError::Other(msg) => assert_eq!(msg, "backend temporarily overloaded"),
            other => panic!("expected Other, got {other:?}"),
        }
    }
}
