use thiserror::Error;

/// Errors raised by domain operations outside the booking state machine
/// (status transitions, lookups, configuration of the catalog).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Invalid transition for reservation {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: &'static str,
        to: &'static str,
    },

    #[error("Storage: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether this error is likely transient (store unreachable, timeout)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

/// Errors reported by the external collaborators (catalog, reservation
/// and favorites sources).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store refused a commit because it overlaps active reservations.
    #[error("Reservation overlaps active reservation(s): {}", conflicting_ids.join(", "))]
    Conflict { conflicting_ids: Vec<String> },

    #[error("Record not found: {0}")]
    NotFound(String),

    /// A compare-and-set status change found the record in another status.
    #[error("Reservation {id} is {actual}, cannot move {from} -> {to}")]
    Transition {
        id: String,
        from: &'static str,
        to: &'static str,
        actual: &'static str,
    },

    /// Read or write failed (connection lost, timeout, ...).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { conflicting_ids } => {
                DomainError::Conflict(conflicting_ids.join(", "))
            }
            StoreError::NotFound(id) => DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id,
            },
            StoreError::Transition { id, to, actual, .. } => DomainError::InvalidTransition {
                id,
                from: actual,
                to,
            },
            StoreError::Unavailable(msg) => DomainError::Storage(msg),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_unavailable_maps_to_transient_storage_error() {
        let err: DomainError = StoreError::Unavailable("timeout".into()).into();
        assert_eq!(err, DomainError::Storage("timeout".into()));
        assert!(err.is_transient());
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err: DomainError = StoreError::NotFound("r-1".into()).into();
        assert!(matches!(err, DomainError::NotFound { ref value, .. } if value == "r-1"));
        assert!(!err.is_transient());
    }

    #[test]
    fn stale_transition_reports_the_stored_status() {
        let err: DomainError = StoreError::Transition {
            id: "r-1".into(),
            from: "active",
            to: "completed",
            actual: "cancelled",
        }
        .into();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                id: "r-1".into(),
                from: "cancelled",
                to: "completed",
            }
        );
    }

    #[test]
    fn conflict_message_lists_ids() {
        let err = StoreError::Conflict {
            conflicting_ids: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "Reservation overlaps active reservation(s): a, b"
        );
    }
}
