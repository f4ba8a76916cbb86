//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`DomusError`]
//! via `#[from]`. The storage adapter boxes its error into
//! [`DomusError::Storage`] so this crate never names IO types.

/// Top-level error for all domus operations.
#[derive(Debug, thiserror::Error)]
pub enum DomusError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The stored house structure is inconsistent or unusable.
    #[error("structure error")]
    Structure(#[from] StructureError),

    /// A referenced device or room does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The storage backend failed or is unreachable.
    #[error("storage unavailable")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Violations of domain invariants, independent of storage.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A name or identifier was empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A room area was zero or negative.
    #[error("area must be strictly positive")]
    NonPositiveArea,

    /// Floor levels must form a contiguous 1-based range.
    #[error("floor levels must be contiguous: expected {expected}, found {found}")]
    NonContiguousFloors { expected: i64, found: i64 },

    /// Room names are the correlation key for queries and must be unique.
    #[error("duplicate room name {0:?}")]
    DuplicateRoomName(String),

    /// Device ids must be unique across the whole house.
    #[error("duplicate device id {0:?}")]
    DuplicateDeviceId(String),
}

/// Referential-integrity failures discovered while reading stored structure.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// There are no rooms in storage, so no floor count can be derived.
    #[error("no rooms in storage, cannot derive any floors")]
    EmptyStructure,

    /// A device row references a room row that does not exist.
    #[error("device {device} references unknown room row {room}")]
    DanglingDevice { device: String, room: i64 },

    /// A room row references a floor outside the derived range.
    #[error("room {room:?} references unknown floor {level}")]
    UnknownFloor { room: String, level: i64 },

    /// An aggregation query named a room that is not stored.
    #[error("unknown room {0:?}")]
    UnknownRoom(String),
}

/// A lookup by identifier matched nothing.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// What was looked up (e.g. `"Device"`, `"Sensor"`, `"Actuator"`).
    pub entity: &'static str,
    /// The identifier that matched nothing.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_structure_error_into_domus_error() {
        let err: DomusError = StructureError::EmptyStructure.into();
        assert!(matches!(
            err,
            DomusError::Structure(StructureError::EmptyStructure)
        ));
    }

    #[test]
    fn should_render_dangling_device_with_both_ids() {
        let err = StructureError::DanglingDevice {
            device: "dev-1".to_string(),
            room: 42,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("dev-1"));
        assert!(rendered.contains("42"));
    }

    #[test]
    fn should_render_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Sensor",
            id: "dev-9".to_string(),
        };
        assert_eq!(err.to_string(), "Sensor dev-9 not found");
    }
}
