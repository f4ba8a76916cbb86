//! Room — a named space on a floor, holding devices.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::{DomusError, ValidationError};

/// A room within a floor.
///
/// Identity is the name, which is unique across the whole house — the
/// aggregation queries correlate by it. `storage_id` is the relational row
/// id, only meaningful while loading the structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub storage_id: i64,
    pub name: String,
    /// Floor area in square meters, strictly positive.
    pub area: f64,
    pub devices: Vec<Device>,
}

impl Room {
    /// Create a builder for constructing a [`Room`].
    #[must_use]
    pub fn builder() -> RoomBuilder {
        RoomBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Validation`] when the name is empty or the area
    /// is not strictly positive.
    pub fn validate(&self) -> Result<(), DomusError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.area <= 0.0 {
            return Err(ValidationError::NonPositiveArea.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Room`].
#[derive(Debug, Default)]
pub struct RoomBuilder {
    storage_id: Option<i64>,
    name: Option<String>,
    area: Option<f64>,
    devices: Vec<Device>,
}

impl RoomBuilder {
    #[must_use]
    pub fn storage_id(mut self, storage_id: i64) -> Self {
        self.storage_id = Some(storage_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    #[must_use]
    pub fn device(mut self, device: Device) -> Self {
        self.devices.push(device);
        self
    }

    /// Consume the builder, validate, and return a [`Room`].
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Validation`] if the name is missing or the area
    /// is not strictly positive.
    pub fn build(self) -> Result<Room, DomusError> {
        let room = Room {
            storage_id: self.storage_id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            area: self.area.unwrap_or_default(),
            devices: self.devices,
        };
        room.validate()?;
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_room_when_name_and_area_provided() {
        let room = Room::builder()
            .storage_id(1)
            .name("Living Room")
            .area(39.75)
            .build()
            .unwrap();
        assert_eq!(room.name, "Living Room");
        assert_eq!(room.area, 39.75);
        assert!(room.devices.is_empty());
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Room::builder().area(12.0).build();
        assert!(matches!(
            result,
            Err(DomusError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_area_is_not_positive() {
        let result = Room::builder().name("Closet").area(0.0).build();
        assert!(matches!(
            result,
            Err(DomusError::Validation(ValidationError::NonPositiveArea))
        ));
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let room = Room::builder()
            .storage_id(3)
            .name("Kitchen")
            .area(20.0)
            .build()
            .unwrap();
        let json = serde_json::to_string(&room).unwrap();
        let parsed: Room = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, room);
    }
}
