//! SmartHouse — the aggregate root owning floors, rooms, and devices.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::{DomusError, StructureError, ValidationError};
use crate::floor::Floor;
use crate::room::Room;

/// The full house structure: floors in ascending level order, each owning
/// its rooms, each room owning its devices. Built once by a deep load and
/// only mutated through the `register_*` calls while loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartHouse {
    floors: Vec<Floor>,
}

impl SmartHouse {
    /// Create an empty house.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next floor. Levels must be registered in ascending
    /// order starting at 1.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Validation`] when `level` is not the next
    /// contiguous level.
    pub fn register_floor(&mut self, level: i64) -> Result<(), DomusError> {
        let expected = self.floors.last().map_or(1, |floor| floor.level + 1);
        if level != expected {
            return Err(ValidationError::NonContiguousFloors {
                expected,
                found: level,
            }
            .into());
        }
        self.floors.push(Floor::new(level));
        Ok(())
    }

    /// Register a room under the floor with the given level.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Validation`] for an invalid room or a duplicate
    /// room name, and [`DomusError::Structure`] when no such floor exists.
    pub fn register_room(&mut self, floor_level: i64, room: Room) -> Result<(), DomusError> {
        room.validate()?;
        if self.room_by_name(&room.name).is_some() {
            return Err(ValidationError::DuplicateRoomName(room.name).into());
        }
        let floor = self
            .floors
            .iter_mut()
            .find(|floor| floor.level == floor_level)
            .ok_or_else(|| StructureError::UnknownFloor {
                room: room.name.clone(),
                level: floor_level,
            })?;
        floor.rooms.push(room);
        Ok(())
    }

    /// Register a device under the room with the given storage row id.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Validation`] for an invalid device or a
    /// duplicate device id, and [`DomusError::Structure`] when the room row
    /// id resolves to nothing (a referential-integrity violation).
    pub fn register_device(
        &mut self,
        room_storage_id: i64,
        device: Device,
    ) -> Result<(), DomusError> {
        device.validate()?;
        if self.device_by_id(device.id.as_str()).is_some() {
            return Err(ValidationError::DuplicateDeviceId(device.id.to_string()).into());
        }
        let room = self
            .floors
            .iter_mut()
            .flat_map(|floor| floor.rooms.iter_mut())
            .find(|room| room.storage_id == room_storage_id)
            .ok_or_else(|| StructureError::DanglingDevice {
                device: device.id.to_string(),
                room: room_storage_id,
            })?;
        room.devices.push(device);
        Ok(())
    }

    /// Check the whole-graph invariants: contiguous 1-based floor levels,
    /// unique room names, unique device ids, and per-node validity.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Validation`] naming the first violation.
    pub fn validate(&self) -> Result<(), DomusError> {
        let mut expected = 1;
        for floor in &self.floors {
            if floor.level != expected {
                return Err(ValidationError::NonContiguousFloors {
                    expected,
                    found: floor.level,
                }
                .into());
            }
            expected += 1;
        }

        let mut names = HashSet::new();
        for room in self.rooms() {
            room.validate()?;
            if !names.insert(room.name.as_str()) {
                return Err(ValidationError::DuplicateRoomName(room.name.clone()).into());
            }
        }

        let mut ids = HashSet::new();
        for device in self.devices() {
            device.validate()?;
            if !ids.insert(device.id.as_str()) {
                return Err(ValidationError::DuplicateDeviceId(device.id.to_string()).into());
            }
        }

        Ok(())
    }

    /// The floors in ascending level order.
    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    /// All rooms across all floors.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.floors.iter().flat_map(|floor| floor.rooms.iter())
    }

    /// All devices across all rooms.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.rooms().flat_map(|room| room.devices.iter())
    }

    /// Look up a floor by its level number.
    #[must_use]
    pub fn floor_by_level(&self, level: i64) -> Option<&Floor> {
        self.floors.iter().find(|floor| floor.level == level)
    }

    /// Look up a room by its name.
    #[must_use]
    pub fn room_by_name(&self, name: &str) -> Option<&Room> {
        self.rooms().find(|room| room.name == name)
    }

    /// Look up a device by its identifier.
    #[must_use]
    pub fn device_by_id(&self, id: &str) -> Option<&Device> {
        self.devices().find(|device| device.id.as_str() == id)
    }

    /// Mutable lookup of a device by its identifier.
    pub fn device_by_id_mut(&mut self, id: &str) -> Option<&mut Device> {
        self.floors
            .iter_mut()
            .flat_map(|floor| floor.rooms.iter_mut())
            .flat_map(|room| room.devices.iter_mut())
            .find(|device| device.id.as_str() == id)
    }

    /// Total floor area of the house, summed over all rooms.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.rooms().map(|room| room.area).sum()
    }
}
