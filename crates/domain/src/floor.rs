//! Floor — one level of the house, holding rooms.

use serde::{Deserialize, Serialize};

use crate::room::Room;

/// One level of the house. Identity is the 1-based level number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub level: i64,
    pub rooms: Vec<Room>,
}

impl Floor {
    /// Create an empty floor at the given level.
    #[must_use]
    pub fn new(level: i64) -> Self {
        Self {
            level,
            rooms: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_empty_floor_at_level() {
        let floor = Floor::new(2);
        assert_eq!(floor.level, 2);
        assert!(floor.rooms.is_empty());
    }
}
