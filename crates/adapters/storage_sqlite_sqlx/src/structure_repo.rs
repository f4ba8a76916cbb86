//! `SQLite` implementation of [`StructureRepository`] — the deep load.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use domus_app::ports::StructureRepository;
use domus_domain::device::{ActuatorState, Device, DeviceVariant};
use domus_domain::error::{DomusError, StructureError};
use domus_domain::house::SmartHouse;
use domus_domain::id::DeviceId;
use domus_domain::room::Room;

use crate::error::StorageError;

/// Wrapper for converting room rows into a domain [`Room`] plus its floor
/// number.
struct RoomRow {
    floor: i64,
    room: Room,
}

impl<'r> FromRow<'r, SqliteRow> for RoomRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let floor: i64 = row.try_get("floor")?;
        let area: f64 = row.try_get("area")?;
        let name: String = row.try_get("name")?;

        Ok(Self {
            floor,
            room: Room {
                storage_id: id,
                name,
                area,
                devices: Vec::new(),
            },
        })
    }
}

/// Wrapper for converting device rows into a domain [`Device`] plus its
/// owning room row id. The stored `(category, kind)` pair picks the variant.
struct DeviceRow {
    room_id: i64,
    device: Device,
}

impl<'r> FromRow<'r, SqliteRow> for DeviceRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let room_id: i64 = row.try_get("room_id")?;
        let kind: String = row.try_get("kind")?;
        let category: String = row.try_get("category")?;
        let supplier: String = row.try_get("supplier")?;
        let product: String = row.try_get("product")?;

        let variant = DeviceVariant::from_category(&category, &kind).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown device category {category:?}").into())
        })?;

        Ok(Self {
            room_id,
            device: Device {
                id: DeviceId::new(id),
                product,
                supplier,
                kind,
                variant,
            },
        })
    }
}

const SELECT_MAX_FLOOR: &str = "SELECT MAX(floor) FROM rooms";
const SELECT_ROOMS: &str = "SELECT id, floor, area, name FROM rooms";
const SELECT_DEVICES: &str = "SELECT id, room_id, kind, category, supplier, product FROM devices";
const SELECT_DEVICE_BY_ID: &str =
    "SELECT id, room_id, kind, category, supplier, product FROM devices WHERE id = ?";
const SELECT_STATE_BY_DEVICE: &str = "SELECT state FROM device_states WHERE device_id = ?";

/// `SQLite`-backed structure repository.
pub struct SqliteStructureRepository {
    pool: SqlitePool,
}

impl SqliteStructureRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Fetch the raw state column for one device. The outer `Option` is the row,
/// the inner one the nullable column.
async fn fetch_raw_state(
    pool: &SqlitePool,
    device_id: &DeviceId,
) -> Result<Option<Option<f64>>, DomusError> {
    let row: Option<(Option<f64>,)> = sqlx::query_as(SELECT_STATE_BY_DEVICE)
        .bind(device_id.as_str())
        .fetch_optional(pool)
        .await
        .map_err(StorageError::from)?;

    Ok(row.map(|(raw,)| raw))
}

impl StructureRepository for SqliteStructureRepository {
    fn load_structure(&self) -> impl Future<Output = Result<SmartHouse, DomusError>> + Send {
        let pool = self.pool.clone();
        async move {
            let max_floor: Option<i64> = sqlx::query_scalar(SELECT_MAX_FLOOR)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let Some(levels) = max_floor else {
                return Err(StructureError::EmptyStructure.into());
            };

            let mut house = SmartHouse::new();
            for level in 1..=levels {
                house.register_floor(level)?;
            }

            let rooms: Vec<RoomRow> = sqlx::query_as(SELECT_ROOMS)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            for row in rooms {
                house.register_room(row.floor, row.room)?;
            }

            let devices: Vec<DeviceRow> = sqlx::query_as(SELECT_DEVICES)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            for row in devices {
                house.register_device(row.room_id, row.device)?;
            }

            let actuator_ids: Vec<DeviceId> = house
                .devices()
                .filter(|device| device.is_actuator())
                .map(|device| device.id.clone())
                .collect();
            for device_id in actuator_ids {
                match fetch_raw_state(&pool, &device_id).await? {
                    Some(raw) => {
                        if let Some(state) = house
                            .device_by_id_mut(device_id.as_str())
                            .and_then(Device::state_mut)
                        {
                            *state = ActuatorState::decode(raw);
                        }
                    }
                    None => {
                        tracing::warn!(
                            device = %device_id,
                            "no persisted state for actuator, defaulting to off"
                        );
                    }
                }
            }

            Ok(house)
        }
    }

    fn find_device_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, DomusError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<DeviceRow> = sqlx::query_as(SELECT_DEVICE_BY_ID)
                .bind(id.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            let Some(row) = row else {
                return Ok(None);
            };

            let mut device = row.device;
            if device.is_actuator() {
                // a missing row and a NULL column both decode to off here
                let raw = fetch_raw_state(&pool, &device.id).await?.flatten();
                if let Some(state) = device.state_mut() {
                    *state = ActuatorState::decode(raw);
                }
            }
            Ok(Some(device))
        }
    }
}
