//! `SQLite` implementation of [`ActuatorStateRepository`].
//!
//! States cross the storage boundary through the numeric codec on
//! [`ActuatorState`]: the table holds one nullable REAL per device.

use std::future::Future;

use sqlx::SqlitePool;

use domus_app::ports::ActuatorStateRepository;
use domus_domain::device::ActuatorState;
use domus_domain::error::DomusError;
use domus_domain::id::DeviceId;

use crate::error::StorageError;

const SELECT_STATE: &str = "SELECT state FROM device_states WHERE device_id = ?";

const UPSERT_STATE: &str = r"
    INSERT INTO device_states (device_id, state)
    VALUES (?, ?)
    ON CONFLICT (device_id) DO UPDATE SET state = excluded.state
";

/// `SQLite`-backed actuator state repository.
pub struct SqliteActuatorStateRepository {
    pool: SqlitePool,
}

impl SqliteActuatorStateRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ActuatorStateRepository for SqliteActuatorStateRepository {
    fn read_state(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<ActuatorState>, DomusError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<(Option<f64>,)> = sqlx::query_as(SELECT_STATE)
                .bind(device_id.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|(raw,)| ActuatorState::decode(raw)))
        }
    }

    fn write_state(
        &self,
        device_id: DeviceId,
        state: ActuatorState,
    ) -> impl Future<Output = Result<(), DomusError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT_STATE)
                .bind(device_id.as_str())
                .bind(state.encode())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteActuatorStateRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteActuatorStateRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_return_none_when_device_has_no_state_row() {
        let repo = setup().await;
        let state = repo.read_state(DeviceId::new("pump-1")).await.unwrap();
        assert!(state.is_none());
    }

    #[tokio::test]
    async fn should_roundtrip_every_state_through_the_codec() {
        let repo = setup().await;
        for state in [
            ActuatorState::Off,
            ActuatorState::On,
            ActuatorState::OnWithLevel(21.5),
        ] {
            repo.write_state(DeviceId::new("pump-1"), state)
                .await
                .unwrap();
            let read = repo.read_state(DeviceId::new("pump-1")).await.unwrap();
            assert_eq!(read, Some(state));
        }
    }

    #[tokio::test]
    async fn should_store_off_as_a_row_with_null_state() {
        let repo = setup().await;
        repo.write_state(DeviceId::new("pump-1"), ActuatorState::Off)
            .await
            .unwrap();

        // a row exists, so the read is Some(Off), distinct from "no row"
        let read = repo.read_state(DeviceId::new("pump-1")).await.unwrap();
        assert_eq!(read, Some(ActuatorState::Off));
    }

    #[tokio::test]
    async fn should_overwrite_existing_state_on_second_write() {
        let repo = setup().await;
        repo.write_state(DeviceId::new("pump-1"), ActuatorState::On)
            .await
            .unwrap();
        repo.write_state(DeviceId::new("pump-1"), ActuatorState::OnWithLevel(3.5))
            .await
            .unwrap();

        let read = repo.read_state(DeviceId::new("pump-1")).await.unwrap();
        assert_eq!(read, Some(ActuatorState::OnWithLevel(3.5)));
    }

    #[tokio::test]
    async fn should_keep_states_separate_per_device() {
        let repo = setup().await;
        repo.write_state(DeviceId::new("pump-1"), ActuatorState::On)
            .await
            .unwrap();
        repo.write_state(DeviceId::new("plug-1"), ActuatorState::OnWithLevel(0.5))
            .await
            .unwrap();

        assert_eq!(
            repo.read_state(DeviceId::new("pump-1")).await.unwrap(),
            Some(ActuatorState::On)
        );
        assert_eq!(
            repo.read_state(DeviceId::new("plug-1")).await.unwrap(),
            Some(ActuatorState::OnWithLevel(0.5))
        );
    }
}
