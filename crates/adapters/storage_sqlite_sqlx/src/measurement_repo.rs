//! `SQLite` implementation of [`MeasurementStore`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use domus_app::ports::MeasurementStore;
use domus_domain::error::DomusError;
use domus_domain::id::DeviceId;
use domus_domain::measurement::Measurement;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Measurement`]s without
/// polluting the domain struct with database concerns.
struct Wrapper(Measurement);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device_id: String = row.try_get("device_id")?;
        let value: f64 = row.try_get("value")?;
        let unit: String = row.try_get("unit")?;
        let recorded_at_str: String = row.try_get("recorded_at")?;

        let recorded_at = chrono::DateTime::parse_from_rfc3339(&recorded_at_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(Measurement {
            device_id: DeviceId::new(device_id),
            value,
            unit,
            recorded_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO measurements (device_id, value, unit, recorded_at)
    VALUES (?, ?, ?, ?)
";

// id is the insertion sequence; it breaks ties between equal timestamps.
const SELECT_LATEST: &str = r"
    SELECT device_id, value, unit, recorded_at FROM measurements
    WHERE device_id = ?
    ORDER BY recorded_at DESC, id DESC
    LIMIT 1
";

const DELETE_OLDEST: &str = r"
    DELETE FROM measurements
    WHERE id IN (
        SELECT id FROM measurements
        WHERE device_id = ?
        ORDER BY recorded_at ASC, id ASC
        LIMIT 1
    )
";

/// `SQLite`-backed append-only measurement store.
pub struct SqliteMeasurementStore {
    pool: SqlitePool,
}

impl SqliteMeasurementStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MeasurementStore for SqliteMeasurementStore {
    fn append(
        &self,
        measurement: Measurement,
    ) -> impl Future<Output = Result<Measurement, DomusError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(measurement.device_id.as_str())
                .bind(measurement.value)
                .bind(&measurement.unit)
                .bind(measurement.recorded_at.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(measurement)
        }
    }

    fn latest(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, DomusError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_LATEST)
                .bind(device_id.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|wrapper| wrapper.0))
        }
    }

    fn delete_oldest(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<(), DomusError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_OLDEST)
                .bind(device_id.as_str())
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
    use chrono::{Duration, Utc};
    use domus_domain::measurement::unit;
    use domus_domain::time::now;

    async fn setup() -> SqliteMeasurementStore {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteMeasurementStore::new(db.pool().clone())
    }

    fn reading(device_id: &str, value: f64, recorded_at: chrono::DateTime<Utc>) -> Measurement {
        Measurement::builder()
            .device_id(device_id)
            .value(value)
            .unit(unit::CELSIUS)
            .recorded_at(recorded_at)
            .build()
    }

    async fn count(store: &SqliteMeasurementStore, device_id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM measurements WHERE device_id = ?")
            .bind(device_id)
            .fetch_one(&store.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_appended_measurement_as_latest() {
        let store = setup().await;
        let measurement = reading("temp-1", 21.5, now());

        store.append(measurement.clone()).await.unwrap();

        let latest = store.latest(DeviceId::new("temp-1")).await.unwrap().unwrap();
        assert_eq!(latest, measurement);
    }

    #[tokio::test]
    async fn should_return_none_when_device_has_no_measurements() {
        let store = setup().await;
        let latest = store.latest(DeviceId::new("temp-1")).await.unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn should_pick_greatest_timestamp_as_latest() {
        let store = setup().await;
        let base = now();
        store.append(reading("temp-1", 20.0, base)).await.unwrap();
        store
            .append(reading("temp-1", 23.0, base + Duration::hours(2)))
            .await
            .unwrap();
        store
            .append(reading("temp-1", 21.0, base + Duration::hours(1)))
            .await
            .unwrap();

        let latest = store.latest(DeviceId::new("temp-1")).await.unwrap().unwrap();
        assert_eq!(latest.value, 23.0);
    }

    #[tokio::test]
    async fn should_break_timestamp_ties_by_insertion_order() {
        let store = setup().await;
        let ts = now();
        store.append(reading("temp-1", 20.0, ts)).await.unwrap();
        store.append(reading("temp-1", 21.0, ts)).await.unwrap();

        let latest = store.latest(DeviceId::new("temp-1")).await.unwrap().unwrap();
        assert_eq!(latest.value, 21.0);
    }

    #[tokio::test]
    async fn should_delete_oldest_and_keep_the_rest() {
        let store = setup().await;
        let base = now();
        store.append(reading("temp-1", 18.0, base)).await.unwrap();
        store
            .append(reading("temp-1", 22.0, base + Duration::hours(1)))
            .await
            .unwrap();

        store.delete_oldest(DeviceId::new("temp-1")).await.unwrap();

        assert_eq!(count(&store, "temp-1").await, 1);
        let latest = store.latest(DeviceId::new("temp-1")).await.unwrap().unwrap();
        assert_eq!(latest.value, 22.0);
    }

    #[tokio::test]
    async fn should_delete_exactly_one_row_when_timestamps_tie() {
        let store = setup().await;
        let ts = now();
        store.append(reading("temp-1", 50.0, ts)).await.unwrap();
        store.append(reading("temp-1", 51.0, ts)).await.unwrap();
        store.append(reading("temp-1", 52.0, ts)).await.unwrap();

        store.delete_oldest(DeviceId::new("temp-1")).await.unwrap();

        assert_eq!(count(&store, "temp-1").await, 2);
        // the first-inserted row is the one that went away
        let latest = store.latest(DeviceId::new("temp-1")).await.unwrap().unwrap();
        assert_eq!(latest.value, 52.0);
    }

    #[tokio::test]
    async fn should_do_nothing_when_deleting_from_empty_series() {
        let store = setup().await;
        store.delete_oldest(DeviceId::new("temp-1")).await.unwrap();
        assert_eq!(count(&store, "temp-1").await, 0);
    }

    #[tokio::test]
    async fn should_scope_operations_to_the_given_device() {
        let store = setup().await;
        let base = now();
        store.append(reading("temp-1", 20.0, base)).await.unwrap();
        store
            .append(reading("temp-2", 99.0, base + Duration::hours(1)))
            .await
            .unwrap();

        store.delete_oldest(DeviceId::new("temp-1")).await.unwrap();

        assert_eq!(count(&store, "temp-1").await, 0);
        assert_eq!(count(&store, "temp-2").await, 1);
        let other = store.latest(DeviceId::new("temp-2")).await.unwrap().unwrap();
        assert_eq!(other.value, 99.0);
    }
}
