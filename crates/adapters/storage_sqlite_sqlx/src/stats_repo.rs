//! `SQLite` implementation of [`StatisticsRepository`] — the aggregation
//! queries over the measurement series.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use domus_app::ports::StatisticsRepository;
use domus_domain::device::HUMIDITY_SENSOR;
use domus_domain::error::{DomusError, StructureError};
use domus_domain::measurement::unit;

use crate::error::StorageError;

/// Wrapper for converting aggregated rows into `(day, mean)` pairs.
struct DailyAverage {
    day: NaiveDate,
    average: f64,
}

impl<'r> FromRow<'r, SqliteRow> for DailyAverage {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let day: String = row.try_get("day")?;
        let average: f64 = row.try_get("avg_value")?;

        let day = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self { day, average })
    }
}

// Any device in the room contributes as long as the unit matches: dedicated
// temperature sensors as well as actuators with an embedded one.
const SELECT_AVG_TEMP: &str = r"
    SELECT date(m.recorded_at) AS day, AVG(m.value) AS avg_value
    FROM measurements m
    JOIN devices d ON m.device_id = d.id
    JOIN rooms r ON d.room_id = r.id
    WHERE r.name = ? AND m.unit = ?
";

const SELECT_ROOM_ID_BY_NAME: &str = "SELECT id FROM rooms WHERE name = ?";

// Each measurement is compared against the mean of its own (room, date,
// hour, unit) bucket; an hour qualifies once more than three of its readings
// lie strictly above that mean.
const SELECT_HUMIDITY_ALERT_HOURS: &str = r"
    SELECT CAST(hour AS INTEGER) AS alert_hour
    FROM (
        SELECT strftime('%H', m.recorded_at) AS hour,
               m.value AS value,
               AVG(m.value) OVER (PARTITION BY strftime('%H', m.recorded_at)) AS hour_avg
        FROM measurements m
        JOIN devices d ON m.device_id = d.id
        WHERE d.room_id = ? AND d.kind = ? AND m.unit = ? AND date(m.recorded_at) = ?
    )
    WHERE value > hour_avg
    GROUP BY hour
    HAVING COUNT(*) > 3
    ORDER BY alert_hour
";

/// `SQLite`-backed statistics repository.
pub struct SqliteStatisticsRepository {
    pool: SqlitePool,
}

impl SqliteStatisticsRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl StatisticsRepository for SqliteStatisticsRepository {
    fn avg_daily_temperature(
        &self,
        room_name: String,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> impl Future<Output = Result<BTreeMap<NaiveDate, f64>, DomusError>> + Send {
        let pool = self.pool.clone();
        async move {
            // Bounds are compared on the calendar date, so both ends are
            // inclusive of their whole day.
            let mut sql = SELECT_AVG_TEMP.to_string();
            if from.is_some() {
                sql.push_str(" AND date(m.recorded_at) >= ?");
            }
            if until.is_some() {
                sql.push_str(" AND date(m.recorded_at) <= ?");
            }
            sql.push_str(" GROUP BY date(m.recorded_at)");

            let mut query = sqlx::query_as::<_, DailyAverage>(&sql)
                .bind(room_name)
                .bind(unit::CELSIUS);
            if let Some(from) = from {
                query = query.bind(from.to_string());
            }
            if let Some(until) = until {
                query = query.bind(until.to_string());
            }

            let rows = query.fetch_all(&pool).await.map_err(StorageError::from)?;

            Ok(rows
                .into_iter()
                .map(|row| (row.day, row.average))
                .collect())
        }
    }

    fn humidity_alert_hours(
        &self,
        room_name: String,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<u32>, DomusError>> + Send {
        let pool = self.pool.clone();
        async move {
            let room_id: Option<i64> = sqlx::query_scalar(SELECT_ROOM_ID_BY_NAME)
                .bind(&room_name)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            let Some(room_id) = room_id else {
                return Err(StructureError::UnknownRoom(room_name).into());
            };

            let hours: Vec<u32> = sqlx::query_scalar(SELECT_HUMIDITY_ALERT_HOURS)
                .bind(room_id)
                .bind(HUMIDITY_SENSOR)
                .bind(unit::PERCENT)
                .bind(date.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(hours)
        }
    }
}
