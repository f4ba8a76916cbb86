//! Storage ports — repository traits for persistence.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::NaiveDate;

use domus_domain::device::{ActuatorState, Device};
use domus_domain::error::DomusError;
use domus_domain::house::SmartHouse;
use domus_domain::id::DeviceId;
use domus_domain::measurement::Measurement;

/// Reconstruction of the house structure from flat storage.
pub trait StructureRepository {
    /// Deep-load the full floor → room → device graph, including persisted
    /// actuator states.
    fn load_structure(&self) -> impl Future<Output = Result<SmartHouse, DomusError>> + Send;

    /// Look up a single device row by id, state hydrated.
    fn find_device_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, DomusError>> + Send;
}

/// Append-only measurement series, keyed by device id.
///
/// This layer does not check that the device exists — that is the caller's
/// responsibility (the facade gates on it).
pub trait MeasurementStore {
    /// Durably persist one measurement.
    fn append(
        &self,
        measurement: Measurement,
    ) -> impl Future<Output = Result<Measurement, DomusError>> + Send;

    /// The measurement with the greatest `(recorded_at, insertion order)`
    /// for the device, or `None` when it has none.
    fn latest(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, DomusError>> + Send;

    /// Delete exactly the single oldest measurement for the device; no-op
    /// when it has none.
    fn delete_oldest(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<(), DomusError>> + Send;
}

/// Persisted actuator state, stored through the numeric codec.
pub trait ActuatorStateRepository {
    /// The decoded state, or `None` when the device has no state row.
    fn read_state(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<ActuatorState>, DomusError>> + Send;

    /// Encode and upsert the state in one atomic statement.
    fn write_state(
        &self,
        device_id: DeviceId,
        state: ActuatorState,
    ) -> impl Future<Output = Result<(), DomusError>> + Send;
}

/// Read-only aggregation queries over the measurement series.
pub trait StatisticsRepository {
    /// Mean temperature per calendar day for all sensing devices in the
    /// named room, optionally bounded by an inclusive date range. Unknown
    /// rooms yield an empty map.
    fn avg_daily_temperature(
        &self,
        room_name: String,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> impl Future<Output = Result<BTreeMap<NaiveDate, f64>, DomusError>> + Send;

    /// Hours of the given day in which more than three humidity readings in
    /// the named room exceeded that hour's own average. Sorted, distinct.
    ///
    /// Fails with [`StructureError::UnknownRoom`](domus_domain::error::StructureError)
    /// when the room name is not stored.
    fn humidity_alert_hours(
        &self,
        room_name: String,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<u32>, DomusError>> + Send;
}
