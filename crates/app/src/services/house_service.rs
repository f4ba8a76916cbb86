//! House service — the single facade callers use for structure, measurement,
//! state, and statistics operations.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use domus_domain::device::{ActuatorState, Device};
use domus_domain::error::{DomusError, NotFoundError};
use domus_domain::house::SmartHouse;
use domus_domain::id::DeviceId;
use domus_domain::measurement::Measurement;

use crate::ports::{
    ActuatorStateRepository, MeasurementStore, StatisticsRepository, StructureRepository,
};

/// Application facade composing the storage ports.
///
/// Measurement and state operations are gated on the device existing and
/// having the right capability; the storage layer itself does not check.
pub struct SmartHouseService<S, M, A, T> {
    structure: S,
    measurements: M,
    states: A,
    statistics: T,
}

impl<S, M, A, T> SmartHouseService<S, M, A, T>
where
    S: StructureRepository,
    M: MeasurementStore,
    A: ActuatorStateRepository,
    T: StatisticsRepository,
{
    /// Create a new facade backed by the given repositories.
    pub fn new(structure: S, measurements: M, states: A, statistics: T) -> Self {
        Self {
            structure,
            measurements,
            states,
            statistics,
        }
    }

    /// Deep-load the house graph and check its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Structure`] for an empty or inconsistent stored
    /// structure, [`DomusError::Validation`] if the loaded graph violates an
    /// invariant, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn load_structure(&self) -> Result<SmartHouse, DomusError> {
        let house = self.structure.load_structure().await?;
        house.validate()?;
        Ok(house)
    }

    /// Look up a device by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn find_device(&self, id: DeviceId) -> Result<Option<Device>, DomusError> {
        self.structure.find_device_by_id(id).await
    }

    /// Record a measurement for a sensing device, stamped with the current
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::NotFound`] when the device does not exist or
    /// cannot sense, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn record_measurement(
        &self,
        device_id: DeviceId,
        value: f64,
        unit: String,
    ) -> Result<Measurement, DomusError> {
        self.require_sensor(&device_id).await?;
        let measurement = Measurement::builder()
            .device_id(device_id)
            .value(value)
            .unit(unit)
            .build();
        self.measurements.append(measurement).await
    }

    /// The most recent measurement for a sensing device, or `None` when it
    /// has not reported yet.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::NotFound`] when the device does not exist or
    /// cannot sense, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn latest_measurement(
        &self,
        device_id: DeviceId,
    ) -> Result<Option<Measurement>, DomusError> {
        self.require_sensor(&device_id).await?;
        self.measurements.latest(device_id).await
    }

    /// Delete the single oldest measurement for a sensing device; no-op when
    /// it has none.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::NotFound`] when the device does not exist or
    /// cannot sense, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_oldest_measurement(&self, device_id: DeviceId) -> Result<(), DomusError> {
        self.require_sensor(&device_id).await?;
        self.measurements.delete_oldest(device_id).await
    }

    /// The persisted state of an actuator, or `None` when no state row
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::NotFound`] when the device does not exist or
    /// holds no state, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn read_actuator_state(
        &self,
        device_id: DeviceId,
    ) -> Result<Option<ActuatorState>, DomusError> {
        self.require_actuator(&device_id).await?;
        self.states.read_state(device_id).await
    }

    /// Persist a new state for an actuator.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::NotFound`] when the device does not exist or
    /// holds no state, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn write_actuator_state(
        &self,
        device_id: DeviceId,
        state: ActuatorState,
    ) -> Result<(), DomusError> {
        self.require_actuator(&device_id).await?;
        self.states.write_state(device_id, state).await
    }

    /// Mean temperature per calendar day in the named room, optionally
    /// bounded by an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn avg_daily_temperature(
        &self,
        room_name: String,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<BTreeMap<NaiveDate, f64>, DomusError> {
        self.statistics
            .avg_daily_temperature(room_name, from, until)
            .await
    }

    /// Hours of the given day with anomalously many above-average humidity
    /// readings in the named room.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Structure`] when the room is unknown, or a
    /// storage error.
    #[tracing::instrument(skip(self))]
    pub async fn humidity_alert_hours(
        &self,
        room_name: String,
        date: NaiveDate,
    ) -> Result<Vec<u32>, DomusError> {
        self.statistics.humidity_alert_hours(room_name, date).await
    }

    async fn require_sensor(&self, device_id: &DeviceId) -> Result<Device, DomusError> {
        match self.structure.find_device_by_id(device_id.clone()).await? {
            Some(device) if device.is_sensor() => Ok(device),
            _ => Err(NotFoundError {
                entity: "Sensor",
                id: device_id.to_string(),
            }
            .into()),
        }
    }

    async fn require_actuator(&self, device_id: &DeviceId) -> Result<Device, DomusError> {
        match self.structure.find_device_by_id(device_id.clone()).await? {
            Some(device) if device.is_actuator() => Ok(device),
            _ => Err(NotFoundError {
                entity: "Actuator",
                id: device_id.to_string(),
            }
            .into()),
        }
    }
}
