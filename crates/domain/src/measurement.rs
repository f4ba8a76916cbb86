//! Measurement — an immutable time-series fact reported by a device.

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;
use crate::time::Timestamp;

/// Measurement units understood by the aggregation queries.
pub mod unit {
    /// Temperature readings.
    pub const CELSIUS: &str = "°C";
    /// Relative humidity readings.
    pub const PERCENT: &str = "%";
}

/// A single reading: which device, what value, in which unit, when.
///
/// Measurements reference devices by id only; they are not owned by the
/// device graph and survive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub device_id: DeviceId,
    pub value: f64,
    pub unit: String,
    pub recorded_at: Timestamp,
}

impl Measurement {
    /// Create a builder for constructing a [`Measurement`].
    #[must_use]
    pub fn builder() -> MeasurementBuilder {
        MeasurementBuilder::default()
    }
}

/// Step-by-step builder for [`Measurement`].
#[derive(Debug, Default)]
pub struct MeasurementBuilder {
    device_id: Option<DeviceId>,
    value: Option<f64>,
    unit: Option<String>,
    recorded_at: Option<Timestamp>,
}

impl MeasurementBuilder {
    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn recorded_at(mut self, recorded_at: Timestamp) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Consume the builder and return a [`Measurement`].
    ///
    /// `recorded_at` defaults to the current time.
    #[must_use]
    pub fn build(self) -> Measurement {
        Measurement {
            device_id: self.device_id.unwrap_or_default(),
            value: self.value.unwrap_or_default(),
            unit: self.unit.unwrap_or_default(),
            recorded_at: self.recorded_at.unwrap_or_else(crate::time::now),
        }
    }
}
