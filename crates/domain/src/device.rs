//! Device — a sensor, an actuator, or a combination of both.
//!
//! The variant is a closed tagged enum rather than a hierarchy: a heat pump
//! both reports measurements and holds controllable state, so capabilities
//! are predicates over the variant, not subclasses.

use serde::{Deserialize, Serialize};

use crate::error::{DomusError, ValidationError};
use crate::id::DeviceId;

/// Device kind label of heat pumps, the one actuator kind that also senses.
pub const HEAT_PUMP: &str = "Heat Pump";

/// Device kind label of humidity sensors, used by the humidity statistics.
pub const HUMIDITY_SENSOR: &str = "Humidity Sensor";

/// Runtime state of an actuator.
///
/// Persisted as a single nullable numeric column: `NULL` is off, exactly
/// `1.0` is plain on, and any other value is on at that level. The codec is
/// the only path between the column and this type, so `OnWithLevel(1.0)`
/// never survives a persist/load cycle — it decodes back to [`Self::On`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ActuatorState {
    /// The actuator is switched off.
    #[default]
    Off,
    /// The actuator is switched on without a level.
    On,
    /// The actuator is switched on at the given level (e.g. a setpoint).
    OnWithLevel(f64),
}

impl ActuatorState {
    /// Decode the raw stored column value.
    #[must_use]
    #[allow(clippy::float_cmp)] // stored 1.0 exactly means plain `On`, not a threshold
    pub fn decode(raw: Option<f64>) -> Self {
        match raw {
            None => Self::Off,
            Some(value) if value == 1.0 => Self::On,
            Some(value) => Self::OnWithLevel(value),
        }
    }

    /// Encode into the raw column value. Exact inverse of [`Self::decode`].
    #[must_use]
    pub fn encode(self) -> Option<f64> {
        match self {
            Self::Off => None,
            Self::On => Some(1.0),
            Self::OnWithLevel(level) => Some(level),
        }
    }

    /// Switch off.
    pub fn turn_off(&mut self) {
        *self = Self::Off;
    }

    /// Switch on without a level.
    pub fn turn_on(&mut self) {
        *self = Self::On;
    }

    /// Switch on at the given level.
    pub fn turn_on_at(&mut self, level: f64) {
        *self = Self::OnWithLevel(level);
    }

    /// Whether the actuator is in any on state.
    #[must_use]
    pub fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// The closed set of device variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeviceVariant {
    /// Produces measurements only.
    Sensor,
    /// Holds controllable state only.
    Actuator(ActuatorState),
    /// Produces measurements *and* holds controllable state.
    ActuatorWithSensor(ActuatorState),
}

impl DeviceVariant {
    /// Map a stored `(category, kind)` pair onto a variant.
    ///
    /// `"sensor"` rows are sensors and `"actuator"` rows are actuators,
    /// except heat pumps, which sense their own temperature as well.
    /// Returns `None` for an unknown category.
    #[must_use]
    pub fn from_category(category: &str, kind: &str) -> Option<Self> {
        match category {
            "sensor" => Some(Self::Sensor),
            "actuator" if kind == HEAT_PUMP => {
                Some(Self::ActuatorWithSensor(ActuatorState::default()))
            }
            "actuator" => Some(Self::Actuator(ActuatorState::default())),
            _ => None,
        }
    }
}

/// A device mounted in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Model/product name, e.g. `"SensorTron 42"`.
    pub product: String,
    pub supplier: String,
    /// Human-readable kind label, e.g. `"Temperature Sensor"`.
    pub kind: String,
    pub variant: DeviceVariant,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Validation`] when the id is empty.
    pub fn validate(&self) -> Result<(), DomusError> {
        if self.id.as_str().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Whether this device produces measurements.
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        matches!(
            self.variant,
            DeviceVariant::Sensor | DeviceVariant::ActuatorWithSensor(_)
        )
    }

    /// Whether this device holds controllable state.
    #[must_use]
    pub fn is_actuator(&self) -> bool {
        matches!(
            self.variant,
            DeviceVariant::Actuator(_) | DeviceVariant::ActuatorWithSensor(_)
        )
    }

    /// The actuator state, when this device has one.
    #[must_use]
    pub fn state(&self) -> Option<ActuatorState> {
        match self.variant {
            DeviceVariant::Sensor => None,
            DeviceVariant::Actuator(state) | DeviceVariant::ActuatorWithSensor(state) => {
                Some(state)
            }
        }
    }

    /// Mutable access to the actuator state, when this device has one.
    pub fn state_mut(&mut self) -> Option<&mut ActuatorState> {
        match &mut self.variant {
            DeviceVariant::Sensor => None,
            DeviceVariant::Actuator(state) | DeviceVariant::ActuatorWithSensor(state) => {
                Some(state)
            }
        }
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    product: Option<String>,
    supplier: Option<String>,
    kind: Option<String>,
    variant: Option<DeviceVariant>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    #[must_use]
    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: DeviceVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`DomusError::Validation`] if the id is missing or empty.
    pub fn build(self) -> Result<Device, DomusError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            product: self.product.unwrap_or_default(),
            supplier: self.supplier.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            variant: self.variant.unwrap_or(DeviceVariant::Sensor),
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor() -> Device {
        Device::builder()
            .id("dev-1")
            .product("SensorTron 42")
            .supplier("AcmeTech")
            .kind("Temperature Sensor")
            .variant(DeviceVariant::Sensor)
            .build()
            .unwrap()
    }

    #[test]
    fn should_decode_missing_state_as_off() {
        assert_eq!(ActuatorState::decode(None), ActuatorState::Off);
    }

    #[test]
    fn should_decode_exactly_one_as_on() {
        assert_eq!(ActuatorState::decode(Some(1.0)), ActuatorState::On);
    }

    #[test]
    fn should_decode_other_values_as_level() {
        assert_eq!(
            ActuatorState::decode(Some(21.5)),
            ActuatorState::OnWithLevel(21.5)
        );
        // 0.999 is a level, not "almost on"
        assert_eq!(
            ActuatorState::decode(Some(0.999)),
            ActuatorState::OnWithLevel(0.999)
        );
    }

    #[test]
    fn should_roundtrip_all_states_through_codec() {
        for state in [
            ActuatorState::Off,
            ActuatorState::On,
            ActuatorState::OnWithLevel(-3.5),
            ActuatorState::OnWithLevel(0.999),
            ActuatorState::OnWithLevel(42.0),
        ] {
            assert_eq!(ActuatorState::decode(state.encode()), state);
        }
    }

    #[test]
    fn should_normalize_level_one_to_plain_on() {
        let mut state = ActuatorState::Off;
        state.turn_on_at(1.0);
        assert_eq!(ActuatorState::decode(state.encode()), ActuatorState::On);
    }

    #[test]
    fn should_allow_every_state_transition() {
        let mut state = ActuatorState::Off;
        state.turn_on();
        assert_eq!(state, ActuatorState::On);
        state.turn_on_at(19.5);
        assert_eq!(state, ActuatorState::OnWithLevel(19.5));
        state.turn_off();
        assert_eq!(state, ActuatorState::Off);
        assert!(!state.is_on());
        state.turn_on_at(2.0);
        assert!(state.is_on());
    }

    #[test]
    fn should_map_sensor_category_to_sensor() {
        assert_eq!(
            DeviceVariant::from_category("sensor", "Temperature Sensor"),
            Some(DeviceVariant::Sensor)
        );
    }

    #[test]
    fn should_map_heat_pump_to_actuator_with_sensor() {
        assert_eq!(
            DeviceVariant::from_category("actuator", HEAT_PUMP),
            Some(DeviceVariant::ActuatorWithSensor(ActuatorState::Off))
        );
    }

    #[test]
    fn should_map_other_actuators_to_plain_actuator() {
        assert_eq!(
            DeviceVariant::from_category("actuator", "Smart Plug"),
            Some(DeviceVariant::Actuator(ActuatorState::Off))
        );
    }

    #[test]
    fn should_reject_unknown_category() {
        assert_eq!(DeviceVariant::from_category("gateway", "Router"), None);
    }

    #[test]
    fn should_report_capabilities_per_variant() {
        let sensor = sensor();
        assert!(sensor.is_sensor());
        assert!(!sensor.is_actuator());
        assert!(sensor.state().is_none());

        let plug = Device::builder()
            .id("dev-2")
            .kind("Smart Plug")
            .variant(DeviceVariant::Actuator(ActuatorState::On))
            .build()
            .unwrap();
        assert!(!plug.is_sensor());
        assert!(plug.is_actuator());
        assert_eq!(plug.state(), Some(ActuatorState::On));

        let pump = Device::builder()
            .id("dev-3")
            .kind(HEAT_PUMP)
            .variant(DeviceVariant::ActuatorWithSensor(
                ActuatorState::OnWithLevel(21.0),
            ))
            .build()
            .unwrap();
        assert!(pump.is_sensor());
        assert!(pump.is_actuator());
        assert_eq!(pump.state(), Some(ActuatorState::OnWithLevel(21.0)));
    }

    #[test]
    fn should_mutate_state_through_state_mut() {
        let mut plug = Device::builder()
            .id("dev-2")
            .variant(DeviceVariant::Actuator(ActuatorState::Off))
            .build()
            .unwrap();
        plug.state_mut().unwrap().turn_on();
        assert_eq!(plug.state(), Some(ActuatorState::On));
    }

    #[test]
    fn should_return_validation_error_when_id_is_empty() {
        let result = Device::builder().product("Nameless").build();
        assert!(matches!(
            result,
            Err(DomusError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let device = sensor();
        let json = serde_json::to_string(&device).unwrap();
        let parsed: Device = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, device);
    }
}
