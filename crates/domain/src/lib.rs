//! # domus-domain
//!
//! Pure domain model for the domus smart-house system.
//!
//! ## Responsibilities
//! - Foundational types: device identifiers, error conventions, timestamps
//! - Define the **SmartHouse** aggregate (floors → rooms → devices)
//! - Define **Devices** (sensors, actuators, and combined actuator-sensors)
//!   together with the actuator state machine and its storage codec
//! - Define **Measurements** (append-only time-series facts)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod floor;
pub mod house;
pub mod measurement;
pub mod room;
