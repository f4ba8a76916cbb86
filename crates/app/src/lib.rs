//! # domus-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `StructureRepository` — deep load of the house graph, device lookup
//!   - `MeasurementStore` — append-only measurement series per device
//!   - `ActuatorStateRepository` — persisted actuator state, read and write
//!   - `StatisticsRepository` — read-only aggregation queries
//! - Provide the **facade** callers use: [`services::house_service::SmartHouseService`]
//!   composes the ports and enforces device-capability gating
//!
//! ## Dependency rule
//! Depends on `domus-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
