//! Application layer for the lodging inventory.
//!
//! Services load an aggregate (under a lock where the repository offers one),
//! run one domain operation, save it, and publish the events it recorded.
//! Configuration and tracing setup live here too.

pub mod config;
pub mod error;
mod locking;
mod publishing;
pub mod services;
pub mod telemetry;

#[cfg(test)]
mod fixtures;

pub use config::{Config, LogFormat};
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use services::{AccommodationService, FloorService, RoomService, RoomTypeService};
pub use telemetry::init_tracing;
