//! In-memory adapters for the lodging inventory ports.
//!
//! This crate provides:
//! - InMemoryLodgingStore implementing every repository port, with optimistic
//!   version checks, per-entity write locks and commit-time inventory checks
//! - InMemoryEventPublisher collecting published events
//! - InMemoryBookingCalendar and InMemoryDirectory standing in for the
//!   booking and identity contexts

mod locks;
mod memory;
mod policies;
mod publisher;
mod table;

pub use memory::InMemoryLodgingStore;
pub use policies::{InMemoryBookingCalendar, InMemoryDirectory};
pub use publisher::InMemoryEventPublisher;
