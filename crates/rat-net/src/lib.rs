//! `rat-net`: the radio side of the access-selection model.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                   |
//! |--------------------|------------------------------------------------------------|
//! | [`catalog`]        | `NetworkProfile`, `NetworkCatalog`, `NetworkCatalogBuilder` |
//! | [`infrastructure`] | `InfrastructureNode`, `InfrastructureLayout` (R-tree index) |
//! | [`availability`]   | `AvailabilityResolver`, `Availability`                     |
//! | [`transmission`]   | loss curve, signal strength, latency, `TransmissionSimulator` |
//! | [`error`]          | `NetError`, `NetResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | `CatalogSpec` deserialization; serde derives on public types. |
//!
//! Path loss here is a linear approximation, not an RF propagation model.

pub mod availability;
pub mod catalog;
pub mod error;
pub mod infrastructure;
pub mod transmission;

#[cfg(test)]
mod tests;

pub use availability::{Availability, AvailabilityResolver};
pub use catalog::{NetworkCatalog, NetworkCatalogBuilder, NetworkProfile};
#[cfg(feature = "serde")]
pub use catalog::{CatalogSpec, ProfileSpec};
pub use error::{NetError, NetResult};
pub use infrastructure::{InfrastructureLayout, InfrastructureLayoutBuilder, InfrastructureNode};
pub use transmission::{
    effective_loss_rate, latency_ms, signal_strength, TransmissionOutcome, TransmissionSimulator,
};
