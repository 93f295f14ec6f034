//! `rat-core`: foundational types for the radio-access selection workspace.
//!
//! Every other `rat-*` crate depends on this one.  It has no `rat-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`ids`]       | `AgentId`, `NodeId`, `TechId`                         |
//! | [`tech_set`]  | `TechSet`: order-independent bitmask of `TechId`s    |
//! | [`geo`]       | `Position`, Euclidean distance                        |
//! | [`time`]      | `SimTime`, `SimClock`                                 |
//! | [`rng`]       | `SimRng` (seeded, injectable)                         |
//! | [`error`]     | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod tech_set;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Position;
pub use ids::{AgentId, NodeId, TechId};
pub use rng::SimRng;
pub use tech_set::TechSet;
pub use time::{SimClock, SimTime};
