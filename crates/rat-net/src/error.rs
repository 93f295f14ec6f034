//! Configuration errors for the radio catalog and infrastructure layout.
//!
//! All of these surface at construction time.  Nothing on the per-tick path
//! returns a `NetError`.

use thiserror::Error;

use rat_core::{CoreError, NodeId, TechId};

#[derive(Debug, Error, PartialEq)]
pub enum NetError {
    #[error("catalog has no technologies")]
    EmptyCatalog,

    #[error("catalog has {0} technologies; at most {max} are supported", max = rat_core::TechSet::CAPACITY)]
    TooManyTechnologies(usize),

    #[error("technology {0:?} is defined more than once")]
    DuplicateTechnology(String),

    #[error("maximum total range must be positive and finite, got {0}")]
    InvalidMaxRange(f64),

    #[error("technology {name:?}: {field} must be finite and non-negative, got {value}")]
    InvalidParameter {
        name:  String,
        field: &'static str,
        value: f64,
    },

    #[error("technology {name:?}: loss rate {value} is outside [0, 1]")]
    InvalidLossRate { name: String, value: f64 },

    #[error("technology {name:?}: range {range} exceeds the dead-zone range {max_total_range}")]
    RangeBeyondDeadZone {
        name:            String,
        range:           f64,
        max_total_range: f64,
    },

    #[error("{node} references {tech}, which is not in the catalog")]
    UnknownTechnology { node: NodeId, tech: TechId },

    #[error("{0} serves no technology")]
    NodeServesNothing(NodeId),

    #[error("{0} has a non-finite position")]
    InvalidPosition(NodeId),

    #[error("technology {0:?} has no serving infrastructure node")]
    UnservedTechnology(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type NetResult<T> = Result<T, NetError>;
