use thiserror::Error;

use rat_core::TechId;

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("learning rate must be in (0, 1], got {0}")]
    InvalidLearningRate(f64),

    #[error("epsilon schedule needs 0 <= min ({min}) <= start ({start}) <= 1")]
    InvalidEpsilon { start: f64, min: f64 },

    #[error("epsilon decay must be in (0, 1], got {0}")]
    InvalidDecay(f64),

    #[error("distance buckets need 0 <= close ({close}) <= medium ({medium}), both finite")]
    InvalidThresholds { close: f64, medium: f64 },

    #[error("reward constant {name} must be finite, got {value}")]
    InvalidReward { name: &'static str, value: f64 },

    #[error("policy needs at least one action")]
    NoActions,

    #[error("{action} is outside this policy's {width} actions")]
    UnknownAction { action: TechId, width: usize },
}

pub type PolicyResult<T> = Result<T, PolicyError>;
