use rat_core::CoreError;
use rat_net::NetError;
use rat_policy::PolicyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("policy is sized for {policy} actions but the catalog has {catalog} technologies")]
    ActionCountMismatch { policy: usize, catalog: usize },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

pub type SimResult<T> = Result<T, SimError>;
