use crate::config::ConfigError;
use crate::estimation::model::EstimationError;
use crate::intake::InputError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("result store error: {0}")]
    Store(#[from] StoreError),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Failure of one calculate-and-record request.
#[derive(Debug, Error)]
pub enum CalculationError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Estimation(#[from] EstimationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
