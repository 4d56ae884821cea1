use thiserror::Error;

/// Rejected [`Config`](crate::Config) values.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("curve resolution must be within 1..=65535, got {0}")]
    CurveResolution(u32),
    #[error("operation budget must be greater than zero")]
    ZeroBudget,
}
