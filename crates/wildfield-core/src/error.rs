//! Error types for the simulation.

use crate::types::Location;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("location out of bounds: ({}, {})", .0.row, .0.col)]
    OutOfBounds(Location),

    #[error("cell already occupied: ({}, {})", .0.row, .0.col)]
    Occupied(Location),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
