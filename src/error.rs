use thiserror::Error as ThisError;

use crate::problem::MAX_CITIES;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("instance has {0} cities, the maximum supported is {MAX_CITIES}")]
    TooManyCities(usize),
    #[error("city index {index} out of range for a {n_cities}-city instance")]
    CityOutOfRange { index: usize, n_cities: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("transport disconnected: a peer went away mid-search")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
