pub mod catalog;

use crate::domain::{booking::RateCardError, DataAccessError};

impl From<RateCardError> for DataAccessError {
    fn from(value: RateCardError) -> Self {
        DataAccessError::ClientSideError(value.to_string())
    }
}
