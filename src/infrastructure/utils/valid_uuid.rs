use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path parameter as a UUID, turning parse failures into a 400.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id)
        .map_err(|_| AppError::InvalidInput(format!("Invalid UUID: {id}")))
}
