use serde::Serialize;
use thiserror::Error;

/// Stable numeric codes carried in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    InvalidParameter,
    DataNotFound,
    DataDuplicated,
    DataInUse,
    NotAuthenticated,
    InsufficientFunds,
    InsufficientQuantity,
    InsufficientStock,
    SystemError,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::InvalidParameter => 1001,
            ErrorCode::DataNotFound => 1002,
            ErrorCode::DataDuplicated => 1003,
            ErrorCode::DataInUse => 1004,
            ErrorCode::NotAuthenticated => 1005,
            ErrorCode::InsufficientFunds => 2001,
            ErrorCode::InsufficientQuantity => 2002,
            ErrorCode::InsufficientStock => 2003,
            ErrorCode::SystemError => 9999,
        }
    }
}

/// Errors raised by entity mutators and services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidParameter(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicated(String),

    #[error("{0}")]
    InUse(String),

    #[error("{0}")]
    NotAuthenticated(String),

    #[error("Insufficient funds: need {need}, available {available}")]
    InsufficientFunds { need: String, available: String },

    #[error("{0}")]
    InsufficientQuantity(String),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::InvalidParameter(_) => ErrorCode::InvalidParameter,
            ServiceError::NotFound(_) => ErrorCode::DataNotFound,
            ServiceError::Duplicated(_) => ErrorCode::DataDuplicated,
            ServiceError::InUse(_) => ErrorCode::DataInUse,
            ServiceError::NotAuthenticated(_) => ErrorCode::NotAuthenticated,
            ServiceError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            ServiceError::InsufficientQuantity(_) => ErrorCode::InsufficientQuantity,
            ServiceError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            ServiceError::Database(_) | ServiceError::Corrupt(_) => ErrorCode::SystemError,
        }
    }

    pub fn invalid(field: &str, message: impl AsRef<str>) -> Self {
        ServiceError::InvalidParameter(format!("{}: {}", field, message.as_ref()))
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ServiceError::NotFound(what.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_formatting() {
        let err = ServiceError::invalid("stockPrice", "must be greater than 0");
        assert_eq!(err.to_string(), "stockPrice: must be greater than 0");
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert_eq!(err.code().code(), 1001);
    }

    #[test]
    fn test_insufficient_funds_formatting() {
        let err = ServiceError::InsufficientFunds {
            need: "1500".to_string(),
            available: "1000".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("1500"));
        assert!(msg.contains("1000"));
        assert_eq!(err.code().code(), 2001);
    }

    #[test]
    fn test_database_errors_are_system_errors() {
        let err = ServiceError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.code(), ErrorCode::SystemError);
    }
}
