use crate::domain::errors::ServiceError;
use rust_decimal::Decimal;

/// Collects per-field violations for one request and folds them into a
/// single `InvalidParameter` error ("field: message, field: message").
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push((field.to_string(), message.into()));
    }

    pub fn not_blank(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.push(field, message);
        }
        self
    }

    /// Length bounds are counted in characters, not bytes.
    pub fn length(
        &mut self,
        field: &str,
        value: Option<&str>,
        min: usize,
        max: usize,
        message: &str,
    ) -> &mut Self {
        if let Some(v) = value {
            let len = v.chars().count();
            if len < min || len > max {
                self.push(field, message);
            }
        }
        self
    }

    pub fn required<T>(&mut self, field: &str, value: Option<&T>, message: &str) -> &mut Self {
        if value.is_none() {
            self.push(field, message);
        }
        self
    }

    pub fn positive_decimal(&mut self, field: &str, value: Option<Decimal>, message: &str) -> &mut Self {
        if let Some(v) = value
            && v <= Decimal::ZERO
        {
            self.push(field, message);
        }
        self
    }

    pub fn non_negative_decimal(
        &mut self,
        field: &str,
        value: Option<Decimal>,
        message: &str,
    ) -> &mut Self {
        if let Some(v) = value
            && v < Decimal::ZERO
        {
            self.push(field, message);
        }
        self
    }

    pub fn min_i64(&mut self, field: &str, value: Option<i64>, min: i64, message: &str) -> &mut Self {
        if let Some(v) = value
            && v < min
        {
            self.push(field, message);
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        if let Some(v) = value
            && !v.trim().is_empty()
            && !is_valid_email(v)
        {
            self.push(field, message);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(&self) -> Result<(), ServiceError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let message = self
            .errors
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect::<Vec<_>>()
            .join(", ");
        Err(ServiceError::InvalidParameter(message))
    }
}

fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !value.chars().any(char::is_whitespace)
}

/// Path identifiers start at 1.
pub fn require_id(field: &str, id: i64) -> Result<i64, ServiceError> {
    if id < 1 {
        return Err(ServiceError::invalid(field, "ID must be 1 or greater"));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_collects_messages_in_order() {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("stockName", Some("  "), "stock name is required")
            .positive_decimal("stockPrice", Some(dec!(0)), "stock price must be greater than 0");

        let err = errors.finish().unwrap_err();
        assert_eq!(
            err.to_string(),
            "stockName: stock name is required, stockPrice: stock price must be greater than 0"
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let mut errors = FieldErrors::new();
        errors.length("playerId", Some("플레이"), 3, 20, "3 to 20 characters");
        assert!(errors.is_empty());

        errors.length("playerId", Some("ab"), 3, 20, "3 to 20 characters");
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("kim@example.com"));
        assert!(!is_valid_email("kim@example"));
        assert!(!is_valid_email("kim.example.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("kim @example.com"));
    }

    #[test]
    fn test_require_id() {
        assert!(require_id("id", 1).is_ok());
        assert!(require_id("id", 0).is_err());
    }
}
