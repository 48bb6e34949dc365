mod request_rules;

pub use request_rules::{FieldErrors, require_id};
