//! Parameter validation
//!
//! Checks a request's arguments against the target endpoint's declared
//! parameters, failing fast on the first violation in declaration order.
//! Runs strictly before rate-limit consumption and network I/O, so invalid
//! calls never count against quota.

use crate::core::registry::{Endpoint, ParamType, Parameter};
use crate::utils::error::ValidationError;
use regex::Regex;
use serde_json::{Map, Value};

/// Validate request parameters against an endpoint's declarations
pub fn validate_parameters(
    endpoint: &Endpoint,
    parameters: &Map<String, Value>,
) -> Result<(), ValidationError> {
    for declared in &endpoint.parameters {
        let value = match parameters.get(&declared.name) {
            Some(value) => value,
            None if declared.required => {
                return Err(ValidationError::MissingParameter {
                    field: declared.name.clone(),
                });
            }
            None => continue,
        };

        if !declared.param_type.matches(value) {
            return Err(ValidationError::TypeMismatch {
                field: declared.name.clone(),
                expected: declared.param_type.name().to_string(),
            });
        }

        check_constraints(declared, value)?;
    }
    Ok(())
}

fn check_constraints(declared: &Parameter, value: &Value) -> Result<(), ValidationError> {
    if declared.param_type == ParamType::Number {
        // Declared as Number and type-checked above, so as_f64 succeeds.
        let number = value.as_f64().unwrap_or_default();
        if let Some(min) = declared.min {
            if number < min {
                return Err(violation(declared, format!("must be >= {min}")));
            }
        }
        if let Some(max) = declared.max {
            if number > max {
                return Err(violation(declared, format!("must be <= {max}")));
            }
        }
    }

    if let (Some(pattern), Some(text)) = (&declared.pattern, value.as_str()) {
        let regex = Regex::new(pattern)
            .map_err(|_| violation(declared, format!("invalid pattern `{pattern}`")))?;
        if !regex.is_match(text) {
            return Err(violation(declared, format!("must match pattern `{pattern}`")));
        }
    }

    if let Some(allowed) = &declared.allowed_values {
        if !allowed.contains(value) {
            return Err(violation(declared, format!("must be one of {allowed:?}")));
        }
    }

    Ok(())
}

fn violation(declared: &Parameter, message: String) -> ValidationError {
    ValidationError::ConstraintViolation {
        field: declared.name.clone(),
        message,
    }
}
