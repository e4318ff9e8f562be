use crate::errors::ServerError;

/// Trimmed, non-empty.
pub fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ServerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServerError::bad_request(format!("{field} required")));
    }
    Ok(trimmed)
}

pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn email(value: &str) -> Result<String, ServerError> {
    let trimmed = required("email", value)?;
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !trimmed.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ServerError::bad_request("invalid email"));
    }
    Ok(trimmed.to_ascii_lowercase())
}
