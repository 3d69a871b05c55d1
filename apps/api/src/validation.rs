use std::sync::LazyLock;

use regex::Regex;

use crate::errors::AppError;

/// Calendar date as accepted by the APOD API: `YYYY-MM-DD`, month 01-12, day 01-31.
/// ASCII digits only. Day/month combinations (e.g. 02-31) are not checked.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$").expect("valid date regex")
});

/// Validates the query parameters shared by both endpoints.
///
/// The API key is checked first, so an empty key wins over a bad date.
/// An empty date always passes.
pub fn validate_request(date: &str, api_key: &str) -> Result<(), AppError> {
    if api_key.is_empty() {
        return Err(AppError::EmptyApiKey);
    }

    if !date.is_empty() && !DATE_PATTERN.is_match(date) {
        return Err(AppError::InvalidDate);
    }

    Ok(())
}
