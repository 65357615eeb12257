//! Result type alias for Chartex

use super::errors::ChartexError;

/// Result type alias for Chartex operations
///
/// # Examples
///
/// ```
/// use chartex::domain::result::Result;
/// use chartex::domain::errors::ChartexError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ChartexError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChartexError>;
