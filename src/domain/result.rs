//! Result type alias for Catalog
//!
//! This module provides a convenient Result type alias that uses CatalogError
//! as the error type.

use super::errors::CatalogError;

/// Result type alias for Catalog operations
///
/// # Examples
///
/// ```
/// use catalog::domain::result::Result;
/// use catalog::domain::errors::CatalogError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CatalogError::missing(["name"]))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
