use std::error::Error;

/// Convenient alias for a Result whose error can cross task boundaries.
pub type AsyncResult<T> = Result<T, Box<dyn Error + Send + Sync>>;
