//! Framework-wide error types
//!
//! Provides a unified error type that can be used throughout the framework
//! and automatically converts to appropriate HTTP responses.

use thiserror::Error;

/// Framework-wide error type
///
/// Every handler failure is one of these variants. `From<FrameworkError> for
/// HttpResponse` turns it into a status code and a `{"error": message}` body,
/// so controllers can propagate it with `?`.
///
/// # Example
///
/// ```rust,ignore
/// use depot::{FrameworkError, Request, Response};
///
/// pub async fn show(req: Request) -> Response {
///     let id = req.id_param("id")?;   // 400 on "abc"
///     let state = req.state::<AppState>()?;
///     let user = state.users.show(&(), id).await?;  // 404 when absent
///     depot::json(user.into())
/// }
/// ```
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// Handler state was never attached to the router
    #[error("State '{type_name}' not registered on the router")]
    StateNotFound {
        /// The type name of the missing state
        type_name: &'static str,
    },

    /// A route parameter the handler asked for is not part of the route
    #[error("Missing required parameter: {param_name}")]
    ParamError {
        /// The name of the parameter that failed extraction
        param_name: String,
    },

    /// The `id` path segment is not an integer
    #[error("Invalid id:{id}")]
    InvalidId {
        /// The raw path segment
        id: String,
    },

    /// The category path segment names no known category
    #[error("Invalid product type:{category}")]
    InvalidCategory {
        /// The raw category name
        category: String,
    },

    /// No record with this id inside the resolved scope
    #[error("No {entity} with id:{id} found")]
    NotFound {
        /// Singular entity label, e.g. "user"
        entity: &'static str,
        /// The id that was looked up
        id: i64,
    },

    /// A create body lacks at least one required field
    #[error("{} required to add a new {entity}", describe_fields(.fields))]
    ValidationFailure {
        /// Singular entity label
        entity: &'static str,
        /// Every field a new record must carry
        fields: Vec<String>,
    },

    /// The request body could not be read as a record
    #[error("Invalid request body: {message}")]
    InvalidBody {
        /// What was wrong with it
        message: String,
    },

    /// The request body exceeded the configured size limit
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Configured maximum in bytes
        limit: usize,
    },

    /// Flushing a collection to its backing file failed
    #[error("Something went wrong: {0}")]
    Persistence(String),

    /// Generic internal server error
    #[error("Internal server error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

fn describe_fields(fields: &[String]) -> String {
    match fields {
        [] => "Fields are".to_string(),
        [one] => format!("{} is", one),
        [first, second] => format!("Both {} and {} are", first, second),
        [init @ .., last] => format!("{} and {} are", init.join(", "), last),
    }
}

impl FrameworkError {
    /// Create a StateNotFound error for a given type
    pub fn state_not_found<T: ?Sized>() -> Self {
        Self::StateNotFound {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create a ParamError for a missing parameter
    pub fn param(name: impl Into<String>) -> Self {
        Self::ParamError {
            param_name: name.into(),
        }
    }

    /// Create an InvalidId error (400)
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    /// Create an InvalidCategory error (400)
    pub fn invalid_category(category: impl Into<String>) -> Self {
        Self::InvalidCategory {
            category: category.into(),
        }
    }

    /// Create a NotFound error (404)
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create an InvalidBody error (400)
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody {
            message: message.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::StateNotFound { .. } => 500,
            Self::ParamError { .. } => 400,
            Self::InvalidId { .. } => 400,
            Self::InvalidCategory { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::ValidationFailure { .. } => 400,
            Self::InvalidBody { .. } => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::Persistence(_) => 500,
            Self::Internal { .. } => 500,
        }
    }
}

impl From<crate::store::StoreError> for FrameworkError {
    fn from(e: crate::store::StoreError) -> Self {
        Self::Persistence(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_the_api_contract() {
        assert_eq!(FrameworkError::invalid_id("abc").to_string(), "Invalid id:abc");
        assert_eq!(
            FrameworkError::invalid_category("boats").to_string(),
            "Invalid product type:boats"
        );
        assert_eq!(
            FrameworkError::not_found("product", 7).to_string(),
            "No product with id:7 found"
        );
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = FrameworkError::ValidationFailure {
            entity: "user",
            fields: vec!["name".into(), "username".into()],
        };
        assert_eq!(
            err.to_string(),
            "Both name and username are required to add a new user"
        );

        let err = FrameworkError::ValidationFailure {
            entity: "user",
            fields: vec!["username".into()],
        };
        assert_eq!(err.to_string(), "username is required to add a new user");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(FrameworkError::invalid_id("x").status_code(), 400);
        assert_eq!(FrameworkError::invalid_category("x").status_code(), 400);
        assert_eq!(FrameworkError::not_found("user", 1).status_code(), 404);
        assert_eq!(FrameworkError::Persistence("disk".into()).status_code(), 500);
        assert_eq!(
            FrameworkError::PayloadTooLarge { limit: 10 }.status_code(),
            413
        );
    }
}
