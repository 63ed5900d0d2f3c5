//! Error types for repository operations.
//!
//! Every variant carries an [`ErrorContext`] so a failure logged far from the
//! store still says which operation and which entity it concerned.

use std::fmt;

use crate::geo::PointCodecError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "create_location", "get_player_by_email")
    pub operation: Option<String>,
    /// The entity type involved ("location" or "player")
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether this error is retryable
    pub retryable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Connection pool or database connection errors.
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    #[error("Query error: {message} {context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {message} {context}")]
    Conflict {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },

    /// The storage call outlived its deadline.
    #[error("Timeout error: {message} {context}")]
    TimeoutError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    pub fn connection_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: context.retryable(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn conflict_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Conflict {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InternalError {
            message: message.into(),
            context,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    pub fn timeout_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::TimeoutError {
            message: message.into(),
            context: context.retryable(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError { context, .. } => context.retryable,
            Self::TimeoutError { context, .. } => context.retryable,
            Self::QueryError { context, .. } => context.retryable,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// The bare message, without the context suffix.
    pub fn message(&self) -> &str {
        match self {
            Self::ConnectionError { message, .. }
            | Self::QueryError { message, .. }
            | Self::NotFound { message, .. }
            | Self::Conflict { message, .. }
            | Self::ConfigurationError { message, .. }
            | Self::InternalError { message, .. }
            | Self::TimeoutError { message, .. } => message,
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add or update the entity and its id in the error context.
    pub fn with_entity(mut self, entity: impl Into<String>, id: impl ToString) -> Self {
        let context = self.context_mut();
        context.entity = Some(entity.into());
        context.entity_id = Some(id.to_string());
        self
    }
}

impl From<PointCodecError> for RepositoryError {
    fn from(err: PointCodecError) -> Self {
        RepositoryError::internal_with_context(
            err.to_string(),
            ErrorContext::new("decode_point").with_details("wkb"),
        )
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::DatabaseErrorKind;

        match err {
            diesel::result::Error::NotFound => RepositoryError::not_found("Record not found"),
            diesel::result::Error::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                let details = match info.constraint_name() {
                    Some(constraint) => {
                        format!("db_error_kind={:?}, constraint={}", kind, constraint)
                    }
                    None => format!("db_error_kind={:?}", kind),
                };
                let context = ErrorContext::default().with_details(details);

                match kind {
                    DatabaseErrorKind::UniqueViolation => {
                        RepositoryError::Conflict { message, context }
                    }
                    DatabaseErrorKind::SerializationFailure => RepositoryError::QueryError {
                        message,
                        context: context.retryable(),
                    },
                    _ => RepositoryError::QueryError { message, context },
                }
            }
            diesel::result::Error::QueryBuilderError(e) => {
                RepositoryError::query(format!("Query builder error: {}", e))
            }
            diesel::result::Error::DeserializationError(e) => {
                RepositoryError::internal(format!("Deserialization error: {}", e))
            }
            diesel::result::Error::SerializationError(e) => {
                RepositoryError::internal(format!("Serialization error: {}", e))
            }
            other => RepositoryError::query(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::connection_with_context(
            err.to_string(),
            ErrorContext::default().with_details("pool_error"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display_lists_set_fields() {
        let ctx = ErrorContext::new("get_location")
            .with_entity("location")
            .with_entity_id("abc");
        assert_eq!(
            ctx.to_string(),
            "[operation=get_location, entity=location, id=abc]"
        );
    }

    #[test]
    fn test_connection_and_timeout_are_retryable() {
        assert!(RepositoryError::connection("refused").is_retryable());
        assert!(RepositoryError::timeout("deadline").is_retryable());
        assert!(!RepositoryError::not_found("gone").is_retryable());
        assert!(!RepositoryError::conflict("dup").is_retryable());
    }

    #[test]
    fn test_with_entity_sets_context() {
        let err = RepositoryError::not_found("Location not found")
            .with_operation("get_location")
            .with_entity("location", "42");
        assert!(err.is_not_found());
        assert_eq!(err.context().entity_id.as_deref(), Some("42"));
        assert_eq!(err.message(), "Location not found");
        assert!(err.to_string().contains("operation=get_location"));
    }

    #[test]
    fn test_every_variant_exposes_its_message() {
        let errors = [
            RepositoryError::connection("a"),
            RepositoryError::query("a"),
            RepositoryError::not_found("a"),
            RepositoryError::conflict("a"),
            RepositoryError::configuration("a"),
            RepositoryError::internal("a"),
            RepositoryError::timeout("a"),
        ];
        for err in errors {
            assert_eq!(err.message(), "a");
            assert!(err.to_string().contains(": a"), "{}", err);
            assert_eq!(err.context().operation, None);
        }
    }

    #[test]
    fn test_point_codec_error_is_internal() {
        let codec = PointCodecError::Malformed("unexpected end of buffer".to_string());
        let err = RepositoryError::from(codec);
        assert!(matches!(err, RepositoryError::InternalError { .. }));
    }
}
