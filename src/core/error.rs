use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlexError {
    #[error("Malformed hashed name '{0}': expected namespace__model__field")]
    MalformedHashedName(String),

    #[error("Model '{0}' not found")]
    ModelNotFound(String),

    #[error("Field '{0}' not found on model '{1}'")]
    FieldNotFound(String, String),

    #[error("Model '{0}' is not registered with the admin site")]
    NotRegistered(String),

    #[error("No flex widget configured for field '{0}' on model '{1}'")]
    WidgetNotConfigured(String, String),

    #[error("{model} matching pk {pk} does not exist")]
    RecordNotFound { model: String, pk: String },

    #[error("No admin URL matches path '{0}'")]
    UnresolvedPath(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock error: {0}")]
    LockError(String),
}

pub type Result<T> = std::result::Result<T, FlexError>;

impl<T> From<std::sync::PoisonError<T>> for FlexError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
