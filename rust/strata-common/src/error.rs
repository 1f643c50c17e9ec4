use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns `true` if this error reports a broken stream or block contract
    /// (ordering, overlap or layout violations).
    pub fn is_contract_violation(&self) -> bool {
        matches!(self.kind(), ErrorKind::ContractViolation { .. })
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn contract_violation(context: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::ContractViolation {
                context: context.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn missing_dependency(name: impl Into<String>) -> Error {
        Error(ErrorKind::MissingDependency { name: name.into() }.into())
    }

    /// Wraps a failure reported by an upstream block producer (decoder, filter).
    pub fn upstream<E>(context: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error(
            ErrorKind::Upstream {
                context: context.into(),
                source: Box::new(source),
            }
            .into(),
        )
    }

    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Error {
        Error(
            ErrorKind::Serialization {
                context: context.into(),
                source,
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("contract violation in {context}: {message}")]
    ContractViolation { context: String, message: String },

    #[error("required dependency '{name}' was not provided")]
    MissingDependency { name: String },

    #[error("upstream failure in {context}: {source}")]
    Upstream {
        context: String,
        source: StdErrorBoxed,
    },

    #[error("serialization error for '{context}': {source}")]
    Serialization {
        context: String,
        source: serde_json::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::serialization("", e)
    }
}
