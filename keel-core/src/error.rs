use thiserror::Error;

/// Error kinds raised by the provider layer itself.
///
/// They travel inside [`crate::Error`], callers recover them with
/// `error.downcast_ref::<ProviderError>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Operator `{operator}` is not supported by {dialect}")]
    Unsupported {
        operator: String,
        dialect: &'static str,
    },

    #[error("Operator `{operator}` expects {expected} argument(s), {received} given")]
    Arity {
        operator: String,
        expected: &'static str,
        received: usize,
    },

    #[error("Cannot convert `{value}` to {target}: {reason}")]
    Conversion {
        value: String,
        target: &'static str,
        reason: String,
    },
}

impl ProviderError {
    pub fn unsupported(operator: impl Into<String>, dialect: &'static str) -> Self {
        Self::Unsupported {
            operator: operator.into(),
            dialect,
        }
    }

    pub fn conversion(
        value: impl Into<String>,
        target: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            value: value.into(),
            target,
            reason: reason.into(),
        }
    }
}
