use thiserror::Error;

/// Error type shared by the expense store, entry flow and exporters.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Enter a valid amount > 0")]
    InvalidAmount,
    #[error("Possible duplicate. Submit again to confirm.")]
    DuplicateSuspected,
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ExpenseError {
    /// Validation failures are recoverable by the user editing the form.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExpenseError::EmptyTitle | ExpenseError::InvalidAmount | ExpenseError::DuplicateSuspected
        )
    }

    /// Message suitable for display. Storage failures collapse to a generic text.
    pub fn user_message(&self) -> String {
        if self.is_validation() {
            self.to_string()
        } else {
            "Something went wrong while saving. Please try again.".to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, ExpenseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_hide_details_from_users() {
        let err = ExpenseError::Storage("disk full at /data/expenses.json".into());
        assert!(!err.is_validation());
        assert!(!err.user_message().contains("/data"));
    }

    #[test]
    fn validation_errors_surface_their_message() {
        assert_eq!(
            ExpenseError::EmptyTitle.user_message(),
            "Title cannot be empty"
        );
        assert!(ExpenseError::InvalidAmount.is_validation());
    }
}
