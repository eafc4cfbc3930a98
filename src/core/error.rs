use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Invalid profile JSON: {0}")]
    Import(#[from] serde_json::Error),

    #[error("{field} {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("annualExpenses ({expenses}) cannot exceed annualIncome ({income})")]
    ExpensesExceedIncome { expenses: f64, income: f64 },

    #[error("careerGrowthSlowdownAge ({slowdown_age}) must be after currentAge ({current_age})")]
    SlowdownNotAfterCurrentAge { slowdown_age: u32, current_age: u32 },

    #[error("{category} stream '{id}': {reason}")]
    InvalidExpenseStream {
        category: &'static str,
        id: String,
        reason: String,
    },
}
