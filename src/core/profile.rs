use super::error::ProfileError;
use super::types::{ExpenseCategory, ExpenseStream, Profile};

pub const MAX_SLOWDOWN_AGE: u32 = 80;

impl Profile {
    /// Parses the interchange object. Every field is required, including all three stream
    /// lists; only a stream's `endAge` may be omitted.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Range checks applied before a profile reaches the engine.
pub fn validate_profile(profile: &Profile) -> Result<(), ProfileError> {
    for (field, value) in [
        ("currentSavings", profile.current_savings),
        ("currentLiabilities", profile.current_liabilities),
        ("annualIncome", profile.annual_income),
        ("annualExpenses", profile.annual_expenses),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(field, "must be a finite amount >= 0"));
        }
    }

    for (field, value, min, max) in [
        ("investmentReturn", profile.investment_return, -0.02, 0.12),
        ("inflationRate", profile.inflation_rate, 0.0, 0.10),
        ("taxRate", profile.tax_rate, 0.0, 0.50),
        ("careerGrowthRate", profile.career_growth_rate, 0.0, 0.15),
    ] {
        if !value.is_finite() || !(min..=max).contains(&value) {
            return Err(invalid(
                field,
                format!("must be between {:.0}% and {:.0}%", min * 100.0, max * 100.0),
            ));
        }
    }

    if profile.annual_expenses > profile.annual_income {
        return Err(ProfileError::ExpensesExceedIncome {
            expenses: profile.annual_expenses,
            income: profile.annual_income,
        });
    }

    if profile.career_growth_slowdown_age <= profile.current_age {
        return Err(ProfileError::SlowdownNotAfterCurrentAge {
            slowdown_age: profile.career_growth_slowdown_age,
            current_age: profile.current_age,
        });
    }

    if profile.career_growth_slowdown_age > MAX_SLOWDOWN_AGE {
        return Err(invalid(
            "careerGrowthSlowdownAge",
            format!("must be <= {MAX_SLOWDOWN_AGE}"),
        ));
    }

    for (category, streams) in profile.all_streams() {
        for stream in streams {
            validate_stream(category, stream)?;
        }
    }

    Ok(())
}

fn validate_stream(category: ExpenseCategory, stream: &ExpenseStream) -> Result<(), ProfileError> {
    let reject = |reason: String| ProfileError::InvalidExpenseStream {
        category: category.label(),
        id: stream.id.clone(),
        reason,
    };

    if !stream.amount.is_finite() || stream.amount < 0.0 {
        return Err(reject("amount must be a finite amount >= 0".to_string()));
    }
    if let Some(end_age) = stream.end_age {
        if end_age < stream.start_age {
            return Err(reject(format!(
                "endAge ({end_age}) must be >= startAge ({})",
                stream.start_age
            )));
        }
    }
    Ok(())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ProfileError {
    ProfileError::InvalidField {
        field,
        reason: reason.into(),
    }
}
