use serde::{Deserialize, Serialize};

/// A named, recurring annual expense layered on top of base living costs.
///
/// `amount` is in today's dollars. Both ages are inclusive; a missing `end_age` means the
/// stream never stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseStream {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub start_age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_age: Option<u32>,
}

impl ExpenseStream {
    /// `end_age < start_age` can never be active.
    pub fn is_active_at(&self, age: u32) -> bool {
        age >= self.start_age && self.end_age.is_none_or(|end| age <= end)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExpenseCategory {
    Retirement,
    Kids,
    ParentsCare,
}

impl ExpenseCategory {
    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Retirement => "additionalRetirementExpenses",
            ExpenseCategory::Kids => "kidsExpenses",
            ExpenseCategory::ParentsCare => "parentsCareExpenses",
        }
    }
}

/// Caller-supplied financial profile. Never mutated by the engine.
///
/// Rates are decimals (`0.07` for 7%). `investment_return` is already a real,
/// inflation-adjusted rate. The kids and parents-care lists are always present and only
/// counted when their flag is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub current_age: u32,
    pub current_savings: f64,
    pub current_liabilities: f64,
    pub annual_income: f64,
    pub annual_expenses: f64,
    pub investment_return: f64,
    pub inflation_rate: f64,
    pub tax_rate: f64,
    pub career_growth_rate: f64,
    pub career_growth_slowdown_age: u32,
    pub additional_retirement_expenses: Vec<ExpenseStream>,
    pub has_kids_expenses: bool,
    pub kids_expenses: Vec<ExpenseStream>,
    pub has_parents_care: bool,
    pub parents_care_expenses: Vec<ExpenseStream>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            current_age: 25,
            current_savings: 10_000.0,
            current_liabilities: 0.0,
            annual_income: 60_000.0,
            annual_expenses: 40_000.0,
            investment_return: 0.07,
            inflation_rate: 0.03,
            tax_rate: 0.25,
            career_growth_rate: 0.03,
            career_growth_slowdown_age: 45,
            additional_retirement_expenses: Vec::new(),
            has_kids_expenses: false,
            kids_expenses: Vec::new(),
            has_parents_care: false,
            parents_care_expenses: Vec::new(),
        }
    }
}

impl Profile {
    /// Kids and parents-care streams, `None` when the category is switched off.
    pub fn kids_streams(&self) -> Option<&[ExpenseStream]> {
        self.has_kids_expenses.then_some(self.kids_expenses.as_slice())
    }

    pub fn parents_care_streams(&self) -> Option<&[ExpenseStream]> {
        self.has_parents_care
            .then_some(self.parents_care_expenses.as_slice())
    }

    /// Every stream list with its category, whether enabled or not.
    pub fn all_streams(&self) -> [(ExpenseCategory, &[ExpenseStream]); 3] {
        [
            (
                ExpenseCategory::Retirement,
                self.additional_retirement_expenses.as_slice(),
            ),
            (ExpenseCategory::Kids, self.kids_expenses.as_slice()),
            (
                ExpenseCategory::ParentsCare,
                self.parents_care_expenses.as_slice(),
            ),
        ]
    }

    pub fn starting_net_worth(&self) -> f64 {
        self.current_savings - self.current_liabilities
    }
}

/// One simulated age, all money figures in today's dollars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    pub age: u32,
    /// Net worth held at the start of this age, before the year's flows.
    pub net_worth: f64,
    pub annual_expenses: f64,
    pub annual_income: f64,
    /// Real growth in purchasing power earned on `net_worth` during the year.
    pub investment_returns: f64,
    pub net_savings: f64,
    pub base_expenses: f64,
    pub additional_expenses: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kids_expenses: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents_care_expenses: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireResult {
    pub fire_age: u32,
    pub years_to_fire: u32,
    pub final_net_worth: f64,
    pub projected_annual_expenses_at_fire: f64,
    pub real_investment_return: f64,
    pub starting_net_worth: f64,
    pub required_net_worth: f64,
    pub sustainable: bool,
    pub yearly_projections: Vec<YearlyProjection>,
}
