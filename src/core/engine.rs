use super::types::{ExpenseStream, Profile, YearlyProjection};
use super::values::{nominal_return_rate, to_nominal, to_today};

/// Total nominal expenses at `age`: the base amount plus every stream active that year,
/// all inflated from today's dollars by the years elapsed since `current_age`.
pub fn expenses_for_age(
    base_expenses: f64,
    age: u32,
    current_age: u32,
    inflation_rate: f64,
    streams: &[ExpenseStream],
) -> f64 {
    let years = age.saturating_sub(current_age);
    let streams_today: f64 = streams
        .iter()
        .filter(|stream| stream.is_active_at(age))
        .map(|stream| stream.amount)
        .sum();
    to_nominal(base_expenses, inflation_rate, years)
        + to_nominal(streams_today, inflation_rate, years)
}

#[derive(Debug, Clone, Copy)]
pub struct IncomeParams {
    pub base_income: f64,
    pub current_age: u32,
    pub career_growth_rate: f64,
    pub slowdown_age: u32,
    pub inflation_rate: f64,
}

impl IncomeParams {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            base_income: profile.annual_income,
            current_age: profile.current_age,
            career_growth_rate: profile.career_growth_rate,
            slowdown_age: profile.career_growth_slowdown_age,
            inflation_rate: profile.inflation_rate,
        }
    }
}

/// Nominal income at `age`.
///
/// Career growth compounds until the slowdown age, after which income only tracks
/// inflation. Zero from `retirement_age` onward; `None` means no retirement age yet.
pub fn income_for_age(params: IncomeParams, age: u32, retirement_age: Option<u32>) -> f64 {
    if retirement_age.is_some_and(|retire| age >= retire) {
        return 0.0;
    }

    let elapsed = age.saturating_sub(params.current_age);
    let years_growing = elapsed.min(params.slowdown_age.saturating_sub(params.current_age));
    let years_stagnant = elapsed - years_growing;

    params.base_income
        * (1.0 + params.career_growth_rate).powi(years_growing as i32)
        * (1.0 + params.inflation_rate).powi(years_stagnant as i32)
}

/// Year-by-year projection from `profile.current_age` through `end_age` inclusive,
/// retiring at `fire_age`.
pub fn simulate_lifetime(
    profile: &Profile,
    fire_age: Option<u32>,
    end_age: u32,
) -> Vec<YearlyProjection> {
    let current_age = profile.current_age;
    let inflation = profile.inflation_rate;
    let income_params = IncomeParams::from_profile(profile);
    let growth_rate = nominal_return_rate(profile.investment_return, inflation);
    let kids = profile.kids_streams();
    let parents = profile.parents_care_streams();

    let mut nominal_net_worth = profile.current_savings;
    let mut projections = Vec::with_capacity(end_age.saturating_sub(current_age) as usize + 1);

    for age in current_age..=end_age {
        let years = age - current_age;
        let retired = fire_age.is_some_and(|fire| age >= fire);

        let income = income_for_age(income_params, age, fire_age);
        let base = expenses_for_age(profile.annual_expenses, age, current_age, inflation, &[]);
        let additional = expenses_for_age(
            0.0,
            age,
            current_age,
            inflation,
            &profile.additional_retirement_expenses,
        );
        let kids_expenses =
            kids.map(|streams| expenses_for_age(0.0, age, current_age, inflation, streams));
        let parents_expenses =
            parents.map(|streams| expenses_for_age(0.0, age, current_age, inflation, streams));
        let total_expenses =
            base + additional + kids_expenses.unwrap_or(0.0) + parents_expenses.unwrap_or(0.0);

        let investment_return = nominal_net_worth * growth_rate;
        let net_cash_flow = if retired {
            -total_expenses
        } else {
            income * (1.0 - profile.tax_rate) - total_expenses
        };

        projections.push(YearlyProjection {
            age,
            net_worth: to_today(nominal_net_worth, inflation, years),
            annual_expenses: to_today(total_expenses, inflation, years),
            annual_income: to_today(income, inflation, years),
            investment_returns: to_today(
                nominal_net_worth * profile.investment_return,
                inflation,
                years,
            ),
            net_savings: to_today(net_cash_flow, inflation, years),
            base_expenses: to_today(base, inflation, years),
            additional_expenses: to_today(additional, inflation, years),
            kids_expenses: kids_expenses.map(|v| to_today(v, inflation, years)),
            parents_care_expenses: parents_expenses.map(|v| to_today(v, inflation, years)),
        });

        nominal_net_worth += investment_return + net_cash_flow;
    }

    projections
}
