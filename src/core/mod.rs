mod engine;
mod error;
mod profile;
mod solver;
mod types;
mod values;

use tracing::debug;

pub use engine::{IncomeParams, expenses_for_age, income_for_age, simulate_lifetime};
pub use error::ProfileError;
pub use profile::{MAX_SLOWDOWN_AGE, validate_profile};
pub use solver::{
    END_OF_LIFE_AGE, FireAgeSolution, PROJECTION_YEARS, SAFETY_MARGIN, SearchProbe,
    SustainabilityReport, check_sustainability, evaluate_candidate, required_net_worth,
    search_upper_bound, solve_fire_age, sustainability_horizon,
};
pub use types::{ExpenseCategory, ExpenseStream, FireResult, Profile, YearlyProjection};
pub use values::{nominal_return_rate, to_nominal, to_today};

/// Solves the FIRE age for `profile` and projects the lifetime trajectory retiring then.
///
/// Total and deterministic: expects a profile that already passed [`validate_profile`],
/// but never panics on one that did not. Ages near `u32::MAX` clamp the range there.
pub fn calculate_fire_projections(profile: &Profile) -> FireResult {
    let solution = solve_fire_age(profile);
    let fire_age = solution.fire_age;
    let yearly_projections =
        simulate_lifetime(profile, Some(fire_age), search_upper_bound(profile));

    let final_net_worth = yearly_projections.last().map_or(0.0, |p| p.net_worth);
    let projected_annual_expenses_at_fire = yearly_projections
        .iter()
        .find(|p| p.age == fire_age)
        .map_or(0.0, |p| p.annual_expenses);

    debug!(
        fire_age,
        sustainable = solution.sustainable,
        final_net_worth,
        "calculated FIRE projections"
    );

    FireResult {
        fire_age,
        years_to_fire: fire_age - profile.current_age,
        final_net_worth,
        projected_annual_expenses_at_fire,
        real_investment_return: profile.investment_return,
        starting_net_worth: profile.starting_net_worth(),
        required_net_worth: solution.required_net_worth,
        sustainable: solution.sustainable,
        yearly_projections,
    }
}
