use tracing::{debug, trace};

use super::engine::simulate_lifetime;
use super::types::{Profile, YearlyProjection};

/// Years searched (and projected) beyond the current age.
pub const PROJECTION_YEARS: u32 = 50;
/// Age through which a retirement must stay sustainable.
pub const END_OF_LIFE_AGE: u32 = 90;
/// Margin over the net worth whose real return exactly covers the worst expense year.
pub const SAFETY_MARGIN: f64 = 1.2;

const NET_WORTH_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SustainabilityReport {
    pub fire_age: u32,
    pub net_worth_at_fire: f64,
    pub required_net_worth: f64,
    pub sufficient: bool,
    pub non_decreasing: bool,
}

impl SustainabilityReport {
    pub fn is_sustainable(&self) -> bool {
        self.sufficient && self.non_decreasing
    }
}

/// Net worth whose real return covers the largest real expense year from `fire_age` on,
/// plus the safety margin. Infinite when the real return cannot cover positive expenses.
pub fn required_net_worth(
    projections: &[YearlyProjection],
    fire_age: u32,
    real_return: f64,
) -> f64 {
    let max_expenses = projections
        .iter()
        .filter(|p| p.age >= fire_age)
        .map(|p| p.annual_expenses)
        .fold(0.0_f64, f64::max);

    if max_expenses <= 0.0 {
        return 0.0;
    }
    if real_return <= 0.0 {
        return f64::INFINITY;
    }
    max_expenses / real_return * SAFETY_MARGIN
}

/// Checks a completed run retiring at `fire_age` against `required`.
///
/// Sufficiency: real net worth at `fire_age` reaches `required`.
/// Monotonicity: real net worth never falls year over year after `fire_age`.
pub fn check_sustainability(
    projections: &[YearlyProjection],
    fire_age: u32,
    required: f64,
) -> SustainabilityReport {
    let Some(start) = projections.iter().position(|p| p.age == fire_age) else {
        return SustainabilityReport {
            fire_age,
            net_worth_at_fire: f64::NAN,
            required_net_worth: required,
            sufficient: false,
            non_decreasing: false,
        };
    };

    let net_worth_at_fire = projections[start].net_worth;
    let non_decreasing = projections[start..]
        .windows(2)
        .all(|pair| pair[1].net_worth + NET_WORTH_TOLERANCE >= pair[0].net_worth);

    SustainabilityReport {
        fire_age,
        net_worth_at_fire,
        required_net_worth: required,
        sufficient: net_worth_at_fire >= required,
        non_decreasing,
    }
}

/// Last age of the search range, clamped to `u32::MAX`.
pub fn search_upper_bound(profile: &Profile) -> u32 {
    profile.current_age.saturating_add(PROJECTION_YEARS)
}

/// Last age simulated when testing a candidate. Never earlier than the search range.
pub fn sustainability_horizon(profile: &Profile) -> u32 {
    END_OF_LIFE_AGE.max(search_upper_bound(profile))
}

#[derive(Debug, Clone, Copy)]
pub struct SearchProbe {
    pub iteration: u32,
    pub lower_bound: u32,
    pub upper_bound: u32,
    pub candidate_age: u32,
    pub report: SustainabilityReport,
}

#[derive(Debug, Clone)]
pub struct FireAgeSolution {
    pub fire_age: u32,
    /// False when no age in range works and the search saturated at the upper bound.
    pub sustainable: bool,
    pub required_net_worth: f64,
    pub probes: Vec<SearchProbe>,
}

pub fn evaluate_candidate(profile: &Profile, candidate_age: u32) -> SustainabilityReport {
    let horizon = sustainability_horizon(profile);
    let projections = simulate_lifetime(profile, Some(candidate_age), horizon);
    let required = required_net_worth(&projections, candidate_age, profile.investment_return);
    check_sustainability(&projections, candidate_age, required)
}

/// Earliest sustainable retirement age in `[current_age, current_age + 50]`.
///
/// Saturates at the upper bound when nothing in range is sustainable.
pub fn solve_fire_age(profile: &Profile) -> FireAgeSolution {
    let mut lo = profile.current_age;
    let mut hi = search_upper_bound(profile);
    let mut probes = Vec::new();
    let mut it = 0;

    while lo < hi {
        it += 1;
        let mid = lo + (hi - lo) / 2;
        let report = evaluate_candidate(profile, mid);
        trace!(
            iteration = it,
            lo,
            hi,
            candidate = mid,
            net_worth = report.net_worth_at_fire,
            required = report.required_net_worth,
            sustainable = report.is_sustainable(),
            "probed retirement age"
        );
        probes.push(SearchProbe {
            iteration: it,
            lower_bound: lo,
            upper_bound: hi,
            candidate_age: mid,
            report,
        });

        if report.is_sustainable() {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    let accepted = probes
        .iter()
        .rev()
        .find(|probe| probe.candidate_age == lo)
        .map(|probe| probe.report)
        .unwrap_or_else(|| evaluate_candidate(profile, lo));

    debug!(
        fire_age = lo,
        sustainable = accepted.is_sustainable(),
        probes = probes.len(),
        "solved FIRE age"
    );

    FireAgeSolution {
        fire_age: lo,
        sustainable: accepted.is_sustainable(),
        required_net_worth: accepted.required_net_worth,
        probes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ExpenseStream;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn projection(age: u32, net_worth: f64, annual_expenses: f64) -> YearlyProjection {
        YearlyProjection {
            age,
            net_worth,
            annual_expenses,
            annual_income: 0.0,
            investment_returns: 0.0,
            net_savings: 0.0,
            base_expenses: annual_expenses,
            additional_expenses: 0.0,
            kids_expenses: None,
            parents_care_expenses: None,
        }
    }

    fn brute_force_fire_age(profile: &Profile) -> u32 {
        let upper = search_upper_bound(profile);
        (profile.current_age..=upper)
            .find(|&age| evaluate_candidate(profile, age).is_sustainable())
            .unwrap_or(upper)
    }

    #[test]
    fn required_net_worth_uses_worst_expense_year_from_fire_age() {
        let projections = vec![
            projection(40, 0.0, 90_000.0),
            projection(41, 0.0, 40_000.0),
            projection(42, 0.0, 50_000.0),
            projection(43, 0.0, 45_000.0),
        ];
        let required = required_net_worth(&projections, 41, 0.05);
        assert!((required - 50_000.0 / 0.05 * 1.2).abs() < 1e-6);
    }

    #[test]
    fn required_net_worth_handles_degenerate_returns() {
        let projections = vec![projection(40, 0.0, 1_000.0)];
        assert_eq!(required_net_worth(&projections, 40, 0.0), f64::INFINITY);
        assert_eq!(required_net_worth(&projections, 40, -0.01), f64::INFINITY);

        let free = vec![projection(40, 0.0, 0.0)];
        assert_eq!(required_net_worth(&free, 40, 0.0), 0.0);
    }

    #[test]
    fn check_rejects_insufficient_net_worth() {
        let projections = vec![projection(50, 100.0, 10.0), projection(51, 110.0, 10.0)];
        let report = check_sustainability(&projections, 50, 200.0);
        assert!(!report.sufficient);
        assert!(report.non_decreasing);
        assert!(!report.is_sustainable());
    }

    #[test]
    fn check_rejects_real_decline_after_fire_age() {
        let projections = vec![
            projection(49, 900.0, 10.0),
            projection(50, 1_000.0, 10.0),
            projection(51, 1_010.0, 10.0),
            projection(52, 1_005.0, 10.0),
        ];
        let report = check_sustainability(&projections, 50, 500.0);
        assert!(report.sufficient);
        assert!(!report.non_decreasing);
        assert!(!report.is_sustainable());
    }

    #[test]
    fn check_ignores_declines_before_fire_age() {
        let projections = vec![
            projection(49, 2_000.0, 10.0),
            projection(50, 1_000.0, 10.0),
            projection(51, 1_000.0, 10.0),
        ];
        assert!(check_sustainability(&projections, 50, 1_000.0).is_sustainable());
    }

    #[test]
    fn check_fails_when_fire_age_is_outside_run() {
        let projections = vec![projection(50, 1_000.0, 10.0)];
        assert!(!check_sustainability(&projections, 70, 0.0).is_sustainable());
    }

    #[test]
    fn horizon_extends_for_older_profiles() {
        let mut profile = Profile::default();
        assert_eq!(sustainability_horizon(&profile), 90);
        profile.current_age = 60;
        profile.career_growth_slowdown_age = 65;
        assert_eq!(sustainability_horizon(&profile), 110);
    }

    #[test]
    fn search_range_saturates_near_u32_max() {
        let profile = Profile {
            current_age: u32::MAX - 10,
            ..Profile::default()
        };
        assert_eq!(search_upper_bound(&profile), u32::MAX);
        assert_eq!(sustainability_horizon(&profile), u32::MAX);

        let solution = solve_fire_age(&profile);
        assert!(solution.fire_age >= profile.current_age);
        assert_eq!(solution.fire_age, brute_force_fire_age(&profile));
    }

    #[test]
    fn solver_finds_minimal_sustainable_age() {
        let profile = Profile::default();
        let solution = solve_fire_age(&profile);

        assert!(solution.sustainable);
        assert!(solution.fire_age > profile.current_age);
        assert_eq!(solution.fire_age, brute_force_fire_age(&profile));
        assert!(!evaluate_candidate(&profile, solution.fire_age - 1).is_sustainable());
        assert!(solution.probes.len() <= 6);
    }

    #[test]
    fn solver_accepts_current_age_when_already_independent() {
        let profile = Profile {
            current_savings: 5_000_000.0,
            ..Profile::default()
        };
        let solution = solve_fire_age(&profile);
        assert_eq!(solution.fire_age, profile.current_age);
        assert!(solution.sustainable);
    }

    #[test]
    fn solver_saturates_at_upper_bound_when_nothing_works() {
        let profile = Profile {
            current_savings: 0.0,
            annual_income: 40_000.0,
            annual_expenses: 40_000.0,
            ..Profile::default()
        };
        let solution = solve_fire_age(&profile);
        assert_eq!(solution.fire_age, profile.current_age + PROJECTION_YEARS);
        assert!(!solution.sustainable);
    }

    #[test]
    fn solver_saturates_with_non_positive_real_return() {
        let profile = Profile {
            investment_return: 0.0,
            ..Profile::default()
        };
        let solution = solve_fire_age(&profile);
        assert_eq!(solution.fire_age, profile.current_age + PROJECTION_YEARS);
        assert!(!solution.sustainable);
        assert_eq!(solution.required_net_worth, f64::INFINITY);
    }

    #[test]
    fn later_expense_stream_pushes_fire_age_out() {
        let base = Profile::default();
        let with_stream = Profile {
            additional_retirement_expenses: vec![ExpenseStream {
                id: "test".to_string(),
                name: "Test Expense".to_string(),
                amount: 10_000.0,
                start_age: 65,
                end_age: None,
            }],
            ..Profile::default()
        };
        assert!(solve_fire_age(&with_stream).fire_age > solve_fire_age(&base).fire_age);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(24))]

        #[test]
        fn prop_binary_search_matches_linear_scan(
            current_age in 20u32..60,
            savings in 0u32..2_000_000,
            income in 30_000u32..200_000,
            expense_pct in 20u32..100,
            return_bp in 100u32..1200,
            inflation_bp in 0u32..600,
            tax_pct in 0u32..50
        ) {
            let profile = Profile {
                current_age,
                current_savings: savings as f64,
                annual_income: income as f64,
                annual_expenses: income as f64 * expense_pct as f64 / 100.0,
                investment_return: return_bp as f64 / 10_000.0,
                inflation_rate: inflation_bp as f64 / 10_000.0,
                tax_rate: tax_pct as f64 / 100.0,
                career_growth_slowdown_age: current_age + 10,
                ..Profile::default()
            };
            let solution = solve_fire_age(&profile);
            prop_assert_eq!(solution.fire_age, brute_force_fire_age(&profile));
            prop_assert!(solution.fire_age >= current_age);
            prop_assert!(solution.fire_age <= current_age + PROJECTION_YEARS);
        }
    }
}
