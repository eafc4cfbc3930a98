//! Conversions between today's dollars (real) and future dollars (nominal).

pub fn to_nominal(today_value: f64, inflation_rate: f64, years: u32) -> f64 {
    today_value * price_index(inflation_rate, years)
}

pub fn to_today(nominal_value: f64, inflation_rate: f64, years: u32) -> f64 {
    nominal_value / price_index(inflation_rate, years)
}

/// Fisher relation: the nominal rate that delivers `real_return` after inflation.
pub fn nominal_return_rate(real_return: f64, inflation_rate: f64) -> f64 {
    (1.0 + real_return) * (1.0 + inflation_rate) - 1.0
}

fn price_index(inflation_rate: f64, years: u32) -> f64 {
    if years == 0 {
        return 1.0;
    }
    (1.0 + inflation_rate).powi(years as i32)
}
