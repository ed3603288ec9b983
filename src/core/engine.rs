use super::report::{format_money, format_percent};
use super::types::{
    Grant, SchemeInputs, SchemeSummary, VESTING_AGE_YEARS, YearDetails, YearResult,
};

pub fn simulate(
    grant_size: f64,
    annual_return_rate: f64,
    years: u32,
    decay_rate: f64,
) -> Vec<YearResult> {
    run_model(&SchemeInputs {
        grant_size,
        annual_return_rate,
        years,
        decay_rate,
    })
}

pub fn run_model(inputs: &SchemeInputs) -> Vec<YearResult> {
    let mut grants = Vec::new();
    let mut results = Vec::with_capacity(inputs.years as usize);
    for current_year in 1..=inputs.years {
        results.push(simulate_year(inputs, &mut grants, current_year));
    }
    results
}

/// Return rate earned by a grant in the year it reaches `age_in_years`.
///
/// The first earning year is never decayed; later years compound the decay
/// over `age_in_years - 1` steps and never go below zero.
pub fn effective_return_rate(
    annual_return_rate: f64,
    decay_rate: f64,
    age_in_years: u32,
) -> f64 {
    if age_in_years == 1 || decay_rate == 0.0 {
        return annual_return_rate;
    }
    let decay_factor = (1.0 - decay_rate).powf(f64::from(age_in_years) - 1.0);
    (annual_return_rate * decay_factor).max(0.0)
}

pub fn summarize(results: &[YearResult]) -> SchemeSummary {
    let mut summary = SchemeSummary {
        cumulative_cash_received: Vec::with_capacity(results.len()),
        ..SchemeSummary::default()
    };
    for result in results {
        summary.total_cash_received += result.total_cash_received;
        summary.total_direct_from_returns += result.details.direct_from_returns;
        summary.total_payouts_from_withheld += result.details.payouts_from_withheld;
        summary
            .cumulative_cash_received
            .push(summary.total_cash_received);
    }
    if let Some(last) = results.last() {
        summary.final_withheld_balance = last.total_withheld_balance_end_of_year;
        summary.final_vested_grants_value = last.total_vested_grants_value;
    }
    summary
}

fn simulate_year(
    inputs: &SchemeInputs,
    grants: &mut Vec<Grant>,
    current_year: u32,
) -> YearResult {
    let mut details = YearDetails::default();
    let mut cash_received = 0.0;

    let issued = Grant::issue(current_year, inputs.grant_size);
    details.log.push(format!(
        "  New grant G{} (value {}) issued.",
        issued.id,
        format_money(issued.value)
    ));
    grants.push(issued);

    for grant in grants.iter_mut() {
        grant.age_in_years += 1;
        let rate = effective_return_rate(
            inputs.annual_return_rate,
            inputs.decay_rate,
            grant.age_in_years,
        );
        let grant_return = grant.value * rate;
        let prefix = format!(
            "  Grant G{} (Age: {}, Value: {}):",
            grant.id,
            grant.age_in_years,
            format_money(grant.value)
        );

        if grant_return == 0.0 {
            details.log.push(format!(
                "{prefix} No return this year (Effective rate: {}).",
                format_percent(rate)
            ));
            continue;
        }
        details.log.push(format!(
            "{prefix} Earned {} return (Effective rate: {}).",
            format_money(grant_return),
            format_percent(rate)
        ));

        let direct_half = grant_return / 2.0;
        let withheld_half = grant_return / 2.0;

        cash_received += direct_half;
        details.direct_from_returns += direct_half;
        details.log.push(format!(
            "    +{} paid as direct cash (50% of return).",
            format_money(direct_half)
        ));

        if grant.payout_occurred {
            cash_received += withheld_half;
            details.direct_from_returns += withheld_half;
            details.log.push(format!(
                "    +{} paid as cash (other 50% of return, G{} already paid out).",
                format_money(withheld_half),
                grant.id
            ));
            continue;
        }

        grant.accumulated_withheld += withheld_half;
        details.log.push(format!(
            "    +{} added to withheld. (Total withheld for G{}: {})",
            format_money(withheld_half),
            grant.id,
            format_money(grant.accumulated_withheld)
        ));

        if grant.age_in_years == VESTING_AGE_YEARS {
            let payout = grant.accumulated_withheld;
            cash_received += payout;
            details.payouts_from_withheld += payout;
            details.log.push(format!(
                "    PAYOUT! G{} is {VESTING_AGE_YEARS} years old. Releasing withheld amount of {}.",
                grant.id,
                format_money(payout)
            ));
            grant.accumulated_withheld = 0.0;
            grant.payout_occurred = true;
        }
    }

    // Folding from +0.0 keeps empty totals from serializing as -0.0.
    let total_withheld_balance_end_of_year = grants
        .iter()
        .fold(0.0, |acc, g| acc + g.accumulated_withheld);
    let total_vested_grants_value = grants
        .iter()
        .filter(|g| g.is_vested())
        .fold(0.0, |acc, g| acc + g.value);

    YearResult {
        year: current_year,
        total_cash_received: cash_received,
        total_withheld_balance_end_of_year,
        total_vested_grants_value,
        details,
    }
}
