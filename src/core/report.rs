use super::types::{SchemeInputs, VESTING_AGE_YEARS, YearResult};

/// Formats an amount as dollars with thousands separators, e.g. `$1,234.56`.
pub fn format_money(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${amount}");
    }
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Formats a decimal rate as a percentage, e.g. `0.075` as `7.50%`.
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

pub fn configuration_lines(inputs: &SchemeInputs) -> Vec<String> {
    let decay_line = if inputs.decay_rate > 0.0 {
        format!(
            "Return Decay Rate Per Year (after 1st year of return): {}",
            format_percent(inputs.decay_rate)
        )
    } else {
        "Return Decay Rate Per Year: No decay".to_string()
    };
    vec![
        format!("Annual Grant Size: {}", format_money(inputs.grant_size)),
        format!(
            "Initial Annual Return Rate: {} on grant value",
            format_percent(inputs.annual_return_rate)
        ),
        decay_line,
        format!("Simulation Period: {} years", inputs.years),
    ]
}

pub fn year_summary_lines(result: &YearResult) -> Vec<String> {
    vec![
        format!("  Summary for Year {}:", result.year),
        format!(
            "    Cash from direct returns: {}",
            format_money(result.details.direct_from_returns)
        ),
        format!(
            "    Cash from payouts of withheld amounts: {}",
            format_money(result.details.payouts_from_withheld)
        ),
        format!(
            "  TOTAL CASH RECEIVED IN YEAR {}: {}",
            result.year,
            format_money(result.total_cash_received)
        ),
        format!(
            "  Total accumulated withheld balance (end of year): {}",
            format_money(result.total_withheld_balance_end_of_year)
        ),
        format!(
            "  Total value of vested grants ({VESTING_AGE_YEARS}+ years): {}",
            format_money(result.total_vested_grants_value)
        ),
    ]
}

pub fn overall_summary_lines(results: &[YearResult]) -> Vec<String> {
    results
        .iter()
        .map(|entry| {
            format!(
                "Year {}: Total Cash Received = {}, End of Year Withheld Balance = {}, Vested Grants Value = {}",
                entry.year,
                format_money(entry.total_cash_received),
                format_money(entry.total_withheld_balance_end_of_year),
                format_money(entry.total_vested_grants_value)
            )
        })
        .collect()
}
