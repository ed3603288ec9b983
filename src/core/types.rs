use serde::Serialize;

/// Age at which a grant's withheld balance is released.
pub const VESTING_AGE_YEARS: u32 = 5;

/// Scheme parameters. Rates are decimals, e.g. `0.10` for 10%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemeInputs {
    pub grant_size: f64,
    pub annual_return_rate: f64,
    pub years: u32,
    pub decay_rate: f64,
}

/// One year's award and its accrual state.
#[derive(Debug, Clone, PartialEq)]
pub struct Grant {
    pub id: u32,
    pub value: f64,
    pub age_in_years: u32,
    pub accumulated_withheld: f64,
    pub payout_occurred: bool,
}

impl Grant {
    pub fn issue(id: u32, value: f64) -> Self {
        Self {
            id,
            value,
            age_in_years: 0,
            accumulated_withheld: 0.0,
            payout_occurred: false,
        }
    }

    pub fn is_vested(&self) -> bool {
        self.age_in_years >= VESTING_AGE_YEARS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearDetails {
    pub direct_from_returns: f64,
    pub payouts_from_withheld: f64,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub year: u32,
    pub total_cash_received: f64,
    pub total_withheld_balance_end_of_year: f64,
    pub total_vested_grants_value: f64,
    pub details: YearDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeSummary {
    pub total_cash_received: f64,
    pub total_direct_from_returns: f64,
    pub total_payouts_from_withheld: f64,
    pub final_withheld_balance: f64,
    pub final_vested_grants_value: f64,
    pub cumulative_cash_received: Vec<f64>,
}
