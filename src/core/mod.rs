mod engine;
mod report;
mod types;

pub use engine::{effective_return_rate, run_model, simulate, summarize};
pub use report::{
    configuration_lines, format_money, format_percent, overall_summary_lines, year_summary_lines,
};
pub use types::{Grant, SchemeInputs, SchemeSummary, VESTING_AGE_YEARS, YearDetails, YearResult};
