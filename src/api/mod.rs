use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{Level, debug, info, warn};

use crate::core::{
    SchemeInputs, SchemeSummary, YearResult, configuration_lines, overall_summary_lines,
    run_model, summarize, year_summary_lines,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

pub const MAX_SIMULATION_YEARS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("--grant-size must be a finite amount > 0")]
    GrantSize,
    #[error("--years must be between 1 and {}", MAX_SIMULATION_YEARS)]
    Years,
    #[error("--annual-return-rate must be between 0 and 100")]
    AnnualReturnRate,
    #[error("--decay-rate must be between 0 and 100")]
    DecayRate,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    grant_size: Option<f64>,
    annual_return_rate: Option<f64>,
    years: Option<u32>,
    decay_rate: Option<f64>,
    include_log: Option<bool>,
}

#[derive(Parser, Debug)]
#[command(
    name = "rsu",
    about = "Year-by-year RSU scheme simulator (annual grants, half of each return withheld until age 5)"
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 55_000.0,
        help = "Value of the grant issued every year"
    )]
    grant_size: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Initial annual return on grant value in percent, e.g. 10"
    )]
    annual_return_rate: f64,
    #[arg(long, default_value_t = 10, help = "Number of years to simulate")]
    years: u32,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Yearly decay of a grant's return rate after its first earning year, in percent"
    )]
    decay_rate: f64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[arg(long, help = "Print each grant's yearly narration in the text report")]
    details: bool,
}

#[derive(Copy, Clone, Debug)]
struct ApiOptions {
    include_log: bool,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: SchemeInputs,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    grant_size: f64,
    annual_return_rate: f64,
    years: u32,
    decay_rate: f64,
    summary: SchemeSummary,
    year_results: Vec<YearResult>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<SchemeInputs, InputError> {
    if !cli.grant_size.is_finite() || cli.grant_size <= 0.0 {
        return Err(InputError::GrantSize);
    }

    if !(1..=MAX_SIMULATION_YEARS).contains(&cli.years) {
        return Err(InputError::Years);
    }

    if !(0.0..=100.0).contains(&cli.annual_return_rate) {
        return Err(InputError::AnnualReturnRate);
    }

    if !(0.0..=100.0).contains(&cli.decay_rate) {
        return Err(InputError::DecayRate);
    }

    Ok(SchemeInputs {
        grant_size: cli.grant_size,
        annual_return_rate: cli.annual_return_rate / 100.0,
        years: cli.years,
        decay_rate: cli.decay_rate / 100.0,
    })
}

/// Parses `args` as the command line, runs one simulation and prints the report.
pub fn run_cli<I, T>(args: I) -> Result<(), RunError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let inputs = build_inputs(&cli)?;
    debug!(?inputs, "running RSU simulation");
    let results = run_model(&inputs);

    match cli.format {
        OutputFormat::Text => print!("{}", render_text_report(&inputs, &results, cli.details)),
        OutputFormat::Json => {
            let response = build_simulate_response(&inputs, results);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

fn render_text_report(inputs: &SchemeInputs, results: &[YearResult], details: bool) -> String {
    let mut lines = vec!["--- RSU Model Configuration ---".to_string()];
    lines.extend(configuration_lines(inputs));
    lines.push("---------------------------------".to_string());
    lines.push(String::new());

    for result in results {
        lines.push(format!("--- Year {} ---", result.year));
        if details {
            lines.extend(result.details.log.iter().cloned());
        }
        lines.extend(year_summary_lines(result));
        lines.push(String::new());
    }

    lines.push("--- Overall Yearly Cash Summary ---".to_string());
    lines.extend(overall_summary_lines(results));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "RSU HTTP API listening");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler)
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => {
            warn!(%err, "rejected simulate request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    let inputs = &request.inputs;
    info!(
        grant_size = inputs.grant_size,
        annual_return_rate = inputs.annual_return_rate,
        years = inputs.years,
        decay_rate = inputs.decay_rate,
        "running RSU simulation"
    );
    let mut results = run_model(inputs);
    log_narration(inputs, &results);

    if !request.options.include_log {
        for result in &mut results {
            result.details.log.clear();
        }
    }

    json_response(StatusCode::OK, build_simulate_response(inputs, results))
}

fn log_narration(inputs: &SchemeInputs, results: &[YearResult]) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    for line in configuration_lines(inputs) {
        debug!("{line}");
    }
    for result in results {
        for line in &result.details.log {
            debug!(year = result.year, "{line}");
        }
        for line in year_summary_lines(result) {
            debug!(year = result.year, "{line}");
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.grant_size {
        cli.grant_size = v;
    }
    if let Some(v) = payload.annual_return_rate {
        cli.annual_return_rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.decay_rate {
        cli.decay_rate = v;
    }

    let inputs = build_inputs(&cli)?;
    let options = ApiOptions {
        include_log: payload.include_log.unwrap_or(true),
    };

    Ok(ApiRequest { inputs, options })
}

fn default_cli_for_api() -> Cli {
    Cli {
        grant_size: 55_000.0,
        annual_return_rate: 10.0,
        years: 10,
        decay_rate: 0.0,
        format: OutputFormat::Json,
        details: true,
    }
}

fn build_simulate_response(inputs: &SchemeInputs, results: Vec<YearResult>) -> SimulateResponse {
    SimulateResponse {
        grant_size: inputs.grant_size,
        annual_return_rate: inputs.annual_return_rate,
        years: inputs.years,
        decay_rate: inputs.decay_rate,
        summary: summarize(&results),
        year_results: results,
    }
}
