mod error;

use axum::{
    Router,
    extract::Json,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing::info;

use crate::core::{FireResult, Profile, calculate_fire_projections, validate_profile};

pub use error::ApiError;

#[derive(Parser, Debug)]
#[command(
    name = "fire-age",
    about = "Earliest sustainable FIRE age with a year-by-year net worth projection"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level or filter directives, e.g. debug or fire_age=trace"
    )]
    pub log_level: String,
    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Calculate projections for a profile read as JSON
    Calculate {
        #[arg(
            long,
            default_value = "-",
            help = "Profile JSON file, or - for stdin"
        )]
        profile: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the reference profile as an import template
    DefaultProfile,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(cli: Cli) -> Result<(), ApiError> {
    match cli.command {
        Command::Serve { host, port } => run_http_server(host, port).await?,
        Command::Calculate { profile, pretty } => {
            let json = read_profile_source(&profile)?;
            let result = calculate_from_json(&json)?;
            println!("{}", encode(&result, pretty)?);
        }
        Command::DefaultProfile => println!("{}", Profile::default().to_json_pretty()?),
    }
    Ok(())
}

fn read_profile_source(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
}

fn encode<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/api/calculate", post(calculate_handler))
        .route("/api/profile/default", get(default_profile_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(host: IpAddr, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::new(host, port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "FIRE HTTP API listening");

    axum::serve(listener, router()).await
}

/// Import, validate and calculate in one step.
pub fn calculate_from_json(json: &str) -> Result<FireResult, ApiError> {
    let profile = Profile::from_json(json)?;
    validate_profile(&profile)?;
    Ok(calculate_fire_projections(&profile))
}

async fn calculate_handler(body: String) -> Result<Response, ApiError> {
    let result = tokio::task::spawn_blocking(move || calculate_from_json(&body)).await??;
    info!(
        fire_age = result.fire_age,
        sustainable = result.sustainable,
        years = result.yearly_projections.len(),
        "calculated projections"
    );
    Ok(json_response(StatusCode::OK, result))
}

async fn default_profile_handler() -> Response {
    info!("served default profile");
    json_response(StatusCode::OK, Profile::default())
}

async fn not_found_handler(method: Method, uri: Uri) -> Response {
    info!(%method, %uri, "no route");
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

pub(crate) fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
