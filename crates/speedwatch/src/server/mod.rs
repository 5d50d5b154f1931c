//! HTTP surface for speedwatch.
//!
//! Three endpoints over the use-case layer:
//!
//! - `POST /register` — store a new observation (form-encoded).
//! - `GET /overspeed?date=DD.MM.YYYY&speed=N` — records above a threshold.
//! - `GET /minmaxspeed?date=DD.MM.YYYY` — the day's slowest and fastest
//!   records.
//!
//! The two query endpoints sit behind a service-hours gate; registration
//! is accepted around the clock.

use axum::{
    extract::{Form, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::{Config, ServiceHours, CLOCK_FORMAT};
use crate::error::{Error, Result};
use crate::record::{parse_date, parse_timestamp, Record};
use crate::usecase::SpeedControl;

/// Shared state for all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    usecase: SpeedControl,
    hours: ServiceHours,
}

impl AppState {
    /// Bundle the use-case layer with the configured service window.
    #[must_use]
    pub fn new(usecase: SpeedControl, hours: ServiceHours) -> Self {
        Self { usecase, hours }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::DayNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/overspeed", get(over_speed))
        .route("/minmaxspeed", get(min_max_speed))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            service_hours_gate,
        ));

    Router::new()
        .route("/register", post(register))
        .merge(gated)
        .with_state(state)
}

/// Run the HTTP server until the process is stopped.
///
/// # Errors
///
/// Returns an error if the service window is unparsable, the listener
/// cannot bind, or the server fails while running.
pub async fn serve(config: &Config, usecase: SpeedControl) -> Result<()> {
    let state = AppState::new(usecase, config.service_hours()?);
    let app = router(state);

    let listener = TcpListener::bind(&config.server.addr).await?;
    info!("Listening on {}", config.server.addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Refuse query requests outside the configured service window.
async fn service_hours_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let now = Local::now().time();
    if state.hours.admits(now) {
        next.run(req).await
    } else {
        let message = format!(
            "service is open from {} till {}",
            state.hours.open.format(CLOCK_FORMAT),
            state.hours.close.format(CLOCK_FORMAT)
        );
        (StatusCode::NOT_ACCEPTABLE, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct RegisterForm {
    #[serde(default)]
    date: String,
    #[serde(default)]
    vehicle_number: String,
    #[serde(default)]
    speed: String,
}

#[derive(Debug, Deserialize)]
struct OverSpeedQuery {
    #[serde(default)]
    date: String,
    #[serde(default)]
    speed: String,
}

#[derive(Debug, Deserialize)]
struct MinMaxQuery {
    #[serde(default)]
    date: String,
}

async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Json<&'static str>> {
    if form.date.is_empty() {
        return Err(Error::validation("datetime not defined in this request"));
    }
    let date = parse_timestamp(&form.date)
        .map_err(|_| Error::validation("unable to parse datetime"))?;
    let speed: f64 = form
        .speed
        .parse()
        .map_err(|_| Error::validation("unable to parse speed"))?;

    let record = Record::new(date, form.vehicle_number, speed);
    state.usecase.register(&record)?;

    Ok(Json("register success"))
}

async fn over_speed(
    State(state): State<AppState>,
    Query(query): Query<OverSpeedQuery>,
) -> Result<Json<Vec<Record>>> {
    if query.date.is_empty() {
        return Err(Error::validation("datetime not defined in this request"));
    }
    let date =
        parse_date(&query.date).map_err(|_| Error::validation("unable to parse datetime"))?;
    let threshold: f64 = query
        .speed
        .parse()
        .map_err(|_| Error::validation("unable to parse speed"))?;

    let violators = state.usecase.over_speed(date, threshold)?;
    Ok(Json(violators))
}

async fn min_max_speed(
    State(state): State<AppState>,
    Query(query): Query<MinMaxQuery>,
) -> Result<Json<[Record; 2]>> {
    if query.date.is_empty() {
        return Err(Error::validation("datetime not defined in this request"));
    }
    let date =
        parse_date(&query.date).map_err(|_| Error::validation("unable to parse datetime"))?;

    let extremes = state.usecase.min_max(date)?;
    Ok(Json(extremes))
}
