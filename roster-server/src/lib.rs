use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

use crate::roster_manager::{RosterManager, ServiceError};
use roster_types::{CoachId, Command, GameFormat, TrackerError};

pub mod config;
pub mod roster_manager;

/// Header carrying the roster owner's id.
pub const COACH_HEADER: &str = "x-coach-id";

type JsonReply = WithStatus<Json>;

pub fn create_routes(
    roster_manager: Arc<RosterManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let roster_manager_filter = warp::any().map({
        let roster_manager = roster_manager.clone();
        move || roster_manager.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let roster = warp::path!("api" / "roster")
        .and(warp::get())
        .and(warp::header::optional::<String>(COACH_HEADER))
        .and(roster_manager_filter.clone())
        .and_then(handle_roster_request);

    let commands = warp::path!("api" / "commands")
        .and(warp::post())
        .and(warp::header::optional::<String>(COACH_HEADER))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json::<Command>())
        .and(roster_manager_filter.clone())
        .and_then(handle_command_request);

    let clock = warp::path!("api" / "clock")
        .and(warp::get())
        .and(warp::header::optional::<String>(COACH_HEADER))
        .and(roster_manager_filter.clone())
        .and_then(handle_clock_request);

    let report = warp::path!("api" / "matches" / String / "report")
        .and(warp::get())
        .and(warp::header::optional::<String>(COACH_HEADER))
        .and(roster_manager_filter.clone())
        .and_then(handle_report_request);

    let formations = warp::path!("api" / "formations" / String)
        .and(warp::get())
        .and_then(handle_formations_request);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", COACH_HEADER])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(roster)
        .or(commands)
        .or(clock)
        .or(report)
        .or(formations)
        .with(cors)
        .with(warp::log("sideline"))
}

fn error_reply(message: impl Into<String>, status: StatusCode) -> JsonReply {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message.into()
        })),
        status,
    )
}

fn parse_coach(header: Option<String>) -> Result<CoachId, JsonReply> {
    let value = header.ok_or_else(|| {
        error_reply("Missing x-coach-id header", StatusCode::UNAUTHORIZED)
    })?;
    Uuid::parse_str(value.trim())
        .map_err(|_| error_reply("Invalid x-coach-id header", StatusCode::UNAUTHORIZED))
}

pub fn tracker_error_status(error: &TrackerError) -> StatusCode {
    match error {
        TrackerError::PlayerNotFound { .. } => StatusCode::NOT_FOUND,
        TrackerError::MatchAlreadyActive
        | TrackerError::NoActiveMatch
        | TrackerError::AlreadyInHalfTime
        | TrackerError::NotInHalfTime
        | TrackerError::HalfTimeAlreadyTaken
        | TrackerError::PositionOccupied { .. } => StatusCode::CONFLICT,
        TrackerError::UnknownPosition { .. }
        | TrackerError::InvalidPlayerName
        | TrackerError::InvalidDuration { .. }
        | TrackerError::InvalidGoal { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn service_error_reply(error: ServiceError) -> JsonReply {
    match error {
        ServiceError::Tracker(e) => error_reply(e.to_string(), tracker_error_status(&e)),
        ServiceError::MatchNotFound { match_id } => error_reply(
            format!("Match not found: {}", match_id),
            StatusCode::NOT_FOUND,
        ),
        // Details are already logged by the manager.
        ServiceError::Persistence(_) => error_reply(
            "Failed to save roster changes",
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    }
}

async fn handle_roster_request(
    coach_header: Option<String>,
    roster_manager: Arc<RosterManager>,
) -> Result<JsonReply, warp::Rejection> {
    let coach_id = match parse_coach(coach_header) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match roster_manager.roster_view(coach_id).await {
        Ok(view) => Ok(warp::reply::with_status(
            warp::reply::json(&view),
            StatusCode::OK,
        )),
        Err(err) => Ok(service_error_reply(err)),
    }
}

async fn handle_command_request(
    coach_header: Option<String>,
    command: Command,
    roster_manager: Arc<RosterManager>,
) -> Result<JsonReply, warp::Rejection> {
    let coach_id = match parse_coach(coach_header) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match roster_manager.execute(coach_id, command).await {
        Ok(outcome) => Ok(warp::reply::with_status(
            warp::reply::json(&outcome),
            StatusCode::OK,
        )),
        Err(err) => Ok(service_error_reply(err)),
    }
}

async fn handle_clock_request(
    coach_header: Option<String>,
    roster_manager: Arc<RosterManager>,
) -> Result<JsonReply, warp::Rejection> {
    let coach_id = match parse_coach(coach_header) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match roster_manager.clock_state(coach_id).await {
        Ok(Some(state)) => Ok(warp::reply::with_status(
            warp::reply::json(&state),
            StatusCode::OK,
        )),
        Ok(None) => Ok(error_reply("No match has been started", StatusCode::NOT_FOUND)),
        Err(err) => Ok(service_error_reply(err)),
    }
}

async fn handle_report_request(
    match_id: String,
    coach_header: Option<String>,
    roster_manager: Arc<RosterManager>,
) -> Result<JsonReply, warp::Rejection> {
    let coach_id = match parse_coach(coach_header) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    let match_id = match Uuid::parse_str(&match_id) {
        Ok(uuid) => uuid,
        Err(_) => {
            return Ok(error_reply(
                "Invalid match ID format",
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    match roster_manager.report(coach_id, match_id).await {
        Ok(report) => Ok(warp::reply::with_status(
            warp::reply::json(&report),
            StatusCode::OK,
        )),
        Err(err) => Ok(service_error_reply(err)),
    }
}

async fn handle_formations_request(format: String) -> Result<JsonReply, warp::Rejection> {
    match format.parse::<GameFormat>() {
        Ok(format) => Ok(warp::reply::with_status(
            warp::reply::json(&roster_core::formations_for(format)),
            StatusCode::OK,
        )),
        Err(message) => Ok(error_reply(message, StatusCode::NOT_FOUND)),
    }
}
