use crate::errors::AppError;
use crate::events::{Event, EventForm, ExportForm};
use crate::models::{ExportResponse, Notice, PageView, SnapshotResponse, Tracker};
use crate::session::{session_cookie, session_id};
use crate::state::AppState;
use crate::stats::{build_view, render_pass};
use crate::storage::{append_log, build_report, saved_record, write_snapshot, REPORT_FILE};
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use chrono::Local;

const SAVED_MESSAGE: &str = "Progress saved! Your future self will thank you for this consistency!";

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    Html(render_index(&current_view(&state, &headers).await))
}

pub async fn get_view(State(state): State<AppState>, headers: HeaderMap) -> Json<PageView> {
    Json(current_view(&state, &headers).await)
}

pub async fn event_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<EventForm>,
) -> Result<impl IntoResponse, AppError> {
    let event = Event::try_from(form)?;
    let (id, tracker) = state.find_or_create(session_id(&headers)).await;
    tracker.lock().await.apply(event)?;
    Ok((session_cookie(id), Redirect::to("/")))
}

pub async fn event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<Event>,
) -> Result<impl IntoResponse, AppError> {
    let (id, tracker) = state.find_or_create(session_id(&headers)).await;
    let mut tracker = tracker.lock().await;
    tracker.apply(event)?;
    Ok((session_cookie(id), Json(render_pass(&mut tracker))))
}

pub async fn save_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ExportForm>,
) -> Result<impl IntoResponse, AppError> {
    let (id, tracker) = state.find_or_create(session_id(&headers)).await;
    let mut tracker = tracker.lock().await;
    if let Some(event) = form.into_event() {
        tracker.apply(event)?;
    }

    let date = today_string();
    match append_log(&state.exports.log_path(), state.exports.csv_rows, &date, &tracker).await {
        Ok(_) => {
            tracker.saved = Some(saved_record(&date, &tracker));
            tracker.notice = Some(Notice::success(SAVED_MESSAGE));
        }
        Err(err) => tracker.notice = Some(Notice::error(format!("Save failed: {}", err.message))),
    }

    Ok((session_cookie(id), Redirect::to("/")))
}

pub async fn save(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (id, tracker) = state.find_or_create(session_id(&headers)).await;
    let tracker = tracker.lock().await;

    let path = state.exports.log_path();
    let rows = append_log(&path, state.exports.csv_rows, &today_string(), &tracker).await?;

    Ok((
        session_cookie(id),
        Json(ExportResponse {
            path: path.display().to_string(),
            rows,
        }),
    ))
}

pub async fn snapshot_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ExportForm>,
) -> Result<impl IntoResponse, AppError> {
    let (id, tracker) = state.find_or_create(session_id(&headers)).await;
    let mut tracker = tracker.lock().await;
    if let Some(event) = form.into_event() {
        tracker.apply(event)?;
    }

    let path = state.exports.snapshot_path();
    tracker.notice = Some(match write_snapshot(&path, &tracker).await {
        Ok(()) => Notice::success(format!("Snapshot written to {}", path.display())),
        Err(err) => Notice::error(format!("Snapshot failed: {}", err.message)),
    });

    Ok((session_cookie(id), Redirect::to("/")))
}

pub async fn snapshot(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (id, tracker) = state.find_or_create(session_id(&headers)).await;
    let tracker = tracker.lock().await;

    let path = state.exports.snapshot_path();
    write_snapshot(&path, &tracker).await?;

    Ok((
        session_cookie(id),
        Json(SnapshotResponse {
            path: path.display().to_string(),
        }),
    ))
}

pub async fn report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(form): Query<ExportForm>,
) -> Result<impl IntoResponse, AppError> {
    let id = session_id(&headers);
    let (cookie, report) = match form.into_event() {
        Some(event) => {
            let (id, tracker) = state.find_or_create(id).await;
            let mut tracker = tracker.lock().await;
            tracker.apply(event)?;
            (Some(session_cookie(id)), build_report(&tracker))
        }
        None => match state.find(id).await {
            Some(tracker) => {
                let tracker = tracker.lock().await;
                (None, build_report(&tracker))
            }
            None => (None, build_report(&Tracker::default())),
        },
    };

    Ok((
        cookie,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILE}\""),
            ),
        ],
        report,
    ))
}

/// Renders the caller's session, or an empty tracker without storing one.
async fn current_view(state: &AppState, headers: &HeaderMap) -> PageView {
    match state.find(session_id(headers)).await {
        Some(tracker) => {
            let mut tracker = tracker.lock().await;
            render_pass(&mut tracker)
        }
        None => build_view(&Tracker::default()),
    }
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
