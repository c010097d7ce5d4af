use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};

use crate::{
    adapters::http::{app_state::AppState, response::ok},
    app_error::{AppError, AppResult},
    use_cases::therapist::ListParams,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/therapists", get(list_therapists))
        .route("/therapists/{id}", get(get_therapist))
}

async fn list_therapists(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let (filter, page) = params.into_query();
    let list = app_state.therapist_use_cases.list(filter, page).await?;
    Ok(ok(list))
}

async fn get_therapist(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    // Non-numeric ids cannot exist.
    let id: i64 = id.parse().map_err(|_| AppError::NotFound)?;
    let therapist = app_state.therapist_use_cases.get(id).await?;
    Ok(ok(therapist))
}
