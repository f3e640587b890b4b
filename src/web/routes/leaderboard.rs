use axum::{extract::State, Json};

use crate::{
    model,
    web::{types::Leaderboard, WebResult},
    AppState,
};

#[tracing::instrument(name = "leaderboard", skip_all)]
pub async fn leaderboard(State(app_state): State<AppState>) -> WebResult<Json<Leaderboard>> {
    let subscribers = app_state.store.list().await?;

    Ok(Json(Leaderboard {
        lestvica: model::rank(subscribers),
    }))
}
