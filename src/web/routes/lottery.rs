use axum::{extract::State, Json};
use tracing::debug;

use crate::{
    model::{self, PrizeDraw},
    web::{Error, WebResult},
    AppState,
};

#[tracing::instrument(name = "lottery", skip_all)]
pub async fn lottery(State(app_state): State<AppState>) -> WebResult<Json<PrizeDraw>> {
    let subscribers = app_state.store.list().await?;

    // `ThreadRng` is not `Send`, keep it out of any await.
    let prize_draw = model::draw(&subscribers, &mut rand::rng()).ok_or(Error::NoSubscribers)?;
    debug!("{:<20} - id: {}, prize: {}", "DRAWN", prize_draw.id, prize_draw.prize);

    Ok(Json(prize_draw))
}
