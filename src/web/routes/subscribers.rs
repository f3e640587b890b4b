use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::{
    model::{FieldUpdate, Subscriber},
    web::{
        types::{DeserFieldUpdate, DeserSubscriber, SubscriberList},
        Error, WebResult,
    },
    AppState,
};

#[tracing::instrument(name = "list_subscribers", skip_all)]
pub async fn list(State(app_state): State<AppState>) -> WebResult<Json<SubscriberList>> {
    let narocniki = app_state.store.list().await?;
    debug!("{:<20} - {} subscribers", "LIST", narocniki.len());

    Ok(Json(SubscriberList { narocniki }))
}

#[tracing::instrument(name = "create_subscriber", skip_all)]
pub async fn create(
    State(app_state): State<AppState>,
    body: Result<Json<DeserSubscriber>, JsonRejection>,
) -> WebResult<(StatusCode, Json<Subscriber>)> {
    let Json(deser_sub) = body?;
    let subscriber = Subscriber::try_from(deser_sub)?;

    let created = app_state.store.insert(subscriber).await?;
    debug!("{:<20} - id: {}", "CREATED", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

#[tracing::instrument(name = "get_subscriber", skip_all)]
pub async fn get(
    State(app_state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> WebResult<Json<Subscriber>> {
    let Path(id) = id?;

    let subscriber = app_state
        .store
        .get(id)
        .await?
        .ok_or(Error::SubscriberNotFound(id))?;

    Ok(Json(subscriber))
}

/// Changes a single attribute and responds with the subscriber as it was before the change.
#[tracing::instrument(name = "update_subscriber", skip_all)]
pub async fn update(
    State(app_state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<DeserFieldUpdate>, JsonRejection>,
) -> WebResult<Json<Subscriber>> {
    let Path(id) = id?;
    let Json(deser_update) = body?;
    let update = FieldUpdate::try_from(deser_update)?;

    let prior = app_state
        .store
        .update_field(id, &update)
        .await?
        .ok_or(Error::SubscriberNotFound(id))?;
    debug!("{:<20} - id: {id}, column: {}", "UPDATED", update.column());

    Ok(Json(prior))
}

#[tracing::instrument(name = "delete_subscriber", skip_all)]
pub async fn delete(
    State(app_state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> WebResult<StatusCode> {
    let Path(id) = id?;

    if !app_state.store.delete(id).await? {
        return Err(Error::SubscriberNotFound(id));
    }
    debug!("{:<20} - id: {id}", "DELETED");

    Ok(StatusCode::OK)
}
