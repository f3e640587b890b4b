//! Contains all the routes that this application can handle.

mod leaderboard;
mod lottery;
mod ops;
mod subscribers;

use axum::{middleware, routing::get, Router};

use crate::{web::midware, AppState};

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .merge(subscriber_routes(app_state.clone()))
        .route("/lestvica", get(leaderboard::leaderboard))
        .route("/loto", get(lottery::lottery))
        .route("/healthcheck", get(ops::healthcheck))
        .route("/environment", get(ops::environment))
        .route("/metrics", get(ops::metrics))
        .with_state(app_state)
}

/// NAROCNIKI - the record endpoints, the only ones that are counted in `/metrics`
fn subscriber_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/narocniki",
            get(subscribers::list).post(subscribers::create),
        )
        .route(
            "/narocniki/{id}",
            get(subscribers::get)
                .put(subscribers::update)
                .delete(subscribers::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state,
            midware::count_requests,
        ))
}
