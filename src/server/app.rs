use std::sync::Arc;

use axum::Router;

use super::{server_state::ServerState, wol::router::create_router};

pub fn create_app(state: ServerState) -> Router<()> {
    let app_state = Arc::new(state);

    Router::new()
        .nest("/webhook", create_router(app_state.clone()))
        .with_state(app_state)
}
