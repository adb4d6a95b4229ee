use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{ConnectInfo, State},
    routing::post,
    Router,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::server::server_state::ServerState;

use super::{send_wake, WolError, WolSuccess};

pub fn create_router(state: Arc<ServerState>) -> Router<Arc<ServerState>> {
    Router::new().route("/wol", post(wake_on_lan)).with_state(state)
}

pub async fn wake_on_lan(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
) -> Result<WolSuccess, WolError> {
    let span = info_span!("webhook", request_id = %Uuid::new_v4(), %remote);

    async move {
        info!("Received request on /webhook/wol from {remote}");
        send_wake(&state.config, state.runner.as_ref()).await
    }
    .instrument(span)
    .await
}
