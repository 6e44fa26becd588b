use axum::{extract::State, http::HeaderMap, Json};
use tracing::{error, info, warn};

use crate::{
    web::{
        auth,
        types::{SubscriberView, SubscribersResponse},
        WebResult,
    },
    AppState,
};

/// `GET /subscribers`
/// Only callers holding the admin api key get to see the list. Rejected callers never reach the database.
#[tracing::instrument(name = "Listing subscribers", skip_all)]
pub async fn list_subscribers(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> WebResult<Json<SubscribersResponse>> {
    auth::authorize(&headers, &app_state.api_key)
        .inspect_err(|er| warn!("[!] Unauthorized access to subscribers: {er}"))?;

    let subscribers = app_state
        .database_mgr
        .list_subscribers()
        .await
        .inspect_err(|er| error!("[-] Error listing subscribers: {er}"))?;
    info!("Returning {} subscribers", subscribers.len());

    let subscribers = subscribers.into_iter().map(SubscriberView::from).collect();

    Ok(Json(SubscribersResponse { subscribers }))
}
