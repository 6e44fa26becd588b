use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{error, info};

use crate::{
    web::{
        types::{DeserSubscriber, SubscribeResponse, ValidSubscriber},
        Error, WebResult,
    },
    AppState,
};

/// `POST /subscribe`
/// Body decoding and validation failures are client errors, storage failures are logged and
/// reported as a generic internal error.
#[tracing::instrument(name = "Adding a new subscriber", skip(app_state, payload))]
pub async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<DeserSubscriber>, JsonRejection>,
) -> WebResult<(StatusCode, Json<SubscribeResponse>)> {
    let Json(subscriber) = payload.map_err(|rej| Error::InvalidBody(rej.body_text()))?;
    let subscriber = ValidSubscriber::parse(subscriber, app_state.validate_email_format)?;

    let timestamp = Utc::now();
    app_state
        .database_mgr
        .insert_subscriber(
            subscriber.email.as_ref(),
            subscriber.name.as_ref().map(|name| name.as_ref()),
            timestamp,
        )
        .await
        .inspect_err(|er| error!("[-] Error subscribing: {er}"))?;

    info!("[+] New subscriber: {}", subscriber.email.as_ref());

    Ok((StatusCode::CREATED, Json(SubscribeResponse::default())))
}
