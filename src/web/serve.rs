use std::{future::Future, time::Duration};

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::{info, Span};

use crate::{App, AppState, Result};

use super::{midware, routes::routes, REQUEST_ID_HEADER};

/// The core async function that serves this application until a shutdown signal arrives.
///
/// Sets up the router with the request id, tracing, error mapping and CORS layers.
pub async fn serve(app: App) -> Result<()> {
    serve_with_shutdown(app, shutdown_signal()).await
}

/// Same as `serve`, but stops once `signal` resolves.
/// In-flight requests are allowed to finish, then the database pool gets closed.
pub async fn serve_with_shutdown<F>(app: App, signal: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let App {
        app_state,
        listener,
        cors,
    } = app;

    let router = build_router(app_state.clone(), cors);

    axum::serve(listener, router)
        .with_graceful_shutdown(signal)
        .await?;

    app_state.database_mgr.close().await;
    info!("{:<20} - Server stopped", "serve");

    Ok(())
}

/// The application `Router` with all the middleware applied.
pub fn build_router(app_state: AppState, cors: CorsLayer) -> Router {
    let x_request_id: HeaderName = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace_layer = build_trace_layer();

    Router::new()
        .merge(routes(app_state))
        .layer(
            ServiceBuilder::new()
                // Set UUID per request
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(trace_layer)
                // This has to be in front of the Propagation layer because while the request goes through
                // middleware as listed in the ServiceBuilder, the response goes through the middleware stack from the bottom up.
                // If we want the response mapper to find the Propagated header that middleware has to run first!
                .layer(middleware::map_response(midware::response_mapper))
                // Propagate UUID to response, keep it last so it processes the response first!
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // Added last so it runs first and the mapped error responses carry the CORS headers too.
        .layer(cors)
}

/// Only the listed origins may make credentialed requests.
/// Methods are limited to GET, POST, OPTIONS and PUT; any request header is allowed.
pub fn build_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS, Method::PUT])
        // A wildcard isn't allowed together with credentials, mirroring is.
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// A helper function that sets up the `tower_http::TraceLayer` - tracing configuration.
fn build_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl MakeSpan<Body> + Clone,
    impl OnRequest<Body> + Clone,
    impl OnResponse<Body> + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            let uuid = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .map(|uuid| uuid.to_str().unwrap_or("").to_string());

            tracing::error_span!(
                "serve",
                id = uuid,
                method = req.method().to_string(),
                path = req.uri().path()
            )
        })
        .on_request(|req: &Request<Body>, _s: &Span| tracing::info!("START @ {}", req.uri()))
        .on_response(|res: &Response<Body>, latency: Duration, _s: &Span| {
            let st_code = res.status().as_u16();

            if (500..=599).contains(&st_code) {
                tracing::error!("END in: {:?} - STATUS: {st_code}", latency)
            } else if (400..=499).contains(&st_code) {
                tracing::warn!("END in: {:?} - STATUS: {st_code}", latency)
            } else {
                tracing::info!("END in: {:?} - STATUS: {st_code}", latency)
            }
        })
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(er) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install the Ctrl-C handler: {er}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(er) => {
                tracing::error!("failed to install the SIGTERM handler: {er}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("{:<20} - Shutdown signal received", "shutdown_signal");
}
