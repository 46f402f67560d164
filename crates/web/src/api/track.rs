use axum::{
    body::Bytes,
    extract::State,
    routing::{get, on, post},
    Json, Router,
};
use model::fix::TrackRequest;
use serde::Serialize;
use tracking::{database::Database, RequestError};

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/", post(track::<D>))
        .route("/schema", get(schema::<TrackRequest>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// The body is decoded by hand so that any malformed payload gets the same
/// answer, whatever the content type.
async fn track<D: Database>(
    State(WebState { tracking_client }): State<WebState<D>>,
    body: Bytes,
) -> RouteResult<Json<StatusResponse>> {
    // a `null` body decodes like an empty object
    let request = serde_json::from_slice::<Option<TrackRequest>>(&body)
        .map_err(|why| {
            log::debug!("rejecting track payload: {}", why);
            RouteErrorResponse::bad_request("invalid json")
        })?
        .unwrap_or_default();

    tracking_client
        .track(request)
        .await
        .map(|_| Json(StatusResponse { status: "ok" }))
        .map_err(|why| match why {
            RequestError::Validation(_) => {
                RouteErrorResponse::bad_request("device_id and timestamp are required")
            }
            other => other.into(),
        })
}
