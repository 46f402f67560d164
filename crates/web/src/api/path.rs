use axum::{
    extract::{Query, State},
    routing::{get, on},
    Json, Router,
};
use chrono::Utc;
use model::{feature::FeatureCollection, query::PathQuery};
use tracking::database::Database;

use crate::{
    common::{
        route_not_found, schema_no_example, RouteErrorResponse, RouteResult,
        METHOD_FILTER_ALL,
    },
    WebState,
};

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/", get(get_path::<D>))
        .route("/schema", get(schema_no_example::<FeatureCollection>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_path<D: Database>(
    State(WebState { tracking_client }): State<WebState<D>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> RouteResult<Json<FeatureCollection>> {
    let query = pairs.into_iter().collect::<PathQuery>();

    // captured once, every relative window of this request is based on it
    let now = Utc::now();

    tracking_client
        .path(&query, now)
        .await
        .map(Json)
        .map_err(RouteErrorResponse::from)
}
