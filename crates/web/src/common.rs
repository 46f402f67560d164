use axum::{
    extract::{OriginalUri, Query, Request},
    http::StatusCode,
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use model::ExampleData;
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};
use tracking::{RequestError, ValidationError};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn schema_no_example<T: JsonSchema + Serialize>() -> impl IntoResponse {
    Json(schema_for!(T))
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    log::debug!("no route for {} {}", req.method(), original_uri.path());
    RouteErrorResponse::new(StatusCode::NOT_FOUND, "not found")
}

// - Commonly used responses -

/// The only error body clients ever see: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    pub error: String,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status_code,
            error: error.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<ValidationError> for RouteErrorResponse {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::MissingParameter(field) => {
                Self::bad_request(format!("{} is required", field))
            }
            ValidationError::InvalidParameter("days") => {
                Self::bad_request("days must be a positive integer")
            }
            ValidationError::InvalidParameter("date") => {
                Self::bad_request("date format must be YYYY-MM-DD")
            }
            ValidationError::InvalidParameter(field) => {
                Self::bad_request(format!("{} is invalid", field))
            }
        }
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Validation(why) => why.into(),
            RequestError::InsertFailed(_) => Self::internal("insert failed"),
            RequestError::QueryFailed(_) => Self::internal("query failed"),
            RequestError::Composition(_) => Self::internal("build geojson failed"),
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}
