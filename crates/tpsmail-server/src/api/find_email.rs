use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Deserializer};
use tpsmail_core::Query;
use tpsmail_scraper::LookupOutcome;

use super::{map_lookup_error, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Default, Deserialize)]
pub struct FindEmailRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub state: Option<String>,
}

/// Non-string values are treated as absent so one bad field does not void the
/// whole body.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(value)) => Ok(Some(value)),
        _ => Ok(None),
    }
}

impl FindEmailRequest {
    fn to_query(&self) -> Query {
        Query::new(
            self.name.as_deref().unwrap_or_default(),
            self.city.as_deref(),
            self.state.as_deref(),
        )
    }
}

/// `POST /find_email`
///
/// A body that is not a JSON object is handled like an empty one and rejected
/// for the missing name. Fields of the wrong type are ignored individually.
pub(super) async fn find_email(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<FindEmailRequest>, JsonRejection>,
) -> Result<Json<LookupOutcome>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(request_id = %req_id.0, error = %rejection, "unusable request body");
            FindEmailRequest::default()
        }
    };

    let query = request.to_query();
    state
        .lookup
        .lookup(&query)
        .await
        .map(Json)
        .map_err(|e| map_lookup_error(&req_id.0, &e))
}
