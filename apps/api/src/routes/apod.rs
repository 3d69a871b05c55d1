use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::entry::StoredEntry;
use crate::state::AppState;
use crate::validation::validate_request;

/// Query string shared by both endpoints. Missing parameters read as empty
/// so they are reported by validation; a repeated parameter keeps its first value.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApodQuery {
    pub api_key: String,
    pub date: String,
}

impl ApodQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut api_key = None;
        let mut date = None;
        for (name, value) in pairs {
            match name.as_str() {
                "api_key" => {
                    api_key.get_or_insert(value);
                }
                "date" => {
                    date.get_or_insert(value);
                }
                _ => {}
            }
        }

        Self {
            api_key: api_key.unwrap_or_default(),
            date: date.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /apod
pub async fn handle_fetch_picture(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<MessageResponse>, AppError> {
    let params = ApodQuery::from_pairs(pairs);
    let id = state.apod.fetch_and_save(&params.api_key, &params.date).await?;
    Ok(Json(MessageResponse {
        message: format!("picture has been downloaded, entry id {id}"),
    }))
}

/// GET /entries
pub async fn handle_list_entries(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<StoredEntry>>, AppError> {
    let params = ApodQuery::from_pairs(pairs);
    validate_request(&params.date, &params.api_key)?;
    let entries = state.apod.list_entries(&params.date).await?;
    Ok(Json(entries))
}
