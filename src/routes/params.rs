use axum::{
    Json,
    extract::{
        Query,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

/// `?id=<int>` as used by every lookup endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Numeric identifier of the resource.
    pub id: Option<String>,
}

impl IdQuery {
    pub fn parse(&self) -> AppResult<i32> {
        let raw = match self.id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(AppError::BadRequest("Parameter ID not found".into())),
        };
        raw.parse::<i32>()
            .map_err(|_| AppError::BadRequest("Parameter ID is not numeric".into()))
    }
}

/// Extracts the `id` query parameter, treating an unreadable query string as
/// a missing parameter.
pub fn id_param(query: Result<Query<IdQuery>, QueryRejection>) -> AppResult<i32> {
    match query {
        Ok(Query(query)) => query.parse(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected query string");
            Err(AppError::BadRequest("Parameter ID not found".into()))
        }
    }
}

/// Unwraps a JSON body, reporting any rejection with the shared message.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            Err(AppError::BadRequest("Error processing request".into()))
        }
    }
}
