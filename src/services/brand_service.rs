use validator::Validate;

use crate::{
    dto::brands::CreateBrandRequest,
    error::{AppError, AppResult},
    models::Brand,
    response::ApiResponse,
    services::within_deadline,
    state::AppState,
};

pub async fn create_brand(
    state: &AppState,
    payload: CreateBrandRequest,
) -> AppResult<ApiResponse<Brand>> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Invalid json structure".into()))?;

    let brand = within_deadline(state, async {
        Ok::<_, AppError>(state.catalog.create_brand(payload.name).await?)
    })
    .await?;
    tracing::debug!(brand_id = brand.id, "brand created");

    Ok(ApiResponse::success("brand created successfully", brand))
}

pub async fn get_brand(state: &AppState, id: i32) -> AppResult<ApiResponse<Brand>> {
    let brand = within_deadline(state, async {
        state
            .catalog
            .get_brand(id)
            .await?
            .ok_or(AppError::NotFound("Error fetching the brand"))
    })
    .await?;

    Ok(ApiResponse::success("Success", brand))
}
