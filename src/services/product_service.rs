use validator::Validate;

use crate::{
    dto::products::{CreateProductRequest, ProductList},
    error::{AppError, AppResult},
    models::{NewProduct, Product},
    response::ApiResponse,
    services::within_deadline,
    state::AppState,
};

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Invalid json structure".into()))?;

    let product = within_deadline(state, async {
        state
            .catalog
            .get_brand(payload.brand_id)
            .await?
            .ok_or(AppError::BrandNotFound)?;

        let product = state
            .catalog
            .create_product(NewProduct {
                brand_id: payload.brand_id,
                name: payload.name,
                qty: payload.qty,
                price: payload.price,
            })
            .await?;
        Ok::<_, AppError>(product)
    })
    .await?;
    tracing::debug!(product_id = product.id, brand_id = product.brand_id, "product created");

    Ok(ApiResponse::success("product created successfully", product))
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<ApiResponse<Product>> {
    let product = within_deadline(state, async {
        state
            .catalog
            .get_product(id)
            .await?
            .ok_or(AppError::NotFound("Error fetching the product"))
    })
    .await?;

    Ok(ApiResponse::success("Success", product))
}

pub async fn products_by_brand(
    state: &AppState,
    brand_id: i32,
) -> AppResult<ApiResponse<ProductList>> {
    let items = within_deadline(state, async {
        state
            .catalog
            .get_brand(brand_id)
            .await?
            .ok_or(AppError::BrandNotFound)?;
        Ok::<_, AppError>(state.catalog.products_by_brand(brand_id).await?)
    })
    .await?;

    Ok(ApiResponse::success("Success", ProductList { items }))
}
