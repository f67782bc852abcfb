use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBrandRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
}
