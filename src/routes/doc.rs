use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        brands::CreateBrandRequest,
        orders::{CreateOrderRequest, OrderLineRequest, OrderWithDetail},
        products::{CreateProductRequest, ProductList},
    },
    models::{Brand, Order, OrderLine, Product, User},
    response::{ApiResponse, ErrorBody},
    routes::{brands, health, orders, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        brands::create_brand,
        brands::get_brand,
        products::create_product,
        products::get_product,
        products::products_by_brand,
        orders::create_order,
        orders::get_order
    ),
    components(
        schemas(
            User,
            Brand,
            Product,
            Order,
            OrderLine,
            ErrorBody,
            CreateBrandRequest,
            CreateProductRequest,
            CreateOrderRequest,
            OrderLineRequest,
            OrderWithDetail,
            ProductList,
            ApiResponse<Brand>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithDetail>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Brands", description = "Brand endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
