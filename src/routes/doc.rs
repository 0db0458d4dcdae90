use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{items::ItemRequest, orders::OrderRequest},
    models::{Item, Order},
    routes::{health, items, orders, params},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        orders::cancel_order,
        orders::deliver_order,
        items::list_items,
        items::create_item,
        items::get_item,
        items::update_item,
        items::delete_item,
    ),
    components(
        schemas(
            Order,
            Item,
            OrderRequest,
            ItemRequest,
            params::OrderListQuery,
            params::ItemListQuery,
            health::HealthData,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Items", description = "Order line item endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
