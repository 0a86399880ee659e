use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(api::health::health_check, api::playground::say_hello),
    tags(
        (name = "storefront", description = "Storefront API")
    )
)]
pub struct ApiDoc;
