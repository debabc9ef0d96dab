use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::dto::{CustomerDto, CustomerInputDto, CustomerPageDto, CustomerUpdateDto, ErrorDto, FieldErrorDto, MigrationDto};

/// Schema mirror of `common::types::Health`, which stays free of the OpenAPI dependency.
#[derive(ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Customers API", description = "CRUD over customer records with optimistic versioning"),
    paths(
        crate::routes::health,
        crate::routes::ready,
        crate::routes::customers::create_customer,
        crate::routes::customers::get_customer,
        crate::routes::customers::update_customer,
        crate::routes::customers::delete_customer,
        crate::routes::customers::list_customers,
        crate::routes::admin::list_migrations,
    ),
    components(
        schemas(
            HealthResponse,
            CustomerDto,
            CustomerInputDto,
            CustomerUpdateDto,
            CustomerPageDto,
            ErrorDto,
            FieldErrorDto,
            MigrationDto,
        )
    ),
    tags(
        (name = "customers"),
        (name = "health"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
