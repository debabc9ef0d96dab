use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::dto::{CustomerDto, CustomerInputDto, CustomerPageDto, CustomerUpdateDto, ListQuery};
use crate::errors::ApiError;
use crate::state::AppState;

fn body<T>(res: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    res.map(|Json(v)| v).map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn customer_id(res: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    res.map(|Path(id)| id).map_err(|_| ApiError::BadRequest("Customer id must be a UUID".into()))
}

#[utoipa::path(
    post, path = "/customers", tag = "customers",
    request_body = CustomerInputDto,
    responses(
        (status = 201, description = "Created", body = CustomerDto,
            headers(("location" = String, description = "Path of the new customer"))),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorDto),
        (status = 409, description = "Mail already taken", body = crate::dto::ErrorDto),
        (status = 503, description = "Storage unavailable", body = crate::dto::ErrorDto)
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    input: Result<Json<CustomerInputDto>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(input)?.into_model();
    let created = state.customers.create(input).await?;
    let location = format!("/customers/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(CustomerDto::from(created))))
}

#[utoipa::path(
    get, path = "/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Found", body = CustomerDto),
        (status = 400, description = "Malformed id", body = crate::dto::ErrorDto),
        (status = 404, description = "Not found", body = crate::dto::ErrorDto)
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CustomerDto>, ApiError> {
    let id = customer_id(id)?;
    Ok(Json(state.customers.get(id).await?.into()))
}

#[utoipa::path(
    put, path = "/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer id")),
    request_body = CustomerUpdateDto,
    responses(
        (status = 200, description = "Updated", body = CustomerDto),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorDto),
        (status = 404, description = "Not found", body = crate::dto::ErrorDto),
        (status = 409, description = "Stale version or mail already taken", body = crate::dto::ErrorDto)
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    patch: Result<Json<CustomerUpdateDto>, JsonRejection>,
) -> Result<Json<CustomerDto>, ApiError> {
    let id = customer_id(id)?;
    let patch = body(patch)?.into_model();
    Ok(Json(state.customers.update(id, patch).await?.into()))
}

#[utoipa::path(
    delete, path = "/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Malformed id", body = crate::dto::ErrorDto),
        (status = 404, description = "Not found", body = crate::dto::ErrorDto)
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = customer_id(id)?;
    state.customers.delete(id).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get, path = "/customers", tag = "customers",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of customers ordered by creation time", body = CustomerPageDto),
        (status = 400, description = "Malformed query", body = crate::dto::ErrorDto)
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<CustomerPageDto>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (filter, pagination) = query.into_parts();
    Ok(Json(state.customers.list(filter, pagination).await?.into()))
}
