//! Wire shapes. Kept apart from `model` so the HTTP contract can evolve on its own;
//! the OpenAPI document is derived from these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use model::{Customer, CustomerInput, CustomerPatch, FieldViolation};
use persistence::{CustomerFilter, LedgerEntry, Page, Pagination};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerDto {
    pub id: Uuid,
    #[schema(example = "alice@gmail.com")]
    pub mail: String,
    pub name: Option<String>,
    /// Optimistic version token; send it back on update to reject stale writes.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self { id: c.id, mail: c.mail, name: c.name, version: c.version, created_at: c.created_at, updated_at: c.updated_at }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CustomerInputDto {
    // missing fields surface as validation errors rather than parse errors
    #[serde(default)]
    #[schema(example = "alice@gmail.com")]
    pub mail: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl CustomerInputDto {
    pub fn into_model(self) -> CustomerInput {
        CustomerInput { mail: self.mail, name: self.name }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CustomerUpdateDto {
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<i32>,
}

impl CustomerUpdateDto {
    pub fn into_model(self) -> CustomerPatch {
        CustomerPatch { mail: self.mail, name: self.name, version: self.version }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerPageDto {
    pub items: Vec<CustomerDto>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl From<Page<Customer>> for CustomerPageDto {
    fn from(p: Page<Customer>) -> Self {
        let p = p.map(CustomerDto::from);
        Self { items: p.items, page: p.page, per_page: p.per_page, total_items: p.total_items, total_pages: p.total_pages }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Substring of the mail address
    pub mail: Option<String>,
    /// 1-based page index
    pub page: Option<u32>,
    /// Items per page, 1..=100
    pub per_page: Option<u32>,
}

impl ListQuery {
    pub fn into_parts(self) -> (CustomerFilter, Pagination) {
        let defaults = Pagination::default();
        (
            CustomerFilter { mail_contains: self.mail },
            Pagination { page: self.page.unwrap_or(defaults.page), per_page: self.per_page.unwrap_or(defaults.per_page) },
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorDto {
    pub field: String,
    pub message: String,
}

impl From<FieldViolation> for FieldErrorDto {
    fn from(v: FieldViolation) -> Self { Self { field: v.field, message: v.message } }
}

/// Body of every non-2xx response.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub description: String,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldErrorDto>,
    /// Present on server-side failures; quote it when reporting the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MigrationDto {
    pub step_id: String,
    pub applied_at: DateTime<Utc>,
}

impl From<LedgerEntry> for MigrationDto {
    fn from(e: LedgerEntry) -> Self { Self { step_id: e.step_id, applied_at: e.applied_at } }
}
