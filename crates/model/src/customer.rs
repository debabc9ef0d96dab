use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::ValidationErrors;

pub const MAIL_MAX_LEN: usize = 254;
pub const NAME_MAX_LEN: usize = 100;

static MAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // domain: dot-separated labels, none empty, none starting or ending with a hyphen
    Regex::new(r"^[^@\s]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$").expect("mail pattern compiles")
});

/// A stored customer. `id` never changes after insertion; `version` grows by one per update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub mail: String,
    pub name: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a customer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub mail: String,
    pub name: Option<String>,
}

/// Partial update. `None` leaves the stored value alone.
/// `version` is the optimistic version token the caller last saw.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPatch {
    pub mail: Option<String>,
    pub name: Option<String>,
    pub version: Option<i32>,
}

fn check_mail(mail: &str, errs: &mut ValidationErrors) {
    let mail = mail.trim();
    if mail.is_empty() {
        errs.push("mail", "Email is required");
    } else if mail.chars().count() > MAIL_MAX_LEN {
        errs.push("mail", "Email must be at most 254 characters");
    } else if !MAIL_PATTERN.is_match(mail) {
        errs.push("mail", "Invalid email format");
    }
}

fn check_name(name: &str, errs: &mut ValidationErrors) {
    let name = name.trim();
    if name.is_empty() {
        errs.push("name", "Name must not be blank");
    } else if name.chars().count() > NAME_MAX_LEN {
        errs.push("name", "Name must be at most 100 characters");
    }
}

impl CustomerInput {
    pub fn new(mail: impl Into<String>) -> Self {
        Self { mail: mail.into(), name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        check_mail(&self.mail, &mut errs);
        if let Some(name) = &self.name {
            check_name(name, &mut errs);
        }
        errs.into_result()
    }

    /// Trim surrounding whitespace from every text field.
    pub fn normalize(self) -> Self {
        Self {
            mail: self.mail.trim().to_string(),
            name: self.name.map(|n| n.trim().to_string()),
        }
    }
}

impl CustomerPatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        if self.mail.is_none() && self.name.is_none() {
            errs.push("patch", "At least one of mail or name must be provided");
        }
        if let Some(mail) = &self.mail {
            check_mail(mail, &mut errs);
        }
        if let Some(name) = &self.name {
            check_name(name, &mut errs);
        }
        if matches!(self.version, Some(v) if v < 1) {
            errs.push("version", "Version must be at least 1");
        }
        errs.into_result()
    }

    pub fn normalize(self) -> Self {
        Self {
            mail: self.mail.map(|m| m.trim().to_string()),
            name: self.name.map(|n| n.trim().to_string()),
            version: self.version,
        }
    }
}
