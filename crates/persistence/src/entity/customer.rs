use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{entity::prelude::*, Set};

use model::{Customer, CustomerInput};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub mail: String,
    pub name: Option<String>,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Row -> domain value.
pub fn to_domain(row: Model) -> Customer {
    Customer {
        id: row.id,
        mail: row.mail,
        name: row.name,
        version: row.version,
        created_at: row.created_at.with_timezone(&Utc),
        updated_at: row.updated_at.with_timezone(&Utc),
    }
}

/// Domain input -> row ready for insertion, starting at version 1.
pub fn new_active_model(id: Uuid, input: CustomerInput, now: DateTime<Utc>) -> ActiveModel {
    let now = to_storage_time(now);
    ActiveModel {
        id: Set(id),
        mail: Set(input.mail),
        name: Set(input.name),
        version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub fn to_storage_time(t: DateTime<Utc>) -> DateTime<FixedOffset> {
    t.fixed_offset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn new_row_starts_at_version_one() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let am = new_active_model(id, CustomerInput::new("a@example.com"), now);
        assert_eq!(am.version, ActiveValue::Set(1));
        assert_eq!(am.id, ActiveValue::Set(id));
        assert_eq!(am.created_at, am.updated_at);
    }

    #[test]
    fn row_maps_to_utc_domain_value() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = Utc::now().with_timezone(&offset);
        let row = Model { id: Uuid::new_v4(), mail: "a@example.com".into(), name: Some("Ann".into()), version: 3, created_at: at, updated_at: at };
        let c = to_domain(row.clone());
        assert_eq!(c.id, row.id);
        assert_eq!(c.version, 3);
        assert_eq!(c.created_at, at.with_timezone(&Utc));
        assert_eq!(c.name.as_deref(), Some("Ann"));
    }
}
