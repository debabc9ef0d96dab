use std::future::Future;
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, warn};
use uuid::Uuid;

use model::{Customer, CustomerInput, CustomerPatch};

use crate::customer::repository::{CustomerFilter, CustomerRepository};
use crate::entity::customer::{self, Column, Entity as CustomerEntity};
use crate::errors::PersistenceError;
use crate::pagination::{Page, Pagination};

const LIKE_ESCAPE: char = '!';

/// `LIKE` pattern matching `fragment` anywhere; `%`, `_` and the escape character match literally.
fn like_contains(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmCustomerRepository {
    db: DatabaseConnection,
    query_timeout: Duration,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }

    /// Run one storage call under the configured deadline.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, PersistenceError>
    where
        F: Future<Output = Result<T, PersistenceError>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(res) => res,
            Err(_) => {
                warn!(op, timeout_ms = self.query_timeout.as_millis() as u64, "storage call timed out");
                Err(PersistenceError::StorageUnavailable(format!("{op} timed out")))
            }
        }
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn create(&self, input: CustomerInput) -> Result<Customer, PersistenceError> {
        self.bounded("create", async move {
            // Postgres keeps microseconds; truncate so the returned value equals what is stored.
            let now = Utc::now().trunc_subsecs(6);
            let row = customer::new_active_model(Uuid::new_v4(), input, now)
                .insert(&self.db)
                .await?;
            debug!(id = %row.id, "customer row inserted");
            Ok(customer::to_domain(row))
        })
        .await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Customer, PersistenceError> {
        self.bounded("get_by_id", async move {
            CustomerEntity::find_by_id(id)
                .one(&self.db)
                .await?
                .map(customer::to_domain)
                .ok_or(PersistenceError::NotFound(id))
        })
        .await
    }

    async fn update(&self, id: Uuid, patch: CustomerPatch) -> Result<Customer, PersistenceError> {
        self.bounded("update", async move {
            let now = customer::to_storage_time(Utc::now().trunc_subsecs(6));
            let txn = self.db.begin().await?;

            let mut stmt = CustomerEntity::update_many()
                .col_expr(Column::Version, Expr::col(Column::Version).add(1))
                .col_expr(Column::UpdatedAt, Expr::value(now))
                .filter(Column::Id.eq(id));
            if let Some(mail) = patch.mail {
                stmt = stmt.col_expr(Column::Mail, Expr::value(mail));
            }
            if let Some(name) = patch.name {
                stmt = stmt.col_expr(Column::Name, Expr::value(name));
            }
            if let Some(expected) = patch.version {
                stmt = stmt.filter(Column::Version.eq(expected));
            }
            let res = stmt.exec(&txn).await?;

            if res.rows_affected == 0 {
                let current = CustomerEntity::find_by_id(id).one(&txn).await?;
                txn.rollback().await?;
                return Err(match (current, patch.version) {
                    (Some(row), Some(expected)) => {
                        PersistenceError::Conflict { id, expected, actual: row.version }
                    }
                    _ => PersistenceError::NotFound(id),
                });
            }

            let row = CustomerEntity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or(PersistenceError::NotFound(id))?;
            txn.commit().await?;
            debug!(id = %id, version = row.version, "customer row updated");
            Ok(customer::to_domain(row))
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), PersistenceError> {
        self.bounded("delete", async move {
            let res = CustomerEntity::delete_by_id(id).exec(&self.db).await?;
            if res.rows_affected == 0 {
                return Err(PersistenceError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn list(&self, filter: CustomerFilter, pagination: Pagination) -> Result<Page<Customer>, PersistenceError> {
        self.bounded("list", async move {
            let (page_idx, per_page) = pagination.normalize();

            let mut finder = CustomerEntity::find();
            if let Some(fragment) = filter.mail_contains.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                // lower() on both sides: Postgres LIKE is case-sensitive, SQLite's is not
                let pattern = LikeExpr::new(like_contains(&fragment.to_lowercase())).escape(LIKE_ESCAPE);
                finder = finder.filter(Expr::expr(Func::lower(Expr::col(Column::Mail))).like(pattern));
            }

            // Count and page must come from one snapshot. Postgres only guarantees that from
            // REPEATABLE READ up; a SQLite transaction is always a single snapshot.
            let isolation = match self.db.get_database_backend() {
                DbBackend::Postgres => Some(IsolationLevel::RepeatableRead),
                _ => None,
            };
            let txn = self.db.begin_with_config(isolation, None).await?;
            let paginator = finder
                .order_by_asc(Column::CreatedAt)
                .order_by_asc(Column::Id)
                .paginate(&txn, per_page);
            let totals = paginator.num_items_and_pages().await?;
            let rows = paginator.fetch_page(page_idx).await?;
            txn.commit().await?;

            Ok(Page {
                items: rows.into_iter().map(customer::to_domain).collect(),
                page: (page_idx + 1) as u32,
                per_page: per_page as u32,
                total_items: totals.number_of_items,
                total_pages: totals.number_of_pages,
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::test_support::get_repo;

    fn input(mail: &str) -> CustomerInput {
        CustomerInput::new(mail)
    }

    #[tokio::test]
    async fn create_then_get_round_trips() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        for mail in ["alice@gmail.com", "bob@gmail.com"] {
            let created = repo.create(input(mail).with_name("Someone")).await?;
            assert_eq!(created.mail, mail);
            assert_eq!(created.version, 1);
            let found = repo.get_by_id(created.id).await?;
            assert_eq!(found, created);
        }
        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        let id = Uuid::new_v4();
        let err = repo.get_by_id(id).await.unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(x) if x == id));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_mail_is_rejected() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        repo.create(input("dup@example.com")).await?;
        let err = repo.create(input("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, PersistenceError::DuplicateKey(_)), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_and_second_delete_is_not_found() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        let c = repo.create(input("gone@example.com")).await?;
        repo.delete(c.id).await?;
        assert!(matches!(repo.get_by_id(c.id).await, Err(PersistenceError::NotFound(_))));
        assert!(matches!(repo.delete(c.id).await, Err(PersistenceError::NotFound(_))));
        assert!(matches!(repo.delete(Uuid::new_v4()).await, Err(PersistenceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_bumps_version_and_keeps_identity() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        let c = repo.create(input("old@example.com")).await?;
        let patch = CustomerPatch { mail: Some("new@example.com".into()), name: Some("New".into()), version: Some(1) };
        let updated = repo.update(c.id, patch).await?;
        assert_eq!(updated.id, c.id);
        assert_eq!(updated.mail, "new@example.com");
        assert_eq!(updated.name.as_deref(), Some("New"));
        assert_eq!(updated.version, 2);
        assert_eq!(updated.created_at, c.created_at);
        assert!(updated.updated_at >= c.updated_at);

        // without a token the write is unconditional
        let again = repo.update(c.id, CustomerPatch { name: Some("Newer".into()), ..Default::default() }).await?;
        assert_eq!(again.version, 3);
        Ok(())
    }

    #[tokio::test]
    async fn stale_version_is_conflict() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        let c = repo.create(input("stale@example.com")).await?;
        repo.update(c.id, CustomerPatch { name: Some("A".into()), version: Some(1), ..Default::default() }).await?;
        let err = repo
            .update(c.id, CustomerPatch { name: Some("B".into()), version: Some(1), ..Default::default() })
            .await
            .unwrap_err();
        match err {
            PersistenceError::Conflict { id, expected, actual } => {
                assert_eq!(id, c.id);
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        // the rejected write left nothing behind
        assert_eq!(repo.get_by_id(c.id).await?.name.as_deref(), Some("A"));
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_even_with_version() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        let err = repo
            .update(Uuid::new_v4(), CustomerPatch { name: Some("X".into()), version: Some(1), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn update_to_taken_mail_is_duplicate() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        repo.create(input("first@example.com")).await?;
        let second = repo.create(input("second@example.com")).await?;
        let err = repo
            .update(second.id, CustomerPatch { mail: Some("first@example.com".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::DuplicateKey(_)), "{err:?}");
        assert_eq!(repo.get_by_id(second.id).await?.version, 1);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_updates_with_same_token_one_wins() -> Result<(), anyhow::Error> {
        let repo = Arc::new(get_repo().await?);
        let c = repo.create(input("race@example.com")).await?;

        let patch = |name: &str| CustomerPatch { name: Some(name.into()), version: Some(c.version), ..Default::default() };
        let (a, b) = tokio::join!(
            { let r = Arc::clone(&repo); let p = patch("left"); async move { r.update(c.id, p).await } },
            { let r = Arc::clone(&repo); let p = patch("right"); async move { r.update(c.id, p).await } },
        );

        let results = [a, b];
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(PersistenceError::Conflict { .. })))
            .count();
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 1);
        assert_eq!(repo.get_by_id(c.id).await?.version, 2);
        Ok(())
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_exhaustive() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        let mut expected = HashSet::new();
        for i in 0..7 {
            expected.insert(repo.create(input(&format!("page{i}@example.com"))).await?.id);
        }

        let mut seen = Vec::new();
        let mut page = 1;
        loop {
            let p = repo.list(CustomerFilter::default(), Pagination { page, per_page: 3 }).await?;
            assert_eq!(p.total_items, 7);
            assert_eq!(p.total_pages, 3);
            if p.items.is_empty() { break; }
            seen.extend(p.items.into_iter().map(|c| c.id));
            page += 1;
        }
        assert_eq!(page, 4);
        assert_eq!(seen.len(), 7);
        assert_eq!(seen.into_iter().collect::<HashSet<_>>(), expected);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_by_mail_fragment() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        repo.create(input("ann@corp.example.com")).await?;
        repo.create(input("ben@corp.example.com")).await?;
        repo.create(input("cat@home.example.com")).await?;

        let filter = CustomerFilter { mail_contains: Some("corp".into()) };
        let p = repo.list(filter, Pagination::default()).await?;
        assert_eq!(p.total_items, 2);
        assert!(p.items.iter().all(|c| c.mail.contains("corp")));

        let blank = CustomerFilter { mail_contains: Some("  ".into()) };
        assert_eq!(repo.list(blank, Pagination::default()).await?.total_items, 3);
        Ok(())
    }

    #[tokio::test]
    async fn list_filter_is_literal_and_ignores_case() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        repo.create(input("ann@corp.example.com")).await?;
        repo.create(input("Ben@home.example.com")).await?;
        repo.create(input("under_score@corp.example.com")).await?;

        let count = |fragment: &str| {
            let filter = CustomerFilter { mail_contains: Some(fragment.into()) };
            let repo = &repo;
            async move { repo.list(filter, Pagination::default()).await.map(|p| p.total_items) }
        };
        assert_eq!(count("_").await?, 1);
        assert_eq!(count("%").await?, 0);
        assert_eq!(count("!").await?, 0);
        assert_eq!(count("BEN").await?, 1);
        assert_eq!(count("ben@HOME").await?, 1);
        assert_eq!(count("Corp.").await?, 2);
        Ok(())
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_contains("a_b%c!d"), "%a!_b!%c!!d%");
        assert_eq!(like_contains("plain"), "%plain%");
    }

    #[tokio::test]
    async fn list_out_of_range_page_is_empty() -> Result<(), anyhow::Error> {
        let repo = get_repo().await?;
        repo.create(input("only@example.com")).await?;
        let p = repo.list(CustomerFilter::default(), Pagination { page: 9, per_page: 10 }).await?;
        assert!(p.items.is_empty());
        assert_eq!(p.page, 9);
        assert_eq!(p.total_items, 1);
        Ok(())
    }
}
