//! The cascading remover (Imperative Shell over a [`RecordStore`]).

use tracing::{info, warn};

use crate::storage::{Record, RecordSchema, RecordStore};
use crate::tables::{
    ambiguous_roles, classify_tables, TableConventions, TableOverrides, TableRole, TableSelection,
};

use super::error::{CleanupError, Result};
use super::planning::{CleanupPlan, PlannedDependents, PlannedSubscription};
use super::report::{DependentsOutcome, RemovalReport, SubscriptionOutcome};

/// Tables a cleanup runs against. Only the primary table is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTables {
    pub primary: String,
    pub subscription: Option<String>,
    pub dependent: Option<String>,
}

/// Deletes a user record together with its subscription and essays.
///
/// Runs every store call in sequence with no retries. Only the table listing,
/// the user lookup and the user delete can fail the run; problems with the
/// subscription or the essays are logged and recorded in the report.
pub struct CascadingRemover<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    schema: RecordSchema,
    conventions: TableConventions,
    overrides: TableOverrides,
}

impl<'a, S: RecordStore + ?Sized> CascadingRemover<'a, S> {
    /// Creates a remover with the default schema and naming conventions.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            schema: RecordSchema::default(),
            conventions: TableConventions::default(),
            overrides: TableOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: TableOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Finds the tables to work on. Fails when no primary table is found.
    pub async fn resolve_tables(&self) -> Result<ResolvedTables> {
        let names = if self.overrides.is_complete() {
            Vec::new()
        } else {
            info!("Finding tables");
            self.store.list_tables().await?
        };

        let candidates = classify_tables(&names, &self.conventions);
        for (role, names) in ambiguous_roles(&candidates, &self.overrides) {
            let position = if role.prefers_last() { "last" } else { "first" };
            warn!(
                %role,
                candidates = ?names,
                chosen = candidates.chosen(role).unwrap_or_default(),
                "Several tables match, using the {position}"
            );
        }

        let TableSelection {
            primary,
            subscription,
            dependent,
        } = TableSelection::select(&candidates, &self.overrides);

        let primary = primary.ok_or(CleanupError::TableNotFound {
            role: TableRole::Primary,
        })?;

        info!(
            user_table = %primary,
            subscription_table = subscription.as_deref().unwrap_or("none"),
            essay_table = dependent.as_deref().unwrap_or("none"),
            "Resolved tables"
        );

        Ok(ResolvedTables {
            primary,
            subscription,
            dependent,
        })
    }

    /// Gathers what [`remove`](Self::remove) would delete without deleting
    /// anything. Every store error is fatal here.
    pub async fn preview(&self, user_id: &str) -> Result<CleanupPlan> {
        ensure_user_id(user_id)?;
        let tables = self.resolve_tables().await?;
        let user = self.fetch_user(&tables.primary, user_id).await?;

        let subscription = match (self.subscription_id(&user), tables.subscription) {
            (None, _) => PlannedSubscription::NoReference,
            (Some(subscription_id), None) => PlannedSubscription::NoTable { subscription_id },
            (Some(subscription_id), Some(table)) => PlannedSubscription::Delete {
                table,
                subscription_id,
            },
        };

        let dependents = match tables.dependent {
            None => PlannedDependents::NoTable,
            Some(table) => {
                let keys = self
                    .store
                    .scan_keys(&table, &self.schema.owner_attribute, user_id)
                    .await?;
                PlannedDependents::Delete { table, keys }
            }
        };

        Ok(CleanupPlan {
            user_id: user_id.to_string(),
            email: self.email(&user),
            primary_table: tables.primary,
            subscription,
            dependents,
        })
    }

    /// Deletes the user, then its subscription, then its essays.
    ///
    /// `Ok` means the user record is gone. Check
    /// [`RemovalReport::warnings`] for the dependents that could not be
    /// removed.
    pub async fn remove(&self, user_id: &str) -> Result<RemovalReport> {
        ensure_user_id(user_id)?;
        let tables = self.resolve_tables().await?;
        let user = self.fetch_user(&tables.primary, user_id).await?;
        let subscription_id = self.subscription_id(&user);

        info!(user_id, table = %tables.primary, "Deleting user");
        self.store.delete_item(&tables.primary, user_id).await?;
        info!(user_id, "User deleted");

        let subscription = self
            .remove_subscription(tables.subscription.as_deref(), subscription_id)
            .await;
        let dependents = self
            .remove_dependents(tables.dependent.as_deref(), user_id)
            .await;

        let report = RemovalReport {
            user_id: user_id.to_string(),
            email: self.email(&user),
            primary_table: tables.primary,
            subscription,
            dependents,
        };
        info!(
            user_id,
            essays_deleted = report.dependents_deleted(),
            warnings = report.warnings().len(),
            "Cleanup finished"
        );
        Ok(report)
    }

    async fn fetch_user(&self, table: &str, user_id: &str) -> Result<Record> {
        info!(user_id, table, "Looking up user");
        let user = self
            .store
            .get_item(table, user_id)
            .await?
            .ok_or_else(|| CleanupError::UserNotFound {
                user_id: user_id.to_string(),
                table: table.to_string(),
            })?;

        info!(
            email = user.get(&self.schema.email_attribute).unwrap_or("N/A"),
            "Found user"
        );
        Ok(user)
    }

    async fn remove_subscription(
        &self,
        table: Option<&str>,
        subscription_id: Option<String>,
    ) -> SubscriptionOutcome {
        let Some(subscription_id) = subscription_id else {
            return SubscriptionOutcome::NoReference;
        };
        let Some(table) = table else {
            warn!(
                %subscription_id,
                "User references a subscription but no subscription table was found"
            );
            return SubscriptionOutcome::NoTable { subscription_id };
        };

        info!(%subscription_id, table, "Deleting subscription");
        match self.store.delete_item(table, &subscription_id).await {
            Ok(()) => {
                info!(%subscription_id, "Subscription deleted");
                SubscriptionOutcome::Deleted {
                    table: table.to_string(),
                    subscription_id,
                }
            }
            Err(error) => {
                warn!(
                    %subscription_id,
                    %error,
                    transient = error.is_transient(),
                    "Could not delete subscription"
                );
                SubscriptionOutcome::Failed {
                    table: table.to_string(),
                    subscription_id,
                    error,
                }
            }
        }
    }

    // Full table scan: the owner field has no index.
    async fn remove_dependents(&self, table: Option<&str>, user_id: &str) -> DependentsOutcome {
        let Some(table) = table else {
            return DependentsOutcome::NoTable;
        };

        info!(table, "Checking for essays by user");
        let keys = match self
            .store
            .scan_keys(table, &self.schema.owner_attribute, user_id)
            .await
        {
            Ok(keys) => keys,
            Err(error) => {
                warn!(
                    table,
                    %error,
                    transient = error.is_transient(),
                    "Could not scan for essays"
                );
                return DependentsOutcome::ScanFailed {
                    table: table.to_string(),
                    error,
                };
            }
        };

        if keys.is_empty() {
            info!("No essays found for this user");
        } else {
            info!(count = keys.len(), "Found essays by this user");
        }

        let mut deleted = Vec::with_capacity(keys.len());
        let mut failed = Vec::new();
        for key in keys {
            match self.store.delete_item(table, &key).await {
                Ok(()) => deleted.push(key),
                Err(error) => {
                    warn!(
                        essay_id = %key,
                        %error,
                        transient = error.is_transient(),
                        "Could not delete essay"
                    );
                    failed.push((key, error));
                }
            }
        }

        if !deleted.is_empty() {
            info!(count = deleted.len(), "Essays deleted");
        }

        DependentsOutcome::Swept {
            table: table.to_string(),
            deleted,
            failed,
        }
    }

    fn subscription_id(&self, user: &Record) -> Option<String> {
        user.get_non_empty(&self.schema.subscription_attribute)
            .map(str::to_string)
    }

    fn email(&self, user: &Record) -> Option<String> {
        user.get(&self.schema.email_attribute).map(str::to_string)
    }
}

fn ensure_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(CleanupError::EmptyUserId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::format_plan;
    use crate::storage::{InMemoryStore, StoreError};

    const USERS: &str = "User-abc123-NONE";
    const SUBSCRIPTIONS: &str = "UserSubscription-abc123-NONE";
    const ESSAYS: &str = "Essay-abc123-NONE";
    const RESULTS: &str = "Result-abc123-NONE";

    /// Store with all four Amplify tables and one user owning a subscription
    /// and three essays. Another user owns two essays.
    async fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        for table in [USERS, SUBSCRIPTIONS, ESSAYS, RESULTS] {
            store.create_table(table).await;
        }

        store
            .insert(
                USERS,
                Record::new()
                    .with("id", "user-1")
                    .with("email", "test@example.com")
                    .with("subscriptionId", "sub-1"),
            )
            .await
            .unwrap();
        store
            .insert(
                USERS,
                Record::new()
                    .with("id", "user-2")
                    .with("email", "other@example.com"),
            )
            .await
            .unwrap();
        store
            .insert(SUBSCRIPTIONS, Record::new().with("id", "sub-1"))
            .await
            .unwrap();

        for (id, owner) in [
            ("essay-1", "user-1"),
            ("essay-2", "user-2"),
            ("essay-3", "user-1"),
            ("essay-4", "user-2"),
            ("essay-5", "user-1"),
        ] {
            store
                .insert(ESSAYS, Record::new().with("id", id).with("userId", owner))
                .await
                .unwrap();
        }

        store
    }

    #[tokio::test]
    async fn test_remove_deletes_user() {
        let store = seeded_store().await;

        let report = CascadingRemover::new(&store).remove("user-1").await.unwrap();

        assert_eq!(report.user_id, "user-1");
        assert_eq!(report.email.as_deref(), Some("test@example.com"));
        assert_eq!(report.primary_table, USERS);
        assert_eq!(store.get_item(USERS, "user-1").await.unwrap(), None);
        assert!(store.contains(USERS, "user-2").await);
    }

    #[tokio::test]
    async fn test_remove_deletes_subscription() {
        let store = seeded_store().await;

        let report = CascadingRemover::new(&store).remove("user-1").await.unwrap();

        assert_eq!(
            report.subscription,
            SubscriptionOutcome::Deleted {
                table: SUBSCRIPTIONS.to_string(),
                subscription_id: "sub-1".to_string(),
            }
        );
        assert!(!store.contains(SUBSCRIPTIONS, "sub-1").await);
    }

    #[tokio::test]
    async fn test_subscription_failure_is_not_fatal() {
        let store = seeded_store().await;
        store.fail_deletes_in(SUBSCRIPTIONS).await;

        let report = CascadingRemover::new(&store).remove("user-1").await.unwrap();

        assert!(matches!(
            report.subscription,
            SubscriptionOutcome::Failed { .. }
        ));
        assert_eq!(report.warnings().len(), 1);
        assert!(!store.contains(USERS, "user-1").await);
        assert!(store.contains(SUBSCRIPTIONS, "sub-1").await);
        // Essays are still swept after the subscription failure.
        assert_eq!(report.dependents_deleted(), 3);
    }

    #[tokio::test]
    async fn test_missing_user_performs_no_deletes() {
        let store = seeded_store().await;

        let result = CascadingRemover::new(&store).remove("nobody").await;

        assert_eq!(
            result,
            Err(CleanupError::UserNotFound {
                user_id: "nobody".to_string(),
                table: USERS.to_string(),
            })
        );
        assert_eq!(store.mutation_calls(), 0);
        assert_eq!(store.len(ESSAYS).await, 5);
    }

    #[tokio::test]
    async fn test_remove_deletes_exactly_owned_essays() {
        let store = seeded_store().await;

        let report = CascadingRemover::new(&store).remove("user-1").await.unwrap();

        assert_eq!(
            report.dependents,
            DependentsOutcome::Swept {
                table: ESSAYS.to_string(),
                deleted: vec![
                    "essay-1".to_string(),
                    "essay-3".to_string(),
                    "essay-5".to_string()
                ],
                failed: vec![],
            }
        );
        assert_eq!(store.len(ESSAYS).await, 2);
        assert!(store.contains(ESSAYS, "essay-2").await);
        assert!(store.contains(ESSAYS, "essay-4").await);
        // user + subscription + three essays
        assert_eq!(store.mutation_calls(), 5);
    }

    #[tokio::test]
    async fn test_user_without_subscription_or_essays() {
        let store = seeded_store().await;
        store
            .insert(USERS, Record::new().with("id", "user-3").with("subscriptionId", ""))
            .await
            .unwrap();

        let report = CascadingRemover::new(&store).remove("user-3").await.unwrap();

        assert_eq!(report.subscription, SubscriptionOutcome::NoReference);
        assert_eq!(report.email, None);
        assert_eq!(report.dependents_deleted(), 0);
        assert!(report.warnings().is_empty());
        assert_eq!(store.mutation_calls(), 1);
    }

    #[tokio::test]
    async fn test_no_primary_table() {
        let store = InMemoryStore::new();
        store.create_table(ESSAYS).await;
        store.create_table(SUBSCRIPTIONS).await;

        let result = CascadingRemover::new(&store).remove("user-1").await;

        assert_eq!(
            result,
            Err(CleanupError::TableNotFound {
                role: TableRole::Primary
            })
        );
        assert_eq!(store.mutation_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_user_id_is_rejected() {
        let store = seeded_store().await;

        let result = CascadingRemover::new(&store).remove("   ").await;

        assert_eq!(result, Err(CleanupError::EmptyUserId));
        assert_eq!(store.mutation_calls(), 0);
    }

    #[tokio::test]
    async fn test_subscription_without_table() {
        let store = InMemoryStore::new();
        store.create_table(USERS).await;
        store
            .insert(
                USERS,
                Record::new().with("id", "user-1").with("subscriptionId", "sub-1"),
            )
            .await
            .unwrap();

        let report = CascadingRemover::new(&store).remove("user-1").await.unwrap();

        assert_eq!(
            report.subscription,
            SubscriptionOutcome::NoTable {
                subscription_id: "sub-1".to_string()
            }
        );
        assert_eq!(report.dependents, DependentsOutcome::NoTable);
        assert_eq!(report.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_scan_failure_is_not_fatal() {
        let store = seeded_store().await;
        store.fail_scans_in(ESSAYS).await;

        let report = CascadingRemover::new(&store).remove("user-1").await.unwrap();

        assert!(matches!(
            report.dependents,
            DependentsOutcome::ScanFailed { .. }
        ));
        assert!(!store.contains(USERS, "user-1").await);
        assert_eq!(store.len(ESSAYS).await, 5);
    }

    #[tokio::test]
    async fn test_essay_delete_failures_are_collected() {
        let store = seeded_store().await;
        store.fail_deletes_in(ESSAYS).await;

        let report = CascadingRemover::new(&store).remove("user-1").await.unwrap();

        match &report.dependents {
            DependentsOutcome::Swept {
                deleted, failed, ..
            } => {
                assert!(deleted.is_empty());
                assert_eq!(failed.len(), 3);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(report.warnings().len(), 3);
    }

    #[tokio::test]
    async fn test_primary_delete_failure_aborts() {
        let store = seeded_store().await;
        store.fail_deletes_in(USERS).await;

        let result = CascadingRemover::new(&store).remove("user-1").await;

        assert!(matches!(
            result,
            Err(CleanupError::Store(StoreError::Transient(_)))
        ));
        assert!(store.contains(SUBSCRIPTIONS, "sub-1").await);
        assert_eq!(store.len(ESSAYS).await, 5);
        assert_eq!(store.mutation_calls(), 1);
    }

    #[tokio::test]
    async fn test_overrides_skip_discovery() {
        let store = InMemoryStore::new();
        for table in ["people", "plans", "posts"] {
            store.create_table(table).await;
        }
        store
            .insert(
                "people",
                Record::new().with("id", "user-1").with("subscriptionId", "plan-1"),
            )
            .await
            .unwrap();
        store
            .insert("plans", Record::new().with("id", "plan-1"))
            .await
            .unwrap();
        store
            .insert("posts", Record::new().with("id", "post-1").with("userId", "user-1"))
            .await
            .unwrap();

        let overrides = TableOverrides {
            primary: Some("people".to_string()),
            subscription: Some("plans".to_string()),
            dependent: Some("posts".to_string()),
        };
        let report = CascadingRemover::new(&store)
            .with_overrides(overrides)
            .remove("user-1")
            .await
            .unwrap();

        assert!(report.warnings().is_empty());
        assert_eq!(report.dependents_deleted(), 1);
        assert_eq!(store.len("people").await, 0);
        assert_eq!(store.len("plans").await, 0);
        assert_eq!(store.len("posts").await, 0);
    }

    #[tokio::test]
    async fn test_table_matching_user_and_essay_is_swept() {
        let store = InMemoryStore::new();
        store.create_table("User-x").await;
        store.create_table("UserEssay-x").await;
        store
            .insert("User-x", Record::new().with("id", "u1"))
            .await
            .unwrap();
        store
            .insert("UserEssay-x", Record::new().with("id", "e1").with("userId", "u1"))
            .await
            .unwrap();

        let overrides = TableOverrides {
            primary: Some("User-x".to_string()),
            ..Default::default()
        };
        let report = CascadingRemover::new(&store)
            .with_overrides(overrides)
            .remove("u1")
            .await
            .unwrap();

        assert_eq!(
            report.dependents,
            DependentsOutcome::Swept {
                table: "UserEssay-x".to_string(),
                deleted: vec!["e1".to_string()],
                failed: vec![],
            }
        );
        assert_eq!(store.len("UserEssay-x").await, 0);
    }

    #[tokio::test]
    async fn test_last_user_table_wins() {
        let store = InMemoryStore::new();
        store.create_table("User-aaa-NONE").await;
        store.create_table("User-bbb-NONE").await;
        store
            .insert("User-bbb-NONE", Record::new().with("id", "user-1"))
            .await
            .unwrap();

        let report = CascadingRemover::new(&store).remove("user-1").await.unwrap();

        assert_eq!(report.primary_table, "User-bbb-NONE");
        assert_eq!(store.len("User-bbb-NONE").await, 0);
    }

    #[tokio::test]
    async fn test_first_essay_table_wins() {
        let store = seeded_store().await;
        store.create_table("UserEssayDraft-abc123-NONE").await;

        let tables = CascadingRemover::new(&store)
            .with_overrides(TableOverrides {
                primary: Some(USERS.to_string()),
                ..Default::default()
            })
            .resolve_tables()
            .await
            .unwrap();

        assert_eq!(tables.dependent.as_deref(), Some(ESSAYS));
    }

    #[tokio::test]
    async fn test_preview_does_not_mutate() {
        let store = seeded_store().await;

        let plan = CascadingRemover::new(&store)
            .preview("user-1")
            .await
            .unwrap();

        assert_eq!(store.mutation_calls(), 0);
        assert_eq!(plan.delete_count(), 5);
        assert_eq!(
            plan.subscription,
            PlannedSubscription::Delete {
                table: SUBSCRIPTIONS.to_string(),
                subscription_id: "sub-1".to_string(),
            }
        );

        let lines = format_plan(&plan);
        assert_eq!(
            lines[0],
            "- Delete user: user-1 (test@example.com) from User-abc123-NONE"
        );
        assert_eq!(lines[2], "- Delete 3 essay(s) from Essay-abc123-NONE");
    }

    #[tokio::test]
    async fn test_preview_missing_user() {
        let store = seeded_store().await;

        let result = CascadingRemover::new(&store).preview("nobody").await;

        assert!(matches!(result, Err(CleanupError::UserNotFound { .. })));
    }

    #[tokio::test]
    async fn test_preview_scan_failure_is_fatal() {
        let store = seeded_store().await;
        store.fail_scans_in(ESSAYS).await;

        let result = CascadingRemover::new(&store).preview("user-1").await;

        assert!(matches!(
            result,
            Err(CleanupError::Store(StoreError::Transient(_)))
        ));
    }
}
