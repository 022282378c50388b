use crate::storage::StoreError;

/// What happened to the subscription referenced by the user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    /// The user record had no subscription reference.
    NoReference,
    /// A reference existed but no subscription table was found.
    NoTable { subscription_id: String },
    Deleted {
        table: String,
        subscription_id: String,
    },
    Failed {
        table: String,
        subscription_id: String,
        error: StoreError,
    },
}

/// What happened to the records owned by the user in the dependent table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependentsOutcome {
    NoTable,
    /// The scan ran; every matching key is either deleted or failed.
    Swept {
        table: String,
        deleted: Vec<String>,
        failed: Vec<(String, StoreError)>,
    },
    ScanFailed { table: String, error: StoreError },
}

/// Result of a successful cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    pub user_id: String,
    pub email: Option<String>,
    pub primary_table: String,
    pub subscription: SubscriptionOutcome,
    pub dependents: DependentsOutcome,
}

impl RemovalReport {
    /// Number of dependent records deleted.
    pub fn dependents_deleted(&self) -> usize {
        match &self.dependents {
            DependentsOutcome::Swept { deleted, .. } => deleted.len(),
            _ => 0,
        }
    }

    /// Non-fatal problems met along the way.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match &self.subscription {
            SubscriptionOutcome::NoTable { subscription_id } => warnings.push(format!(
                "Subscription {subscription_id} was not deleted: no subscription table found"
            )),
            SubscriptionOutcome::Failed {
                subscription_id,
                error,
                ..
            } => warnings.push(format!(
                "Could not delete subscription {subscription_id}: {error}"
            )),
            _ => {}
        }

        match &self.dependents {
            DependentsOutcome::Swept { failed, .. } => {
                for (key, error) in failed {
                    warnings.push(format!("Could not delete essay {key}: {error}"));
                }
            }
            DependentsOutcome::ScanFailed { table, error } => {
                warnings.push(format!("Could not scan {table} for essays: {error}"))
            }
            DependentsOutcome::NoTable => {}
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(subscription: SubscriptionOutcome, dependents: DependentsOutcome) -> RemovalReport {
        RemovalReport {
            user_id: "user-1".to_string(),
            email: Some("test@example.com".to_string()),
            primary_table: "User-abc-NONE".to_string(),
            subscription,
            dependents,
        }
    }

    #[test]
    fn test_clean_report_has_no_warnings() {
        let report = report(
            SubscriptionOutcome::Deleted {
                table: "UserSubscription-abc-NONE".to_string(),
                subscription_id: "sub-1".to_string(),
            },
            DependentsOutcome::Swept {
                table: "Essay-abc-NONE".to_string(),
                deleted: vec!["e1".to_string(), "e2".to_string()],
                failed: vec![],
            },
        );

        assert!(report.warnings().is_empty());
        assert_eq!(report.dependents_deleted(), 2);
    }

    #[test]
    fn test_failures_become_warnings() {
        let report = report(
            SubscriptionOutcome::Failed {
                table: "UserSubscription-abc-NONE".to_string(),
                subscription_id: "sub-1".to_string(),
                error: StoreError::Transient("throttled".to_string()),
            },
            DependentsOutcome::Swept {
                table: "Essay-abc-NONE".to_string(),
                deleted: vec!["e1".to_string()],
                failed: vec![(
                    "e2".to_string(),
                    StoreError::Transient("throttled".to_string()),
                )],
            },
        );

        assert_eq!(
            report.warnings(),
            vec![
                "Could not delete subscription sub-1: Transient store error: throttled",
                "Could not delete essay e2: Transient store error: throttled",
            ]
        );
        assert_eq!(report.dependents_deleted(), 1);
    }

    #[test]
    fn test_scan_failure_warning() {
        let report = report(
            SubscriptionOutcome::NoTable {
                subscription_id: "sub-1".to_string(),
            },
            DependentsOutcome::ScanFailed {
                table: "Essay-abc-NONE".to_string(),
                error: StoreError::Unexpected("AccessDenied".to_string()),
            },
        );

        let warnings = report.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("no subscription table found"));
        assert!(warnings[1].starts_with("Could not scan Essay-abc-NONE"));
        assert_eq!(report.dependents_deleted(), 0);
    }
}
