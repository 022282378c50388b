//! Cleanup plans and their display (Functional Core - pure data).

/// Planned handling of the subscription referenced by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedSubscription {
    NoReference,
    NoTable {
        subscription_id: String,
    },
    Delete {
        table: String,
        subscription_id: String,
    },
}

/// Planned handling of the user's essays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedDependents {
    NoTable,
    Delete { table: String, keys: Vec<String> },
}

/// Everything a cleanup would delete, gathered without mutating the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupPlan {
    pub user_id: String,
    pub email: Option<String>,
    pub primary_table: String,
    pub subscription: PlannedSubscription,
    pub dependents: PlannedDependents,
}

impl CleanupPlan {
    /// Number of `delete_item` calls the plan amounts to.
    pub fn delete_count(&self) -> usize {
        let subscription = match self.subscription {
            PlannedSubscription::Delete { .. } => 1,
            _ => 0,
        };
        let dependents = match &self.dependents {
            PlannedDependents::Delete { keys, .. } => keys.len(),
            PlannedDependents::NoTable => 0,
        };
        1 + subscription + dependents
    }
}

/// Pure function: Format a cleanup plan for display.
pub fn format_plan(plan: &CleanupPlan) -> Vec<String> {
    let mut lines = vec![format!(
        "- Delete user: {} ({}) from {}",
        plan.user_id,
        plan.email.as_deref().unwrap_or("N/A"),
        plan.primary_table
    )];

    match &plan.subscription {
        PlannedSubscription::NoReference => {
            lines.push("= No subscription reference".to_string());
        }
        PlannedSubscription::NoTable { subscription_id } => {
            lines.push(format!(
                "= Subscription {} is referenced but no subscription table was found",
                subscription_id
            ));
        }
        PlannedSubscription::Delete {
            table,
            subscription_id,
        } => {
            lines.push(format!(
                "- Delete subscription: {} from {}",
                subscription_id, table
            ));
        }
    }

    match &plan.dependents {
        PlannedDependents::NoTable => {
            lines.push("= No essay table found".to_string());
        }
        PlannedDependents::Delete { table, keys } if keys.is_empty() => {
            lines.push(format!("= No essays found in {}", table));
        }
        PlannedDependents::Delete { table, keys } => {
            lines.push(format!("- Delete {} essay(s) from {}", keys.len(), table));
            for key in keys {
                lines.push(format!("    {}", key));
            }
        }
    }

    lines
}
