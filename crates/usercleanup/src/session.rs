//! Interactive cleanup session: ask, confirm, remove, report.

use usercleanup_core::cleanup::{
    format_plan, CascadingRemover, CleanupError, CleanupPlan, DependentsOutcome, RemovalReport,
    SubscriptionOutcome,
};
use usercleanup_core::storage::RecordStore;
use usercleanup_core::tables::TableOverrides;

use crate::error::Result;
use crate::prelude::*;
use crate::prompt::{is_confirmed, Prompter};

const USER_ID_PROMPT: &str = "Enter user ID to delete (e.g., 71d35daa-d0c1-7001-6b17-c0b2e8c68f1a)";

/// What the user asked for on the command line.
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    pub user_id: Option<String>,
    pub dry_run: bool,
    pub overrides: TableOverrides,
    pub silent: bool,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// No id was given or typed.
    NoUserId,
    /// The confirmation was anything but `yes`.
    Cancelled,
    Previewed(CleanupPlan),
    Completed(RemovalReport),
    Failed(CleanupError),
}

impl SessionOutcome {
    /// Whether the process should exit with a failure status.
    pub fn is_failure(&self) -> bool {
        matches!(self, SessionOutcome::Failed(_))
    }
}

/// Runs one cleanup session against `store`.
///
/// Nothing is deleted unless the confirmation answer is `yes`. Dry runs never
/// ask for confirmation and never delete.
pub async fn run_session<S, P>(
    request: &SessionRequest,
    store: &S,
    prompter: &mut P,
) -> Result<SessionOutcome>
where
    S: RecordStore + ?Sized,
    P: Prompter + ?Sized,
{
    let user_id = match &request.user_id {
        Some(user_id) => user_id.trim().to_string(),
        None => prompter.input(USER_ID_PROMPT)?.trim().to_string(),
    };

    if user_id.is_empty() {
        if !request.silent {
            aprintln!("{}", p_y("No user ID provided. Exiting."));
        }
        return Ok(SessionOutcome::NoUserId);
    }

    let remover = CascadingRemover::new(store).with_overrides(request.overrides.clone());

    if request.dry_run {
        return Ok(match remover.preview(&user_id).await {
            Ok(plan) => {
                if !request.silent {
                    print_plan(&plan);
                }
                SessionOutcome::Previewed(plan)
            }
            Err(error) => {
                print_failure(&error);
                SessionOutcome::Failed(error)
            }
        });
    }

    let answer = prompter.input(&format!(
        "Are you sure you want to delete user {}? (yes/no)",
        user_id
    ))?;
    if !is_confirmed(&answer) {
        if !request.silent {
            aprintln!("{}", p_y("Deletion cancelled."));
        }
        return Ok(SessionOutcome::Cancelled);
    }

    Ok(match remover.remove(&user_id).await {
        Ok(report) => {
            if !request.silent {
                print_report(&report);
            }
            SessionOutcome::Completed(report)
        }
        Err(error) => {
            print_failure(&error);
            SessionOutcome::Failed(error)
        }
    })
}

/// Pure function: Format a removal report for display.
pub fn format_report(report: &RemovalReport) -> Vec<String> {
    let mut lines = vec![format!(
        "✓ Deleted user {} ({}) from {}",
        report.user_id,
        report.email.as_deref().unwrap_or("N/A"),
        report.primary_table
    )];

    match &report.subscription {
        SubscriptionOutcome::Deleted {
            table,
            subscription_id,
        } => lines.push(format!(
            "✓ Deleted subscription {} from {}",
            subscription_id, table
        )),
        SubscriptionOutcome::NoReference => lines.push("= No subscription".to_string()),
        SubscriptionOutcome::NoTable { .. } | SubscriptionOutcome::Failed { .. } => {}
    }

    match &report.dependents {
        DependentsOutcome::Swept { table, deleted, .. } if !deleted.is_empty() => lines.push(
            format!("✓ Deleted {} essay(s) from {}", deleted.len(), table),
        ),
        DependentsOutcome::Swept { failed, .. } if failed.is_empty() => {
            lines.push("= No essays found for this user".to_string())
        }
        DependentsOutcome::NoTable => lines.push("= No essay table found".to_string()),
        _ => {}
    }

    lines
}

fn print_plan(plan: &CleanupPlan) {
    aprintln!("{}", p_c("Cleanup Plan (dry run):"));
    for line in format_plan(plan) {
        if line.starts_with('-') {
            aprintln!("  {}", p_r(&line));
        } else {
            aprintln!("  {}", line);
        }
    }
    aprintln!();
    aprintln!(
        "{}",
        p_g(&format!(
            "Dry run: {} record(s) would be deleted, nothing was deleted.",
            plan.delete_count()
        ))
    );
}

fn print_report(report: &RemovalReport) {
    for line in format_report(report) {
        if line.starts_with('✓') {
            aprintln!("{}", p_g(&line));
        } else {
            aprintln!("{}", line);
        }
    }
    for warning in report.warnings() {
        aprintln!("{} {}", p_y("Warning:"), warning);
    }
    aprintln!();
    aprintln!("{}", p_g("✓ User cleanup completed successfully!"));
}

// Failures are printed even in silent mode.
fn print_failure(error: &CleanupError) {
    aprintln!("{} {}", p_r("Error:"), error);
    aprintln!();
    if error.is_not_found() {
        aprintln!("{}", p_r("✗ User cleanup failed or user not found."));
    } else {
        aprintln!("{}", p_r("✗ User cleanup failed."));
    }
}
