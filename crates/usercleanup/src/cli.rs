//! CLI definitions.

use clap::Parser;
use usercleanup_core::tables::TableOverrides;

use crate::dynamodb::{AwsConfig, DEFAULT_REGION};
use crate::session::SessionRequest;

/// Delete a test user and the data it owns.
#[derive(Debug, Parser)]
#[command(name = "usercleanup")]
#[command(version, about = "Delete a test user and the data it owns", long_about = "Delete a test user and the data it owns from the Amplify DynamoDB tables.

The user record is removed from the User table, then its subscription from the
UserSubscription table, then every essay it authored from the Essay table.
Tables are found by name unless pinned with the table flags. The command asks
for confirmation and only proceeds when the answer is 'yes'.

Use this only for testing purposes: deleted data cannot be recovered.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to ap-south-1)
  AWS_PROFILE         - AWS profile to use for credentials
  RUST_LOG            - Log filter (overrides --verbose/--silent)")]
pub struct Cli {
    /// ID of the user to delete. Prompted for when omitted.
    #[arg(value_name = "USER_ID")]
    pub user_id: Option<String>,

    /// AWS region.
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Custom DynamoDB endpoint (for local DynamoDB).
    #[arg(long, env = "AWS_ENDPOINT_URL", value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// User table name (skips discovery for this table).
    #[arg(long, env = "CLEANUP_USER_TABLE", value_name = "TABLE")]
    pub user_table: Option<String>,

    /// UserSubscription table name (skips discovery for this table).
    #[arg(long, env = "CLEANUP_SUBSCRIPTION_TABLE", value_name = "TABLE")]
    pub subscription_table: Option<String>,

    /// Essay table name (skips discovery for this table).
    #[arg(long, env = "CLEANUP_ESSAY_TABLE", value_name = "TABLE")]
    pub essay_table: Option<String>,

    /// Show what would be deleted without deleting anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Silence the command output
    #[arg(long, conflicts_with = "verbose")]
    pub silent: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_verbose() {
            "usercleanup=debug,usercleanup_core=debug"
        } else if self.is_silent() {
            "warn"
        } else {
            "usercleanup=info,usercleanup_core=info"
        }
    }
}

impl Cli {
    pub fn aws_config(&self) -> AwsConfig {
        AwsConfig {
            endpoint_url: self.endpoint_url.clone(),
            region: self.region.clone(),
        }
    }

    pub fn table_overrides(&self) -> TableOverrides {
        TableOverrides {
            primary: self.user_table.clone(),
            subscription: self.subscription_table.clone(),
            dependent: self.essay_table.clone(),
        }
    }

    pub fn session_request(&self) -> SessionRequest {
        SessionRequest {
            user_id: self.user_id.clone(),
            dry_run: self.dry_run,
            overrides: self.table_overrides(),
            silent: self.global.is_silent(),
        }
    }
}
