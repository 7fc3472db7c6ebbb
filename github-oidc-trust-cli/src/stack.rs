//! Resolution of the stack configuration from a config file and/or flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use github_oidc_trust::{RepositoryAccessEntry, StackConfig};
use log::info;

/// Role name used when neither a config file nor --role provides one.
const DEFAULT_ROLE_NAME: &str = "deployRole";

/// Fallbacks for a target the config file and flags leave unset.
const DEFAULT_ACCOUNT_VAR: &str = "CDK_DEFAULT_ACCOUNT";
const DEFAULT_REGION_VAR: &str = "CDK_DEFAULT_REGION";

#[derive(Args, Debug)]
pub struct StackArgs {
    /// Stack configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Repository allowed to assume the role; repeat for several
    #[arg(
        long = "repo",
        value_name = "OWNER/REPO[:FILTER]",
        conflicts_with = "config"
    )]
    pub repos: Vec<RepositoryAccessEntry>,

    /// Deploy role name (overrides the config file)
    #[arg(long, value_name = "NAME")]
    pub role: Option<String>,

    /// Target AWS account id (overrides the config file; CDK_DEFAULT_ACCOUNT
    /// applies only when neither sets one)
    #[arg(long)]
    pub account: Option<String>,

    /// Target AWS region (overrides the config file; CDK_DEFAULT_REGION
    /// applies only when neither sets one)
    #[arg(long)]
    pub region: Option<String>,

    /// AWS partition (aws, aws-cn, aws-us-gov)
    #[arg(long)]
    pub partition: Option<String>,
}

impl StackArgs {
    pub fn resolve(&self) -> Result<StackConfig> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Precedence per field: flag, then config file, then `lookup(CDK_DEFAULT_*)`.
    fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<StackConfig> {
        let mut config = match &self.config {
            Some(path) => StackConfig::load(path)
                .with_context(|| format!("Failed to load stack configuration {}", path.display()))?,
            None => StackConfig::new(DEFAULT_ROLE_NAME, self.repos.clone()),
        };

        if let Some(role) = &self.role {
            config.deploy_role = role.clone();
        }
        if let Some(account) = &self.account {
            config.env.account = Some(account.clone());
        } else if config.env.account.is_none() {
            config.env.account = lookup(DEFAULT_ACCOUNT_VAR);
        }
        if let Some(region) = &self.region {
            config.env.region = Some(region.clone());
        } else if config.env.region.is_none() {
            config.env.region = lookup(DEFAULT_REGION_VAR);
        }
        if let Some(partition) = &self.partition {
            config.env.partition = partition.clone();
        }

        info!(
            "Stack '{}': role '{}', {} repository entries, target {}",
            config.stack_name,
            config.deploy_role,
            config.repository_config.len(),
            config.env
        );
        Ok(config)
    }
}
