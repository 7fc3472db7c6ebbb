//! Stack configuration: the allow-list, the role name and the target account.
//!
//! Field names follow the props of the deployment stack this configuration
//! describes (`repositoryConfig`, `deployRole`, `env`), so an existing stack
//! definition can be carried over as JSON.

use std::path::Path;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STACK_NAME;
use crate::error::{GithubOidcTrustError, GithubOidcTrustResult};
use crate::types::{DeploymentTarget, RepositoryAccessEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(description = "GitHub Actions OIDC trust stack configuration")]
pub struct StackConfig {
    #[serde(default = "default_stack_name")]
    #[schemars(description = "Stack name, used for logging")]
    pub stack_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Template description")]
    pub description: Option<String>,

    #[schemars(description = "Name of the IAM role GitHub Actions assumes")]
    pub deploy_role: String,

    #[serde(default)]
    #[schemars(description = "Repositories allowed to assume the deploy role, in order")]
    pub repository_config: Vec<RepositoryAccessEntry>,

    #[serde(default)]
    #[schemars(description = "Target account environment")]
    pub env: DeploymentTarget,
}

fn default_stack_name() -> String {
    DEFAULT_STACK_NAME.to_string()
}

impl StackConfig {
    pub fn new(deploy_role: impl Into<String>, repository_config: Vec<RepositoryAccessEntry>) -> Self {
        Self {
            stack_name: default_stack_name(),
            description: None,
            deploy_role: deploy_role.into(),
            repository_config,
            env: DeploymentTarget::default(),
        }
    }

    pub fn from_json_str(json: &str) -> GithubOidcTrustResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| GithubOidcTrustError::config(format!("Invalid stack configuration: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> GithubOidcTrustResult<Self> {
        let path = path.as_ref();
        debug!("Loading stack configuration from {}", path.display());
        let contents =
            std::fs::read_to_string(path).map_err(|e| GithubOidcTrustError::io(path, e))?;
        Self::from_json_str(&contents)
    }
}

/// JSON schema of [`StackConfig`].
pub fn config_schema() -> schemars::Schema {
    schemars::schema_for!(StackConfig)
}
