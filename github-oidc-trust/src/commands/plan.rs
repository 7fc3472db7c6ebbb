//! Plan creation for the Trust-Policy Builder

use log::{debug, warn};
use serde::Serialize;

use crate::advisories::{check_stack, Advisory};
use crate::config::StackConfig;
use crate::synthesis::policy_builder::declare;
use crate::types::{DeclaredState, RepositoryAccessEntry};

/// Declared state plus whatever looked suspicious in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub state: DeclaredState,
    pub advisories: Vec<Advisory>,
}

impl super::service::TrustPolicyBuilder {
    /// Declare the identity provider and a deploy role trusted by `entries`.
    ///
    /// Pure: the same entries in the same order always produce the same state.
    /// Inputs are not validated; IAM rejects what it does not accept at apply
    /// time.
    pub fn plan(&self, entries: &[RepositoryAccessEntry], role_name: &str) -> DeclaredState {
        debug!("plan: target {}, {} repository entries", self.target, entries.len());
        declare(&self.provider, self.provider_reference(), entries, role_name)
    }

    /// Plan a whole stack configuration, logging each advisory as a warning.
    ///
    /// The stack's `env` is the deployment target, not the builder's own.
    pub fn plan_stack(&self, config: &StackConfig) -> PlanResult {
        let advisories = check_stack(config);
        for advisory in &advisories {
            warn!("{}: {}", config.stack_name, advisory);
        }

        PlanResult {
            state: self
                .with_target(config.env.clone())
                .plan(&config.repository_config, &config.deploy_role),
            advisories,
        }
    }
}
