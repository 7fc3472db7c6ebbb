//! Trust-Policy Builder service
//!
//! Holds the identity provider and the deployment target, and exposes the
//! operations (plan, synth) the CLI and other callers build on. Nothing here
//! performs I/O: the output is declared state for an external engine to apply.

use crate::config::StackConfig;
use crate::constants::PROVIDER_LOGICAL_ID;
use crate::types::{DeploymentTarget, IdentityProviderConfig, ProviderReference};

#[derive(Debug, Clone)]
pub struct TrustPolicyBuilder {
    pub(crate) provider: IdentityProviderConfig,
    pub(crate) target: DeploymentTarget,
}

impl TrustPolicyBuilder {
    pub fn new(target: DeploymentTarget) -> Self {
        Self {
            provider: IdentityProviderConfig::github_actions(),
            target,
        }
    }

    /// Builder for an environment-agnostic stack.
    pub fn github_actions() -> Self {
        Self::new(DeploymentTarget::default())
    }

    /// Builder targeting the account environment of `config`.
    pub fn for_stack(config: &StackConfig) -> Self {
        Self::new(config.env.clone())
    }

    pub(crate) fn with_target(&self, target: DeploymentTarget) -> Self {
        Self {
            provider: self.provider.clone(),
            target,
        }
    }

    pub fn provider(&self) -> &IdentityProviderConfig {
        &self.provider
    }

    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    /// Concrete provider ARN when the account is known, a `Ref` otherwise.
    pub fn provider_reference(&self) -> ProviderReference {
        match &self.target.account {
            Some(account) => {
                ProviderReference::Arn(self.provider.arn(&self.target.partition, account))
            }
            None => ProviderReference::logical(PROVIDER_LOGICAL_ID),
        }
    }

    // plan() is implemented in plan.rs
    // synth() is implemented in synth.rs
}
