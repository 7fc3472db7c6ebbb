//! This crate provides the core logic of the GitHub Actions OIDC trust builder:
//! - Subject pattern derivation from a repository allow-list
//! - Trust condition and assume-role policy synthesis
//! - Declared state for the IAM OIDC provider and the deploy role
//! - CloudFormation rendering of that state
//!
//! Nothing here calls AWS. Token verification and session issuance belong to
//! IAM/STS; applying the declarations belongs to the provisioning engine.

mod advisories;
mod cloudformation;
pub mod commands;
mod config;
pub mod constants;
mod error;
mod synthesis;
mod types;

// Re-exports for a small, focused public API
pub use advisories::{check_stack, Advisory};
pub use cloudformation::{
    render_template, CloudFormationTemplate, OidcProviderProperties, Output, Resource,
    RoleProperties,
};
pub use commands::{PlanResult, TrustPolicyBuilder};
pub use config::{config_schema, StackConfig};
pub use error::{GithubOidcTrustError, GithubOidcTrustResult};
pub use synthesis::{
    build_condition, build_declarations, build_trust_policy, derive_subject_patterns,
    managed_policy_arn,
};
pub use types::{
    DeclaredState, DeployRoleSpec, DeploymentTarget, FederatedPrincipal, IdentityProviderConfig,
    ProviderReference, RepositoryAccessEntry, TrustCondition, TrustPolicyDocument, TrustStatement,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_building_sample_declarations() {
        let entries = vec![
            RepositoryAccessEntry::new("a", "b"),
            RepositoryAccessEntry::new("c", "d").with_filter("pull_request"),
        ];
        let state = build_declarations(&entries, "deployRole");
        assert_eq!(
            state.deploy_role.condition.patterns,
            vec!["repo:a/b:*", "repo:c/d:pull_request"]
        );
        assert_eq!(state.deploy_role.role_name, "deployRole");
    }
}
