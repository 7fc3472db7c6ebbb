use log::debug;

use crate::constants::{
    ADMINISTRATOR_ACCESS_POLICY, ASSUME_ROLE_WITH_WEB_IDENTITY, DEPLOY_ROLE_DESCRIPTION,
    MAX_SESSION_DURATION_SECONDS, POLICY_VERSION, PROVIDER_LOGICAL_ID,
};
use crate::types::{
    DeclaredState, DeployRoleSpec, FederatedPrincipal, IdentityProviderConfig, ProviderReference,
    RepositoryAccessEntry, TrustCondition, TrustPolicyDocument, TrustStatement,
};

/// One pattern per entry, in input order. Duplicates are kept.
pub fn derive_subject_patterns(entries: &[RepositoryAccessEntry]) -> Vec<String> {
    entries
        .iter()
        .map(RepositoryAccessEntry::subject_pattern)
        .collect()
}

/// Single-key `StringLike` condition on the provider's `sub` claim.
///
/// An empty pattern list is kept as-is; IAM then matches no token and the
/// role cannot be assumed.
pub fn build_condition(provider: &IdentityProviderConfig, patterns: Vec<String>) -> TrustCondition {
    TrustCondition {
        claim_key: provider.subject_claim_key(),
        patterns,
    }
}

pub fn build_trust_policy(
    provider: ProviderReference,
    condition: &TrustCondition,
) -> TrustPolicyDocument {
    TrustPolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![TrustStatement {
            effect: "Allow".to_string(),
            principal: FederatedPrincipal {
                federated: provider,
            },
            action: ASSUME_ROLE_WITH_WEB_IDENTITY.to_string(),
            condition: condition.to_policy_condition(),
        }],
    }
}

/// ARN of an AWS managed policy, e.g. `arn:aws:iam::aws:policy/AdministratorAccess`.
pub fn managed_policy_arn(partition: &str, name: &str) -> String {
    format!("arn:{partition}:iam::aws:policy/{name}")
}

pub(crate) fn build_deploy_role(
    role_name: &str,
    provider: ProviderReference,
    condition: TrustCondition,
) -> DeployRoleSpec {
    DeployRoleSpec {
        role_name: role_name.to_string(),
        trusted_provider_arn: provider,
        condition,
        attached_policies: vec![ADMINISTRATOR_ACCESS_POLICY.to_string()],
        max_session_duration_seconds: MAX_SESSION_DURATION_SECONDS,
        description: DEPLOY_ROLE_DESCRIPTION.to_string(),
    }
}

pub(crate) fn declare(
    provider: &IdentityProviderConfig,
    provider_ref: ProviderReference,
    entries: &[RepositoryAccessEntry],
    role_name: &str,
) -> DeclaredState {
    let patterns = derive_subject_patterns(entries);
    debug!(
        "declare: role '{}' trusts {} subject pattern(s): {:?}",
        role_name,
        patterns.len(),
        patterns
    );
    let condition = build_condition(provider, patterns);

    DeclaredState {
        identity_provider: provider.clone(),
        deploy_role: build_deploy_role(role_name, provider_ref, condition),
    }
}

/// Declared state for the GitHub Actions provider and `role_name`, with the
/// provider referenced symbolically (no target account).
pub fn build_declarations(entries: &[RepositoryAccessEntry], role_name: &str) -> DeclaredState {
    declare(
        &IdentityProviderConfig::github_actions(),
        ProviderReference::logical(PROVIDER_LOGICAL_ID),
        entries,
        role_name,
    )
}
