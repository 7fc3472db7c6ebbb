//! Declared-state types: repository allow-list entries, the identity provider
//! registration, the deploy role and its trust policy.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::{
    DEFAULT_PARTITION, DEFAULT_SUBJECT_FILTER, GITHUB_OIDC_ISSUER_URL, STS_AUDIENCE, SUBJECT_CLAIM,
};
use crate::error::GithubOidcTrustError;

/// One repository allowed to assume the deploy role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RepositoryAccessEntry {
    /// GitHub user or organization owning the repository
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Subject filter after `repo:{owner}/{repo}:`, e.g. `ref:refs/heads/main`,
    /// `environment:prod` or `pull_request`. Defaults to `*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl RepositoryAccessEntry {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// The filter segment, `*` when none was given. An explicit empty filter
    /// is passed through unchanged.
    pub fn subject_filter(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_SUBJECT_FILTER)
    }

    /// Subject-claim pattern `repo:{owner}/{repo}:{filter}`.
    pub fn subject_pattern(&self) -> String {
        format!(
            "repo:{}/{}:{}",
            self.owner,
            self.repo,
            self.subject_filter()
        )
    }
}

impl fmt::Display for RepositoryAccessEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if let Some(filter) = &self.filter {
            write!(f, ":{filter}")?;
        }
        Ok(())
    }
}

/// Parses `owner/repo[:filter]`. Everything after the first colon following
/// the repo is the filter, so `acme/app:ref:refs/heads/main` keeps
/// `ref:refs/heads/main` intact.
impl FromStr for RepositoryAccessEntry {
    type Err = GithubOidcTrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, rest) = s
            .split_once('/')
            .ok_or_else(|| GithubOidcTrustError::invalid_repository_spec(s))?;

        let entry = match rest.split_once(':') {
            Some((repo, filter)) => Self::new(owner, repo).with_filter(filter),
            None => Self::new(owner, rest),
        };
        Ok(entry)
    }
}

/// Registration of the GitHub Actions token issuer as an IAM OIDC provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderConfig {
    pub issuer_url: String,
    pub audiences: Vec<String>,
}

impl IdentityProviderConfig {
    pub fn github_actions() -> Self {
        Self {
            issuer_url: GITHUB_OIDC_ISSUER_URL.to_string(),
            audiences: vec![STS_AUDIENCE.to_string()],
        }
    }

    /// Issuer URL without its scheme. IAM prefixes condition keys with it.
    pub fn issuer_host(&self) -> &str {
        self.issuer_url
            .strip_prefix("https://")
            .unwrap_or(&self.issuer_url)
    }

    pub fn subject_claim_key(&self) -> String {
        format!("{}:{}", self.issuer_host(), SUBJECT_CLAIM)
    }

    /// ARN IAM assigns to the provider once registered in `account`.
    pub fn arn(&self, partition: &str, account: &str) -> String {
        format!(
            "arn:{partition}:iam::{account}:oidc-provider/{}",
            self.issuer_host()
        )
    }
}

impl Default for IdentityProviderConfig {
    fn default() -> Self {
        Self::github_actions()
    }
}

/// `StringLike` match of one claim against an ordered pattern list.
///
/// Serializes in declaration form: `{ "<claim>": { "stringLike": [..] } }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustCondition {
    pub claim_key: String,
    pub patterns: Vec<String>,
}

impl TrustCondition {
    pub const DECLARATION_OPERATOR: &'static str = "stringLike";
    pub const POLICY_OPERATOR: &'static str = "StringLike";

    /// The same condition in IAM policy grammar:
    /// `{ "StringLike": { "<claim>": [..] } }`.
    pub fn to_policy_condition(&self) -> BTreeMap<String, BTreeMap<String, Vec<String>>> {
        let claims = BTreeMap::from([(self.claim_key.clone(), self.patterns.clone())]);
        BTreeMap::from([(Self::POLICY_OPERATOR.to_string(), claims)])
    }
}

impl Serialize for TrustCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let matcher = BTreeMap::from([(Self::DECLARATION_OPERATOR, &self.patterns)]);
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.claim_key, &matcher)?;
        map.end()
    }
}

/// How the role refers to the identity provider.
///
/// A concrete ARN needs the target account; without one the reference stays
/// symbolic and serializes as a CloudFormation `{"Ref": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProviderReference {
    Arn(String),
    Logical {
        #[serde(rename = "Ref")]
        logical_id: String,
    },
}

impl ProviderReference {
    pub fn logical(logical_id: impl Into<String>) -> Self {
        Self::Logical {
            logical_id: logical_id.into(),
        }
    }
}

/// The deploy role: who may assume it, what it grants, how long sessions last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRoleSpec {
    pub role_name: String,
    pub trusted_provider_arn: ProviderReference,
    pub condition: TrustCondition,
    pub attached_policies: Vec<String>,
    pub max_session_duration_seconds: u32,
    pub description: String,
}

/// Everything the external provisioning engine has to reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredState {
    pub identity_provider: IdentityProviderConfig,
    pub deploy_role: DeployRoleSpec,
}

impl DeclaredState {
    pub fn to_json_pretty(&self) -> Result<String, GithubOidcTrustError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// IAM assume-role policy document attached to the deploy role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustPolicyDocument {
    pub version: String,
    pub statement: Vec<TrustStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustStatement {
    pub effect: String,
    pub principal: FederatedPrincipal,
    pub action: String,
    pub condition: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FederatedPrincipal {
    pub federated: ProviderReference,
}

/// Account environment the declarations are synthesized for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeploymentTarget {
    /// 12-digit AWS account id; omit for environment-agnostic output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default = "default_partition")]
    pub partition: String,
}

fn default_partition() -> String {
    DEFAULT_PARTITION.to_string()
}

impl DeploymentTarget {
    pub fn account(account: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
            ..Self::default()
        }
    }

    pub fn is_environment_agnostic(&self) -> bool {
        self.account.is_none()
    }
}

impl Default for DeploymentTarget {
    fn default() -> Self {
        Self {
            account: None,
            region: None,
            partition: default_partition(),
        }
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}",
            self.partition,
            self.account.as_deref().unwrap_or("unknown-account"),
            self.region.as_deref().unwrap_or("unknown-region")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subject_pattern_defaults_filter_to_wildcard() {
        let entry = RepositoryAccessEntry::new("acme", "widgets");
        assert_eq!(entry.subject_pattern(), "repo:acme/widgets:*");
    }

    #[test]
    fn test_subject_pattern_keeps_empty_filter() {
        let entry = RepositoryAccessEntry::new("acme", "widgets").with_filter("");
        assert_eq!(entry.subject_pattern(), "repo:acme/widgets:");
    }

    #[test]
    fn test_parse_repository_spec() {
        let entry: RepositoryAccessEntry = "acme/widgets".parse().unwrap();
        assert_eq!(entry, RepositoryAccessEntry::new("acme", "widgets"));

        let entry: RepositoryAccessEntry = "acme/widgets:ref:refs/heads/main".parse().unwrap();
        assert_eq!(entry.filter.as_deref(), Some("ref:refs/heads/main"));
        assert_eq!(entry.repo, "widgets");
    }

    #[test]
    fn test_parse_repository_spec_without_slash() {
        let result = "widgets".parse::<RepositoryAccessEntry>();
        assert!(matches!(
            result,
            Err(GithubOidcTrustError::InvalidRepositorySpec(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        let entry = RepositoryAccessEntry::new("c", "d").with_filter("pull_request");
        assert_eq!(entry.to_string(), "c/d:pull_request");
        assert_eq!(entry.to_string().parse::<RepositoryAccessEntry>().unwrap(), entry);
    }

    #[test]
    fn test_entry_deserializes_without_filter() {
        let entry: RepositoryAccessEntry =
            serde_json::from_value(json!({"owner": "acme", "repo": "widgets"})).unwrap();
        assert_eq!(entry.filter, None);

        let err = serde_json::from_value::<RepositoryAccessEntry>(
            json!({"owner": "acme", "repo": "widgets", "branch": "main"}),
        );
        assert!(err.is_err(), "unknown fields must be rejected");
    }

    #[test]
    fn test_provider_claim_key_and_arn() {
        let provider = IdentityProviderConfig::github_actions();
        assert_eq!(provider.issuer_host(), "token.actions.githubusercontent.com");
        assert_eq!(
            provider.subject_claim_key(),
            "token.actions.githubusercontent.com:sub"
        );
        assert_eq!(
            provider.arn("aws-us-gov", "123456789012"),
            "arn:aws-us-gov:iam::123456789012:oidc-provider/token.actions.githubusercontent.com"
        );
    }

    #[test]
    fn test_provider_serialization() {
        let value = serde_json::to_value(IdentityProviderConfig::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "issuerUrl": "https://token.actions.githubusercontent.com",
                "audiences": ["sts.amazonaws.com"]
            })
        );
    }

    #[test]
    fn test_condition_declaration_and_policy_forms() {
        let condition = TrustCondition {
            claim_key: "token.actions.githubusercontent.com:sub".into(),
            patterns: vec!["repo:a/b:*".into()],
        };
        assert_eq!(
            serde_json::to_value(&condition).unwrap(),
            json!({"token.actions.githubusercontent.com:sub": {"stringLike": ["repo:a/b:*"]}})
        );
        assert_eq!(
            serde_json::to_value(condition.to_policy_condition()).unwrap(),
            json!({"StringLike": {"token.actions.githubusercontent.com:sub": ["repo:a/b:*"]}})
        );
    }

    #[test]
    fn test_provider_reference_serialization() {
        let arn = ProviderReference::Arn("arn:aws:iam::1:oidc-provider/x".into());
        assert_eq!(
            serde_json::to_value(arn).unwrap(),
            json!("arn:aws:iam::1:oidc-provider/x")
        );
        assert_eq!(
            serde_json::to_value(ProviderReference::logical("GithubProvider")).unwrap(),
            json!({"Ref": "GithubProvider"})
        );
    }

    #[test]
    fn test_deployment_target_defaults() {
        let target: DeploymentTarget = serde_json::from_value(json!({})).unwrap();
        assert_eq!(target, DeploymentTarget::default());
        assert_eq!(target.partition, "aws");
        assert!(target.is_environment_agnostic());
        assert_eq!(
            DeploymentTarget::account("123456789012").to_string(),
            "aws:123456789012/unknown-region"
        );
    }
}
