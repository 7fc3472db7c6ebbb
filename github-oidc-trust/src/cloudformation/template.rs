//! CloudFormation rendering of a [`DeclaredState`].
//!
//! The template creates the OIDC provider itself, so the role always trusts it
//! through a `Ref` regardless of how the declared state referenced it.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::constants::{DEPLOY_ROLE_LOGICAL_ID, PROVIDER_LOGICAL_ID};
use crate::error::GithubOidcTrustResult;
use crate::synthesis::{build_trust_policy, managed_policy_arn};
use crate::types::{DeclaredState, DeploymentTarget, ProviderReference, TrustPolicyDocument};

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudFormationTemplate {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, Resource>,
    #[serde(rename = "Outputs")]
    pub outputs: BTreeMap<String, Output>,
}

impl CloudFormationTemplate {
    pub fn to_json_pretty(&self) -> GithubOidcTrustResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum Resource {
    #[serde(rename = "AWS::IAM::OIDCProvider")]
    OidcProvider(OidcProviderProperties),
    #[serde(rename = "AWS::IAM::Role")]
    Role(RoleProperties),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OidcProviderProperties {
    pub url: String,
    pub client_id_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleProperties {
    pub role_name: String,
    pub description: String,
    pub max_session_duration: u32,
    /// Literal ARNs, or `Fn::Sub` expressions when the partition is left to
    /// CloudFormation.
    pub managed_policy_arns: Vec<Value>,
    pub assume_role_policy_document: TrustPolicyDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub description: String,
    pub value: Value,
}

/// Managed policies resolve against the target partition when the account is
/// pinned, otherwise against `AWS::Partition` at deploy time.
fn managed_policy_reference(target: &DeploymentTarget, name: &str) -> Value {
    if target.is_environment_agnostic() {
        json!({ "Fn::Sub": format!("arn:${{AWS::Partition}}:iam::aws:policy/{name}") })
    } else {
        Value::String(managed_policy_arn(&target.partition, name))
    }
}

pub fn render_template(
    state: &DeclaredState,
    target: &DeploymentTarget,
    description: Option<String>,
) -> CloudFormationTemplate {
    let provider = &state.identity_provider;
    let role = &state.deploy_role;

    let provider_resource = Resource::OidcProvider(OidcProviderProperties {
        url: provider.issuer_url.clone(),
        client_id_list: provider.audiences.clone(),
    });

    let role_resource = Resource::Role(RoleProperties {
        role_name: role.role_name.clone(),
        description: role.description.clone(),
        max_session_duration: role.max_session_duration_seconds,
        managed_policy_arns: role
            .attached_policies
            .iter()
            .map(|name| managed_policy_reference(target, name))
            .collect(),
        assume_role_policy_document: build_trust_policy(
            ProviderReference::logical(PROVIDER_LOGICAL_ID),
            &role.condition,
        ),
    });

    let resources = BTreeMap::from([
        (PROVIDER_LOGICAL_ID.to_string(), provider_resource),
        (DEPLOY_ROLE_LOGICAL_ID.to_string(), role_resource),
    ]);

    let outputs = BTreeMap::from([
        (
            "DeployRoleArn".to_string(),
            Output {
                description: "ARN of the role GitHub Actions workflows assume".to_string(),
                value: json!({ "Fn::GetAtt": [DEPLOY_ROLE_LOGICAL_ID, "Arn"] }),
            },
        ),
        (
            "GithubProviderArn".to_string(),
            Output {
                description: "ARN of the GitHub Actions OIDC provider".to_string(),
                value: json!({ "Ref": PROVIDER_LOGICAL_ID }),
            },
        ),
    ]);

    CloudFormationTemplate {
        format_version: TEMPLATE_FORMAT_VERSION.to_string(),
        description,
        resources,
        outputs,
    }
}
