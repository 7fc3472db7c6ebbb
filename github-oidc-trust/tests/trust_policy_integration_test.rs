//! End-to-end checks of the public API: config in, declared state and
//! CloudFormation template out.

use github_oidc_trust::{
    Advisory, DeploymentTarget, ProviderReference, RepositoryAccessEntry, StackConfig,
    TrustPolicyBuilder,
};
use serde_json::json;

const STACK_JSON: &str = r#"{
    "stackName": "CloudNationGithubActions",
    "deployRole": "cloudNationGitHubDeployRole",
    "repositoryConfig": [
        { "owner": "cloudnation", "repo": "platform" },
        { "owner": "cloudnation", "repo": "website", "filter": "ref:refs/heads/main" },
        { "owner": "cloudnation", "repo": "website", "filter": "pull_request" }
    ],
    "env": { "account": "111122223333", "region": "eu-west-1" }
}"#;

#[test]
fn test_plan_from_config() {
    let config = StackConfig::from_json_str(STACK_JSON).unwrap();
    let builder = TrustPolicyBuilder::for_stack(&config);
    let result = builder.plan_stack(&config);

    assert!(result.advisories.is_empty());

    let value = serde_json::to_value(&result.state).unwrap();
    assert_eq!(
        value["deployRole"]["condition"],
        json!({
            "token.actions.githubusercontent.com:sub": {
                "stringLike": [
                    "repo:cloudnation/platform:*",
                    "repo:cloudnation/website:ref:refs/heads/main",
                    "repo:cloudnation/website:pull_request"
                ]
            }
        })
    );
    assert_eq!(
        value["deployRole"]["trustedProviderArn"],
        "arn:aws:iam::111122223333:oidc-provider/token.actions.githubusercontent.com"
    );
    assert_eq!(value["deployRole"]["roleName"], "cloudNationGitHubDeployRole");
}

#[test]
fn test_repeated_plans_are_byte_identical() {
    let config = StackConfig::from_json_str(STACK_JSON).unwrap();
    let builder = TrustPolicyBuilder::for_stack(&config);

    let first = builder.plan_stack(&config).state.to_json_pretty().unwrap();
    let second = builder.plan_stack(&config).state.to_json_pretty().unwrap();
    assert_eq!(first, second);

    let template_a = builder.synth(&config).to_json_pretty().unwrap();
    let template_b = builder.synth(&config).to_json_pretty().unwrap();
    assert_eq!(template_a, template_b);
}

#[test]
fn test_order_of_entries_is_preserved() {
    let builder = TrustPolicyBuilder::github_actions();
    let forward = builder.plan(
        &[
            RepositoryAccessEntry::new("a", "b"),
            RepositoryAccessEntry::new("c", "d").with_filter("pull_request"),
        ],
        "deployRole",
    );
    let reversed = builder.plan(
        &[
            RepositoryAccessEntry::new("c", "d").with_filter("pull_request"),
            RepositoryAccessEntry::new("a", "b"),
        ],
        "deployRole",
    );

    assert_eq!(
        forward.deploy_role.condition.patterns,
        vec!["repo:a/b:*", "repo:c/d:pull_request"]
    );
    assert_eq!(
        reversed.deploy_role.condition.patterns,
        vec!["repo:c/d:pull_request", "repo:a/b:*"]
    );
}

#[test]
fn test_empty_allow_list_yields_unassumable_role() {
    let config = StackConfig::from_json_str(r#"{"deployRole": "deployRole"}"#).unwrap();
    let builder = TrustPolicyBuilder::for_stack(&config);
    let result = builder.plan_stack(&config);

    assert_eq!(result.advisories, vec![Advisory::EmptyAllowList]);
    assert_eq!(
        result.state.deploy_role.trusted_provider_arn,
        ProviderReference::logical("GithubProvider")
    );

    let template = serde_json::to_value(builder.synth(&config)).unwrap();
    assert_eq!(
        template["Resources"]["GitHubDeployRole"]["Properties"]["AssumeRolePolicyDocument"]
            ["Statement"][0]["Condition"],
        json!({"StringLike": {"token.actions.githubusercontent.com:sub": []}})
    );
}

#[test]
fn test_unvalidated_input_passes_through() {
    // Wildcards and odd characters in the filter are IAM's business.
    let builder = TrustPolicyBuilder::new(DeploymentTarget::default());
    let state = builder.plan(
        &[RepositoryAccessEntry::new("acme", "widgets").with_filter("environment:prod-*")],
        "",
    );
    assert_eq!(state.deploy_role.role_name, "");
    assert_eq!(
        state.deploy_role.condition.patterns,
        vec!["repo:acme/widgets:environment:prod-*"]
    );
}
