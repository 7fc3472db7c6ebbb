//! Fixed values of the GitHub Actions identity provider and the deploy role.

/// Host of the GitHub Actions token issuer; also the prefix of its claim keys.
pub const GITHUB_OIDC_HOST: &str = "token.actions.githubusercontent.com";

pub const GITHUB_OIDC_ISSUER_URL: &str = "https://token.actions.githubusercontent.com";

/// Audience GitHub's `aws-actions/configure-aws-credentials` requests tokens for.
pub const STS_AUDIENCE: &str = "sts.amazonaws.com";

/// Filter used when a repository entry does not narrow the subject.
pub const DEFAULT_SUBJECT_FILTER: &str = "*";

pub const SUBJECT_CLAIM: &str = "sub";

pub const ADMINISTRATOR_ACCESS_POLICY: &str = "AdministratorAccess";

pub const MAX_SESSION_DURATION_SECONDS: u32 = 3600;

pub const DEPLOY_ROLE_DESCRIPTION: &str = "This role is used via GitHub Actions to deploy with AWS CDK or Terraform on the target AWS account";

pub const POLICY_VERSION: &str = "2012-10-17";

pub const ASSUME_ROLE_WITH_WEB_IDENTITY: &str = "sts:AssumeRoleWithWebIdentity";

pub const DEFAULT_PARTITION: &str = "aws";

pub const DEFAULT_STACK_NAME: &str = "GithubActionStack";

/// CloudFormation logical ids of the two declared resources.
pub const PROVIDER_LOGICAL_ID: &str = "GithubProvider";
pub const DEPLOY_ROLE_LOGICAL_ID: &str = "GitHubDeployRole";
