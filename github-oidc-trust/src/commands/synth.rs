//! CloudFormation synthesis for the Trust-Policy Builder

use crate::cloudformation::{render_template, CloudFormationTemplate};
use crate::config::StackConfig;

impl super::service::TrustPolicyBuilder {
    /// Render the stack as a CloudFormation template that creates both the
    /// OIDC provider and the deploy role, targeting the stack's `env`.
    pub fn synth(&self, config: &StackConfig) -> CloudFormationTemplate {
        let plan = self.plan_stack(config);
        render_template(&plan.state, &config.env, config.description.clone())
    }
}
