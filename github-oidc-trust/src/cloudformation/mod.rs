//! CloudFormation template output

pub mod template;

pub use template::{
    render_template, CloudFormationTemplate, OidcProviderProperties, Output, Resource,
    RoleProperties,
};
