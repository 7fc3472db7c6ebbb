//! Commands module - builder service for the trust declarations

mod plan;
pub(crate) mod service;
mod synth;

pub use plan::PlanResult;
pub use service::TrustPolicyBuilder;
