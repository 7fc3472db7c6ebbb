//! Trust policy synthesis (deterministic, no I/O)

pub mod policy_builder;

pub use policy_builder::{
    build_condition, build_declarations, build_trust_policy, derive_subject_patterns,
    managed_policy_arn,
};
