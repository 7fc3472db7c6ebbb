//! Non-fatal checks on a stack configuration.
//!
//! IAM decides what is acceptable at apply time; these checks only point out
//! entries that are very likely mistakes. They never alter the declared state.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::config::StackConfig;

/// Delimiter between the segments of a GitHub `sub` claim.
const SUBJECT_DELIMITER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Advisory {
    /// No repository may assume the role.
    EmptyAllowList,
    EmptyRoleName,
    EmptyOwner { index: usize },
    EmptyRepo { index: usize },
    DelimiterInOwner { index: usize, owner: String },
    DelimiterInRepo { index: usize, repo: String },
    DuplicatePattern { pattern: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAllowList => write!(
                f,
                "repositoryConfig is empty: the trust condition matches no subject and the role cannot be assumed"
            ),
            Self::EmptyRoleName => write!(f, "deployRole is empty"),
            Self::EmptyOwner { index } => write!(f, "repositoryConfig[{index}]: owner is empty"),
            Self::EmptyRepo { index } => write!(f, "repositoryConfig[{index}]: repo is empty"),
            Self::DelimiterInOwner { index, owner } => write!(
                f,
                "repositoryConfig[{index}]: owner '{owner}' contains '{SUBJECT_DELIMITER}', which GitHub uses to separate subject claim segments"
            ),
            Self::DelimiterInRepo { index, repo } => write!(
                f,
                "repositoryConfig[{index}]: repo '{repo}' contains '{SUBJECT_DELIMITER}', which GitHub uses to separate subject claim segments"
            ),
            Self::DuplicatePattern { pattern } => {
                write!(f, "subject pattern '{pattern}' is listed more than once")
            }
        }
    }
}

pub fn check_stack(config: &StackConfig) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if config.deploy_role.trim().is_empty() {
        advisories.push(Advisory::EmptyRoleName);
    }
    if config.repository_config.is_empty() {
        advisories.push(Advisory::EmptyAllowList);
    }

    let mut seen = HashSet::new();
    for (index, entry) in config.repository_config.iter().enumerate() {
        if entry.owner.is_empty() {
            advisories.push(Advisory::EmptyOwner { index });
        } else if entry.owner.contains(SUBJECT_DELIMITER) {
            advisories.push(Advisory::DelimiterInOwner {
                index,
                owner: entry.owner.clone(),
            });
        }

        if entry.repo.is_empty() {
            advisories.push(Advisory::EmptyRepo { index });
        } else if entry.repo.contains(SUBJECT_DELIMITER) {
            advisories.push(Advisory::DelimiterInRepo {
                index,
                repo: entry.repo.clone(),
            });
        }

        let pattern = entry.subject_pattern();
        if !seen.insert(pattern.clone()) {
            advisories.push(Advisory::DuplicatePattern { pattern });
        }
    }

    advisories
}
