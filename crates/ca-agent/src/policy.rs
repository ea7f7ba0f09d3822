//! Branch selection after the Grade step

use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::state::Grade;

/// Next step chosen after grading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Generate,
    Rewrite,
}

/// Pure decision over `(grade, retry_count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    pub max_retries: u32,
    /// Grade that lets the run proceed to generation
    pub proceed_on: Grade,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            proceed_on: Grade::Relevant,
        }
    }
}

impl DecisionPolicy {
    pub fn new(max_retries: u32, proceed_on: Grade) -> Self {
        Self {
            max_retries,
            proceed_on,
        }
    }

    /// The retry cap is checked first and wins over the grade, so a batch
    /// that is still irrelevant goes to generation once the cap is hit.
    /// `max_retries = 0` therefore never rewrites.
    pub fn decide(&self, grade: Grade, retry_count: u32) -> Decision {
        if retry_count >= self.max_retries {
            Decision::Generate
        } else if grade == self.proceed_on {
            Decision::Generate
        } else {
            Decision::Rewrite
        }
    }
}

impl From<&AgentConfig> for DecisionPolicy {
    fn from(config: &AgentConfig) -> Self {
        Self::new(config.max_retries, config.proceed_on)
    }
}
