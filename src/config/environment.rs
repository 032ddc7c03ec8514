//! Runtime mode of the process (`NODE_ENV`)

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Runtime mode controlling which static file is loaded and whether `.env` is read
///
/// This is distinct from the deployment scope tag (`ENV`), which is a
/// free-form name such as `staging` or `prod-eu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeEnv {
    /// Local machines and non-production servers
    Development,
    /// Any deployed server
    Production,
    /// Test pipelines
    Test,
}

impl NodeEnv {
    /// Environment variable holding the runtime mode
    pub const ENV_VAR: &'static str = "NODE_ENV";

    /// All accepted values, in declaration order
    pub const CHOICES: &'static [&'static str] = &["development", "production", "test"];

    /// Convert the runtime mode to a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeEnv::Development => "development",
            NodeEnv::Production => "production",
            NodeEnv::Test => "test",
        }
    }
}

impl FromStr for NodeEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(NodeEnv::Development),
            "production" => Ok(NodeEnv::Production),
            "test" => Ok(NodeEnv::Test),
            _ => Err(format!(
                "Value \"{}\" not in choices [{}]",
                s,
                Self::CHOICES.join(", ")
            )),
        }
    }
}

impl std::fmt::Display for NodeEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_env_from_str() {
        assert_eq!("development".parse::<NodeEnv>().unwrap(), NodeEnv::Development);
        assert_eq!("production".parse::<NodeEnv>().unwrap(), NodeEnv::Production);
        assert_eq!("test".parse::<NodeEnv>().unwrap(), NodeEnv::Test);
    }

    #[test]
    fn test_node_env_is_exact_match() {
        assert!("dev".parse::<NodeEnv>().is_err());
        assert!("Production".parse::<NodeEnv>().is_err());
        assert!("staging".parse::<NodeEnv>().is_err());
    }

    #[test]
    fn test_node_env_error_lists_choices() {
        let err = "staging".parse::<NodeEnv>().unwrap_err();
        assert!(err.contains("development, production, test"));
    }
}
