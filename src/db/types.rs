//! Database-facing configuration types

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Policy for destructive database resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetMode {
    /// Resets are refused
    None,
    /// Drop and re-create the whole database, used for dev environments
    Recreate,
    /// Drop every table and re-run migrations, used for managed databases
    DropTables,
}

impl ResetMode {
    pub const CHOICES: &'static [&'static str] = &["none", "recreate", "drop_tables"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResetMode::None => "none",
            ResetMode::Recreate => "recreate",
            ResetMode::DropTables => "drop_tables",
        }
    }
}

impl FromStr for ResetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ResetMode::None),
            "recreate" => Ok(ResetMode::Recreate),
            "drop_tables" => Ok(ResetMode::DropTables),
            _ => Err(format!(
                "Value \"{}\" not in choices [{}]",
                s,
                Self::CHOICES.join(", ")
            )),
        }
    }
}

impl std::fmt::Display for ResetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
