/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of Sabbaths in one quarter. Week numbers run 1..=13.
pub const WEEKS_PER_QUARTER: i32 = 13;

/// Account roles, from most to least privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Secretary,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Secretary => "secretary",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "secretary" => Ok(Role::Secretary),
            "viewer" => Ok(Role::Viewer),
            _ => Err("Role must be one of: admin, secretary, viewer".to_string()),
        }
    }
}

/// The four fixed quarter labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuarterName {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl QuarterName {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuarterName::Q1 => "Q1",
            QuarterName::Q2 => "Q2",
            QuarterName::Q3 => "Q3",
            QuarterName::Q4 => "Q4",
        }
    }
}

impl fmt::Display for QuarterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuarterName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "Q1" => Ok(QuarterName::Q1),
            "Q2" => Ok(QuarterName::Q2),
            "Q3" => Ok(QuarterName::Q3),
            "Q4" => Ok(QuarterName::Q4),
            _ => Err("Quarter name must be one of: Q1, Q2, Q3, Q4".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Admin, Role::Secretary, Role::Viewer] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("  VIEWER ".parse::<Role>().unwrap(), Role::Viewer);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Secretary).unwrap(), "\"secretary\"");
    }

    #[test]
    fn quarter_name_round_trips_through_strings() {
        for name in [QuarterName::Q1, QuarterName::Q2, QuarterName::Q3, QuarterName::Q4] {
            assert_eq!(name.as_str().parse::<QuarterName>().unwrap(), name);
        }
        assert_eq!("q3".parse::<QuarterName>().unwrap(), QuarterName::Q3);
        assert!("Q5".parse::<QuarterName>().is_err());
    }
}
