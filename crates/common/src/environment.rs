use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Deployment target selecting which URL and header variants are active.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Environment {
    #[default]
    Dev,
    Qa,
    Sit,
    Uat,
    Prod,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown environment '{0}', expected one of DEV, QA, SIT, UAT, PROD")]
pub struct UnknownEnvironment(pub String);

impl Environment {
    pub const ALL: [Environment; 5] = [
        Environment::Dev,
        Environment::Qa,
        Environment::Sit,
        Environment::Uat,
        Environment::Prod,
    ];

    /// Uppercase token used in env-var suffixes and `environmentUrls` keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Qa => "QA",
            Environment::Sit => "SIT",
            Environment::Uat => "UAT",
            Environment::Prod => "PROD",
        }
    }

    /// Case-insensitive comparison against an author-written environment name.
    pub fn matches(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.matches(s))
            .ok_or_else(|| UnknownEnvironment(s.to_string()))
    }
}

impl TryFrom<String> for Environment {
    type Error = UnknownEnvironment;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("uat".parse::<Environment>().unwrap(), Environment::Uat);
        assert_eq!(" Prod ".parse::<Environment>().unwrap(), Environment::Prod);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_serde_uses_uppercase_tokens() {
        let json = serde_json::to_string(&Environment::Sit).unwrap();
        assert_eq!(json, "\"SIT\"");
        let parsed: Environment = serde_json::from_str("\"qa\"").unwrap();
        assert_eq!(parsed, Environment::Qa);
    }
}
