use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Client SDKs that documentation content can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sdk {
    Ios,
    Android,
    Expo,
    Flutter,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SDK '{0}' (expected one of: ios, android, expo, flutter)")]
pub struct UnknownSdk(pub String);

impl Sdk {
    pub const ALL: [Sdk; 4] = [Sdk::Ios, Sdk::Android, Sdk::Expo, Sdk::Flutter];

    pub fn as_str(self) -> &'static str {
        match self {
            Sdk::Ios => "ios",
            Sdk::Android => "android",
            Sdk::Expo => "expo",
            Sdk::Flutter => "flutter",
        }
    }

    /// Infer the SDK from the first directory segment of `path` that names one,
    /// e.g. `content/docs/expo/setup.mdx` is an Expo page.
    ///
    /// The file name itself is never considered.
    pub fn from_path(path: &Path) -> Option<Sdk> {
        path.parent()?.components().find_map(|component| match component {
            Component::Normal(segment) => segment.to_str()?.parse().ok(),
            _ => None,
        })
    }
}

impl FromStr for Sdk {
    type Err = UnknownSdk;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sdk::ALL
            .into_iter()
            .find(|sdk| sdk.as_str() == s)
            .ok_or_else(|| UnknownSdk(s.to_string()))
    }
}

impl fmt::Display for Sdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
