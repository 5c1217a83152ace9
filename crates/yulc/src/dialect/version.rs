//! EVM hard-fork versions

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Target EVM version, ordered by release
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EvmVersion {
    Homestead,
    TangerineWhistle,
    SpuriousDragon,
    Byzantium,
    Constantinople,
    Petersburg,
    Istanbul,
    Berlin,
    London,
    Paris,
    Shanghai,
    #[default]
    Cancun,
    Prague,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown EVM version '{0}'")]
pub struct UnknownEvmVersion(pub String);

impl EvmVersion {
    pub const ALL: [EvmVersion; 13] = [
        EvmVersion::Homestead,
        EvmVersion::TangerineWhistle,
        EvmVersion::SpuriousDragon,
        EvmVersion::Byzantium,
        EvmVersion::Constantinople,
        EvmVersion::Petersburg,
        EvmVersion::Istanbul,
        EvmVersion::Berlin,
        EvmVersion::London,
        EvmVersion::Paris,
        EvmVersion::Shanghai,
        EvmVersion::Cancun,
        EvmVersion::Prague,
    ];

    /// Identifier used on the command line and in messages
    pub fn name(self) -> &'static str {
        match self {
            EvmVersion::Homestead => "homestead",
            EvmVersion::TangerineWhistle => "tangerineWhistle",
            EvmVersion::SpuriousDragon => "spuriousDragon",
            EvmVersion::Byzantium => "byzantium",
            EvmVersion::Constantinople => "constantinople",
            EvmVersion::Petersburg => "petersburg",
            EvmVersion::Istanbul => "istanbul",
            EvmVersion::Berlin => "berlin",
            EvmVersion::London => "london",
            EvmVersion::Paris => "paris",
            EvmVersion::Shanghai => "shanghai",
            EvmVersion::Cancun => "cancun",
            EvmVersion::Prague => "prague",
        }
    }

    /// Capitalized fork name
    pub fn fork_name(self) -> &'static str {
        match self {
            EvmVersion::Homestead => "Homestead",
            EvmVersion::TangerineWhistle => "Tangerine Whistle",
            EvmVersion::SpuriousDragon => "Spurious Dragon",
            EvmVersion::Byzantium => "Byzantium",
            EvmVersion::Constantinople => "Constantinople",
            EvmVersion::Petersburg => "Petersburg",
            EvmVersion::Istanbul => "Istanbul",
            EvmVersion::Berlin => "Berlin",
            EvmVersion::London => "London",
            EvmVersion::Paris => "Paris",
            EvmVersion::Shanghai => "Shanghai",
            EvmVersion::Cancun => "Cancun",
            EvmVersion::Prague => "Prague",
        }
    }
}

impl fmt::Display for EvmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EvmVersion {
    type Err = UnknownEvmVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EvmVersion::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEvmVersion(s.to_string()))
    }
}
