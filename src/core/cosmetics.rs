//! Cosmetic catalogue: accessories and environments.
//!
//! Both are closed sets. Display metadata is an exhaustive match so adding a
//! variant without a name is a compile error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GatorError;

/// Something the gator can wear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Accessory {
    /// Sentinel: no accessory. Always unlocked.
    #[default]
    None,
    Bow,
    Hat,
    Glasses,
    Scarf,
    Flower,
    Crown,
    Headphones,
}

impl Accessory {
    /// Every accessory, in catalogue order.
    pub fn all() -> &'static [Accessory] {
        &[
            Self::None,
            Self::Bow,
            Self::Hat,
            Self::Glasses,
            Self::Scarf,
            Self::Flower,
            Self::Crown,
            Self::Headphones,
        ]
    }

    /// Stable identifier used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bow => "bow",
            Self::Hat => "hat",
            Self::Glasses => "glasses",
            Self::Scarf => "scarf",
            Self::Flower => "flower",
            Self::Crown => "crown",
            Self::Headphones => "headphones",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Bow => "Bow",
            Self::Hat => "Hat",
            Self::Glasses => "Glasses",
            Self::Scarf => "Scarf",
            Self::Flower => "Flower",
            Self::Crown => "Crown",
            Self::Headphones => "Headphones",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "Just your friendly gator!",
            Self::Bow => "A cute little bow",
            Self::Hat => "A stylish hat",
            Self::Glasses => "Cool shades",
            Self::Scarf => "A cozy scarf",
            Self::Flower => "A pretty flower",
            Self::Crown => "For royalty!",
            Self::Headphones => "Music lover vibes",
        }
    }
}

impl fmt::Display for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accessory {
    type Err = GatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| GatorError::invalid_input(format!("unknown accessory '{}'", s)))
    }
}

/// A scene the gator can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Starting environment. Always unlocked.
    #[default]
    Pond,
    Garden,
    Beach,
    Forest,
    CozyRoom,
    StarryNight,
}

impl Environment {
    /// Every environment, in catalogue order.
    pub fn all() -> &'static [Environment] {
        &[
            Self::Pond,
            Self::Garden,
            Self::Beach,
            Self::Forest,
            Self::CozyRoom,
            Self::StarryNight,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pond => "pond",
            Self::Garden => "garden",
            Self::Beach => "beach",
            Self::Forest => "forest",
            Self::CozyRoom => "cozy_room",
            Self::StarryNight => "starry_night",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pond => "Cozy Pond",
            Self::Garden => "Garden",
            Self::Beach => "Beach",
            Self::Forest => "Forest",
            Self::CozyRoom => "Cozy Room",
            Self::StarryNight => "Starry Night",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Pond => "A peaceful pond",
            Self::Garden => "A beautiful garden",
            Self::Beach => "Sandy shores",
            Self::Forest => "A peaceful forest",
            Self::CozyRoom => "A warm, comfy room",
            Self::StarryNight => "Under the stars",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = GatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| GatorError::invalid_input(format!("unknown environment '{}'", s)))
    }
}
