use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameFormat {
    #[serde(rename = "7v7")]
    SevenASide,
    #[serde(rename = "9v9")]
    NineASide,
    #[serde(rename = "11v11")]
    #[default]
    ElevenASide,
}

impl GameFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameFormat::SevenASide => "7v7",
            GameFormat::NineASide => "9v9",
            GameFormat::ElevenASide => "11v11",
        }
    }

    pub fn players_per_side(&self) -> usize {
        match self {
            GameFormat::SevenASide => 7,
            GameFormat::NineASide => 9,
            GameFormat::ElevenASide => 11,
        }
    }
}

impl fmt::Display for GameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7v7" => Ok(GameFormat::SevenASide),
            "9v9" => Ok(GameFormat::NineASide),
            "11v11" => Ok(GameFormat::ElevenASide),
            other => Err(format!("unknown game format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum LineRole {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormationSlot {
    pub name: String,
    pub role: LineRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Formation {
    pub id: String,
    pub name: String,
    pub format: GameFormat,
    pub slots: Vec<FormationSlot>,
}

impl Formation {
    pub fn has_slot(&self, name: &str) -> bool {
        self.slots.iter().any(|slot| slot.name == name)
    }
}
