//! The fixed palette of feelings and the record created every time one is picked.

pub mod entities;

use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Closed set of preset labels a user can log. Serialized as the label itself, so the stored
/// JSON is readable without this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feeling {
    #[serde(rename = "饥饿")]
    Hunger,
    #[serde(rename = "头晕")]
    Dizziness,
    #[serde(rename = "疲倦")]
    Fatigue,
    #[serde(rename = "焦虑")]
    Anxiety,
    #[serde(rename = "胃痛")]
    StomachAche,
    #[serde(rename = "心慌")]
    Palpitations,
    #[serde(rename = "呼吸急促")]
    ShortnessOfBreath,
    #[serde(rename = "手脚冰凉")]
    ColdExtremities,
}

impl Feeling {
    /// Palette in display order.
    pub const ALL: [Feeling; 8] = [
        Feeling::Hunger,
        Feeling::Dizziness,
        Feeling::Fatigue,
        Feeling::Anxiety,
        Feeling::StomachAche,
        Feeling::Palpitations,
        Feeling::ShortnessOfBreath,
        Feeling::ColdExtremities,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Feeling::Hunger => "饥饿",
            Feeling::Dizziness => "头晕",
            Feeling::Fatigue => "疲倦",
            Feeling::Anxiety => "焦虑",
            Feeling::StomachAche => "胃痛",
            Feeling::Palpitations => "心慌",
            Feeling::ShortnessOfBreath => "呼吸急促",
            Feeling::ColdExtremities => "手脚冰凉",
        }
    }

    /// Latin alias, handy for typing on keyboards without a Chinese input method.
    pub fn alias(self) -> &'static str {
        match self {
            Feeling::Hunger => "hunger",
            Feeling::Dizziness => "dizziness",
            Feeling::Fatigue => "fatigue",
            Feeling::Anxiety => "anxiety",
            Feeling::StomachAche => "stomach-ache",
            Feeling::Palpitations => "palpitations",
            Feeling::ShortnessOfBreath => "short-breath",
            Feeling::ColdExtremities => "cold-hands",
        }
    }

    /// Looks up a feeling by its 1-based position in [Feeling::ALL].
    pub fn from_position(position: usize) -> Option<Feeling> {
        position
            .checked_sub(1)
            .and_then(|index| Feeling::ALL.get(index).copied())
    }
}

impl Display for Feeling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Feeling {
    type Err = anyhow::Error;

    /// Accepts the label, the alias (case insensitive) or a palette position.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(position) = s.parse::<usize>() {
            return Feeling::from_position(position)
                .ok_or_else(|| anyhow!("There is no feeling number {position}"));
        }
        Feeling::ALL
            .into_iter()
            .find(|v| v.label() == s || v.alias().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("Unknown feeling {s}"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use anyhow::Result;

    use super::Feeling;

    #[test]
    fn test_parse_label_alias_and_position() -> Result<()> {
        assert_eq!("饥饿".parse::<Feeling>()?, Feeling::Hunger);
        assert_eq!("Anxiety".parse::<Feeling>()?, Feeling::Anxiety);
        assert_eq!(" 8 ".parse::<Feeling>()?, Feeling::ColdExtremities);
        assert_eq!("1".parse::<Feeling>()?, Feeling::Hunger);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_outside_palette() {
        assert!("0".parse::<Feeling>().is_err());
        assert!("9".parse::<Feeling>().is_err());
        assert!("happy".parse::<Feeling>().is_err());
        assert!("".parse::<Feeling>().is_err());
    }

    #[test]
    fn test_labels_serialize_verbatim() -> Result<()> {
        for feeling in Feeling::ALL {
            let json = serde_json::to_string(&feeling)?;
            assert_eq!(json, format!("\"{}\"", feeling.label()));
        }
        assert!(serde_json::from_str::<Feeling>("\"开心\"").is_err());
        Ok(())
    }

    #[test]
    fn test_palette_is_unique() {
        let labels = Feeling::ALL.iter().map(|v| v.label()).collect::<HashSet<_>>();
        let aliases = Feeling::ALL.iter().map(|v| v.alias()).collect::<HashSet<_>>();
        assert_eq!(labels.len(), Feeling::ALL.len());
        assert_eq!(aliases.len(), Feeling::ALL.len());
    }
}
