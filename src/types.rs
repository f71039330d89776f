//! Card data passed through to the compositor.
//!
//! These fields are opaque to the positioning pipeline. They are loaded from
//! a TOML/JSON card file or edited through the studio, and only the
//! compositor reads them (for text and badge placement). Limits below mirror
//! what the editing UI allows; nothing downstream enforces them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum characters in the card name.
pub const NAME_MAX_CHARS: usize = 12;
/// Maximum characters in the descriptive type ("Mouse", "Flame", ...).
pub const DESC_TYPE_MAX_CHARS: usize = 10;
/// Maximum characters in the flavor text.
pub const FLAVOR_MAX_CHARS: usize = 120;
/// Maximum characters in a move name.
pub const MOVE_NAME_MAX_CHARS: usize = 12;
/// HP values that have a badge asset.
pub const HP_OPTIONS: [u32; 10] = [30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
/// Highest retreat cost with an icon layout.
pub const MAX_RETREAT_COST: u8 = 3;

/// Energy type: selects the frame art and the energy icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    #[default]
    Colorless,
    Fire,
    Water,
    Grass,
    Lightning,
    Psychic,
    Fighting,
}

impl EnergyType {
    pub const ALL: [EnergyType; 7] = [
        EnergyType::Colorless,
        EnergyType::Fire,
        EnergyType::Water,
        EnergyType::Grass,
        EnergyType::Lightning,
        EnergyType::Psychic,
        EnergyType::Fighting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyType::Colorless => "colorless",
            EnergyType::Fire => "fire",
            EnergyType::Water => "water",
            EnergyType::Grass => "grass",
            EnergyType::Lightning => "lightning",
            EnergyType::Psychic => "psychic",
            EnergyType::Fighting => "fighting",
        }
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnergyType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown energy type: {s}"))
    }
}

/// Weakness or resistance: an energy type, or `"none"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Affinity {
    #[default]
    None,
    Energy(EnergyType),
}

impl Affinity {
    pub fn energy(self) -> Option<EnergyType> {
        match self {
            Affinity::None => None,
            Affinity::Energy(t) => Some(t),
        }
    }
}

impl TryFrom<String> for Affinity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let v = value.trim();
        if v.is_empty() || v.eq_ignore_ascii_case("none") {
            Ok(Affinity::None)
        } else {
            v.parse().map(Affinity::Energy)
        }
    }
}

impl From<Affinity> for String {
    fn from(value: Affinity) -> Self {
        match value {
            Affinity::None => "none".to_string(),
            Affinity::Energy(t) => t.as_str().to_string(),
        }
    }
}

/// One attack: name and damage text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Move {
    pub name: String,
    pub damage: String,
}

/// Every non-photo field on the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardData {
    pub name: String,
    #[serde(rename = "type")]
    pub energy_type: EnergyType,
    /// Descriptive type, e.g. "Mouse" in "Mouse Pokemon".
    pub desc_type: String,
    pub flavor_text: String,
    pub hp: u32,
    pub move1: Move,
    pub move2: Move,
    pub weakness: Affinity,
    pub resistance: Affinity,
    pub retreat_cost: u8,
    /// Display text, e.g. `5'3"`. See [`length_from_slider`].
    pub length: String,
    /// Display text without unit, e.g. `"13.2"`. See [`weight_from_slider`].
    pub weight: String,
}

impl Default for CardData {
    fn default() -> Self {
        Self {
            name: "MissingNo.".to_string(),
            energy_type: EnergyType::Colorless,
            desc_type: String::new(),
            flavor_text: String::new(),
            hp: 30,
            move1: Move::default(),
            move2: Move::default(),
            weakness: Affinity::None,
            resistance: Affinity::None,
            retreat_cost: 0,
            length: length_from_slider(1),
            weight: weight_from_slider(1),
        }
    }
}

impl CardData {
    /// The centred line under the photo.
    pub fn description_line(&self) -> String {
        format!(
            "{} Pokemon. Length: {}, Weight: {} lbs.",
            self.desc_type, self.length, self.weight
        )
    }

    /// Filename offered for download.
    pub fn download_filename(&self) -> String {
        download_filename(&self.name)
    }

    /// Copy with free-text fields cut to the editor's limits and the retreat
    /// cost capped at [`MAX_RETREAT_COST`].
    pub fn truncated_to_limits(&self) -> Self {
        let cut = |s: &str, n: usize| s.chars().take(n).collect::<String>();
        Self {
            name: cut(&self.name, NAME_MAX_CHARS),
            desc_type: cut(&self.desc_type, DESC_TYPE_MAX_CHARS),
            flavor_text: cut(&self.flavor_text, FLAVOR_MAX_CHARS),
            move1: Move {
                name: cut(&self.move1.name, MOVE_NAME_MAX_CHARS),
                ..self.move1.clone()
            },
            move2: Move {
                name: cut(&self.move2.name, MOVE_NAME_MAX_CHARS),
                ..self.move2.clone()
            },
            retreat_cost: self.retreat_cost.min(MAX_RETREAT_COST),
            ..self.clone()
        }
    }
}

/// `"{name}.png"`, or `"pokemon-card.png"` for a blank name.
///
/// Path separators are replaced so the result is always a bare filename.
pub fn download_filename(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "pokemon-card.png".to_string();
    }
    let safe: String = trimmed
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            other => other,
        })
        .collect();
    format!("{safe}.png")
}

/// Length slider value (inches, 1–360) → `F'` or `F'I"`.
pub fn length_from_slider(inches: u32) -> String {
    let feet = inches / 12;
    let rest = inches % 12;
    if rest == 0 {
        format!("{feet}'")
    } else {
        format!("{feet}'{rest}\"")
    }
}

/// Weight slider value (1–592) → pounds text.
///
/// The first 100 steps are tenths of a pound; after that each step is a
/// whole pound starting at 9.
pub fn weight_from_slider(value: u32) -> String {
    if value <= 100 {
        format!("{:.1}", value as f64 / 10.0)
    } else {
        (value - 92).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_type_round_trips_names() {
        for t in EnergyType::ALL {
            assert_eq!(t.as_str().parse::<EnergyType>().unwrap(), t);
        }
        assert!("plasma".parse::<EnergyType>().is_err());
    }

    #[test]
    fn affinity_parses_none_and_types() {
        assert_eq!(Affinity::try_from("none".to_string()), Ok(Affinity::None));
        assert_eq!(Affinity::try_from(String::new()), Ok(Affinity::None));
        assert_eq!(
            Affinity::try_from("Water".to_string()),
            Ok(Affinity::Energy(EnergyType::Water))
        );
        assert!(Affinity::try_from("steel".to_string()).is_err());
    }

    #[test]
    fn parse_card_toml() {
        let toml = r#"
name = "Sparky"
type = "lightning"
desc_type = "Mouse"
hp = 60
weakness = "fighting"
retreat_cost = 2

[move1]
name = "Zap"
damage = "20"
"#;
        let card: CardData = toml::from_str(toml).unwrap();
        assert_eq!(card.name, "Sparky");
        assert_eq!(card.energy_type, EnergyType::Lightning);
        assert_eq!(card.weakness, Affinity::Energy(EnergyType::Fighting));
        assert_eq!(card.resistance, Affinity::None);
        assert_eq!(card.move1.damage, "20");
        assert_eq!(card.move2, Move::default());
        assert_eq!(card.retreat_cost, 2);
    }

    #[test]
    fn unknown_card_field_rejected() {
        let result: Result<CardData, _> = toml::from_str("nmae = \"typo\"");
        assert!(result.is_err());
    }

    #[test]
    fn description_line_format() {
        let card = CardData {
            desc_type: "Flame".into(),
            length: "2'".into(),
            weight: "19".into(),
            ..CardData::default()
        };
        assert_eq!(
            card.description_line(),
            "Flame Pokemon. Length: 2', Weight: 19 lbs."
        );
    }

    #[test]
    fn length_slider_text() {
        assert_eq!(length_from_slider(1), "0'1\"");
        assert_eq!(length_from_slider(12), "1'");
        assert_eq!(length_from_slider(63), "5'3\"");
        assert_eq!(length_from_slider(360), "30'");
    }

    #[test]
    fn weight_slider_text() {
        assert_eq!(weight_from_slider(1), "0.1");
        assert_eq!(weight_from_slider(100), "10.0");
        assert_eq!(weight_from_slider(101), "9");
        assert_eq!(weight_from_slider(592), "500");
    }

    #[test]
    fn download_filename_from_name() {
        assert_eq!(download_filename("Sparky"), "Sparky.png");
        assert_eq!(download_filename("  "), "pokemon-card.png");
        assert_eq!(download_filename("a/b"), "a-b.png");
    }

    #[test]
    fn truncation_respects_char_limits() {
        let card = CardData {
            name: "ÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉ".into(),
            flavor_text: "x".repeat(200),
            ..CardData::default()
        };
        let cut = card.truncated_to_limits();
        assert_eq!(cut.name.chars().count(), NAME_MAX_CHARS);
        assert_eq!(cut.flavor_text.len(), FLAVOR_MAX_CHARS);
        assert_eq!(cut.hp, card.hp);
    }

    #[test]
    fn truncation_caps_retreat_cost() {
        let card = CardData {
            retreat_cost: 7,
            ..CardData::default()
        };
        assert_eq!(card.truncated_to_limits().retreat_cost, MAX_RETREAT_COST);

        let card = CardData {
            retreat_cost: 2,
            ..CardData::default()
        };
        assert_eq!(card.truncated_to_limits().retreat_cost, 2);
    }
}
