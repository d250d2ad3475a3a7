//! Mapping from the provider's coarse condition label to display identifiers.
//!
//! Every function here is total: labels outside the known set fall back to the
//! `Clear` visuals instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse weather category, as reported in `weather[0].main`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionMain {
    Clear,
    Clouds,
    Rain,
    Snow,
    /// Any other label ("Mist", "Thunderstorm", ...), kept verbatim.
    Other(String),
}

impl ConditionMain {
    /// Exact, case-sensitive match on the provider label.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Clear" => ConditionMain::Clear,
            "Clouds" => ConditionMain::Clouds,
            "Rain" => ConditionMain::Rain,
            "Snow" => ConditionMain::Snow,
            other => ConditionMain::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConditionMain::Clear => "Clear",
            ConditionMain::Clouds => "Clouds",
            ConditionMain::Rain => "Rain",
            ConditionMain::Snow => "Snow",
            ConditionMain::Other(label) => label,
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            ConditionMain::Clear => Icon::Sun,
            ConditionMain::Clouds => Icon::Cloud,
            ConditionMain::Rain => Icon::CloudRain,
            ConditionMain::Snow => Icon::Snowflake,
            ConditionMain::Other(_) => Icon::Sun,
        }
    }

    pub fn background(&self) -> Gradient {
        match self {
            ConditionMain::Clear => Gradient::Blue,
            ConditionMain::Clouds => Gradient::GreyBlue,
            ConditionMain::Rain => Gradient::Slate,
            ConditionMain::Snow => Gradient::Pale,
            ConditionMain::Other(_) => Gradient::Blue,
        }
    }
}

impl From<String> for ConditionMain {
    fn from(value: String) -> Self {
        ConditionMain::from_label(&value)
    }
}

impl From<ConditionMain> for String {
    fn from(value: ConditionMain) -> Self {
        match value {
            ConditionMain::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConditionMain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon shown next to the temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Sun,
    Cloud,
    CloudRain,
    Snowflake,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Sun => "sun",
            Icon::Cloud => "cloud",
            Icon::CloudRain => "cloud-rain",
            Icon::Snowflake => "snowflake",
        }
    }

    /// Terminal rendering of the icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Sun => "☀",
            Icon::Cloud => "☁",
            Icon::CloudRain => "🌧",
            Icon::Snowflake => "❄",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Background gradient reflecting the weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gradient {
    Blue,
    GreyBlue,
    Slate,
    Pale,
}

impl Gradient {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gradient::Blue => "blue",
            Gradient::GreyBlue => "grey-blue",
            Gradient::Slate => "slate",
            Gradient::Pale => "pale",
        }
    }

    /// Top and bottom colour stops.
    pub fn stops(&self) -> (&'static str, &'static str) {
        match self {
            Gradient::Blue => ("#2196F3", "#64B5F6"),
            Gradient::GreyBlue => ("#78909C", "#CFD8DC"),
            Gradient::Slate => ("#607D8B", "#B0BEC5"),
            Gradient::Pale => ("#B0BEC5", "#ECEFF1"),
        }
    }

    pub fn css(&self) -> String {
        let (top, bottom) = self.stops();
        format!("linear-gradient(to bottom, {top}, {bottom})")
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn icon_for(label: &str) -> Icon {
    ConditionMain::from_label(label).icon()
}

pub fn background_for(label: &str) -> Gradient {
    ConditionMain::from_label(label).background()
}
