use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical page format of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageFormat {
    #[default]
    #[serde(alias = "a4")]
    A4,
    #[serde(alias = "letter")]
    Letter,
}

impl PageFormat {
    /// Page dimensions in millimetres, portrait.
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (215.9, 279.4),
        }
    }
}

impl FromStr for PageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "letter" => Ok(PageFormat::Letter),
            other => Err(format!("unknown page format: {} (expected A4 or Letter)", other)),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFormat::A4 => write!(f, "A4"),
            PageFormat::Letter => write!(f, "Letter"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Apply the orientation to portrait dimensions.
    pub fn apply(&self, (width, height): (f32, f32)) -> (f32, f32) {
        match self {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }
}

/// Edge sizes in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub bottom: f32,
    #[serde(default)]
    pub left: f32,
}

impl Margins {
    pub fn uniform(value: f32) -> Self {
        Margins { top: value, right: value, bottom: value, left: value }
    }
}
