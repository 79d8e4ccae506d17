use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static NAMED_COLOURS: Map<&'static str, (u8, u8, u8)> = phf_map! {
    "white" => (255, 255, 255),
    "black" => (0, 0, 0),
    "red" => (255, 0, 0),
    "green" => (0, 255, 0),
    "blue" => (0, 0, 255),
    "yellow" => (255, 255, 0),
    "orange" => (255, 200, 0),
    "pink" => (255, 175, 175),
    "magenta" => (255, 0, 255),
    "cyan" => (0, 255, 255),
    "grey" => (128, 128, 128),
    "gray" => (128, 128, 128),
    "mid-blue" => (100, 100, 255),
};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Invalid colour '{0}': expected a colour name, '#rrggbb' or '0xrrggbb'")]
pub struct ParseColourError(pub String);

/// An opaque RGB colour as rendered for a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Sentinel assigned to residues in hidden columns.
    pub const GREY_HIDDEN: Colour = Colour::rgb(128, 128, 128);
    pub const WHITE: Colour = Colour::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn named(name: &str) -> Option<Self> {
        NAMED_COLOURS
            .get(name.to_ascii_lowercase().as_str())
            .map(|&(r, g, b)| Self::rgb(r, g, b))
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `0xrrggbb`, lowercase.
    pub fn to_hex_literal(&self) -> String {
        format!("0x{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn from_hex_digits(digits: &str) -> Option<Self> {
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::rgb(
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ))
    }
}

impl FromStr for Colour {
    type Err = ParseColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = if let Some(digits) = trimmed.strip_prefix('#') {
            Self::from_hex_digits(digits)
        } else if let Some(digits) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Self::from_hex_digits(digits)
        } else {
            Self::named(trimmed)
        };
        parsed.ok_or_else(|| ParseColourError(s.to_string()))
    }
}

impl TryFrom<String> for Colour {
    type Error = ParseColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_hex()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
