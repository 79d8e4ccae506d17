use super::{Alignment, SequenceRenderer};
use crate::core::models::colour::Colour;
use phf::{Map, phf_map};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

static ZAPPO: Map<char, (u8, u8, u8)> = phf_map! {
    'A' => (255, 175, 175), 'I' => (255, 175, 175), 'L' => (255, 175, 175),
    'M' => (255, 175, 175), 'V' => (255, 175, 175),
    'R' => (100, 100, 255), 'H' => (100, 100, 255), 'K' => (100, 100, 255),
    'N' => (0, 255, 0), 'Q' => (0, 255, 0), 'S' => (0, 255, 0), 'T' => (0, 255, 0),
    'D' => (255, 0, 0), 'E' => (255, 0, 0),
    'C' => (255, 255, 0),
    'G' => (255, 0, 255), 'P' => (255, 0, 255),
    'F' => (255, 200, 0), 'W' => (255, 200, 0), 'Y' => (255, 200, 0),
};

static TAYLOR: Map<char, (u8, u8, u8)> = phf_map! {
    'A' => (204, 255, 0),
    'R' => (0, 0, 255),
    'N' => (204, 0, 255),
    'D' => (255, 0, 0),
    'C' => (255, 255, 0),
    'Q' => (255, 0, 204),
    'E' => (255, 0, 102),
    'G' => (255, 153, 0),
    'H' => (0, 102, 255),
    'I' => (102, 255, 0),
    'L' => (51, 255, 0),
    'K' => (102, 0, 255),
    'M' => (0, 255, 0),
    'F' => (0, 255, 102),
    'P' => (255, 204, 0),
    'S' => (255, 51, 0),
    'T' => (255, 102, 0),
    'W' => (0, 204, 255),
    'Y' => (0, 255, 204),
    'V' => (153, 255, 0),
};

static NUCLEOTIDE: Map<char, (u8, u8, u8)> = phf_map! {
    'A' => (100, 247, 63),
    'C' => (255, 179, 64),
    'G' => (235, 65, 60),
    'T' => (60, 136, 238),
    'U' => (60, 136, 238),
    'I' => (255, 255, 255),
    'X' => (255, 255, 255),
    'R' => (255, 255, 255),
    'Y' => (255, 255, 255),
    'N' => (255, 255, 255),
};

/// Maps a residue letter to the colour it is drawn in.
pub trait ResidueColours {
    fn colour_for(&self, residue: char) -> Colour;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueColourScheme {
    Zappo,
    Taylor,
    Nucleotide,
}

impl ResidueColourScheme {
    fn table(&self) -> &'static Map<char, (u8, u8, u8)> {
        match self {
            ResidueColourScheme::Zappo => &ZAPPO,
            ResidueColourScheme::Taylor => &TAYLOR,
            ResidueColourScheme::Nucleotide => &NUCLEOTIDE,
        }
    }
}

impl ResidueColours for ResidueColourScheme {
    fn colour_for(&self, residue: char) -> Colour {
        self.table()
            .get(&residue.to_ascii_uppercase())
            .map(|&(r, g, b)| Colour::rgb(r, g, b))
            .unwrap_or(Colour::WHITE)
    }
}

impl FromStr for ResidueColourScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zappo" => Ok(ResidueColourScheme::Zappo),
            "taylor" => Ok(ResidueColourScheme::Taylor),
            "nucleotide" => Ok(ResidueColourScheme::Nucleotide),
            other => Err(format!("Unknown colour scheme '{}'", other)),
        }
    }
}

impl fmt::Display for ResidueColourScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResidueColourScheme::Zappo => "zappo",
            ResidueColourScheme::Taylor => "taylor",
            ResidueColourScheme::Nucleotide => "nucleotide",
        };
        f.write_str(name)
    }
}

/// A residue colour table supplied by the user. Letters are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserColourScheme {
    residues: HashMap<char, Colour>,
    default: Colour,
}

impl UserColourScheme {
    pub fn new(default: Colour) -> Self {
        Self {
            residues: HashMap::new(),
            default,
        }
    }

    pub fn set(&mut self, residue: char, colour: Colour) {
        self.residues.insert(residue.to_ascii_uppercase(), colour);
    }
}

impl ResidueColours for UserColourScheme {
    fn colour_for(&self, residue: char) -> Colour {
        self.residues
            .get(&residue.to_ascii_uppercase())
            .copied()
            .unwrap_or(self.default)
    }
}

/// Colours every aligned residue by its letter.
pub struct SchemeRenderer<'a, A, S> {
    alignment: &'a A,
    scheme: S,
}

impl<'a, A: Alignment, S: ResidueColours> SchemeRenderer<'a, A, S> {
    pub fn new(alignment: &'a A, scheme: S) -> Self {
        Self { alignment, scheme }
    }
}

impl<A: Alignment, S: ResidueColours> SequenceRenderer for SchemeRenderer<'_, A, S> {
    fn colour_at(&self, sequence: usize, column: usize) -> Colour {
        match self.alignment.char_at(sequence, column) {
            Some(c) => self.scheme.colour_for(c),
            None => Colour::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::sequences::SequenceAlignment;

    #[test]
    fn zappo_groups_residues_by_physicochemical_class() {
        let zappo = ResidueColourScheme::Zappo;
        assert_eq!(zappo.colour_for('L'), Colour::rgb(255, 175, 175));
        assert_eq!(zappo.colour_for('k'), Colour::rgb(100, 100, 255));
        assert_eq!(zappo.colour_for('W'), Colour::rgb(255, 200, 0));
        assert_eq!(zappo.colour_for('X'), Colour::WHITE);
    }

    #[test]
    fn nucleotide_scheme_colours_bases_and_ambiguity_codes() {
        let nucleotide = ResidueColourScheme::Nucleotide;
        assert_eq!(nucleotide.colour_for('a'), Colour::rgb(100, 247, 63));
        assert_eq!(nucleotide.colour_for('G'), Colour::rgb(235, 65, 60));
        assert_eq!(nucleotide.colour_for('T'), nucleotide.colour_for('u'));
        for code in ['I', 'X', 'R', 'y', 'N'] {
            assert!(NUCLEOTIDE.contains_key(&code.to_ascii_uppercase()));
            assert_eq!(nucleotide.colour_for(code), Colour::WHITE, "code {}", code);
        }
    }

    #[test]
    fn scheme_names_parse_case_insensitively() {
        assert_eq!(
            "Taylor".parse::<ResidueColourScheme>(),
            Ok(ResidueColourScheme::Taylor)
        );
        assert!("clustal".parse::<ResidueColourScheme>().is_err());
        assert_eq!(ResidueColourScheme::Nucleotide.to_string(), "nucleotide");
    }

    #[test]
    fn user_scheme_falls_back_to_its_default() {
        let mut scheme = UserColourScheme::new(Colour::rgb(1, 2, 3));
        scheme.set('a', Colour::rgb(255, 0, 0));
        assert_eq!(scheme.colour_for('A'), Colour::rgb(255, 0, 0));
        assert_eq!(scheme.colour_for('C'), Colour::rgb(1, 2, 3));
    }

    #[test]
    fn renderer_reads_letters_from_the_alignment() {
        let alignment = SequenceAlignment::from_rows(&["DC", "G"]);
        let renderer = SchemeRenderer::new(&alignment, ResidueColourScheme::Zappo);
        assert_eq!(renderer.colour_at(0, 0), Colour::rgb(255, 0, 0));
        assert_eq!(renderer.colour_at(0, 1), Colour::rgb(255, 255, 0));
        assert_eq!(renderer.colour_at(1, 0), Colour::rgb(255, 0, 255));
        assert_eq!(renderer.colour_at(1, 1), Colour::WHITE);
    }
}
