//! # Viewer Command Backends
//!
//! Turns range selections into commands for an external molecular viewer and writes those
//! commands out in the viewer's own grammar.
//!
//! ## Architecture
//!
//! - **Shared formatting** ([`format`]) - Range tokens, the selection macro, attribute names
//!   and value escaping, as pure functions
//! - **Strategy trait** ([`StructureCommands`]) - The command catalogue. Operations common to
//!   every viewer (colour-by-sequence, set-attributes, superposition) are provided methods
//!   built on the small set of grammar-specific operations each backend implements
//! - **Backends** ([`pymol`], [`chimera`]) - One unit struct per viewer grammar
//!
//! Backends differ in their atom-spec syntax, colour literals and verbs, and in how a list
//! of commands is packed into transport payloads: PyMOL takes exactly one command per
//! XML-RPC call, while Chimera accepts a compound `;`-separated script per request.

pub mod chimera;
pub mod format;
pub mod pymol;

use crate::core::alignment::StructureRef;
use crate::core::models::colour::Colour;
use crate::core::models::command::Command;
use crate::core::models::groups::{ColourGroups, FeatureGroups};
use crate::core::models::ranges::{AtomSpecType, RangeModel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerKind {
    Pymol,
    Chimera,
}

static PYMOL: pymol::PymolCommands = pymol::PymolCommands;
static CHIMERA: chimera::ChimeraCommands = chimera::ChimeraCommands;

impl ViewerKind {
    pub fn commands(&self) -> &'static dyn StructureCommands {
        match self {
            ViewerKind::Pymol => &PYMOL,
            ViewerKind::Chimera => &CHIMERA,
        }
    }

    /// File extension of a runnable command script.
    pub fn script_extension(&self) -> &'static str {
        match self {
            ViewerKind::Pymol => "pml",
            ViewerKind::Chimera => "cmd",
        }
    }
}

impl FromStr for ViewerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pymol" => Ok(ViewerKind::Pymol),
            "chimera" => Ok(ViewerKind::Chimera),
            other => Err(format!("Unknown viewer '{}'", other)),
        }
    }
}

impl fmt::Display for ViewerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerKind::Pymol => f.write_str("pymol"),
            ViewerKind::Chimera => f.write_str("chimera"),
        }
    }
}

/// The command catalogue of one viewer grammar.
pub trait StructureCommands: Send + Sync {
    fn viewer(&self) -> ViewerKind;

    /// Renders a selection in this viewer's atom-spec syntax.
    ///
    /// # Arguments
    ///
    /// * `model` - The residues to address.
    /// * `spec_type` - Whether to address whole residues, alpha carbons or phosphates.
    ///
    /// # Return
    ///
    /// The atom spec, or an empty string for an empty selection.
    fn atom_spec(&self, model: &RangeModel, spec_type: AtomSpecType) -> String;

    /// Renders a selection restricted to the given backbone atom and to a single
    /// alternate location, for use in a fit.
    fn fit_spec(&self, model: &RangeModel, spec_type: AtomSpecType) -> String;

    fn colour_literal(&self, colour: Colour) -> String;

    /// Namespaced attribute name for a feature type.
    fn attribute_name(&self, feature_type: &str) -> String {
        format::attribute_name(feature_type)
    }

    fn colour_by_chain(&self) -> Command;
    fn colour_by_charge(&self) -> Vec<Command>;
    fn colour_residues(&self, atom_spec: &str, colour: Colour) -> Command;
    fn set_background_colour(&self, colour: Colour) -> Command;
    fn focus_view(&self) -> Command;
    fn show_backbone(&self) -> Vec<Command>;
    fn show_chains(&self, chains: &[StructureRef]) -> Vec<Command>;
    fn load_file(&self, path: &str) -> Command;
    fn open_session(&self, path: &str) -> Command;
    fn save_session(&self, path: &str) -> Command;
    fn close_viewer(&self) -> Command;
    fn run_command_file(&self, path: &str) -> Command;

    /// Sets `attribute` to an already quoted value on every residue of `atom_spec`.
    fn set_attribute(&self, attribute: &str, quoted_value: &str, atom_spec: &str) -> Command;

    /// Toggles the viewer's undo history, or `None` when the grammar has no such command.
    fn set_history_tracking(&self, enabled: bool) -> Option<Command>;

    /// Fits `moving_spec` onto `reference_spec`.
    fn fit(&self, reference_spec: &str, moving_spec: &str) -> Command;

    fn show_cartoon(&self, reference_spec: &str, moving_spec: &str) -> Command;

    /// One line of a runnable command file.
    fn script_line(&self, command: &Command) -> String;

    /// Packs commands into the payloads the viewer's control channel accepts, one request
    /// per payload.
    fn payloads(&self, commands: &[Command]) -> Vec<String>;

    fn to_script(&self, commands: &[Command]) -> String {
        commands
            .iter()
            .map(|command| self.script_line(command) + "\n")
            .collect()
    }

    /// One colour command per distinct colour, in the order the colours were first seen.
    fn colour_by_sequence(&self, groups: &ColourGroups) -> Vec<Command> {
        groups
            .iter()
            .map(|(colour, model)| {
                self.colour_residues(&self.atom_spec(model, AtomSpecType::ResidueOnly), *colour)
            })
            .collect()
    }

    /// One attribute command per distinct `(feature type, value)` pair.
    fn set_attributes(&self, groups: &FeatureGroups) -> Vec<Command> {
        groups
            .iter()
            .map(|(key, model)| {
                self.set_attribute(
                    &self.attribute_name(&key.feature_type),
                    &format::quote_attribute_value(&key.value),
                    &self.atom_spec(model, AtomSpecType::ResidueOnly),
                )
            })
            .collect()
    }

    /// The fixed superposition sequence: undo history off, the fit on single-altloc
    /// backbone atoms, undo history on, then both full selections shown as cartoon.
    ///
    /// The command count differs by backend. PyMOL gets all four commands; Chimera has
    /// no history toggles, so it gets only the fit and the cartoon (two commands).
    ///
    /// `spec_type` selects the fitted backbone atom; a whole-residue request is fitted on
    /// alpha carbons.
    fn superpose_structures(
        &self,
        reference: &RangeModel,
        moving: &RangeModel,
        spec_type: AtomSpecType,
    ) -> Vec<Command> {
        let fit_type = match spec_type {
            AtomSpecType::ResidueOnly => AtomSpecType::Alpha,
            other => other,
        };
        [
            self.set_history_tracking(false),
            Some(self.fit(
                &self.fit_spec(reference, fit_type),
                &self.fit_spec(moving, fit_type),
            )),
            self.set_history_tracking(true),
            Some(self.show_cartoon(
                &self.atom_spec(reference, AtomSpecType::ResidueOnly),
                &self.atom_spec(moving, AtomSpecType::ResidueOnly),
            )),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_kind_parses_and_resolves_its_backend() {
        assert_eq!("PyMOL".parse::<ViewerKind>(), Ok(ViewerKind::Pymol));
        assert_eq!("chimera".parse::<ViewerKind>(), Ok(ViewerKind::Chimera));
        assert!("rasmol".parse::<ViewerKind>().is_err());
        assert_eq!(ViewerKind::Pymol.commands().viewer(), ViewerKind::Pymol);
        assert_eq!(ViewerKind::Chimera.commands().viewer(), ViewerKind::Chimera);
    }
}
