use super::{StructureCommands, ViewerKind, format};
use crate::core::alignment::StructureRef;
use crate::core::models::colour::Colour;
use crate::core::models::command::Command;
use crate::core::models::ranges::{AtomSpecType, RangeModel};
use itertools::Itertools;

const SINGLE_ALTLOC: &str = "(altloc '' or altloc 'a')";

/// Commands for PyMOL, sent one per XML-RPC call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PymolCommands;

impl PymolCommands {
    fn residue_types(names: &[&str]) -> String {
        names.iter().map(|name| format!("resn {}", name)).join(" ")
    }
}

impl StructureCommands for PymolCommands {
    fn viewer(&self) -> ViewerKind {
        ViewerKind::Pymol
    }

    fn atom_spec(&self, model: &RangeModel, spec_type: AtomSpecType) -> String {
        format::selection_macro(model, spec_type)
    }

    fn fit_spec(&self, model: &RangeModel, spec_type: AtomSpecType) -> String {
        format!("({} and {})", self.atom_spec(model, spec_type), SINGLE_ALTLOC)
    }

    fn colour_literal(&self, colour: Colour) -> String {
        colour.to_hex_literal()
    }

    fn colour_by_chain(&self) -> Command {
        Command::with_params("spectrum", ["chain"])
    }

    fn colour_by_charge(&self) -> Vec<Command> {
        vec![
            Command::with_params("color", ["white", "*"]),
            Command::with_params("color", ["red".to_string(), Self::residue_types(&["ASP", "GLU"])]),
            Command::with_params("color", ["blue".to_string(), Self::residue_types(&["LYS", "ARG"])]),
            Command::with_params("color", ["yellow".to_string(), Self::residue_types(&["CYS"])]),
        ]
    }

    fn colour_residues(&self, atom_spec: &str, colour: Colour) -> Command {
        Command::with_params("color", [self.colour_literal(colour), atom_spec.to_string()])
    }

    fn set_background_colour(&self, colour: Colour) -> Command {
        Command::with_params("bg_color", [self.colour_literal(colour)])
    }

    fn focus_view(&self) -> Command {
        Command::new("zoom")
    }

    fn show_backbone(&self) -> Vec<Command> {
        vec![
            Command::with_params("hide", ["everything"]),
            Command::with_params("show", ["ribbon"]),
        ]
    }

    fn show_chains(&self, chains: &[StructureRef]) -> Vec<Command> {
        let selection = chains
            .iter()
            .map(|s| format!("{}//{}//", s.model, s.chain.trim()))
            .join(" ");
        vec![
            Command::with_params("hide", ["everything"]),
            Command::with_params("show", ["lines"]),
            Command::with_params("show", ["cartoon".to_string(), selection]),
        ]
    }

    fn load_file(&self, path: &str) -> Command {
        Command::with_params("load", [path])
    }

    fn open_session(&self, path: &str) -> Command {
        Command::with_params("load", [path, "", "0", "pse"])
    }

    fn save_session(&self, path: &str) -> Command {
        Command::with_params("save", [path])
    }

    fn close_viewer(&self) -> Command {
        Command::new("quit")
    }

    fn run_command_file(&self, path: &str) -> Command {
        Command::with_params("run", [path])
    }

    fn set_attribute(&self, attribute: &str, quoted_value: &str, atom_spec: &str) -> Command {
        Command::with_params(
            "iterate",
            [atom_spec.to_string(), format!("p.{}={}", attribute, quoted_value)],
        )
    }

    fn set_history_tracking(&self, enabled: bool) -> Option<Command> {
        Some(Command::new(if enabled { "undo_enable" } else { "undo_disable" }))
    }

    fn fit(&self, reference_spec: &str, moving_spec: &str) -> Command {
        Command::with_params("pair_fit", [moving_spec, reference_spec])
    }

    fn show_cartoon(&self, reference_spec: &str, moving_spec: &str) -> Command {
        Command::with_params(
            "show",
            ["cartoon".to_string(), format!("{} {}", reference_spec, moving_spec)],
        )
    }

    /// `name p1, p2`; empty parameters are written as `''`.
    fn script_line(&self, command: &Command) -> String {
        if command.params().is_empty() {
            return command.name().to_string();
        }
        let params = command
            .params()
            .iter()
            .map(|p| if p.is_empty() { "''" } else { p.as_str() })
            .join(", ");
        format!("{} {}", command.name(), params)
    }

    fn payloads(&self, commands: &[Command]) -> Vec<String> {
        commands.iter().map(xml_rpc_body).collect()
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The XML-RPC `methodCall` document for one command.
pub fn xml_rpc_body(command: &Command) -> String {
    let mut body = format!(
        "<methodCall><methodName>{}</methodName><params>",
        escape_xml(command.name())
    );
    for param in command.params() {
        body.push_str("<parameter><value>");
        body.push_str(&escape_xml(param));
        body.push_str("</value></parameter>");
    }
    body.push_str("</params></methodCall>");
    body
}
