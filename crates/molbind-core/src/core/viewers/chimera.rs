use super::{StructureCommands, ViewerKind, format};
use crate::core::alignment::StructureRef;
use crate::core::models::colour::Colour;
use crate::core::models::command::Command;
use crate::core::models::ranges::{AtomSpecType, RangeModel};
use itertools::Itertools;

/// Excludes every alternate location other than the blank or first one.
const NO_ALTLOCS: &str = "&~@.B-Z&~@.2-9";

/// Commands for Chimera, sent as compound scripts over its REST interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChimeraCommands;

impl ChimeraCommands {
    fn atom_suffix(spec_type: AtomSpecType) -> String {
        match spec_type {
            AtomSpecType::ResidueOnly => String::new(),
            AtomSpecType::Alpha => format!("@CA{}", NO_ALTLOCS),
            AtomSpecType::Phosphate => format!("@P{}", NO_ALTLOCS),
        }
    }
}

impl StructureCommands for ChimeraCommands {
    fn viewer(&self) -> ViewerKind {
        ViewerKind::Chimera
    }

    /// `#model:range.chain,range.chain` per model, models joined by `|`.
    fn atom_spec(&self, model: &RangeModel, spec_type: AtomSpecType) -> String {
        let suffix = Self::atom_suffix(spec_type);
        model
            .iter_models()
            .map(|(model_id, chains)| {
                let ranges = chains
                    .iter()
                    .flat_map(|(chain, ranges)| {
                        ranges
                            .iter()
                            .map(move |range| format!("{}.{}", format::range_token(range), chain))
                    })
                    .join(",");
                format!("#{}:{}{}", model_id, ranges, suffix)
            })
            .join("|")
    }

    fn fit_spec(&self, model: &RangeModel, spec_type: AtomSpecType) -> String {
        self.atom_spec(model, spec_type)
    }

    fn colour_literal(&self, colour: Colour) -> String {
        colour.to_hex()
    }

    /// Chimera reserves attribute names ending in `color` for colour values.
    fn attribute_name(&self, feature_type: &str) -> String {
        let mut name = format::attribute_name(feature_type);
        if name.to_ascii_uppercase().ends_with("COLOR") {
            name.push('_');
        }
        name
    }

    fn colour_by_chain(&self) -> Command {
        Command::with_params("rainbow", ["chain"])
    }

    fn colour_by_charge(&self) -> Vec<Command> {
        vec![
            Command::with_params("color", ["white"]),
            Command::with_params("color", ["red", "::ASP,GLU"]),
            Command::with_params("color", ["blue", "::LYS,ARG"]),
            Command::with_params("color", ["yellow", "::CYS"]),
        ]
    }

    fn colour_residues(&self, atom_spec: &str, colour: Colour) -> Command {
        Command::with_params("color", [self.colour_literal(colour), atom_spec.to_string()])
    }

    fn set_background_colour(&self, colour: Colour) -> Command {
        Command::with_params("set", ["bgColor".to_string(), self.colour_literal(colour)])
    }

    fn focus_view(&self) -> Command {
        Command::new("focus")
    }

    fn show_backbone(&self) -> Vec<Command> {
        vec![
            Command::with_params("~display", ["all"]),
            Command::new("~ribbon"),
            Command::with_params("chain", ["@CA|P"]),
        ]
    }

    fn show_chains(&self, chains: &[StructureRef]) -> Vec<Command> {
        let selection = chains
            .iter()
            .map(|s| format!("#{}:.{}", s.model, s.chain.trim()))
            .join("|");
        vec![
            Command::with_params("~display", ["all"]),
            Command::new("~ribbon"),
            Command::with_params("ribbon", [selection]),
        ]
    }

    fn load_file(&self, path: &str) -> Command {
        Command::with_params("open", [path])
    }

    fn open_session(&self, path: &str) -> Command {
        Command::with_params("open", [format!("chimera:{}", path)])
    }

    fn save_session(&self, path: &str) -> Command {
        Command::with_params("save", [path])
    }

    fn close_viewer(&self) -> Command {
        Command::with_params("stop", ["really"])
    }

    fn run_command_file(&self, path: &str) -> Command {
        Command::with_params("open", [format!("cmd:{}", path)])
    }

    fn set_attribute(&self, attribute: &str, quoted_value: &str, atom_spec: &str) -> Command {
        Command::with_params("setattr", ["res", attribute, quoted_value, atom_spec])
    }

    fn set_history_tracking(&self, _enabled: bool) -> Option<Command> {
        None
    }

    fn fit(&self, reference_spec: &str, moving_spec: &str) -> Command {
        Command::with_params("match", [moving_spec, reference_spec])
    }

    fn show_cartoon(&self, reference_spec: &str, moving_spec: &str) -> Command {
        Command::with_params("ribbon", [format!("{}|{}", moving_spec, reference_spec)])
    }

    fn script_line(&self, command: &Command) -> String {
        command.to_string()
    }

    /// All commands merged into a single `;`-separated compound script.
    fn payloads(&self, commands: &[Command]) -> Vec<String> {
        if commands.is_empty() {
            return Vec::new();
        }
        vec![commands.iter().map(|c| self.script_line(c)).join(";")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::feature::FeatureKey;
    use crate::core::models::groups::{ColourGroups, FeatureGroups};

    fn cmd(name: &str, params: &[&str]) -> Command {
        Command::with_params(name, params.iter().copied())
    }

    #[test]
    fn atom_spec_lists_ranges_per_model_with_altloc_filter_on_alpha() {
        let mut model = RangeModel::new();
        model.add_range("1", 2, 4, "A");
        model.add_range("1", 8, 8, "A");
        model.add_range("1", 5, 7, "B");
        model.add_range("0", 1, 4, "B");
        model.add_range("0", 5, 9, "C");
        model.add_range("5", 25, 35, " ");

        assert_eq!(
            ChimeraCommands.atom_spec(&model, AtomSpecType::ResidueOnly),
            "#0:1-4.B,5-9.C|#1:2-4.A,8.A,5-7.B|#5:25-35."
        );
        assert_eq!(
            ChimeraCommands.atom_spec(&model, AtomSpecType::Alpha),
            "#0:1-4.B,5-9.C@CA&~@.B-Z&~@.2-9|#1:2-4.A,8.A,5-7.B@CA&~@.B-Z&~@.2-9|#5:25-35.@CA&~@.B-Z&~@.2-9"
        );
        assert_eq!(
            ChimeraCommands.atom_spec(&RangeModel::new(), AtomSpecType::Alpha),
            ""
        );
    }

    #[test]
    fn colour_by_sequence_is_one_command_per_colour_merged_into_one_payload() {
        let mut groups = ColourGroups::new();
        groups.add_range(Colour::rgb(0, 0, 255), "0", 2, 5, "A");
        groups.add_range(Colour::rgb(0, 0, 255), "1", 1, 1, "A");
        groups.add_range(Colour::rgb(255, 255, 0), "1", 3, 5, "A");
        groups.add_range(Colour::rgb(255, 0, 0), "0", 3, 9, "A");

        let commands = ChimeraCommands.colour_by_sequence(&groups);
        assert_eq!(commands.len(), 3);
        assert_eq!(
            ChimeraCommands.payloads(&commands),
            vec![
                "color #0000ff #0:2-5.A|#1:1.A;color #ffff00 #1:3-5.A;color #ff0000 #0:3-9.A"
                    .to_string()
            ]
        );
        assert!(ChimeraCommands.payloads(&[]).is_empty());
    }

    #[test]
    fn superposition_skips_history_toggles_and_keeps_fit_then_ribbon() {
        let mut reference = RangeModel::new();
        reference.add_range("1", 12, 14, "A");
        let mut moving = RangeModel::new();
        moving.add_range("2", 15, 17, "B");

        let commands =
            ChimeraCommands.superpose_structures(&reference, &moving, AtomSpecType::Alpha);
        assert_eq!(
            commands,
            vec![
                cmd(
                    "match",
                    &["#2:15-17.B@CA&~@.B-Z&~@.2-9", "#1:12-14.A@CA&~@.B-Z&~@.2-9"]
                ),
                cmd("ribbon", &["#2:15-17.B|#1:12-14.A"]),
            ]
        );
    }

    #[test]
    fn attribute_names_ending_in_color_get_a_trailing_underscore() {
        assert_eq!(ChimeraCommands.attribute_name("helixColor"), "mb_helixColor_");
        assert_eq!(ChimeraCommands.attribute_name("kd"), "mb_kd");

        let mut groups = FeatureGroups::new();
        groups.add_range(FeatureKey::new("metal", "it's zinc"), "1", 5, 7, "A");
        assert_eq!(
            ChimeraCommands.set_attributes(&groups),
            vec![cmd("setattr", &["res", "mb_metal", "'it&#39;s zinc'", "#1:5-7.A"])]
        );
    }

    #[test]
    fn fixed_catalogue_commands_match_chimera_grammar() {
        let script = ChimeraCommands.to_script(&ChimeraCommands.colour_by_charge());
        assert_eq!(
            script,
            "color white\ncolor red ::ASP,GLU\ncolor blue ::LYS,ARG\ncolor yellow ::CYS\n"
        );
        assert_eq!(
            ChimeraCommands.payloads(&ChimeraCommands.show_backbone()),
            vec!["~display all;~ribbon;chain @CA|P".to_string()]
        );
        assert_eq!(
            ChimeraCommands
                .set_background_colour(Colour::rgb(255, 175, 175))
                .to_string(),
            "set bgColor #ffafaf"
        );
        assert_eq!(ChimeraCommands.close_viewer().to_string(), "stop really");
        assert_eq!(ChimeraCommands.colour_by_chain().to_string(), "rainbow chain");
        assert_eq!(
            ChimeraCommands.open_session("/s.py").to_string(),
            "open chimera:/s.py"
        );
        assert_eq!(
            ChimeraCommands.run_command_file("/x.cmd").to_string(),
            "open cmd:/x.cmd"
        );
        assert_eq!(
            ChimeraCommands.show_chains(&[StructureRef::protein("0", "A")])[2].to_string(),
            "ribbon #0:.A"
        );
    }
}
