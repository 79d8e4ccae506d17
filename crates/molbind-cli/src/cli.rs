use clap::{Args, Parser, Subcommand, ValueEnum};
use molbind::core::viewers::ViewerKind;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "molbind - Drive PyMOL or Chimera from a sequence alignment: colour residues, transfer feature annotations and superpose structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Colour structure residues the way the alignment colours them (or by chain / charge).
    Colour(ColourArgs),
    /// Superpose every bound structure onto the first one over the shared aligned columns.
    Superpose(SuperposeArgs),
    /// Copy sequence feature annotations onto structure residues as viewer attributes.
    Attributes(AttributesArgs),
    /// Manage the viewer executables molbind launches.
    Viewer(ViewerArgs),
}

/// Where generated commands go, shared by every action subcommand.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Path to the job file (TOML) describing the alignment and its structures.
    #[arg(required = true, value_name = "JOB")]
    pub job: PathBuf,

    /// The viewer whose command language is generated.
    #[arg(long, default_value = "pymol", value_name = "VIEWER")]
    pub viewer: ViewerKind,

    /// Write the commands as a runnable script (.pml for PyMOL, .cmd for Chimera).
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Launch the viewer, load the job's structures and send the commands to it.
    #[arg(long)]
    pub send: bool,

    /// Send to a viewer already listening on this control port instead of launching one.
    #[arg(long, value_name = "N")]
    pub port: Option<u16>,

    /// Centre the view on the structures after the commands have run.
    #[arg(long)]
    pub focus: bool,

    /// Save the viewer session to this path after the commands have run.
    #[arg(long, value_name = "PATH")]
    pub save_session: Option<PathBuf>,

    /// Quit the viewer once everything has been sent.
    #[arg(long)]
    pub close: bool,

    /// Set a specific configuration value, overriding the settings file.
    /// Can be used multiple times. Example: -S timeouts.reply-ms=30000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

impl TargetArgs {
    pub fn sends(&self) -> bool {
        self.send || self.port.is_some()
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColourBy {
    /// The alignment's residue colours (scheme, scheme file or colour table from the job).
    #[default]
    Sequence,
    /// One colour per chain.
    Chain,
    /// Acidic red, basic blue, cysteine yellow, everything else white.
    Charge,
}

#[derive(Args, Debug)]
pub struct ColourArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// What to colour by.
    #[arg(long, value_enum, default_value_t = ColourBy::Sequence)]
    pub by: ColourBy,

    /// Also set the viewer background colour (#rrggbb, 0xrrggbb or a colour name).
    #[arg(long, value_name = "COLOUR")]
    pub background: Option<String>,
}

#[derive(Args, Debug)]
pub struct SuperposeArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct AttributesArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct ViewerArgs {
    #[command(subcommand)]
    pub command: ViewerCommands,
}

#[derive(Subcommand, Debug)]
pub enum ViewerCommands {
    /// List the executable locations tried for each viewer, marking those that exist.
    Paths,
    /// Prefer a specific executable for a viewer.
    SetPath {
        #[arg(required = true)]
        viewer: ViewerKind,
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Forget the preferred executable for a viewer.
    ResetPath {
        #[arg(required = true)]
        viewer: ViewerKind,
    },
}
