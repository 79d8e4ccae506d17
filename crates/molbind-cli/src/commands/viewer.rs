use crate::cli::{ViewerArgs, ViewerCommands};
use crate::error::Result;
use crate::settings::Settings;
use crate::viewer::discovery::{self, Platform};
use molbind::core::viewers::ViewerKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub async fn run(args: ViewerArgs) -> Result<()> {
    let settings_path = Settings::default_path()?;
    match args.command {
        ViewerCommands::Paths => handle_paths(&settings_path),
        ViewerCommands::SetPath { viewer, path } => handle_set_path(&settings_path, viewer, path),
        ViewerCommands::ResetPath { viewer } => handle_reset_path(&settings_path, viewer),
    }
}

fn handle_paths(settings_path: &Path) -> Result<()> {
    let settings = Settings::load_from(settings_path)?;
    let home = discovery::home_dir();
    for viewer in [ViewerKind::Pymol, ViewerKind::Chimera] {
        println!("{}:", viewer);
        let preferred = settings.viewer_path(viewer);
        for path in discovery::candidate_paths(viewer, Platform::current(), &home, preferred) {
            let marker = if path.is_file() { "✓" } else { " " };
            let tag = if Some(path.as_path()) == preferred {
                " (preferred)"
            } else {
                ""
            };
            println!("  {} {}{}", marker, path.display(), tag);
        }
    }
    Ok(())
}

fn handle_set_path(settings_path: &Path, viewer: ViewerKind, path: PathBuf) -> Result<()> {
    if !path.is_file() {
        warn!(path = ?path, "Preferred viewer executable does not exist (yet).");
    }
    let mut settings = Settings::load_from(settings_path)?;
    settings.set_viewer_path(viewer, Some(path.clone()));
    settings.save_to(settings_path)?;
    info!(viewer = %viewer, path = ?path, "Viewer path preference saved.");
    println!("✓ {} will be launched from {}", viewer, path.display());
    Ok(())
}

fn handle_reset_path(settings_path: &Path, viewer: ViewerKind) -> Result<()> {
    let mut settings = Settings::load_from(settings_path)?;
    settings.set_viewer_path(viewer, None);
    settings.save_to(settings_path)?;
    println!("✓ {} path reset to the default search locations", viewer);
    Ok(())
}
