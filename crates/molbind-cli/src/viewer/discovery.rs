use molbind::core::viewers::ViewerKind;
use molbind::engine::transport::LaunchError;
use std::path::{Path, PathBuf};
use tracing::debug;

const CHIMERA_VERSIONS: &[&str] = &[
    "1.16.2", "1.16.1", "1.16", "1.15.2", "1.15.1", "1.15", "1.14.2", "1.14.1", "1.14", "1.13.1",
    "1.13", "1.12.2", "1.12.1", "1.12", "1.11.2", "1.11.1", "1.11",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

pub fn home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_default()
}

/// Executable locations to try, in order: the user's preference first, then the usual
/// install locations for `platform`.
pub fn candidate_paths(
    viewer: ViewerKind,
    platform: Platform,
    home: &Path,
    preferred: Option<&Path>,
) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = preferred.map(Path::to_path_buf).into_iter().collect();
    match viewer {
        ViewerKind::Pymol => paths.extend(pymol_paths(platform, home)),
        ViewerKind::Chimera => paths.extend(chimera_paths(platform, home)),
    }
    paths
}

fn pymol_paths(platform: Platform, home: &Path) -> Vec<PathBuf> {
    match platform {
        Platform::Linux => vec![
            PathBuf::from("/usr/local/pymol/bin/PyMOL"),
            PathBuf::from("/usr/local/bin/PyMOL"),
            PathBuf::from("/usr/bin/PyMOL"),
            home.join("opt/bin/PyMOL"),
        ],
        Platform::Windows => {
            let home = home.display();
            let roots = [
                format!("{}\\AppData\\Local", home),
                "\\ProgramData".to_string(),
                "C:\\ProgramData".to_string(),
                home.to_string(),
                "\\Program Files".to_string(),
                "C:\\Program Files".to_string(),
                "\\Program Files (x86)".to_string(),
                "C:\\Program Files (x86)".to_string(),
            ];
            let mut paths = Vec::new();
            for root in &roots {
                for dir in ["Schrodinger\\PyMOL2", "PyMOL"] {
                    for binary in ["PyMOLWinWithConsole.bat", "Scripts\\pymol.exe", "PyMOLWin.exe"] {
                        paths.push(PathBuf::from(format!("{}\\{}\\{}", root, dir, binary)));
                    }
                }
            }
            paths
        }
        Platform::MacOs => vec![PathBuf::from("/Applications/PyMOL.app/Contents/MacOS/PyMOL")],
    }
}

fn chimera_paths(platform: Platform, home: &Path) -> Vec<PathBuf> {
    match platform {
        Platform::Linux => {
            let mut paths = vec![
                PathBuf::from("/usr/bin/chimera"),
                PathBuf::from("/usr/local/bin/chimera"),
                PathBuf::from("/usr/lib/ucsf-chimera/bin/chimera"),
                PathBuf::from("/usr/libexec/UCSF-Chimera/bin/chimera"),
                PathBuf::from("/usr/local/chimera/bin/chimera"),
            ];
            for dir in ["bin", "opt/bin", "local/bin"] {
                paths.push(home.join(dir).join("chimera"));
            }
            paths
        }
        Platform::Windows => {
            let roots = [
                "\\Program Files".to_string(),
                "C:\\Program Files".to_string(),
                "\\Program Files (x86)".to_string(),
                "C:\\Program Files (x86)".to_string(),
                format!("{}\\AppData\\Local", home.display()),
            ];
            let mut paths = Vec::new();
            for root in &roots {
                let dirs = CHIMERA_VERSIONS
                    .iter()
                    .map(|version| format!("Chimera {}", version))
                    .chain(std::iter::once("Chimera".to_string()));
                for dir in dirs {
                    let path = format!("{}\\{}\\bin\\chimera", root, dir);
                    paths.push(PathBuf::from(format!("{}.exe", path)));
                    paths.push(PathBuf::from(path));
                }
            }
            paths
        }
        Platform::MacOs => {
            let mut paths = Vec::new();
            for version in CHIMERA_VERSIONS {
                let app = format!("Applications/Chimera-{}.app/Contents/MacOS/chimera", version);
                paths.push(Path::new("/").join(&app));
                paths.push(home.join(&app));
            }
            let app = "Applications/Chimera.app/Contents/MacOS/chimera";
            paths.push(Path::new("/").join(app));
            paths.push(home.join(app));
            paths
        }
    }
}

/// Command-line arguments that make `executable` start with its control server enabled.
pub fn launch_args(viewer: ViewerKind, executable: &Path) -> Vec<String> {
    match viewer {
        ViewerKind::Pymol => {
            let mut args = Vec::new();
            let is_pymolwin = executable
                .to_string_lossy()
                .to_ascii_lowercase()
                .ends_with("pymolwin.exe");
            if is_pymolwin {
                args.push("+2".to_string());
            }
            args.push("-R".to_string());
            args
        }
        ViewerKind::Chimera => vec!["--start".to_string(), "RESTServer".to_string()],
    }
}

/// The first candidate that exists as a file.
pub fn find_executable(viewer: ViewerKind, candidates: Vec<PathBuf>) -> Result<PathBuf, LaunchError> {
    for candidate in &candidates {
        if candidate.is_file() {
            debug!(viewer = %viewer, path = ?candidate, "Found viewer executable.");
            return Ok(candidate.clone());
        }
    }
    Err(LaunchError::NoExecutable {
        viewer,
        tried: candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_path_is_tried_first() {
        let paths = candidate_paths(
            ViewerKind::Pymol,
            Platform::Linux,
            Path::new("/home/ana"),
            Some(Path::new("/opt/pymol/PyMOL")),
        );
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/opt/pymol/PyMOL"),
                PathBuf::from("/usr/local/pymol/bin/PyMOL"),
                PathBuf::from("/usr/local/bin/PyMOL"),
                PathBuf::from("/usr/bin/PyMOL"),
                PathBuf::from("/home/ana/opt/bin/PyMOL"),
            ]
        );
    }

    #[test]
    fn windows_pymol_crosses_roots_dirs_and_launchers() {
        let paths = candidate_paths(ViewerKind::Pymol, Platform::Windows, Path::new("C:\\Users\\ana"), None);
        assert_eq!(paths.len(), 8 * 2 * 3);
        assert_eq!(
            paths[0],
            PathBuf::from("C:\\Users\\ana\\AppData\\Local\\Schrodinger\\PyMOL2\\PyMOLWinWithConsole.bat")
        );
        assert!(paths.contains(&PathBuf::from("C:\\ProgramData\\PyMOL\\PyMOLWin.exe")));
    }

    #[test]
    fn chimera_has_locations_on_every_platform() {
        for platform in [Platform::Linux, Platform::Windows, Platform::MacOs] {
            let paths = candidate_paths(ViewerKind::Chimera, platform, Path::new("/home/ana"), None);
            assert!(!paths.is_empty());
        }
        let mac = candidate_paths(ViewerKind::Chimera, Platform::MacOs, Path::new("/Users/ana"), None);
        assert_eq!(
            mac.last(),
            Some(&PathBuf::from("/Users/ana/Applications/Chimera.app/Contents/MacOS/chimera"))
        );
    }

    #[test]
    fn launch_args_enable_the_control_server() {
        assert_eq!(launch_args(ViewerKind::Pymol, Path::new("/usr/bin/PyMOL")), vec!["-R"]);
        assert_eq!(
            launch_args(ViewerKind::Pymol, Path::new("C:\\PyMOL\\PyMOLWin.exe")),
            vec!["+2", "-R"]
        );
        assert_eq!(
            launch_args(ViewerKind::Chimera, Path::new("/usr/bin/chimera")),
            vec!["--start", "RESTServer"]
        );
    }

    #[test]
    fn find_executable_reports_every_location_tried() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("PyMOL");
        std::fs::write(&present, "").unwrap();
        let missing = dir.path().join("missing");

        let found = find_executable(ViewerKind::Pymol, vec![missing.clone(), present.clone()]).unwrap();
        assert_eq!(found, present);

        match find_executable(ViewerKind::Chimera, vec![missing.clone()]) {
            Err(LaunchError::NoExecutable { tried, .. }) => assert_eq!(tried, vec![missing]),
            other => panic!("Expected NoExecutable, got {:?}", other),
        }
    }
}
