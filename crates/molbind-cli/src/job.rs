use crate::error::{CliError, Result};
use molbind::core::alignment::{StructureRef, is_gap_char};
use molbind::core::alignment::schemes::ResidueColourScheme;
use molbind::core::alignment::sequences::{AlignedSequence, ChainBinding, SequenceAlignment};
use molbind::core::models::colour::Colour;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileStructure {
    name: String,
    sequence: String,
    /// Model id of the loaded structure; absent for sequences with no structure.
    model: Option<String>,
    #[serde(default)]
    chain: String,
    #[serde(default = "default_first_residue")]
    first_residue: i32,
    #[serde(default)]
    unmapped: Vec<i32>,
    file: Option<PathBuf>,
    #[serde(default)]
    nucleotide: bool,
}

fn default_first_residue() -> i32 {
    1
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileColouring {
    scheme: Option<String>,
    scheme_file: Option<PathBuf>,
    colour_table: Option<PathBuf>,
    default_colour: Option<Colour>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct JobFile {
    #[serde(default)]
    hidden_columns: Vec<usize>,
    feature_table: Option<PathBuf>,
    session: Option<PathBuf>,
    #[serde(default)]
    colouring: FileColouring,
    structures: Vec<FileStructure>,
}

/// How the alignment colours its residues.
#[derive(Debug, Clone, PartialEq)]
pub enum Colouring {
    Scheme(ResidueColourScheme),
    SchemeFile(PathBuf),
    Table { path: PathBuf, default: Colour },
}

/// An alignment with its structure bindings, ready for the workflows.
#[derive(Debug)]
pub struct Job {
    pub alignment: SequenceAlignment,
    pub bindings: Vec<Option<ChainBinding>>,
    pub structures: Vec<Option<StructureRef>>,
    /// Structure files to load, each once, in first-mention order.
    pub files: Vec<PathBuf>,
    /// A saved viewer session opened instead of loading `files`.
    pub session: Option<PathBuf>,
    pub hidden: BTreeSet<usize>,
    pub colouring: Colouring,
    pub feature_table: Option<PathBuf>,
}

impl Job {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading job file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&content, base_dir).map_err(|e| match e {
            CliError::Other(source) => CliError::FileParsing {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses a job description; relative paths are resolved against `base_dir`.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self> {
        let file: JobFile = toml::from_str(content).map_err(|e| CliError::Other(e.into()))?;
        if file.structures.is_empty() {
            return Err(CliError::Job("at least one [[structures]] entry is required".into()));
        }
        let resolve = |p: &Path| -> PathBuf {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base_dir.join(p)
            }
        };

        let mut sequences = Vec::with_capacity(file.structures.len());
        let mut bindings = Vec::with_capacity(file.structures.len());
        let mut structures = Vec::with_capacity(file.structures.len());
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in &file.structures {
            sequences.push(AlignedSequence::new(&entry.name, &entry.sequence));
            match &entry.model {
                Some(model) => {
                    let binding = ChainBinding::new(model, &entry.chain, entry.first_residue)
                        .with_unmapped(entry.unmapped.iter().copied());
                    let residues = entry.sequence.chars().filter(|&c| !is_gap_char(c)).count();
                    if residues > 0 && binding.last_residue(residues).is_none() {
                        return Err(CliError::Job(format!(
                            "structure '{}': {} residue(s) numbered from {} overflow the residue range",
                            entry.name, residues, entry.first_residue
                        )));
                    }
                    bindings.push(Some(binding));
                    structures.push(Some(StructureRef {
                        model: model.clone(),
                        chain: entry.chain.clone(),
                        nucleotide: entry.nucleotide,
                    }));
                }
                None => {
                    bindings.push(None);
                    structures.push(None);
                }
            }
            if let Some(structure_file) = &entry.file {
                let resolved = resolve(structure_file);
                if !files.contains(&resolved) {
                    files.push(resolved);
                }
            }
        }

        let colouring = Self::colouring(&file.colouring, &resolve)?;
        Ok(Self {
            alignment: SequenceAlignment::new(sequences),
            bindings,
            structures,
            files,
            session: file.session.as_deref().map(&resolve),
            hidden: file.hidden_columns.into_iter().collect(),
            colouring,
            feature_table: file.feature_table.as_deref().map(&resolve),
        })
    }

    fn colouring(
        colouring: &FileColouring,
        resolve: &impl Fn(&Path) -> PathBuf,
    ) -> Result<Colouring> {
        match (
            &colouring.scheme,
            &colouring.scheme_file,
            &colouring.colour_table,
        ) {
            (None, None, None) => Ok(Colouring::Scheme(ResidueColourScheme::Zappo)),
            (Some(name), None, None) => name
                .parse()
                .map(Colouring::Scheme)
                .map_err(CliError::Job),
            (None, Some(path), None) => Ok(Colouring::SchemeFile(resolve(path))),
            (None, None, Some(path)) => Ok(Colouring::Table {
                path: resolve(path),
                default: colouring.default_colour.unwrap_or(Colour::WHITE),
            }),
            _ => Err(CliError::Job(
                "[colouring] takes only one of 'scheme', 'scheme-file' or 'colour-table'".into(),
            )),
        }
    }

    pub fn bound_structures(&self) -> usize {
        self.structures.iter().flatten().count()
    }
}
