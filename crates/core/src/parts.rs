//! Part factory: one typed record per decoded command line.
//!
//! Commands are classified by prefix against a fixed table; the first
//! matching entry wins, and anything unmatched is a plain setting.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ast::{Category, LogicType, Provenance};
use crate::command::{normalize_command, split_assignment, split_pipes, ASSIGN};
use crate::decode::DecodedLine;
use crate::error::Warning;
use crate::raw_file::FileId;
use crate::scan::{auto_estry_path, reference_category, ESTRY_AUTO};
use crate::source::resolve_relative;

// ──────────────────────────────────────────────
// Part types
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicTerm {
    If,
    ElseIf,
    Else,
    EndIf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "edge", rename_all = "snake_case")]
pub enum DomainEdge {
    Start1D,
    End1D,
    Start2D { name: Option<String> },
    End2D,
}

/// Closed classification of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartKind {
    /// Reference to another control file.
    ControlFile,
    /// GIS layer(s); several may be piped on one line.
    Gis,
    /// Leaf data file (materials, grids, databases).
    DataFile,
    /// Output or log location. Never split on pipes.
    OutputPath,
    SetVariable { name: String },
    Logic {
        term: LogicTerm,
        #[serde(skip_serializing_if = "Option::is_none")]
        logic_type: Option<LogicType>,
    },
    Domain(DomainEdge),
    Setting,
}

/// A file attached to a part, resolved against the owning file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// The value as written (after placeholder substitution).
    pub value: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Normalized command keyword. Never empty.
    pub command: String,
    pub kind: PartKind,
    /// Value as read from the file.
    pub raw_value: String,
    /// Value after placeholder substitution.
    pub value: String,
    pub files: Vec<FileRef>,
    pub source: Provenance,
    pub category: Category,
    /// Logic namespace of the innermost enclosing block, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logic: Option<LogicType>,
    /// Named 2D domain the part belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Whether the part survives the active scenarios and events.
    pub active: bool,
    /// File the part was read from.
    #[serde(skip)]
    pub origin: FileId,
}

impl Part {
    /// Pipe-separated parts of the resolved value.
    pub fn values(&self) -> Vec<String> {
        split_pipes(&self.value)
    }

    pub fn is_logic(&self) -> bool {
        matches!(self.kind, PartKind::Logic { .. })
    }

    /// Recompute attached files from the current value.
    pub fn refresh_files(&mut self) {
        self.files = attach_files(
            &self.kind,
            &self.command,
            &self.value,
            &self.source.file,
            self.category,
        );
    }
}

// ──────────────────────────────────────────────
// Factory
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Rule {
    ControlFile,
    Gis,
    DataFile,
    OutputPath,
    SetVariable,
    Setting,
}

/// Prefix table. Order matters: more specific prefixes first.
const COMMAND_TABLE: &[(&str, Rule)] = &[
    ("geometry control file", Rule::ControlFile),
    ("bc control file", Rule::ControlFile),
    ("estry control file", Rule::ControlFile),
    ("read file", Rule::ControlFile),
    ("read gis", Rule::Gis),
    ("read materials file", Rule::DataFile),
    ("read soils file", Rule::DataFile),
    ("read grid", Rule::DataFile),
    ("read tin", Rule::DataFile),
    ("bc database", Rule::DataFile),
    ("output folder", Rule::OutputPath),
    ("write check files", Rule::OutputPath),
    ("log folder", Rule::OutputPath),
    ("set variable", Rule::SetVariable),
];

/// Builds parts from decoded lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct PartFactory;

impl PartFactory {
    pub fn new() -> Self {
        PartFactory
    }

    /// Build the part for one line of `owner`. Lines that are neither an
    /// assignment nor a known directive come back as a warning.
    pub fn create_part(
        &self,
        line: &DecodedLine,
        owner: &Path,
        category: Category,
    ) -> Result<Part, Warning> {
        let source = Provenance::new(owner, line.number);
        let (command, value, kind) = match split_assignment(&line.text) {
            Some((command, value)) => {
                if command.is_empty() || value.is_empty() {
                    return Err(Warning::malformed_line(&source, &line.text));
                }
                let kind = match logic_kind(&command) {
                    Some(kind) => kind,
                    None => classify(&command, &line.text),
                };
                (command, value, kind)
            }
            None => {
                let command = normalize_command(&line.text);
                match directive_kind(&command, &line.text) {
                    Some(kind) => (command, String::new(), kind),
                    None => return Err(Warning::malformed_line(&source, &line.text)),
                }
            }
        };

        let files = attach_files(&kind, &command, &value, owner, category);
        Ok(Part {
            command,
            kind,
            raw_value: value.clone(),
            value,
            files,
            source,
            category,
            logic: None,
            domain: None,
            active: true,
            origin: FileId::default(),
        })
    }
}

fn classify(command: &str, text: &str) -> PartKind {
    let rule = COMMAND_TABLE
        .iter()
        .find(|(prefix, _)| command.starts_with(prefix))
        .map(|(_, rule)| *rule)
        .unwrap_or(Rule::Setting);
    match rule {
        Rule::ControlFile => PartKind::ControlFile,
        Rule::Gis => PartKind::Gis,
        Rule::DataFile => PartKind::DataFile,
        Rule::OutputPath => PartKind::OutputPath,
        Rule::SetVariable => {
            // Keep the name's original spelling; lookups fold case anyway.
            let raw_command = text.split(ASSIGN).next().unwrap_or_default();
            let name = raw_command
                .split_whitespace()
                .skip(2)
                .collect::<Vec<_>>()
                .join(" ");
            if name.is_empty() {
                PartKind::Setting
            } else {
                PartKind::SetVariable { name }
            }
        }
        Rule::Setting => PartKind::Setting,
    }
}

fn logic_kind(command: &str) -> Option<PartKind> {
    let (term, rest) = if let Some(rest) = command.strip_prefix("else if ") {
        (LogicTerm::ElseIf, rest)
    } else if let Some(rest) = command.strip_prefix("if ") {
        (LogicTerm::If, rest)
    } else {
        return None;
    };
    let logic_type = match rest {
        "scenario" => LogicType::Scenario,
        "event" => LogicType::Event,
        _ => return None,
    };
    Some(PartKind::Logic {
        term,
        logic_type: Some(logic_type),
    })
}

fn directive_kind(command: &str, text: &str) -> Option<PartKind> {
    let kind = match command {
        "else" => PartKind::Logic {
            term: LogicTerm::Else,
            logic_type: None,
        },
        "end if" => PartKind::Logic {
            term: LogicTerm::EndIf,
            logic_type: None,
        },
        "start 1d domain" => PartKind::Domain(DomainEdge::Start1D),
        "end 1d domain" => PartKind::Domain(DomainEdge::End1D),
        "end 2d domain" => PartKind::Domain(DomainEdge::End2D),
        c if c.starts_with(ESTRY_AUTO) => PartKind::ControlFile,
        c if c.starts_with("start 2d domain") => {
            // Name keeps its spelling from the file.
            let name = text.split_whitespace().skip(3).collect::<Vec<_>>().join(" ");
            PartKind::Domain(DomainEdge::Start2D {
                name: (!name.is_empty()).then_some(name),
            })
        }
        _ => return None,
    };
    Some(kind)
}

/// Files referenced by a part of the given kind.
fn attach_files(
    kind: &PartKind,
    command: &str,
    value: &str,
    owner: &Path,
    category: Category,
) -> Vec<FileRef> {
    match kind {
        PartKind::ControlFile => {
            if command.starts_with(ESTRY_AUTO)
                || (command == "estry control file" && value.eq_ignore_ascii_case("auto"))
            {
                let path = auto_estry_path(owner);
                return vec![FileRef {
                    value: path.display().to_string(),
                    path,
                }];
            }
            if reference_category(command, category).is_none() || value.is_empty() {
                return Vec::new();
            }
            vec![file_ref(owner, value)]
        }
        PartKind::Gis => split_pipes(value)
            .into_iter()
            .filter(|v| v.parse::<f64>().is_err())
            .map(|v| {
                if Path::new(&v).extension().is_none() {
                    file_ref(owner, &format!("{}.mif", v))
                } else {
                    file_ref(owner, &v)
                }
            })
            .collect(),
        PartKind::DataFile => split_pipes(value)
            .into_iter()
            .next()
            .map(|v| vec![file_ref(owner, &v)])
            .unwrap_or_default(),
        PartKind::OutputPath => vec![file_ref(owner, value.trim())],
        _ => Vec::new(),
    }
}

fn file_ref(owner: &Path, value: &str) -> FileRef {
    FileRef {
        value: value.to_owned(),
        path: resolve_relative(owner, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(text: &str) -> Result<Part, Warning> {
        let line = DecodedLine {
            number: 3,
            text: text.to_owned(),
        };
        PartFactory::new().create_part(&line, Path::new("/m/runs/root.tcf"), Category::Control)
    }

    #[test]
    fn setting_keeps_value_and_provenance() {
        let p = make("Map Output  Data Types == h v d").unwrap();
        assert_eq!(p.command, "map output data types");
        assert_eq!(p.value, "h v d");
        assert_eq!(p.kind, PartKind::Setting);
        assert_eq!(p.source, Provenance::new("/m/runs/root.tcf", 3));
        assert!(p.files.is_empty());
    }

    #[test]
    fn control_file_reference_keeps_resolved_attachment() {
        let p = make("Geometry Control File == ../model/geom.tgc").unwrap();
        assert_eq!(p.kind, PartKind::ControlFile);
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].path, PathBuf::from("/m/model/geom.tgc"));
    }

    #[test]
    fn estry_auto_directive_is_a_control_file_part() {
        let p = make("ESTRY Control File Auto").unwrap();
        assert_eq!(p.kind, PartKind::ControlFile);
        assert_eq!(p.value, "");
        assert_eq!(p.files[0].path, PathBuf::from("/m/runs/root.ecf"));
    }

    #[test]
    fn gis_parts_attach_every_piped_file() {
        let p = make("Read GIS Z Shape == ../gis/z_L.shp | ../gis/z_P | 0.5").unwrap();
        assert_eq!(p.kind, PartKind::Gis);
        let paths: Vec<_> = p.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/m/gis/z_L.shp"),
                PathBuf::from("/m/gis/z_P.mif"),
            ]
        );
    }

    #[test]
    fn data_file_attaches_only_first_pipe_element() {
        let p = make("Read Materials File == ../mat.csv | 1.2").unwrap();
        assert_eq!(p.kind, PartKind::DataFile);
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].path, PathBuf::from("/m/mat.csv"));
    }

    #[test]
    fn output_folder_is_not_split() {
        let p = make("Output Folder == ../results | odd").unwrap();
        assert_eq!(p.kind, PartKind::OutputPath);
        assert_eq!(p.files.len(), 1);
    }

    #[test]
    fn set_variable_keeps_name_spelling() {
        let p = make("Set Variable  Cell_Size == 5").unwrap();
        assert_eq!(
            p.kind,
            PartKind::SetVariable {
                name: "Cell_Size".to_string()
            }
        );
        assert_eq!(p.value, "5");
    }

    #[test]
    fn logic_commands_are_classified() {
        let p = make("If Scenario == BAS | DEV").unwrap();
        assert_eq!(
            p.kind,
            PartKind::Logic {
                term: LogicTerm::If,
                logic_type: Some(LogicType::Scenario)
            }
        );
        assert_eq!(p.values(), vec!["BAS".to_string(), "DEV".to_string()]);
        let p = make("Else If Event == Q100").unwrap();
        assert!(matches!(
            p.kind,
            PartKind::Logic {
                term: LogicTerm::ElseIf,
                logic_type: Some(LogicType::Event)
            }
        ));
        assert!(matches!(
            make("END IF").unwrap().kind,
            PartKind::Logic {
                term: LogicTerm::EndIf,
                ..
            }
        ));
    }

    #[test]
    fn named_2d_domain_start() {
        let p = make("start 2d domain  Upper Reach").unwrap();
        assert_eq!(
            p.kind,
            PartKind::Domain(DomainEdge::Start2D {
                name: Some("Upper Reach".to_string())
            })
        );
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(matches!(make("Timestep 2"), Err(Warning::MalformedLine { .. })));
        assert!(matches!(make("Timestep =="), Err(Warning::MalformedLine { .. })));
        assert!(matches!(make(" == 2"), Err(Warning::MalformedLine { .. })));
    }

    #[test]
    fn refresh_files_follows_new_value() {
        let mut p = make("Read GIS Code == <<GIS>>/code.shp").unwrap();
        p.value = "../gis/code.shp".to_string();
        p.refresh_files();
        assert_eq!(p.files[0].path, PathBuf::from("/m/gis/code.shp"));
    }
}
