//! Pass 5: typed control settings.
//!
//! Known settings land in named fields; any other plain setting is kept in
//! `extra` under its normalized command. Later parts override earlier ones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::command::split_pipes;
use crate::component::Component;
use crate::error::Warning;
use crate::parts::{Part, PartKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// 2D timestep in seconds.
    pub timestep: Option<f64>,
    /// Simulation start, hours.
    pub start_time: Option<f64>,
    /// Simulation end, hours.
    pub end_time: Option<f64>,
    pub cell_size: Option<f64>,
    /// Seconds between map outputs.
    pub map_output_interval: Option<f64>,
    pub map_output_data_types: Vec<String>,
    pub output_folder: Option<PathBuf>,
    pub log_folder: Option<PathBuf>,
    pub model_scenarios: Vec<String>,
    pub model_events: Vec<String>,
    /// Unrecognized settings, by normalized command.
    pub extra: BTreeMap<String, String>,
}

impl ControlSettings {
    /// Build settings from the active parts of the 2D control component.
    pub fn from_component(component: &Component) -> (ControlSettings, Vec<Warning>) {
        let mut settings = ControlSettings::default();
        let mut warnings = Vec::new();
        for part in component.active_parts() {
            if let Err(warning) = settings.apply(part) {
                warnings.push(warning);
            }
        }
        (settings, warnings)
    }

    fn apply(&mut self, part: &Part) -> Result<(), Warning> {
        match part.command.as_str() {
            "timestep" => self.timestep = Some(number(part)?),
            "start time" => self.start_time = Some(number(part)?),
            "end time" => self.end_time = Some(number(part)?),
            "cell size" => self.cell_size = Some(number(part)?),
            "map output interval" => self.map_output_interval = Some(number(part)?),
            "map output data types" => {
                self.map_output_data_types = part
                    .value
                    .split_whitespace()
                    .map(str::to_owned)
                    .collect();
            }
            "output folder" => self.output_folder = folder(part),
            "log folder" => self.log_folder = folder(part),
            "model scenarios" => self.model_scenarios = split_pipes(&part.value),
            "model events" => self.model_events = split_pipes(&part.value),
            command => {
                if matches!(part.kind, PartKind::Setting | PartKind::OutputPath) {
                    self.extra.insert(command.to_owned(), part.value.clone());
                }
            }
        }
        Ok(())
    }
}

fn number(part: &Part) -> Result<f64, Warning> {
    part.value.trim().parse::<f64>().map_err(|_| Warning::InvalidSetting {
        file: part.source.file.clone(),
        line: part.source.line,
        command: part.command.clone(),
        value: part.value.clone(),
    })
}

fn folder(part: &Part) -> Option<PathBuf> {
    part.files.first().map(|f| f.path.clone())
}
