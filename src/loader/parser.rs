use serde::de::DeserializeOwned;
use std::fs;

use crate::api::scenario_dto::ScenarioDto;
use crate::error::{Error, Result};

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: &str) -> Result<T> {
    let data = fs::read_to_string(file_path).map_err(Error::IoError)?;

    parse_json_str(&data)
}

pub fn parse_json_str<T: DeserializeOwned>(data: &str) -> Result<T> {
    let parsed_data: T = serde_json::from_str(data).map_err(Error::DeserializationError)?;

    Ok(parsed_data)
}

pub fn load_scenario(file_path: &str) -> Result<ScenarioDto> {
    log::info!("Loading scenario from '{}'.", file_path);
    parse_json_file::<ScenarioDto>(file_path)
}
