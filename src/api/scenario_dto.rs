use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root of a scenario file: one airport, one capacity configuration and the
/// flight records to regulate.
#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDto {
    pub airport: AirportDto,
    pub capacity: CapacityConfigDto,
    #[serde(default)]
    pub options: OptionsDto,
    #[serde(default)]
    pub compliance: Option<ComplianceDto>,
    pub flights: Vec<FlightDto>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportDto {
    pub icao: String,
    #[serde(default)]
    pub utc_offset_hours: i32,
    #[serde(default = "default_taxi_out_minutes")]
    pub taxi_out_minutes: i64,
}

fn default_taxi_out_minutes() -> i64 {
    15
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityConfigDto {
    pub arrival_rate: i64,
    pub departure_rate: i64,
    pub min_separation_minutes: i64,
    #[serde(default)]
    pub events: Vec<CapacityEventDto>,
}

/// Events are kept in file order, which is also their priority order.
#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityEventDto {
    #[serde(default)]
    pub id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub arrival_rate: Option<i64>,
    #[serde(default)]
    pub departure_rate: Option<i64>,
    #[serde(default)]
    pub total_rate: Option<i64>,
    #[serde(default)]
    pub min_separation_minutes: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OptionsDto {
    pub policy: Option<String>,
    pub capacity_mode: Option<String>,
    pub separation_scope: Option<String>,
    pub max_search_minutes: Option<i64>,
    pub regulation_epsilon_minutes: Option<f64>,
    pub departure_floor_fraction: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDto {
    pub min_offset_minutes: Option<i64>,
    pub max_offset_minutes: Option<i64>,
    pub seed: Option<u64>,
}

/// A flight record as delivered by the ingestion layer. Everything except the
/// route may be missing; incomplete records are reported, not allocated.
#[derive(Debug, Deserialize, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightDto {
    #[serde(default)]
    pub callsign: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    /// `"arrival"` or `"departure"`; inferred from the route when absent.
    #[serde(default)]
    pub class: Option<String>,
    /// Landing time for arrivals, takeoff time for departures.
    #[serde(default)]
    pub desired_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub eobt: Option<DateTime<Utc>>,
    #[serde(default)]
    pub enroute_minutes: Option<i64>,
    #[serde(default)]
    pub origin_taxi_out_minutes: Option<i64>,
    #[serde(default)]
    pub aircraft_type: Option<String>,
}
