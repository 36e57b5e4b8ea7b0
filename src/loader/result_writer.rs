use std::fs::File;
use std::io::Write;

use chrono::{DateTime, TimeZone};

use crate::domain::allocation::allocated_flight::AllocationOutcome;
use crate::domain::regulation::regulation_record::RegulationRecord;
use crate::error::Result;

const HEADERS: [&str; 14] = [
    "Callsign",
    "Class",
    "Origin",
    "Destination",
    "DesiredUtc",
    "RegulatedUtc",
    "RegulatedLocal",
    "DelayMinutes",
    "Regulated",
    "Outcome",
    "CtotUtc",
    "CtotLocal",
    "CtotApproximate",
    "ActualUtc",
];

/// Writes the records as `;`-separated CSV with a header row.
pub fn write_records<W: Write>(writer: W, records: &[RegulationRecord]) -> Result<()> {
    let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

    csv_wtr.write_record(HEADERS)?;

    for record in records {
        csv_wtr.write_record(to_row(record))?;
    }

    csv_wtr.flush()?;
    Ok(())
}

pub fn write_records_to_file(file_path: &str, records: &[RegulationRecord]) -> Result<()> {
    let file = File::create(file_path)?;
    write_records(file, records)?;

    log::info!("Wrote {} regulation records to '{}'.", records.len(), file_path);
    Ok(())
}

fn to_row(record: &RegulationRecord) -> Vec<String> {
    vec![
        record.callsign.to_string(),
        record.class.to_string(),
        record.origin.to_string(),
        record.destination.to_string(),
        timestamp(&record.desired_utc),
        timestamp(&record.regulated_utc),
        timestamp(&record.regulated_local),
        format!("{:.1}", record.delay_minutes),
        record.regulated.to_string(),
        outcome_name(record.outcome).to_string(),
        record.ctot_utc.as_ref().map(timestamp).unwrap_or_default(),
        record.ctot_local.as_ref().map(timestamp).unwrap_or_default(),
        record.ctot_approximate.to_string(),
        record.actual_utc.as_ref().map(timestamp).unwrap_or_default(),
    ]
}

fn timestamp<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.format("%Y-%m-%d %H:%M").to_string()
}

fn outcome_name(outcome: AllocationOutcome) -> &'static str {
    match outcome {
        AllocationOutcome::Allocated => "allocated",
        AllocationOutcome::PassedThrough => "passed-through",
        AllocationOutcome::Exhausted => "exhausted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::allocated_flight::AllocatedFlight;
    use crate::domain::flight::flight::{Flight, FlightClass};
    use crate::domain::regulation::result_formatter::ResultFormatter;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_csv_layout() {
        let desired = Utc.with_ymd_and_hms(2025, 3, 14, 8, 0, 0).unwrap();
        let flight = Flight::new("VJ130", "VVTS", "VVDN", FlightClass::Departure, desired);
        let formatter = ResultFormatter::new(FixedOffset::east_opt(7 * 3600).unwrap(), 0.1);
        let record = formatter.format_flight(&AllocatedFlight::allocated(flight, desired + chrono::TimeDelta::minutes(12)));

        let mut buffer = Vec::new();
        write_records(&mut buffer, &[record]).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Callsign;Class;Origin"));
        assert_eq!(
            lines[1],
            "VJ130;departure;VVTS;VVDN;2025-03-14 08:00;2025-03-14 08:12;2025-03-14 15:12;12.0;true;allocated;2025-03-14 08:12;2025-03-14 15:12;false;"
        );
    }
}
