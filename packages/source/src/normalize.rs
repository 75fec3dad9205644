//! Record normalization.
//!
//! Maps one raw Socrata record to a [`ShootingIncident`]. This is the only
//! place upstream column names appear; every fetch path goes through
//! [`normalize_record`].
//!
//! Officer and suspect attributes arrive as independently delimited
//! columns (names split on `;`, everything else on `,`) that are aligned
//! by position. Nothing upstream guarantees the columns agree, so a
//! mismatch between a column's entry count and the declared participant
//! count is logged as a warning. The positional mapping is kept as is.

use ois_map_incident_models::{
    Location, OfficerInfo, ShootingIncident, SuspectAge, SuspectInfo, UNKNOWN,
};
use serde_json::Value;

use crate::parsing::{
    contains_yes, f64_value, int_value, json_type_name, parse_u32, split_entries, str_field,
};

/// Upper bound on officers or suspects built for a single record.
pub const MAX_PARTICIPANTS: usize = 64;

const NAME_DELIMITER: char = ';';
const ATTRIBUTE_DELIMITER: char = ',';

/// Reasons a record that claims a coordinate could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The record is not a JSON object.
    #[error("record is not a JSON object (got {found})")]
    NotAnObject {
        /// JSON type of the record.
        found: &'static str,
    },

    /// `geocoded_column.coordinates` is present but is not a pair of
    /// finite numbers.
    #[error("malformed geocoded coordinates: {raw}")]
    InvalidCoordinates {
        /// The raw coordinates value.
        raw: String,
    },
}

/// Normalizes one record, returning `None` when it has no geocoded
/// coordinate or cannot be normalized.
///
/// Never fails: malformed records are logged and dropped.
#[must_use]
pub fn normalize_record(record: &Value) -> Option<ShootingIncident> {
    match try_normalize_record(record) {
        Ok(incident) => incident,
        Err(e) => {
            log::warn!("Dropping record: {e}");
            None
        }
    }
}

/// Normalizes a batch of records, preserving input order.
#[must_use]
pub fn normalize_records(records: &[Value]) -> Vec<ShootingIncident> {
    records.iter().filter_map(normalize_record).collect()
}

/// Normalizes one record.
///
/// Returns `Ok(None)` for records without `geocoded_column.coordinates`.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the record is not an object or its
/// coordinates are malformed.
pub fn try_normalize_record(record: &Value) -> Result<Option<ShootingIncident>, NormalizeError> {
    if !record.is_object() {
        return Err(NormalizeError::NotAnObject {
            found: json_type_name(record),
        });
    }

    let Some((longitude, latitude)) = geocoded_coordinates(record)? else {
        return Ok(None);
    };

    let case_number = str_field(record, "case").unwrap_or(UNKNOWN).to_string();
    let officers = parse_officers(record, &case_number);
    let suspects = parse_suspects(record, &case_number);

    Ok(Some(ShootingIncident {
        date: owned_or_unknown(str_field(record, "date")),
        location: Location {
            address: owned_or_unknown(str_field(record, "address")),
            latitude,
            longitude,
        },
        incident_type: owned_or_unknown(str_field(record, "incident_type")),
        officers,
        suspects,
        narrative: str_field(record, "narrative").map(str::to_string),
        state_attorney_letter_url: record
            .get("state_attorney_s_review_letter")
            .and_then(|letter| letter.get("url"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string),
        case_number,
    }))
}

/// Reads `geocoded_column.coordinates` as `(longitude, latitude)`.
fn geocoded_coordinates(record: &Value) -> Result<Option<(f64, f64)>, NormalizeError> {
    let Some(raw) = record
        .get("geocoded_column")
        .and_then(|column| column.get("coordinates"))
        .filter(|raw| !raw.is_null())
    else {
        return Ok(None);
    };

    raw.as_array()
        .filter(|pair| pair.len() >= 2)
        .and_then(|pair| Some((f64_value(&pair[0])?, f64_value(&pair[1])?)))
        .map(Some)
        .ok_or_else(|| NormalizeError::InvalidCoordinates {
            raw: raw.to_string(),
        })
}

fn owned_or_unknown(value: Option<&str>) -> String {
    value.unwrap_or(UNKNOWN).to_string()
}

/// A delimited multi-value column split into positional entries.
struct Column<'a> {
    key: &'static str,
    entries: Vec<&'a str>,
}

impl<'a> Column<'a> {
    fn read(record: &'a Value, key: &'static str, delimiter: char) -> Option<Self> {
        str_field(record, key).map(|raw| Self {
            key,
            entries: split_entries(raw, delimiter),
        })
    }
}

fn entry<'a>(column: Option<&Column<'a>>, index: usize) -> Option<&'a str> {
    column?
        .entries
        .get(index)
        .copied()
        .filter(|value| !value.is_empty())
}

/// Present columns whose entry count differs from `count`, as
/// `(column, entries)`.
fn misaligned_columns(
    count: usize,
    columns: &[Option<&Column<'_>>],
) -> Vec<(&'static str, usize)> {
    columns
        .iter()
        .flatten()
        .filter(|column| column.entries.len() != count)
        .map(|column| (column.key, column.entries.len()))
        .collect()
}

fn warn_misaligned(case_number: &str, count: usize, columns: &[Option<&Column<'_>>]) {
    for (key, entries) in misaligned_columns(count, columns) {
        log::warn!(
            "Case {case_number}: column '{key}' has {entries} entries but {count} participant(s) \
             were declared; attributes may be misattributed",
        );
    }
}

/// Reads a `number_of_*_involved` column. Missing, unparseable, or
/// non-positive counts fall back to 1.
fn participant_count(record: &Value, key: &str, case_number: &str) -> usize {
    let Some(raw) = record.get(key).filter(|raw| !raw.is_null()) else {
        return 1;
    };

    match int_value(raw).and_then(|n| usize::try_from(n).ok()) {
        Some(0) | None => {
            log::warn!("Case {case_number}: invalid {key} value {raw}, assuming 1");
            1
        }
        Some(n) if n > MAX_PARTICIPANTS => {
            log::warn!("Case {case_number}: {key} of {n} clamped to {MAX_PARTICIPANTS}");
            MAX_PARTICIPANTS
        }
        Some(n) => n,
    }
}

fn parse_officers(record: &Value, case_number: &str) -> Vec<OfficerInfo> {
    let count = participant_count(record, "number_of_officers_involved", case_number);

    let names = Column::read(record, "officer_name", NAME_DELIMITER);
    let races = Column::read(record, "officer_race", ATTRIBUTE_DELIMITER);
    let genders = Column::read(record, "officer_gender", ATTRIBUTE_DELIMITER);
    let ages = Column::read(record, "officer_age", ATTRIBUTE_DELIMITER);
    let tenures = Column::read(record, "officer_tenure", ATTRIBUTE_DELIMITER);

    warn_misaligned(
        case_number,
        count,
        &[
            names.as_ref(),
            races.as_ref(),
            genders.as_ref(),
            ages.as_ref(),
            tenures.as_ref(),
        ],
    );

    (0..count)
        .map(|i| OfficerInfo {
            name: owned_or_unknown(entry(names.as_ref(), i)),
            race: entry(races.as_ref(), i).map(str::to_string),
            gender: entry(genders.as_ref(), i).map(str::to_string),
            age: entry(ages.as_ref(), i).and_then(parse_u32),
            tenure: entry(tenures.as_ref(), i).and_then(parse_u32),
            ..OfficerInfo::default()
        })
        .collect()
}

fn parse_suspects(record: &Value, case_number: &str) -> Vec<SuspectInfo> {
    let count = participant_count(record, "number_of_suspects_involved", case_number);

    let names = Column::read(record, "suspect_name", NAME_DELIMITER);
    let races = Column::read(record, "suspect_race", ATTRIBUTE_DELIMITER);
    let genders = Column::read(record, "suspect_gender", ATTRIBUTE_DELIMITER);
    let ages = Column::read(record, "suspect_age", ATTRIBUTE_DELIMITER);

    warn_misaligned(
        case_number,
        count,
        &[
            names.as_ref(),
            races.as_ref(),
            genders.as_ref(),
            ages.as_ref(),
        ],
    );

    // Incident-level columns, copied onto every suspect.
    let weapon = str_field(record, "suspect_s_weapon");
    let was_hit = str_field(record, "suspect_hit").map(contains_yes);
    let was_fatal = str_field(record, "fatal").map(contains_yes);

    (0..count)
        .map(|i| SuspectInfo {
            name: owned_or_unknown(entry(names.as_ref(), i)),
            race: entry(races.as_ref(), i).map(str::to_string),
            gender: entry(genders.as_ref(), i).map(str::to_string),
            // "Unknown" does not parse, so it is omitted like any other
            // non-numeric age.
            age: entry(ages.as_ref(), i)
                .and_then(parse_u32)
                .map(SuspectAge::Years),
            weapon: weapon.map(str::to_string),
            was_hit,
            was_fatal,
        })
        .collect()
}
