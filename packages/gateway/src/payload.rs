//! Normalization of status API payloads into [`RiskCell`]s.
//!
//! Accepted shapes:
//!
//! ```json
//! { "status": [ { "bounds": {...}, "flood": {...}, "landslide": {...} } ] }
//! [ { "bounds": {...}, "landslide": {...} } ]
//! ```
//!
//! Anything else normalizes to an empty list. Per-record problems (missing
//! or degenerate bounds, a hazard without a numeric `risk_percentage`) drop
//! only the affected record or hazard.

use chrono::{DateTime, NaiveDateTime, Utc};
use hazard_map_risk_models::{CellBounds, HazardType, RiskCell};
use serde_json::Value;

/// Name of the list field in the wrapper object.
const STATUS_FIELD: &str = "status";

/// Normalizes a decoded response body into risk cells, in payload order.
///
/// Within one record, the landslide cell (if any) precedes the flood cell.
/// `fetched_at` stands in for any hazard whose `updated_at` is missing or
/// unparseable.
#[must_use]
pub fn normalize_payload(body: &Value, fetched_at: DateTime<Utc>) -> Vec<RiskCell> {
    let records = match body {
        Value::Array(records) => records,
        Value::Object(map) => match map.get(STATUS_FIELD) {
            Some(Value::Array(records)) => records,
            _ => {
                log::warn!("Risk payload object has no '{STATUS_FIELD}' list; treating as empty");
                return Vec::new();
            }
        },
        _ => {
            log::warn!("Risk payload is neither an object nor a list; treating as empty");
            return Vec::new();
        }
    };

    let mut cells = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for (i, record) in records.iter().enumerate() {
        let Some(bounds) = parse_bounds(&record["bounds"]) else {
            log::debug!("Dropping risk record {i}: missing or invalid bounds");
            dropped += 1;
            continue;
        };

        for &hazard in HazardType::all() {
            let key: &str = hazard.as_ref();
            let sub = &record[key];
            if sub.is_null() {
                continue;
            }
            match parse_hazard(sub, bounds, hazard, fetched_at) {
                Some(cell) => cells.push(cell),
                None => {
                    log::debug!("Dropping {hazard} sub-record of risk record {i}");
                }
            }
        }
    }

    if dropped > 0 {
        log::warn!(
            "Dropped {dropped} of {} risk records with malformed bounds",
            records.len()
        );
    }

    cells
}

fn parse_bounds(value: &Value) -> Option<CellBounds> {
    let field = |name: &str| as_number(&value[name]);
    CellBounds::new(
        field("minLat")?,
        field("minLon")?,
        field("maxLat")?,
        field("maxLon")?,
    )
    .ok()
}

fn parse_hazard(
    value: &Value,
    bounds: CellBounds,
    hazard: HazardType,
    fetched_at: DateTime<Utc>,
) -> Option<RiskCell> {
    let percentage = as_number(&value["risk_percentage"])?;
    let updated_at = value["updated_at"]
        .as_str()
        .and_then(parse_timestamp)
        .unwrap_or(fetched_at);

    RiskCell::new(bounds, hazard, clamp_percentage(percentage), updated_at).ok()
}

/// Reads a JSON number, also accepting numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_percentage(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Parses RFC 3339 or `YYYY-MM-DD HH:MM:SS` (interpreted as UTC).
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
    }

    fn bounds() -> Value {
        json!({ "minLat": 24.78, "minLon": 93.91, "maxLat": 24.83, "maxLon": 93.96 })
    }

    #[test]
    fn wrapper_with_single_landslide_record() {
        let body = json!({
            "status": [{
                "bounds": bounds(),
                "landslide": {
                    "cal_type": "landslide",
                    "risk_percentage": 72,
                    "updated_at": "2025-06-30T08:15:00Z"
                }
            }]
        });
        let cells = normalize_payload(&body, fetched_at());
        assert_eq!(cells.len(), 1);
        let cell = &cells[0];
        assert_eq!(cell.hazard_type(), HazardType::Landslide);
        assert_eq!(cell.risk_percentage(), 72);
        assert!((cell.bounds().min_lat() - 24.78).abs() < 1e-9);
        assert_eq!(
            cell.updated_at(),
            Utc.with_ymd_and_hms(2025, 6, 30, 8, 15, 0).unwrap()
        );
    }

    #[test]
    fn bare_array_is_accepted() {
        let body = json!([{ "bounds": bounds(), "flood": { "risk_percentage": 41 } }]);
        let cells = normalize_payload(&body, fetched_at());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].hazard_type(), HazardType::Flood);
        assert_eq!(cells[0].updated_at(), fetched_at());
    }

    #[test]
    fn record_with_both_hazards_yields_two_cells_sharing_bounds() {
        let body = json!([{
            "bounds": bounds(),
            "flood": { "risk_percentage": 20 },
            "landslide": { "risk_percentage": 65 }
        }]);
        let cells = normalize_payload(&body, fetched_at());
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].hazard_type(), HazardType::Landslide);
        assert_eq!(cells[1].hazard_type(), HazardType::Flood);
        assert_eq!(cells[0].bounds(), cells[1].bounds());
    }

    #[test]
    fn record_with_no_hazards_yields_nothing() {
        let body = json!([{ "bounds": bounds() }]);
        assert!(normalize_payload(&body, fetched_at()).is_empty());
    }

    #[test]
    fn malformed_records_are_dropped_not_fatal() {
        let body = json!({
            "status": [
                { "flood": { "risk_percentage": 50 } },
                { "bounds": { "minLat": 24.9, "minLon": 93.9, "maxLat": 24.8, "maxLon": 94.0 },
                  "flood": { "risk_percentage": 50 } },
                {
                    "bounds": { "minLat": 24.7, "minLon": 93.9 },
                    "flood": { "risk_percentage": 50 }
                },
                { "bounds": bounds(), "landslide": { "risk_percentage": 33 } }
            ]
        });
        let cells = normalize_payload(&body, fetched_at());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].risk_percentage(), 33);
    }

    #[test]
    fn hazard_without_percentage_drops_only_that_hazard() {
        let body = json!([{
            "bounds": bounds(),
            "landslide": { "cal_type": "landslide" },
            "flood": { "risk_percentage": "55" }
        }]);
        let cells = normalize_payload(&body, fetched_at());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].hazard_type(), HazardType::Flood);
        assert_eq!(cells[0].risk_percentage(), 55);
    }

    #[test]
    fn unexpected_shapes_normalize_to_empty() {
        assert!(normalize_payload(&json!({ "data": [] }), fetched_at()).is_empty());
        assert!(normalize_payload(&json!("ok"), fetched_at()).is_empty());
        assert!(normalize_payload(&json!(null), fetched_at()).is_empty());
        assert!(normalize_payload(&json!({ "status": "down" }), fetched_at()).is_empty());
    }

    #[test]
    fn percentages_are_rounded_and_clamped() {
        let body = json!([
            { "bounds": bounds(), "flood": { "risk_percentage": 64.6 } },
            { "bounds": bounds(), "flood": { "risk_percentage": 140 } },
            { "bounds": bounds(), "flood": { "risk_percentage": -3 } }
        ]);
        let pcts: Vec<u8> = normalize_payload(&body, fetched_at())
            .iter()
            .map(RiskCell::risk_percentage)
            .collect();
        assert_eq!(pcts, vec![65, 100, 0]);
    }

    #[test]
    fn parses_space_separated_timestamps() {
        let ts = parse_timestamp("2025-06-30 08:15:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 30, 8, 15, 0).unwrap());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
