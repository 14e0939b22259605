//! Plain-text formatting for command output.

use flightwatch::airport::ReferenceAirport;
use flightwatch::entity::{Entity, FEET_TO_METERS};
use flightwatch::search::Ranked;
use flightwatch::tracker::FeedStatus;

/// Column header matching [`tracked_row`].
pub const TRACK_HEADER: &str =
    "ID       CALLSIGN  ROUTE      LAT       LON        ALT(ft)  GS(kt)  HDG  TRAIL  COUNTRY";

/// Format altitude in feet, or "gnd"/"-" when unknown.
pub fn format_altitude(entity: &Entity) -> String {
    if entity.on_ground {
        return "gnd".to_string();
    }
    match entity.altitude_m {
        Some(meters) => format!("{:.0}", meters / FEET_TO_METERS),
        None => "-".to_string(),
    }
}

/// Shorten a string to at most `max` characters.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

// Fixed-width columns up to and including heading.
fn position_columns(entity: &Entity) -> String {
    let route = entity
        .route
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:<8} {:<9} {:<10} {:>8.4} {:>10.4} {:>8} {:>7.0} {:>4.0}",
        truncate(&entity.id, 8),
        truncate(&entity.callsign, 9),
        truncate(&route, 10),
        entity.display_position.latitude,
        entity.display_position.longitude,
        format_altitude(entity),
        entity.ground_speed_knots(),
        entity.kinematics.heading,
    )
}

/// One table row for an entity at its displayed position.
pub fn entity_row(entity: &Entity) -> String {
    format!("{}  {}", position_columns(entity), entity.origin_country)
}

/// A row for the live view, with the number of trail points.
pub fn tracked_row(entity: &Entity, trail_len: usize) -> String {
    format!(
        "{}  {:>5}  {}",
        position_columns(entity),
        trail_len,
        entity.origin_country
    )
}

/// One line for an airport.
pub fn airport_row(airport: &ReferenceAirport) -> String {
    format!(
        "{:<4} {:<4} {} ({:.4}, {:.4})",
        airport.iata_code, airport.icao_code, airport, airport.latitude, airport.longitude
    )
}

/// Prefix a line with its score.
pub fn scored<T>(hit: &Ranked<T>, line: String) -> String {
    format!("[{:>3}] {}", hit.score, line)
}

/// One-line summary of feed health.
pub fn status_line(status: &FeedStatus) -> String {
    let mut line = format!(
        "Feed: {} | {} aircraft | {} snapshots",
        status.health, status.entity_count, status.snapshots
    );
    if let Some(at) = status.last_success {
        line.push_str(&format!(" | last update {}", at.format("%H:%M:%S UTC")));
    }
    if let Some(err) = &status.last_error {
        line.push_str(&format!(
            " | {} failure(s): {}",
            status.consecutive_failures, err
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightwatch::entity::{GeoPoint, Kinematics, Route};
    use flightwatch::tracker::FeedHealth;

    fn sample_entity() -> Entity {
        let mut entity = Entity::at_now(
            "4ca7b5",
            GeoPoint::new(-6.27, 53.42),
            Kinematics::new(120.0, 270.0, 0.0),
        )
        .with_callsign("EIN123")
        .with_origin_country("Ireland")
        .with_route(Route::new("DUB", "LHR"));
        entity.altitude_m = Some(3048.0);
        entity
    }

    #[test]
    fn test_format_altitude() {
        let mut entity = sample_entity();
        assert_eq!(format_altitude(&entity), "10000");

        entity.altitude_m = None;
        assert_eq!(format_altitude(&entity), "-");

        entity.on_ground = true;
        assert_eq!(format_altitude(&entity), "gnd");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("EIN123", 9), "EIN123");
        assert_eq!(truncate("Aer Lingus Regional", 6), "Aer L~");
    }

    #[test]
    fn test_entity_row_contains_fields() {
        let row = entity_row(&sample_entity());
        assert!(row.starts_with("4ca7b5"));
        assert!(row.contains("EIN123"));
        assert!(row.contains("DUB"));
        assert!(row.contains("Ireland"));
    }

    #[test]
    fn test_tracked_row_inserts_trail_column() {
        let row = tracked_row(&sample_entity(), 7);
        assert!(row.ends_with("      7  Ireland"));
    }

    #[test]
    fn test_status_line() {
        let status = FeedStatus {
            health: FeedHealth::Degraded,
            last_error: Some("Upstream returned HTTP 503".to_string()),
            consecutive_failures: 2,
            last_success: None,
            entity_count: 14,
            snapshots: 3,
        };
        let line = status_line(&status);
        assert!(line.starts_with("Feed: Degraded | 14 aircraft"));
        assert!(line.contains("2 failure(s): Upstream returned HTTP 503"));
    }

    #[test]
    fn test_scored_prefix() {
        let hit = Ranked {
            item: (),
            score: 90,
        };
        assert_eq!(scored(&hit, "JFK".to_string()), "[ 90] JFK");
    }
}
