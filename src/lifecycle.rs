//! Appointment lifecycle rules: creation validation, status defaulting, date
//! normalization and the terminal-state guard. Pure functions; the route
//! handlers and the client sync layer both go through these.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::ApiError;
use crate::models::AppointmentStatus;

/// Required free-text fields for any booking or walk-in intake.
pub fn validate_new_appointment(
    owner_name: &str,
    pet_name: &str,
    pet_type: &str,
    symptoms: &str,
) -> Result<(), ApiError> {
    if owner_name.trim().is_empty() {
        return Err(ApiError::validation("ownerName is required"));
    }
    if pet_name.trim().is_empty() {
        return Err(ApiError::validation("petName is required"));
    }
    if pet_type.trim().is_empty() {
        return Err(ApiError::validation("petType is required"));
    }
    if symptoms.trim().is_empty() {
        return Err(ApiError::validation("symptoms is required"));
    }
    Ok(())
}

/// Walk-ins skip the booking step and enter the queue directly.
pub fn default_status(is_walk_in: bool) -> AppointmentStatus {
    if is_walk_in {
        AppointmentStatus::Waiting
    } else {
        AppointmentStatus::Pending
    }
}

/// Normalize a client-supplied date string. Malformed or absent input never
/// fails a create: walk-ins fall back to `now`, scheduled bookings to no date.
///
/// Accepted shapes: RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (naive, taken as UTC),
/// and bare `YYYY-MM-DD`.
pub fn normalize_date(
    raw: Option<&str>,
    is_walk_in: bool,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let parsed = raw.and_then(parse_date);
    match parsed {
        Some(dt) => Some(dt),
        None if is_walk_in => Some(now),
        None => None,
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    None
}

/// Workflow guard applied on every status patch: a record that reached
/// `completed` or `cancelled` accepts no further transition.
pub fn check_transition(
    current: AppointmentStatus,
    _target: AppointmentStatus,
) -> Result<(), ApiError> {
    if current.is_terminal() {
        return Err(ApiError::terminal_status());
    }
    Ok(())
}

/// Customers may only cancel while the booking is still pending.
pub fn check_cancel(current: AppointmentStatus) -> Result<(), ApiError> {
    if current != AppointmentStatus::Pending {
        return Err(ApiError::Conflict(
            "NOT_CANCELLABLE",
            "Only pending appointments can be cancelled".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_required_fields() {
        assert!(validate_new_appointment("Somchai", "Tom", "Cat", "ไม่กินอาหาร").is_ok());
        assert!(validate_new_appointment("", "Tom", "Cat", "sick").is_err());
        assert!(validate_new_appointment("Somchai", "  ", "Cat", "sick").is_err());
        assert!(validate_new_appointment("Somchai", "Tom", "", "sick").is_err());
        assert!(validate_new_appointment("Somchai", "Tom", "Cat", "").is_err());
    }

    #[test]
    fn test_default_status() {
        assert_eq!(default_status(true), AppointmentStatus::Waiting);
        assert_eq!(default_status(false), AppointmentStatus::Pending);
    }

    #[test]
    fn test_normalize_date_accepts_common_shapes() {
        let now = Utc::now();
        let rfc = normalize_date(Some("2026-03-01T09:30:00Z"), false, now).unwrap();
        assert_eq!(rfc, Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap());

        let naive = normalize_date(Some("2026-03-01T09:30"), false, now).unwrap();
        assert_eq!(naive, Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap());

        let date_only = normalize_date(Some("2026-03-01"), false, now).unwrap();
        assert_eq!(date_only, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_normalize_date_never_fails_on_garbage() {
        let now = Utc::now();
        assert_eq!(normalize_date(Some("not-a-date"), false, now), None);
        assert_eq!(normalize_date(Some(""), false, now), None);
        assert_eq!(normalize_date(None, false, now), None);
        // Walk-ins fall back to "now" instead.
        assert_eq!(normalize_date(Some("not-a-date"), true, now), Some(now));
        assert_eq!(normalize_date(None, true, now), Some(now));
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        use AppointmentStatus::*;
        assert!(check_transition(Completed, Waiting).is_err());
        assert!(check_transition(Cancelled, Pending).is_err());
        assert!(check_transition(Pending, Waiting).is_ok());
        assert!(check_transition(Waiting, Examining).is_ok());
        assert!(check_transition(Examining, Pharmacy).is_ok());
        assert!(check_transition(Pharmacy, Completed).is_ok());
    }

    #[test]
    fn test_cancel_only_while_pending() {
        use AppointmentStatus::*;
        assert!(check_cancel(Pending).is_ok());
        assert!(check_cancel(Waiting).is_err());
        assert!(check_cancel(Completed).is_err());
    }
}
