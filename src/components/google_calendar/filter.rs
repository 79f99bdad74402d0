use super::models::CalendarEvent;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Response status of an attendee who turned the invitation down
const DECLINED: &str = "declined";

/// An event counts as accepted when it has no attendee list, or when the
/// calendar owner is among the attendees and has not declined.
pub fn is_accepted(event: &CalendarEvent) -> bool {
    match &event.attendees {
        None => true,
        Some(attendees) => attendees
            .iter()
            .any(|a| a.is_self == Some(true) && a.response_status.as_deref() != Some(DECLINED)),
    }
}

/// Whether the event was last updated strictly before `cutoff`.
/// Events with a missing or malformed timestamp are not.
pub fn updated_before(event: &CalendarEvent, cutoff: DateTime<Utc>) -> bool {
    event
        .updated
        .as_deref()
        .and_then(|updated| DateTime::parse_from_rfc3339(updated).ok())
        .is_some_and(|updated| updated.with_timezone(&Utc) < cutoff)
}

/// Drop later entries that share an iCalendar UID with an earlier one
pub fn dedup_by_ical_uid(events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|event| match &event.ical_uid {
            Some(uid) => seen.insert(uid.clone()),
            None => true,
        })
        .collect()
}

/// Apply acceptance, staleness and deduplication in that order
pub fn filter_events(events: Vec<CalendarEvent>, cutoff: DateTime<Utc>) -> Vec<CalendarEvent> {
    let kept = events
        .into_iter()
        .filter(|event| is_accepted(event) && updated_before(event, cutoff))
        .collect();
    dedup_by_ical_uid(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::models::Attendee;
    use crate::components::google_calendar::time::staleness_cutoff;

    fn event(uid: &str, updated: &str, attendees: Option<Vec<Attendee>>) -> CalendarEvent {
        let mut event = CalendarEvent {
            ical_uid: Some(uid.to_string()),
            updated: Some(updated.to_string()),
            attendees,
            ..Default::default()
        };
        event
            .extra
            .insert("id".to_string(), serde_json::json!(format!("{}-id", uid)));
        event
    }

    fn attendee(is_self: bool, status: &str) -> Attendee {
        Attendee {
            is_self: Some(is_self),
            response_status: Some(status.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_attendees_is_accepted() {
        assert!(is_accepted(&event("a", "2013-05-01T00:00:00Z", None)));
    }

    #[test]
    fn test_self_declined_is_rejected() {
        let declined = event(
            "a",
            "2013-05-01T00:00:00Z",
            Some(vec![attendee(false, "accepted"), attendee(true, "declined")]),
        );
        assert!(!is_accepted(&declined));

        let accepted = event("a", "2013-05-01T00:00:00Z", Some(vec![attendee(true, "accepted")]));
        assert!(is_accepted(&accepted));

        let tentative = event("a", "2013-05-01T00:00:00Z", Some(vec![attendee(true, "tentative")]));
        assert!(is_accepted(&tentative));
    }

    #[test]
    fn test_attendees_without_self_is_rejected() {
        let others_only = event(
            "a",
            "2013-05-01T00:00:00Z",
            Some(vec![attendee(false, "accepted"), attendee(false, "needsAction")]),
        );
        assert!(!is_accepted(&others_only));

        // An empty attendee list has nobody marked self either
        assert!(!is_accepted(&event("a", "2013-05-01T00:00:00Z", Some(vec![]))));
    }

    #[test]
    fn test_self_without_status_is_accepted() {
        let no_status = event(
            "a",
            "2013-05-01T00:00:00Z",
            Some(vec![Attendee {
                is_self: Some(true),
                ..Default::default()
            }]),
        );
        assert!(is_accepted(&no_status));
    }

    #[test]
    fn test_updated_before_cutoff() {
        let cutoff = staleness_cutoff();
        assert!(updated_before(&event("a", "2013-12-31T23:59:59.999Z", None), cutoff));
        assert!(!updated_before(&event("a", "2014-01-01T00:00:00Z", None), cutoff));
        assert!(!updated_before(&event("a", "2014-06-10T12:00:00.000Z", None), cutoff));
        // Offsets are honoured: 21:30 at -03:00 on Dec 31 is 00:30 UTC on Jan 1
        assert!(!updated_before(&event("a", "2013-12-31T21:30:00-03:00", None), cutoff));
    }

    #[test]
    fn test_unusable_updated_is_stale() {
        let cutoff = staleness_cutoff();
        assert!(!updated_before(&event("a", "yesterday", None), cutoff));

        let mut missing = event("a", "", None);
        missing.updated = None;
        assert!(!updated_before(&missing, cutoff));
    }

    #[test]
    fn test_dedup_keeps_first() {
        let mut first = event("same", "2013-01-01T00:00:00Z", None);
        first.extra.insert("summary".to_string(), serde_json::json!("first"));
        let mut second = event("same", "2013-02-01T00:00:00Z", None);
        second.extra.insert("summary".to_string(), serde_json::json!("second"));
        let other = event("other", "2013-03-01T00:00:00Z", None);

        let deduped = dedup_by_ical_uid(vec![first.clone(), other.clone(), second]);
        assert_eq!(deduped, vec![first, other]);
    }

    #[test]
    fn test_dedup_keeps_events_without_uid() {
        let mut a = event("x", "2013-01-01T00:00:00Z", None);
        a.ical_uid = None;
        let mut b = event("y", "2013-01-01T00:00:00Z", None);
        b.ical_uid = None;

        assert_eq!(dedup_by_ical_uid(vec![a, b]).len(), 2);
    }

    #[test]
    fn test_filter_events() {
        let events = vec![
            event("keep", "2013-06-01T00:00:00Z", Some(vec![attendee(true, "accepted")])),
            event("declined", "2013-06-01T00:00:00Z", Some(vec![attendee(true, "declined")])),
            event("fresh", "2014-08-01T00:00:00Z", Some(vec![attendee(true, "accepted")])),
            event("keep", "2013-07-01T00:00:00Z", None),
            event("no_attendees", "2013-06-01T00:00:00Z", None),
        ];

        let filtered = filter_events(events, staleness_cutoff());
        let uids: Vec<_> = filtered.iter().filter_map(|e| e.ical_uid.as_deref()).collect();
        assert_eq!(uids, vec!["keep", "no_attendees"]);
        assert_eq!(filtered[0].updated.as_deref(), Some("2013-06-01T00:00:00Z"));
    }

    #[test]
    fn test_filter_empty() {
        assert!(filter_events(Vec::new(), staleness_cutoff()).is_empty());
    }
}
