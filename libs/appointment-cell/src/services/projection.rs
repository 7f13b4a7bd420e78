use chrono::NaiveDateTime;
use std::cmp::Ordering;

use crate::models::{CanonicalAppointment, SortKey, StatusFilter, Tab};

/// Project the canonical set into the ordered sequence handed to the
/// rendering layer.
///
/// Pipeline order is fixed: status filter, then tab filter, then a stable
/// sort. The input set is never mutated. Records with an unclassifiable
/// instant land in the `Past` tab and sort after every classifiable record;
/// two unclassifiable records keep their input order.
pub fn project(
    set: &[CanonicalAppointment],
    tab: Tab,
    status_filter: StatusFilter,
    sort_key: SortKey,
    now: NaiveDateTime,
) -> Vec<CanonicalAppointment> {
    let mut rows: Vec<CanonicalAppointment> = set
        .iter()
        .filter(|appointment| status_filter.matches(appointment.status.as_deref()))
        .filter(|appointment| match tab {
            Tab::Upcoming => appointment.is_upcoming(now),
            Tab::Past => !appointment.is_upcoming(now),
        })
        .cloned()
        .collect();

    rows.sort_by(|a, b| compare(a, b, sort_key));
    rows
}

fn compare(a: &CanonicalAppointment, b: &CanonicalAppointment, sort_key: SortKey) -> Ordering {
    match sort_key {
        SortKey::Date => match (a.resolved_instant, b.resolved_instant) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Doctor => a.doctor_name().cmp(b.doctor_name()),
        SortKey::Status => a
            .status
            .as_deref()
            .unwrap_or("")
            .cmp(b.status.as_deref().unwrap_or("")),
    }
}
