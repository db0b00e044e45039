use crate::types::{EventStats, NormalizedEvent, SortKey};
use std::cmp::Ordering;

pub type Comparator = fn(&NormalizedEvent, &NormalizedEvent) -> Ordering;

/// attending + maybe/2
pub fn popularity_score(stats: &EventStats) -> f64 {
    stats.attending as f64 + stats.maybe as f64 / 2.0
}

// Twice the score, so ties compare exactly in integers.
fn doubled_score(stats: &EventStats) -> u128 {
    2 * stats.attending as u128 + stats.maybe as u128
}

/// Soonest first; events without a parsable start go last
pub fn compare_time(a: &NormalizedEvent, b: &NormalizedEvent) -> Ordering {
    none_last(a.time_from_now, b.time_from_now)
}

/// Nearest first; events without a distance go last
pub fn compare_distance(a: &NormalizedEvent, b: &NormalizedEvent) -> Ordering {
    none_last(a.distance, b.distance)
}

pub fn compare_venue(a: &NormalizedEvent, b: &NormalizedEvent) -> Ordering {
    a.venue.name.cmp(&b.venue.name)
}

/// Highest score first
pub fn compare_popularity(a: &NormalizedEvent, b: &NormalizedEvent) -> Ordering {
    doubled_score(&b.stats).cmp(&doubled_score(&a.stats))
}

fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn comparator(key: SortKey) -> Comparator {
    match key {
        SortKey::Time => compare_time,
        SortKey::Distance => compare_distance,
        SortKey::Venue => compare_venue,
        SortKey::Popularity => compare_popularity,
    }
}

/// Stable in-place sort; `None` leaves the upstream order untouched.
pub fn sort_events(events: &mut [NormalizedEvent], key: Option<SortKey>) {
    if let Some(key) = key {
        events.sort_by(comparator(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VenueSummary;

    fn event(id: &str) -> NormalizedEvent {
        NormalizedEvent {
            id: id.to_string(),
            name: format!("event {id}"),
            event_type: None,
            cover_picture: None,
            profile_picture: None,
            description: None,
            distance: None,
            start_time: None,
            end_time: None,
            time_from_now: None,
            category: None,
            stats: EventStats::default(),
            venue: VenueSummary {
                id: format!("venue-{id}"),
                name: String::new(),
                about: None,
                emails: None,
                cover_picture: None,
                profile_picture: None,
                location: None,
            },
        }
    }

    fn ids(events: &[NormalizedEvent]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn time_sort_on_sorted_input_is_noop() {
        let mut events: Vec<_> = [-50, 0, 10, 10, 3600]
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut e = event(&i.to_string());
                e.time_from_now = Some(*t);
                e
            })
            .collect();
        let before = events.clone();
        sort_events(&mut events, Some(SortKey::Time));
        assert_eq!(events, before);
    }

    #[test]
    fn popularity_orders_higher_score_first() {
        let mut low = event("low");
        low.stats.attending = 5;
        let mut high = event("high");
        high.stats.attending = 8;
        high.stats.maybe = 4;
        assert_eq!(popularity_score(&high.stats), 10.0);
        assert_eq!(popularity_score(&low.stats), 5.0);

        assert_eq!(compare_popularity(&high, &low), Ordering::Less);
        let mut events = vec![low, high];
        sort_events(&mut events, Some(SortKey::Popularity));
        assert_eq!(ids(&events), vec!["high", "low"]);
    }

    #[test]
    fn popularity_ties_keep_input_order() {
        let mut a = event("a");
        a.stats.attending = 2;
        let mut b = event("b");
        b.stats.maybe = 4;
        let mut events = vec![a, b];
        sort_events(&mut events, Some(SortKey::Popularity));
        assert_eq!(ids(&events), vec!["a", "b"]);
    }

    #[test]
    fn distance_puts_unknown_last() {
        let mut far = event("far");
        far.distance = Some(900);
        let mut near = event("near");
        near.distance = Some(12);
        let unknown = event("unknown");
        let mut events = vec![unknown, far, near];
        sort_events(&mut events, Some(SortKey::Distance));
        assert_eq!(ids(&events), vec!["near", "far", "unknown"]);
    }

    #[test]
    fn venue_sorts_by_name() {
        let mut z = event("z");
        z.venue.name = "Zebra Lounge".into();
        let mut a = event("a");
        a.venue.name = "Araragi Hall".into();
        let mut events = vec![z, a];
        sort_events(&mut events, Some(SortKey::Venue));
        assert_eq!(ids(&events), vec!["a", "z"]);
    }

    #[test]
    fn no_key_keeps_order() {
        let mut events = vec![event("2"), event("1")];
        sort_events(&mut events, None);
        assert_eq!(ids(&events), vec!["2", "1"]);
    }
}
