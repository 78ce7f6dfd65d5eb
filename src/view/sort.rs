use crate::components::google_calendar::time::event_timestamp_millis;
use crate::components::google_calendar::Event;
use feruca::Collator;
use std::cmp::Ordering;

/// Column the event list is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Title,
    #[default]
    Start,
    End,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Title, SortField::Start, SortField::End];

    /// Name used in query strings
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Start => "start",
            SortField::End => "end",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" | "summary" => Some(SortField::Title),
            "start" => Some(SortField::Start),
            "end" => Some(SortField::End),
            _ => None,
        }
    }

    /// Column header text
    pub fn label(self) -> &'static str {
        match self {
            SortField::Title => "Event",
            SortField::Start => "Start",
            SortField::End => "End",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Current sort column and direction; defaults to start time, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// The state after clicking `field`: same field flips, new field starts ascending
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::new(field, SortDirection::Ascending)
        }
    }

    pub fn toggle(&mut self, field: SortField) {
        *self = self.toggled(field);
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Arrow shown next to a column header
    pub fn indicator(&self, field: SortField) -> &'static str {
        if self.field != field {
            return "↕️";
        }
        match self.direction {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }

    /// Compare two events under this sort state
    pub fn compare(&self, collator: &mut Collator, a: &Event, b: &Event) -> Ordering {
        let ordering = match self.field {
            SortField::Title => compare_titles(collator, a, b),
            SortField::Start => {
                event_timestamp_millis(&a.start).cmp(&event_timestamp_millis(&b.start))
            }
            SortField::End => event_timestamp_millis(&a.end).cmp(&event_timestamp_millis(&b.end)),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Stable sort of `events` in place
    pub fn sort(&self, events: &mut [&Event]) {
        let mut collator = Collator::default();
        events.sort_by(|a, b| self.compare(&mut collator, a, b));
    }
}

/// Case-insensitive title order under the Unicode collation algorithm, so
/// accented letters sort next to their base letter. Missing titles sort as
/// empty strings.
fn compare_titles(collator: &mut Collator, a: &Event, b: &Event) -> Ordering {
    collator.collate(a.normalized_title().as_str(), b.normalized_title().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::EventTime;

    fn timed(id: &str, summary: &str, start: &str, end: &str) -> Event {
        Event::new(id, Some(summary), EventTime::timed(start), EventTime::timed(end))
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_toggle_rules() {
        let mut state = SortState::default();
        assert_eq!(state, SortState::new(SortField::Start, SortDirection::Ascending));

        state.toggle(SortField::Start);
        assert_eq!(state.direction, SortDirection::Descending);

        // New field resets to ascending
        state.toggle(SortField::Title);
        assert_eq!(state, SortState::new(SortField::Title, SortDirection::Ascending));
        assert!(!state.is_default());
    }

    #[test]
    fn test_indicator() {
        let state = SortState::new(SortField::End, SortDirection::Descending);
        assert_eq!(state.indicator(SortField::End), "↓");
        assert_eq!(state.indicator(SortField::Title), "↕️");
        assert_eq!(SortState::default().indicator(SortField::Start), "↑");
    }

    #[test]
    fn test_all_day_sorts_as_epoch() {
        let all_day = Event::new(
            "all-day",
            Some("Holiday"),
            EventTime::all_day("2024-01-01"),
            EventTime::all_day("2024-01-02"),
        );
        let timed = timed("timed", "Meeting", "2024-01-02T10:00:00Z", "2024-01-02T11:00:00Z");

        let mut events = vec![&timed, &all_day];
        SortState::default().sort(&mut events);
        assert_eq!(ids(&events), vec!["all-day", "timed"]);
    }

    #[test]
    fn test_title_sort_is_case_insensitive() {
        let a = timed("a", "banana", "2024-01-01T00:00:00Z", "2024-01-01T01:00:00Z");
        let b = timed("b", "Apple", "2024-01-02T00:00:00Z", "2024-01-02T01:00:00Z");
        let c = timed("c", "cherry", "2024-01-03T00:00:00Z", "2024-01-03T01:00:00Z");

        let mut events = vec![&a, &b, &c];
        SortState::new(SortField::Title, SortDirection::Ascending).sort(&mut events);
        assert_eq!(ids(&events), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_title_sort_places_accented_letters_with_base_letter() {
        let eclair = timed("eclair", "Éclair tasting", "2024-01-01T00:00:00Z", "2024-01-01T01:00:00Z");
        let zebra = timed("zebra", "zebra talk", "2024-01-02T00:00:00Z", "2024-01-02T01:00:00Z");
        let fika = timed("fika", "Fika", "2024-01-03T00:00:00Z", "2024-01-03T01:00:00Z");

        let mut events = vec![&zebra, &fika, &eclair];
        SortState::new(SortField::Title, SortDirection::Ascending).sort(&mut events);
        assert_eq!(ids(&events), vec!["eclair", "fika", "zebra"]);

        SortState::new(SortField::Title, SortDirection::Descending).sort(&mut events);
        assert_eq!(ids(&events), vec!["zebra", "fika", "eclair"]);
    }

    #[test]
    fn test_direction_toggle_reverses_order() {
        let a = timed("a", "One", "2024-03-01T09:00:00Z", "2024-03-01T12:00:00Z");
        let b = timed("b", "Two", "2024-01-01T09:00:00Z", "2024-01-01T10:00:00Z");
        let c = timed("c", "Three", "2024-02-01T09:00:00Z", "2024-02-01T09:30:00Z");

        for field in SortField::ALL {
            let state = SortState::new(field, SortDirection::Ascending);
            let mut ascending = vec![&a, &b, &c];
            state.sort(&mut ascending);

            let mut descending = vec![&a, &b, &c];
            state.toggled(field).sort(&mut descending);

            let mut reversed = ids(&ascending);
            reversed.reverse();
            assert_eq!(ids(&descending), reversed, "field {:?}", field);
        }
    }

    #[test]
    fn test_parse_round_trip_names() {
        assert_eq!(SortField::parse("summary"), Some(SortField::Title));
        assert_eq!(SortField::parse("nope"), None);
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("up"), None);
    }
}
