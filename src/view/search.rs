use crate::components::google_calendar::Event;

/// Whether an event's title matches a search query.
///
/// Matching is case-insensitive: a blank query matches everything, otherwise
/// the title must contain the query or have a word starting with it.
pub fn matches_query(event: &Event, query: &str) -> bool {
    let query = query.to_lowercase();
    if query.trim().is_empty() {
        return true;
    }

    let title = event.normalized_title();
    if title.contains(&query) {
        return true;
    }

    title.split_whitespace().any(|word| word.starts_with(&query))
}

/// Keep the events matching `query`, preserving their order
pub fn filter_events<'a, I>(events: I, query: &str) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .filter(|event| matches_query(event, query))
        .collect()
}
