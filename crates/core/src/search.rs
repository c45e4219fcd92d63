use crate::models::venue::Venue;

/// Shorter terms return no results.
pub const MIN_SEARCH_TERM_LEN: usize = 2;
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Case-insensitive substring match on name or address. Name matches rank
/// ahead of address-only matches; otherwise the input order is kept.
pub fn rank_venues(venues: Vec<Venue>, term: &str) -> Vec<Venue> {
    let needle = term.trim().to_lowercase();
    if needle.chars().count() < MIN_SEARCH_TERM_LEN {
        return Vec::new();
    }

    let mut matches: Vec<(bool, Venue)> = venues
        .into_iter()
        .filter_map(|venue| {
            let name_match = venue.name.to_lowercase().contains(&needle);
            let address_match = venue.address.to_lowercase().contains(&needle);
            (name_match || address_match).then_some((name_match, venue))
        })
        .collect();

    // stable
    matches.sort_by_key(|(name_match, _)| !*name_match);

    matches
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|(_, venue)| venue)
        .collect()
}
