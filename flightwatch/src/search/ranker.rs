//! Scoring functions and the top-N ranker.

use super::{Ranked, SearchConfig, SearchResults};
use crate::airport::ReferenceAirport;
use crate::entity::{is_placeholder, Entity};

/// Match quality of one field against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Exact,
    Prefix,
    Substring,
}

/// Classify how `field` matches the lowercased `query`.
fn match_kind(field: &str, query: &str) -> Option<MatchKind> {
    if field.is_empty() || is_placeholder(field) {
        return None;
    }

    let field = field.to_lowercase();
    if field == query {
        Some(MatchKind::Exact)
    } else if field.starts_with(query) {
        Some(MatchKind::Prefix)
    } else if field.contains(query) {
        Some(MatchKind::Substring)
    } else {
        None
    }
}

/// Points for one field, given the weight of each tier.
fn tier_score(field: &str, query: &str, weights: [u32; 3]) -> u32 {
    match match_kind(field, query) {
        Some(MatchKind::Exact) => weights[0],
        Some(MatchKind::Prefix) => weights[1],
        Some(MatchKind::Substring) => weights[2],
        None => 0,
    }
}

/// Best score across the fields of one group.
fn group_score<'a>(fields: impl IntoIterator<Item = (&'a str, [u32; 3])>, query: &str) -> u32 {
    fields
        .into_iter()
        .map(|(field, weights)| tier_score(field, query, weights))
        .max()
        .unwrap_or(0)
}

/// Score an aircraft against an already lowercased query.
pub fn score_entity(entity: &Entity, query: &str) -> u32 {
    let ident = group_score(
        [
            (entity.callsign.as_str(), [100, 50, 20]),
            (entity.id.as_str(), [100, 50, 0]),
        ],
        query,
    );
    let airline = tier_score(&entity.airline, query, [40, 40, 15]);
    let country = tier_score(&entity.origin_country, query, [10, 10, 10]);
    let route = entity.route.as_ref().map_or(0, |route| {
        group_score(
            [
                (route.origin_code.as_str(), [90, 25, 25]),
                (route.destination_code.as_str(), [90, 25, 25]),
            ],
            query,
        )
    });

    ident + airline + country + route
}

/// Score an airport against an already lowercased query.
pub fn score_airport(airport: &ReferenceAirport, query: &str) -> u32 {
    let code = group_score(
        [
            (airport.iata_code.as_str(), [100, 80, 0]),
            (airport.icao_code.as_str(), [100, 80, 0]),
        ],
        query,
    );
    let name = tier_score(&airport.name, query, [60, 60, 30]);
    let city = tier_score(&airport.city, query, [50, 50, 25]);
    let country = tier_score(&airport.country, query, [15, 15, 15]);

    code + name + city + country
}

/// Keep the `limit` best-scoring items, stable on input order for ties.
fn top_n<'a, T, I, F>(candidates: I, limit: usize, score: F) -> Vec<Ranked<T>>
where
    T: Clone + 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> u32,
{
    let mut hits: Vec<(u32, &T)> = candidates
        .into_iter()
        .map(|item| (score(item), item))
        .filter(|(score, _)| *score > 0)
        .collect();

    // sort_by is stable
    hits.sort_by(|a, b| b.0.cmp(&a.0));
    hits.truncate(limit);

    hits.into_iter()
        .map(|(score, item)| Ranked {
            item: item.clone(),
            score,
        })
        .collect()
}

/// Ranks aircraft and airports against a free-text query.
#[derive(Debug, Clone, Default)]
pub struct SearchRanker {
    config: SearchConfig,
}

impl SearchRanker {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Normalize the query, or `None` if it is too short to search.
    fn prepare(&self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() || query.chars().count() < self.config.min_query_len {
            return None;
        }
        Some(query.to_lowercase())
    }

    /// Rank both categories.
    pub fn search<'a>(
        &self,
        query: &str,
        entities: impl IntoIterator<Item = &'a Entity>,
        airports: impl IntoIterator<Item = &'a ReferenceAirport>,
    ) -> SearchResults {
        let Some(query) = self.prepare(query) else {
            return SearchResults::default();
        };

        let results = SearchResults {
            entities: top_n(entities, self.config.max_results, |e| {
                score_entity(e, &query)
            }),
            airports: top_n(airports, self.config.max_results, |a| {
                score_airport(a, &query)
            }),
        };

        tracing::trace!(
            query = %query,
            entities = results.entities.len(),
            airports = results.airports.len(),
            "Search ranked"
        );
        results
    }

    /// Rank aircraft only.
    pub fn rank_entities<'a>(
        &self,
        query: &str,
        entities: impl IntoIterator<Item = &'a Entity>,
    ) -> Vec<Ranked<Entity>> {
        match self.prepare(query) {
            Some(query) => top_n(entities, self.config.max_results, |e| {
                score_entity(e, &query)
            }),
            None => Vec::new(),
        }
    }

    /// Rank airports only.
    pub fn rank_airports<'a>(
        &self,
        query: &str,
        airports: impl IntoIterator<Item = &'a ReferenceAirport>,
    ) -> Vec<Ranked<ReferenceAirport>> {
        match self.prepare(query) {
            Some(query) => top_n(airports, self.config.max_results, |a| {
                score_airport(a, &query)
            }),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{GeoPoint, Kinematics, Route};

    fn aircraft(id: &str, callsign: &str) -> Entity {
        Entity::at_now(id, GeoPoint::new(0.0, 0.0), Kinematics::stationary())
            .with_callsign(callsign)
    }

    fn airport(icao: &str, iata: &str, name: &str, city: &str, country: &str) -> ReferenceAirport {
        ReferenceAirport::new(icao, iata, name).in_city(city, country)
    }

    #[test]
    fn test_equal_prefix_scores_keep_insertion_order() {
        let entities = vec![aircraft("400a01", "BAW123"), aircraft("400a02", "BAW456")];
        let ranked = SearchRanker::default().rank_entities("baw", &entities);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].item.callsign, "BAW123");
        assert_eq!(ranked[1].item.callsign, "BAW456");
        assert_eq!(ranked[0].score, 50);
        assert_eq!(ranked[1].score, 50);
    }

    #[test]
    fn test_exact_iata_ranks_first() {
        let airports = vec![
            airport("KXYZ", "", "JFK Memorial Field", "Somewhere", "US"),
            airport("KJFK", "JFK", "John F Kennedy International Airport", "New York", "US"),
        ];
        let ranked = SearchRanker::default().rank_airports("JFK", &airports);

        assert_eq!(ranked[0].item.icao_code, "KJFK");
        assert_eq!(ranked[0].score, 100);
        assert_eq!(ranked[1].score, 60);
    }

    #[test]
    fn test_short_query_returns_nothing() {
        let entities = vec![aircraft("400a01", "BAW123")];
        let airports = vec![airport("EGLL", "LHR", "London Heathrow", "London", "GB")];
        let ranker = SearchRanker::default();

        assert!(ranker.search("b", &entities, &airports).is_empty());
        assert!(ranker.search("   ", &entities, &airports).is_empty());
        assert!(!ranker.search("ba", &entities, &airports).is_empty());
    }

    #[test]
    fn test_min_query_len_one() {
        let ranker = SearchRanker::new(SearchConfig {
            min_query_len: 1,
            max_results: 5,
        });
        let entities = vec![aircraft("400a01", "BAW123")];
        assert_eq!(ranker.rank_entities("b", &entities).len(), 1);
    }

    #[test]
    fn test_results_truncated() {
        let entities: Vec<Entity> = (0..8)
            .map(|i| aircraft(&format!("a{}", i), &format!("DLH{}", i)))
            .collect();
        let ranked = SearchRanker::default().rank_entities("dlh", &entities);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[4].item.callsign, "DLH4");
    }

    #[test]
    fn test_higher_score_beats_insertion_order() {
        let entities = vec![
            aircraft("a1", "XBAW1"),
            aircraft("a2", "BAW1"),
            aircraft("a3", "BAW"),
        ];
        let ranked = SearchRanker::default().rank_entities("baw", &entities);

        let callsigns: Vec<&str> = ranked.iter().map(|r| r.item.callsign.as_str()).collect();
        assert_eq!(callsigns, vec!["BAW", "BAW1", "XBAW1"]);
        assert_eq!(ranked[2].score, 20);
    }

    #[test]
    fn test_entity_fields_are_additive() {
        let entity = aircraft("3c6444", "DLH400")
            .with_airline("Lufthansa")
            .with_origin_country("Germany")
            .with_route(Route::new("FRA", "JFK"));

        assert_eq!(score_entity(&entity, "dlh400"), 100);
        assert_eq!(score_entity(&entity, "3c6444"), 100);
        assert_eq!(score_entity(&entity, "3c6"), 50);
        assert_eq!(score_entity(&entity, "luf"), 40);
        assert_eq!(score_entity(&entity, "hansa"), 15);
        assert_eq!(score_entity(&entity, "germ"), 10);
        assert_eq!(score_entity(&entity, "fra"), 90);
        assert_eq!(score_entity(&entity, "fr"), 25);
        assert_eq!(score_entity(&entity, "zzz"), 0);
    }

    #[test]
    fn test_placeholders_never_match() {
        let entity = aircraft("abc123", "N/A");
        assert_eq!(score_entity(&entity, "n/a"), 0);
        assert_eq!(score_entity(&entity, "unknown"), 0);
        assert_eq!(score_entity(&entity, "unk"), 0);
    }

    #[test]
    fn test_airport_fields_are_additive() {
        let toulouse = airport("LFBO", "TLS", "Toulouse-Blagnac", "Toulouse", "France");

        assert_eq!(score_airport(&toulouse, "lfbo"), 100);
        assert_eq!(score_airport(&toulouse, "lf"), 80);
        // Prefix name (60) + prefix city (50)
        assert_eq!(score_airport(&toulouse, "toul"), 110);
        assert_eq!(score_airport(&toulouse, "blagnac"), 30);
        assert_eq!(score_airport(&toulouse, "fran"), 15);
    }

    #[test]
    fn test_search_ranks_both_categories() {
        let entities = vec![aircraft("a1", "TLS001")];
        let airports = vec![airport("LFBO", "TLS", "Toulouse-Blagnac", "Toulouse", "FR")];

        let results = SearchRanker::default().search("tls", &entities, &airports);
        assert_eq!(results.entities.len(), 1);
        assert_eq!(results.airports.len(), 1);
        assert_eq!(results.airports[0].score, 100);
    }
}
