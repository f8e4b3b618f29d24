//! Invariants that hold for any vocabulary over the fixture corpora.

use lexigraph::core::Scope;
use lexigraph::graph::{validate_map, Level, MapRequest};
use lexigraph::MapService;
use proptest::prelude::*;
use std::collections::HashSet;

use crate::common::{biology, weather, BIOLOGY_VOCABULARY};

const EXTRA_WORDS: [&str; 8] = [
    "rain", "floods", "erosion", "levees", "dna", "protein", "traits", "habitats",
];

fn vocabulary() -> impl Strategy<Value = Vec<String>> {
    let words: Vec<&'static str> = BIOLOGY_VOCABULARY.into_iter().chain(EXTRA_WORDS).collect();
    proptest::sample::subsequence(words, 0..=15)
        .prop_shuffle()
        .prop_map(|v| v.into_iter().map(str::to_string).collect())
}

fn request(vocabulary: Vec<String>, rooted: bool) -> MapRequest {
    let request = MapRequest::explicit(vocabulary);
    if rooted {
        request.with_root("r").with_scope(Scope::Children)
    } else {
        request
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn built_maps_are_well_formed(vocab in vocabulary(), rooted in any::<bool>(), on_weather in any::<bool>()) {
        let corpus = if on_weather { weather() } else { biology() };
        let rooted = rooted && !on_weather;
        let mut service = MapService::default();
        let Ok(_) = service.generate("p", &corpus, &request(vocab, rooted)) else {
            return Ok(());
        };
        let map = service.map("p").unwrap();
        prop_assert!(validate_map(map).is_empty());

        let mut pairs = HashSet::new();
        for edge in map.edges() {
            prop_assert!(pairs.insert(edge.pair_key()), "duplicate pair {:?}", edge.pair_key());
        }
        let majors: HashSet<&str> = map.nodes_at(Level::Major).map(|n| n.id.as_str()).collect();
        prop_assert!(!majors.is_empty());
        for detail in map.nodes_at(Level::Detail) {
            let parent = detail.parent_major_id.as_deref().unwrap_or("");
            prop_assert!(majors.contains(parent));
        }
    }

    #[test]
    fn settled_layouts_stay_on_canvas(vocab in vocabulary(), seed in any::<u64>(), expand in any::<bool>()) {
        let mut service = MapService::default();
        let Ok(_) = service.generate("p", &biology(), &request(vocab, true)) else {
            return Ok(());
        };
        let mut session = service.open_layout("p", Some(seed)).unwrap();
        if expand {
            let majors: Vec<String> = service
                .map("p")
                .unwrap()
                .nodes_at(Level::Major)
                .map(|n| n.id.clone())
                .collect();
            for major in majors {
                session.toggle_expanded(&major).unwrap();
            }
        }
        session.settle();
        for view in session.snapshot() {
            prop_assert!(session.canvas().contains(view.position), "{} at {:?}", view.id, view.position);
        }
    }
}
