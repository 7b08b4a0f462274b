use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use token_pulse::model::{Category, SortDirection, SortKey, SortSpec, Token};
use token_pulse::simulator::{generate_tokens, perturb_tokens, Perturbation};
use token_pulse::view::{compare_by_key, derive_view, ViewQuery};

const NOW: u64 = 1_716_400_000_000;
const QUERIES: [&str; 6] = ["", "pe", "DOGE", "wif1", "zzz", " bonk "];

fn collections() -> Vec<Vec<Token>> {
    (0..12u64)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let count = rng.gen_range(0..60);
            let tokens = generate_tokens(count, &mut rng, NOW);
            perturb_tokens(&tokens, &mut rng, NOW + 2_500, &Perturbation::default())
        })
        .collect()
}

fn every_sort() -> impl Iterator<Item = SortSpec> {
    SortKey::ALL.into_iter().flat_map(|key| {
        [SortDirection::Ascending, SortDirection::Descending]
            .into_iter()
            .map(move |direction| SortSpec::new(key, direction))
    })
}

#[test]
fn rows_belong_to_the_requested_category() {
    for tokens in collections() {
        for category in Category::ALL {
            for sort in every_sort() {
                let view = derive_view(&tokens, category, None, sort);
                assert!(view.iter().all(|token| token.category == category));
            }
        }
    }
}

#[test]
fn rows_match_the_search_text() {
    for tokens in collections() {
        for category in Category::ALL {
            for query in QUERIES {
                let needle = query.trim().to_lowercase();
                let view = derive_view(&tokens, category, Some(query), SortSpec::default());
                for token in &view {
                    assert!(
                        token.name.to_lowercase().contains(&needle)
                            || token.symbol.to_lowercase().contains(&needle),
                        "{} / {} does not match {query:?}",
                        token.name,
                        token.symbol
                    );
                }

                let in_category = tokens.iter().filter(|t| t.category == category).count();
                assert!(view.len() <= in_category);
            }
        }
    }
}

#[test]
fn rows_are_ordered_by_the_sort_field() {
    for tokens in collections() {
        for category in Category::ALL {
            for sort in every_sort() {
                let view = derive_view(&tokens, category, None, sort);
                for pair in view.windows(2) {
                    let ordering = compare_by_key(&pair[0], &pair[1], sort.key);
                    match sort.direction {
                        SortDirection::Ascending => assert!(ordering.is_le(), "{sort:?}"),
                        SortDirection::Descending => assert!(ordering.is_ge(), "{sort:?}"),
                    }
                }
            }
        }
    }
}

#[test]
fn deriving_twice_gives_the_same_rows() {
    for tokens in collections() {
        let before = tokens.clone();
        for query in QUERIES {
            let view = ViewQuery::new(Category::FinalStretch)
                .with_search(query)
                .with_sort(SortSpec::ascending(SortKey::Holders));
            assert_eq!(view.derive(&tokens), view.derive(&tokens));
        }
        assert_eq!(tokens, before, "input must not be mutated");
    }
}

#[test]
fn empty_search_keeps_the_whole_category() {
    for tokens in collections() {
        for category in Category::ALL {
            let unfiltered = derive_view(&tokens, category, None, SortSpec::default());
            let blank = derive_view(&tokens, category, Some(""), SortSpec::default());
            let expected = tokens.iter().filter(|t| t.category == category).count();
            assert_eq!(unfiltered.len(), expected);
            assert_eq!(unfiltered, blank);
        }
    }
}
