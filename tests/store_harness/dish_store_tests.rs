//! Macro-generated test suite for `DishStore` contract validation.
//!
//! The `dish_store_tests!` macro generates a test module that validates any
//! `DishStore` implementation: every narrow query, the combined query under
//! both match strategies, error cases and concurrent reads.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//!
//! async fn seeded(dishes: Vec<Dish>) -> InMemoryDishStore {
//!     InMemoryDishStore::with_dishes(dishes)
//! }
//!
//! dish_store_tests!(seeded);
//! ```
//!
//! # Generated Tests
//!
//! ## Narrow queries
//! - `test_fetch_all` / `test_fetch_all_empty`
//! - `test_fetch_by_id`
//! - `test_fetch_by_category_*` - membership, union of ids, no match
//! - `test_fetch_by_max_price_inclusive`
//! - `test_fetch_by_min_popularity_uses_price`
//! - `test_fetch_by_name_match_*` - case folding, regex semantics, look-around,
//!   bad pattern
//!
//! ## Combined query
//! - `test_match_all_example` - the A/B/C worked example
//! - `test_match_all_sentinels_are_noops`
//! - `test_pushdown_matches_in_memory` - both strategies agree
//!
//! ## Edge Cases
//! - `test_idempotent_reads`
//! - `test_concurrent_access` - parallel queries from spawned tasks

/// Generate a full `DishStore` conformance test suite.
///
/// `$seed` must name an async function taking `Vec<Dish>` and returning a
/// store that holds exactly those dishes. It is called once per test so that
/// every test runs against its own data.
#[macro_export]
macro_rules! dish_store_tests {
    ($seed:path) => {
        mod dish_store_contract_tests {
            use super::*;
            use dishes::core::{
                Criterion, CriteriaMatcher, Dish, DishCriteria, DishStore, MatchStrategy,
                StoreError,
            };
            use rust_decimal_macros::dec;
            use std::sync::Arc;

            async fn sample_store() -> Arc<dyn DishStore> {
                Arc::new($seed(sample_menu()).await)
            }

            // ==================================================================
            // fetch_all / fetch_by_id
            // ==================================================================

            #[tokio::test]
            async fn test_fetch_all() {
                let store = sample_store().await;

                let all = store.fetch_all().await.unwrap();
                assert_eq!(id_set(&all), id_set(&sample_menu()));

                let tea = all.iter().find(|d| d.id == "tea").unwrap();
                assert_eq!(tea.name, "Jasmine Tea");
                assert_eq!(tea.price, dec!(2.5));
                assert!(tea.category.is_empty());
            }

            #[tokio::test]
            async fn test_fetch_all_empty() {
                let store = $seed(Vec::<Dish>::new()).await;
                assert!(store.fetch_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_fetch_by_id() {
                let store = sample_store().await;

                let rice = store.fetch_by_id("rice").await.unwrap().unwrap();
                assert_eq!(rice.name, "Fried Rice");
                assert_eq!(rice.category_ids().collect::<Vec<_>>(), vec![MAINS, VEGGIE]);

                assert!(store.fetch_by_id("no-such-dish").await.unwrap().is_none());
            }

            // ==================================================================
            // fetch_by_category
            // ==================================================================

            #[tokio::test]
            async fn test_fetch_by_category_membership() {
                let store = sample_store().await;

                let dishes = store.fetch_by_category(&strings(&[STARTERS])).await.unwrap();
                assert_eq!(id_set(&dishes), ids(&["rolls", "soup"]));
            }

            #[tokio::test]
            async fn test_fetch_by_category_union_of_ids() {
                let store = sample_store().await;

                let dishes = store
                    .fetch_by_category(&strings(&[STARTERS, VEGGIE]))
                    .await
                    .unwrap();
                // each dish appears once even when several of its categories match
                assert_eq!(id_set(&dishes), ids(&["gcur", "rice", "rolls", "soup"]));
            }

            #[tokio::test]
            async fn test_fetch_by_category_no_match() {
                let store = sample_store().await;

                let dishes = store.fetch_by_category(&strings(&["desserts"])).await.unwrap();
                assert!(dishes.is_empty());

                let dishes = store.fetch_by_category(&[]).await.unwrap();
                assert!(dishes.is_empty());
            }

            // ==================================================================
            // fetch_by_max_price / fetch_by_min_popularity
            // ==================================================================

            #[tokio::test]
            async fn test_fetch_by_max_price_inclusive() {
                let store = sample_store().await;

                let dishes = store.fetch_by_max_price(dec!(8)).await.unwrap();
                assert_eq!(id_set(&dishes), ids(&["rice", "rolls", "tea"]));
                assert!(dishes.iter().all(|d| d.price <= dec!(8)));

                assert!(store.fetch_by_max_price(dec!(1)).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_fetch_by_min_popularity_uses_price() {
                let store = sample_store().await;

                let dishes = store.fetch_by_min_popularity(10).await.unwrap();
                assert_eq!(id_set(&dishes), ids(&["curry", "gcur", "soup"]));
            }

            // ==================================================================
            // fetch_by_name_match
            // ==================================================================

            #[tokio::test]
            async fn test_fetch_by_name_match_case_insensitive() {
                let store = sample_store().await;

                let dishes = store.fetch_by_name_match("curry", true).await.unwrap();
                assert_eq!(id_set(&dishes), ids(&["curry", "gcur"]));

                let dishes = store.fetch_by_name_match("curry", false).await.unwrap();
                assert!(dishes.is_empty());
            }

            #[tokio::test]
            async fn test_fetch_by_name_match_is_regex() {
                let store = sample_store().await;

                // parentheses group, they do not match literally
                let dishes = store.fetch_by_name_match("Curry (XL)", true).await.unwrap();
                assert!(dishes.is_empty());

                let dishes = store
                    .fetch_by_name_match(r"Curry \(XL\)", true)
                    .await
                    .unwrap();
                assert_eq!(id_set(&dishes), ids(&["gcur"]));

                let dishes = store.fetch_by_name_match("^t.*(y|a)$", true).await.unwrap();
                assert_eq!(id_set(&dishes), ids(&["curry"]));
            }

            #[tokio::test]
            async fn test_fetch_by_name_match_lookaround_and_backreference() {
                let store = sample_store().await;

                let dishes = store
                    .fetch_by_name_match("curry(?= \\()", true)
                    .await
                    .unwrap();
                assert_eq!(id_set(&dishes), ids(&["gcur"]));

                let dishes = store
                    .fetch_by_name_match("(?<!green )curry", true)
                    .await
                    .unwrap();
                assert_eq!(id_set(&dishes), ids(&["curry"]));

                let dishes = store.fetch_by_name_match(r"(l)\1", true).await.unwrap();
                assert_eq!(id_set(&dishes), ids(&["rolls"]));
            }

            #[tokio::test]
            async fn test_fetch_by_name_match_invalid_pattern() {
                let store = sample_store().await;

                let err = store.fetch_by_name_match("curry(", true).await.unwrap_err();
                assert!(
                    matches!(err, StoreError::InvalidPattern { .. }),
                    "expected InvalidPattern, got {err:?}"
                );
            }

            // ==================================================================
            // match_all
            // ==================================================================

            #[tokio::test]
            async fn test_match_all_example() {
                let matcher = CriteriaMatcher::new(Arc::new($seed(example_menu()).await));

                let criteria = DishCriteria::new().max_price(dec!(10)).category_ids(["1"]);
                let dishes = matcher.match_all(&criteria).await.unwrap();
                assert_eq!(id_set(&dishes), ids(&["A", "C"]));
            }

            #[tokio::test]
            async fn test_match_all_sentinels_are_noops() {
                let matcher = CriteriaMatcher::new(sample_store().await);

                let dishes = matcher
                    .match_all(
                        &DishCriteria::new()
                            .max_price(dec!(0))
                            .min_likes(25)
                            .search_by(" ")
                            .category_ids(Vec::<String>::new()),
                    )
                    .await
                    .unwrap();
                assert_eq!(id_set(&dishes), id_set(&sample_menu()));
            }

            #[tokio::test]
            async fn test_match_all_search_is_literal() {
                let matcher = CriteriaMatcher::new(sample_store().await);

                let dishes = matcher
                    .match_all(&DishCriteria::new().search_by("CURRY (xl)"))
                    .await
                    .unwrap();
                assert_eq!(id_set(&dishes), ids(&["gcur"]));
            }

            #[tokio::test]
            async fn test_pushdown_matches_in_memory() {
                let store = sample_store().await;
                let in_memory = CriteriaMatcher::new(store.clone());
                let pushdown = CriteriaMatcher::new(store).with_strategy(MatchStrategy::Pushdown);

                let cases = vec![
                    DishCriteria::new(),
                    DishCriteria::new().max_price(dec!(10)),
                    DishCriteria::new().min_likes(3),
                    DishCriteria::new().search_by("rice"),
                    DishCriteria::new().search_by("(xl)").category_ids([VEGGIE]),
                    DishCriteria::new()
                        .max_price(dec!(15))
                        .search_by("curry")
                        .category_ids([MAINS, STARTERS]),
                    DishCriteria::new().max_price(dec!(3)).category_ids([MAINS]),
                ];

                for criteria in cases {
                    let a = in_memory.match_all(&criteria).await.unwrap();
                    let b = pushdown.match_all(&criteria).await.unwrap();
                    assert_eq!(id_set(&a), id_set(&b), "strategies disagree for {criteria:?}");
                }
            }

            #[tokio::test]
            async fn test_match_all_price_only_equals_native() {
                let matcher = CriteriaMatcher::new(sample_store().await);

                let combined = matcher
                    .match_all(&DishCriteria::new().max_price(dec!(10)))
                    .await
                    .unwrap();
                let native = matcher.fetch(&Criterion::MaxPrice(dec!(10))).await.unwrap();
                assert_eq!(id_set(&combined), id_set(&native));
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_idempotent_reads() {
                let store = sample_store().await;

                let first = store.fetch_by_category(&strings(&[MAINS])).await.unwrap();
                let second = store.fetch_by_category(&strings(&[MAINS])).await.unwrap();
                assert_eq!(id_set(&first), id_set(&second));

                let first = store.fetch_all().await.unwrap();
                let second = store.fetch_all().await.unwrap();
                assert_eq!(id_set(&first), id_set(&second));
            }

            #[tokio::test]
            async fn test_concurrent_access() {
                let store = sample_store().await;

                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        if i % 2 == 0 {
                            store.fetch_by_max_price(dec!(10)).await
                        } else {
                            store.fetch_by_name_match("rice|rolls", true).await
                        }
                    }));
                }

                for (i, handle) in handles.into_iter().enumerate() {
                    let dishes = handle.await.unwrap().unwrap();
                    if i % 2 == 0 {
                        assert_eq!(id_set(&dishes), ids(&["rice", "rolls", "soup", "tea"]));
                    } else {
                        assert_eq!(id_set(&dishes), ids(&["rice", "rolls"]));
                    }
                }
            }
        }
    };
}
