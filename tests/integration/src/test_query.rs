//! Query integration tests.

#[cfg(test)]
mod tests {
    use fq_core::{DocumentStore, Query, parse_where};
    use fq_model::{Direction, Where};
    use serde_json::json;

    use crate::{cleanup_collection, emulator_store, ids, seed, test_collection};

    fn filters(raw: &[&str]) -> Vec<Where> {
        raw.iter()
            .map(|f| parse_where(f).unwrap_or_else(|e| panic!("{f}: {e}")))
            .collect()
    }

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_filter_order_and_count() {
        let store = emulator_store();
        let collection = test_collection("query");
        seed(
            &store,
            &collection,
            &[
                ("a", json!({"age": 20, "role": "dev", "tags": ["x"], "boss": null})),
                ("b", json!({"age": 35, "role": "admin", "tags": ["y"], "boss": "a"})),
                ("c", json!({"age": 50, "role": "dev", "tags": ["x", "z"], "boss": "b"})),
            ],
        )
        .await;

        let cases: &[(&[&str], &[&str])] = &[
            (&["age >= 35"], &["b", "c"]),
            (&["role == 'dev'", "age < 40"], &["a"]),
            (&["role != 'dev'"], &["b"]),
            (&["role in ['admin', 'ops']"], &["b"]),
            (&["tags array-contains-any ['z', 'y']"], &["b", "c"]),
            (&["boss == null"], &["a"]),
            (&["boss != null"], &["b", "c"]),
        ];
        for (raw, expected) in cases {
            let query = Query::new(collection.clone()).with_filters(filters(raw));
            let docs = store.run_query(&query).await.expect("run_query");
            assert_eq!(ids(&docs), *expected, "filters {raw:?}");
        }

        let query = Query::new(collection.clone())
            .with_order_by("age", Direction::Descending)
            .with_limit(2);
        let docs = store.run_query(&query).await.expect("run_query");
        let ordered: Vec<&str> = docs.iter().map(|d| d.path.id()).collect();
        assert_eq!(ordered, ["c", "b"]);

        let query = Query::new(collection.clone()).with_filters(filters(&["role == 'dev'"]));
        assert_eq!(store.count(&query).await.expect("count"), 2);

        cleanup_collection(&store, &collection).await;
    }
}
