//! Document write/read integration tests.

#[cfg(test)]
mod tests {
    use fq_core::{DocumentStore, SetMode};
    use serde_json::{Value as JsonValue, json};

    use crate::{cleanup_collection, emulator_store, fields, test_collection};

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_set_and_get_document() {
        let store = emulator_store();
        let collection = test_collection("get");
        let path = collection.doc("u1");

        let data = json!({
            "name": "ada",
            "age": 36,
            "score": 9.5,
            "tags": ["a", "b"],
            "meta": {"x": null}
        });
        store
            .set_document(&path, &fields(data.clone()), SetMode::Replace)
            .await
            .expect("set_document");

        let found = store
            .get_document(&path)
            .await
            .expect("get_document")
            .expect("document should exist");
        assert_eq!(JsonValue::Object(found.fields), data);

        cleanup_collection(&store, &collection).await;
    }

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_merge_nested_fields() {
        let store = emulator_store();
        let collection = test_collection("merge");
        let path = collection.doc("u1");

        store
            .set_document(&path, &fields(json!({"a": 1, "n": {"x": 1}})), SetMode::Replace)
            .await
            .expect("set_document");
        store
            .set_document(&path, &fields(json!({"b": 2, "n": {"y": 2}})), SetMode::Merge)
            .await
            .expect("merge");

        let found = store
            .get_document(&path)
            .await
            .expect("get_document")
            .expect("document should exist");
        assert_eq!(
            JsonValue::Object(found.fields),
            json!({"a": 1, "b": 2, "n": {"x": 1, "y": 2}})
        );

        cleanup_collection(&store, &collection).await;
    }

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_return_none_for_missing_document() {
        let store = emulator_store();
        let collection = test_collection("missing");
        let found = store
            .get_document(&collection.doc("nope"))
            .await
            .expect("get_document");
        assert!(found.is_none());
    }

    #[tokio::test]
    #[ignore = "requires running emulator"]
    async fn test_should_delete_document() {
        let store = emulator_store();
        let collection = test_collection("delete");
        let path = collection.doc("u1");
        store
            .set_document(&path, &fields(json!({"a": 1})), SetMode::Replace)
            .await
            .expect("set_document");

        store.delete_document(&path).await.expect("delete_document");
        assert!(store.get_document(&path).await.expect("get").is_none());
        store.delete_document(&path).await.expect("second delete");
    }
}
