//! Behaviour of the in-memory backend against the fixture data set.

use bson::{Bson, doc};
use memlayer::{memory::InMemoryStore, prelude::*};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

const FIXTURE: &str = include_str!("fixtures/data.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    id: RecordId,
    name: Option<String>,
    owner_id: Option<i64>,
    #[serde(default)]
    locations: Vec<Location>,
}

impl Entity for Content {
    fn collection_name() -> &'static str {
        "Content"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    id: RecordId,
    content_id: RecordId,
    parent_id: Option<RecordId>,
}

impl Entity for Location {
    fn collection_name() -> &'static str {
        "Content\\Location"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentType {
    id: RecordId,
    identifier: String,
    content_type_group_ids: Vec<RecordId>,
}

impl Entity for ContentType {
    fn collection_name() -> &'static str {
        "Content\\Type"
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("memlayer_memory=debug")),
        )
        .with_test_writer()
        .try_init();
}

fn fixture() -> Value {
    serde_json::from_str(FIXTURE).unwrap()
}

/// The fixture data set with its content replaced by `bar0`..`bar9` (owned by 42)
/// followed by `foo0`..`foo9` (no owner), numbered 1 to 20.
async fn store() -> RecordStore<InMemoryStore> {
    init_tracing();

    let mut data = fixture();
    data["Content"] = json!([]);

    let store = RecordStore::new(
        InMemoryStore::builder()
            .json_seed(data)
            .build()
            .await
            .unwrap(),
    );
    let content = store.collection("Content");

    for i in 0..10 {
        content.create(doc! { "name": format!("bar{i}"), "ownerId": 42 }).await.unwrap();
    }
    for i in 0..10 {
        content.create(doc! { "name": format!("foo{i}") }).await.unwrap();
    }

    store
}

fn empty_filters() -> Vec<Filter> {
    vec![
        Filter::matching("unexistingKey", "bar0"),
        Filter::matching("unexistingKey", "bar0").and("baz0", "buzz0"),
        Filter::matching("foo0", "unexistingValue"),
        Filter::matching("foo0", "unexistingValue").and("baz0", "buzz0"),
        Filter::matching("foo0", ""),
        Filter::matching("foo0", "bar0").and("baz0", ""),
        Filter::matching("foo0", "bar0").and("baz0", "buzz1"),
        Filter::list(["foo0"]),
        Filter::list(["int"]),
        Filter::list(["float"]),
    ]
}

fn matching_filters() -> Vec<(Filter, Vec<(RecordId, String)>)> {
    vec![
        (Filter::matching("name", "bar0"), vec![(1, "bar0".to_string())]),
        (Filter::matching("name", "foo5"), vec![(16, "foo5".to_string())]),
        (
            Filter::matching("ownerId", 42),
            (0..10).map(|i| (i + 1, format!("bar{i}"))).collect(),
        ),
    ]
}

#[tokio::test]
async fn find_without_results() {
    let store = store().await;
    let content = store.collection("Content");

    for filter in empty_filters() {
        assert_eq!(content.find(filter.clone()).await.unwrap(), Vec::<Record>::new(), "{filter:?}");
    }
}

#[tokio::test]
async fn find_with_results() {
    let store = store().await;
    let content = store.typed_collection::<Content>();

    for (filter, expected) in matching_filters() {
        let found = content
            .find(filter)
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.id, c.name.unwrap_or_default()))
            .collect::<Vec<_>>();

        assert_eq!(found, expected);
    }
}

#[tokio::test]
async fn find_matches_inside_arrays() {
    let store = store().await;

    let types = store
        .typed_collection::<ContentType>()
        .find(Filter::matching("contentTypeGroupIds", 1))
        .await
        .unwrap();

    assert_eq!(types.len(), 1);
    assert_eq!(types[0].id, 1);
    assert_eq!(types[0].identifier, "folder");
}

#[tokio::test]
async fn find_with_join() {
    init_tracing();

    let store = RecordStore::new(
        InMemoryStore::builder()
            .json_seed(fixture())
            .build()
            .await
            .unwrap(),
    );

    let found = store
        .typed_collection::<Content>()
        .find(
            Query::builder()
                .filter(Filter::matching("id", 1))
                .join("locations", Join::new("Content\\Location").on("contentId", "id"))
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);
    assert_eq!(found[0].name.as_deref(), Some("eZ Publish"));
    assert_eq!(
        found[0].locations,
        vec![Location { id: 2, content_id: 1, parent_id: Some(1) }]
    );
}

#[tokio::test]
async fn find_with_declarative_sub_join() {
    init_tracing();

    let store = RecordStore::new(
        InMemoryStore::builder()
            .json_seed(fixture())
            .build()
            .await
            .unwrap(),
    );

    let joins = JoinSpec::from_document(&doc! {
        "locations": {
            "type": "Content\\Location",
            "match": { "contentId": "id" },
            "sub": {
                "parent": {
                    "type": "Content\\Location",
                    "match": { "id": "parentId" },
                },
            },
        },
    })
    .unwrap();

    let found = store
        .collection("Content")
        .find(Query::builder().filter(Filter::matching("id", "1")).joins(joins).build())
        .await
        .unwrap();

    let location = found[0].get_array("locations").unwrap()[0].as_document().unwrap();
    let parent = location.get_array("parent").unwrap();

    assert_eq!(location.get_i64("id").unwrap(), 2);
    assert_eq!(parent.len(), 1);
    assert_eq!(parent[0].as_document().and_then(|p| p.get_str("pathString").ok()), Some("/1/"));
}

#[test]
fn malformed_join_descriptors_are_rejected() {
    let err = JoinSpec::from_document(&doc! { "locations": { "match": { "contentId": "id" } } })
        .unwrap_err();

    assert!(matches!(err, RecordStoreError::InvalidQuery(_)));
}

#[tokio::test]
async fn count_without_results() {
    let store = store().await;
    let content = store.collection("Content");

    for filter in empty_filters() {
        assert_eq!(content.count(filter.clone()).await.unwrap(), 0, "{filter:?}");
    }
}

#[tokio::test]
async fn count_with_results() {
    let store = store().await;
    let content = store.collection("Content");

    for (filter, expected) in matching_filters() {
        assert_eq!(content.count(filter).await.unwrap(), expected.len());
    }
}

#[tokio::test]
async fn load_without_results() {
    let store = store().await;
    let content = store.collection("Content");

    for id in [
        Bson::String(String::new()),
        Bson::Null,
        Bson::Int32(0),
        Bson::Double(0.1),
        Bson::String("0".into()),
        Bson::String("0.1".into()),
        Bson::String("unexistingKey".into()),
    ] {
        assert_eq!(content.load(id.clone()).await.unwrap(), None, "{id:?}");
    }
}

#[tokio::test]
async fn load_with_results() {
    let store = store().await;
    let content = store.typed_collection::<Content>();

    let cases = [
        (Bson::Int32(1), 1, "bar0", Some(42)),
        (Bson::String("1".into()), 1, "bar0", Some(42)),
        (Bson::String("1.0".into()), 1, "bar0", Some(42)),
        (Bson::Int32(2), 2, "bar1", Some(42)),
        (Bson::Int32(11), 11, "foo0", None),
    ];

    for (id, expected_id, name, owner_id) in cases {
        let loaded = content.load(id).await.unwrap().unwrap();

        assert_eq!(loaded.id, expected_id);
        assert_eq!(loaded.name.as_deref(), Some(name));
        assert_eq!(loaded.owner_id, owner_id);
    }
}

#[tokio::test]
async fn update_unexisting_id() {
    let store = store().await;

    assert!(!store.collection("Content").update(0, doc! {}).await.unwrap());
}

#[tokio::test]
async fn update_new_attribute() {
    let store = store().await;
    let content = store.typed_collection::<Content>();

    assert!(content.update(1, doc! { "ownerId": 5 }).await.unwrap());

    let loaded = content.load(1).await.unwrap().unwrap();
    assert_eq!(loaded.id, 1);
    assert_eq!(loaded.name.as_deref(), Some("bar0"));
    assert_eq!(loaded.owner_id, Some(5));
}

#[tokio::test]
async fn update_existing_attribute() {
    let store = store().await;
    let content = store.typed_collection::<Content>();

    assert!(content.update(2, doc! { "name": "Testing" }).await.unwrap());
    assert_eq!(
        content.load(2).await.unwrap().and_then(|c| c.name),
        Some("Testing".to_string())
    );
}

#[tokio::test]
async fn update_with_null_value() {
    let store = store().await;
    let content = store.collection("Content");

    assert!(content.update(3, doc! { "name": Bson::Null }).await.unwrap());

    let loaded = content.load(3).await.unwrap().unwrap();
    assert_eq!(loaded.get("name"), Some(&Bson::Null));
    assert_eq!(loaded.get_i32("ownerId").unwrap(), 42);
}

#[tokio::test]
async fn seeded_sequences_continue_after_highest_id() {
    init_tracing();

    let store = RecordStore::new(
        InMemoryStore::builder()
            .json_seed(fixture())
            .build()
            .await
            .unwrap(),
    );

    let id = store
        .typed_collection::<Location>()
        .create(doc! { "contentId": 1, "parentId": 2 })
        .await
        .unwrap();

    assert_eq!(id, 3);
    assert_eq!(
        store.list_collections().await.unwrap(),
        vec![
            "Content",
            "Content\\Location",
            "Content\\Section",
            "Content\\Type",
            "Content\\Type\\Group",
        ]
    );
}

fn identifier(collection: &str, record: Record) -> RecordStoreResult<String> {
    record
        .get_str("identifier")
        .map(|identifier| format!("{collection}:{identifier}"))
        .map_err(|err| RecordStoreError::Serialization(err.to_string()))
}

#[tokio::test]
async fn custom_hydrators_shape_results() {
    let store = store().await;

    let identifiers = store
        .hydrated_collection("Content\\Type", identifier)
        .find(Query::new())
        .await
        .unwrap();

    assert_eq!(identifiers, vec!["Content\\Type:folder", "Content\\Type:user"]);
}

#[tokio::test]
async fn hydration_failures_are_errors() {
    let store = store().await;

    let err = store
        .typed_collection::<ContentType>()
        .with_hydrator(EntityHydrator::<Location>::new())
        .find(Query::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RecordStoreError::Serialization(_)));
}

fn filter_strategy() -> impl Strategy<Value = Filter> {
    let field = prop_oneof![
        Just("name"),
        Just("ownerId"),
        Just("id"),
        Just("unexistingKey"),
    ];
    let value = prop_oneof![
        (0..25_i64).prop_map(Bson::Int64),
        (0..25_i64).prop_map(|n| Bson::String(n.to_string())),
        (0..10_i32).prop_map(|n| Bson::String(format!("bar{n}"))),
        (0..10_i32).prop_map(|n| Bson::String(format!("foo{n}"))),
        Just(Bson::Null),
    ];

    prop::collection::vec((field, value), 0..3)
        .prop_map(|conditions| conditions.into_iter().collect::<Filter>())
}

proptest! {
    #[test]
    fn count_always_equals_find_length(filter in filter_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let (count, found) = runtime.block_on(async {
            let store = store().await;
            let content = store.collection("Content");

            (
                content.count(filter.clone()).await.unwrap(),
                content.find(filter.clone()).await.unwrap(),
            )
        });

        prop_assert_eq!(count, found.len());

        let mut ids = found.iter().filter_map(RecordExt::record_id).collect::<Vec<_>>();
        let unsorted = ids.clone();
        ids.sort_unstable();
        prop_assert_eq!(ids, unsorted);
    }
}
