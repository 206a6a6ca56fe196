use serde_json::{Map, Value};
use testcontainers::core::ContainerPort;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};

use neurodesk::application::ports::{CollectionConfig, StoredDocument, VectorStore};
use neurodesk::domain::Embedding;
use neurodesk::infrastructure::persistence::QdrantAdapter;

struct TestQdrant {
    adapter: QdrantAdapter,
    _container: ContainerAsync<GenericImage>,
}

impl TestQdrant {
    async fn new() -> Self {
        let container = GenericImage::new("qdrant/qdrant", "latest")
            .with_exposed_port(ContainerPort::Tcp(6334))
            .start()
            .await
            .expect("Failed to start Qdrant container");

        let host_port = container
            .get_host_port_ipv4(6334)
            .await
            .expect("Failed to get Qdrant gRPC port");

        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        let adapter = QdrantAdapter::new(&format!("http://localhost:{host_port}"), None)
            .expect("Failed to create QdrantAdapter");

        Self {
            adapter,
            _container: container,
        }
    }
}

fn stored(text: &str, page: u64) -> StoredDocument {
    let mut metadata = Map::new();
    metadata.insert("page".to_string(), Value::from(page));
    metadata.insert("source".to_string(), Value::from("paper.pdf"));
    StoredDocument::new(text.to_string(), metadata)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_qdrant_when_storing_documents_then_search_returns_text_and_metadata() {
    let qdrant = TestQdrant::new().await;
    let store = &qdrant.adapter;
    let name = "user_u1_doc_paper";

    assert!(!store.collection_exists(name).await.expect("exists"));
    assert!(
        store
            .create_collection(name, &CollectionConfig::document_collection(3))
            .await
            .expect("create")
    );

    store
        .upsert(
            name,
            &[stored("about ownership", 1), stored("about async", 2)],
            &[
                Embedding::new(vec![1.0, 0.0, 0.0]),
                Embedding::new(vec![0.0, 1.0, 0.0]),
            ],
        )
        .await
        .expect("upsert");

    assert_eq!(store.count(name).await.expect("count"), 2);
    assert_eq!(
        store.list_collections().await.expect("list"),
        vec![name.to_string()]
    );

    let results = store
        .search(name, &Embedding::new(vec![0.9, 0.1, 0.0]), 1)
        .await
        .expect("search");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.text, "about ownership");
    assert_eq!(results[0].document.metadata["page"], 1);
    assert_eq!(results[0].document.metadata["source"], "paper.pdf");

    store.delete_collection(name).await.expect("delete");
    assert!(!store.collection_exists(name).await.expect("exists"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_concurrent_creates_when_collection_is_new_then_exactly_one_creates_it() {
    let qdrant = TestQdrant::new().await;
    let store = &qdrant.adapter;
    let config = CollectionConfig::feedback_collection(3);

    let (first, second) = tokio::join!(
        store.create_collection("feedback", &config),
        store.create_collection("feedback", &config),
    );

    let created = [first.expect("first create"), second.expect("second create")];
    assert_eq!(created.iter().filter(|c| **c).count(), 1);
    assert!(store.collection_exists("feedback").await.expect("exists"));
}
