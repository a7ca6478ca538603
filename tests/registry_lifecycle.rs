//! Integration tests for the model registry over a SQLite file

use heartml::storage::StorageError;
use heartml::{Dataset, Registry, RegistryError, SqliteStore};
use tempfile::TempDir;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/heart.csv");

fn seeded_registry() -> (TempDir, Registry) {
    let dir = TempDir::new().expect("temp dir should be created");
    let store = SqliteStore::open(dir.path().join("heartml.db")).expect("operation should succeed");
    let dataset = Dataset::from_csv_path(FIXTURE).expect("operation should succeed");
    store.replace_dataset(&dataset).expect("operation should succeed");
    (dir, Registry::new(store))
}

fn reopen(dir: &TempDir) -> Registry {
    Registry::new(SqliteStore::open(dir.path().join("heartml.db")).expect("operation should succeed"))
}

#[test]
fn test_full_lifecycle_across_handles() {
    let (dir, registry) = seeded_registry();

    let added = registry.add_model("logreg", None).expect("operation should succeed");
    assert_eq!(added.message, format!("Model logreg added, id: {}", added.model_id));

    let listed = registry.list_models().expect("operation should succeed");
    assert!(!listed[&added.model_id].model_is_trained);

    let trained = registry.train_model(&added.model_id).expect("operation should succeed");
    assert_eq!(trained.message, format!("Model {} trained", added.model_id));

    let predictions = registry.predict_model(&added.model_id).expect("operation should succeed");
    assert_eq!(predictions.len(), 61);
    assert!(predictions.iter().all(|&p| p == 0 || p == 1));

    // A fresh handle sees the same trained state.
    let other = reopen(&dir);
    assert!(other.list_models().expect("operation should succeed")[&added.model_id].model_is_trained);
    assert_eq!(
        other.predict_model(&added.model_id).expect("operation should succeed"),
        predictions
    );

    assert_eq!(
        other.delete_model(&added.model_id).expect("operation should succeed"),
        format!("Model {} deleted", added.model_id)
    );
    assert!(registry.list_models().expect("operation should succeed").is_empty());
    assert_eq!(registry.store().count_snapshots().expect("operation should succeed"), 0);
}

#[test]
fn test_svc_with_hyperparameters() {
    let (_dir, registry) = seeded_registry();

    let added = registry
        .add_model("svc", Some(r#"{"kernel": "linear", "C": 0.5}"#))
        .expect("operation should succeed");
    let listed = registry.list_models().expect("operation should succeed");
    let params: serde_json::Value =
        serde_json::from_str(&listed[&added.model_id].model_params).expect("params are JSON");
    assert_eq!(params["kernel"], "linear");

    registry.train_model(&added.model_id).expect("operation should succeed");
    let first = registry.predict_model(&added.model_id).expect("operation should succeed");
    let second = registry.predict_model(&added.model_id).expect("operation should succeed");
    assert_eq!(first.len(), 61);
    assert_eq!(first, second);
}

#[test]
fn test_models_are_independent() {
    let (_dir, registry) = seeded_registry();

    let a = registry.add_model("logreg", None).expect("operation should succeed");
    let b = registry.add_model("svc", None).expect("operation should succeed");
    assert_ne!(a.model_id, b.model_id);

    registry.train_model(&a.model_id).expect("operation should succeed");
    let listed = registry.list_models().expect("operation should succeed");
    assert!(listed[&a.model_id].model_is_trained);
    assert!(!listed[&b.model_id].model_is_trained);

    assert!(matches!(
        registry.predict_model(&b.model_id),
        Err(RegistryError::NotTrained(_))
    ));

    // Both models share one snapshot of the dataset.
    assert_eq!(registry.store().count_snapshots().expect("operation should succeed"), 1);
    registry.delete_model(&a.model_id).expect("operation should succeed");
    assert_eq!(registry.store().count_snapshots().expect("operation should succeed"), 1);
}

#[test]
fn test_rejections() {
    let (_dir, registry) = seeded_registry();

    assert!(matches!(
        registry.add_model("forest", None),
        Err(RegistryError::InvalidVariant(_))
    ));
    assert!(matches!(
        registry.add_model("logreg", Some(r#"{"C": -1}"#)),
        Err(RegistryError::InvalidHyperparameters(_))
    ));
    assert!(matches!(
        registry.add_model("svc", Some("not json")),
        Err(RegistryError::InvalidHyperparameters(_))
    ));
    assert!(matches!(
        registry.train_model("00000000-0000-0000-0000-000000000000"),
        Err(RegistryError::NotFound(_))
    ));
    assert_eq!(registry.count_models().expect("operation should succeed"), 0);
}

#[test]
fn test_stale_version_write_conflicts() {
    let (_dir, registry) = seeded_registry();
    let added = registry.add_model("logreg", None).expect("operation should succeed");
    let store = registry.store();

    let before = store.get_model(&added.model_id).expect("operation should succeed");
    let trained = registry.train_model(&added.model_id).expect("operation should succeed");
    assert_eq!(trained.model_version, before.model_version + 1);

    let result =
        store.update_model(&added.model_id, before.model_version, &before.model_weights, false);
    assert!(matches!(result, Err(StorageError::Conflict { .. })));

    // The trained state survived the rejected write.
    assert_eq!(
        registry.predict_model(&added.model_id).expect("operation should succeed").len(),
        61
    );
}

#[test]
fn test_dataset_replacement_keeps_existing_split() {
    let (_dir, registry) = seeded_registry();
    let added = registry.add_model("logreg", None).expect("operation should succeed");

    let full = registry.store().load_dataset().expect("operation should succeed");
    let smaller = Dataset::new(full.records()[..100].to_vec());
    registry.store().replace_dataset(&smaller).expect("operation should succeed");

    registry.train_model(&added.model_id).expect("operation should succeed");
    assert_eq!(
        registry.predict_model(&added.model_id).expect("operation should succeed").len(),
        61
    );

    let newer = registry.add_model("logreg", None).expect("operation should succeed");
    registry.train_model(&newer.model_id).expect("operation should succeed");
    assert_eq!(
        registry.predict_model(&newer.model_id).expect("operation should succeed").len(),
        20
    );
}

#[test]
fn test_add_without_data_is_unavailable() {
    let dir = TempDir::new().expect("temp dir should be created");
    let store = SqliteStore::open(dir.path().join("empty.db")).expect("operation should succeed");
    let registry = Registry::new(store);

    assert!(matches!(
        registry.add_model("logreg", None),
        Err(RegistryError::DataUnavailable(_))
    ));
}
