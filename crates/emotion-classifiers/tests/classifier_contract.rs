//! `EmotionClassifier` contract tests
//!
//! The HTTP layer only sees `Arc<dyn EmotionClassifier>`, so these run the
//! trained model through the trait object.

use emotion_classifiers::{ArtifactPaths, EmotionClassifier, ModelManager, TrainingConfig};
use emotion_core::LabelSet;
use std::sync::Arc;
use tempfile::TempDir;

fn trained_classifier() -> (TempDir, Arc<dyn EmotionClassifier>) {
    let dir = TempDir::new().unwrap();
    let paths = ArtifactPaths::new(
        dir.path().join("model.json"),
        dir.path().join("labels.json"),
        dir.path().join("corpus.csv"),
    );

    let mut csv = String::from("text,anger,joy\n");
    for _ in 0..4 {
        csv.push_str("So happy and glad,0,1\n");
        csv.push_str("Angry and furious,1,0\n");
    }
    std::fs::write(&paths.corpus_path, csv).unwrap();

    let config = TrainingConfig {
        labels: LabelSet::new(["anger", "joy"]).unwrap(),
        ..Default::default()
    };
    let (manager, _) = ModelManager::open(paths, config).unwrap();
    (dir, Arc::new(manager))
}

/// Single predictions must match the batch output element-wise
async fn assert_batch_matches_single(classifier: &dyn EmotionClassifier, texts: &[String]) {
    let batch = classifier.predict_batch(texts).await.unwrap();
    assert_eq!(batch.len(), texts.len());
    for (text, from_batch) in texts.iter().zip(&batch) {
        let single = classifier.predict(text).await.unwrap();
        assert_eq!(&single, from_batch);
    }
}

#[tokio::test]
async fn test_batch_matches_single() {
    let (_dir, classifier) = trained_classifier();
    let texts: Vec<String> = ["so happy", "furious and happy", "meh", "Angry and furious"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    assert_batch_matches_single(classifier.as_ref(), &texts).await;
}

#[tokio::test]
async fn test_results_follow_emotion_order() {
    let (_dir, classifier) = trained_classifier();
    let emotions = classifier.emotions().unwrap();
    assert_eq!(emotions.as_slice(), &["anger", "joy"]);

    let result = classifier.predict("So happy and glad").await.unwrap();
    let order: Vec<&str> = result.emotions.labels().collect();
    assert_eq!(order, vec!["anger", "joy"]);
    assert_eq!(result.dominant_emotions, vec!["joy"]);

    let result = classifier.predict("Angry and furious").await.unwrap();
    assert_eq!(result.dominant_emotions, vec!["anger"]);
}

#[tokio::test]
async fn test_uninitialized_classifier_is_not_ready() {
    let classifier: Arc<dyn EmotionClassifier> = Arc::new(ModelManager::new(
        ArtifactPaths::default(),
        TrainingConfig::default(),
    ));

    assert!(classifier.predict("test").await.unwrap_err().is_not_ready());
    assert!(classifier
        .predict_batch(&["test".to_string()])
        .await
        .unwrap_err()
        .is_not_ready());
    assert!(classifier.emotions().unwrap_err().is_not_ready());
    assert_eq!(classifier.name(), "tfidf_multinomial_nb");
}

#[tokio::test]
async fn test_trait_objects_are_shareable() {
    let (_dir, classifier) = trained_classifier();
    let expected = classifier.predict("So happy and glad").await.unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let classifier = classifier.clone();
            tokio::spawn(async move { classifier.predict("So happy and glad").await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), expected);
    }
}
