// Scoring and per-class ranking over a trained model.

use autoencoder_anomaly::config::RunConfig;
use autoencoder_anomaly::data::{Batch, FeatureVector};
use autoencoder_anomaly::error::AnomalyError;
use autoencoder_anomaly::model::Autoencoder;
use autoencoder_anomaly::ranking::bucket_by_label;
use autoencoder_anomaly::scoring::score_examples;
use autoencoder_anomaly::trainer::train;
use autoencoder_anomaly::utils::SimpleRng;

fn small_config() -> RunConfig {
    RunConfig {
        rows: 4,
        columns: 4,
        hidden_width: 12,
        bottleneck_width: 3,
        num_classes: 4,
        batch_size: 20,
        train_split_percent: 0.5,
        top_k: 2,
        ..RunConfig::default()
    }
}

fn labeled_examples(count: usize, num_classes: usize) -> (Vec<FeatureVector>, Vec<u8>) {
    let features = (0..count)
        .map(|i| {
            let phase = i as f32 * 0.29;
            (0..16)
                .map(|j| (0.5 + 0.4 * (phase + j as f32 * 0.6).sin()).clamp(0.0, 1.0))
                .collect()
        })
        .collect();
    let labels = (0..count).map(|i| (i % num_classes) as u8).collect();
    (features, labels)
}

#[test]
fn test_split_train_score_rank_pipeline() {
    let config = small_config();
    let mut rng = SimpleRng::new(config.seed);
    let mut model = Autoencoder::new(&config, &mut rng).unwrap();

    let (features, labels) = labeled_examples(40, config.num_classes);
    let mut train_batches = Vec::new();
    let mut test_examples = Vec::new();
    for (f, l) in features
        .chunks(config.batch_size)
        .zip(labels.chunks(config.batch_size))
    {
        let split = Batch::new(f.to_vec(), l.to_vec())
            .unwrap()
            .split(config.train_split_percent, &mut rng);
        train_batches.push(split.train);
        test_examples.extend(split.test);
    }
    assert_eq!(test_examples.len(), 20);

    train(&mut model, &train_batches, 3).unwrap();
    let scored = score_examples(&model, &test_examples).unwrap();
    let buckets = bucket_by_label(scored, config.num_classes).unwrap();

    assert_eq!(buckets.len(), config.num_classes);
    for bucket in &buckets {
        let scores: Vec<f32> = bucket.examples().iter().map(|e| e.score).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        if bucket.len() >= config.top_k {
            let (best, worst) = bucket.best_worst(config.top_k).unwrap();
            assert_eq!(best.len(), config.top_k);
            assert_eq!(worst.len(), config.top_k);
            assert!(best[0].score <= worst[0].score);
        }
    }
}

#[test]
fn test_best_worst_ends_of_the_ordering() {
    let config = small_config();
    let mut rng = SimpleRng::new(7);
    let model = Autoencoder::new(&config, &mut rng).unwrap();

    let (features, _) = labeled_examples(12, 1);
    let labeled: Vec<(FeatureVector, u8)> = features.into_iter().map(|f| (f, 0u8)).collect();
    let scored = score_examples(&model, &labeled).unwrap();
    let buckets = bucket_by_label(scored, 1).unwrap();

    let (best, worst) = buckets[0].best_worst(3).unwrap();
    let all = buckets[0].examples();
    assert_eq!(best[0].score, all[0].score);
    assert_eq!(worst[0].score, all[all.len() - 1].score);
    for b in &best {
        for w in &worst {
            assert!(b.score <= w.score);
        }
    }
}

#[test]
fn test_ranking_rejects_out_of_range_label() {
    let config = small_config();
    let mut rng = SimpleRng::new(3);
    let model = Autoencoder::new(&config, &mut rng).unwrap();

    let labeled = vec![(vec![0.5f32; 16], 9u8)];
    let scored = score_examples(&model, &labeled).unwrap();
    let err = bucket_by_label(scored, config.num_classes).unwrap_err();
    assert!(matches!(
        err,
        AnomalyError::UnknownLabel { label: 9, num_classes: 4 }
    ));
}
