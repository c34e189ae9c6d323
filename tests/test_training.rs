// End-to-end training behavior: loss trajectory, shape preservation and
// reproducibility from the seed.

use autoencoder_anomaly::config::RunConfig;
use autoencoder_anomaly::data::FeatureVector;
use autoencoder_anomaly::model::Autoencoder;
use autoencoder_anomaly::scoring::score_examples;
use autoencoder_anomaly::trainer::train;
use autoencoder_anomaly::utils::SimpleRng;

fn small_config() -> RunConfig {
    RunConfig {
        rows: 4,
        columns: 4,
        hidden_width: 12,
        bottleneck_width: 3,
        batch_size: 10,
        ..RunConfig::default()
    }
}

// Smooth low-rank vectors a 3-wide bottleneck can actually encode.
fn synthetic_examples(count: usize, dim: usize) -> Vec<FeatureVector> {
    (0..count)
        .map(|i| {
            let phase = i as f32 * 0.37;
            (0..dim)
                .map(|j| (0.5 + 0.4 * (phase + j as f32 * 0.5).sin()).clamp(0.0, 1.0))
                .collect()
        })
        .collect()
}

#[test]
fn test_loss_decreases_over_ten_epochs() {
    let config = small_config();
    let mut rng = SimpleRng::new(config.seed);
    let mut model = Autoencoder::new(&config, &mut rng).unwrap();

    let examples = synthetic_examples(50, 16);
    let batches: Vec<Vec<FeatureVector>> = examples
        .chunks(config.batch_size)
        .map(|c| c.to_vec())
        .collect();

    let losses = train(&mut model, &batches, 10).unwrap();
    assert_eq!(losses.len(), 10);
    assert!(losses.iter().all(|l| l.is_finite()));
    assert!(
        losses[9] < losses[0],
        "final loss {} not below initial {}",
        losses[9],
        losses[0]
    );
}

#[test]
fn test_reconstruction_preserves_shape_after_training() {
    let config = small_config();
    let mut rng = SimpleRng::new(config.seed);
    let mut model = Autoencoder::new(&config, &mut rng).unwrap();

    let examples = synthetic_examples(20, 16);
    train(&mut model, &[examples.clone()], 3).unwrap();

    for example in &examples {
        let reconstruction = model.forward(example).unwrap();
        assert_eq!(reconstruction.len(), example.len());
        assert!(reconstruction.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_scores_non_negative_after_training() {
    let config = small_config();
    let mut rng = SimpleRng::new(config.seed);
    let mut model = Autoencoder::new(&config, &mut rng).unwrap();

    let examples = synthetic_examples(30, 16);
    train(&mut model, &[examples.clone()], 5).unwrap();

    let labeled: Vec<(FeatureVector, u8)> = examples
        .into_iter()
        .enumerate()
        .map(|(i, f)| (f, (i % 10) as u8))
        .collect();
    let scored = score_examples(&model, &labeled).unwrap();
    assert!(scored.iter().all(|s| s.score >= 0.0 && s.score.is_finite()));
}

#[test]
fn test_identical_seeds_reproduce_identical_scores() {
    let config = small_config();
    let examples = synthetic_examples(40, 16);
    let labeled: Vec<(FeatureVector, u8)> = examples
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, f)| (f, (i % 10) as u8))
        .collect();

    let run = || {
        let mut rng = SimpleRng::new(config.seed);
        let mut model = Autoencoder::new(&config, &mut rng).unwrap();
        train(&mut model, &[examples.clone()], 4).unwrap();
        score_examples(&model, &labeled)
            .unwrap()
            .into_iter()
            .map(|s| s.score)
            .collect::<Vec<f32>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_different_seeds_diverge() {
    let config = small_config();
    let examples = synthetic_examples(10, 16);

    let weights_for = |seed: u64| {
        let mut rng = SimpleRng::new(seed);
        let mut model = Autoencoder::new(&config, &mut rng).unwrap();
        train(&mut model, &[examples.clone()], 1).unwrap();
        model.forward(&examples[0]).unwrap()
    };

    assert_ne!(weights_for(1), weights_for(2));
}
