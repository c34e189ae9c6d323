use anyhow::{bail, Context, Result};
use autoencoder_anomaly::config::{load_config, RunConfig};
use autoencoder_anomaly::data::{Batch, FeatureVector};
use autoencoder_anomaly::export::export_ranked;
use autoencoder_anomaly::model::Autoencoder;
use autoencoder_anomaly::ranking::bucket_by_label;
use autoencoder_anomaly::scoring::score_examples;
use autoencoder_anomaly::trainer::train;
use autoencoder_anomaly::utils::SimpleRng;
use std::time::Instant;

// Anomaly detection on MNIST digits with a dense autoencoder.
const TRAIN_SAMPLES: usize = 60000;
const RESULTS_DIR: &str = "./results";
const MODEL_PATH: &str = "./models/autoencoder.json.gz";

fn read_be_u32(data: &[u8], offset: &mut usize) -> u32 {
    let b0 = (data[*offset] as u32) << 24;
    let b1 = (data[*offset + 1] as u32) << 16;
    let b2 = (data[*offset + 2] as u32) << 8;
    let b3 = data[*offset + 3] as u32;
    *offset += 4;
    b0 | b1 | b2 | b3
}

// Read IDX images, flattened row-major and normalized to [0, 1].
fn read_mnist_images(filename: &str, num_images: usize) -> Result<Vec<FeatureVector>> {
    let data = std::fs::read(filename).with_context(|| format!("could not open {filename}"))?;

    let mut offset = 0usize;
    let _magic_number = read_be_u32(&data, &mut offset);
    let total_images = read_be_u32(&data, &mut offset) as usize;
    let rows = read_be_u32(&data, &mut offset) as usize;
    let cols = read_be_u32(&data, &mut offset) as usize;
    let image_size = rows * cols;
    let actual_count = num_images.min(total_images);

    if data.len() < offset + actual_count * image_size {
        bail!("MNIST image file {filename} is truncated");
    }

    let mut images = Vec::with_capacity(actual_count);
    for i in 0..actual_count {
        let start = offset + i * image_size;
        let pixels: FeatureVector = data[start..start + image_size]
            .iter()
            .map(|&pixel| pixel as f32 / 255.0)
            .collect();
        images.push(pixels);
    }
    Ok(images)
}

// Read IDX labels (0-9).
fn read_mnist_labels(filename: &str, num_labels: usize) -> Result<Vec<u8>> {
    let data = std::fs::read(filename).with_context(|| format!("could not open {filename}"))?;

    let mut offset = 0usize;
    let _magic_number = read_be_u32(&data, &mut offset);
    let total_labels = read_be_u32(&data, &mut offset) as usize;
    let actual_count = num_labels.min(total_labels);

    if data.len() < offset + actual_count {
        bail!("MNIST label file {filename} is truncated");
    }

    Ok(data[offset..offset + actual_count].to_vec())
}

fn main() -> Result<()> {
    let program_start = Instant::now();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading configuration from {path}...");
            load_config(&path)?
        }
        None => RunConfig::default(),
    };
    config.validate()?;

    println!("Loading training data...");
    let load_start = Instant::now();
    let images = read_mnist_images("./data/train-images.idx3-ubyte", TRAIN_SAMPLES)?;
    let labels = read_mnist_labels("./data/train-labels.idx1-ubyte", TRAIN_SAMPLES)?;
    println!(
        "Data loading time: {:.2} seconds",
        load_start.elapsed().as_secs_f64()
    );

    if let Some(image) = images.first() {
        if image.len() != config.feature_len() {
            bail!(
                "image size {} does not match configured {}x{}",
                image.len(),
                config.rows,
                config.columns
            );
        }
    }

    // One RNG drives weight initialization and every batch split, so the
    // whole run replays from the configured seed.
    let mut rng = SimpleRng::new(config.seed);

    println!("Initializing autoencoder...");
    let mut model = Autoencoder::new(&config, &mut rng)?;
    println!(
        "Network: {:?} ({} parameters)",
        model.layer_dims(),
        model.parameter_count()
    );

    // Chunk the stream into fixed-size batches and split each one into a
    // training subset and a labeled test subset.
    println!("Splitting batches...");
    let mut train_batches: Vec<Vec<FeatureVector>> = Vec::new();
    let mut test_examples: Vec<(FeatureVector, u8)> = Vec::new();
    for (chunk_features, chunk_labels) in images
        .chunks(config.batch_size)
        .zip(labels.chunks(config.batch_size))
    {
        let batch = Batch::new(chunk_features.to_vec(), chunk_labels.to_vec())?;
        let split = batch.split(config.train_split_percent, &mut rng);
        train_batches.push(split.train);
        test_examples.extend(split.test);
    }
    println!(
        "{} training batches, {} test examples",
        train_batches.len(),
        test_examples.len()
    );

    let train_start = Instant::now();
    train(&mut model, &train_batches, config.epochs)?;
    println!(
        "Total training time: {:.2} seconds",
        train_start.elapsed().as_secs_f64()
    );

    println!("Scoring test examples...");
    let scored = score_examples(&model, &test_examples)?;
    let buckets = bucket_by_label(scored, config.num_classes)?;

    println!("Exporting best/worst reconstructions to {RESULTS_DIR}...");
    let report = export_ranked(
        &buckets,
        config.top_k,
        config.rows as u32,
        config.columns as u32,
        RESULTS_DIR,
    );
    println!(
        "Exported {} images ({} failures)",
        report.written,
        report.failures.len()
    );

    println!("Saving model to {MODEL_PATH}...");
    model.save(MODEL_PATH)?;

    println!(
        "Total program time: {:.2} seconds",
        program_start.elapsed().as_secs_f64()
    );
    Ok(())
}
