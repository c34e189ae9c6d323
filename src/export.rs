//! Grayscale rendering and PNG export of ranked examples.
//!
//! Turns a flat feature vector back into a `rows × columns` grayscale
//! raster and persists the best/worst examples of every class under
//! `<dir>/<label>/best/<slot>.png` and `<dir>/<label>/worst/<slot>.png`.
//!
//! Values are clamped to [0, 1] before scaling to 8-bit intensity. The
//! decoder's output layer is linear, so reconstructions can stray outside
//! the nominal range; without the clamp the intensity cast would wrap.

use crate::error::{AnomalyError, Result};
use crate::ranking::RankedBucket;
use image::GrayImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of an export pass.
///
/// A failed item never aborts the remaining exports; failures are collected
/// here and reported to the caller.
pub struct ExportReport {
    /// Number of images written successfully.
    pub written: usize,
    /// Per-item failures, in encounter order.
    pub failures: Vec<AnomalyError>,
}

/// Render a feature vector as a `rows × columns` grayscale image.
///
/// Row-major mapping: flat index `i` lands at row `i / columns`, column
/// `i % columns`. Each value is clamped to [0, 1] and scaled with
/// `round(255 × value)` (half rounds away from zero, so 0.5 → 128).
///
/// # Errors
///
/// [`AnomalyError::DimensionMismatch`] if the vector length is not
/// `rows × columns`.
pub fn render_grayscale(features: &[f32], rows: u32, columns: u32) -> Result<GrayImage> {
    let expected = (rows * columns) as usize;
    if features.len() != expected {
        return Err(AnomalyError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }

    let mut img = GrayImage::new(columns, rows);
    for (i, &value) in features.iter().enumerate() {
        let row = i as u32 / columns;
        let col = i as u32 % columns;
        let intensity = (255.0 * value.clamp(0.0, 1.0)).round() as u8;
        img.put_pixel(col, row, image::Luma([intensity]));
    }
    Ok(img)
}

/// Export the `k` best and `k` worst examples of every bucket as PNGs.
///
/// Buckets smaller than `k` export all available examples rather than
/// failing. Each image failure is printed and recorded in the returned
/// [`ExportReport`]; remaining items still export.
pub fn export_ranked(
    buckets: &[RankedBucket],
    k: usize,
    rows: u32,
    columns: u32,
    dir: impl AsRef<Path>,
) -> ExportReport {
    let dir = dir.as_ref();
    let mut report = ExportReport {
        written: 0,
        failures: Vec::new(),
    };

    for bucket in buckets {
        if bucket.is_empty() {
            continue;
        }
        let (best, worst) = bucket.best_worst_available(k);
        let label_dir = dir.join(bucket.label().to_string());

        for (group, examples) in [("best", best), ("worst", worst)] {
            let group_dir = label_dir.join(group);
            if let Err(e) = fs::create_dir_all(&group_dir) {
                eprintln!("Failed to create {}: {}", group_dir.display(), e);
                report.failures.push(AnomalyError::Io(e));
                continue;
            }
            for (slot, example) in examples.iter().enumerate() {
                let path = group_dir.join(format!("{slot}.png"));
                match write_png(&example.features, rows, columns, &path) {
                    Ok(()) => report.written += 1,
                    Err(e) => {
                        eprintln!("Failed to export {}: {}", path.display(), e);
                        report.failures.push(e);
                    }
                }
            }
        }
    }

    report
}

fn write_png(features: &[f32], rows: u32, columns: u32, path: &PathBuf) -> Result<()> {
    let img = render_grayscale(features, rows, columns)?;
    img.save(path).map_err(|source| AnomalyError::Export {
        path: path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zero_renders_black() {
        let img = render_grayscale(&vec![0.0f32; 4], 2, 2).unwrap();
        assert!(img.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_all_one_renders_white() {
        let img = render_grayscale(&vec![1.0f32; 4], 2, 2).unwrap();
        assert!(img.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_mid_value_rounds_half_away_from_zero() {
        let img = render_grayscale(&[0.5], 1, 1).unwrap();
        assert_eq!(img.get_pixel(0, 0).0[0], 128);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let img = render_grayscale(&[-0.5, 1.5], 1, 2).unwrap();
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
        assert_eq!(img.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn test_row_major_mapping() {
        // 2 rows × 3 columns; flat index 4 → row 1, column 1
        let mut features = vec![0.0f32; 6];
        features[4] = 1.0;
        let img = render_grayscale(&features, 2, 3).unwrap();
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
        assert_eq!(img.get_pixel(1, 1).0[0], 255);
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn test_render_rejects_wrong_length() {
        assert!(render_grayscale(&[0.0, 0.0], 2, 2).is_err());
    }
}
