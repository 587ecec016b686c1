use std::time::Duration;

use nalgebra::Matrix4;

use qxor::eigen;
use qxor::report;
use qxor::train::EpochRecord;

fn records(n: usize) -> Vec<EpochRecord> {
    (0..n)
        .map(|epoch| EpochRecord {
            epoch,
            cost: 1.0 / (epoch + 1) as f64,
            elapsed: Duration::from_micros(10),
        })
        .collect()
}

fn pixel(buffer: &[u8], width: u32, x: u32, y: u32) -> [u8; 3] {
    let offset = ((y * width + x) * 3) as usize;
    [buffer[offset], buffer[offset + 1], buffer[offset + 2]]
}

fn dark_pixels(buffer: &[u8], width: u32, rows: std::ops::Range<u32>) -> usize {
    rows.flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| pixel(buffer, width, x, y) != [255, 255, 255])
        .count()
}

#[test]
fn test_render() {
    let (width, height) = (400, 400);
    let buffer = report::render(&records(16), width, height).unwrap();

    assert_eq!(buffer.len(), (width * height * 3) as usize);
    assert_eq!(pixel(&buffer, width, 0, 0), [255, 255, 255]);
    assert_eq!(pixel(&buffer, width, width - 1, height - 1), [255, 255, 255]);
    // Caption band above the chart carries the title text.
    assert!(dark_pixels(&buffer, width, 0..50) > 0);
    // Axis labels and points below it.
    assert!(dark_pixels(&buffer, width, 50..height) > 0);
}

#[test]
fn test_render_empty() {
    let buffer = report::render(&[], 200, 200).unwrap();
    assert_eq!(buffer.len(), 200 * 200 * 3);
}

#[test]
fn test_plot_writes_png() {
    let path = std::env::temp_dir().join(format!("qxor-epochs-{}.png", std::process::id()));

    report::plot(&records(128), &path).unwrap();
    let image = image::open(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(image.width(), report::PLOT_SIZE);
    assert_eq!(image.height(), report::PLOT_SIZE);
}

#[test]
fn test_plot_unwritable_path() {
    let path = std::env::temp_dir().join("qxor-missing-dir").join("epochs.png");
    assert!(report::plot(&records(4), path).is_err());
}

#[test]
fn test_eigen_swap_matrix() {
    let eigen = eigen::decompose(eigen::swap_matrix()).unwrap();

    assert_eq!(eigen.values.len(), 4);
    for value in eigen.values.iter() {
        assert!((value.abs() - 1.0).abs() < 1e-9);
    }

    let trace: f64 = eigen.values.iter().sum();
    assert!((trace - 2.0).abs() < 1e-9);

    let matrix = eigen::swap_matrix();
    for (i, value) in eigen.values.iter().enumerate() {
        let v = eigen.vectors.column(i);
        assert!((matrix * v - v * *value).norm() < 1e-9);
    }
}

#[test]
fn test_eigen_rejects_non_symmetric() {
    let matrix = Matrix4::new(
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0, 0.0,
    );

    assert!(eigen::decompose(matrix).is_err());
}
