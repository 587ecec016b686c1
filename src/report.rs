use std::path::Path;

use anyhow::anyhow;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::train::EpochRecord;

/// Side length in pixels of the cost plot.
pub const PLOT_SIZE: u32 = 800;

const TITLE: &str = "epochs vs cost";
const POINT_RADIUS: i32 = 2;

pub fn print_epochs(records: &[EpochRecord]) {
    for record in records {
        println!("{} {} {:?}", record.epoch, record.cost, record.elapsed);
    }
}

pub fn print_codes(codes: &[String]) {
    for code in codes {
        println!("{code}");
    }
}

/// Scatter of cost against epoch, one circle per record.
fn draw<DB: DrawingBackend>(records: &[EpochRecord], root: &DrawingArea<DB, Shift>) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Unable to clear cost plot: {e}"))?;

    let max_epoch = records.iter().map(|r| r.epoch).max().unwrap_or(0).max(1) as f64;
    let max_cost = records
        .iter()
        .map(|r| r.cost)
        .filter(|c| c.is_finite())
        .fold(0.0, f64::max);
    let max_cost = if max_cost > 0.0 { max_cost } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(TITLE, ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max_epoch, 0f64..max_cost)
        .map_err(|e| anyhow!("Unable to build cost plot: {e}"))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("epochs")
        .y_desc("cost")
        .draw()
        .map_err(|e| anyhow!("Unable to draw cost plot axes: {e}"))?;

    chart
        .draw_series(
            records
                .iter()
                .filter(|r| r.cost.is_finite())
                .map(|r| Circle::new((r.epoch as f64, r.cost), POINT_RADIUS, BLACK.filled())),
        )
        .map_err(|e| anyhow!("Unable to draw cost plot points: {e}"))?;

    Ok(())
}

/// Render the cost plot into an RGB buffer of `width * height * 3` bytes.
pub fn render(records: &[EpochRecord], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buffer = vec![0; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw(records, &root)?;
        root.present()
            .map_err(|e| anyhow!("Unable to render cost plot: {e}"))?;
    }

    Ok(buffer)
}

/// Render the cost plot and save it as a PNG at `path`.
pub fn plot<P: AsRef<Path>>(records: &[EpochRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let root = BitMapBackend::new(path, (PLOT_SIZE, PLOT_SIZE)).into_drawing_area();

    draw(records, &root)?;
    root.present()
        .map_err(|e| anyhow!("Unable to write cost plot to {}: {e}", path.display()))?;

    info!(path = %path.display(), points = records.len(), "cost plot written");
    Ok(())
}
