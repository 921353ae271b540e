// THEORY:
// The visualizer shows how the bot saw a captured frame. It never runs in the
// decision loop; it reads the frames and records the pilot wrote and draws
// them back out as images a person can step through.
//
// A render is three layers:
// 1.  A two-tone mask of the frame: anything bright enough to register as
//     occupied is black, everything else white.
// 2.  A small colored square at each sample point, colored by what that cell
//     was labelled as.
// 3.  A large marker along the chosen heading.

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use slither_vision::core_modules::ray_caster::RayCaster;
use slither_vision::record::{frame_file_name, record_file_name};
use slither_vision::{Cell, CycleRecord, SteeringConfig};
use std::path::Path;
use tracing::info;

const SAMPLE_MARK_HALF: i64 = 1;
const HEADING_MARK_HALF: i64 = 10;
const HEADING_MARK_RADIUS: f64 = 200.0;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const HEADING_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

pub fn render_file_name(index: u64) -> String {
    format!("render{index}.png")
}

pub fn text_file_name(index: u64) -> String {
    format!("text{index}.txt")
}

/// Color used for a cell's sample marker.
pub fn cell_color(cell: Cell) -> Rgb<u8> {
    match cell {
        Cell::Empty => BLACK,
        Cell::Active | Cell::Clustered => Rgb([0, 0, 255]),
        Cell::Food => Rgb([255, 0, 0]),
        Cell::Predator => Rgb([0, 255, 0]),
        Cell::SelfBody => Rgb([0, 255, 255]),
        Cell::Ignore => Rgb([255, 0, 255]),
    }
}

/// Black where the channel sum exceeds `threshold`, white elsewhere.
pub fn threshold_mask(frame: &RgbImage, threshold: u32) -> RgbImage {
    RgbImage::from_fn(frame.width(), frame.height(), |x, y| {
        let [r, g, b] = frame.get_pixel(x, y).0;
        if r as u32 + g as u32 + b as u32 > threshold {
            BLACK
        } else {
            WHITE
        }
    })
}

/// Fills the square of half-size `half` around (cx, cy), clipped to the image.
fn fill_square(image: &mut RgbImage, cx: i64, cy: i64, half: i64, color: Rgb<u8>) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    for y in (cy - half).max(0)..=(cy + half).min(height - 1) {
        for x in (cx - half).max(0)..=(cx + half).min(width - 1) {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Draws one captured cycle over its frame.
pub fn render_cycle(
    frame: &RgbImage,
    record: &CycleRecord,
    caster: &RayCaster,
    config: &SteeringConfig,
) -> RgbImage {
    let mut image = threshold_mask(frame, config.color_threshold);

    for (point, cell) in record.grid.iter() {
        if point.ray >= caster.rays() || point.sample >= caster.samples() {
            continue;
        }
        let (x, y) = caster.sample_point(point.ray, point.sample);
        fill_square(&mut image, x, y, SAMPLE_MARK_HALF, cell_color(cell));
    }

    let (hx, hy) = slither_vision::pointer_target(
        record.heading,
        HEADING_MARK_RADIUS,
        config.center_point,
    );
    fill_square(&mut image, hx, hy, HEADING_MARK_HALF, HEADING_COLOR);

    image
}

/// Renders every consecutive capture in `dir`, starting at index 0 and stopping
/// at the first missing frame or record. Returns the number rendered.
pub fn render_capture_dir(dir: &Path, config: &SteeringConfig, dump_text: bool) -> Result<u64> {
    let caster = RayCaster::new(config).context("steering config rejected")?;
    let mut index = 0u64;

    loop {
        let frame_path = dir.join(frame_file_name(index));
        let record_path = dir.join(record_file_name(index));
        if !frame_path.exists() || !record_path.exists() {
            break;
        }

        let frame = image::open(&frame_path)
            .with_context(|| format!("failed to open {}", frame_path.display()))?
            .to_rgb8();
        let raw = std::fs::read_to_string(&record_path)
            .with_context(|| format!("failed to read {}", record_path.display()))?;
        let record = CycleRecord::from_json(&raw)
            .with_context(|| format!("failed to parse {}", record_path.display()))?;

        render_cycle(&frame, &record, &caster, config)
            .save(dir.join(render_file_name(index)))
            .with_context(|| format!("failed to save render {index}"))?;

        if dump_text {
            let mut text = record.grid.text_dump();
            text.push_str(&format!("{}\n", record.heading));
            std::fs::write(dir.join(text_file_name(index)), text)
                .with_context(|| format!("failed to save text dump {index}"))?;
        }

        info!(index, "rendered");
        index += 1;
    }

    Ok(index)
}
