//! Headless SVG rendering of the linear and circular maps from projector output.

use crate::{
    genome_dataset::{FeatureType, GenomeDataset},
    geometry::{CircularSegment, LinearSeries, PolarPoint},
};
use svg::Document;
use svg::node::element::{Circle, Line, Polygon, Rectangle, Text};

const W: f32 = 1200.0;
const H: f32 = 700.0;
const LINEAR_LEFT: f32 = 220.0;
const LINEAR_RIGHT: f32 = W - 40.0;
const LINEAR_TOP: f32 = 80.0;
const LINEAR_ROW_MAX: f32 = 18.0;

pub fn feature_color(feature_type: FeatureType) -> &'static str {
    match feature_type {
        FeatureType::Cds => "#cc1f1f",
        FeatureType::Gene => "#1f4fcc",
        FeatureType::Trna => "#238023",
        FeatureType::Rrna => "#b4640a",
    }
}

fn heading(dataset: &GenomeDataset) -> String {
    dataset
        .record_name
        .clone()
        .unwrap_or_else(|| "unnamed record".to_string())
}

fn blank_document() -> Document {
    Document::new()
        .set("viewBox", (0, 0, W, H))
        .set("width", W)
        .set("height", H)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", W)
                .set("height", H)
                .set("fill", "#ffffff"),
        )
}

fn add_heading(doc: Document, dataset: &GenomeDataset) -> Document {
    doc.add(
        Text::new(heading(dataset))
            .set("x", 20)
            .set("y", 34)
            .set("font-family", "monospace")
            .set("font-size", 16)
            .set("fill", "#111111"),
    )
    .add(
        Text::new(format!(
            "{} bp, {} features",
            dataset.genome_length,
            dataset.len()
        ))
        .set("x", 20)
        .set("y", 54)
        .set("font-family", "monospace")
        .set("font-size", 12)
        .set("fill", "#444444"),
    )
}

/// Largest power of ten giving at least two ticks over `len`.
fn tick_step(len: usize) -> usize {
    let mut tick = 1;
    while tick * 10 < len {
        tick *= 10;
    }
    tick
}

fn bp_to_x(bp: usize, len: usize) -> f32 {
    if len == 0 {
        return LINEAR_LEFT;
    }
    LINEAR_LEFT + (LINEAR_RIGHT - LINEAR_LEFT) * (bp as f32 / len as f32)
}

/// One row per bar, stacked in series order. The x axis covers the genome, or
/// the furthest feature end when that lies beyond it.
pub fn export_linear_svg(dataset: &GenomeDataset, series: &[LinearSeries]) -> String {
    let rows: usize = series.iter().map(|s| s.bars.len()).sum();
    let len = series
        .iter()
        .flat_map(|s| s.bars.iter().map(|b| b.start + b.length))
        .fold(dataset.genome_length, usize::max);
    let row_height = if rows == 0 {
        LINEAR_ROW_MAX
    } else {
        ((H - LINEAR_TOP - 40.0) / rows as f32).min(LINEAR_ROW_MAX)
    };
    let axis_y = LINEAR_TOP - 10.0;

    let mut doc = add_heading(blank_document(), dataset);
    doc = doc.add(
        Line::new()
            .set("x1", LINEAR_LEFT)
            .set("y1", axis_y)
            .set("x2", LINEAR_RIGHT)
            .set("y2", axis_y)
            .set("stroke", "#000000")
            .set("stroke-width", 1),
    );
    if len > 0 {
        let tick = tick_step(len);
        let mut pos = 0;
        while pos <= len {
            let x = bp_to_x(pos, len);
            doc = doc
                .add(
                    Line::new()
                        .set("x1", x)
                        .set("y1", axis_y - 4.0)
                        .set("x2", x)
                        .set("y2", axis_y)
                        .set("stroke", "#000000")
                        .set("stroke-width", 1),
                )
                .add(
                    Text::new(format!("{pos}"))
                        .set("x", x)
                        .set("y", axis_y - 8.0)
                        .set("text-anchor", "middle")
                        .set("font-family", "monospace")
                        .set("font-size", 9)
                        .set("fill", "#444444"),
                );
            pos += tick;
        }
    }

    let mut row = 0;
    for s in series {
        let color = feature_color(s.feature_type);
        for bar in &s.bars {
            let y = LINEAR_TOP + row as f32 * row_height;
            let x1 = bp_to_x(bar.start, len);
            let x2 = bp_to_x(bar.start + bar.length, len).max(x1 + 1.0);
            doc = doc
                .add(
                    Rectangle::new()
                        .set("x", x1)
                        .set("y", y)
                        .set("width", x2 - x1)
                        .set("height", row_height * 0.8)
                        .set("fill", color)
                        .set("stroke", "#000000")
                        .set("stroke-width", 0.6_f32),
                )
                .add(
                    Text::new(bar.label.clone())
                        .set("x", LINEAR_LEFT - 8.0)
                        .set("y", y + row_height * 0.7)
                        .set("text-anchor", "end")
                        .set("font-family", "monospace")
                        .set("font-size", (row_height * 0.7).min(11.0))
                        .set("fill", "#111111"),
                );
            row += 1;
        }
    }

    doc.to_string()
}

/// 0 degrees at the top, increasing clockwise.
fn polar_to_xy(point: &PolarPoint, cx: f32, cy: f32, r: f32) -> (f32, f32) {
    let angle = (point.angle as f32).to_radians();
    let radius = r * point.radius as f32;
    (cx + radius * angle.sin(), cy - radius * angle.cos())
}

/// Backbone circle plus one filled outline per segment.
pub fn export_circular_svg(dataset: &GenomeDataset, segments: &[CircularSegment]) -> String {
    let cx = W * 0.5;
    let cy = H * 0.54;
    let r = H.min(W) * 0.4;

    let mut doc = add_heading(blank_document(), dataset);
    doc = doc.add(
        Circle::new()
            .set("cx", cx)
            .set("cy", cy)
            .set("r", r * 0.6)
            .set("fill", "none")
            .set("stroke", "#000000")
            .set("stroke-width", 1),
    );

    for segment in segments {
        let points = segment
            .outline
            .iter()
            .map(|p| {
                let (x, y) = polar_to_xy(p, cx, cy, r);
                format!("{x:.2},{y:.2}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        doc = doc.add(
            Polygon::new()
                .set("points", points)
                .set("fill", feature_color(segment.feature_type))
                .set("fill-opacity", 0.6_f32)
                .set("stroke", "none"),
        );
    }

    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome_dataset::{FeatureRecord, Topology, tests::record};
    use crate::geometry::{circular_segments, linear_series};

    fn dataset() -> GenomeDataset {
        GenomeDataset::new(
            Some("toy".to_string()),
            Topology::Circular,
            5000,
            vec![
                record(FeatureType::Gene, "dnaA", 100, 400),
                record(FeatureType::Cds, "dnaA", 100, 400),
                record(FeatureType::Rrna, "rrsA", 2000, 3500),
            ],
        )
    }

    #[test]
    fn test_linear_svg_has_one_bar_per_feature() {
        let ds = dataset();
        let svg = export_linear_svg(&ds, &linear_series(&ds.all_features()));
        // background plus three bars
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains("0 | gene | dnaA"));
        assert!(svg.contains(feature_color(FeatureType::Rrna)));
    }

    #[test]
    fn test_circular_svg_has_one_shape_per_feature() {
        let ds = dataset();
        let filtered: Vec<&FeatureRecord> = ds.filter_by_types(&[FeatureType::Gene]);
        let segments = circular_segments(&filtered, ds.genome_length).unwrap();
        let svg = export_circular_svg(&ds, &segments);
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn test_empty_maps_still_render() {
        let ds = GenomeDataset::default();
        assert!(export_linear_svg(&ds, &[]).contains("<svg"));
        assert!(export_circular_svg(&ds, &[]).contains("<svg"));
    }

    #[test]
    fn test_polar_origin_is_top() {
        let (x, y) = polar_to_xy(&PolarPoint { radius: 1.0, angle: 0.0 }, 100.0, 100.0, 50.0);
        assert!((x - 100.0).abs() < 1e-3);
        assert!((y - 50.0).abs() < 1e-3);
        let (x, _) = polar_to_xy(&PolarPoint { radius: 1.0, angle: 90.0 }, 100.0, 100.0, 50.0);
        assert!((x - 150.0).abs() < 1e-3);
    }
}
