//! Chart geometry for the linear and circular genome maps.
//!
//! Nothing here filters: callers pass the feature slice they want drawn.

use crate::{
    error::{GenomeViewerError, Result},
    genome_dataset::{FeatureRecord, FeatureType},
};
use serde::{Deserialize, Serialize};

pub const INNER_RADIUS: f64 = 0.6;
pub const OUTER_RADIUS: f64 = 1.0;
pub const DEFAULT_OUTLINE_POINTS: usize = 3;
pub const MAX_OUTLINE_POINTS: usize = 1025;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearBar {
    pub label: String,
    pub start: usize,
    pub length: usize,
    pub feature_type: FeatureType,
    pub gene: String,
}

/// All bars of one feature type; rendered as one stacked series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSeries {
    pub feature_type: FeatureType,
    pub bars: Vec<LinearBar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    pub radius: f64,
    /// Degrees, 0 at the origin of the sequence.
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularSegment {
    pub angle_start: f64,
    pub angle_mid: f64,
    pub angle_end: f64,
    pub feature_type: FeatureType,
    pub gene: String,
    pub start: usize,
    pub end: usize,
    /// Closed shape: inner radius at both ends, outer radius at the midpoint.
    pub outline: Vec<PolarPoint>,
}

/// Row label for the linear chart; unique within one slice because of `index`.
pub fn feature_label(index: usize, feature: &FeatureRecord) -> String {
    format!("{index} | {} | {}", feature.feature_type, feature.gene)
}

/// One series per type, in order of first appearance in `features`.
pub fn linear_series(features: &[&FeatureRecord]) -> Vec<LinearSeries> {
    let mut series: Vec<LinearSeries> = Vec::new();
    for (index, feature) in features.iter().enumerate() {
        let bar = LinearBar {
            label: feature_label(index, feature),
            start: feature.start,
            length: feature.length,
            feature_type: feature.feature_type,
            gene: feature.gene.clone(),
        };
        match series
            .iter_mut()
            .find(|s| s.feature_type == feature.feature_type)
        {
            Some(s) => s.bars.push(bar),
            None => series.push(LinearSeries {
                feature_type: feature.feature_type,
                bars: vec![bar],
            }),
        }
    }
    series
}

/// Degrees of arc for a sequence position.
pub fn position_to_angle(position: usize, genome_length: usize) -> Result<f64> {
    if genome_length == 0 {
        return Err(GenomeViewerError::InvalidGenomeLength(genome_length));
    }
    Ok(position as f64 / genome_length as f64 * 360.0)
}

pub fn circular_segments(
    features: &[&FeatureRecord],
    genome_length: usize,
) -> Result<Vec<CircularSegment>> {
    circular_segments_with_resolution(features, genome_length, DEFAULT_OUTLINE_POINTS)
}

/// Like [`circular_segments`], with `points` outline points per segment
/// (clamped to 3..=1025, rounded up to an odd count so one point lands on the
/// midpoint).
pub fn circular_segments_with_resolution(
    features: &[&FeatureRecord],
    genome_length: usize,
    points: usize,
) -> Result<Vec<CircularSegment>> {
    if genome_length == 0 {
        return Err(GenomeViewerError::InvalidGenomeLength(genome_length));
    }
    features
        .iter()
        .map(|feature| -> Result<CircularSegment> {
            let angle_start = position_to_angle(feature.start, genome_length)?;
            let angle_end = position_to_angle(feature.end, genome_length)?;
            let angle_mid = (angle_start + angle_end) / 2.0;
            Ok(CircularSegment {
                angle_start,
                angle_mid,
                angle_end,
                feature_type: feature.feature_type,
                gene: feature.gene.clone(),
                start: feature.start,
                end: feature.end,
                outline: wedge_outline(angle_start, angle_end, points),
            })
        })
        .collect()
}

/// Polar outline from `angle_start` to `angle_end`. The radius rises linearly
/// from [`INNER_RADIUS`] at the ends to [`OUTER_RADIUS`] at the midpoint.
pub fn wedge_outline(angle_start: f64, angle_end: f64, points: usize) -> Vec<PolarPoint> {
    let points = points.clamp(DEFAULT_OUTLINE_POINTS, MAX_OUTLINE_POINTS);
    let points = if points % 2 == 0 { points + 1 } else { points };
    let last = points - 1;
    let mid = last / 2;
    (0..points)
        .map(|i| {
            let t = i as f64 / last as f64;
            let peak = 1.0 - (2.0 * t - 1.0).abs();
            let angle = if i == 0 {
                angle_start
            } else if i == last {
                angle_end
            } else if i == mid {
                (angle_start + angle_end) / 2.0
            } else {
                angle_start + (angle_end - angle_start) * t
            };
            PolarPoint {
                radius: INNER_RADIUS + (OUTER_RADIUS - INNER_RADIUS) * peak,
                angle,
            }
        })
        .collect()
}
