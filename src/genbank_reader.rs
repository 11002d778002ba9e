//! Reads the first record of a GenBank file into a [`GenomeDataset`], using the
//! [gb_io](https://docs.rs/gb-io/latest/gb_io) parser.
//!
//! Only `gene`, `CDS`, `tRNA` and `rRNA` features are kept. A feature whose
//! location has no integer bounds is skipped on its own; it never fails the
//! whole file.

use crate::{
    error::{GenomeViewerError, Result},
    feature_location::{location_bounds, location_matches_text, location_strand},
    genome_dataset::{FeatureRecord, FeatureType, GenomeDataset, Topology},
};
use gb_io::{reader::SeqReader, seq::Feature, seq::Seq};
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, info};

pub fn read_genbank_file(path: impl AsRef<Path>) -> Result<GenomeDataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!(path = %path.display(), "reading GenBank file");
    read_genbank(file)
}

pub fn read_genbank_str(text: &str) -> Result<GenomeDataset> {
    read_genbank(text.as_bytes())
}

/// Parses records from `reader` and builds the dataset from the first one.
/// Later records are never parsed.
pub fn read_genbank<R: Read>(mut reader: R) -> Result<GenomeDataset> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    if buffer.iter().all(u8::is_ascii_whitespace) {
        return Err(GenomeViewerError::EmptyInput);
    }
    let first = SeqReader::new(buffer.as_slice())
        .next()
        .ok_or(GenomeViewerError::EmptyInput)?
        .map_err(|e| GenomeViewerError::Format(e.to_string()))?;
    let written = written_locations(&buffer);
    if written.len() == first.features.len() {
        Ok(build_dataset(&first, Some(written.as_slice())))
    } else {
        debug!(
            parsed = first.features.len(),
            scanned = written.len(),
            "feature table scan disagrees with parser, keeping parsed locations"
        );
        Ok(build_dataset(&first, None))
    }
}

/// Location text of each feature in the first record's feature table, in file
/// order, with continuation lines joined.
fn written_locations(buffer: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(buffer);
    let mut locations: Vec<String> = Vec::new();
    let mut in_table = false;
    let mut in_location = false;
    for line in text.lines() {
        if line.starts_with("//") {
            break;
        }
        if line.starts_with("FEATURES") {
            in_table = true;
            continue;
        }
        if !in_table {
            continue;
        }
        if !line.starts_with(' ') {
            break;
        }
        let body = line.trim_start();
        if line.len() - body.len() == 5 {
            let location = body
                .split_once(char::is_whitespace)
                .map(|(_, rest)| rest.trim())
                .unwrap_or_default();
            locations.push(location.to_string());
            in_location = true;
        } else if in_location && !body.starts_with('/') {
            if let Some(location) = locations.last_mut() {
                location.push_str(body.trim_end());
            }
        } else {
            in_location = false;
        }
    }
    locations
}

/// Builds the dataset from the first of `seqs`.
pub fn dataset_from_seqs(seqs: &[Seq]) -> Result<GenomeDataset> {
    seqs.first()
        .map(dataset_from_seq)
        .ok_or(GenomeViewerError::EmptyInput)
}

pub fn dataset_from_seq(seq: &Seq) -> GenomeDataset {
    build_dataset(seq, None)
}

/// `written` holds the location text of every feature of `seq`, as scanned
/// from the file; a feature whose parsed location does not cover its text is
/// skipped.
fn build_dataset(seq: &Seq, written: Option<&[String]>) -> GenomeDataset {
    let features: Vec<FeatureRecord> = seq
        .features
        .iter()
        .enumerate()
        .filter(|(index, feature)| {
            let Some(text) = written.and_then(|w| w.get(*index)) else {
                return true;
            };
            let complete = location_matches_text(&feature.location, text);
            if !complete {
                debug!(kind = %feature.kind, location = %text, "skipping feature with unparsable location");
            }
            complete
        })
        .filter_map(|(_, feature)| feature_record(feature))
        .collect();
    let dataset = GenomeDataset::new(
        seq.name.clone(),
        match seq.topology {
            gb_io::seq::Topology::Linear => Topology::Linear,
            gb_io::seq::Topology::Circular => Topology::Circular,
        },
        sequence_length(seq),
        features,
    );
    info!(
        record = dataset.record_name.as_deref().unwrap_or("<unnamed>"),
        genome_length = dataset.genome_length,
        features = dataset.len(),
        "GenBank record loaded"
    );
    dataset
}

/// Length of the sequence; falls back to the LOCUS length for records without
/// an ORIGIN block.
fn sequence_length(seq: &Seq) -> usize {
    if seq.seq.is_empty() {
        seq.len.unwrap_or(0)
    } else {
        seq.seq.len()
    }
}

/// Converts one GenBank feature; `None` if its key is not kept or its location
/// has no usable bounds.
pub fn feature_record(feature: &Feature) -> Option<FeatureRecord> {
    let kind = feature.kind.to_string();
    let Some(feature_type) = FeatureType::from_key(&kind) else {
        debug!(kind = %kind, "skipping feature with unsupported key");
        return None;
    };
    let Some((start, end)) = location_bounds(&feature.location) else {
        debug!(kind = %kind, "skipping feature without integer coordinates");
        return None;
    };

    let gene = first_qualifier(feature, "gene")
        .filter(|gene| !gene.is_empty())
        .or_else(|| first_qualifier(feature, "locus_tag"))
        .unwrap_or_default();
    let product = first_qualifier(feature, "product").unwrap_or_default();

    FeatureRecord::new(
        feature_type,
        gene,
        product,
        start,
        end,
        location_strand(&feature.location),
    )
}

fn first_qualifier(feature: &Feature, key: &str) -> Option<String> {
    feature
        .qualifier_values(key.into())
        .next()
        .map(ToOwned::to_owned)
}
