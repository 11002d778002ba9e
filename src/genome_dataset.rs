use crate::error::GenomeViewerError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Feature keys we keep; everything else in the feature table is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureType {
    #[serde(rename = "gene")]
    Gene,
    #[serde(rename = "CDS")]
    Cds,
    #[serde(rename = "tRNA")]
    Trna,
    #[serde(rename = "rRNA")]
    Rrna,
}

impl FeatureType {
    pub const ALL: [FeatureType; 4] = [
        FeatureType::Gene,
        FeatureType::Cds,
        FeatureType::Trna,
        FeatureType::Rrna,
    ];

    /// The GenBank feature key, as written in the file.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Gene => "gene",
            FeatureType::Cds => "CDS",
            FeatureType::Trna => "tRNA",
            FeatureType::Rrna => "rRNA",
        }
    }

    /// Exact, case-sensitive lookup of a feature key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == key)
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = GenomeViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim()).ok_or_else(|| GenomeViewerError::UnknownFeatureType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
    #[serde(rename = ".")]
    Unknown,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unknown => ".",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    #[default]
    Linear,
    Circular,
}

/// One annotated region. `start` is 0-based inclusive, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    pub gene: String,
    pub product: String,
    pub start: usize,
    pub end: usize,
    pub strand: Strand,
    pub length: usize,
}

impl FeatureRecord {
    /// Returns `None` when `end < start`.
    pub fn new(
        feature_type: FeatureType,
        gene: String,
        product: String,
        start: usize,
        end: usize,
        strand: Strand,
    ) -> Option<Self> {
        let length = end.checked_sub(start)?;
        Some(Self {
            feature_type,
            gene,
            product,
            start,
            end,
            strand,
            length,
        })
    }
}

/// Parse result for one GenBank file. Features are sorted by `start`; ties keep
/// file order. `end <= genome_length` is not checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenomeDataset {
    pub record_name: Option<String>,
    pub topology: Topology,
    pub genome_length: usize,
    pub features: Vec<FeatureRecord>,
}

impl GenomeDataset {
    /// Sorts `features` (stable) and wraps them.
    pub fn new(
        record_name: Option<String>,
        topology: Topology,
        genome_length: usize,
        mut features: Vec<FeatureRecord>,
    ) -> Self {
        features.sort_by_key(|f| f.start);
        Self {
            record_name,
            topology,
            genome_length,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Distinct types present, sorted by feature key. This is the default
    /// selection for type filters.
    pub fn feature_types(&self) -> Vec<FeatureType> {
        self.features
            .iter()
            .map(|f| f.feature_type)
            .unique()
            .sorted_by_key(|t| t.as_str())
            .collect()
    }

    pub fn type_counts(&self) -> BTreeMap<FeatureType, usize> {
        self.features.iter().map(|f| f.feature_type).counts().into_iter().collect()
    }

    /// Records whose type is in `selection`, in dataset order.
    pub fn filter_by_types(&self, selection: &[FeatureType]) -> Vec<&FeatureRecord> {
        self.features
            .iter()
            .filter(|f| selection.contains(&f.feature_type))
            .collect()
    }

    pub fn all_features(&self) -> Vec<&FeatureRecord> {
        self.features.iter().collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(feature_type: FeatureType, gene: &str, start: usize, end: usize) -> FeatureRecord {
        FeatureRecord::new(
            feature_type,
            gene.to_string(),
            String::new(),
            start,
            end,
            Strand::Forward,
        )
        .unwrap()
    }

    fn dataset() -> GenomeDataset {
        GenomeDataset::new(
            Some("toy".to_string()),
            Topology::Circular,
            1000,
            vec![
                record(FeatureType::Cds, "b", 500, 800),
                record(FeatureType::Gene, "a", 100, 400),
                record(FeatureType::Cds, "a", 100, 400),
                record(FeatureType::Trna, "t", 50, 120),
            ],
        )
    }

    #[test]
    fn test_sorted_by_start_with_stable_ties() {
        let ds = dataset();
        let starts: Vec<usize> = ds.features.iter().map(|f| f.start).collect();
        assert_eq!(starts, vec![50, 100, 100, 500]);
        assert_eq!(ds.features[1].feature_type, FeatureType::Gene);
        assert_eq!(ds.features[2].feature_type, FeatureType::Cds);
    }

    #[test]
    fn test_type_counts_sum_to_total() {
        let ds = dataset();
        let counts = ds.type_counts();
        assert_eq!(counts.values().sum::<usize>(), ds.len());
        assert_eq!(counts[&FeatureType::Cds], 2);
        assert!(!counts.contains_key(&FeatureType::Rrna));
    }

    #[test]
    fn test_feature_types_sorted_by_key() {
        assert_eq!(
            dataset().feature_types(),
            vec![FeatureType::Cds, FeatureType::Gene, FeatureType::Trna]
        );
    }

    #[test]
    fn test_filter_keeps_order_and_only_selected() {
        let ds = dataset();
        let filtered = ds.filter_by_types(&[FeatureType::Cds, FeatureType::Trna]);
        let summary: Vec<(FeatureType, usize)> =
            filtered.iter().map(|f| (f.feature_type, f.start)).collect();
        assert_eq!(
            summary,
            vec![
                (FeatureType::Trna, 50),
                (FeatureType::Cds, 100),
                (FeatureType::Cds, 500)
            ]
        );
        assert!(ds.filter_by_types(&[]).is_empty());
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn test_feature_type_keys_are_case_sensitive() {
        assert_eq!(FeatureType::from_key("CDS"), Some(FeatureType::Cds));
        assert_eq!(FeatureType::from_key("cds"), None);
        assert_eq!(FeatureType::from_key("mRNA"), None);
        assert!("misc_feature".parse::<FeatureType>().is_err());
        assert_eq!("tRNA".parse::<FeatureType>().unwrap(), FeatureType::Trna);
    }

    #[test]
    fn test_record_rejects_inverted_range() {
        assert!(FeatureRecord::new(
            FeatureType::Gene,
            String::new(),
            String::new(),
            10,
            5,
            Strand::Unknown
        )
        .is_none());
        assert_eq!(record(FeatureType::Gene, "x", 10, 10).length, 0);
    }

    #[test]
    fn test_serializes_with_genbank_names() {
        let json = serde_json::to_value(record(FeatureType::Cds, "dnaA", 1, 3)).unwrap();
        assert_eq!(json["type"], "CDS");
        assert_eq!(json["strand"], "+");
        assert_eq!(json["length"], 2);
    }
}
