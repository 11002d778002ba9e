pub mod about;
pub mod error;
pub mod feature_location;
pub mod feature_table;
pub mod genbank_reader;
pub mod genome_dataset;
pub mod geometry;
pub mod logging;
pub mod render_export;
pub mod settings;

pub use error::{GenomeViewerError, Result};
pub use genbank_reader::{read_genbank, read_genbank_file, read_genbank_str};
pub use genome_dataset::{FeatureRecord, FeatureType, GenomeDataset, Strand, Topology};
