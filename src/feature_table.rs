use crate::{
    error::{GenomeViewerError, Result},
    genome_dataset::FeatureRecord,
};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::{
    io::{self, Write},
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl FromStr for TableFormat {
    type Err = GenomeViewerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            _ => Err(GenomeViewerError::UnknownTableFormat(s.to_string())),
        }
    }
}

/// Writes every attribute of `features`, one row per record, header first.
pub fn write_table<W: Write>(features: &[&FeatureRecord], format: TableFormat, writer: W) -> Result<()> {
    match format {
        TableFormat::Csv => write_delimited(features, b',', writer),
        TableFormat::Tsv => write_delimited(features, b'\t', writer),
        TableFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, features)?;
            writeln!(writer)?;
            Ok(())
        }
    }
}

fn write_delimited<W: Write>(features: &[&FeatureRecord], delimiter: u8, writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_writer(writer);
    if features.is_empty() {
        csv_writer.write_record(["type", "gene", "product", "start", "end", "strand", "length"])?;
    }
    for feature in features {
        csv_writer.serialize(feature)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn table_to_string(features: &[&FeatureRecord], format: TableFormat) -> Result<String> {
    let mut buffer = Vec::new();
    write_table(features, format, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}
