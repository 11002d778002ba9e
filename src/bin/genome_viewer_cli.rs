use anyhow::{Context, Result, anyhow, bail};
use genome_viewer::{
    FeatureRecord, FeatureType, GenomeDataset, about,
    feature_table::{TableFormat, write_table},
    genbank_reader::read_genbank_file,
    geometry::{circular_segments_with_resolution, linear_series},
    logging::init_tracing,
    render_export::{export_circular_svg, export_linear_svg},
    settings::ViewerSettings,
};
use serde::Serialize;
use std::{collections::BTreeMap, env, fs, io};
use tracing::info;

#[derive(Serialize)]
struct DatasetSummary {
    record_name: Option<String>,
    topology: genome_viewer::Topology,
    genome_length: usize,
    feature_count: usize,
    type_counts: BTreeMap<FeatureType, usize>,
}

struct GlobalArgs {
    settings: ViewerSettings,
    types: Option<Vec<FeatureType>>,
    cmd_idx: usize,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  genome_viewer_cli --version\n  \
  genome_viewer_cli [--settings PATH] [--types T1,T2] summary FILE.gb\n  \
  genome_viewer_cli [--settings PATH] [--types T1,T2] table FILE.gb [csv|tsv|json]\n  \
  genome_viewer_cli [--settings PATH] [--types T1,T2] linear FILE.gb\n  \
  genome_viewer_cli [--settings PATH] [--types T1,T2] circular FILE.gb\n  \
  genome_viewer_cli [--settings PATH] [--types T1,T2] render-svg FILE.gb linear|circular OUTPUT.svg\n\n  \
  Feature types: gene, CDS, tRNA, rRNA. Log level: GENOME_VIEWER_LOG=genome_viewer=debug"
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Could not serialize JSON output")?;
    println!("{text}");
    Ok(())
}

fn parse_types(value: &str) -> Result<Vec<FeatureType>> {
    value
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.parse::<FeatureType>().map_err(|e| anyhow!(e)))
        .collect()
}

fn parse_global_args(args: &[String]) -> Result<GlobalArgs> {
    let mut settings = ViewerSettings::default();
    let mut types = None;
    let mut idx = 1;
    while idx < args.len() {
        match args[idx].as_str() {
            "--settings" => {
                let path = args.get(idx + 1).ok_or_else(|| anyhow!("Missing path for --settings"))?;
                settings = ViewerSettings::load_from_path(path)?;
                idx += 2;
            }
            "--types" => {
                let value = args.get(idx + 1).ok_or_else(|| anyhow!("Missing value for --types"))?;
                types = Some(parse_types(value)?);
                idx += 2;
            }
            _ => break,
        }
    }
    Ok(GlobalArgs {
        settings,
        types,
        cmd_idx: idx,
    })
}

fn load_dataset(path: &str) -> Result<GenomeDataset> {
    read_genbank_file(path).with_context(|| format!("Could not load GenBank file '{path}'"))
}

/// `--types` wins over the settings file; both fall back to every type present.
fn selected_features<'a>(dataset: &'a GenomeDataset, global: &GlobalArgs) -> Vec<&'a FeatureRecord> {
    let selection = match &global.types {
        Some(types) => types.clone(),
        None => global.settings.selected_types(dataset),
    };
    dataset.filter_by_types(&selection)
}

fn summarize(dataset: &GenomeDataset) -> DatasetSummary {
    DatasetSummary {
        record_name: dataset.record_name.clone(),
        topology: dataset.topology,
        genome_length: dataset.genome_length,
        feature_count: dataset.len(),
        type_counts: dataset.type_counts(),
    }
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        bail!("Missing command");
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    let global = parse_global_args(&args)?;
    let cmd_idx = global.cmd_idx;
    if args.len() <= cmd_idx + 1 {
        usage();
        bail!("Missing command or GenBank file");
    }
    let command = &args[cmd_idx];
    let dataset = load_dataset(&args[cmd_idx + 1])?;
    let features = selected_features(&dataset, &global);
    info!(command = %command, selected = features.len(), "running command");

    match command.as_str() {
        "summary" => print_json(&summarize(&dataset)),
        "table" => {
            let format = match args.get(cmd_idx + 2) {
                Some(name) => name.parse::<TableFormat>()?,
                None => global.settings.table_format,
            };
            let stdout = io::stdout();
            write_table(&features, format, stdout.lock())?;
            Ok(())
        }
        "linear" => print_json(&linear_series(&features)),
        "circular" => {
            let segments = circular_segments_with_resolution(
                &features,
                dataset.genome_length,
                global.settings.arc_resolution,
            )?;
            print_json(&segments)
        }
        "render-svg" => {
            if args.len() <= cmd_idx + 3 {
                usage();
                bail!("render-svg requires: FILE.gb linear|circular OUTPUT.svg");
            }
            let mode = &args[cmd_idx + 2];
            let output = &args[cmd_idx + 3];
            let svg = match mode.as_str() {
                "linear" => export_linear_svg(&dataset, &linear_series(&features)),
                "circular" => {
                    let segments = circular_segments_with_resolution(
                        &features,
                        dataset.genome_length,
                        global.settings.arc_resolution,
                    )?;
                    export_circular_svg(&dataset, &segments)
                }
                _ => bail!("Unknown render mode '{mode}', expected 'linear' or 'circular'"),
            };
            fs::write(output, svg)
                .with_context(|| format!("Could not write SVG output '{output}'"))?;
            println!("Wrote {mode} SVG to '{output}'");
            Ok(())
        }
        _ => {
            usage();
            bail!("Unknown command '{command}'")
        }
    }
}
