pub const GENOME_VIEWER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GENOME_VIEWER_BUILD_N: &str = env!("GENOME_VIEWER_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "genome-viewer {}\nBuild {}\nGenBank feature maps: linear, circular and tabular",
        GENOME_VIEWER_VERSION, GENOME_VIEWER_BUILD_N
    )
}
