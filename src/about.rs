pub const ANT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_cli_text() -> String {
    format!(
        "ANT {}\nAmbiguous Nucleotide Tool: degenerate codon design",
        ANT_VERSION
    )
}
