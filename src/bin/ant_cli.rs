use ant::{
    about,
    amino_acids::{AminoAcid, CANONICAL_ORDER},
    genetic_code::TableId,
    report::{self, ReportFormat},
    selection::CodonSelection,
    settings::{AntSettings, DEFAULT_SETTINGS_PATH},
    solver::{DegenerateCodonSolver, SolverResult},
    SolveRequest, GENETIC_CODES,
};
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::{collections::BTreeSet, env, fs};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct TableSummary {
    id: TableId,
    label: String,
    amino_acids: usize,
}

#[derive(Serialize)]
struct ComparisonRow {
    table_id: TableId,
    codon: String,
    offtarget: Vec<String>,
    codons: usize,
}

struct GlobalArgs {
    settings: AntSettings,
    table_id: TableId,
    format: ReportFormat,
    cmd_idx: usize,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  ant_cli --version\n  \
  ant_cli [--config PATH] [--table ID] [--format text|csv|json] capabilities\n  \
  ant_cli [...] tables\n  \
  ant_cli [...] targets AA [AA ...]\n  \
  ant_cli [...] codon CODON\n  \
  ant_cli [...] select AA [AA ...]\n  \
  ant_cli [...] compare AA [AA ...]\n  \
  ant_cli [...] request '<request-json>'\n\n  \
  Amino acids may be given one per argument, comma separated, or run together (eg MW).\n  \
  Tokens that are not all one-letter codes are read as a single code.\n  \
  Tip: pass @file.json instead of inline JSON"
    );
}

fn load_json_arg(value: &str) -> Result<String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).with_context(|| format!("Could not read JSON file '{path}'"))
    } else {
        Ok(value.to_string())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text =
        serde_json::to_string_pretty(value).context("Could not serialize JSON output")?;
    println!("{text}");
    Ok(())
}

fn print_result(result: &SolverResult, format: ReportFormat) -> Result<()> {
    let text = report::render_as(result, format)?;
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
    Ok(())
}

fn is_one_letter_code(c: char) -> bool {
    CANONICAL_ORDER.contains(&c.to_ascii_uppercase().to_string().as_str())
}

/// Amino acids in argument order, repeats kept.
/// Tokens split on commas and whitespace; a token made only of one-letter
/// codes (eg "MW") is read letter by letter, any other token is one code.
fn parse_amino_acids(args: &[String]) -> Vec<AminoAcid> {
    args.iter()
        .flat_map(|arg| arg.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|token| !token.is_empty())
        .flat_map(|token| {
            if token.chars().all(is_one_letter_code) {
                token
                    .chars()
                    .map(|c| AminoAcid::new(&c.to_string()))
                    .collect::<Vec<_>>()
            } else {
                vec![AminoAcid::new(token)]
            }
        })
        .collect()
}

fn parse_target(args: &[String]) -> BTreeSet<AminoAcid> {
    parse_amino_acids(args).into_iter().collect()
}

fn parse_global_args(args: &[String]) -> Result<GlobalArgs> {
    let mut config_path = DEFAULT_SETTINGS_PATH.to_string();
    let mut table_id: Option<TableId> = None;
    let mut format: Option<ReportFormat> = None;
    let mut idx = 1;
    while idx < args.len() && args[idx].starts_with("--") {
        let flag = args[idx].as_str();
        let value = args
            .get(idx + 1)
            .ok_or_else(|| anyhow!("Missing value for {flag}"))?;
        match flag {
            "--config" => config_path = value.clone(),
            "--table" => {
                table_id = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid table id '{value}'"))?,
                )
            }
            "--format" => {
                format = Some(
                    ReportFormat::from_name(value)
                        .ok_or_else(|| anyhow!("Unknown report format '{value}'"))?,
                )
            }
            _ => bail!("Unknown option {flag}"),
        }
        idx += 2;
    }

    let settings = AntSettings::load_or_default(&config_path)?;
    Ok(GlobalArgs {
        table_id: table_id.unwrap_or(settings.default_table),
        format: format.unwrap_or(settings.report_format),
        settings,
        cmd_idx: idx,
    })
}

fn init_logging(settings: &AntSettings) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
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
    init_logging(&global.settings);
    if args.len() <= global.cmd_idx {
        usage();
        bail!("Missing command");
    }

    let command = &args[global.cmd_idx];
    let rest = &args[global.cmd_idx + 1..];
    let solver = DegenerateCodonSolver::default();
    info!(command = command.as_str(), table_id = global.table_id, "running");

    match command.as_str() {
        "capabilities" => print_json(&ant::capabilities()),
        "tables" => {
            let tables: Vec<TableSummary> = GENETIC_CODES
                .tables()
                .map(|t| TableSummary {
                    id: t.id(),
                    label: t.label(),
                    amino_acids: t.alphabet().len(),
                })
                .collect();
            match global.format {
                ReportFormat::Json => print_json(&tables),
                _ => {
                    tables.iter().for_each(|t| println!("{}", t.label));
                    Ok(())
                }
            }
        }
        "targets" => {
            let target = parse_target(rest);
            if target.is_empty() {
                usage();
                bail!("targets requires at least one amino acid");
            }
            let result = solver.solve_for_targets(&target, global.table_id)?;
            print_result(&result, global.format)
        }
        "codon" => {
            let codon = rest
                .first()
                .ok_or_else(|| anyhow!("codon requires a degenerate codon, eg NNK"))?;
            let result = solver.solve_for_codon(codon, global.table_id)?;
            print_result(&result, global.format)
        }
        "select" => {
            // Each amino acid toggles, as clicking the wheel would; repeats deselect
            let mut selection = CodonSelection::new(solver, global.table_id)?;
            for aa in parse_amino_acids(rest) {
                selection.toggle(aa)?;
            }
            match global.format {
                ReportFormat::Text => {
                    println!("{}", selection.clipboard_text().trim_end());
                    Ok(())
                }
                format => print_result(selection.result(), format),
            }
        }
        "compare" => {
            let target = parse_target(rest);
            if target.is_empty() {
                usage();
                bail!("compare requires at least one amino acid");
            }
            let rows: Vec<ComparisonRow> = solver
                .compare_tables(&target)?
                .iter()
                .map(|r| ComparisonRow {
                    table_id: r.table_id(),
                    codon: r.chosen().map(|c| c.to_string()).unwrap_or_default(),
                    offtarget: r.offtarget().iter().map(|aa| aa.code().to_string()).collect(),
                    codons: r.codons_per_aa().values().sum(),
                })
                .collect();
            match global.format {
                ReportFormat::Json => print_json(&rows),
                _ => {
                    for row in &rows {
                        println!(
                            "{}\t{}\t{}\t{}",
                            row.table_id,
                            row.codon,
                            row.codons,
                            if row.offtarget.is_empty() {
                                "-".to_string()
                            } else {
                                row.offtarget.join(",")
                            }
                        );
                    }
                    Ok(())
                }
            }
        }
        "request" => {
            let json = load_json_arg(
                rest.first()
                    .ok_or_else(|| anyhow!("request requires a JSON argument"))?,
            )?;
            let request = SolveRequest::from_json(&json).context("Invalid request JSON")?;
            let result = solver.solve_request(&request)?;
            print_result(&result, global.format)
        }
        other => {
            usage();
            Err(anyhow!("Unknown command '{other}'"))
        }
    }
}
