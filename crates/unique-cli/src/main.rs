//! Command-line front end for the unique definability extractor.
//!
//! Detects one of QCIR/DQCIR/QDIMACS/DQDIMACS from the input file,
//! parses it into a gate graph, runs the extraction pipeline over it
//! with a brute-force [`ReferenceSolver`], and emits the (possibly
//! partially) annotated graph in the requested output format.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Write};
use std::path::PathBuf;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use unique_parse::{detect, emit, FileType};
use unique_solve::{pipeline, CancellationToken, ReferenceSolver};

/// Extract explicit Boolean definitions for uniquely determined
/// variables of a QBF or DQBF instance.
#[derive(Parser)]
#[command(name = "unique")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file (QCIR, DQCIR, QDIMACS, or DQDIMACS)
    input: PathBuf,

    /// Conflict limit for the SAT solver (per variable)
    #[arg(short, long, default_value_t = 1000)]
    conflict_limit: u32,

    /// Write output to file (instead of standard output)
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// Use only universals for existential definitions and vice versa
    #[arg(short, long)]
    strict: bool,

    /// Output format (QCIR | QDIMACS | DIMACS | Verilog)
    #[arg(long, default_value = "QCIR")]
    output_format: String,

    /// Read variable ordering for definability from file
    #[arg(long)]
    ordering_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let contents = match std::fs::read_to_string(&cli.input) {
        Ok(c) => c,
        Err(_) => {
            eprintln!("Invalid input file: {}", cli.input.display());
            std::process::exit(1);
        }
    };

    let format = match detect::detect(Cursor::new(&contents)) {
        Some(f) => f,
        None => {
            eprintln!("Invalid input file: {}", cli.input.display());
            std::process::exit(1);
        }
    };

    match format {
        FileType::Qdimacs => eprintln!("Reading QDIMACS file: {}", cli.input.display()),
        FileType::Qcir => eprintln!("Reading QCIR file: {}", cli.input.display()),
        FileType::Dqdimacs => eprintln!("Reading DQDIMACS file: {}", cli.input.display()),
        FileType::Dqcir => {}
    }

    let (mut graph, deps) = unique_parse::parse(format, Cursor::new(&contents))?;

    let ordering = match &cli.ordering_file {
        Some(path) => {
            eprintln!("Using ordering file: {}", path.display());
            let file = File::open(path)?;
            Some(unique_parse::ordering::parse(BufReader::new(file))?)
        }
        None => None,
    };

    let cancel = CancellationToken::new();
    let handler_cancel = cancel.clone();
    let _ = ctrlc::set_handler(move || {
        eprintln!("Received interrupt, trying to shut down gracefully.");
        handler_cancel.cancel();
    });

    let use_same_type = !cli.strict;
    if let Err(e) = pipeline::run::<ReferenceSolver>(&mut graph, &deps, use_same_type, cli.conflict_limit, ordering.as_ref(), &cancel) {
        eprintln!("{}", e);
    }

    let dimacs_origin = matches!(format, FileType::Qdimacs | FileType::Dqdimacs);
    write_output(cli, &graph, &deps, dimacs_origin)?;

    Ok(())
}

/// Validate a requested `--output-format` value, falling back to QCIR
/// (with a warning) for anything unrecognized.
fn resolve_output_format(requested: &str) -> &'static str {
    match requested {
        "QDIMACS" => "QDIMACS",
        "DIMACS" => "DIMACS",
        "Verilog" => "Verilog",
        "QCIR" => "QCIR",
        other => {
            eprintln!("Invalid output format: {other}, using default (QCIR).");
            "QCIR"
        }
    }
}

fn write_output(cli: &Cli, graph: &unique_ir::GateGraph, deps: &unique_ir::DependencyMap, dimacs_origin: bool) -> anyhow::Result<()> {
    let format = resolve_output_format(&cli.output_format);

    let sink: Box<dyn Write> = match &cli.output_file {
        Some(path) => {
            eprintln!("Writing to file: {}", path.display());
            match File::create(path) {
                Ok(file) => Box::new(file),
                Err(e) => {
                    eprintln!("Could not open output file {}: {}", path.display(), e);
                    return Ok(());
                }
            }
        }
        None => Box::new(io::stdout().lock()),
    };

    match format {
        "QDIMACS" => emit::write_qdimacs(graph, deps, dimacs_origin, sink)?,
        "DIMACS" => emit::write_dimacs(graph, sink)?,
        "Verilog" => emit::write_verilog(graph, sink)?,
        _ => emit::write_qcir(graph, deps, sink)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_output_format_passes_through_known_values() {
        assert_eq!(resolve_output_format("QDIMACS"), "QDIMACS");
        assert_eq!(resolve_output_format("DIMACS"), "DIMACS");
        assert_eq!(resolve_output_format("Verilog"), "Verilog");
        assert_eq!(resolve_output_format("QCIR"), "QCIR");
    }

    #[test]
    fn resolve_output_format_falls_back_to_qcir() {
        assert_eq!(resolve_output_format("qdimacs"), "QCIR");
        assert_eq!(resolve_output_format("bogus"), "QCIR");
    }

    #[test]
    fn flags_parse_with_expected_defaults() {
        let cli = Cli::parse_from(["unique", "input.qcir"]);
        assert_eq!(cli.conflict_limit, 1000);
        assert_eq!(cli.output_format, "QCIR");
        assert!(!cli.strict);
        assert!(cli.output_file.is_none());
        assert!(cli.ordering_file.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn short_flags_are_recognized() {
        let cli = Cli::parse_from(["unique", "-s", "-c", "50", "-vv", "input.qdimacs"]);
        assert!(cli.strict);
        assert_eq!(cli.conflict_limit, 50);
        assert_eq!(cli.verbose, 2);
    }

    /// End-to-end: S1 from the manual — a non-definable existential
    /// under a universal survives extraction untouched.
    #[test]
    fn non_definable_variable_is_not_spliced() {
        let input = "#QCIR-G14\nexists(x,y)\nforall(z)\nexists(w)\noutput(g)\ng = and(w, x)\n";
        let (mut graph, deps) = unique_parse::parse(FileType::Qcir, Cursor::new(input)).unwrap();
        assert!(deps.is_empty());

        let cancel = CancellationToken::new();
        pipeline::run::<ReferenceSolver>(&mut graph, &deps, true, 1000, None, &cancel).unwrap();

        let w = graph.alias_of("w").unwrap();
        assert_eq!(graph.gate(w).kind, unique_ir::GateKind::Existential);
    }

    /// Full `run()` path: S2 from the manual, a QDIMACS XOR definition
    /// extracted and written to a file as Verilog.
    #[test]
    fn run_writes_verilog_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("xor.qdimacs");
        std::fs::write(&input_path, "p cnf 3 4\ne 1 2 3 0\n-1 -2 3 0\n1 2 3 0\n-1 2 -3 0\n1 -2 -3 0\n").unwrap();
        let output_path = dir.path().join("xor.v");

        let cli = Cli::parse_from([
            "unique",
            "--output-format",
            "Verilog",
            "-o",
            output_path.to_str().unwrap(),
            input_path.to_str().unwrap(),
        ]);

        run(&cli).unwrap();

        let written = std::fs::read_to_string(&output_path).unwrap();
        assert!(written.contains("v_3"));
    }
}
