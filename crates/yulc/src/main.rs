//! yulc - semantic analyzer for Yul
//!
//! Usage: yulc [OPTIONS] <input>

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use yul_compiler::common::{CompileError, DiagnosticReporter};
use yul_compiler::dialect::{EvmVersion, SideEffects};
use yul_compiler::driver::{AnalyzerConfig, Pipeline};
use yul_compiler::names::NameRepository;
use yul_compiler::sema::AnalysisInfo;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "yulc")]
#[command(version = "0.1.0")]
#[command(about = "Semantic analyzer for the Yul intermediate assembly language", long_about = None)]
struct Args {
    /// Input source file (a code block or an object)
    #[arg(required = true)]
    input: PathBuf,

    /// Target EVM version (homestead ... prague)
    #[arg(long, default_value = "cancun")]
    evm_version: EvmVersion,

    /// Use the typed dialect (u256 and bool)
    #[arg(long)]
    typed: bool,

    /// Extra data object name accepted by datasize/dataoffset (repeatable)
    #[arg(long = "data-name", value_name = "NAME")]
    data_names: Vec<String>,

    /// Print the side effects of each analyzed object
    #[arg(long)]
    side_effects: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump scopes (for debugging)
    #[arg(long)]
    dump_scopes: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read '{}'", args.input.display()))?;

    let filename = args.input.display().to_string();
    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    if args.verbose {
        eprintln!("Input: {}", filename);
    }

    let pipeline = Pipeline::new(AnalyzerConfig {
        evm_version: args.evm_version,
        typed: args.typed,
        data_names: args.data_names.clone(),
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        dump_scopes: args.dump_scopes,
        verbose: args.verbose,
    });

    let outcome = pipeline
        .analyze_source(&source, &reporter, file_id)
        .with_context(|| format!("could not analyze '{}'", filename))?;

    if args.side_effects {
        for object in &outcome.objects {
            let label = if object.path.is_empty() { "<code>" } else { object.path.as_str() };
            println!("{}: {}", label, object.side_effects);
            if object.success {
                for (function, effects) in sorted_function_effects(&outcome.names, &object.info) {
                    println!("  function {}: {}", function, effects);
                }
            }
        }
        if outcome.contains_msize {
            println!("msize: used");
        }
    }

    if args.verbose {
        eprintln!(
            "Done: {} error(s), {} warning(s)",
            outcome.error_count(),
            outcome.warning_count()
        );
    }

    if !outcome.success() {
        return Err(CompileError::analysis(outcome.error_count()).into());
    }

    Ok(())
}

fn sorted_function_effects<'a>(
    names: &'a NameRepository,
    info: &AnalysisInfo,
) -> Vec<(&'a str, SideEffects)> {
    let mut functions: Vec<_> = info
        .function_side_effects
        .iter()
        .map(|(function, effects)| (names.resolve(function.name), *effects))
        .collect();
    functions.sort_by(|a, b| a.0.cmp(b.0));
    functions
}
