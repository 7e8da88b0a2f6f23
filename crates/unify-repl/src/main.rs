//! unilog - unify terms and run Datalog programs from the command line

mod demos;
mod output;
mod report;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use datalog_core::unify;
use datalog_eval::{Database, EvaluationError, InferenceOptions};
use datalog_parser::{parse_program, parse_term, SrcId};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "unilog", version, about = "Unify terms and run Datalog programs")]
struct Cli {
    /// Increase log output (-v for debug, -vv for trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Unify two terms, or prompt for pairs when they are not both given
    Unify {
        #[arg(long)]
        term1: Option<String>,
        #[arg(long)]
        term2: Option<String>,
    },
    /// Load a Datalog program, infer all facts, and answer its queries
    Run {
        file: PathBuf,
        /// Give up after this many inference passes
        #[arg(long)]
        max_iterations: Option<usize>,
    },
    /// Run one of the built-in examples
    Demo {
        #[arg(value_enum)]
        name: Demo,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Demo {
    Ancestor,
    EscapeRoom,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Unify {
            term1: Some(term1),
            term2: Some(term2),
        } => {
            unify_once(&term1, &term2)?;
            Ok(())
        }
        Command::Unify { .. } => unify_interactive(),
        Command::Run {
            file,
            max_iterations,
        } => run_program(&file, &InferenceOptions { max_iterations }),
        Command::Demo { name } => match name {
            Demo::Ancestor => demos::ancestor(),
            Demo::EscapeRoom => demos::escape_room(),
        },
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Parse and unify one pair, printing the verdict
fn unify_once(text1: &str, text2: &str) -> Result<()> {
    let term1 = report::parse_or_report(
        parse_term(text1, SrcId::named("term1")),
        SrcId::named("term1"),
        text1,
    )?;
    let term2 = report::parse_or_report(
        parse_term(text2, SrcId::named("term2")),
        SrcId::named("term2"),
        text2,
    )?;

    for line in output::unifier_lines(unify(&term1, &term2).as_ref()) {
        println!("{}", line);
    }
    Ok(())
}

fn unify_interactive() -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut prompt = |label: &str| -> Result<String> {
        print!("{}", label);
        io::stdout().flush()?;
        match lines.next() {
            Some(line) => Ok(line?.trim().to_string()),
            None => Ok(String::new()),
        }
    };

    loop {
        let term1 = prompt("Term 1> ")?;
        let term2 = prompt("Term 2> ")?;
        if term1.is_empty() && term2.is_empty() {
            return Ok(());
        }
        // A bad pair is reported and the loop carries on
        if let Err(e) = unify_once(&term1, &term2) {
            eprintln!("{:#}", e);
        }
    }
}

fn run_program(file: &Path, options: &InferenceOptions) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    for line in answer_program(&text, SrcId::from_path(file), options)? {
        println!("{}", line);
    }
    Ok(())
}

/// Load, infer and answer every query of a program, one output line each.
///
/// Hitting the pass limit is not fatal: queries are answered from whatever
/// was derived before inference stopped.
fn answer_program(text: &str, src: SrcId, options: &InferenceOptions) -> Result<Vec<String>> {
    let program = report::parse_or_report(parse_program(text, src), src, text)?;

    let mut db = Database::new();
    let queries = db
        .load_program(&program)
        .with_context(|| format!("failed to load {}", src))?;

    for violation in db.check_safety() {
        warn!("{}", violation);
    }

    match db.infer_with(options) {
        Ok(stats) => info!(
            iterations = stats.iterations,
            rule_applications = stats.rule_applications,
            facts_derived = stats.facts_derived,
            "inference finished"
        ),
        Err(EvaluationError::IterationLimit { limit }) => {
            warn!(limit, "no fixpoint within the pass limit, answering from partial facts")
        }
        Err(e) => return Err(e).context("inference failed"),
    }

    let mut lines = Vec::new();
    for query in &queries {
        let answers: Vec<_> = db.query(&query.body)?.collect();
        lines.push(query.to_string());
        lines.extend(
            output::answer_lines(query, &answers)
                .into_iter()
                .map(|line| format!("  {}", line)),
        );
    }
    Ok(lines)
}
