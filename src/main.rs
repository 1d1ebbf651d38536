use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;
use serde::Serialize;

use lambdacalc::ast::Expr;
use lambdacalc::fmt::RenderMode;
use lambdacalc::parser::{ParseError, ParseOptions, parse};
use lambdacalc::reduce::LambdaConversion;
use lambdacalc::typer::IdentifierTyper;
use lambdacalc::types::Type;

/// Parse, type and reduce lambda calculus expressions
#[derive(Parser, Debug)]
#[command(name = "lambdacalc", version, about, long_about = None)]
struct Args {
    /// Expressions to evaluate; without any, read one per line from standard input
    #[arg(value_name = "EXPR")]
    expressions: Vec<String>,

    /// Accept keyboard spellings such as `Lx.P(x) & Q(x)`
    #[arg(long)]
    ascii: bool,

    /// Identifiers are single letters, so `Rxy` means `R(x,y)`
    #[arg(long = "single-letter")]
    single_letter: bool,

    /// Typing conventions to use instead of the defaults
    #[arg(long, value_name = "FILE")]
    conventions: Option<PathBuf>,

    /// Output notation
    #[arg(long, value_enum, default_value_t = Mode::Txt)]
    mode: Mode,

    /// Print each expression, its type and its reduction steps as JSON
    #[arg(long)]
    json: bool,

    /// Give up reducing after this many steps
    #[arg(long, value_name = "N", default_value_t = 100)]
    max_steps: usize,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Txt,
    Html,
    Latex,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Txt => RenderMode::Txt,
            Mode::Html => RenderMode::Html,
            Mode::Latex => RenderMode::Latex,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let typer = match &args.conventions {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            IdentifierTyper::from_conventions(&text)
                .with_context(|| format!("invalid conventions in {}", path.display()))?
        }
        None => IdentifierTyper::default(),
    };
    let mut options = ParseOptions::new()
        .ascii(args.ascii)
        .single_letter_identifiers(args.single_letter)
        .typer(typer);

    if !args.expressions.is_empty() {
        for text in &args.expressions {
            evaluate(text, &mut options, &args)?;
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut failed = false;
    for line in stdin.lock().lines() {
        let line = line.context("could not read standard input")?;
        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = evaluate(&line, &mut options, &args) {
            eprintln!("error: {err:#}");
            failed = true;
        }
        io::stdout().flush()?;
    }
    if failed {
        bail!("some expressions could not be evaluated");
    }
    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    input: &'a str,
    expr: &'a Expr,
    #[serde(rename = "type")]
    ty: &'a Type,
    steps: &'a [LambdaConversion],
    stopped: bool,
}

fn evaluate(text: &str, options: &mut ParseOptions, args: &Args) -> Result<()> {
    let mode = RenderMode::from(args.mode);
    let expr = match parse(text, options) {
        Ok(expr) => expr,
        Err(err) => {
            report_parse_error(text, &err);
            return Err(err).with_context(|| format!("could not parse {text:?}"));
        }
    };
    let ty = expr
        .get_type()
        .with_context(|| format!("could not type {}", expr))?;
    let (steps, stopped) = reduce(&expr, args.max_steps);

    if args.json {
        let report = Report {
            input: text,
            expr: &expr,
            ty: &ty,
            steps: &steps,
            stopped,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", expr.render(mode));
    println!("  type: {ty}");
    for step in &steps {
        if let Some(variant) = &step.alphabetic_variant {
            println!("  = {}  (alphabetic variant)", variant.render(mode));
        }
        println!("  = {}", step.result.render(mode));
    }
    if stopped {
        println!("  (stopped after {} steps)", args.max_steps);
    }
    Ok(())
}

/// Reduce one step at a time; the flag is set when `max_steps` ran out first.
fn reduce(expr: &Expr, max_steps: usize) -> (Vec<LambdaConversion>, bool) {
    let mut current = expr.clone();
    let mut steps = Vec::new();
    while let Some(step) = current.perform_lambda_conversion() {
        if steps.len() == max_steps {
            return (steps, true);
        }
        current = step.result.clone();
        steps.push(step);
    }
    (steps, false)
}

fn report_parse_error(text: &str, err: &ParseError) {
    if let Some(position) = err.position() {
        eprintln!("  {text}");
        eprintln!("  {}^", " ".repeat(position));
    }
}
