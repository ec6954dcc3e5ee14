// MiniLang: run a script file from the command line

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser as _;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use minilang::interpreter::engine::{Interpreter, InterpreterOptions};
use minilang::parser::lexer::Lexer;
use minilang::parser::parse::Parser;
use minilang::terminal::Terminal;

/// Stack reserved for the interpreter thread
const INTERPRETER_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Call-depth limit on the interpreter thread; reached long before its stack runs out
const MAX_CALL_DEPTH: usize = 1024;

/// MiniLang is a small scripting language with integers, strings, booleans
/// and first-class functions.
#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script file to run.
    script: PathBuf,

    /// Print the token listing and statement count before running, and echo
    /// the value of every top-level expression statement.
    #[arg(short, long)]
    dump: bool,

    /// Log interpreter diagnostics to stderr (RUST_LOG overrides).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    // The AST shares nodes through `Rc`, so the whole pipeline runs on the worker
    let result = thread::Builder::new()
        .name("interpreter".to_string())
        .stack_size(INTERPRETER_STACK_SIZE)
        .spawn(move || run(&args))
        .context("Starting interpreter thread")
        .and_then(|worker| {
            worker
                .join()
                .map_err(|_| anyhow!("Interpreter thread panicked"))?
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&format!("{:#}", error));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "minilang=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let source = fs::read_to_string(&args.script)
        .with_context(|| format!("Reading {}", args.script.display()))?;
    debug!(path = %args.script.display(), bytes = source.len(), "loaded script");

    let tokens = Lexer::new(&source).tokenize()?;
    if args.dump {
        println!("Tokens:");
        for token in &tokens {
            println!("{}", token);
        }
    }

    let mut parser = Parser::new(tokens);
    let parsed = parser.parse_program();
    // Errors recovered before a fatal one are still worth showing
    for diagnostic in parser.diagnostics() {
        report(&diagnostic.to_string());
    }
    let program = parsed?;
    if args.dump {
        println!("Statements: {}", program.len());
    }

    let options = InterpreterOptions {
        dump: args.dump,
        max_call_depth: MAX_CALL_DEPTH,
    };
    let mut interpreter = Interpreter::with_options(Terminal::stdio(), options);
    interpreter.interpret(&program.statements)?;

    Ok(())
}

/// Write a diagnostic to stderr, coloured when stderr is a terminal
fn report(message: &str) {
    if io::stderr().is_tty() {
        eprintln!("{} {}", "error:".red().bold(), message);
    } else {
        eprintln!("error: {}", message);
    }
}
