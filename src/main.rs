//! Eva CLI
//!
//! Main entry point for the `eva` command.

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use eva::config::Config;
use eva::interp::{FileModuleSource, Interpreter, Value};
use eva::repl::Repl;
use eva::{SourceFile, lexer, parser};

#[derive(Parser)]
#[command(name = "eva")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "The Eva S-expression language interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./eva.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extra directory to search for imported modules
    #[arg(long = "module-path", global = true, value_name = "DIR")]
    module_paths: Vec<PathBuf>,

    /// Maximum closure call depth
    #[arg(long, global = true)]
    max_depth: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an Eva source file
    Run {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Evaluate an inline expression
    Eval {
        /// Source text
        #[arg(value_name = "EXPR")]
        source: String,
    },

    /// Parse a file and print the resulting program
    Parse {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Emit the AST as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the interactive REPL
    Repl,

    /// Show information about the interpreter
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Run { input } => run(&input, config),
        Commands::Eval { source } => eval(&source, config),
        Commands::Parse { input, json } => parse(&input, json),
        Commands::Repl => Repl::new(interpreter(config)).run(),
        Commands::Info => info(),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(Path::new("."))?,
    };

    // Command-line paths are searched before configured ones
    if !cli.module_paths.is_empty() {
        let mut paths = cli.module_paths.clone();
        paths.append(&mut config.modules.search_paths);
        config.modules.search_paths = paths;
    }
    if let Some(depth) = cli.max_depth {
        config.limits.max_call_depth = depth;
    }

    tracing::debug!("Using config {:?}", config);
    Ok(config)
}

fn interpreter(config: Config) -> Interpreter {
    let modules = FileModuleSource::from_settings(&config.modules);
    Interpreter::builder().config(config).modules(modules).build()
}

fn read_source(input: &Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(input)
        .map_err(|e| miette::miette!("Failed to read input file: {}", e))?;
    Ok(SourceFile::new(input.display().to_string(), content))
}

fn run(input: &Path, config: Config) -> Result<()> {
    tracing::info!("Running {:?}", input);
    let file = read_source(input)?;
    evaluate(&file, config)
}

fn eval(source: &str, config: Config) -> Result<()> {
    let file = SourceFile::new("<eval>", source);
    evaluate(&file, config)
}

fn evaluate(file: &SourceFile, config: Config) -> Result<()> {
    let program = parse_file(file)?;

    let mut interpreter = interpreter(config);
    let result = interpreter.eval_global(&program)?;

    // Only print results that carry a value
    if !matches!(result, Value::Undefined) {
        println!("{:?}", result);
    }
    Ok(())
}

fn parse_file(file: &SourceFile) -> Result<eva::Expr> {
    let source = &*file.content;
    let tokens = lexer::lex(source).map_err(|e| e.with_source(file))?;
    tracing::debug!("Lexed {} tokens", tokens.len());
    let program = parser::program(&tokens, source).map_err(|e| e.with_source(file))?;
    Ok(program)
}

fn parse(input: &Path, json: bool) -> Result<()> {
    let file = read_source(input)?;
    let program = parse_file(&file)?;

    if json {
        let text = serde_json::to_string_pretty(&program).into_diagnostic()?;
        println!("{}", text);
    } else {
        println!("{}", program);
    }
    Ok(())
}

fn info() -> Result<()> {
    println!("Eva interpreter");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Special forms:");
    println!("  begin var set if while lambda class super new prop module import");
    println!("Sugar:");
    println!("  def switch for ++ -- += -=");
    println!();
    println!("Prelude:");
    let prelude = eva::interp::Prelude::standard();
    println!("  {}", prelude.names().collect::<Vec<_>>().join(" "));
    Ok(())
}
