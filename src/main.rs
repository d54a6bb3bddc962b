//! flr-toolkit - inspect sources of the bundled languages
//!
//! Prints the AST or the tokens of a file, evaluates XPath queries and
//! runs queries over whole directory trees.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use flr::grammars::{expression, json};
use flr::memory;
use flr::testing::minic::{MiniCConfiguration, TAB_WIDTH_PROPERTY};
use flr::toolkit::batch::{self, Match};
use flr::toolkit::{
    CachedConfigurationModel, ConfigurationModel, LexerlessConfiguration, SourceCodeModel, CHARSET_PROPERTY,
};
use flr::xpath::AstNodeXPathQuery;
use flr::{Error, Result};
use tracing::{debug, error, warn};

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: memory::TrackingAllocator = memory::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// flr-toolkit - inspect sources of the bundled languages
#[derive(Parser, Debug)]
#[command(name = "flr-toolkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Language of the sources
    #[arg(short = 'L', long = "language", value_enum, default_value_t = Language::Minic, global = true)]
    language: Language,

    /// Charset used to read files (overrides the language default)
    #[arg(long = "charset", value_name = "NAME", global = true)]
    charset: Option<String>,

    /// Columns counted for a tab character (lexerful languages)
    #[arg(long = "tab-width", value_name = "N", global = true)]
    tab_width: Option<u32>,

    /// Configuration property overrides in name=value format (can be specified multiple times)
    #[arg(long = "set", value_name = "NAME=VALUE", action = ArgAction::Append, global = true)]
    property_overrides: Vec<String>,

    /// Log level: trace, debug, info, warn, error (overrides RUST_LOG)
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        env = "FLR_LOG_LEVEL",
        global = true
    )]
    log_level: Option<String>,

    /// Print allocation statistics on exit (needs the memory_tracking feature)
    #[arg(long = "memory-stats", action = ArgAction::SetTrue, global = true)]
    memory_stats: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the AST of a file as XML
    Ast {
        file: PathBuf,
    },

    /// Print the tokens of a file, with their comments
    Tokens {
        file: PathBuf,
    },

    /// Evaluate an XPath expression against the AST of a file
    Xpath {
        file: PathBuf,

        /// XPath 1.0 expression, e.g. //IF_STATEMENT
        expression: String,
    },

    /// Parse every file under a directory and report the matches of each query
    Batch {
        root: PathBuf,

        /// Only files with this extension
        #[arg(short = 'x', long = "extension", value_name = "EXT")]
        extension: Option<String>,

        /// XPath expression (can be specified multiple times)
        #[arg(short = 'e', long = "xpath", value_name = "EXPR", action = ArgAction::Append)]
        expressions: Vec<String>,
    },

    /// List the configuration properties of the language
    Properties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Language {
    Minic,
    Json,
    Expression,
}

impl Cli {
    /// Apply CLI overrides to the configuration properties
    fn apply_to_model<M: ConfigurationModel>(&self, model: &mut M) -> Result<()> {
        if let Some(charset) = &self.charset {
            model.set_property(CHARSET_PROPERTY, charset)?;
        }
        if let Some(tab_width) = self.tab_width {
            model.set_property(TAB_WIDTH_PROPERTY, &tab_width.to_string())?;
        }
        for override_str in &self.property_overrides {
            let (name, value) = override_str.split_once('=').ok_or_else(|| {
                Error::Config(format!(
                    "Invalid property override '{}': expected name=value format",
                    override_str
                ))
            })?;
            model.set_property(name.trim(), value)?;
        }
        Ok(())
    }
}

fn init_logging(level: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_ast<M: ConfigurationModel>(source: &mut SourceCodeModel<M>, file: &Path) -> Result<()> {
    source.set_source_file(file)?;
    println!("{}", source.xml());
    Ok(())
}

fn cmd_tokens<M: ConfigurationModel>(model: &mut M, language: Language, file: &Path) -> Result<()> {
    let lexer = model
        .lexer()?
        .ok_or_else(|| Error::Config(format!("The {:?} language has no lexer", language)))?;
    for token in lexer.lex_file(file)? {
        for trivia in token.trivia() {
            if let Some(comment) = trivia.token().filter(|_| trivia.is_comment()) {
                println!("{}:{} COMMENT {:?}", comment.line(), comment.column(), comment.value());
            }
        }
        println!(
            "{}:{} {} {:?}",
            token.line(),
            token.column(),
            token.token_type(),
            token.value()
        );
    }
    Ok(())
}

fn print_match(prefix: &str, m: &Match) {
    match (m.line, m.column) {
        (Some(line), Some(column)) => println!("{}{}:{}: {}", prefix, line, column, m.text),
        _ => println!("{}{}", prefix, m.text),
    }
}

fn cmd_xpath<M: ConfigurationModel>(source: &mut SourceCodeModel<M>, file: &Path, expression: &str) -> Result<()> {
    let query = AstNodeXPathQuery::create(expression)?;
    source.set_source_file(file)?;
    let Some(ast) = source.ast() else {
        return Ok(());
    };
    let results = query.select_nodes(ast.root())?;
    debug!(results = results.len(), "xpath evaluated");
    for result in &results {
        print_match("", &Match::from_result(result));
    }
    Ok(())
}

fn cmd_batch<M: ConfigurationModel>(
    model: &mut M,
    root: &Path,
    extension: Option<&str>,
    expressions: &[String],
) -> Result<bool> {
    let queries = expressions
        .iter()
        .map(|e| AstNodeXPathQuery::create(e))
        .collect::<Result<Vec<_>>>()?;
    if queries.is_empty() {
        warn!("no xpath expression given, files are only parsed");
    }
    let files = batch::collect_files(root, extension)?;
    let report = batch::run(model.parser()?, &files, &queries);

    for file in &report.files {
        let path = file.path.display();
        match &file.outcome {
            Ok(queries) => {
                for query in queries {
                    match &query.matches {
                        Ok(matches) => {
                            for m in matches {
                                print_match(&format!("{}:", path), m);
                            }
                        }
                        Err(e) => eprintln!("{}: query {}: {}", path, query.expression, e),
                    }
                }
            }
            Err(e) => eprintln!("{}: {}", path, e),
        }
    }
    println!(
        "{} files parsed, {} failed, {} matches, {} query errors",
        report.parsed(),
        report.failed(),
        report.total_matches(),
        report.query_errors()
    );
    Ok(report.failed() == 0)
}

fn cmd_properties<M: ConfigurationModel>(model: &M) {
    for property in model.properties() {
        println!("{} = {}", property.name(), property.value());
        if !property.description().is_empty() {
            println!("    {}", property.description());
        }
    }
}

fn run<M: ConfigurationModel>(cli: &Cli, mut model: M) -> Result<bool> {
    cli.apply_to_model(&mut model)?;
    match &cli.command {
        Commands::Ast { file } => cmd_ast(&mut SourceCodeModel::new(model), file)?,
        Commands::Tokens { file } => cmd_tokens(&mut model, cli.language, file)?,
        Commands::Xpath { file, expression } => cmd_xpath(&mut SourceCodeModel::new(model), file, expression)?,
        Commands::Batch {
            root,
            extension,
            expressions,
        } => return cmd_batch(&mut model, root, extension.as_deref(), expressions),
        Commands::Properties => cmd_properties(&model),
    }
    Ok(true)
}

fn run_language(cli: &Cli) -> Result<bool> {
    match cli.language {
        Language::Minic => run(cli, CachedConfigurationModel::new(MiniCConfiguration::new()?)),
        Language::Json => run(cli, CachedConfigurationModel::new(LexerlessConfiguration::new(json::grammar)?)),
        Language::Expression => run(
            cli,
            CachedConfigurationModel::new(LexerlessConfiguration::new(expression::grammar)?),
        ),
    }
}

fn print_memory_stats() {
    if !memory::is_tracking() {
        eprintln!("memory statistics need a build with the memory_tracking feature");
        return;
    }
    let stats = memory::stats();
    eprintln!(
        "memory: {} bytes allocated, {} bytes peak",
        stats.allocated, stats.peak
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let outcome = run_language(&cli);
    if cli.memory_stats {
        print_memory_stats();
    }
    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
