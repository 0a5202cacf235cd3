//! sqlfold CLI - Command line interface for the migration folder

use std::fs;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sqlfold_ast::{Schema, Statement, ToSql};
use sqlfold_lexer::Vocabulary;
use sqlfold_parser::{parse_with, ParseError};

mod scripts;

use scripts::{concatenate, discover_scripts};

#[derive(Parser)]
#[command(name = "sqlfold")]
#[command(about = "Consolidate SQL migration scripts into one schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Extra datatype name to recognise (repeatable), e.g. DECIMAL
    #[arg(long = "datatype", global = true)]
    datatypes: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and output the AST as JSON
    Parse {
        /// Input file
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Print a file as canonical SQL without folding
    Fmt {
        /// Input file
        file: PathBuf,
    },
    /// Fold ALTER TABLE statements of a file into its CREATE TABLEs
    Fold {
        /// Input file
        file: PathBuf,
    },
    /// Merge every .sql file under a directory into one folded script
    Merge {
        /// Directory to scan
        dir: PathBuf,
        /// Output file (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the statements of a file per table
    Info {
        /// Input file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let vocabulary = Vocabulary::default().with_datatypes(cli.datatypes);

    match cli.command {
        Commands::Parse { file, pretty } => cmd_parse(&file, pretty, &vocabulary),
        Commands::Fmt { file } => cmd_fmt(&file, &vocabulary),
        Commands::Fold { file } => cmd_fold(&file, &vocabulary),
        Commands::Merge { dir, output } => cmd_merge(&dir, output, &vocabulary),
        Commands::Info { file } => cmd_info(&file, &vocabulary),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(file: &Path) -> String {
    match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

/// Parse or exit with a rendered diagnostic
fn parse_or_exit(source: &str, name: &str, vocabulary: &Vocabulary) -> Schema {
    match parse_with(source, vocabulary) {
        Ok(schema) => {
            tracing::info!(statements = schema.len(), "parsed {}", name);
            schema
        }
        Err(e) => {
            report_parse_error(source, name, &e);
            std::process::exit(1);
        }
    }
}

fn cmd_parse(file: &Path, pretty: bool, vocabulary: &Vocabulary) {
    let source = read_source(file);
    let schema = parse_or_exit(&source, &file.to_string_lossy(), vocabulary);

    let json = if pretty {
        serde_json::to_string_pretty(&schema)
    } else {
        serde_json::to_string(&schema)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing AST: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_fmt(file: &Path, vocabulary: &Vocabulary) {
    let source = read_source(file);
    let schema = parse_or_exit(&source, &file.to_string_lossy(), vocabulary);
    println!("{}", schema.to_sql());
}

fn cmd_fold(file: &Path, vocabulary: &Vocabulary) {
    let source = read_source(file);
    let schema = parse_or_exit(&source, &file.to_string_lossy(), vocabulary);
    println!("{}", fold_logged(&schema).to_sql());
}

fn fold_logged(schema: &Schema) -> Schema {
    let report = schema.fold_report();
    tracing::info!(
        passes = report.passes,
        folded = report.folded,
        remaining = report.remaining,
        "folded ALTER TABLE statements"
    );
    for table in report.empty_tables() {
        tracing::warn!(
            "table {} has no columns left after folding; its CREATE TABLE will not parse",
            table
        );
    }
    if report.remaining > 0 {
        tracing::warn!(
            "{} ALTER TABLE statement(s) target tables with no CREATE TABLE",
            report.remaining
        );
    }
    report.schema
}

fn cmd_merge(dir: &Path, output: Option<PathBuf>, vocabulary: &Vocabulary) {
    let scripts = discover_scripts(dir, output.as_deref());
    if scripts.is_empty() {
        eprintln!("No .sql files found under {}", dir.display());
        std::process::exit(1);
    }

    let combined = match concatenate(&scripts) {
        Ok(source) => source,
        Err((path, e)) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };
    tracing::info!(files = scripts.len(), "merging scripts from {}", dir.display());

    let schema = parse_or_exit(&combined, &dir.to_string_lossy(), vocabulary);
    let merged = fold_logged(&schema).to_sql();

    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, format!("{}\n", merged)) {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
            println!(
                "Merged {} files ({} statements) into {}",
                scripts.len(),
                schema.len(),
                path.display()
            );
        }
        None => println!("{}", merged),
    }
}

fn cmd_info(file: &Path, vocabulary: &Vocabulary) {
    let source = read_source(file);
    let schema = parse_or_exit(&source, &file.to_string_lossy(), vocabulary);

    println!("File: {}", file.display());
    println!();

    let mut tables: Vec<&str> = Vec::new();
    for stmt in &schema.body {
        if !tables.contains(&stmt.table_name()) {
            tables.push(stmt.table_name());
        }
    }

    println!("Tables:");
    for table in tables {
        let stmts: Vec<&Statement> = schema
            .body
            .iter()
            .filter(|s| s.table_name() == table)
            .collect();
        let count = |pred: fn(&Statement) -> bool| stmts.iter().filter(|s| pred(s)).count();

        let created = count(|s| matches!(s, Statement::CreateTable(_)));
        let marker = if created > 0 { "○" } else { "●" };
        println!(
            "  {} {} : {} create, {} alter, {} insert, {} update",
            marker,
            table,
            created,
            count(|s| matches!(s, Statement::AlterTable(_))),
            count(|s| matches!(s, Statement::Insert(_))),
            count(|s| matches!(s, Statement::Update(_))),
        );
    }

    println!();
    println!("Legend: ○ = defined, ● = no CREATE TABLE");
}

fn report_parse_error(source: &str, name: &str, error: &ParseError) {
    let span = error.span();
    let name = name.to_string();
    let printed = Report::build(ReportKind::Error, name.clone(), span.start)
        .with_code(error.code())
        .with_message(error.to_string())
        .with_label(
            Label::new((name.clone(), span.start..span.end.max(span.start + 1)))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((name, Source::from(source)));
    if printed.is_err() {
        eprintln!("{}", error);
    }
}
