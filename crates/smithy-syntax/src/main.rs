mod db;

use std::process::ExitCode;

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use db::{File, check_file};
use mimalloc::MiMalloc;
use salsa::DatabaseImpl;
use smithy_errors::{Diagnostic, Renderer};
use smithy_parse::ParseOptions;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
struct Options {
    /// Deepest nesting of syntax nodes before the parser gives up on a construct.
    #[arg(long, global = true, default_value_t = ParseOptions::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report every syntax error in a model file.
    Check { path: Utf8PathBuf },
    /// Print the concrete syntax tree of a model file.
    Tree { path: Utf8PathBuf },
    /// Print the narrowest node at a 1-based line and column.
    At { path: Utf8PathBuf, line: u32, column: u32 },
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let options = Options::parse();
    let parse_options = ParseOptions { max_depth: options.max_depth };

    match options.command {
        Command::Check { path } => {
            let db = DatabaseImpl::default();
            let text = read(&path)?;

            let renderer = Renderer::styled();

            let file = File::new(&db, path, text, options.max_depth);
            let diagnostics = check_file::accumulated::<Diagnostic>(&db, file);

            let path = file.path(&db).as_str();
            let text = file.text(&db);

            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic.render(&renderer, path, text));
            }
            tracing::info!(path, errors = diagnostics.len(), "checked");

            Ok(if diagnostics.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Tree { path } => {
            let text = read(&path)?;
            let tree = smithy_parse::parse_with(path.as_str(), &text, &parse_options).into_tree();
            print!("{tree}");

            Ok(if tree.root().has_errors() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Command::At { path, line, column } => {
            let text = read(&path)?;
            let parse = smithy_parse::parse_with(path.as_str(), &text, &parse_options);
            let node = parse.root().find_at(line, column);

            println!("{}:{line}:{column}", parse.filename());
            match node.token() {
                Some(token) => println!("{} {} - {}", token.debug(), node.start(), node.end()),
                None => println!("{:?} {} - {}", node.kind(), node.start(), node.end()),
            }
            println!("{:?}", node.text());
            for ancestor in node.ancestors() {
                println!("  in {:?}", ancestor.kind());
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smithy=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
