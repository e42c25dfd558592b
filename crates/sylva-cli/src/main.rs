//! Sylva CLI - decode, render and inspect syntax trees stored as JSON

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use thiserror::Error;
use walkdir::WalkDir;

use sylva_ast::{
    decode, CommentPlacement, DecodeError, Formatter, Node, Program, Style, TraverseOptions,
    Traverser, Visit, VisitAction,
};

#[derive(Parser)]
#[command(name = "sylva")]
#[command(about = "Decode, render and inspect JavaScript syntax trees", long_about = None)]
struct Cli {
    /// Log verbosity. `RUST_LOG` takes precedence when set.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Formatter preset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    #[default]
    Pretty,
    Compact,
    Expanded,
}

impl From<StyleArg> for Style {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Pretty => Style::Pretty,
            StyleArg::Compact => Style::Compact,
            StyleArg::Expanded => Style::Expanded,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a tree back to source text
    Render {
        /// Input file
        file: PathBuf,
        /// Formatter preset
        #[arg(short, long, value_enum, default_value_t = StyleArg::Pretty)]
        style: StyleArg,
        /// JSON file with formatter options applied on top of the preset
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Decode a tree and print its normalized JSON form
    Dump {
        /// Input file
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Print every visited node, indented by depth
    Walk {
        /// Input file
        file: PathBuf,
        /// Visit children before their parent
        #[arg(long)]
        bottom_up: bool,
        /// Also visit leading and trailing comments
        #[arg(long)]
        comments: bool,
    },
    /// Validate tree files; directories are searched for `.json` files
    Check {
        /// Input files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: [{}] {source}", .path.display(), .source.code())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("invalid formatter config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{failed} of {total} files failed")]
    CheckFailed { failed: usize, total: usize },
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Io { .. } => 2,
            _ => 1,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let result = match cli.command {
        Commands::Render {
            file,
            style,
            config,
        } => cmd_render(&file, style, config.as_deref()),
        Commands::Dump { file, pretty } => cmd_dump(&file, pretty),
        Commands::Walk {
            file,
            bottom_up,
            comments,
        } => cmd_walk(&file, bottom_up, comments),
        Commands::Check { paths } => cmd_check(&paths),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let source = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_program(path: &Path) -> Result<Program, CliError> {
    let value = read_json(path)?;
    decode(&value).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn load_formatter(style: StyleArg, config: Option<&Path>) -> Result<Formatter, CliError> {
    let formatter = Style::from(style).formatter();
    let Some(path) = config else {
        return Ok(formatter);
    };
    let overrides = read_json(path)?;
    formatter
        .with_overrides(&overrides)
        .map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
}

fn cmd_render(file: &Path, style: StyleArg, config: Option<&Path>) -> Result<(), CliError> {
    let program = load_program(file)?;
    let formatter = load_formatter(style, config)?;
    println!("{}", program.render(&formatter));
    Ok(())
}

fn cmd_dump(file: &Path, pretty: bool) -> Result<(), CliError> {
    let value = load_program(file)?.serialize();
    if pretty {
        println!("{:#}", value);
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn cmd_walk(file: &Path, bottom_up: bool, comments: bool) -> Result<(), CliError> {
    let program = load_program(file)?;
    let mut options = TraverseOptions::default();
    if bottom_up {
        options = options.bottom_up();
    }
    if comments {
        options = options.with_comments();
    }

    let mut lines = Vec::new();
    Traverser::new(options)
        .add_function(|item, ctx| {
            lines.push(walk_line(item, ctx.depth));
            VisitAction::Continue
        })
        .traverse(&program);

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn walk_line(item: Visit<'_>, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    match item {
        Visit::Node(node) => match node.location().start {
            Some(start) => format!("{}{} @{}:{}", indent, node.kind(), start.line, start.column),
            None => format!("{}{}", indent, node.kind()),
        },
        Visit::Comment { comment, placement } => {
            let side = match placement {
                CommentPlacement::Leading => "leading",
                CommentPlacement::Trailing => "trailing",
            };
            format!("{}{} {}", indent, side, comment.raw_text().replace('\n', "\\n"))
        }
    }
}

fn cmd_check(paths: &[PathBuf]) -> Result<(), CliError> {
    let files = collect_json_files(paths);
    let mut failed = 0;

    for file in &files {
        match load_program(file) {
            Ok(program) => {
                let incomplete = count_incomplete_locations(&program);
                if incomplete > 0 {
                    tracing::warn!(
                        file = %file.display(),
                        incomplete,
                        "nodes with a partially set location"
                    );
                }
                println!("{}: ok", file.display());
            }
            Err(e) => {
                eprintln!("{}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::CheckFailed {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

/// Expand directories into the `.json` files below them, sorted by name
fn collect_json_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        {
            files.push(entry.into_path());
        }
    }
    files
}

/// Nodes with exactly one location bound set. Fully unset locations are
/// normal for synthesized nodes.
fn count_incomplete_locations(program: &Program) -> usize {
    let mut count = 0;
    Traverser::new(TraverseOptions::default())
        .add_function(|item, _| {
            if let Some(node) = item.as_node() {
                let location = node.location();
                if location.start.is_some() != location.end.is_some() {
                    count += 1;
                }
            }
            VisitAction::Continue
        })
        .traverse(program);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PROGRAM: &str = r#"{
        "type": "Program",
        "body": [{
            "type": "ExpressionStatement",
            "location": {"start": {"line": 1, "column": 0, "offset": 0}, "end": null},
            "expression": {"type": "Identifier", "name": "x"}
        }]
    }"#;

    #[test]
    fn test_cli_parses_render_options() {
        let cli = Cli::try_parse_from(["sylva", "render", "a.json", "--style", "compact"]).unwrap();
        match cli.command {
            Commands::Render { style, config, .. } => {
                assert_eq!(style, StyleArg::Compact);
                assert!(config.is_none());
            }
            _ => panic!("expected render"),
        }
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_check_requires_a_path() {
        assert!(Cli::try_parse_from(["sylva", "check"]).is_err());
    }

    #[test]
    fn test_collect_json_files_walks_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.json"), PROGRAM).unwrap();
        fs::write(dir.path().join("nested").join("a.json"), PROGRAM).unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();

        let files = collect_json_files(&[dir.path().to_path_buf()]);
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["b.json", "a.json"]);
    }

    #[test]
    fn test_check_reports_failures() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("good.json"), PROGRAM).unwrap();
        fs::write(dir.path().join("bad.json"), r#"{"type": "Identifier", "name": "x"}"#).unwrap();

        let err = cmd_check(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, CliError::CheckFailed { failed: 1, total: 2 }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_decode_error_message_includes_code() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"type": "Program", "body": [{"type": "Literal", "value": 1}]}"#).unwrap();

        let err = load_program(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("[E-TYPE-003]"), "{}", message);
        assert!(message.ends_with("array of Literal given"), "{}", message);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_program(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_config_overrides_preset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("format.json");
        fs::write(&path, r#"{"indentation": "\t"}"#).unwrap();
        let formatter = load_formatter(StyleArg::Expanded, Some(&path)).unwrap();
        assert_eq!(formatter.indentation, "\t");
        assert!(formatter.new_line_before_curly_bracket);

        fs::write(&path, r#"{"newLine": 3}"#).unwrap();
        assert!(matches!(
            load_formatter(StyleArg::Pretty, Some(&path)),
            Err(CliError::Config { .. })
        ));
    }

    #[test]
    fn test_incomplete_locations_are_counted() {
        let program = decode(&serde_json::from_str(PROGRAM).unwrap()).unwrap();
        assert_eq!(count_incomplete_locations(&program), 1);
    }

    #[test]
    fn test_walk_line_format() {
        let program = decode(&serde_json::from_str(PROGRAM).unwrap()).unwrap();
        let statement = program.body[0].as_node();
        assert_eq!(walk_line(Visit::Node(statement), 1), "  ExpressionStatement @1:0");
    }
}
