//! Command-line definition.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use fq_core::parse_where;
use fq_model::{FirestorePath, Where};

#[derive(Debug, Parser)]
#[command(name = "fq")]
#[command(version, about = "Firestore query tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Google Cloud project id (falls back to GCLOUD_PROJECT, then GCLOUD_PROJECT_ID)
    #[arg(long, short = 'p', global = true)]
    pub project: Option<String>,

    /// Firestore database id
    #[arg(long, global = true, env = "FIRESTORE_DATABASE")]
    pub database: Option<String>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Timeout in seconds for the whole command
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load documents from a collection, or a single document
    Query(QueryArgs),
    /// Insert or update documents (emulator projects only)
    Set(SetArgs),
    /// Delete documents (emulator projects only)
    Delete(DeleteArgs),
    /// Print a shell completion script
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Collection or document path separated with slashes
    #[arg(long)]
    pub path: FirestorePath,

    /// Filter in the form '<property-path> <operator> <value>'; repeatable
    #[arg(long = "where", short = 'w', value_parser = parse_filter)]
    pub filters: Vec<Where>,

    /// Maximum number of documents (0 = no limit)
    #[arg(long, default_value_t = 0)]
    pub limit: u32,

    /// Field to order by
    #[arg(long = "orderby", default_value = "")]
    pub order_by: String,

    /// Order descending
    #[arg(long)]
    pub desc: bool,

    /// Print the number of matching documents instead of the documents
    #[arg(long)]
    pub count: bool,
}

#[derive(Debug, Args)]
pub struct WriteOptions {
    /// Print progress as documents are written
    #[arg(long)]
    pub progress: bool,

    /// Delay between writes in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay: u64,

    /// Pause Cloud Functions background triggers while writing
    #[arg(long)]
    pub disable_triggers: bool,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Collection or document path separated with slashes
    #[arg(long)]
    pub path: FirestorePath,

    /// JSON input file, '-' for stdin
    #[arg(long, default_value = "-", value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Replace documents instead of merging
    #[arg(long)]
    pub replace: bool,

    #[command(flatten)]
    pub write: WriteOptions,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Collection or document path separated with slashes
    #[arg(long)]
    pub path: FirestorePath,

    /// Filter in the form '<property-path> <operator> <value>'; repeatable
    #[arg(long = "where", short = 'w', value_parser = parse_filter)]
    pub filters: Vec<Where>,

    #[command(flatten)]
    pub write: WriteOptions,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

impl Command {
    /// Write options, for commands that write.
    pub fn write_options(&self) -> Option<&WriteOptions> {
        match self {
            Self::Query(_) | Self::Completions(_) => None,
            Self::Set(args) => Some(&args.write),
            Self::Delete(args) => Some(&args.write),
        }
    }
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut command = Cli::command();
    let name = command.get_name().to_owned();
    clap_complete::generate(shell, &mut command, name, out);
}

fn parse_filter(raw: &str) -> Result<Where, String> {
    parse_where(raw).map_err(|e| format!("failed to parse filter: {e}"))
}

#[cfg(test)]
mod tests {
    use fq_model::Operator;

    use super::*;

    #[test]
    fn test_should_have_valid_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_should_parse_query_with_filters() {
        let cli = Cli::try_parse_from([
            "fq", "query", "-p", "demo-x", "--path", "users", "-w", "age > 30", "--where",
            "name == 'bob'", "--limit", "5", "--orderby", "age", "--desc",
        ])
        .unwrap();
        assert_eq!(cli.project.as_deref(), Some("demo-x"));
        match cli.command {
            Command::Query(args) => {
                assert!(matches!(args.path, FirestorePath::Collection(_)));
                assert_eq!(args.filters.len(), 2);
                assert_eq!(args.filters[0].operator(), Operator::Gt);
                assert_eq!(args.limit, 5);
                assert_eq!(args.order_by, "age");
                assert!(args.desc);
                assert!(!args.count);
            }
            other => panic!("expected query, got {other:?}"),
        }
    }

    #[test]
    fn test_should_reject_invalid_filter() {
        let err = Cli::try_parse_from(["fq", "query", "--path", "users", "-w", "age = 1"])
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to parse filter"), "{err}");
    }

    #[test]
    fn test_should_reject_invalid_path() {
        assert!(Cli::try_parse_from(["fq", "query", "--path", "users//a"]).is_err());
        assert!(Cli::try_parse_from(["fq", "query", "--path", ""]).is_err());
    }

    #[test]
    fn test_should_reject_negative_delay() {
        assert!(
            Cli::try_parse_from(["fq", "set", "--path", "users", "--delay", "-5"]).is_err()
        );
    }

    #[test]
    fn test_should_parse_set_defaults() {
        let cli = Cli::try_parse_from(["fq", "set", "--path", "users/u1"]).unwrap();
        assert_eq!(cli.timeout, 30);
        match &cli.command {
            Command::Set(args) => {
                assert_eq!(args.data, PathBuf::from("-"));
                assert!(!args.replace);
                assert_eq!(args.write.delay, 0);
                assert!(!args.write.disable_triggers);
            }
            other => panic!("expected set, got {other:?}"),
        }
        assert!(cli.command.write_options().is_some());
    }

    #[test]
    fn test_should_parse_completions_without_project() {
        let cli = Cli::try_parse_from(["fq", "completions", "zsh"]).unwrap();
        match &cli.command {
            Command::Completions(args) => assert_eq!(args.shell, Shell::Zsh),
            other => panic!("expected completions, got {other:?}"),
        }
        assert!(cli.command.write_options().is_none());
        assert!(Cli::try_parse_from(["fq", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn test_should_generate_completion_script() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("_fq()"), "{script}");
        assert!(script.contains("--data"));
        assert!(script.contains("--where"));
        assert!(script.contains("completions"));
    }

    #[test]
    fn test_should_hint_data_flag_as_file() {
        let command = Cli::command();
        let set = command.find_subcommand("set").unwrap();
        let data = set
            .get_arguments()
            .find(|arg| arg.get_id() == "data")
            .unwrap();
        assert_eq!(data.get_value_hint(), ValueHint::FilePath);
    }
}
