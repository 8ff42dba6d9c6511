use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cmis",
    about = "Browse a document store through its CMIS repository view",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON store fixture (spaces and documents); required by every command
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// TOML repository configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show repository information and capabilities
    Info,
    /// Show the type hierarchy
    Types(TypesArgs),
    /// Show one type definition
    Type(TypeArgs),
    /// List the children of a folder
    Children(ChildrenArgs),
    /// Show an object's properties
    Object(ObjectArgs),
    /// Show the object at a path
    Path(PathArgs),
    /// Show the folder tree below a folder
    Tree(TreeArgs),
    /// Write a document's content to stdout
    Content(ContentArgs),
}

#[derive(Args)]
pub struct TypesArgs {
    /// Start below this type instead of the type root
    #[arg(long)]
    pub type_id: Option<String>,
    /// Levels to show; -1 for all
    #[arg(long, allow_negative_numbers = true)]
    pub depth: Option<i64>,
}

#[derive(Args)]
pub struct TypeArgs {
    pub type_id: String,
}

#[derive(Args)]
pub struct ChildrenArgs {
    /// Folder id, or @root@
    pub folder: String,
    /// Comma-separated property ids
    #[arg(long)]
    pub filter: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub max_items: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub skip_count: Option<i64>,
    /// Include each child's path segment
    #[arg(long)]
    pub path_segments: bool,
}

#[derive(Args)]
pub struct ObjectArgs {
    pub id: String,
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct PathArgs {
    pub path: String,
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct TreeArgs {
    pub folder: String,
    /// Levels to show; -1 for all
    #[arg(long, allow_negative_numbers = true)]
    pub depth: Option<i64>,
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct ContentArgs {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_info() {
        let cli = Cli::try_parse_from(["cmis", "--fixture", "store.json", "info"]).unwrap();
        assert!(matches!(cli.command, Command::Info));
        assert_eq!(cli.fixture, Some(PathBuf::from("store.json")));
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_global_after_subcommand() {
        let cli = Cli::try_parse_from(["cmis", "info", "--fixture", "a.json", "--config", "c.toml"])
            .unwrap();
        assert_eq!(cli.fixture, Some(PathBuf::from("a.json")));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn parse_types_unbounded() {
        let cli = Cli::try_parse_from(["cmis", "types", "--depth", "-1", "--type-id", "cmis:document"])
            .unwrap();
        if let Command::Types(args) = cli.command {
            assert_eq!(args.depth, Some(-1));
            assert_eq!(args.type_id.as_deref(), Some("cmis:document"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_children_paging() {
        let cli = Cli::try_parse_from([
            "cmis", "children", "S1", "--max-items", "10", "--skip-count", "2", "--path-segments",
            "--filter", "cmis:name",
        ])
        .unwrap();
        if let Command::Children(args) = cli.command {
            assert_eq!(args.folder, "S1");
            assert_eq!(args.max_items, Some(10));
            assert_eq!(args.skip_count, Some(2));
            assert!(args.path_segments);
            assert_eq!(args.filter.as_deref(), Some("cmis:name"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_tree() {
        let cli = Cli::try_parse_from(["cmis", "tree", "@root@", "--depth", "3"]).unwrap();
        if let Command::Tree(args) = cli.command {
            assert_eq!(args.folder, "@root@");
            assert_eq!(args.depth, Some(3));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_path_and_content() {
        let cli = Cli::try_parse_from(["cmis", "path", "/reports"]).unwrap();
        assert!(matches!(cli.command, Command::Path(ref a) if a.path == "/reports"));
        let cli = Cli::try_parse_from(["cmis", "content", "D5"]).unwrap();
        assert!(matches!(cli.command, Command::Content(ref a) if a.id == "D5"));
    }

    #[test]
    fn missing_positional_rejected() {
        assert!(Cli::try_parse_from(["cmis", "object"]).is_err());
        assert!(Cli::try_parse_from(["cmis", "type"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["cmis", "--verbose", "info"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["cmis", "--format", "json", "info"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
