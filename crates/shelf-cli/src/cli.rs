use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use shelf_core::ScriptType;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Keep your shell scripts on a shelf, synced across machines")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List scripts with their local/remote state
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new script
    #[command(alias = "new")]
    Add {
        /// Script name
        name: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// Script kind
        #[arg(long = "type", value_enum, default_value_t = TypeArg::Executable)]
        script_type: TypeArg,
        /// Read content from a file instead of the editor
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Skip installing onto the PATH after creation
        #[arg(long)]
        no_install: bool,
    },
    /// Edit a script in $EDITOR and push the result
    Edit {
        /// Script name
        name: String,
        /// Keep the edit local instead of pushing
        #[arg(long)]
        local: bool,
    },
    /// Delete a script from the server and this machine
    #[command(alias = "rm")]
    Remove {
        /// Script name
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Install a script onto the PATH (pulls it first if needed)
    Install {
        /// Script name
        name: String,
    },
    /// Remove a script from the PATH (keeps the cached copy)
    Uninstall {
        /// Script name
        name: String,
    },
    /// Push local edits to the server
    Push {
        /// Script name (all dirty scripts when omitted)
        name: Option<String>,
    },
    /// Pull scripts from the server
    Pull {
        /// Script name (all scripts when omitted)
        name: Option<String>,
    },
    /// Push local edits, then pull everything else
    Sync,
    /// Run a cached script
    Run {
        /// Script name
        name: String,
        /// Arguments forwarded to the script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print a script body (for `eval "$(shelf source <name>)"`)
    Source {
        /// Script name
        name: String,
    },
    /// Inspect or change client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage server credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set the server URL
    SetUrl {
        /// Server base URL (http:// or https://)
        url: String,
    },
    /// Print the shelf base directory
    Path,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store the API key used for server requests
    SetKey {
        /// API key
        key: String,
    },
    /// Show credential state and server reachability
    Status,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum TypeArg {
    Executable,
    Source,
    Function,
}

impl From<TypeArg> for ScriptType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Executable => Self::Executable,
            TypeArg::Source => Self::Source,
            TypeArg::Function => Self::Function,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
