//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for bedrock-relay
#[derive(Parser, Debug)]
#[command(name = "bedrock-relay")]
#[command(author, version, about = "Stream Bedrock answers to WebSocket listeners")]
#[command(long_about = r#"
bedrock-relay runs prompts through Amazon Bedrock and either streams the
answer fragment by fragment to a WebSocket listener or returns it whole.

`handle` processes one gateway event (connect/disconnect, prompt library,
REST or async inference) and prints the response envelope. The other
commands drive the same dispatcher directly.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./relay.toml        Project-level config
3. ~/.config/bedrock-relay/config.toml   Global config

Example:
  bedrock-relay handle --event connect.json
  bedrock-relay ask "Summarize the coverage rules" --knowledge-base KB123
  bedrock-relay prompts list --scope healthcare
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Handle one trigger event read from a file or stdin
    Handle {
        /// Event JSON file (reads stdin when omitted)
        #[arg(long, value_name = "PATH")]
        event: Option<PathBuf>,
    },

    /// Run one prompt and print the full answer
    Ask {
        /// The question to send
        prompt: String,

        /// Template with {context} and {question} placeholders
        #[arg(long)]
        template: Option<String>,

        /// Knowledge base to pull context from
        #[arg(long, value_name = "ID")]
        knowledge_base: Option<String>,

        /// Key of an uploaded PDF in the document bucket
        #[arg(long, value_name = "KEY")]
        document_key: Option<String>,

        /// Stream fragments to this WebSocket connection
        #[arg(long, value_name = "ID", requires = "address")]
        connection_id: Option<String>,

        /// WebSocket API domain of the listener
        #[arg(long, value_name = "DOMAIN", requires = "connection_id")]
        address: Option<String>,
    },

    /// Manage saved prompts
    Prompts {
        #[command(subcommand)]
        action: PromptsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum PromptsAction {
    /// List the prompts saved under a scope
    List {
        #[arg(long)]
        scope: String,
    },

    /// Save a prompt, replacing any with the same scope and title
    Save {
        #[arg(long)]
        scope: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        prompt: String,

        #[arg(long)]
        template: Option<String>,
    },
}
