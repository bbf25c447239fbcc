#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{Context, Result};

use crate::client::{HttpServer, Server};
use crate::config::{self, Configuration, load_configuration, lookup_config_path, resolve_path};
use crate::models::Conversation;

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"A Terminal UI to chat with your documents

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/docchat/config.toml
    * $HOME/.config/docchat/config.toml
    * $HOME/.docchat.toml

Without a subcommand the chat UI is started.
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Server base URL, overrides the configuration
    #[arg(short, long, value_name = "URL")]
    server: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,

    #[command(subcommand)]
    action: Option<CliAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliAction {
    /// List the files uploaded to the server
    Files,

    /// Upload a document
    Upload {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Delete an uploaded document
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Print the saved conversations
    History,

    /// Point the server at another LLM endpoint
    SetEndpoint {
        #[arg(value_name = "URL")]
        url: String,
    },
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| lookup_config_path().unwrap_or_default());

        let mut config = if config_path.is_empty() {
            // No config path is specified just use the default config
            Configuration::default()
        } else {
            let path = resolve_path(&config_path)?;
            load_configuration(path.as_str()).wrap_err("loading configuration")?
        };

        if let Some(server) = &self.server {
            config.server.base_url = server.clone();
        }
        Ok(config)
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }

    pub fn action(&self) -> Option<&CliAction> {
        self.action.as_ref()
    }
}

/// Runs a subcommand against the server and writes the result to `out`.
pub async fn run_action<S, W>(server: &S, action: &CliAction, out: &mut W) -> Result<()>
where
    S: Server + ?Sized,
    W: Write,
{
    match action {
        CliAction::Files => {
            let files = server.list_files().await.wrap_err("listing files")?;
            if files.is_empty() {
                writeln!(out, "No files uploaded")?;
            }
            for file in files {
                writeln!(out, "{}", file)?;
            }
        }

        CliAction::Upload { path } => {
            let path = PathBuf::from(resolve_path(path)?);
            let name = server
                .upload_file(&path)
                .await
                .wrap_err(format!("uploading {}", path.display()))?;
            writeln!(out, "Uploaded {}", name)?;
        }

        CliAction::Delete { name } => {
            server
                .delete_file(name)
                .await
                .wrap_err(format!("deleting {}", name))?;
            writeln!(out, "Deleted {}", name)?;
        }

        CliAction::History => {
            let conversations = server
                .get_conversations()
                .await
                .wrap_err("loading conversations")?;
            if conversations.is_empty() {
                writeln!(out, "No conversations found")?;
            }
            for (i, conversation) in conversations.iter().enumerate() {
                write_conversation(out, i, conversation)?;
            }
        }

        CliAction::SetEndpoint { url } => {
            server
                .update_endpoint(url)
                .await
                .wrap_err("updating LLM endpoint")?;
            writeln!(out, "LLM endpoint updated to {}", url)?;
        }
    }
    Ok(())
}

/// Builds the HTTP client from the configuration and runs the subcommand,
/// printing to stdout.
pub async fn run(config: &Configuration, action: &CliAction) -> Result<()> {
    let server = HttpServer::from(config);
    let mut stdout = std::io::stdout().lock();
    run_action(&server, action, &mut stdout).await
}

fn write_conversation<W: Write>(out: &mut W, index: usize, conversation: &Conversation) -> Result<()> {
    writeln!(out, "Conversation {}", index + 1)?;
    for message in conversation.messages() {
        writeln!(out, "  {}: {}", message.role().label(), message.content())?;
    }
    Ok(())
}
