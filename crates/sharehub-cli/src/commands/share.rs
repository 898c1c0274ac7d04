//! Share management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use sharehub_core::config::AppConfig;
use sharehub_core::error::AppError;
use sharehub_entity::share::{NestedShare, OwnedShare, ShareOutcome, ShareRecord};

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Acting user (owner for owner-side commands, recipient otherwise)
    #[arg(short, long, env = "SHAREHUB_USER")]
    pub user: String,

    /// Share subcommand
    #[command(subcommand)]
    pub command: ShareCommand,
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// Share a file or folder with one or more users
    Create {
        /// Absolute source path, e.g. /alice/files/Docs
        source: String,
        /// Recipient user ids
        #[arg(short, long = "with", value_delimiter = ',')]
        with: Vec<String>,
        /// Grant write permission
        #[arg(long)]
        writeable: bool,
        /// Derive a public link instead of sharing with users
        #[arg(long, conflicts_with = "with")]
        public: bool,
    },
    /// Resolve the real source behind a path
    Resolve {
        /// Absolute target path
        target: String,
    },
    /// Show whether a path is writeable
    Writeable {
        /// Absolute target path
        target: String,
    },
    /// List shares owned by the acting user
    Owned,
    /// List shares nested inside a folder
    Within {
        /// Absolute target folder
        folder: String,
    },
    /// Move a shared item within the acting user's namespace
    MoveTarget {
        /// Current target path
        old: String,
        /// New target path
        new: String,
    },
    /// Record that an owner moved a shared source
    MoveSource {
        /// Current source path
        old: String,
        /// New source path
        new: String,
    },
    /// Change write permission for recipients
    SetWriteable {
        /// Absolute source path
        source: String,
        /// Recipient user ids
        #[arg(short, long = "with", value_delimiter = ',', required = true)]
        with: Vec<String>,
        /// New permission
        #[arg(long, action = clap::ArgAction::Set)]
        writeable: bool,
    },
    /// Move an item out of a shared folder, giving it its own share
    PullOut {
        /// Current target path inside the shared folder
        old: String,
        /// New target path
        new: String,
    },
    /// Stop sharing a source with recipients
    Unshare {
        /// Absolute source path
        source: String,
        /// Recipient user ids
        #[arg(short, long = "with", value_delimiter = ',', required = true)]
        with: Vec<String>,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Remove a share from the acting user's own namespace
    UnshareSelf {
        /// Absolute target path
        target: String,
    },
}

/// Share record display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ShareRow {
    /// Owner
    owner: String,
    /// Recipient
    shared_with: String,
    /// Source path
    source: String,
    /// Target path
    target: String,
    /// Write permission
    writeable: bool,
}

impl From<ShareRecord> for ShareRow {
    fn from(record: ShareRecord) -> Self {
        Self {
            owner: record.owner_id.to_string(),
            shared_with: record.shared_with.to_string(),
            source: record.source,
            target: record.target,
            writeable: record.is_writeable,
        }
    }
}

/// Owned share display row
#[derive(Debug, Serialize, Tabled)]
struct OwnedRow {
    /// Recipient
    shared_with: String,
    /// Source path
    source: String,
    /// Write permission
    writeable: bool,
}

impl From<OwnedShare> for OwnedRow {
    fn from(share: OwnedShare) -> Self {
        Self {
            shared_with: share.shared_with.to_string(),
            source: share.source,
            writeable: share.is_writeable,
        }
    }
}

/// Nested share display row
#[derive(Debug, Serialize, Tabled)]
struct NestedRow {
    /// Owner
    owner: String,
    /// Source path
    source: String,
    /// Target path
    target: String,
}

impl From<NestedShare> for NestedRow {
    fn from(share: NestedShare) -> Self {
        Self {
            owner: share.owner_id.to_string(),
            source: share.source,
            target: share.target,
        }
    }
}

/// Execute share commands
pub async fn execute(
    args: &ShareArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = super::request_context(&args.user)?;
    let resolver = super::create_resolver(config).await?;

    match &args.command {
        ShareCommand::Create {
            source,
            with,
            writeable,
            public,
        } => {
            let recipients = super::parse_users(with)?;
            match resolver
                .create(&ctx, source, &recipients, *writeable, *public)
                .await?
            {
                ShareOutcome::Shared { records } => {
                    let rows: Vec<ShareRow> = records.into_iter().map(ShareRow::from).collect();
                    output::print_list(&rows, format);
                }
                ShareOutcome::PublicLink(link) => match format {
                    OutputFormat::Table => {
                        output::print_kv("Source", &link.source);
                        output::print_kv("Token", &link.token);
                    }
                    OutputFormat::Json => output::print_item(&link, format),
                },
            }
        }
        ShareCommand::Resolve { target } => match resolver.resolve_source(&ctx, target).await? {
            Some(resolved) => match format {
                OutputFormat::Table => {
                    output::print_kv("Owner", resolved.owner_id.as_str());
                    output::print_kv("Source", &resolved.source);
                    output::print_kv("Covered by", &resolved.covering_target);
                    output::print_kv("Writeable", &resolved.is_writeable.to_string());
                    output::print_kv("Inherited", &resolved.inherited.to_string());
                }
                OutputFormat::Json => output::print_item(&resolved, format),
            },
            None => output::print_warning(&format!("'{target}' is not shared with '{}'", ctx.user_id)),
        },
        ShareCommand::Writeable { target } => {
            let writeable = resolver.is_writeable(&ctx, target).await?;
            match format {
                OutputFormat::Table => output::print_kv("Writeable", &writeable.to_string()),
                OutputFormat::Json => output::print_item(&writeable, format),
            }
        }
        ShareCommand::Owned => {
            let rows: Vec<OwnedRow> = resolver
                .list_owned_shares(&ctx)
                .await?
                .into_iter()
                .map(OwnedRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        ShareCommand::Within { folder } => {
            let rows: Vec<NestedRow> = resolver
                .list_within_folder(&ctx, folder)
                .await?
                .into_iter()
                .map(NestedRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        ShareCommand::MoveTarget { old, new } => {
            let affected = resolver.move_target(&ctx, old, new).await?;
            output::print_success(&format!("Moved '{old}' to '{new}' ({affected} records)"));
        }
        ShareCommand::MoveSource { old, new } => {
            let affected = resolver.move_source(&ctx, old, new).await?;
            output::print_success(&format!("Moved source '{old}' to '{new}' ({affected} records)"));
        }
        ShareCommand::SetWriteable {
            source,
            with,
            writeable,
        } => {
            let recipients = super::parse_users(with)?;
            let affected = resolver
                .set_writeable(&ctx, source, &recipients, *writeable)
                .await?;
            output::print_success(&format!(
                "Set writeable={writeable} on '{source}' ({affected} records)"
            ));
        }
        ShareCommand::PullOut { old, new } => {
            let record = resolver.pull_out_of_folder(&ctx, old, new).await?;
            match format {
                OutputFormat::Table => output::print_list(&[ShareRow::from(record)], format),
                OutputFormat::Json => output::print_item(&record, format),
            }
        }
        ShareCommand::Unshare {
            source,
            with,
            force,
        } => {
            let recipients = super::parse_users(with)?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Stop sharing '{source}' with {}?",
                        with.join(", ")
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let removed = resolver.unshare(&ctx, source, &recipients).await?;
            output::print_success(&format!("Removed {removed} share records for '{source}'"));
        }
        ShareCommand::UnshareSelf { target } => {
            let removed = resolver.unshare_from_self(&ctx, target).await?;
            output::print_success(&format!("Removed {removed} share records under '{target}'"));
        }
    }

    Ok(())
}
