use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stamp-airdrop")]
#[command(about = "Admin console and bulk airdrop tool for the stamp package", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bulk mint to every address in a file, one transaction per batch
    Airdrop {
        /// Address file (one address per line), overrides the configured path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Simulate every batch instead of executing it
        #[arg(long)]
        dry_run: bool,

        /// Skip the per-batch confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Register a new collection type
    NewCollection {
        /// Fully qualified Move type of the collection
        collection_type: String,
    },

    /// Register a new event
    NewEvent {
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        image_url: String,
    },

    /// Grant manager rights to an address
    AddManager { manager: String },

    /// Revoke manager rights from an address
    RemoveManager { manager: String },

    /// Mint a single stamp
    MintTo {
        recipient: String,

        /// Collection type, defaults to the configured one
        #[arg(long)]
        collection_type: Option<String>,

        /// Event name, defaults to the configured one
        #[arg(long)]
        event: Option<String>,
    },

    /// List registered collections and events
    List,

    /// List stamps of one collection owned by an address
    Stamps {
        owner: String,

        #[arg(long)]
        collection_type: Option<String>,
    },
}
