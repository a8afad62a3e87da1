use clap::{Parser, Subcommand};

/// Command-line interface definition for synthriders-rpc
/// Shows the song you are playing in Synth Riders as Discord Rich Presence
#[derive(Parser)]
#[command(
    name = "synthriders-rpc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Discord Rich Presence for Synth Riders: polls the SongStatus output and updates your activity",
    long_about = None
)]
pub struct Cli {
    /// Override config file path (useful for tests or portable installs)
    #[arg(global = true, long = "config")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration and create the log directory
    Init {
        #[arg(long = "force", help = "Overwrite an existing configuration file")]
        force: bool,
    },

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "migrate",
            help = "Add missing fields with their defaults (a backup is kept)"
        )]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Read the song status once and show what would be sent to Discord
    Status {
        #[arg(long = "json", help = "Print the record and payload as JSON")]
        json: bool,
    },

    /// Look a song up in the SynthDB metadata store
    Lookup {
        /// Song title as shown by the game
        title: String,

        /// Artist as shown by the game
        artist: String,
    },

    /// Compare the installed version with the latest published one
    CheckUpdate,

    /// Watch the game and keep the Discord activity up to date
    Run,
}
