use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "azy", version, about = "Azy IA command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Run a message through the policy filter only.
    Check {
        message: String,
    },

    /// Send one message through the full pipeline using the environment config.
    Ask {
        message: String,

        /// chat, image, video, tts or edit.
        #[arg(long, default_value = "chat")]
        action: String,

        /// Language hint (pt, es, en) or "auto".
        #[arg(long, default_value = "auto")]
        language: String,
    },
}
