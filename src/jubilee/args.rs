use clap::{Parser, Subcommand, ValueEnum};
use jubilee::model::Mood;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jubilee")]
#[command(about = "A local-first celebration blog for the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the data directory (defaults to the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish a new post
    #[command(alias = "new")]
    Post {
        /// Post title
        title: String,

        /// Post body
        content: String,

        /// Author display name (defaults to the registered user, else Anonymous)
        #[arg(short, long)]
        author: Option<String>,

        /// Attach a tag (repeatable)
        #[arg(short, long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Mood: happy, excited, grateful, thoughtful or celebratory
        #[arg(short, long)]
        mood: Option<Mood>,
    },

    /// List posts, newest first
    #[command(alias = "ls")]
    List,

    /// Show a post and its comments
    #[command(alias = "v")]
    Show {
        /// Post number from `jubilee list` (1 = newest)
        index: usize,
    },

    /// Comment on a post
    Comment {
        /// Post number from `jubilee list`
        index: usize,

        /// Comment body
        content: String,

        /// Author display name (defaults to the registered user, else Anonymous)
        #[arg(short, long)]
        author: Option<String>,
    },

    /// Like or unlike a post, or one of its comments
    Like {
        /// Post number from `jubilee list`
        index: usize,

        /// Like the Nth comment of the post instead (1 = newest)
        #[arg(short, long, value_name = "N")]
        comment: Option<usize>,
    },

    /// Delete a post and its comments
    #[command(alias = "rm")]
    Delete {
        /// Post number from `jubilee list`
        index: usize,
    },

    /// Register for new-post notifications
    Register {
        /// Your display name
        #[arg(long)]
        name: String,

        /// Where notifications go
        #[arg(long)]
        email: String,

        /// Register without subscribing to notifications
        #[arg(long)]
        no_subscribe: bool,
    },

    /// Turn notification emails on or off
    Subscribe {
        state: SubscribeState,
    },

    /// Print today's quote
    Quote,

    /// Days until the celebration
    Countdown,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SubscribeState {
    On,
    Off,
}
