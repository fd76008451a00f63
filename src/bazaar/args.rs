use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bazaar")]
#[command(about = "Category-driven classifieds engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to BAZAAR_HOME or the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the category tree
    #[command(subcommand, alias = "cat")]
    Category(CategoryCommands),

    /// Submit a listing for moderation
    Submit {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        price: f64,

        /// Top-level category slug
        #[arg(long)]
        category: String,

        /// More specific subcategory slug
        #[arg(long)]
        sub_category: Option<String>,

        #[arg(long)]
        city: String,

        #[arg(long)]
        condition: Option<String>,

        /// Image reference; repeat for multiple
        #[arg(long = "image")]
        images: Vec<String>,

        /// Template field value as key=value; repeat for multiple
        #[arg(long = "spec")]
        specs: Vec<String>,

        #[arg(long)]
        seller: String,

        /// Idempotency nonce; retries with the same nonce return the
        /// original listing
        #[arg(long)]
        nonce: Option<String>,

        #[arg(long)]
        currency: Option<String>,
    },

    /// Approve a pending (or rejected) listing
    Approve { number: u64 },

    /// Reject a pending listing
    Reject { number: u64 },

    /// Suspend an active listing
    Suspend { number: u64 },

    /// Move a listing to the recycle bin
    #[command(alias = "rm")]
    Delete {
        number: u64,

        /// Who is deleting (moderator or seller id)
        #[arg(long, default_value = "admin")]
        actor: String,
    },

    /// Restore a listing from the recycle bin
    Restore { number: u64 },

    /// Permanently remove a soft-deleted listing
    Purge {
        number: u64,

        /// Override the retention window
        #[arg(long)]
        force: bool,
    },

    /// Sweep the recycle bin, removing everything past the retention window
    PurgeExpired,

    /// Promote an active listing
    Promote {
        number: u64,

        /// Package tier (e.g. GOLD, SILVER, BASIC)
        tier: String,

        /// Override the package duration
        #[arg(long)]
        days: Option<i64>,
    },

    /// Remove a promotion early
    Demote { number: u64 },

    /// Price a promotion package
    Quote { tier: String },

    /// Search listings
    #[command(alias = "ls")]
    Search {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        sub_category: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        condition: Option<String>,

        /// Lower bound on posting date
        #[arg(long, value_enum)]
        since: Option<SinceArg>,

        /// Template filter as key=value (comma-separate values for "any
        /// of"); repeat for multiple
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Exact listing number lookup
        #[arg(long)]
        number: Option<u64>,

        /// Free-text search over title and description
        #[arg(short, long)]
        query: Option<String>,

        #[arg(long, value_enum, default_value = "newest")]
        sort: SortArg,
    },

    /// Show one listing in full
    View { number: u64 },

    /// List the moderation queue
    Pending,

    /// List the recycle bin
    Deleted,

    /// Export categories and listings as a tar.gz snapshot
    Export {
        /// Target directory (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Create {
        name: String,
        slug: String,

        /// Parent category slug (omit for a root category)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Update a category
    Update {
        slug: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        new_slug: Option<String>,

        /// Move under a new parent
        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,

        /// Make this a root category
        #[arg(long)]
        root: bool,

        #[arg(long)]
        active: Option<bool>,

        #[arg(long)]
        featured: Option<bool>,
    },

    /// Delete an empty category
    Delete { slug: String },

    /// List root categories
    Roots,

    /// List a category's direct children
    Children { slug: String },

    /// Replace a category's template with fields read from a JSON file
    /// (an empty array clears the template)
    Template {
        slug: String,

        /// Path to a JSON array of field definitions
        file: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SinceArg {
    Today,
    #[value(name = "3d")]
    ThreeDays,
    #[value(name = "7d")]
    SevenDays,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SortArg {
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}
