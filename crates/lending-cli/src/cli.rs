use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use lending_core::VERSION;

/// Lending - a small lending-library catalog with loans, due dates and late fees
#[derive(Parser)]
#[command(name = "lending")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the ledger file
    #[arg(short, long, global = true, env = "LENDING_PATH")]
    pub ledger: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Log filter (trace, debug, info, warn, error or a tracing directive)
    #[arg(long, global = true, env = "LENDING_LOG", value_name = "FILTER")]
    pub log_level: Option<String>,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the ledger will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Display timezone written to the config (e.g. "Europe/Paris")
    #[arg(long)]
    pub timezone: Option<String>,

    /// Config path override
    #[arg(long)]
    pub config_path: Option<String>,
}

/// Shared output flags for query commands
#[derive(Args, Clone, Default)]
pub struct OutputArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

impl OutputArgs {
    pub fn json_only(json: bool) -> Self {
        Self { json, format: None }
    }
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add an item to the catalog
    Add(ItemAddArgs),

    /// Remove an item from the catalog (must not be checked out)
    Remove(IdArgs),

    /// List catalog items
    List(ItemListArgs),

    /// Show one item
    Show(ShowArgs),
}

/// Arguments for `item add`
#[derive(Args)]
pub struct ItemAddArgs {
    /// Catalog number (e.g. ISBN)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Title (prompted for when omitted)
    #[arg(long)]
    pub title: Option<String>,

    /// Author (prompted for when omitted)
    #[arg(long)]
    pub author: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for `item list`
#[derive(Args)]
pub struct ItemListArgs {
    /// Only items on the shelf
    #[arg(long, conflicts_with = "overdue")]
    pub available: bool,

    /// Only checked-out items past their due date
    #[arg(long)]
    pub overdue: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Subcommand)]
pub enum BorrowerCommands {
    /// Register a borrower
    Add(BorrowerAddArgs),

    /// List borrowers
    List(OutputArgs),

    /// Show one borrower
    Show(ShowArgs),
}

/// Arguments for `borrower add`
#[derive(Args)]
pub struct BorrowerAddArgs {
    /// Borrower identifier
    #[arg(value_name = "ID")]
    pub id: String,

    /// Display name (prompted for when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// A single identifier argument
#[derive(Args)]
pub struct IdArgs {
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for `show` subcommands
#[derive(Args)]
pub struct ShowArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `checkout` command
#[derive(Args)]
pub struct CheckoutArgs {
    /// Item catalog number
    #[arg(value_name = "ITEM")]
    pub item: String,

    /// Borrower identifier
    #[arg(value_name = "BORROWER")]
    pub borrower: String,
}

/// Arguments for the `search` command
#[derive(Args)]
pub struct SearchArgs {
    /// Field to match: title, author or identifier
    #[arg(value_name = "FIELD")]
    pub field: String,

    /// Text to look for
    #[arg(value_name = "TEXT")]
    pub text: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the loan policy
    Show(OutputArgs),

    /// Change the loan policy
    Set(ConfigSetArgs),
}

/// Arguments for `config set`
#[derive(Args)]
pub struct ConfigSetArgs {
    /// Loan duration in days for new checkouts
    #[arg(long, allow_negative_numbers = true)]
    pub loan_days: Option<i64>,

    /// Late fee per day (e.g. 0.5)
    #[arg(long, allow_negative_numbers = true)]
    pub penalty_rate: Option<String>,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a ledger and write the default config
    Init(InitArgs),

    /// Manage catalog items
    #[command(subcommand)]
    Item(ItemCommands),

    /// Manage borrowers
    #[command(subcommand)]
    Borrower(BorrowerCommands),

    /// Check an item out to a borrower
    Checkout(CheckoutArgs),

    /// Return a checked-out item
    Return(IdArgs),

    /// List checked-out items past their due date
    Overdue(OutputArgs),

    /// Search items by title, author or identifier
    Search(SearchArgs),

    /// Show catalog statistics
    Stats(OutputArgs),

    /// Show or change the loan policy
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Check ledger integrity
    Check(OutputArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
