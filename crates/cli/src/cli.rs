//! Command-line surface.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use quotedesk_quotations::SortOrder;

#[derive(Debug, Parser)]
#[command(name = "quotedesk")]
#[command(about = "Offline quotation ledger for a single company", version)]
pub struct Cli {
    /// Directory holding the ledger database (overrides QUOTEDESK_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep the ledger in memory; nothing is written to disk
    #[arg(long, global = true, conflicts_with = "data_dir")]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the company profile and start a session
    Register(RegisterArgs),

    /// Show or edit the company profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// End the session and forget the company profile
    Logout,

    /// Create, show, delete or duplicate quotations
    Quote {
        #[command(subcommand)]
        action: QuoteCommand,
    },

    /// List saved quotations
    History(HistoryArgs),

    /// Totals, top clients and recent activity
    Analytics,

    /// Write a JSON backup of the ledger
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Restore a JSON backup
    Import {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Evaluate a keypad sequence, e.g. `quotedesk calc 1 2 + 3 =`
    Calc {
        #[arg(value_name = "KEY", required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub company_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long = "contact")]
    pub contact_number: String,

    /// PNG or JPEG file, at most 2MB
    #[arg(long, value_name = "FILE")]
    pub logo: PathBuf,

    #[arg(long)]
    pub referral_code: String,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    Show,
    Edit(ProfileEditArgs),
}

#[derive(Debug, Args)]
pub struct ProfileEditArgs {
    #[arg(long)]
    pub company_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long = "contact")]
    pub contact_number: Option<String>,

    #[arg(long, value_name = "FILE")]
    pub logo: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum QuoteCommand {
    /// Draft, number and save a new quotation
    New(DraftArgs),

    /// Print a saved quotation
    Show {
        /// Quotation number (QT-1001) or id
        reference: String,
    },

    Delete {
        reference: String,
    },

    /// Start a new quotation from a saved one
    Duplicate {
        reference: String,

        #[command(flatten)]
        draft: DraftArgs,

        /// Drop a copied line by its item id
        #[arg(long = "remove-item", value_name = "ID")]
        remove_items: Vec<String>,
    },
}

/// Draft fields; anything omitted keeps the draft's current value.
#[derive(Debug, Default, Args)]
pub struct DraftArgs {
    #[arg(long = "client")]
    pub client_name: Option<String>,

    #[arg(long = "client-contact")]
    pub client_contact: Option<String>,

    #[arg(long = "client-email")]
    pub client_email: Option<String>,

    /// Line item as DESCRIPTION:QUANTITY:UNIT_PRICE (repeatable)
    #[arg(long = "item", value_name = "SPEC")]
    pub items: Vec<ItemSpec>,

    /// Tax rate in percent
    #[arg(long = "tax", allow_hyphen_values = true)]
    pub tax_percent: Option<f64>,

    /// Discount rate in percent
    #[arg(long = "discount", allow_hyphen_values = true)]
    pub discount_percent: Option<f64>,

    #[arg(long, conflicts_with = "no_terms")]
    pub terms: Option<String>,

    /// Leave terms and conditions off the quotation
    #[arg(long)]
    pub no_terms: bool,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// newest, oldest, highest or lowest
    #[arg(long, default_value = "newest")]
    pub sort: SortOrder,

    /// Case-insensitive match on client name, number or email
    #[arg(long, default_value = "")]
    pub search: String,
}

/// `DESCRIPTION:QUANTITY:UNIT_PRICE`. The description may itself contain
/// colons; the last two fields are always quantity and price.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ItemSpecError {
    #[error("expected DESCRIPTION:QUANTITY:UNIT_PRICE, got `{0}`")]
    Format(String),
    #[error("quantity `{0}` is not a whole number")]
    Quantity(String),
    #[error("unit price `{0}` is not a number")]
    UnitPrice(String),
}

impl FromStr for ItemSpec {
    type Err = ItemSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let (Some(price), Some(quantity), Some(description)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(ItemSpecError::Format(s.to_string()));
        };

        let quantity = quantity
            .trim()
            .parse()
            .map_err(|_| ItemSpecError::Quantity(quantity.to_string()))?;
        let unit_price = price
            .trim()
            .parse()
            .map_err(|_| ItemSpecError::UnitPrice(price.to_string()))?;

        Ok(Self {
            description: description.trim().to_string(),
            quantity,
            unit_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn item_spec_parses_last_two_fields() {
        let spec: ItemSpec = "Cable: 2m, USB-C:3:4.5".parse().unwrap();
        assert_eq!(
            spec,
            ItemSpec {
                description: "Cable: 2m, USB-C".to_string(),
                quantity: 3,
                unit_price: 4.5,
            }
        );
    }

    #[test]
    fn item_spec_errors() {
        assert_eq!(
            "Desk:2".parse::<ItemSpec>(),
            Err(ItemSpecError::Format("Desk:2".to_string()))
        );
        assert!(matches!("Desk:two:5".parse::<ItemSpec>(), Err(ItemSpecError::Quantity(_))));
        assert!(matches!("Desk:2:five".parse::<ItemSpec>(), Err(ItemSpecError::UnitPrice(_))));
    }

    #[test]
    fn parses_quote_new() {
        let cli = Cli::try_parse_from([
            "quotedesk",
            "--memory",
            "quote",
            "new",
            "--client",
            "Jane",
            "--item",
            "Desk:2:50",
            "--item",
            "Chair:4:25",
            "--tax",
            "10",
        ])
        .unwrap();

        assert!(cli.memory);
        let Command::Quote {
            action: QuoteCommand::New(draft),
        } = cli.command
        else {
            panic!("expected quote new");
        };
        assert_eq!(draft.client_name.as_deref(), Some("Jane"));
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.tax_percent, Some(10.0));
        assert_eq!(draft.discount_percent, None);
    }

    #[test]
    fn parses_history_sort() {
        let cli = Cli::try_parse_from(["quotedesk", "history", "--sort", "HIGHEST"]).unwrap();
        let Command::History(args) = cli.command else {
            panic!("expected history");
        };
        assert_eq!(args.sort, SortOrder::Highest);
        assert_eq!(args.search, "");

        assert!(Cli::try_parse_from(["quotedesk", "history", "--sort", "random"]).is_err());
    }

    #[test]
    fn memory_conflicts_with_data_dir() {
        let parsed = Cli::try_parse_from(["quotedesk", "--memory", "--data-dir", "/tmp", "logout"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn calc_accepts_operator_keys() {
        let cli = Cli::try_parse_from(["quotedesk", "calc", "9", "-", "4", "="]).unwrap();
        let Command::Calc { keys } = cli.command else {
            panic!("expected calc");
        };
        assert_eq!(keys, ["9", "-", "4", "="]);
    }
}
