//! Line-oriented command shell over a [`ProductsController`].
//!
//! Each input line is split into words and parsed by clap as one
//! subcommand of [`ReplCli`]; `execute` applies it to the controller and
//! tells the caller what to do next (keep reading, rebuild, or quit).

use core::fmt;
use core::str::FromStr;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use prodboard_auth::LocalStorage;
use prodboard_core::ProductId;
use prodboard_products::{CreateProductDto, SortCriterion};

use crate::api::ProductsApi;
use crate::capabilities::{Confirm, Navigator};
use crate::controller::ProductsController;

/// Route of the dashboard page itself.
pub const DASHBOARD_ROUTE: &str = "/products";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// Usage errors, and `help` output, rendered by clap.
    #[error("{0}")]
    Usage(#[from] clap::Error),
}

/// Grammar of one shell line.
#[derive(Parser, Debug)]
#[command(name = "prodboard", disable_version_flag = true)]
pub struct ReplCli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Filter by name, sku or category (no term clears the filter).
    Search {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        term: Vec<String>,
    },

    /// Order the grid: newest, oldest, name-asc, name-desc, price-asc, price-desc.
    Sort { criterion: SortCriterion },

    /// Jump to a 1-based page.
    Page { page: usize },

    /// Open the create form.
    New,

    /// Open the edit form for a product.
    Edit { id: ProductId },

    /// Submit the open form; unset fields keep their current values.
    Save(SaveForm),

    /// Close the form.
    Cancel,

    /// Delete a product (asks first).
    Delete { id: ProductId },

    /// Refetch everything.
    Reload,

    /// Sign out.
    Logout,

    /// Sign in.
    Login,

    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

/// Fields of the product form.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveForm {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub sku: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Decimal amount, e.g. 12.50.
    #[arg(long, value_parser = parse_price)]
    pub price: Option<u64>,

    /// ISO 4217 code.
    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub stock: Option<u32>,

    #[arg(long)]
    pub category: Option<String>,
}

impl SaveForm {
    /// Overwrite the fields that were given.
    pub fn apply(self, dto: &mut CreateProductDto) {
        if let Some(name) = self.name {
            dto.name = name;
        }
        if let Some(sku) = self.sku {
            dto.sku = sku;
        }
        if let Some(description) = self.description {
            dto.description = description;
        }
        if let Some(price) = self.price {
            dto.price = price;
        }
        if let Some(currency) = self.currency {
            dto.currency = currency.to_ascii_uppercase();
        }
        if let Some(stock) = self.stock {
            dto.stock = stock;
        }
        if let Some(category) = self.category {
            dto.category = category;
        }
    }
}

/// `"12"`, `"12.5"` and `"12.50"` to minor units (1200, 1250, 1250).
pub fn parse_price(raw: &str) -> Result<u64, String> {
    let invalid = || format!("invalid price {raw:?} (expected e.g. 12 or 12.50)");
    let trimmed = raw.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || fraction.len() > 2 || !digits(whole) || !digits(fraction) {
        return Err(invalid());
    }

    let whole: u64 = whole.parse().map_err(|_| invalid())?;
    let cents: u64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };
    whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(invalid)
}

/// Split a line into words; double quotes group words, including inside `--name="a b"`.
pub fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = split_words(line)?;
        let cli = ReplCli::try_parse_from(std::iter::once("prodboard".to_string()).chain(words))?;
        Ok(cli.command)
    }
}

/// Where the shell currently is, which limits the accepted commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellContext {
    /// Route `/`: signed out.
    LoginPage,
    /// The dashboard rendered its terminal error.
    ErrorScreen,
    Dashboard,
}

impl Command {
    pub fn allowed_in(&self, context: ShellContext) -> bool {
        match context {
            ShellContext::LoginPage => matches!(self, Command::Login | Command::Quit),
            ShellContext::ErrorScreen => matches!(self, Command::Reload | Command::Quit),
            ShellContext::Dashboard => !matches!(self, Command::Login),
        }
    }
}

/// What the shell loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Redraw the screen.
    Continue,
    /// Print the message, then redraw.
    Notice(String),
    /// Rebuild the controller and mount again.
    Reload,
    Quit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Continue => Ok(()),
            Outcome::Notice(message) => write!(f, "{message}"),
            Outcome::Reload => write!(f, "reloading..."),
            Outcome::Quit => write!(f, "bye"),
        }
    }
}

pub async fn execute<A, S, C, N>(
    controller: &mut ProductsController<A, S, C, N>,
    command: Command,
) -> Outcome
where
    A: ProductsApi,
    S: LocalStorage,
    C: Confirm,
    N: Navigator,
{
    match command {
        Command::Search { term } => controller.search(term.join(" ")),
        Command::Sort { criterion } => controller.sort(criterion),
        Command::Page { page } => controller.change_page(page),
        Command::New => controller.open_create(),
        Command::Edit { id } => match controller.store().find(id).cloned() {
            Some(product) => controller.edit(product),
            None => return Outcome::Notice(format!("no product with id {id}")),
        },
        Command::Save(form) => {
            let Some(modal) = controller.modal_view() else {
                return Outcome::Notice("nothing to save: use `new` or `edit <id>` first".to_string());
            };
            let mut dto = modal
                .initial_values()
                .unwrap_or_else(|| CreateProductDto::new("", "", 0));
            form.apply(&mut dto);
            controller.save(dto).await;
            controller.close_modal();
        }
        Command::Cancel => controller.close_modal(),
        Command::Delete { id } => controller.delete(id).await,
        Command::Reload => return Outcome::Reload,
        Command::Logout => {
            if let Err(err) = controller.logout().await {
                return Outcome::Notice(err.to_string());
            }
        }
        Command::Login => {
            if let Err(err) = controller.auth_mut().sign_in().await {
                tracing::error!("login failed: {err:?}");
                return Outcome::Notice(format!("login failed: {err}"));
            }
            controller.navigator_mut().navigate(DASHBOARD_ROUTE);
        }
        Command::Quit => return Outcome::Quit,
    }
    Outcome::Continue
}
