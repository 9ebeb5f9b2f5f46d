//! # Interactive Shell
//!
//! Line-oriented front end over the command functions.
//!
//! ## Line Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stockroom> add "Orange juice, 1L" juice 24 12.50 --min-stock 12       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  split_line  (whitespace, '...' and "..." quoting)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ShellLine::try_parse_from  (clap, no binary name)                     │
//! │       │                                                                 │
//! │       ├── parse error ────────────────► clap's message                 │
//! │       ▼                                                                 │
//! │  Shell::dispatch                                                       │
//! │       ├── login / signup / help / quit   no session needed             │
//! │       └── everything else                SessionState::require()       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rendered text  |  error[CODE]: message                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An error never ends the loop; only `quit`/`exit` or end of input does.

use clap::{CommandFactory, Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::commands::report::{AnalyticsReport, ExportFormat};
use crate::commands::{auth, inventory, report, sale};
use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};
use stockroom_core::{export, Category, InventoryItem, Money, NewItem, SaleHistoryRow, DEFAULT_MIN_STOCK};
use stockroom_db::Database;

// =============================================================================
// Command Grammar
// =============================================================================

/// One parsed shell line.
#[derive(Debug, Parser)]
#[command(
    name = "stockroom",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Commands accepted at the prompt.
#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// Sign in
    Login { username: String, password: String },

    /// Create an account
    Signup {
        username: String,
        password: String,
        /// Repeat the password
        confirmation: String,
    },

    /// Sign out
    Logout,

    /// List every item
    Items,

    /// Show one item
    Show { id: i64 },

    /// Add an item
    #[command(allow_negative_numbers = true)]
    Add {
        name: String,
        /// protein, perishables, juice, spices, groceries or other
        category: Category,
        quantity: i64,
        /// Unit price, e.g. 500 or 499.99
        price: Money,
        /// Low-stock threshold
        #[arg(long, default_value_t = DEFAULT_MIN_STOCK)]
        min_stock: i64,
    },

    /// Replace an item's fields
    #[command(allow_negative_numbers = true)]
    Update {
        id: i64,
        name: String,
        category: Category,
        quantity: i64,
        price: Money,
        /// Low-stock threshold (unchanged if omitted)
        #[arg(long)]
        min_stock: Option<i64>,
    },

    /// Delete an item that has never been sold
    Delete { id: i64 },

    /// List items below their threshold
    LowStock,

    /// Record a sale; the price defaults to the item's unit price
    #[command(allow_negative_numbers = true)]
    Sell {
        id: i64,
        quantity: i64,
        price: Option<Money>,
    },

    /// Show the sales history
    Sales,

    /// Show stock, value and revenue breakdowns
    Analytics,

    /// Write the inventory to a file
    Export {
        path: PathBuf,
        /// Defaults to the file extension, then text
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Show this help
    Help,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// What the loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text (if any) and read the next line.
    Continue(String),
    /// Stop reading.
    Quit,
}

/// Splits a line into words, honouring single and double quotes.
pub fn split_line(line: &str) -> Result<Vec<String>, ApiError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ApiError::validation("Unterminated quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

// =============================================================================
// Shell
// =============================================================================

/// Shell state: the database, read-only config and the current session.
pub struct Shell {
    db: Database,
    config: ConfigState,
    session: SessionState,
}

impl Shell {
    pub fn new(db: Database, config: ConfigState) -> Self {
        Shell {
            db,
            config,
            session: SessionState::new(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    fn prompt(&self) -> String {
        match self.session.current() {
            Some(session) => format!("{}> ", session.username),
            None => "stockroom> ".to_string(),
        }
    }

    /// Reads lines from `input` until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let banner = format!(
            "{} inventory. Type 'help' for commands.\n",
            self.config.store.name
        );
        output.write_all(banner.as_bytes()).await?;

        let mut lines = input.lines();
        loop {
            output.write_all(self.prompt().as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                debug!("End of input");
                break;
            };

            match self.execute(&line).await {
                Outcome::Continue(text) if text.is_empty() => {}
                Outcome::Continue(text) => {
                    output.write_all(text.as_bytes()).await?;
                    if !text.ends_with('\n') {
                        output.write_all(b"\n").await?;
                    }
                }
                Outcome::Quit => break,
            }
        }

        output.flush().await?;
        Ok(())
    }

    /// Executes one line and returns what to print.
    pub async fn execute(&mut self, line: &str) -> Outcome {
        let words = match split_line(line) {
            Ok(words) if words.is_empty() => return Outcome::Continue(String::new()),
            Ok(words) => words,
            Err(e) => return Outcome::Continue(e.to_string()),
        };

        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(e) => return Outcome::Continue(e.render().to_string().trim_end().to_string()),
        };

        match self.dispatch(parsed.command).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Continue(e.to_string()),
        }
    }

    async fn dispatch(&mut self, command: ShellCommand) -> Result<Outcome, ApiError> {
        let text = match command {
            ShellCommand::Quit => return Ok(Outcome::Quit),
            ShellCommand::Help => ShellLine::command().render_help().to_string(),
            ShellCommand::Login { username, password } => {
                match auth::sign_in(&self.db, &username, &password).await? {
                    Some(session) => {
                        let text = format!("Signed in as {}.", session.username);
                        self.session.sign_in(session);
                        text
                    }
                    None => return Err(ApiError::unauthenticated("Invalid username or password")),
                }
            }
            ShellCommand::Signup {
                username,
                password,
                confirmation,
            } => {
                let user = auth::create_user(&self.db, &username, &password, &confirmation).await?;
                format!("Account '{}' created. You can now log in.", user.username)
            }
            command => self.dispatch_signed_in(command).await?,
        };

        Ok(Outcome::Continue(text))
    }

    async fn dispatch_signed_in(&mut self, command: ShellCommand) -> Result<String, ApiError> {
        let session = self.session.require()?.clone();
        let db = &self.db;

        let text = match command {
            ShellCommand::Logout => {
                self.session.sign_out();
                info!(username = %session.username, "Signed out");
                format!("Signed out {}.", session.username)
            }
            ShellCommand::Items => render_items(&inventory::list_items(db, &session).await?),
            ShellCommand::Show { id } => {
                let item = inventory::get_item(db, &session, id).await?;
                self.render_item(&item)
            }
            ShellCommand::Add {
                name,
                category,
                quantity,
                price,
                min_stock,
            } => {
                let new = NewItem::new(name, category, quantity, price).with_min_stock(min_stock);
                let item = inventory::add_item(db, &session, new).await?;
                format!("Added item #{}: {}", item.id, item.item)
            }
            ShellCommand::Update {
                id,
                name,
                category,
                quantity,
                price,
                min_stock,
            } => {
                let min_stock = match min_stock {
                    Some(min_stock) => min_stock,
                    None => inventory::get_item(db, &session, id).await?.min_stock,
                };
                let new = NewItem::new(name, category, quantity, price).with_min_stock(min_stock);
                let item = inventory::update_item(db, &session, id, new).await?;
                format!("Updated item #{}: {}", item.id, item.item)
            }
            ShellCommand::Delete { id } => {
                inventory::delete_item(db, &session, id).await?;
                format!("Deleted item #{}.", id)
            }
            ShellCommand::LowStock => {
                let low = inventory::low_stock_items(db, &session).await?;
                if low.is_empty() {
                    "Every item is at or above its threshold.".to_string()
                } else {
                    render_items(&low)
                }
            }
            ShellCommand::Sell {
                id,
                quantity,
                price,
            } => {
                let item = inventory::get_item(db, &session, id).await?;
                let price = price.unwrap_or_else(|| item.price());
                let recorded = sale::record_sale(db, &session, id, quantity, price).await?;
                format!(
                    "Recorded sale #{}: {} x {} at {} = {}",
                    recorded.id,
                    recorded.quantity,
                    item.item,
                    self.config.format_currency(recorded.sale_price()),
                    self.config.format_currency(recorded.line_total()),
                )
            }
            ShellCommand::Sales => self.render_sales(&sale::list_sales(db, &session).await?),
            ShellCommand::Analytics => self.render_report(&report::analytics(db, &session).await?),
            ShellCommand::Export { path, format } => {
                let format = format
                    .or_else(|| ExportFormat::from_path(&path))
                    .unwrap_or_default();
                let rows = report::export_inventory(db, &session, format, &path).await?;
                format!("Exported {} items to {}.", rows, path.display())
            }
            ShellCommand::Quit
            | ShellCommand::Help
            | ShellCommand::Login { .. }
            | ShellCommand::Signup { .. } => {
                return Err(ApiError::internal("command dispatched twice"));
            }
        };

        Ok(text)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn render_item(&self, item: &InventoryItem) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "#{} {}", item.id, item.item);
        let _ = writeln!(out, "  category:  {}", item.category);
        let _ = writeln!(out, "  quantity:  {}", item.quantity);
        let _ = writeln!(out, "  price:     {}", self.config.format_currency(item.price()));
        let _ = writeln!(out, "  min stock: {}", item.min_stock);
        let _ = write!(out, "  value:     {}", self.config.format_currency(item.total_value()));
        if item.is_low_stock() {
            out.push_str("\n  LOW STOCK");
        }
        out
    }

    fn render_sales(&self, sales: &[SaleHistoryRow]) -> String {
        if sales.is_empty() {
            return "No sales recorded.".to_string();
        }

        let mut out = String::new();
        for row in sales {
            let _ = writeln!(
                out,
                "#{:<4} {}  {} x {} at {} = {}",
                row.sale_id,
                row.sale_date.format("%Y-%m-%d %H:%M:%S"),
                row.quantity,
                row.item_name,
                self.config.format_currency(row.sale_price()),
                self.config.format_currency(row.line_total()),
            );
        }
        out
    }

    fn render_report(&self, report: &AnalyticsReport) -> String {
        let money = |amount: Money| self.config.format_currency(amount);
        let summary = &report.summary;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} items, {} units, stock value {}, {} low on stock",
            summary.item_count,
            summary.unit_count,
            money(summary.total_value),
            summary.low_stock_count
        );

        out.push_str("\nStock by category\n");
        for (category, units) in &report.stock_by_category {
            let value = report
                .value_by_category
                .get(category)
                .copied()
                .unwrap_or_default();
            let _ = writeln!(out, "  {:<16} {:>8}  {}", category.label(), units, money(value));
        }

        out.push_str("\nPrice distribution\n");
        for (price, count) in &report.price_distribution {
            let _ = writeln!(out, "  {:>14}  {}", money(*price), count);
        }

        out.push_str("\nDaily revenue\n");
        if report.daily_revenue.is_empty() {
            out.push_str("  no sales yet\n");
        }
        for (day, revenue) in &report.daily_revenue {
            let _ = writeln!(out, "  {}  {}", day, money(*revenue));
        }
        out
    }
}

fn render_items(items: &[InventoryItem]) -> String {
    if items.is_empty() {
        return "No items.".to_string();
    }
    export::to_text(&export::snapshot(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_db::DbConfig;

    async fn shell() -> Shell {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ConfigState::default();
        auth::bootstrap_admin(&db, &config).await.unwrap();
        Shell::new(db, config)
    }

    async fn signed_in() -> Shell {
        let mut shell = shell().await;
        shell.execute("login admin admin123").await;
        assert!(shell.session().current().is_some());
        shell
    }

    fn text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Continue(text) => text,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_split_line_quotes() {
        assert_eq!(
            split_line(r#"add "Orange juice, 1L" juice 24 12.50"#).unwrap(),
            vec!["add", "Orange juice, 1L", "juice", "24", "12.50"]
        );
        assert_eq!(split_line("  a   'b c'  ").unwrap(), vec!["a", "b c"]);
        assert_eq!(split_line(r#"say """#).unwrap(), vec!["say", ""]);
        assert!(split_line("   ").unwrap().is_empty());
        assert!(split_line("add \"Rice").is_err());
    }

    #[tokio::test]
    async fn test_commands_require_session() {
        let mut shell = shell().await;
        let out = text(shell.execute("items").await);
        assert!(out.starts_with("error[UNAUTHENTICATED]"));
    }

    #[tokio::test]
    async fn test_bad_login_is_rejected() {
        let mut shell = shell().await;
        let out = text(shell.execute("login admin wrong-password").await);
        assert_eq!(out, "error[UNAUTHENTICATED]: Invalid username or password");
        assert!(shell.session().current().is_none());
    }

    #[tokio::test]
    async fn test_add_sell_and_list() {
        let mut shell = signed_in().await;

        let out = text(shell.execute("add Rice groceries 10 500").await);
        assert_eq!(out, "Added item #1: Rice");

        let out = text(shell.execute("sell 1 3 480").await);
        assert_eq!(out, "Recorded sale #1: 3 x Rice at ₦480.00 = ₦1440.00");

        let out = text(shell.execute("sell 1 2").await);
        assert!(out.ends_with("at ₦500.00 = ₦1000.00"));

        let out = text(shell.execute("items").await);
        assert!(out.contains("Rice"));
        assert!(out.lines().nth(1).unwrap().contains("  5  "));

        let out = text(shell.execute("sales").await);
        assert_eq!(out.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_errors_render_with_code() {
        let mut shell = signed_in().await;
        shell.execute("add Rice groceries 2 500").await;

        let out = text(shell.execute("sell 1 5").await);
        assert!(out.starts_with("error[INSUFFICIENT_STOCK]"));

        let out = text(shell.execute("add Beans groceries -1 500").await);
        assert!(out.starts_with("error[VALIDATION_ERROR]"));

        let out = text(shell.execute("delete 99").await);
        assert!(out.starts_with("error[NOT_FOUND]"));

        let out = text(shell.execute("add Beans cereal 1 500").await);
        assert!(out.contains("category"));
    }

    #[tokio::test]
    async fn test_oversized_quantity_is_rejected_and_shell_keeps_working() {
        let mut shell = signed_in().await;

        let out = text(shell.execute("add Sand other 100000000000000000 1000").await);
        assert_eq!(out, "error[VALIDATION_ERROR]: quantity must be at most 1000000000");

        let out = text(shell.execute("add Sand other 1000000000 10000000").await);
        assert_eq!(out, "Added item #1: Sand");

        let out = text(shell.execute("sell 1 1 10000000.01").await);
        assert!(out.starts_with("error[VALIDATION_ERROR]: sale price must be at most"));

        assert!(text(shell.execute("items").await).contains("Sand"));
        assert!(text(shell.execute("analytics").await).starts_with("1 items, 1000000000 units"));
    }

    #[tokio::test]
    async fn test_update_keeps_threshold_when_omitted() {
        let mut shell = signed_in().await;
        shell.execute("add Rice groceries 10 500 --min-stock 8").await;

        let out = text(shell.execute("update 1 \"Ofada Rice\" groceries 6 650").await);
        assert_eq!(out, "Updated item #1: Ofada Rice");

        let out = text(shell.execute("low-stock").await);
        assert!(out.contains("Ofada Rice"));
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let mut shell = signed_in().await;
        let out = text(shell.execute("logout").await);
        assert_eq!(out, "Signed out admin.");
        assert!(text(shell.execute("items").await).starts_with("error[UNAUTHENTICATED]"));
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let mut shell = shell().await;
        let out = text(shell.execute("signup chidi 'pass word 1' 'pass word 1'").await);
        assert_eq!(out, "Account 'chidi' created. You can now log in.");

        let out = text(shell.execute("signup chidi another-pw another-pw").await);
        assert!(out.starts_with("error[CONFLICT]"));

        let out = text(shell.execute("login chidi 'pass word 1'").await);
        assert_eq!(out, "Signed in as chidi.");
    }

    #[tokio::test]
    async fn test_quit_and_exit() {
        let mut shell = shell().await;
        assert_eq!(shell.execute("quit").await, Outcome::Quit);
        assert_eq!(shell.execute("exit").await, Outcome::Quit);
        assert_eq!(shell.execute("").await, Outcome::Continue(String::new()));
    }

    #[tokio::test]
    async fn test_help_and_unknown_command() {
        let mut shell = shell().await;
        let out = text(shell.execute("help").await);
        assert!(out.contains("low-stock"));
        assert!(out.contains("export"));

        let out = text(shell.execute("frobnicate").await);
        assert!(out.contains("frobnicate"));
    }

    #[tokio::test]
    async fn test_analytics_renders_sections() {
        let mut shell = signed_in().await;
        shell.execute("add Rice groceries 10 500").await;
        shell.execute("add Chicken protein 2 3500").await;
        shell.execute("sell 2 1").await;

        let out = text(shell.execute("analytics").await);
        assert!(out.starts_with("2 items, 11 units"));
        assert!(out.contains("Stock by category"));
        assert!(out.contains("₦3500.00"));
        assert!(out.contains("Daily revenue"));
    }

    #[tokio::test]
    async fn test_run_loop_over_input() {
        let mut shell = shell().await;
        let input: &[u8] = b"login admin admin123\nadd Rice groceries 1 500\nlow-stock\nquit\nitems\n";
        let mut output = Vec::new();

        shell.run(input, &mut output).await.unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.starts_with("Stockroom inventory."));
        assert!(printed.contains("Signed in as admin."));
        assert!(printed.contains("admin> "));
        // Nothing after quit is executed
        assert_eq!(printed.matches("Rice").count(), 2);
    }
}
