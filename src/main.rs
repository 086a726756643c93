use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use vendor_bills::config::{
    config_dir, init_config_dir, load_config, load_config_or_default, resolve_output_dir,
};
use vendor_bills::display::{
    format_amount, format_invoice_date, format_money, or_na, resolve_retailer_display_name,
};
use vendor_bills::document::{write_download, write_print_document, DocumentSettings};
use vendor_bills::reconcile::{reconcile_invoice_totals_with, reconcile_lines};
use vendor_bills::{
    load_bills, Action, BillSource, BillsError, BillsView, Config, DocumentAction, Invoice, Result,
};

#[derive(Parser)]
#[command(name = "vendor-bills")]
#[command(version, about = "Vendor bills viewer with GST reconciliation", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.vendor-bills)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Read bills from a saved JSON response instead of the API
    #[arg(short, long, global = true, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// List vendor bills
    List {
        /// Number of bills to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Preview a bill with its line items and totals
    Show {
        /// Bill index from 'list' or invoice number (e.g., 1 or INV-2025-0042)
        bill: String,
    },

    /// Open a printable page for a bill in the browser
    Print {
        /// Bill index from 'list' or invoice number
        bill: String,

        /// Only write the page, do not open it
        #[arg(long)]
        no_open: bool,
    },

    /// Save a bill as an HTML document
    Download {
        /// Bill index from 'list' or invoice number
        bill: String,

        /// Custom output file path (default: output_dir/<invoice number>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    let input = cli.input.as_deref();

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::List { limit } => cmd_list(&cfg_dir, input, limit),
        Commands::Show { bill } => cmd_show(&cfg_dir, input, &bill),
        Commands::Print { bill, no_open } => {
            let effect = Effect {
                open: !no_open,
                output: None,
            };
            cmd_document(&cfg_dir, input, &bill, DocumentAction::Print, effect)
        }
        Commands::Download { bill, output } => {
            let effect = Effect {
                open: false,
                output,
            };
            cmd_document(&cfg_dir, input, &bill, DocumentAction::Download, effect)
        }
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    init_config_dir(cfg_dir)?;

    println!("Initialized vendor-bills config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set the API url and company: $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Export your API token:       export VENDOR_BILLS_TOKEN=...");
    println!();
    println!("Then list your bills:");
    println!("  vendor-bills list");

    Ok(())
}

/// Load config and bills from the file given with --input or from the API
fn load_session(cfg_dir: &Path, input: Option<&Path>) -> Result<(Config, Vec<Invoice>)> {
    let (config, source) = match input {
        Some(path) => (
            load_config_or_default(cfg_dir)?,
            BillSource::File(path.to_path_buf()),
        ),
        None => {
            if !cfg_dir.exists() {
                return Err(BillsError::ConfigNotFound(cfg_dir.to_path_buf()));
            }
            let config = load_config(cfg_dir)?;
            let source = BillSource::from_api(&config.api)?;
            (config, source)
        }
    };

    let bills = load_bills(&source)?;
    Ok((config, bills))
}

/// Resolve a bill reference to its position in the list.
/// Accepts either an index (1-based) from 'list' or an invoice number.
fn resolve_bill_index(bills: &[Invoice], reference: &str) -> Result<usize> {
    if bills.is_empty() {
        return Err(BillsError::NoBills);
    }

    if let Ok(idx) = reference.parse::<usize>() {
        if idx == 0 || idx > bills.len() {
            return Err(BillsError::InvalidBillIndex(reference.to_string()));
        }
        return Ok(idx - 1);
    }

    bills
        .iter()
        .position(|b| b.invoice_number.as_deref() == Some(reference))
        .ok_or_else(|| BillsError::BillNotFound(reference.to_string()))
}

// Table row structs for tabled
#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "INVOICE NO")]
    number: String,
    #[tabled(rename = "RETAILER")]
    retailer: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "PRODUCT")]
    product: String,
    #[tabled(rename = "HSN")]
    hsn: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "TAXABLE")]
    taxable: String,
    #[tabled(rename = "GST %")]
    gst_rate: String,
    #[tabled(rename = "CGST")]
    cgst: String,
    #[tabled(rename = "SGST")]
    sgst: String,
    #[tabled(rename = "IGST")]
    igst: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

/// List bills with their reconciled grand totals
fn cmd_list(cfg_dir: &Path, input: Option<&Path>, limit: Option<usize>) -> Result<()> {
    let (config, bills) = load_session(cfg_dir, input)?;

    if bills.is_empty() {
        println!("No bills found.");
        return Ok(());
    }

    let shown = match limit {
        Some(n) => &bills[..n.min(bills.len())],
        None => &bills[..],
    };

    let symbol = &config.display.currency_symbol;
    let mut any_estimated = false;

    let rows: Vec<BillRow> = shown
        .iter()
        .enumerate()
        .map(|(idx, bill)| {
            let totals = reconcile_invoice_totals_with(bill, &config.reconcile);
            let marker = if totals.grand_total_estimated() {
                any_estimated = true;
                " *"
            } else {
                ""
            };
            BillRow {
                index: idx + 1,
                number: or_na(bill.invoice_number.as_deref()).to_string(),
                retailer: resolve_retailer_display_name(
                    bill.retailer.as_ref(),
                    bill.retailer_name.as_deref(),
                ),
                amount: format!("{}{}", format_money(symbol, totals.grand_total), marker),
                date: format_invoice_date(bill.invoice_date.as_deref()),
                status: or_na(bill.payment_status.as_deref()).to_string(),
            }
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    println!();
    println!("Total: {} bills", bills.len());
    if any_estimated {
        println!("* includes estimated figures for lines without pricing");
    }
    println!("Use index number with show/print/download (e.g., 'vendor-bills show 1')");

    Ok(())
}

/// Preview a single bill
fn cmd_show(cfg_dir: &Path, input: Option<&Path>, reference: &str) -> Result<()> {
    let (config, bills) = load_session(cfg_dir, input)?;
    let idx = resolve_bill_index(&bills, reference)?;

    let view = BillsView::new().update(Action::Open(idx), bills.len());
    let Some(bill) = view.selected().and_then(|i| bills.get(i)) else {
        return Err(BillsError::InvalidBillIndex(reference.to_string()));
    };

    print_preview(bill, &config);
    Ok(())
}

fn print_preview(bill: &Invoice, config: &Config) {
    let symbol = &config.display.currency_symbol;

    println!("Invoice {}", or_na(bill.invoice_number.as_deref()));
    println!("{}", "-".repeat(50));
    println!(
        "Company:        {}",
        bill.company
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or("Company Name")
    );
    println!(
        "Billed to:      {}",
        resolve_retailer_display_name(bill.retailer.as_ref(), bill.retailer_name.as_deref())
    );
    if let Some(gstin) = bill.retailer_record().and_then(|r| r.gstin.as_deref()) {
        println!("GSTIN:          {}", gstin);
    }
    println!(
        "Date:           {}",
        format_invoice_date(bill.invoice_date.as_deref())
    );
    println!("Payment mode:   {}", or_na(bill.payment_mode.as_deref()));
    println!("Payment status: {}", or_na(bill.payment_status.as_deref()));
    println!();

    if bill.items.is_empty() {
        println!("No items found in this bill");
    } else {
        let lines = reconcile_lines(bill, &config.reconcile);
        let rows: Vec<ItemRow> = bill
            .items
            .iter()
            .zip(&lines)
            .enumerate()
            .map(|(idx, (item, line))| ItemRow {
                index: if line.is_estimated() {
                    format!("{} *", idx + 1)
                } else {
                    (idx + 1).to_string()
                },
                product: match &item.product_name {
                    Some(name) => format!("{} ({})", name, item.product_identifier),
                    None => format!("Product ID: {}", item.product_identifier),
                },
                hsn: item.hsn_code.clone(),
                quantity: item.quantity.to_string(),
                rate: format_amount(line.unit_price),
                taxable: format_amount(line.taxable_value),
                gst_rate: format!("{}%", line.gst_rate_percent),
                cgst: format_amount(line.cgst),
                sgst: format_amount(line.sgst),
                igst: format_amount(line.igst),
                total: format_amount(line.line_total),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    let totals = reconcile_invoice_totals_with(bill, &config.reconcile);
    println!();
    println!("Total Taxable Value: {}", format_money(symbol, totals.total_taxable));
    println!("Total CGST:          {}", format_money(symbol, totals.total_cgst));
    println!("Total SGST:          {}", format_money(symbol, totals.total_sgst));
    println!("Total IGST:          {}", format_money(symbol, totals.total_igst));
    println!("Grand Total:         {}", format_money(symbol, totals.grand_total));

    if totals.includes_estimates() {
        println!();
        println!(
            "* {} line(s) had a quantity but no pricing; their figures are estimates",
            totals.estimated_lines
        );
    }
}

/// How a document action is carried out
struct Effect {
    open: bool,
    output: Option<PathBuf>,
}

/// Print or download a bill
fn cmd_document(
    cfg_dir: &Path,
    input: Option<&Path>,
    reference: &str,
    action: DocumentAction,
    effect: Effect,
) -> Result<()> {
    let (config, bills) = load_session(cfg_dir, input)?;
    let idx = resolve_bill_index(&bills, reference)?;

    let request = match action {
        DocumentAction::Print => Action::Print(idx),
        DocumentAction::Download => Action::Download(idx),
    };
    let view = BillsView::new().update(request, bills.len());
    let view = carry_out(view, &bills, &config, cfg_dir, effect)?;
    debug!(screen = ?view.screen, "document action finished");

    Ok(())
}

/// Perform the view's pending document action and mark it completed
fn carry_out(
    view: BillsView,
    bills: &[Invoice],
    config: &Config,
    cfg_dir: &Path,
    effect: Effect,
) -> Result<BillsView> {
    let (Some(pending), Some(bill)) = (view.pending(), view.selected().and_then(|i| bills.get(i)))
    else {
        return Ok(view);
    };

    let settings = DocumentSettings {
        currency_symbol: config.display.currency_symbol.clone(),
        options: config.reconcile,
    };
    let number = or_na(bill.invoice_number.as_deref());

    match pending {
        DocumentAction::Print => {
            let path = write_print_document(bill, &settings)?;
            if effect.open {
                open_path(&path)?;
                println!("Opened {} for printing", number);
            } else {
                println!("Print page for {} written", number);
            }
            println!("  Saved: {}", path.display());
        }
        DocumentAction::Download => {
            let output_dir = resolve_output_dir(&config.output.output_dir, cfg_dir);
            let path = write_download(bill, &settings, &output_dir, effect.output)?;
            println!("Downloaded {}", number);
            println!("  Saved: {}", path.display());
        }
    }

    Ok(view.update(Action::Completed, bills.len()))
}

fn open_path(path: &Path) -> Result<()> {
    // Open with system default browser
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", path.to_str().unwrap_or("")])
            .spawn()?;
    }
    Ok(())
}
