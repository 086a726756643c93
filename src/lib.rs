pub mod config;
pub mod display;
pub mod document;
pub mod error;
pub mod fetch;
pub mod model;
pub mod reconcile;
pub mod view;

pub use config::Config;
pub use display::resolve_retailer_display_name;
pub use error::{BillsError, Result};
pub use fetch::{load_bills, BillSource};
pub use model::{Invoice, LineItem, RetailerRef};
pub use reconcile::{
    reconcile_invoice_totals, reconcile_invoice_totals_with, reconcile_line_item,
    reconcile_line_item_with, InvoiceTotals, LineItemComputed, ReconcileOptions, ZeroTotalPolicy,
};
pub use view::{Action, BillsView, DocumentAction, Screen};
