mod html;

pub use html::render_document;

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::model::Invoice;
use crate::reconcile::ReconcileOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Opens the browser print dialog once loaded
    Print,
    /// Plain page for saving
    Download,
}

#[derive(Debug, Clone)]
pub struct DocumentSettings {
    pub currency_symbol: String,
    pub options: ReconcileOptions,
}

/// File name for a downloaded bill, e.g. `INV-2025-0042.html`
pub fn download_file_name(bill: &Invoice) -> String {
    let stem: String = bill
        .invoice_number
        .as_deref()
        .unwrap_or("invoice")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = if stem.trim_matches('.').is_empty() {
        "invoice".to_string()
    } else {
        stem
    };
    format!("{}.html", stem)
}

/// Write the print page to the temp dir and return its path
pub fn write_print_document(bill: &Invoice, settings: &DocumentSettings) -> Result<PathBuf> {
    let temp_dir = std::env::temp_dir().join("vendor-bills");
    std::fs::create_dir_all(&temp_dir)?;

    let path = temp_dir.join(format!("print-{}", download_file_name(bill)));
    std::fs::write(&path, render_document(bill, DocumentKind::Print, settings))?;

    info!(path = %path.display(), "wrote print document");
    Ok(path)
}

/// Write the download page into `output_dir`, or to `output` when given
pub fn write_download(
    bill: &Invoice,
    settings: &DocumentSettings,
    output_dir: &Path,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let path = output.unwrap_or_else(|| output_dir.join(download_file_name(bill)));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&path, render_document(bill, DocumentKind::Download, settings))?;

    info!(path = %path.display(), "wrote download document");
    Ok(path)
}
