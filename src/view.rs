//! Screen state for the bills list and the bill preview.
//!
//! One value describes the whole screen and only [`BillsView::update`]
//! moves it, so a pending print or download always has a bill selected.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentAction {
    Print,
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "lowercase")]
pub enum Screen {
    #[default]
    List,
    Preview {
        bill: usize,
        pending: Option<DocumentAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open(usize),
    Print(usize),
    Download(usize),
    /// The pending print or download has been carried out
    Completed,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillsView {
    pub screen: Screen,
}

impl BillsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(self, action: Action, bill_count: usize) -> Self {
        let next = match action {
            Action::Open(bill) => self.preview(bill, None, bill_count),
            Action::Print(bill) => self.preview(bill, Some(DocumentAction::Print), bill_count),
            Action::Download(bill) => {
                self.preview(bill, Some(DocumentAction::Download), bill_count)
            }
            Action::Completed => match self.screen {
                Screen::Preview { bill, .. } => Screen::Preview {
                    bill,
                    pending: None,
                },
                Screen::List => Screen::List,
            },
            Action::Close => Screen::List,
        };

        debug!(?action, from = ?self.screen, to = ?next, "view update");
        Self { screen: next }
    }

    fn preview(&self, bill: usize, pending: Option<DocumentAction>, bill_count: usize) -> Screen {
        if bill >= bill_count {
            warn!(bill, bill_count, "ignoring selection past the end of the list");
            return self.screen;
        }
        Screen::Preview { bill, pending }
    }

    /// Index of the bill being previewed
    pub fn selected(&self) -> Option<usize> {
        match self.screen {
            Screen::Preview { bill, .. } => Some(bill),
            Screen::List => None,
        }
    }

    /// Document effect waiting to be carried out
    pub fn pending(&self) -> Option<DocumentAction> {
        match self.screen {
            Screen::Preview { pending, .. } => pending,
            Screen::List => None,
        }
    }
}
