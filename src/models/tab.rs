//! Navigation tab configuration.

use serde::{Deserialize, Serialize};

use super::ordering::{swap_adjacent, MoveDirection};
use crate::db::StoredDocument;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabConfig {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub enabled: bool,
    pub order: u32,
}

/// The stored tabs document, `{ "tabs": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabsDocument {
    #[serde(default)]
    pub tabs: Vec<TabConfig>,
}

impl TabsDocument {
    /// Sort by `order` (stable for ties) and reassign 1..N.
    pub fn renumber(&mut self) {
        self.tabs.sort_by_key(|tab| tab.order);
        for (index, tab) in self.tabs.iter_mut().enumerate() {
            tab.order = index as u32 + 1;
        }
    }

    /// Swap a tab with its neighbour and renumber every tab.
    ///
    /// `None` when the id is unknown; `Some(false)` when already at that end.
    pub fn move_tab(&mut self, id: &str, direction: MoveDirection) -> Option<bool> {
        self.renumber();
        let index = self.tabs.iter().position(|tab| tab.id == id)?;
        let moved = swap_adjacent(&mut self.tabs, index, direction);
        for (index, tab) in self.tabs.iter_mut().enumerate() {
            tab.order = index as u32 + 1;
        }
        Some(moved)
    }
}

impl StoredDocument for TabsDocument {
    const KEY: &'static str = "tabs";

    fn default_document() -> Self {
        let tabs = [
            ("overview", "Overview", "🏠"),
            ("venue", "Venue", "📍"),
            ("sponsors", "Sponsors", "🤝"),
            ("agenda", "Agenda", "📅"),
            ("messages", "Messages", "💬"),
            ("voting", "Voting", "🗳️"),
            ("register", "Book Tickets", "🎫"),
        ];

        TabsDocument {
            tabs: tabs
                .iter()
                .enumerate()
                .map(|(index, (id, label, icon))| TabConfig {
                    id: id.to_string(),
                    label: label.to_string(),
                    icon: icon.to_string(),
                    enabled: true,
                    order: index as u32 + 1,
                })
                .collect(),
        }
    }

    fn normalize(mut self) -> Self {
        self.tabs.sort_by_key(|tab| tab.order);
        self
    }
}
