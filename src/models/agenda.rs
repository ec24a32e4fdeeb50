//! Agenda model. Ordering is the array order.

use serde::{Deserialize, Serialize};

use super::ordering::{swap_adjacent, MoveDirection};
use crate::db::StoredDocument;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgendaItemType {
    Keynote,
    Session,
    Break,
    Workshop,
    Networking,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub id: String,
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: AgendaItemType,
}

/// Move an agenda item one slot. `None` when the id is unknown.
pub fn move_agenda_item(
    items: &mut [AgendaItem],
    id: &str,
    direction: MoveDirection,
) -> Option<bool> {
    let index = items.iter().position(|item| item.id == id)?;
    Some(swap_adjacent(items, index, direction))
}

impl StoredDocument for Vec<AgendaItem> {
    const KEY: &'static str = "agenda";

    fn default_document() -> Self {
        default_agenda()
    }
}

fn item(
    id: &str,
    time: &str,
    title: &str,
    speaker: &str,
    location: &str,
    description: &str,
    item_type: AgendaItemType,
) -> AgendaItem {
    AgendaItem {
        id: id.to_string(),
        time: time.to_string(),
        title: title.to_string(),
        speaker: speaker.to_string(),
        location: location.to_string(),
        description: description.to_string(),
        item_type,
    }
}

fn default_agenda() -> Vec<AgendaItem> {
    use AgendaItemType::*;

    vec![
        item(
            "1",
            "08:30 - 09:00",
            "Registration & Welcome Coffee",
            "",
            "Main Lobby",
            "Collect your badge and enjoy refreshments before the main event begins.",
            Networking,
        ),
        item(
            "2",
            "09:00 - 09:30",
            "Opening Keynote: The Future of Business Growth",
            "Sarah Johnson, CEO",
            "Main Hall",
            "Insights into emerging trends and strategies for sustainable business growth in 2025 and beyond.",
            Keynote,
        ),
        item(
            "3",
            "09:30 - 10:30",
            "Digital Transformation Workshop",
            "Michael Chen, CTO",
            "Workshop Room A",
            "Hands-on session exploring practical digital transformation strategies for SMEs.",
            Workshop,
        ),
        item(
            "4",
            "10:30 - 11:00",
            "Coffee Break & Networking",
            "",
            "Exhibition Area",
            "Connect with fellow delegates and explore sponsor exhibitions.",
            Break,
        ),
        item(
            "5",
            "11:00 - 12:00",
            "Marketing in AI Era",
            "Emma Williams, Marketing Director",
            "Main Hall",
            "How artificial intelligence is revolutionizing marketing strategies and customer engagement.",
            Session,
        ),
        item(
            "6",
            "12:00 - 13:30",
            "Networking Lunch",
            "",
            "Dining Hall",
            "Three-course lunch with dedicated networking time.",
            Networking,
        ),
        item(
            "7",
            "13:30 - 14:30",
            "Sustainable Business Practices",
            "David Green, Sustainability Expert",
            "Main Hall",
            "Implementing environmentally sustainable practices without compromising profitability.",
            Session,
        ),
        item(
            "8",
            "14:30 - 15:30",
            "Leadership in Remote Teams",
            "Lisa Anderson, HR Director",
            "Workshop Room B",
            "Best practices for managing and motivating distributed teams effectively.",
            Workshop,
        ),
        item(
            "9",
            "15:30 - 16:00",
            "Afternoon Tea & Exhibition",
            "",
            "Exhibition Area",
            "Final opportunity to connect with sponsors and speakers.",
            Break,
        ),
        item(
            "10",
            "16:00 - 17:00",
            "Closing Keynote: Your Growth Journey Starts Now",
            "Robert Taylor, Business Coach",
            "Main Hall",
            "Actionable insights and next steps to implement what you've learned today.",
            Keynote,
        ),
        item(
            "11",
            "17:00 onwards",
            "Conference Dinner & Networking",
            "",
            "Grand Ballroom",
            "Join us for an evening of dining, entertainment, and networking with fellow delegates and speakers.",
            Networking,
        ),
    ]
}
