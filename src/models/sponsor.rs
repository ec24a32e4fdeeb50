//! Sponsor model.

use serde::{Deserialize, Serialize};

use crate::db::StoredDocument;

/// Sponsorship level; only affects how sponsors are grouped for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SponsorTier {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl SponsorTier {
    /// Display order, highest tier first.
    pub const ORDERED: [SponsorTier; 4] = [
        SponsorTier::Platinum,
        SponsorTier::Gold,
        SponsorTier::Silver,
        SponsorTier::Bronze,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SponsorTier::Platinum => "Platinum",
            SponsorTier::Gold => "Gold",
            SponsorTier::Silver => "Silver",
            SponsorTier::Bronze => "Bronze",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub id: String,
    pub name: String,
    /// Emoji or uploaded image URL
    #[serde(default)]
    pub logo: String,
    pub tier: SponsorTier,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booth_number: Option<String>,
}

/// Sponsors of one tier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorTierGroup {
    pub tier: SponsorTier,
    pub label: &'static str,
    pub sponsors: Vec<Sponsor>,
}

/// Group sponsors by tier, highest first, keeping list order within a tier.
/// Empty tiers are omitted.
pub fn group_by_tier(sponsors: &[Sponsor]) -> Vec<SponsorTierGroup> {
    SponsorTier::ORDERED
        .iter()
        .map(|tier| SponsorTierGroup {
            tier: *tier,
            label: tier.label(),
            sponsors: sponsors.iter().filter(|s| s.tier == *tier).cloned().collect(),
        })
        .filter(|group| !group.sponsors.is_empty())
        .collect()
}

impl StoredDocument for Vec<Sponsor> {
    const KEY: &'static str = "sponsors";

    fn default_document() -> Self {
        default_sponsors()
    }
}

fn sponsor(
    id: &str,
    name: &str,
    logo: &str,
    tier: SponsorTier,
    description: &str,
    website: &str,
    booth: &str,
) -> Sponsor {
    Sponsor {
        id: id.to_string(),
        name: name.to_string(),
        logo: logo.to_string(),
        tier,
        description: description.to_string(),
        website: website.to_string(),
        booth_number: Some(booth.to_string()),
    }
}

fn default_sponsors() -> Vec<Sponsor> {
    use SponsorTier::*;

    vec![
        sponsor(
            "1",
            "TechCorp Solutions",
            "🏢",
            Platinum,
            "Leading provider of enterprise software solutions and digital transformation services. Helping businesses scale with cutting-edge technology.",
            "https://techcorp.example.com",
            "A1",
        ),
        sponsor(
            "2",
            "Global Finance Partners",
            "💰",
            Platinum,
            "Specialized financial advisory and investment services for growing businesses. Your partner in sustainable financial growth.",
            "https://globalfinance.example.com",
            "A2",
        ),
        sponsor(
            "3",
            "Innovate Marketing",
            "📈",
            Gold,
            "Award-winning digital marketing agency specializing in ROI-driven campaigns and brand development.",
            "https://innovatemarketing.example.com",
            "B1",
        ),
        sponsor(
            "4",
            "CloudTech Systems",
            "☁️",
            Gold,
            "Cloud infrastructure and cybersecurity solutions for modern businesses. Secure, scalable, and reliable.",
            "https://cloudtech.example.com",
            "B2",
        ),
        sponsor(
            "5",
            "Business Growth Academy",
            "🎓",
            Gold,
            "Professional development and training programs for business leaders and teams. Accelerate your growth journey.",
            "https://businessgrowth.example.com",
            "B3",
        ),
        sponsor(
            "6",
            "Sustainable Solutions Ltd",
            "🌱",
            Silver,
            "Environmental consulting and sustainable business practices. Green solutions for modern enterprises.",
            "https://sustainable.example.com",
            "C1",
        ),
        sponsor(
            "7",
            "HR Innovations",
            "👥",
            Silver,
            "Modern HR solutions and employee engagement platforms. Building better workplaces for better results.",
            "https://hrinnovations.example.com",
            "C2",
        ),
        sponsor(
            "8",
            "Legal Eagle Services",
            "⚖️",
            Silver,
            "Business law and compliance specialists. Protecting your business while you focus on growth.",
            "https://legaleagle.example.com",
            "C3",
        ),
        sponsor(
            "9",
            "Data Analytics Pro",
            "📊",
            Bronze,
            "Business intelligence and data analytics solutions. Turn your data into actionable insights.",
            "https://dataanalytics.example.com",
            "D1",
        ),
        sponsor(
            "10",
            "MobileFirst Development",
            "📱",
            Bronze,
            "Custom mobile app development and digital solutions. Your vision, our expertise.",
            "https://mobilefirst.example.com",
            "D2",
        ),
    ]
}
