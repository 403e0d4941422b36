// src/catalog.rs
//
// Proposal configuration catalog: one descriptor per proposal kind, naming
// its template file, pricing line items, team role set, family, and pruning
// policy. The catalog is an explicit value handed to the assembler per
// request, never module-level state. A JSON file can replace the built-ins.

use crate::core::prune::PrunePolicy;
use crate::error::ProposalError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    #[default]
    OneTime,
    Recurring,
}

/// A pricing table line item: its display label, the token key templates use
/// (`<<key>>`), and whether the charge is one-time or recurring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingField {
    pub label: String,
    pub key: String,
    #[serde(default)]
    pub fee_type: FeeType,
}

impl PricingField {
    pub fn new(label: &str, key: &str, fee_type: FeeType) -> Self {
        Self {
            label: label.to_string(),
            key: key.to_string(),
            fee_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamType {
    General,
    Dm,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalFamily {
    Ecommerce,
    DigitalMarketing,
    Fintech,
    AiSearch,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalConfig {
    pub template: String,
    pub pricing_fields: Vec<PricingField>,
    pub team_type: TeamType,
    #[serde(default)]
    pub special_fields: Vec<String>,
    pub family: ProposalFamily,
    /// Row-pruning policy for this template layout, if the family prunes.
    #[serde(default)]
    pub prune: Option<PrunePolicy>,
    /// Paragraphs containing any of these markers are stripped for
    /// tax-exempt currencies.
    #[serde(default = "default_tax_markers")]
    pub tax_markers: Vec<String>,
}

fn default_tax_markers() -> Vec<String> {
    vec!["18% GST".to_string()]
}

/// Team role sets keyed by their count placeholder tokens.
pub fn team_roles(team_type: TeamType) -> &'static [(&'static str, &'static str)] {
    match team_type {
        TeamType::General => &[
            ("Project Manager", "P1"),
            ("Business Analyst", "B1"),
            ("UI/UX Members", "U1"),
            ("Backend Developers", "BD1"),
            ("Frontend Developers", "F1"),
            ("AI/ML Developers", "A1"),
            ("System Architect", "S1"),
            ("AWS Developer", "AD1"),
        ],
        TeamType::Dm => &[
            ("Digital Marketing Executive", "DME"),
            ("Digital Marketing Associate", "DMA"),
            ("Business Analyst", "BA"),
            ("Graphics Designer", "GD"),
        ],
        TeamType::None => &[],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalCatalog {
    pub entries: BTreeMap<String, ProposalConfig>,
}

impl ProposalCatalog {
    pub fn get(&self, kind: &str) -> Result<&ProposalConfig, ProposalError> {
        self.entries
            .get(kind)
            .ok_or_else(|| ProposalError::UnknownProposal(kind.to_string()))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ProposalError> {
        let data = std::fs::read_to_string(path)?;
        let entries: BTreeMap<String, ProposalConfig> = serde_json::from_str(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Self { entries })
    }

    /// The proposal kinds the sales team ships today.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();

        entries.insert(
            "Shopify Website Development".to_string(),
            ProposalConfig {
                template: "Shopify Website.docx".to_string(),
                pricing_fields: vec![
                    PricingField::new("Development", "Dev-Price", FeeType::OneTime),
                    PricingField::new("Design", "Design-Price", FeeType::OneTime),
                    PricingField::new("Testing and Live", "Testing-Price", FeeType::OneTime),
                ],
                team_type: TeamType::General,
                special_fields: vec!["VDate".to_string()],
                family: ProposalFamily::Ecommerce,
                prune: Some(PrunePolicy::LastColumn),
                tax_markers: default_tax_markers(),
            },
        );

        entries.insert(
            "Single Vendor Ecommerce Website".to_string(),
            ProposalConfig {
                template: "Single Vendor Ecommerce website.docx".to_string(),
                pricing_fields: vec![
                    PricingField::new("Development", "Dev-Price", FeeType::OneTime),
                    PricingField::new("Design", "Design-Price", FeeType::OneTime),
                    PricingField::new("Website Bot", "WB-Price", FeeType::OneTime),
                    PricingField::new("Testing and Deployment", "TD-Price", FeeType::OneTime),
                ],
                team_type: TeamType::General,
                special_fields: vec!["VDate".to_string()],
                family: ProposalFamily::Ecommerce,
                prune: Some(PrunePolicy::LastColumn),
                tax_markers: default_tax_markers(),
            },
        );

        entries.insert(
            "DM Proposal - All".to_string(),
            ProposalConfig {
                template: "DM Proposal - All.docx".to_string(),
                pricing_fields: vec![
                    PricingField::new("Marketing Strategy", "MS", FeeType::OneTime),
                    PricingField::new("Social Media Setup", "SM", FeeType::OneTime),
                    PricingField::new("Meta & Google Ads Setup", "MG", FeeType::OneTime),
                    PricingField::new("Creative Posts", "CP", FeeType::Recurring),
                    PricingField::new("Meta Paid Ads", "MP", FeeType::Recurring),
                    PricingField::new("Google Paid Ads", "GP", FeeType::Recurring),
                    PricingField::new("SEO", "SEO", FeeType::Recurring),
                    PricingField::new("Email Marketing", "EM", FeeType::Recurring),
                    PricingField::new("Monthly Reporting", "MR", FeeType::Recurring),
                ],
                team_type: TeamType::Dm,
                special_fields: vec!["VDate".to_string()],
                family: ProposalFamily::DigitalMarketing,
                prune: Some(PrunePolicy::ValueColumn),
                tax_markers: default_tax_markers(),
            },
        );

        entries.insert(
            "Web Based AI Fintech".to_string(),
            ProposalConfig {
                template: "Web based AI Fintech proposal.docx".to_string(),
                pricing_fields: vec![
                    PricingField::new("Development", "Dev-Price", FeeType::OneTime),
                    PricingField::new("Design", "Design-Price", FeeType::OneTime),
                    PricingField::new("AI/ML Models", "AIML-Price", FeeType::OneTime),
                ],
                team_type: TeamType::General,
                special_fields: vec!["VDate".to_string()],
                family: ProposalFamily::Fintech,
                prune: None,
                tax_markers: default_tax_markers(),
            },
        );

        entries.insert(
            "Community App Tech Proposal".to_string(),
            ProposalConfig {
                template: "Community App Tech Proposal.docx".to_string(),
                pricing_fields: vec![
                    PricingField::new("Design", "Design-Price", FeeType::OneTime),
                    PricingField::new("AI/ML & Development", "AIML-Price", FeeType::OneTime),
                    PricingField::new("QA & Project Management", "QA-Price", FeeType::OneTime),
                ],
                team_type: TeamType::General,
                special_fields: vec!["VDate".to_string()],
                family: ProposalFamily::General,
                prune: None,
                tax_markers: default_tax_markers(),
            },
        );

        entries.insert(
            "Job portal website Tech Proposal".to_string(),
            ProposalConfig {
                template: "Job portal website Tech Proposal.docx".to_string(),
                pricing_fields: vec![
                    PricingField::new("Design", "Design-Price", FeeType::OneTime),
                    PricingField::new("Development", "Dev-Price", FeeType::OneTime),
                    PricingField::new("Automations", "Automation-Price", FeeType::OneTime),
                    PricingField::new("Testing & Deployment", "TD-Price", FeeType::OneTime),
                ],
                team_type: TeamType::General,
                special_fields: vec!["VDate".to_string()],
                family: ProposalFamily::General,
                prune: None,
                tax_markers: default_tax_markers(),
            },
        );

        entries.insert(
            "AI Based Search Engine Website Technical Consultation".to_string(),
            ProposalConfig {
                template: "AI Based Search Engine Website Technical Consultation proposal.docx"
                    .to_string(),
                pricing_fields: vec![
                    PricingField::new("Designs", "Design-Price", FeeType::OneTime),
                    PricingField::new("Development", "Dev-Price", FeeType::OneTime),
                    PricingField::new("Testing & Deployment", "TD-Price", FeeType::OneTime),
                ],
                team_type: TeamType::General,
                special_fields: vec!["VDate".to_string()],
                family: ProposalFamily::AiSearch,
                prune: None,
                tax_markers: default_tax_markers(),
            },
        );

        Self { entries }
    }
}
