// src/assembler.rs
use crate::catalog::{team_roles, ProposalCatalog, ProposalConfig, ProposalFamily};
use crate::core::prune::{prune_empty_rows, strip_marked_paragraphs};
use crate::core::walker::apply_placeholders;
use crate::docx_reader::{load_template, parse_document};
use crate::docx_writer::{serialize_document, write_docx};
use crate::error::ProposalError;
use crate::placeholders::{token, PlaceholderMap};
use crate::pricing::{compute_totals, line_value, money, split_instalments, Currency};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// User-facing date rendering, day first, zero padded.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// One generation request, as collected by the form backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposalRequest {
    /// Catalog key of the proposal kind.
    pub proposal: String,
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_number: String,
    #[serde(default)]
    pub country: String,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub currency: Currency,
    /// Entered amounts keyed by pricing token key; absent means zero.
    #[serde(default)]
    pub prices: HashMap<String, u64>,
    /// Explicit instalment amounts; when absent they are derived from the
    /// line items' fee types.
    #[serde(default)]
    pub instalments: Option<[u64; 2]>,
    /// Team member counts keyed by role token key; absent means zero.
    #[serde(default)]
    pub team: HashMap<String, u32>,
}

/// The finished document, ready to hand to the download step.
#[derive(Debug, Clone)]
pub struct GeneratedProposal {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl GeneratedProposal {
    /// Write the document into `dir` under its generated name. The bytes go
    /// through a temp file in the same directory and are renamed into place,
    /// so a failed write never leaves a partial file behind.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, ProposalError> {
        let target = dir.join(&self.file_name);
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&self.bytes)?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }
}

pub struct Assembler {
    catalog: ProposalCatalog,
    template_dir: PathBuf,
}

impl Assembler {
    pub fn new(catalog: ProposalCatalog, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            template_dir: template_dir.into(),
        }
    }

    /// Run one generation request end to end: resolve the template, build the
    /// placeholder mapping, walk the document, prune and strip, serialize.
    pub fn generate(&self, request: &ProposalRequest) -> Result<GeneratedProposal, ProposalError> {
        let config = self.catalog.get(&request.proposal)?;
        let template_path = self.template_dir.join(&config.template);
        info!(
            "generating {:?} for {:?} from {}",
            request.proposal,
            request.client_name,
            template_path.display()
        );

        let template = load_template(&template_path)?;
        let xml = template.document_xml()?;
        let mut doc = parse_document(&xml)?;

        let placeholders = build_placeholders(config, request)?;
        debug!("placeholder map has {} entries", placeholders.len());
        apply_placeholders(&mut doc, &placeholders);

        if let Some(policy) = config.prune {
            for table in doc.tables_mut() {
                prune_empty_rows(table, policy);
            }
        }

        if request.currency.is_tax_exempt() {
            strip_marked_paragraphs(&mut doc, &config.tax_markers);
        }

        let rewritten = serialize_document(&doc);
        let bytes = write_docx(&template, &rewritten)?;
        let file_name = output_file_name(&request.proposal, &request.client_name, request.date);
        info!("generated {} ({} bytes)", file_name, bytes.len());

        Ok(GeneratedProposal { file_name, bytes })
    }
}

/// Assemble the full placeholder mapping in the order the source system
/// registers it: client fields, pricing line items, computed totals and
/// instalments, team counts, validity date. Order is load bearing because
/// substitution runs sequentially per token.
pub fn build_placeholders(
    config: &ProposalConfig,
    request: &ProposalRequest,
) -> Result<PlaceholderMap, ProposalError> {
    let mut map = PlaceholderMap::new();
    let currency = request.currency;

    map.insert(token("Client Name"), request.client_name.clone())?;
    map.insert(token("Client Email"), request.client_email.clone())?;
    map.insert(token("Client Number"), request.client_number.clone())?;
    map.insert(token("Date"), request.date.format(DATE_FORMAT).to_string())?;
    map.insert(token("Country"), request.country.clone())?;

    let values: HashMap<String, u64> = config
        .pricing_fields
        .iter()
        .map(|field| {
            let amount = request.prices.get(&field.key).copied().unwrap_or(0);
            (field.key.clone(), amount)
        })
        .collect();

    for field in &config.pricing_fields {
        map.insert(token(&field.key), line_value(currency, values[&field.key]))?;
    }

    if config.family == ProposalFamily::DigitalMarketing {
        let total: u64 = values.values().sum();
        map.insert(token("Total"), money(currency, total))?;

        let (first, second) = match request.instalments {
            Some([a, b]) => (a, b),
            None => split_instalments(&config.pricing_fields, &values),
        };
        map.insert(token("Instalment 1"), money(currency, first))?;
        map.insert(token("Instalment 2"), money(currency, second))?;
    } else {
        let totals = compute_totals(&values);
        map.insert(token("AM-Price"), money(currency, totals.am_surcharge))?;

        let mut total_text = money(currency, totals.total);
        if let Some(note) = currency.gst_note() {
            total_text.push_str(note);
        }
        map.insert(token("T-Price"), total_text)?;
        map.insert(token("AF-Price"), money(currency, currency.annual_fee()))?;
    }

    for (_, key) in team_roles(config.team_type) {
        let count = request.team.get(*key).copied().unwrap_or(0);
        map.insert(token(key), count.to_string())?;
    }

    if config.special_fields.iter().any(|f| f == "VDate") {
        map.insert(
            token("VDate"),
            request.valid_until.format(DATE_FORMAT).to_string(),
        )?;
    }

    Ok(map)
}

/// `"<Kind> - <Client> <DD-MM-YYYY>.docx"`, with characters a filesystem
/// would reject stripped out.
pub fn output_file_name(kind: &str, client_name: &str, date: NaiveDate) -> String {
    let raw = format!(
        "{} - {} {}.docx",
        kind,
        client_name,
        date.format(DATE_FORMAT)
    );
    raw.chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') && !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProposalCatalog;

    fn request(kind: &str, currency: Currency) -> ProposalRequest {
        ProposalRequest {
            proposal: kind.to_string(),
            client_name: "Acme Corp".to_string(),
            client_email: "ops@acme.test".to_string(),
            client_number: "+1 555 0100".to_string(),
            country: "USA".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2026, 4, 5).unwrap(),
            currency,
            prices: HashMap::new(),
            instalments: None,
            team: HashMap::new(),
        }
    }

    #[test]
    fn general_family_mapping_has_totals_and_team_counts() {
        let catalog = ProposalCatalog::builtin();
        let config = catalog.get("Shopify Website Development").unwrap();
        let mut req = request("Shopify Website Development", Currency::Usd);
        req.prices.insert("Dev-Price".to_string(), 4_000);
        req.prices.insert("Design-Price".to_string(), 1_000);
        req.team.insert("P1".to_string(), 2);

        let map = build_placeholders(config, &req).unwrap();
        assert_eq!(map.get("<<Dev-Price>>"), Some("$4,000"));
        assert_eq!(map.get("<<Testing-Price>>"), Some(""));
        assert_eq!(map.get("<<AM-Price>>"), Some("$500"));
        assert_eq!(map.get("<<T-Price>>"), Some("$5,500"));
        assert_eq!(map.get("<<AF-Price>>"), Some("$250"));
        assert_eq!(map.get("<<P1>>"), Some("2"));
        assert_eq!(map.get("<<B1>>"), Some("0"));
        assert_eq!(map.get("<<VDate>>"), Some("05-04-2026"));
    }

    #[test]
    fn inr_total_carries_gst_note() {
        let catalog = ProposalCatalog::builtin();
        let config = catalog.get("Shopify Website Development").unwrap();
        let mut req = request("Shopify Website Development", Currency::Inr);
        req.prices.insert("Dev-Price".to_string(), 100_000);

        let map = build_placeholders(config, &req).unwrap();
        assert_eq!(
            map.get("<<T-Price>>"),
            Some("\u{20b9}110,000 + 18% GST")
        );
        assert_eq!(map.get("<<AF-Price>>"), Some("\u{20b9}25,000"));
    }

    #[test]
    fn dm_family_mapping_has_total_and_instalments() {
        let catalog = ProposalCatalog::builtin();
        let config = catalog.get("DM Proposal - All").unwrap();
        let mut req = request("DM Proposal - All", Currency::Usd);
        req.prices.insert("MS".to_string(), 1_000);
        req.prices.insert("SEO".to_string(), 600);
        req.instalments = Some([800, 800]);

        let map = build_placeholders(config, &req).unwrap();
        assert_eq!(map.get("<<Total>>"), Some("$1,600"));
        assert_eq!(map.get("<<Instalment 1>>"), Some("$800"));
        assert_eq!(map.get("<<Instalment 2>>"), Some("$800"));
        assert_eq!(map.get("<<AM-Price>>"), None);
        assert_eq!(map.get("<<DME>>"), Some("0"));
    }

    #[test]
    fn dm_instalments_default_to_fee_type_split() {
        let catalog = ProposalCatalog::builtin();
        let config = catalog.get("DM Proposal - All").unwrap();
        let mut req = request("DM Proposal - All", Currency::Usd);
        req.prices.insert("MS".to_string(), 1_000); // one-time
        req.prices.insert("SEO".to_string(), 600); // recurring

        let map = build_placeholders(config, &req).unwrap();
        assert_eq!(map.get("<<Instalment 1>>"), Some("$1,000"));
        assert_eq!(map.get("<<Instalment 2>>"), Some("$600"));
    }

    #[test]
    fn output_name_is_filesystem_safe() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        let name = output_file_name("DM Proposal - All", "A/B: Test?", date);
        assert_eq!(name, "DM Proposal - All - AB Test 09-01-2026.docx");
    }

    #[test]
    fn unknown_proposal_kind_fails() {
        let assembler = Assembler::new(ProposalCatalog::builtin(), ".");
        let req = request("Nope", Currency::Usd);
        assert!(matches!(
            assembler.generate(&req),
            Err(ProposalError::UnknownProposal(_))
        ));
    }

    #[test]
    fn missing_template_is_template_not_found() {
        let assembler = Assembler::new(ProposalCatalog::builtin(), "/nonexistent-template-dir");
        let req = request("DM Proposal - All", Currency::Usd);
        assert!(matches!(
            assembler.generate(&req),
            Err(ProposalError::TemplateNotFound { .. })
        ));
    }
}
