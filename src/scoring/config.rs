use crate::error::{Bfi2Error, ConfigError, Result};
use crate::types::{ItemId, OrderedMap};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, warn};

pub const BFI2_SCORING_TOML: &str = include_str!("../../data/bfi2/scoring.toml");

const SCALE_FLOOR: f64 = 1.0;
const SCALE_CEILING: f64 = 5.0;

/// Scoring key as written in a document, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringDocument {
    pub domains: Option<OrderedMap<DomainDocument>>,
    pub interpretation: Option<InterpretationDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainDocument {
    pub code: Option<String>,
    pub items: Option<Vec<ItemId>>,
    #[serde(default, rename = "reverseItems")]
    pub reverse_items: Vec<ItemId>,
    #[serde(default)]
    pub facets: OrderedMap<FacetDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetDocument {
    pub items: Option<Vec<ItemId>>,
    #[serde(default, rename = "reverseItems")]
    pub reverse_items: Vec<ItemId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterpretationDocument {
    pub ranges: Option<OrderedMap<RangeDocument>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeDocument {
    pub label: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacetConfig {
    pub items: Vec<ItemId>,
    pub reverse_items: BTreeSet<ItemId>,
}

impl FacetConfig {
    pub fn is_reverse(&self, item: ItemId) -> bool {
        self.reverse_items.contains(&item)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainConfig {
    pub code: String,
    pub items: Vec<ItemId>,
    pub reverse_items: BTreeSet<ItemId>,
    pub facets: OrderedMap<FacetConfig>,
}

impl DomainConfig {
    pub fn is_reverse(&self, item: ItemId) -> bool {
        self.reverse_items.contains(&item)
    }
}

/// A half-open band `[min, max)` on the score axis.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretationRange {
    pub name: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
}

impl InterpretationRange {
    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score < self.max
    }
}

/// Validated, read-only scoring key. Built once and shared by reference
/// across any number of scoring calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    domains: OrderedMap<DomainConfig>,
    ranges: Vec<InterpretationRange>,
    digest: String,
}

impl ScoringConfig {
    /// The standard BFI-2 key compiled into the binary.
    pub fn bfi2() -> std::result::Result<Self, ConfigError> {
        Self::from_toml_str(BFI2_SCORING_TOML)
    }

    pub fn from_toml_str(source: &str) -> std::result::Result<Self, ConfigError> {
        let document: ScoringDocument =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::build(document, source.as_bytes())
    }

    pub fn from_json_str(source: &str) -> std::result::Result<Self, ConfigError> {
        let document: ScoringDocument =
            serde_json::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::build(document, source.as_bytes())
    }

    pub fn from_document(document: ScoringDocument) -> std::result::Result<Self, ConfigError> {
        let canonical =
            serde_json::to_vec(&document).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::build(document, &canonical)
    }

    fn build(document: ScoringDocument, source: &[u8]) -> std::result::Result<Self, ConfigError> {
        let domain_documents = document.domains.ok_or_else(|| missing("domains"))?;
        let range_documents = document
            .interpretation
            .ok_or_else(|| missing("interpretation"))?
            .ranges
            .ok_or_else(|| missing("interpretation.ranges"))?;

        let mut domains = OrderedMap::with_capacity(domain_documents.len());
        let mut codes = HashSet::new();
        for (name, domain) in domain_documents {
            let field = format!("domains.{name}");
            let domain = validate_domain(&field, domain)?;
            if !codes.insert(domain.code.clone()) {
                return Err(ConfigError::DuplicateCode {
                    field: format!("{field}.code"),
                    code: domain.code,
                });
            }
            domains.insert(name, domain);
        }

        let ranges = validate_ranges(range_documents)?;
        warn_on_band_gaps(&ranges);

        let digest = sha256_hex(source);
        debug!(
            domains = domains.len(),
            bands = ranges.len(),
            digest = %digest,
            "loaded scoring config"
        );

        Ok(Self {
            domains,
            ranges,
            digest,
        })
    }

    pub fn domains(&self) -> &OrderedMap<DomainConfig> {
        &self.domains
    }

    pub fn domain(&self, name: &str) -> Option<&DomainConfig> {
        self.domains.get(name)
    }

    pub fn interpretation_ranges(&self) -> &[InterpretationRange] {
        &self.ranges
    }

    /// Every configured item id, ascending.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.domains
            .values()
            .flat_map(|domain| domain.items.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// SHA-256 of the document this configuration was built from.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// Loads a scoring key from disk. `.toml` files are read as TOML; anything
/// else is read as JSON.
pub fn load_scoring_config(path: &Path) -> Result<ScoringConfig> {
    if !path.exists() {
        return Err(Bfi2Error::PathNotFound(path.display().to_string()));
    }
    let source = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let loaded = if is_toml {
        ScoringConfig::from_toml_str(&source)
    } else {
        ScoringConfig::from_json_str(&source)
    };
    loaded
        .map_err(|err| match err {
            ConfigError::Parse(message) => {
                ConfigError::Parse(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
        .map_err(Bfi2Error::from)
}

fn missing(field: impl Into<String>) -> ConfigError {
    ConfigError::MissingField {
        field: field.into(),
    }
}

fn validate_domain(
    field: &str,
    domain: DomainDocument,
) -> std::result::Result<DomainConfig, ConfigError> {
    let code = domain
        .code
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .ok_or_else(|| missing(format!("{field}.code")))?;
    let items = domain
        .items
        .ok_or_else(|| missing(format!("{field}.items")))?;
    let (items, reverse_items) = validate_item_lists(field, items, domain.reverse_items)?;

    let mut facets = OrderedMap::with_capacity(domain.facets.len());
    for (facet_name, facet) in domain.facets {
        let facet_field = format!("{field}.facets.{facet_name}");
        let facet_items = facet
            .items
            .ok_or_else(|| missing(format!("{facet_field}.items")))?;
        let (items, reverse_items) =
            validate_item_lists(&facet_field, facet_items, facet.reverse_items)?;
        facets.insert(
            facet_name,
            FacetConfig {
                items,
                reverse_items,
            },
        );
    }

    check_facet_partition(field, &items, &facets)?;

    let domain = DomainConfig {
        code,
        items,
        reverse_items,
        facets,
    };
    warn_on_reverse_drift(field, &domain);
    Ok(domain)
}

fn validate_item_lists(
    field: &str,
    items: Vec<ItemId>,
    reverse: Vec<ItemId>,
) -> std::result::Result<(Vec<ItemId>, BTreeSet<ItemId>), ConfigError> {
    let items_field = format!("{field}.items");
    let reverse_field = format!("{field}.reverseItems");

    let mut seen = HashSet::with_capacity(items.len());
    for &item in &items {
        if item == 0 {
            return Err(ConfigError::InvalidItemId { field: items_field });
        }
        if !seen.insert(item) {
            return Err(ConfigError::DuplicateItem {
                field: items_field,
                item,
            });
        }
    }

    let mut reverse_items = BTreeSet::new();
    for item in reverse {
        if item == 0 {
            return Err(ConfigError::InvalidItemId {
                field: reverse_field,
            });
        }
        if !seen.contains(&item) {
            return Err(ConfigError::DanglingReverseItem {
                field: reverse_field,
                item,
            });
        }
        if !reverse_items.insert(item) {
            return Err(ConfigError::DuplicateItem {
                field: reverse_field,
                item,
            });
        }
    }

    Ok((items, reverse_items))
}

/// Facets, when declared, must split the domain's items with no overlap and
/// nothing left over.
fn check_facet_partition(
    field: &str,
    items: &[ItemId],
    facets: &OrderedMap<FacetConfig>,
) -> std::result::Result<(), ConfigError> {
    if facets.is_empty() {
        return Ok(());
    }

    let mut covered = BTreeSet::new();
    for facet in facets.values() {
        for &item in &facet.items {
            if !covered.insert(item) {
                return Err(ConfigError::OverlappingFacets {
                    field: format!("{field}.facets"),
                    item,
                });
            }
        }
    }

    let domain_items = items.iter().copied().collect::<BTreeSet<_>>();
    let uncovered = domain_items
        .symmetric_difference(&covered)
        .copied()
        .collect::<Vec<_>>();
    if !uncovered.is_empty() {
        return Err(ConfigError::FacetCoverage {
            field: format!("{field}.facets"),
            items: uncovered,
        });
    }

    Ok(())
}

fn warn_on_reverse_drift(field: &str, domain: &DomainConfig) {
    if domain.facets.is_empty() {
        return;
    }
    let facet_reverse = domain
        .facets
        .values()
        .flat_map(|facet| facet.reverse_items.iter().copied())
        .collect::<BTreeSet<_>>();
    if facet_reverse != domain.reverse_items {
        warn!(
            field,
            "domain reverseItems differ from the union of its facets' reverseItems; domain and facet scores will disagree"
        );
    }
}

fn validate_ranges(
    documents: OrderedMap<RangeDocument>,
) -> std::result::Result<Vec<InterpretationRange>, ConfigError> {
    let mut ranges = Vec::with_capacity(documents.len());
    for (name, range) in documents {
        let field = format!("interpretation.ranges.{name}");
        let label = range
            .label
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .ok_or_else(|| missing(format!("{field}.label")))?;
        let min = range.min.ok_or_else(|| missing(format!("{field}.min")))?;
        let max = range.max.ok_or_else(|| missing(format!("{field}.max")))?;
        if min > max {
            return Err(ConfigError::InvertedRange { field, min, max });
        }
        ranges.push(InterpretationRange {
            name,
            label,
            min,
            max,
        });
    }
    Ok(ranges)
}

/// Bands that leave part of `[1.0, 5.0)` uncovered still load; unmatched
/// scores fall back to a default label at lookup time.
fn warn_on_band_gaps(ranges: &[InterpretationRange]) {
    if ranges.is_empty() {
        warn!("no interpretation ranges configured; every domain will be labelled by fallback");
        return;
    }

    let mut sorted = ranges.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.min.total_cmp(&b.min));

    let mut reach = SCALE_FLOOR;
    for range in sorted {
        if range.min > reach {
            warn!(
                band = %range.name,
                from = reach,
                to = range.min,
                "interpretation ranges leave a gap"
            );
        }
        reach = reach.max(range.max);
    }
    if reach < SCALE_CEILING {
        warn!(
            from = reach,
            to = SCALE_CEILING,
            "interpretation ranges stop short of the scale ceiling"
        );
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}
