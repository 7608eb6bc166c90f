//! Static lab catalog
//!
//! The curriculum hierarchy (class -> textbooks -> experiments) and the
//! per-experiment detail records. Parsed once at start-up into an immutable
//! `Catalog` that the app owns and lends to components.

use crate::error::CatalogError;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Catalog bundled with the binary
const EMBEDDED_CATALOG: &str = include_str!("../../assets/catalog.yaml");

/// Identifiers are lower-case kebab-case, e.g. `onion-peel`
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

catalog_id!(
    /// Identifier of a class level, e.g. `class-9`
    ClassId
);
catalog_id!(
    /// Identifier of a textbook, e.g. `science-9`
    TextbookId
);
catalog_id!(
    /// Identifier of an experiment, e.g. `onion-peel`
    ExperimentId
);

// ═══════════════════════════════════════════════════════════════════════════════
// Catalog Records
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Textbook {
    pub id: TextbookId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassLevel {
    pub id: ClassId,
    pub title: String,
    #[serde(default)]
    pub textbooks: Vec<Textbook>,
}

/// Kind of lab an experiment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Microscopy,
    Chemical,
    Molecular,
    #[serde(other)]
    General,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Microscopy => "MICROSCOPY",
            Category::Chemical => "CHEMICAL",
            Category::Molecular => "MOLECULAR",
            Category::General => "GENERAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Experiment {
    pub id: ExperimentId,
    pub title: String,
    pub category: Category,
}

/// A fixed self-check question
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VivaQuestion {
    #[serde(rename = "q")]
    pub question: String,
    #[serde(rename = "a")]
    pub answer: String,
}

/// Content shown in the lab tabs. Any piece may be absent; the viewer
/// renders a placeholder for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentDetail {
    pub experiment: ExperimentId,
    pub theory: Option<String>,
    pub procedure: Vec<String>,
    pub guide: Option<String>,
    pub viva: Vec<VivaQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    #[serde(default)]
    theory: Option<String>,
    #[serde(default)]
    procedure: Vec<String>,
    #[serde(default)]
    guide: Option<String>,
    #[serde(default)]
    viva: Vec<VivaQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    classes: Vec<ClassLevel>,
    #[serde(default)]
    experiments: BTreeMap<TextbookId, Vec<Experiment>>,
    #[serde(default)]
    details: BTreeMap<ExperimentId, RawDetail>,
    #[serde(default)]
    featured: Vec<ExperimentId>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable catalog table
#[derive(Debug)]
pub struct Catalog {
    classes: Vec<ClassLevel>,
    experiments: HashMap<TextbookId, Vec<Experiment>>,
    details: HashMap<ExperimentId, ExperimentDetail>,
    featured: Vec<ExperimentId>,
}

impl Catalog {
    /// Parse the catalog bundled with the binary
    pub fn embedded() -> Result<Catalog, CatalogError> {
        Self::from_yaml_str(EMBEDDED_CATALOG)
    }

    /// Read and parse a catalog file
    pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Catalog, CatalogError> {
        let raw: RawCatalog = serde_yaml::from_str(yaml)?;
        Self::build(raw)
    }

    fn build(raw: RawCatalog) -> Result<Catalog, CatalogError> {
        let mut class_ids = HashSet::new();
        let mut textbook_ids = HashSet::new();
        for class in &raw.classes {
            check_id(class.id.as_str())?;
            if !class_ids.insert(class.id.clone()) {
                return Err(duplicate("class", class.id.as_str()));
            }
            for textbook in &class.textbooks {
                check_id(textbook.id.as_str())?;
                if !textbook_ids.insert(textbook.id.clone()) {
                    return Err(duplicate("textbook", textbook.id.as_str()));
                }
            }
        }

        let mut experiment_ids = HashSet::new();
        for (textbook, experiments) in &raw.experiments {
            if !textbook_ids.contains(textbook) {
                return Err(CatalogError::UnknownTextbook(textbook.to_string()));
            }
            for experiment in experiments {
                check_id(experiment.id.as_str())?;
                if !experiment_ids.insert(experiment.id.clone()) {
                    return Err(duplicate("experiment", experiment.id.as_str()));
                }
            }
        }

        let mut details = HashMap::with_capacity(raw.details.len());
        for (id, detail) in raw.details {
            if !experiment_ids.contains(&id) {
                return Err(CatalogError::UnknownExperiment {
                    context: "detail record",
                    id: id.to_string(),
                });
            }
            details.insert(
                id.clone(),
                ExperimentDetail {
                    experiment: id,
                    theory: detail.theory,
                    procedure: detail.procedure,
                    guide: detail.guide,
                    viva: detail.viva,
                },
            );
        }

        for id in &raw.featured {
            if !experiment_ids.contains(id) {
                return Err(CatalogError::UnknownExperiment {
                    context: "featured list",
                    id: id.to_string(),
                });
            }
        }

        Ok(Catalog {
            classes: raw.classes,
            experiments: raw.experiments.into_iter().collect(),
            details,
            featured: raw.featured,
        })
    }

    pub fn classes(&self) -> &[ClassLevel] {
        &self.classes
    }

    pub fn class(&self, id: &ClassId) -> Option<&ClassLevel> {
        self.classes.iter().find(|c| &c.id == id)
    }

    /// Experiments listed under a textbook; empty when none are defined
    pub fn experiments_for(&self, textbook: &TextbookId) -> &[Experiment] {
        self.experiments
            .get(textbook)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn experiment(&self, id: &ExperimentId) -> Option<&Experiment> {
        self.experiments
            .values()
            .flat_map(|list| list.iter())
            .find(|e| &e.id == id)
    }

    /// Detail record for an experiment, `None` when the catalog has none
    pub fn detail(&self, id: &ExperimentId) -> Option<&ExperimentDetail> {
        self.details.get(id)
    }

    /// Number of procedure steps (0 when the detail is missing)
    pub fn procedure_len(&self, id: &ExperimentId) -> usize {
        self.detail(id).map(|d| d.procedure.len()).unwrap_or(0)
    }

    /// Experiments shown on the featured screen, in catalog order
    pub fn featured(&self) -> Vec<&Experiment> {
        self.featured
            .iter()
            .filter_map(|id| self.experiment(id))
            .collect()
    }

    pub fn experiment_count(&self) -> usize {
        self.experiments.values().map(Vec::len).sum()
    }
}

fn check_id(id: &str) -> Result<(), CatalogError> {
    if ID_REGEX.is_match(id) {
        Ok(())
    } else {
        Err(CatalogError::InvalidId(id.to_string()))
    }
}

fn duplicate(kind: &'static str, id: &str) -> CatalogError {
    CatalogError::Duplicate {
        kind,
        id: id.to_string(),
    }
}
