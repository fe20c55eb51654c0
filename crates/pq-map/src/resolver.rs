//! Fuzzy keyword resolution of raw headers to logical columns.

use std::collections::BTreeMap;

use pq_model::{AnalysisConfig, KeywordSpec, MatchMode};
use tracing::{debug, warn};

use crate::error::Result;
use crate::normalize::{normalize, word_count};
use crate::types::{ColumnCandidate, ColumnMapping, MappingLogEntry, NOT_FOUND, Resolution};

/// Resolves keyword specs against one header row.
///
/// Headers are normalized once at construction; every lookup afterwards is a
/// pure function of the cached keys and the spec.
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    headers: Vec<String>,
    normalized: Vec<String>,
    preference: Vec<String>,
}

impl ColumnResolver {
    /// Creates a resolver with the default aggregation preference used for
    /// specs that carry none of their own.
    pub fn new<S: AsRef<str>>(headers: Vec<String>, preference: &[S]) -> Self {
        let normalized = headers.iter().map(|h| normalize(h)).collect();
        Self {
            headers,
            normalized,
            preference: normalize_terms(preference),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn normalized(&self) -> &[String] {
        &self.normalized
    }

    /// Eligible headers for `spec`, best first.
    pub fn candidates(&self, spec: &KeywordSpec) -> Vec<ColumnCandidate> {
        let keywords = normalize_terms(&spec.keywords);
        if keywords.is_empty() {
            return Vec::new();
        }
        let own_preference = spec.prefer.as_deref().map(normalize_terms);
        let preference = own_preference.as_deref().unwrap_or(&self.preference);

        let mut candidates: Vec<ColumnCandidate> = self
            .normalized
            .iter()
            .enumerate()
            .filter(|(_, key)| matches(key, &keywords, spec.mode))
            .map(|(index, key)| ColumnCandidate {
                score: preference_score(key, preference),
                specificity: word_count(key),
                index,
            })
            .collect();
        candidates.sort_by(ColumnCandidate::rank);
        candidates
    }

    /// Best physical index for `spec`, if any header qualifies.
    pub fn find_column(&self, spec: &KeywordSpec) -> Option<usize> {
        self.candidates(spec).first().map(|c| c.index)
    }

    /// Resolves every spec independently and builds the sorted audit log.
    pub fn resolve(&self, specs: &[KeywordSpec]) -> Resolution {
        let mut mapping = ColumnMapping::new();
        for spec in specs {
            let index = self.find_column(spec);
            match index {
                Some(i) => debug!(
                    logical = %spec.name,
                    index = i,
                    header = %self.headers[i],
                    "mapped column"
                ),
                None => warn!(
                    logical = %spec.name,
                    keywords = ?spec.keywords,
                    "no column matched keywords"
                ),
            }
            mapping.set(&spec.name, index);
        }

        let mut claims: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for (name, index) in mapping.resolved() {
            claims.entry(index).or_default().push(name);
        }
        for (index, names) in claims.iter().filter(|(_, names)| names.len() > 1) {
            debug!(index, logical = ?names, "column claimed by several logical names");
        }

        let log = mapping
            .iter()
            .map(|(name, index)| self.log_entry(name, index))
            .collect();
        Resolution { mapping, log }
    }

    fn log_entry(&self, name: &str, index: Option<usize>) -> MappingLogEntry {
        match index {
            Some(i) => MappingLogEntry {
                target: name.to_string(),
                source: self.headers[i].clone(),
                index: i64::try_from(i).unwrap_or(i64::MAX),
            },
            None => MappingLogEntry {
                target: name.to_string(),
                source: NOT_FOUND.to_string(),
                index: -1,
            },
        }
    }
}

/// Resolves `specs` against `headers` using `preference` as the default
/// aggregation preference.
pub fn resolve<S: AsRef<str>>(
    headers: &[String],
    specs: &[KeywordSpec],
    preference: &[S],
) -> Resolution {
    ColumnResolver::new(headers.to_vec(), preference).resolve(specs)
}

/// Resolves with the configured specs and checks the required columns.
pub fn resolve_columns(headers: &[String], config: &AnalysisConfig) -> Result<Resolution> {
    let resolution = resolve(
        headers,
        &config.keyword_specs,
        &config.aggregation_preference,
    );
    resolution.ensure_required(&config.required_columns)?;
    Ok(resolution)
}

fn normalize_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(|term| normalize(term.as_ref()))
        .filter(|term| !term.is_empty())
        .collect()
}

fn matches(key: &str, keywords: &[String], mode: MatchMode) -> bool {
    match mode {
        MatchMode::All => keywords.iter().all(|k| key.contains(k.as_str())),
        MatchMode::Any => keywords.iter().any(|k| key.contains(k.as_str())),
    }
}

/// `len(preference) - rank` of the first term found in `key`, or 0.
fn preference_score(key: &str, preference: &[String]) -> usize {
    preference
        .iter()
        .position(|term| key.contains(term.as_str()))
        .map_or(0, |rank| preference.len() - rank)
}
