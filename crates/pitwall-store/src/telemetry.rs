//! Precomputed per-driver telemetry summaries.
//!
//! File layout: driver number → records, e.g.
//! `{"44": [{"lap": 30, "meta": {"summary": "..."}, "score": 0.9}]}`.

use std::collections::HashMap;
use std::path::Path;

use pitwall_core::{EvidenceItem, TelemetryEvidence};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::StoreError;
use crate::error::read_json;

/// Sort score for records that carry none.
const DEFAULT_RECORD_SCORE: f64 = 1.0;

/// One telemetry summary for a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    #[serde(default)]
    pub lap: Option<i64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, alias = "metadata", deserialize_with = "null_as_empty")]
    pub meta: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl TelemetryRecord {
    fn sort_score(&self) -> f64 {
        self.score.unwrap_or(DEFAULT_RECORD_SCORE)
    }

    fn to_evidence(&self) -> EvidenceItem {
        EvidenceItem::Telemetry(TelemetryEvidence {
            lap: self.lap,
            score: self.score,
            text: self.text.clone(),
            source: self.source.clone(),
            metadata: self.meta.clone(),
        })
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Map<String, Value>, D::Error> {
    Ok(Option::<Map<String, Value>>::deserialize(d)?.unwrap_or_default())
}

/// Read-only map from driver key to telemetry records.
#[derive(Debug, Clone, Default)]
pub struct TelemetryIndex {
    records: HashMap<String, Vec<TelemetryRecord>>,
}

impl TelemetryIndex {
    pub fn new(records: HashMap<String, Vec<TelemetryRecord>>) -> Self {
        Self { records }
    }

    /// Load the index from a JSON file.
    ///
    /// Only an unreadable file or a top level that is not an object is an
    /// error. A driver whose value is not a list, or a record that does not
    /// parse, is skipped with a warning and the rest of the index is kept.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw: Map<String, Value> = read_json(path)?;
        let mut records = HashMap::with_capacity(raw.len());
        let mut skipped = 0;
        for (entity, value) in raw {
            let Value::Array(values) = value else {
                warn!(%entity, "skipping telemetry entry that is not a list");
                continue;
            };
            let mut parsed = Vec::with_capacity(values.len());
            for value in values {
                match serde_json::from_value::<TelemetryRecord>(value) {
                    Ok(record) => parsed.push(record),
                    Err(e) => {
                        skipped += 1;
                        warn!(%entity, error = %e, "skipping malformed telemetry record");
                    }
                }
            }
            records.insert(entity, parsed);
        }

        let total: usize = records.values().map(Vec::len).sum();
        info!(
            entities = records.len(),
            records = total,
            skipped,
            path = %path.display(),
            "loaded telemetry index"
        );
        Ok(Self { records })
    }

    pub fn entity_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Top `top_k` records for a driver, highest score first.
    ///
    /// With a `lap`, records for exactly that lap are preferred. If the driver
    /// has none for that lap, all of the driver's records are ranked instead:
    /// approximate relevance beats returning nothing.
    pub fn retrieve(
        &self,
        entity_key: Option<&str>,
        lap: Option<i64>,
        top_k: usize,
    ) -> Vec<EvidenceItem> {
        let Some(hits) = entity_key.and_then(|key| self.records.get(key.trim())) else {
            return Vec::new();
        };
        if hits.is_empty() {
            return Vec::new();
        }

        let mut selected: Vec<&TelemetryRecord> = match lap {
            Some(lap) => hits.iter().filter(|r| r.lap == Some(lap)).collect(),
            None => Vec::new(),
        };
        if selected.is_empty() {
            if lap.is_some() {
                debug!(?entity_key, ?lap, "no records for lap, using all laps");
            }
            selected = hits.iter().collect();
        }

        selected.sort_by(|a, b| b.sort_score().total_cmp(&a.sort_score()));
        selected.truncate(top_k);
        selected
            .into_iter()
            .map(TelemetryRecord::to_evidence)
            .collect()
    }
}
