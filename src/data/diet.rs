use std::{collections::HashMap, io::Read, path::Path};

use crate::foundation::error::{SketchError, SketchResult};

/// Balance beyond which a category counts as surplus (or, negated, deficit).
pub const DEFAULT_BALANCE_THRESHOLD: f64 = 150.0;

/// Header names of the three columns the chart reads.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DietColumns {
    pub category: String,
    pub intake: String,
    pub burn: String,
}

impl Default for DietColumns {
    fn default() -> Self {
        Self {
            category: "diet_type".to_string(),
            intake: "Calories".to_string(),
            burn: "Calories_Burned".to_string(),
        }
    }
}

/// One observation row.
#[derive(Clone, Debug, PartialEq)]
pub struct DietRecord {
    pub category: String,
    pub intake: f64,
    pub burn: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Balanced,
    Surplus,
    Deficit,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Surplus => "surplus",
            Self::Deficit => "deficit",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category averages; immutable once computed.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DietSummary {
    pub name: String,
    pub mean_intake: f64,
    pub mean_burn: f64,
    pub balance: f64,
    pub classification: Classification,
}

/// Strictly above `threshold` is surplus, strictly below `-threshold` is deficit.
pub fn classify(balance: f64, threshold: f64) -> Classification {
    if balance > threshold {
        Classification::Surplus
    } else if balance < -threshold {
        Classification::Deficit
    } else {
        Classification::Balanced
    }
}

/// Read records from CSV with a header row; columns other than `cols` are ignored.
pub fn parse_diet_csv<R: Read>(reader: R, cols: &DietColumns) -> SketchResult<Vec<DietRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| SketchError::data(format!("failed to read csv header: {e}")))?
        .clone();
    let column = |name: &str| -> SketchResult<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SketchError::data(format!("csv is missing column '{name}'")))
    };
    let category_i = column(&cols.category)?;
    let intake_i = column(&cols.intake)?;
    let burn_i = column(&cols.burn)?;

    let mut out = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        // header is line 1
        let line = i + 2;
        let row = row.map_err(|e| SketchError::data(format!("csv line {line}: {e}")))?;
        let field = |idx: usize, name: &str| -> SketchResult<&str> {
            row.get(idx)
                .ok_or_else(|| SketchError::data(format!("csv line {line}: missing '{name}'")))
        };
        let number = |idx: usize, name: &str| -> SketchResult<f64> {
            let raw = field(idx, name)?;
            let v = raw.parse::<f64>().map_err(|e| {
                SketchError::data(format!("csv line {line}: '{name}' = '{raw}': {e}"))
            })?;
            if !v.is_finite() {
                return Err(SketchError::data(format!(
                    "csv line {line}: '{name}' is not finite"
                )));
            }
            Ok(v)
        };

        out.push(DietRecord {
            category: field(category_i, &cols.category)?.to_string(),
            intake: number(intake_i, &cols.intake)?,
            burn: number(burn_i, &cols.burn)?,
        });
    }
    Ok(out)
}

#[tracing::instrument(skip(cols), fields(path = %path.display()))]
pub fn load_diet_csv(path: &Path, cols: &DietColumns) -> SketchResult<Vec<DietRecord>> {
    let file = std::fs::File::open(path).map_err(|e| {
        SketchError::data(format!("failed to open dataset '{}': {e}", path.display()))
    })?;
    let records = parse_diet_csv(std::io::BufReader::new(file), cols)?;
    tracing::debug!(rows = records.len(), "dataset loaded");
    Ok(records)
}

/// Group by category in first-seen order and compute per-category means and balance.
pub fn summarize(records: &[DietRecord], threshold: f64) -> Vec<DietSummary> {
    struct Acc {
        name: String,
        intake_sum: f64,
        burn_sum: f64,
        n: u32,
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Acc> = Vec::new();
    for r in records {
        let slot = *index.entry(r.category.as_str()).or_insert_with(|| {
            groups.push(Acc {
                name: r.category.clone(),
                intake_sum: 0.0,
                burn_sum: 0.0,
                n: 0,
            });
            groups.len() - 1
        });
        if let Some(acc) = groups.get_mut(slot) {
            acc.intake_sum += r.intake;
            acc.burn_sum += r.burn;
            acc.n += 1;
        }
    }

    groups
        .into_iter()
        .map(|acc| {
            let n = f64::from(acc.n.max(1));
            let mean_intake = acc.intake_sum / n;
            let mean_burn = acc.burn_sum / n;
            let balance = mean_intake - mean_burn;
            DietSummary {
                name: acc.name,
                mean_intake,
                mean_burn,
                balance,
                classification: classify(balance, threshold),
            }
        })
        .collect()
}

/// Largest absolute balance across categories, `0.0` when empty.
pub fn max_abs_balance(summaries: &[DietSummary]) -> f64 {
    summaries
        .iter()
        .map(|d| d.balance.abs())
        .fold(0.0, f64::max)
}

/// Whether the chart has something to draw.
#[derive(Clone, Debug, PartialEq)]
pub enum DataState {
    Loaded(Vec<DietSummary>),
    Unavailable { reason: String },
}

impl DataState {
    /// Summarize a load result; failures become [`DataState::Unavailable`] and are logged.
    pub fn from_load(result: SketchResult<Vec<DietRecord>>, threshold: f64) -> Self {
        match result {
            Ok(records) if records.is_empty() => {
                tracing::warn!("dataset has no rows; chart will be empty");
                Self::Unavailable {
                    reason: "dataset has no rows".to_string(),
                }
            }
            Ok(records) => Self::Loaded(summarize(&records, threshold)),
            Err(e) => {
                tracing::warn!(error = %e, "dataset unavailable; chart will be empty");
                Self::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn summaries(&self) -> &[DietSummary] {
        match self {
            Self::Loaded(s) => s,
            Self::Unavailable { .. } => &[],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/diet.rs"]
mod tests;
