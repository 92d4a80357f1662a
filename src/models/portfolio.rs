use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// A named collection of holdings belonging to one user, as returned by the
// portfolio-listing API. Immutable for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub portfolio_id: Uuid,
    pub name: String,
}

/// One per-holding prediction record. The upstream schema guarantees the three
/// price/quantity fields; any further columns are carried through untouched so
/// the full record can be embedded in the prompt CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRow {
    pub purchase_price: f64,
    pub current_price: f64,
    pub quantity: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A prediction row tagged after fetch with its owning portfolio. Rows are
/// never mutated beyond this tagging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedPrediction {
    pub portfolio_id: Uuid,
    pub portfolio_name: String,
    #[serde(flatten)]
    pub row: PredictionRow,
}

/// The flat concatenation of all prediction rows across all of one user's
/// portfolios, held in memory for the session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioTable {
    rows: Vec<TaggedPrediction>,
}

impl PortfolioTable {
    pub fn new(rows: Vec<TaggedPrediction>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TaggedPrediction] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TaggedPrediction> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Distinct portfolio names in order of first appearance.
    pub fn portfolio_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut names = Vec::new();
        for tagged in &self.rows {
            if seen.insert(tagged.portfolio_name.clone()) {
                names.push(tagged.portfolio_name.clone());
            }
        }
        names
    }

    pub fn filter_by_name(&self, portfolio_name: &str) -> PortfolioTable {
        PortfolioTable {
            rows: self
                .rows
                .iter()
                .filter(|t| t.portfolio_name == portfolio_name)
                .cloned()
                .collect(),
        }
    }

    /// Serializes the full table as CSV. The header row is always present,
    /// so an empty table still exposes the `portfolio_name` column and
    /// downstream code can detect the empty state without raising.
    pub fn to_csv(&self) -> String {
        self.write_csv().unwrap_or_default()
    }

    fn write_csv(&self) -> csv::Result<String> {
        let mut extra_cols: BTreeSet<&str> = BTreeSet::new();
        for tagged in &self.rows {
            extra_cols.extend(tagged.row.extra.keys().map(String::as_str));
        }

        let mut header = vec![
            "portfolio_id".to_string(),
            "portfolio_name".to_string(),
            "purchase_price".to_string(),
            "current_price".to_string(),
            "quantity".to_string(),
        ];
        header.extend(extra_cols.iter().map(|c| c.to_string()));

        let mut buf = Vec::new();
        {
            let mut wtr = csv::Writer::from_writer(&mut buf);
            wtr.write_record(&header)?;
            for tagged in &self.rows {
                let mut record = vec![
                    tagged.portfolio_id.to_string(),
                    tagged.portfolio_name.clone(),
                    tagged.row.purchase_price.to_string(),
                    tagged.row.current_price.to_string(),
                    tagged.row.quantity.to_string(),
                ];
                for col in &extra_cols {
                    record.push(
                        tagged
                            .row
                            .extra
                            .get(*col)
                            .map(render_value)
                            .unwrap_or_default(),
                    );
                }
                wtr.write_record(&record)?;
            }
            wtr.flush()?;
        }

        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
