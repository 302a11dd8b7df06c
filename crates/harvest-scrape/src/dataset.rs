use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ScrapeError;

const DATASETS_SERVER: &str = "https://datasets-server.huggingface.co";

/// Rows shown by default.
pub const DEFAULT_HEAD_ROWS: usize = 5;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SplitEntry {
    pub dataset: String,
    pub config: String,
    pub split: String,
}

#[derive(Debug, Deserialize)]
struct SplitsResponse {
    splits: Vec<SplitEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Feature {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Value,
}

impl Feature {
    /// Short type label: the `dtype` when present, otherwise `_type`.
    pub fn type_label(&self) -> String {
        self.kind
            .get("dtype")
            .or_else(|| self.kind.get("_type"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.kind.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct FirstRowsResponse {
    features: Vec<Feature>,
    rows: Vec<RowEntry>,
}

#[derive(Debug, Deserialize)]
struct SplitSize {
    config: String,
    split: String,
    num_rows: u64,
}

#[derive(Debug, Deserialize)]
struct DatasetSize {
    num_rows: u64,
}

#[derive(Debug, Deserialize)]
struct SizeBlock {
    dataset: DatasetSize,
    #[serde(default)]
    splits: Vec<SplitSize>,
}

#[derive(Debug, Deserialize)]
struct SizeResponse {
    size: SizeBlock,
}

#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub dataset: String,
    pub config: String,
    pub split: String,
    pub features: Vec<Feature>,
    pub head: Vec<Map<String, Value>>,
    pub num_rows: u64,
}

/// Prefer the first `train` split; fall back to whatever comes first.
pub fn choose_split(splits: &[SplitEntry]) -> Option<&SplitEntry> {
    splits
        .iter()
        .find(|s| s.split == "train")
        .or_else(|| splits.first())
}

fn split_rows(size: &SizeBlock, config: &str, split: &str) -> u64 {
    size.splits
        .iter()
        .find(|s| s.config == config && s.split == split)
        .map(|s| s.num_rows)
        .unwrap_or(size.dataset.num_rows)
}

async fn get_json<T: for<'de> Deserialize<'de>>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, ScrapeError> {
    let body = crate::get_text(client, url).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Schema, first rows and row count of a hub dataset's train split.
pub async fn inspect_dataset(
    client: &reqwest::Client,
    dataset: &str,
    head_rows: usize,
) -> Result<DatasetSummary, ScrapeError> {
    let name = urlencoding::encode(dataset);

    let splits: SplitsResponse =
        get_json(client, &format!("{DATASETS_SERVER}/splits?dataset={name}")).await?;
    let chosen = choose_split(&splits.splits)
        .cloned()
        .ok_or_else(|| ScrapeError::Shape(format!("dataset {dataset} has no splits")))?;
    tracing::debug!(config = %chosen.config, split = %chosen.split, "split selected");

    let config = urlencoding::encode(&chosen.config);
    let split = urlencoding::encode(&chosen.split);
    let first: FirstRowsResponse = get_json(
        client,
        &format!("{DATASETS_SERVER}/first-rows?dataset={name}&config={config}&split={split}"),
    )
    .await?;
    let size: SizeResponse =
        get_json(client, &format!("{DATASETS_SERVER}/size?dataset={name}")).await?;

    Ok(DatasetSummary {
        dataset: dataset.to_string(),
        num_rows: split_rows(&size.size, &chosen.config, &chosen.split),
        config: chosen.config,
        split: chosen.split,
        features: first.features,
        head: first.rows.into_iter().take(head_rows).map(|r| r.row).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(config: &str, split: &str) -> SplitEntry {
        SplitEntry {
            dataset: "demo".to_string(),
            config: config.to_string(),
            split: split.to_string(),
        }
    }

    #[test]
    fn train_split_preferred() {
        let splits = vec![entry("default", "test"), entry("default", "train")];
        assert_eq!(choose_split(&splits).unwrap().split, "train");
        let only_test = vec![entry("default", "test")];
        assert_eq!(choose_split(&only_test).unwrap().split, "test");
        assert!(choose_split(&[]).is_none());
    }

    #[test]
    fn row_count_comes_from_matching_split() {
        let size: SizeResponse = serde_json::from_str(
            r#"{"size": {"dataset": {"num_rows": 120},
                "splits": [{"config": "default", "split": "train", "num_rows": 100},
                           {"config": "default", "split": "test", "num_rows": 20}]}}"#,
        )
        .unwrap();
        assert_eq!(split_rows(&size.size, "default", "train"), 100);
        assert_eq!(split_rows(&size.size, "other", "train"), 120);
    }

    #[test]
    fn feature_labels() {
        let first: FirstRowsResponse = serde_json::from_str(
            r#"{"features": [
                    {"feature_idx": 0, "name": "text", "type": {"dtype": "string", "_type": "Value"}},
                    {"feature_idx": 1, "name": "label", "type": {"names": ["neg", "pos"], "_type": "ClassLabel"}}
                ],
                "rows": [{"row_idx": 0, "row": {"text": "hello", "label": 1}, "truncated_cells": []}]}"#,
        )
        .unwrap();
        assert_eq!(first.features[0].type_label(), "string");
        assert_eq!(first.features[1].type_label(), "ClassLabel");
        assert_eq!(first.rows[0].row["text"], "hello");
    }
}
