use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One annotated puzzle: a position, the move(s) that solve it, and the
/// squares human annotators marked as salient for that solution.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub fen: String,
    #[serde(default)]
    pub response_moves: Vec<String>,
    #[serde(default)]
    pub saliency_ground_truth: Vec<String>,
    #[serde(default)]
    pub solution: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    puzzles: Vec<Puzzle>,
}

#[derive(Clone, Debug)]
pub struct PuzzleDataset {
    puzzles: Vec<Puzzle>,
}

impl PuzzleDataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset file at: {:?}", path))?;

        let raw: RawDataset = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse dataset file at: {:?}", path))?;

        Ok(Self {
            puzzles: raw.puzzles,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawDataset = serde_json::from_str(json).context("Failed to parse dataset")?;

        Ok(Self {
            puzzles: raw.puzzles,
        })
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Puzzle> {
        self.puzzles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "length": 2,
        "puzzles": [
            {
                "fen": "6k1/5ppp/8/8/8/8/1r3PPP/5RK1 w - - 0 1",
                "responseMoves": [],
                "saliencyGroundTruth": ["b2", "f1"],
                "solution": ["f1b1"]
            },
            {
                "fen": "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
                "solution": []
            }
        ]
    }"#;

    #[test]
    fn test_parses_schema() {
        let dataset = PuzzleDataset::from_json(FIXTURE).unwrap();

        assert_eq!(dataset.len(), 2);

        let first = dataset.get(0).unwrap();
        assert_eq!(first.saliency_ground_truth, vec!["b2", "f1"]);
        assert_eq!(first.solution, vec!["f1b1"]);
    }

    #[test]
    fn test_missing_optional_fields_default_empty() {
        let dataset = PuzzleDataset::from_json(FIXTURE).unwrap();
        let second = dataset.get(1).unwrap();

        assert!(second.response_moves.is_empty());
        assert!(second.saliency_ground_truth.is_empty());
    }

    #[test]
    fn test_out_of_range_index_is_none() {
        let dataset = PuzzleDataset::from_json(FIXTURE).unwrap();

        assert!(dataset.get(2).is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(PuzzleDataset::from_json("{not json").is_err());
    }
}
