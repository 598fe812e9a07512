//! Test fixtures for finalization golden assertions
//!
//! - Finalization corpus (schema → expected config cases)
//! - A realistic multi-process pipeline schema

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Path to the finalization corpus fixture
pub fn finalize_corpus_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/finalize_corpus/corpus.json")
}

/// Path to the full pipeline schema fixture
pub fn pipeline_schema_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pipeline_schema.json")
}

/// One schema/expectation pair from corpus.json
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FinalizeTestCase {
    pub id: String,
    pub description: String,
    pub schema: serde_json::Value,
    pub expected: serde_json::Value,
}

/// Full finalization corpus
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FinalizeCorpus {
    pub version: u32,
    pub test_cases: Vec<FinalizeTestCase>,
}

impl FinalizeCorpus {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(finalize_corpus_path())?;
        Ok(serde_json::from_str(&content)?)
    }
}
