//! Catalog Index: the fixed set of postings plus a TF-IDF index over their
//! descriptions. Built once at startup and shared read-only behind an `Arc`.

pub mod stop_words;
pub mod tfidf;

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::catalog::tfidf::{cosine_similarity, TfidfVectorizer, VectorizerError, MAX_FEATURES};
use crate::models::{Posting, PostingRow};

/// The built-in sample catalog, used when no `CATALOG_PATH` is configured.
pub const SAMPLE_CATALOG_CSV: &str = include_str!("../../data/internships.csv");

/// Configuration errors raised while loading the catalog. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog contains no postings")]
    Empty,

    #[error("duplicate posting id '{0}'")]
    DuplicateId(String),
}

impl From<VectorizerError> for CatalogError {
    fn from(err: VectorizerError) -> Self {
        match err {
            VectorizerError::EmptyCorpus => CatalogError::Empty,
        }
    }
}

/// Reads postings from CSV with a header row. Rows keep file order.
pub fn load_postings<R: Read>(reader: R) -> Result<Vec<Posting>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut postings = Vec::new();

    for row in csv_reader.deserialize::<PostingRow>() {
        let posting = Posting::from(row?);
        if !seen.insert(posting.id.clone()) {
            return Err(CatalogError::DuplicateId(posting.id));
        }
        postings.push(posting);
    }

    Ok(postings)
}

pub struct CatalogIndex {
    postings: Vec<Posting>,
    vectorizer: TfidfVectorizer,
    vectors: Vec<Vec<f64>>,
}

impl CatalogIndex {
    /// Fits the similarity index over the descriptions of `postings`.
    pub fn build(postings: Vec<Posting>) -> Result<Self, CatalogError> {
        if postings.is_empty() {
            return Err(CatalogError::Empty);
        }

        let descriptions: Vec<&str> = postings.iter().map(|p| p.description.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&descriptions, MAX_FEATURES)?;
        let vectors = descriptions
            .iter()
            .map(|d| vectorizer.transform(d))
            .collect();

        info!(
            postings = postings.len(),
            vocabulary = vectorizer.vocabulary_size(),
            "Catalog index built"
        );

        Ok(Self {
            postings,
            vectorizer,
            vectors,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Self::build(load_postings(reader)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_reader(SAMPLE_CATALOG_CSV.as_bytes())
    }

    /// All postings in catalog order.
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Cosine similarity of `query` against every posting description,
    /// aligned with `postings()`. Blank queries score 0 everywhere.
    pub fn similarity(&self, query: &str) -> Vec<f64> {
        if query.trim().is_empty() {
            return vec![0.0; self.postings.len()];
        }

        let query_vector = self.vectorizer.transform(query);
        self.vectors
            .iter()
            .map(|v| cosine_similarity(&query_vector, v))
            .collect()
    }
}
