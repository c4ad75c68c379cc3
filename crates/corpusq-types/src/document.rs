//! Documents and the metadata fields the pipeline reasons about.

use std::collections::BTreeSet;
use std::path::Path;

/// A page number as it came back from ingestion.
///
/// Pages may be missing entirely; when present they are always normalized
/// to a plain integer before reaching the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageLabel {
    /// A known page number.
    Number(i64),
    /// No page information is available.
    NotAvailable,
}

impl PageLabel {
    /// Renders the label the way it is displayed to users and used as a
    /// dedup/sort key (`"n/a"` for missing pages).
    pub fn as_sort_key(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::NotAvailable => "n/a".to_string(),
        }
    }
}

impl std::fmt::Display for PageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::NotAvailable => write!(f, "n/a"),
        }
    }
}

impl From<Option<i64>> for PageLabel {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(n) => Self::Number(n),
            None => Self::NotAvailable,
        }
    }
}

/// Recognized per-chunk metadata produced by ingestion.
///
/// Ingestion is out of scope for this crate; this struct is the stable
/// contract the pipeline consumes. Unrecognized keys ingestion may attach
/// are not modeled here — the pipeline only ever reasons about the fields
/// below.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DocumentMetadata {
    /// Source path or filename the chunk was extracted from.
    pub source: Option<String>,
    /// Page number within the source, when known.
    pub page: Option<i64>,
    /// Curator-assigned document type (spec, guide, whitepaper, runbook, ...).
    pub doc_type: Option<String>,
    /// Curator-assigned domain (e.g. `mqtt`, `aws_iot`).
    pub domain: Option<String>,
    /// Curator-assigned vendor (e.g. `aws`, `oasis`).
    pub vendor: Option<String>,
    /// Curator-assigned product (e.g. `mqtt`, `iot_core`).
    pub product: Option<String>,
    /// Curator-assigned version string.
    pub version: Option<String>,
    /// Document title, if known.
    pub title: Option<String>,
    /// Section heading the chunk belongs to, if known.
    pub section: Option<String>,
    /// Canonical entity keys attached by ingestion (e.g. `mqtt`, `aws_iot_jobs`).
    pub entities: BTreeSet<String>,
}

impl DocumentMetadata {
    /// Returns the basename of `source`, or `"unknown"` when absent.
    pub fn filename(&self) -> String {
        match &self.source {
            Some(s) => Path::new(s)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| s.clone()),
            None => "unknown".to_string(),
        }
    }

    /// Returns the normalized page label for this chunk.
    pub fn page_label(&self) -> PageLabel {
        PageLabel::from(self.page)
    }
}

/// An immutable record produced by ingestion.
///
/// Identity for deduplication purposes is `(source, page, content)`; the
/// pipeline never mutates a document, it only filters, groups, and re-orders
/// references to them.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Document {
    /// The text payload. Never empty in practice, but the pipeline does not
    /// assume non-emptiness beyond what ingestion guarantees.
    pub content: String,
    /// Recognized metadata fields for this chunk.
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Creates a document from content and metadata.
    pub fn new(content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Returns `(filename, page_label)`, the identity used for source
    /// deduplication and option/companion selection throughout the pipeline.
    pub fn source_signature(&self) -> (String, PageLabel) {
        (self.metadata.filename(), self.metadata.page_label())
    }

    /// Returns true if `self` and `other` were extracted from the same
    /// source file (ignoring page). Two documents with no known source are
    /// never considered the same file.
    pub fn is_same_file(&self, other: &Self) -> bool {
        match (&self.metadata.source, &other.metadata.source) {
            (Some(_), Some(_)) => self.metadata.filename() == other.metadata.filename(),
            _ => false,
        }
    }

    /// Clips `content` to at most `max_chars` characters, trimmed of
    /// surrounding whitespace. Used by the anchor-content tie-breaker, which
    /// only needs a representative excerpt of each bucket anchor.
    pub fn clipped_content(&self, max_chars: usize) -> String {
        let trimmed = self.content.trim();
        if trimmed.chars().count() > max_chars {
            trimmed.chars().take(max_chars).collect()
        } else {
            trimmed.to_string()
        }
    }
}

/// A candidate document plus its L2 distance from the query embedding.
///
/// Smaller distance is a better match. Lists of `ScoredDocument` are always
/// sorted ascending by distance, with ties broken by original vector-store
/// insertion order; no stage re-sorts on a secondary key.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    /// The candidate document.
    pub doc: Document,
    /// L2 distance from the query embedding; smaller is more similar.
    pub distance: f64,
}

impl ScoredDocument {
    /// Creates a scored document.
    pub fn new(doc: Document, distance: f64) -> Self {
        Self { doc, distance }
    }
}

/// A deduplicated `(filename, page)` reference shown to users as a citation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SourceRef {
    /// Source filename.
    pub filename: String,
    /// Page label, rendered as `"n/a"` when unknown.
    #[serde(serialize_with = "serialize_page_label")]
    pub page: PageLabel,
}

impl SourceRef {
    /// Creates a source reference from a document.
    pub fn from_document(doc: &Document) -> Self {
        let (filename, page) = doc.source_signature();
        Self { filename, page }
    }

    /// The `(filename, page-as-string)` key used for deduplication and for
    /// the stable `(filename, str(page))` sort citations are shown in.
    pub fn sort_key(&self) -> (String, String) {
        (self.filename.clone(), self.page.as_sort_key())
    }
}

fn serialize_page_label<S>(page: &PageLabel, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match page {
        PageLabel::Number(n) => serializer.serialize_i64(*n),
        PageLabel::NotAvailable => serializer.serialize_str("n/a"),
    }
}

/// Deduplicates documents by `(filename, page)` and returns the collected
/// `SourceRef`s, stably sorted by `(filename, str(page))`, matching the
/// sort order every `RetrievalOption` presents its sources in.
pub fn collect_sources(docs: &[Document]) -> Vec<SourceRef> {
    let mut seen = std::collections::BTreeSet::new();
    let mut out = Vec::new();

    for doc in docs {
        let source = SourceRef::from_document(doc);
        let key = (source.filename.clone(), source.page.as_sort_key());
        if seen.insert(key) {
            out.push(source);
        }
    }

    out.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    out
}
