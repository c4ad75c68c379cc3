//! Tag signatures used to cluster candidates into buckets.

use crate::document::{Document, DocumentMetadata};

/// A fixed-arity tuple of optional, lower-cased curator tags.
///
/// The *core* form uses `(domain, doc_type, product)`; the *strict* form
/// adds `(vendor, version)`. A signature whose fields are all `None` is
/// replaced by a synthetic `__file__:<basename>` domain so every source file
/// still forms its own bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagSignature {
    domain: Option<String>,
    doc_type: Option<String>,
    product: Option<String>,
    vendor: Option<String>,
    version: Option<String>,
    strict: bool,
}

impl TagSignature {
    /// Builds the core `(domain, doc_type, product)` signature for a
    /// document, applying the `__file__:<basename>` fallback when every
    /// field is null.
    pub fn core(doc: &Document) -> Self {
        Self::build(&doc.metadata, false, &doc.metadata.filename())
    }

    /// Builds the strict `(domain, doc_type, product, vendor, version)`
    /// signature for a document, applying the same fallback.
    pub fn strict(doc: &Document) -> Self {
        Self::build(&doc.metadata, true, &doc.metadata.filename())
    }

    /// Builds either form depending on `strict_mode`.
    pub fn for_document(doc: &Document, strict_mode: bool) -> Self {
        if strict_mode {
            Self::strict(doc)
        } else {
            Self::core(doc)
        }
    }

    fn build(meta: &DocumentMetadata, strict: bool, filename: &str) -> Self {
        let normalize = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
        };

        let domain = normalize(&meta.domain);
        let doc_type = normalize(&meta.doc_type);
        let product = normalize(&meta.product);
        let vendor = if strict { normalize(&meta.vendor) } else { None };
        let version = if strict { normalize(&meta.version) } else { None };

        let all_null = domain.is_none()
            && doc_type.is_none()
            && product.is_none()
            && vendor.is_none()
            && version.is_none();

        if all_null {
            Self {
                domain: Some(format!("__file__:{filename}")),
                doc_type: None,
                product: None,
                vendor: None,
                version: None,
                strict,
            }
        } else {
            Self {
                domain,
                doc_type,
                product,
                vendor,
                version,
                strict,
            }
        }
    }

    /// Renders the signature as `"domain: X; doc_type: Y; product: Z"`,
    /// omitting null fields, falling back to `"signature: unknown"` when
    /// every field is null (which only happens for a signature built
    /// directly rather than through [`TagSignature::core`]/[`strict`]).
    pub fn render_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(v) = &self.domain {
            parts.push(format!("domain: {v}"));
        }
        if let Some(v) = &self.doc_type {
            parts.push(format!("doc_type: {v}"));
        }
        if let Some(v) = &self.product {
            parts.push(format!("product: {v}"));
        }
        if self.strict {
            if let Some(v) = &self.vendor {
                parts.push(format!("vendor: {v}"));
            }
            if let Some(v) = &self.version {
                parts.push(format!("version: {v}"));
            }
        }

        if parts.is_empty() {
            "signature: unknown".to_string()
        } else {
            parts.join("; ")
        }
    }

    /// True if this is the synthetic per-file fallback signature.
    pub fn is_file_fallback(&self) -> bool {
        self.domain
            .as_deref()
            .is_some_and(|d| d.starts_with("__file__:"))
    }
}
