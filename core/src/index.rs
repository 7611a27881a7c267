use crate::query::{parse_query, Operator, ParsedQuery};
use crate::tokenizer::unique_terms;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

pub type DocId = u64;

/// One row of the term listing: a term and the sorted IDs of documents containing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub term: String,
    pub doc_ids: Vec<DocId>,
}

/// One row of the document listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentEntry {
    pub doc_id: DocId,
    pub text: String,
}

#[derive(Debug, Clone)]
struct StoredDocument {
    text: String,
    /// Distinct terms of `text`, captured at insert time and used to prune on delete.
    terms: HashSet<String>,
}

/// In-memory inverted index over a document store.
///
/// Every term in the index maps to a non-empty set of IDs, and every such ID
/// is present in the store with text containing that term.
#[derive(Debug, Default)]
pub struct SearchEngine {
    documents: HashMap<DocId, StoredDocument>,
    index: HashMap<String, HashSet<DocId>>,
    next_doc_id: DocId,
}

impl SearchEngine {
    pub fn new() -> Self { Self::default() }

    /// Add `text` under `doc_id`, or under the next free auto ID when none is given.
    ///
    /// An existing document with the same ID is deleted first, so re-adding
    /// replaces its text and terms entirely. Returns the ID used.
    pub fn add_document(&mut self, text: impl Into<String>, doc_id: Option<DocId>) -> DocId {
        let doc_id = match doc_id {
            Some(id) => id,
            None => self.allocate_id(),
        };

        if self.documents.contains_key(&doc_id) {
            warn!(doc_id, "document already exists, deleting and re-adding");
            self.delete_document(doc_id);
        }

        let text = text.into();
        let terms = unique_terms(&text);
        for term in &terms {
            self.index.entry(term.clone()).or_default().insert(doc_id);
        }
        debug!(doc_id, terms = terms.len(), "document added");
        self.documents.insert(doc_id, StoredDocument { text, terms });
        doc_id
    }

    /// Remove a document and prune it from every posting set. Returns `false`
    /// if the ID was not present.
    pub fn delete_document(&mut self, doc_id: DocId) -> bool {
        let Some(doc) = self.documents.remove(&doc_id) else {
            return false;
        };

        for term in &doc.terms {
            if let Some(postings) = self.index.get_mut(term) {
                postings.remove(&doc_id);
                if postings.is_empty() {
                    self.index.remove(term);
                }
            }
        }
        debug!(doc_id, terms = doc.terms.len(), "document deleted");
        true
    }

    /// Run a boolean query and return matching documents keyed by ID.
    pub fn search(&self, query: &str) -> BTreeMap<DocId, String> {
        let parsed = parse_query(query);
        let results: BTreeMap<DocId, String> = self
            .evaluate(&parsed)
            .into_iter()
            .filter_map(|id| self.documents.get(&id).map(|doc| (id, doc.text.clone())))
            .collect();
        debug!(query, operator = ?parsed.operator, terms = ?parsed.terms, hits = results.len(), "search");
        results
    }

    /// Evaluate a parsed query to the set of matching IDs.
    ///
    /// The first term seeds the result; AND intersects and OR unions with each
    /// following term. Unknown terms contribute the empty set.
    pub fn evaluate(&self, query: &ParsedQuery) -> BTreeSet<DocId> {
        let Some((first, rest)) = query.terms.split_first() else {
            return BTreeSet::new();
        };
        let mut result: HashSet<DocId> = self.index.get(first).cloned().unwrap_or_default();

        match query.operator {
            Operator::And => {
                for term in rest {
                    if result.is_empty() {
                        break;
                    }
                    match self.index.get(term) {
                        Some(postings) => result.retain(|id| postings.contains(id)),
                        None => result.clear(),
                    }
                }
            }
            Operator::Or => {
                for term in rest {
                    if let Some(postings) = self.index.get(term) {
                        result.extend(postings.iter().copied());
                    }
                }
            }
        }

        result.into_iter().collect()
    }

    pub fn get_document(&self, doc_id: DocId) -> Option<&str> {
        self.documents.get(&doc_id).map(|doc| doc.text.as_str())
    }

    pub fn contains(&self, doc_id: DocId) -> bool { self.documents.contains_key(&doc_id) }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn num_terms(&self) -> usize { self.index.len() }

    /// The ID the next auto-assigned document would get, ignoring occupancy.
    pub fn next_doc_id(&self) -> DocId { self.next_doc_id }

    /// Sorted document IDs for `term`, or `None` if the term is not indexed.
    pub fn postings(&self, term: &str) -> Option<Vec<DocId>> {
        self.index.get(term).map(sorted_ids)
    }

    /// All terms in ascending order with their sorted posting lists.
    pub fn index_listing(&self) -> Vec<IndexEntry> {
        let mut entries: Vec<IndexEntry> = self
            .index
            .iter()
            .map(|(term, ids)| IndexEntry { term: term.clone(), doc_ids: sorted_ids(ids) })
            .collect();
        entries.sort_by(|a, b| a.term.cmp(&b.term));
        entries
    }

    /// All stored documents in ascending ID order.
    pub fn document_listing(&self) -> Vec<DocumentEntry> {
        let mut entries: Vec<DocumentEntry> = self
            .documents
            .iter()
            .map(|(&doc_id, doc)| DocumentEntry { doc_id, text: doc.text.clone() })
            .collect();
        entries.sort_by_key(|e| e.doc_id);
        entries
    }

    /// Verify that the store and the index agree with each other.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        for (term, ids) in &self.index {
            if ids.is_empty() {
                return Err(ConsistencyError::EmptyPostings { term: term.clone() });
            }
            for &doc_id in ids {
                match self.documents.get(&doc_id) {
                    None => return Err(ConsistencyError::DanglingPosting { term: term.clone(), doc_id }),
                    Some(doc) if !doc.terms.contains(term) => {
                        return Err(ConsistencyError::StalePosting { term: term.clone(), doc_id })
                    }
                    Some(_) => {}
                }
            }
        }
        for (&doc_id, doc) in &self.documents {
            if unique_terms(&doc.text) != doc.terms {
                return Err(ConsistencyError::TermsOutOfDate { doc_id });
            }
            for term in &doc.terms {
                if !self.index.get(term).is_some_and(|ids| ids.contains(&doc_id)) {
                    return Err(ConsistencyError::MissingPosting { term: term.clone(), doc_id });
                }
            }
        }
        Ok(())
    }

    /// Next unused auto ID. The counter only moves forward and skips IDs
    /// already taken by explicitly numbered documents.
    fn allocate_id(&mut self) -> DocId {
        while self.documents.contains_key(&self.next_doc_id) {
            self.next_doc_id += 1;
        }
        let id = self.next_doc_id;
        self.next_doc_id += 1;
        id
    }
}

fn sorted_ids(ids: &HashSet<DocId>) -> Vec<DocId> {
    let mut v: Vec<DocId> = ids.iter().copied().collect();
    v.sort_unstable();
    v
}

/// A disagreement between the document store and the inverted index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    EmptyPostings { term: String },
    DanglingPosting { term: String, doc_id: DocId },
    StalePosting { term: String, doc_id: DocId },
    MissingPosting { term: String, doc_id: DocId },
    TermsOutOfDate { doc_id: DocId },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPostings { term } => write!(f, "term '{term}' has an empty posting set"),
            Self::DanglingPosting { term, doc_id } => {
                write!(f, "term '{term}' lists document {doc_id} which is not stored")
            }
            Self::StalePosting { term, doc_id } => {
                write!(f, "term '{term}' lists document {doc_id} which does not contain it")
            }
            Self::MissingPosting { term, doc_id } => {
                write!(f, "document {doc_id} contains '{term}' but is missing from its postings")
            }
            Self::TermsOutOfDate { doc_id } => write!(f, "cached terms of document {doc_id} do not match its text"),
        }
    }
}

impl std::error::Error for ConsistencyError {}
