use crate::query::parser::{Operator, QueryToken, parse_query, query_terms};
use crate::query::vector;
use crate::store::DocumentStore;
use anyhow::{Result, bail};
use std::collections::HashSet;

/// Similarity cutoff for vector search. The comparison is strictly
/// greater-than: a document scoring exactly the threshold is excluded.
pub const SIMILARITY_THRESHOLD: f32 = 0.2;

/// Retrieval strategy selected per search call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Whitespace terms intersected; every term must match
    Boolean,
    /// Left-to-right fold with and/or/not operators between terms
    ExtendedBoolean,
    /// TF-IDF cosine similarity against the query
    Vector,
}

impl SearchStrategy {
    /// Resolve a strategy from its wire name. An unknown name is an
    /// invalid-argument error, never an empty result.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "boolean" => Ok(SearchStrategy::Boolean),
            "extended_boolean" => Ok(SearchStrategy::ExtendedBoolean),
            "vector" => Ok(SearchStrategy::Vector),
            _ => bail!("Invalid search strategy: {}", name),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchStrategy::Boolean => "boolean",
            SearchStrategy::ExtendedBoolean => "extended_boolean",
            SearchStrategy::Vector => "vector",
        }
    }
}

/// Search front end over one document store.
///
/// Every call re-reads the store, so results always reflect the current
/// committed corpus. Finding nothing is an `Ok` empty list; only storage
/// failures and invalid strategies are errors.
pub struct SearchEngine<'a> {
    store: &'a DocumentStore,
}

impl<'a> SearchEngine<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Run `query` under the given strategy
    pub fn search(&self, query: &str, strategy: SearchStrategy) -> Result<Vec<String>> {
        match strategy {
            SearchStrategy::Boolean => self.boolean_search(query),
            SearchStrategy::ExtendedBoolean => self.extended_boolean_search(query),
            SearchStrategy::Vector => self.vector_search(query),
        }
    }

    /// AND-only retrieval: the source paths matching every whitespace term
    /// of the query as a case-insensitive substring. A query with no terms
    /// matches nothing; there is no universal-set seed. Result order is
    /// unspecified.
    pub fn boolean_search(&self, query: &str) -> Result<Vec<String>> {
        let mut matched: Option<HashSet<String>> = None;

        for term in query_terms(query) {
            let paths = self.store.find_by_substring(&term)?;
            matched = Some(match matched {
                Some(existing) => existing.intersection(&paths).cloned().collect(),
                None => paths,
            });
        }

        Ok(matched.map(Vec::from_iter).unwrap_or_default())
    }

    /// Left-to-right operator fold. `and`, `or` and `not` tokens set the
    /// pending operator; each term combines its match set into the running
    /// result under that operator, which then resets to the default `and`.
    /// A trailing operator is a no-op, and a query with no terms matches
    /// nothing. Result order is unspecified.
    pub fn extended_boolean_search(&self, query: &str) -> Result<Vec<String>> {
        let mut pending = Operator::default();
        let mut matched: Option<HashSet<String>> = None;

        for token in parse_query(query) {
            match token {
                QueryToken::Op(op) => pending = op,
                QueryToken::Term(term) => {
                    let paths = self.store.find_by_substring(&term)?;
                    matched = Some(combine(matched, paths, pending));
                    pending = Operator::default();
                }
            }
        }

        Ok(matched.map(Vec::from_iter).unwrap_or_default())
    }

    /// TF-IDF cosine retrieval: paths whose similarity to the query
    /// strictly exceeds [`SIMILARITY_THRESHOLD`], in corpus scan order.
    ///
    /// The vector space is refit with the query embedded on every call, so
    /// IDF weights stay comparable between corpus and query at the price of
    /// a per-query cost that grows with the store.
    pub fn vector_search(&self, query: &str) -> Result<Vec<String>> {
        let documents = self.store.scan_all()?;
        Ok(vector::rank(&documents, query, SIMILARITY_THRESHOLD))
    }
}

/// Combine one term's match set into the running result under `op`.
///
/// Before any term has matched, `and` and `or` seed the running set while
/// `not` yields the empty set, since excluding from nothing leaves nothing.
fn combine(
    running: Option<HashSet<String>>,
    matches: HashSet<String>,
    op: Operator,
) -> HashSet<String> {
    match (running, op) {
        (None, Operator::And) | (None, Operator::Or) => matches,
        (None, Operator::Not) => HashSet::new(),
        (Some(set), Operator::And) => set.intersection(&matches).cloned().collect(),
        (Some(set), Operator::Or) => set.union(&matches).cloned().collect(),
        (Some(set), Operator::Not) => set.difference(&matches).cloned().collect(),
    }
}
