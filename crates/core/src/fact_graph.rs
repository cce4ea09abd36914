//! Skein — in-memory directed fact store.
//!
//! The core primitive is a [`Fact`]: a subject-relation-object triple,
//! stored as a directed edge subject → object labeled by relation. The
//! store is a multigraph: the same subject/object pair may carry several
//! relations, and the same (subject, relation) pair may point at several
//! objects.
//!
//! [`FactGraph`] answers relation-scoped adjacency queries in both
//! directions: [`objects_of`] walks outgoing edges, [`subjects_of`] walks
//! incoming ones. Absence of data is an empty result, never an error.
//!
//! # Quick start
//!
//! ```rust
//! use skein::FactGraph;
//!
//! let mut graph = FactGraph::new();
//! graph.add_fact("Hypertension", "treated_by", "ACE Inhibitor");
//! graph.add_fact("Hypertension", "treated_by", "Diuretic");
//!
//! // Forward: what treats hypertension?
//! let objects = graph.objects_of("Hypertension", "treated_by");
//! assert_eq!(objects, vec!["ACE Inhibitor", "Diuretic"]);
//!
//! // Reverse: what does an ACE inhibitor treat?
//! let subjects = graph.subjects_of("ACE Inhibitor", "treated_by");
//! assert_eq!(subjects, vec!["Hypertension"]);
//! ```
//!
//! [`objects_of`]: FactGraph::objects_of
//! [`subjects_of`]: FactGraph::subjects_of

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// A directed labeled edge: subject → object, labeled by relation.
///
/// All three fields are plain strings; a node has no identity beyond the
/// string that names it. Well-formedness (all fields non-empty) is the
/// caller's responsibility: the loader and the query adapter enforce it
/// at their boundaries, the store does not re-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// The edge source.
    pub subject: String,
    /// The edge label (e.g. `treated_by`, `works_at`).
    pub relation: String,
    /// The edge target.
    pub object: String,
}

impl Fact {
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.relation, self.object)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// In-memory directed fact store.
///
/// Facts live in an insertion-ordered log. Two adjacency indexes (node to
/// outgoing edge positions, node to incoming edge positions) are owned by
/// the store and updated together on every [`add_fact`], so forward and
/// reverse queries never diverge. The relation filter is applied at query
/// time.
///
/// The lifecycle is load-then-read: the store grows monotonically during
/// an initial bulk load and is queried read-only afterwards. There is no
/// deletion, and duplicate triples are kept as distinct edges (see
/// [`facts`]).
///
/// # Example
///
/// ```rust
/// use skein::FactGraph;
///
/// let mut graph = FactGraph::new();
/// graph.add_fact("alice", "works_at", "Acme");
/// assert_eq!(graph.objects_of("alice", "works_at"), vec!["Acme"]);
/// assert!(graph.objects_of("nobody", "works_at").is_empty());
/// ```
///
/// [`add_fact`]: FactGraph::add_fact
/// [`facts`]: FactGraph::facts
#[derive(Debug, Default)]
pub struct FactGraph {
    /// Every fact ever added, in insertion order.
    facts: Vec<Fact>,
    /// Subject → positions in `facts` of its outgoing edges.
    outgoing: HashMap<String, Vec<usize>>,
    /// Object → positions in `facts` of its incoming edges.
    incoming: HashMap<String, Vec<usize>>,
}

impl FactGraph {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a directed labeled edge.
    ///
    /// Both endpoints become known nodes. Infallible: the store accepts
    /// any triple its callers validated, including one it has already
    /// seen. A repeated triple is a second, distinct edge.
    pub fn add_fact(
        &mut self,
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) {
        let fact = Fact::new(subject, relation, object);
        let position = self.facts.len();
        self.outgoing
            .entry(fact.subject.clone())
            .or_default()
            .push(position);
        self.incoming
            .entry(fact.object.clone())
            .or_default()
            .push(position);
        self.facts.push(fact);
    }

    /// Forward query: every object such that `(subject, relation, object)`
    /// was added, in insertion order of the matching edges.
    ///
    /// An unknown subject, or a known one with no matching relation,
    /// yields an empty vec.
    pub fn objects_of(&self, subject: &str, relation: &str) -> Vec<&str> {
        self.edges(&self.outgoing, subject, relation)
            .into_iter()
            .map(|f| f.object.as_str())
            .collect()
    }

    /// Reverse query: every subject such that `(subject, relation, object)`
    /// was added, scanning the incoming edges of `object`.
    pub fn subjects_of(&self, object: &str, relation: &str) -> Vec<&str> {
        self.edges(&self.incoming, object, relation)
            .into_iter()
            .map(|f| f.subject.as_str())
            .collect()
    }

    /// Every stored fact, in insertion order. Duplicates appear once per
    /// [`add_fact`] call.
    ///
    /// [`add_fact`]: FactGraph::add_fact
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Number of stored facts (duplicates counted separately).
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    // Internal: walk one adjacency index for `node`, filter by relation.
    fn edges<'a>(
        &'a self,
        index: &'a HashMap<String, Vec<usize>>,
        node: &str,
        relation: &str,
    ) -> Vec<&'a Fact> {
        index
            .get(node)
            .into_iter()
            .flatten()
            .map(|&position| &self.facts[position])
            .filter(|fact| fact.relation == relation)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
