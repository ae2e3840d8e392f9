//! Structured filter and sort expressions evaluated by the collection store.

use std::fmt;

use serde_json::{json, Map, Value};

/// Comparison operator of a single field condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Case-insensitive substring match.
    IContains,
    Gte,
    Lte,
}

impl FilterOp {
    /// Directus operator keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            FilterOp::Eq => "_eq",
            FilterOp::IContains => "_icontains",
            FilterOp::Gte => "_gte",
            FilterOp::Lte => "_lte",
        }
    }
}

/// A single condition on a named field.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

/// Boolean filter expression. An empty conjunction matches everything.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Condition(Condition),
}

impl Default for Predicate {
    fn default() -> Self {
        Self::match_all()
    }
}

impl Predicate {
    pub fn match_all() -> Self {
        Predicate::And(Vec::new())
    }

    pub fn condition(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Predicate::Condition(Condition {
            field: field.into(),
            op,
            value: value.into(),
        })
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOp::Eq, value)
    }

    pub fn icontains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOp::IContains, value)
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::And(clauses) if clauses.is_empty())
    }

    /// Top-level clauses of a conjunction; any other predicate is its own single clause.
    pub fn clauses(&self) -> &[Predicate] {
        match self {
            Predicate::And(clauses) => clauses,
            other => std::slice::from_ref(other),
        }
    }

    /// Render as a Directus filter object (`{}` for match-all).
    pub fn to_json(&self) -> Value {
        match self {
            Predicate::And(clauses) if clauses.is_empty() => Value::Object(Map::new()),
            Predicate::And(clauses) => {
                json!({ "_and": clauses.iter().map(Predicate::to_json).collect::<Vec<_>>() })
            }
            Predicate::Or(clauses) => {
                json!({ "_or": clauses.iter().map(Predicate::to_json).collect::<Vec<_>>() })
            }
            Predicate::Condition(c) => {
                let mut op = Map::new();
                op.insert(c.op.keyword().to_string(), c.value.clone());
                let mut field = Map::new();
                field.insert(c.field.clone(), Value::Object(op));
                Value::Object(field)
            }
        }
    }
}

/// Sort on one field; rendered as `field` or `-field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}
