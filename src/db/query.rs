//! Structured filter predicates and ordering, evaluated client-side.
//!
//! Semantics follow the hosted document database the clinic app targets:
//! - every predicate must match (conjunction); `Or` groups are disjunctions
//! - a prefix search is the half-open range `[prefix, prefix + U+F8FF)`
//! - an ordered query excludes documents that lack the order-by field
//! - ties break on document id so results are deterministic

use std::cmp::Ordering;

use serde_json::Value;

use super::{Document, Fields};

/// High private-use code point closing a prefix range.
pub const PREFIX_RANGE_END: char = '\u{f8ff}';

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq { field: String, value: Value },
    Prefix { field: String, prefix: String },
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn prefix(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::Prefix {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    pub fn matches(&self, data: &Fields) -> bool {
        match self {
            Self::Eq { field, value } => data.get(field) == Some(value),
            Self::Prefix { field, prefix } => match data.get(field) {
                Some(Value::String(s)) => in_prefix_range(s, prefix),
                _ => false,
            },
            Self::Or(any) => any.iter().any(|p| p.matches(data)),
        }
    }
}

/// `prefix <= value < prefix + U+F8FF`.
pub fn in_prefix_range(value: &str, prefix: &str) -> bool {
    let mut upper = String::with_capacity(prefix.len() + PREFIX_RANGE_END.len_utf8());
    upper.push_str(prefix);
    upper.push(PREFIX_RANGE_END);
    value >= prefix && value < upper.as_str()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A collection query. Built with the chained `where_*` / `order_by` calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub predicates: Vec<Predicate>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            predicates: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::eq(field, value));
        self
    }

    pub fn where_prefix(mut self, field: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.predicates.push(Predicate::prefix(field, prefix));
        self
    }

    pub fn where_any(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates.push(Predicate::Or(predicates));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn matches(&self, data: &Fields) -> bool {
        if let Some(order) = &self.order_by {
            if !data.contains_key(&order.field) {
                return false;
            }
        }
        self.predicates.iter().all(|p| p.matches(data))
    }

    /// Filter, sort and truncate a collection snapshot.
    pub fn apply(&self, docs: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut out: Vec<Document> = docs.into_iter().filter(|d| self.matches(&d.data)).collect();

        match &self.order_by {
            Some(order) => out.sort_by(|a, b| {
                let ord = match (a.data.get(&order.field), b.data.get(&order.field)) {
                    (Some(x), Some(y)) => compare_values(x, y),
                    _ => Ordering::Equal,
                };
                let ord = match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                };
                ord.then_with(|| a.id.cmp(&b.id))
            }),
            None => out.sort_by(|a, b| a.id.cmp(&b.id)),
        }

        if let Some(n) = self.limit {
            out.truncate(n);
        }
        out
    }
}

/// Cross-type ordering: null < bool < number < string < array < object.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
