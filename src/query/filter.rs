use crate::core::document::get_path;
use crate::core::{Document, DocumentId, ID_FIELD};
use serde_json::Value;
use std::cmp::Ordering;

/// Comparison operator of a field predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Boolean predicate over document fields.
///
/// Field paths are dotted (`"address.city"`). When a path resolves to an
/// array, a comparison matches if any element matches.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every document
    #[default]
    Empty,
    Compare {
        path: String,
        op: CompareOp,
        value: Value,
    },
    In {
        path: String,
        values: Vec<Value>,
    },
    Exists {
        path: String,
        exists: bool,
    },
    /// Matches when the array at `path` has exactly `len` elements
    Size {
        path: String,
        len: usize,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Equality on the identity field.
    pub fn by_id(id: DocumentId) -> Self {
        Self::eq(ID_FIELD, id.to_string())
    }

    pub fn eq(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Eq, value)
    }

    pub fn ne(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Ne, value)
    }

    pub fn lt(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Lt, value)
    }

    pub fn lte(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Lte, value)
    }

    pub fn gt(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Gt, value)
    }

    pub fn gte(path: &str, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Gte, value)
    }

    pub fn is_in<V: Into<Value>>(path: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self::In {
            path: path.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exists(path: &str, exists: bool) -> Self {
        Self::Exists {
            path: path.to_string(),
            exists,
        }
    }

    pub fn size(path: &str, len: usize) -> Self {
        Self::Size {
            path: path.to_string(),
            len,
        }
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            first => Filter::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            first => Filter::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Filter::Not(Box::new(self))
    }

    fn compare(path: &str, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            path: path.to_string(),
            op,
            value: value.into(),
        }
    }

    /// Evaluate the predicate against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::Empty => true,
            Filter::Compare { path, op, value } => match op {
                CompareOp::Eq => field_equals(get_path(doc, path), value),
                CompareOp::Ne => !field_equals(get_path(doc, path), value),
                _ => get_path(doc, path).is_some_and(|field| {
                    any_element(field, |candidate| ordered(candidate, value, *op))
                }),
            },
            Filter::In { path, values } => {
                let field = get_path(doc, path);
                values.iter().any(|value| field_equals(field, value))
            }
            Filter::Exists { path, exists } => get_path(doc, path).is_some() == *exists,
            Filter::Size { path, len } => {
                matches!(get_path(doc, path), Some(Value::Array(items)) if items.len() == *len)
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
            Filter::Not(inner) => !inner.matches(doc),
        }
    }

    /// The identifier this filter pins: an equality on `_id` in canonical
    /// form, alone or as one clause of an `And`.
    ///
    /// A document that passes the filter must carry this id, but the filter
    /// may still reject it.
    pub fn pinned_id(&self) -> Option<DocumentId> {
        match self {
            Filter::Compare {
                path,
                op: CompareOp::Eq,
                value: Value::String(id),
            } if path == ID_FIELD => {
                let parsed: DocumentId = id.parse().ok()?;
                (parsed.to_string() == *id).then_some(parsed)
            }
            Filter::And(filters) => filters.iter().find_map(Filter::pinned_id),
            _ => None,
        }
    }
}

/// A missing field equals only `null`.
fn field_equals(field: Option<&Value>, value: &Value) -> bool {
    match field {
        None => value.is_null(),
        Some(field) => {
            values_equal(field, value)
                || matches!(field, Value::Array(items) if items.iter().any(|item| values_equal(item, value)))
        }
    }
}

fn any_element(field: &Value, pred: impl Fn(&Value) -> bool) -> bool {
    match field {
        Value::Array(items) => items.iter().any(|item| pred(item)),
        other => pred(other),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn ordered(candidate: &Value, bound: &Value, op: CompareOp) -> bool {
    let ordering = match (candidate, bound) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    };

    match ordering {
        Some(ordering) => match op {
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
        },
        // Mismatched types never compare
        None => false,
    }
}
