//! Sexy values.

use indexmap::IndexMap;

/// A Sexy datum: a kind plus an optional label.
///
/// Labels (`#name=datum`) bind the subtree matched at this position so a
/// later `#name#` reference can require structural equality with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Value {
    pub kind: ValueKind,
    pub label: Option<String>,
}

impl Value {
    #[must_use]
    pub fn new(kind: ValueKind) -> Self {
        Self { kind, label: None }
    }

    #[must_use]
    pub fn symbol(text: impl Into<String>) -> Self {
        Self::new(ValueKind::Symbol(text.into()))
    }

    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(ValueKind::Str(text.into()))
    }

    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::new(ValueKind::Integer(value.to_string()))
    }

    #[must_use]
    pub fn list(items: Vec<Value>) -> Self {
        Self::new(ValueKind::List {
            items,
            meta: IndexMap::new(),
        })
    }

    #[must_use]
    pub fn list_with_meta(items: Vec<Value>, meta: IndexMap<String, Value>) -> Self {
        Self::new(ValueKind::List { items, meta })
    }

    #[must_use]
    pub fn map(entries: IndexMap<String, Value>) -> Self {
        Self::new(ValueKind::Map {
            entries,
            rest: false,
        })
    }

    /// Structural equality: labels are compared away, maps and sets
    /// compare without regard to entry order.
    #[must_use]
    pub fn structural_eq(&self, other: &Value) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Symbol(a), ValueKind::Symbol(b)) => a == b,
            (ValueKind::Str(a), ValueKind::Str(b)) => a == b,
            (ValueKind::Integer(a), ValueKind::Integer(b)) => a == b,
            (ValueKind::Ellipsis, ValueKind::Ellipsis) => true,
            (ValueKind::LabelRef(a), ValueKind::LabelRef(b)) => a == b,
            (
                ValueKind::List {
                    items: a,
                    meta: am,
                },
                ValueKind::List {
                    items: b,
                    meta: bm,
                },
            ) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x.structural_eq(y))
                    && am.len() == bm.len()
                    && am
                        .iter()
                        .all(|(k, v)| bm.get(k).is_some_and(|w| v.structural_eq(w)))
            }
            (
                ValueKind::Map {
                    entries: a,
                    rest: ar,
                },
                ValueKind::Map {
                    entries: b,
                    rest: br,
                },
            ) => {
                ar == br
                    && a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.structural_eq(w)))
            }
            (
                ValueKind::Set { items: a, rest: ar },
                ValueKind::Set { items: b, rest: br },
            ) => ar == br && unordered_eq(a, b),
            (ValueKind::Array(a), ValueKind::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structural_eq(y))
            }
            _ => false,
        }
    }
}

/// Multiset equality over structural equality.
fn unordered_eq(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'outer: for item in a {
        for (i, candidate) in b.iter().enumerate() {
            if !used[i] && item.structural_eq(candidate) {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

/// The kinds of Sexy datum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Symbol(String),
    Str(String),
    /// Integers keep their source text; matching is textual.
    Integer(String),
    /// `...` - the wildcard; its meaning depends on the container.
    Ellipsis,
    /// `#name#` - reference to a labeled subtree.
    LabelRef(String),
    /// `(a b c)` with optional `^{k: v}` metadata blocks.
    List {
        items: Vec<Value>,
        meta: IndexMap<String, Value>,
    },
    /// `{k: v, ...}` - `rest` records a tail ellipsis.
    Map {
        entries: IndexMap<String, Value>,
        rest: bool,
    },
    /// `{a b c ...}` - `rest` records a tail ellipsis.
    Set { items: Vec<Value>, rest: bool },
    /// `[a b c]`
    Array(Vec<Value>),
}
