//! Pattern matching.
//!
//! The wildcard `...` changes meaning per container: it matches any value
//! at top level, zero or more consecutive items in lists and arrays (any
//! position, repeatable), and "everything else" at the tail of maps and
//! sets. Lists and arrays use a small backtracking matcher; patterns are
//! short, so no DP table is needed.
//!
//! Labels are equality constraints: every position labeled or referenced
//! with the same name must hold structurally equal value subtrees.
//! Bindings are checkpointed and rolled back as the backtracking explores
//! alignments.

use std::fmt;

use crate::value::{Value, ValueKind};

/// One step of the failure path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathStep {
    /// Positional item of a list or array.
    Item(usize),
    /// Map entry.
    Key(String),
    /// Metadata entry of a list.
    Meta(String),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Item(i) => write!(f, "item[{i}]"),
            PathStep::Key(k) => write!(f, "key '{k}'"),
            PathStep::Meta(k) => write!(f, "meta '{k}'"),
        }
    }
}

/// Where and why a match failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchError {
    pub path: Vec<PathStep>,
    pub reason: String,
}

impl MatchError {
    fn new(path: &[PathStep], reason: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.reason);
        }
        let path: Vec<String> = self.path.iter().map(|s| s.to_string()).collect();
        write!(f, "{}: {}", path.join("."), self.reason)
    }
}

/// Match `pattern` against `value`.
pub fn match_value(pattern: &Value, value: &Value) -> Result<(), MatchError> {
    let mut env = Bindings::default();
    match_at(pattern, value, &mut env, &mut Vec::new())
}

/// Boolean convenience over [`match_value`].
#[must_use]
pub fn is_match(pattern: &Value, value: &Value) -> bool {
    match_value(pattern, value).is_ok()
}

/// Label bindings with checkpoint/rollback for backtracking.
#[derive(Default)]
struct Bindings {
    frames: Vec<(String, Value)>,
}

impl Bindings {
    fn get(&self, name: &str) -> Option<&Value> {
        self.frames
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    fn bind(&mut self, name: &str, value: &Value) {
        self.frames.push((name.to_string(), value.clone()));
    }

    fn checkpoint(&self) -> usize {
        self.frames.len()
    }

    fn rollback(&mut self, checkpoint: usize) {
        self.frames.truncate(checkpoint);
    }
}

fn match_at(
    pattern: &Value,
    value: &Value,
    env: &mut Bindings,
    path: &mut Vec<PathStep>,
) -> Result<(), MatchError> {
    match &pattern.kind {
        // The wildcard matches any value wherever it stands alone.
        ValueKind::Ellipsis => {
            finish_label(pattern, value, env, path)?;
            return Ok(());
        }
        ValueKind::LabelRef(name) => {
            match env.get(name) {
                Some(bound) => {
                    if !bound.structural_eq(value) {
                        return Err(MatchError::new(
                            path,
                            format!("label '#{name}#' does not match its bound subtree"),
                        ));
                    }
                }
                // A reference before (or without) a definition binds here;
                // later occurrences must then be equal to this subtree.
                None => env.bind(name, value),
            }
            finish_label(pattern, value, env, path)?;
            return Ok(());
        }
        _ => {}
    }

    match_kinds(pattern, value, env, path)?;
    finish_label(pattern, value, env, path)
}

/// After a node matches, record its label binding (or enforce it if the
/// label is already bound elsewhere).
fn finish_label(
    pattern: &Value,
    value: &Value,
    env: &mut Bindings,
    path: &mut Vec<PathStep>,
) -> Result<(), MatchError> {
    let Some(label) = &pattern.label else {
        return Ok(());
    };
    match env.get(label) {
        Some(bound) => {
            if !bound.structural_eq(value) {
                return Err(MatchError::new(
                    path,
                    format!("label '#{label}=' does not match its bound subtree"),
                ));
            }
        }
        None => env.bind(label, value),
    }
    Ok(())
}

fn match_kinds(
    pattern: &Value,
    value: &Value,
    env: &mut Bindings,
    path: &mut Vec<PathStep>,
) -> Result<(), MatchError> {
    match (&pattern.kind, &value.kind) {
        (ValueKind::Symbol(p), ValueKind::Symbol(v)) => {
            if p == v {
                Ok(())
            } else {
                Err(MatchError::new(path, format!("expected symbol {p}, found {v}")))
            }
        }
        (ValueKind::Str(p), ValueKind::Str(v)) => {
            if p == v {
                Ok(())
            } else {
                Err(MatchError::new(
                    path,
                    format!("expected string \"{p}\", found \"{v}\""),
                ))
            }
        }
        (ValueKind::Integer(p), ValueKind::Integer(v)) => {
            if p == v {
                Ok(())
            } else {
                Err(MatchError::new(path, format!("expected {p}, found {v}")))
            }
        }
        (
            ValueKind::List {
                items: p_items,
                meta: p_meta,
            },
            ValueKind::List {
                items: v_items,
                meta: v_meta,
            },
        ) => {
            // Metadata first: every key the pattern mentions must be
            // present and matching; unmentioned keys are ignored.
            for (key, p_entry) in p_meta {
                let Some(v_entry) = v_meta.get(key) else {
                    return Err(MatchError::new(
                        path,
                        format!("missing metadata key '{key}'"),
                    ));
                };
                path.push(PathStep::Meta(key.clone()));
                match_at(p_entry, v_entry, env, path)?;
                path.pop();
            }
            match_sequence(p_items, v_items, env, path)
        }
        (ValueKind::Array(p_items), ValueKind::Array(v_items)) => {
            match_sequence(p_items, v_items, env, path)
        }
        (
            ValueKind::Map {
                entries: p_entries,
                rest,
            },
            ValueKind::Map {
                entries: v_entries,
                ..
            },
        ) => {
            for (key, p_entry) in p_entries {
                let Some(v_entry) = v_entries.get(key) else {
                    return Err(MatchError::new(path, format!("missing key '{key}'")));
                };
                path.push(PathStep::Key(key.clone()));
                match_at(p_entry, v_entry, env, path)?;
                path.pop();
            }
            if !rest {
                for key in v_entries.keys() {
                    if !p_entries.contains_key(key) {
                        return Err(MatchError::new(path, format!("unexpected key '{key}'")));
                    }
                }
            }
            Ok(())
        }
        (
            ValueKind::Set {
                items: p_items,
                rest,
            },
            ValueKind::Set {
                items: v_items, ..
            },
        ) => match_set(p_items, *rest, v_items, env, path),
        (p, v) => Err(MatchError::new(
            path,
            format!("expected {}, found {}", kind_name(p), kind_name(v)),
        )),
    }
}

/// Positional matching for lists and arrays. `...` may appear anywhere,
/// any number of times; each one absorbs zero or more consecutive items.
fn match_sequence(
    pattern: &[Value],
    value: &[Value],
    env: &mut Bindings,
    path: &mut Vec<PathStep>,
) -> Result<(), MatchError> {
    fn go(
        pattern: &[Value],
        value: &[Value],
        value_offset: usize,
        env: &mut Bindings,
        path: &mut Vec<PathStep>,
        best: &mut Option<MatchError>,
    ) -> bool {
        let Some((head, tail)) = pattern.split_first() else {
            if value.is_empty() {
                return true;
            }
            record(
                best,
                MatchError::new(path, format!("{} unmatched trailing item(s)", value.len())),
            );
            return false;
        };

        // A labeled ellipsis (`#x=...`) matches exactly one item so the
        // label has a single well-defined subtree to bind; only the bare
        // wildcard absorbs runs.
        if head.kind == ValueKind::Ellipsis && head.label.is_none() {
            // Try absorbing 0..=len items, shortest first.
            for skip in 0..=value.len() {
                let checkpoint = env.checkpoint();
                if go(tail, &value[skip..], value_offset + skip, env, path, best) {
                    return true;
                }
                env.rollback(checkpoint);
            }
            return false;
        }

        let Some((first, rest)) = value.split_first() else {
            record(
                best,
                MatchError::new(path, "too few items for pattern".to_string()),
            );
            return false;
        };

        let checkpoint = env.checkpoint();
        path.push(PathStep::Item(value_offset));
        let matched = match_at(head, first, env, path);
        path.pop();
        match matched {
            Ok(()) => {
                if go(tail, rest, value_offset + 1, env, path, best) {
                    return true;
                }
                env.rollback(checkpoint);
                false
            }
            Err(err) => {
                env.rollback(checkpoint);
                record(best, err);
                false
            }
        }
    }

    /// Keep the failure with the deepest path; ties keep the first.
    fn record(best: &mut Option<MatchError>, err: MatchError) {
        let deeper = best
            .as_ref()
            .is_none_or(|current| err.path.len() > current.path.len());
        if deeper {
            *best = Some(err);
        }
    }

    let mut best = None;
    if go(pattern, value, 0, env, path, &mut best) {
        Ok(())
    } else {
        Err(best.unwrap_or_else(|| MatchError::new(path, "sequence does not match".to_string())))
    }
}

/// Unordered matching for sets: every pattern item claims a distinct
/// value item; without a tail `...`, nothing may be left unclaimed.
fn match_set(
    pattern: &[Value],
    rest: bool,
    value: &[Value],
    env: &mut Bindings,
    path: &mut Vec<PathStep>,
) -> Result<(), MatchError> {
    fn go(
        pattern: &[Value],
        value: &[Value],
        used: &mut [bool],
        env: &mut Bindings,
        path: &mut Vec<PathStep>,
    ) -> bool {
        let Some((head, tail)) = pattern.split_first() else {
            return true;
        };
        for i in 0..value.len() {
            if used[i] {
                continue;
            }
            let checkpoint = env.checkpoint();
            if match_at(head, &value[i], env, path).is_ok() {
                used[i] = true;
                if go(tail, value, used, env, path) {
                    return true;
                }
                used[i] = false;
            }
            env.rollback(checkpoint);
        }
        false
    }

    if pattern.len() > value.len() {
        return Err(MatchError::new(
            path,
            format!(
                "set pattern wants {} element(s), value has {}",
                pattern.len(),
                value.len()
            ),
        ));
    }
    if !rest && pattern.len() != value.len() {
        return Err(MatchError::new(
            path,
            format!(
                "set has {} unmatched element(s)",
                value.len() - pattern.len()
            ),
        ));
    }

    let mut used = vec![false; value.len()];
    if go(pattern, value, &mut used, env, path) {
        Ok(())
    } else {
        Err(MatchError::new(
            path,
            "set elements do not match pattern".to_string(),
        ))
    }
}

fn kind_name(kind: &ValueKind) -> &'static str {
    match kind {
        ValueKind::Symbol(_) => "a symbol",
        ValueKind::Str(_) => "a string",
        ValueKind::Integer(_) => "an integer",
        ValueKind::Ellipsis => "'...'",
        ValueKind::LabelRef(_) => "a label reference",
        ValueKind::List { .. } => "a list",
        ValueKind::Map { .. } => "a map",
        ValueKind::Set { .. } => "a set",
        ValueKind::Array(_) => "an array",
    }
}
