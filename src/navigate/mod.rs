//! Resolve compiled paths against a document without modifying it.

pub mod filter;

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::path::{JsonPath, Segment};

/// One concrete step from a container to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// The concrete path from the document root to a matched node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(Vec<Step>);

impl Location {
    pub fn root() -> Self {
        Location(Vec::new())
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// This location extended by one step.
    pub fn child(&self, step: Step) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Location(steps)
    }

    /// The parent location and the last step, or `None` at the root.
    pub fn split_last(&self) -> Option<(Location, &Step)> {
        let (last, parent) = self.0.split_last()?;
        Some((Location(parent.to_vec()), last))
    }

    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(doc, |node, step| match (step, node) {
            (Step::Key(k), Value::Object(map)) => map.get(k),
            (Step::Index(i), Value::Array(arr)) => arr.get(*i),
            _ => None,
        })
    }

    pub fn resolve_mut<'a>(&self, doc: &'a mut Value) -> Option<&'a mut Value> {
        self.0.iter().try_fold(doc, |node, step| match (step, node) {
            (Step::Key(k), Value::Object(map)) => map.get_mut(k),
            (Step::Index(i), Value::Array(arr)) => arr.get_mut(*i),
            _ => None,
        })
    }
}

impl From<Vec<Step>> for Location {
    fn from(steps: Vec<Step>) -> Self {
        Location(steps)
    }
}

/// Normalized path form: `$['store']['book'][0]`.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for step in &self.0 {
            match step {
                Step::Key(k) => {
                    let escaped = k.replace('\\', "\\\\").replace('\'', "\\'");
                    write!(f, "['{escaped}']")?;
                }
                Step::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// A node selected by a path, with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub location: Location,
    pub value: &'a Value,
}

/// Every node `path` selects in `doc`, in document order.
pub fn find<'a>(path: &JsonPath, doc: &'a Value) -> Vec<Match<'a>> {
    let matches = select(path.segments(), doc, doc);
    debug!(path = %path, matches = matches.len(), "resolved path");
    matches
}

/// The values `path` selects in `doc`.
pub fn find_values<'a>(path: &JsonPath, doc: &'a Value) -> Vec<&'a Value> {
    find(path, doc).into_iter().map(|m| m.value).collect()
}

/// Apply `segments` starting at `start`; `root` is what `$` means inside
/// filters. Locations are relative to `start`.
pub(crate) fn select<'a>(
    segments: &[Segment],
    start: &'a Value,
    root: &'a Value,
) -> Vec<Match<'a>> {
    let mut current = vec![Match {
        location: Location::root(),
        value: start,
    }];
    for segment in segments {
        let mut next = Vec::new();
        for node in &current {
            apply(segment, node, root, &mut next);
        }
        if next.is_empty() {
            return next;
        }
        current = next;
    }
    current
}

fn apply<'a>(segment: &Segment, node: &Match<'a>, root: &'a Value, out: &mut Vec<Match<'a>>) {
    match segment {
        Segment::Key(key) => {
            if let Value::Object(map) = node.value {
                if let Some(v) = map.get(key) {
                    out.push(child(node, Step::Key(key.clone()), v));
                }
            }
        }
        Segment::Index(idx) => {
            if let Value::Array(arr) = node.value {
                if let Some(i) = normalize_index(*idx, arr.len()) {
                    out.push(child(node, Step::Index(i), &arr[i]));
                }
            }
        }
        Segment::Wildcard => children(node, out),
        Segment::Slice { start, end, step } => {
            if let Value::Array(arr) = node.value {
                for i in slice_indices(arr.len(), *start, *end, step.unwrap_or(1)) {
                    out.push(child(node, Step::Index(i), &arr[i]));
                }
            }
        }
        Segment::Filter(predicate) => {
            let mut candidates = Vec::new();
            children(node, &mut candidates);
            out.extend(
                candidates
                    .into_iter()
                    .filter(|m| filter::test(predicate, m.value, root)),
            );
        }
        Segment::Union(members) => {
            for member in members {
                apply(member, node, root, out);
            }
        }
        Segment::Descendant(inner) => descend(inner, node, root, out),
    }
}

/// Pre-order: the node itself first, then each child's subtree.
fn descend<'a>(inner: &Segment, node: &Match<'a>, root: &'a Value, out: &mut Vec<Match<'a>>) {
    apply(inner, node, root, out);
    let mut kids = Vec::new();
    children(node, &mut kids);
    for kid in &kids {
        descend(inner, kid, root, out);
    }
}

fn children<'a>(node: &Match<'a>, out: &mut Vec<Match<'a>>) {
    match node.value {
        Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                out.push(child(node, Step::Index(i), v));
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                out.push(child(node, Step::Key(k.clone()), v));
            }
        }
        _ => {}
    }
}

fn child<'a>(node: &Match<'a>, step: Step, value: &'a Value) -> Match<'a> {
    Match {
        location: node.location.child(step),
        value,
    }
}

/// Negative indices count from the end.
pub(crate) fn normalize_index(idx: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let i = if idx < 0 { len + idx } else { idx };
    (0..len).contains(&i).then_some(i as usize)
}

fn slice_indices(len: usize, start: Option<i64>, end: Option<i64>, step: i64) -> Vec<usize> {
    let len = len as i64;
    let norm = |i: i64| if i < 0 { len + i } else { i };
    let mut indices = Vec::new();
    if step > 0 {
        let lower = start.map_or(0, norm).clamp(0, len);
        let upper = end.map_or(len, norm).clamp(0, len);
        let mut i = lower;
        while i < upper {
            indices.push(i as usize);
            let Some(next) = i.checked_add(step) else {
                break;
            };
            i = next;
        }
    } else if step < 0 {
        let upper = start.map_or(len - 1, norm).clamp(-1, len - 1);
        let lower = end.map_or(-1, norm).clamp(-1, len - 1);
        let mut i = upper;
        while i > lower {
            indices.push(i as usize);
            let Some(next) = i.checked_add(step) else {
                break;
            };
            i = next;
        }
    }
    indices
}
