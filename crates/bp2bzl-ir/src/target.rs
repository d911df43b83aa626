use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

/// An attribute value on a generated target.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<AttrValue>),
    /// Nested structure; rendered as a dict with sorted keys
    Dict(IndexMap<String, AttrValue>),
}

impl AttrValue {
    pub fn string(s: impl Into<String>) -> Self {
        AttrValue::String(s.into())
    }

    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttrValue::List(items.into_iter().map(|s| AttrValue::String(s.into())).collect())
    }
}

/// Body of a target: generated attributes, or verbatim hand-written content.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetKind {
    Generated {
        /// Attributes rendered right after `name`, in this order
        fixed_attrs: Vec<(String, AttrValue)>,
        /// Remaining attributes; rendered sorted by name
        attrs: IndexMap<String, AttrValue>,
    },
    /// The whole hand-written BUILD file of a directory
    Handcrafted { content: String },
}

/// A named, typed destination target.
#[derive(Debug, Clone, PartialEq)]
pub struct BazelTarget {
    pub name: String,
    pub rule_class: String,
    /// `.bzl` file defining `rule_class`; `None` for native rules
    pub bzl_load_location: Option<String>,
    pub kind: TargetKind,
}

impl BazelTarget {
    pub fn generated(name: impl Into<String>, rule_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule_class: rule_class.into(),
            bzl_load_location: None,
            kind: TargetKind::Generated {
                fixed_attrs: Vec::new(),
                attrs: IndexMap::new(),
            },
        }
    }

    /// A target standing for a directory's hand-written BUILD content. Its
    /// name is empty so it orders ahead of every generated target.
    pub fn handcrafted(content: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            rule_class: String::new(),
            bzl_load_location: None,
            kind: TargetKind::Handcrafted {
                content: content.into(),
            },
        }
    }

    pub fn with_load_location(mut self, location: Option<String>) -> Self {
        self.bzl_load_location = location;
        self
    }

    pub fn with_fixed_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        if let TargetKind::Generated { fixed_attrs, .. } = &mut self.kind {
            fixed_attrs.push((name.into(), value));
        }
        self
    }

    pub fn with_attrs(mut self, extra: IndexMap<String, AttrValue>) -> Self {
        if let TargetKind::Generated { attrs, .. } = &mut self.kind {
            attrs.extend(extra);
        }
        self
    }

    pub fn is_handcrafted(&self) -> bool {
        matches!(self.kind, TargetKind::Handcrafted { .. })
    }

    /// Look up an attribute by name, fixed attributes first.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        match &self.kind {
            TargetKind::Generated { fixed_attrs, attrs } => fixed_attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v)
                .or_else(|| attrs.get(name)),
            TargetKind::Handcrafted { .. } => None,
        }
    }

    /// All attribute names, fixed attributes first.
    pub fn attr_names(&self) -> Vec<&str> {
        match &self.kind {
            TargetKind::Generated { fixed_attrs, attrs } => fixed_attrs
                .iter()
                .map(|(n, _)| n.as_str())
                .chain(attrs.keys().map(String::as_str))
                .collect(),
            TargetKind::Handcrafted { .. } => Vec::new(),
        }
    }
}

/// The targets of one output directory.
///
/// Insertion order carries no meaning; [`BazelTargets::sort`] and
/// [`BazelTargets::sorted`] give the order files are rendered in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BazelTargets {
    targets: Vec<BazelTarget>,
}

impl BazelTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: BazelTarget) {
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BazelTarget> {
        self.targets.iter()
    }

    /// Sort in place by target name, rule class breaking ties.
    pub fn sort(&mut self) {
        self.targets.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.rule_class.cmp(&b.rule_class))
        });
    }

    /// A sorted copy, leaving this collection untouched.
    pub fn sorted(&self) -> BazelTargets {
        let mut copy = self.clone();
        copy.sort();
        copy
    }

    /// Whether any target is hand-maintained.
    pub fn has_handcrafted_targets(&self) -> bool {
        self.targets.iter().any(BazelTarget::is_handcrafted)
    }

    /// Rule classes to load, grouped by `.bzl` location. Native rules and
    /// handcrafted targets need no load.
    pub fn load_requirements(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut loads: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for target in &self.targets {
            if target.is_handcrafted() {
                continue;
            }
            if let Some(location) = target.bzl_load_location.as_deref() {
                loads
                    .entry(location)
                    .or_default()
                    .insert(target.rule_class.as_str());
            }
        }
        loads
    }
}

impl FromIterator<BazelTarget> for BazelTargets {
    fn from_iter<I: IntoIterator<Item = BazelTarget>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BazelTargets {
    type Item = &'a BazelTarget;
    type IntoIter = std::slice::Iter<'a, BazelTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
