use serde::{Deserialize, Serialize};

/// How a property field is reachable from the source build description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Settable from a module definition in the source tree.
    #[default]
    UserSettable,
    /// No accessible path from the source text; internal bookkeeping only.
    InternalOnly,
    /// Anonymous field whose struct value is promoted into the enclosing level.
    Embedded,
}

/// Declared metadata for one property field of a module-type schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name as written in the source build description
    pub name: String,
    /// Reachability of the field
    #[serde(default)]
    pub kind: FieldKind,
    /// Set only by graph mutators, never by source text
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mutated: bool,
}

impl PropertyDescriptor {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::UserSettable,
            mutated: false,
        }
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn mutated(mut self) -> Self {
        self.mutated = true;
        self
    }
}

/// A property value: scalars, lists, or a nested property struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<PropertyValue>),
    Struct { fields: Vec<Property> },
}

impl PropertyValue {
    pub fn string(s: impl Into<String>) -> Self {
        PropertyValue::String(s.into())
    }

    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PropertyValue::List(items.into_iter().map(|s| PropertyValue::String(s.into())).collect())
    }
}

/// A single property of a module: its descriptor plus the value set on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(flatten)]
    pub descriptor: PropertyDescriptor,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(descriptor: PropertyDescriptor, value: PropertyValue) -> Self {
        Self { descriptor, value }
    }

    /// Shorthand for a user-settable property.
    pub fn user(name: impl Into<String>, value: PropertyValue) -> Self {
        Self::new(PropertyDescriptor::user(name), value)
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// Reference to a dependency module variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DepRef {
    pub dir: String,
    pub name: String,
    #[serde(default)]
    pub variant: String,
}

/// Destination rule a module type converts to, when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BazelRuleInfo {
    /// Rule class invoked in the BUILD file (e.g., "cc_library_static")
    pub rule_class: String,
    /// `.bzl` file the rule class is loaded from; `None` for native rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_location: Option<String>,
}

/// One variant of a module from the source build graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub module_type: String,
    #[serde(default)]
    pub variant: String,
    /// Source directory, relative to the tree root. Filled in by the loader.
    #[serde(default)]
    pub dir: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<DepRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bazel_rule: Option<BazelRuleInfo>,
}

impl Module {
    pub fn new(
        dir: impl Into<String>,
        name: impl Into<String>,
        module_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            module_type: module_type.into(),
            variant: String::new(),
            dir: dir.into(),
            deps: Vec::new(),
            properties: Vec::new(),
            bazel_rule: None,
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_dep(mut self, dep: DepRef) -> Self {
        self.deps.push(dep);
        self
    }

    pub fn with_bazel_rule(
        mut self,
        rule_class: impl Into<String>,
        load_location: Option<&str>,
    ) -> Self {
        self.bazel_rule = Some(BazelRuleInfo {
            rule_class: rule_class.into(),
            load_location: load_location.map(str::to_string),
        });
        self
    }
}
