use bp2bzl_model::{FieldKind, PropertyDescriptor};

/// Property names never emitted as target attributes.
///
/// Adding a name here is safe. Removing one changes the output of every
/// generated file that relied on its absence.
pub const IGNORED_PROPERTY_NAMES: [&str; 10] = [
    // redundant: every target is named explicitly
    "name",
    // reserved keyword
    "from",
    // reserved keyword
    "in",
    // reserved for tests
    "size",
    // interface-typed properties are not supported
    "arch",
    "multilib",
    "target",
    // native attribute with different semantics
    "visibility",
    // built-in attribute that cannot be overridden
    "features",
    // reserved keyword
    "for",
];

/// Whether a property with this name may become a target attribute.
///
/// Unknown names are allowed.
pub fn should_generate_attribute(name: &str) -> bool {
    !IGNORED_PROPERTY_NAMES.contains(&name)
}

/// Whether a struct field is dropped regardless of its name: internal-only
/// fields, and fields only mutators can set.
pub fn should_skip_field(descriptor: &PropertyDescriptor) -> bool {
    if descriptor.kind == FieldKind::InternalOnly {
        return true;
    }
    descriptor.mutated
}

/// Decides which module properties become emitted target attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeFilter;

impl AttributeFilter {
    /// Predicate for a top-level property: field rules plus the name blocklist.
    pub fn admits(&self, descriptor: &PropertyDescriptor) -> bool {
        !should_skip_field(descriptor) && should_generate_attribute(&descriptor.name)
    }

    /// Predicate for a field nested inside a struct value. Nested keys are
    /// dictionary entries, not attribute names, so only the field rules apply.
    pub fn admits_nested(&self, descriptor: &PropertyDescriptor) -> bool {
        !should_skip_field(descriptor)
    }
}
