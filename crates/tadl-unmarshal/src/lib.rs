//! # tadl-unmarshal
//!
//! Projects a `tadl_core` parse tree onto user-supplied record shapes.
//!
//! This crate is a consumer-facing facade, specified only at its
//! interface: it does **not** reflect over user types or ship a derive
//! macro (that is an external collaborator's concern, out of scope).
//! What it ships is:
//!
//!     - a [`FromElement`] trait user code implements by hand, one `impl`
//!       per record type;
//!     - a [`FieldTable`] builder for field-rename annotations;
//!     - [`Scalar`] coercion (string/integer, with signedness, bit width,
//!       and overflow detection);
//!     - [`UnmarshalOptions`] selecting strict vs. lenient field
//!       resolution;
//!     - [`child_element`] / [`scalar_field`] / [`sequence_field`] helpers
//!       that a hand-written `FromElement` impl calls to walk the tree.
//!
//! A target record's `FromElement` impl maps each of its fields to an
//! immediate child element of the node it is built from: a scalar field
//! reads that child's first text content; a sequence field treats the
//! child as a wrapper whose own children supply successive items.

mod error;
mod fields;
mod scalar;

pub use error::UnmarshalError;
pub use fields::FieldTable;
pub use scalar::Scalar;

use tadl_core::Node;

/// Strict mode requires every field consulted through [`child_element`] to
/// be present; lenient mode (the default) lets absent fields fall back to
/// their caller-supplied zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnmarshalOptions {
    pub strict: bool,
}

impl Default for UnmarshalOptions {
    fn default() -> Self {
        Self { strict: false }
    }
}

impl UnmarshalOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// Implemented by hand for each user record type that can be built from a
/// parse tree element. `fields` tells the impl which child element name
/// each of its fields reads from (after renames); `options` selects
/// strict vs. lenient absent-field handling.
pub trait FromElement: Sized {
    fn from_element(
        element: &Node,
        fields: &FieldTable,
        options: UnmarshalOptions,
    ) -> Result<Self, UnmarshalError>;
}

/// The immediate child of `element` named `fields.source_name(field)`, or
/// `None` if absent. In strict mode, absence is itself an error (returned
/// as `Err`, never as `Ok(None)`) so a `FromElement` impl need not repeat
/// the strict/lenient branch at every field.
pub fn child_element<'a>(
    element: &'a Node,
    fields: &FieldTable,
    options: UnmarshalOptions,
    field: &'static str,
) -> Result<Option<&'a Node>, UnmarshalError> {
    let source_name = fields.source_name(field);
    let found = element.children().iter().find(|c| c.name() == Some(source_name));
    match found {
        Some(node) => Ok(Some(node)),
        None if options.strict => Err(UnmarshalError::MissingField { field }),
        None => Ok(None),
    }
}

/// Reads `field` as a scalar: the named child's first text-leaf content,
/// coerced via [`Scalar`]. Absent in lenient mode yields `default`;
/// strict mode errors through [`child_element`] before this is reached.
pub fn scalar_field<T: Scalar>(
    element: &Node,
    fields: &FieldTable,
    options: UnmarshalOptions,
    field: &'static str,
    default: T,
) -> Result<T, UnmarshalError> {
    match child_element(element, fields, options, field)? {
        Some(child) => {
            let text = child.first_text_child().unwrap_or("");
            T::parse_scalar(field, text)
        }
        None => Ok(default),
    }
}

/// Reads `field` as a sequence: the named child is a wrapper element whose
/// own children supply successive items, each converted by `item`.
/// Absent in lenient mode yields an empty `Vec`.
pub fn sequence_field<T>(
    element: &Node,
    fields: &FieldTable,
    options: UnmarshalOptions,
    field: &'static str,
    mut item: impl FnMut(&Node) -> Result<T, UnmarshalError>,
) -> Result<Vec<T>, UnmarshalError> {
    match child_element(element, fields, options, field)? {
        Some(wrapper) => wrapper.children().iter().map(&mut item).collect(),
        None => Ok(Vec::new()),
    }
}

/// Unmarshal `root` into `T`. `root` is `Option<&Node>` rather than `&Node`
/// so that "a nil target is an error" has a real Rust expression: a
/// caller that has no tree to offer passes `None` rather than contriving
/// a placeholder node.
pub fn unmarshal<T: FromElement>(
    root: Option<&Node>,
    fields: FieldTable,
    options: UnmarshalOptions,
) -> Result<T, UnmarshalError> {
    let root = root.ok_or(UnmarshalError::NilTarget)?;
    T::from_element(root, &fields, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tadl_core::parse;

    #[derive(Debug, PartialEq)]
    struct Greeting {
        item: String,
    }

    impl FromElement for Greeting {
        fn from_element(
            element: &Node,
            fields: &FieldTable,
            options: UnmarshalOptions,
        ) -> Result<Self, UnmarshalError> {
            Ok(Self { item: scalar_field(element, fields, options, "item", String::new())? })
        }
    }

    #[derive(Debug, PartialEq, Default)]
    struct Config {
        level: i8,
        enabled: bool,
        tags: Vec<String>,
    }

    impl FromElement for Config {
        fn from_element(
            element: &Node,
            fields: &FieldTable,
            options: UnmarshalOptions,
        ) -> Result<Self, UnmarshalError> {
            Ok(Self {
                level: scalar_field(element, fields, options, "level", 0)?,
                enabled: scalar_field(element, fields, options, "enabled", false)?,
                tags: sequence_field(element, fields, options, "tags", |child| {
                    String::parse_scalar("tags", child.text_content().unwrap_or(""))
                })?,
            })
        }
    }

    #[test]
    fn unmarshal_renaming_scenario() {
        // `#item hello` against a target record whose single field is
        // renamed to `item`; strict=false.
        let tree = parse("#item hello").unwrap();
        let fields = FieldTable::new().rename("item", "item");
        let greeting: Greeting =
            unmarshal(Some(tree.root()), fields, UnmarshalOptions::lenient()).unwrap();
        assert_eq!(greeting, Greeting { item: "hello".to_string() });
    }

    #[test]
    fn lenient_mode_defaults_absent_fields() {
        let tree = parse("#!{}").unwrap();
        let config: Config =
            unmarshal(Some(tree.root()), FieldTable::new(), UnmarshalOptions::lenient()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn strict_mode_errors_on_absent_field() {
        let tree = parse("#!{}").unwrap();
        let err: Result<Config, _> =
            unmarshal(Some(tree.root()), FieldTable::new(), UnmarshalOptions::strict());
        assert!(matches!(err, Err(UnmarshalError::MissingField { field: "level" })));
    }

    #[test]
    fn sequence_field_binds_wrapper_children() {
        // Strict mode requires every field, so `level` and `enabled` are
        // supplied alongside `tags` even though this test is only about
        // sequence binding.
        let tree = parse(r#"#!{ level "1" enabled "true" tags { "a" "b" "c" } }"#).unwrap();
        let config: Config =
            unmarshal(Some(tree.root()), FieldTable::new(), UnmarshalOptions::strict()).unwrap();
        assert_eq!(config.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn integer_overflow_in_scalar_field_errors() {
        // Bare `300` would implicitly nest as a child element of `level`
        // rather than bind as text, so the literal must be quoted to land
        // as `level`'s text content.
        let tree = parse(r#"#!{ level "300" }"#).unwrap();
        let err: Result<Config, _> =
            unmarshal(Some(tree.root()), FieldTable::new(), UnmarshalOptions::lenient());
        assert!(matches!(err, Err(UnmarshalError::Overflow { field: "level", .. })));
    }

    #[test]
    fn nil_target_is_an_error() {
        let err: Result<Config, _> =
            unmarshal(None, FieldTable::new(), UnmarshalOptions::lenient());
        assert_eq!(err, Err(UnmarshalError::NilTarget));
    }
}
