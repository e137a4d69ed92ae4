//! Field-name mapping: which child element name a target field reads from,
//! after an optional rename annotation (a field may be renamed to read
//! from a differently-named source element).

use std::collections::HashMap;

/// Maps a target record's field names to the source element names they
/// read from. Built once by the caller (normally right next to the
/// `FromElement` impl it serves) and threaded through every
/// `from_element` call.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    renames: HashMap<&'static str, &'static str>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `field` is populated from a child element named
    /// `source_name` rather than `field` itself.
    pub fn rename(mut self, field: &'static str, source_name: &'static str) -> Self {
        self.renames.insert(field, source_name);
        self
    }

    /// The element name `field` reads from: the rename target if one was
    /// registered, `field` itself otherwise.
    pub fn source_name(&self, field: &'static str) -> &'static str {
        self.renames.get(field).copied().unwrap_or(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrenamed_field_reads_its_own_name() {
        let table = FieldTable::new();
        assert_eq!(table.source_name("count"), "count");
    }

    #[test]
    fn renamed_field_reads_the_registered_source_name() {
        let table = FieldTable::new().rename("item", "hello");
        assert_eq!(table.source_name("item"), "hello");
    }
}
