//! Value paths for error reporting, e.g. `Order.items[2].qty`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
    Element(usize),
    Variant(String),
    MapKey(usize),
    MapValue(usize),
}

/// Location of the value currently being visited, rooted at a type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Path {
    root: String,
    segments: Vec<Segment>,
}

impl Path {
    pub(crate) fn new(root: &str) -> Self {
        Self {
            root: root.to_owned(),
            segments: Vec::new(),
        }
    }

    /// Named struct field: `.name`.
    pub(crate) fn push_field(&mut self, name: &str) {
        self.segments.push(Segment::Field(name.to_owned()));
    }

    /// Array element: `[index]`.
    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    /// Positional tuple element: `.index`.
    pub(crate) fn push_element(&mut self, index: usize) {
        self.segments.push(Segment::Element(index));
    }

    /// Enum variant: `::Name`.
    pub(crate) fn push_variant(&mut self, name: &str) {
        self.segments.push(Segment::Variant(name.to_owned()));
    }

    /// Key of the map entry at `index`.
    pub(crate) fn push_map_key(&mut self, index: usize) {
        self.segments.push(Segment::MapKey(index));
    }

    /// Value of the map entry at `index`.
    pub(crate) fn push_map_value(&mut self, index: usize) {
        self.segments.push(Segment::MapValue(index));
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Element(index) => write!(f, ".{index}")?,
                Segment::Variant(name) => write!(f, "::{name}")?,
                Segment::MapKey(index) => write!(f, "[{index}].key")?,
                Segment::MapValue(index) => write!(f, "[{index}].value")?,
            }
        }
        Ok(())
    }
}
