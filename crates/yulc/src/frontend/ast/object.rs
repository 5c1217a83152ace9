//! Yul objects: code plus named sub-objects and data sections

use std::collections::BTreeSet;

use super::Block;
use crate::common::Span;

/// object "Name" { code { ... } object "Sub" { ... } data "d" hex"..." }
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub code: Block,
    pub objects: Vec<Object>,
    pub data: Vec<Data>,
    pub span: Span,
}

/// Named data section of an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    pub name: String,
    pub value: Vec<u8>,
    pub span: Span,
}

impl Object {
    /// Names the code of this object may pass to `datasize` / `dataoffset`
    ///
    /// Contains the object's own name, the names of its direct sub-objects and
    /// data sections, and dotted paths into nested objects
    /// (`"Sub.Inner"`). Names that already contain a dot cannot be addressed
    /// unambiguously and are left out.
    pub fn qualified_data_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        if !self.name.is_empty() && !self.name.contains('.') {
            names.insert(self.name.clone());
        }

        for data in &self.data {
            if !data.name.contains('.') {
                names.insert(data.name.clone());
            }
        }

        for object in &self.objects {
            if object.name.contains('.') {
                continue;
            }
            names.insert(object.name.clone());
            for nested in object.qualified_data_names() {
                if nested != object.name {
                    names.insert(format!("{}.{}", object.name, nested));
                }
            }
        }

        names
    }
}
