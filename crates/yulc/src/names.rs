//! Interned names and the dialect view used by parser and analyzer

use std::fmt;

use string_interner::{DefaultStringInterner, DefaultSymbol};

use crate::dialect::{BuiltinFunction, Dialect};

/// Interned identifier or type label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(DefaultSymbol);

/// Owns every name of a program together with the dialect it is read in
///
/// All type labels and builtin names of the dialect are interned up front, so
/// analysis can work on a shared `&NameRepository`.
pub struct NameRepository {
    interner: DefaultStringInterner,
    dialect: Box<dyn Dialect>,
    default_type: Name,
    bool_type: Name,
    types: Vec<Name>,
}

impl NameRepository {
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self::from_boxed(Box::new(dialect))
    }

    pub fn from_boxed(dialect: Box<dyn Dialect>) -> Self {
        let mut interner = DefaultStringInterner::default();
        let default_type = Name(interner.get_or_intern(dialect.default_type()));
        let bool_type = Name(interner.get_or_intern(dialect.bool_type()));
        let types = dialect
            .types()
            .iter()
            .map(|ty| Name(interner.get_or_intern(ty)))
            .collect();
        for builtin in dialect.builtin_names() {
            interner.get_or_intern(builtin);
        }

        Self {
            interner,
            dialect,
            default_type,
            bool_type,
            types,
        }
    }

    pub fn intern(&mut self, text: &str) -> Name {
        Name(self.interner.get_or_intern(text))
    }

    /// Name for `text` if it was interned before
    pub fn lookup(&self, text: &str) -> Option<Name> {
        self.interner.get(text).map(Name)
    }

    pub fn resolve(&self, name: Name) -> &str {
        self.interner.resolve(name.0).unwrap_or_default()
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn builtin(&self, name: Name) -> Option<&BuiltinFunction> {
        self.dialect.builtin(self.resolve(name))
    }

    pub fn default_type(&self) -> Name {
        self.default_type
    }

    pub fn bool_type(&self) -> Name {
        self.bool_type
    }

    pub fn is_valid_type(&self, ty: Name) -> bool {
        self.types.contains(&ty)
    }

    /// Interned form of a dialect type label
    pub fn type_label(&self, label: &str) -> Name {
        self.lookup(label).unwrap_or(self.default_type)
    }

    /// Human readable form of a type label
    pub fn display_type(&self, ty: Name) -> TypeDisplay<'_> {
        TypeDisplay { names: self, ty }
    }

    /// Comma separated list of names
    pub fn join(&self, names: impl IntoIterator<Item = Name>) -> String {
        names
            .into_iter()
            .map(|name| self.resolve(name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Formats a type label, showing the empty label as `default`
pub struct TypeDisplay<'a> {
    names: &'a NameRepository,
    ty: Name,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.names.resolve(self.ty) {
            "" => write!(f, "default"),
            label => write!(f, "{}", label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{EvmDialect, EvmVersion};

    #[test]
    fn test_interning_is_stable() {
        let mut names = NameRepository::new(EvmDialect::new(EvmVersion::Cancun));
        let a = names.intern("counter");
        let b = names.intern("counter");
        assert_eq!(a, b);
        assert_eq!(names.resolve(a), "counter");
        assert_ne!(a, names.intern("other"));
    }

    #[test]
    fn test_builtins_are_pre_interned() {
        let names = NameRepository::new(EvmDialect::new(EvmVersion::Cancun));
        let sstore = names.lookup("sstore").unwrap();
        assert_eq!(names.builtin(sstore).unwrap().name, "sstore");
        assert!(names.lookup("not_a_builtin").is_none());
    }

    #[test]
    fn test_type_labels() {
        let names = NameRepository::new(EvmDialect::typed(EvmVersion::Cancun));
        assert_eq!(names.resolve(names.default_type()), "u256");
        assert_eq!(names.resolve(names.bool_type()), "bool");
        assert!(names.is_valid_type(names.type_label("bool")));
        assert_eq!(names.display_type(names.bool_type()).to_string(), "bool");

        let untyped = NameRepository::new(EvmDialect::new(EvmVersion::Cancun));
        assert_eq!(untyped.default_type(), untyped.bool_type());
        assert_eq!(untyped.display_type(untyped.default_type()).to_string(), "default");
    }
}
