//! Mapping from checker type flags to primitive model types
//!
//! Types that are not expanded into classes, interfaces or closures fall back
//! to a primitive. The decision is an ordered table: the first row whose mask
//! intersects the type's flags wins; no row matching means [`Type::Unknown`].

use serde::{Deserialize, Serialize};
use tsbind_core::Type;

use crate::oracle::TypeFlags;

/// The primitive model types, as named in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    Any,
    Unknown,
    Number,
    String,
    Bool,
    Symbol,
    Undefined,
    Null,
    Void,
    Never,
}

impl PrimitiveKind {
    pub fn to_type(self) -> Type {
        match self {
            PrimitiveKind::Any => Type::Any,
            PrimitiveKind::Unknown => Type::Unknown,
            PrimitiveKind::Number => Type::Number,
            PrimitiveKind::String => Type::String,
            PrimitiveKind::Bool => Type::Bool,
            PrimitiveKind::Symbol => Type::Symbol,
            PrimitiveKind::Undefined => Type::Undefined,
            PrimitiveKind::Null => Type::Null,
            PrimitiveKind::Void => Type::Void,
            PrimitiveKind::Never => Type::Never,
        }
    }
}

/// Ordered classification rows
pub const CLASSIFICATION: &[(TypeFlags, PrimitiveKind)] = &[
    (TypeFlags::ANY, PrimitiveKind::Any),
    (TypeFlags::UNKNOWN, PrimitiveKind::Unknown),
    (TypeFlags::STRING_LIKE, PrimitiveKind::String),
    (TypeFlags::NUMBER_LIKE, PrimitiveKind::Number),
    (TypeFlags::BOOLEAN_LIKE, PrimitiveKind::Bool),
    (TypeFlags::ES_SYMBOL_LIKE, PrimitiveKind::Symbol),
    (TypeFlags::VOID, PrimitiveKind::Void),
    (TypeFlags::UNDEFINED, PrimitiveKind::Undefined),
    (TypeFlags::NULL, PrimitiveKind::Null),
    (TypeFlags::NEVER, PrimitiveKind::Never),
    // Opaque JS object
    (TypeFlags::OBJECT, PrimitiveKind::Any),
];

pub fn classify(flags: TypeFlags) -> Type {
    CLASSIFICATION
        .iter()
        .find(|(mask, _)| flags.intersects(*mask))
        .map(|(_, kind)| kind.to_type())
        .unwrap_or(Type::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_rows() {
        assert_eq!(classify(TypeFlags::STRING_LITERAL), Type::String);
        assert_eq!(classify(TypeFlags::ENUM | TypeFlags::UNION), Type::Number);
        assert_eq!(classify(TypeFlags::BIG_INT), Type::Number);
        assert_eq!(classify(TypeFlags::BOOLEAN_LITERAL), Type::Bool);
        assert_eq!(classify(TypeFlags::UNIQUE_ES_SYMBOL), Type::Symbol);
        assert_eq!(classify(TypeFlags::VOID), Type::Void);
        assert_eq!(classify(TypeFlags::NEVER), Type::Never);
    }

    #[test]
    fn test_objects_are_opaque() {
        assert_eq!(classify(TypeFlags::OBJECT | TypeFlags::CLASS), Type::Any);
    }

    #[test]
    fn test_unmatched_flags_are_unknown() {
        assert_eq!(classify(TypeFlags::TYPE_PARAMETER), Type::Unknown);
        assert_eq!(classify(TypeFlags::INTERSECTION), Type::Unknown);
        assert_eq!(classify(TypeFlags::empty()), Type::Unknown);
    }

    #[test]
    fn test_kind_names() {
        let kind: PrimitiveKind = serde_json::from_str("\"bool\"").unwrap();
        assert_eq!(kind, PrimitiveKind::Bool);
        assert!(serde_json::from_str::<PrimitiveKind>("\"integer\"").is_err());
    }
}
