use serde::{Deserialize, Serialize};

/// The basic shape of a value or type.
///
/// The discriminant is the wire tag: every encoded type starts with one
/// byte holding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Kind {
    Bool = 0,
    Number = 1,
    String = 2,
    Blob = 3,
    /// Any value. Describes a type, never tags a decoded value.
    Value = 4,
    List = 5,
    Map = 6,
    Ref = 7,
    Set = 8,
    Struct = 9,
    /// Back-reference to an enclosing struct type under construction.
    Cycle = 10,
    /// A type used as a first-class value.
    Type = 11,
    Union = 12,
}

impl Kind {
    /// Every kind, in tag order.
    pub const ALL: [Kind; 13] = [
        Kind::Bool,
        Kind::Number,
        Kind::String,
        Kind::Blob,
        Kind::Value,
        Kind::List,
        Kind::Map,
        Kind::Ref,
        Kind::Set,
        Kind::Struct,
        Kind::Cycle,
        Kind::Type,
        Kind::Union,
    ];

    /// Wire tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Kinds whose type carries no further description on the wire.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Number | Self::String | Self::Blob | Self::Value | Self::Type
        )
    }

    /// Returns `false` for kinds that can describe a type but never tag an
    /// actual value.
    pub fn is_value_kind(self) -> bool {
        !matches!(self, Self::Union | Self::Cycle | Self::Value)
    }

    /// Kinds whose values have a natural total order and can key a meta
    /// sequence directly. Everything else is keyed by digest.
    pub fn is_ordered_by_value(self) -> bool {
        matches!(self, Self::Bool | Self::Number | Self::String)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Number => "Number",
            Self::String => "String",
            Self::Blob => "Blob",
            Self::Value => "Value",
            Self::List => "List",
            Self::Map => "Map",
            Self::Ref => "Ref",
            Self::Set => "Set",
            Self::Struct => "Struct",
            Self::Cycle => "Cycle",
            Self::Type => "Type",
            Self::Union => "Union",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn from_tag_unknown() {
        assert!(Kind::from_tag(13).is_none());
        assert!(Kind::from_tag(255).is_none());
    }

    #[test]
    fn wire_tags_are_stable() {
        assert_eq!(Kind::Bool.tag(), 0);
        assert_eq!(Kind::List.tag(), 5);
        assert_eq!(Kind::Struct.tag(), 9);
        assert_eq!(Kind::Union.tag(), 12);
    }

    #[test]
    fn non_value_kinds() {
        assert!(!Kind::Union.is_value_kind());
        assert!(!Kind::Cycle.is_value_kind());
        assert!(!Kind::Value.is_value_kind());
        assert!(Kind::Type.is_value_kind());
        assert!(Kind::Struct.is_value_kind());
    }

    #[test]
    fn primitives() {
        let primitive: Vec<Kind> = Kind::ALL.into_iter().filter(|k| k.is_primitive()).collect();
        assert_eq!(
            primitive,
            vec![Kind::Bool, Kind::Number, Kind::String, Kind::Blob, Kind::Value, Kind::Type]
        );
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&Kind::Map).unwrap();
        let back: Kind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Kind::Map);
    }
}
