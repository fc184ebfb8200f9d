//! Declaration modifiers on symbols.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifiers and annotations the checker attached to a symbol.
    ///
    /// Serialized as a `|`-separated list of flag names, e.g.
    /// `"EXPORT | ABSTRACT"`.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
    pub struct SymbolFlags: u32 {
        // === Visibility outside the unit ===

        /// Declared with `export`, or part of an exported declaration.
        const EXPORT = 1 << 0;
        /// Declared with `declare` or in a declaration file.
        const AMBIENT = 1 << 1;
        /// Carries a no-mangle annotation.
        const NO_MANGLE = 1 << 2;

        // === Member modifiers ===

        const PRIVATE = 1 << 8;
        const PROTECTED = 1 << 9;
        const PUBLIC = 1 << 10;
        const READONLY = 1 << 11;
        const STATIC = 1 << 12;
        const ABSTRACT = 1 << 13;
    }
}

impl Default for SymbolFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl SymbolFlags {
    /// Flags that make a name visible to other units.
    pub const EXTERNAL_MASK: Self = Self::EXPORT.union(Self::AMBIENT);

    /// Modifiers that turn a constructor parameter into a class member.
    pub const PARAMETER_PROPERTY_MASK: Self = Self::PRIVATE
        .union(Self::PROTECTED)
        .union(Self::PUBLIC)
        .union(Self::READONLY);

    /// Exported or ambient.
    #[inline]
    pub const fn is_external(self) -> bool {
        self.intersects(Self::EXTERNAL_MASK)
    }

    #[inline]
    pub const fn is_no_mangle(self) -> bool {
        self.contains(Self::NO_MANGLE)
    }

    #[inline]
    pub const fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    #[inline]
    pub const fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    #[inline]
    pub const fn is_parameter_property(self) -> bool {
        self.intersects(Self::PARAMETER_PROPERTY_MASK)
    }
}
