//! Group identifiers backed by a process-wide string interner.
//!
//! Group names are compared and hashed constantly while a breakdown graph is
//! built and traversed, so they are stored as interned [`Id`] symbols.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Separator between histogram and column in fan-out group names.
pub const QUALIFIER_SEPARATOR: char = ':';

/// Global string interner for group names.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned name of a group in the breakdown graph.
///
/// # Examples
///
/// ```
/// use histoflow_core::identifier::Id;
///
/// let playbacks = Id::new("Playbacks");
/// assert_eq!(playbacks, "Playbacks");
///
/// let fan_out = Id::qualified("Media.HLS.InitializationError", "Timeout");
/// assert_eq!(fan_out, "Media.HLS.InitializationError:Timeout");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a group name.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the `Id` of `name` if it was interned before, without
    /// interning it.
    pub fn existing(name: &str) -> Option<Self> {
        interner().get(name).map(Self)
    }

    /// Creates the name of a group synthesized by a fan-out line:
    /// `"<histogram>:<column>"`.
    pub fn qualified(histogram: &str, column: &str) -> Self {
        let name = format!("{histogram}{QUALIFIER_SEPARATOR}{column}");
        Self::new(&name)
    }

    /// Returns an owned copy of the name.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let name = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{name}")
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "Root"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let name = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        name == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
