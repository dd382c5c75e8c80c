//! Wire codec for the backend's tagged-union encoding.
//!
//! The AdventRunner backend serializes F# option values as
//! `{"Case": "Some", "Fields": [v]}` / `{"Case": "None", "Fields": []}` and
//! enum-style unions as a bare case tag. [`TaggedOption`] isolates that
//! convention: everything outside this module works with it (or native
//! `Option`) and never touches raw tags.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Optional value in the backend's tagged representation.
///
/// Unlike `Option`, a `TaggedOption` field round-trips through JSON with the
/// explicit `Case`/`Fields` shape the server emits. Structs declaring one
/// mark it `#[serde(default)]` so a field omitted entirely by the wire
/// format decodes as the empty case.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedOption<T> {
    /// Empty case, wire shape `{"Case": "None", "Fields": []}`.
    None,
    /// Present case, wire shape `{"Case": "Some", "Fields": [value]}`.
    Some(T),
}

impl<T> TaggedOption<T> {
    /// Produces the empty case.
    pub fn none() -> Self {
        TaggedOption::None
    }

    /// Wraps a value in the present case.
    pub fn some(value: T) -> Self {
        TaggedOption::Some(value)
    }

    /// True iff this is the present case.
    pub fn is_some(&self) -> bool {
        matches!(self, TaggedOption::Some(_))
    }

    /// True iff this is the empty case.
    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    /// Reads the wrapped value.
    ///
    /// # Panics
    ///
    /// Panics when called on the empty case. Guard with [`is_some`] first.
    ///
    /// [`is_some`]: TaggedOption::is_some
    pub fn value(&self) -> &T {
        match self {
            TaggedOption::Some(v) => v,
            TaggedOption::None => panic!("TaggedOption::value called on the None case"),
        }
    }

    /// Borrowing bridge to a native `Option`.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            TaggedOption::Some(v) => Some(v),
            TaggedOption::None => None,
        }
    }

    /// Consuming bridge to a native `Option`.
    pub fn into_option(self) -> Option<T> {
        match self {
            TaggedOption::Some(v) => Some(v),
            TaggedOption::None => None,
        }
    }
}

impl<T> Default for TaggedOption<T> {
    fn default() -> Self {
        TaggedOption::None
    }
}

impl<T> From<Option<T>> for TaggedOption<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => TaggedOption::Some(v),
            None => TaggedOption::None,
        }
    }
}

impl<T: Serialize> Serialize for TaggedOption<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TaggedOption", 2)?;
        match self {
            TaggedOption::None => {
                state.serialize_field("Case", "None")?;
                state.serialize_field("Fields", &[] as &[T])?;
            }
            TaggedOption::Some(v) => {
                state.serialize_field("Case", "Some")?;
                state.serialize_field("Fields", std::slice::from_ref(v))?;
            }
        }
        state.end()
    }
}

/// Raw wire shape; `Fields` may be omitted on the `None` case.
#[derive(serde::Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct TaggedRepr<T> {
    #[serde(rename = "Case")]
    case: String,
    #[serde(rename = "Fields", default)]
    fields: Vec<T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TaggedOption<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TaggedRepr::<T>::deserialize(deserializer)?;
        match repr.case.as_str() {
            "None" => Ok(TaggedOption::None),
            "Some" => {
                let mut fields = repr.fields;
                if fields.is_empty() {
                    return Err(de::Error::custom("Some case carries no payload"));
                }
                Ok(TaggedOption::Some(fields.remove(0)))
            }
            other => Err(de::Error::custom(format!(
                "unrecognized option case `{}`",
                other
            ))),
        }
    }
}
