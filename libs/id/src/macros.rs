//! Macros for defining typed ID types.

/// Returns the first character that may not appear in an ID.
///
/// IDs end up as URL path segments, so separators, whitespace and
/// query/fragment markers are rejected.
#[doc(hidden)]
pub fn find_invalid_char(s: &str) -> Option<char> {
    s.chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
}

/// Macro to define a typed ID.
///
/// This generates a newtype wrapper around `String` with:
/// - A `KIND` constant used in error messages
/// - `parse()` with validation
/// - `Display`, `FromStr` and `AsRef<str>` implementations
/// - `Serialize` and `Deserialize` implementations (as a plain string)
///
/// # Example
///
/// ```ignore
/// define_id!(ClusterId, "cluster ID");
///
/// let id: ClusterId = "5b1c8d3e-0000-4000-8000-000000000000".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        /// A typed ID for this resource type.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Human-readable name of this ID type.
            pub const KIND: &'static str = $kind;

            /// Parses and validates an ID.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                if s.is_empty() {
                    return Err($crate::IdError::Empty { kind: Self::KIND });
                }

                if let Some(character) = $crate::__find_invalid_char(s) {
                    return Err($crate::IdError::InvalidCharacter {
                        kind: Self::KIND,
                        character,
                        value: s.to_string(),
                    });
                }

                Ok(Self(s.to_string()))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID and returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}
