//! Newtype IDs for type-safe document references.
//!
//! Documents are keyed by 12-byte identifiers that travel as 24-character hex
//! strings (the document store's `ObjectId` format). Use the `define_id!` macro
//! to create a wrapper per collection so a purchase id can never be passed
//! where a food item id is expected.

use thiserror::Error;

/// Number of raw bytes in a document identifier.
pub const DOCUMENT_ID_LEN: usize = 12;

/// Errors that can occur when parsing a document identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is not exactly 24 characters long.
    #[error("id must be {expected} hex characters (got {actual})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length of the input.
        actual: usize,
    },
    /// The input contains a non-hex character.
    #[error("id contains a non-hex character at position {0}")]
    InvalidCharacter(usize),
}

/// Macro to define a type-safe document ID wrapper.
///
/// Creates a `Copy` newtype around the 12 raw id bytes with:
/// - `Serialize`/`Deserialize` as a lowercase hex string (validated on input)
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - `parse()`, `from_bytes()`, `bytes()`
/// - `Display`, `FromStr`, `TryFrom<String>`, `From<Id> for String`
///
/// # Example
///
/// ```rust
/// # use yamweb_core::define_id;
/// define_id!(DishId);
///
/// let id = DishId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
/// assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
/// assert!(DishId::parse("not-an-id").is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name([u8; $crate::DOCUMENT_ID_LEN]);

        impl $name {
            /// Create an ID from its raw bytes.
            #[must_use]
            pub const fn from_bytes(bytes: [u8; $crate::DOCUMENT_ID_LEN]) -> Self {
                Self(bytes)
            }

            /// Get the raw id bytes.
            #[must_use]
            pub const fn bytes(&self) -> [u8; $crate::DOCUMENT_ID_LEN] {
                self.0
            }

            /// Parse an ID from its 24-character hex form.
            ///
            /// # Errors
            ///
            /// Returns `IdError` if the input is not exactly 24 hex digits.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::IdError> {
                $crate::decode_hex_id(s).map(Self)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&$crate::encode_hex_id(&self.0))
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(value: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }
    };
}

define_id!(FoodItemId);
define_id!(PurchaseId);

/// Decode a 24-character hex string into raw id bytes.
///
/// Accepts upper- and lowercase digits. Used by `define_id!`.
///
/// # Errors
///
/// Returns `IdError` if the input has the wrong length or a non-hex character.
#[doc(hidden)]
pub fn decode_hex_id(s: &str) -> Result<[u8; DOCUMENT_ID_LEN], IdError> {
    let expected = DOCUMENT_ID_LEN * 2;
    if s.len() != expected {
        return Err(IdError::WrongLength {
            expected,
            actual: s.len(),
        });
    }

    let mut out = [0u8; DOCUMENT_ID_LEN];
    hex::decode_to_slice(s, &mut out).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { index, .. } => IdError::InvalidCharacter(index),
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            IdError::WrongLength {
                expected,
                actual: s.len(),
            }
        }
    })?;
    Ok(out)
}

/// Lowercase hex form of raw id bytes. Used by `define_id!`.
#[doc(hidden)]
#[must_use]
pub fn encode_hex_id(bytes: &[u8; DOCUMENT_ID_LEN]) -> String {
    hex::encode(bytes)
}
