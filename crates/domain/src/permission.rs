use std::str::FromStr;

use dsperm_core::AppError;
use serde::{Deserialize, Serialize};

/// Wire code sent for a symbol the codec does not recognize.
pub const INVALID_PERMISSION_CODE: i64 = -1;

/// Symbol returned for a wire code the codec does not recognize.
pub const INVALID_PERMISSION_SYMBOL: &str = "-1";

/// Permission levels a data source can grant to a team or user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DatasourcePermission {
    /// Allows querying the data source.
    Query,
}

impl DatasourcePermission {
    /// Every recognized permission.
    pub const ALL: &'static [Self] = &[Self::Query];

    /// Returns the symbolic name used in declared configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "Query",
        }
    }

    /// Returns the integer code expected by the remote API.
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::Query => 1,
        }
    }

    /// Resolves a remote integer code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|permission| permission.code() == code)
    }

    /// Returns the symbols accepted by declared configuration.
    ///
    /// Derived from [`Self::ALL`] so the allow-list and the codec share one table.
    #[must_use]
    pub fn allowed_symbols() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::as_str).collect()
    }
}

impl FromStr for DatasourcePermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "invalid permission symbol '{value}', expected one of: {}",
                    Self::allowed_symbols().join(", ")
                ))
            })
    }
}

/// Encodes a symbolic permission into its wire code.
///
/// Unrecognized symbols yield [`INVALID_PERMISSION_CODE`].
#[must_use]
pub fn encode(symbol: &str) -> i64 {
    DatasourcePermission::from_str(symbol)
        .map(|permission| permission.code())
        .unwrap_or(INVALID_PERMISSION_CODE)
}

/// Decodes a wire code into its symbolic permission.
///
/// Unrecognized codes yield [`INVALID_PERMISSION_SYMBOL`].
#[must_use]
pub fn decode(code: i64) -> String {
    DatasourcePermission::from_code(code)
        .map_or(INVALID_PERMISSION_SYMBOL, |permission| permission.as_str())
        .to_owned()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::{
        DatasourcePermission, INVALID_PERMISSION_CODE, INVALID_PERMISSION_SYMBOL, decode, encode,
    };

    #[test]
    fn known_symbols_roundtrip() {
        for permission in DatasourcePermission::ALL {
            assert_eq!(decode(encode(permission.as_str())), permission.as_str());
        }
    }

    #[test]
    fn query_maps_to_code_one() {
        assert_eq!(encode("Query"), 1);
        assert_eq!(decode(1), "Query");
    }

    #[test]
    fn unknown_values_map_to_sentinels() {
        assert_eq!(encode("bogus"), INVALID_PERMISSION_CODE);
        assert_eq!(decode(9999), INVALID_PERMISSION_SYMBOL);
        assert_eq!(decode(INVALID_PERMISSION_CODE), INVALID_PERMISSION_SYMBOL);
    }

    #[test]
    fn symbols_are_case_sensitive() {
        assert_eq!(encode("query"), INVALID_PERMISSION_CODE);
        assert!(DatasourcePermission::from_str("QUERY").is_err());
    }

    #[test]
    fn strict_parse_rejects_unknown_symbol() {
        let parsed = DatasourcePermission::from_str("Admin");
        assert!(parsed.is_err());
        let message = parsed.map(|_| String::new()).unwrap_or_else(|error| error.to_string());
        assert!(message.contains("Admin"));
        assert!(message.contains("Query"));
    }

    #[test]
    fn allow_list_matches_codec_table() {
        for symbol in DatasourcePermission::allowed_symbols() {
            assert_ne!(encode(symbol), INVALID_PERMISSION_CODE);
        }
    }

    proptest! {
        #[test]
        fn encode_never_panics_and_is_sentinel_or_known(symbol in ".*") {
            let code = encode(&symbol);
            prop_assert!(
                code == INVALID_PERMISSION_CODE || DatasourcePermission::from_code(code).is_some()
            );
        }

        #[test]
        fn decode_is_sentinel_or_reencodes(code in any::<i64>()) {
            let symbol = decode(code);
            if symbol == INVALID_PERMISSION_SYMBOL {
                prop_assert!(DatasourcePermission::from_code(code).is_none());
            } else {
                prop_assert_eq!(encode(&symbol), code);
            }
        }
    }
}
