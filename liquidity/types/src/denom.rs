use {
    crate::{StdError, StdResult},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{de, ser},
    std::{fmt, io, str::FromStr},
};

/// Denomination of a coin.
///
/// A valid denom is no longer than 128 characters, consisting of one or more
/// parts, each an ASCII alphanumeric string (`a-z|A-Z|0-9`), separated by the
/// forward slash (`/`).
///
/// Examples of valid denoms:
///
/// - `uatom`
/// - `pool/12`
///
/// Examples of invalid denoms:
///
/// - `` (empty)
/// - `aaa...aaa` (>128 `a`'s; too long)
/// - `pool//12` (empty part)
/// - `pool/&/12` (non-alphanumeric character)
///
/// Denoms are ordered by their string representation. This is the order used
/// to canonicalize the reserve coin pair of a pool.
#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Denom(String);

impl Denom {
    pub const MAX_LEN: usize = 128;
    pub const SEPARATOR: char = '/';

    pub fn new_unchecked(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Return the denom's namespace.
    ///
    /// A denom's namespace is its first part, if it has more than one part.
    /// A single-part denom lives in the top-level namespace, in which case
    /// this returns `None`.
    pub fn namespace(&self) -> Option<&str> {
        self.0
            .split_once(Self::SEPARATOR)
            .map(|(namespace, _)| namespace)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> StdResult<()> {
        if s.is_empty() || s.len() > Self::MAX_LEN {
            return Err(StdError::invalid_denom(s, "too short or too long"));
        }

        for part in s.split(Self::SEPARATOR) {
            if part.is_empty() {
                return Err(StdError::invalid_denom(s, "empty part"));
            }

            if part.chars().any(|ch| !ch.is_ascii_alphanumeric()) {
                return Err(StdError::invalid_denom(s, "non-alphanumeric character"));
            }
        }

        Ok(())
    }
}

impl AsRef<str> for Denom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Denom {
    type Error = StdError;

    fn try_from(s: String) -> StdResult<Self> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

impl TryFrom<&str> for Denom {
    type Error = StdError;

    fn try_from(s: &str) -> StdResult<Self> {
        Self::try_from(s.to_string())
    }
}

impl FromStr for Denom {
    type Err = StdError;

    fn from_str(s: &str) -> StdResult<Self> {
        Self::try_from(s.to_string())
    }
}

impl ser::Serialize for Denom {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> de::Deserialize<'de> for Denom {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        <String as de::Deserialize>::deserialize(deserializer)?
            .try_into()
            .map_err(de::Error::custom)
    }
}

impl BorshDeserialize for Denom {
    fn deserialize_reader<R>(reader: &mut R) -> io::Result<Self>
    where
        R: io::Read,
    {
        <String as BorshDeserialize>::deserialize_reader(reader)?
            .try_into()
            .map_err(io::Error::other)
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case("uatom" => None; "top level")]
    #[test_case("pool/12" => Some("pool".to_string()); "namespaced")]
    fn valid_denoms(s: &str) -> Option<String> {
        let denom = Denom::from_str(s).unwrap();
        assert_eq!(denom.to_string(), s);
        denom.namespace().map(ToString::to_string)
    }

    #[test_case(""; "empty")]
    #[test_case("pool//12"; "empty part")]
    #[test_case("pool/&/12"; "non alphanumeric")]
    #[test_case("/uatom"; "leading slash")]
    fn invalid_denoms(s: &str) {
        assert!(matches!(
            Denom::from_str(s),
            Err(StdError::InvalidDenom { .. })
        ));
    }

    #[test]
    fn too_long() {
        let s = "a".repeat(Denom::MAX_LEN + 1);
        assert!(Denom::from_str(&s).is_err());
        assert!(Denom::from_str(&s[1..]).is_ok());
    }

    #[test]
    fn json_rejects_malformed() {
        assert!(serde_json::from_str::<Denom>("\"a//b\"").is_err());
    }
}
