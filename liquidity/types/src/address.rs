use {
    crate::{StdError, StdResult},
    borsh::{BorshDeserialize, BorshSerialize},
    data_encoding::HEXLOWER_PERMISSIVE,
    serde::{de, ser},
    sha2::{Digest, Sha256},
    std::{fmt, str::FromStr},
};

/// An account address: 20 bytes, displayed as `0x`-prefixed lowercase hex.
///
/// Addresses are validated during deserialization, so an `Addr` found in a
/// message is always well-formed.
#[derive(
    BorshSerialize, BorshDeserialize, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Addr([u8; Addr::LENGTH]);

impl Addr {
    pub const LENGTH: usize = 20;

    /// Derive a deterministic address for a module-controlled account:
    ///
    /// ```plain
    /// address := sha256(namespace | seed)[..20]
    /// ```
    ///
    /// where `|` means byte concatenation.
    pub fn derive(namespace: &[u8], seed: &[u8]) -> Self {
        let hash = Sha256::new()
            .chain_update(namespace)
            .chain_update(seed)
            .finalize();

        let mut bytes = [0; Self::LENGTH];
        bytes.copy_from_slice(&hash[..Self::LENGTH]);

        Self(bytes)
    }

    /// Generate a mock address from use in testing.
    pub const fn mock(index: u8) -> Self {
        let mut bytes = [0; Self::LENGTH];
        bytes[Self::LENGTH - 1] = index;
        Self(bytes)
    }
}

impl AsRef<[u8]> for Addr {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Addr {
    type Error = StdError;

    fn try_from(bytes: &[u8]) -> StdResult<Self> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| StdError::invalid_address(format!("{bytes:?}"), "incorrect length"))
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", HEXLOWER_PERMISSIVE.encode(&self.0))
    }
}

impl fmt::Debug for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Addr({self})")
    }
}

impl FromStr for Addr {
    type Err = StdError;

    fn from_str(s: &str) -> StdResult<Self> {
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| StdError::invalid_address(s, "missing `0x` prefix"))?;

        let bytes = HEXLOWER_PERMISSIVE
            .decode(hex.as_bytes())
            .map_err(|err| StdError::invalid_address(s, err))?;

        Addr::try_from(bytes.as_slice())
    }
}

impl ser::Serialize for Addr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> de::Deserialize<'de> for Addr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = <String as de::Deserialize>::deserialize(deserializer)?;
        Addr::from_str(&s).map_err(de::Error::custom)
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test]
    fn display_and_parse() {
        let addr = Addr::mock(1);
        let s = addr.to_string();
        assert_eq!(s, "0x0000000000000000000000000000000000000001");
        assert_eq!(s.parse::<Addr>().unwrap(), addr);
    }

    #[test_case("0000000000000000000000000000000000000001"; "no prefix")]
    #[test_case("0x00000000000000000000000000000000000001"; "too short")]
    #[test_case("0xzz00000000000000000000000000000000000001"; "not hex")]
    fn parse_fails(s: &str) {
        assert!(matches!(
            s.parse::<Addr>(),
            Err(StdError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn derived_addresses_differ_by_seed() {
        let a = Addr::derive(b"reserve", &1_u64.to_be_bytes());
        let b = Addr::derive(b"reserve", &2_u64.to_be_bytes());
        assert_ne!(a, b);
        assert_eq!(a, Addr::derive(b"reserve", &1_u64.to_be_bytes()));
    }
}
