use proptest::prelude::*;

use taskgate_types::WalletAddress;

fn hex_chars() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select("0123456789abcdefABCDEF".chars().collect::<Vec<_>>()),
        40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    /// Any 40-hex-char payload parses, and the result is lowercase.
    #[test]
    fn valid_addresses_parse_and_normalize(hex in hex_chars()) {
        let addr = WalletAddress::parse(&format!("0x{hex}")).unwrap();
        prop_assert_eq!(addr.as_str(), format!("0x{}", hex.to_lowercase()));
    }

    /// Parsing is idempotent: reparsing the normalized form yields the same value.
    #[test]
    fn parse_is_idempotent(hex in hex_chars()) {
        let once = WalletAddress::parse(&format!("0x{hex}")).unwrap();
        let twice = WalletAddress::parse(once.as_str()).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Case variants of the same address always compare equal.
    #[test]
    fn casing_never_affects_equality(hex in hex_chars()) {
        let lower = WalletAddress::parse(&format!("0x{}", hex.to_lowercase())).unwrap();
        let upper = WalletAddress::parse(&format!("0x{}", hex.to_uppercase())).unwrap();
        prop_assert_eq!(lower, upper);
    }

    /// Payloads that are not exactly 40 chars never parse.
    #[test]
    fn wrong_length_never_parses(len in 0usize..80, seed in 0u8..16) {
        prop_assume!(len != 40);
        let hex: String = std::iter::repeat(char::from_digit(seed as u32, 16).unwrap())
            .take(len)
            .collect();
        let candidate = format!("0x{}", hex);
        prop_assert!(WalletAddress::parse(&candidate).is_err());
    }
}
