use semhl_core::color::Rgb;
use semhl_core::error::SemhlError;

#[test]
fn from_hex_lowercase() {
    let color = Rgb::from_hex("#1a1b2a").unwrap();
    assert_eq!(color, Rgb::new(26, 27, 42));
}

#[test]
fn from_hex_uppercase() {
    let color = Rgb::from_hex("#AABBCC").unwrap();
    assert_eq!(color, Rgb::new(170, 187, 204));
}

#[test]
fn from_hex_mixed_case() {
    let color = Rgb::from_hex("#aAbBcC").unwrap();
    assert_eq!(color, Rgb::new(170, 187, 204));
}

#[test]
fn from_hex_missing_hash_is_error() {
    assert!(matches!(Rgb::from_hex("1a1b2a"), Err(SemhlError::InvalidHex(_))));
}

#[test]
fn from_hex_wrong_length_is_error() {
    assert!(matches!(Rgb::from_hex("#abc"), Err(SemhlError::InvalidHex(_))));
}

#[test]
fn from_hex_invalid_digits_is_error() {
    assert!(matches!(Rgb::from_hex("#gggggg"), Err(SemhlError::InvalidHex(_))));
}

#[test]
fn from_hex_empty_is_error() {
    assert!(matches!(Rgb::from_hex(""), Err(SemhlError::InvalidHex(_))));
}

#[test]
fn from_hex_non_ascii_is_error() {
    assert!(Rgb::from_hex("#caf\u{e9}00").is_err());
}

#[test]
fn to_hex_uppercase_format() {
    let color = Rgb::new(26, 27, 42);
    assert_eq!(color.to_hex(), "#1A1B2A");
}

#[test]
fn roundtrip() {
    let original = Rgb::new(0, 128, 255);
    let hex = original.to_hex();
    let parsed = Rgb::from_hex(&hex).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn serde_roundtrips_through_json_string() {
    let color = Rgb::new(1, 2, 3);
    let json = serde_json::to_string(&color).unwrap();
    assert_eq!(json, "\"#010203\"");
    let back: Rgb = serde_json::from_str(&json).unwrap();
    assert_eq!(back, color);
}
