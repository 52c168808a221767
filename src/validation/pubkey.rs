use crate::FormatError;

/// Literal prefix every pubkey starts with
pub const PUBKEY_PREFIX: &str = "0x";

/// Number of hex digits after the prefix (48 bytes)
pub const PUBKEY_HEX_LEN: usize = 96;

/// Validate the format of a validator pubkey
///
/// Rules are checked in order and the first failure is returned:
/// 1. The key starts with `0x`
/// 2. The remainder is exactly 96 bytes long
/// 3. Every remaining character is a hex digit (either case)
pub fn validate_format(pubkey: &str) -> Result<(), FormatError> {
    let hex_part = pubkey
        .strip_prefix(PUBKEY_PREFIX)
        .ok_or(FormatError::MissingPrefix)?;

    let len = hex_part.len();
    if len != PUBKEY_HEX_LEN {
        return Err(FormatError::WrongLength(len));
    }

    if let Some(c) = hex_part.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(FormatError::InvalidHexChar(c));
    }

    Ok(())
}
