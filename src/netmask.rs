use crate::facts::FactError;

/// Converts an 8-hex-digit netmask, optionally `0x`-prefixed, into
/// dotted-decimal form.
///
/// # Example
///
/// ```
/// assert_eq!(netfacts::hex_to_dec_netmask("0xffffc000").unwrap(), "255.255.192.0");
/// ```
///
/// # Errors
///
/// * `MalformedNetmask` if the input is not exactly 8 hex digits after
///   stripping the prefix. Callers treat this as non-fatal and fall back to
///   the host mask.
pub fn hex_to_dec_netmask(mask: &str) -> Result<String, FactError> {
    let digits = hex_digits(mask)?;
    let mut octets = Vec::with_capacity(4);
    for chunk in 0..4 {
        let octet = u8::from_str_radix(&digits[chunk * 2..chunk * 2 + 2], 16)
            .map_err(|_| FactError::MalformedNetmask(mask.to_string()))?;
        octets.push(octet.to_string());
    }
    Ok(octets.join("."))
}

/// Number of one bits in the mask, the prefix length the mask denotes.
///
/// # Errors
///
/// * `MalformedNetmask` as for [`hex_to_dec_netmask`].
pub fn hex_netmask_bits(mask: &str) -> Result<u32, FactError> {
    let digits = hex_digits(mask)?;
    let value = u32::from_str_radix(digits, 16)
        .map_err(|_| FactError::MalformedNetmask(mask.to_string()))?;
    Ok(value.count_ones())
}

fn hex_digits(mask: &str) -> Result<&str, FactError> {
    let digits = mask
        .strip_prefix("0x")
        .or_else(|| mask.strip_prefix("0X"))
        .unwrap_or(mask);
    if digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(digits)
    } else {
        Err(FactError::MalformedNetmask(mask.to_string()))
    }
}
