use regex::Regex;
use tracing::debug;

/// Extracts the hardware address from a one-line report such as
/// `Hardware Address: be:42:80:00:b0:05`.
///
/// Octets may be one or two hex digits and are kept un-padded; the result is
/// upper-cased so it can key the interface's link-layer address record.
#[must_use]
pub fn parse_hardware_address(output: &str) -> Option<String> {
    let re = Regex::new(r"([0-9a-fA-F]{1,2}(?::[0-9a-fA-F]{1,2}){5})").ok()?;
    match re.captures(output).and_then(|cap| cap.get(1)) {
        Some(mac) => Some(mac.as_str().to_ascii_uppercase()),
        None => {
            if !output.trim().is_empty() {
                debug!("no hardware address in report: {}", output.trim());
            }
            None
        }
    }
}
