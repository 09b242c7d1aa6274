use tracing::debug;

use crate::facts::State;

/// One row of the device-listing dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub state: State,
    pub description: String,
}

/// Parses a device-listing dump where each row has the shape
/// `<name> <state-word> <description...>`.
///
/// The state word `Available` maps to `up`, anything else to `down`. Rows
/// that do not carry at least a name and a state word are skipped.
#[must_use]
pub fn parse_devices(output: &str) -> Vec<Device> {
    let mut devices = Vec::new();
    for line in output.lines() {
        let trimmed = line.trim();
        let mut fields = trimmed.split_whitespace();
        let (Some(name), Some(state_word)) = (fields.next(), fields.next()) else {
            if !trimmed.is_empty() {
                debug!("skipping malformed device line: {line}");
            }
            continue;
        };
        let state = if state_word == "Available" {
            State::Up
        } else {
            State::Down
        };
        let after_name = trimmed[name.len()..].trim_start();
        devices.push(Device {
            name: name.to_string(),
            state,
            description: after_name[state_word.len()..].trim().to_string(),
        });
    }
    devices
}
