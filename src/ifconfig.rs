use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    facts::{self, AddressRecord, FactError},
    netmask,
};

const HOST_NETMASK: &str = "255.255.255.255";
const HOST_PREFIXLEN: &str = "32";

/// Everything one interface's configuration dump contributes: the header
/// attributes, the ordered address records, and the trailing tunables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceConfig {
    pub flags: Vec<String>,
    pub metric: Option<String>,
    pub addresses: Vec<(String, AddressRecord)>,
    pub tunables: BTreeMap<String, String>,
}

/// Parses a per-interface configuration dump.
///
/// The header line supplies the flag set (the names between `<` and `>`) and
/// the metric. `inet`/`inet6` lines become address records; trailing lines of
/// bare `key value` pairs become tunables. Unrecognized lines are skipped.
#[must_use]
pub fn parse_ifconfig(output: &str) -> InterfaceConfig {
    let mut config = InterfaceConfig::default();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("inet6 ") {
            parse_inet6(rest.trim_start(), &mut config);
        } else if let Some(rest) = line.strip_prefix("inet ") {
            parse_inet(rest.trim_start(), &mut config);
        } else if line.contains("flags=") || line.contains('<') {
            parse_header(line, &mut config);
        } else {
            parse_tunables(line, &mut config);
        }
    }
    config
}

fn parse_header(line: &str, config: &mut InterfaceConfig) {
    if let Some(start) = line.find('<') {
        if let Some(len) = line[start + 1..].find('>') {
            config.flags = line[start + 1..start + 1 + len]
                .split(',')
                .filter(|flag| !flag.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    let mut fields = line.split_whitespace();
    while let Some(field) = fields.next() {
        if field == "metric" {
            config.metric = fields.next().map(str::to_string);
            break;
        }
    }
}

fn parse_inet(rest: &str, config: &mut InterfaceConfig) {
    let mut fields = rest.split_whitespace();
    let Some(address) = fields.next() else {
        debug!("skipping inet line without an address");
        return;
    };

    let mut hex_mask = None;
    let mut broadcast = None;
    while let Some(field) = fields.next() {
        match field {
            "netmask" => hex_mask = fields.next(),
            "broadcast" => broadcast = fields.next(),
            _ => {}
        }
    }

    let (mask, prefixlen) = match hex_mask {
        Some(hex) => match decode_netmask(hex) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("{e}; assuming host mask for {address}");
                (HOST_NETMASK.to_string(), HOST_PREFIXLEN.to_string())
            }
        },
        None => (HOST_NETMASK.to_string(), HOST_PREFIXLEN.to_string()),
    };

    facts::upsert(
        &mut config.addresses,
        address.to_string(),
        AddressRecord::inet(
            address.to_string(),
            mask,
            prefixlen,
            broadcast.map(str::to_string),
        ),
    );
}

fn decode_netmask(hex: &str) -> Result<(String, String), FactError> {
    let mask = netmask::hex_to_dec_netmask(hex)?;
    let bits = netmask::hex_netmask_bits(hex)?;
    Ok((mask, bits.to_string()))
}

fn parse_inet6(rest: &str, config: &mut InterfaceConfig) {
    let Some(token) = rest.split_whitespace().next() else {
        debug!("skipping inet6 line without an address");
        return;
    };

    let (scoped, prefixlen) = match token.split_once('/') {
        Some((scoped, prefixlen)) => (scoped, Some(prefixlen.to_string())),
        None => (token, None),
    };
    // The %scope suffix never reaches the address key.
    let address = scoped.split_once('%').map_or(scoped, |(addr, _)| addr);

    facts::upsert(
        &mut config.addresses,
        address.to_string(),
        AddressRecord::inet6(address.to_string(), prefixlen),
    );
}

fn parse_tunables(line: &str, config: &mut InterfaceConfig) {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 {
        debug!("skipping unrecognized interface line: {line}");
        return;
    }
    for pair in fields.chunks_exact(2) {
        config
            .tunables
            .insert(pair[0].to_string(), pair[1].to_string());
    }
}
