use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use thiserror::Error;

/// Recoverable parse failures. Callers fall back to defaults or leave the
/// affected fields absent; none of these abort a collection run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactError {
    /// A hex netmask could not be decoded; the host mask is assumed.
    #[error("malformed hex netmask `{0}`")]
    MalformedNetmask(String),
    /// The default-route summary held no usable entry.
    #[error("no default route entry")]
    NoDefaultRoute,
}

/// Administrative state of an interface as reported by the device listing.
#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Up,
    Down,
    #[default]
    Unknown,
}

/// Address family of an address or route record.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Inet,
    Inet6,
    Lladdr,
}

/// One address bound to an interface, keyed in the owning map by its
/// literal address string (MAC address for the link-layer entry).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AddressRecord {
    pub family: Family,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefixlen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<String>,
}

impl AddressRecord {
    #[must_use]
    pub fn inet(address: String, netmask: String, prefixlen: String, broadcast: Option<String>) -> Self {
        AddressRecord {
            family: Family::Inet,
            address,
            netmask: Some(netmask),
            prefixlen: Some(prefixlen),
            broadcast,
        }
    }

    #[must_use]
    pub fn inet6(address: String, prefixlen: Option<String>) -> Self {
        AddressRecord {
            family: Family::Inet6,
            address,
            netmask: None,
            prefixlen,
            broadcast: None,
        }
    }

    #[must_use]
    pub fn lladdr(address: String) -> Self {
        AddressRecord {
            family: Family::Lladdr,
            address,
            netmask: None,
            prefixlen: None,
            broadcast: None,
        }
    }
}

/// One row of a family-scoped routing table, attached to the interface
/// named in its output row.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteRecord {
    pub destination: String,
    pub via: String,
    pub flags: String,
    pub family: Family,
}

/// One address-cache line of the ARP dump. `remote_host` is literally `"?"`
/// when the source shows no resolved name.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ArpRecord {
    pub remote_host: String,
    pub remote_ip: String,
    pub remote_mac: String,
}

/// A named network adapter with everything the per-interface dumps
/// contributed. Addresses keep insertion order; tunables are flattened into
/// the interface object on serialization.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Interface {
    pub state: State,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde_as(as = "HashMap<_, _>")]
    pub addresses: Vec<(String, AddressRecord)>,
    pub routes: Vec<RouteRecord>,
    #[serde(flatten)]
    pub tunables: BTreeMap<String, String>,
}

impl Interface {
    /// Inserts an address record, replacing a same-key entry in place and
    /// leaving unrelated keys untouched.
    pub fn upsert_address(&mut self, key: String, record: AddressRecord) {
        upsert(&mut self.addresses, key, record);
    }
}

/// The assembled fact tree for one collection run.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct NetworkFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_interface: Option<String>,
    #[serde_as(as = "HashMap<_, _>")]
    pub interfaces: Vec<(String, Interface)>,
    pub arp: Vec<ArpRecord>,
}

impl NetworkFacts {
    /// Returns the interface with the given name, creating it in `unknown`
    /// state if this is the first mention of the name.
    pub fn interface_entry(&mut self, name: &str) -> &mut Interface {
        if let Some(pos) = self.interfaces.iter().position(|(n, _)| n == name) {
            &mut self.interfaces[pos].1
        } else {
            self.interfaces.push((name.to_string(), Interface::default()));
            let pos = self.interfaces.len() - 1;
            &mut self.interfaces[pos].1
        }
    }

    /// Returns the interface with the given name, if it exists.
    pub fn interface_mut(&mut self, name: &str) -> Option<&mut Interface> {
        self.interfaces
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, interface)| interface)
    }

    /// Read-only lookup by name.
    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, interface)| interface)
    }
}

pub(crate) fn upsert<T>(entries: &mut Vec<(String, T)>, key: String, value: T) {
    if let Some(item) = entries.iter_mut().find(|(k, _)| *k == key) {
        item.1 = value;
    } else {
        entries.push((key, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_entry_creates_unknown_interface_once() {
        let mut facts = NetworkFacts::default();

        facts.interface_entry("en0").metric = Some("1".to_string());
        facts.interface_entry("en0").description = Some("first".to_string());

        assert_eq!(facts.interfaces.len(), 1);
        let interface = facts.interface("en0").expect("en0 should exist");
        assert_eq!(interface.state, State::Unknown);
        assert_eq!(interface.metric, Some("1".to_string()));
        assert_eq!(interface.description, Some("first".to_string()));
    }

    #[test]
    fn interface_entry_preserves_encounter_order() {
        let mut facts = NetworkFacts::default();
        facts.interface_entry("en1");
        facts.interface_entry("en0");
        facts.interface_entry("en1");

        let names: Vec<&str> = facts.interfaces.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["en1", "en0"]);
    }

    #[test]
    fn upsert_address_replaces_in_place_and_keeps_unrelated_keys() {
        let mut interface = Interface::default();
        interface.upsert_address(
            "172.29.174.58".to_string(),
            AddressRecord::inet(
                "172.29.174.58".to_string(),
                "255.255.192.0".to_string(),
                "18".to_string(),
                Some("172.29.191.255".to_string()),
            ),
        );
        interface.upsert_address(
            "172.29.174.59".to_string(),
            AddressRecord::inet(
                "172.29.174.59".to_string(),
                "255.255.255.255".to_string(),
                "32".to_string(),
                None,
            ),
        );
        interface.upsert_address(
            "172.29.174.58".to_string(),
            AddressRecord::inet(
                "172.29.174.58".to_string(),
                "255.255.192.0".to_string(),
                "18".to_string(),
                Some("172.29.128.255".to_string()),
            ),
        );

        let keys: Vec<&str> = interface.addresses.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["172.29.174.58", "172.29.174.59"]);
        assert_eq!(
            interface.addresses[0].1.broadcast,
            Some("172.29.128.255".to_string())
        );
    }

    #[test]
    fn serialization_flattens_tunables_and_skips_absent_fields() {
        let mut interface = Interface {
            state: State::Up,
            ..Interface::default()
        };
        interface
            .tunables
            .insert("tcp_sendspace".to_string(), "262144".to_string());

        let value = serde_json::to_value(&interface).expect("interface should serialize");
        assert_eq!(value["state"], "up");
        assert_eq!(value["tcp_sendspace"], "262144");
        assert!(value.get("description").is_none());
        assert!(value.get("metric").is_none());
        assert!(value.get("flags").is_none());
    }

    #[test]
    fn serialization_keeps_address_insertion_order() {
        let mut interface = Interface::default();
        interface.upsert_address("b".to_string(), AddressRecord::lladdr("b".to_string()));
        interface.upsert_address("a".to_string(), AddressRecord::lladdr("a".to_string()));

        let json = serde_json::to_string(&interface).expect("interface should serialize");
        let b = json.find("\"b\"").expect("key b should serialize");
        let a = json.find("\"a\"").expect("key a should serialize");
        assert!(b < a, "insertion order should survive serialization: {json}");
    }

    #[test]
    fn address_record_serializes_family_names() {
        let record = AddressRecord::inet6("::1".to_string(), Some("0".to_string()));
        let value = serde_json::to_value(&record).expect("record should serialize");
        assert_eq!(value["family"], "inet6");
        assert_eq!(value["prefixlen"], "0");
        assert!(value.get("netmask").is_none());

        let lladdr = AddressRecord::lladdr("BE:42:80:00:B0:05".to_string());
        let value = serde_json::to_value(&lladdr).expect("record should serialize");
        assert_eq!(value["family"], "lladdr");
    }
}
