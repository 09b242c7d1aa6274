//! Network-fact parsing and normalization engine.
//!
//! Converts the captured output of native diagnostic commands (device
//! listings, per-interface configuration dumps, routing tables, hardware
//! address reports, ARP caches, default-route summaries) into one structured
//! [`NetworkFacts`] tree consumable by configuration-management tooling.
//!
//! The engine never spawns processes: each parser takes already-captured text
//! and the whole run is a pure transformation, so no parse failure is fatal —
//! malformed lines are skipped and absent fields stay absent.

pub mod arp;
pub mod devices;
pub mod entstat;
pub mod facts;
pub mod ifconfig;
pub mod netmask;
pub mod netstat;

use tracing::debug;

pub use facts::{
    AddressRecord, ArpRecord, FactError, Family, Interface, NetworkFacts, RouteRecord, State,
};
pub use netmask::hex_to_dec_netmask;

/// The batch of captured command output consumed by one collection run.
///
/// The per-interface dumps are keyed by interface name and processed in the
/// order given, so identical batches always assemble identical trees.
#[derive(Debug, Clone, Default)]
pub struct NetworkDumps {
    /// Pre-filtered default-route summary line.
    pub default_route: String,
    /// Device listing (name, state, description rows).
    pub devices: String,
    /// Per-interface configuration dumps.
    pub ifconfig: Vec<(String, String)>,
    /// Per-interface hardware-address reports.
    pub hardware: Vec<(String, String)>,
    /// Routing-table dump captured for the inet family.
    pub routes_inet: String,
    /// Routing-table dump captured for the inet6 family.
    pub routes_inet6: String,
    /// ARP cache dump.
    pub arp: String,
}

/// Assembles the fact tree from one batch of captured command output.
///
/// Interfaces come from the device listing, are enriched with addresses,
/// link-layer entries, and routes, and the tree is finished with the ARP
/// list and the default-gateway pair. Routes naming an interface absent from
/// the set are dropped; every other malformation degrades to an absent field.
#[must_use]
pub fn collect(dumps: &NetworkDumps) -> NetworkFacts {
    let mut facts = NetworkFacts::default();

    for device in devices::parse_devices(&dumps.devices) {
        let interface = facts.interface_entry(&device.name);
        interface.state = device.state;
        if !device.description.is_empty() {
            interface.description = Some(device.description);
        }
    }

    for (name, dump) in &dumps.ifconfig {
        let config = ifconfig::parse_ifconfig(dump);
        let interface = facts.interface_entry(name);
        if !config.flags.is_empty() {
            interface.flags = config.flags;
        }
        if config.metric.is_some() {
            interface.metric = config.metric;
        }
        for (key, record) in config.addresses {
            interface.upsert_address(key, record);
        }
        interface.tunables.extend(config.tunables);
    }

    for (name, report) in &dumps.hardware {
        if let Some(mac) = entstat::parse_hardware_address(report) {
            facts
                .interface_entry(name)
                .upsert_address(mac.clone(), AddressRecord::lladdr(mac));
        }
    }

    let mut routes = netstat::parse_routes(&dumps.routes_inet, Family::Inet);
    routes.extend(netstat::parse_routes(&dumps.routes_inet6, Family::Inet6));
    for entry in routes {
        match facts.interface_mut(&entry.interface) {
            Some(interface) => interface.routes.push(entry.route),
            None => debug!("dropping route via unknown interface {}", entry.interface),
        }
    }

    facts.arp = arp::parse_arp(&dumps.arp);

    match netstat::parse_default_route(&dumps.default_route) {
        Ok(route) => {
            facts.default_gateway = Some(route.gateway);
            facts.default_interface = Some(route.interface);
        }
        Err(e) => debug!("{e}"),
    }

    facts
}
