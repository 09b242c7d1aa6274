use tracing::debug;

use crate::facts::{FactError, Family, RouteRecord};

/// A route row together with the interface that owns it. Whether the
/// interface is known is decided by the caller; the parser only reports
/// what the row said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub interface: String,
    pub route: RouteRecord,
}

/// The gateway and owning interface taken from the default-route line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRoute {
    pub gateway: String,
    pub interface: String,
}

/// Parses a family-scoped routing-table dump into route entries in
/// encounter order.
///
/// `family` is the family the dump was captured for. A heading declaring
/// `Protocol Family 2` switches the context to inet; a heading naming any
/// other family number switches it to inet6. Column headers and separator
/// noise are rejected by the row filter: a data row has at least six columns
/// with all-digit refs and use counters.
#[must_use]
pub fn parse_routes(output: &str, family: Family) -> Vec<RouteEntry> {
    let mut current = family;
    let mut entries = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(heading) = family_heading(line) {
            current = heading;
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 6 || !is_count(fields[3]) || !is_count(fields[4]) {
            debug!("skipping non-route line: {line}");
            continue;
        }
        entries.push(RouteEntry {
            interface: fields[5].to_string(),
            route: RouteRecord {
                destination: fields[0].to_string(),
                via: fields[1].to_string(),
                flags: fields[2].to_string(),
                family: current,
            },
        });
    }
    entries
}

/// Parses the pre-filtered default-route line.
///
/// # Errors
///
/// * `NoDefaultRoute` if the input holds no line with the expected columns.
///   Non-fatal at the aggregator level; both fields stay absent.
pub fn parse_default_route(output: &str) -> Result<DefaultRoute, FactError> {
    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() >= 6 {
            return Ok(DefaultRoute {
                gateway: fields[1].to_string(),
                interface: fields[5].to_string(),
            });
        }
    }
    Err(FactError::NoDefaultRoute)
}

fn family_heading(line: &str) -> Option<Family> {
    let rest = line.split_once("Protocol Family")?.1;
    let number = rest.split_whitespace().next()?;
    if number == "2" {
        Some(Family::Inet)
    } else {
        Some(Family::Inet6)
    }
}

fn is_count(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}
