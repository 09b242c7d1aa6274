use regex::Regex;
use tracing::debug;

use crate::facts::ArpRecord;

/// Parses an ARP cache dump into records in source order, no deduplication.
///
/// Address-cache lines have the shape `<host> (<ip>) at <mac> [<type>] ...`;
/// host is captured verbatim, so an unresolved name stays `"?"`. Bucket-count
/// and summary-total lines are skipped.
#[must_use]
pub fn parse_arp(output: &str) -> Vec<ArpRecord> {
    let Ok(re) = Regex::new(r"(\S+)\s+\((\S+)\)\s+at\s+([0-9a-fA-F:]+)\s+\[(\w+)\]") else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("bucket:") || line.contains("in the arp table") {
            continue;
        }
        let Some(cap) = re.captures(line) else {
            debug!("skipping unrecognized arp line: {line}");
            continue;
        };
        if let (Some(host), Some(ip), Some(mac)) = (cap.get(1), cap.get(2), cap.get(3)) {
            records.push(ArpRecord {
                remote_host: host.as_str().to_string(),
                remote_ip: ip.as_str().to_string(),
                remote_mac: mac.as_str().to_string(),
            });
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARP_AN: &str = "\
  ? (172.29.131.16) at 6e:87:70:0:40:3 [ethernet] stored in bucket 16

  ? (10.153.50.202) at 34:40:b5:ab:fb:5a [ethernet] stored in bucket 40

  gw.example.net (172.29.128.13) at 60:73:5c:69:42:44 [ethernet] stored in bucket 139

bucket:    0     contains:    0 entries
There are 3 entries in the arp table.
";

    #[test]
    fn keeps_unresolved_hosts_verbatim() {
        let records = parse_arp(ARP_AN);

        assert_eq!(records[0].remote_host, "?");
        assert_eq!(records[0].remote_ip, "172.29.131.16");
        assert_eq!(records[0].remote_mac, "6e:87:70:0:40:3");
    }

    #[test]
    fn skips_bucket_and_summary_lines() {
        let records = parse_arp(ARP_AN);

        assert_eq!(records.len(), 3);
    }

    #[test]
    fn resolved_hostnames_are_captured() {
        let records = parse_arp(ARP_AN);

        assert_eq!(records[2].remote_host, "gw.example.net");
        assert_eq!(records[2].remote_mac, "60:73:5c:69:42:44");
    }

    #[test]
    fn keeps_source_order_and_duplicates() {
        let dump = "\
? (10.0.0.2) at 2:0:0:0:0:2 [ethernet]
? (10.0.0.1) at 1:0:0:0:0:1 [ethernet]
? (10.0.0.2) at 2:0:0:0:0:2 [ethernet]
";
        let records = parse_arp(dump);

        let ips: Vec<&str> = records.iter().map(|r| r.remote_ip.as_str()).collect();
        assert_eq!(ips, vec!["10.0.0.2", "10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse_arp("").is_empty());
        assert!(parse_arp("\n  \n").is_empty());
    }
}
