//! Network interface enumeration for the `/interfaces` endpoint.

use cached::proc_macro::cached;
use pnet::datalink;
use pnet::ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IpAddressInfo {
    pub family: String,
    pub address: String,
    pub prefixlen: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub status: String,
    pub mac_address: Option<String>,
    pub ip_addresses: Vec<IpAddressInfo>,
}

/// Enumerate the host's interfaces, minus loopback and the configured
/// exclusion list. Cached briefly: enumeration goes through the OS on every
/// call and the answer rarely changes.
#[cached(time = 5)]
pub fn network_interfaces() -> Vec<InterfaceInfo> {
    describe_interfaces(
        &datalink::interfaces(),
        &crate::settings::manager::excluded_interfaces(),
    )
}

pub fn describe_interfaces(
    interfaces: &[datalink::NetworkInterface],
    excluded: &[String],
) -> Vec<InterfaceInfo> {
    interfaces
        .iter()
        .filter(|interface| {
            !interface.is_loopback() && !excluded.iter().any(|name| name == &interface.name)
        })
        .map(|interface| InterfaceInfo {
            name: interface.name.clone(),
            status: if interface.is_up() { "up" } else { "down" }.to_string(),
            mac_address: interface.mac.map(|mac| mac.to_string()),
            ip_addresses: interface.ips.iter().map(describe_address).collect(),
        })
        .collect()
}

fn describe_address(network: &IpNetwork) -> IpAddressInfo {
    match network {
        IpNetwork::V4(v4) => IpAddressInfo {
            family: "IPv4".to_string(),
            address: v4.ip().to_string(),
            prefixlen: v4.prefix(),
            broadcast: Some(v4.broadcast().to_string()),
        },
        IpNetwork::V6(v6) => IpAddressInfo {
            family: "IPv6".to_string(),
            address: v6.ip().to_string(),
            prefixlen: v6.prefix(),
            broadcast: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::{datalink::NetworkInterface, ipnetwork::Ipv4Network, util::MacAddr};
    use std::net::Ipv4Addr;

    const IFF_UP: u32 = 1;
    const IFF_LOOPBACK: u32 = 8;

    fn fake_interface(name: &str, flags: u32, ips: Vec<IpNetwork>) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            description: String::new(),
            index: 0,
            mac: Some(MacAddr::new(0xde, 0xad, 0xbe, 0xef, 0x00, 0x01)),
            ips,
            flags,
        }
    }

    #[test]
    fn test_loopback_and_excluded_are_filtered() {
        let interfaces = vec![
            fake_interface("lo", IFF_UP | IFF_LOOPBACK, vec![]),
            fake_interface("wlan0", IFF_UP, vec![]),
            fake_interface("eth0", IFF_UP, vec![]),
        ];
        let described = describe_interfaces(&interfaces, &["wlan0".to_string()]);

        assert_eq!(described.len(), 1);
        assert_eq!(described[0].name, "eth0");
        assert_eq!(described[0].status, "up");
    }

    #[test]
    fn test_addresses_carry_family_prefix_and_broadcast() {
        let network = Ipv4Network::new(Ipv4Addr::new(192, 168, 1, 10), 24).unwrap();
        let interfaces = vec![fake_interface("eth0", IFF_UP, vec![IpNetwork::V4(network)])];
        let described = describe_interfaces(&interfaces, &[]);

        let address = &described[0].ip_addresses[0];
        assert_eq!(address.family, "IPv4");
        assert_eq!(address.address, "192.168.1.10");
        assert_eq!(address.prefixlen, 24);
        assert_eq!(address.broadcast.as_deref(), Some("192.168.1.255"));
    }

    #[test]
    fn test_down_interface_is_reported_down() {
        let interfaces = vec![fake_interface("eth1", 0, vec![])];
        let described = describe_interfaces(&interfaces, &[]);
        assert_eq!(described[0].status, "down");
        assert_eq!(
            described[0].mac_address.as_deref(),
            Some("de:ad:be:ef:00:01")
        );
    }
}
