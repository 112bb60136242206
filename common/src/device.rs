use std::fmt;

/// Coarse device category attached to every reported host.
///
/// The vocabulary is closed; [`DeviceType::Unknown`] is the fallback when no
/// heuristic matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Router,
    Computer,
    NetworkEquipment,
    NetworkDevice,
    AppleDevice,
    AndroidDevice,
    MobileDevice,
    RaspberryPi,
    IotDevice,
    Printer,
    MediaDevice,
    SecurityCamera,
    WindowsDevice,
    WindowsNetworkDevice,
    SmartHomeDevice,
    VirtualMachine,
    Server,
    GamingConsole,
    StorageDevice,
    AudioDevice,
    VirtualInterface,
    MulticastDevice,
    WebServer,
    SshServer,
    FtpServer,
    DnsServer,
    MailServer,
    TimeServer,
    SnmpDevice,
    Chromecast,
    PlexServer,
    MdnsDevice,
    UpnpDevice,
    GoToMeeting,
    StunServer,
    L2tpVpn,
    OpenVpn,
    IpsecVpn,
    PptpVpn,
    MqttBroker,
    MqttSslBroker,
    TeamViewer,
    AppleRemoteDesktop,
    AfpServer,
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Router => "Router",
            DeviceType::Computer => "Computer",
            DeviceType::NetworkEquipment => "Network Equipment",
            DeviceType::NetworkDevice => "Network Device",
            DeviceType::AppleDevice => "Apple Device",
            DeviceType::AndroidDevice => "Android Device",
            DeviceType::MobileDevice => "Mobile Device",
            DeviceType::RaspberryPi => "Raspberry Pi",
            DeviceType::IotDevice => "IoT Device",
            DeviceType::Printer => "Printer",
            DeviceType::MediaDevice => "Media Device",
            DeviceType::SecurityCamera => "Security Camera",
            DeviceType::WindowsDevice => "Windows Device",
            DeviceType::WindowsNetworkDevice => "Windows Network Device",
            DeviceType::SmartHomeDevice => "Smart Home Device",
            DeviceType::VirtualMachine => "Virtual Machine",
            DeviceType::Server => "Server",
            DeviceType::GamingConsole => "Gaming Console",
            DeviceType::StorageDevice => "Storage Device",
            DeviceType::AudioDevice => "Audio Device",
            DeviceType::VirtualInterface => "Virtual Interface",
            DeviceType::MulticastDevice => "Multicast Device",
            DeviceType::WebServer => "Web Server",
            DeviceType::SshServer => "SSH Server",
            DeviceType::FtpServer => "FTP Server",
            DeviceType::DnsServer => "DNS Server",
            DeviceType::MailServer => "Mail Server",
            DeviceType::TimeServer => "Time Server",
            DeviceType::SnmpDevice => "SNMP Device",
            DeviceType::Chromecast => "Chromecast",
            DeviceType::PlexServer => "Plex Server",
            DeviceType::MdnsDevice => "mDNS Device",
            DeviceType::UpnpDevice => "UPNP Device",
            DeviceType::GoToMeeting => "GoToMeeting",
            DeviceType::StunServer => "STUN Server",
            DeviceType::L2tpVpn => "L2TP VPN",
            DeviceType::OpenVpn => "OpenVPN",
            DeviceType::IpsecVpn => "IPsec VPN",
            DeviceType::PptpVpn => "PPTP VPN",
            DeviceType::MqttBroker => "MQTT Broker",
            DeviceType::MqttSslBroker => "MQTT SSL Broker",
            DeviceType::TeamViewer => "TeamViewer",
            DeviceType::AppleRemoteDesktop => "Apple Remote Desktop",
            DeviceType::AfpServer => "AFP Server",
            DeviceType::Unknown => "Unknown Device",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
