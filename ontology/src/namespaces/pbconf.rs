//! `pbconf` core namespace: the device vocabulary.
//!
//! Devices (SEL-421 relays and Linux hosts), their ports and addresses, the
//! people authorized to reach them, and the on/off status individuals every
//! service property ranges over. Configuration requests may only name
//! properties; the classes and status individuals here are fixed.
//!
//! **Scope:** `core`.

use crate::model::iris::*;
use crate::model::{Class, Individual, Namespace, NamespaceModule, Property, PropertyKind, Scope};

/// Returns the core namespace module.
#[must_use]
pub fn module() -> NamespaceModule {
    NamespaceModule {
        namespace: Namespace {
            prefix: "pbconf",
            iri: NS_CORE,
            label: "PBConf Core",
            comment: "Device classes, service and credential properties, and the \
                      status individuals shared by every device configuration.",
            scope: Scope::Core,
            imports: &[],
        },
        classes: classes(),
        properties: properties(),
        individuals: individuals(),
    }
}

fn classes() -> Vec<Class> {
    vec![
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/core#Device",
            label: "Device",
            comment: "A configurable networked device managed by PBConf.",
            subclass_of: &[OWL_THING],
            disjoint_with: &[
                "http://iti.illinois.edu/iti/pbconf/core#Person",
                "http://iti.illinois.edu/iti/pbconf/core#Status",
                "http://iti.illinois.edu/iti/pbconf/core#IPAddress",
            ],
        },
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/core#SEL421",
            label: "SEL421",
            comment: "An SEL-421 protection, automation and control relay.",
            subclass_of: &["http://iti.illinois.edu/iti/pbconf/core#Device"],
            disjoint_with: &["http://iti.illinois.edu/iti/pbconf/core#LINUX"],
        },
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/core#LINUX",
            label: "LINUX",
            comment: "A Linux host exposing telnet, FTP and DNP3 services.",
            subclass_of: &["http://iti.illinois.edu/iti/pbconf/core#Device"],
            disjoint_with: &["http://iti.illinois.edu/iti/pbconf/core#SEL421"],
        },
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/core#SEL421Port5",
            label: "SEL421Port5",
            comment: "The Ethernet port (port 5) card of an SEL-421 relay.",
            subclass_of: &[OWL_THING],
            disjoint_with: &["http://iti.illinois.edu/iti/pbconf/core#Person"],
        },
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/core#IPAddress",
            label: "IPAddress",
            comment: "An IPv4 address described by its four bytes.",
            subclass_of: &[OWL_THING],
            disjoint_with: &[
                "http://iti.illinois.edu/iti/pbconf/core#Person",
                "http://iti.illinois.edu/iti/pbconf/core#Device",
            ],
        },
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/core#Person",
            label: "Person",
            comment: "A user who may be authorized to access device services.",
            subclass_of: &[OWL_THING],
            disjoint_with: &[
                "http://iti.illinois.edu/iti/pbconf/core#Device",
                "http://iti.illinois.edu/iti/pbconf/core#IPAddress",
                "http://iti.illinois.edu/iti/pbconf/core#SEL421Port5",
                "http://iti.illinois.edu/iti/pbconf/core#Status",
            ],
        },
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/core#Role",
            label: "Role",
            comment: "An operational role assigned to a device.",
            subclass_of: &[OWL_THING],
            disjoint_with: &[],
        },
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/core#Status",
            label: "Status",
            comment: "The on/off state of a device service. Exactly the individuals \
                      `on` and `off`.",
            subclass_of: &[OWL_THING],
            disjoint_with: &[
                "http://iti.illinois.edu/iti/pbconf/core#Device",
                "http://iti.illinois.edu/iti/pbconf/core#Person",
            ],
        },
        Class {
            id: "http://iti.illinois.edu/iti/pbconf/core#SEL421Operation",
            label: "SEL421Operation",
            comment: "An operation an SEL-421 port may be allowed to perform.",
            subclass_of: &[OWL_THING],
            disjoint_with: &[],
        },
    ]
}

const fn object(
    id: &'static str,
    label: &'static str,
    comment: &'static str,
    range: Option<&'static str>,
    functional: bool,
) -> Property {
    Property {
        id,
        label,
        comment,
        kind: PropertyKind::Object,
        functional,
        domain: None,
        range,
    }
}

const fn datatype(
    id: &'static str,
    label: &'static str,
    comment: &'static str,
    range: &'static str,
) -> Property {
    Property {
        id,
        label,
        comment,
        kind: PropertyKind::Datatype,
        functional: false,
        domain: None,
        range: Some(range),
    }
}

const IP_ADDRESS: Option<&str> = Some("http://iti.illinois.edu/iti/pbconf/core#IPAddress");
const PERSON: Option<&str> = Some("http://iti.illinois.edu/iti/pbconf/core#Person");
const STATUS: Option<&str> = Some("http://iti.illinois.edu/iti/pbconf/core#Status");

fn properties() -> Vec<Property> {
    vec![
        // Addresses
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasIPAddr",
            "hasIPAddr",
            "The IP address of a device or port.",
            IP_ADDRESS,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasRouterIPAddr",
            "hasRouterIPAddr",
            "The default router of a device or port.",
            IP_ADDRESS,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasSrcIPAddr",
            "hasSrcIPAddr",
            "Source address matched by a firewall rule.",
            IP_ADDRESS,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasDstIPAddr",
            "hasDstIPAddr",
            "Destination address matched by a firewall rule.",
            IP_ADDRESS,
            false,
        ),
        // Authorized users
        object(
            "http://iti.illinois.edu/iti/pbconf/core#authDNP",
            "authDNP",
            "A person authorized to use the DNP3 service.",
            PERSON,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#authTelnet",
            "authTelnet",
            "A person authorized to use the telnet service.",
            PERSON,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#authFTP",
            "authFTP",
            "A person authorized to use the FTP service.",
            PERSON,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#authusers",
            "authusers",
            "Whether per-service authorized user lists are enforced.",
            None,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#anonymousftp",
            "anonymousftp",
            "Whether anonymous FTP is offered.",
            STATUS,
            false,
        ),
        // Service states
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasDNP3Stt",
            "hasDNP3Stt",
            "State of the DNP3 service.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasFTPAnonStt",
            "hasFTPAnonStt",
            "State of anonymous FTP access.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasFTPStt",
            "hasFTPStt",
            "State of the FTP service.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasIEC61850Stt",
            "hasIEC61850Stt",
            "State of the IEC 61850 service.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasNTPStt",
            "hasNTPStt",
            "State of the NTP client.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasPingStt",
            "hasPingStt",
            "Whether the device answers ICMP echo.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasStt",
            "hasStt",
            "Generic service state.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasTelnetStt",
            "hasTelnetStt",
            "State of the telnet service.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasAccessLoggingStt",
            "hasAccessLoggingStt",
            "State of access logging.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasAlarmStt",
            "hasAlarmStt",
            "State of the alarm contact.",
            STATUS,
            true,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasGPSStt",
            "hasGPSStt",
            "State of the GPS time source.",
            STATUS,
            true,
        ),
        // Structure
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasRole",
            "hasRole",
            "The operational role of a device.",
            Some("http://iti.illinois.edu/iti/pbconf/core#Role"),
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasPort5",
            "hasPort5",
            "The port 5 card of an SEL-421.",
            Some("http://iti.illinois.edu/iti/pbconf/core#SEL421Port5"),
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasAllowedOperation",
            "hasAllowedOperation",
            "An operation the port may perform.",
            Some("http://iti.illinois.edu/iti/pbconf/core#SEL421Operation"),
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasPort5CfgO",
            "hasPort5CfgO",
            "The stored port 5 configuration object.",
            None,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasSEL421CfgO",
            "hasSEL421CfgO",
            "The stored relay configuration object.",
            None,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasFirewallPolicy",
            "hasFirewallPolicy",
            "The firewall policy applied to a host.",
            None,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasDigitalCertificate",
            "hasDigitalCertificate",
            "The certificate a device presents.",
            None,
            false,
        ),
        object(
            "http://iti.illinois.edu/iti/pbconf/core#hasCertificateAuthority",
            "hasCertificateAuthority",
            "The authority that issued a certificate.",
            None,
            false,
        ),
        // Literals
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasAction",
            "hasAction",
            "Whether a firewall rule accepts (true) or drops (false).",
            XSD_BOOLEAN,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasByte",
            "hasByte",
            "A single address byte.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasByte1",
            "hasByte1",
            "First byte of an IPv4 address.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasByte2",
            "hasByte2",
            "Second byte of an IPv4 address.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasByte3",
            "hasByte3",
            "Third byte of an IPv4 address.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasByte4",
            "hasByte4",
            "Fourth byte of an IPv4 address.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasOrder",
            "hasOrder",
            "Evaluation order of a firewall rule.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasPort",
            "hasPort",
            "A TCP or UDP port.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasDstPort",
            "hasDstPort",
            "Destination port matched by a firewall rule.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasSrcPort",
            "hasSrcPort",
            "Source port matched by a firewall rule.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasTelnetPort",
            "hasTelnetPort",
            "Port the telnet service listens on.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasTelnetTimeout",
            "hasTelnetTimeout",
            "Idle timeout of a telnet session, in minutes.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasAccessTimeout",
            "hasAccessTimeout",
            "Idle timeout of an access level, in minutes.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasRetryDelayed",
            "hasRetryDelayed",
            "Delay before a failed connection is retried.",
            XSD_INTEGER,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasMACAddr",
            "hasMACAddr",
            "Hardware address of a port.",
            XSD_STRING,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasExpirationDate",
            "hasExpirationDate",
            "Expiration date of a certificate.",
            XSD_STRING,
        ),
        // Credentials
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasPwd",
            "hasPwd",
            "A generic account password.",
            XSD_STRING,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasLvl1Pwd",
            "hasLvl1Pwd",
            "SEL-421 access level 1 password.",
            XSD_STRING,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasLvl2Pwd",
            "hasLvl2Pwd",
            "SEL-421 access level 2 password.",
            XSD_STRING,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasLvlCPwd",
            "hasLvlCPwd",
            "SEL-421 access level C password.",
            XSD_STRING,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasLvl1APwd",
            "hasLvl1APwd",
            "SEL-421 access level 1A password.",
            XSD_STRING,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasLvl1BPwd",
            "hasLvl1BPwd",
            "SEL-421 access level 1B password.",
            XSD_STRING,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasLvl1OPwd",
            "hasLvl1OPwd",
            "SEL-421 access level 1O password.",
            XSD_STRING,
        ),
        datatype(
            "http://iti.illinois.edu/iti/pbconf/core#hasLvl1PPwd",
            "hasLvl1PPwd",
            "SEL-421 access level 1P password.",
            XSD_STRING,
        ),
    ]
}

fn individuals() -> Vec<Individual> {
    vec![
        Individual {
            id: "http://iti.illinois.edu/iti/pbconf/core#on",
            types: &["http://iti.illinois.edu/iti/pbconf/core#Status"],
            label: "on",
            comment: "The service is enabled.",
            properties: &[],
        },
        Individual {
            id: "http://iti.illinois.edu/iti/pbconf/core#off",
            types: &["http://iti.illinois.edu/iti/pbconf/core#Status"],
            label: "off",
            comment: "The service is disabled.",
            properties: &[],
        },
        Individual {
            id: "http://iti.illinois.edu/iti/pbconf/core#sel421_automation_setting",
            types: &["http://iti.illinois.edu/iti/pbconf/core#SEL421Operation"],
            label: "sel421_automation_setting",
            comment: "Permission to change automation settings over port 5.",
            properties: &[],
        },
    ]
}
