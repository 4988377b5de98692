//! Property translator.
//!
//! Configuration requests and policies use short names (`telnet`,
//! `password.level1`); the vocabulary uses canonical property names
//! (`hasTelnetStt`, `hasLvl1Pwd`). The tables here are the only place the two
//! meet. Everything is pure and total: unknown names pass through unchanged.

/// What a canonical property relates an individual to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Another individual.
    Object,
    /// A literal value.
    Literal,
    /// The individual's type.
    Description,
    /// Not a known property.
    Unknown,
}

/// The range of a canonical property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRange {
    /// An `IPAddress` individual.
    IpAddress,
    /// A `Person` individual.
    Person,
    /// A property with its own value handling (`authusers`).
    Custom,
    /// An `on`/`off` status individual.
    Status,
    /// An `SEL421Operation` individual.
    Sel421Operation,
    /// A `Role` individual.
    Role,
    /// An `SEL421Port5` individual.
    Sel421Port5,
    /// `xsd:boolean`.
    Boolean,
    /// `xsd:integer`.
    Integer,
    /// `xsd:string`.
    String,
    /// A class name.
    Type,
    /// No declared range.
    Unspecified,
}

static ALIASES: &[(&str, &str)] = &[
    ("ipAddr", "hasIPAddr"),
    ("routerIPAddr", "hasRouterIPAddr"),
    ("srcIPAddr", "hasSrcIPAddr"),
    ("dstIPAddr", "hasDstIPAddr"),
    ("authDNP", "authDNP"),
    ("authTelnet", "authTelnet"),
    ("authFTP", "authFTP"),
    ("dnp", "hasDNP3Stt"),
    ("dnp3", "hasDNP3Stt"),
    ("ftpAnon", "hasFTPAnonStt"),
    ("ftp", "hasFTPStt"),
    ("iec", "hasIEC61850Stt"),
    ("ntp", "hasNTPStt"),
    ("ping", "hasPingStt"),
    ("stt", "hasStt"),
    ("telnet", "hasTelnetStt"),
    ("accessLogging", "hasAccessLoggingStt"),
    ("alarm", "hasAlarmStt"),
    ("gps", "hasGPSStt"),
    ("role", "hasRole"),
    ("port5", "hasPort5"),
    ("port5Cfg", "hasPort5CfgO"),
    ("sel421Cfg", "hasSEL421CfgO"),
    ("firewallPolicy", "hasFirewallPolicy"),
    ("digitalCertificate", "hasDigitalCertificate"),
    ("certificateAuthority", "hasCertificateAuthority"),
    ("allowedOperation", "hasAllowedOperation"),
    ("action", "hasAction"),
    ("byte", "hasByte"),
    ("byte1", "hasByte1"),
    ("byte2", "hasByte2"),
    ("byte3", "hasByte3"),
    ("byte4", "hasByte4"),
    ("order", "hasOrder"),
    ("port", "hasPort"),
    ("dstPort", "hasDstPort"),
    ("srcPort", "hasSrcPort"),
    ("telnetPort", "hasTelnetPort"),
    ("telnetTimeout", "hasTelnetTimeout"),
    ("accessTimeout", "hasAccessTimeout"),
    ("retryDelayed", "hasRetryDelayed"),
    ("macAddr", "hasMACAddr"),
    ("expirationDate", "hasExpirationDate"),
    ("password", "hasPwd"),
    ("level1", "hasLvl1Pwd"),
    ("password.level1", "hasLvl1Pwd"),
    ("level2", "hasLvl2Pwd"),
    ("password.level2", "hasLvl2Pwd"),
    ("levelC", "hasLvlCPwd"),
    ("password.levelC", "hasLvlCPwd"),
    ("level1A", "hasLvl1APwd"),
    ("password.level1A", "hasLvl1APwd"),
    ("level1B", "hasLvl1BPwd"),
    ("password.level1B", "hasLvl1BPwd"),
    ("level1O", "hasLvl1OPwd"),
    ("password.level1O", "hasLvl1OPwd"),
    ("level1P", "hasLvl1PPwd"),
    ("password.level1P", "hasLvl1PPwd"),
    ("description.type", "type"),
    ("description", "type"),
];

static PROPERTIES: &[(&str, PropertyKind, PropertyRange)] = {
    use PropertyKind::{Description, Literal, Object};
    use PropertyRange as R;
    &[
        ("hasIPAddr", Object, R::IpAddress),
        ("hasRouterIPAddr", Object, R::IpAddress),
        ("hasSrcIPAddr", Object, R::IpAddress),
        ("hasDstIPAddr", Object, R::IpAddress),
        ("authDNP", Object, R::Person),
        ("authTelnet", Object, R::Person),
        ("authFTP", Object, R::Person),
        ("authusers", Object, R::Custom),
        ("anonymousftp", Object, R::Status),
        ("hasAllowedOperation", Object, R::Sel421Operation),
        ("hasDNP3Stt", Object, R::Status),
        ("hasFTPAnonStt", Object, R::Status),
        ("hasFTPStt", Object, R::Status),
        ("hasIEC61850Stt", Object, R::Status),
        ("hasNTPStt", Object, R::Status),
        ("hasPingStt", Object, R::Status),
        ("hasStt", Object, R::Status),
        ("hasTelnetStt", Object, R::Status),
        ("hasAccessLoggingStt", Object, R::Status),
        ("hasAlarmStt", Object, R::Status),
        ("hasGPSStt", Object, R::Status),
        ("hasRole", Object, R::Role),
        ("hasPort5", Object, R::Sel421Port5),
        ("hasPort5CfgO", Object, R::Unspecified),
        ("hasSEL421CfgO", Object, R::Unspecified),
        ("hasFirewallPolicy", Object, R::Unspecified),
        ("hasDigitalCertificate", Object, R::Unspecified),
        ("hasCertificateAuthority", Object, R::Unspecified),
        ("hasAction", Literal, R::Boolean),
        ("hasByte", Literal, R::Integer),
        ("hasByte1", Literal, R::Integer),
        ("hasByte2", Literal, R::Integer),
        ("hasByte3", Literal, R::Integer),
        ("hasByte4", Literal, R::Integer),
        ("hasOrder", Literal, R::Integer),
        ("hasPort", Literal, R::Integer),
        ("hasDstPort", Literal, R::Integer),
        ("hasSrcPort", Literal, R::Integer),
        ("hasTelnetPort", Literal, R::Integer),
        ("hasTelnetTimeout", Literal, R::Integer),
        ("hasAccessTimeout", Literal, R::Integer),
        ("hasRetryDelayed", Literal, R::Integer),
        ("hasMACAddr", Literal, R::String),
        ("hasExpirationDate", Literal, R::String),
        ("hasPwd", Literal, R::String),
        ("hasLvl1Pwd", Literal, R::String),
        ("hasLvl2Pwd", Literal, R::String),
        ("hasLvlCPwd", Literal, R::String),
        ("hasLvl1APwd", Literal, R::String),
        ("hasLvl1BPwd", Literal, R::String),
        ("hasLvl1OPwd", Literal, R::String),
        ("hasLvl1PPwd", Literal, R::String),
        ("type", Description, R::Type),
    ]
};

/// Maps a short name to its canonical property name.
///
/// Names without an alias (including canonical names) are returned as given.
#[must_use]
pub fn translate(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, canonical)| canonical)
}

fn entry(canonical: &str) -> Option<&'static (&'static str, PropertyKind, PropertyRange)> {
    PROPERTIES.iter().find(|(name, _, _)| *name == canonical)
}

/// What a canonical property relates to.
#[must_use]
pub fn property_kind(canonical: &str) -> PropertyKind {
    entry(canonical).map_or(PropertyKind::Unknown, |(_, kind, _)| *kind)
}

/// The range of a canonical property.
#[must_use]
pub fn property_range(canonical: &str) -> PropertyRange {
    entry(canonical).map_or(PropertyRange::Unspecified, |(_, _, range)| *range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbconf_ontology::{EntityKind, KnowledgeBase, MemoryKnowledgeBase};

    #[test]
    fn short_names_translate() {
        assert_eq!(translate("telnet"), "hasTelnetStt");
        assert_eq!(translate("password.level1"), "hasLvl1Pwd");
        assert_eq!(translate("level1"), "hasLvl1Pwd");
        assert_eq!(translate("srcPort"), "hasSrcPort");
        assert_eq!(translate("description.type"), "type");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(translate("hasTelnetStt"), "hasTelnetStt");
        assert_eq!(translate("frobnicate"), "frobnicate");
        assert_eq!(property_kind("frobnicate"), PropertyKind::Unknown);
        assert_eq!(property_range("frobnicate"), PropertyRange::Unspecified);
    }

    #[test]
    fn kinds_and_ranges() {
        assert_eq!(property_kind("hasTelnetStt"), PropertyKind::Object);
        assert_eq!(property_range("hasTelnetStt"), PropertyRange::Status);
        assert_eq!(property_range("authDNP"), PropertyRange::Person);
        assert_eq!(property_range("hasTelnetPort"), PropertyRange::Integer);
        assert_eq!(property_range("hasAction"), PropertyRange::Boolean);
        assert_eq!(property_kind("type"), PropertyKind::Description);
    }

    #[test]
    fn every_translation_target_is_in_the_vocabulary() {
        let kb = MemoryKnowledgeBase::bootstrap();
        for (_, canonical) in ALIASES.iter().filter(|(_, c)| *c != "type") {
            let known = kb.exists(EntityKind::ObjectProperty, canonical, true)
                || kb.exists(EntityKind::DataProperty, canonical, true);
            assert!(known, "{canonical} is not a core property");
        }
    }

    #[test]
    fn every_described_property_kind_matches_the_vocabulary() {
        let kb = MemoryKnowledgeBase::bootstrap();
        for (name, kind, _) in PROPERTIES {
            match kind {
                PropertyKind::Object => {
                    assert!(kb.exists(EntityKind::ObjectProperty, name, true), "{name}");
                }
                PropertyKind::Literal => {
                    assert!(kb.exists(EntityKind::DataProperty, name, true), "{name}");
                }
                _ => {}
            }
        }
    }
}
