//! Device configuration commands.
//!
//! A configuration request is a list of `{Op, Key, Val, Svc}` commands about
//! one device. The ontologizer turns each command into assertions in the
//! partial-config scope. It rejects commands it cannot express by returning
//! `false`; the knowledge base itself is never asked.

use std::str::FromStr;

use pbconf_ontology::{Axiom, EntityKind, Identifier, KnowledgeBase, Literal, Scope};
use tracing::trace;

use crate::error::Result;
use crate::translate::{property_kind, property_range, translate, PropertyKind, PropertyRange};

/// The device families with their own command rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// An SEL-421 relay.
    Sel421,
    /// A Linux host, and any other device.
    Linux,
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sel421" => Ok(DeviceKind::Sel421),
            "linux" => Ok(DeviceKind::Linux),
            _ => Err(format!("Unknown ontologizer : {s}")),
        }
    }
}

impl DeviceKind {
    /// The family of a device already in the knowledge base, from its types.
    pub fn infer<K: KnowledgeBase + ?Sized>(kb: &K, individual: &Identifier) -> Self {
        if kb
            .types_of(individual)
            .iter()
            .any(|t| t.local_name() == "SEL421")
        {
            DeviceKind::Sel421
        } else {
            DeviceKind::Linux
        }
    }

    /// The name used in requests.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Sel421 => "SEL421",
            DeviceKind::Linux => "LINUX",
        }
    }
}

/// A configuration operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A service setting: a status or an authorized user list.
    ServiceOption,
    /// A service state or its value.
    Service,
    /// A typed variable.
    Variable,
    /// A password.
    Password,
    /// The device's class.
    Type,
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "service_option" => Ok(Operation::ServiceOption),
            "service" => Ok(Operation::Service),
            "variable" => Ok(Operation::Variable),
            "password" => Ok(Operation::Password),
            "type" => Ok(Operation::Type),
            _ => Err(format!("Unknown operation : {s}")),
        }
    }
}

fn is_status(value: &str) -> bool {
    value.eq_ignore_ascii_case("on") || value.eq_ignore_ascii_case("off")
}

/// Applies configuration commands for one device.
pub struct Ontologizer<'k, K: KnowledgeBase + ?Sized> {
    kb: &'k mut K,
    kind: DeviceKind,
    device: Identifier,
}

impl<'k, K: KnowledgeBase + ?Sized> Ontologizer<'k, K> {
    /// Creates an ontologizer writing assertions about `device`.
    pub fn new(kb: &'k mut K, kind: DeviceKind, device: Identifier) -> Self {
        Self { kb, kind, device }
    }

    /// Applies one command. Returns `false` when the command is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base cannot be written.
    pub fn apply(&mut self, op: &str, key: &str, value: &str, service: &str) -> Result<bool> {
        let Ok(op) = op.parse::<Operation>() else {
            return Ok(false);
        };
        trace!(device = %self.device, ?op, key, value, "applying configuration command");
        match op {
            Operation::ServiceOption => self.service_option(key, value, service),
            Operation::Service => self.service(key, value),
            Operation::Variable => self.variable(key, value),
            Operation::Password => self.password(key, value),
            Operation::Type => self.set_type(value),
        }
    }

    fn property(&self, kind: EntityKind, name: &str) -> Identifier {
        self.kb
            .find(kind, name, true)
            .unwrap_or_else(|| self.kb.resolve(name))
    }

    fn status(&self, value: &str) -> Identifier {
        let state = if value.eq_ignore_ascii_case("on") { "on" } else { "off" };
        self.property(EntityKind::Individual, state)
    }

    fn individual(&self, name: &str) -> Identifier {
        self.kb
            .find(EntityKind::Individual, name, false)
            .unwrap_or_else(|| self.kb.resolve(name))
    }

    /// Removes the device's assertions of `property` from the committed and
    /// the staged configuration.
    fn clear_property(&mut self, property: &Identifier) -> Result<()> {
        self.kb.remove_property(Scope::Config, &self.device, property)?;
        self.kb
            .remove_property(Scope::PartialConfig, &self.device, property)?;
        Ok(())
    }

    fn set_object(&mut self, property: Identifier, object: Identifier) -> Result<()> {
        self.kb.apply_axiom(
            Scope::PartialConfig,
            Axiom::ObjectPropertyAssertion {
                property,
                subject: self.device.clone(),
                object,
            },
        )?;
        Ok(())
    }

    fn set_data(&mut self, property: Identifier, value: Literal) -> Result<()> {
        self.kb.apply_axiom(
            Scope::PartialConfig,
            Axiom::DataPropertyAssertion {
                property,
                subject: self.device.clone(),
                value,
            },
        )?;
        Ok(())
    }

    fn service_option(&mut self, key: &str, value: &str, service: &str) -> Result<bool> {
        if is_status(value) {
            let name = match (key, service.to_ascii_lowercase().as_str()) {
                ("authusers", "telnet") => "hasTelnetStt",
                ("authusers", "ftp") => "hasFTPStt",
                ("authusers", "dnp" | "dnp3") => "hasDNP3Stt",
                ("anonymousftp", _) => "hasFTPAnonStt",
                _ => return Ok(false),
            };
            let property = self.property(EntityKind::ObjectProperty, name);
            let status = self.status(value);
            self.clear_property(&property)?;
            self.set_object(property, status)?;
            return Ok(true);
        }

        if key != "authusers" {
            return Ok(false);
        }
        if self.kind == DeviceKind::Sel421 {
            let person = self.property(EntityKind::Class, "Person");
            let names_person = value
                .split_whitespace()
                .any(|user| self.kb.types_of(&self.individual(user)).contains(&person));
            if names_person {
                return Ok(false);
            }
        }
        let name = match service.to_ascii_lowercase().as_str() {
            "telnet" => "authTelnet",
            "ftp" => "authFTP",
            "dnp" | "dnp3" => "authDNP",
            _ => return Ok(false),
        };
        let property = self.property(EntityKind::ObjectProperty, name);
        self.clear_property(&property)?;
        for user in value.split_whitespace() {
            let user = self.individual(user);
            self.set_object(property.clone(), user)?;
        }
        Ok(true)
    }

    fn service(&mut self, key: &str, value: &str) -> Result<bool> {
        let property = self.property(EntityKind::ObjectProperty, translate(key));
        let status_class = self.property(EntityKind::Class, "Status");
        if self.kind == DeviceKind::Sel421
            && self.kb.object_property_has_range(&property, &status_class)
            && !is_status(value)
        {
            return Ok(false);
        }
        let object = if is_status(value) {
            self.status(value)
        } else {
            match value.split_whitespace().next() {
                Some(first) => self.individual(first),
                None => return Ok(false),
            }
        };
        self.clear_property(&property)?;
        self.set_object(property, object)?;
        Ok(true)
    }

    fn variable(&mut self, key: &str, value: &str) -> Result<bool> {
        if key == "type" {
            return self.set_type(value);
        }
        let canonical = translate(key);
        if property_kind(canonical) == PropertyKind::Object {
            return Ok(false);
        }
        let literal = match property_range(canonical) {
            PropertyRange::Integer => match value.trim().parse() {
                Ok(i) => Literal::Int(i),
                Err(_) => return Ok(false),
            },
            PropertyRange::Boolean => match value.to_ascii_lowercase().parse() {
                Ok(b) => Literal::Bool(b),
                Err(_) => return Ok(false),
            },
            PropertyRange::String => Literal::Str(value.to_owned()),
            PropertyRange::Unspecified => {
                if let Ok(i) = value.trim().parse() {
                    Literal::Int(i)
                } else if let Ok(b) = value.to_ascii_lowercase().parse() {
                    Literal::Bool(b)
                } else if value.is_empty() {
                    return Ok(false);
                } else {
                    Literal::Str(value.to_owned())
                }
            }
            _ => return Ok(false),
        };
        let property = self.property(EntityKind::DataProperty, canonical);
        self.clear_property(&property)?;
        self.set_data(property, literal)?;
        Ok(true)
    }

    fn password(&mut self, key: &str, value: &str) -> Result<bool> {
        let property = self.property(EntityKind::DataProperty, translate(key));
        self.clear_property(&property)?;
        self.set_data(property, Literal::Str(value.to_owned()))?;
        Ok(true)
    }

    fn set_type(&mut self, value: &str) -> Result<bool> {
        if value.trim().is_empty() {
            return Ok(false);
        }
        let class = self.property(EntityKind::Class, value.trim());
        self.kb.apply_axiom(
            Scope::PartialConfig,
            Axiom::ClassAssertion {
                class,
                individual: self.device.clone(),
            },
        )?;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pbconf_ontology::{iris, AssertionValue, MemoryKnowledgeBase};

    fn device() -> Identifier {
        Identifier::new(iris::NS_CORE, "linuxa")
    }

    fn run(kb: &mut MemoryKnowledgeBase, kind: DeviceKind, cmd: [&str; 4]) -> bool {
        Ontologizer::new(kb, kind, device())
            .apply(cmd[0], cmd[1], cmd[2], cmd[3])
            .unwrap()
    }

    fn values(kb: &MemoryKnowledgeBase, property: &str) -> Vec<String> {
        kb.assertions(&device(), &Scope::ALL)
            .into_iter()
            .filter(|a| a.property.local_name() == property)
            .map(|a| a.value.text())
            .collect()
    }

    #[test]
    fn status_options() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        assert!(run(&mut kb, DeviceKind::Linux, ["service_option", "authusers", "on", "telnet"]));
        assert_eq!(values(&kb, "hasTelnetStt"), ["on"]);
        assert!(run(&mut kb, DeviceKind::Linux, ["service_option", "anonymousftp", "OFF", ""]));
        assert_eq!(values(&kb, "hasFTPAnonStt"), ["off"]);
        assert!(!run(&mut kb, DeviceKind::Linux, ["service_option", "banner", "on", ""]));
    }

    #[test]
    fn user_lists_replace_previous_users() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        assert!(run(&mut kb, DeviceKind::Linux, ["service_option", "authusers", "Joe Andy", "dnp"]));
        assert!(run(&mut kb, DeviceKind::Linux, ["service_option", "authusers", "Adrian", "dnp"]));
        assert_eq!(values(&kb, "authDNP"), ["Adrian"]);
        assert!(!run(&mut kb, DeviceKind::Linux, ["service_option", "authusers", "Joe", "ssh"]));
    }

    #[test]
    fn variables_are_typed_by_range() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        assert!(run(&mut kb, DeviceKind::Linux, ["variable", "telnetPort", "23", ""]));
        let port = kb
            .assertions(&device(), &[Scope::PartialConfig])
            .into_iter()
            .find(|a| a.property.local_name() == "hasTelnetPort")
            .unwrap();
        assert_eq!(port.value, AssertionValue::Literal(Literal::Int(23)));
        assert!(!run(&mut kb, DeviceKind::Linux, ["variable", "telnetPort", "twenty", ""]));
        assert!(!run(&mut kb, DeviceKind::Linux, ["variable", "telnet", "on", ""]));
        assert!(!run(&mut kb, DeviceKind::Linux, ["variable", "mystery", "", ""]));
    }

    #[test]
    fn services_take_status_or_an_individual() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        assert!(run(&mut kb, DeviceKind::Linux, ["service", "ping", "on", ""]));
        assert_eq!(values(&kb, "hasPingStt"), ["on"]);
        assert!(run(&mut kb, DeviceKind::Linux, ["service", "role", "operator extra", ""]));
        assert_eq!(values(&kb, "hasRole"), ["operator"]);
    }

    #[test]
    fn relays_reject_non_status_service_values() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        assert!(!run(&mut kb, DeviceKind::Sel421, ["service", "telnet", "maybe", ""]));
        assert!(run(&mut kb, DeviceKind::Sel421, ["service", "telnet", "off", ""]));
    }

    #[test]
    fn type_and_password() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        assert!(run(&mut kb, DeviceKind::Linux, ["type", "", "LINUX", ""]));
        assert!(run(&mut kb, DeviceKind::Linux, ["password", "password.level1", "s3cret", ""]));
        assert_eq!(DeviceKind::infer(&kb, &device()), DeviceKind::Linux);
        assert_eq!(values(&kb, "hasLvl1Pwd"), ["s3cret"]);
        assert!(!run(&mut kb, DeviceKind::Linux, ["reboot", "", "", ""]));
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("sel421".parse::<DeviceKind>(), Ok(DeviceKind::Sel421));
        assert_eq!("Service_Option".parse::<Operation>(), Ok(Operation::ServiceOption));
        assert!("router".parse::<DeviceKind>().is_err());
    }
}
