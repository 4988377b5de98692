use std::collections::BTreeMap;

use pbconf_ontology::{Axiom, AssertionValue, Identifier, KnowledgeBase, Literal, Scope};
use tracing::{debug, warn};

use super::{Rule, RuleRecord, REASONER_NAME};
use crate::config::{EngineConfig, RuleNamespace};
use crate::error::{EngineError, Result};
use crate::report::{friendly_explanation, Outcome};
use crate::resolve::RuleKind;

/// Reads and writes the rules of one rule namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStore {
    namespace: RuleNamespace,
    policy: String,
}

impl RuleStore {
    /// Creates a store for `namespace`, keeping rule individuals and their
    /// fields in the `policy` namespace IRI.
    pub fn new(namespace: RuleNamespace, policy: impl Into<String>) -> Self {
        Self {
            namespace,
            policy: policy.into(),
        }
    }

    /// The store for `namespace`, with the policy namespace taken from the
    /// knowledge base's prefix map.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured policy prefix is not bound.
    pub fn for_namespace<K: KnowledgeBase + ?Sized>(
        kb: &K,
        config: &EngineConfig,
        namespace: &RuleNamespace,
    ) -> Result<Self> {
        let policy = kb.prefixes().get(&config.policy_prefix).ok_or_else(|| {
            EngineError::config(format!("unknown policy prefix `{}`", config.policy_prefix))
        })?;
        Ok(Self::new(namespace.clone(), policy))
    }

    /// The rule namespace.
    #[must_use]
    pub fn namespace(&self) -> &RuleNamespace {
        &self.namespace
    }

    fn id(&self, local_name: &str) -> Identifier {
        Identifier::new(self.policy.as_str(), local_name)
    }

    /// The reasoner class every rule of the namespace belongs to.
    #[must_use]
    pub fn class(&self) -> Identifier {
        self.id(&self.namespace.class)
    }

    fn index(&self, id: &Identifier) -> Option<u64> {
        id.local_name()
            .strip_prefix(self.namespace.prefix.as_str())?
            .parse()
            .ok()
    }

    fn rule_ids<K: KnowledgeBase + ?Sized>(&self, kb: &K) -> Vec<Identifier> {
        kb.instances_of(&self.class())
            .into_iter()
            .filter(|id| id.namespace() == self.policy)
            .collect()
    }

    /// Every rule of the namespace, ordered by rule number.
    ///
    /// Records that do not decode to a rule are skipped.
    pub fn load<K: KnowledgeBase + ?Sized>(&self, kb: &K) -> Vec<RuleRecord> {
        let mut records: Vec<RuleRecord> = self
            .rule_ids(kb)
            .into_iter()
            .filter_map(|id| {
                let fields: BTreeMap<String, String> = kb
                    .assertions(&id, &[Scope::Policy])
                    .into_iter()
                    .filter_map(|a| match a.value {
                        AssertionValue::Literal(lit) => {
                            Some((a.property.local_name().to_owned(), lit.lexical()))
                        }
                        AssertionValue::Individual(_) => None,
                    })
                    .collect();
                let rule = fields
                    .get(REASONER_NAME)
                    .and_then(|name| name.parse::<RuleKind>().ok())
                    .and_then(|kind| Rule::from_fields(kind, &fields));
                match rule {
                    Some(rule) => Some(RuleRecord { id, rule }),
                    None => {
                        warn!(rule = %id, "skipping undecodable closed-world rule");
                        None
                    }
                }
            })
            .collect();
        records.sort_by(|a, b| {
            (self.index(&a.id), a.id.local_name()).cmp(&(self.index(&b.id), b.id.local_name()))
        });
        records
    }

    /// The name the next rule gets: one past the highest rule number in use,
    /// or number 0 when there are none.
    pub fn next_rule_name<K: KnowledgeBase + ?Sized>(&self, kb: &K) -> String {
        let next = self
            .rule_ids(kb)
            .iter()
            .filter_map(|id| self.index(id))
            .max()
            .map_or(0, |max| max + 1);
        format!("{}{next}", self.namespace.prefix)
    }

    /// Writes a rule under `name`.
    ///
    /// The policy scope is backed up first. If the knowledge base is
    /// inconsistent afterwards, the backup is restored and the outcome
    /// carries the explanation.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base cannot be written.
    pub fn save<K: KnowledgeBase + ?Sized>(
        &self,
        kb: &mut K,
        name: &str,
        rule: &Rule,
    ) -> Result<Outcome> {
        let backup = kb.snapshot(Scope::Policy)?;
        let id = self.id(name);
        kb.apply_axiom(
            Scope::Policy,
            Axiom::ClassAssertion {
                class: self.class(),
                individual: id.clone(),
            },
        )?;
        let kind = rule.kind();
        let fields = std::iter::once((REASONER_NAME, kind.as_str())).chain(rule.fields());
        for (field, value) in fields {
            kb.apply_axiom(
                Scope::Policy,
                Axiom::DataPropertyAssertion {
                    property: self.id(field),
                    subject: id.clone(),
                    value: Literal::Str(value.to_owned()),
                },
            )?;
        }

        if kb.is_consistent() {
            debug!(rule = name, kind = %kind, "saved closed-world rule");
            return Ok(Outcome::valid());
        }
        let explanation = friendly_explanation(&kb.explain());
        kb.restore(backup)?;
        debug!(rule = name, "rule made the knowledge base inconsistent, restored backup");
        Ok(Outcome::consistency(explanation))
    }

    /// Deletes every rule of the namespace. Returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base cannot be written.
    pub fn remove_all<K: KnowledgeBase + ?Sized>(&self, kb: &mut K) -> Result<usize> {
        let ids = self.rule_ids(kb);
        for id in &ids {
            kb.remove_individual(Scope::Policy, id)?;
        }
        Ok(ids.len())
    }

    /// Deletes every rule whose kind and fields repeat an earlier rule's.
    /// Returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base cannot be written.
    pub fn clear_duplicates<K: KnowledgeBase + ?Sized>(&self, kb: &mut K) -> Result<usize> {
        let mut seen: Vec<Rule> = Vec::new();
        let mut removed = 0;
        for record in self.load(kb) {
            if seen.contains(&record.rule) {
                kb.remove_individual(Scope::Policy, &record.id)?;
                removed += 1;
            } else {
                seen.push(record.rule);
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::closed_world::RestrictionRequest;
    use pbconf_ontology::{iris, MemoryKnowledgeBase};

    fn store() -> RuleStore {
        RuleStore::new(RuleNamespace::standard(), iris::NS_POLICY)
    }

    fn requires(class: &str, property: &str) -> Rule {
        Rule::presence(RuleKind::ClassMustHaveProperty, class, property).unwrap()
    }

    #[test]
    fn first_rule_is_number_zero() {
        let kb = MemoryKnowledgeBase::bootstrap();
        assert_eq!(store().next_rule_name(&kb), "cwr0");
    }

    #[test]
    fn next_name_follows_the_highest_number() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        let store = store();
        for name in ["cwr0", "cwr2", "cwr5"] {
            store.save(&mut kb, name, &requires("SEL421", "hasLvl1Pwd")).unwrap();
        }
        assert_eq!(store.next_rule_name(&kb), "cwr6");
    }

    #[test]
    fn saved_rules_load_in_number_order() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        let store = store();
        store.save(&mut kb, "cwr10", &requires("SEL421", "hasLvl2Pwd")).unwrap();
        store.save(&mut kb, "cwr9", &requires("SEL421", "hasLvl1Pwd")).unwrap();
        let names: Vec<String> = store
            .load(&kb)
            .iter()
            .map(|r| r.id.local_name().to_owned())
            .collect();
        assert_eq!(names, ["cwr9", "cwr10"]);
    }

    #[test]
    fn namespaces_do_not_mix() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        store().save(&mut kb, "cwr0", &requires("SEL421", "hasLvl1Pwd")).unwrap();
        let test = RuleStore::new(RuleNamespace::test(), iris::NS_POLICY);
        assert!(test.load(&kb).is_empty());
        assert_eq!(test.next_rule_name(&kb), "tcwr0");
    }

    #[test]
    fn conflicting_save_restores_the_backup() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        let store = store();
        store.save(&mut kb, "cwr0", &requires("SEL421", "hasLvl1Pwd")).unwrap();
        let before = kb.snapshot(Scope::Policy).unwrap();
        // Rule fields are functional, so a second rule under the same name
        // with different fields is inconsistent.
        let outcome = store
            .save(&mut kb, "cwr0", &requires("LINUX", "hasLvl2Pwd"))
            .unwrap();
        assert!(!outcome.is_valid());
        assert_eq!(kb.snapshot(Scope::Policy).unwrap(), before);
    }

    #[test]
    fn duplicates_are_cleared() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        let store = store();
        let restriction = Rule::restriction(
            RuleKind::ClassPropertyRestrictions,
            RestrictionRequest {
                target: "SEL421".to_owned(),
                subject: "hasLvl1Pwd".to_owned(),
                predicate: "min-length".to_owned(),
                object: "8".to_owned(),
            },
        )
        .unwrap();
        store.save(&mut kb, "cwr0", &restriction).unwrap();
        store.save(&mut kb, "cwr1", &requires("SEL421", "hasLvl1Pwd")).unwrap();
        store.save(&mut kb, "cwr2", &restriction).unwrap();
        assert_eq!(store.clear_duplicates(&mut kb).unwrap(), 1);
        let names: Vec<String> = store
            .load(&kb)
            .iter()
            .map(|r| r.id.local_name().to_owned())
            .collect();
        assert_eq!(names, ["cwr0", "cwr1"]);
    }

    #[test]
    fn remove_all_empties_the_namespace() {
        let mut kb = MemoryKnowledgeBase::bootstrap();
        let store = store();
        store.save(&mut kb, "cwr0", &requires("SEL421", "hasLvl1Pwd")).unwrap();
        store.save(&mut kb, "cwr1", &requires("LINUX", "hasPwd")).unwrap();
        assert_eq!(store.remove_all(&mut kb).unwrap(), 2);
        assert!(store.load(&kb).is_empty());
        assert_eq!(store.next_rule_name(&kb), "cwr0");
    }
}
