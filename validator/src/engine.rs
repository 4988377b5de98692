//! The validation orchestrator.
//!
//! [`PolicyEngine`] owns the knowledge base behind a mutex and runs every
//! request as one pass: reload the committed state, apply the request, check
//! it, then commit or reload. A rejected request never leaves a trace.

use std::sync::{Mutex, MutexGuard};

use pbconf_ontology::{Axiom, EntityKind, Identifier, KnowledgeBase, Scope};
use tracing::{debug, info, info_span};

use crate::closed_world::{evaluate, Comparator, RestrictionRequest, Rule, RuleRecord, RuleStore};
use crate::config::{EngineConfig, RuleNamespace};
use crate::error::{EngineError, Result};
use crate::expression::{compile_policy, is_expression_predicate};
use crate::compile::compile_data_range;
use crate::ontologizer::{DeviceKind, Ontologizer};
use crate::report::{friendly_explanation, friendly_explanations, Outcome};
use crate::request::{ConfigProperty, ConfigRequest, PolicyAxiom, PolicyRequest, Request};
use crate::resolve::{PolicyKind, RuleKind};
use crate::statement::{ParsedStatement, Statement};
use crate::translate::translate;

/// Validates configuration and policy requests against a knowledge base.
#[derive(Debug)]
pub struct PolicyEngine<K: KnowledgeBase> {
    kb: Mutex<K>,
    config: EngineConfig,
}

impl<K: KnowledgeBase> PolicyEngine<K> {
    /// Creates an engine over `kb`.
    pub fn new(kb: K, config: EngineConfig) -> Self {
        Self {
            kb: Mutex::new(kb),
            config,
        }
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, K>> {
        self.kb.lock().map_err(|_| EngineError::Poisoned)
    }

    /// Runs `f` against the knowledge base's working state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Poisoned`] if a previous pass panicked.
    pub fn with_knowledge_base<R>(&self, f: impl FnOnce(&K) -> R) -> Result<R> {
        let kb = self.lock()?;
        Ok(f(&kb))
    }

    /// Consumes the engine, returning the knowledge base.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Poisoned`] if a previous pass panicked.
    pub fn into_inner(self) -> Result<K> {
        self.kb.into_inner().map_err(|_| EngineError::Poisoned)
    }

    fn store(&self, kb: &K, namespace: &RuleNamespace) -> Result<RuleStore> {
        RuleStore::for_namespace(kb, &self.config, namespace)
    }

    fn active_store(&self, kb: &K) -> Result<RuleStore> {
        self.store(kb, self.config.active_rules())
    }

    /// Runs a pass: reload, `f`, then commit if the outcome is valid and
    /// reload otherwise.
    fn pass(&self, f: impl FnOnce(&mut K) -> Result<Outcome>) -> Result<Outcome> {
        let mut kb = self.lock()?;
        kb.reload()?;
        let outcome = match f(&mut *kb) {
            Ok(outcome) => outcome,
            Err(err) => {
                kb.reload()?;
                return Err(err);
            }
        };
        if outcome.is_valid() {
            kb.commit()?;
        } else {
            kb.reload()?;
        }
        info!(status = %outcome.status, "request processed");
        Ok(outcome)
    }

    /// Open-world consistency, then the closed-world rules.
    fn check(&self, kb: &K) -> Result<Outcome> {
        if !kb.is_consistent() {
            return Ok(Outcome::consistency(friendly_explanation(&kb.explain())));
        }
        Ok(match evaluate(kb, &self.active_store(kb)?) {
            Some(explanation) => Outcome::closed_world(&explanation),
            None => Outcome::valid(),
        })
    }

    fn device(kb: &K, name: &str) -> Identifier {
        kb.find(EntityKind::Individual, name, false)
            .unwrap_or_else(|| kb.resolve(name))
    }

    // ---- configuration path ----

    /// Replaces a device's configuration with the request's commands.
    ///
    /// The device keeps its types. Each command must be accepted by the
    /// ontologizer and keep the knowledge base consistent; the result must
    /// then pass the closed-world rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn configure(&self, request: &ConfigRequest) -> Result<Outcome> {
        let _span = info_span!("configure", individual = %request.individual).entered();
        self.pass(|kb| {
            let Ok(kind) = request.ontologizer.parse::<DeviceKind>() else {
                return Ok(Outcome::structural(format!(
                    "Unknown ontologizer : {}",
                    request.ontologizer
                )));
            };
            let device = Self::device(kb, &request.individual);

            let types: Vec<Identifier> = kb
                .snapshot(Scope::Config)?
                .axioms
                .into_keys()
                .filter_map(|axiom| match axiom {
                    Axiom::ClassAssertion { class, individual } if individual == device => {
                        Some(class)
                    }
                    _ => None,
                })
                .collect();
            kb.remove_individual(Scope::Config, &device)?;
            for class in types {
                kb.apply_axiom(
                    Scope::PartialConfig,
                    Axiom::ClassAssertion {
                        class,
                        individual: device.clone(),
                    },
                )?;
            }

            for property in &request.properties {
                let applied = Ontologizer::new(&mut *kb, kind, device.clone()).apply(
                    &property.op,
                    &property.key,
                    &property.val,
                    &property.svc,
                )?;
                if !applied {
                    debug!(op = %property.op, key = %property.key, "command rejected");
                    return Ok(Outcome::structural(command_failure(
                        &request.individual,
                        &request.ontologizer,
                        property,
                    )));
                }
                if !kb.is_consistent() {
                    return Ok(Outcome::consistency(friendly_explanation(&kb.explain())));
                }
            }
            self.finish_configuration(kb)
        })
    }

    /// Applies one configuration statement: the target is the device, the
    /// subject the key, the predicate the operation and the object the value.
    ///
    /// The device family is inferred from the device's types.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn validate_statement(&self, statement: &Statement) -> Result<Outcome> {
        let _span = info_span!("validate_statement", individual = %statement.target).entered();
        self.pass(|kb| {
            let device = Self::device(kb, &statement.target);
            let kind = DeviceKind::infer(kb, &device);
            let property = ConfigProperty {
                op: statement.predicate.clone(),
                key: statement.subject.clone(),
                val: statement.object.clone(),
                svc: statement.service.clone().unwrap_or_default(),
            };
            let applied = Ontologizer::new(&mut *kb, kind, device).apply(
                &property.op,
                &property.key,
                &property.val,
                &property.svc,
            )?;
            if !applied {
                return Ok(Outcome::structural(command_failure(
                    &statement.target,
                    kind.as_str(),
                    &property,
                )));
            }
            self.finish_configuration(kb)
        })
    }

    fn finish_configuration(&self, kb: &mut K) -> Result<Outcome> {
        let outcome = self.check(kb)?;
        if outcome.is_valid() {
            kb.merge_scope(Scope::PartialConfig, Scope::Config)?;
        }
        Ok(outcome)
    }

    // ---- policy path ----

    /// Replaces the stored policy with a policy set.
    ///
    /// Everything in the policy scope is removed except the rule vocabulary
    /// and the protected names. The set is atomic: the first statement that
    /// is rejected discards the whole set.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn apply_policy_set(&self, request: &PolicyRequest) -> Result<Outcome> {
        let _span = info_span!("apply_policy_set", groups = request.data.len()).entered();
        self.pass(|kb| {
            self.strip_policy(kb)?;
            for group in request.data.iter().flatten() {
                let outcome = self.apply_group(kb, &group.class, &group.axioms)?;
                if !outcome.is_valid() {
                    return Ok(outcome);
                }
            }
            Ok(Outcome::valid())
        })
    }

    /// Adds policy statements about `class` to the stored policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn apply_policy(&self, class: &str, statements: &[PolicyAxiom]) -> Result<Outcome> {
        let _span = info_span!("apply_policy", class).entered();
        self.pass(|kb| self.apply_group(kb, class, statements))
    }

    fn apply_group(&self, kb: &mut K, class: &str, statements: &[PolicyAxiom]) -> Result<Outcome> {
        for statement in statements {
            let outcome = self.apply_statement(kb, class, statement)?;
            if !outcome.is_valid() {
                debug!(class, predicate = %statement.p, "policy statement rejected");
                return Ok(outcome);
            }
        }
        Ok(Outcome::valid())
    }

    fn apply_statement(&self, kb: &mut K, class: &str, statement: &PolicyAxiom) -> Result<Outcome> {
        if is_expression_predicate(&statement.p) {
            return match compile_policy(kb, class, &statement.p, &statement.o) {
                Ok(axiom) => apply_checked(kb, axiom),
                Err(err) => Ok(err.into()),
            };
        }

        let parsed = match ParsedStatement::parse(
            kb,
            &Statement::new(class, &statement.s, &statement.p, &statement.o),
        ) {
            Ok(parsed) => parsed,
            Err(err) => return Ok(err.into()),
        };
        match parsed.policy_kind {
            PolicyKind::DirectData => match compile_data_range(kb, &parsed) {
                Ok(axiom) => apply_checked(kb, axiom),
                Err(err) => Ok(err.into()),
            },
            PolicyKind::ClosedWorld => match Rule::from_statement(&parsed) {
                Some(rule) => self.add_rule(kb, &rule),
                None => Ok(Outcome::structural("Could not create policy from statement")),
            },
            PolicyKind::DirectObject | PolicyKind::Invalid => {
                Ok(Outcome::structural("Could not create policy from statement"))
            }
        }
    }

    fn add_rule(&self, kb: &mut K, rule: &Rule) -> Result<Outcome> {
        let store = self.active_store(kb)?;
        let name = store.next_rule_name(kb);
        store.save(kb, &name, rule)
    }

    /// Removes every policy axiom except the rule vocabulary and axioms
    /// about protected names.
    fn strip_policy(&self, kb: &mut K) -> Result<()> {
        let policy = self.active_store(kb)?.class();
        let policy = policy.namespace().to_owned();
        let config = &self.config;
        kb.retain(Scope::Policy, &|axiom: &Axiom| {
            let signature = axiom.signature();
            let individuals_protected = signature
                .iter()
                .filter(|(kind, _)| *kind == EntityKind::Individual)
                .all(|(_, id)| config.is_protected(id.local_name()));
            let vocabulary = signature.iter().all(|(_, id)| id.namespace() == policy)
                || signature
                    .iter()
                    .any(|(_, id)| config.is_protected(id.local_name()));
            individuals_protected && vocabulary
        })?;
        Ok(())
    }

    // ---- closed-world rules ----

    /// Adds a must-have or must-not-have rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn add_closed_world_rule(
        &self,
        kind: RuleKind,
        target: &str,
        required_property: &str,
    ) -> Result<Outcome> {
        let _span = info_span!("add_closed_world_rule", %kind, target).entered();
        let Some(rule) = Rule::presence(kind, translate(target), translate(required_property))
        else {
            return Ok(Outcome::structural(format!(
                "Rule kind {kind} does not take a required property"
            )));
        };
        self.pass(|kb| self.add_rule(kb, &rule))
    }

    /// Adds a restriction rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn add_property_restriction(
        &self,
        kind: RuleKind,
        target: &str,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Result<Outcome> {
        let _span = info_span!("add_property_restriction", %kind, target, predicate).entered();
        if let Err(reason) = predicate.parse::<Comparator>() {
            return Ok(Outcome::structural(reason));
        }
        let request = RestrictionRequest {
            target: translate(target).to_owned(),
            subject: translate(subject).to_owned(),
            predicate: predicate.to_owned(),
            object: object.to_owned(),
        };
        let Some(rule) = Rule::restriction(kind, request) else {
            return Ok(Outcome::structural(format!(
                "Rule kind {kind} is not a property restriction"
            )));
        };
        self.pass(|kb| self.add_rule(kb, &rule))
    }

    /// The rules of `namespace`, in rule order.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn rules(&self, namespace: &RuleNamespace) -> Result<Vec<RuleRecord>> {
        let mut kb = self.lock()?;
        kb.reload()?;
        Ok(self.store(&kb, namespace)?.load(&*kb))
    }

    /// The name the next rule of `namespace` would get.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn next_rule_name(&self, namespace: &RuleNamespace) -> Result<String> {
        let mut kb = self.lock()?;
        kb.reload()?;
        Ok(self.store(&kb, namespace)?.next_rule_name(&*kb))
    }

    /// Deletes every rule of `namespace`. Returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn remove_rules(&self, namespace: &RuleNamespace) -> Result<usize> {
        let mut kb = self.lock()?;
        kb.reload()?;
        let removed = self.store(&kb, namespace)?.remove_all(&mut *kb)?;
        kb.commit()?;
        info!(namespace = %namespace.class, removed, "removed closed-world rules");
        Ok(removed)
    }

    /// Deletes repeated rules of `namespace`. Returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn clear_duplicate_rules(&self, namespace: &RuleNamespace) -> Result<usize> {
        let mut kb = self.lock()?;
        kb.reload()?;
        let removed = self.store(&kb, namespace)?.clear_duplicates(&mut *kb)?;
        kb.commit()?;
        info!(namespace = %namespace.class, removed, "cleared duplicate closed-world rules");
        Ok(removed)
    }

    // ---- whole-state operations ----

    /// Validates the committed state without changing it.
    ///
    /// Every inconsistency is explained, numbered. A failing closed-world
    /// rule takes precedence in the explanation.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn validate(&self) -> Result<Outcome> {
        let _span = info_span!("validate").entered();
        let mut kb = self.lock()?;
        kb.reload()?;
        let mut outcome = Outcome::valid();
        if !kb.is_consistent() {
            outcome = Outcome::consistency(friendly_explanations(&kb.explain_all()));
        }
        if let Some(explanation) = evaluate(&*kb, &self.active_store(&kb)?) {
            outcome = Outcome::closed_world(&explanation);
        }
        kb.reload()?;
        info!(status = %outcome.status, "validation finished");
        Ok(outcome)
    }

    /// Clears the configuration and strips the policy down to the rule
    /// vocabulary, then commits.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn reset(&self) -> Result<()> {
        let _span = info_span!("reset").entered();
        let mut kb = self.lock()?;
        kb.reload()?;
        kb.clear_scope(Scope::Config)?;
        kb.clear_scope(Scope::PartialConfig)?;
        self.strip_policy(&mut kb)?;
        kb.commit()?;
        info!("knowledge base reset");
        Ok(())
    }

    /// Dispatches a parsed request.
    ///
    /// # Errors
    ///
    /// Returns an error if the knowledge base fails.
    pub fn handle(&self, request: &Request) -> Result<Outcome> {
        match request {
            Request::Config(config) => self.configure(config),
            Request::Policy(policy) => self.apply_policy_set(policy),
            Request::Validate => self.validate(),
            Request::Reset => self.reset().map(|()| Outcome::valid()),
            Request::Exit => Ok(Outcome::valid()),
            Request::Invalid(reason) => Ok(Outcome::structural(reason.clone())),
        }
    }
}

fn apply_checked<K: KnowledgeBase>(kb: &mut K, axiom: Axiom) -> Result<Outcome> {
    debug!(%axiom, "adding policy axiom");
    kb.apply_axiom(Scope::Policy, axiom)?;
    if kb.is_consistent() {
        Ok(Outcome::valid())
    } else {
        Ok(Outcome::consistency(friendly_explanation(&kb.explain())))
    }
}

fn command_failure(individual: &str, ontologizer: &str, property: &ConfigProperty) -> String {
    if property.svc.is_empty() {
        format!(
            "Command failure (individual, ontologizer, Op, key, Val) : {individual}, {ontologizer}, {}, {}, {}",
            property.op, property.key, property.val
        )
    } else {
        format!(
            "Command failure (individual, ontologizer, Op, key, Val, Svc) : {individual}, {ontologizer}, {}, {}, {}, {}",
            property.op, property.key, property.val, property.svc
        )
    }
}
