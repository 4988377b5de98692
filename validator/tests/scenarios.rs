//! End-to-end validation scenarios over the in-memory knowledge base.

#![allow(clippy::unwrap_used)]

use pbconf_ontology::{
    AnnotatedAxiom, Assertion, Axiom, EntityKind, Identifier, KbError, KnowledgeBase,
    MemoryKnowledgeBase, PrefixMap, Scope, Snapshot,
};
use pbconf_validator::{
    EngineConfig, EngineError, Outcome, PolicyEngine, Rejection, Request, RuleKind,
    RuleNamespace, Statement, Status,
};

fn engine() -> PolicyEngine<MemoryKnowledgeBase> {
    PolicyEngine::new(MemoryKnowledgeBase::bootstrap(), EngineConfig::default())
}

fn send<K: KnowledgeBase>(engine: &PolicyEngine<K>, line: &str) -> Outcome {
    engine.handle(&Request::parse(line)).unwrap()
}

fn snapshot<K: KnowledgeBase>(engine: &PolicyEngine<K>, scope: Scope) -> Snapshot {
    engine
        .with_knowledge_base(|kb| kb.snapshot(scope))
        .unwrap()
        .unwrap()
}

fn failed_validator(outcome: &Outcome) -> String {
    let explanation: serde_json::Value = serde_json::from_str(&outcome.explanation).unwrap();
    explanation["failedValidator"].as_str().unwrap().to_owned()
}

const RELAY_WITHOUT_PASSWORD: &str = r#"{"ontology": "config", "ontologizer": "SEL421",
    "individual": "sel1", "properties": [{"Op": "type", "Key": "", "Val": "SEL421"}]}"#;

const RELAY_WITH_PASSWORD: &str = r#"{"ontology": "config", "ontologizer": "SEL421",
    "individual": "sel1", "properties": [
        {"Op": "type", "Key": "", "Val": "SEL421"},
        {"Op": "password", "Key": "password.level1", "Val": "TAIL8xx!"}]}"#;

const PEOPLE: [&str; 3] = [
    r#"{"ontology": "config", "ontologizer": "LINUX", "individual": "Joe",
        "properties": [{"Op": "type", "Key": "", "Val": "Person"}]}"#,
    r#"{"ontology": "config", "ontologizer": "LINUX", "individual": "Andy",
        "properties": [{"Op": "type", "Key": "", "Val": "Person"}]}"#,
    r#"{"ontology": "config", "ontologizer": "LINUX", "individual": "Adrian",
        "properties": [{"Op": "type", "Key": "", "Val": "Person"}]}"#,
];

fn linux_with_dnp_users(users: &str) -> String {
    format!(
        r#"{{"ontology": "config", "ontologizer": "LINUX", "individual": "linuxa",
            "properties": [
                {{"Op": "type", "Key": "", "Val": "LINUX"}},
                {{"Op": "service_option", "Key": "authusers", "Val": "{users}", "Svc": "dnp"}}]}}"#
    )
}

#[test]
fn class_must_have_rule_rejects_missing_password() {
    let engine = engine();
    let outcome = engine
        .add_closed_world_rule(RuleKind::ClassMustHaveProperty, "SEL421", "password.level1")
        .unwrap();
    assert!(outcome.is_valid());
    let rules = engine.rules(&RuleNamespace::standard()).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].id.local_name(), "cwr0");

    let outcome = send(&engine, RELAY_WITHOUT_PASSWORD);
    assert_eq!(outcome.status, Status::Invalid);
    assert_eq!(outcome.rejection, Some(Rejection::ClosedWorld));
    assert_eq!(failed_validator(&outcome), "ClassMustHaveProperty");
    assert!(outcome.explanation.contains("sel1"));

    assert!(send(&engine, RELAY_WITH_PASSWORD).is_valid());
    assert!(engine.validate().unwrap().is_valid());
}

#[test]
fn must_have_rule_over_existing_devices_then_rejects_removal() {
    let engine = engine();
    assert!(send(&engine, RELAY_WITH_PASSWORD).is_valid());

    let outcome = engine
        .add_closed_world_rule(RuleKind::ClassMustHaveProperty, "SEL421", "password.level1")
        .unwrap();
    assert!(outcome.is_valid(), "{}", outcome.explanation);
    let names: Vec<String> = engine
        .rules(&RuleNamespace::standard())
        .unwrap()
        .iter()
        .map(|record| record.id.local_name().to_owned())
        .collect();
    assert_eq!(names, ["cwr0"]);

    let before = snapshot(&engine, Scope::Config);
    let outcome = send(&engine, RELAY_WITHOUT_PASSWORD);
    assert_eq!(outcome.status, Status::Invalid);
    assert_eq!(outcome.rejection, Some(Rejection::ClosedWorld));
    let explanation: serde_json::Value = serde_json::from_str(&outcome.explanation).unwrap();
    assert_eq!(explanation["failedValidator"], "ClassMustHaveProperty");
    assert_eq!(explanation["failures"][0]["property"], "hasLvl1Pwd");
    assert!(explanation["failures"][0]["individual"]
        .as_str()
        .unwrap()
        .ends_with("#sel1"));
    assert_eq!(snapshot(&engine, Scope::Config), before);
    assert!(snapshot(&engine, Scope::PartialConfig).is_empty());
    assert!(engine.validate().unwrap().is_valid());
}

#[test]
fn direct_range_rejects_short_password_and_rolls_back() {
    let engine = engine();
    let policy = r#"{"ontology": "policy", "data": [[{"Class": "password.level1",
        "Axioms": [{"s": "", "p": "min-length", "o": "8"}]}]]}"#;
    assert!(send(&engine, policy).is_valid());

    let before = snapshot(&engine, Scope::Config);
    let short = r#"{"ontology": "config", "ontologizer": "SEL421", "individual": "sel1",
        "properties": [
            {"Op": "type", "Key": "", "Val": "SEL421"},
            {"Op": "password", "Key": "password.level1", "Val": "abc"}]}"#;
    let outcome = send(&engine, short);
    assert_eq!(outcome.rejection, Some(Rejection::Consistency));
    assert!(outcome.explanation.contains("hasLvl1Pwd"));
    assert_eq!(snapshot(&engine, Scope::Config), before);
    assert!(snapshot(&engine, Scope::PartialConfig).is_empty());

    assert!(send(&engine, RELAY_WITH_PASSWORD).is_valid());
}

#[test]
fn disjoint_expression_limits_dnp_users() {
    let engine = engine();
    for person in PEOPLE {
        assert!(send(&engine, person).is_valid(), "{person}");
    }
    let policy = r#"{"ontology": "policy", "data": [[{"Class": "LINUX", "Axioms": [
        {"s": "", "p": "disjointWith",
         "o": "(authDNP $value Joe) $and (authDNP $value Andy)"}]}]]}"#;
    assert!(send(&engine, policy).is_valid());

    let outcome = send(&engine, &linux_with_dnp_users("Joe Andy"));
    assert_eq!(outcome.rejection, Some(Rejection::Consistency));

    assert!(send(&engine, &linux_with_dnp_users("Joe Adrian")).is_valid());
    assert!(engine.validate().unwrap().is_valid());
}

#[test]
fn restriction_rules_report_the_offending_assertion() {
    let engine = engine();
    let policy = r#"{"ontology": "policy", "data": [[{"Class": "SEL421", "Axioms": [
        {"s": "password.level1", "p": "min-length", "o": "8"}]}]]}"#;
    assert!(send(&engine, policy).is_valid());

    let short = r#"{"ontology": "config", "ontologizer": "SEL421", "individual": "sel1",
        "properties": [
            {"Op": "type", "Key": "", "Val": "SEL421"},
            {"Op": "password", "Key": "password.level1", "Val": "abc"}]}"#;
    let outcome = send(&engine, short);
    assert_eq!(outcome.rejection, Some(Rejection::ClosedWorld));
    assert_eq!(failed_validator(&outcome), "ClassPropertyRestrictions");
    let explanation: serde_json::Value = serde_json::from_str(&outcome.explanation).unwrap();
    assert!(explanation["failures"][0]["reason"].is_string());
}

#[test]
fn policy_sets_are_atomic() {
    let engine = engine();
    let before = snapshot(&engine, Scope::Policy);
    let policy = r#"{"ontology": "policy", "data": [[{"Class": "SEL421", "Axioms": [
        {"s": "", "p": "requires", "o": "password.level1"},
        {"s": "", "p": "frobnicates", "o": "Toaster"}]}]]}"#;
    let outcome = send(&engine, policy);
    assert_eq!(outcome.status, Status::Invalid);
    assert_eq!(snapshot(&engine, Scope::Policy), before);
    assert!(engine.rules(&RuleNamespace::standard()).unwrap().is_empty());
}

#[test]
fn policy_sets_replace_previous_rules() {
    let engine = engine();
    let first = r#"{"ontology": "policy", "data": [[{"Class": "SEL421", "Axioms": [
        {"s": "", "p": "requires", "o": "password.level1"}]}]]}"#;
    assert!(send(&engine, first).is_valid());
    assert_eq!(engine.rules(&RuleNamespace::standard()).unwrap().len(), 1);

    let second = r#"{"ontology": "policy", "data": [[{"Class": "LINUX", "Axioms": [
        {"s": "", "p": "requires", "o": "telnetPort"}]}]]}"#;
    assert!(send(&engine, second).is_valid());
    let rules = engine.rules(&RuleNamespace::standard()).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].id.local_name(), "cwr0");

    // The replaced rule no longer applies.
    assert!(send(&engine, RELAY_WITHOUT_PASSWORD).is_valid());
}

#[test]
fn rule_names_only_grow() {
    let engine = engine();
    let rules = RuleNamespace::standard();
    for property in ["level1", "level2", "levelC"] {
        assert!(engine
            .add_closed_world_rule(RuleKind::ClassMustHaveProperty, "SEL421", property)
            .unwrap()
            .is_valid());
    }
    assert_eq!(engine.next_rule_name(&rules).unwrap(), "cwr3");
    assert!(engine
        .add_closed_world_rule(RuleKind::ClassMustHaveProperty, "SEL421", "level1")
        .unwrap()
        .is_valid());
    assert_eq!(engine.clear_duplicate_rules(&rules).unwrap(), 1);
    assert_eq!(engine.next_rule_name(&rules).unwrap(), "cwr3");
}

#[test]
fn test_mode_keeps_rules_apart() {
    let config = EngineConfig {
        test_mode: true,
        ..EngineConfig::default()
    };
    let engine = PolicyEngine::new(MemoryKnowledgeBase::bootstrap(), config);
    assert!(engine
        .add_closed_world_rule(RuleKind::ClassMustHaveProperty, "SEL421", "level1")
        .unwrap()
        .is_valid());
    assert!(engine.rules(&RuleNamespace::standard()).unwrap().is_empty());
    let rules = engine.rules(&RuleNamespace::test()).unwrap();
    assert_eq!(rules[0].id.local_name(), "tcwr0");
}

#[test]
fn validation_leaves_state_untouched() {
    let engine = engine();
    assert!(send(&engine, RELAY_WITH_PASSWORD).is_valid());
    let before = snapshot(&engine, Scope::Config);
    assert!(send(&engine, "validate").is_valid());
    assert_eq!(snapshot(&engine, Scope::Config), before);
}

#[test]
fn single_statements_use_the_configuration_path() {
    let engine = engine();
    assert!(send(&engine, RELAY_WITHOUT_PASSWORD).is_valid());
    let statement = Statement::new("sel1", "telnet", "service", "on");
    assert!(engine.validate_statement(&statement).unwrap().is_valid());
    let statement = Statement::new("sel1", "telnet", "service", "maybe");
    let outcome = engine.validate_statement(&statement).unwrap();
    assert_eq!(outcome.rejection, Some(Rejection::Structural));
    assert!(outcome.explanation.starts_with("Command failure"));
}

#[test]
fn reset_clears_configuration_and_rules() {
    let engine = engine();
    assert!(send(&engine, RELAY_WITH_PASSWORD).is_valid());
    assert!(engine
        .add_closed_world_rule(RuleKind::ClassMustHaveProperty, "SEL421", "level1")
        .unwrap()
        .is_valid());
    assert!(send(&engine, "RESET").is_valid());
    assert!(snapshot(&engine, Scope::Config).is_empty());
    assert!(engine.rules(&RuleNamespace::standard()).unwrap().is_empty());
    assert!(engine
        .with_knowledge_base(|kb| kb.exists(EntityKind::Class, "ClosedWorldReasoner", false))
        .unwrap());
}

#[test]
fn unknown_commands_are_structural() {
    let engine = engine();
    let outcome = send(&engine, "shutdown now");
    assert_eq!(outcome.rejection, Some(Rejection::Structural));
    assert_eq!(outcome.explanation, "Invalid command");
    let outcome = send(&engine, r#"{"ontology": "core"}"#);
    assert_eq!(outcome.explanation, "Invalid Ontology Choice");
}

/// Delegates to an in-memory store whose commits always fail.
struct ReadOnlyStore(MemoryKnowledgeBase);

impl KnowledgeBase for ReadOnlyStore {
    fn prefixes(&self) -> &PrefixMap {
        self.0.prefixes()
    }
    fn exists(&self, kind: EntityKind, name: &str, core_only: bool) -> bool {
        self.0.exists(kind, name, core_only)
    }
    fn find(&self, kind: EntityKind, name: &str, prioritize_core: bool) -> Option<Identifier> {
        self.0.find(kind, name, prioritize_core)
    }
    fn apply_axiom(&mut self, scope: Scope, axiom: Axiom) -> Result<(), KbError> {
        self.0.apply_axiom(scope, axiom)
    }
    fn annotate_axiom(&mut self, scope: Scope, axiom: Axiom, comment: &str) -> Result<(), KbError> {
        self.0.annotate_axiom(scope, axiom, comment)
    }
    fn remove_property(
        &mut self,
        scope: Scope,
        individual: &Identifier,
        property: &Identifier,
    ) -> Result<(), KbError> {
        self.0.remove_property(scope, individual, property)
    }
    fn remove_individual(&mut self, scope: Scope, individual: &Identifier) -> Result<(), KbError> {
        self.0.remove_individual(scope, individual)
    }
    fn retain(&mut self, scope: Scope, keep: &dyn Fn(&Axiom) -> bool) -> Result<(), KbError> {
        self.0.retain(scope, keep)
    }
    fn merge_scope(&mut self, from: Scope, into: Scope) -> Result<(), KbError> {
        self.0.merge_scope(from, into)
    }
    fn is_consistent(&self) -> bool {
        self.0.is_consistent()
    }
    fn explain(&self) -> Vec<AnnotatedAxiom> {
        self.0.explain()
    }
    fn explain_all(&self) -> Vec<Vec<AnnotatedAxiom>> {
        self.0.explain_all()
    }
    fn snapshot(&self, scope: Scope) -> Result<Snapshot, KbError> {
        self.0.snapshot(scope)
    }
    fn restore(&mut self, snapshot: Snapshot) -> Result<(), KbError> {
        self.0.restore(snapshot)
    }
    fn instances_of(&self, class: &Identifier) -> Vec<Identifier> {
        self.0.instances_of(class)
    }
    fn types_of(&self, individual: &Identifier) -> Vec<Identifier> {
        self.0.types_of(individual)
    }
    fn assertions(&self, individual: &Identifier, scopes: &[Scope]) -> Vec<Assertion> {
        self.0.assertions(individual, scopes)
    }
    fn object_property_has_range(&self, property: &Identifier, class: &Identifier) -> bool {
        self.0.object_property_has_range(property, class)
    }
    fn reload(&mut self) -> Result<(), KbError> {
        self.0.reload()
    }
    fn commit(&mut self) -> Result<(), KbError> {
        Err(KbError::Commit("store is read-only".to_owned()))
    }
}

#[test]
fn store_failures_are_errors_not_outcomes() {
    let engine = PolicyEngine::new(
        ReadOnlyStore(MemoryKnowledgeBase::bootstrap()),
        EngineConfig::default(),
    );
    let err = engine
        .add_closed_world_rule(RuleKind::ClassMustHaveProperty, "SEL421", "level1")
        .unwrap_err();
    assert!(matches!(err, EngineError::Store(KbError::Commit(_))));

    // Rejections never reach the store, so they still come back as outcomes.
    let outcome = send(&engine, "bogus");
    assert_eq!(outcome.rejection, Some(Rejection::Structural));
}
