//! Boolean expression engine.
//!
//! Policies may constrain a class with a bracketed boolean expression:
//!
//! ```text
//! $not ((authDNP $value Joe) $and (authDNP $value Andy))
//! ```
//!
//! Keywords are `$and`, `$or`, `$not`, `$nand`, `$nor` (connectives) and
//! `$some`, `$value` (relators). Every other token is a name: a class, an
//! individual, a property or a literal. The expression is lexed, parsed into a
//! tree, and the tree is turned into one class expression that a
//! `disjointWith` or `equivalentTo` axiom relates to the policy's class.
//!
//! Every call starts from scratch; nothing is shared between calls.

mod build;
mod lexer;
mod parser;

use pbconf_ontology::{Axiom, ClassExpression, EntityKind, KnowledgeBase};

use crate::report::StructuralError;

/// The two-letter alias of the `index`-th distinct name in an expression.
///
/// Letters are drawn from `a-z` then `A-Z`: the first is `index / 52`, the
/// second `index % 52`. Indices outside `0..=2703` are clamped.
#[must_use]
pub fn alias(index: i64) -> String {
    const LETTERS: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let index = index.clamp(0, 52 * 52 - 1);
    let (hi, lo) = ((index / 52) as usize, (index % 52) as usize);
    [LETTERS[hi] as char, LETTERS[lo] as char].iter().collect()
}

/// Builds the class expression `source` denotes.
///
/// # Errors
///
/// Returns a [`StructuralError`] naming the failing sub-expression when the
/// text does not parse or a name does not resolve.
pub fn parse_expression<K: KnowledgeBase + ?Sized>(
    kb: &K,
    source: &str,
) -> Result<ClassExpression, StructuralError> {
    let lexed = lexer::lex(source)?;
    let tree = parser::parse(&lexed)?;
    build::build(kb, &tree, &lexed.words)
}

/// Compiles a policy of the form `class relation expression`.
///
/// `relation` is `disjointWith` or `equivalentTo`, in any case.
///
/// # Errors
///
/// Returns a [`StructuralError`] for an unknown relation or class, or when the
/// expression does not compile.
pub fn compile_policy<K: KnowledgeBase + ?Sized>(
    kb: &K,
    class: &str,
    relation: &str,
    source: &str,
) -> Result<Axiom, StructuralError> {
    let disjoint = match relation.to_ascii_lowercase().as_str() {
        "disjointwith" => true,
        "equivalentto" => false,
        _ => return Err(StructuralError::new(format!("Invalid predicate : {relation}"))),
    };
    let Some(class_id) = kb.find(EntityKind::Class, class, true) else {
        return Err(StructuralError::new(format!("value : {class} not a valid Class")));
    };
    let operands = vec![ClassExpression::Class(class_id), parse_expression(kb, source)?];
    Ok(if disjoint {
        Axiom::DisjointClasses(operands)
    } else {
        Axiom::EquivalentClasses(operands)
    })
}

/// Returns `true` if `predicate` routes a statement to the expression engine.
#[must_use]
pub fn is_expression_predicate(predicate: &str) -> bool {
    predicate.eq_ignore_ascii_case("disjointWith") || predicate.eq_ignore_ascii_case("equivalentTo")
}
