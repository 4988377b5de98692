use pbconf_ontology::{ClassExpression, EntityKind, Identifier, KnowledgeBase, Literal};

use super::parser::{Connective, Node, Relator};
use crate::report::StructuralError;
use crate::translate::translate;

pub(crate) fn build<K: KnowledgeBase + ?Sized>(
    kb: &K,
    node: &Node,
    words: &[String],
) -> Result<ClassExpression, StructuralError> {
    match node {
        Node::Word(i) => {
            let name = word(words, *i);
            kb.find(EntityKind::Class, name, true)
                .map(ClassExpression::Class)
                .ok_or_else(|| at(node, words, format!("value : {name} not a valid Class")))
        }
        Node::Group(inner) => build(kb, inner, words),
        Node::Triple {
            subject,
            relator,
            object,
        } => {
            let (Node::Word(s), Node::Word(o)) = (subject.as_ref(), object.as_ref()) else {
                return Err(at(
                    node,
                    words,
                    "Can't locate variables within value map or expression map, can't parse",
                ));
            };
            relation(kb, word(words, *s), *relator, word(words, *o))
                .map_err(|message| at(node, words, message))
        }
        Node::Not(inner) => Ok(ClassExpression::Complement(Box::new(build(kb, inner, words)?))),
        Node::Chain(connective, operands) => {
            let operands = operands
                .iter()
                .map(|op| build(kb, op, words))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(match connective {
                Connective::And => ClassExpression::Intersection(operands),
                Connective::Or => ClassExpression::Union(operands),
                Connective::Nand => ClassExpression::Complement(Box::new(
                    ClassExpression::Intersection(operands),
                )),
                Connective::Nor => {
                    ClassExpression::Complement(Box::new(ClassExpression::Union(operands)))
                }
            })
        }
    }
}

/// Resolves `subject relator object` to a property restriction.
fn relation<K: KnowledgeBase + ?Sized>(
    kb: &K,
    subject: &str,
    relator: Relator,
    object: &str,
) -> Result<ClassExpression, String> {
    let subject = translate(subject);
    let class = || kb.find(EntityKind::Class, object, true);
    let individual = || kb.find(EntityKind::Individual, object, false);

    if kb.exists(EntityKind::Class, subject, false) {
        return Err("Can't relate Object -> Anything other than class".to_owned());
    }
    if let Some(property) = kb.find(EntityKind::ObjectProperty, subject, true) {
        return restrict(property, relator, class, individual).ok_or_else(|| {
            "Subject is object property, and Object isn't class or individual".to_owned()
        });
    }
    if let Some(property) = kb.find(EntityKind::DataProperty, subject, true) {
        return Ok(ClassExpression::DataHasValue {
            property,
            value: literal(object),
        });
    }
    restrict(kb.resolve(subject), relator, class, individual)
        .ok_or_else(|| "Mismatched predicate with subject/object".to_owned())
}

fn restrict(
    property: Identifier,
    relator: Relator,
    class: impl FnOnce() -> Option<Identifier>,
    individual: impl FnOnce() -> Option<Identifier>,
) -> Option<ClassExpression> {
    match relator {
        Relator::Some => class().map(|filler| ClassExpression::ObjectSomeValuesFrom {
            property,
            filler: Box::new(ClassExpression::Class(filler)),
        }),
        Relator::Value => {
            individual().map(|individual| ClassExpression::ObjectHasValue { property, individual })
        }
    }
}

/// Integer, then boolean, then string.
fn literal(text: &str) -> Literal {
    if let Ok(i) = text.parse::<i64>() {
        Literal::Int(i)
    } else if let Ok(b) = text.parse::<bool>() {
        Literal::Bool(b)
    } else {
        Literal::Str(text.to_owned())
    }
}

fn word(words: &[String], i: usize) -> &str {
    words.get(i).map_or("", String::as_str)
}

fn at(node: &Node, words: &[String], message: impl Into<String>) -> StructuralError {
    StructuralError::new(format!(
        "{}\n  in : {}\n  from : {}",
        message.into(),
        node.render(words, true),
        node.render(words, false)
    ))
}
