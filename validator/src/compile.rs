//! Statement compiler: datatype restrictions and data-range axioms.
//!
//! A direct-data statement (`hasLvl1Pwd min-length 8`) becomes a
//! `DataPropertyRange` axiom whose range admits exactly the values the
//! statement allows.

use pbconf_ontology::{Axiom, DataRange, Datatype, EntityKind, Facet, KnowledgeBase, Pattern};
use tracing::warn;

use crate::report::StructuralError;
use crate::statement::{ParsedStatement, ValueType};

/// Builds the datatype restrictions a statement asks for.
///
/// Returns an empty list when the predicate has no restriction form or the
/// value does not fit it.
#[must_use]
pub fn restrictions(predicate: &str, value: &str) -> Vec<DataRange> {
    if predicate == "complexity" {
        let sources: &[&str] = match value.to_ascii_uppercase().as_str() {
            "LOWERCASE" => &["[a-z]*"],
            "UPPERCASE" => &["[A-Z]*"],
            "MIXEDCASE" => &["[a-z]*", "[A-Z]*"],
            _ => &[],
        };
        let ranges: Result<Vec<DataRange>, _> = sources
            .iter()
            .map(|source| {
                Pattern::new(*source).map(|pattern| DataRange::Restriction {
                    datatype: Datatype::String,
                    facets: vec![Facet::Pattern(pattern)],
                })
            })
            .collect();
        return ranges.unwrap_or_else(|err| {
            warn!(%err, "complexity pattern did not compile");
            Vec::new()
        });
    }
    let Ok(n) = value.trim().parse::<i64>() else {
        return Vec::new();
    };
    let (datatype, facet) = match predicate {
        "min-length" => (Datatype::String, Facet::MinLength(n)),
        "max-length" => (Datatype::String, Facet::MaxLength(n)),
        "gt" => (Datatype::Integer, Facet::MinExclusive(n)),
        "lt" => (Datatype::Integer, Facet::MaxExclusive(n)),
        "gte" => (Datatype::Integer, Facet::MinInclusive(n)),
        "lte" => (Datatype::Integer, Facet::MaxInclusive(n)),
        "eq" | "neq" => (Datatype::Integer, Facet::Length(n)),
        _ => return Vec::new(),
    };
    vec![DataRange::Restriction {
        datatype,
        facets: vec![facet],
    }]
}

/// Compiles a direct-data statement into a `DataPropertyRange` axiom.
///
/// # Errors
///
/// Returns a [`StructuralError`] when the statement yields no usable
/// restriction.
pub fn compile_data_range<K: KnowledgeBase + ?Sized>(
    kb: &K,
    parsed: &ParsedStatement,
) -> Result<Axiom, StructuralError> {
    let mut ranges = restrictions(&parsed.predicate, &parsed.original.object);
    let mixed_case = parsed.value_type == ValueType::String && ranges.len() == 2;
    let range = if mixed_case {
        DataRange::Complement(Box::new(DataRange::Union(ranges)))
    } else if ranges.len() == 1 {
        let range = ranges.remove(0);
        if parsed.predicate == "neq" {
            DataRange::Complement(Box::new(range))
        } else {
            range
        }
    } else {
        let s = &parsed.original;
        return Err(StructuralError::new(format!(
            "Unable to construct OWL Axiom from (s, p, o) : {}, {}, {}",
            s.subject, s.predicate, s.object
        )));
    };

    let property = kb
        .find(EntityKind::DataProperty, &parsed.target, true)
        .unwrap_or_else(|| kb.resolve(&parsed.target));
    Ok(Axiom::DataPropertyRange { property, range })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::statement::Statement;
    use pbconf_ontology::{iris, Identifier, Literal, MemoryKnowledgeBase};

    fn compile(target: &str, predicate: &str, object: &str) -> Result<Axiom, StructuralError> {
        let kb = MemoryKnowledgeBase::bootstrap();
        let parsed =
            ParsedStatement::parse(&kb, &Statement::new(target, "", predicate, object)).unwrap();
        compile_data_range(&kb, &parsed)
    }

    #[test]
    fn min_length_compiles_to_a_string_restriction() {
        let axiom = compile("password.level1", "min-length", "8").unwrap();
        assert_eq!(
            axiom,
            Axiom::DataPropertyRange {
                property: Identifier::new(iris::NS_CORE, "hasLvl1Pwd"),
                range: DataRange::Restriction {
                    datatype: Datatype::String,
                    facets: vec![Facet::MinLength(8)],
                },
            }
        );
    }

    #[test]
    fn mixed_case_is_the_complement_of_single_case() {
        let Axiom::DataPropertyRange { range, .. } =
            compile("password.level1", "complexity", "mixedcase").unwrap()
        else {
            panic!("expected a data range axiom");
        };
        assert!(range.matches(&Literal::Str("aBc".to_owned())));
        assert!(!range.matches(&Literal::Str("abc".to_owned())));
    }

    #[test]
    fn complexity_patterns_are_compiled_once() {
        let ranges = restrictions("complexity", "lowercase");
        assert_eq!(
            ranges,
            vec![DataRange::Restriction {
                datatype: Datatype::String,
                facets: vec![Facet::Pattern(Pattern::new("[a-z]*").unwrap())],
            }]
        );
        assert!(restrictions("complexity", "titlecase").is_empty());
    }

    #[test]
    fn bounds_are_integer_facets() {
        let ranges = restrictions("gte", "5");
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].matches(&Literal::Int(5)));
        assert!(!ranges[0].matches(&Literal::Int(4)));
        assert!(restrictions("lt", "five").is_empty());
    }

    #[test]
    fn neq_wraps_a_complement() {
        let Axiom::DataPropertyRange { range, .. } =
            compile("telnetPort", "neq", "2").unwrap()
        else {
            panic!("expected a data range axiom");
        };
        assert!(matches!(range, DataRange::Complement(_)));
    }

    #[test]
    fn unknown_predicate_cannot_be_compiled() {
        let err = compile("password.level1", "sings", "8").unwrap_err();
        assert_eq!(
            err.0,
            "Unable to construct OWL Axiom from (s, p, o) : , sings, 8"
        );
    }
}
