use super::alias;
use super::lexer::{Lexed, Token};
use crate::report::StructuralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relator {
    Some,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Connective {
    And,
    Or,
    Nand,
    Nor,
}

impl Connective {
    fn from_token(token: Token) -> Option<Self> {
        match token {
            Token::And => Some(Connective::And),
            Token::Or => Some(Connective::Or),
            Token::Nand => Some(Connective::Nand),
            Token::Nor => Some(Connective::Nor),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Connective::And => "$and",
            Connective::Or => "$or",
            Connective::Nand => "$nand",
            Connective::Nor => "$nor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Word(usize),
    Group(Box<Node>),
    Triple {
        subject: Box<Node>,
        relator: Relator,
        object: Box<Node>,
    },
    Not(Box<Node>),
    Chain(Connective, Vec<Node>),
}

impl Node {
    /// Renders the node with names (`aliased == false`) or their aliases.
    pub(crate) fn render(&self, words: &[String], aliased: bool) -> String {
        match self {
            Node::Word(i) => {
                if aliased {
                    alias(i64::try_from(*i).unwrap_or(i64::MAX))
                } else {
                    words.get(*i).cloned().unwrap_or_default()
                }
            }
            Node::Group(inner) => format!("({})", inner.render(words, aliased)),
            Node::Triple {
                subject,
                relator,
                object,
            } => {
                let keyword = match relator {
                    Relator::Some => "$some",
                    Relator::Value => "$value",
                };
                format!(
                    "{} {keyword} {}",
                    subject.render(words, aliased),
                    object.render(words, aliased)
                )
            }
            Node::Not(inner) => format!("$not {}", inner.render(words, aliased)),
            Node::Chain(connective, operands) => operands
                .iter()
                .map(|op| op.render(words, aliased))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", connective.keyword())),
        }
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

/// The token stream does not fit the grammar.
struct Malformed;

pub(crate) fn parse(lexed: &Lexed) -> Result<Node, StructuralError> {
    let mut parser = Parser {
        tokens: &lexed.tokens,
        pos: 0,
    };
    let parsed = match parser.disjunction() {
        Ok(node) if parser.peek().is_none() => Ok(node),
        _ => Err(Malformed),
    };
    parsed.map_err(|Malformed| {
        let source = lexed
            .tokens
            .iter()
            .map(|t| render_token(*t, &lexed.words))
            .collect::<Vec<_>>()
            .join(" ");
        StructuralError::new(format!("Malformed expression : {source}"))
    })
}

fn render_token(token: Token, words: &[String]) -> String {
    match token {
        Token::Open => "(".to_owned(),
        Token::Close => ")".to_owned(),
        Token::Word(i) => words.get(i).cloned().unwrap_or_default(),
        other => other.keyword().unwrap_or_default().to_owned(),
    }
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn disjunction(&mut self) -> Result<Node, Malformed> {
        self.chain(
            |c| matches!(c, Connective::Or | Connective::Nor),
            Self::conjunction,
        )
    }

    fn conjunction(&mut self) -> Result<Node, Malformed> {
        self.chain(
            |c| matches!(c, Connective::And | Connective::Nand),
            Self::negation,
        )
    }

    /// Parses `operand (connective operand)*`. Consecutive operands joined by
    /// the same connective form one node; a change of connective wraps
    /// everything so far as the first operand of the next run.
    fn chain(
        &mut self,
        accepts: fn(Connective) -> bool,
        operand: fn(&mut Self) -> Result<Node, Malformed>,
    ) -> Result<Node, Malformed> {
        let mut current = operand(self)?;
        let mut run: Option<(Connective, Vec<Node>)> = None;
        while let Some(connective) = self.peek().and_then(Connective::from_token) {
            if !accepts(connective) {
                break;
            }
            self.pos += 1;
            let rhs = operand(self)?;
            run = match run {
                Some((c, mut ops)) if c == connective => {
                    ops.push(rhs);
                    Some((c, ops))
                }
                Some((c, ops)) => {
                    current = Node::Chain(c, ops);
                    Some((connective, vec![current.clone(), rhs]))
                }
                None => Some((connective, vec![current.clone(), rhs])),
            };
        }
        Ok(match run {
            Some((c, ops)) => Node::Chain(c, ops),
            None => current,
        })
    }

    fn negation(&mut self) -> Result<Node, Malformed> {
        if self.peek() == Some(Token::Not) {
            self.pos += 1;
            return Ok(Node::Not(Box::new(self.negation()?)));
        }
        self.triple()
    }

    fn triple(&mut self) -> Result<Node, Malformed> {
        let subject = self.atom()?;
        let relator = match self.peek() {
            Some(Token::Some) => Relator::Some,
            Some(Token::Value) => Relator::Value,
            _ => return Ok(subject),
        };
        self.pos += 1;
        let object = self.atom()?;
        Ok(Node::Triple {
            subject: Box::new(subject),
            relator,
            object: Box::new(object),
        })
    }

    fn atom(&mut self) -> Result<Node, Malformed> {
        match self.next() {
            Some(Token::Word(i)) => Ok(Node::Word(i)),
            Some(Token::Open) => {
                let inner = self.disjunction()?;
                match self.next() {
                    Some(Token::Close) => Ok(Node::Group(Box::new(inner))),
                    _ => Err(Malformed),
                }
            }
            _ => Err(Malformed),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::expression::lexer::lex;

    fn tree(source: &str) -> (Node, Vec<String>) {
        let lexed = lex(source).unwrap();
        (parse(&lexed).unwrap(), lexed.words)
    }

    #[test]
    fn conjunction_binds_tighter_than_disjunction() {
        let (node, _) = tree("A $or B $and C");
        let Node::Chain(Connective::Or, ops) = node else {
            panic!("expected a disjunction");
        };
        assert_eq!(ops[0], Node::Word(0));
        assert!(matches!(ops[1], Node::Chain(Connective::And, _)));
    }

    #[test]
    fn homogeneous_chains_are_flat() {
        let (node, _) = tree("A $and B $and C");
        assert_eq!(
            node,
            Node::Chain(Connective::And, vec![Node::Word(0), Node::Word(1), Node::Word(2)])
        );
    }

    #[test]
    fn mixed_chains_group_by_runs() {
        let (node, _) = tree("A $and B $nand C");
        assert_eq!(
            node,
            Node::Chain(
                Connective::Nand,
                vec![
                    Node::Chain(Connective::And, vec![Node::Word(0), Node::Word(1)]),
                    Node::Word(2)
                ]
            )
        );
    }

    #[test]
    fn not_applies_to_the_next_triple() {
        let (node, _) = tree("$not authDNP $some Person $and LINUX");
        let Node::Chain(Connective::And, ops) = node else {
            panic!("expected a conjunction");
        };
        assert!(matches!(&ops[0], Node::Not(inner) if matches!(**inner, Node::Triple { .. })));
    }

    #[test]
    fn rendering_shows_aliases_and_names() {
        let (node, words) = tree("(authDNP $value Joe)");
        assert_eq!(node.render(&words, false), "(authDNP $value Joe)");
        assert_eq!(node.render(&words, true), "(aa $value ab)");
    }

    #[test]
    fn dangling_connective_is_malformed() {
        let lexed = lex("Person $and").unwrap();
        let err = parse(&lexed).unwrap_err();
        assert_eq!(err.0, "Malformed expression : Person $and");
    }
}
