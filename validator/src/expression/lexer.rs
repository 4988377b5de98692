use crate::report::StructuralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Open,
    Close,
    And,
    Or,
    Not,
    Nand,
    Nor,
    Some,
    Value,
    /// Index into [`Lexed::words`].
    Word(usize),
}

impl Token {
    pub(crate) fn keyword(self) -> Option<&'static str> {
        Some(match self {
            Token::And => "$and",
            Token::Or => "$or",
            Token::Not => "$not",
            Token::Nand => "$nand",
            Token::Nor => "$nor",
            Token::Some => "$some",
            Token::Value => "$value",
            Token::Open | Token::Close | Token::Word(_) => return None,
        })
    }
}

/// A tokenized expression. Each distinct name appears once in `words`, in
/// order of first use; its position is its alias index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexed {
    pub(crate) tokens: Vec<Token>,
    pub(crate) words: Vec<String>,
}

pub(crate) fn lex(source: &str) -> Result<Lexed, StructuralError> {
    let padded = source.replace('(', " ( ").replace(')', " ) ");
    let mut tokens = Vec::new();
    let mut words: Vec<String> = Vec::new();
    let mut depth = 0usize;

    for raw in padded.split_whitespace() {
        let token = match raw.to_ascii_lowercase().as_str() {
            "(" => {
                depth += 1;
                Token::Open
            }
            ")" => {
                depth = depth.checked_sub(1).ok_or_else(|| unbalanced(source))?;
                Token::Close
            }
            "$and" => Token::And,
            "$or" => Token::Or,
            "$not" => Token::Not,
            "$nand" => Token::Nand,
            "$nor" => Token::Nor,
            "$some" => Token::Some,
            "$value" => Token::Value,
            _ => match words.iter().position(|w| w == raw) {
                Some(i) => Token::Word(i),
                None => {
                    words.push(raw.to_owned());
                    Token::Word(words.len() - 1)
                }
            },
        };
        tokens.push(token);
    }
    if depth != 0 {
        return Err(unbalanced(source));
    }
    Ok(Lexed { tokens, words })
}

fn unbalanced(source: &str) -> StructuralError {
    StructuralError::new(format!("Unbalanced parentheses in expression : {source}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn names_are_numbered_by_first_use() {
        let lexed = lex("(authDNP $value Joe) $AND (authDNP $value Andy)").unwrap();
        assert_eq!(lexed.words, ["authDNP", "Joe", "Andy"]);
        assert_eq!(lexed.tokens[1], Token::Word(0));
        assert_eq!(lexed.tokens[5], Token::And);
        assert_eq!(lexed.tokens[9], Token::Word(2));
    }

    #[test]
    fn parentheses_need_not_be_spaced() {
        let lexed = lex("$not(Person)").unwrap();
        assert_eq!(
            lexed.tokens,
            [Token::Not, Token::Open, Token::Word(0), Token::Close]
        );
    }

    #[test]
    fn close_before_open_is_unbalanced() {
        assert!(lex(") Person (").is_err());
        assert!(lex("((Person)").is_err());
    }
}
