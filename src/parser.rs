use crate::assignment::GoalAssignment;
use crate::lexer::{LexError, Lexer, Token};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Unexpected token: {0:?}, expected {1}")]
    Unexpected(Token, &'static str),
    #[error("High-level goal declared more than once")]
    DuplicateHigh,
    #[error("Unknown low-level goal: {0:?} (declare it with `low` first)")]
    UnknownLowGoal(String),
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> &Token {
        let tok = self.tokens.get(self.pos).unwrap_or(&Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect_str(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Str(s) => Ok(s),
            tok => Err(ParseError::Unexpected(tok, "quoted goal text")),
        }
    }

    fn check_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s == name)
    }

    pub fn parse(&mut self) -> Result<GoalAssignment, ParseError> {
        let mut high: Option<String> = None;
        let mut assignment = GoalAssignment::default();
        // Block references are checked once the whole pool is known.
        let mut links: Vec<(usize, Vec<String>)> = Vec::new();

        while *self.peek() != Token::Eof {
            if self.check_ident("high") {
                self.advance();
                let text = self.expect_str()?;
                if high.replace(text).is_some() {
                    return Err(ParseError::DuplicateHigh);
                }
            } else if self.check_ident("low") {
                self.advance();
                assignment.low_goals.push(self.expect_str()?);
            } else if self.check_ident("mid") {
                self.advance();
                let index = assignment.mid_goals.len();
                assignment.mid_goals.push(self.expect_str()?);
                if *self.peek() == Token::LBrace {
                    links.push((index, self.parse_link_block()?));
                }
            } else {
                return Err(ParseError::Unexpected(self.peek().clone(), "high, mid, or low"));
            }
        }

        for (index, labels) in links {
            if let Some(unknown) = labels.iter().find(|l| !assignment.low_goals.contains(*l)) {
                return Err(ParseError::UnknownLowGoal(unknown.clone()));
            }
            assignment.assign(index, labels);
        }

        assignment.high_goal = high.unwrap_or_default();
        Ok(assignment)
    }

    /// `{ "a", "b" }` with optional separators and trailing comma.
    fn parse_link_block(&mut self) -> Result<Vec<String>, ParseError> {
        self.advance(); // {
        let mut labels = Vec::new();
        loop {
            match self.advance().clone() {
                Token::RBrace => break,
                Token::Comma => continue,
                Token::Str(s) => labels.push(s),
                tok => return Err(ParseError::Unexpected(tok, "quoted goal text or }")),
            }
        }
        Ok(labels)
    }
}

/// Parse goal notation into an assignment.
pub fn parse(input: &str) -> Result<GoalAssignment, ParseError> {
    Parser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARATHON: &str = r#"
        high "Run a marathon"

        low "Run 5k"
        low "Run 10k"
        low "Meal prep"
        low "Stretch"

        mid "Build endurance" { "Run 5k", "Run 10k" }
        mid "Eat healthy" {
            "Meal prep"
        }
    "#;

    #[test]
    fn test_parse_marathon() {
        let a = parse(MARATHON).unwrap();
        assert_eq!(a.high_goal, "Run a marathon");
        assert_eq!(a.mid_goals, vec!["Build endurance", "Eat healthy"]);
        assert_eq!(a.low_goals.len(), 4);
        assert_eq!(a.low_goals_for(0), ["Run 5k", "Run 10k"]);
        assert_eq!(a.low_goals_for(1), ["Meal prep"]);
        assert_eq!(a.unassigned_low_goals(), vec!["Stretch"]);
    }

    #[test]
    fn test_parse_mid_without_block() {
        let a = parse(r#"high "H" mid "Alone""#).unwrap();
        assert_eq!(a.mid_goals, vec!["Alone"]);
        assert!(a.low_goals_by_mid_index.is_empty());
    }

    #[test]
    fn test_parse_pool_declared_after_block() {
        let a = parse(r#"mid "M" { "late" } low "late""#).unwrap();
        assert_eq!(a.low_goals_for(0), ["late"]);
        assert_eq!(a.high_goal, "");
    }

    #[test]
    fn test_parse_duplicate_high() {
        let err = parse(r#"high "A" high "B""#).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateHigh));
    }

    #[test]
    fn test_parse_unknown_low() {
        let err = parse(r#"high "H" mid "M" { "ghost" }"#).unwrap_err();
        assert!(matches!(err, ParseError::UnknownLowGoal(ref l) if l == "ghost"));
    }

    #[test]
    fn test_parse_unexpected_keyword() {
        let err = parse(r#"goal "H""#).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected(Token::Ident(_), _)));
    }

    #[test]
    fn test_parse_missing_text() {
        let err = parse("high mid").unwrap_err();
        assert!(matches!(err, ParseError::Unexpected(_, "quoted goal text")));
    }

    #[test]
    fn test_parse_unclosed_block() {
        let err = parse(r#"low "a" mid "M" { "a""#).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected(Token::Eof, _)));
    }
}
