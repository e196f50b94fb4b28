//! Lexer for SyReC.

use logos::Logos;

/// Tokens of the SyReC language.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // Keywords
    #[token("module")]
    Module,

    #[token("in")]
    In,

    #[token("out")]
    Out,

    #[token("inout")]
    Inout,

    #[token("wire")]
    Wire,

    #[token("state")]
    State,

    #[token("if")]
    If,

    #[token("then")]
    Then,

    #[token("else")]
    Else,

    #[token("fi")]
    Fi,

    #[token("for")]
    For,

    #[token("to")]
    To,

    #[token("step")]
    Step,

    #[token("do")]
    Do,

    #[token("rof")]
    Rof,

    #[token("call")]
    Call,

    #[token("uncall")]
    Uncall,

    #[token("skip")]
    Skip,

    // Literals and identifiers
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Int(u32),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Compound assignment and statement operators
    #[token("++=")]
    IncrementEq,

    #[token("--=")]
    DecrementEq,

    #[token("~=")]
    InvertEq,

    #[token("+=")]
    AddEq,

    #[token("-=")]
    SubtractEq,

    #[token("^=")]
    ExorEq,

    #[token("<=>", priority = 4)]
    SwapOp,

    // Expression operators
    #[token("<<")]
    ShiftLeft,

    #[token(">>")]
    ShiftRight,

    #[token("&&")]
    LogicalAnd,

    #[token("||")]
    LogicalOr,

    #[token("<=", priority = 3)]
    LessEquals,

    #[token(">=")]
    GreaterEquals,

    #[token("!=")]
    NotEquals,

    #[token("*>")]
    FracDivide,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("^")]
    Caret,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("=")]
    Equals,

    // Punctuation
    #[token("#")]
    Hash,

    #[token("$")]
    Dollar,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Int(v) => write!(f, "{v}"),
            Token::Ident(name) => write!(f, "{name}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A token with its source span.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Byte range in the source.
    pub span: std::ops::Range<usize>,
}

/// Tokenize a source string.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, (std::ops::Range<usize>, String)>> {
    Token::lexer(source)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Ok(SpannedToken { token, span }),
            Err(()) => Err((span.clone(), format!("invalid token at byte {}", span.start))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).into_iter().map(|t| t.unwrap().token).collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            kinds("module main(inout a(2))"),
            vec![
                Token::Module,
                Token::Ident("main".into()),
                Token::LParen,
                Token::Inout,
                Token::Ident("a".into()),
                Token::LParen,
                Token::Int(2),
                Token::RParen,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_compound_operators() {
        assert_eq!(
            kinds("a += b ; c <=> d ; ++= e"),
            vec![
                Token::Ident("a".into()),
                Token::AddEq,
                Token::Ident("b".into()),
                Token::Semicolon,
                Token::Ident("c".into()),
                Token::SwapOp,
                Token::Ident("d".into()),
                Token::Semicolon,
                Token::IncrementEq,
                Token::Ident("e".into()),
            ]
        );
    }

    #[test]
    fn test_swap_beats_less_equals() {
        assert_eq!(kinds("<=>"), vec![Token::SwapOp]);
        assert_eq!(kinds("<="), vec![Token::LessEquals]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(kinds("skip // trailing words\nskip"), vec![Token::Skip, Token::Skip]);
    }
}
