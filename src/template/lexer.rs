//! Lexer for constraint declarations using logos
//!
//! Whitespace is significant inside parameter values, so nothing is skipped:
//! every byte of the input ends up in some token.

use logos::{Lexer, Logos};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Template delimiters (longer patterns win over the lone braces)
    #[token("{{")]
    Open,
    #[token("}}")]
    Close,
    #[token("{")]
    LoneOpen,
    #[token("}")]
    LoneClose,

    // Field separators
    #[token("|")]
    Pipe,
    #[token("=")]
    Equals,

    // Wiki links keep their pipes
    #[token("[[")]
    LinkOpen,
    #[token("]]")]
    LinkClose,

    // <nowiki>...</nowiki> content is taken verbatim, markers stripped
    #[token("<nowiki>", nowiki_body)]
    Nowiki(String),

    // Characters that only matter as part of a longer token
    #[regex(r"[\[\]<]", |lex| lex.slice().to_string())]
    Char(String),

    #[regex(r"[^{}|=\[\]<]+", |lex| lex.slice().to_string())]
    Text(String),
}

const NOWIKI_CLOSE: &str = "</nowiki>";

/// Consume up to and including the first `</nowiki>`; without one the
/// opening marker is not a token
fn nowiki_body(lex: &mut Lexer<Token>) -> Option<String> {
    let end = lex.remainder().find(NOWIKI_CLOSE)?;
    let body = lex.remainder()[..end].to_string();
    lex.bump(end + NOWIKI_CLOSE.len());
    Some(body)
}

impl Token {
    /// Human-readable description for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Token::Open => "'{{'".to_string(),
            Token::Close => "'}}'".to_string(),
            Token::LoneOpen => "unmatched '{'".to_string(),
            Token::LoneClose => "unmatched '}'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::Equals => "'='".to_string(),
            Token::LinkOpen => "'[['".to_string(),
            Token::LinkClose => "']]'".to_string(),
            Token::Nowiki(s) => format!("<nowiki>{}</nowiki>", s),
            Token::Char(s) => format!("'{}'", s),
            Token::Text(s) => format!("text \"{}\"", s),
        }
    }
}

/// Lex input string into tokens with spans
///
/// Bytes the lexer cannot classify (an unterminated `<nowiki>`, say) come
/// back as `Char` tokens so that no input is dropped.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input).spanned().map(move |(tok, span)| match tok {
        Ok(t) => (t, span),
        Err(()) => (Token::Char(input[span.clone()].to_string()), span),
    })
}
