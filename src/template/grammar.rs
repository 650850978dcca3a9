//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::SyntaxError;
use crate::template::ast::{NamedParams, Template};
use crate::template::lexer::Token;

/// One lexical piece of a field
#[derive(Debug, Clone)]
enum Piece {
    /// Plain text, subject to the key/value split
    Text(String),
    /// A top-level `=`
    Equals,
    /// Nowiki content or a whole wiki link; never split
    Verbatim(String),
}

/// A field between two separators, with its source span
type Field = (Vec<Piece>, SimpleSpan);

fn concat(pieces: &[Piece]) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Text(s) | Piece::Verbatim(s) => out.push_str(s),
            Piece::Equals => out.push('='),
        }
    }
    out
}

/// Trim surrounding whitespace unless that would leave nothing behind
fn trim_value(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        raw
    } else {
        trimmed.to_string()
    }
}

/// Parse a single declaration into a [`Template`]
pub fn parse(input: &str) -> Result<Template, SyntaxError> {
    if input.trim().is_empty() {
        return Err(SyntaxError::new(input, 0..input.len(), "empty declaration")
            .with_expected(vec![Token::Open.describe()]));
    }

    let len = input.len();
    let token_iter = crate::template::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let (name_field, fields) = template_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => SyntaxError::from_rich(err, input),
            None => SyntaxError::new(input, 0..len, "malformed declaration"),
        })?;

    assemble(input, name_field, fields)
}

fn template_parser<'a, I>(
) -> impl Parser<'a, I, (Field, Vec<Field>), extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Whitespace allowed around the braces
    let padding = select! {
        Token::Text(s) if s.trim().is_empty() => (),
    };

    let link_part = select! {
        Token::Text(s) => s,
        Token::Char(s) => s,
        Token::Nowiki(s) => s,
        Token::Equals => "=".to_string(),
        Token::Pipe => "|".to_string(),
    };

    let link = just(Token::LinkOpen)
        .ignore_then(link_part.repeated().collect::<Vec<_>>())
        .then_ignore(just(Token::LinkClose))
        .map(|parts| Piece::Verbatim(format!("[[{}]]", parts.concat())));

    let piece = choice((
        select! {
            Token::Text(s) => Piece::Text(s),
            Token::Char(s) => Piece::Text(s),
            Token::LinkClose => Piece::Text("]]".to_string()),
            Token::Equals => Piece::Equals,
            Token::Nowiki(s) => Piece::Verbatim(s),
        },
        link,
    ));

    let field = piece
        .repeated()
        .collect::<Vec<_>>()
        .map_with(|pieces, e| (pieces, e.span()));

    padding
        .clone()
        .or_not()
        .ignore_then(just(Token::Open))
        .ignore_then(field.clone())
        .then(
            just(Token::Pipe)
                .ignore_then(field)
                .repeated()
                .collect::<Vec<Field>>(),
        )
        .then_ignore(just(Token::Close))
        .then_ignore(padding.or_not())
        .then_ignore(end())
}

/// Turn raw fields into a template, rejecting empty names and keys
fn assemble(source: &str, name_field: Field, fields: Vec<Field>) -> Result<Template, SyntaxError> {
    let (name_pieces, name_span) = name_field;
    let name = concat(&name_pieces).trim().to_string();
    if name.is_empty() {
        return Err(SyntaxError::new(
            source,
            name_span.into_range(),
            "template name is empty",
        ));
    }

    let mut positional = Vec::new();
    let mut named = NamedParams::new();

    for (pieces, span) in fields {
        match pieces.iter().position(|p| matches!(p, Piece::Equals)) {
            Some(split) => {
                let key = concat(&pieces[..split]).trim().to_string();
                if key.is_empty() {
                    return Err(SyntaxError::new(
                        source,
                        span.into_range(),
                        "parameter with an empty key",
                    ));
                }
                let value = trim_value(concat(&pieces[split + 1..]));
                named.insert(key, value);
            }
            None => positional.push(trim_value(concat(&pieces))),
        }
    }

    Ok(Template::from_parts(name, positional, named))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_type_declaration() {
        let t = parse("{{Constraint:Type|class=Q2221906|relation=instance}}").expect("Should parse");
        assert_eq!(t.name(), "Constraint:Type");
        assert!(t.positional().is_empty());
        assert_eq!(t.get("class"), Some("Q2221906"));
        assert_eq!(t.get("relation"), Some("instance"));
    }

    #[test]
    fn test_parse_name_only() {
        let t = parse("{{Constraint:Unique value}}").expect("Should parse");
        assert_eq!(t, Template::new("Constraint:Unique value"));
    }

    #[test]
    fn test_positional_in_order() {
        let t = parse("{{X|first|k=v|second}}").expect("Should parse");
        assert_eq!(t.positional(), &["first".to_string(), "second".to_string()]);
        assert_eq!(t.get("k"), Some("v"));
    }

    #[test]
    fn test_keys_and_values_trimmed() {
        let t = parse("{{ X | class = Q5 \n| relation= subclass}}").expect("Should parse");
        assert_eq!(t.name(), "X");
        assert_eq!(t.get("class"), Some("Q5"));
        assert_eq!(t.get("relation"), Some("subclass"));
    }

    #[test]
    fn test_value_keeps_later_equals() {
        let t = parse("{{Constraint:Format|pattern=a=b}}").expect("Should parse");
        assert_eq!(t.get("pattern"), Some("a=b"));
    }

    #[test]
    fn test_whitespace_only_value_preserved() {
        let t = parse("{{X|k=   |  }}").expect("Should parse");
        assert_eq!(t.get("k"), Some("   "));
        assert_eq!(t.positional(), &["  ".to_string()]);
    }

    #[test]
    fn test_empty_value() {
        let t = parse("{{X|k=}}").expect("Should parse");
        assert_eq!(t.get("k"), Some(""));
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let t = parse("{{X|k=1|k=2}}").expect("Should parse");
        assert_eq!(t.get("k"), Some("2"));
        assert_eq!(t.named().len(), 1);
    }

    #[test]
    fn test_nowiki_protects_pipes() {
        let t = parse("{{Constraint:Format|pattern=<nowiki>a|b</nowiki>}}").expect("Should parse");
        assert_eq!(t.get("pattern"), Some("a|b"));
    }

    #[test]
    fn test_nowiki_with_angle_bracket_protects_pipes() {
        let t = parse("{{Constraint:Format|pattern=<nowiki>a<b|c</nowiki>}}").expect("Should parse");
        assert_eq!(t.get("pattern"), Some("a<b|c"));
        assert!(t.positional().is_empty());
    }

    #[test]
    fn test_nowiki_named_group() {
        let t = parse("{{X|pattern=<nowiki>(?<year>\\d{4})|-</nowiki>}}").expect("Should parse");
        assert_eq!(t.get("pattern"), Some("(?<year>\\d{4})|-"));
    }

    #[test]
    fn test_nowiki_protects_equals() {
        let t = parse("{{X|<nowiki>a=b</nowiki>}}").expect("Should parse");
        assert!(t.named().is_empty());
        assert_eq!(t.positional(), &["a=b".to_string()]);
    }

    #[test]
    fn test_links_protect_pipes() {
        let t = parse("{{X|note=see [[Help:Constraints|help]]}}").expect("Should parse");
        assert_eq!(t.get("note"), Some("see [[Help:Constraints|help]]"));
    }

    #[test]
    fn test_regex_brackets_survive() {
        let t = parse("{{Constraint:Format|pattern=[1-9]\\d*}}").expect("Should parse");
        assert_eq!(t.get("pattern"), Some("[1-9]\\d*"));
    }

    #[test]
    fn test_surrounding_whitespace_allowed() {
        assert!(parse("  {{X}}\n").is_ok());
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = parse("").unwrap_err();
        assert_eq!(err.message, "empty declaration");
        assert!(parse("   ").is_err());
    }

    #[test]
    fn test_missing_open_braces() {
        let err = parse("Constraint:Type|class=Q1}}").unwrap_err();
        assert_eq!(err.span.start, 0);
    }

    #[test]
    fn test_missing_close_braces() {
        let err = parse("{{Constraint:Type|class=Q1").unwrap_err();
        assert_eq!(err.message, "unexpected end of input");
    }

    #[test]
    fn test_lone_brace_rejected() {
        let err = parse("{{X|a}b}}").unwrap_err();
        assert_eq!(err.message, "unmatched brace");
        assert_eq!(err.fragment, "}");
    }

    #[test]
    fn test_extra_closing_brace_rejected() {
        assert!(parse("{{X}}}").is_err());
    }

    #[test]
    fn test_nested_template_rejected() {
        let err = parse("{{Constraint:One of|values={{Q|5}}}}").unwrap_err();
        assert_eq!(err.message, "nested templates are not supported");
        assert_eq!(err.fragment, "{{");
    }

    #[test]
    fn test_trailing_content_rejected() {
        assert!(parse("{{X}} trailing").is_err());
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = parse("{{X|=value}}").unwrap_err();
        assert_eq!(err.message, "parameter with an empty key");
        assert_eq!(err.fragment, "=value");
    }

    #[test]
    fn test_blank_key_rejected() {
        let err = parse("{{X|  =value}}").unwrap_err();
        assert_eq!(err.message, "parameter with an empty key");
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = parse("{{ |k=v}}").unwrap_err();
        assert_eq!(err.message, "template name is empty");
    }

    #[test]
    fn test_reserialization_reparses_equal() {
        let t = parse("{{Constraint:Item|property=P21|item=Q5|extra}}").expect("Should parse");
        let again = parse(&t.to_string()).expect("Should parse");
        assert_eq!(t, again);
    }

    #[test]
    fn test_reserialization_keeps_protected_values() {
        let inputs = [
            "{{X|p=<nowiki>a|b</nowiki>}}",
            "{{X|<nowiki>k=v</nowiki>}}",
            "{{X|p=<nowiki>{{a}}</nowiki>|<nowiki>x}y</nowiki>}}",
            "{{X|note=see [[Help:Constraints|help]]}}",
            "{{Constraint:Format|pattern=<nowiki>(?<y>\\d{4})|a<b</nowiki>}}",
        ];
        for input in inputs {
            let t = parse(input).expect("Should parse");
            let again = parse(&t.to_string())
                .unwrap_or_else(|e| panic!("{} did not reparse: {}", t, e));
            assert_eq!(t, again, "round trip of {}", input);
        }
    }
}
