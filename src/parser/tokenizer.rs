//! Markup tokenizer and entity decoder.
//!
//! Turns a markup fragment into a flat stream of open, close and text tokens.
//! Tokenizing is total: anything that does not look like a tag is kept as
//! text, and nothing here returns an error.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Element names that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// Elements whose content is never document text.
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Longest entity body we try to decode (`&#x10FFFF;` fits easily).
const MAX_ENTITY_LEN: usize = 12;

/// A single markup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An opening tag such as `<span style="...">`.
    Open {
        /// Lowercased tag name
        tag: String,
        /// Attributes in source order, names lowercased, values decoded
        attributes: Vec<(String, String)>,
        /// True for `<x/>` and for void elements
        self_closing: bool,
    },

    /// A closing tag such as `</span>`.
    Close {
        /// Lowercased tag name
        tag: String,
    },

    /// Decoded character data.
    Text(String),
}

impl Token {
    /// Look up an attribute value on an open token.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Token::Open { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Markup tokenizer.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    normalize_unicode: bool,
}

impl Tokenizer {
    /// Create a tokenizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply NFC normalization to text tokens.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Tokenize markup into document-order tokens.
    pub fn tokenize(&self, markup: &str) -> Vec<Token> {
        let source = strip_non_content(markup);
        let bytes = source.as_bytes();
        let mut tokens = Vec::new();
        let mut text_start = 0;
        let mut pos = 0;
        // No tag can complete past the last '>'.
        let last_gt = bytes.iter().rposition(|&b| b == b'>');

        while pos < bytes.len() {
            if bytes[pos] != b'<' {
                pos += 1;
                continue;
            }
            if last_gt.map_or(true, |gt| gt < pos) {
                break;
            }
            match scan_markup(&source[pos..]) {
                Some((consumed, token)) => {
                    self.push_text(&source[text_start..pos], &mut tokens);
                    if let Some(token) = token {
                        tokens.push(token);
                    }
                    pos += consumed;
                    text_start = pos;
                }
                None => pos += 1,
            }
        }
        self.push_text(&source[text_start..], &mut tokens);

        tokens
    }

    fn push_text(&self, raw: &str, tokens: &mut Vec<Token>) {
        if raw.is_empty() {
            return;
        }
        let decoded = decode_entities(raw);
        let text = if self.normalize_unicode {
            decoded.nfc().collect::<String>()
        } else {
            decoded.into_owned()
        };
        tokens.push(Token::Text(text));
    }
}

/// Tokenize markup with default settings.
pub fn tokenize(markup: &str) -> Vec<Token> {
    Tokenizer::new().tokenize(markup)
}

fn non_content_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // One alternative per element so a block only ends at its own closing
        // tag. Unterminated blocks swallow the rest of the input.
        let blocks: Vec<String> = NON_CONTENT_ELEMENTS
            .iter()
            .map(|name| format!(r"<{name}\b[^>]*>.*?</{name}\s*>|<{name}\b[^>]*>.*"))
            .collect();
        Regex::new(&format!(r"(?is)<!--.*?-->|<!--.*|{}", blocks.join("|")))
            .expect("non-content pattern is valid")
    })
}

/// Remove comments and script/style-like blocks.
fn strip_non_content(markup: &str) -> Cow<'_, str> {
    non_content_regex().replace_all(markup, "")
}

/// Try to read one tag or declaration at the start of `s` (which begins with
/// `<`). Returns the consumed byte length and the token, if any.
fn scan_markup(s: &str) -> Option<(usize, Option<Token>)> {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        Some(b'!') | Some(b'?') => {
            let end = s.find('>')?;
            Some((end + 1, None))
        }
        Some(b'/') => {
            if !bytes.get(2).is_some_and(u8::is_ascii_alphabetic) {
                return None;
            }
            let name_end = scan_name(bytes, 2);
            let end = name_end + s[name_end..].find('>')?;
            let tag = s[2..name_end].to_ascii_lowercase();
            Some((end + 1, Some(Token::Close { tag })))
        }
        Some(b) if b.is_ascii_alphabetic() => {
            scan_open_tag(s).map(|(consumed, token)| (consumed, Some(token)))
        }
        _ => None,
    }
}

fn scan_name(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-' || bytes[i] == b':')
    {
        i += 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn scan_open_tag(s: &str) -> Option<(usize, Token)> {
    let bytes = s.as_bytes();
    let name_end = scan_name(bytes, 1);
    let tag = s[1..name_end].to_ascii_lowercase();
    let mut attributes = Vec::new();
    let mut explicit_close = false;
    let mut i = name_end;

    loop {
        i = skip_whitespace(bytes, i);
        match bytes.get(i) {
            None => return None,
            Some(b'>') => {
                i += 1;
                break;
            }
            Some(b'/') => {
                explicit_close = true;
                i += 1;
                continue;
            }
            Some(_) => explicit_close = false,
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let name = s[name_start..i].to_ascii_lowercase();

        let mut value = String::new();
        let after_name = skip_whitespace(bytes, i);
        if bytes.get(after_name) == Some(&b'=') {
            i = skip_whitespace(bytes, after_name + 1);
            match bytes.get(i) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let value_start = i + 1;
                    let len = bytes[value_start..].iter().position(|&b| b == quote)?;
                    value = decode_entities(&s[value_start..value_start + len]).into_owned();
                    i = value_start + len + 1;
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode_entities(&s[value_start..i]).into_owned();
                }
            }
        }

        if !name.is_empty() {
            attributes.push((name, value));
        }
    }

    let self_closing = explicit_close || VOID_ELEMENTS.contains(&tag.as_str());
    Some((
        i,
        Token::Open {
            tag,
            attributes,
            self_closing,
        },
    ))
}

/// Decode character entities.
///
/// Handles the five XML entities, `&nbsp;` (as a plain space) and decimal or
/// hex numeric references. Anything else is left untouched.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_entity(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(tail: &str) -> Option<(char, usize)> {
    let (semi, _) = tail
        .char_indices()
        .take(MAX_ENTITY_LEN)
        .find(|&(_, c)| c == ';')?;
    let body = &tail[1..semi];

    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let numeric = body.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) if is_digits(hex, u8::is_ascii_hexdigit) => {
                    u32::from_str_radix(hex, 16).ok()?
                }
                None if is_digits(numeric, u8::is_ascii_digit) => numeric.parse::<u32>().ok()?,
                _ => return None,
            };
            if code == 0 {
                return None;
            }
            char::from_u32(code)?
        }
    };
    Some((ch, semi + 1))
}

fn is_digits(s: &str, digit: fn(&u8) -> bool) -> bool {
    !s.is_empty() && s.bytes().all(|b| digit(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(tag: &str) -> Token {
        Token::Open {
            tag: tag.to_string(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    fn close(tag: &str) -> Token {
        Token::Close {
            tag: tag.to_string(),
        }
    }

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    #[test]
    fn test_tokenize_simple() {
        let tokens = tokenize("<p>Hello <B>world</B></p>");
        assert_eq!(
            tokens,
            vec![
                open("p"),
                text("Hello "),
                open("b"),
                text("world"),
                close("b"),
                close("p"),
            ]
        );
    }

    #[test]
    fn test_tokenize_attributes() {
        let tokens = tokenize(r#"<span style="color: red" class='x y' data-n=3 hidden>t</span>"#);
        match &tokens[0] {
            Token::Open {
                tag,
                attributes,
                self_closing,
            } => {
                assert_eq!(tag, "span");
                assert!(!self_closing);
                assert_eq!(
                    attributes,
                    &vec![
                        ("style".to_string(), "color: red".to_string()),
                        ("class".to_string(), "x y".to_string()),
                        ("data-n".to_string(), "3".to_string()),
                        ("hidden".to_string(), String::new()),
                    ]
                );
            }
            other => panic!("expected open tag, got {:?}", other),
        }
        assert_eq!(tokens[0].attribute("class"), Some("x y"));
        assert_eq!(tokens[0].attribute("missing"), None);
    }

    #[test]
    fn test_void_and_explicit_self_closing() {
        let tokens = tokenize("a<br>b<hr/><img src=x.png><div/>");
        let flags: Vec<bool> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Open { self_closing, .. } => Some(*self_closing),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![true, true, true, true]);
    }

    #[test]
    fn test_strips_script_style_and_comments() {
        let tokens = tokenize(
            "<p>a</p><script>var x = '<p>no</p>';</script><!-- <p>hidden</p> --><STYLE>p{}</STYLE><p>b</p>",
        );
        let texts: Vec<&str> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_non_content_block_ends_at_own_closing_tag() {
        let text_of = |markup: &str| -> Vec<String> {
            tokenize(markup)
                .into_iter()
                .filter_map(|t| match t {
                    Token::Text(s) => Some(s),
                    _ => None,
                })
                .collect()
        };

        assert_eq!(
            text_of(
                "<html><head><style>p{}</style><title>Leaked Title</title></head><body><p>Body</p></body></html>"
            ),
            vec!["Body"]
        );
        assert_eq!(
            text_of("<script>var s = \"</style>\"; var t = 1;</script><p>Body</p>"),
            vec!["Body"]
        );
        assert!(text_of("<head><title>x</title>").is_empty());
    }

    #[test]
    fn test_unterminated_tags_scan_once() {
        let markup = "<a ".repeat(20_000);
        assert_eq!(tokenize(&markup), vec![text(&markup)]);

        let tokens = tokenize("<b>x</b> <i never closed");
        assert_eq!(
            tokens,
            vec![open("b"), text("x"), close("b"), text(" <i never closed")]
        );
    }

    #[test]
    fn test_unterminated_comment_swallows_rest() {
        let tokens = tokenize("<p>a</p><!-- never closed <p>b</p>");
        assert_eq!(tokens, vec![open("p"), text("a"), close("p")]);
    }

    #[test]
    fn test_declarations_skipped() {
        let tokens = tokenize("<!DOCTYPE html><?xml version=\"1.0\"?><p>x</p>");
        assert_eq!(tokens, vec![open("p"), text("x"), close("p")]);
    }

    #[test]
    fn test_literal_angle_brackets() {
        let tokens = tokenize("1 < 2 and <3");
        assert_eq!(tokens, vec![text("1 < 2 and <3")]);

        let tokens = tokenize("a <b unterminated");
        assert_eq!(tokens, vec![text("a <b unterminated")]);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(
            decode_entities("&lt;b&gt; &amp; &quot;q&quot; &apos;s&apos;"),
            "<b> & \"q\" 's'"
        );
        assert_eq!(decode_entities("a&nbsp;b"), "a b");
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&#8212;"), "\u{2014}");
    }

    #[test]
    fn test_decode_entities_leaves_unknown() {
        assert_eq!(decode_entities("&copy; &#0; &#xD800; & x"), "&copy; &#0; &#xD800; & x");
        assert_eq!(decode_entities("AT&T"), "AT&T");
        let malformed = "&#+65; &#x+41; &#-1; &#; &#x;";
        assert_eq!(decode_entities(malformed), malformed);
        assert!(matches!(decode_entities("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_entities_in_attributes() {
        let tokens = tokenize(r#"<span title="a &amp; b">x</span>"#);
        assert_eq!(tokens[0].attribute("title"), Some("a & b"));
    }

    #[test]
    fn test_unicode_normalization() {
        let decomposed = "e\u{301}";
        let tokens = Tokenizer::new().with_normalization(true).tokenize(decomposed);
        assert_eq!(tokens, vec![text("\u{e9}")]);

        let tokens = Tokenizer::new().tokenize(decomposed);
        assert_eq!(tokens, vec![text(decomposed)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_multibyte_text_around_tags() {
        let tokens = tokenize("한국어<b>日本語</b>é");
        assert_eq!(
            tokens,
            vec![
                text("한국어"),
                open("b"),
                text("日本語"),
                close("b"),
                text("é"),
            ]
        );
    }
}
