//! `#placeholder#` token counting and substitution.
//!
//! Tokens are matched inside single runs only. Replacing the text of a run
//! leaves its `a:rPr` untouched, so font, size and color survive.

use std::sync::OnceLock;

use capslide_ooxml::XmlElement;
use regex::Regex;

use crate::slide::{run_text, runs, Slide};

/// Punctuation removed from replacement text when marks are ignored
pub const PUNCTUATION_MARKS: &[char] = &[
    '，', '。', '？', '！', '：', '；', '、', '…', ',', '.', '?', '!', ':', ';', '~',
];

fn any_placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#\w+?#").expect("placeholder pattern is valid"))
}

/// The literal token for a placeholder name (`subtitle` -> `#subtitle#`)
pub fn token(placeholder: &str) -> String {
    format!("#{}#", placeholder)
}

/// Remove every punctuation mark in `marks` from `text`
pub fn strip_marks(text: &str, marks: &[char]) -> String {
    text.chars().filter(|c| !marks.contains(c)).collect()
}

/// Count placeholder tokens in a text
///
/// With no name, any `#word#` token counts; otherwise only `#name#`.
pub fn count_in_text(text: &str, placeholder: Option<&str>) -> usize {
    match placeholder {
        None => any_placeholder().find_iter(text).count(),
        Some(name) => text.matches(token(name).as_str()).count(),
    }
}

/// Count placeholder tokens across every run of a slide, table cells included
pub fn count_placeholders(slide: &Slide, placeholder: Option<&str>) -> usize {
    slide
        .text_bodies()
        .into_iter()
        .flat_map(runs)
        .map(|run| count_in_text(&run_text(run), placeholder))
        .sum()
}

/// Replace `#placeholder#` in every run of one text body
///
/// Returns the number of runs that contained the token; a run holding the
/// token twice counts once.
pub fn replace_placeholder(text_body: &mut XmlElement, placeholder: &str, text: &str) -> usize {
    let token = token(placeholder);
    let mut matched = 0;

    for paragraph in text_body.children_named_mut("p") {
        for run in paragraph.children_named_mut("r") {
            let Some(t) = run.child_mut("t") else {
                continue;
            };
            let current = t.text().into_owned();
            if current.contains(token.as_str()) {
                let replaced = current.replace(token.as_str(), text);
                t.set_text(replaced);
                matched += 1;
            }
        }
    }

    matched
}

/// Replace `#placeholder#` on every shape and table cell of a slide
pub fn replace_placeholder_of_slide(slide: &mut Slide, placeholder: &str, text: &str) -> usize {
    let mut matched = 0;
    slide.for_each_text_body_mut(|body| {
        matched += replace_placeholder(body, placeholder, text);
    });
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(runs: &[&str]) -> XmlElement {
        let mut paragraph = XmlElement::new("a:p");
        for text in runs {
            paragraph.push(
                XmlElement::new("a:r")
                    .with_child(XmlElement::new("a:rPr").with_attribute("sz", "2400"))
                    .with_child(XmlElement::new("a:t").with_text(*text)),
            );
        }
        XmlElement::new("p:txBody")
            .with_child(XmlElement::new("a:bodyPr"))
            .with_child(paragraph)
    }

    fn texts(body: &XmlElement) -> Vec<String> {
        runs(body).map(|r| run_text(r).into_owned()).collect()
    }

    #[test]
    fn test_count_generic_and_named() {
        assert_eq!(count_in_text("#A# and #B# and #A#", None), 3);
        assert_eq!(count_in_text("#A# and #B# and #A#", Some("A")), 2);
        assert_eq!(count_in_text("#中文#", None), 1);
        assert_eq!(count_in_text("# not a token #", None), 0);
        assert_eq!(count_in_text("##", None), 0);
    }

    #[test]
    fn test_count_name_is_literal() {
        assert_eq!(count_in_text("#a.b#", Some("a.b")), 1);
        assert_eq!(count_in_text("#axb#", Some("a.b")), 0);
    }

    #[test]
    fn test_replace_counts_runs_not_occurrences() {
        let mut body = body(&["#A# and #A#", "#A#", "plain"]);
        let matched = replace_placeholder(&mut body, "A", "x");

        assert_eq!(matched, 2);
        assert_eq!(texts(&body), vec!["x and x", "x", "plain"]);
    }

    #[test]
    fn test_replace_keeps_run_formatting() {
        let mut body = body(&["Say #subtitle#!"]);
        replace_placeholder(&mut body, "subtitle", "hello");

        let run = runs(&body).next().unwrap();
        assert_eq!(run.child("rPr").unwrap().attribute("sz"), Some("2400"));
        assert_eq!(run_text(run), "Say hello!");
    }

    #[test]
    fn test_replace_then_recount_is_zero() {
        let mut body = body(&["#name#", "#name# #other#"]);
        replace_placeholder(&mut body, "name", "value");

        let remaining: usize = texts(&body)
            .iter()
            .map(|t| count_in_text(t, Some("name")))
            .sum();
        assert_eq!(remaining, 0);
        assert_eq!(texts(&body)[1], "value #other#");
    }

    #[test]
    fn test_strip_marks() {
        assert_eq!(strip_marks("hello, world!", PUNCTUATION_MARKS), "hello world");
        assert_eq!(strip_marks("你好，世界！……", PUNCTUATION_MARKS), "你好世界");
        assert_eq!(strip_marks("a~b;c:d", PUNCTUATION_MARKS), "abcd");
        assert_eq!(strip_marks("keep-this 'quote'", PUNCTUATION_MARKS), "keep-this 'quote'");
    }

    #[test]
    fn test_token() {
        assert_eq!(token("subtitle"), "#subtitle#");
    }
}
