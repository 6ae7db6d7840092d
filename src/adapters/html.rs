//! Minimal, case-insensitive HTML slicing for the two recreation pages.
//!
//! This is not a general HTML parser. It finds elements by tag name, matches
//! nested open/close tags of the same name and turns fragments into plain
//! text. That is all the hours table and the class listing need.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern"));
static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:p|div|li|h[1-6])\s*>").expect("block end pattern")
});
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([xX]?)([0-9a-fA-F]+);").expect("entity pattern"));
static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*["']([^"']*)["']"#).expect("class attribute pattern")
});

const CLASS_CONTAINER: &str = "eagleContent";

/// Byte offsets of one element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    start: usize,
    content_start: usize,
    content_end: usize,
    end: usize,
}

impl Element {
    pub fn content(&self) -> Range<usize> {
        self.content_start..self.content_end
    }
}

pub struct Document<'a> {
    html: &'a str,
    // ASCII lowercasing keeps byte offsets identical to `html`.
    lower: String,
}

impl<'a> Document<'a> {
    pub fn new(html: &'a str) -> Self {
        Self {
            html,
            lower: html.to_ascii_lowercase(),
        }
    }

    pub fn inner(&self, element: &Element) -> &'a str {
        &self.html[element.content()]
    }

    pub fn open_tag(&self, element: &Element) -> &'a str {
        &self.html[element.start..element.content_start]
    }

    /// Start of the next `<tag` at or after `from`, before `until`.
    fn find_open(&self, tag: &str, from: usize, until: usize) -> Option<usize> {
        let pattern = format!("<{}", tag);
        let mut pos = from;
        loop {
            let start = pos + self.lower.get(pos..until)?.find(&pattern)?;
            let after = start + pattern.len();
            match self.lower.as_bytes().get(after) {
                Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r') => return Some(start),
                _ => pos = after,
            }
        }
    }

    /// The element opened at `start`, closed by its matching `</tag>`.
    /// An unclosed element runs to `until`.
    fn element_at(&self, tag: &str, start: usize, until: usize) -> Option<Element> {
        let content_start = start + self.lower[start..until].find('>')? + 1;
        let close = format!("</{}", tag);
        let mut depth = 1;
        let mut pos = content_start;

        loop {
            let Some(close_at) = self.lower[pos..until].find(&close).map(|r| r + pos) else {
                return Some(Element {
                    start,
                    content_start,
                    content_end: until,
                    end: until,
                });
            };
            let close_end = self.lower[close_at..until]
                .find('>')
                .map_or(until, |r| close_at + r + 1);

            match self.find_open(tag, pos, close_at) {
                Some(nested) => {
                    depth += 1;
                    pos = nested + 1;
                }
                None => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(Element {
                            start,
                            content_start,
                            content_end: close_at,
                            end: close_end,
                        });
                    }
                    pos = close_end;
                }
            }
        }
    }

    /// Outermost `tag` elements inside `within`, in document order.
    pub fn elements(&self, tag: &str, within: Range<usize>) -> Vec<Element> {
        let mut found = Vec::new();
        let mut pos = within.start;
        while let Some(start) = self.find_open(tag, pos, within.end) {
            let Some(element) = self.element_at(tag, start, within.end) else {
                break;
            };
            pos = element.end.max(start + 1);
            found.push(element);
        }
        found
    }

    /// Every `tag` element inside `within`, nested ones included.
    pub fn all_elements(&self, tag: &str, within: Range<usize>) -> Vec<Element> {
        let mut found = Vec::new();
        let mut pos = within.start;
        while let Some(start) = self.find_open(tag, pos, within.end) {
            if let Some(element) = self.element_at(tag, start, within.end) {
                found.push(element);
            }
            pos = start + 1;
        }
        found
    }

    pub fn whole(&self) -> Range<usize> {
        0..self.html.len()
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        CLASS_ATTR
            .captures(self.open_tag(element))
            .is_some_and(|caps| caps[1].split_whitespace().any(|c| c == class))
    }
}

/// Text of one table row, one entry per `<td>`. Header rows yield nothing.
pub fn table_rows(html: &str) -> Vec<Vec<String>> {
    let doc = Document::new(html);
    doc.elements("tr", doc.whole())
        .iter()
        .map(|row| {
            doc.elements("td", row.content())
                .iter()
                .map(|cell| text_content(doc.inner(cell)))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

/// Single-line text of every `<p>`.
pub fn paragraphs(html: &str) -> Vec<String> {
    let doc = Document::new(html);
    doc.elements("p", doc.whole())
        .iter()
        .map(|p| inline_text(doc.inner(p)))
        .collect()
}

/// One class listing: the `<h4><strong>` title and the paragraph after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBlock {
    pub name: String,
    pub strongs: Vec<String>,
    pub text: String,
}

/// Class listings from the first `div.eagleContent` that has an `<h4>`.
/// `None` when no such container exists.
pub fn class_blocks(html: &str) -> Option<Vec<ClassBlock>> {
    let doc = Document::new(html);
    let container = doc
        .all_elements("div", doc.whole())
        .into_iter()
        .find(|div| {
            doc.has_class(div, CLASS_CONTAINER)
                && doc.find_open("h4", div.content_start, div.content_end).is_some()
        })?;

    let headings = doc.elements("h4", container.content());
    let mut blocks = Vec::new();

    for (i, heading) in headings.iter().enumerate() {
        let Some(strong) = doc.elements("strong", heading.content()).into_iter().next() else {
            continue;
        };
        let name = inline_text(doc.inner(&strong)).replace('\u{203a}', "");
        let name = name.trim().to_string();

        let limit = headings
            .get(i + 1)
            .map_or(container.content_end, |next| next.start);
        let Some(p) = doc
            .find_open("p", heading.end, limit)
            .and_then(|start| doc.element_at("p", start, limit))
        else {
            continue;
        };

        let strongs = doc
            .all_elements("strong", p.content())
            .iter()
            .map(|s| inline_text(doc.inner(s)))
            .collect();

        blocks.push(ClassBlock {
            name,
            strongs,
            text: inline_text(doc.inner(&p)),
        });
    }

    Some(blocks)
}

/// Multi-line text: `<br>`, the end of a block element and source newlines
/// separate lines, every line is whitespace-collapsed and blank lines are
/// dropped.
pub fn text_content(fragment: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(fragment, "\n");
    let with_breaks = BLOCK_END.replace_all(&with_breaks, "\n");
    let text = decode_entities(&strip_tags(&with_breaks, ""));
    text.lines()
        .map(normalize_ws)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-line text: tags act as spaces and all whitespace collapses.
pub fn inline_text(fragment: &str) -> String {
    normalize_ws(&decode_entities(&strip_tags(fragment, " ")))
}

fn strip_tags(s: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push_str(replacement);
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn decode_entities(s: &str) -> String {
    let named = s
        .replace("&nbsp;", " ")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}")
        .replace("&rsaquo;", "\u{203a}")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">");

    let numeric = NUMERIC_ENTITY.replace_all(&named, |caps: &regex::Captures| {
        let radix = if caps[1].is_empty() { 10 } else { 16 };
        u32::from_str_radix(&caps[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), String::from)
    });

    numeric.replace("&amp;", "&")
}

/// Collapses whitespace runs (including non-breaking spaces) and trims.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
