//! Lenient HTML reader producing a [`Document`]. It understands what form
//! extraction needs (elements, attributes, text, raw-text elements, void
//! elements, character references) and recovers from malformed markup
//! instead of failing, like a browser would.

use crate::dom::{Document, NodeId};

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const MAX_REFERENCE_LEN: usize = 32;

/// Elements whose content is text up to the matching end tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

pub(crate) fn parse(html: &str) -> Document {
    let mut doc = Document::new();
    let mut stack: Vec<NodeId> = vec![doc.root()];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'<' {
                i += 1;
            }
            push_text(&mut doc, &stack, &html[start..i]);
            continue;
        }

        if starts_with_at(bytes, i, b"<!--") {
            i = find_subslice(bytes, i + 4, b"-->")
                .map(|end| end + 3)
                .unwrap_or(bytes.len());
            continue;
        }

        // Doctype, CDATA, processing instructions.
        if starts_with_at(bytes, i, b"<!") || starts_with_at(bytes, i, b"<?") {
            i = find_byte(bytes, i, b'>')
                .map(|end| end + 1)
                .unwrap_or(bytes.len());
            continue;
        }

        if starts_with_at(bytes, i, b"</") {
            match parse_end_tag(html, i) {
                Some((tag, next)) => {
                    close_element(&doc, &mut stack, &tag);
                    i = next;
                }
                None => {
                    push_text(&mut doc, &stack, "</");
                    i += 2;
                }
            }
            continue;
        }

        let Some(start) = parse_start_tag(html, i) else {
            // A stray '<' is plain text.
            push_text(&mut doc, &stack, "<");
            i += 1;
            continue;
        };
        i = start.next;

        close_implied(&doc, &mut stack, &start.tag);
        let parent = stack.last().copied().unwrap_or_else(|| doc.root());
        let node = doc.create_element(parent, &start.tag, start.attrs);

        if RAW_TEXT_TAGS.contains(&start.tag.as_str()) && !start.self_closing {
            let close = find_end_tag(bytes, i, start.tag.as_bytes()).unwrap_or(bytes.len());
            let body = &html[i..close];
            if !body.is_empty() {
                let text = if start.tag == "textarea" || start.tag == "title" {
                    decode_character_references(body)
                } else {
                    body.to_string()
                };
                doc.append_text(node, &text);
            }
            i = parse_end_tag(html, close)
                .map(|(_, next)| next)
                .unwrap_or(bytes.len());
            continue;
        }

        if !start.self_closing && !VOID_TAGS.contains(&start.tag.as_str()) {
            stack.push(node);
        }
    }

    doc.initialize_control_values();
    doc
}

fn push_text(doc: &mut Document, stack: &[NodeId], raw: &str) {
    if raw.is_empty() {
        return;
    }
    let parent = stack.last().copied().unwrap_or_else(|| doc.root());
    doc.append_text(parent, &decode_character_references(raw));
}

/// Pop up to and including the innermost open element named `tag`. An end
/// tag with no matching open element is ignored.
fn close_element(doc: &Document, stack: &mut Vec<NodeId>, tag: &str) {
    let Some(position) = stack
        .iter()
        .rposition(|node| doc.tag_name(*node) == Some(tag))
    else {
        return;
    };
    if position > 0 {
        stack.truncate(position);
    }
}

/// Start tags that end an open `<p>`.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Elements an implied `</p>` never reaches past.
const SCOPE_BOUNDARIES: &[&str] = &[
    "html", "table", "td", "th", "caption", "button", "object", "template", "select",
];

/// Apply the implied end tags a new `tag` triggers: a new option ends the
/// open option, a list item ends its open sibling, and so on.
fn close_implied(doc: &Document, stack: &mut Vec<NodeId>, tag: &str) {
    match tag {
        "option" => close_current(doc, stack, &["option"]),
        "optgroup" => {
            close_current(doc, stack, &["option"]);
            close_current(doc, stack, &["optgroup"]);
        }
        "li" => close_in_scope(doc, stack, &["li"], &["ul", "ol", "menu", "table", "td", "th"]),
        "dt" | "dd" => close_in_scope(doc, stack, &["dt", "dd"], &["dl", "table", "td", "th"]),
        "tr" => close_in_scope(doc, stack, &["tr"], &["table", "tbody", "thead", "tfoot"]),
        "td" | "th" => close_in_scope(doc, stack, &["td", "th"], &["tr", "table"]),
        "tbody" | "thead" | "tfoot" => {
            close_in_scope(doc, stack, &["tbody", "thead", "tfoot"], &["table"])
        }
        _ => {}
    }
    if CLOSES_P.contains(&tag) {
        close_in_scope(doc, stack, &["p"], SCOPE_BOUNDARIES);
    }
}

/// Pop the current node when it is one of `tags`.
fn close_current(doc: &Document, stack: &mut Vec<NodeId>, tags: &[&str]) {
    let is_open = stack
        .last()
        .and_then(|node| doc.tag_name(*node))
        .map(|current| tags.contains(&current))
        .unwrap_or(false);
    if is_open && stack.len() > 1 {
        stack.pop();
    }
}

/// Pop up to and including the innermost open element in `tags`, unless a
/// boundary element sits above it.
fn close_in_scope(doc: &Document, stack: &mut Vec<NodeId>, tags: &[&str], boundaries: &[&str]) {
    for position in (1..stack.len()).rev() {
        let Some(current) = doc.tag_name(stack[position]) else {
            continue;
        };
        if tags.contains(&current) {
            stack.truncate(position);
            return;
        }
        if boundaries.contains(&current) {
            return;
        }
    }
}

struct StartTag {
    tag: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
    next: usize,
}

fn parse_start_tag(html: &str, at: usize) -> Option<StartTag> {
    let bytes = html.as_bytes();
    let mut i = at + 1;

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    if i == tag_start || !bytes[tag_start].is_ascii_alphabetic() {
        return None;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            break;
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                i += 1;
                if bytes.get(i) == Some(&b'>') {
                    self_closing = true;
                    i += 1;
                    break;
                }
                continue;
            }
            _ => {}
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        if i == name_start {
            // Unexpected byte; skip it so parsing always makes progress.
            i += 1;
            continue;
        }
        let name = html[name_start..i].to_ascii_lowercase();

        skip_ws(bytes, &mut i);
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(html, &mut i)
        } else {
            String::new()
        };
        attrs.push((name, value));
    }

    Some(StartTag {
        tag,
        attrs,
        self_closing,
        next: i,
    })
}

fn parse_attr_value(html: &str, i: &mut usize) -> String {
    let bytes = html.as_bytes();
    if *i >= bytes.len() {
        return String::new();
    }

    if bytes[*i] == b'"' || bytes[*i] == b'\'' {
        let quote = bytes[*i];
        *i += 1;
        let start = *i;
        while *i < bytes.len() && bytes[*i] != quote {
            *i += 1;
        }
        let value = decode_character_references(&html[start..*i]);
        if *i < bytes.len() {
            *i += 1;
        }
        return value;
    }

    let start = *i;
    while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
        *i += 1;
    }
    decode_character_references(&html[start..*i])
}

fn parse_end_tag(html: &str, at: usize) -> Option<(String, usize)> {
    let bytes = html.as_bytes();
    if !starts_with_at(bytes, at, b"</") {
        return None;
    }
    let mut i = at + 2;
    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    if i == tag_start {
        return None;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();
    let end = find_byte(bytes, i, b'>')?;
    Some((tag, end + 1))
}

/// Position of the `</tag` that closes a raw-text element.
fn find_end_tag(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut i = from;
    while let Some(lt) = find_subslice(bytes, i, b"</") {
        let name = lt + 2;
        let matches = bytes.len() >= name + tag.len()
            && bytes[name..name + tag.len()].eq_ignore_ascii_case(tag)
            && bytes
                .get(name + tag.len())
                .map(|b| !is_tag_char(*b))
                .unwrap_or(true);
        if matches {
            return Some(lt);
        }
        i = lt + 2;
    }
    None
}

/// Decode the named references forms commonly use plus numeric references.
/// Unknown references are left as written.
pub(crate) fn decode_character_references(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').filter(|semi| *semi <= MAX_REFERENCE_LEN).and_then(|semi| {
            let entity = &rest[1..semi];
            decode_entity(entity).map(|ch| (ch, semi + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let hex = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'));
        let code = match hex {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes.len() >= at + needle.len() && &bytes[at..at + needle.len()] == needle
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|b| *b == needle)
        .map(|pos| from + pos)
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':'
}

fn is_attr_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'>' | b'/' | b'=' | b'"' | b'\'')
}
