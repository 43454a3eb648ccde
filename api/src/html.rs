//! Minimal HTML slicing for the fixed page structures we scrape.
//! Best-effort string scanning — no grammar, malformed blocks are skipped.

/// Find the next opening `<tag ...>` whose class attribute contains
/// `class_frag` as a whole token, starting at `from`.
/// Returns (tag_start, content_start).
pub(crate) fn find_tag_with_class(
    html: &str,
    tag: &str,
    class_frag: &str,
    from: usize,
) -> Option<(usize, usize)> {
    let open = format!("<{tag}");
    let mut pos = from;
    loop {
        let start = html.get(pos..)?.find(&open)? + pos;
        let head_end = html[start..].find('>')? + start;
        let head = &html[start..head_end];
        if class_attr(head).is_some_and(|c| has_class(c, class_frag)) {
            return Some((start, head_end + 1));
        }
        pos = head_end + 1;
    }
}

/// Extract the class attribute value out of a tag head.
pub(crate) fn class_attr(head: &str) -> Option<&str> {
    let idx = head.find("class=")?;
    let rest = &head[idx + "class=".len()..];
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let rest = &rest[1..];
    let end = rest.find(quote)?;
    Some(&rest[..end])
}

pub(crate) fn has_class(classes: &str, wanted: &str) -> bool {
    classes.split_ascii_whitespace().any(|c| c == wanted)
}

/// End index (exclusive, past the closing tag) of the element whose
/// opening tag starts at `open_start`. Tracks nesting of `tag`.
pub(crate) fn element_end(html: &str, tag: &str, open_start: usize) -> Option<usize> {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut depth = 1usize;
    let mut pos = html[open_start..].find('>')? + open_start + 1;
    loop {
        let next_open = html[pos..].find(&open).map(|i| i + pos);
        let next_close = html[pos..].find(&close).map(|i| i + pos)?;
        if let Some(o) = next_open
            && o < next_close
        {
            depth += 1;
            pos = o + open.len();
            continue;
        }
        depth -= 1;
        let after = html[next_close..].find('>')? + next_close + 1;
        if depth == 0 {
            return Some(after);
        }
        pos = after;
    }
}

/// Inner text of the first element carrying `class_frag`, tags stripped.
pub(crate) fn class_text(html: &str, tag: &str, class_frag: &str) -> Option<String> {
    let (start, content_start) = find_tag_with_class(html, tag, class_frag, 0)?;
    let end = element_end(html, tag, start)?;
    let inner = &html[content_start..end.saturating_sub(tag.len() + 3).max(content_start)];
    Some(strip_tags(inner))
}

/// All elements `tag` carrying `class_frag`, as (inner_html) slices.
pub(crate) fn class_blocks<'a>(html: &'a str, tag: &str, class_frag: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some((start, content_start)) = find_tag_with_class(html, tag, class_frag, pos) {
        let Some(end) = element_end(html, tag, start) else {
            break;
        };
        let inner_end = end.saturating_sub(tag.len() + 3).max(content_start);
        out.push(&html[content_start..inner_end]);
        pos = end;
    }
    out
}

/// Inner text of the first anchor in `html`, tags stripped.
pub(crate) fn first_anchor_text(html: &str) -> Option<String> {
    let start = html.find("<a")?;
    let content_start = html[start..].find('>')? + start + 1;
    let end = html[content_start..].find("</a>")? + content_start;
    let text = strip_tags(&html[content_start..end]);
    if text.is_empty() { None } else { Some(text) }
}

/// Strip tags, decode the handful of entities the sources emit, and
/// collapse whitespace.
pub(crate) fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"");
    normalize_ws(&decoded)
}

pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tag_by_class_token() {
        let html = r#"<div class="lineup is-nba"><span>x</span></div>"#;
        let hit = find_tag_with_class(html, "div", "is-nba", 0);
        assert!(hit.is_some());
        assert!(find_tag_with_class(html, "div", "nba", 0).is_none());
    }

    #[test]
    fn element_end_handles_nesting() {
        let html = r#"<div class="outer"><div>inner</div>tail</div><div>next</div>"#;
        let (start, _) = find_tag_with_class(html, "div", "outer", 0).unwrap();
        let end = element_end(html, "div", start).unwrap();
        assert_eq!(&html[..end], r#"<div class="outer"><div>inner</div>tail</div>"#);
    }

    #[test]
    fn strips_tags_and_entities() {
        assert_eq!(strip_tags("<b>A&nbsp;&amp;  B</b>"), "A & B");
    }

    #[test]
    fn anchor_text() {
        assert_eq!(
            first_anchor_text(r#"<span></span><a href="/p/1" title="t">LeBron James</a>"#),
            Some("LeBron James".to_string())
        );
    }
}
