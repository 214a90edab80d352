use std::collections::{HashMap, HashSet};

/// Program descriptions arrive either as HTML from the backend's editor or as
/// markdown; both end up as sanitized HTML.
#[must_use]
pub fn description_to_html(input: &str) -> String {
    if looks_like_html(input) {
        return sanitize_html(input);
    }
    markdown_to_html(input)
}

/// Plain-text rendering of a description for terminal output.
#[must_use]
pub fn description_to_text(input: &str) -> String {
    let text = if looks_like_html(input) {
        strip_html_tags(&sanitize_html(input))
    } else {
        input.to_owned()
    };
    collapse_blank_lines(&text)
}

#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "br", "em", "strong", "b", "i", "ul", "ol", "li", "blockquote", "a", "h2", "h3",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", std::iter::once("href").collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

#[must_use]
pub fn looks_like_html(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    let Some(start) = lower.find('<') else {
        return false;
    };
    if !lower[start + 1..].contains('>') {
        return false;
    }

    ["<p", "<div", "<span", "<br", "<ul", "<ol", "<strong", "<em", "<a "]
        .iter()
        .any(|tag| lower.contains(tag))
}

fn strip_html_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut tag_buf = String::new();

    for ch in input.chars() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
                let tag = tag_buf.trim().trim_start_matches('/').to_ascii_lowercase();
                if ["br", "p", "li", "blockquote", "h2", "h3"]
                    .iter()
                    .any(|block| tag.starts_with(block))
                {
                    out.push('\n');
                }
                tag_buf.clear();
            } else {
                tag_buf.push(ch);
            }
            continue;
        }

        if ch == '<' {
            in_tag = true;
            continue;
        }
        out.push(ch);
    }

    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn collapse_blank_lines(input: &str) -> String {
    let mut lines = Vec::new();
    let mut blank_streak = 0usize;

    for line in input.replace("\r\n", "\n").split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            blank_streak += 1;
            if blank_streak > 1 || lines.is_empty() {
                continue;
            }
        } else {
            blank_streak = 0;
        }
        lines.push(trimmed.to_owned());
    }

    lines.join("\n").trim_end().to_owned()
}
