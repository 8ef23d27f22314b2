use pulldown_cmark::{html, Options, Parser};

/// Converts markdown to HTML. Trailing line breaks are trimmed so the result
/// can be dropped into a template without introducing blank lines.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    let len = out.trim_end_matches('\n').len();
    out.truncate(len);
    out
}

/// Flattens markdown source onto a single line for summaries and excerpts.
/// Surrounding whitespace is trimmed and every line break becomes a space,
/// so a blank line between paragraphs becomes two spaces.
pub fn flatten(markdown: &str) -> String {
    markdown.trim().lines().collect::<Vec<_>>().join(" ")
}
