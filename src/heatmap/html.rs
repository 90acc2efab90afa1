// src/heatmap/html.rs

use super::grid::Cell;
use super::legend::{posts_label, Legend};
use super::{long_date, RenderOutcome};
use super::sink::{RenderSink, EMPTY_MESSAGE, ERROR_PREFIX};

/// Id of the element the markup is mounted into.
pub const CONTAINER_ID: &str = "heatmap-container";

/// Pixel size of one day square in the generated CSS grid.
pub const CELL_SIZE_PX: u32 = 12;

/// Emits the static-site markup: `heatmap-wrapper` > `heatmap-grid` cells plus
/// the `heatmap-legend`. Page scripts bind hover/click behavior through the
/// `data-*` attributes, which padding cells never carry.
#[derive(Debug, Default)]
pub struct HtmlSink {
    out: String,
}

impl HtmlSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl RenderSink for HtmlSink {
    fn clear(&mut self) {
        self.out.clear();
    }

    fn begin_grid(&mut self, weeks: usize) {
        self.out.push_str("<div class=\"heatmap-wrapper\">");
        self.out.push_str(&format!(
            "<div class=\"heatmap-grid\" style=\"grid-template-columns: repeat({weeks}, {CELL_SIZE_PX}px)\">"
        ));
    }

    fn cell(&mut self, cell: &Cell<'_>) {
        if !cell.in_range {
            self.out
                .push_str("<div class=\"heatmap-cell out-of-range\"></div>");
            return;
        }

        let date = cell.date.format("%Y-%m-%d");
        let mut attrs = format!(
            " style=\"background-color: {}\" data-date=\"{date}\" data-count=\"{}\" data-level=\"{}\"",
            cell.level.color(),
            cell.count,
            cell.level,
        );
        if let Some(record) = cell.record {
            let titles = serde_json::to_string(&record.titles).unwrap_or_default();
            let urls = serde_json::to_string(&record.urls).unwrap_or_default();
            attrs.push_str(&format!(
                " data-titles=\"{}\" data-urls=\"{}\"",
                escape(&titles),
                escape(&urls)
            ));
        }
        attrs.push_str(&format!(" title=\"{}\"", escape(&cell_title(cell))));

        self.out
            .push_str(&format!("<div class=\"heatmap-cell\"{attrs}></div>"));
    }

    fn end_grid(&mut self) {
        self.out.push_str("</div>");
    }

    fn legend(&mut self, legend: &Legend) {
        self.out.push_str("<div class=\"heatmap-legend\">");
        self.out.push_str(&format!(
            "<span class=\"heatmap-legend-label\">{}</span>",
            escape(legend.low)
        ));
        for swatch in &legend.swatches {
            self.out.push_str(&format!(
                "<div class=\"heatmap-legend-item\" style=\"background-color: {}\" title=\"{}\"></div>",
                swatch.color,
                escape(&swatch.title)
            ));
        }
        self.out.push_str(&format!(
            "<span class=\"heatmap-legend-label\">{}</span>",
            escape(legend.high)
        ));
        // closes heatmap-wrapper
        self.out.push_str("</div></div>");
    }

    fn empty_state(&mut self) {
        self.out.push_str(&format!(
            "<div class=\"heatmap-empty\"><p>{EMPTY_MESSAGE}</p></div>"
        ));
    }

    fn error_state(&mut self, message: &str) {
        self.out.push_str(&format!(
            "<div class=\"heatmap-error\"><p>{ERROR_PREFIX}: {}</p></div>",
            escape(message)
        ));
    }
}

/// Native tooltip text: date, count and up to three titles.
fn cell_title(cell: &Cell<'_>) -> String {
    let date = long_date(cell.date);
    match cell.record {
        Some(record) => {
            let mut lines = vec![date, posts_label(cell.count)];
            lines.extend(record.titles.iter().take(3).cloned());
            lines.join("\n")
        }
        None => format!("{date}\nNo posts"),
    }
}

/// Escape text for element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Replace the contents of the `heatmap-container` element in `page`.
///
/// Returns `None` when the page has no such element, which callers treat as
/// "nothing to render here". Mounting twice replaces the first mount.
pub fn mount(page: &str, markup: &str) -> Option<String> {
    let id_at = find_id_attr(page, &format!("id=\"{CONTAINER_ID}\""))
        .or_else(|| find_id_attr(page, &format!("id='{CONTAINER_ID}'")))?;
    let open_start = page[..id_at].rfind('<')?;
    let open_end = id_at + page[id_at..].find('>')? + 1;
    let tag: String = page[open_start + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if tag.is_empty() {
        return None;
    }
    let close_at = open_end + matching_close(&page[open_end..], &tag)?;

    let mut mounted = String::with_capacity(page.len() + markup.len());
    mounted.push_str(&page[..open_end]);
    mounted.push_str(markup);
    mounted.push_str(&page[close_at..]);
    Some(mounted)
}

/// Put a render pass's markup into `page`. A skipped pass, or a page without
/// the container, leaves the page exactly as it was.
pub fn mount_rendered(page: String, outcome: &RenderOutcome, markup: &str) -> String {
    if let RenderOutcome::Skipped(_) = outcome {
        return page;
    }
    mount(&page, markup).unwrap_or(page)
}

/// First `attr` that is a whole attribute, so `data-id=` does not count.
fn find_id_attr(page: &str, attr: &str) -> Option<usize> {
    let mut pos = 0;
    while let Some(i) = page[pos..].find(attr) {
        let at = pos + i;
        if page[..at]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_whitespace())
        {
            return Some(at);
        }
        pos = at + attr.len();
    }
    None
}

/// Offset of the closing tag that balances an already-open `<tag>`.
fn matching_close(body: &str, tag: &str) -> Option<usize> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut depth = 0usize;
    let mut pos = 0usize;

    loop {
        let next_close = pos + body[pos..].find(&close)?;
        match find_open(body, pos, &open) {
            Some(o) if o < next_close => {
                depth += 1;
                pos = o + open.len();
            }
            _ => {
                if depth == 0 {
                    return Some(next_close);
                }
                depth -= 1;
                pos = next_close + close.len();
            }
        }
    }
}

/// Next `<tag` that is a whole tag name, not a prefix of a longer one.
fn find_open(body: &str, from: usize, open: &str) -> Option<usize> {
    let mut pos = from;
    while let Some(i) = body[pos..].find(open) {
        let at = pos + i;
        let after = at + open.len();
        if body[after..]
            .chars()
            .next()
            .is_some_and(|c| c == '>' || c.is_ascii_whitespace())
        {
            return Some(at);
        }
        pos = after;
    }
    None
}
