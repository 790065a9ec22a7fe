use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::ElementRef;

const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tr",
    "ul",
];

/// Rendered text of an element, close to what a browser's `innerText` shows.
///
/// Markup is dropped, whitespace runs collapse to one space, block elements
/// and `<br>` start new lines, table cells in a row are tab-separated, and the
/// result is trimmed.
pub fn rendered_text(element: ElementRef) -> String {
    let mut buffer = TextBuffer::default();
    for child in element.children() {
        visit(child, &mut buffer);
    }
    buffer.finish()
}

fn visit(node: NodeRef<'_, Node>, buffer: &mut TextBuffer) {
    match node.value() {
        Node::Text(text) => buffer.push_text(text),
        Node::Element(element) => {
            let tag = element.name();
            if SKIPPED.contains(&tag) {
                return;
            }
            if tag == "br" {
                buffer.line_break();
                return;
            }
            if matches!(tag, "td" | "th") {
                buffer.cell_break();
            }
            let block = BLOCKS.contains(&tag);
            if block {
                buffer.ensure_newline();
            }
            for child in node.children() {
                visit(child, buffer);
            }
            if block {
                buffer.ensure_newline();
            }
        }
        _ => {
            for child in node.children() {
                visit(child, buffer);
            }
        }
    }
}

#[derive(Default)]
struct TextBuffer {
    out: String,
    pending_space: bool,
}

impl TextBuffer {
    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn at_segment_start(&self) -> bool {
        self.at_line_start() || self.out.ends_with('\t')
    }

    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.pending_space = !self.at_segment_start();
                continue;
            }
            if self.pending_space {
                self.out.push(' ');
                self.pending_space = false;
            }
            self.out.push(ch);
        }
    }

    fn line_break(&mut self) {
        self.out.push('\n');
        self.pending_space = false;
    }

    /// Separates a table cell from the previous one on the same line.
    fn cell_break(&mut self) {
        if !self.at_segment_start() {
            self.out.push('\t');
        }
        self.pending_space = false;
    }

    fn ensure_newline(&mut self) {
        if !self.at_line_start() {
            self.out.push('\n');
        }
        self.pending_space = false;
    }

    fn finish(self) -> String {
        self.out
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn text_of(html: &str, css: &str) -> String {
        let doc = Html::parse_document(html);
        let sel = Selector::parse(css).unwrap();
        rendered_text(doc.select(&sel).next().unwrap())
    }

    #[test]
    fn collapses_whitespace_and_drops_markup() {
        let html = "<div id=x>\n   Senior   <b>Rust</b>\n Engineer  </div>";
        assert_eq!(text_of(html, "#x"), "Senior Rust Engineer");
    }

    #[test]
    fn blocks_and_breaks_become_lines() {
        let html = "<div id=x><p>First line</p><p>Second<br>Third</p><ul><li>a</li><li>b</li></ul></div>";
        assert_eq!(text_of(html, "#x"), "First line\nSecond\nThird\na\nb");
    }

    #[test]
    fn table_cells_are_tab_separated_rows_are_lines() {
        let html = "<div id=x><table>\
            <tr><th>Salary</th><th> Location </th></tr>\
            <tr><td>100k</td><td></td><td>Remote</td></tr>\
            </table></div>";
        assert_eq!(text_of(html, "#x"), "Salary\tLocation\n100k\tRemote");
    }

    #[test]
    fn skips_scripts_and_styles() {
        let html = "<div id=x>Hello<script>var a = 1;</script><style>p{}</style> world</div>";
        assert_eq!(text_of(html, "#x"), "Hello world");
    }
}
