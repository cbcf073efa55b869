use std::collections::HashSet;
use std::path::Path;

use eyre::Result;
use html2text::config;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::models::{Formula, SectionAnchor};
use crate::outline::{NodeId, Outline};

const COPY_TRIGGER_SELECTOR: &str = r#"button.copy-btn, button[onclick*="copyToClipboard"]"#;

/// Which optional page elements exist. Every behavior bound to an absent
/// element is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Roles {
    pub theme_toggle: bool,
    pub landing: bool,
    pub toc_search: bool,
    pub panel_toggle: bool,
    pub show_landing: bool,
    pub progress_bar: bool,
    pub toc_container: bool,
    pub progress_indicator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: Option<String>,
    pub title: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub path: String,
    pub title: String,
    pub landing_html: Option<String>,
    pub outline: Outline,
    pub sections: Vec<Section>,
    pub formulas: Vec<Formula>,
    pub roles: Roles,
}

/// The document flattened into terminal lines at a given width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    pub width: usize,
    pub lines: Vec<String>,
    pub heading_rows: HashSet<usize>,
    pub anchors: Vec<SectionAnchor>,
}

impl TextLayout {
    pub fn height(&self) -> i64 {
        self.lines.len() as i64
    }

    pub fn is_heading(&self, row: usize) -> bool {
        self.heading_rows.contains(&row)
    }
}

impl Document {
    pub fn load(path: &Path) -> Result<Self> {
        let html = std::fs::read_to_string(path)
            .map_err(|err| eyre::eyre!("Could not read {}: {}", path.display(), err))?;
        Self::parse(&html, &path.to_string_lossy())
    }

    pub fn parse(html_src: &str, path: &str) -> Result<Self> {
        let html = Html::parse_document(html_src);

        let exists = |id: &str| -> Result<bool> {
            Ok(html.select(&selector(&format!("#{id}"))?).next().is_some())
        };
        let roles = Roles {
            theme_toggle: exists("themeToggle")?,
            landing: exists("landing")?,
            toc_search: exists("tocSearch")?,
            panel_toggle: exists("tocPanelToggle")?,
            show_landing: exists("showLanding")?,
            progress_bar: exists("scrollProgress")?,
            toc_container: exists("tocScroll")? || exists("sidebar")?,
            progress_indicator: exists("progressCircle")? && exists("progressText")?,
        };

        let title = extract_title(&html, path)?;
        let landing_html = html
            .select(&selector("#landing")?)
            .next()
            .map(|landing| landing.inner_html());
        let outline = extract_outline(&html)?;
        let (sections, formulas) = extract_sections(&html)?;

        Ok(Self {
            path: path.to_string(),
            title,
            landing_html,
            outline,
            sections,
            formulas,
            roles,
        })
    }

    /// Lay out every section at `width` columns. Section anchors point at the
    /// first line of each section.
    pub fn layout(&self, width: usize) -> Result<TextLayout> {
        let width = width.max(20);
        let heading_re = Regex::new(r"^#{1,6} ")?;
        let mut layout = TextLayout {
            width,
            ..TextLayout::default()
        };

        for section in &self.sections {
            layout.anchors.push(SectionAnchor {
                id: section.id.clone(),
                offset: layout.lines.len() as i64,
            });
            for line in render_html(&section.html, width)? {
                if heading_re.is_match(&line) {
                    layout.heading_rows.insert(layout.lines.len());
                }
                layout.lines.push(line);
            }
            layout.lines.push(String::new());
        }
        Ok(layout)
    }

    pub fn landing_lines(&self, width: usize) -> Result<Vec<String>> {
        match &self.landing_html {
            Some(html) => render_html(html, width.max(20)),
            None => Ok(Vec::new()),
        }
    }

    /// Indented outline followed by the section list, for `--dump`.
    pub fn dump(&self) -> String {
        let mut out = format!("{}\n\nContents\n", self.title);
        for node in self.outline.nodes() {
            let indent = "  ".repeat(node.depth + 1);
            match &node.target {
                Some(target) => out.push_str(&format!("{}{} (#{})\n", indent, node.label, target)),
                None => out.push_str(&format!("{}{}\n", indent, node.label)),
            }
        }
        out.push_str("\nSections\n");
        for section in &self.sections {
            let id = section.id.as_deref().unwrap_or("-");
            out.push_str(&format!("  [{}] {}\n", id, section.title));
        }
        if !self.formulas.is_empty() {
            out.push_str(&format!("\n{} copyable formulas\n", self.formulas.len()));
        }
        out
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| eyre::eyre!("Invalid selector {}: {}", css, err))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn render_html(html: &str, width: usize) -> Result<Vec<String>> {
    let text = config::plain()
        .link_footnotes(false)
        .string_from_read(html.as_bytes(), width)?;
    Ok(text.lines().map(|s| s.trim_end().to_string()).collect())
}

fn extract_title(html: &Html, path: &str) -> Result<String> {
    for css in ["title", "h1"] {
        if let Some(element) = html.select(&selector(css)?).next() {
            let text = collapse_whitespace(&element.text().collect::<String>());
            if !text.is_empty() {
                return Ok(text);
            }
        }
    }
    Ok(Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "scrollmark".to_string()))
}

fn extract_outline(html: &Html) -> Result<Outline> {
    let mut outline = Outline::new();
    let Some(toc) = html.select(&selector(".toc")?).next() else {
        return Ok(outline);
    };
    let list = if is_list(toc) {
        Some(toc)
    } else {
        toc.select(&selector("ul, ol")?).next()
    };
    if let Some(list) = list {
        let link_selector = selector("a")?;
        append_items(list, None, &mut outline, &link_selector);
    }
    Ok(outline)
}

fn is_list(element: ElementRef) -> bool {
    matches!(element.value().name(), "ul" | "ol")
}

fn append_items(list: ElementRef, parent: Option<NodeId>, outline: &mut Outline, link_selector: &Selector) {
    for item in list.children().filter_map(ElementRef::wrap) {
        if item.value().name() != "li" {
            continue;
        }
        let id = match own_link(item, link_selector) {
            Some(link) => {
                let label = collapse_whitespace(&link.text().collect::<String>());
                let target = link
                    .value()
                    .attr("href")
                    .and_then(|href| href.trim().strip_prefix('#'));
                outline.push(parent, &label, target)
            }
            None => {
                let label: String = item
                    .children()
                    .filter_map(|node| node.value().as_text().map(|t| t.text.to_string()))
                    .collect();
                outline.push_plain(parent, &collapse_whitespace(&label))
            }
        };
        for nested in item.children().filter_map(ElementRef::wrap).filter(|e| is_list(*e)) {
            if nested.value().name() == "ul" && nested.value().classes().any(|c| c == "subsection") {
                outline.mark_subsection(id);
            }
            append_items(nested, Some(id), outline, link_selector);
        }
    }
}

/// The first link whose nearest enclosing list item is `item` itself, so
/// links of nested entries are not claimed by their parent.
fn own_link<'a>(item: ElementRef<'a>, link_selector: &Selector) -> Option<ElementRef<'a>> {
    item.select(link_selector).find(|link| {
        link.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "li")
            == Some(item)
    })
}

fn extract_sections(html: &Html) -> Result<(Vec<Section>, Vec<Formula>)> {
    let section_selector = selector(".section")?;
    let heading_selector = selector("h1, h2, h3, h4, h5, h6")?;
    let trigger_selector = selector(COPY_TRIGGER_SELECTOR)?;
    let mut sections = Vec::new();
    let mut formulas = Vec::new();

    for element in html.select(&section_selector) {
        let id = element.value().attr("id").map(str::to_string);
        let title = element
            .select(&heading_selector)
            .find(|h| owning_section(*h) == Some(element))
            .map(|h| collapse_whitespace(&h.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .or_else(|| id.clone())
            .unwrap_or_else(|| "Untitled section".to_string());

        for trigger in element
            .select(&trigger_selector)
            .filter(|t| owning_section(*t) == Some(element))
        {
            formulas.push(Formula {
                section_id: id.clone(),
                trigger_label: collapse_whitespace(&trigger.text().collect::<String>()),
                text: adjacent_text(trigger),
            });
        }

        // Nested sections are laid out on their own, right after this one.
        let mut own_html = element.html();
        for nested in element.select(&section_selector) {
            own_html = own_html.replacen(&nested.html(), "", 1);
        }

        sections.push(Section {
            id,
            title,
            html: own_html,
        });
    }
    Ok((sections, formulas))
}

/// The closest enclosing `.section` of `element`.
fn owning_section<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().classes().any(|c| c == "section"))
}

/// Text of the node right after `trigger`, skipping whitespace between tags.
fn adjacent_text(trigger: ElementRef) -> String {
    let mut sibling = trigger.next_sibling();
    while let Some(node) = sibling {
        match node.value() {
            Node::Text(text) if text.trim().is_empty() => {}
            Node::Text(text) => return text.trim().to_string(),
            Node::Element(_) => {
                return ElementRef::wrap(node)
                    .map(|e| e.text().collect::<String>().trim().to_string())
                    .unwrap_or_default();
            }
            _ => {}
        }
        sibling = node.next_sibling();
    }
    String::new()
}
