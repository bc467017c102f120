//! HTML rendering for the viewer page.

use chrono::Utc;

use crate::page::{
    CategoryArea, CategoryBody, CategoryView, PageState, RenderedItem, NO_CATEGORIES_PLACEHOLDER,
    NO_ITEMS_PLACEHOLDER,
};

const PAGE_STYLE: &str = "<style>:root{--bg:#f4f1ea;--card:#ffffff;--ink:#1d2329;--muted:#66707a;--line:#dde2e6;--head:#1b3a4b;--link:#0b5d7a}*{box-sizing:border-box}body{margin:0;color:var(--ink);font-family:\"Segoe UI\",\"PingFang SC\",\"Microsoft YaHei\",sans-serif;background:var(--bg)}.shell{max-width:980px;margin:0 auto;padding:20px 16px}.hero{background:var(--head);color:#f3f8fa;border-radius:14px;padding:16px 18px}.hero h1{margin:0 0 10px;font-size:1.4rem}.controls{display:flex;gap:12px;align-items:center;flex-wrap:wrap}#status{font-size:.9rem;color:#d3e4ea}.category{margin-top:14px;background:var(--card);border:1px solid var(--line);border-radius:12px;overflow:hidden}.category-title{margin:0;padding:10px 14px;font-size:1rem;cursor:pointer;border-bottom:1px solid var(--line);user-select:none}.category.collapsed .category-body{display:none}.category-body{padding:6px 14px}.card{padding:6px 0;border-bottom:1px dashed var(--line)}.card:last-child{border-bottom:0}.card-index{display:inline-block;min-width:2em;color:var(--muted)}.card a{color:var(--link);text-decoration:none}.card a:hover{text-decoration:underline}.empty{padding:12px 14px;color:var(--muted)}</style>\n";

const TOGGLE_SCRIPT: &str = "<script>document.querySelectorAll('.category-title').forEach(function(t){t.addEventListener('click',function(){t.parentElement.classList.toggle('collapsed');});});</script>\n";

/// Escapes text content: `&`, `<`, `>`.
pub fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes attribute values, which additionally need both quote characters.
pub fn escape_attr(input: &str) -> String {
    escape_text(input)
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_empty_placeholder(text: &str) -> String {
    format!("<div class=\"empty\">{}</div>", escape_text(text))
}

pub fn render_item(item: &RenderedItem) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"card\">");
    out.push_str(&format!("<span class=\"card-index\">{}.</span>", item.rank));
    out.push_str("<a href=\"");
    out.push_str(&escape_attr(&item.link));
    out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
    out.push_str(&escape_text(&item.title));
    out.push_str("</a></div>");
    out
}

pub fn render_item_list(body: &CategoryBody) -> String {
    match body {
        CategoryBody::Empty => render_empty_placeholder(NO_ITEMS_PLACEHOLDER),
        CategoryBody::Items(items) => items.iter().map(render_item).collect::<Vec<_>>().join("\n"),
    }
}

pub fn render_category_section(section: &CategoryView) -> String {
    let class = if section.collapsed {
        "category collapsed"
    } else {
        "category"
    };

    let mut out = String::new();
    out.push_str(&format!(
        "<section class=\"{}\" data-category=\"{}\">",
        class,
        escape_attr(&section.name)
    ));
    out.push_str("<h2 class=\"category-title\">");
    out.push_str(&escape_text(&section.title));
    out.push_str("</h2><div class=\"category-body\">\n");
    out.push_str(&render_item_list(&section.body));
    out.push_str("\n</div></section>");
    out
}

/// Inner HTML of the category container.
pub fn render_category_area(area: &CategoryArea) -> String {
    match area {
        CategoryArea::Cleared => String::new(),
        CategoryArea::Unavailable => render_empty_placeholder(NO_ITEMS_PLACEHOLDER),
        CategoryArea::NoCategories => render_empty_placeholder(NO_CATEGORIES_PLACEHOLDER),
        CategoryArea::Sections(sections) => sections
            .iter()
            .map(render_category_section)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn render_date_options(page: &PageState) -> String {
    let mut out = String::new();
    for option in &page.date_options {
        let selected = page.selected_date.as_deref() == Some(option.value.as_str());
        out.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            escape_attr(&option.value),
            if selected { " selected" } else { "" },
            escape_text(&option.label)
        ));
    }
    out
}

pub fn render_page_html(page: &PageState, title: &str) -> String {
    let now_utc = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let mut out = String::new();
    out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_text(title)));
    out.push_str(PAGE_STYLE);
    out.push_str("</head><body><main class=\"shell\">\n");
    out.push_str(&format!(
        "<section class=\"hero\"><h1>{}</h1><div class=\"controls\">",
        escape_text(title)
    ));
    out.push_str("<select id=\"date-select\">");
    out.push_str(&render_date_options(page));
    out.push_str("</select>");
    out.push_str(&format!(
        "<span id=\"status\">{}</span>",
        escape_text(&page.status)
    ));
    out.push_str(&format!(
        "<span class=\"generated\" data-generated=\"{}\"></span>",
        escape_attr(&now_utc)
    ));
    out.push_str("</div></section>\n<div id=\"categories\">\n");
    out.push_str(&render_category_area(&page.categories));
    out.push_str("\n</div>\n</main>\n");
    out.push_str(TOGGLE_SCRIPT);
    out.push_str("</body></html>\n");
    out
}
