pub mod report;

use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;

use crate::directory::Facets;
use crate::member::Member;
use crate::pagination::PageSlot;
use crate::runner::{DetailView, ListView};
use crate::settings::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Serialize)]
struct NotFoundRecord<'a> {
    error: &'static str,
    id: &'a str,
}

pub fn render_list(view: &ListView<'_>, format: OutputFormat, theme: Theme) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_list_text(view).into_bytes(),
        OutputFormat::Json => render_json(view),
        OutputFormat::Html => report::render_list_html(view, theme),
    }
}

pub fn render_detail(detail: &DetailView<'_>, format: OutputFormat, theme: Theme) -> Vec<u8> {
    match (format, detail) {
        (OutputFormat::Text, _) => render_detail_text(detail).into_bytes(),
        (OutputFormat::Json, DetailView::Found(member)) => render_json(member),
        (OutputFormat::Json, DetailView::NotFound { id }) => render_json(&NotFoundRecord {
            error: "member not found",
            id,
        }),
        (OutputFormat::Html, _) => report::render_detail_html(detail, theme),
    }
}

pub fn render_facets(facets: &Facets, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Json => render_json(facets),
        _ => render_facets_text(facets).into_bytes(),
    }
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(value).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

fn bracket(tag: &str) -> String {
    format!("{}{}{}", "[".bold().white(), tag, "]".bold().white())
}

fn active_filter_tags(view: &ListView<'_>) -> Vec<String> {
    let q = &view.query;
    let mut tags = Vec::new();
    if !q.search.is_empty() {
        tags.push(format!("search: {}", q.search));
    }
    if q.role != crate::member::RoleFilter::All {
        tags.push(format!("role: {}", q.role));
    }
    tags.extend(q.domains.iter().map(|d| format!("domain: {d}")));
    tags.extend(q.skills.iter().map(|s| format!("skill: {s}")));
    tags
}

pub fn render_pagination_text(view: &ListView<'_>) -> String {
    let page = &view.page;
    let prev = if page.has_previous() {
        "◀".bold().white().to_string()
    } else {
        "◀".dimmed().to_string()
    };
    let next = if page.has_next() {
        "▶".bold().white().to_string()
    } else {
        "▶".dimmed().to_string()
    };
    let slots = page
        .window
        .iter()
        .map(|slot| match slot {
            PageSlot::Page(p) if *p == page.current_page => format!("[{p}]").bold().blue().to_string(),
            PageSlot::Page(p) => p.to_string(),
            PageSlot::Ellipsis => slot.to_string().dimmed().to_string(),
        })
        .join(" ");
    format!("{prev} {slots} {next}")
}

fn render_member_card(out: &mut String, member: &Member) {
    out.push_str(&format!(
        "{} {} {}\n",
        member.id.as_str().dimmed(),
        member.name.bold().white(),
        bracket(&member.role.as_str().cyan().to_string())
    ));
    if !member.email.is_empty() {
        out.push_str(&format!("    {}\n", member.email));
    }
    out.push_str(&format!(
        "    Skills: {}\n",
        member.skills.iter().join(", ").blue()
    ));
}

pub fn render_list_text(view: &ListView<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        ":: {:<10}: {} Members\n",
        "Total",
        view.page.total_items.to_string().bold()
    ));
    let tags = active_filter_tags(view);
    if !tags.is_empty() {
        out.push_str(&format!(
            ":: {:<10}: {}\n",
            "Filters",
            tags.iter().map(|t| bracket(t)).join(" ")
        ));
    }
    out.push('\n');

    if view.page.is_empty() {
        out.push_str(&format!("{}\n", "No members found.".yellow()));
        return out;
    }

    for member in &view.members {
        render_member_card(&mut out, member);
    }

    if view.page.shows_controls() {
        out.push('\n');
        out.push_str(&format!(
            "{}   {}\n",
            render_pagination_text(view),
            format!(
                "showing {}-{} of {}",
                view.page.first_position(),
                view.page.last_position(),
                view.page.total_items
            )
            .dimmed()
        ));
    }
    out
}

fn kv(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(":: {:<13}: {}\n", label, value));
}

pub fn render_detail_text(detail: &DetailView<'_>) -> String {
    let mut out = String::new();
    match detail {
        DetailView::Found(m) => {
            out.push_str(&format!("{}\n", m.name.bold().white()));
            out.push_str(&format!("{}\n\n", m.role.as_str().blue()));
            kv(&mut out, "Email", &m.email);
            kv(&mut out, "Phone", &m.phone);
            kv(&mut out, "Date of Birth", &m.dob);
            kv(&mut out, "Address", &m.address);
            kv(&mut out, "Gender", &m.gender);
            kv(&mut out, "Domain", &m.domain);
            kv(&mut out, "Skills", &m.skills.iter().join(", "));
        }
        DetailView::NotFound { id } => {
            out.push_str(&format!(
                "{} Member not found: {}\n",
                bracket(&"ERR".bold().red().to_string()),
                id
            ));
            out.push_str("← Back to Directory: memdir list\n");
        }
    }
    out
}

pub fn render_facets_text(facets: &Facets) -> String {
    let mut out = String::new();
    for (label, items) in [
        ("Roles", &facets.roles),
        ("Domains", &facets.domains),
        ("Skills", &facets.skills),
    ] {
        out.push_str(&format!("{}\n", label.bold().white()));
        for f in items {
            out.push_str(&format!("  {:<20} {}\n", f.value, f.count.to_string().dimmed()));
        }
    }
    out
}
