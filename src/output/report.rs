use std::collections::HashSet;

use itertools::Itertools;

use crate::member::{Member, MemberId};
use crate::pagination::PageSlot;
use crate::runner::{DetailView, ListView, Runner};
use crate::settings::Theme;
use crate::state::{QueryAction, QueryState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Links {
    None,
    Site,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteFile {
    pub name: String,
    pub contents: Vec<u8>,
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn page_file_name(page: usize) -> String {
    if page <= 1 {
        "index.html".to_string()
    } else {
        format!("page-{page}.html")
    }
}

pub fn member_file_name(id: &MemberId) -> String {
    let slug: String = id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("member-{slug}.html")
}

fn page_shell(title: &str, theme: Theme, body: &str) -> Vec<u8> {
    let html_class = if theme.is_dark() { "dark" } else { "" };
    format!(
        r####"<!DOCTYPE html>
<html lang="en" class="{html_class}">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>
  <script src="https://cdn.tailwindcss.com"></script>
  <script>tailwind.config = {{ darkMode: "class" }};</script>
</head>
<body class="flex flex-col min-h-screen bg-gray-100 dark:bg-gray-900 text-gray-800 dark:text-white">
  <header class="bg-blue-900 dark:bg-gray-800 text-white py-6 shadow-md">
    <div class="container mx-auto px-4 flex items-center justify-between gap-4">
      <h1 class="text-3xl font-bold">Member Directory</h1>
      <span class="text-sm uppercase tracking-widest opacity-70">{theme} theme</span>
    </div>
  </header>
{body}
</body>
</html>
"####,
        title = escape_html(title),
    )
    .into_bytes()
}

fn render_card(member: &Member, links: Links) -> String {
    let (open, close) = match links {
        Links::Site => (
            format!(
                r#"<a href="{}" class="block bg-white dark:bg-gray-800 p-4 rounded-xl shadow hover:shadow-xl transition overflow-hidden">"#,
                escape_html(&member_file_name(&member.id))
            ),
            "</a>",
        ),
        Links::None => (
            r#"<div class="bg-white dark:bg-gray-800 p-4 rounded-xl shadow overflow-hidden">"#
                .to_string(),
            "</div>",
        ),
    };
    format!(
        r#"      {open}
        <div class="flex items-center justify-between">
          <span class="text-sm font-mono text-gray-400">#{id}</span>
          <span class="text-sm bg-blue-900 text-blue-200 px-2 py-1 rounded-full">{role}</span>
        </div>
        <h2 class="text-lg font-semibold mt-2">{name}</h2>
        <p class="text-sm text-gray-500 dark:text-gray-300">{email}</p>
        <p class="mt-2 text-sm">Skills: <span class="text-blue-600 dark:text-blue-300">{skills}</span></p>
      {close}
"#,
        id = escape_html(member.id.as_str()),
        role = escape_html(member.role.as_str()),
        name = escape_html(&member.name),
        email = escape_html(&member.email),
        skills = escape_html(&member.skills.iter().join(", ")),
    )
}

fn render_pagination(view: &ListView<'_>, links: Links) -> String {
    let page = &view.page;
    let mut out = String::new();
    out.push_str(r#"    <nav class="flex gap-2 justify-center mt-10 flex-wrap">"#);
    out.push('\n');

    let nav_button = |label: &str, target: Option<usize>| match (target, links) {
        (Some(p), Links::Site) => format!(
            r#"      <a href="{}" class="px-3 py-1 rounded bg-gray-800 text-white hover:bg-blue-700">{label}</a>"#,
            page_file_name(p)
        ),
        (Some(_), Links::None) => format!(
            r#"      <span class="px-3 py-1 rounded bg-gray-800 text-white">{label}</span>"#
        ),
        (None, _) => format!(
            r#"      <span class="px-3 py-1 rounded bg-gray-800 text-white opacity-50" aria-disabled="true">{label}</span>"#
        ),
    };

    out.push_str(&nav_button(
        "◀",
        page.has_previous().then(|| page.current_page - 1),
    ));
    out.push('\n');
    for slot in &page.window {
        let item = match (slot, links) {
            (PageSlot::Page(p), _) if *p == page.current_page => format!(
                r#"      <span class="px-3 py-1 rounded bg-blue-600 text-white" aria-current="page">{p}</span>"#
            ),
            (PageSlot::Page(p), Links::Site) => format!(
                r#"      <a href="{}" class="px-3 py-1 rounded bg-gray-700 text-white hover:bg-blue-500">{p}</a>"#,
                page_file_name(*p)
            ),
            (PageSlot::Page(p), Links::None) => {
                format!(r#"      <span class="px-3 py-1 rounded bg-gray-700 text-white">{p}</span>"#)
            }
            (PageSlot::Ellipsis, _) => {
                format!(r#"      <span class="px-3 py-1 text-gray-400">{slot}</span>"#)
            }
        };
        out.push_str(&item);
        out.push('\n');
    }
    out.push_str(&nav_button("▶", page.has_next().then(|| page.current_page + 1)));
    out.push('\n');
    out.push_str("    </nav>\n");
    out
}

fn render_filter_tags(view: &ListView<'_>) -> String {
    let q = &view.query;
    let mut tags: Vec<String> = Vec::new();
    if !q.search.is_empty() {
        tags.push(format!("Search: {}", q.search));
    }
    if q.role != crate::member::RoleFilter::All {
        tags.push(format!("Role: {}", q.role));
    }
    tags.extend(q.domains.iter().map(str::to_string));
    tags.extend(q.skills.iter().map(str::to_string));
    if tags.is_empty() {
        return String::new();
    }
    let spans = tags
        .iter()
        .map(|t| {
            format!(
                r#"<span class="bg-blue-800 text-white px-3 py-1 rounded-full">{}</span>"#,
                escape_html(t)
            )
        })
        .join("\n      ");
    format!("    <div class=\"mb-4 flex flex-wrap gap-2\">\n      {spans}\n    </div>\n")
}

fn render_list_document(view: &ListView<'_>, theme: Theme, links: Links) -> Vec<u8> {
    let mut body = String::new();
    body.push_str(r#"  <main class="flex-grow p-4"><div class="max-w-7xl mx-auto">"#);
    body.push('\n');
    body.push_str(&format!(
        "    <p class=\"text-xl mb-6\">Total: {} Members</p>\n",
        view.page.total_items
    ));
    body.push_str(&render_filter_tags(view));

    if view.page.is_empty() {
        body.push_str(
            "    <p class=\"text-center mt-10 text-gray-500\">No members match the current filters.</p>\n",
        );
    } else {
        body.push_str(r#"    <div class="grid sm:grid-cols-1 md:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4 gap-6">"#);
        body.push('\n');
        for member in &view.members {
            body.push_str(&render_card(member, links));
        }
        body.push_str("    </div>\n");
        if view.page.shows_controls() {
            body.push_str(&render_pagination(view, links));
        }
    }
    body.push_str("  </div></main>");

    page_shell("Member Directory", theme, &body)
}

fn render_detail_document(detail: &DetailView<'_>, theme: Theme, links: Links) -> Vec<u8> {
    let back = match links {
        Links::Site => format!(
            r#"    <a href="{}" class="mb-6 inline-block text-blue-600 hover:underline dark:text-blue-400">← Back to Directory</a>"#,
            page_file_name(1)
        ),
        Links::None => r#"    <p class="mb-6 text-blue-600 dark:text-blue-400">← Back to Directory: <code>memdir list</code></p>"#
            .to_string(),
    };
    match detail {
        DetailView::Found(m) => {
            let image = m.image.clone().unwrap_or_else(|| {
                format!(
                    "https://via.placeholder.com/250x250.png?text={}",
                    m.first_name()
                )
            });
            let fields = [
                ("Email", m.email.as_str()),
                ("Phone", m.phone.as_str()),
                ("Date of Birth", m.dob.as_str()),
                ("Address", m.address.as_str()),
                ("Gender", m.gender.as_str()),
                ("Domain", m.domain.as_str()),
            ]
            .iter()
            .map(|(label, value)| {
                format!(
                    "<p><strong>{label}:</strong> {}</p>",
                    escape_html(value)
                )
            })
            .chain(std::iter::once(format!(
                "<p><strong>Skills:</strong> {}</p>",
                escape_html(&m.skills.iter().join(", "))
            )))
            .join("\n          ");
            let body = format!(
                r#"  <main class="p-8">
{back}
    <div class="max-w-5xl mx-auto bg-white dark:bg-gray-800 rounded-xl shadow-lg overflow-hidden grid grid-cols-1 md:grid-cols-3 gap-6 p-6">
      <div class="md:col-span-1 flex items-center justify-center">
        <img src="{image}" alt="{name}" class="rounded-lg w-full max-w-xs object-cover"/>
      </div>
      <div class="md:col-span-2">
        <h2 class="text-3xl font-bold mb-2">{name}</h2>
        <p class="text-lg mb-4 text-blue-700 dark:text-blue-300">{role}</p>
        <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
          {fields}
        </div>
      </div>
    </div>
  </main>"#,
                image = escape_html(&image),
                name = escape_html(&m.name),
                role = escape_html(m.role.as_str()),
            );
            page_shell(&m.name, theme, &body)
        }
        DetailView::NotFound { id } => {
            let body = format!(
                r#"  <main class="p-8">
{back}
    <div class="text-center mt-10 text-red-500">Member not found: {id}</div>
  </main>"#,
                id = escape_html(id),
            );
            page_shell("Member not found", theme, &body)
        }
    }
}

pub fn render_list_html(view: &ListView<'_>, theme: Theme) -> Vec<u8> {
    render_list_document(view, theme, Links::None)
}

pub fn render_detail_html(detail: &DetailView<'_>, theme: Theme) -> Vec<u8> {
    render_detail_document(detail, theme, Links::None)
}

/// Every page of the filtered listing (`index.html`, `page-N.html`) plus one
/// `member-<id>.html` per member, cross-linked by file name.
pub fn render_site(runner: &mut Runner, state: &QueryState, theme: Theme) -> Vec<SiteFile> {
    let mut files = Vec::new();
    let mut cursor = state.clone();
    let mut page = 1;
    loop {
        cursor.apply(QueryAction::GoToPage(page));
        let view = runner.list(&mut cursor);
        let total = view.page.total_pages;
        files.push(SiteFile {
            name: page_file_name(page),
            contents: render_list_document(&view, theme, Links::Site),
        });
        if page >= total {
            break;
        }
        page += 1;
    }

    let mut written: HashSet<String> = HashSet::new();
    for member in runner.directory().members() {
        let name = member_file_name(&member.id);
        if !written.insert(name.clone()) {
            continue;
        }
        files.push(SiteFile {
            name,
            contents: render_detail_document(&DetailView::Found(member), theme, Links::Site),
        });
    }
    tracing::debug!(files = files.len(), "rendered html site");
    files
}
