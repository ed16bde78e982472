use std::fmt;

use serde::{Serialize, Serializer};

pub const DEFAULT_PAGE_SIZE: usize = 20;

const FULL_WINDOW_MAX: usize = 10;

pub const ELLIPSIS: &str = "…";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSlot {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSlot::Page(p) => write!(f, "{p}"),
            PageSlot::Ellipsis => f.write_str(ELLIPSIS),
        }
    }
}

impl Serialize for PageSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageSlot::Page(p) => serializer.serialize_u64(*p as u64),
            PageSlot::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

pub fn page_window(total: usize, current: usize) -> Vec<PageSlot> {
    use PageSlot::{Ellipsis, Page};

    if total <= FULL_WINDOW_MAX {
        return (1..=total).map(Page).collect();
    }
    if current <= 3 {
        vec![
            Page(1),
            Page(2),
            Page(3),
            Page(4),
            Ellipsis,
            Page(total - 2),
            Page(total - 1),
            Page(total),
        ]
    } else if current >= total - 2 {
        vec![
            Page(1),
            Page(2),
            Page(3),
            Ellipsis,
            Page(total - 3),
            Page(total - 2),
            Page(total - 1),
            Page(total),
        ]
    } else {
        vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(total - 1),
            Page(total),
        ]
    }
}

/// Half-open slice for a 1-based page. Out-of-range pages (including 0) give
/// an empty slice.
pub fn page_slice<T>(items: &[T], page_size: usize, current_page: usize) -> &[T] {
    if page_size == 0 || current_page == 0 {
        return &[];
    }
    let start = match (current_page - 1).checked_mul(page_size) {
        Some(start) if start < items.len() => start,
        _ => return &[],
    };
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub window: Vec<PageSlot>,
}

impl PageInfo {
    pub fn new(total_items: usize, page_size: usize, current_page: usize) -> Self {
        let total = total_pages(total_items, page_size);
        Self {
            current_page,
            page_size,
            total_items,
            total_pages: total,
            window: page_window(total, current_page),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn shows_controls(&self) -> bool {
        self.total_pages > 1
    }

    /// 1-based position of the first item on this page, 0 when the page is empty.
    pub fn first_position(&self) -> usize {
        if self.current_page == 0 || self.current_page > self.total_pages {
            return 0;
        }
        (self.current_page - 1) * self.page_size + 1
    }

    pub fn last_position(&self) -> usize {
        if self.first_position() == 0 {
            return 0;
        }
        (self.current_page * self.page_size).min(self.total_items)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    #[serde(flatten)]
    pub info: PageInfo,
}

pub fn paginate<T>(items: &[T], page_size: usize, current_page: usize) -> Page<'_, T> {
    Page {
        items: page_slice(items, page_size, current_page),
        info: PageInfo::new(items.len(), page_size, current_page),
    }
}
