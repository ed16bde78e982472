// Any filter action resets the page to 1.

use serde::Serialize;

use crate::filter::Query;
use crate::member::RoleFilter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryAction {
    SetSearch(String),
    SetRole(RoleFilter),
    ToggleDomain(String),
    ToggleSkill(String),
    ClearFilters,
    GoToPage(usize),
    NextPage,
    PreviousPage,
}

impl QueryAction {
    pub fn changes_filters(&self) -> bool {
        matches!(
            self,
            QueryAction::SetSearch(_)
                | QueryAction::SetRole(_)
                | QueryAction::ToggleDomain(_)
                | QueryAction::ToggleSkill(_)
                | QueryAction::ClearFilters
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub query: Query,
    pub page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            query: Query::default(),
            page: 1,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: QueryAction) {
        if action.changes_filters() {
            self.page = 1;
        }
        match action {
            QueryAction::SetSearch(search) => self.query.search = search,
            QueryAction::SetRole(role) => self.query.role = role,
            QueryAction::ToggleDomain(domain) => self.query.domains.toggle(&domain),
            QueryAction::ToggleSkill(skill) => self.query.skills.toggle(&skill),
            QueryAction::ClearFilters => self.query = Query::default(),
            QueryAction::GoToPage(page) => self.page = page.max(1),
            QueryAction::NextPage => self.page = self.page.saturating_add(1),
            QueryAction::PreviousPage => self.page = self.page.saturating_sub(1).max(1),
        }
    }

    pub fn reduce(&self, action: QueryAction) -> QueryState {
        let mut next = self.clone();
        next.apply(action);
        next
    }

    /// Pulls a stale page back into `1..=total_pages` (page 1 when there are
    /// no pages). Returns true when the page moved.
    pub fn clamp_page(&mut self, total_pages: usize) -> bool {
        let clamped = self.page.clamp(1, total_pages.max(1));
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }
}
