use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::directory::{Directory, DirectoryError, Facets, Lookup};
use crate::filter::{FilterMemo, Query};
use crate::member::Member;
use crate::pagination::{self, PageInfo, DEFAULT_PAGE_SIZE};
use crate::state::QueryState;

#[derive(Clone, Debug)]
pub enum DataSource {
    Embedded,
    FilePath(PathBuf),
    Inline(Vec<Member>),
}

#[derive(Clone, Debug)]
pub struct Options {
    pub data: DataSource,
    pub page_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            data: DataSource::Embedded,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid page_size {value}, expected positive integer")]
    InvalidPageSize { value: usize },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

#[derive(Clone, Debug, Serialize)]
pub struct ListView<'a> {
    pub query: Query,
    pub members: Vec<&'a Member>,
    #[serde(flatten)]
    pub page: PageInfo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailView<'a> {
    Found(&'a Member),
    NotFound { id: String },
}

#[derive(Debug)]
pub struct Runner {
    directory: Directory,
    page_size: usize,
    memo: FilterMemo,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.page_size == 0 {
            return Err(RunnerError::InvalidPageSize {
                value: options.page_size,
            });
        }
        let directory = match options.data {
            DataSource::Embedded => Directory::embedded()?,
            DataSource::FilePath(path) => Directory::from_path(&path)?,
            DataSource::Inline(members) => Directory::from_members(members)?,
        };
        Ok(Self {
            directory,
            page_size: options.page_size,
            memo: FilterMemo::new(),
        })
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn facets(&self) -> Facets {
        self.directory.facets()
    }

    pub fn list(&mut self, state: &mut QueryState) -> ListView<'_> {
        let members = self.directory.members();
        let matched = self.memo.get_or_compute(members, &state.query);
        let total = pagination::total_pages(matched.len(), self.page_size);
        if state.clamp_page(total) {
            tracing::debug!(page = state.page, total_pages = total, "clamped stale page");
        }
        let page = pagination::paginate(matched, self.page_size, state.page);
        ListView {
            query: state.query.clone(),
            members: page.items.iter().map(|&i| &members[i]).collect(),
            page: page.info,
        }
    }

    pub fn show(&self, id: &str) -> DetailView<'_> {
        match self.directory.find(id) {
            Lookup::Found(member) => DetailView::Found(member),
            Lookup::NotFound => {
                tracing::debug!(id, "member not found");
                DetailView::NotFound { id: id.trim().to_string() }
            }
        }
    }

    pub fn memo(&self) -> &FilterMemo {
        &self.memo
    }
}
