use serde::Serialize;

use crate::member::{Member, RoleFilter};

pub const DOMAINS: [&str; 5] = [
    "Web Development",
    "AI/ML",
    "Cybersecurity",
    "App Development",
    "IoT",
];

pub const SKILLS: [&str; 4] = ["React", "Python", "Cybersecurity", "Node.js"];

/// A multi-select filter dimension. Empty means "no restriction". Values keep
/// the order they were selected in; equality ignores that order.
#[derive(Clone, Debug, Default, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn toggle(&mut self, value: &str) {
        match self.0.iter().position(|v| v == value) {
            Some(idx) => {
                self.0.remove(idx);
            }
            None => self.0.push(value.to_string()),
        }
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for value in iter {
            let value = value.into();
            if !selection.contains(&value) {
                selection.0.push(value);
            }
        }
        selection
    }
}

pub fn toggle(value: &str, current: &Selection) -> Selection {
    let mut next = current.clone();
    next.toggle(value);
    next
}

/// The filter dimensions of a query. Also the key of [`FilterMemo`], so it
/// never carries the page number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    pub search: String,
    pub role: RoleFilter,
    pub domains: Selection,
    pub skills: Selection,
}

impl Query {
    pub fn matches(&self, member: &Member) -> bool {
        let needle = self.search.to_lowercase();
        self.matches_with_needle(member, &needle)
    }

    fn matches_with_needle(&self, member: &Member, needle: &str) -> bool {
        matches_search(member, needle)
            && self.role.accepts(member.role)
            && matches_domain(member, &self.domains)
            && matches_skills(member, &self.skills)
    }
}

/// `needle` must already be lowercased.
fn matches_search(member: &Member, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    member.name.to_lowercase().contains(needle)
        || member.role.as_str().to_lowercase().contains(needle)
        || member
            .skills
            .iter()
            .any(|s| s.to_lowercase().contains(needle))
}

fn matches_domain(member: &Member, domains: &Selection) -> bool {
    domains.is_empty() || domains.contains(&member.domain)
}

fn matches_skills(member: &Member, skills: &Selection) -> bool {
    skills.is_empty() || skills.iter().any(|s| member.has_skill(s))
}

/// Positions in `members` that satisfy `query`, ascending.
pub fn filter_indices(members: &[Member], query: &Query) -> Vec<usize> {
    let needle = query.search.to_lowercase();
    members
        .iter()
        .enumerate()
        .filter(|(_, m)| query.matches_with_needle(m, &needle))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter<'a>(members: &'a [Member], query: &Query) -> Vec<&'a Member> {
    let needle = query.search.to_lowercase();
    members
        .iter()
        .filter(|m| query.matches_with_needle(m, &needle))
        .collect()
}

/// Single-entry cache of the last filter result, keyed on the whole query.
#[derive(Debug, Default)]
pub struct FilterMemo {
    last: Option<(Query, Vec<usize>)>,
    hits: usize,
    misses: usize,
}

impl FilterMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, members: &[Member], query: &Query) -> &[usize] {
        let fresh = matches!(&self.last, Some((key, _)) if key == query);
        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            let indices = filter_indices(members, query);
            tracing::debug!(
                search = %query.search,
                role = %query.role,
                domains = query.domains.len(),
                skills = query.skills.len(),
                matched = indices.len(),
                "recomputed filter"
            );
            self.last = Some((query.clone(), indices));
        }
        match &self.last {
            Some((_, indices)) => indices.as_slice(),
            None => &[],
        }
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
