use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use itertools::Itertools;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::filter::{DOMAINS, SKILLS};
use crate::member::{Member, MemberId, Role, RoleFilter};

const EMBEDDED_MEMBERS: &str = include_str!("../../data/members.json");

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read member data: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse member data ({origin}): {source}")]
    ParseJson {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse member data ({origin}): {source}")]
    ParseYaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("member at position {position} has an empty id")]
    EmptyId { position: usize },

    #[error("member '{id}' has an empty name")]
    EmptyName { id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yml") | Some("yaml") => DataFormat::Yaml,
            _ => DataFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a Member),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Member> {
        match self {
            Lookup::Found(m) => Some(m),
            Lookup::NotFound => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub value: String,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub roles: Vec<Facet>,
    pub domains: Vec<Facet>,
    pub skills: Vec<Facet>,
}

#[derive(Clone, Debug)]
pub struct Directory {
    members: Vec<Member>,
    index: HashMap<MemberId, usize>,
}

impl Directory {
    pub fn embedded() -> Result<Self, DirectoryError> {
        Self::from_json_str(EMBEDDED_MEMBERS, "embedded")
    }

    pub fn from_path(path: &Path) -> Result<Self, DirectoryError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DirectoryError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let origin = path.display().to_string();
        match DataFormat::from_path(path) {
            DataFormat::Json => Self::from_json_str(&contents, &origin),
            DataFormat::Yaml => Self::from_yaml_str(&contents, &origin),
        }
    }

    pub fn from_json_str(contents: &str, origin: &str) -> Result<Self, DirectoryError> {
        let members: Vec<Member> =
            serde_json::from_str(contents).map_err(|source| DirectoryError::ParseJson {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_members(members)
    }

    pub fn from_yaml_str(contents: &str, origin: &str) -> Result<Self, DirectoryError> {
        let members: Vec<Member> =
            serde_yaml::from_str(contents).map_err(|source| DirectoryError::ParseYaml {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_members(members)
    }

    pub fn from_members(mut members: Vec<Member>) -> Result<Self, DirectoryError> {
        let email_shape = email_shape();
        let mut index = HashMap::with_capacity(members.len());

        for (position, member) in members.iter_mut().enumerate() {
            if member.id.is_empty() {
                return Err(DirectoryError::EmptyId { position });
            }
            if member.name.trim().is_empty() {
                return Err(DirectoryError::EmptyName {
                    id: member.id.to_string(),
                });
            }

            let before = member.skills.len();
            member.skills = std::mem::take(&mut member.skills)
                .into_iter()
                .unique()
                .collect();
            if member.skills.len() != before {
                tracing::warn!(id = %member.id, "dropped duplicate skill tags");
            }

            if !member.email.is_empty() && !email_shape.is_match(&member.email) {
                tracing::warn!(id = %member.id, email = %member.email, "email looks malformed");
            }

            if index.contains_key(&member.id) {
                tracing::warn!(id = %member.id, "duplicate member id, lookups use the first");
            } else {
                index.insert(member.id.clone(), position);
            }
        }

        tracing::info!(members = members.len(), "loaded member directory");
        Ok(Directory { members, index })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn find(&self, id: &str) -> Lookup<'_> {
        match self.index.get(&MemberId::new(id)) {
            Some(&position) => Lookup::Found(&self.members[position]),
            None => Lookup::NotFound,
        }
    }

    /// Selectable roles, domains and skills with member counts. The fixed
    /// catalogs always appear (possibly with a zero count), followed by any
    /// extra values found in the data in alphabetical order.
    pub fn facets(&self) -> Facets {
        let mut role_counts: BTreeMap<Role, usize> = BTreeMap::new();
        let mut domain_counts: HashMap<&str, usize> = HashMap::new();
        let mut skill_counts: HashMap<&str, usize> = HashMap::new();
        for m in &self.members {
            *role_counts.entry(m.role).or_default() += 1;
            if !m.domain.is_empty() {
                *domain_counts.entry(m.domain.as_str()).or_default() += 1;
            }
            for s in &m.skills {
                *skill_counts.entry(s.as_str()).or_default() += 1;
            }
        }

        let roles = std::iter::once(Facet {
            value: RoleFilter::ALL_LABEL.to_string(),
            count: self.members.len(),
        })
        .chain(Role::ALL.iter().map(|r| Facet {
            value: r.to_string(),
            count: role_counts.get(r).copied().unwrap_or(0),
        }))
        .collect();

        Facets {
            roles,
            domains: catalog_facets(&DOMAINS, &domain_counts),
            skills: catalog_facets(&SKILLS, &skill_counts),
        }
    }
}

fn catalog_facets(catalog: &[&str], counts: &HashMap<&str, usize>) -> Vec<Facet> {
    let known: HashSet<&str> = catalog.iter().copied().collect();
    let extras = counts
        .keys()
        .copied()
        .filter(|v| !known.contains(v))
        .sorted();
    catalog
        .iter()
        .copied()
        .chain(extras)
        .map(|value| Facet {
            value: value.to_string(),
            count: counts.get(value).copied().unwrap_or(0),
        })
        .collect()
}

fn email_shape() -> Regex {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dataset_loads() {
        let dir = Directory::embedded().unwrap();
        assert!(dir.len() > 20);
        assert!(matches!(dir.find("1"), Lookup::Found(m) if m.role == Role::Chair));
    }

    #[test]
    fn lookup_miss_is_not_found() {
        let dir = Directory::embedded().unwrap();
        assert_eq!(dir.find("does-not-exist"), Lookup::NotFound);
        assert_eq!(dir.find(" 1 ").found().map(|m| m.id.as_str()), Some("1"));
    }

    #[test]
    fn duplicate_ids_resolve_to_first() {
        let dir = Directory::from_members(vec![
            Member::new("7", "First", Role::Member),
            Member::new("7", "Second", Role::Member),
        ])
        .unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.find("7").found().unwrap().name, "First");
    }

    #[test]
    fn duplicate_skills_are_dropped_in_order() {
        let dir = Directory::from_members(vec![Member::new("1", "A", Role::Member)
            .with_skills(["Go", "React", "Go"])])
        .unwrap();
        assert_eq!(dir.members()[0].skills, vec!["Go", "React"]);
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = Directory::from_members(vec![Member::new("  ", "A", Role::Member)]).unwrap_err();
        assert!(matches!(err, DirectoryError::EmptyId { position: 0 }));
    }

    #[test]
    fn yaml_and_json_datasets_parse() {
        let yaml = "- id: 3\n  name: Meera\n  role: Secretary\n  domain: IoT\n  skills: [Arduino]\n";
        let dir = Directory::from_yaml_str(yaml, "inline").unwrap();
        assert_eq!(dir.members()[0].domain, "IoT");

        let err = Directory::from_json_str(r#"[{"id": 1, "name": "A", "role": "Boss"}]"#, "inline")
            .unwrap_err();
        assert!(err.to_string().contains("inline"));
    }

    #[test]
    fn facets_include_catalog_and_extras() {
        let dir = Directory::from_members(vec![
            Member::new("1", "A", Role::Chair)
                .with_domain("IoT")
                .with_skills(["React", "Go"]),
            Member::new("2", "B", Role::Member)
                .with_domain("Robotics")
                .with_skills(["React"]),
        ])
        .unwrap();
        let facets = dir.facets();
        assert_eq!(facets.roles.len(), RoleFilter::options().len());
        assert_eq!(facets.roles[0].count, 2);
        let iot = facets.domains.iter().find(|f| f.value == "IoT").unwrap();
        assert_eq!(iot.count, 1);
        assert_eq!(facets.domains.last().unwrap().value, "Robotics");
        let react = facets.skills.iter().find(|f| f.value == "React").unwrap();
        assert_eq!(react.count, 2);
        assert_eq!(facets.skills.last().unwrap().value, "Go");
    }
}
