use std::fmt;

use serde::{Deserialize, Serialize};

/// Datasets carry ids as JSON numbers or strings; both are held as text so
/// `42` and `"42"` match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawMemberId", into = "String")]
pub struct MemberId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMemberId {
    Number(serde_json::Number),
    Text(String),
}

// Integral floats print without a fraction: `1.0` becomes "1".
fn number_text(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

impl From<RawMemberId> for MemberId {
    fn from(raw: RawMemberId) -> Self {
        match raw {
            RawMemberId::Number(n) => MemberId(number_text(&n)),
            RawMemberId::Text(s) => MemberId(s.trim().to_string()),
        }
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

impl MemberId {
    pub fn new(value: impl Into<String>) -> Self {
        MemberId(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Chair,
    #[serde(rename = "Vice Chair")]
    ViceChair,
    Secretary,
    Member,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Chair, Role::ViceChair, Role::Secretary, Role::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Chair => "Chair",
            Role::ViceChair => "Vice Chair",
            Role::Secretary => "Secretary",
            Role::Member => "Member",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role selector for queries. `All` is a filter-only sentinel and never
/// appears on a member record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub const ALL_LABEL: &'static str = "All";

    pub fn parse(value: &str) -> Option<Self> {
        if value == Self::ALL_LABEL {
            return Some(RoleFilter::All);
        }
        Role::parse(value).map(RoleFilter::Only)
    }

    pub fn accepts(&self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(r) => *r == role,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoleFilter::All => Self::ALL_LABEL,
            RoleFilter::Only(r) => r.as_str(),
        }
    }

    pub fn options() -> Vec<RoleFilter> {
        std::iter::once(RoleFilter::All)
            .chain(Role::ALL.into_iter().map(RoleFilter::Only))
            .collect()
    }
}

impl Serialize for RoleFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, alias = "dateOfBirth")]
    pub dob: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Member {
            id: MemberId::new(id),
            name: name.into(),
            role,
            domain: String::new(),
            skills: Vec::new(),
            email: String::new(),
            phone: String::new(),
            dob: String::new(),
            address: String::new(),
            gender: String::new(),
            image: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_exact() {
        assert_eq!(Role::parse("Vice Chair"), Some(Role::ViceChair));
        assert_eq!(Role::parse("vice chair"), None);
        assert_eq!(Role::parse("All"), None);
    }

    #[test]
    fn role_filter_parses_sentinel() {
        assert_eq!(RoleFilter::parse("All"), Some(RoleFilter::All));
        assert_eq!(
            RoleFilter::parse("Secretary"),
            Some(RoleFilter::Only(Role::Secretary))
        );
        assert!(RoleFilter::All.accepts(Role::Member));
        assert!(!RoleFilter::Only(Role::Chair).accepts(Role::Member));
        assert_eq!(RoleFilter::options().len(), 5);
    }

    #[test]
    fn member_id_accepts_numbers_and_strings() {
        let m: Member =
            serde_json::from_str(r#"{"id": 42, "name": "Asha", "role": "Chair"}"#).unwrap();
        assert_eq!(m.id, MemberId::new("42"));
        let m: Member =
            serde_json::from_str(r#"{"id": " 42 ", "name": "Asha", "role": "Vice Chair"}"#)
                .unwrap();
        assert_eq!(m.id.as_str(), "42");
        assert_eq!(m.role, Role::ViceChair);
    }

    #[test]
    fn member_id_accepts_negative_and_float_numbers() {
        let ids: Vec<String> = [r#"-1"#, r#"1.0"#, r#"2.5"#, r#"18446744073709551615"#]
            .iter()
            .map(|raw| {
                let json = format!(r#"{{"id": {raw}, "name": "A", "role": "Member"}}"#);
                serde_json::from_str::<Member>(&json).unwrap().id.to_string()
            })
            .collect();
        assert_eq!(ids, vec!["-1", "1", "2.5", "18446744073709551615"]);

        let yaml = "id: -7\nname: B\nrole: Member\n";
        assert_eq!(serde_yaml::from_str::<Member>(yaml).unwrap().id.as_str(), "-7");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let res = serde_json::from_str::<Member>(r#"{"id": 1, "name": "A", "role": "All"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn member_serializes_id_as_string() {
        let m = Member::new("7", "Ravi Kumar", Role::Member);
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["id"], "7");
        assert_eq!(v["role"], "Member");
        assert_eq!(m.first_name(), "Ravi");
    }
}
