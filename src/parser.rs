use crate::ir::{Date, Gender, Member, Provenance, Relationship, RelationshipKind, RelationshipType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(-?\d{1,4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?(?:[T\s].*)?\s*$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum MemberParseError {
    #[error("invalid member data: {0}")]
    Syntax(#[from] json5::Error),
    #[error("member #{index} has an empty id")]
    EmptyId { index: usize },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipRecord {
    target_member_id: String,
    #[serde(rename = "type")]
    relation: String,
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberRecord {
    id: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    death_date: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    relationships: Vec<RelationshipRecord>,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

/// Parses `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and timestamps starting with one of those.
pub fn parse_date(input: &str) -> Option<Date> {
    let caps = DATE_RE.captures(input)?;
    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let month = match caps.get(2) {
        Some(m) => Some(m.as_str().parse::<u8>().ok().filter(|v| (1..=12).contains(v))?),
        None => None,
    };
    let day = match caps.get(3) {
        Some(d) => Some(d.as_str().parse::<u8>().ok().filter(|v| (1..=31).contains(v))?),
        None => None,
    };
    Some(Date::new(year, month, day))
}

fn lenient_date(member_id: &str, field: &str, raw: Option<String>) -> Option<Date> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_date(&raw);
    if parsed.is_none() {
        tracing::warn!(member = member_id, field, value = %raw, "ignoring unparseable date");
    }
    parsed
}

fn convert_relationship(member_id: &str, record: RelationshipRecord) -> Option<Relationship> {
    let Some(relation) = RelationshipType::from_token(&record.relation) else {
        tracing::warn!(member = member_id, relation = %record.relation, "dropping unknown relationship type");
        return None;
    };
    let kind = record.kind.as_deref().and_then(|raw| {
        let kind = RelationshipKind::from_token(raw);
        if kind.is_none() && !raw.trim().is_empty() {
            tracing::warn!(member = member_id, kind = raw, "ignoring unknown relationship kind");
        }
        kind
    });
    Some(Relationship {
        target: record.target_member_id,
        relation,
        kind,
    })
}

fn convert_member(record: MemberRecord) -> Member {
    let id = record.id;
    let relationships = record
        .relationships
        .into_iter()
        .filter_map(|edge| convert_relationship(&id, edge))
        .collect();
    let gender = record.gender.as_deref().and_then(Gender::from_token);
    let birth_date = lenient_date(&id, "birthDate", record.birth_date);
    let death_date = lenient_date(&id, "deathDate", record.death_date);
    Member {
        first_name: record.first_name,
        last_name: record.last_name,
        nickname: record.nickname,
        gender,
        birth_date,
        death_date,
        bio: record.bio,
        relationships,
        provenance: Provenance {
            created_by: record.created_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        },
        id,
    }
}

/// Parses a JSON (or JSON5) array of member records.
pub fn parse_members(input: &str) -> Result<Vec<Member>, MemberParseError> {
    let records: Vec<MemberRecord> = json5::from_str(input)?;
    let mut seen = HashSet::new();
    let mut members = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if record.id.trim().is_empty() {
            return Err(MemberParseError::EmptyId { index });
        }
        if !seen.insert(record.id.clone()) {
            tracing::warn!(member = %record.id, "duplicate member id, later record is unreachable by id");
        }
        members.push(convert_member(record));
    }
    tracing::debug!(count = members.len(), "members parsed");
    Ok(members)
}
