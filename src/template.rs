//! Placeholder templates for output lines and list names
//!
//! `{address}\t{name}` renders an address followed by a tab and its name.
//! `{{` and `}}` produce literal braces.

use crate::error::TemplateError;
use crate::types::AddressData;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::str::FromStr;

/// Values a template can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Address,
    Name,
    NormalizedName,
    Class,
    Count,
    LastSeen,
    FrequencyRank,
    RecencyRank,
    TotalRank,
    ListName,
    ListId,
}

impl FromStr for Field {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "address" => Self::Address,
            "name" => Self::Name,
            "normalized_name" => Self::NormalizedName,
            "class" => Self::Class,
            "count" => Self::Count,
            "last_seen" => Self::LastSeen,
            "frequency_rank" => Self::FrequencyRank,
            "recency_rank" => Self::RecencyRank,
            "total_rank" => Self::TotalRank,
            "list_name" => Self::ListName,
            "list_id" => Self::ListId,
            other => return Err(TemplateError::UnknownField(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(pos) = rest.find(['{', '}']) {
            literal.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if tail.starts_with("{{") || tail.starts_with("}}") {
                literal.push_str(&tail[..1]);
                rest = &tail[2..];
                offset += pos + 2;
                continue;
            }
            if tail.starts_with('}') {
                literal.push('}');
                rest = &tail[1..];
                offset += pos + 1;
                continue;
            }

            let close = tail
                .find('}')
                .ok_or(TemplateError::Unterminated(offset + pos))?;
            let field: Field = tail[1..close].parse()?;
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(field));
            rest = &tail[close + 1..];
            offset += pos + close + 1;
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Same template with a trailing newline, as output lines need one
    pub fn line(source: &str) -> Result<Self, TemplateError> {
        if source.ends_with('\n') {
            Self::parse(source)
        } else {
            Self::parse(&format!("{source}\n"))
        }
    }

    #[must_use]
    pub fn render(&self, data: &AddressData) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => render_field(&mut out, *field, data),
            }
        }
        out
    }
}

fn render_field(out: &mut String, field: Field, data: &AddressData) {
    let ranks = data.ranks.unwrap_or_default();
    // Writing to a String cannot fail
    let _ = match field {
        Field::Address => write!(out, "{}", data.address),
        Field::Name => write!(out, "{}", data.name),
        Field::NormalizedName => write!(out, "{}", data.normalized_name),
        Field::Class => write!(out, "{}", data.class),
        Field::Count => write!(out, "{}", data.count()),
        Field::LastSeen => match DateTime::<Utc>::from_timestamp(data.last_seen(), 0) {
            Some(date) if data.last_seen() > 0 => write!(out, "{}", date.to_rfc3339()),
            _ => Ok(()),
        },
        Field::FrequencyRank => write!(out, "{}", ranks.frequency),
        Field::RecencyRank => write!(out, "{}", ranks.recency),
        Field::TotalRank => write!(out, "{}", ranks.total),
        Field::ListName => write!(
            out,
            "{}",
            data.list.as_ref().map_or("", |list| list.name.as_str())
        ),
        Field::ListId => write!(
            out,
            "{}",
            data.list.as_ref().map_or("", |list| list.id.as_str())
        ),
    };
}
