use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

use super::store::Page;

pub const DEFAULT_OFFSET: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 100;

/// How the order list is materialized.
///
/// | strategy | statements | paging |
/// | --- | --- | --- |
/// | `naive`, `naive-dto` | 1 + N × associations | SQL |
/// | `eager-toone`, `toone-join`, `toone-join-paged` | 1 + batches | SQL |
/// | `collection-join` | 1 | in memory |
/// | `dto-projection` | 1 + N | SQL |
/// | `dto-projection-optimized` | 1 + 1 | SQL |
/// | `flat` | 1 | in memory |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Walks the graph association by association; returns entities.
    Naive,
    /// Same walk, mapped to DTOs.
    NaiveDto,
    /// To-one join with batched order lines, paged by default.
    EagerToOne,
    /// To-one join with batched order lines, unpaged unless asked.
    ToOneJoin,
    #[default]
    ToOneJoinPaged,
    /// Order lines joined into the root query, duplicates collapsed.
    CollectionJoin,
    /// Root DTO query, then one line query per order.
    DtoProjection,
    /// Root DTO query, then one line query for the whole result.
    DtoProjectionOptimized,
    /// Everything joined into flat rows, regrouped in memory.
    Flat,
}

impl Strategy {
    pub const ALL: [Strategy; 9] = [
        Strategy::Naive,
        Strategy::NaiveDto,
        Strategy::EagerToOne,
        Strategy::ToOneJoin,
        Strategy::ToOneJoinPaged,
        Strategy::CollectionJoin,
        Strategy::DtoProjection,
        Strategy::DtoProjectionOptimized,
        Strategy::Flat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::NaiveDto => "naive-dto",
            Strategy::EagerToOne => "eager-toone",
            Strategy::ToOneJoin => "toone-join",
            Strategy::ToOneJoinPaged => "toone-join-paged",
            Strategy::CollectionJoin => "collection-join",
            Strategy::DtoProjection => "dto-projection",
            Strategy::DtoProjectionOptimized => "dto-projection-optimized",
            Strategy::Flat => "flat",
        }
    }

    /// Whether offset/limit can be pushed into the root SQL query. When it
    /// cannot, the whole result is loaded and the page is cut in memory.
    pub fn pages_in_sql(&self) -> bool {
        !matches!(self, Strategy::CollectionJoin | Strategy::Flat)
    }

    /// Builds the page for a request. Paged strategies fall back to the
    /// default window; the others are unpaged unless a bound is given.
    pub fn resolve_page(
        &self,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Option<Page>, DomainError> {
        let paged_by_default = matches!(self, Strategy::EagerToOne | Strategy::ToOneJoinPaged);
        if !paged_by_default && offset.is_none() && limit.is_none() {
            return Ok(None);
        }
        let default_offset = if paged_by_default { DEFAULT_OFFSET } else { 0 };
        Page::new(
            offset.unwrap_or(default_offset),
            limit.unwrap_or(DEFAULT_LIMIT),
        )
        .map(Some)
    }

    /// Paging over a large root set needs the to-one join with batched
    /// lines. A small, bounded result can come back in a single flat query.
    pub fn recommend(paginated: bool, bounded: bool) -> Strategy {
        if paginated {
            Strategy::ToOneJoinPaged
        } else if bounded {
            Strategy::Flat
        } else {
            Strategy::ToOneJoin
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown strategy '{s}'")))
    }
}

/// Strategies for the order list without its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimpleStrategy {
    /// Member and delivery resolved per order: 1 + 2N statements.
    Naive,
    /// Member and delivery entities joined into the root query, mapped in
    /// memory: 1 statement.
    #[default]
    ToOneJoin,
    /// Only the output columns selected straight into the DTO: 1 statement.
    DtoProjection,
}

impl SimpleStrategy {
    pub const ALL: [SimpleStrategy; 3] = [
        SimpleStrategy::Naive,
        SimpleStrategy::ToOneJoin,
        SimpleStrategy::DtoProjection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimpleStrategy::Naive => "naive",
            SimpleStrategy::ToOneJoin => "toone-join",
            SimpleStrategy::DtoProjection => "dto-projection",
        }
    }
}

impl fmt::Display for SimpleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimpleStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimpleStrategy::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown strategy '{s}'")))
    }
}
