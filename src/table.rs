//! In-memory list view used by every back-office listing: global text filter,
//! single-column sort and fixed-size pages over a fully loaded result set.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    response::Meta,
    routes::params::{Pagination, SortOrder},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Bool(bool),
    Int(i64),
    Date(NaiveDate),
    Time(DateTime<Utc>),
    Text(String),
}

impl Cell {
    pub fn text(value: impl ToString) -> Self {
        Cell::Text(value.to_string())
    }

    fn search_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(value) => value.to_string(),
            Cell::Int(value) => value.to_string(),
            Cell::Date(value) => value.format("%d/%m/%Y").to_string(),
            Cell::Time(value) => value.format("%d/%m/%Y %H:%M").to_string(),
            Cell::Text(value) => value.to_lowercase(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Bool(_) => 1,
            Cell::Int(_) => 2,
            Cell::Date(_) => 3,
            Cell::Time(_) => 4,
            Cell::Text(_) => 5,
        }
    }

    /// Empty cells sort first; text compares case-insensitively.
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Date(a), Cell::Date(b)) => a.cmp(b),
            (Cell::Time(a), Cell::Time(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<Option<NaiveDate>> for Cell {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map(Cell::Date).unwrap_or(Cell::Empty)
    }
}

pub struct Column<T> {
    pub key: &'static str,
    pub header: &'static str,
    accessor: fn(&T) -> Cell,
}

impl<T> Column<T> {
    pub fn new(key: &'static str, header: &'static str, accessor: fn(&T) -> Cell) -> Self {
        Self {
            key,
            header,
            accessor,
        }
    }

    pub fn value(&self, row: &T) -> Cell {
        (self.accessor)(row)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct ColumnHeader {
    pub key: String,
    pub header: String,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TableQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-insensitive text matched against every column.
    pub q: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl TableQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TablePage<T> {
    pub columns: Vec<ColumnHeader>,
    pub items: Vec<T>,
}

pub struct DataTable<T> {
    columns: Vec<Column<T>>,
}

impl<T> DataTable<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self { columns }
    }

    pub fn headers(&self) -> Vec<ColumnHeader> {
        self.columns
            .iter()
            .map(|column| ColumnHeader {
                key: column.key.to_string(),
                header: column.header.to_string(),
            })
            .collect()
    }

    fn matches(&self, row: &T, needle: &str) -> bool {
        self.columns
            .iter()
            .any(|column| column.value(row).search_text().contains(needle))
    }

    pub fn apply(&self, rows: Vec<T>, query: &TableQuery) -> AppResult<(TablePage<T>, Meta)> {
        let mut rows = match query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let needle = q.to_lowercase();
                rows.into_iter()
                    .filter(|row| self.matches(row, &needle))
                    .collect()
            }
            None => rows,
        };

        if let Some(sort_by) = query.sort_by.as_deref().filter(|s| !s.is_empty()) {
            let column = self
                .columns
                .iter()
                .find(|column| column.key == sort_by)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown sort column {sort_by}")))?;
            let descending = matches!(query.sort_order, Some(SortOrder::Desc));
            rows.sort_by(|a, b| {
                let ordering = column.value(a).compare(&column.value(b));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let (page, per_page, offset) = query.pagination().normalize();
        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(per_page as usize)
            .collect();

        Ok((
            TablePage {
                columns: self.headers(),
                items,
            },
            Meta::new(page, per_page, total),
        ))
    }
}
