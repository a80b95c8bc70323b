//! Sorting and paging requests and the page result shape.

use crate::error::AppError;
use crate::model::EntityDef;
use serde::Serialize;

pub const MAX_PAGE_SIZE: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One ORDER BY term; `column` is always a known column name of the entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub direction: Direction,
}

/// Ordered sort terms. Stores append an `id` tiebreak, so an empty sort means `id` ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sort {
    pub orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Sort::default()
    }

    /// Parse repeated `sort` parameters of the form `field[,field...][,asc|desc]`.
    pub fn parse(def: &EntityDef, raw: &[String]) -> Result<Sort, AppError> {
        let mut orders = Vec::new();
        for param in raw {
            let mut parts: Vec<&str> = param.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
            let direction = match parts.last().map(|p| p.to_ascii_lowercase()) {
                Some(d) if d == "desc" => {
                    parts.pop();
                    Direction::Desc
                }
                Some(d) if d == "asc" => {
                    parts.pop();
                    Direction::Asc
                }
                _ => Direction::Asc,
            };
            for field in parts {
                let column = def
                    .sort_column(field)
                    .ok_or_else(|| AppError::InvalidFilter(format!("unknown sort property '{}'", field)))?;
                orders.push(Order { column, direction });
            }
        }
        Ok(Sort { orders })
    }
}

/// LIMIT/OFFSET slice handed to the stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub limit: u64,
    pub offset: u64,
}

/// Zero-based page request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pageable {
    pub page: u64,
    pub size: u64,
    pub sort: Sort,
}

impl Pageable {
    /// `size` is clamped to 1..=[`MAX_PAGE_SIZE`]; `page` is capped so the row offset fits a BIGINT.
    pub fn new(page: u64, size: u64, sort: Sort) -> Self {
        let size = size.clamp(1, MAX_PAGE_SIZE);
        Pageable {
            page: page.min(i64::MAX as u64 / size),
            size,
            sort,
        }
    }

    pub fn window(&self) -> Window {
        Window {
            limit: self.size,
            offset: self.page.saturating_mul(self.size),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: &Pageable, total: u64) -> Self {
        Page {
            content,
            number: pageable.page,
            size: pageable.size,
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(self.size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::EMPLOYEE;

    #[test]
    fn parses_field_and_direction() {
        let sort = Sort::parse(&EMPLOYEE, &["lastName,desc".into(), "id".into()]).unwrap();
        assert_eq!(
            sort.orders,
            vec![
                Order { column: "last_name", direction: Direction::Desc },
                Order { column: "id", direction: Direction::Asc },
            ]
        );
    }

    #[test]
    fn reference_fields_sort_by_foreign_key() {
        let sort = Sort::parse(&EMPLOYEE, &["department,asc".into()]).unwrap();
        assert_eq!(sort.orders[0].column, "department_id");
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        assert!(Sort::parse(&EMPLOYEE, &["password,asc".into()]).is_err());
    }

    #[test]
    fn window_and_total_pages() {
        let p = Pageable::new(2, 20, Sort::unsorted());
        assert_eq!(p.window(), Window { limit: 20, offset: 40 });
        let page = Page::new(vec![1, 2, 3], &p, 41);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(Pageable::new(0, 50_000, Sort::unsorted()).size, MAX_PAGE_SIZE);
    }

    #[test]
    fn huge_page_keeps_offset_within_bigint() {
        let p = Pageable::new(u64::MAX, 20, Sort::unsorted());
        assert!(p.window().offset <= i64::MAX as u64);
        assert_eq!(p.page, i64::MAX as u64 / 20);
        let p = Pageable::new(10_u64.pow(16), 1000, Sort::unsorted());
        assert!(p.window().offset <= i64::MAX as u64);
    }
}
