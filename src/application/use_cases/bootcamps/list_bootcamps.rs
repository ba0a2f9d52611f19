use crate::application::ports::bootcamp_repository::{
    BootcampRepository, ListBootcampsParams, SortOrder,
};
use crate::domain::bootcamps::Bootcamp;

/// Columns the public list endpoint may sort on.
const SORTABLE: &[&str] = &["name", "created_at", "average_cost", "average_rating"];

pub struct ListBootcamps<'a, R: BootcampRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    /// Comma-separated columns, `-` prefix for descending.
    pub sort: Option<String>,
    pub career: Option<String>,
    pub housing: Option<bool>,
}

#[derive(Debug)]
pub struct Page {
    pub items: Vec<Bootcamp>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn next_page(&self) -> Option<i64> {
        (self.page * self.limit < self.total).then_some(self.page + 1)
    }

    pub fn prev_page(&self) -> Option<i64> {
        (self.page > 1).then_some(self.page - 1)
    }
}

pub fn parse_sort(sort: Option<&str>) -> Vec<(String, SortOrder)> {
    let spec = sort.unwrap_or("-created_at");
    let mut out = Vec::new();
    for field in spec.split(',') {
        let field = field.trim();
        let (name, order) = match field.strip_prefix('-') {
            Some(rest) => (rest, SortOrder::Desc),
            None => (field, SortOrder::Asc),
        };
        if SORTABLE.contains(&name) {
            out.push((name.to_string(), order));
        }
    }
    if out.is_empty() {
        out.push(("created_at".to_string(), SortOrder::Desc));
    }
    out
}

impl<'a, R: BootcampRepository + ?Sized> ListBootcamps<'a, R> {
    pub async fn execute(&self, q: &ListQuery) -> anyhow::Result<Page> {
        let page = q.page.max(1);
        let limit = q.limit.clamp(1, 100);
        let params = ListBootcampsParams {
            sort: parse_sort(q.sort.as_deref()),
            career: q.career.clone(),
            housing: q.housing,
            offset: (page - 1) * limit,
            limit,
        };
        let (items, total) = self.repo.list(&params).await?;
        Ok(Page {
            items,
            total,
            page,
            limit,
        })
    }
}
