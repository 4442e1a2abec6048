//! Client-side table state: pagination and sorting mirrored into a URL query.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;
use url::Url;

const PAGE: &str = "page";
const PAGE_SIZE: &str = "pageSize";
const SORT: &str = "sort";
const ORDER: &str = "order";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascend => "ascend",
            SortOrder::Descend => "descend",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ascend" | "asc" => Some(SortOrder::Ascend),
            "descend" | "desc" => Some(SortOrder::Descend),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            sort: None,
            order: None,
        }
    }
}

fn positive(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.parse::<u32>().ok()).filter(|v| *v > 0)
}

impl TableState {
    /// Read state from a URL's query, falling back to defaults per field.
    pub fn from_url(url: &Url) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };

        Self {
            page: positive(get(PAGE).as_deref()).unwrap_or(defaults.page),
            page_size: positive(get(PAGE_SIZE).as_deref()).unwrap_or(defaults.page_size),
            sort: get(SORT).filter(|s| !s.is_empty()),
            order: get(ORDER).as_deref().and_then(SortOrder::parse),
        }
    }

    /// Write state into a URL's query, keeping unrelated parameters.
    pub fn write_to(&self, url: &mut Url) {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| ![PAGE, PAGE_SIZE, SORT, ORDER].contains(&k.as_ref()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(PAGE, &self.page.to_string());
        pairs.append_pair(PAGE_SIZE, &self.page_size.to_string());
        if let Some(sort) = &self.sort {
            pairs.append_pair(SORT, sort);
        }
        if let Some(order) = self.order {
            pairs.append_pair(ORDER, order.as_str());
        }
    }

    pub fn set_page(&mut self, page: u32, page_size: u32) {
        self.page = page.max(1);
        self.page_size = page_size.max(1);
    }

    pub fn set_sort(&mut self, field: Option<String>, order: Option<SortOrder>) {
        self.sort = field;
        self.order = order;
    }

    /// Sort and slice `items` for the current page.
    pub fn paginate<T: Serialize + Clone>(&self, items: &[T]) -> Vec<T> {
        let mut rows: Vec<(Value, &T)> = items
            .iter()
            .map(|item| {
                let key = self
                    .sort
                    .as_ref()
                    .and_then(|field| serde_json::to_value(item).ok()?.get(field).cloned())
                    .unwrap_or(Value::Null);
                (key, item)
            })
            .collect();

        if self.sort.is_some() {
            rows.sort_by(|(a, _), (b, _)| {
                let ord = compare_values(a, b);
                if self.order == Some(SortOrder::Descend) {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        let start = (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize);
        rows.into_iter()
            .skip(start)
            .take(self.page_size as usize)
            .map(|(_, item)| item.clone())
            .collect()
    }
}

/// Nulls first, then numbers, then strings, then everything else as text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}
