use crate::shared::response::JsonApiLinks;
use axum::http::Uri;
use serde::Deserialize;
use utoipa::ToSchema;

pub const MIN_PAGE_SIZE: i64 = 5;
pub const MAX_PAGE_SIZE: i64 = 100;

pub fn default_page_number() -> i64 {
    1
}

pub fn default_page_size() -> i64 {
    20
}

/// `page[number]` / `page[size]` query parameters
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct PageParams {
    #[serde(default = "default_page_number")]
    pub number: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            number: default_page_number(),
            size: default_page_size(),
        }
    }
}

impl PageParams {
    /// Page number is at least 1; page size is clamped to `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`.
    pub fn clamped(self) -> Self {
        Self {
            number: self.number.max(1),
            size: self.size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }
}

/// Pagination link builder that generates JSON:API compliant pagination links
pub struct PaginationLinkBuilder {
    base_url: String,
    filters: Vec<(String, String)>,
    page_number: i64,
    page_size: i64,
    total_pages: i64,
}

impl PaginationLinkBuilder {
    /// Create a new pagination link builder from a URI
    /// Automatically extracts the path from the URI
    pub fn from_uri(uri: &Uri, page_number: i64, page_size: i64, total: i64) -> Self {
        Self::new(uri.path(), page_number, page_size, total)
    }

    pub fn new(base_url: impl Into<String>, page_number: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if total > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };

        Self {
            base_url: base_url.into(),
            filters: Vec::new(),
            page_number,
            page_size,
            total_pages,
        }
    }

    /// Carry a `filter[key]=value` pair into every generated link.
    pub fn with_filter(mut self, key: &str, value: impl ToString) -> Self {
        self.filters.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> JsonApiLinks {
        let mut links = JsonApiLinks::new()
            .with_self(self.page_link(self.page_number))
            .with_first(self.page_link(1));

        if self.total_pages > 0 {
            links = links.with_last(self.page_link(self.total_pages));
        }

        if self.page_number > 1 {
            links = links.with_prev(self.page_link(self.page_number - 1));
        }

        if self.page_number < self.total_pages {
            links = links.with_next(self.page_link(self.page_number + 1));
        }

        links
    }

    fn page_link(&self, page: i64) -> String {
        let mut link = format!(
            "{}?page[number]={}&page[size]={}",
            self.base_url, page, self.page_size
        );
        for (key, value) in &self.filters {
            link.push_str(&format!("&filter[{}]={}", key, encode_component(value)));
        }
        link
    }
}

fn encode_component(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}
