//! List query construction
//!
//! A `DogQuery` is backend-neutral: filters, ascending `id` order and an
//! optional offset window. Stores render it into PostgREST parameters or SQL,
//! `MemoryStore` evaluates it directly with `DogQuery::apply`.

use crate::models::Dog;

/// Records per page
pub const PAGE_SIZE: u64 = 20;

/// 1-indexed page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(u64);

impl Page {
    /// Create a page, clamping anything below 1 to 1.
    pub fn new(page: i64) -> Self {
        Self(page.max(1) as u64)
    }

    pub fn number(&self) -> u64 {
        self.0
    }

    /// Offset window for this page.
    pub fn window(&self) -> Window {
        Window {
            offset: (self.0 - 1).saturating_mul(PAGE_SIZE),
            limit: PAGE_SIZE,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self(1)
    }
}

/// OFFSET/LIMIT pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Window {
    /// Offset as a signed 64-bit value, saturating at `i64::MAX`.
    ///
    /// Both SQL `OFFSET` and PostgREST's `offset` parameter reject anything
    /// larger.
    pub fn offset_i64(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    pub fn limit_i64(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }
}

/// Row filters for a list request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DogFilter {
    /// Empty means no breed restriction
    pub breeds: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl DogFilter {
    /// Evaluate the filter the way the database does: a null column never
    /// satisfies a comparison.
    pub fn matches(&self, dog: &Dog) -> bool {
        if !self.breeds.is_empty() {
            match &dog.breed {
                Some(breed) if self.breeds.iter().any(|b| b == breed) => {}
                _ => return false,
            }
        }
        if let Some(min) = self.min_price {
            match dog.price {
                Some(price) if price >= min => {}
                _ => return false,
            }
        }
        if let Some(max) = self.max_price {
            match dog.price {
                Some(price) if price <= max => {}
                _ => return false,
            }
        }
        true
    }
}

/// Retrieval request: all columns, filtered, ordered by `id` ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DogQuery {
    pub filter: DogFilter,
    /// `None` fetches every matching row
    pub window: Option<Window>,
}

impl DogQuery {
    /// Every record, no filter, no window.
    pub fn all() -> Self {
        Self::default()
    }

    /// One page of filtered records.
    pub fn page(page: Page, filter: DogFilter) -> Self {
        Self {
            filter,
            window: Some(page.window()),
        }
    }

    /// Evaluate against an in-memory record set.
    pub fn apply<'a, I>(&self, dogs: I) -> Vec<Dog>
    where
        I: IntoIterator<Item = &'a Dog>,
    {
        let mut matched: Vec<&Dog> = dogs.into_iter().filter(|d| self.filter.matches(d)).collect();
        matched.sort_by_key(|d| d.id);

        let (offset, limit) = match self.window {
            Some(w) => (
                usize::try_from(w.offset).unwrap_or(usize::MAX),
                usize::try_from(w.limit).unwrap_or(usize::MAX),
            ),
            None => (0, usize::MAX),
        };

        matched.into_iter().skip(offset).take(limit).cloned().collect()
    }
}

/// Parsed `GET /dogs` parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DogListParams {
    pub page: Page,
    pub filter: DogFilter,
}

impl DogListParams {
    /// Build from raw query-string pairs.
    ///
    /// `breed` may repeat. Values that fail numeric coercion are treated as
    /// absent, unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "page" => match value.trim().parse::<i64>() {
                    Ok(page) => params.page = Page::new(page),
                    Err(_) => tracing::debug!(value, "ignoring non-numeric page"),
                },
                "breed" => params.filter.breeds.push(value.to_owned()),
                "min_price" => params.filter.min_price = parse_price("min_price", value),
                "max_price" => params.filter.max_price = parse_price("max_price", value),
                _ => {}
            }
        }

        params
    }

    pub fn into_query(self) -> DogQuery {
        DogQuery::page(self.page, self.filter)
    }
}

fn parse_price(field: &str, value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(price) if price.is_finite() => Some(price),
        _ => {
            tracing::debug!(field, value, "ignoring non-numeric price bound");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DogId;

    fn dog(id: i64, breed: Option<&str>, price: Option<f64>) -> Dog {
        Dog {
            id: DogId::new(id),
            name: Some(format!("dog-{}", id)),
            image: None,
            breed: breed.map(str::to_owned),
            price,
        }
    }

    #[test]
    fn offset_calculation() {
        assert_eq!(Page::new(1).window(), Window { offset: 0, limit: 20 });
        assert_eq!(Page::new(2).window(), Window { offset: 20, limit: 20 });
        assert_eq!(Page::new(3).window(), Window { offset: 40, limit: 20 });
    }

    #[test]
    fn clamps_page() {
        assert_eq!(Page::new(0).number(), 1);
        assert_eq!(Page::new(-4).number(), 1);
    }

    #[test]
    fn huge_page_saturates() {
        let w = Page::new(i64::MAX).window();
        assert_eq!(w.offset, u64::MAX);
        assert_eq!(w.offset_i64(), i64::MAX);
        assert_eq!(w.limit_i64(), 20);
    }

    #[test]
    fn params_from_pairs() {
        let params = DogListParams::from_pairs([
            ("page", "2"),
            ("breed", "Lab"),
            ("breed", "Poodle"),
            ("min_price", "50"),
            ("max_price", "150.5"),
            ("sort", "name"),
        ]);
        assert_eq!(params.page.number(), 2);
        assert_eq!(params.filter.breeds, vec!["Lab", "Poodle"]);
        assert_eq!(params.filter.min_price, Some(50.0));
        assert_eq!(params.filter.max_price, Some(150.5));
    }

    #[test]
    fn bad_numbers_fall_back() {
        let params = DogListParams::from_pairs([
            ("page", "two"),
            ("min_price", "cheap"),
            ("max_price", "NaN"),
        ]);
        assert_eq!(params.page, Page::default());
        assert_eq!(params.filter, DogFilter::default());
    }

    #[test]
    fn filter_skips_nulls() {
        let filter = DogFilter {
            breeds: vec![],
            min_price: Some(0.0),
            max_price: None,
        };
        assert!(!filter.matches(&dog(1, Some("Lab"), None)));

        let filter = DogFilter {
            breeds: vec!["Lab".into()],
            ..Default::default()
        };
        assert!(!filter.matches(&dog(1, None, Some(1.0))));
        assert!(filter.matches(&dog(1, Some("Lab"), None)));
    }

    #[test]
    fn apply_orders_and_windows() {
        let dogs: Vec<Dog> = (1..=45).rev().map(|i| dog(i, Some("Lab"), Some(i as f64))).collect();
        let page = DogQuery::page(Page::new(3), DogFilter::default()).apply(&dogs);

        let ids: Vec<i64> = page.iter().map(|d| d.id.get()).collect();
        assert_eq!(ids, (41..=45).collect::<Vec<_>>());
    }

    #[test]
    fn inverted_bounds_match_nothing() {
        let dogs = vec![dog(1, Some("Lab"), Some(100.0))];
        let query = DogQuery::page(
            Page::default(),
            DogFilter {
                breeds: vec![],
                min_price: Some(200.0),
                max_price: Some(50.0),
            },
        );
        assert!(query.apply(&dogs).is_empty());
    }

    #[test]
    fn all_has_no_window() {
        let dogs: Vec<Dog> = (1..=30).map(|i| dog(i, None, None)).collect();
        assert_eq!(DogQuery::all().apply(&dogs).len(), 30);
    }
}
