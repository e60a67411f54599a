// List query parameters.

/// Entity-specific filter fields appended to a list request.
///
/// Implementations must skip undefined fields entirely; a parameter is never
/// sent with an empty value.
pub trait QueryParams {
    fn append_to(&self, params: &mut Vec<(&'static str, String)>);
}

impl QueryParams for () {
    fn append_to(&self, _params: &mut Vec<(&'static str, String)>) {}
}

/// Optional pagination plus an optional entity filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F = ()> {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub filter: Option<F>,
}

impl<F> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            limit: None,
            page: None,
            filter: None,
        }
    }
}

impl<F> ListQuery<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paged(limit: u32, page: u32) -> Self {
        Self {
            limit: Some(limit),
            page: Some(page),
            filter: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    pub fn with_filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl<F: QueryParams> ListQuery<F> {
    /// Query pairs in wire order: `limit`, `page`, then the filter fields.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(filter) = &self.filter {
            filter.append_to(&mut params);
        }
        params
    }
}

/// Push `value` under `name` unless it is absent or empty.
pub(crate) fn push_defined(
    params: &mut Vec<(&'static str, String)>,
    name: &'static str,
    value: Option<&str>,
) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.push((name, value.to_owned()));
    }
}
