use std::collections::HashMap;

/// Position within a paginated listing.
///
/// Cursors are immutable; [`Cursor::next`] returns a new value pointing at
/// the following page with the same page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub page: u32,
    pub per_page: u32,
}

impl Cursor {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            per_page: self.per_page,
        }
    }
}

/// A cursor merged with caller parameters into one query-parameter map.
///
/// The pagination keys are inserted first and a caller-supplied `page` or
/// `per_page` never displaces them. Header merging uses the opposite
/// precedence; the two rules are independent.
#[derive(Debug, Clone)]
pub(crate) struct Paged {
    parameters: HashMap<String, String>,
}

impl Paged {
    pub(crate) fn new(cursor: Cursor, parameters: HashMap<String, String>) -> Self {
        let mut merged = HashMap::from([
            ("page".to_owned(), cursor.page.to_string()),
            ("per_page".to_owned(), cursor.per_page.to_string()),
        ]);

        for (key, value) in parameters {
            merged.entry(key).or_insert(value);
        }

        Self { parameters: merged }
    }

    pub(crate) fn query_items(&self) -> Vec<(String, String)> {
        self.parameters
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub(crate) fn into_parameters(self) -> HashMap<String, String> {
        self.parameters
    }
}
