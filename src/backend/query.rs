//! Row-level query description for the table API.
//!
//! A [`Query`] is a table name, a column list (with optional embeds such as
//! `job:jobs(title)`), and a list of filters rendered as URL parameters in the
//! backend's `column=op.value` syntax.

use std::fmt::Display;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: &'static str,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    single: bool,
    matches_nothing: bool,
}

impl Query {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            single: false,
            matches_nothing: false,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        // Embeds are often written over several lines; the API wants them compact.
        self.columns = columns.split_whitespace().collect();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", quote(&value.to_string()))));
        self
    }

    /// `column=in.(a,b,c)`. An empty list matches no rows and is never sent.
    pub fn in_list<I, T>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(|v| quote(&v.to_string()))
            .collect();
        if values.is_empty() {
            self.matches_nothing = true;
        }
        self.filters
            .push((column.to_string(), format!("in.({})", values.join(","))));
        self
    }

    /// Case-insensitive substring match of `term` against any of `columns`, ORed together.
    /// A blank term adds no filter. `%` and `_` in the term match literally.
    pub fn any_ilike(mut self, columns: &[&str], term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() || columns.is_empty() {
            return self;
        }
        let pattern = quote_always(&format!("*{}*", escape_like(term)));
        let clauses: Vec<String> = columns
            .iter()
            .map(|c| format!("{c}.ilike.{pattern}"))
            .collect();
        self.filters
            .push(("or".to_string(), format!("({})", clauses.join(","))));
        self
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order = Some(format!("{column}.{}", order.as_str()));
        self
    }

    /// Expect exactly one row; zero rows surface as not-found.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub(crate) fn many(mut self) -> Self {
        self.single = false;
        self
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    pub fn matches_nothing(&self) -> bool {
        self.matches_nothing
    }

    /// Appends `select`, filters and `order` to a table endpoint URL.
    pub(crate) fn apply_read(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("select", &self.columns);
        for (column, value) in &self.filters {
            pairs.append_pair(column, value);
        }
        if let Some(order) = &self.order {
            pairs.append_pair("order", order);
        }
    }

    /// Appends only the filters, for update and delete.
    pub(crate) fn apply_filters(&self, url: &mut Url) {
        if self.filters.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (column, value) in &self.filters {
            pairs.append_pair(column, value);
        }
    }

    pub(crate) fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }
}

const RESERVED: &[char] = &[',', '.', ':', '(', ')', '"', '\\', ' '];

fn quote(value: &str) -> String {
    if value.is_empty() || value.contains(RESERVED) {
        quote_always(value)
    } else {
        value.to_string()
    }
}

/// `*` is the API's wildcard and cannot be escaped, so it is dropped.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '*' => {}
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn quote_always(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
