//! Query builder for the REST interface
//!
//! Produces the query-string pairs PostgREST understands:
//! `select=`, `column=op.value` filters, `or=(..)` groups,
//! `order=column.asc|desc`, `limit=`.

/// Row selection for one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns (and embedded relations) to return; defaults to `*`
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    fn filter(mut self, column: &str, op: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("{}.{}", op, value)));
        self
    }

    pub fn eq(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn gte(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lte(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filter(column, "lte", value)
    }

    /// Membership filter; values are double-quoted so commas survive
    pub fn in_list<S: AsRef<str>>(self, column: &str, values: &[S]) -> Self {
        let quoted: Vec<String> = values
            .iter()
            .map(|v| format!("\"{}\"", v.as_ref().replace('"', "\\\"")))
            .collect();
        self.filter(column, "in", format!("({})", quoted.join(",")))
    }

    /// Rows matching any of the raw `column.op.value` conditions
    pub fn or(mut self, conditions: &[&str]) -> Self {
        self.filters
            .push(("or".to_string(), format!("({})", conditions.join(","))));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{}.{}", column, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in a stable order
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            self.select.clone().unwrap_or_else(|| "*".to_string()),
        )];
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}
