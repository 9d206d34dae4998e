//! Filter clause compiler for object searches.
//!
//! Turns an arbitrary subset of the four optional search criteria into a SQL
//! `WHERE` fragment plus the positional parameters it expects. User input is
//! only ever bound, never spliced into the statement text.

/// Optional substring filters. Blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub date: Option<String>,
    pub agent: Option<String>,
    pub classifier: Option<String>,
    pub label: Option<String>,
}

impl SearchCriteria {
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Criteria paired with the column they constrain, in binding order.
    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("objects.date", present(&self.date)),
            ("agents.name", present(&self.agent)),
            ("classified_data.classified_as", present(&self.classifier)),
            ("objects.label", present(&self.label)),
        ]
    }

    /// True when no criterion would constrain the search.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A compiled filter: the condition text (without the `WHERE` keyword) and
/// the values for its `?` placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledFilter {
    pub clause: Option<String>,
    pub params: Vec<String>,
}

impl CompiledFilter {
    /// The clause prefixed with `WHERE`, or an empty string for an unfiltered search.
    pub fn where_sql(&self) -> String {
        match &self.clause {
            Some(clause) => format!("WHERE {clause}"),
            None => String::new(),
        }
    }
}

/// Character used to escape `LIKE` wildcards inside bound values.
pub const LIKE_ESCAPE: char = '\\';

pub fn compile(criteria: &SearchCriteria) -> CompiledFilter {
    let mut conditions = Vec::new();
    let mut params = Vec::new();
    for (column, value) in criteria.fields() {
        if let Some(value) = value {
            conditions.push(format!("{column} LIKE ? ESCAPE '{LIKE_ESCAPE}'"));
            params.push(format!("%{}%", escape_like(value)));
        }
    }
    CompiledFilter {
        clause: (!conditions.is_empty()).then(|| conditions.join(" AND ")),
        params,
    }
}

/// Makes `%`, `_` and the escape character match literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(sql: &str) -> usize {
        sql.matches('?').count()
    }

    #[test]
    fn test_empty_criteria_has_no_clause() {
        let compiled = compile(&SearchCriteria::default());
        assert!(compiled.clause.is_none());
        assert!(compiled.params.is_empty());
        assert_eq!(compiled.where_sql(), "");
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let criteria = SearchCriteria::default().with_date("   ").with_label("");
        assert!(criteria.is_empty());
        let compiled = compile(&criteria);
        assert!(compiled.clause.is_none());
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn test_single_label_filter() {
        let compiled = compile(&SearchCriteria::default().with_label("bowl"));
        assert_eq!(
            compiled.clause.as_deref(),
            Some("objects.label LIKE ? ESCAPE '\\'")
        );
        assert_eq!(compiled.params, vec!["%bowl%".to_string()]);
    }

    #[test]
    fn test_values_are_trimmed() {
        let compiled = compile(&SearchCriteria::default().with_agent("  Copley "));
        assert_eq!(compiled.params, vec!["%Copley%".to_string()]);
    }

    #[test]
    fn test_all_filters_in_field_order() {
        let criteria = SearchCriteria::default()
            .with_label("l")
            .with_classifier("c")
            .with_agent("a")
            .with_date("d");
        let compiled = compile(&criteria);
        let clause = compiled.clause.unwrap();

        assert_eq!(placeholders(&clause), 4);
        assert_eq!(clause.matches(" AND ").count(), 3);
        let date = clause.find("objects.date").unwrap();
        let agent = clause.find("agents.name").unwrap();
        let classifier = clause.find("classified_data.classified_as").unwrap();
        let label = clause.find("objects.label").unwrap();
        assert!(date < agent && agent < classifier && classifier < label);
        assert_eq!(compiled.params, vec!["%d%", "%a%", "%c%", "%l%"]);
    }

    #[test]
    fn test_param_count_matches_present_criteria_for_every_subset() {
        for mask in 0u8..16 {
            let mut criteria = SearchCriteria::default();
            if mask & 1 != 0 {
                criteria = criteria.with_date("1900");
            }
            if mask & 2 != 0 {
                criteria = criteria.with_agent("Smith");
            }
            if mask & 4 != 0 {
                criteria = criteria.with_classifier("bowls");
            }
            if mask & 8 != 0 {
                criteria = criteria.with_label("blue");
            }
            let compiled = compile(&criteria);
            let expected = mask.count_ones() as usize;
            assert_eq!(compiled.params.len(), expected, "mask {mask:04b}");
            let clause = compiled.clause.unwrap_or_default();
            assert_eq!(placeholders(&clause), expected, "mask {mask:04b}");
        }
    }

    #[test]
    fn test_input_never_reaches_sql_text() {
        let hostile = "x' OR 1=1 --";
        let compiled = compile(&SearchCriteria::default().with_label(hostile));
        assert!(!compiled.clause.unwrap().contains(hostile));
        assert_eq!(compiled.params[0], format!("%{hostile}%"));
    }

    #[test]
    fn test_wildcards_are_escaped() {
        let compiled = compile(&SearchCriteria::default().with_date("50%_off\\"));
        assert_eq!(compiled.params[0], "%50\\%\\_off\\\\%");
    }
}
