//! Lookup query and the search parameters derived from it.

use serde::Serialize;

/// A person lookup as received from a caller.
///
/// Fields are stored trimmed; blank `city`/`state` collapse to `None`.
/// A blank `name` is representable so the lookup pipeline can reject it
/// explicitly instead of failing at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    name: String,
    city: Option<String>,
    state: Option<String>,
}

/// The parameters actually sent to the search site, echoed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedQuery {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citystatezip: Option<String>,
}

impl Query {
    #[must_use]
    pub fn new(name: &str, city: Option<&str>, state: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            city: non_blank(city),
            state: non_blank(state),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// `"City, State"` when both are known, `"State"` when only the state is,
    /// otherwise `None`. A city without a state is not searchable on its own.
    #[must_use]
    pub fn search_location(&self) -> Option<String> {
        match (self.city(), self.state()) {
            (Some(city), Some(state)) => Some(format!("{city}, {state}")),
            (None, Some(state)) => Some(state.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn resolved(&self) -> ResolvedQuery {
        ResolvedQuery {
            name: self.name.clone(),
            citystatezip: self.search_location(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_location_combines_city_and_state() {
        let query = Query::new("Jane Doe", Some("Austin"), Some("TX"));
        assert_eq!(query.search_location().as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn search_location_uses_state_alone() {
        let query = Query::new("Jane Doe", None, Some("TX"));
        assert_eq!(query.search_location().as_deref(), Some("TX"));
    }

    #[test]
    fn search_location_ignores_city_without_state() {
        let query = Query::new("Jane Doe", Some("Austin"), None);
        assert_eq!(query.search_location(), None);
    }

    #[test]
    fn fields_are_trimmed_and_blanks_dropped() {
        let query = Query::new("  Jane Doe ", Some("   "), Some(" TX "));
        assert_eq!(query.name(), "Jane Doe");
        assert_eq!(query.city(), None);
        assert_eq!(query.state(), Some("TX"));
        assert_eq!(query.search_location().as_deref(), Some("TX"));
    }

    #[test]
    fn whitespace_name_is_not_a_name() {
        assert!(!Query::new("   ", Some("Austin"), Some("TX")).has_name());
        assert!(!Query::default().has_name());
        assert!(Query::new("J", None, None).has_name());
    }

    #[test]
    fn resolved_query_omits_missing_location() {
        let json = serde_json::to_value(Query::new("Jane Doe", None, None).resolved())
            .expect("serialize");
        assert_eq!(json, serde_json::json!({ "name": "Jane Doe" }));

        let query = Query::new("Jane Doe", Some("Austin"), Some("TX"));
        let json = serde_json::to_value(query.resolved()).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "name": "Jane Doe", "citystatezip": "Austin, TX" })
        );
    }
}
