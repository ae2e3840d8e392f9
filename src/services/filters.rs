//! Search, genre, date-range and sort criteria for the book listing.

use serde::{Deserialize, Serialize};

use crate::gateway::{FilterOp, Predicate, SortKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Title,
    PublicationDate,
    DateCreated,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::PublicationDate => "publication_date",
            Self::DateCreated => "date_created",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Listing criteria. Empty strings mean "unset" and produce no clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub genre: String,
    pub date_from: String,
    pub date_to: String,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

/// Partial update applied by [`FilterBuilder::merge`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterUpdate {
    pub search: Option<String>,
    pub genre: Option<String>,
    #[serde(alias = "dateFrom")]
    pub date_from: Option<String>,
    #[serde(alias = "dateTo")]
    pub date_to: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<SortField>,
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<SortOrder>,
}

/// Predicate and sort compiled from a [`FilterState`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub predicate: Predicate,
    pub sort: SortKey,
}

#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    state: FilterState,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = FilterState::default();
    }

    pub fn merge(&mut self, update: FilterUpdate) {
        let FilterUpdate {
            search,
            genre,
            date_from,
            date_to,
            sort_by,
            sort_order,
        } = update;
        if let Some(v) = search {
            self.state.search = v;
        }
        if let Some(v) = genre {
            self.state.genre = v;
        }
        if let Some(v) = date_from {
            self.state.date_from = v;
        }
        if let Some(v) = date_to {
            self.state.date_to = v;
        }
        if let Some(v) = sort_by {
            self.state.sort_by = v;
        }
        if let Some(v) = sort_order {
            self.state.sort_order = v;
        }
    }

    /// Build a fresh query from the current criteria. Dates are passed through as given.
    pub fn compile(&self) -> CompiledQuery {
        let s = &self.state;
        let mut clauses = Vec::new();

        if !s.search.is_empty() {
            clauses.push(Predicate::Or(vec![
                Predicate::icontains("title", s.search.as_str()),
                Predicate::icontains("author", s.search.as_str()),
            ]));
        }
        if !s.genre.is_empty() {
            clauses.push(Predicate::eq("genre", s.genre.as_str()));
        }
        if !s.date_from.is_empty() {
            clauses.push(Predicate::condition(
                "publication_date",
                FilterOp::Gte,
                s.date_from.as_str(),
            ));
        }
        if !s.date_to.is_empty() {
            clauses.push(Predicate::condition(
                "publication_date",
                FilterOp::Lte,
                s.date_to.as_str(),
            ));
        }

        let sort = SortKey {
            field: s.sort_by.as_str().to_string(),
            descending: s.sort_order == SortOrder::Desc,
        };

        tracing::debug!(clauses = clauses.len(), sort = %sort, "Compiled book filter");

        CompiledQuery {
            predicate: Predicate::And(clauses),
            sort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_filters_match_everything() {
        let compiled = FilterBuilder::new().compile();
        assert!(compiled.predicate.is_match_all());
        assert_eq!(compiled.sort, SortKey::asc("title"));
        assert_eq!(compiled.sort.to_string(), "title");
    }

    #[test]
    fn search_and_genre_are_conjoined() {
        let mut builder = FilterBuilder::new();
        builder.merge(FilterUpdate {
            search: Some("dune".to_string()),
            genre: Some("Sci-Fi".to_string()),
            ..Default::default()
        });
        let compiled = builder.compile();
        assert_eq!(
            compiled.predicate,
            Predicate::And(vec![
                Predicate::Or(vec![
                    Predicate::icontains("title", "dune"),
                    Predicate::icontains("author", "dune"),
                ]),
                Predicate::eq("genre", "Sci-Fi"),
            ])
        );
    }

    #[test]
    fn date_range_and_descending_sort() {
        let mut builder = FilterBuilder::new();
        builder.merge(FilterUpdate {
            date_from: Some("2000-01-01".to_string()),
            date_to: Some("not-a-date".to_string()),
            sort_by: Some(SortField::PublicationDate),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        });
        let compiled = builder.compile();
        assert_eq!(
            compiled.predicate.to_json(),
            json!({ "_and": [
                { "publication_date": { "_gte": "2000-01-01" } },
                { "publication_date": { "_lte": "not-a-date" } }
            ]})
        );
        assert_eq!(compiled.sort.to_string(), "-publication_date");
    }

    #[test]
    fn merge_only_touches_named_fields() {
        let mut builder = FilterBuilder::new();
        builder.merge(FilterUpdate {
            search: Some("dune".to_string()),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        });
        builder.merge(FilterUpdate {
            genre: Some("Horror".to_string()),
            ..Default::default()
        });
        let state = builder.state();
        assert_eq!(state.search, "dune");
        assert_eq!(state.genre, "Horror");
        assert_eq!(state.sort_order, SortOrder::Desc);
        assert_eq!(state.sort_by, SortField::Title);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut builder = FilterBuilder::new();
        builder.merge(FilterUpdate {
            search: Some("dune".to_string()),
            sort_by: Some(SortField::DateCreated),
            ..Default::default()
        });
        builder.reset();
        assert_eq!(builder.state(), &FilterState::default());
    }

    #[test]
    fn filter_update_accepts_camel_case_aliases() {
        let update: FilterUpdate = serde_json::from_value(json!({
            "dateFrom": "2001-01-01",
            "sortBy": "date_created",
            "sortOrder": "desc"
        }))
        .unwrap();
        assert_eq!(update.date_from.as_deref(), Some("2001-01-01"));
        assert_eq!(update.sort_by, Some(SortField::DateCreated));
        assert_eq!(update.sort_order, Some(SortOrder::Desc));
    }
}
