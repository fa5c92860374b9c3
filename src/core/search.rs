//! Search business logic - the allow-list of searchable fields and query validation.
//!
//! Only the fields in [`SearchCriteria`] can be searched. Request text is parsed into the
//! enum before any SQL is built, so no caller-provided identifier ever reaches a query.

use crate::{
    core::bean as store,
    entities::bean,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::{fmt, str::FromStr};

const MISSING_PARAMETERS: &str = "Both criteria and value parameters are required";
const INVALID_CRITERIA: &str = "Invalid criteria. Valid options are: colour, name, country";

/// Fields a search may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCriteria {
    /// Roast colour
    Colour,
    /// Display name
    Name,
    /// Country of origin
    Country,
}

impl SearchCriteria {
    /// Every accepted criteria, in the order shown to users.
    pub const ALL: [Self; 3] = [Self::Colour, Self::Name, Self::Country];

    /// Request spelling of this criteria.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Colour => "colour",
            Self::Name => "name",
            Self::Country => "country",
        }
    }

    /// Column searched for this criteria.
    #[must_use]
    pub const fn column(self) -> bean::Column {
        match self {
            Self::Colour => bean::Column::Colour,
            Self::Name => bean::Column::Name,
            Self::Country => bean::Column::Country,
        }
    }
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchCriteria {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|criteria| criteria.as_str() == s)
            .ok_or_else(|| Error::validation(INVALID_CRITERIA))
    }
}

/// Search request as received over HTTP (query string or JSON body).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// One of `colour`, `name`, `country`
    pub criteria: Option<String>,
    /// Substring to look for
    pub value: Option<String>,
}

impl SearchQuery {
    /// Checks that both parameters are present and the criteria is allow-listed.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when either parameter is missing or blank, or when
    /// the criteria is not one of `colour`, `name`, `country`.
    pub fn validate(&self) -> Result<(SearchCriteria, &str)> {
        let (Some(criteria), Some(value)) = (non_blank(&self.criteria), non_blank(&self.value))
        else {
            return Err(Error::validation(MISSING_PARAMETERS));
        };
        Ok((criteria.parse()?, value))
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

/// Validates the query and returns the beans whose chosen field contains the value.
pub async fn search(db: &DatabaseConnection, query: &SearchQuery) -> Result<Vec<bean::Model>> {
    let (criteria, value) = query.validate()?;
    store::search_beans(db, criteria, value).await
}
