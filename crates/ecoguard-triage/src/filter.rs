//! Filter/search engine
//!
//! A [`ReportFilter`] is the conjunction of up to four independent predicates.
//! Each one can be left unconstrained (`all`). Filtering never reorders and
//! never mutates the input.

use ecoguard_types::{Category, Report, ReportStatus, Severity, ValidationError};
use std::fmt;
use std::str::FromStr;

/// Either no constraint, or equality with one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T> Selector<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Selector::All => None,
            Selector::Only(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Selector<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selector::All, Selector::Only)
    }
}

impl<T: FromStr> FromStr for Selector<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Selector::All)
        } else {
            s.parse().map(Selector::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("all"),
            Selector::Only(value) => value.fmt(f),
        }
    }
}

/// Free-text query, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        Self(query.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring of id, latitude, longitude or category.
    ///
    /// Reports without coordinates are only searched on id and category.
    pub fn matches(&self, report: &Report) -> bool {
        if self.0.is_empty() {
            return true;
        }
        let q = self.0.as_str();
        report.id.as_str().to_lowercase().contains(q)
            || report
                .location
                .is_some_and(|c| c.lat.to_string().contains(q) || c.lng.to_string().contains(q))
            || report.category.as_str().contains(q)
    }
}

/// One sub-predicate of a filter
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Category(Category),
    /// Case-insensitive match on the producer's label
    Status(ReportStatus),
    /// Score-derived bucket
    Severity(Severity),
    Search(SearchQuery),
}

impl Predicate {
    pub fn matches(&self, report: &Report) -> bool {
        match self {
            Predicate::Category(category) => report.category == *category,
            Predicate::Status(status) => report.status.same_label(status),
            Predicate::Severity(severity) => report.severity() == *severity,
            Predicate::Search(query) => query.matches(report),
        }
    }
}

/// Conjunction of the operator's current filter choices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportFilter {
    pub category: Selector<Category>,
    pub status: Selector<ReportStatus>,
    pub severity: Selector<Severity>,
    pub search: SearchQuery,
}

impl ReportFilter {
    /// Filter with no constraint at all
    pub fn any() -> Self {
        Self::default()
    }

    /// Build from console-style labels, where `all` means no constraint
    pub fn from_labels(
        category: &str,
        status: &str,
        severity: &str,
        search: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            category: category.parse()?,
            status: parse_status(status),
            severity: severity.parse()?,
            search: SearchQuery::new(search),
        })
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Selector::Only(category);
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = Selector::Only(status);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Selector::Only(severity);
        self
    }

    pub fn with_search(mut self, query: &str) -> Self {
        self.search = SearchQuery::new(query);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.category.is_all()
            && self.status.is_all()
            && self.severity.is_all()
            && self.search.is_empty()
    }

    /// The active sub-predicates
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(4);
        if let Selector::Only(category) = &self.category {
            predicates.push(Predicate::Category(*category));
        }
        if let Selector::Only(status) = &self.status {
            predicates.push(Predicate::Status(status.clone()));
        }
        if let Selector::Only(severity) = &self.severity {
            predicates.push(Predicate::Severity(*severity));
        }
        if !self.search.is_empty() {
            predicates.push(Predicate::Search(self.search.clone()));
        }
        predicates
    }

    pub fn matches(&self, report: &Report) -> bool {
        self.category.as_option().map_or(true, |c| report.category == *c)
            && self
                .status
                .as_option()
                .map_or(true, |s| report.status.same_label(s))
            && self
                .severity
                .as_option()
                .map_or(true, |s| report.severity() == *s)
            && self.search.matches(report)
    }
}

// Status labels are free-form, so any non-`all` label is a valid constraint
fn parse_status(label: &str) -> Selector<ReportStatus> {
    let label = label.trim();
    if label.is_empty() || label.eq_ignore_ascii_case("all") {
        Selector::All
    } else {
        Selector::Only(ReportStatus::from_label(label))
    }
}

/// Reports matching `filter`, in input order
pub fn apply(reports: &[Report], filter: &ReportFilter) -> Vec<Report> {
    reports.iter().filter(|r| filter.matches(r)).cloned().collect()
}

/// Narrow by each predicate in turn
pub fn apply_predicates(reports: &[Report], predicates: &[Predicate]) -> Vec<Report> {
    reports
        .iter()
        .filter(|r| predicates.iter().all(|p| p.matches(r)))
        .cloned()
        .collect()
}
