//! Lecture filter criteria.

use serde::{Deserialize, Serialize};

use crate::SearchError;

/// Sort options for the lecture listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOrder {
    /// Most recently reviewed first.
    #[default]
    #[serde(rename = "newest")]
    Newest,
    /// Highest average rating first.
    #[serde(rename = "rating")]
    HighestRating,
    /// Most reviews first.
    #[serde(rename = "reviews")]
    MostReviewed,
}

impl SortOrder {
    /// Get the query-string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::HighestRating => "rating",
            SortOrder::MostReviewed => "reviews",
        }
    }

    /// Parse from a query-string value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(SortOrder::Newest),
            "rating" => Some(SortOrder::HighestRating),
            "reviews" => Some(SortOrder::MostReviewed),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest",
            SortOrder::HighestRating => "Highest Rated",
            SortOrder::MostReviewed => "Most Reviewed",
        }
    }
}

const PERIOD_TERMS: &[&str] = &["spring", "fall", "intensive", "full_year"];
const TEXTBOOK_OPTIONS: &[&str] = &["required", "recommended", "none"];
const ATTENDANCE_OPTIONS: &[&str] = &["every_class", "sometimes", "none"];
const GRADING_TYPES: &[&str] = &["exam", "report", "attendance", "mixed"];
const SCORE_OPTIONS: &[&str] = &["1", "2", "3", "4", "5"];

/// A single search dimension of [`FilterCriteria`].
///
/// `page` is not a field: it is coupled to pagination and handled by the
/// controller directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Keyword,
    Faculty,
    Sort,
    PeriodYear,
    PeriodTerm,
    Textbook,
    Attendance,
    GradingType,
    ContentDifficulty,
    ContentQuality,
}

impl Field {
    /// Every field, in canonical query order.
    pub const ALL: [Field; 10] = [
        Field::Keyword,
        Field::Faculty,
        Field::Sort,
        Field::PeriodYear,
        Field::PeriodTerm,
        Field::Textbook,
        Field::Attendance,
        Field::GradingType,
        Field::ContentDifficulty,
        Field::ContentQuality,
    ];

    /// Fields shown in the detailed-filter panel.
    pub const DETAILED: [Field; 7] = [
        Field::PeriodYear,
        Field::PeriodTerm,
        Field::Textbook,
        Field::Attendance,
        Field::GradingType,
        Field::ContentDifficulty,
        Field::ContentQuality,
    ];

    /// URL query key for this field.
    pub fn query_key(&self) -> &'static str {
        match self {
            Field::Keyword => "search",
            Field::Faculty => "faculty",
            Field::Sort => "sort",
            Field::PeriodYear => "period_year",
            Field::PeriodTerm => "period_term",
            Field::Textbook => "textbook",
            Field::Attendance => "attendance",
            Field::GradingType => "grading_type",
            Field::ContentDifficulty => "content_difficulty",
            Field::ContentQuality => "content_quality",
        }
    }

    /// Look up a field by its URL query key.
    pub fn from_query_key(key: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.query_key() == key)
    }

    pub fn is_detailed(&self) -> bool {
        Field::DETAILED.contains(self)
    }

    /// The fixed option set for this field, if it has one.
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self {
            Field::PeriodTerm => Some(PERIOD_TERMS),
            Field::Textbook => Some(TEXTBOOK_OPTIONS),
            Field::Attendance => Some(ATTENDANCE_OPTIONS),
            Field::GradingType => Some(GRADING_TYPES),
            Field::ContentDifficulty | Field::ContentQuality => Some(SCORE_OPTIONS),
            Field::Keyword | Field::Faculty | Field::Sort | Field::PeriodYear => None,
        }
    }

    /// Check a raw value against this field's domain.
    ///
    /// The empty string is always accepted and means "default".
    pub fn validate(&self, value: &str) -> Result<(), SearchError> {
        if value.is_empty() {
            return Ok(());
        }

        let valid = match self {
            Field::Keyword | Field::Faculty => true,
            Field::Sort => SortOrder::parse(value).is_some(),
            Field::PeriodYear => value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()),
            _ => self.options().is_some_and(|opts| opts.contains(&value)),
        };

        if valid {
            Ok(())
        } else {
            Err(SearchError::InvalidOption {
                field: self.query_key(),
                value: value.to_string(),
            })
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.query_key())
    }
}

/// The canonical set of search dimensions for the lecture listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Free text, matched against title and lecturer.
    pub keyword: String,
    /// Faculty code; empty means all faculties.
    pub faculty: String,
    pub sort_order: SortOrder,
    pub period_year: String,
    pub period_term: String,
    pub textbook: String,
    pub attendance: String,
    pub grading_type: String,
    pub content_difficulty: String,
    pub content_quality: String,
    /// Current page (1-indexed).
    pub page: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            faculty: String::new(),
            sort_order: SortOrder::default(),
            period_year: String::new(),
            period_term: String::new(),
            textbook: String::new(),
            attendance: String::new(),
            grading_type: String::new(),
            content_difficulty: String::new(),
            content_quality: String::new(),
            page: 1,
        }
    }
}

impl FilterCriteria {
    /// Create criteria with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw value of a field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Sort => self.sort_order.as_str(),
            Field::Keyword => &self.keyword,
            Field::Faculty => &self.faculty,
            Field::PeriodYear => &self.period_year,
            Field::PeriodTerm => &self.period_term,
            Field::Textbook => &self.textbook,
            Field::Attendance => &self.attendance,
            Field::GradingType => &self.grading_type,
            Field::ContentDifficulty => &self.content_difficulty,
            Field::ContentQuality => &self.content_quality,
        }
    }

    /// Set a field from its raw value, validating it first.
    ///
    /// On error the criteria are left unchanged.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> Result<(), SearchError> {
        let value = value.into();
        field.validate(&value)?;

        match field {
            Field::Sort => {
                self.sort_order = SortOrder::parse(&value).unwrap_or_default();
            }
            _ => {
                if let Some(slot) = self.text_slot_mut(field) {
                    *slot = value;
                }
            }
        }
        Ok(())
    }

    /// Reset a field to its default.
    pub fn reset(&mut self, field: Field) {
        match field {
            Field::Sort => self.sort_order = SortOrder::default(),
            _ => {
                if let Some(slot) = self.text_slot_mut(field) {
                    slot.clear();
                }
            }
        }
    }

    /// Whether a field differs from its default.
    pub fn is_active(&self, field: Field) -> bool {
        match field {
            Field::Sort => self.sort_order != SortOrder::default(),
            _ => !self.value(field).is_empty(),
        }
    }

    /// Active fields in canonical order.
    pub fn active_fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|f| self.is_active(*f))
    }

    /// `(query_key, value)` for every active field, in canonical order.
    pub fn active_params(&self) -> Vec<(&'static str, String)> {
        self.active_fields()
            .map(|f| (f.query_key(), self.value(f).to_string()))
            .collect()
    }

    pub fn has_detailed_filters(&self) -> bool {
        Field::DETAILED.iter().any(|f| self.is_active(*f))
    }

    /// Reset every detailed filter, leaving keyword, faculty and sort alone.
    pub fn clear_detailed(&mut self) {
        for field in Field::DETAILED {
            self.reset(field);
        }
    }

    /// Compare every field except `page`.
    pub fn same_filters(&self, other: &FilterCriteria) -> bool {
        Field::ALL.iter().all(|f| self.value(*f) == other.value(*f))
    }

    /// Copy of these criteria on another page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    fn text_slot_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Keyword => Some(&mut self.keyword),
            Field::Faculty => Some(&mut self.faculty),
            Field::PeriodYear => Some(&mut self.period_year),
            Field::PeriodTerm => Some(&mut self.period_term),
            Field::Textbook => Some(&mut self.textbook),
            Field::Attendance => Some(&mut self.attendance),
            Field::GradingType => Some(&mut self.grading_type),
            Field::ContentDifficulty => Some(&mut self.content_difficulty),
            Field::ContentQuality => Some(&mut self.content_quality),
            Field::Sort => None,
        }
    }
}
