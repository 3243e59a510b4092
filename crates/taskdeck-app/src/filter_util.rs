use taskdeck_core::{
    Category, ParseError, Priority, TaskFilter, TaskFilterBuilder as CoreTaskFilterBuilder,
};
use thiserror::Error;

/// Token that leaves a clause unset.
const ANY: &str = "any";

/// Error type returned while constructing task filters from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    #[error("invalid priority filter: {source}")]
    InvalidPriority {
        #[source]
        source: ParseError,
    },
    #[error("invalid category filter: {source}")]
    InvalidCategory {
        #[source]
        source: ParseError,
    },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into [`TaskFilter`] values.
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    priority: Option<Priority>,
    category: Option<Category>,
    text: Option<String>,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the priority clause. `None`, blank or `"any"` clears it.
    ///
    /// # Errors
    /// Returns an error if the token is not a known priority.
    pub fn with_priority(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.priority = parse_optional(token, |raw| {
            raw.parse()
                .map_err(|source| FilterBuildError::InvalidPriority { source })
        })?;
        Ok(self)
    }

    /// Configure the category clause. `None`, blank or `"any"` clears it.
    ///
    /// # Errors
    /// Returns an error if the token is not a known category.
    pub fn with_category(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.category = parse_optional(token, |raw| {
            raw.parse()
                .map_err(|source| FilterBuildError::InvalidCategory { source })
        })?;
        Ok(self)
    }

    /// Configure the optional search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text.and_then(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        self
    }

    /// Build the final [`TaskFilter`].
    #[must_use]
    pub fn build(self) -> TaskFilter {
        let mut builder = CoreTaskFilterBuilder::new();
        if let Some(priority) = self.priority {
            builder = builder.priority(priority);
        }
        if let Some(category) = self.category {
            builder = builder.category(category);
        }
        if let Some(text) = self.text {
            builder = builder.text(text);
        }
        builder.build()
    }
}

fn parse_optional<T>(
    token: Option<&str>,
    parse: impl FnOnce(&str) -> FilterBuildResult<T>,
) -> FilterBuildResult<Option<T>> {
    let Some(raw) = token else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ANY) {
        return Ok(None);
    }
    parse(trimmed).map(Some)
}

/// One-line summary of an active filter, e.g. `priority=high category=work text="tax"`.
#[must_use]
pub fn describe_filter(filter: &TaskFilter) -> String {
    if filter.is_empty() {
        return "none".to_owned();
    }
    let mut parts = Vec::new();
    if let Some(priority) = filter.priority {
        parts.push(format!("priority={priority}"));
    }
    if let Some(category) = filter.category {
        parts.push(format!("category={category}"));
    }
    if let Some(text) = &filter.text {
        parts.push(format!("text=\"{}\"", text.needle()));
    }
    parts.join(" ")
}
