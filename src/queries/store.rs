//! Embedded query templates

use crate::decode::check_well_formed;
use crate::error::{Error, Result};
use crate::period::YearMonth;
use crate::streams::StreamRegistry;
use crate::template::{self, TemplateContext};
use std::collections::BTreeMap;

/// Built-in templates, keyed by report code
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("000", include_str!("templates/000.xml")),
    ("010", include_str!("templates/010.xml")),
    ("020", include_str!("templates/020.xml")),
    ("030_3", include_str!("templates/030_3.xml")),
    ("040_1", include_str!("templates/040_1.xml")),
    ("060", include_str!("templates/060.xml")),
    ("230_2", include_str!("templates/230_2.xml")),
    ("410", include_str!("templates/410.xml")),
    ("670", include_str!("templates/670.xml")),
];

const BROWSE_FIELDS_QUERY: &str = "<read>
    <type>browse</type>
    <office>:office:</office>
    <code>:code:</code>
</read>";

const ALL_BROWSE_FIELDS_QUERY: &str = "<list>
    <type>browsefields</type>
</list>";

/// Browse query for one report code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    code: String,
    text: String,
}

impl QueryTemplate {
    pub fn new(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Unrendered template text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the query for a single month.
    ///
    /// Both bounds are set to the same month; the remote windows by exact period.
    pub fn render(&self, month: YearMonth) -> Result<String> {
        let period = month.to_string();
        self.render_range(&period, &period)
    }

    /// Render with explicit period bounds and check the result is well-formed
    pub fn render_range(&self, lower: &str, upper: &str) -> Result<String> {
        let ctx = TemplateContext::new()
            .with("period_lower", lower)
            .with("period_upper", upper);
        let query = template::render(&self.text, &ctx)?;
        check_well_formed(&query).map_err(|e| {
            Error::template(format!("query for report '{}' is not valid XML: {e}", self.code))
        })?;
        Ok(query)
    }
}

/// Read-only set of query templates
#[derive(Debug, Clone, Default)]
pub struct QueryStore {
    templates: BTreeMap<String, QueryTemplate>,
}

impl QueryStore {
    /// The templates shipped with the tap
    pub fn builtin() -> Self {
        Self::from_templates(
            BUILTIN_TEMPLATES
                .iter()
                .map(|(code, text)| QueryTemplate::new(*code, *text)),
        )
    }

    /// Build a store from arbitrary templates
    pub fn from_templates(templates: impl IntoIterator<Item = QueryTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.code.clone(), t))
                .collect(),
        }
    }

    /// Look up the template for a report code
    pub fn get(&self, code: &str) -> Result<&QueryTemplate> {
        self.templates
            .get(code)
            .ok_or_else(|| Error::TemplateNotFound {
                code: code.to_string(),
            })
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Fail unless every stream in `registry` has a template
    pub fn ensure_covers(&self, registry: &StreamRegistry) -> Result<()> {
        for stream in registry.streams() {
            self.get(&stream.report_code).map_err(|_| {
                Error::config(format!(
                    "Stream '{}' reads report '{}', which has no query template",
                    stream.name, stream.report_code
                ))
            })?;
        }
        Ok(())
    }
}

/// Query reading the field definitions of one report
pub fn browse_fields_query(office: &str, code: &str) -> Result<String> {
    let ctx = TemplateContext::new()
        .with("office", escape_text(office))
        .with("code", escape_text(code));
    template::render(BROWSE_FIELDS_QUERY, &ctx)
}

/// Query listing every browse field the remote offers
pub fn all_browse_fields_query() -> String {
    ALL_BROWSE_FIELDS_QUERY.to_string()
}

fn escape_text(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}
