//! Analysis - The model's structured convergence answer
//!
//! Extraction is strict about shape and permissive about counts: every entry
//! must carry its fields, but the "exactly 3 insights / exactly 1 action"
//! rules from the prompt are only reported, never enforced.

use serde_json::{Map, Value};

use crate::domain::errors::ConvergenceError;

/// Number of insights the prompt asks for
pub const EXPECTED_INSIGHTS: usize = 3;
/// Number of actions the prompt asks for
pub const EXPECTED_ACTIONS: usize = 1;

/// One line of the narrative (`aiTextChunks`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bullet {
    pub text: String,
    pub is_bullet: bool,
}

/// Headline finding (`aiInsights`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub icon: String,
    pub label: String,
    pub value: String,
}

/// Recommended intervention (`aiActions`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub action: String,
    pub because: String,
}

/// Parsed convergence answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub bullets: Vec<Bullet>,
    pub insights: Vec<Insight>,
    pub actions: Vec<Action>,
}

impl Analysis {
    /// Decode normalized model text
    pub fn parse(text: &str) -> Result<Self, ConvergenceError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ConvergenceError::UnparsableResponse {
                text: text.to_string(),
                reason: e.to_string(),
            })?;

        Self::from_value(&value)
    }

    /// Extract the three sections from decoded JSON
    pub fn from_value(root: &Value) -> Result<Self, ConvergenceError> {
        let root = root.as_object().ok_or(ConvergenceError::NotAnObject)?;

        let bullets = required_section(root, "bullets")?
            .iter()
            .enumerate()
            .map(|(i, entry)| -> Result<Bullet, ConvergenceError> {
                let entry = Entry::new("bullets", i, entry)?;
                Ok(Bullet {
                    text: entry.text("text")?,
                    is_bullet: entry.flag("isBullet")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let insights = required_section(root, "insights")?
            .iter()
            .enumerate()
            .map(|(i, entry)| -> Result<Insight, ConvergenceError> {
                let entry = Entry::new("insights", i, entry)?;
                Ok(Insight {
                    icon: entry.text("icon")?,
                    label: entry.text("label")?,
                    value: entry.text("value")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Only section with a fallback
        let actions = optional_section(root, "actions")?
            .iter()
            .enumerate()
            .map(|(i, entry)| -> Result<Action, ConvergenceError> {
                let entry = Entry::new("actions", i, entry)?;
                Ok(Action {
                    action: entry.text("action")?,
                    because: entry.text("because")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            bullets,
            insights,
            actions,
        })
    }

    /// Deviations from the counts the prompt asks for
    pub fn count_mismatches(&self) -> Vec<String> {
        let mut mismatches = Vec::new();
        if self.insights.len() != EXPECTED_INSIGHTS {
            mismatches.push(format!(
                "expected {} insights, got {}",
                EXPECTED_INSIGHTS,
                self.insights.len()
            ));
        }
        if self.actions.len() != EXPECTED_ACTIONS {
            mismatches.push(format!(
                "expected {} action, got {}",
                EXPECTED_ACTIONS,
                self.actions.len()
            ));
        }
        mismatches
    }
}

fn required_section<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a [Value], ConvergenceError> {
    match root.get(key) {
        None => Err(ConvergenceError::MissingKey(key.to_string())),
        Some(value) => as_list(key, value),
    }
}

fn optional_section<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a [Value], ConvergenceError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(value) => as_list(key, value),
    }
}

fn as_list<'a>(key: &str, value: &'a Value) -> Result<&'a [Value], ConvergenceError> {
    value
        .as_array()
        .map(|list| list.as_slice())
        .ok_or_else(|| ConvergenceError::NotAList {
            section: key.to_string(),
        })
}

/// One object inside a section, with its position for diagnostics
struct Entry<'a> {
    section: &'static str,
    index: usize,
    fields: &'a Map<String, Value>,
}

impl<'a> Entry<'a> {
    fn new(section: &'static str, index: usize, value: &'a Value) -> Result<Self, ConvergenceError> {
        let fields = value
            .as_object()
            .ok_or_else(|| ConvergenceError::InvalidEntry {
                section: section.to_string(),
                index,
            })?;
        Ok(Self {
            section,
            index,
            fields,
        })
    }

    fn get(&self, field: &str) -> Result<&'a Value, ConvergenceError> {
        self.fields
            .get(field)
            .ok_or_else(|| ConvergenceError::missing_field(self.section, self.index, field))
    }

    /// Strings verbatim; numbers and booleans by their JSON text
    fn text(&self, field: &str) -> Result<String, ConvergenceError> {
        match self.get(field)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(ConvergenceError::invalid_field(
                self.section,
                self.index,
                field,
                "a string",
            )),
        }
    }

    /// JSON booleans, or "true"/"false" spelled as strings
    fn flag(&self, field: &str) -> Result<bool, ConvergenceError> {
        match self.get(field)? {
            Value::Bool(b) => Ok(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(ConvergenceError::invalid_field(
                self.section,
                self.index,
                field,
                "a boolean",
            )),
        }
    }
}
