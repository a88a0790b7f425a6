//! Path templates for visitable actions.
//!
//! Templates support:
//! - Literal segments: `/login`
//! - Named parameters: `/users/:id`, filled from call arguments in order

use thiserror::Error;

/// Why a template could not be filled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FillError {
    /// No argument left for this parameter
    #[error("missing value for path parameter ':{0}'")]
    MissingParameter(String),
    /// Arguments left over after every parameter was filled
    #[error("{0} argument(s) left after filling the path")]
    ExtraArguments(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Parameter(String),
}

/// Parsed `visitable` path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitPath {
    template: String,
    segments: Vec<PathSegment>,
}

impl VisitPath {
    /// Parse a template
    #[must_use]
    pub fn new(template: &str) -> Self {
        let segments = template
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => PathSegment::Parameter(name.to_string()),
                None => PathSegment::Literal(s.to_string()),
            })
            .collect();

        Self {
            template: template.to_string(),
            segments,
        }
    }

    /// Parameter names in order of appearance
    #[must_use]
    pub fn parameters(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                PathSegment::Parameter(name) => Some(name.as_str()),
                PathSegment::Literal(_) => None,
            })
            .collect()
    }

    /// Fill parameters positionally from `args`
    pub fn fill(&self, args: &[&str]) -> Result<String, FillError> {
        let mut args = args.iter();
        let mut url = String::new();
        for segment in &self.segments {
            url.push('/');
            match segment {
                PathSegment::Literal(lit) => url.push_str(lit),
                PathSegment::Parameter(name) => {
                    let arg = args
                        .next()
                        .ok_or_else(|| FillError::MissingParameter(name.clone()))?;
                    url.push_str(arg);
                }
            }
        }
        let extra = args.count();
        if extra > 0 {
            return Err(FillError::ExtraArguments(extra));
        }
        if url.is_empty() {
            url.push('/');
        }
        Ok(url)
    }

    /// Template as declared
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}
