//! Route definitions and their compiled form.

use std::fmt;

use regex_lite::Regex;

use crate::encoding::encode_path;
use crate::error::CompileError;
use crate::template::{self, Token};

/// Default pattern for a variable inside a compound segment.
const DEFAULT_VARIABLE_PATTERN: &str = "[^/]+?";

/// Index of a route inside its [`RouterTable`](crate::RouterTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(pub(crate) usize);

impl RouteId {
    /// Registration order of the route, starting at zero.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Declared expected value of a request attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionSpec {
    /// The attribute must equal this value.
    Exact(String),
    /// The attribute must fully match this regular expression.
    Pattern(String),
}

/// Compiled request condition.
#[derive(Debug, Clone)]
pub enum Condition {
    Exact(String),
    Pattern { source: String, regex: Regex },
}

impl Condition {
    fn compile(key: &str, declared: &ConditionSpec) -> Result<Self, CompileError> {
        match declared {
            ConditionSpec::Exact(value) => Ok(Condition::Exact(value.clone())),
            ConditionSpec::Pattern(source) => Ok(Condition::Pattern {
                source: source.clone(),
                regex: full_match_regex(key, source)?,
            }),
        }
    }

    /// Whether `value` satisfies this condition.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Condition::Exact(expected) => expected == value,
            Condition::Pattern { regex, .. } => regex.is_match(value),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Exact(value) => write!(f, "{}", value),
            Condition::Pattern { source, .. } => write!(f, "/{}/", source),
        }
    }
}

/// Options accepted at registration time.
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    /// Request attribute conditions. A later entry for the same key wins.
    pub conditions: Vec<(String, ConditionSpec)>,
    /// Validation patterns for path variables.
    pub matches_with: Vec<(String, String)>,
    /// Whether the route may match a prefix of the request path.
    pub partial: bool,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the request attribute `key` to equal `value`.
    pub fn with_condition(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions
            .push((key.into(), ConditionSpec::Exact(value.into())));
        self
    }

    /// Require the request attribute `key` to fully match `pattern`.
    pub fn with_condition_pattern(
        mut self,
        key: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.conditions
            .push((key.into(), ConditionSpec::Pattern(pattern.into())));
        self
    }

    /// Constrain the path variable `name` with a regular expression.
    pub fn matching(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.matches_with.push((name.into(), pattern.into()));
        self
    }

    /// Allow the route to match a prefix of the request path.
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }
}

/// Everything needed to compile one route.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    pub template: String,
    pub destination: String,
    pub name: Option<String>,
    pub options: RouteOptions,
}

impl RouteDefinition {
    pub fn new(template: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            destination: destination.into(),
            name: None,
            options: RouteOptions::default(),
        }
    }

    /// Index the route under `name` for reverse generation.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: RouteOptions) -> Self {
        self.options = options;
        self
    }
}

/// A validation pattern attached to a path variable.
#[derive(Debug, Clone)]
pub(crate) struct VariablePattern {
    name: String,
    source: String,
    full: Regex,
}

/// One trie edge produced by a segment group.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    /// Exact segment lookup.
    Literal(String),
    /// Regex over the remaining path binding `captures` variables.
    Pattern { regex: Regex, captures: usize },
    /// Any single segment, bound to one variable.
    Catchall,
}

/// One optional-free expansion of a route template.
#[derive(Debug, Clone)]
pub struct PathAlternative {
    path: String,
    groups: Vec<Vec<Token>>,
    variable_names: Vec<String>,
    optionals: usize,
    pub(crate) steps: Vec<Step>,
}

impl PathAlternative {
    /// The expanded template text.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Segment groups, including empty ones.
    pub fn groups(&self) -> &[Vec<Token>] {
        &self.groups
    }

    /// Variable names in template order.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Number of optional sections included in this alternative.
    pub fn optionals(&self) -> usize {
        self.optionals
    }

    /// Assemble a path by substituting variables in template order.
    /// Literal text is percent-encoded; values are inserted as given, so
    /// callers pass them already encoded. Missing variables render as empty
    /// text.
    pub fn render<'a>(&self, value: impl Fn(&str) -> Option<&'a str>) -> String {
        if self.groups.is_empty() {
            return "/".to_string();
        }
        let mut path = String::new();
        for group in &self.groups {
            path.push('/');
            for token in group {
                match token {
                    Token::Literal(text) => path.push_str(&encode_path(text)),
                    Token::Variable(name) => {
                        path.push_str(value(name.as_str()).unwrap_or_default())
                    }
                }
            }
        }
        path
    }
}

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    template: String,
    destination: String,
    pub(crate) name: Option<String>,
    variables: Vec<VariablePattern>,
    conditions: Vec<(String, Condition)>,
    partial: bool,
    alternatives: Vec<PathAlternative>,
    variable_names: Vec<String>,
}

impl Route {
    /// Compile a definition against the router's canonical attribute order.
    pub(crate) fn compile(
        definition: RouteDefinition,
        request_keys: &[String],
    ) -> Result<Self, CompileError> {
        let RouteDefinition {
            template,
            destination,
            name,
            options,
        } = definition;

        let mut variables: Vec<VariablePattern> = Vec::new();
        for (variable, source) in &options.matches_with {
            let compiled = VariablePattern {
                name: variable.clone(),
                source: source.clone(),
                full: full_match_regex(variable, source)?,
            };
            match variables.iter_mut().find(|existing| existing.name == *variable) {
                Some(existing) => *existing = compiled,
                None => variables.push(compiled),
            }
        }

        let mut conditions: Vec<(String, Condition)> = Vec::new();
        for (key, declared) in &options.conditions {
            if !request_keys.contains(key) {
                return Err(CompileError::UnknownRequestKey { key: key.clone() });
            }
            let condition = Condition::compile(key, declared)?;
            match conditions.iter_mut().find(|(existing, _)| existing == key) {
                Some(entry) => entry.1 = condition,
                None => conditions.push((key.clone(), condition)),
            }
        }

        let mut alternatives = Vec::new();
        let mut variable_names: Vec<String> = Vec::new();
        for expanded in template::expand_alternatives(&template)? {
            let groups = template::tokenize(&expanded.path)?;
            let names = template::variable_names(&groups);
            for name in &names {
                if !variable_names.contains(name) {
                    variable_names.push(name.clone());
                }
            }
            let steps = build_steps(&groups, &variables)?;
            alternatives.push(PathAlternative {
                path: expanded.path,
                groups,
                variable_names: names,
                optionals: expanded.optionals,
                steps,
            });
        }

        Ok(Route {
            template,
            destination,
            name,
            variables,
            conditions,
            partial: options.partial,
            alternatives,
            variable_names,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the route may match a prefix of the request path.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn alternatives(&self) -> &[PathAlternative] {
        &self.alternatives
    }

    /// Every variable across all alternatives, in first-occurrence order.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Request conditions as declared, one per attribute.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions
            .iter()
            .map(|(key, condition)| (key.as_str(), condition))
    }

    /// The condition on request attribute `key`, if any.
    pub fn condition(&self, key: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, condition)| condition)
    }

    /// Validation pattern source for path variable `name`.
    pub fn validation_pattern(&self, name: &str) -> Option<&str> {
        self.variable(name).map(|pattern| pattern.source.as_str())
    }

    /// Whether `value` is acceptable for variable `name`.
    pub(crate) fn accepts(&self, name: &str, value: &str) -> bool {
        self.variable(name)
            .map_or(true, |pattern| pattern.full.is_match(value))
    }

    fn variable(&self, name: &str) -> Option<&VariablePattern> {
        self.variables.iter().find(|pattern| pattern.name == name)
    }
}

/// Name of the capture group bound to the `index`-th variable of a segment.
pub(crate) fn capture_name(index: usize) -> String {
    format!("th{}", index)
}

fn full_match_regex(name: &str, source: &str) -> Result<Regex, CompileError> {
    Regex::new(&format!("^(?:{})$", source)).map_err(|source| CompileError::InvalidPattern {
        name: name.to_string(),
        source,
    })
}

fn build_steps(
    groups: &[Vec<Token>],
    variables: &[VariablePattern],
) -> Result<Vec<Step>, CompileError> {
    let mut steps = Vec::new();
    for group in groups {
        let step = match group.as_slice() {
            [] => continue,
            [Token::Literal(text)] => Step::Literal(text.clone()),
            [Token::Variable(name)] if !variables.iter().any(|v| v.name == *name) => {
                Step::Catchall
            }
            _ => pattern_step(group, variables)?,
        };
        steps.push(step);
    }
    Ok(steps)
}

/// Combine a segment group into one regex anchored at the start of the
/// remaining path and ending on a segment boundary.
fn pattern_step(group: &[Token], variables: &[VariablePattern]) -> Result<Step, CompileError> {
    let mut pattern = String::from("^");
    let mut captures = 0;
    let mut label = String::new();

    for token in group {
        match token {
            Token::Literal(text) => {
                pattern.push_str(&regex_lite::escape(text));
                label.push_str(text);
            }
            Token::Variable(name) => {
                let source = variables
                    .iter()
                    .find(|variable| variable.name == *name)
                    .map_or(DEFAULT_VARIABLE_PATTERN, |variable| variable.source.as_str());
                pattern.push_str(&format!("(?P<{}>{})", capture_name(captures), source));
                captures += 1;
                label.push(template::VARIABLE_MARKER);
                label.push_str(name);
            }
        }
    }
    pattern.push_str("(?:/|$)");

    let regex = Regex::new(&pattern)
        .map_err(|source| CompileError::InvalidPattern { name: label, source })?;
    Ok(Step::Pattern { regex, captures })
}
