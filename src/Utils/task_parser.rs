/// parse task documents with structure like
/// ```text
/// title1
///   key1: value1, value2
///   key2: value3
/// title2
///   key3: value4
/// ```
/// into HashMap<String, HashMap<String, Vec<String>>> and build an integration task from it.
/// One key per line; a value runs until a comma, a semicolon or the end of the line, so
/// values may contain spaces (`x * y`). Lines starting with //, #, % or ; are comments.
use crate::Utils::logger::LogSettings;
use crate::numerical::double_integral::{
    DoubleIntegralSolver, FixedModePolicy, IntegrationError, IntegrationOrder,
    IntegrationRequest, IntegrationResult,
};
use crate::numerical::quadrature::{QuadMode, QuadOptions};
use log::info;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;

pub type SectionMap = HashMap<String, Vec<String>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// typed view of a raw value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn from_text(s: &str) -> Value {
        let s = s.trim();
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    }

    /// integers widen to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self { Some(*i) } else { None }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self { Some(*b) } else { None }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
    Io(String),
    Parse(String),
    MissingSection(String),
    MissingKey { section: String, key: String },
    InvalidValue { section: String, key: String, value: String },
}

impl Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Io(msg) => write!(f, "Cannot read task file: {}", msg),
            TaskError::Parse(msg) => write!(f, "Parsing error: {}", msg),
            TaskError::MissingSection(section) => write!(f, "Missing section: {}", section),
            TaskError::MissingKey { section, key } => {
                write!(f, "Missing key {} in section {}", key, section)
            }
            TaskError::InvalidValue { section, key, value } => {
                write!(f, "Invalid value {} for {}.{}", value, section, key)
            }
        }
    }
}

impl std::error::Error for TaskError {}

/// Parses a title (word characters without spaces)
pub fn parse_title(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim(), result))
}

/// Parses a key (word characters without spaces)
pub fn parse_key(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// one value: everything up to a comma, semicolon or line end, trimmed
pub fn parse_value(input: &str) -> IResult<&str, String> {
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ';' | '\n' | '\r'));
    let mut value_parser = map(value_parser, |s: &str| s.trim().to_string());
    value_parser.parse(input)
}

pub fn parse_value_list(input: &str) -> IResult<&str, Vec<String>> {
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

/// Parses a key-value pair where value is a list
pub fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<String>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim(), result))
}

/// Parses a section with a title and multiple key-value pairs
pub fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, space0));
    let (input, pairs) = parser.parse(input)?;
    let section_map = pairs.into_iter().collect::<SectionMap>();
    Ok((input, (title, section_map)))
}

/// Filters out comment lines (starting with //, #, %, or ;) and blank lines
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the sections of an already filtered document
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    let (input, sections) = parser.parse(input)?;
    Ok((input, sections.into_iter().collect::<DocumentMap>()))
}

/// filter comments, parse, and insist the whole document is consumed
pub fn parse_document_as(input: &str) -> Result<DocumentMap, TaskError> {
    let filtered = filter_comments(input);
    match parse_document(&filtered) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(TaskError::Parse(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining
                )));
            }
            Ok(parsed)
        }
        Err(e) => Err(TaskError::Parse(format!("{:?}", e))),
    }
}

/// A double integral read from a task document:
/// ```text
/// integral
///   integrand: x*y
///   xmin: 0
///   xmax: 2
///   ymin: 0
///   ymax: 3
///   order: dydx
/// options
///   mode: auto
///   eps: 1e-10
/// logging
///   level: info
///   file: integral.log
///   console: true
/// ```
/// `options` and `logging` are optional, as is every key in them.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationTask {
    pub request: IntegrationRequest,
    /// None selects the mode from the integrand text
    pub mode: Option<QuadMode>,
    pub options: QuadOptions,
    pub logging: Option<LogSettings>,
}

/// multiple values of one key are glued back with commas, so `pow(x, 2)` survives
fn joined(section: &SectionMap, key: &str) -> Option<String> {
    section.get(key).filter(|values| !values.is_empty()).map(|values| values.join(","))
}

fn required(doc: &DocumentMap, section: &str, key: &str) -> Result<String, TaskError> {
    let map = doc
        .get(section)
        .ok_or_else(|| TaskError::MissingSection(section.to_string()))?;
    joined(map, key).ok_or_else(|| TaskError::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    })
}

fn invalid(section: &str, key: &str, value: &str) -> TaskError {
    TaskError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn optional_float(section: Option<&SectionMap>, name: &str, key: &str) -> Result<Option<f64>, TaskError> {
    match section.and_then(|s| joined(s, key)) {
        None => Ok(None),
        Some(text) => Value::from_text(&text)
            .as_float()
            .filter(|v| *v > 0.0)
            .map(Some)
            .ok_or_else(|| invalid(name, key, &text)),
    }
}

fn optional_count(section: Option<&SectionMap>, name: &str, key: &str) -> Result<Option<usize>, TaskError> {
    match section.and_then(|s| joined(s, key)) {
        None => Ok(None),
        Some(text) => Value::from_text(&text)
            .as_integer()
            .filter(|v| *v > 0)
            .map(|v| Some(v as usize))
            .ok_or_else(|| invalid(name, key, &text)),
    }
}

impl FromStr for IntegrationTask {
    type Err = TaskError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let doc = parse_document_as(input)?;

        let integrand = required(&doc, "integral", "integrand")?;
        let x_min = required(&doc, "integral", "xmin")?;
        let x_max = required(&doc, "integral", "xmax")?;
        let y_min = required(&doc, "integral", "ymin")?;
        let y_max = required(&doc, "integral", "ymax")?;
        let order = match doc.get("integral").and_then(|s| joined(s, "order")) {
            None => IntegrationOrder::default(),
            Some(text) => IntegrationOrder::from_str(&text)
                .map_err(|_| invalid("integral", "order", &text))?,
        };
        let request = IntegrationRequest::new(&integrand)
            .x(&x_min, &x_max)
            .y(&y_min, &y_max)
            .order(order);

        let options_section = doc.get("options");
        let mode = match options_section.and_then(|s| joined(s, "mode")) {
            None => None,
            Some(text) if text.eq_ignore_ascii_case("auto") => None,
            Some(text) => Some(
                QuadMode::from_str(&text).map_err(|_| invalid("options", "mode", &text))?,
            ),
        };
        let mut options = QuadOptions::default();
        if let Some(eps) = optional_float(options_section, "options", "eps")? {
            options.eps = eps;
        }
        if let Some(depth) = optional_count(options_section, "options", "max_depth")? {
            options.max_depth = depth;
        }
        if let Some(panels) = optional_count(options_section, "options", "panels")? {
            options.panels = panels;
        }
        if let Some(panels) = optional_count(options_section, "options", "infinite_panels")? {
            options.infinite_panels = panels;
        }

        let logging = match doc.get("logging") {
            None => None,
            Some(section) => {
                let mut settings = match joined(section, "level") {
                    Some(level) => LogSettings::default().with_level(&level),
                    None => LogSettings::default(),
                };
                if let Some(file) = joined(section, "file") {
                    settings = settings.with_file(Some(&file));
                }
                if let Some(text) = joined(section, "console") {
                    let console = Value::from_text(&text)
                        .as_boolean()
                        .ok_or_else(|| invalid("logging", "console", &text))?;
                    if !console {
                        settings = settings.without_console();
                    }
                }
                Some(settings)
            }
        };

        Ok(IntegrationTask { request, mode, options, logging })
    }
}

impl IntegrationTask {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TaskError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TaskError::Io(format!("{}: {}", path.display(), e)))?;
        info!("task loaded from {}", path.display());
        IntegrationTask::from_str(&contents)
    }

    pub fn solver(&self) -> DoubleIntegralSolver {
        let solver = DoubleIntegralSolver::default().with_options(self.options.clone());
        match self.mode {
            Some(mode) => solver.with_policy(Box::new(FixedModePolicy(mode))),
            None => solver,
        }
    }

    pub fn solve(&self) -> Result<IntegrationResult, IntegrationError> {
        self.solver().solve(&self.request)
    }
}
