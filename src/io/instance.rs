//! Instance file loader.
//!
//! The format is line oriented and every line is recognised by its shape;
//! anything else (titles, column headers, blank lines) is skipped.
//!
//! ```text
//! 2 3 480 10                          customers locations horizon capacity
//! 0 0 D [0,480]                       start depot
//! c1 3 L1 [0,100] L2 [50,200]         customer, demand, alternatives
//! c2 4 L2 [10,50]
//! 0 0 D [0,480]                       end depot
//! D 0 0                               location x y
//! (D, L1) 5 7                         (from, to) time cost
//! ```
//!
//! The first request line is the start depot and the last one the end
//! depot; a single depot line serves as both. Location and customer names
//! are arbitrary tokens, numbered in order of first appearance.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::models::{Coordinate, Instance, InstanceError, Parameters, Request, TimeWindow};
use crate::travel::{Rate, TravelRelation};

/// What went wrong while loading an instance.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// The file could not be read.
    Io(String),
    /// No `customers locations horizon capacity` line precedes the data.
    MissingHeader,
    /// No request line was found.
    MissingDepot,
    /// A token that should be a number isn't.
    InvalidNumber(String),
    /// A `[open,close]` token is malformed or has `open > close`.
    InvalidWindow(String),
    /// A request line doesn't have `location [open,close]` pairs.
    MalformedRequest,
    /// A `(from, to)` group is malformed.
    MalformedTravel,
    /// A travel line names a location never declared.
    UnknownLocation(String),
    /// More distinct locations than the header declares.
    TooManyLocations { declared: usize },
    /// The assembled instance is inconsistent.
    Instance(InstanceError),
}

/// An instance loading error, with the 1-based line it refers to when known.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: Option<usize>,
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn at(line: usize, kind: ParseErrorKind) -> Self {
        Self {
            line: Some(line),
            kind,
        }
    }

    fn global(kind: ParseErrorKind) -> Self {
        Self { line: None, kind }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {line}: ")?;
        }
        match &self.kind {
            ParseErrorKind::Io(msg) => write!(f, "{msg}"),
            ParseErrorKind::MissingHeader => write!(f, "missing parameter line"),
            ParseErrorKind::MissingDepot => write!(f, "no request lines"),
            ParseErrorKind::InvalidNumber(tok) => write!(f, "invalid number {tok:?}"),
            ParseErrorKind::InvalidWindow(tok) => write!(f, "invalid time window {tok:?}"),
            ParseErrorKind::MalformedRequest => write!(f, "malformed request line"),
            ParseErrorKind::MalformedTravel => write!(f, "malformed travel line"),
            ParseErrorKind::UnknownLocation(name) => write!(f, "unknown location {name:?}"),
            ParseErrorKind::TooManyLocations { declared } => {
                write!(f, "more than the {declared} declared locations")
            }
            ParseErrorKind::Instance(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Instance(err) => Some(err),
            _ => None,
        }
    }
}

/// An instance together with the names used in its file.
#[derive(Debug, Clone)]
pub struct LoadedInstance {
    pub instance: Instance,
    /// Customer name per customer slot.
    pub customer_names: Vec<String>,
    /// Location name per location index.
    pub location_names: Vec<String>,
}

impl LoadedInstance {
    /// File name of the customer served by `request` (`None` for depots).
    pub fn customer_name(&self, request: usize) -> Option<&str> {
        self.instance
            .customer_slot(request)
            .map(|slot| self.customer_names[slot].as_str())
    }

    /// File name of the location visited by `request`.
    pub fn location_name(&self, request: usize) -> &str {
        &self.location_names[self.instance.location_of(request)]
    }
}

/// Splits a line on whitespace, keeping `[..]` and `(..)` groups as single
/// tokens with their inner whitespace removed.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in line.chars() {
        match ch {
            '[' | '(' => {
                depth += 1;
                current.push(ch);
            }
            ']' | ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() => {
                if depth == 0 && !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn is_window(token: &str) -> bool {
    token.starts_with('[') && token.ends_with(']')
}

/// A request line carries a window and a numeric demand; column titles
/// such as `LOCATION [OPEN, CLOSE]` don't.
fn is_request_line(tokens: &[String]) -> bool {
    tokens.len() >= 2 && tokens[1].parse::<i64>().is_ok() && tokens.iter().any(|t| is_window(t))
}

fn number<T: std::str::FromStr>(line: usize, token: &str) -> Result<T, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::at(line, ParseErrorKind::InvalidNumber(token.to_string())))
}

fn window(line: usize, token: &str) -> Result<TimeWindow, ParseError> {
    let invalid = || ParseError::at(line, ParseErrorKind::InvalidWindow(token.to_string()));
    let inner = token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let (open, close) = inner.split_once(',').ok_or_else(invalid)?;
    let open: i64 = open.parse().map_err(|_| invalid())?;
    let close: i64 = close.parse().map_err(|_| invalid())?;
    TimeWindow::new(open, close).ok_or_else(invalid)
}

struct RequestLine {
    customer: String,
    demand: i32,
    visits: Vec<(usize, TimeWindow)>,
}

/// Dense numbering of location names, bounded by the declared count.
struct Locations {
    declared: usize,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Locations {
    fn new(declared: usize) -> Self {
        Self {
            declared,
            names: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn intern(&mut self, line: usize, name: &str) -> Result<usize, ParseError> {
        if let Some(&idx) = self.index.get(name) {
            return Ok(idx);
        }
        if self.names.len() >= self.declared {
            return Err(ParseError::at(
                line,
                ParseErrorKind::TooManyLocations {
                    declared: self.declared,
                },
            ));
        }
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), self.names.len() - 1);
        Ok(self.names.len() - 1)
    }

    fn lookup(&self, line: usize, name: &str) -> Result<usize, ParseError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::at(line, ParseErrorKind::UnknownLocation(name.to_string())))
    }
}

/// Parses an instance from its text form.
///
/// # Examples
///
/// ```
/// use u_vrptw::io::instance::parse_instance;
///
/// let text = "\
/// PARAMETERS
/// 1 2 100 10
/// REQUESTS
/// 0 0 D [0,100]
/// c1 3 L1 [0,50]
/// 0 0 D [0,100]
/// COORDINATES
/// D 0 0
/// L1 3 4
/// TRAVEL
/// (D, L1) 5 7
/// (L1, D) 5 7
/// ";
/// let loaded = parse_instance(text).unwrap();
/// let inst = &loaded.instance;
/// assert_eq!(inst.customers().len(), 1);
/// assert_eq!(inst.travel().cost(0, 1), 7);
/// assert_eq!(inst.travel().distance(0, 1), 5.0);
/// assert_eq!(loaded.customer_name(1), Some("c1"));
/// ```
pub fn parse_instance(text: &str) -> Result<LoadedInstance, ParseError> {
    let mut header: Option<(usize, usize, i64, i32)> = None;
    let mut locations = Locations::new(0);
    let mut request_lines: Vec<RequestLine> = Vec::new();
    let mut coordinates: Vec<(usize, Coordinate)> = Vec::new();
    let mut travel_lines: Vec<(usize, usize, Rate)> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let tokens = tokenize(raw);
        if tokens.is_empty() {
            continue;
        }

        if header.is_none() {
            if tokens.len() == 4 && tokens.iter().all(|t| t.parse::<i64>().is_ok()) {
                let customers = number(line, &tokens[0])?;
                let declared = number(line, &tokens[1])?;
                header = Some((
                    customers,
                    declared,
                    number(line, &tokens[2])?,
                    number(line, &tokens[3])?,
                ));
                locations = Locations::new(declared);
            } else if is_request_line(&tokens) {
                return Err(ParseError::at(line, ParseErrorKind::MissingHeader));
            }
            continue;
        }

        if is_request_line(&tokens) {
            // customer demand (location [open,close])+
            if tokens.len() < 4 || tokens.len() % 2 != 0 {
                return Err(ParseError::at(line, ParseErrorKind::MalformedRequest));
            }
            let demand = number(line, &tokens[1])?;
            let mut visits = Vec::with_capacity((tokens.len() - 2) / 2);
            for pair in tokens[2..].chunks(2) {
                if is_window(&pair[0]) || !is_window(&pair[1]) {
                    return Err(ParseError::at(line, ParseErrorKind::MalformedRequest));
                }
                let loc = locations.intern(line, &pair[0])?;
                visits.push((loc, window(line, &pair[1])?));
            }
            request_lines.push(RequestLine {
                customer: tokens[0].clone(),
                demand,
                visits,
            });
        } else if tokens[0].starts_with('(') {
            // (from, to) time cost
            if tokens.len() != 3 {
                return Err(ParseError::at(line, ParseErrorKind::MalformedTravel));
            }
            let pair = tokens[0]
                .strip_prefix('(')
                .and_then(|t| t.strip_suffix(')'))
                .and_then(|t| t.split_once(','))
                .ok_or_else(|| ParseError::at(line, ParseErrorKind::MalformedTravel))?;
            let from = locations.lookup(line, pair.0)?;
            let to = locations.lookup(line, pair.1)?;
            let rate = Rate::new(number(line, &tokens[1])?, number(line, &tokens[2])?);
            travel_lines.push((from, to, rate));
        } else if tokens.len() == 3
            && !request_lines.is_empty()
            && tokens[1].parse::<f64>().is_ok()
            && tokens[2].parse::<f64>().is_ok()
        {
            let loc = locations.intern(line, &tokens[0])?;
            coordinates.push((loc, Coordinate::new(number(line, &tokens[1])?, number(line, &tokens[2])?)));
        }
    }

    let (customer_count, declared, horizon, capacity) =
        header.ok_or_else(|| ParseError::global(ParseErrorKind::MissingHeader))?;
    if request_lines.is_empty() {
        return Err(ParseError::global(ParseErrorKind::MissingDepot));
    }

    let mut coords = vec![Coordinate::default(); declared];
    for &(loc, c) in &coordinates {
        coords[loc] = c;
    }
    let mut travel = TravelRelation::new(declared);
    for (from, to, rate) in travel_lines {
        travel.set(from, to, rate);
    }
    travel.fill_distances(&coords);

    let depot = |rl: &RequestLine| {
        let (loc, tw) = rl.visits[0];
        Request::new(0, loc, rl.demand, tw).with_coordinate(coords[loc])
    };
    let last = request_lines.len() - 1;
    let mut requests = vec![depot(&request_lines[0])];
    let mut customer_names: Vec<String> = Vec::new();
    let mut customer_ids: HashMap<&str, usize> = HashMap::new();
    for rl in request_lines.iter().take(last).skip(1) {
        let id = *customer_ids.entry(rl.customer.as_str()).or_insert_with(|| {
            customer_names.push(rl.customer.clone());
            customer_names.len()
        });
        for &(loc, tw) in &rl.visits {
            requests.push(Request::new(id, loc, rl.demand, tw).with_coordinate(coords[loc]));
        }
    }
    requests.push(depot(&request_lines[last]));

    let parameters = Parameters::new(customer_count, declared, horizon, capacity);
    let instance = Instance::new(parameters, requests, travel)
        .map_err(|e| ParseError::global(ParseErrorKind::Instance(e)))?;

    let mut location_names = locations.names;
    location_names.resize_with(declared, String::new);

    Ok(LoadedInstance {
        instance,
        customer_names,
        location_names,
    })
}

/// Reads and parses an instance file.
pub fn load_instance(path: impl AsRef<Path>) -> Result<LoadedInstance, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        ParseError::global(ParseErrorKind::Io(format!("{}: {e}", path.display())))
    })?;
    parse_instance(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
NUMBER OF CUSTOMERS\tNUMBER OF LOCATIONS\tTIME HORIZON\tCAPACITY
2 3 200 10

CUSTOMER\tDEMAND\tLOCATION [OPEN, CLOSE]
depot 0\tD [0, 200]
c1 3\tL1 [0, 100]\tL2 [0, 100]
c2 4\tL2 [10, 50]
depot 0\tD [0, 200]

LOCATION\tX\tY
D 0 0
L1 3 4
L2 6 8

TRAVEL
(D, L1) 5 5
(L1, D) 5 5
(D, L2) 8 8
(L2, D) 8 8
(L1, L2) 4 4
(L2, L1) 4 4
";

    #[test]
    fn test_tokenize_groups() {
        assert_eq!(tokenize("c1 3\tL1 [0, 100]"), vec!["c1", "3", "L1", "[0,100]"]);
        assert_eq!(tokenize("(D, L1) 5 7"), vec!["(D,L1)", "5", "7"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_parse_sample() {
        let loaded = parse_instance(SAMPLE).expect("valid sample");
        let inst = &loaded.instance;
        assert_eq!(inst.parameters().time_horizon(), 200);
        assert_eq!(inst.parameters().vehicle_capacity(), 10);
        assert_eq!(inst.requests().len(), 5);
        assert_eq!(inst.customers().len(), 2);
        assert_eq!(inst.customer(0).alternatives(), &[1, 2]);
        assert_eq!(inst.request(3).time_window().open(), 10);
        assert_eq!(inst.travel().time(1, 2), 4);
        assert_eq!(inst.travel().distance(0, 2), 10.0);
        assert_eq!(loaded.customer_name(3), Some("c2"));
        assert_eq!(loaded.customer_name(0), None);
        assert_eq!(loaded.location_name(2), "L2");
        assert_eq!(loaded.location_names, vec!["D", "L1", "L2"]);
    }

    #[test]
    fn test_parse_single_depot_line() {
        let text = "1 2 50 5\n0 0 D [0,50]\nc 1 X [0,40]\n";
        // the customer line is the last request line, so it becomes the end depot
        let err = parse_instance(text).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Instance(_)));
    }

    #[test]
    fn test_parse_missing_header() {
        let err = parse_instance("0 0 D [0,100]\n").unwrap_err();
        assert_eq!(err.line, Some(1));
        assert_eq!(err.kind, ParseErrorKind::MissingHeader);
        assert_eq!(
            parse_instance("").unwrap_err().kind,
            ParseErrorKind::MissingHeader
        );
    }

    #[test]
    fn test_parse_invalid_window() {
        let err = parse_instance("0 1 10 5\n0 0 D [10,0]\n").unwrap_err();
        assert_eq!(err.line, Some(2));
        assert!(matches!(err.kind, ParseErrorKind::InvalidWindow(_)));
        assert_eq!(err.to_string(), "line 2: invalid time window \"[10,0]\"");
    }

    #[test]
    fn test_parse_unknown_travel_location() {
        let text = "0 1 10 5\n0 0 D [0,10]\n(D, Q) 1 1\n";
        let err = parse_instance(text).unwrap_err();
        assert_eq!(err.line, Some(3));
        assert_eq!(err.kind, ParseErrorKind::UnknownLocation("Q".into()));
    }

    #[test]
    fn test_parse_too_many_locations() {
        let text = "1 1 10 5\n0 0 D [0,10]\nc 1 X [0,10]\n0 0 D [0,10]\n";
        let err = parse_instance(text).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooManyLocations { declared: 1 });
    }

    #[test]
    fn test_parse_bad_travel_time() {
        let text = "0 1 10 5\n0 0 D [0,10]\n(D, D) x 1\n";
        let err = parse_instance(text).unwrap_err();
        assert_eq!(err.line, Some(3));
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber("x".into()));
    }

    #[test]
    fn test_parse_odd_request_tokens() {
        let text = "0 1 10 5\n0 0 D [0,10] extra\n";
        let err = parse_instance(text).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedRequest);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_instance("/nonexistent/instance.txt").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Io(_)));
    }
}
