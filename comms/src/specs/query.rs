use std::{cmp::Ordering, error::Error, fmt, io};

use bytemuck::{Pod, Zeroable};

use super::FuncId;
use crate::Frame;

/// Reasons a query is not well-formed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryErr {
    EmptySteps,
    ReversedRange { start: f64, end: f64 },
    UnknownFunction(u64),
}

impl fmt::Display for QueryErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryErr::EmptySteps => write!(f, "the amount of steps must be positive"),
            QueryErr::ReversedRange { start, end } => {
                write!(f, "range end {end} is smaller than its start {start}")
            }
            QueryErr::UnknownFunction(id) => write!(f, "unknown function id {id}"),
        }
    }
}

impl Error for QueryErr {}

impl From<QueryErr> for io::Error {
    fn from(value: QueryErr) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, value)
    }
}

/// A request to integrate one function over `[start, end)` using `steps` trapezoids.
///
/// A `Query` can only be built in its valid form: `end >= start`, `steps > 0`
/// and a registered function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    start: f64,
    end: f64,
    steps: u64,
    func_id: FuncId,
}

impl Query {
    /// Creates a new validated `Query`.
    ///
    /// # Errors
    /// Returns a `QueryErr` describing the first violated constraint.
    pub fn new(start: f64, end: f64, steps: u64, func_id: FuncId) -> Result<Self, QueryErr> {
        // NaN bounds are unordered and never satisfy `end >= start`.
        if let None | Some(Ordering::Less) = end.partial_cmp(&start) {
            return Err(QueryErr::ReversedRange { start, end });
        }

        if steps == 0 {
            return Err(QueryErr::EmptySteps);
        }

        Ok(Self {
            start,
            end,
            steps,
            func_id,
        })
    }

    /// Same as `Query::new` but takes the raw numeric function id.
    pub fn from_parts(start: f64, end: f64, steps: u64, func_id: u64) -> Result<Self, QueryErr> {
        Self::new(start, end, steps, FuncId::try_from(func_id)?)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn func_id(&self) -> FuncId {
        self.func_id
    }
}

/// Wire layout of a `Query`: `[start: f64][end: f64][steps: u64][func_id: u64]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct QueryFrame {
    pub start: f64,
    pub end: f64,
    pub steps: u64,
    pub func_id: u64,
}

impl Frame for Query {
    type Raw = QueryFrame;

    fn to_raw(&self) -> QueryFrame {
        QueryFrame {
            start: self.start,
            end: self.end,
            steps: self.steps,
            func_id: self.func_id.id(),
        }
    }

    fn from_raw(raw: QueryFrame) -> io::Result<Self> {
        let query = Query::from_parts(raw.start, raw.end, raw.steps, raw.func_id)?;
        Ok(query)
    }
}
