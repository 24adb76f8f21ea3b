use std::collections::{BTreeMap, HashSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Schema constants
// ---------------------------------------------------------------------------

/// Name given to the identifier column, whatever the source header says.
pub const NAME_COLUMN: &str = "Name";

/// The nine mobility/stability tests, in radar order.
pub const MOBILITY_METRICS: [&str; 9] = [
    "Deep Squat",
    "Hurdle Step",
    "Inline lunge",
    "Shoulder mobility DA",
    "Shoulder mobility NDA",
    "Leg Raise DA",
    "Leg Raise NDA",
    "TS Push Up",
    "Rotary Stability",
];

pub const CM_JUMP_COLUMN: &str = "CM Jump (cm)";
pub const SQUAT_JUMP_COLUMN: &str = "Squat Jump (cm)";

/// Every column (besides the identifier) a source file must carry.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    MOBILITY_METRICS
        .into_iter()
        .chain([CM_JUMP_COLUMN, SQUAT_JUMP_COLUMN])
}

// ---------------------------------------------------------------------------
// SentinelCode – placeholder written instead of a measurement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentinelCode {
    /// `L` – the athlete was injured.
    Injured,
    /// `NP` – the athlete did not participate.
    DidNotParticipate,
}

impl SentinelCode {
    pub const ALL: [SentinelCode; 2] = [SentinelCode::Injured, SentinelCode::DidNotParticipate];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(SentinelCode::Injured),
            "NP" => Some(SentinelCode::DidNotParticipate),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            SentinelCode::Injured => "L",
            SentinelCode::DidNotParticipate => "NP",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SentinelCode::Injured => "injured",
            SentinelCode::DidNotParticipate => "did not participate",
        }
    }
}

// ---------------------------------------------------------------------------
// Cell – a single classified spreadsheet value
// ---------------------------------------------------------------------------

/// A spreadsheet cell, classified once when the file is read.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Numeric(f64),
    Sentinel(SentinelCode),
    Text(String),
    Empty,
}

impl Cell {
    /// Classify raw text: blank → `Empty`, `L`/`NP` → `Sentinel`,
    /// anything parseable as a number → `Numeric`, the rest → `Text`.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Empty;
        }
        if let Some(code) = SentinelCode::from_code(s) {
            return Cell::Sentinel(code);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Numeric(v),
            _ => Cell::Text(s.to_string()),
        }
    }

    /// A typed number from a reader. NaN and infinities are not
    /// measurements, so they become `Text` and never reach the charts.
    pub fn number(v: f64) -> Self {
        if v.is_finite() {
            Cell::Numeric(v)
        } else {
            Cell::Text(v.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Numeric(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a trailing `.0` so numeric
            // identifiers read the way they were typed.
            Cell::Numeric(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Cell::Numeric(v) => write!(f, "{v}"),
            Cell::Sentinel(code) => write!(f, "{}", code.code()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Empty => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// AthleteRecord – one row of the assessment sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AthleteRecord {
    /// Value of the identifier column.
    pub name: String,
    /// Remaining columns: header → value.
    pub cells: BTreeMap<String, Cell>,
}

impl AthleteRecord {
    pub fn cell(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Numeric value of `column`, `None` for sentinels, text, blanks and
    /// absent columns.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.cell(column).and_then(Cell::as_f64)
    }
}

// ---------------------------------------------------------------------------
// AssessmentTable – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The whole assessment sheet, rows in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentTable {
    /// Header row after normalisation; the first entry is always [`NAME_COLUMN`].
    pub columns: Vec<String>,
    pub rows: Vec<AthleteRecord>,
}

impl AssessmentTable {
    /// Build a table from a header row and raw rows of classified cells.
    ///
    /// The first header is replaced by [`NAME_COLUMN`]. Rows with a blank
    /// identifier are dropped. When a header repeats, the leftmost column
    /// with that name wins.
    pub fn from_rows(headers: Vec<String>, raw_rows: Vec<Vec<Cell>>) -> Self {
        let mut columns = headers;
        match columns.first_mut() {
            Some(first) => *first = NAME_COLUMN.to_string(),
            None => columns.push(NAME_COLUMN.to_string()),
        }

        {
            let mut seen = HashSet::new();
            for column in columns.iter().skip(1).filter(|c| !seen.insert(c.as_str())) {
                log::warn!("Column '{column}' appears more than once; keeping the first");
            }
        }

        let mut rows = Vec::with_capacity(raw_rows.len());
        for (row_no, raw) in raw_rows.into_iter().enumerate() {
            let mut values = raw.into_iter();
            let name = values.next().unwrap_or(Cell::Empty).to_string();
            if name.is_empty() {
                log::warn!("Skipping row {row_no}: blank athlete identifier");
                continue;
            }
            let mut cells = BTreeMap::new();
            for (column, cell) in columns
                .iter()
                .skip(1)
                .zip(values.chain(std::iter::repeat(Cell::Empty)))
            {
                cells.entry(column.clone()).or_insert(cell);
            }
            rows.push(AthleteRecord { name, cells });
        }

        AssessmentTable { columns, rows }
    }

    /// Number of athlete rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Identifiers in file order, each listed once.
    pub fn athlete_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Identifiers that occur on more than one row.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.name.as_str())
            .filter(|name| !seen.insert(*name) && reported.insert(*name))
            .collect()
    }
}
