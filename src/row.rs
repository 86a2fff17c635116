//! Recognizing instruction rows in a table and pulling out their raw fields.
//!
//! Two row formats exist. Legacy tables are pipe delimited with the mnemonic first:
//! ```text
//! |LDA    |86|--**0-|----X-|2|Load accumulator|notes|
//! ```
//! Current tables lead with the opcode and name the addressing mode:
//! ```text
//!  |  86    | LDA      | IMM      |  2  |  2  | -**0- |
//! ```
//! Anything that doesn't look like a row (headers, separators, prose) is simply not matched.
use super::fields::{CCFlag, CURRENT_CC_LAYOUT, LEGACY_CC_LAYOUT};
use super::*;

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    // the two digit hex opcode anchors both formats. Legacy columns are bounded by pipes and
    // captured raw (spaces are positions, widths are checked by the decoder). The current
    // format pads its effect column, so it takes exactly five characters after the padding.
    static ref RE_LEGACY_ROW: Regex =
        Regex::new(r"^\|([^|]*)\|([0-9A-Fa-f]{2})\|([^|]*)\|([^|]*)\|([^|]*)\|([^|]*)\|(?:([^|]*)\|)?").unwrap();
    static ref RE_CURRENT_ROW: Regex =
        Regex::new(r"^\s*\|\s*([0-9A-Fa-f]{2})[^|]*\|\s*(\S+)\s*\|\s*(\w+)\s*\|([^|]*)\|([^|]*)\|\s+([^|]{5})").unwrap();
}

/// The meaning of a column within a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRole {
    Mnemonic,
    Opcode,
    /// condition code effect symbols
    Effects,
    /// legacy 'X'/'-' addressing mode flags
    Modes,
    /// current-format addressing mode name (e.g. IMM)
    ModeName,
    Cycles,
    Bytes,
    Description,
    Notes,
}

#[rustfmt::skip]
static LEGACY_ROLES: [FieldRole; 7] = [
    FieldRole::Mnemonic, FieldRole::Opcode, FieldRole::Effects, FieldRole::Modes,
    FieldRole::Cycles, FieldRole::Description, FieldRole::Notes,
];
#[rustfmt::skip]
static CURRENT_ROLES: [FieldRole; 6] = [
    FieldRole::Opcode, FieldRole::Mnemonic, FieldRole::ModeName,
    FieldRole::Cycles, FieldRole::Bytes, FieldRole::Effects,
];

/// The supported row formats. Each owns its pattern and the role of each captured column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowFormat {
    Legacy,
    Current,
}
impl RowFormat {
    pub fn regex(&self) -> &'static Regex {
        match self {
            RowFormat::Legacy => &RE_LEGACY_ROW,
            RowFormat::Current => &RE_CURRENT_ROW,
        }
    }
    /// Roles of the captured columns, in capture order.
    pub fn roles(&self) -> &'static [FieldRole] {
        match self {
            RowFormat::Legacy => &LEGACY_ROLES,
            RowFormat::Current => &CURRENT_ROLES,
        }
    }
    pub fn field_count(&self) -> usize { self.roles().len() }
    /// Flag order of this format's effect column.
    pub fn cc_layout(&self) -> &'static [CCFlag] {
        match self {
            RowFormat::Legacy => LEGACY_CC_LAYOUT,
            RowFormat::Current => CURRENT_CC_LAYOUT,
        }
    }
    /// Try to match a single line. `None` means the line is not a row of this format.
    pub fn match_line(&self, line: &str, line_num: usize) -> Option<RawRow> {
        let caps = self.regex().captures(line)?;
        let fields = self
            .roles()
            .iter()
            .enumerate()
            .filter_map(|(i, &role)| {
                caps.get(i + 1).map(|m| RawField {
                    role,
                    text: m.as_str().to_string(),
                    span: m.range(),
                })
            })
            .collect();
        Some(RawRow {
            format: *self,
            line: line_num,
            fields,
        })
    }
}
impl fmt::Display for RowFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RowFormat::Legacy => write!(f, "legacy"),
            RowFormat::Current => write!(f, "current"),
        }
    }
}

/// Which row formats to try on each line.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatChoice {
    Auto,
    Legacy,
    Current,
}
impl FormatChoice {
    pub fn formats(&self) -> &'static [RowFormat] {
        match self {
            FormatChoice::Auto => &[RowFormat::Legacy, RowFormat::Current],
            FormatChoice::Legacy => &[RowFormat::Legacy],
            FormatChoice::Current => &[RowFormat::Current],
        }
    }
}

/// One raw (undecoded) column of a matched row.
#[derive(Debug, Clone)]
pub struct RawField {
    pub role: FieldRole,
    pub text: String,
    /// byte range of the column within the source line
    pub span: Range<usize>,
}

/// A line that matched one of the row formats.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub format: RowFormat,
    /// 1-based line number in the table
    pub line: usize,
    pub fields: Vec<RawField>,
}
impl RawRow {
    pub fn get(&self, role: FieldRole) -> Option<&str> {
        self.fields.iter().find(|f| f.role == role).map(|f| f.text.as_str())
    }
    /// Like get() but the field is required.
    pub fn field(&self, role: FieldRole) -> Result<&str, Error> {
        self.get(role)
            .ok_or_else(|| general_err!(format!("{} row has no {:?} column", self.format, role)))
    }
}
impl fmt::Display for RawRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} row:", self.format)?;
        for fld in &self.fields {
            write!(f, " {:?}@{}..{}=\"{}\"", fld.role, fld.span.start, fld.span.end, fld.text.trim())?;
        }
        Ok(())
    }
}

/// Try each format allowed by `choice` in turn; the first one to match wins.
pub fn match_line(line: &str, line_num: usize, choice: FormatChoice) -> Option<RawRow> {
    choice.formats().iter().find_map(|f| f.match_line(line, line_num))
}
