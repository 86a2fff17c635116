//! Feeding a whole table through the row matcher and instruction builder.
//!
//! Decoding a row either yields a record or an error. What happens to the error is
//! up to the RowPolicy: the row can be skipped (and reported) or the whole run aborted.
use super::instruction::InstructionRecord;
use super::row::{self, FormatChoice};
use super::*;

use std::fs::File;
use std::io::{self, BufRead, BufReader};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnError {
    /// stop decoding and return the error
    Abort,
    /// warn, remember the error and carry on with the next line
    Skip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowPolicy {
    /// rows that are both inherent and operand-taking
    pub on_conflict: OnError,
    /// every other row error
    pub on_field_error: OnError,
    /// treat unrecognized effect symbols as a row error
    pub reject_unknown_effects: bool,
}
impl Default for RowPolicy {
    fn default() -> Self {
        RowPolicy {
            on_conflict: OnError::Abort,
            on_field_error: OnError::Skip,
            reject_unknown_effects: false,
        }
    }
}
impl RowPolicy {
    /// Map the --keep-going/--strict switches to a policy. --strict wins over --keep-going.
    pub fn from_flags(keep_going: bool, strict: bool, reject_unknown_effects: bool) -> Self {
        RowPolicy {
            on_conflict: if keep_going && !strict { OnError::Skip } else { OnError::Abort },
            on_field_error: if strict { OnError::Abort } else { OnError::Skip },
            reject_unknown_effects,
        }
    }
    pub fn action(&self, kind: ErrorKind) -> OnError {
        match kind {
            ErrorKind::ConflictingAddressingModes => self.on_conflict,
            _ => self.on_field_error,
        }
    }
}

/// The outcome of decoding a table.
#[derive(Debug, Default)]
pub struct Table {
    /// decoded records in table order
    pub records: Vec<InstructionRecord>,
    /// errors for rows that were skipped
    pub rejected: Vec<Error>,
    /// number of lines read
    pub lines: usize,
    /// lines that weren't rows at all
    pub unmatched: usize,
}
impl Table {
    pub fn with_opcode(&self, op: u8) -> impl Iterator<Item = &InstructionRecord> + '_ {
        self.records.iter().filter(move |r| r.opcode == op)
    }
}

pub fn decode_table<I, T>(lines: I, choice: FormatChoice, policy: &RowPolicy) -> Result<Table, Error>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut table = Table::default();
    for (i, line) in lines.into_iter().enumerate() {
        let line_num = i + 1;
        table.lines += 1;
        let raw = match row::match_line(line.as_ref(), line_num, choice) {
            Some(raw) => raw,
            None => {
                table.unmatched += 1;
                continue;
            }
        };
        verbose_println!("{:4}: {}", line_num, raw);
        let result = InstructionRecord::build(&raw).and_then(|r| {
            if policy.reject_unknown_effects {
                r.check_effects()?;
            }
            Ok(r)
        });
        match result {
            Ok(r) => table.records.push(r),
            Err(e) => match policy.action(e.kind) {
                OnError::Abort => return Err(e),
                OnError::Skip => {
                    warn!("skipping row: {}", e);
                    table.rejected.push(e);
                }
            },
        }
    }
    Ok(table)
}

pub fn read_table(path: &Path, choice: FormatChoice, policy: &RowPolicy) -> Result<Table, Error> {
    let lines = BufReader::new(File::open(path)?)
        .lines()
        .collect::<Result<Vec<String>, io::Error>>()?;
    decode_table(lines, choice, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &[&str] = &[
        "|Mnem   |Op|IHNZVC|IEXDMR|Cy|Description|Notes|",
        "|-------|--|------|------|--|-----------|-----|",
        "|LDA    |86|--**0-|----X-|2|Load A immediate|",
        "|LDA    |86|--**0-|---X--|4|Load A again (duplicate opcode)|",
        "|BAD    |01|------|X--X--|2|Inherent and direct|",
        "|LDB    |C6|--**0-|----X-|2x|Load B immediate|",
        "",
        "|CLRA   |4F|--0100|X-----|2|Clear A|",
        "|NOP    |12|------|X-----|2|No operation|",
    ];
    const SKIP_ALL: RowPolicy = RowPolicy {
        on_conflict: OnError::Skip,
        on_field_error: OnError::Skip,
        reject_unknown_effects: false,
    };

    #[test]
    fn policy_from_flags() {
        use OnError::*;
        // (keep_going, strict) -> (on_conflict, on_field_error)
        for (keep_going, strict, conflict, field) in [
            (false, false, Abort, Skip),
            (true, false, Skip, Skip),
            (false, true, Abort, Abort),
            (true, true, Abort, Abort),
        ] {
            let p = RowPolicy::from_flags(keep_going, strict, false);
            assert_eq!((p.on_conflict, p.on_field_error), (conflict, field), "{} {}", keep_going, strict);
            assert!(!p.reject_unknown_effects);
        }
        assert_eq!(RowPolicy::from_flags(false, false, false), RowPolicy::default());
        assert!(RowPolicy::from_flags(false, false, true).reject_unknown_effects);
    }
    #[test]
    fn conflicts_abort_by_default() {
        let e = decode_table(ROWS, FormatChoice::Auto, &RowPolicy::default()).unwrap_err();
        assert_eq!(e.kind, ErrorKind::ConflictingAddressingModes);
        assert_eq!(e.line, Some(5));
    }
    #[test]
    fn skipped_rows_are_reported() {
        let table = decode_table(ROWS, FormatChoice::Auto, &SKIP_ALL).unwrap();
        let names: Vec<&str> = table.records.iter().map(|r| r.mnemonic.as_str()).collect();
        assert_eq!(names, vec!["LDA", "LDA", "CLRA", "NOP"]);
        let kinds: Vec<(ErrorKind, Option<usize>)> = table.rejected.iter().map(|e| (e.kind, e.line)).collect();
        assert_eq!(
            kinds,
            vec![
                (ErrorKind::ConflictingAddressingModes, Some(5)),
                (ErrorKind::MalformedNumeric, Some(6))
            ]
        );
        assert_eq!(table.lines, ROWS.len());
        assert_eq!(table.unmatched, 3);
        assert_eq!(table.with_opcode(0x86).count(), 2);
    }
    #[test]
    fn field_errors_can_abort() {
        let policy = RowPolicy {
            on_field_error: OnError::Abort,
            ..SKIP_ALL
        };
        let e = decode_table(ROWS, FormatChoice::Auto, &policy).unwrap_err();
        assert_eq!(e.kind, ErrorKind::MalformedNumeric);
        assert_eq!(e.line, Some(6));
    }
    #[test]
    fn unknown_effects_can_be_rejected() {
        let policy = RowPolicy {
            reject_unknown_effects: true,
            ..SKIP_ALL
        };
        let table = decode_table(ROWS, FormatChoice::Auto, &policy).unwrap();
        assert!(table.records.iter().all(|r| r.mnemonic != "CLRA"));
        assert_eq!(
            table.rejected.last().map(|e| (e.kind, e.line)),
            Some((ErrorKind::UnknownEffectSymbol, Some(8)))
        );
    }
    #[test]
    fn non_rows_are_not_errors() {
        let lines = vec!["", "-----------", "| just | some | text |"];
        let table = decode_table(lines, FormatChoice::Auto, &RowPolicy::default()).unwrap();
        assert!(table.records.is_empty());
        assert!(table.rejected.is_empty());
        assert_eq!(table.unmatched, 3);
    }
}
