//! Building complete instruction records from matched rows.
use super::fields::*;
use super::row::{FieldRole, RawRow, RowFormat};
use super::*;

/// Bit masks summarizing a ConditionCodeEffects: each is the OR of the bits of the flags
/// having that effect. Bit positions come from the condition code table (I=0 .. C=5).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectMasks {
    /// flags forced to zero ('0')
    pub set: u8,
    /// never populated from a table symbol
    pub reset: u8,
    pub affected: u8,
    pub unaffected: u8,
    pub undefined: u8,
    /// 'E' flags
    pub arch: u8,
    /// flags with an unrecognized symbol
    pub unknown: u8,
}
impl EffectMasks {
    pub fn fold<I>(effects: I) -> Self
    where
        I: IntoIterator<Item = (CCFlag, Effect)>,
    {
        effects.into_iter().fold(EffectMasks::default(), |mut m, (flag, effect)| {
            let bit = flag.mask();
            match effect {
                Effect::SetToZero => m.set |= bit,
                Effect::Reset => m.reset |= bit,
                Effect::Affected => m.affected |= bit,
                Effect::Unaffected => m.unaffected |= bit,
                Effect::Undefined => m.undefined |= bit,
                Effect::ArchSpecific => m.arch |= bit,
                Effect::Unknown(_) => m.unknown |= bit,
            }
            m
        })
    }
}
impl fmt::Display for EffectMasks {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "set:{:02x} reset:{:02x} affected:{:02x} unaffected:{:02x} undefined:{:02x} arch:{:02x}",
            self.set, self.reset, self.affected, self.unaffected, self.undefined, self.arch
        )?;
        if self.unknown != 0 {
            write!(f, " {}:{:02x}", red!("unknown"), self.unknown)?;
        }
        Ok(())
    }
}

/// A fully decoded and validated row of an instruction table.
/// Records are built once by `build` and not modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionRecord {
    /// format of the row this record came from
    pub format: RowFormat,
    /// 1-based line number of that row
    pub line: usize,
    pub mnemonic: String,
    pub opcode: u8,
    pub cycles: u32,
    /// instruction length (current format only)
    pub bytes: Option<u32>,
    pub description: String,
    pub notes: String,
    pub modes: AddressingModeSet,
    /// addressing mode as named in the row (current format only)
    pub mode_name: Option<String>,
    pub effects: ConditionCodeEffects,
    pub masks: EffectMasks,
}

impl InstructionRecord {
    /// Decode every field of `row` and assemble the record. The first failure is returned,
    /// tagged with the row's line number.
    pub fn build(row: &RawRow) -> Result<Self, Error> { Self::from_fields(row).map_err(|e| e.at_line(row.line)) }

    fn from_fields(row: &RawRow) -> Result<Self, Error> {
        // mode conflicts are reported ahead of any other field error
        let (modes, mode_name) = match row.get(FieldRole::Modes) {
            Some(flags) => (AddressingModeSet::decode(flags)?, None),
            None => {
                let name = decode_text(row.field(FieldRole::ModeName)?);
                (AddressingModeSet::from_name(&name)?, Some(name))
            }
        };
        let opcode = decode_opcode(row.field(FieldRole::Opcode)?)?;
        let cycles = decode_count(row.field(FieldRole::Cycles)?, "cycle count")?;
        let bytes = row
            .get(FieldRole::Bytes)
            .map(|b| decode_count(b, "byte length"))
            .transpose()?;
        let effects = ConditionCodeEffects::decode(row.field(FieldRole::Effects)?, row.format.cc_layout())?;
        Ok(InstructionRecord {
            format: row.format,
            line: row.line,
            mnemonic: decode_text(row.field(FieldRole::Mnemonic)?),
            opcode,
            cycles,
            bytes,
            description: row.get(FieldRole::Description).map(decode_text).unwrap_or_default(),
            notes: row.get(FieldRole::Notes).map(decode_text).unwrap_or_default(),
            modes,
            mode_name,
            effects,
            masks: EffectMasks::fold(effects.iter()),
        })
    }

    /// Fails if any flag carries an unrecognized effect symbol.
    pub fn check_effects(&self) -> Result<(), Error> {
        match self.effects.unknown().first() {
            Some(&(flag, c)) => Err(row_err!(
                ErrorKind::UnknownEffectSymbol,
                "{} (${:02x}): unknown effect symbol '{}' for the {} flag",
                self.mnemonic,
                self.opcode,
                c,
                flag.info().name
            )
            .at_line(self.line)),
            None => Ok(()),
        }
    }

    /// Render this record as a row of the format it was read from.
    pub fn to_row(&self) -> Result<String, Error> {
        let effects = self.effects.to_symbols(self.format.cc_layout())?;
        Ok(match self.format {
            RowFormat::Legacy => format!(
                "|{:<7}|{:02X}|{}|{}|{}|{}|{}|",
                self.mnemonic,
                self.opcode,
                effects,
                self.modes.to_flag_string(),
                self.cycles,
                self.description,
                self.notes
            ),
            RowFormat::Current => format!(
                " |  {:02X}    | {:<8} | {:<8} | {:>3} | {:>3} | {} |",
                self.opcode,
                self.mnemonic,
                self.mode_name.clone().unwrap_or_else(|| self.modes.to_string()),
                self.cycles,
                self.bytes.unwrap_or_default(),
                effects
            ),
        })
    }
}
impl fmt::Display for InstructionRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02x} : {:<6} : {:<8} : {:>2} cycles : ",
            self.opcode,
            self.mnemonic,
            self.modes.to_string(),
            self.cycles
        )?;
        match self.bytes {
            Some(b) => write!(f, "{} bytes", b)?,
            None => write!(f, "? bytes")?,
        }
        write!(f, " : {}", self.effects)
    }
}
