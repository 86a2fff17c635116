//! Decoding of individual table fields into typed values.
//!
//! Everything here works on the raw text of a single field. Cross-field checks
//! (and the assembly of a complete record) live in instruction.rs.
use super::*;

/// The condition code flags described by an instruction table.
/// The discriminant is the bit position used when building effect masks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CCFlag {
    I = 0,
    H = 1,
    N = 2,
    Z = 3,
    V = 4,
    C = 5,
}

/// Helper struct to map metadata about condition code flags.
pub struct CCInfo {
    pub mask: u8,
    pub short: char,
    pub name: &'static str,
}

/// Metadata for each condition code flag.
#[rustfmt::skip]
static CC_TABLE: [CCInfo; 6] = [
    CCInfo {mask: 0x01, short: 'I', name: "IRQ mask"},
    CCInfo {mask: 0x02, short: 'H', name: "half carry"},
    CCInfo {mask: 0x04, short: 'N', name: "negative"},
    CCInfo {mask: 0x08, short: 'Z', name: "zero"},
    CCInfo {mask: 0x10, short: 'V', name: "overflow"},
    CCInfo {mask: 0x20, short: 'C', name: "carry"},
];

/// Flag order of the effect column in legacy rows.
pub const LEGACY_CC_LAYOUT: &[CCFlag] = &[CCFlag::I, CCFlag::H, CCFlag::N, CCFlag::Z, CCFlag::V, CCFlag::C];
/// Flag order of the effect column in current rows (the IRQ mask is not listed).
pub const CURRENT_CC_LAYOUT: &[CCFlag] = &[CCFlag::H, CCFlag::N, CCFlag::Z, CCFlag::V, CCFlag::C];

impl CCFlag {
    pub const ALL: [CCFlag; 6] = [CCFlag::I, CCFlag::H, CCFlag::N, CCFlag::Z, CCFlag::V, CCFlag::C];
    pub fn info(&self) -> &'static CCInfo { &CC_TABLE[*self as usize] }
    pub fn mask(&self) -> u8 { self.info().mask }
}

/// How an instruction changes a single condition code flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// '-'
    Unaffected,
    /// '*' set or cleared according to the result
    Affected,
    /// '0'
    SetToZero,
    /// reserved; no table symbol decodes to this
    Reset,
    /// '?'
    Undefined,
    /// 'E' depends on the operand (e.g. CC restored from the stack)
    ArchSpecific,
    /// any other symbol; kept so the rest of the row can still be decoded
    Unknown(char),
}

#[rustfmt::skip]
static EFFECT_SYMBOLS: [(char, Effect); 5] = [
    ('-', Effect::Unaffected),
    ('*', Effect::Affected),
    ('0', Effect::SetToZero),
    ('?', Effect::Undefined),
    ('E', Effect::ArchSpecific),
];

impl Effect {
    pub fn from_symbol(c: char) -> Effect {
        EFFECT_SYMBOLS
            .iter()
            .find(|(s, _)| *s == c)
            .map_or(Effect::Unknown(c), |&(_, e)| e)
    }
    /// The table symbol for this effect. Reset has none.
    pub fn symbol(&self) -> Option<char> {
        match self {
            Effect::Unknown(c) => Some(*c),
            e => EFFECT_SYMBOLS.iter().find(|(_, se)| se == e).map(|&(s, _)| s),
        }
    }
}
impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.symbol().unwrap_or('r')) }
}

/// The effect an instruction has on each of the six condition code flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionCodeEffects {
    effects: [Effect; 6],
}
impl ConditionCodeEffects {
    /// Decode an effect column. The string must hold exactly one symbol per flag in `layout`
    /// (spaces included); flags missing from the layout are unaffected.
    pub fn decode(field: &str, layout: &[CCFlag]) -> Result<Self, Error> {
        let width = field.chars().count();
        if width != layout.len() {
            return Err(row_err!(
                ErrorKind::BadFieldWidth,
                "condition code field \"{}\" is {} characters wide, expected {}",
                field,
                width,
                layout.len()
            ));
        }
        Ok(Self::from_effects(
            layout.iter().zip(field.chars()).map(|(&flag, c)| (flag, Effect::from_symbol(c))),
        ))
    }
    pub fn from_effects<I>(effects: I) -> Self
    where
        I: IntoIterator<Item = (CCFlag, Effect)>,
    {
        let mut cce = ConditionCodeEffects {
            effects: [Effect::Unaffected; 6],
        };
        for (flag, effect) in effects {
            cce.effects[flag as usize] = effect;
        }
        cce
    }
    pub fn get(&self, flag: CCFlag) -> Effect { self.effects[flag as usize] }
    pub fn iter(&self) -> impl Iterator<Item = (CCFlag, Effect)> + '_ {
        CCFlag::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
    /// Flags carrying an unrecognized symbol, with the symbol.
    pub fn unknown(&self) -> Vec<(CCFlag, char)> {
        self.iter()
            .filter_map(|(f, e)| match e {
                Effect::Unknown(c) => Some((f, c)),
                _ => None,
            })
            .collect()
    }
    /// Render the effect column for `layout`.
    pub fn to_symbols(&self, layout: &[CCFlag]) -> Result<String, Error> {
        layout
            .iter()
            .map(|&f| {
                self.get(f).symbol().ok_or_else(|| {
                    general_err!(format!("{} flag has a reset effect, which has no table symbol", f.info().short))
                })
            })
            .collect()
    }
}
impl fmt::Display for ConditionCodeEffects {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (flag, effect) in self.iter() {
            write!(f, "{}{}", flag.info().short, effect)?;
        }
        Ok(())
    }
}

/// The addressing modes, in the column order of a legacy mode string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Inherent = 0,
    Extended,
    Indexed,
    Direct,
    Immediate,
    Relative,
}
impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Inherent,
        Mode::Extended,
        Mode::Indexed,
        Mode::Direct,
        Mode::Immediate,
        Mode::Relative,
    ];
    pub fn short(&self) -> &'static str {
        match self {
            Mode::Inherent => "INH",
            Mode::Extended => "EXT",
            Mode::Indexed => "IDX",
            Mode::Direct => "DIR",
            Mode::Immediate => "IMM",
            Mode::Relative => "REL",
        }
    }
    // case insensitive
    pub fn from_name(name: &str) -> Option<Mode> {
        match name.to_ascii_uppercase().as_str() {
            "INH" | "INHERENT" => Some(Mode::Inherent),
            "EXT" | "EXTENDED" => Some(Mode::Extended),
            "IDX" | "IND" | "INDEXED" => Some(Mode::Indexed),
            "DIR" | "DIRECT" => Some(Mode::Direct),
            "IMM" | "IMMEDIATE" => Some(Mode::Immediate),
            "REL" | "RELATIVE" | "LREL" => Some(Mode::Relative),
            _ => None,
        }
    }
}

/// The set of addressing modes an instruction row supports.
/// Inherent never appears together with any other mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddressingModeSet {
    modes: [bool; 6],
}
impl AddressingModeSet {
    pub const WIDTH: usize = 6;

    /// Decode a legacy mode column: one character per mode, 'X' (uppercase only) means enabled
    /// and anything else (including a space) means disabled.
    pub fn decode(field: &str) -> Result<Self, Error> {
        let width = field.chars().count();
        if width != Self::WIDTH {
            return Err(row_err!(
                ErrorKind::BadFieldWidth,
                "addressing mode field \"{}\" is {} characters wide, expected {}",
                field,
                width,
                Self::WIDTH
            ));
        }
        let mut modes = [false; 6];
        for (m, c) in modes.iter_mut().zip(field.chars()) {
            *m = c == 'X';
        }
        Self::new(modes)
    }
    /// Decode a current-format mode name (e.g. "IMM") into a single-mode set.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        Mode::from_name(name.trim()).map(Self::single).ok_or_else(|| {
            row_err!(
                ErrorKind::UnknownAddressingMode,
                "unrecognized addressing mode \"{}\"",
                name.trim()
            )
        })
    }
    pub fn new(modes: [bool; 6]) -> Result<Self, Error> {
        let set = AddressingModeSet { modes };
        if set.is_inherent() && set.iter().any(|m| m != Mode::Inherent) {
            return Err(row_err!(
                ErrorKind::ConflictingAddressingModes,
                "instruction is both inherent and operand-taking ({})",
                set
            ));
        }
        Ok(set)
    }
    pub fn single(mode: Mode) -> Self {
        let mut modes = [false; 6];
        modes[mode as usize] = true;
        AddressingModeSet { modes }
    }
    pub fn contains(&self, mode: Mode) -> bool { self.modes[mode as usize] }
    pub fn is_inherent(&self) -> bool { self.contains(Mode::Inherent) }
    /// Enabled modes in column order.
    pub fn iter(&self) -> impl Iterator<Item = Mode> + '_ { Mode::ALL.into_iter().filter(move |&m| self.contains(m)) }
    pub fn to_flag_string(&self) -> String { self.modes.iter().map(|&m| if m { 'X' } else { '-' }).collect() }
}
impl fmt::Display for AddressingModeSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|m| m.short()).collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(","))
        }
    }
}

/// Parse a one byte opcode written in hex (no prefix).
pub fn decode_opcode(field: &str) -> Result<u8, Error> {
    let field = field.trim();
    if field.is_empty() || field.len() > 2 || !field.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(row_err!(ErrorKind::MalformedOpcode, "invalid opcode \"{}\"", field));
    }
    u8::from_str_radix(field, 16).map_err(|e| row_err!(ErrorKind::MalformedOpcode, "invalid opcode \"{}\": {}", field, e))
}

/// Parse a decimal count such as cycles or bytes. `what` names the field in the error.
pub fn decode_count(field: &str, what: &str) -> Result<u32, Error> {
    let field = field.trim();
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
        return Err(row_err!(ErrorKind::MalformedNumeric, "invalid {} \"{}\"", what, field));
    }
    field
        .parse::<u32>()
        .map_err(|e| row_err!(ErrorKind::MalformedNumeric, "invalid {} \"{}\": {}", what, field, e))
}

pub fn decode_text(field: &str) -> String { field.trim().to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    const SYMBOLS: [char; 5] = ['-', '*', '0', '?', 'E'];

    #[test]
    fn opcodes() {
        assert_eq!(decode_opcode("1B").unwrap(), 27);
        assert_eq!(decode_opcode("00").unwrap(), 0);
        assert_eq!(decode_opcode("FF").unwrap(), 255);
        assert_eq!(decode_opcode(" a6 ").unwrap(), 0xa6);
        for bad in ["ZZ", "", "+1", "100", "0x1"] {
            assert_eq!(decode_opcode(bad).unwrap_err().kind, ErrorKind::MalformedOpcode, "{}", bad);
        }
    }
    #[test]
    fn counts() {
        assert_eq!(decode_count(" 11 ", "cycles").unwrap(), 11);
        assert_eq!(decode_count("0", "bytes").unwrap(), 0);
        for bad in ["", "4+", "-1", "2a", "99999999999"] {
            assert_eq!(decode_count(bad, "cycles").unwrap_err().kind, ErrorKind::MalformedNumeric, "{}", bad);
        }
    }
    #[test]
    fn text_is_trimmed() {
        assert_eq!(decode_text("  LDA   "), "LDA");
        assert_eq!(decode_text("   "), "");
    }
    #[test]
    fn single_modes() {
        for (i, &mode) in Mode::ALL.iter().enumerate() {
            let mut s: Vec<char> = "------".chars().collect();
            s[i] = 'X';
            let s: String = s.into_iter().collect();
            let set = AddressingModeSet::decode(&s).unwrap();
            for &other in &Mode::ALL {
                assert_eq!(set.contains(other), other == mode, "{} {:?}", s, other);
            }
            assert_eq!(set.to_flag_string(), s);
        }
    }
    #[test]
    fn inherent_conflicts() {
        // every mode string with inherent plus at least one other mode
        for bits in 1u8..32 {
            let s: String = std::iter::once('X')
                .chain((0..5).map(|b| if bits & (1 << b) != 0 { 'X' } else { '-' }))
                .collect();
            let e = AddressingModeSet::decode(&s).unwrap_err();
            assert_eq!(e.kind, ErrorKind::ConflictingAddressingModes, "{}", s);
        }
        assert!(AddressingModeSet::decode("X-----").unwrap().is_inherent());
        // operand-taking modes may be combined freely
        let set = AddressingModeSet::decode("-XXXX-").unwrap();
        assert_eq!(set.iter().count(), 4);
    }
    #[test]
    fn mode_chars_are_case_sensitive() {
        let set = AddressingModeSet::decode("xX----").unwrap();
        assert!(!set.is_inherent());
        assert!(set.contains(Mode::Extended));
    }
    #[test]
    fn spaces_are_mode_positions() {
        assert_eq!(AddressingModeSet::decode("X     ").unwrap(), AddressingModeSet::single(Mode::Inherent));
        assert_eq!(AddressingModeSet::decode(" X----").unwrap(), AddressingModeSet::single(Mode::Extended));
        assert_eq!(AddressingModeSet::decode("      ").unwrap(), AddressingModeSet::default());
    }
    #[test]
    fn mode_width() {
        for bad in ["-----", "-------", "", " -X---- "] {
            assert_eq!(AddressingModeSet::decode(bad).unwrap_err().kind, ErrorKind::BadFieldWidth);
        }
    }
    #[test]
    fn mode_names() {
        assert_eq!(AddressingModeSet::from_name("imm").unwrap(), AddressingModeSet::single(Mode::Immediate));
        assert_eq!(AddressingModeSet::from_name(" LREL ").unwrap(), AddressingModeSet::single(Mode::Relative));
        assert!(AddressingModeSet::from_name("INH").unwrap().is_inherent());
        assert_eq!(
            AddressingModeSet::from_name("IMPLIED").unwrap_err().kind,
            ErrorKind::UnknownAddressingMode
        );
    }
    #[test]
    fn effects_legacy_layout() {
        let cce = ConditionCodeEffects::decode("-*0?E-", LEGACY_CC_LAYOUT).unwrap();
        assert_eq!(cce.get(CCFlag::I), Effect::Unaffected);
        assert_eq!(cce.get(CCFlag::H), Effect::Affected);
        assert_eq!(cce.get(CCFlag::N), Effect::SetToZero);
        assert_eq!(cce.get(CCFlag::Z), Effect::Undefined);
        assert_eq!(cce.get(CCFlag::V), Effect::ArchSpecific);
        assert_eq!(cce.get(CCFlag::C), Effect::Unaffected);
        assert_eq!(cce.to_symbols(LEGACY_CC_LAYOUT).unwrap(), "-*0?E-");
    }
    #[test]
    fn effects_current_layout() {
        let cce = ConditionCodeEffects::decode("-**0*", CURRENT_CC_LAYOUT).unwrap();
        assert_eq!(cce.get(CCFlag::I), Effect::Unaffected);
        assert_eq!(cce.get(CCFlag::H), Effect::Unaffected);
        assert_eq!(cce.get(CCFlag::N), Effect::Affected);
        assert_eq!(cce.get(CCFlag::V), Effect::SetToZero);
        assert_eq!(cce.get(CCFlag::C), Effect::Affected);
        assert_eq!(
            ConditionCodeEffects::decode("-**0*-", CURRENT_CC_LAYOUT).unwrap_err().kind,
            ErrorKind::BadFieldWidth
        );
    }
    #[test]
    fn every_known_symbol_string_decodes() {
        let mut s = ['-'; 6];
        for n in 0..SYMBOLS.len().pow(6) {
            let mut k = n;
            for c in s.iter_mut() {
                *c = SYMBOLS[k % SYMBOLS.len()];
                k /= SYMBOLS.len();
            }
            let field: String = s.iter().collect();
            let cce = ConditionCodeEffects::decode(&field, LEGACY_CC_LAYOUT).unwrap();
            assert!(cce.unknown().is_empty());
            assert!(cce.iter().all(|(_, e)| e != Effect::Reset));
        }
    }
    #[test]
    fn unknown_symbol_is_kept_per_flag() {
        let cce = ConditionCodeEffects::decode("--0100", LEGACY_CC_LAYOUT).unwrap();
        assert_eq!(cce.get(CCFlag::Z), Effect::Unknown('1'));
        assert_eq!(cce.get(CCFlag::V), Effect::SetToZero);
        assert_eq!(cce.unknown(), vec![(CCFlag::Z, '1')]);
        // unknown symbols survive re-serialization
        assert_eq!(cce.to_symbols(LEGACY_CC_LAYOUT).unwrap(), "--0100");
    }
    #[test]
    fn spaces_are_effect_positions() {
        let cce = ConditionCodeEffects::decode(" *----", LEGACY_CC_LAYOUT).unwrap();
        assert_eq!(cce.get(CCFlag::I), Effect::Unknown(' '));
        assert_eq!(cce.get(CCFlag::H), Effect::Affected);
        assert_eq!(cce.unknown(), vec![(CCFlag::I, ' ')]);
        let cce = ConditionCodeEffects::decode("-* 0-", CURRENT_CC_LAYOUT).unwrap();
        assert_eq!(cce.get(CCFlag::Z), Effect::Unknown(' '));
        assert_eq!(cce.get(CCFlag::V), Effect::SetToZero);
        assert_eq!(
            ConditionCodeEffects::decode(" -**0- ", LEGACY_CC_LAYOUT).unwrap_err().kind,
            ErrorKind::BadFieldWidth
        );
    }
    #[test]
    fn reset_has_no_symbol() {
        let cce = ConditionCodeEffects::from_effects([(CCFlag::C, Effect::Reset)]);
        assert_eq!(cce.get(CCFlag::C), Effect::Reset);
        assert_eq!(cce.to_symbols(LEGACY_CC_LAYOUT).unwrap_err().kind, ErrorKind::General);
        assert!(cce.to_symbols(CURRENT_CC_LAYOUT).is_err());
        assert_eq!(cce.to_string(), "I-H-N-Z-V-Cr");
    }
    #[test]
    fn flag_bits() {
        let bits: Vec<u8> = CCFlag::ALL.iter().map(|f| f.mask()).collect();
        assert_eq!(bits, vec![1, 2, 4, 8, 16, 32]);
        assert_eq!(CCFlag::Z.info().short, 'Z');
    }
}
