//! Reader for devregs data files, used to check what the extractors
//! produce before it is installed on a target.
//!
//! The format is line oriented; the first significant character decides
//! what a line is:
//!
//! ```text
//! NAME    0xADDRESS[.b|.w|.l]      register
//!     :field:start[-end]           field of the preceding register or set
//!     :Set/                        include the fields of a field set
//! /Set                             start a field set
//! ```
//!
//! `#` and `//` begin comments.

use crate::language::{BitRange, UNRESOLVED};

/// Access width of a register, from the optional suffix on its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Half,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition<'i> {
    pub name: &'i str,
    pub bits: BitRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDefinition<'i> {
    pub name: &'i str,
    pub address: u64,
    pub width: Width,
    pub fields: Vec<FieldDefinition<'i>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet<'i> {
    pub name: &'i str,
    pub fields: Vec<FieldDefinition<'i>>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DataFile<'i> {
    pub registers: Vec<RegisterDefinition<'i>>,
    pub field_sets: Vec<FieldSet<'i>>,
}

impl<'i> DataFile<'i> {
    pub fn field_count(&self) -> usize {
        self.registers
            .iter()
            .map(|register| {
                register
                    .fields
                    .len()
            })
            .sum()
    }
}

/// Problems found in a data file. Line numbers count from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    InvalidRegister(usize),
    UnresolvedAddress(usize, String),
    InvalidWidth(usize, char),
    InvalidBits(usize, String),
    MissingSeparator(usize),
    FieldOutsideRegister(usize),
    UnknownFieldSet(usize, String),
    InvalidFieldSetName(usize),
    Unrecognized(usize),
}

impl DataError {
    pub fn line(&self) -> usize {
        match self {
            DataError::InvalidRegister(line) => *line,
            DataError::UnresolvedAddress(line, _) => *line,
            DataError::InvalidWidth(line, _) => *line,
            DataError::InvalidBits(line, _) => *line,
            DataError::MissingSeparator(line) => *line,
            DataError::FieldOutsideRegister(line) => *line,
            DataError::UnknownFieldSet(line, _) => *line,
            DataError::InvalidFieldSetName(line) => *line,
            DataError::Unrecognized(line) => *line,
        }
    }

    pub fn message(&self) -> String {
        match self {
            DataError::InvalidRegister(_) => "invalid register definition".to_string(),
            DataError::UnresolvedAddress(_, name) => {
                format!("register {} has no address", name)
            }
            DataError::InvalidWidth(_, c) => format!("invalid width character '{}'", c),
            DataError::InvalidBits(_, spec) => {
                format!("invalid bit specification '{}', use start-end in decimal", spec)
            }
            DataError::MissingSeparator(_) => "missing field separator".to_string(),
            DataError::FieldOutsideRegister(_) => {
                "field definition without a register or field set".to_string()
            }
            DataError::UnknownFieldSet(_, name) => format!("unknown field set '{}'", name),
            DataError::InvalidFieldSetName(_) => "invalid field set name".to_string(),
            DataError::Unrecognized(_) => "unrecognized line".to_string(),
        }
    }
}

// Where field lines currently go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Nothing,
    Register,
    FieldSet,
}

/// Parse a data file, collecting every problem rather than stopping at the
/// first.
pub fn parse(content: &str) -> Result<DataFile<'_>, Vec<DataError>> {
    let mut file = DataFile::default();
    let mut errors = Vec::new();
    let mut target = Target::Nothing;

    for (i, line) in content
        .lines()
        .enumerate()
    {
        let number = i + 1;
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        let result = if let Some(rest) = line.strip_prefix(':') {
            read_field_line(&mut file, target, rest, number).map(|next| target = next)
        } else if let Some(rest) = line.strip_prefix('/') {
            read_field_set(rest, number).map(|set| {
                file.field_sets
                    .push(set);
                target = Target::FieldSet;
            })
        } else if line.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
            read_register(line, number).map(|register| {
                file.registers
                    .push(register);
                target = Target::Register;
            })
        } else {
            Err(DataError::Unrecognized(number))
        };

        if let Err(error) = result {
            errors.push(error);
        }
    }

    if errors.is_empty() {
        Ok(file)
    } else {
        Err(errors)
    }
}

fn strip_comment(line: &str) -> &str {
    let line = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    match line.find("//") {
        Some(i) => &line[..i],
        None => line,
    }
}

fn read_register(line: &str, number: usize) -> Result<RegisterDefinition<'_>, DataError> {
    let re = crate::regex!(r"\A([A-Za-z_][A-Za-z0-9_]*)\s+(\S+)\z");
    let captures = re
        .captures(line)
        .ok_or(DataError::InvalidRegister(number))?;

    let name = captures
        .get(1)
        .map_or("", |m| m.as_str());
    let value = captures
        .get(2)
        .map_or("", |m| m.as_str());

    if value == UNRESOLVED {
        return Err(DataError::UnresolvedAddress(number, name.to_string()));
    }

    let (digits, suffix) = match value.split_once('.') {
        Some((digits, suffix)) => (digits, Some(suffix)),
        None => (value, None),
    };

    let width = match suffix {
        None => Width::Word,
        Some(suffix) => {
            let mut chars = suffix.chars();
            let c = chars
                .next()
                .ok_or(DataError::InvalidRegister(number))?;
            if chars
                .next()
                .is_some()
            {
                return Err(DataError::InvalidRegister(number));
            }
            match c.to_ascii_lowercase() {
                'b' => Width::Byte,
                'w' => Width::Half,
                'l' => Width::Word,
                _ => return Err(DataError::InvalidWidth(number, c)),
            }
        }
    };

    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    let address =
        u64::from_str_radix(digits, 16).map_err(|_| DataError::InvalidRegister(number))?;

    Ok(RegisterDefinition {
        name,
        address,
        width,
        fields: Vec::new(),
    })
}

fn read_field_line<'i>(
    file: &mut DataFile<'i>,
    target: Target,
    rest: &'i str,
    number: usize,
) -> Result<Target, DataError> {
    if target == Target::Nothing {
        return Err(DataError::FieldOutsideRegister(number));
    }

    let rest = rest.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let (name, after) = rest.split_at(end);

    if let Some(spec) = after.strip_prefix(':') {
        let bits = parse_bits(spec.trim()).ok_or(DataError::InvalidBits(number, spec.to_string()))?;
        let field = FieldDefinition { name, bits };

        let fields = match target {
            Target::Register => file
                .registers
                .last_mut()
                .map(|register| &mut register.fields),
            _ => file
                .field_sets
                .last_mut()
                .map(|set| &mut set.fields),
        };
        fields
            .ok_or(DataError::FieldOutsideRegister(number))?
            .push(field);
        Ok(target)
    } else if after.starts_with('/') && target == Target::Register {
        let fields = file
            .field_sets
            .iter()
            .find(|set| set.name == name)
            .map(|set| {
                set.fields
                    .clone()
            })
            .ok_or(DataError::UnknownFieldSet(number, name.to_string()))?;

        if let Some(register) = file
            .registers
            .last_mut()
        {
            register
                .fields
                .extend(fields);
        }
        // a register whose fields come from a set takes no more fields
        Ok(Target::Nothing)
    } else {
        Err(DataError::MissingSeparator(number))
    }
}

fn read_field_set(rest: &str, number: usize) -> Result<FieldSet<'_>, DataError> {
    let re = crate::regex!(r"\A([A-Za-z0-9_]+)(?:\s.*)?\z");
    let name = re
        .captures(rest)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or(DataError::InvalidFieldSetName(number))?;

    Ok(FieldSet {
        name,
        fields: Vec::new(),
    })
}

/// Bits of a 32-bit register as `start[-end]`, in either order. The first
/// number must be a valid bit and the whole span must fit.
pub fn parse_bits(spec: &str) -> Option<BitRange> {
    let (first, second) = match spec.split_once('-') {
        Some((first, second)) => (first, Some(second)),
        None => (spec, None),
    };

    let first = first
        .parse::<u32>()
        .ok()?;
    if first > 31 {
        return None;
    }
    let second = match second {
        Some(second) => second
            .parse::<u32>()
            .ok()?,
        None => first,
    };

    let bits = BitRange::between(first, second);
    let count = bits.high() - bits.low() + 1;
    if count <= 32 - bits.low() {
        Some(bits)
    } else {
        None
    }
}
