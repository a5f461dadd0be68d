use serde::{de, Deserialize, Deserializer};
use std::num::ParseIntError;
use tracing::warn;

use crate::language::BitRange;

/// The root `<device>` element of an SVD file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub peripherals: Peripherals,
}

#[derive(Debug, Default, Deserialize)]
pub struct Peripherals {
    #[serde(rename = "peripheral", default)]
    pub items: Vec<Peripheral>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peripheral {
    #[serde(default)]
    pub derived_from: Option<String>,
    pub name: String,
    #[serde(deserialize_with = "deserialize_int")]
    pub base_address: u32,
    #[serde(default)]
    pub registers: Option<Registers>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Registers {
    #[serde(rename = "register", default)]
    pub items: Vec<Register>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    pub name: String,
    #[serde(deserialize_with = "deserialize_int")]
    pub address_offset: u32,
    #[serde(default, deserialize_with = "deserialize_int_opt")]
    pub dim: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_int_opt")]
    pub dim_increment: Option<u32>,
    #[serde(default)]
    pub dim_index: Option<String>,
    #[serde(default)]
    pub fields: Option<Fields>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Fields {
    #[serde(rename = "field", default)]
    pub items: Vec<Field>,
}

/// A bit-field. SVD allows its position to be given three ways: offset and
/// width, lsb and msb, or a `[msb:lsb]` range string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_int_opt")]
    pub bit_offset: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_int_opt")]
    pub bit_width: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_int_opt")]
    pub lsb: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_int_opt")]
    pub msb: Option<u32>,
    #[serde(default)]
    pub bit_range: Option<String>,
}

impl Peripheral {
    pub fn registers(&self) -> &[Register] {
        self.registers
            .as_ref()
            .map(|registers| registers.items.as_slice())
            .unwrap_or_default()
    }
}

impl Register {
    pub fn fields(&self) -> &[Field] {
        self.fields
            .as_ref()
            .map(|fields| fields.items.as_slice())
            .unwrap_or_default()
    }

    /// Names and address offsets of the registers this element stands
    /// for, expanding `%s` arrays. Elements whose offset would not fit in
    /// 32 bits are left out.
    pub fn instances(&self) -> Vec<(String, u32)> {
        if let Some(count) = self.dim {
            if count > 1 {
                let step = self
                    .dim_increment
                    .unwrap_or(0);
                let indices = self
                    .dim_index
                    .as_deref()
                    .map(dim_indices)
                    .unwrap_or_else(|| {
                        (0..count)
                            .map(|i| i.to_string())
                            .collect()
                    });

                return indices
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, idx)| {
                        let name = self
                            .name
                            .replace("[%s]", &format!("_{}", idx))
                            .replace("%s", &idx);
                        let offset = u32::try_from(i)
                            .ok()
                            .and_then(|i| i.checked_mul(step))
                            .and_then(|delta| {
                                self.address_offset
                                    .checked_add(delta)
                            });
                        match offset {
                            Some(offset) => Some((name, offset)),
                            None => {
                                warn!("Offset of {} overflows 32 bits", name);
                                None
                            }
                        }
                    })
                    .collect();
            }
        }
        vec![(self.name.clone(), self.address_offset)]
    }
}

impl Field {
    pub fn bits(&self) -> Option<BitRange> {
        if let (Some(offset), Some(width)) = (self.bit_offset, self.bit_width) {
            let high = offset.checked_add(width.max(1) - 1)?;
            return Some(BitRange::between(offset, high));
        }
        if let (Some(lsb), Some(msb)) = (self.lsb, self.msb) {
            return Some(BitRange::between(lsb, msb));
        }
        let range = self
            .bit_range
            .as_deref()?
            .trim()
            .strip_prefix('[')?
            .strip_suffix(']')?;
        let (msb, lsb) = range.split_once(':')?;
        Some(BitRange::between(
            parse_int(msb).ok()?,
            parse_int(lsb).ok()?,
        ))
    }
}

// Either a comma separated list ("A,B,C") or a numeric range ("0-3").
fn dim_indices(spec: &str) -> Vec<String> {
    if let Some((first, last)) = spec.split_once('-') {
        if let (Ok(first), Ok(last)) = (
            first
                .trim()
                .parse::<u32>(),
            last.trim()
                .parse::<u32>(),
        ) {
            return (first..=last)
                .map(|i| i.to_string())
                .collect();
        }
    }
    spec.split(',')
        .map(|s| s.trim().to_owned())
        .collect()
}

pub(crate) fn deserialize_int<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    parse_int(&String::deserialize(deserializer)?).map_err(de::Error::custom)
}

pub(crate) fn deserialize_int_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    if let Some(s) = s {
        parse_int(&s)
            .map(Some)
            .map_err(de::Error::custom)
    } else {
        Ok(None)
    }
}

/// SVD integers: decimal, `0x` hexadecimal, or `#` binary.
pub(crate) fn parse_int(src: &str) -> Result<u32, ParseIntError> {
    let src = src.trim();
    if let Some(hex) = src
        .strip_prefix("0x")
        .or_else(|| src.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)
    } else if let Some(binary) = src.strip_prefix('#') {
        u32::from_str_radix(binary, 2)
    } else {
        src.parse::<u32>()
    }
}
