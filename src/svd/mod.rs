//! Conversion of CMSIS-SVD peripheral descriptions into devregs lines.
//! Unlike the manual text, SVD is already structured, so this is a plain
//! walk over peripherals, registers and fields.

use std::path::Path;
use tracing::{debug, warn};

use crate::language::{Address, LoadingError};
use crate::output::{field_line, register_line};

mod device;

pub use device::*;

pub fn load(filename: &Path) -> Result<Device, LoadingError<'_>> {
    let content = std::fs::read_to_string(filename).map_err(|error| {
        debug!(?error);
        LoadingError {
            problem: match error.kind() {
                std::io::ErrorKind::NotFound => "File not found".to_string(),
                _ => "Failed reading".to_string(),
            },
            details: String::new(),
            filename,
        }
    })?;

    parse(&content).map_err(|details| LoadingError {
        problem: "Invalid SVD".to_string(),
        details,
        filename,
    })
}

pub fn parse(content: &str) -> Result<Device, String> {
    serde_xml_rs::from_str(content).map_err(|error| error.to_string())
}

/// Render every peripheral as a `<PERIPHERAL>_BASE` line followed by its
/// registers, each prefixed with the peripheral name, as are their fields.
pub fn render(device: &Device) -> String {
    let peripherals = &device
        .peripherals
        .items;
    debug!("Converting {} peripherals of {}", peripherals.len(), device.name);

    let mut output = String::new();

    for peripheral in peripherals {
        let base = peripheral.base_address;
        let name = format!("{}_BASE", peripheral.name);
        output.push_str(&register_line(&name, &Address::from_value(base)));
        output.push('\n');

        for register in registers_of(device, peripheral) {
            for (instance, offset) in register.instances() {
                let name = format!("{}_{}", peripheral.name, instance);
                let address = match base.checked_add(offset) {
                    Some(address) => Address::from_value(address),
                    None => {
                        warn!("Address of {} overflows 32 bits", name);
                        continue;
                    }
                };
                output.push_str(&register_line(&name, &address));
                output.push('\n');

                for field in register.fields() {
                    let bits = match field.bits() {
                        Some(bits) => bits,
                        None => {
                            warn!("No bit position for field {} of {}", field.name, name);
                            continue;
                        }
                    };
                    let name = format!("{}_{}", peripheral.name, field.name);
                    output.push_str(&field_line(&name, bits));
                    output.push('\n');
                }
            }
        }
    }

    output
}

// A derived peripheral without registers of its own shares those of the
// peripheral it is derived from.
fn registers_of<'d>(device: &'d Device, peripheral: &'d Peripheral) -> &'d [Register] {
    let own = peripheral.registers();
    if !own.is_empty() {
        return own;
    }

    peripheral
        .derived_from
        .as_deref()
        .and_then(|parent| {
            device
                .peripherals
                .items
                .iter()
                .find(|p| p.name == parent)
        })
        .map(|parent| parent.registers())
        .unwrap_or_default()
}
