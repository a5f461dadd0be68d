//! Output of registers in the devregs text format

use std::io::{self, Write};
use tracing::debug;

use crate::language::{Address, BitRange, Register};

/// Tabs between a register name and its address. Names are not padded to
/// a fixed width; shorter names just get more tabs.
pub fn padding(name: &str) -> &'static str {
    let length = name
        .chars()
        .count();

    if length < 8 {
        "\t\t\t"
    } else if length < 16 {
        "\t\t"
    } else {
        "\t"
    }
}

pub fn register_line(name: &str, address: &Address) -> String {
    format!("{}{}{}", name, padding(name), address)
}

pub fn field_line(name: &str, bits: BitRange) -> String {
    format!("\t:{}:{}", name, bits)
}

/// Render one register and its named fields. Reserved ranges produce no
/// lines.
pub fn render_register(register: &Register) -> String {
    let mut output = register_line(register.name, &register.address);
    output.push('\n');

    for (name, bits) in register.named_fields() {
        output.push_str(&field_line(name, bits));
        output.push('\n');
    }

    output
}

pub fn render(registers: &[Register]) -> String {
    registers
        .iter()
        .map(render_register)
        .collect()
}

/// Write the rendered registers to the given sink, typically standard
/// output.
pub fn emit(out: &mut impl Write, registers: &[Register]) -> io::Result<()> {
    debug!("Emitting {} registers", registers.len());

    for register in registers {
        out.write_all(render_register(register).as_bytes())?;
    }
    out.flush()
}
