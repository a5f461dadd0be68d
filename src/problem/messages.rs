use trm2devregs::parsing::{parser::EN_DASH, ParsingError};

/// Generate problem and detail messages for extraction errors
pub fn generate_error_message(error: &ParsingError) -> (String, String) {
    match error {
        ParsingError::MissingFieldTable(_) => (
            "No field description table found".to_string(),
            r#"
Every register is expected to be followed by a table of its bit-fields,
introduced by the reset value row and a "Field Description" column heading.
None was found between the register's name and the next section number.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::MissingFieldName(_) => (
            "Cannot find field name".to_string(),
            format!(
                r#"
A bit range in the field table must be followed by the name of the field,
either on the same line or on the next line indented by at most 13 spaces.
Reserved bits are marked with "Reserved" or a dash. For example:

{}
                "#,
                table_example()
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::InvalidBitNumber(_, value) => (
            format!("Invalid bit number '{}'", value),
            "Bit positions in a field table must be small non-negative integers.".to_string(),
        ),
    }
}

// Two rows as pdftotext lays them out: a named field whose name wraps
// after the underscore, then a reserved range.
fn table_example() -> String {
    format!(
        "  31{d}16\n CTRL_\n EN                  Enables the controller.\n  15{d}0\n Reserved",
        d = EN_DASH
    )
}
