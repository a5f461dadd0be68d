#[cfg(test)]
mod devregs {
    use std::fs;
    use std::path::Path;

    use trm2devregs::devregs::{self, DataError, Width};
    use trm2devregs::language::BitRange;
    use trm2devregs::{output, svd};

    #[test]
    fn converted_svd_is_valid() {
        let device = svd::load(Path::new("tests/samples/mini.svd")).unwrap();
        let result = svd::render(&device);

        let file = devregs::parse(&result).unwrap();

        assert_eq!(file.registers.len(), 10);
        assert_eq!(file.field_count(), 6);
        assert_eq!(file.registers[1].name, "UART1_SR");
        assert_eq!(file.registers[1].address, 0x4001_1000);
        assert_eq!(file.registers[1].width, Width::Word);
        assert_eq!(
            file.registers[1].fields[1].bits,
            BitRange::Span { high: 3, low: 0 }
        );
    }

    #[test]
    fn extracted_output_flags_unresolved_addresses() {
        let content = fs::read_to_string("tests/samples/ocotp.dat").unwrap();

        let errors = devregs::parse(&content).unwrap_err();

        assert_eq!(
            errors,
            vec![DataError::UnresolvedAddress(12, "HW_OCOTP_GPn".to_string())]
        );
    }

    #[test]
    fn emitted_lines_read_back() {
        let document = "1.2.3.4 Some Register (REGB)\n ... Address: Base = 0000_0010h\n ... Reset 0 Field Description\n  31 CTRL\n  30-0 Reserved\n";
        let parser = trm2devregs::parsing::Parser::new();
        let registers = trm2devregs::parsing::extract(&parser, document).unwrap();

        let mut buffer = Vec::new();
        output::emit(&mut buffer, &registers).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let file = devregs::parse(&text).unwrap();
        assert_eq!(file.registers[0].name, "REGB");
        assert_eq!(file.registers[0].address, 0x10);
        assert_eq!(file.registers[0].fields[0].name, "CTRL");
        assert_eq!(file.registers[0].fields[0].bits, BitRange::Single(31));
    }
}
