#[cfg(test)]
mod extraction {
    use trm2devregs::language::{Address, BitRange};
    use trm2devregs::output;
    use trm2devregs::parsing::{self, Parser};

    fn convert(document: &str) -> String {
        let parser = Parser::new();
        let registers = parsing::extract(&parser, document)
            .unwrap_or_else(|e| panic!("Failed to extract from {:?}: {:?}", document, e));
        output::render(&registers)
    }

    #[test]
    fn simple_register() {
        let document = "1.2.3.4 Some Register (REGB)\n ... Address: Base = 0000_0010h\n ... Reset 0 Field Description\n  31 CTRL\n  30-0 Reserved\n";

        assert_eq!(convert(document), "REGB\t\t\t0x00000010\n\t:CTRL:31\n");
    }

    #[test]
    fn document_without_markers() {
        assert_eq!(convert(""), "");
        assert_eq!(convert("Preface\n\nNothing to see here.\n"), "");
    }

    #[test]
    fn registers_in_document_order() {
        let document = "\
1.1.1.1 First (ALPHA)
Address: 0 = 0000_0100h
Reset 0 Field Description
  31–1 \n Reserved
   0 \n EN
1.1.1.2 Second (BETA)
Address: 0 = 0000_0104h
Reset 1 Field Description
  7–0 \n LEVEL
";
        assert_eq!(
            convert(document),
            "ALPHA\t\t\t0x00000100\n\t:EN:0\nBETA\t\t\t0x00000104\n\t:LEVEL:7-0\n"
        );
    }

    #[test]
    fn chapter_without_name_ends_processing() {
        let document = "\
1.1.1.1 First (ALPHA)
Address: 0 = 0000_0100h
Reset 0 Field Description
  31–0 \n ALL
1.1.1.2 Revision History
Nothing in parentheses here.
1.1.1.3 Later (GAMMA)
Address: 0 = 0000_0200h
Reset 0 Field Description
  31–0 \n ALL
";
        assert_eq!(convert(document), "ALPHA\t\t\t0x00000100\n\t:ALL:31-0\n");
    }

    #[test]
    fn wrapped_field_name() {
        let document = "\
1.1.1.1 Control (CTL)
Address: 0 = 4000_0000h
Reset 0 Field Description
  31–8 \n CTRL_
  EN
            Enables the thing.
  7–0 \n Reserved
";
        assert_eq!(convert(document), "CTL\t\t\t0x40000000\n\t:CTRL_EN:31-8\n");
    }

    #[test]
    fn trailing_field_recovered() {
        let document = "\
1.1.1.1 Status (STAT)
Address: 0 = 0000_0008h
Reset 0 Field Description
  31–4 \n Reserved
 READY
            Set when ready.
";
        assert_eq!(convert(document), "STAT\t\t\t0x00000008\n\t:READY:3-0\n");
    }

    #[test]
    fn missing_address() {
        let document = "\
1.1.1.1 Data (DATAn)
Reset 0 Field Description
  31–0 \n VALUE
";
        let parser = Parser::new();
        let registers = parsing::extract(&parser, document).unwrap();

        assert_eq!(registers.len(), 1);
        assert_eq!(registers[0].name, "DATAn");
        assert_eq!(registers[0].address, Address::Unresolved);
        assert_eq!(
            registers[0].fields[0].bits,
            BitRange::Span { high: 31, low: 0 }
        );
        assert_eq!(output::render(&registers), "DATAn\t\t\tFIXME\n\t:VALUE:31-0\n");
    }

    #[test]
    fn name_lengths_set_padding() {
        let document = "\
1.1.1.1 Long (PERIPHERAL_CONTROL)
Address: 0 = 0000_0000h
Reset 0 Field Description
  0 \n GO
";
        assert_eq!(
            convert(document),
            "PERIPHERAL_CONTROL\t0x00000000\n\t:GO:0\n"
        );
    }
}
