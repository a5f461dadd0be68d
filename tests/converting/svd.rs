#[cfg(test)]
mod svd {
    use std::fs;
    use std::path::Path;

    use trm2devregs::svd;

    #[test]
    fn ensure_svd_samples_convert() {
        let dir = Path::new("tests/samples/");

        let entries = fs::read_dir(dir).expect("Failed to read samples directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some("svd")
            {
                files.push(path);
            }
        }

        assert!(!files.is_empty(), "No .svd files found in samples directory");

        for file in &files {
            let device = svd::load(file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {}", file, e));
            let expected = fs::read_to_string(file.with_extension("dat"))
                .unwrap_or_else(|e| panic!("No expected output for {:?}: {:?}", file, e));

            assert_eq!(svd::render(&device), expected, "converting {:?}", file);
        }
    }

    #[test]
    fn derived_peripheral_with_own_registers() {
        let content = r#"<?xml version="1.0" encoding="utf-8"?>
<device>
  <name>TINY</name>
  <peripherals>
    <peripheral>
      <name>GPIOA</name>
      <baseAddress>0x48000000</baseAddress>
      <registers>
        <register>
          <name>MODER</name>
          <addressOffset>0</addressOffset>
        </register>
      </registers>
    </peripheral>
    <peripheral derivedFrom="GPIOA">
      <name>GPIOB</name>
      <baseAddress>0x48000400</baseAddress>
      <registers>
        <register>
          <name>IDR</name>
          <addressOffset>0x10</addressOffset>
        </register>
      </registers>
    </peripheral>
  </peripherals>
</device>
"#;
        let device = svd::parse(content).unwrap();

        assert_eq!(
            svd::render(&device),
            "GPIOA_BASE\t\t0x48000000\nGPIOA_MODER\t\t0x48000000\nGPIOB_BASE\t\t0x48000400\nGPIOB_IDR\t\t0x48000410\n"
        );
    }

    #[test]
    fn field_without_position_is_skipped() {
        let content = r#"<device>
  <name>TINY</name>
  <peripherals>
    <peripheral>
      <name>TIM</name>
      <baseAddress>0x1000</baseAddress>
      <registers>
        <register>
          <name>CR</name>
          <addressOffset>4</addressOffset>
          <fields>
            <field>
              <name>LOST</name>
            </field>
            <field>
              <name>EN</name>
              <bitOffset>0</bitOffset>
              <bitWidth>1</bitWidth>
            </field>
          </fields>
        </register>
      </registers>
    </peripheral>
  </peripherals>
</device>
"#;
        let device = svd::parse(content).unwrap();

        assert_eq!(
            svd::render(&device),
            "TIM_BASE\t\t0x00001000\nTIM_CR\t\t\t0x00001004\n\t:TIM_EN:0\n"
        );
    }

    #[test]
    fn addresses_beyond_32_bits_are_skipped() {
        let content = r#"<device>
  <name>EDGE</name>
  <peripherals>
    <peripheral>
      <name>TOP</name>
      <baseAddress>0xFFFFFFF0</baseAddress>
      <registers>
        <register>
          <name>LOW</name>
          <addressOffset>0x4</addressOffset>
        </register>
        <register>
          <name>PAST</name>
          <addressOffset>0x20</addressOffset>
        </register>
      </registers>
    </peripheral>
  </peripherals>
</device>
"#;
        let device = svd::parse(content).unwrap();

        assert_eq!(
            svd::render(&device),
            "TOP_BASE\t\t0xfffffff0\nTOP_LOW\t\t\t0xfffffff4\n"
        );
    }

    #[test]
    fn malformed_svd() {
        assert!(svd::parse("<device><peripherals>").is_err());
        assert!(svd::load(Path::new("tests/samples/absent.svd")).is_err());
    }
}
