#[cfg(test)]
mod samples {
    use std::fs;
    use std::path::{Path, PathBuf};

    use trm2devregs::output;
    use trm2devregs::parsing::{self, pages, Parser};

    fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
        assert!(dir.exists(), "{:?} directory missing", dir);

        let entries = fs::read_dir(dir).expect("Failed to read directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some(extension)
            {
                files.push(path);
            }
        }
        files.sort();
        files
    }

    // Extract from every page of a text sample
    fn extract_all(file: &Path) -> Result<String, String> {
        let raw = fs::read_to_string(file)
            .unwrap_or_else(|e| panic!("Failed to read file {:?}: {:?}", file, e));
        let count = pages::split(&raw).len();

        let content = parsing::load(file, 1, count).map_err(|e| e.to_string())?;

        let parser = Parser::new();
        let registers = parsing::extract(&parser, &content).map_err(|e| e.message())?;

        Ok(output::render(&registers))
    }

    #[test]
    fn ensure_samples_extract() {
        let files = files_with_extension(Path::new("tests/samples/"), "txt");

        assert!(!files.is_empty(), "No .txt files found in samples directory");

        let mut failures = Vec::new();

        for file in &files {
            let expected = fs::read_to_string(file.with_extension("dat"))
                .unwrap_or_else(|e| panic!("No expected output for {:?}: {:?}", file, e));

            match extract_all(file) {
                Ok(result) => {
                    if result != expected {
                        println!(
                            "File {:?} extracted differently.\n--- Expected\n{}\n+++ Actual\n{}",
                            file, expected, result
                        );
                        failures.push(file.clone());
                    }
                }
                Err(e) => {
                    println!("File {:?} failed to extract: {}", file, e);
                    failures.push(file.clone());
                }
            }
        }

        if !failures.is_empty() {
            panic!(
                "Sample files should extract to their .dat, but {} files did not",
                failures.len()
            );
        }
    }

    #[test]
    fn ensure_broken_fail() {
        let files = files_with_extension(Path::new("tests/broken/"), "txt");

        assert!(!files.is_empty(), "No .txt files found in broken directory");

        let mut unexpected_successes = Vec::new();

        for file in &files {
            if extract_all(file).is_ok() {
                println!("File {:?} unexpectedly extracted successfully", file);
                unexpected_successes.push(file.clone());
            }
        }

        if !unexpected_successes.is_empty() {
            panic!(
                "Broken files should not extract, but {} files did",
                unexpected_successes.len()
            );
        }
    }

    #[test]
    fn page_subset() {
        let file = Path::new("tests/samples/ocotp.txt");

        // the first page holds only the control register
        let content = parsing::load(file, 1, 1).unwrap();
        let registers = parsing::extract(&Parser::new(), &content).unwrap();

        assert_eq!(registers.len(), 1);
        assert_eq!(registers[0].name, "OCOTP_CTRLn");
    }

    #[test]
    fn page_range_checked() {
        let file = Path::new("tests/samples/ocotp.txt");

        assert!(parsing::load(file, 0, 1).is_err());
        assert!(parsing::load(file, 2, 1).is_err());
        assert!(parsing::load(file, 1, 99).is_err());
        assert!(parsing::load(Path::new("tests/samples/absent.txt"), 1, 1).is_err());
    }
}
