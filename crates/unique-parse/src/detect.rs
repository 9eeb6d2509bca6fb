//! File-type sniffing, shared by the CLI and by tests that want to pick
//! a parser without being told the format up front.

use std::io::BufRead;

/// One of the four formats `unique` understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Qcir,
    Dqcir,
    Qdimacs,
    Dqdimacs,
}

/// Read `first_line` plus the rest of `reader` to classify a file: a
/// `#QCIR` first line selects the QCIR family, otherwise DIMACS; any
/// later line starting with `d` selects the dependency variant.
pub fn detect<R: BufRead>(mut reader: R) -> Option<FileType> {
    let mut first_line = String::new();
    if reader.read_line(&mut first_line).unwrap_or(0) == 0 {
        return None;
    }
    let qcir = first_line.starts_with("#QCIR");

    let mut explicit_dependencies = false;
    for line in reader.lines() {
        let line = line.ok()?;
        if line.starts_with('d') {
            explicit_dependencies = true;
            break;
        }
    }

    Some(match (qcir, explicit_dependencies) {
        (true, false) => FileType::Qcir,
        (true, true) => FileType::Dqcir,
        (false, false) => FileType::Qdimacs,
        (false, true) => FileType::Dqdimacs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn qcir_without_dependencies() {
        let text = "#QCIR-G14\nexists(x)\noutput(x)\n";
        assert_eq!(detect(Cursor::new(text)), Some(FileType::Qcir));
    }

    #[test]
    fn dqcir_with_dependency_line() {
        let text = "#QCIR-G14\nexists(x)\nd y x 0\noutput(x)\n";
        assert_eq!(detect(Cursor::new(text)), Some(FileType::Dqcir));
    }

    #[test]
    fn qdimacs_without_dependencies() {
        let text = "p cnf 1 1\ne 1 0\n1 0\n";
        assert_eq!(detect(Cursor::new(text)), Some(FileType::Qdimacs));
    }

    #[test]
    fn dqdimacs_with_dependency_line() {
        let text = "p cnf 2 1\na 1 0\nd 2 1 0\n1 -2 0\n";
        assert_eq!(detect(Cursor::new(text)), Some(FileType::Dqdimacs));
    }

    #[test]
    fn empty_input_is_undetected() {
        assert_eq!(detect(Cursor::new("")), None);
    }
}
