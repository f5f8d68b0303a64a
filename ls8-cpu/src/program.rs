//! Program text format: one byte per line written in base 2, with `#`
//! starting a comment. A byte may carry a `0b`/`0B` prefix and single
//! underscores between digits or after the prefix. Lines that do not hold a byte are skipped.

const COMMENT: char = '#';

pub fn parse_program(source: &str) -> Vec<u8> {
    let mut program = Vec::new();
    for (number, line) in source.lines().enumerate() {
        let code = line.split(COMMENT).next().unwrap_or_default().trim();
        if code.is_empty() {
            continue;
        }
        match parse_byte(code) {
            Some(byte) => program.push(byte),
            None => tracing::trace!("skipping line {}: '{}'", number + 1, code),
        }
    }
    program
}

fn parse_byte(code: &str) -> Option<u8> {
    // one underscore may follow the prefix, but never lead a bare number
    if code.starts_with('_') || code.ends_with('_') || code.contains("__") {
        return None;
    }
    let digits = code
        .strip_prefix("0b")
        .or_else(|| code.strip_prefix("0B"))
        .unwrap_or(code);
    let digits = digits.replace('_', "");
    u8::from_str_radix(&digits, 2).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bytes_and_strips_comments() {
        let source = "\
# print8.ls8
10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
";
        assert_eq!(
            parse_program(source),
            vec![0b1000_0010, 0, 8, 0b0100_0111, 0, 1]
        );
    }

    #[test]
    fn test_skips_lines_that_do_not_parse() {
        let source = "\n   \nhello\n0b101\n  11  \n2\n111111111\n# 1\n";
        assert_eq!(parse_program(source), vec![0b101, 0b11]);
    }

    #[test]
    fn test_accepts_prefixes_and_digit_separators() {
        let source = "0B11\n1000_0010\n0b_1\n0b0100_0111\n1__0\n_1\n1_\n0b_\n";
        assert_eq!(
            parse_program(source),
            vec![0b11, 0b1000_0010, 0b1, 0b0100_0111]
        );
    }

    #[test]
    fn test_empty_source_is_an_empty_program() {
        assert!(parse_program("").is_empty());
    }
}
