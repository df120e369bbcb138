use std::io::{self, BufRead, Write};

use crate::console::{Style, styled};

/// Asks a yes/no question on the terminal. End of input counts as no.
pub fn confirm(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    ask(&mut stdin.lock(), &mut stdout.lock(), question)
}

pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    loop {
        write!(output, "{} ", styled(&format!("{question} [y/n]"), Style::Prompt))?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please answer y or n.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(input: &str) -> (bool, String) {
        let mut out = Vec::new();
        let yes = ask(&mut Cursor::new(input), &mut out, "Save?").unwrap();
        (yes, String::from_utf8(out).unwrap())
    }

    #[test]
    fn accepts_yes_and_no() {
        assert!(answer("y\n").0);
        assert!(answer("Yes\n").0);
        assert!(!answer("n\n").0);
    }

    #[test]
    fn repeats_until_understood() {
        let (yes, out) = answer("maybe\n\nyes\n");
        assert!(yes);
        assert_eq!(out.matches("Please answer y or n.").count(), 2);
    }

    #[test]
    fn end_of_input_is_no() {
        assert!(!answer("").0);
    }
}
