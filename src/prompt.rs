// * yes/no confirmation before big sweeps
use std::io::{self, BufRead, Write};

fn answer(choice: &str) -> Option<bool> {
    match choice.trim().to_lowercase().as_str() {
        "" | "yes" | "y" | "ye" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Ask until the reply is recognised. End of input counts as "no".
pub fn are_you_sure<R: BufRead, W: Write>(n_hosts: usize, input: &mut R, out: &mut W) -> io::Result<bool> {
    loop {
        write!(out, "Ping {n_hosts} hosts? [Y/n] ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(false);
        }
        match answer(&line) {
            Some(yes) => return Ok(yes),
            None => writeln!(out, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
        }
    }
}
