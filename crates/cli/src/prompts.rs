use std::io::{self, BufRead, Write};

use anyhow::Result;

/// Ask for explicit confirmation on stderr.
///
/// Affirmative is any reply whose trimmed lowercase form starts with `y`;
/// everything else, including an empty line or closed stdin, declines.
pub fn confirm(message: &str) -> Result<bool> {
  write!(io::stderr(), "{message} (y/N) ")?;
  io::stderr().flush()?;

  let mut input = String::new();
  io::stdin().lock().read_line(&mut input)?;

  Ok(input.trim().to_ascii_lowercase().starts_with('y'))
}
