//! Interactive prompts on stdin/stdout.
//!
//! The `*_with` variants take explicit reader/writer handles so they can be
//! exercised without a terminal. Passwords are read without echo when stdin
//! is a terminal and are never trimmed beyond the line ending.
use crate::core::error::Result;
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, IsTerminal, Write};

/// Asks a `[y/N]` question. Anything other than `y`/`yes` (any case) is "no",
/// including end of input.
pub fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_with(&mut stdin.lock(), &mut stdout, question)
}

pub fn confirm_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> Result<bool> {
    let answer = read_line_with(reader, writer, &format!("{question} [y/N] "))?;
    Ok(matches!(
        answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("y") | Some("yes")
    ))
}

/// Prints `label` and reads one trimmed line. `None` on end of input.
pub fn read_line(label: &str) -> Result<Option<String>> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    read_line_with(&mut stdin.lock(), &mut stdout, label)
}

pub fn read_line_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(writer, "{label}").context("Failed to write prompt")?;
    writer.flush().context("Failed to flush prompt")?;
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompts for a password. On a terminal the input is not echoed; otherwise
/// one line is read from stdin.
pub fn read_password(label: &str) -> Result<Option<String>> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if stdin.is_terminal() {
        read_password_hidden(&mut stdout, label)
    } else {
        read_secret_with(&mut stdin.lock(), &mut stdout, label)
    }
}

/// Like `read_line_with`, but only the line ending is stripped.
pub fn read_secret_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(writer, "{label}").context("Failed to write prompt")?;
    writer.flush().context("Failed to flush prompt")?;
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    let secret = line.strip_suffix('\n').unwrap_or(&line);
    let secret = secret.strip_suffix('\r').unwrap_or(secret);
    Ok(Some(secret.to_string()))
}

/// Leaves raw mode when dropped, including on early returns.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to switch terminal to raw mode")?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_password_hidden<W: Write>(writer: &mut W, label: &str) -> Result<Option<String>> {
    write!(writer, "{label}").context("Failed to write prompt")?;
    writer.flush().context("Failed to flush prompt")?;

    let mut secret = String::new();
    {
        let _raw = RawMode::enable()?;
        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read().context("Failed to read from terminal")?
            else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Enter => break,
                KeyCode::Char('c') | KeyCode::Char('d')
                    if modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    anyhow::bail!("Password entry cancelled");
                }
                KeyCode::Backspace => {
                    secret.pop();
                }
                KeyCode::Char(c) => secret.push(c),
                _ => {}
            }
        }
    }
    writeln!(writer).context("Failed to write prompt")?;
    Ok(Some(secret))
}
