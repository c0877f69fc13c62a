//! "Select Layer:" dropdown for the terminal.
//!
//! Arrow-key selection in raw mode when attached to a terminal, a numbered
//! prompt otherwise.

use crate::Result;
use crate::cli::prompt::read_line;
use crate::core::prompt::LayerPicker;
use crate::core::services::types::LayerOption;
use crate::error::CliError;
use crate::map_display_error;
use atty::Stream;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute, queue};
use std::io::{self, Write};

const HINT: &str = "(↑/↓ to move, Enter to select, Esc to cancel)";
// Prompt line, hint line and the line the cursor rests on
const RESERVED_ROWS: usize = 3;

/// Result of one key press in the dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    Move(usize),
    Accept(usize),
    Cancel,
    Ignore,
}

/// Cursor movement wraps at both ends
pub fn apply_key(code: KeyCode, modifiers: KeyModifiers, cursor: usize, len: usize) -> PickerAction {
    if len == 0 {
        return PickerAction::Cancel;
    }
    match code {
        KeyCode::Up | KeyCode::Char('k') => PickerAction::Move((cursor + len - 1) % len),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => PickerAction::Move((cursor + 1) % len),
        KeyCode::Home => PickerAction::Move(0),
        KeyCode::End => PickerAction::Move(len - 1),
        KeyCode::Enter => PickerAction::Accept(cursor),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => PickerAction::Cancel,
        KeyCode::Esc | KeyCode::Char('q') => PickerAction::Cancel,
        _ => PickerAction::Ignore,
    }
}

/// First visible row, scrolled just enough to keep `cursor` on screen
pub fn scroll_offset(offset: usize, cursor: usize, capacity: usize) -> usize {
    let capacity = capacity.max(1);
    if cursor < offset {
        cursor
    } else if cursor >= offset + capacity {
        cursor + 1 - capacity
    } else {
        offset
    }
}

/// One display line per option, the highlighted one marked with `❯`
pub fn render_options(options: &[LayerOption], cursor: usize) -> Vec<String> {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let marker = if i == cursor { "❯" } else { " " };
            format!("{} {}", marker, option.label)
        })
        .collect()
}

/// Accepts a listed index or a layer name (case-insensitive)
pub fn parse_numbered_choice(input: &str, options: &[LayerOption]) -> Result<usize> {
    let input = input.trim();

    if let Ok(number) = input.parse::<usize>() {
        if let Some(option) = options.iter().find(|o| o.index == number) {
            return Ok(option.index);
        }
    } else if let Some(option) = options
        .iter()
        .find(|o| o.label.eq_ignore_ascii_case(input))
    {
        return Ok(option.index);
    }

    Err(CliError::InvalidArguments(format!(
        "'{}' is not one of the listed layers",
        input
    ))
    .into())
}

pub struct TerminalLayerPicker {
    use_colors: bool,
}

impl TerminalLayerPicker {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn is_interactive() -> bool {
        atty::is(Stream::Stdin) && atty::is(Stream::Stdout)
    }

    fn pick_numbered(&self, prompt: &str, options: &[LayerOption]) -> Result<usize> {
        println!("{}", prompt);
        for option in options {
            println!("  [{}] {}", option.index, option.label);
        }
        print!("Enter layer number: ");
        map_display_error!(io::stdout().flush(), "flush stdout")?;

        let line = read_line("layer")?;
        parse_numbered_choice(&line, options)
    }

    fn draw(
        &self,
        stdout: &mut io::Stdout,
        prompt: &str,
        options: &[LayerOption],
        cursor_pos: usize,
        offset: usize,
        capacity: usize,
    ) -> io::Result<()> {
        let end = (offset + capacity).min(options.len());
        let visible = &options[offset..end];
        let highlighted = cursor_pos - offset;
        let hint = if visible.len() < options.len() {
            format!("{} {}/{}", HINT, cursor_pos + 1, options.len())
        } else {
            HINT.to_string()
        };

        queue!(stdout, Print(prompt), Print("\r\n"))?;
        for (i, line) in render_options(visible, highlighted).into_iter().enumerate() {
            if self.use_colors && i == highlighted {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Cyan),
                    Print(line),
                    ResetColor,
                    Print("\r\n")
                )?;
            } else {
                queue!(stdout, Print(line), Print("\r\n"))?;
            }
        }
        if self.use_colors {
            queue!(
                stdout,
                SetForegroundColor(Color::DarkGrey),
                Print(hint),
                ResetColor,
                Print("\r\n")
            )?;
        } else {
            queue!(stdout, Print(hint), Print("\r\n"))?;
        }
        stdout.flush()
    }

    fn pick_interactive(&self, prompt: &str, options: &[LayerOption]) -> Result<usize> {
        // RAII cleanup: restore the terminal on every exit path
        struct RawModeCleanup;
        impl Drop for RawModeCleanup {
            fn drop(&mut self) {
                let _ = execute!(io::stdout(), cursor::Show);
                let _ = disable_raw_mode();
            }
        }

        map_display_error!(enable_raw_mode(), "enable raw mode")?;
        let _cleanup = RawModeCleanup;

        let mut stdout = io::stdout();
        map_display_error!(execute!(stdout, cursor::Hide), "hide cursor")?;

        let rows = terminal::size().map(|(_, rows)| rows as usize).unwrap_or(24);
        let capacity = rows.saturating_sub(RESERVED_ROWS).clamp(1, options.len());
        // prompt + visible options + hint
        let drawn_lines = (capacity + 2) as u16;
        let mut cursor_pos = 0;
        let mut offset = 0;
        map_display_error!(
            self.draw(&mut stdout, prompt, options, cursor_pos, offset, capacity),
            "draw layer picker"
        )?;

        loop {
            let key = match map_display_error!(event::read(), "read key")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => key,
                _ => continue,
            };

            let action = apply_key(key.code, key.modifiers, cursor_pos, options.len());
            match action {
                PickerAction::Move(next) => {
                    cursor_pos = next;
                    offset = scroll_offset(offset, cursor_pos, capacity);
                    map_display_error!(
                        queue!(
                            stdout,
                            cursor::MoveUp(drawn_lines),
                            cursor::MoveToColumn(0),
                            Clear(ClearType::FromCursorDown)
                        ),
                        "redraw layer picker"
                    )?;
                    map_display_error!(
                        self.draw(&mut stdout, prompt, options, cursor_pos, offset, capacity),
                        "draw layer picker"
                    )?;
                }
                PickerAction::Accept(position) => {
                    map_display_error!(
                        execute!(
                            stdout,
                            cursor::MoveUp(drawn_lines),
                            cursor::MoveToColumn(0),
                            Clear(ClearType::FromCursorDown),
                            Print(format!("{} {}\r\n", prompt, options[position].label))
                        ),
                        "close layer picker"
                    )?;
                    return Ok(options[position].index);
                }
                PickerAction::Cancel => return Err(CliError::SelectionCancelled.into()),
                PickerAction::Ignore => {}
            }
        }
    }
}

impl LayerPicker for TerminalLayerPicker {
    fn pick(&mut self, prompt: &str, options: &[LayerOption]) -> Result<usize> {
        if options.is_empty() {
            return Err(CliError::SelectionCancelled.into());
        }
        if Self::is_interactive() {
            self.pick_interactive(prompt, options)
        } else {
            self.pick_numbered(prompt, options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<LayerOption> {
        ["Parcels", "Roads", "Hydrants"]
            .iter()
            .enumerate()
            .map(|(index, label)| LayerOption {
                label: label.to_string(),
                index,
            })
            .collect()
    }

    #[test]
    fn test_apply_key_moves_and_wraps() {
        let none = KeyModifiers::NONE;
        assert_eq!(apply_key(KeyCode::Down, none, 0, 3), PickerAction::Move(1));
        assert_eq!(apply_key(KeyCode::Down, none, 2, 3), PickerAction::Move(0));
        assert_eq!(apply_key(KeyCode::Up, none, 0, 3), PickerAction::Move(2));
        assert_eq!(apply_key(KeyCode::End, none, 0, 3), PickerAction::Move(2));
        assert_eq!(apply_key(KeyCode::Enter, none, 1, 3), PickerAction::Accept(1));
        assert_eq!(apply_key(KeyCode::Char('x'), none, 1, 3), PickerAction::Ignore);
    }

    #[test]
    fn test_apply_key_cancel() {
        assert_eq!(
            apply_key(KeyCode::Esc, KeyModifiers::NONE, 0, 3),
            PickerAction::Cancel
        );
        assert_eq!(
            apply_key(KeyCode::Char('c'), KeyModifiers::CONTROL, 0, 3),
            PickerAction::Cancel
        );
        assert_eq!(
            apply_key(KeyCode::Enter, KeyModifiers::NONE, 0, 0),
            PickerAction::Cancel
        );
    }

    #[test]
    fn test_render_options_marks_cursor() {
        let lines = render_options(&options(), 1);
        assert_eq!(lines, vec!["  Parcels", "❯ Roads", "  Hydrants"]);
    }

    #[test]
    fn test_scroll_offset_keeps_cursor_visible() {
        // 3 rows visible out of a longer list
        assert_eq!(scroll_offset(0, 2, 3), 0);
        assert_eq!(scroll_offset(0, 3, 3), 1);
        assert_eq!(scroll_offset(1, 9, 3), 7);
        assert_eq!(scroll_offset(7, 6, 3), 6);
        // wrap from the last option back to the first
        assert_eq!(scroll_offset(7, 0, 3), 0);
        assert_eq!(scroll_offset(4, 5, 0), 5);
    }

    #[test]
    fn test_parse_numbered_choice() {
        let options = options();
        assert_eq!(parse_numbered_choice("1", &options).unwrap(), 1);
        assert_eq!(parse_numbered_choice(" 2 \n", &options).unwrap(), 2);
        assert_eq!(parse_numbered_choice("roads", &options).unwrap(), 1);
        assert!(parse_numbered_choice("3", &options).is_err());
        assert!(parse_numbered_choice("Bridges", &options).is_err());
        assert!(parse_numbered_choice("", &options).is_err());
    }
}
