use std::{io::{Stdout, Write, stdout}, time::Duration};

use crate::error::AppError;
use crate::render::{Canvas, Glyph};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, read, poll};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<Glyph>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: (u16, u16),
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new() -> Result<Self, AppError> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![Glyph::BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<(), AppError> {
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()?;
        Ok(())
    }

    /// Best effort: keeps going after a failed step so the terminal ends up
    /// as usable as possible.
    pub fn restore(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(
            self.stdout,
            style::ResetColor,
            DisableMouseCapture,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        );
    }

    pub fn read_event_blocking(&self) -> Result<Event, AppError> {
        Ok(read()?)
    }

    /// Waits up to `timeout` for the first event, then collects whatever else
    /// is already pending without waiting again.
    pub fn read_events(&self, timeout: Duration) -> Result<Vec<Event>, AppError> {
        let mut events = vec![];

        if poll(timeout)? {
            events.push(read()?);
            while poll(Duration::from_millis(0))? {
                events.push(read()?);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn ensure_fits(&self, cols: u16, rows: u16) -> Result<(), AppError> {
        if self.width < cols || self.height < rows {
            return Err(AppError::TerminalTooSmall {
                need_cols: cols,
                need_rows: rows,
                have_cols: self.width,
                have_rows: self.height,
            });
        }
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), AppError> {
        self.width = width;
        self.height = height;
        self.current_msg = None;
        self.clear()
    }

    /// Paints the canvas centred on the screen, touching only the glyphs that
    /// changed since the last frame.
    pub fn present(&mut self, canvas: &Canvas) -> Result<(), AppError> {
        let origin_x = self.width.saturating_sub(canvas.width()) / 2;
        let origin_y = self.height.saturating_sub(canvas.height()) / 2;

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let pos = (origin_x + x, origin_y + y);
                if pos.0 >= self.width || pos.1 >= self.height {
                    continue;
                }

                let glyph = canvas.get(x, y);
                if self.screen[self.index(pos)] != glyph {
                    self.print_at(pos, glyph)?;
                }
            }
        }

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<(), AppError> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        queue!(self.stdout, style::SetForegroundColor(Color::White))?;

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<(), AppError> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let pos = (top_left.0 + x_diff, top_left.1 + y_diff);
                if pos.0 >= self.width || pos.1 >= self.height {
                    continue;
                }
                let glyph = self.screen[self.index(pos)];
                self.print_at(pos, glyph)?;
            }
        }

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }

    pub fn clear(&mut self) -> Result<(), AppError> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![Glyph::BLANK; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), AppError> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at(&mut self, pos: (u16, u16), glyph: Glyph) -> Result<(), AppError> {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(glyph.color),
            style::Print(glyph.ch)
        )?;
        let i = self.index(pos);
        self.screen[i] = glyph;
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: (u16, u16), ch: char) -> Result<(), AppError> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        if pos.0 < self.width && pos.1 < self.height {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        }
        Ok(())
    }

    fn index(&self, pos: (u16, u16)) -> usize {
        self.width as usize * pos.1 as usize + pos.0 as usize
    }
}

impl Message {
    pub fn new(width: u16, height: u16, top_left: (u16, u16)) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn top_left(&self) -> (u16, u16) {
        self.top_left
    }
}
