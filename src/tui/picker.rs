//! Interactive session picker
//!
//! A filterable list prompt: typing narrows the list by substring, arrows
//! move, Enter selects and Esc cancels.

use std::io::{self, Stdout};

use async_trait::async_trait;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal, TerminalOptions, Viewport,
};
use tracing::{debug, info};

use super::Theme;
use crate::error::{Result, TuiError};
use crate::session::Prompter;

/// Rows used by the inline (non-fullscreen) picker
const INLINE_HEIGHT: u16 = 12;

/// Commands triggered by input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerCommand {
    NavigateUp,
    NavigateDown,
    Select,
    Cancel,
    TextInput(char),
    Backspace,
}

impl PickerCommand {
    /// Convert a key event to a picker command
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match (key.code, key.modifiers) {
            (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => {
                Some(Self::NavigateUp)
            }
            (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
                Some(Self::NavigateDown)
            }
            (KeyCode::Enter, _) => Some(Self::Select),
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Self::Cancel),
            (KeyCode::Backspace, _) => Some(Self::Backspace),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                Some(Self::TextInput(c))
            }
            _ => None,
        }
    }
}

/// Outcome of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    Selected(usize),
    Cancelled,
}

/// Query, filtered view and cursor of the picker
#[derive(Debug)]
pub struct PickerState<'a> {
    items: &'a [String],
    query: String,
    /// Indices into `items` matching the query
    visible: Vec<usize>,
    list_state: ListState,
}

impl<'a> PickerState<'a> {
    pub fn new(items: &'a [String]) -> Self {
        let mut state = Self {
            items,
            query: String::new(),
            visible: Vec::new(),
            list_state: ListState::default(),
        };
        state.refilter();
        state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Indices of the items currently shown
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// Index (into the unfiltered items) under the cursor
    pub fn selected(&self) -> Option<usize> {
        self.list_state
            .selected()
            .and_then(|row| self.visible.get(row).copied())
    }

    fn refilter(&mut self) {
        let query = self.query.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect();
        self.list_state
            .select((!self.visible.is_empty()).then_some(0));
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let row = self.list_state.selected().unwrap_or(0);
        let row = if down { (row + 1) % len } else { (row + len - 1) % len };
        self.list_state.select(Some(row));
    }

    pub fn apply(&mut self, command: PickerCommand) -> PickerOutcome {
        match command {
            PickerCommand::NavigateUp => self.move_cursor(false),
            PickerCommand::NavigateDown => self.move_cursor(true),
            PickerCommand::Select => {
                if let Some(index) = self.selected() {
                    return PickerOutcome::Selected(index);
                }
            }
            PickerCommand::Cancel => return PickerOutcome::Cancelled,
            PickerCommand::TextInput(c) => {
                self.query.push(c);
                self.refilter();
            }
            PickerCommand::Backspace => {
                self.query.pop();
                self.refilter();
            }
        }
        PickerOutcome::Pending
    }

    fn render(&mut self, frame: &mut Frame, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(frame.area());

        let prompt = Line::from(vec![
            Span::styled("> ", theme.prompt()),
            Span::raw(self.query.as_str()),
        ]);
        frame.render_widget(Paragraph::new(prompt), chunks[0]);

        let items: Vec<ListItem> = self
            .visible
            .iter()
            .map(|&index| ListItem::new(self.items[index].as_str()))
            .collect();
        let title = format!(" Sessions {}/{} ", self.visible.len(), self.items.len());
        let list = List::new(items)
            .block(
                Block::default()
                    .title(Span::styled(title, theme.secondary()))
                    .borders(Borders::TOP)
                    .border_style(theme.border()),
            )
            .highlight_style(theme.selection())
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }
}

/// Terminal prompt implementing `Prompter`
#[derive(Debug, Clone)]
pub struct Picker {
    /// Use the alternate screen instead of an inline viewport
    fullscreen: bool,
    theme: Theme,
}

impl Picker {
    pub fn new(fullscreen: bool) -> Self {
        Self {
            fullscreen,
            theme: Theme::default(),
        }
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| TuiError::InitFailed(e.to_string()))?;

        let mut stdout = io::stdout();
        let viewport = if self.fullscreen {
            execute!(stdout, EnterAlternateScreen)
                .map_err(|e| TuiError::InitFailed(e.to_string()))?;
            Viewport::Fullscreen
        } else {
            Viewport::Inline(INLINE_HEIGHT)
        };

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::with_options(backend, TerminalOptions { viewport })
            .map_err(|e| TuiError::InitFailed(e.to_string()))?;

        Ok(terminal)
    }

    fn restore_terminal(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        if self.fullscreen {
            execute!(terminal.backend_mut(), LeaveAlternateScreen)
                .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;
        } else {
            terminal
                .clear()
                .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;
        }

        terminal
            .show_cursor()
            .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;
        Ok(())
    }

    async fn main_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        state: &mut PickerState<'_>,
    ) -> Result<Option<usize>> {
        let mut events = EventStream::new();
        loop {
            terminal
                .draw(|f| state.render(f, &self.theme))
                .map_err(|e| TuiError::RenderError(e.to_string()))?;

            let Some(event) = events.next().await else {
                return Ok(None);
            };
            let event = event.map_err(|e| TuiError::EventError(e.to_string()))?;

            let Event::Key(key) = event else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let Some(command) = PickerCommand::from_key(key) else {
                continue;
            };

            match state.apply(command) {
                PickerOutcome::Pending => {}
                PickerOutcome::Selected(index) => return Ok(Some(index)),
                PickerOutcome::Cancelled => return Ok(None),
            }
        }
    }
}

#[async_trait]
impl Prompter for Picker {
    async fn prompt(&self, items: &[String]) -> Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }

        let mut terminal = self.setup_terminal()?;
        let mut state = PickerState::new(items);
        let result = self.main_loop(&mut terminal, &mut state).await;
        self.restore_terminal(&mut terminal)?;

        match &result {
            Ok(Some(index)) => info!("Picked {}", items[*index]),
            Ok(None) => debug!("Picker cancelled"),
            Err(e) => debug!("Picker failed: {}", e),
        }
        result
    }
}
