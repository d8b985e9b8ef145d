mod preview;

use std::collections::HashMap;
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

use anyhow::Result;
use blockline_config::Config;
use blockline_engine::{
    BlockId, Cmd, Cursor, Document, DocumentSummary, KeyInput, Patch,
    io::{self as store},
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Per-document editing state: the engine plus the render resources the
/// host owns on its behalf.
struct Editor {
    doc: Document,
    focused: BlockId,
    /// Byte offset of the cursor within the focused block's content
    cursor: usize,
    dirty: bool,
    /// One preview per block, mounted on create and torn down on remove
    previews: HashMap<BlockId, String>,
}

impl Editor {
    fn open(doc: Document) -> Self {
        let focused = doc.outline.blocks()[0].id;
        let previews = doc
            .outline
            .blocks()
            .iter()
            .map(|b| (b.id, preview::render_block(&b.content)))
            .collect();
        Self {
            doc,
            focused,
            cursor: 0,
            dirty: false,
            previews,
        }
    }

    fn focused_content(&self) -> &str {
        self.doc
            .outline
            .get(self.focused)
            .map(|b| b.content.as_str())
            .unwrap_or("")
    }

    /// Route an engine-level key through the dispatch table and honor the
    /// resulting patch: mount/teardown previews, move focus, place cursor.
    fn apply_key(&mut self, key: KeyInput) {
        let version_before = self.doc.outline.version();
        let previously_focused = self.focused;

        let patch = self.doc.outline.apply(Cmd::for_key(key, self.focused));
        self.honor_patch(&patch, previously_focused);

        if patch.version != version_before {
            self.dirty = true;
        }
    }

    fn honor_patch(&mut self, patch: &Patch, previously_focused: BlockId) {
        if let Some(created) = patch.created {
            // Mount a render resource for the new block
            self.previews.insert(created, String::new());
        }
        if let Some(removed) = patch.removed {
            // Tear down before dropping the block
            self.previews.remove(&removed);
        }
        if let Some(focus) = patch.focus {
            if focus.block != previously_focused {
                self.blur(previously_focused);
            }
            self.focused = focus.block;
            let len = self.focused_content().len();
            self.cursor = match focus.cursor {
                Cursor::Start => 0,
                Cursor::End => len,
                Cursor::Offset(offset) => offset.min(len),
                Cursor::Unchanged => self.cursor.min(len),
            };
        } else {
            self.cursor = self.cursor.min(self.focused_content().len());
        }
    }

    /// Leaving edit mode on a block: regenerate its preview.
    fn blur(&mut self, id: BlockId) {
        if let Some(block) = self.doc.outline.get(id) {
            self.previews
                .insert(id, preview::render_block(&block.content));
        }
    }

    fn insert_char(&mut self, c: char) {
        let mut content = self.focused_content().to_string();
        content.insert(self.cursor, c);
        self.doc.outline.apply(Cmd::SetContent {
            id: self.focused,
            text: content,
        });
        self.cursor += c.len_utf8();
        self.dirty = true;
    }

    fn delete_char_before_cursor(&mut self) {
        let content = self.focused_content();
        let new_cursor = prev_char_boundary(content, self.cursor);
        let mut edited = content.to_string();
        edited.drain(new_cursor..self.cursor);
        self.doc.outline.apply(Cmd::SetContent {
            id: self.focused,
            text: edited,
        });
        self.cursor = new_cursor;
        self.dirty = true;
    }

    fn cursor_left(&mut self) {
        self.cursor = prev_char_boundary(self.focused_content(), self.cursor);
    }

    fn cursor_right(&mut self) {
        self.cursor = next_char_boundary(self.focused_content(), self.cursor);
    }

    fn save(&mut self, root: &std::path::Path) -> Result<()> {
        store::save_document(root, &self.doc)?;
        self.dirty = false;
        info!(id = %self.doc.id, "document saved");
        Ok(())
    }
}

fn prev_char_boundary(s: &str, ix: usize) -> usize {
    s[..ix]
        .chars()
        .next_back()
        .map(|c| ix - c.len_utf8())
        .unwrap_or(0)
}

fn next_char_boundary(s: &str, ix: usize) -> usize {
    s[ix..]
        .chars()
        .next()
        .map(|c| ix + c.len_utf8())
        .unwrap_or(s.len())
}

struct App {
    documents_path: PathBuf,
    summaries: Vec<DocumentSummary>,
    list_state: ListState,
    editor: Option<Editor>,
    status: String,
}

impl App {
    fn new(documents_path: PathBuf) -> Result<Self> {
        let mut app = Self {
            documents_path,
            summaries: Vec::new(),
            list_state: ListState::default(),
            editor: None,
            status: String::new(),
        };
        app.refresh_summaries()?;
        Ok(app)
    }

    fn refresh_summaries(&mut self) -> Result<()> {
        self.summaries = store::list_documents(&self.documents_path)?;
        if self.summaries.is_empty() {
            self.list_state.select(None);
        } else {
            let selected = self.list_state.selected().unwrap_or(0);
            self.list_state
                .select(Some(selected.min(self.summaries.len() - 1)));
        }
        Ok(())
    }

    fn next_document(&mut self) {
        if self.summaries.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.summaries.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_document(&mut self) {
        if self.summaries.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.summaries.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn open_selected(&mut self) {
        let Some(summary) = self
            .list_state
            .selected()
            .and_then(|i| self.summaries.get(i))
        else {
            return;
        };
        match store::load_document(&self.documents_path, summary.id) {
            Ok(doc) => self.editor = Some(Editor::open(doc)),
            Err(e) => self.status = format!("failed to open: {e}"),
        }
    }

    fn open_todays_journal(&mut self) {
        match store::load_or_create_todays_journal(&self.documents_path) {
            Ok(doc) => {
                self.editor = Some(Editor::open(doc));
                let _ = self.refresh_summaries();
            }
            Err(e) => self.status = format!("failed to open journal: {e}"),
        }
    }

    fn create_document(&mut self) {
        let doc = Document::new("Untitled");
        match store::save_document(&self.documents_path, &doc) {
            Ok(()) => {
                self.editor = Some(Editor::open(doc));
                let _ = self.refresh_summaries();
            }
            Err(e) => self.status = format!("failed to create: {e}"),
        }
    }

    fn delete_selected(&mut self) {
        let Some(summary) = self
            .list_state
            .selected()
            .and_then(|i| self.summaries.get(i))
        else {
            return;
        };
        match store::delete_document(&self.documents_path, summary.id) {
            Ok(()) => {
                self.status = format!("deleted \"{}\"", summary.title);
                let _ = self.refresh_summaries();
            }
            Err(e) => self.status = format!("failed to delete: {e}"),
        }
    }

    /// Save (if dirty) and drop back to the document list.
    fn close_editor(&mut self) {
        if let Some(mut editor) = self.editor.take() {
            if editor.dirty {
                if let Err(e) = editor.save(&self.documents_path) {
                    self.status = format!("failed to save: {e}");
                    self.editor = Some(editor);
                    return;
                }
            }
            let _ = self.refresh_summaries();
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .init();

    let documents_path = resolve_documents_path();
    fs::create_dir_all(&documents_path)?;
    if let Err(e) = store::validate_documents_dir(&documents_path) {
        eprintln!(
            "Error: documents path '{}' is invalid: {e}",
            documents_path.display()
        );
        process::exit(1);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(documents_path)?;
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn resolve_documents_path() -> PathBuf {
    let args: Vec<String> = env::args().collect();
    if args.len() == 2 {
        return PathBuf::from(&args[1]);
    }
    if args.len() > 2 {
        eprintln!("Usage: {} [documents-folder-path]", args[0]);
        process::exit(1);
    }
    match Config::load() {
        Ok(Some(config)) => config.documents_path,
        Ok(None) => {
            eprintln!("Error: no documents path provided and no config file found");
            eprintln!("Usage: {} <documents-folder-path>", args[0]);
            eprintln!(
                "Or create a config file at {}",
                Config::config_path().display()
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: failed to load config file: {e}");
            process::exit(1);
        }
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };

        if let Some(editor) = app.editor.as_mut() {
            match key.code {
                KeyCode::Esc => app.close_editor(),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if let Err(e) = editor.save(&app.documents_path) {
                        app.status = format!("failed to save: {e}");
                    }
                }
                KeyCode::Tab => editor.apply_key(KeyInput::Tab),
                KeyCode::BackTab => editor.apply_key(KeyInput::ShiftTab),
                KeyCode::Enter => editor.apply_key(KeyInput::Enter),
                KeyCode::Up => editor.apply_key(KeyInput::ArrowUp),
                KeyCode::Down => editor.apply_key(KeyInput::ArrowDown),
                KeyCode::Backspace => {
                    // Only a backspace at the very start of a block is a
                    // structural edit; anywhere else it is text editing
                    if editor.cursor == 0 {
                        let content_empty = editor.focused_content().is_empty();
                        editor.apply_key(KeyInput::BackspaceAtStart { content_empty });
                    } else {
                        editor.delete_char_before_cursor();
                    }
                }
                KeyCode::Left => editor.cursor_left(),
                KeyCode::Right => editor.cursor_right(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    editor.insert_char(c);
                }
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_document(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_document(),
                KeyCode::Enter => app.open_selected(),
                KeyCode::Char('t') => app.open_todays_journal(),
                KeyCode::Char('n') => app.create_document(),
                KeyCode::Char('d') => app.delete_selected(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    if app.editor.is_some() {
        editor_ui(f, app, chunks[0]);
    } else {
        browser_ui(f, app, chunks[0]);
    }

    let help = if app.editor.is_some() {
        "Esc: Back (saves) | ^S: Save | Tab/S-Tab: Indent | Enter: New block | ↑/↓: Move"
    } else {
        "q: Quit | ↑/↓ j/k: Select | Enter: Open | t: Today's journal | n: New | d: Delete"
    };
    let mut lines = vec![Line::from(help)];
    if !app.status.is_empty() {
        lines.push(Line::from(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    f.render_widget(Paragraph::new(lines), chunks[1]);
}

fn browser_ui(f: &mut Frame, app: &mut App, area: ratatui::layout::Rect) {
    let items: Vec<ListItem> = app
        .summaries
        .iter()
        .map(|summary| {
            let date = summary.date.format("%Y-%m-%d");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{date}  "), Style::default().fg(Color::DarkGray)),
                Span::raw(summary.title.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Documents"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn editor_ui(f: &mut Frame, app: &mut App, area: ratatui::layout::Rect) {
    let Some(editor) = app.editor.as_ref() else {
        return;
    };

    let lines: Vec<Line> = editor
        .doc
        .outline
        .blocks()
        .iter()
        .map(|block| {
            let indent = "  ".repeat(block.indent);
            if block.id == editor.focused {
                // Edit mode: raw markdown source with a visible cursor
                let (before, after) = block.content.split_at(editor.cursor.min(block.content.len()));
                Line::from(vec![
                    Span::raw(indent),
                    Span::styled("• ", Style::default().fg(Color::Yellow)),
                    Span::raw(before.to_string()),
                    Span::styled("▏", Style::default().fg(Color::Yellow)),
                    Span::raw(after.to_string()),
                ])
                .style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                // Display mode: rendered preview
                let text = editor
                    .previews
                    .get(&block.id)
                    .cloned()
                    .unwrap_or_else(|| preview::render_block(&block.content));
                Line::from(vec![
                    Span::raw(indent),
                    Span::styled("• ", Style::default().fg(Color::DarkGray)),
                    Span::raw(text),
                ])
            }
        })
        .collect();

    let title = if editor.dirty {
        format!("{} *", editor.doc.title)
    } else {
        editor.doc.title.clone()
    };
    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(body, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    fn editor_with(content: &str) -> Editor {
        let mut doc = Document::new("test");
        let first = doc.outline.blocks()[0].id;
        doc.outline.set_content(first, content);
        Editor::open(doc)
    }

    #[test]
    fn test_enter_moves_focus_to_new_empty_block() {
        let mut editor = editor_with("hello");
        let first = editor.focused;

        editor.apply_key(KeyInput::Enter);

        assert_ne!(editor.focused, first);
        assert_eq!(editor.focused_content(), "");
        assert_eq!(editor.cursor, 0);
        assert!(editor.dirty);
    }

    #[test]
    fn test_enter_mounts_preview_and_blurs_old_block() {
        let mut editor = editor_with("**bold**");
        let first = editor.focused;

        editor.apply_key(KeyInput::Enter);

        // Old block left edit mode, so its preview reflects its content
        assert_eq!(editor.previews.get(&first).unwrap(), "bold");
        assert!(editor.previews.contains_key(&editor.focused));
    }

    #[test]
    fn test_backspace_merge_places_cursor_at_join() {
        let mut editor = editor_with("foo");
        editor.apply_key(KeyInput::Enter);
        editor.insert_char('b');
        editor.insert_char('a');
        editor.insert_char('r');
        editor.cursor = 0;

        editor.apply_key(KeyInput::BackspaceAtStart {
            content_empty: false,
        });

        assert_eq!(editor.focused_content(), "foobar");
        assert_eq!(editor.cursor, 3);
        assert_eq!(editor.previews.len(), 1);
    }

    #[test]
    fn test_removed_block_preview_is_torn_down() {
        let mut editor = editor_with("a");
        editor.apply_key(KeyInput::Enter);
        let second = editor.focused;

        editor.apply_key(KeyInput::BackspaceAtStart {
            content_empty: true,
        });

        assert!(!editor.previews.contains_key(&second));
        assert_eq!(editor.cursor, editor.focused_content().len());
    }

    #[test]
    fn test_cursor_movement_respects_char_boundaries() {
        let mut editor = editor_with("aé");
        editor.cursor = 0;
        editor.cursor_right();
        assert_eq!(editor.cursor, 1);
        editor.cursor_right();
        assert_eq!(editor.cursor, 3);
        editor.cursor_left();
        assert_eq!(editor.cursor, 1);
    }
}
