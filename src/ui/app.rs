//! Main application state and logic.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::theme::Theme;
use super::widgets::{KeyHints, Logo, PartCards, TotalsBar};
use crate::builder::{build_question, import_bulk};
use crate::config::Config;
use crate::ledger::{ScoreDelta, ScoreLedger, GROUP_COUNT};
use crate::models::{Question, QuestionBank};
use crate::storage::QuizStorage;
use crate::tokenizer::{tokenize_answer, tokenize_phonetic};

// ══════════════════════════════════════════════════════════════════════════
// Application State
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Edit mode: the question collection.
    QuestionList,
    AddQuestion,
    BulkImport,
    /// Game mode.
    Play,
    Scoreboard,
}

/// A destructive action waiting for its confirming second key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    DeleteQuestion,
    ClearScores,
}

#[derive(Debug, Clone)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
    pub at: Instant,
}

pub struct App {
    pub screen: Screen,
    pub running: bool,

    // Config and theme
    pub config: Config,
    pub theme: Theme,

    // Data
    pub storage: QuizStorage,
    pub bank: QuestionBank,
    pub ledger: ScoreLedger,

    // Question list
    pub list_state: ListState,
    pub pending: Option<Pending>,

    // Play state
    pub current: usize,
    pub part_cursor: usize,
    pub group: usize,

    // Add question state
    pub input_phonetic: String,
    pub input_answer: String,
    pub input_focus: usize, // 0 = phonetic, 1 = answer

    // Bulk import state
    pub import_buffer: String,

    pub scoreboard_return: Screen,
    pub status: Option<Status>,
}

impl App {
    pub fn new(storage: QuizStorage, config: Config) -> Self {
        let bank = storage.load_questions();
        let ledger = storage.load_ledger();
        let theme = Theme::from_name(&config.theme);
        let selected = if bank.is_empty() { None } else { Some(0) };
        tracing::info!(questions = bank.len(), "loaded question collection");

        Self {
            screen: Screen::QuestionList,
            running: true,
            config,
            theme,
            storage,
            bank,
            ledger,
            list_state: ListState::default().with_selected(selected),
            pending: None,
            current: 0,
            part_cursor: 0,
            group: 0,
            input_phonetic: String::new(),
            input_answer: String::new(),
            input_focus: 0,
            import_buffer: String::new(),
            scoreboard_return: Screen::QuestionList,
            status: None,
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status = Some(Status {
            message,
            is_error: false,
            at: Instant::now(),
        });
    }

    pub fn set_error(&mut self, message: String) {
        self.status = Some(Status {
            message,
            is_error: true,
            at: Instant::now(),
        });
    }

    pub fn cycle_theme(&mut self) {
        let new_theme_name = self.theme.name.next();
        self.theme = Theme::new(new_theme_name);
        self.config.theme = new_theme_name.as_str().to_string();
        if let Err(e) = self.config.save() {
            tracing::warn!("could not save config: {:#}", e);
        }
    }

    fn current_question(&self) -> Option<&Question> {
        self.bank.get(self.current)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Edit Mode
    // ══════════════════════════════════════════════════════════════════════

    /// Build a question from the two input fields. On failure the inputs
    /// stay in place for correction.
    pub fn add_question(&mut self) {
        match build_question(&self.input_phonetic, &self.input_answer) {
            Ok(question) => {
                tracing::info!(id = %question.id, parts = question.parts.len(), "question added");
                self.bank.push(question);
                self.storage.save_questions(&self.bank);
                self.list_state.select(Some(self.bank.len() - 1));

                self.input_phonetic.clear();
                self.input_answer.clear();
                self.input_focus = 0;
                self.set_status(format!("Added question {}", self.bank.len()));
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Import the bulk buffer, one question per line.
    pub fn import_buffer(&mut self) {
        let mut result = import_bulk(&self.import_buffer);
        let imported = result.questions.len();
        tracing::info!(imported, skipped = result.error_count, "bulk import");

        if imported > 0 {
            let first_new = self.bank.len();
            self.bank.extend(std::mem::take(&mut result.questions));
            self.storage.save_questions(&self.bank);
            self.list_state.select(Some(first_new));
            self.import_buffer.clear();
        }

        if result.error_count > 0 {
            let message = format!(
                "Imported {} questions, skipped {} lines ({})",
                imported,
                result.error_count,
                result.failed_lines()
            );
            if imported == 0 {
                self.set_error(message);
                return;
            }
            self.set_status(message);
        } else {
            self.set_status(format!("Imported {} questions", imported));
        }
        self.screen = Screen::QuestionList;
    }

    pub fn delete_selected_question(&mut self) {
        self.pending = None;
        let Some(i) = self.list_state.selected() else {
            return;
        };
        let Some(id) = self.bank.get(i).map(|q| q.id.clone()) else {
            return;
        };

        if self.bank.remove(&id).is_some() {
            tracing::info!(%id, "question removed");
            self.storage.save_questions(&self.bank);
        }

        if self.bank.is_empty() {
            self.list_state.select(None);
        } else if i >= self.bank.len() {
            self.list_state.select(Some(self.bank.len() - 1));
        }
    }

    pub fn clear_scores(&mut self) {
        self.pending = None;
        if self.ledger.is_empty() {
            self.set_status("No scores to clear".to_string());
            return;
        }
        self.ledger.reset();
        self.storage.clear_ledger();
        tracing::info!("score ledger cleared");
        self.set_status("Scores cleared".to_string());
    }

    // ══════════════════════════════════════════════════════════════════════
    // Game Mode
    // ══════════════════════════════════════════════════════════════════════

    /// Start a new game session at question `index`. Every card in the
    /// collection goes back to its prompt face.
    pub fn start_game(&mut self, index: usize) {
        if self.bank.is_empty() {
            self.set_error("Add a question first".to_string());
            return;
        }

        self.bank.reset_reveals();
        self.storage.save_questions(&self.bank);
        self.current = index.min(self.bank.len() - 1);
        self.part_cursor = 0;
        self.screen = Screen::Play;
        tracing::info!(start = self.current, "game session started");
    }

    pub fn toggle_part(&mut self, index: usize) {
        let Some(question) = self.bank.get_mut(self.current) else {
            return;
        };
        if let Some(revealed) = question.toggle_reveal(index) {
            tracing::debug!(question = %question.id, part = index, revealed, "card flipped");
            self.part_cursor = index;
            self.storage.save_questions(&self.bank);
        }
    }

    pub fn reveal_all(&mut self) {
        if let Some(question) = self.bank.get_mut(self.current) {
            question.reveal_all();
            self.storage.save_questions(&self.bank);
        }
    }

    pub fn reset_reveals(&mut self) {
        if let Some(question) = self.bank.get_mut(self.current) {
            question.reset_reveals();
            self.storage.save_questions(&self.bank);
        }
    }

    pub fn move_question(&mut self, forward: bool) {
        if self.bank.is_empty() {
            return;
        }
        let last = self.bank.len() - 1;
        self.current = if forward {
            (self.current + 1).min(last)
        } else {
            self.current.saturating_sub(1)
        };
        self.part_cursor = 0;
    }

    pub fn move_part_cursor(&mut self, forward: bool) {
        let count = self.current_question().map_or(0, |q| q.parts.len());
        if count == 0 {
            return;
        }
        self.part_cursor = if forward {
            (self.part_cursor + 1) % count
        } else {
            (self.part_cursor + count - 1) % count
        };
    }

    pub fn cycle_group(&mut self, forward: bool) {
        self.group = if forward {
            (self.group + 1) % GROUP_COUNT
        } else {
            (self.group + GROUP_COUNT - 1) % GROUP_COUNT
        };
    }

    /// Apply one point for the selected group on the current question.
    pub fn score(&mut self, delta: ScoreDelta) {
        let Some(id) = self.current_question().map(|q| q.id.clone()) else {
            return;
        };
        self.ledger.apply_delta(&id, self.group, delta);
        self.storage.save_ledger(&self.ledger);
    }

    pub fn totals(&self) -> Vec<u32> {
        self.ledger.totals(GROUP_COUNT)
    }

    fn group_labels(&self) -> Vec<String> {
        (0..GROUP_COUNT).map(|g| self.config.group_label(g)).collect()
    }

    fn open_scoreboard(&mut self) {
        self.scoreboard_return = self.screen;
        self.screen = Screen::Scoreboard;
    }

    // ══════════════════════════════════════════════════════════════════════
    // Event Handling
    // ══════════════════════════════════════════════════════════════════════

    pub fn handle_events(&mut self) -> anyhow::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Event::Paste(text) => self.handle_paste(&text),
                _ => {}
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::QuestionList => self.handle_list_keys(key.code),
            Screen::AddQuestion => self.handle_add_keys(key.code),
            Screen::BulkImport => self.handle_import_keys(key),
            Screen::Play => self.handle_play_keys(key.code),
            Screen::Scoreboard => self.handle_scoreboard_keys(key.code),
        }
    }

    fn handle_paste(&mut self, text: &str) {
        match self.screen {
            Screen::BulkImport => self.import_buffer.push_str(&text.replace("\r\n", "\n")),
            Screen::AddQuestion => {
                let line = text.lines().next().unwrap_or("");
                if self.input_focus == 0 {
                    self.input_phonetic.push_str(line);
                } else {
                    self.input_answer.push_str(line);
                }
            }
            _ => {}
        }
    }

    fn handle_list_keys(&mut self, key: KeyCode) {
        let pending = self.pending.take();

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Up | KeyCode::Char('k') => {
                if !self.bank.is_empty() {
                    let i = self.list_state.selected().unwrap_or(0);
                    let new_i = if i == 0 { self.bank.len() - 1 } else { i - 1 };
                    self.list_state.select(Some(new_i));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.bank.is_empty() {
                    let i = self.list_state.selected().unwrap_or(0);
                    let new_i = if i >= self.bank.len() - 1 { 0 } else { i + 1 };
                    self.list_state.select(Some(new_i));
                }
            }
            KeyCode::Enter | KeyCode::Char('p') => {
                self.start_game(self.list_state.selected().unwrap_or(0));
            }
            KeyCode::Char('a') => {
                self.input_focus = 0;
                self.screen = Screen::AddQuestion;
            }
            KeyCode::Char('i') => self.screen = Screen::BulkImport,
            KeyCode::Char('s') => self.open_scoreboard(),
            KeyCode::Char('d') => {
                if pending == Some(Pending::DeleteQuestion) {
                    self.delete_selected_question();
                } else if self.list_state.selected().is_some() {
                    self.pending = Some(Pending::DeleteQuestion);
                }
            }
            KeyCode::Char('c') => {
                if pending == Some(Pending::ClearScores) {
                    self.clear_scores();
                } else {
                    self.pending = Some(Pending::ClearScores);
                }
            }
            _ => {}
        }
    }

    fn handle_add_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::QuestionList,
            KeyCode::Tab | KeyCode::BackTab => {
                self.input_focus = (self.input_focus + 1) % 2;
            }
            KeyCode::Enter => {
                if self.input_focus == 0 {
                    self.input_focus = 1;
                } else {
                    self.add_question();
                }
            }
            KeyCode::Char(c) => {
                if self.input_focus == 0 {
                    self.input_phonetic.push(c);
                } else {
                    self.input_answer.push(c);
                }
            }
            KeyCode::Backspace => {
                if self.input_focus == 0 {
                    self.input_phonetic.pop();
                } else {
                    self.input_answer.pop();
                }
            }
            _ => {}
        }
    }

    fn handle_import_keys(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.screen = Screen::QuestionList,
            KeyCode::F(2) => self.import_buffer(),
            KeyCode::Char('s') if ctrl => self.import_buffer(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.import_buffer.push(c),
            KeyCode::Tab => self.import_buffer.push('\t'),
            KeyCode::Enter => self.import_buffer.push('\n'),
            KeyCode::Backspace => {
                self.import_buffer.pop();
            }
            _ => {}
        }
    }

    fn handle_play_keys(&mut self, key: KeyCode) {
        if self.current_question().is_none() {
            self.screen = Screen::QuestionList;
            return;
        }

        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.list_state.select(Some(self.current));
                self.screen = Screen::QuestionList;
            }
            KeyCode::Left | KeyCode::Char('h') => self.move_part_cursor(false),
            KeyCode::Right | KeyCode::Char('l') => self.move_part_cursor(true),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_part(self.part_cursor),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.toggle_part(index);
            }
            KeyCode::Char('a') => self.reveal_all(),
            KeyCode::Char('r') => self.reset_reveals(),
            KeyCode::Char('[') | KeyCode::Char('p') | KeyCode::PageUp => self.move_question(false),
            KeyCode::Char(']') | KeyCode::Char('n') | KeyCode::PageDown => self.move_question(true),
            KeyCode::Tab => self.cycle_group(true),
            KeyCode::BackTab => self.cycle_group(false),
            KeyCode::Char('s') => self.open_scoreboard(),
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char(c) => {
                if let Some(delta) = ScoreDelta::from_key(c) {
                    self.score(delta);
                }
            }
            _ => {}
        }
    }

    fn handle_scoreboard_keys(&mut self, key: KeyCode) {
        let pending = self.pending.take();
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('s') => {
                self.screen = self.scoreboard_return;
            }
            KeyCode::Char('c') => {
                if pending == Some(Pending::ClearScores) {
                    self.clear_scores();
                } else {
                    self.pending = Some(Pending::ClearScores);
                }
            }
            _ => {}
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Rendering
    // ══════════════════════════════════════════════════════════════════════

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.colors.bg_dark)),
            area,
        );

        match self.screen {
            Screen::QuestionList => self.render_question_list(frame, area),
            Screen::AddQuestion => self.render_add_question(frame, area),
            Screen::BulkImport => self.render_bulk_import(frame, area),
            Screen::Play => self.render_play(frame, area),
            Screen::Scoreboard => self.render_scoreboard(frame, area),
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref status) = self.status {
            if status.at.elapsed().as_secs() < 5 {
                let color = if status.is_error {
                    self.theme.colors.error
                } else {
                    self.theme.colors.success
                };
                let line = Paragraph::new(status.message.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(color));
                frame.render_widget(line, area);
            }
        }
    }

    fn render_question_list(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),   // Top padding
            Constraint::Length(5),   // Logo
            Constraint::Length(1),   // Spacing
            Constraint::Min(6),      // List + detail
            Constraint::Length(1),   // Status
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        Logo::render_to(&self.theme, chunks[1], frame.buffer_mut());

        let main = Layout::horizontal([
            Constraint::Percentage(45),
            Constraint::Percentage(55),
        ])
        .split(centered_rect(90, 100, chunks[3]));

        let items: Vec<ListItem> = self
            .bank
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(self.theme.colors.text_dim)),
                    Span::styled(q.phonetic_text(), Style::default().fg(self.theme.colors.text)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.primary))
                    .title(format!(" Questions ({}) ", self.bank.len()))
                    .title_style(self.theme.highlight()),
            )
            .highlight_style(self.theme.selected())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, main[0], &mut self.list_state);

        let selected = self.list_state.selected().and_then(|i| self.bank.get(i));
        self.render_question_detail(frame, main[1], selected);

        self.render_status(frame, chunks[4]);

        let theme_hint = format!("[{}]", self.theme.name.display_name());
        let hints_data: [(&str, &str); 9] = [
            ("j/k", "nav"),
            ("Enter", "play"),
            ("a", "add"),
            ("i", "import"),
            ("d", "del"),
            ("s", "scores"),
            ("c", "clear scores"),
            ("t", theme_hint.as_str()),
            ("q", "quit"),
        ];
        let hints = match self.pending {
            Some(Pending::DeleteQuestion) => KeyHints::new(&[("d", "confirm delete"), ("any", "cancel")], &self.theme),
            Some(Pending::ClearScores) => KeyHints::new(&[("c", "confirm clear scores"), ("any", "cancel")], &self.theme),
            None => KeyHints::new(&hints_data, &self.theme),
        };
        frame.render_widget(hints, chunks[5]);
    }

    fn render_question_detail(&self, frame: &mut Frame, area: Rect, question: Option<&Question>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.text_dim))
            .title(" Parts ")
            .title_style(self.theme.muted());

        let Some(question) = question else {
            let empty = Paragraph::new("No questions yet. Press a to add one or i to import.")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .style(self.theme.muted())
                .block(block);
            frame.render_widget(empty, area);
            return;
        };

        let mut lines: Vec<Line> = question
            .parts
            .iter()
            .map(|part| {
                Line::from(vec![
                    Span::styled(part.phonetic.as_str(), Style::default().fg(self.theme.colors.accent)),
                    Span::styled("  →  ", Style::default().fg(self.theme.colors.text_dim)),
                    Span::styled(part.answer.as_str(), Style::default().fg(self.theme.colors.text)),
                ])
            })
            .collect();

        lines.push(Line::from(""));
        let scores = self.ledger.question_scores(&question.id);
        let mut score_spans = vec![Span::styled("Scores: ", self.theme.muted())];
        for (g, score) in scores.iter().enumerate() {
            score_spans.push(Span::styled(
                format!("{} ", score),
                Style::default().fg(self.theme.group(g)),
            ));
        }
        lines.push(Line::from(score_spans));
        lines.push(Line::from(Span::styled(
            format!("Added {}", question.created_at.format("%Y-%m-%d %H:%M")),
            Style::default().fg(self.theme.colors.text_dim),
        )));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_add_question(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Title
            Constraint::Length(1),   // Spacing
            Constraint::Length(3),   // Phonetic input
            Constraint::Length(1),   // Spacing
            Constraint::Length(3),   // Answer input
            Constraint::Length(1),   // Spacing
            Constraint::Length(1),   // Preview
            Constraint::Min(1),      // Spacer
            Constraint::Length(1),   // Status
            Constraint::Length(2),   // Hints
        ])
        .split(centered_rect(60, 100, area));

        let title = Paragraph::new("Add Question")
            .alignment(Alignment::Center)
            .style(self.theme.title());
        frame.render_widget(title, chunks[0]);

        let fields = [
            (&self.input_phonetic, " Phonetic (Zhuyin) ", chunks[2]),
            (&self.input_answer, " Answer ", chunks[4]),
        ];
        for (i, (text, label, rect)) in fields.into_iter().enumerate() {
            let style = if self.input_focus == i {
                Style::default().fg(self.theme.colors.accent)
            } else {
                Style::default().fg(self.theme.colors.text_muted)
            };
            let input = Paragraph::new(text.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(style)
                    .title(label)
                    .title_style(style),
            );
            frame.render_widget(input, rect);
        }

        // Live unit counts so the host can fix spacing before submitting.
        let phonetic = tokenize_phonetic(&self.input_phonetic).len();
        let answer = tokenize_answer(&self.input_answer).len();
        let color = if phonetic > 0 && phonetic == answer {
            self.theme.colors.success
        } else {
            self.theme.colors.text_muted
        };
        let preview = Paragraph::new(format!("{} phonetic units · {} answer units", phonetic, answer))
            .alignment(Alignment::Center)
            .style(Style::default().fg(color));
        frame.render_widget(preview, chunks[6]);

        self.render_status(frame, chunks[8]);

        let hints = KeyHints::new(
            &[("Tab", "switch field"), ("Enter", "add"), ("Esc", "done")],
            &self.theme,
        );
        frame.render_widget(hints, chunks[9]);
    }

    fn render_bulk_import(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Title
            Constraint::Length(1),   // Help
            Constraint::Min(5),      // Buffer
            Constraint::Length(1),   // Status
            Constraint::Length(2),   // Hints
        ])
        .split(centered_rect(80, 100, area));

        let title = Paragraph::new("Bulk Import")
            .alignment(Alignment::Center)
            .style(self.theme.title());
        frame.render_widget(title, chunks[0]);

        let help = Paragraph::new("One question per line: phonetic, then answer, separated by a tab or two spaces")
            .alignment(Alignment::Center)
            .style(self.theme.muted());
        frame.render_widget(help, chunks[1]);

        let shown = self.import_buffer.replace('\t', " ⇥ ");
        let buffer = Paragraph::new(shown).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.colors.accent))
                .title(format!(" {} lines ", self.import_buffer.lines().count()))
                .title_style(Style::default().fg(self.theme.colors.accent)),
        );
        frame.render_widget(buffer, chunks[2]);

        self.render_status(frame, chunks[3]);

        let hints = KeyHints::new(
            &[("Tab", "column"), ("Enter", "line"), ("Ctrl+S/F2", "import"), ("Esc", "back")],
            &self.theme,
        );
        frame.render_widget(hints, chunks[4]);
    }

    fn render_play(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Header
            Constraint::Min(7),      // Cards
            Constraint::Length(1),   // Question scores
            Constraint::Length(1),   // Separator
            Constraint::Length(1),   // Totals
            Constraint::Length(1),   // Status
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        let Some(question) = self.current_question() else {
            return;
        };

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Question {} / {}", self.current + 1, self.bank.len()),
                self.theme.title(),
            ),
            if question.is_fully_revealed() {
                Span::styled("  ✓", Style::default().fg(self.theme.colors.success))
            } else {
                Span::raw("")
            },
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(header, chunks[0]);

        frame.render_widget(
            PartCards::new(&question.parts, self.part_cursor, &self.theme),
            chunks[1],
        );

        let scores = self.ledger.question_scores(&question.id);
        let labels = self.group_labels();
        let mut spans = vec![Span::styled("This question: ", self.theme.muted())];
        for (g, score) in scores.iter().enumerate() {
            spans.push(Span::styled(
                format!("{}:{}  ", labels[g], score),
                Style::default().fg(self.theme.group(g)),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), chunks[2]);

        let totals = self.totals();
        frame.render_widget(
            TotalsBar::new(&totals, &labels, Some(self.group), &self.theme),
            chunks[4],
        );

        self.render_status(frame, chunks[5]);

        let hints = KeyHints::new(
            &[
                ("←/→", "part"),
                ("Space/1-9", "flip"),
                ("a", "all"),
                ("r", "reset"),
                ("[/]", "question"),
                ("Tab", "group"),
                ("+/-", "score"),
                ("s", "scores"),
                ("Esc", "edit"),
            ],
            &self.theme,
        );
        frame.render_widget(hints, chunks[6]);
    }

    fn render_scoreboard(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Title
            Constraint::Min(5),      // Table
            Constraint::Length(1),   // Status
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        let title = Paragraph::new("Scoreboard")
            .alignment(Alignment::Center)
            .style(self.theme.title());
        frame.render_widget(title, chunks[0]);

        let labels = self.group_labels();
        let header = Row::new(
            std::iter::once(Cell::from("Question")).chain(labels.iter().enumerate().map(|(g, l)| {
                Cell::from(l.as_str()).style(
                    Style::default()
                        .fg(self.theme.group(g))
                        .add_modifier(Modifier::BOLD),
                )
            })),
        )
        .style(self.theme.highlight());

        let rows: Vec<Row> = self
            .bank
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let scores = self.ledger.question_scores(&q.id);
                Row::new(
                    std::iter::once(Cell::from(format!("{}. {}", i + 1, q.answer_text())))
                        .chain(scores.iter().map(|s| Cell::from(s.to_string()))),
                )
                .style(Style::default().fg(self.theme.colors.text))
            })
            .collect();

        let totals = self.totals();
        let footer = Row::new(
            std::iter::once(Cell::from("Total"))
                .chain(totals.iter().map(|t| Cell::from(t.to_string()))),
        )
        .style(
            Style::default()
                .fg(self.theme.colors.accent)
                .add_modifier(Modifier::BOLD),
        );

        let widths = std::iter::once(Constraint::Min(16))
            .chain(std::iter::repeat(Constraint::Length(6)).take(GROUP_COUNT));
        let table = Table::new(rows, widths)
            .header(header)
            .footer(footer)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.primary)),
            );
        frame.render_widget(table, centered_rect(90, 100, chunks[1]));

        self.render_status(frame, chunks[2]);

        let hints = if self.pending == Some(Pending::ClearScores) {
            KeyHints::new(&[("c", "confirm clear scores"), ("any", "cancel")], &self.theme)
        } else {
            KeyHints::new(&[("c", "clear scores"), ("Esc", "back")], &self.theme)
        };
        frame.render_widget(hints, chunks[3]);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helper Functions
// ══════════════════════════════════════════════════════════════════════════

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        App::new(QuizStorage::in_memory(), Config::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_with(lines: &str) -> App {
        let mut app = app();
        app.import_buffer = lines.to_string();
        app.import_buffer();
        app
    }

    #[test]
    fn add_question_from_inputs() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.screen, Screen::AddQuestion);

        type_str(&mut app, "ㄏㄅ");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "紅包");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.bank.len(), 1);
        assert!(app.input_phonetic.is_empty());
        assert_eq!(app.input_focus, 0);
        assert_eq!(app.storage.load_questions(), app.bank);
    }

    #[test]
    fn mismatched_question_keeps_inputs() {
        let mut app = app();
        app.input_phonetic = "ㄑㄜ".into();
        app.input_answer = "企".into();
        app.add_question();

        assert!(app.bank.is_empty());
        assert_eq!(app.input_phonetic, "ㄑㄜ");
        let status = app.status.as_ref().unwrap();
        assert!(status.is_error);
        assert!(status.message.contains('2') && status.message.contains('1'));
    }

    #[test]
    fn bulk_import_through_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "ㄋㄖㄇ");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "牛肉麵");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "badline");
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert_eq!(app.bank.len(), 1);
        assert_eq!(app.screen, Screen::QuestionList);
        assert!(app.import_buffer.is_empty());
        assert!(app.status.as_ref().unwrap().message.contains("skipped 1 lines (2)"));
    }

    #[test]
    fn failed_bulk_import_keeps_buffer() {
        let mut app = app();
        app.screen = Screen::BulkImport;
        app.import_buffer = "nothing here".into();
        press(&mut app, KeyCode::F(2));

        assert!(app.bank.is_empty());
        assert_eq!(app.screen, Screen::BulkImport);
        assert_eq!(app.import_buffer, "nothing here");
    }

    #[test]
    fn paste_fills_import_buffer() {
        let mut app = app();
        app.screen = Screen::BulkImport;
        app.handle_paste("ㄏㄅ\t紅包\r\nㄋ\t牛\r\n");
        assert_eq!(app.import_buffer, "ㄏㄅ\t紅包\nㄋ\t牛\n");
    }

    #[test]
    fn starting_a_game_resets_every_reveal_flag() {
        let mut app = app_with("ㄏㄅ\t紅包\nㄋ\t牛");
        app.bank.get_mut(0).unwrap().reveal_all();
        app.bank.get_mut(1).unwrap().reveal_all();

        app.list_state.select(Some(1));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Play);
        assert_eq!(app.current, 1);
        assert!(app.bank.questions().iter().all(|q| q.parts.iter().all(|p| !p.revealed)));
        assert_eq!(app.storage.load_questions(), app.bank);
    }

    #[test]
    fn flipping_cards_in_play() {
        let mut app = app_with("ㄇㄕㄈㄘ\t馬上發財");
        app.start_game(0);

        press(&mut app, KeyCode::Char('3'));
        assert!(app.bank.get(0).unwrap().parts[2].revealed);
        assert_eq!(app.part_cursor, 2);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.bank.get(0).unwrap().parts[3].revealed);

        press(&mut app, KeyCode::Char('a'));
        assert!(app.bank.get(0).unwrap().is_fully_revealed());
        press(&mut app, KeyCode::Char('r'));
        assert!(app.bank.get(0).unwrap().parts.iter().all(|p| !p.revealed));

        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.storage.load_questions(), app.bank);
    }

    #[test]
    fn scoring_selected_group_in_play() {
        let mut app = app_with("ㄏㄅ\t紅包\nㄋ\t牛");
        app.start_game(0);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char('-'));

        let first = app.bank.get(0).unwrap().id.clone();
        let second = app.bank.get(1).unwrap().id.clone();
        assert_eq!(app.ledger.score(&first, 2), 2);
        assert_eq!(app.ledger.score(&second, 2), 1);
        assert_eq!(app.ledger.score(&second, 1), 0);
        assert_eq!(app.totals()[2], 3);
        assert_eq!(app.storage.load_ledger(), app.ledger);
    }

    #[test]
    fn group_selection_wraps() {
        let mut app = app();
        app.cycle_group(false);
        assert_eq!(app.group, GROUP_COUNT - 1);
        app.cycle_group(true);
        assert_eq!(app.group, 0);
    }

    #[test]
    fn question_navigation_is_clamped() {
        let mut app = app_with("ㄏㄅ\t紅包\nㄋ\t牛");
        app.start_game(0);
        app.move_question(false);
        assert_eq!(app.current, 0);
        app.move_question(true);
        app.move_question(true);
        assert_eq!(app.current, 1);
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app_with("ㄏㄅ\t紅包\nㄋ\t牛");
        app.list_state.select(Some(1));

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.bank.len(), 2);

        app.list_state.select(Some(1));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.bank.len(), 1);
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(app.storage.load_questions().len(), 1);
    }

    #[test]
    fn removing_a_question_keeps_its_scores() {
        let mut app = app_with("ㄏㄅ\t紅包\nㄋ\t牛");
        app.start_game(1);
        app.score(ScoreDelta::Add);
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.bank.len(), 1);
        assert_eq!(app.totals()[0], 1);
    }

    #[test]
    fn clear_scores_from_scoreboard() {
        let mut app = app_with("ㄏㄅ\t紅包");
        app.start_game(0);
        app.score(ScoreDelta::Add);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.screen, Screen::Scoreboard);
        press(&mut app, KeyCode::Char('c'));
        assert!(!app.ledger.is_empty());
        press(&mut app, KeyCode::Char('c'));
        assert!(app.ledger.is_empty());
        assert!(app.storage.load_ledger().is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Play);
    }

    #[test]
    fn play_needs_questions() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::QuestionList);
        assert!(app.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn play_without_a_question_falls_back_on_key_press() {
        let mut app = app();
        app.screen = Screen::Play;
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|frame| app.render(frame)).unwrap();
        assert_eq!(app.screen, Screen::Play);

        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.screen, Screen::QuestionList);
        assert!(app.ledger.is_empty());
    }

    #[test]
    fn every_screen_renders() {
        let mut app = app_with("ㄏㄨㄥˊ ㄅㄠ\t紅包\nㄆㄎㄛㄈㄉㄘ\tPin k oi 發大財");
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();

        for screen in [
            Screen::QuestionList,
            Screen::AddQuestion,
            Screen::BulkImport,
            Screen::Scoreboard,
        ] {
            app.screen = screen;
            terminal.draw(|frame| app.render(frame)).unwrap();
        }

        app.start_game(1);
        terminal.draw(|frame| app.render(frame)).unwrap();
        assert_eq!(app.screen, Screen::Play);
    }
}
