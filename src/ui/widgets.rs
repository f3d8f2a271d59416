//! Custom widgets for the quiz TUI.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::models::QuestionPart;

// ══════════════════════════════════════════════════════════════════════════
// Logo Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct Logo;

impl Logo {
    const ART: &'static str = r#"
    ╭───────────────────────────────────────╮
    │   ┌───┐ ┌───┐ ┌───┐      ┌───┐ ┌───┐  │
    │   │ ㄓ│ │ ㄨ│ │ ㄧ│  ->  │ 注│ │ 音│  │
    │   └───┘ └───┘ └───┘      └───┘ └───┘  │
    │        Z H U Y I N    Q U I Z         │
    ╰───────────────────────────────────────╯"#;

    pub fn render_to(theme: &Theme, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = Self::ART
            .lines()
            .skip(1)
            .map(|line| Line::from(Span::styled(line, Style::default().fg(theme.colors.primary))))
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Part Cards Widget
// ══════════════════════════════════════════════════════════════════════════

/// A question's parts laid out as a row of flip cards, wrapping when the
/// row does not fit.
pub struct PartCards<'a> {
    parts: &'a [QuestionPart],
    cursor: usize,
    theme: &'a Theme,
}

impl<'a> PartCards<'a> {
    const HEIGHT: u16 = 5;
    const GAP: u16 = 1;

    pub fn new(parts: &'a [QuestionPart], cursor: usize, theme: &'a Theme) -> Self {
        Self { parts, cursor, theme }
    }

    /// Wide enough for either face of the widest part.
    fn card_width(&self) -> u16 {
        let widest = self
            .parts
            .iter()
            .map(|p| p.phonetic.width().max(p.answer.width()))
            .max()
            .unwrap_or(1);
        (widest as u16).saturating_add(4).max(7)
    }
}

impl Widget for PartCards<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.parts.is_empty() || area.width == 0 {
            return;
        }

        let card_w = self.card_width().min(area.width);
        let per_row = ((area.width + Self::GAP) / (card_w + Self::GAP)).max(1) as usize;
        let rows = self.parts.len().div_ceil(per_row) as u16;
        let top = area.y + area.height.saturating_sub(rows * Self::HEIGHT) / 2;

        for (row, chunk) in self.parts.chunks(per_row).enumerate() {
            let row_w = chunk.len() as u16 * (card_w + Self::GAP) - Self::GAP;
            let left = area.x + area.width.saturating_sub(row_w) / 2;

            for (col, part) in chunk.iter().enumerate() {
                let index = row * per_row + col;
                let rect = Rect {
                    x: left + col as u16 * (card_w + Self::GAP),
                    y: top + row as u16 * Self::HEIGHT,
                    width: card_w,
                    height: Self::HEIGHT,
                }
                .intersection(area);
                if rect.is_empty() {
                    continue;
                }

                let face_style = if part.revealed {
                    self.theme.card_answer()
                } else {
                    self.theme.card_prompt()
                };
                let border_style = if index == self.cursor {
                    Style::default()
                        .fg(self.theme.colors.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.colors.text_dim)
                };

                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border_style)
                    .style(Style::default().bg(face_style.bg.unwrap_or(self.theme.colors.bg_card)))
                    .title_bottom(Line::from(format!(" {} ", index + 1)).centered());

                let inner = block.inner(rect);
                block.render(rect, buf);

                let face_area = Rect {
                    y: inner.y + inner.height.saturating_sub(1) / 2,
                    height: inner.height.min(1),
                    ..inner
                };
                Paragraph::new(Span::styled(part.face(), face_style))
                    .alignment(Alignment::Center)
                    .render(face_area, buf);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Totals Bar Widget
// ══════════════════════════════════════════════════════════════════════════

/// Running totals of every group, with the active group highlighted.
pub struct TotalsBar<'a> {
    totals: &'a [u32],
    labels: &'a [String],
    selected: Option<usize>,
    theme: &'a Theme,
}

impl<'a> TotalsBar<'a> {
    pub fn new(totals: &'a [u32], labels: &'a [String], selected: Option<usize>, theme: &'a Theme) -> Self {
        Self { totals, labels, selected, theme }
    }
}

impl Widget for TotalsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let constraints = vec![Constraint::Ratio(1, self.totals.len().max(1) as u32); self.totals.len()];
        let chunks = Layout::horizontal(constraints).split(area);

        for (g, total) in self.totals.iter().enumerate() {
            let color = self.theme.group(g);
            let mut label_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            if self.selected == Some(g) {
                label_style = label_style.add_modifier(Modifier::REVERSED);
            }
            let label = self.labels.get(g).map(String::as_str).unwrap_or("?");

            let line = Line::from(vec![
                Span::styled(format!(" {} ", label), label_style),
                Span::styled(format!(" {}", total), Style::default().fg(self.theme.colors.text)),
            ]);
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(chunks[g], buf);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Key Hints Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    theme: &'a Theme,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .hints
            .iter()
            .flat_map(|(key, desc)| {
                [
                    Span::styled(*key, self.theme.key_highlight()),
                    Span::styled(format!(" {} ", desc), self.theme.key_hint()),
                    Span::styled("│ ", Style::default().fg(self.theme.colors.text_dim)),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(faces: &[(&str, &str)]) -> Vec<QuestionPart> {
        faces
            .iter()
            .map(|(p, a)| QuestionPart::new(p.to_string(), a.to_string()))
            .collect()
    }

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn cards_show_prompt_until_revealed() {
        let theme = Theme::default();
        let mut parts = parts(&[("ㄏ", "紅"), ("ㄅ", "包")]);
        parts[1].revealed = true;

        let area = Rect::new(0, 0, 40, 7);
        let mut buf = Buffer::empty(area);
        PartCards::new(&parts, 0, &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains('ㄏ'));
        assert!(text.contains('包'));
        assert!(!text.contains('紅'));
    }

    #[test]
    fn cards_wrap_and_never_draw_outside_area() {
        let theme = Theme::default();
        let many = parts(&[("ㄅ", "a"); 12]);
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        PartCards::new(&many, 11, &theme).render(area, &mut buf);
    }

    #[test]
    fn totals_bar_lists_every_group() {
        let theme = Theme::default();
        let labels: Vec<String> = (1..=8).map(|n| n.to_string()).collect();
        let totals = [3, 0, 0, 0, 0, 0, 0, 12];
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        TotalsBar::new(&totals, &labels, Some(0), &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("12"));
        assert!(text.contains(" 3"));
    }
}
