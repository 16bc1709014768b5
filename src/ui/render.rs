use crate::api::clip_media_url;
use crate::ui::app::{App, FocusPane, OptionField, StatusLevel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Areas of the screen, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub keyword: Rect,
    pub gallery: Rect,
    pub options: Rect,
    pub result: Rect,
    pub status: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Keyword
                Constraint::Min(0),    // Body
                Constraint::Length(1), // Status
                Constraint::Length(1), // Footer
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[2]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(body[1]);

        Self {
            header: rows[0],
            keyword: rows[1],
            gallery: body[0],
            options: right[0],
            result: right[1],
            status: rows[3],
            footer: rows[4],
        }
    }

    /// Number of clip rows that fit inside the gallery border.
    pub fn gallery_rows(&self) -> usize {
        self.gallery.height.saturating_sub(2) as usize
    }

    /// Map a terminal cell to a gallery row, if it lies inside the list.
    pub fn gallery_row_at(&self, column: u16, row: u16) -> Option<usize> {
        let inner_top = self.gallery.y + 1;
        let inner_bottom = self.gallery.y + self.gallery.height.saturating_sub(1);
        let inside_x = column > self.gallery.x
            && column < self.gallery.x + self.gallery.width.saturating_sub(1);
        if inside_x && row >= inner_top && row < inner_bottom {
            Some((row - inner_top) as usize)
        } else {
            None
        }
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let layout = ScreenLayout::new(frame.area());

    render_header(frame, app, layout.header);
    render_keyword(frame, app, layout.keyword);
    render_gallery(frame, app, &layout);
    render_options(frame, app, layout.options);
    render_result(frame, app, layout.result);
    render_status(frame, app, layout.status);
    render_footer(frame, app, layout.footer);

    if app.show_help {
        render_help(frame, app);
    }
}

fn border_style(app: &App, pane: FocusPane) -> Style {
    if app.focus == pane {
        Style::default().fg(app.theme.accent)
    } else {
        Style::default().fg(app.theme.fg_dim)
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let activity = match (app.pending_searches, app.pending_generations) {
        (0, 0) => String::new(),
        (s, 0) => format!("  searching ({s})"),
        (0, g) => format!("  rendering ({g})"),
        (s, g) => format!("  searching ({s}) rendering ({g})"),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "  CLIPDECK  ",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.server_url.clone(), Style::default().fg(app.theme.fg_dim)),
        Span::styled(activity, Style::default().fg(app.theme.warning)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.accent)),
    )
    .style(Style::default().bg(app.theme.bg));

    frame.render_widget(header, area);
}

fn render_keyword(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        app.keyword.clone(),
        Style::default().fg(app.theme.fg),
    )];
    if app.focus == FocusPane::Keyword {
        spans.push(Span::styled("_", Style::default().fg(app.theme.accent)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Keyword")
            .border_style(border_style(app, FocusPane::Keyword)),
    );

    frame.render_widget(input, area);
}

fn render_gallery(frame: &mut Frame, app: &App, layout: &ScreenLayout) {
    let visible = layout.gallery_rows();
    let offset = app.gallery_offset(visible);

    let items: Vec<ListItem> = app
        .board
        .clips()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, clip)| {
            let rank = app.board.selection_rank(i);
            let marker = match rank {
                Some(n) => format!("[{n:>2}]"),
                None => "[  ]".to_string(),
            };

            let mut style = if rank.is_some() {
                Style::default()
                    .fg(app.theme.marked)
                    .bg(app.theme.marked_bg)
            } else {
                Style::default().fg(app.theme.fg)
            };
            if i == app.cursor && app.focus == FocusPane::Gallery {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }

            ListItem::new(Line::from(vec![
                Span::raw(format!("{marker} {clip}  ")),
                Span::styled(
                    clip_media_url(&app.server_url, clip),
                    Style::default().fg(app.theme.fg_dim),
                ),
            ]))
            .style(style)
        })
        .collect();

    let title = match &app.shown_keyword {
        Some(keyword) => format!(
            "Clips for \"{}\" ({}, {} selected)",
            keyword,
            app.board.len(),
            app.board.selection().len()
        ),
        None => "Clips".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(app, FocusPane::Gallery));

    if app.board.is_empty() {
        let hint = Paragraph::new("No clips yet. Type a keyword and press Enter.")
            .style(Style::default().fg(app.theme.fg_dim))
            .block(block);
        frame.render_widget(hint, layout.gallery);
    } else {
        frame.render_widget(List::new(items).block(block), layout.gallery);
    }
}

fn render_options(frame: &mut Frame, app: &App, area: Rect) {
    let (width, height) = app.layout.frame_size();
    let focused = app.focus == FocusPane::Options;

    let lines: Vec<Line> = OptionField::ALL
        .iter()
        .map(|&field| {
            let value = match field {
                OptionField::Layout => format!("< {} >  {}x{}", app.layout, width, height),
                OptionField::Script => app.script.clone(),
                OptionField::FontSize => app.font_size.clone(),
                OptionField::FontFamily => app.font_family.clone(),
            };
            let label_style = if focused && field == app.option_field {
                Style::default()
                    .fg(app.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.fg_dim)
            };
            Line::from(vec![
                Span::styled(format!("{:<12}", field.label()), label_style),
                Span::styled(value, Style::default().fg(app.theme.fg)),
            ])
        })
        .collect();

    let options = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Options")
                .border_style(border_style(app, FocusPane::Options)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(options, area);
}

fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.result {
        Some(video) => vec![
            Line::from(Span::styled(
                video.name.clone(),
                Style::default()
                    .fg(app.theme.success)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(video.url.clone()),
            Line::from(Span::styled(
                format!("Rendered at {}", video.received_at.format("%H:%M:%S")),
                Style::default().fg(app.theme.fg_dim),
            )),
            Line::from(""),
            Line::from("Press o in the clip list to play it"),
        ],
        None => vec![Line::from(Span::styled(
            "No video rendered yet",
            Style::default().fg(app.theme.fg_dim),
        ))],
    };

    let result = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Final video")
                .border_style(Style::default().fg(app.theme.fg_dim)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(result, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.status else {
        return;
    };
    let color = match status.level {
        StatusLevel::Info => app.theme.fg,
        StatusLevel::Success => app.theme.success,
        StatusLevel::Warning => app.theme.warning,
        StatusLevel::Error => app.theme.error,
    };
    frame.render_widget(
        Paragraph::new(status.text.clone()).style(Style::default().fg(color)),
        area,
    );
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.focus {
        FocusPane::Keyword => "[Enter] Search  [Esc] Clips  [Tab] Switch  [Ctrl+G] Generate  [F1] Help",
        FocusPane::Gallery => {
            "[↑↓/jk] Move  [Space] Select  [p] Play  [g] Generate  [o] Open result  [/] Search  [q] Quit"
        }
        FocusPane::Options => "[↑↓] Field  [←→] Layout  [Enter] Generate  [Esc] Clips  [Tab] Switch",
    };

    let footer = Paragraph::new(help_text).style(Style::default().fg(app.theme.fg_dim));
    frame.render_widget(footer, area);
}

fn render_help(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 60, frame.area());
    let lines = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Tab / Shift+Tab   switch pane"),
        Line::from("Enter (keyword)   search clips"),
        Line::from("Space / click     select or unselect a clip"),
        Line::from("p                 play clip under cursor"),
        Line::from("c                 clear selection"),
        Line::from("g / Ctrl+G        render selected clips"),
        Line::from("o                 play rendered video"),
        Line::from("q / Ctrl+C        quit"),
        Line::from(""),
        Line::from("Clips play in the order they were selected."),
    ];

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(app.theme.accent)),
        )
        .style(Style::default().bg(app.theme.bg).fg(app.theme.fg));

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
