use crate::api::{clip_media_url, final_media_url, ApiError, ApiResult};
use crate::clip::{
    parse_font_size, ClipBoard, ClipError, GenerationOptions, GenerationRequest, Layout,
};
use crate::ui::render::ScreenLayout;
use crate::ui::theme::Theme;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Keyword,
    Gallery,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionField {
    Layout,
    Script,
    FontSize,
    FontFamily,
}

impl OptionField {
    pub const ALL: [OptionField; 4] = [
        OptionField::Layout,
        OptionField::Script,
        OptionField::FontSize,
        OptionField::FontFamily,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OptionField::Layout => "Layout",
            OptionField::Script => "Script",
            OptionField::FontSize => "Font size",
            OptionField::FontFamily => "Font family",
        }
    }

    fn next(self) -> Self {
        match self {
            OptionField::Layout => OptionField::Script,
            OptionField::Script => OptionField::FontSize,
            OptionField::FontSize => OptionField::FontFamily,
            OptionField::FontFamily => OptionField::Layout,
        }
    }

    fn previous(self) -> Self {
        match self {
            OptionField::Layout => OptionField::FontFamily,
            OptionField::Script => OptionField::Layout,
            OptionField::FontSize => OptionField::Script,
            OptionField::FontFamily => OptionField::FontSize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// The last video returned by the render endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedVideo {
    pub name: String,
    pub url: String,
    pub received_at: DateTime<Local>,
}

/// Work the event loop must perform on behalf of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search { ticket: u64, keyword: String },
    Generate(GenerationRequest),
    Play(String),
}

/// Results delivered back from spawned requests.
#[derive(Debug)]
pub enum AppEvent {
    SearchFinished {
        ticket: u64,
        keyword: String,
        result: ApiResult<Vec<String>>,
    },
    GenerateFinished(ApiResult<String>),
}

pub struct App {
    pub board: ClipBoard,
    pub keyword: String,
    /// Keyword that produced the current clip list.
    pub shown_keyword: Option<String>,
    pub layout: Layout,
    pub script: String,
    pub font_size: String,
    pub font_family: String,
    default_font_family: String,
    pub focus: FocusPane,
    pub option_field: OptionField,
    pub cursor: usize,
    pub status: Option<StatusMessage>,
    pub result: Option<RenderedVideo>,
    pub server_url: String,
    pub theme: Theme,
    pub show_help: bool,
    pub should_quit: bool,
    pub pending_searches: usize,
    pub pending_generations: usize,
    /// First clip row shown in the gallery.
    pub gallery_top: usize,
    next_ticket: u64,
    completed_ticket: u64,
}

impl App {
    pub fn new(server_url: String, defaults: GenerationOptions, theme: Theme) -> Self {
        Self {
            board: ClipBoard::new(),
            keyword: String::new(),
            shown_keyword: None,
            layout: defaults.layout,
            script: defaults.script,
            font_size: defaults.font_size.to_string(),
            default_font_family: defaults.font_family.clone(),
            font_family: defaults.font_family,
            focus: FocusPane::Keyword,
            option_field: OptionField::Layout,
            cursor: 0,
            status: None,
            result: None,
            server_url,
            theme,
            show_help: false,
            should_quit: false,
            pending_searches: 0,
            pending_generations: 0,
            gallery_top: 0,
            next_ticket: 0,
            completed_ticket: 0,
        }
    }

    pub fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }

    pub fn is_busy(&self) -> bool {
        self.pending_searches > 0 || self.pending_generations > 0
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Keyword => FocusPane::Gallery,
            FocusPane::Gallery => FocusPane::Options,
            FocusPane::Options => FocusPane::Keyword,
        };
    }

    pub fn toggle_focus_back(&mut self) {
        self.focus = match self.focus {
            FocusPane::Keyword => FocusPane::Options,
            FocusPane::Gallery => FocusPane::Keyword,
            FocusPane::Options => FocusPane::Gallery,
        };
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn next(&mut self) {
        let count = self.board.len();
        if count > 0 {
            self.cursor = (self.cursor + 1) % count;
        }
    }

    pub fn previous(&mut self) {
        let count = self.board.len();
        if count > 0 {
            if self.cursor > 0 {
                self.cursor -= 1;
            } else {
                self.cursor = count - 1;
            }
        }
    }

    /// Toggle the clip under the cursor.
    pub fn toggle_current(&mut self) {
        self.toggle_clip(self.cursor);
    }

    /// Toggle a clip by index and move the cursor onto it.
    pub fn toggle_clip(&mut self, index: usize) {
        match self.board.toggle(index) {
            Ok(_) => {
                self.cursor = index;
                let count = self.board.selection().len();
                self.set_status(StatusLevel::Info, format!("{count} clip(s) selected"));
            }
            Err(e) => debug!("ignoring toggle: {}", e),
        }
    }

    /// First visible gallery row for a viewport of `visible` rows.
    ///
    /// Starts from the last scroll position and only moves when the cursor
    /// would leave the window.
    pub fn gallery_offset(&self, visible: usize) -> usize {
        if visible == 0 {
            return 0;
        }
        if self.cursor < self.gallery_top {
            self.cursor
        } else if self.cursor >= self.gallery_top + visible {
            self.cursor + 1 - visible
        } else {
            self.gallery_top
        }
    }

    /// Store the scroll position for the current viewport height.
    pub fn sync_gallery(&mut self, visible: usize) {
        self.gallery_top = self.gallery_offset(visible);
    }

    /// Clip index shown on `row` of a viewport of `visible` rows.
    pub fn clip_at_row(&self, row: usize, visible: usize) -> Option<usize> {
        if row >= visible {
            return None;
        }
        let index = self.gallery_offset(visible) + row;
        (index < self.board.len()).then_some(index)
    }

    /// Left click: toggle the clicked gallery row, if any.
    pub fn handle_click(&mut self, layout: &ScreenLayout, column: u16, row: u16) {
        let Some(view_row) = layout.gallery_row_at(column, row) else {
            return;
        };
        if let Some(index) = self.clip_at_row(view_row, layout.gallery_rows()) {
            self.focus = FocusPane::Gallery;
            self.toggle_clip(index);
        }
    }

    /// Start a search for the current keyword.
    pub fn begin_search(&mut self) -> Action {
        self.next_ticket += 1;
        self.pending_searches += 1;
        self.set_status(
            StatusLevel::Info,
            format!("Searching for \"{}\"...", self.keyword),
        );
        Action::Search {
            ticket: self.next_ticket,
            keyword: self.keyword.clone(),
        }
    }

    /// Snapshot the option fields.
    pub fn generation_options(&self) -> Result<GenerationOptions, ClipError> {
        let font_size = parse_font_size(&self.font_size)?;
        let family = self.font_family.trim();
        let font_family = if family.is_empty() {
            self.default_font_family.clone()
        } else {
            family.to_string()
        };

        Ok(GenerationOptions {
            layout: self.layout,
            script: self.script.clone(),
            font_size,
            font_family,
        })
    }

    /// Validate the selection and options and start a render.
    ///
    /// Returns `None` (and a warning in the status line) when the request
    /// cannot be built; nothing is sent in that case.
    pub fn begin_generate(&mut self) -> Option<Action> {
        let request = self
            .generation_options()
            .and_then(|options| GenerationRequest::build(&self.board, &options));

        match request {
            Ok(request) => {
                self.pending_generations += 1;
                self.set_status(
                    StatusLevel::Info,
                    format!("Rendering {} clip(s)...", request.clips.len()),
                );
                Some(Action::Generate(request))
            }
            Err(e) => {
                self.set_status(StatusLevel::Warning, e.to_string());
                None
            }
        }
    }

    pub fn play_current(&mut self) -> Option<Action> {
        match self.board.clip(self.cursor) {
            Some(clip) => Some(Action::Play(clip_media_url(&self.server_url, clip))),
            None => {
                self.set_status(StatusLevel::Warning, "No clip to play");
                None
            }
        }
    }

    pub fn play_result(&mut self) -> Option<Action> {
        match &self.result {
            Some(video) => Some(Action::Play(video.url.clone())),
            None => {
                self.set_status(StatusLevel::Warning, "Nothing rendered yet");
                None
            }
        }
    }

    /// Apply a finished request to the state.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchFinished {
                ticket,
                keyword,
                result,
            } => {
                self.pending_searches = self.pending_searches.saturating_sub(1);
                // A newer search has finished already, successful or not
                if ticket < self.completed_ticket {
                    debug!(ticket, completed = self.completed_ticket, "dropping stale search");
                    return;
                }
                self.completed_ticket = ticket;
                match result {
                    Ok(clips) => {
                        let count = clips.len();
                        self.board.replace_clips(clips);
                        self.cursor = 0;
                        self.gallery_top = 0;
                        self.set_status(
                            StatusLevel::Success,
                            format!("Found {count} clip(s) for \"{keyword}\""),
                        );
                        self.shown_keyword = Some(keyword);
                    }
                    Err(e) => self.report_api_error("Search", &e),
                }
            }
            AppEvent::GenerateFinished(result) => {
                self.pending_generations = self.pending_generations.saturating_sub(1);
                match result {
                    Ok(name) => {
                        let url = final_media_url(&self.server_url, &name);
                        self.set_status(StatusLevel::Success, format!("Rendered {name}"));
                        self.result = Some(RenderedVideo {
                            name,
                            url,
                            received_at: Local::now(),
                        });
                    }
                    Err(e) => self.report_api_error("Render", &e),
                }
            }
        }
    }

    fn report_api_error(&mut self, what: &str, err: &ApiError) {
        warn!(kind = err.kind(), "{} failed: {}", what, err);
        self.set_status(StatusLevel::Error, format!("{what} failed: {err}"));
    }

    /// Translate a key press into state changes and, possibly, an action.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        // Text fields only take unmodified (or shifted) characters
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let typed = match key.code {
            KeyCode::Char(c) if plain => Some(c),
            _ => None,
        };

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1)) {
                self.toggle_help();
            }
            return None;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('g') if ctrl => return self.begin_generate(),
            KeyCode::F(1) => {
                self.toggle_help();
                return None;
            }
            KeyCode::Tab => {
                self.toggle_focus();
                return None;
            }
            KeyCode::BackTab => {
                self.toggle_focus_back();
                return None;
            }
            _ => {}
        }

        match self.focus {
            FocusPane::Keyword => self.handle_keyword_key(key, typed),
            // Modified letters are not gallery commands
            FocusPane::Gallery if typed.is_none() && matches!(key.code, KeyCode::Char(_)) => None,
            FocusPane::Gallery => self.handle_gallery_key(key),
            FocusPane::Options => self.handle_options_key(key, typed),
        }
    }

    fn handle_keyword_key(&mut self, key: KeyEvent, typed: Option<char>) -> Option<Action> {
        match key.code {
            KeyCode::Enter => return Some(self.begin_search()),
            KeyCode::Esc => self.focus = FocusPane::Gallery,
            KeyCode::Backspace => {
                self.keyword.pop();
            }
            _ => {
                if let Some(c) = typed {
                    self.keyword.push(c);
                }
            }
        }
        None
    }

    fn handle_gallery_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('/') => self.focus = FocusPane::Keyword,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current(),
            KeyCode::Char('c') => {
                self.board.clear_selection();
                self.set_status(StatusLevel::Info, "Selection cleared");
            }
            KeyCode::Char('p') => return self.play_current(),
            KeyCode::Char('o') => return self.play_result(),
            KeyCode::Char('g') => return self.begin_generate(),
            _ => {}
        }
        None
    }

    fn handle_options_key(&mut self, key: KeyEvent, typed: Option<char>) -> Option<Action> {
        match key.code {
            KeyCode::Esc => self.focus = FocusPane::Gallery,
            KeyCode::Up => self.option_field = self.option_field.previous(),
            KeyCode::Down => self.option_field = self.option_field.next(),
            KeyCode::Enter => return self.begin_generate(),
            code => self.edit_option(code, typed),
        }
        None
    }

    fn edit_option(&mut self, code: KeyCode, typed: Option<char>) {
        match (self.option_field, code, typed) {
            (OptionField::Layout, KeyCode::Left | KeyCode::Right, _)
            | (OptionField::Layout, _, Some(' ')) => {
                self.layout = self.layout.next();
            }
            (OptionField::Script, _, Some(c)) => self.script.push(c),
            (OptionField::Script, KeyCode::Backspace, _) => {
                self.script.pop();
            }
            (OptionField::FontSize, _, Some(c)) if c.is_ascii_digit() => {
                self.font_size.push(c);
            }
            (OptionField::FontSize, KeyCode::Backspace, _) => {
                self.font_size.pop();
            }
            (OptionField::FontFamily, _, Some(c)) => self.font_family.push(c),
            (OptionField::FontFamily, KeyCode::Backspace, _) => {
                self.font_family.pop();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(
            "http://localhost:8000".to_string(),
            GenerationOptions::default(),
            Theme::default_theme().clone(),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn search_done(app: &mut App, ticket: u64, clips: &[&str]) {
        app.apply(AppEvent::SearchFinished {
            ticket,
            keyword: "cats".to_string(),
            result: Ok(clips.iter().map(|c| c.to_string()).collect()),
        });
    }

    #[test]
    fn test_typing_and_enter_starts_search() {
        let mut app = app();
        for c in "cats".chars() {
            assert!(app.handle_key(press(KeyCode::Char(c))).is_none());
        }
        let action = app.handle_key(press(KeyCode::Enter));
        assert_eq!(
            action,
            Some(Action::Search {
                ticket: 1,
                keyword: "cats".to_string()
            })
        );
        assert!(app.is_busy());
    }

    #[test]
    fn test_search_result_replaces_board() {
        let mut app = app();
        let _ = app.begin_search();
        search_done(&mut app, 1, &["a.mp4", "b.mp4"]);
        app.toggle_clip(1);

        let _ = app.begin_search();
        search_done(&mut app, 2, &["x.mp4"]);
        assert_eq!(app.board.clips(), &["x.mp4".to_string()]);
        assert!(!app.board.has_selection());
        assert_eq!(app.cursor, 0);
        assert!(!app.is_busy());
    }

    #[test]
    fn test_stale_search_is_dropped() {
        let mut app = app();
        let _ = app.begin_search();
        let _ = app.begin_search();

        search_done(&mut app, 2, &["new.mp4"]);
        search_done(&mut app, 1, &["old.mp4"]);
        assert_eq!(app.board.clips(), &["new.mp4".to_string()]);
        assert_eq!(app.pending_searches, 0);
    }

    #[test]
    fn test_failed_search_keeps_board() {
        let mut app = app();
        search_done(&mut app, 1, &["a.mp4"]);
        app.apply(AppEvent::SearchFinished {
            ticket: 2,
            keyword: "dogs".to_string(),
            result: Err(ApiError::InvalidResponse("missing field `clips`".to_string())),
        });
        assert_eq!(app.board.clips(), &["a.mp4".to_string()]);
        let status = app.status.expect("status set");
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("Search failed"));
    }

    #[test]
    fn test_generate_with_empty_selection_warns() {
        let mut app = app();
        search_done(&mut app, 1, &["a.mp4"]);
        assert!(app.begin_generate().is_none());
        let status = app.status.clone().expect("status set");
        assert_eq!(status.level, StatusLevel::Warning);
        assert_eq!(status.text, "Select at least one clip");
        assert_eq!(app.pending_generations, 0);
    }

    #[test]
    fn test_generate_uses_option_fields() {
        let mut app = app();
        search_done(&mut app, 1, &["a.mp4", "b.mp4", "c.mp4"]);
        app.toggle_clip(2);
        app.toggle_clip(0);
        app.layout = Layout::Shorts;
        app.script = "Narration".to_string();
        app.font_size = "36".to_string();
        app.font_family = "  ".to_string();

        let Some(Action::Generate(request)) = app.begin_generate() else {
            panic!("expected generate action");
        };
        assert_eq!(request.clips, vec!["c.mp4", "a.mp4"]);
        assert_eq!(request.order, vec![2, 0]);
        assert_eq!(request.options.layout, Layout::Shorts);
        assert_eq!(request.options.font_size, 36);
        assert_eq!(request.options.font_family, "Arial");
        assert_eq!(app.pending_generations, 1);
    }

    #[test]
    fn test_generate_rejects_empty_font_size() {
        let mut app = app();
        search_done(&mut app, 1, &["a.mp4"]);
        app.toggle_clip(0);
        app.font_size.clear();
        assert!(app.begin_generate().is_none());
        assert_eq!(
            app.status.as_ref().map(|s| s.level),
            Some(StatusLevel::Warning)
        );
    }

    #[test]
    fn test_generate_result_points_at_final_videos() {
        let mut app = app();
        app.pending_generations = 1;
        app.apply(AppEvent::GenerateFinished(Ok("out.mp4".to_string())));
        let video = app.result.as_ref().expect("result set");
        assert_eq!(video.url, "http://localhost:8000/final_videos/out.mp4");
        assert_eq!(app.pending_generations, 0);
        assert_eq!(
            app.play_result(),
            Some(Action::Play(
                "http://localhost:8000/final_videos/out.mp4".to_string()
            ))
        );
    }

    #[test]
    fn test_font_size_accepts_digits_only() {
        let mut app = app();
        app.focus = FocusPane::Options;
        app.option_field = OptionField::FontSize;
        app.font_size.clear();
        app.handle_key(press(KeyCode::Char('4')));
        app.handle_key(press(KeyCode::Char('x')));
        app.handle_key(press(KeyCode::Char('2')));
        assert_eq!(app.font_size, "42");
    }

    #[test]
    fn test_click_toggles_gallery_row() {
        use ratatui::layout::Rect;

        let mut app = app();
        search_done(&mut app, 1, &["a.mp4", "b.mp4", "c.mp4"]);
        let layout = ScreenLayout::new(Rect::new(0, 0, 100, 30));
        let top = layout.gallery.y + 1;

        app.handle_click(&layout, 3, top + 1);
        assert_eq!(app.board.selection(), &[1]);
        assert_eq!(app.focus, FocusPane::Gallery);

        app.handle_click(&layout, 3, top + 1);
        assert!(!app.board.has_selection());

        // Rows past the last clip are ignored.
        app.handle_click(&layout, 3, top + 10);
        assert!(!app.board.has_selection());
    }

    #[test]
    fn test_gallery_rows_follow_cursor() {
        let mut app = app();
        search_done(&mut app, 1, &["a", "b", "c", "d", "e"]);
        assert_eq!(app.clip_at_row(0, 3), Some(0));
        app.cursor = 4;
        assert_eq!(app.gallery_offset(3), 2);
        assert_eq!(app.clip_at_row(2, 3), Some(4));
        assert_eq!(app.clip_at_row(3, 3), None);
    }

    #[test]
    fn test_older_search_dropped_after_newer_failed() {
        let mut app = app();
        app.keyword = "cats".to_string();
        let _ = app.begin_search();
        app.keyword = "dogs".to_string();
        let _ = app.begin_search();

        app.apply(AppEvent::SearchFinished {
            ticket: 2,
            keyword: "dogs".to_string(),
            result: Err(ApiError::Status {
                status: 500,
                body: "down".to_string(),
            }),
        });
        search_done(&mut app, 1, &["cat.mp4"]);

        assert!(app.board.is_empty());
        assert_eq!(app.shown_keyword, None);
        assert_eq!(app.status.map(|s| s.level), Some(StatusLevel::Error));
    }

    #[test]
    fn test_modified_chars_are_not_typed() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        app.handle_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(app.keyword, "A");

        app.focus = FocusPane::Options;
        app.option_field = OptionField::Script;
        app.handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert!(app.script.is_empty());

        app.option_field = OptionField::FontFamily;
        app.handle_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::ALT));
        assert_eq!(app.font_family, "Arial");
    }

    #[test]
    fn test_click_above_cursor_keeps_window() {
        use ratatui::layout::Rect;

        let mut app = app();
        let names: Vec<String> = (0..10).map(|i| format!("clip_{i}.mp4")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        search_done(&mut app, 1, &names);

        // Leaves three clip rows inside the gallery border
        let layout = ScreenLayout::new(Rect::new(0, 0, 100, 13));
        let visible = layout.gallery_rows();
        assert_eq!(visible, 3);

        for _ in 0..5 {
            app.next();
            app.sync_gallery(visible);
        }
        assert_eq!(app.gallery_top, 3);

        let top = layout.gallery.y + 1;
        app.handle_click(&layout, 3, top);
        app.sync_gallery(visible);
        assert_eq!(app.board.selection(), &[3]);
        assert_eq!(app.gallery_top, 3);

        // Same row again is still the same clip
        app.handle_click(&layout, 3, top);
        assert!(!app.board.has_selection());
    }
}
