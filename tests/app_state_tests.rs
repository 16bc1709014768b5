//! Application state tests
//!
//! Search results, selection and render results flowing through `App`.

use clipdeck::api::ApiError;
use clipdeck::clip::{GenerationOptions, Layout};
use clipdeck::ui::app::{FocusPane, StatusLevel};
use clipdeck::ui::theme::Theme;
use clipdeck::ui::{Action, App, AppEvent};

fn create_test_app() -> App {
    App::new(
        "http://localhost:8000".to_string(),
        GenerationOptions::default(),
        Theme::default_theme().clone(),
    )
}

fn finish_search(app: &mut App, clips: &[&str]) {
    let Action::Search { ticket, keyword } = app.begin_search() else {
        panic!("expected search action");
    };
    app.apply(AppEvent::SearchFinished {
        ticket,
        keyword,
        result: Ok(clips.iter().map(|c| c.to_string()).collect()),
    });
}

#[test]
fn test_search_replaces_list_and_clears_selection() {
    let mut app = create_test_app();
    app.keyword = "cats".to_string();
    finish_search(&mut app, &["a.mp4", "b.mp4", "c.mp4"]);
    app.toggle_clip(0);
    app.toggle_clip(2);
    assert_eq!(app.board.selection(), &[0, 2]);

    app.keyword = "dogs".to_string();
    finish_search(&mut app, &["d1.mp4", "d2.mp4"]);

    assert_eq!(
        app.board.clips(),
        &["d1.mp4".to_string(), "d2.mp4".to_string()]
    );
    assert!(app.board.selection().is_empty());
    assert_eq!(app.shown_keyword.as_deref(), Some("dogs"));
}

#[test]
fn test_toggle_pair_is_identity() {
    let mut app = create_test_app();
    finish_search(&mut app, &["a.mp4", "b.mp4", "c.mp4"]);
    app.toggle_clip(1);
    let before = app.board.selection().to_vec();

    app.toggle_clip(0);
    app.toggle_clip(0);
    assert_eq!(app.board.selection(), before.as_slice());
}

#[test]
fn test_selection_indices_stay_in_range() {
    let mut app = create_test_app();
    finish_search(&mut app, &["a.mp4", "b.mp4", "c.mp4"]);
    app.toggle_clip(2);
    finish_search(&mut app, &["only.mp4"]);

    // Index 2 no longer exists; toggling it is ignored
    app.toggle_clip(2);
    assert!(app
        .board
        .selection()
        .iter()
        .all(|&i| i < app.board.len()));
    assert!(!app.board.has_selection());
}

#[test]
fn test_generate_request_matches_selection() {
    let mut app = create_test_app();
    finish_search(&mut app, &["a.mp4", "b.mp4", "c.mp4"]);
    app.toggle_clip(2);
    app.toggle_clip(0);

    let Some(Action::Generate(request)) = app.begin_generate() else {
        panic!("expected generate action");
    };
    let fields = request.form_fields();
    let get = |name: &str| {
        fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.clone())
            .unwrap()
    };
    assert_eq!(get("clips"), "c.mp4,a.mp4");
    assert_eq!(get("order"), "2,0");
    assert_eq!(get("start_times"), "0,0");
    assert_eq!(get("end_times"), "10,10");
    assert_eq!(get("layout"), Layout::Landscape.as_str());
}

#[test]
fn test_empty_selection_produces_no_action_and_a_warning() {
    let mut app = create_test_app();
    finish_search(&mut app, &["a.mp4"]);

    assert!(app.begin_generate().is_none());
    let status = app.status.as_ref().unwrap();
    assert_eq!(status.level, StatusLevel::Warning);
    assert_eq!(status.text, "Select at least one clip");
    assert!(!app.is_busy());
}

#[test]
fn test_generation_result_references_final_videos() {
    let mut app = create_test_app();
    finish_search(&mut app, &["a.mp4"]);
    app.toggle_clip(0);
    assert!(app.begin_generate().is_some());

    app.apply(AppEvent::GenerateFinished(Ok("out.mp4".to_string())));
    let video = app.result.as_ref().unwrap();
    assert_eq!(video.name, "out.mp4");
    assert_eq!(video.url, "http://localhost:8000/final_videos/out.mp4");
    // Selection survives a render so the user can tweak and resubmit
    assert_eq!(app.board.selection(), &[0]);
}

#[test]
fn test_generation_failure_keeps_previous_result() {
    let mut app = create_test_app();
    app.apply(AppEvent::GenerateFinished(Ok("first.mp4".to_string())));
    app.apply(AppEvent::GenerateFinished(Err(ApiError::Status {
        status: 500,
        body: "render crashed".to_string(),
    })));

    assert_eq!(app.result.as_ref().unwrap().name, "first.mp4");
    let status = app.status.as_ref().unwrap();
    assert_eq!(status.level, StatusLevel::Error);
    assert!(status.text.contains("render crashed"));
}

#[test]
fn test_focus_cycles_through_panes() {
    let mut app = create_test_app();
    assert_eq!(app.focus, FocusPane::Keyword);
    app.toggle_focus();
    assert_eq!(app.focus, FocusPane::Gallery);
    app.toggle_focus();
    assert_eq!(app.focus, FocusPane::Options);
    app.toggle_focus();
    assert_eq!(app.focus, FocusPane::Keyword);
    app.toggle_focus_back();
    assert_eq!(app.focus, FocusPane::Options);
}

#[test]
fn test_navigation_wraps() {
    let mut app = create_test_app();
    finish_search(&mut app, &["a.mp4", "b.mp4", "c.mp4"]);
    app.previous();
    assert_eq!(app.cursor, 2);
    app.next();
    assert_eq!(app.cursor, 0);
}
