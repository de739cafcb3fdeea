use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::*;
use crate::library::{FoundTrack, Playlist};
use crate::prefs::{Preferences, Theme};

fn app_with(titles: &[&str]) -> App {
    let mut playlist = Playlist::new();
    for t in titles {
        playlist.add(FoundTrack {
            source: PathBuf::from(format!("{t}.mp3")),
            title: (*t).to_string(),
            artist: None,
            duration: None,
        });
    }
    App::new(playlist, Preferences::default())
}

#[test]
fn selection_wraps_within_the_visible_view() {
    let mut app = app_with(&["Alpha", "Beta", "Gamma"]);
    assert_eq!(app.selected, 0);

    app.select_next();
    app.select_next();
    assert_eq!(app.selected, 2);
    app.select_next();
    assert_eq!(app.selected, 0);
    app.select_prev();
    assert_eq!(app.selected, 2);
}

#[test]
fn filtering_narrows_selection_to_visible_tracks() {
    let mut app = app_with(&["Alpha", "Beta", "Gamma"]);
    app.enter_filter_mode();
    app.push_filter_char('e');

    // Only "Beta" matches; selection snaps to it.
    assert_eq!(app.visible_indices(), vec![1]);
    assert_eq!(app.selected, 1);

    app.select_next();
    assert_eq!(app.selected, 1);

    app.clear_filter();
    assert_eq!(app.visible_indices(), vec![0, 1, 2]);
}

#[test]
fn selection_on_an_empty_playlist_stays_put() {
    let mut app = app_with(&[]);
    app.select_next();
    app.select_prev();
    assert_eq!(app.selected, 0);
    assert!(!app.has_tracks());
}

#[test]
fn style_rows_cycle_through_the_whole_panel() {
    let mut row = StyleRow::Theme;
    for _ in 0..StyleRow::ALL.len() {
        row = row.next();
    }
    assert_eq!(row, StyleRow::Theme);
    assert_eq!(StyleRow::Theme.prev(), StyleRow::Reset);
}

#[test]
fn adjust_style_steps_value_rows_but_not_action_rows() {
    let mut app = app_with(&[]);

    app.style_row = StyleRow::Theme;
    assert!(app.adjust_style(true));
    assert_eq!(app.prefs.theme, Theme::Dark);

    app.style_row = StyleRow::Save;
    assert!(!app.adjust_style(true));
    app.style_row = StyleRow::Reset;
    assert!(!app.adjust_style(false));
}

#[test]
fn prefs_dirty_tracks_save_state() {
    let mut app = app_with(&[]);
    assert!(!app.prefs_dirty());

    app.style_row = StyleRow::FontSize;
    app.adjust_style(true);
    assert!(app.prefs_dirty());

    app.mark_prefs_saved();
    assert!(!app.prefs_dirty());
}

#[test]
fn adopt_prefs_clamps_and_counts_as_saved() {
    let mut app = app_with(&[]);
    let mut incoming = Preferences::default();
    incoming.font_size = 99;
    incoming.animation_speed = -3.0;

    app.adopt_prefs(incoming);
    assert_eq!(app.prefs.font_size, 20);
    assert_eq!(app.prefs.animation_speed, 0.25);
    assert!(!app.prefs_dirty());
}

#[test]
fn account_form_types_into_the_focused_field() {
    let mut form = AccountForm::default();
    form.type_char('a');
    form.focus = AccountField::Password;
    form.type_char('b');
    form.type_char('c');
    form.backspace();

    assert_eq!(form.email, "a");
    assert_eq!(form.password, "b");

    form.focus = AccountField::Action;
    form.type_char('x');
    form.backspace();
    assert_eq!(form.email, "a");
    assert_eq!(form.password, "b");

    form.clear_password();
    assert!(form.password.is_empty());
}

#[test]
fn account_focus_and_mode_cycle() {
    assert_eq!(AccountField::Email.next(), AccountField::Password);
    assert_eq!(AccountField::Action.next(), AccountField::Email);
    assert_eq!(AccountField::Email.prev(), AccountField::Action);
    assert_eq!(AuthMode::SignIn.toggled(), AuthMode::SignUp);
    assert_eq!(AuthMode::SignUp.toggled(), AuthMode::SignIn);
}

#[test]
fn notices_expire_and_the_latest_wins() {
    let mut app = app_with(&[]);
    app.push_notice("first", NoticeLevel::Info);
    app.push_notice("second", NoticeLevel::Error);

    let showing = match app.current_notice() {
        Some(n) => n.text.clone(),
        None => panic!("expected a notice"),
    };
    assert_eq!(showing, "second");

    app.prune_notices(Instant::now() + NOTICE_TTL + Duration::from_secs(1));
    assert!(app.current_notice().is_none());
}

#[test]
fn panels_cycle_in_a_fixed_order() {
    assert_eq!(Panel::Library.next(), Panel::Style);
    assert_eq!(Panel::Style.next(), Panel::Account);
    assert_eq!(Panel::Account.next(), Panel::Library);
}
