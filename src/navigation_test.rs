use super::*;

#[test]
fn route_paths() {
    assert_eq!(Route::Home.path(), "/");
    assert_eq!(Route::Login.path(), "/login");
    assert_eq!(Route::Login.to_string(), "/login");
}

#[test]
fn recording_navigator_starts_empty() {
    let nav = RecordingNavigator::new();
    assert_eq!(nav.last(), None);
    assert!(nav.history().is_empty());
}

#[test]
fn recording_navigator_keeps_order() {
    let nav = RecordingNavigator::new();
    nav.navigate(Route::Login);
    nav.navigate(Route::Home);
    assert_eq!(nav.last(), Some(Route::Home));
    assert_eq!(nav.history(), vec![Route::Login, Route::Home]);
}
