use web_sys::{Document, Window};

use crate::error::SiteResult;
use crate::theme::{Theme, STORAGE_KEY};

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn stored(window: &Window) -> Option<String> {
    window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten())
}

fn prefers_dark(window: &Window) -> bool {
    window
        .match_media(DARK_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}

/// The theme in effect right now: stored choice, else the media preference.
pub fn current(window: &Window) -> Theme {
    Theme::resolve(stored(window).as_deref(), prefers_dark(window))
}

/// Put the theme class on `<html>` and remember the choice.
pub fn apply(window: &Window, document: &Document, theme: Theme) -> SiteResult<()> {
    if let Some(root) = document.document_element() {
        let classes = root.class_list();
        classes.remove_2(Theme::Light.as_str(), Theme::Dark.as_str())?;
        classes.add_1(theme.as_str())?;
    }
    // Storage can be disabled (private mode); the class alone still themes the page.
    if let Ok(Some(storage)) = window.local_storage() {
        let _ = storage.set_item(STORAGE_KEY, theme.as_str());
    }
    Ok(())
}
