//! Body info panels in the host page.
//!
//! The page provides one element per body, with the body's name as its id.
//! Only the selected body's panel is shown.

use bevy::prelude::*;
use orrery_core::bevy::{OrreryState, SelectionChanged};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

pub fn hide_all_panels(state: Res<OrreryState>) {
    for body in state.model().bodies() {
        set_panel_visible(&body.name, false);
    }
}

pub fn show_selected_panel(
    mut changed: MessageReader<SelectionChanged>,
    state: Res<OrreryState>,
) {
    // Only the latest selection matters.
    let Some(event) = changed.read().last() else {
        return;
    };
    for body in state.model().bodies() {
        set_panel_visible(&body.name, event.selected.as_deref() == Some(body.name.as_str()));
    }
}

/// Show or hide the element with id `id`. Missing elements are ignored.
pub fn set_panel_visible(id: &str, visible: bool) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(element) = document.get_element_by_id(id) else {
        tracing::trace!("[panel] no element #{}", id);
        return;
    };
    let Ok(element) = element.dyn_into::<HtmlElement>() else {
        return;
    };
    let display = if visible { "block" } else { "none" };
    if let Err(e) = element.style().set_property("display", display) {
        tracing::warn!("[panel] cannot style #{}: {:?}", id, e);
    }
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_toggle_panel() {
        let document = web_sys::window().unwrap().document().unwrap();
        let panel = document.create_element("div").unwrap();
        panel.set_id("saturn");
        document.body().unwrap().append_child(&panel).unwrap();
        let panel: HtmlElement = panel.dyn_into().unwrap();

        set_panel_visible("saturn", false);
        assert_eq!(panel.style().get_property_value("display").unwrap(), "none");

        set_panel_visible("saturn", true);
        assert_eq!(panel.style().get_property_value("display").unwrap(), "block");

        // Unknown ids are a no-op.
        set_panel_visible("vulcan", true);
    }
}
