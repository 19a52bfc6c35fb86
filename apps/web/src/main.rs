use std::cell::RefCell;
use std::rc::{Rc, Weak};

use temperature_heatmap::{ChartLayout, LivenessToken, LoadState, SourceDocument};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Request, RequestInit, RequestMode, Response};

mod dom;
mod view;

use view::HeatmapMount;

const DATA_URL: &str = "global-temperature.json";
const ROOT_ID: &str = "root";

thread_local! {
    static MOUNTED: RefCell<Option<Rc<HeatmapMount>>> = const { RefCell::new(None) };
}

fn main() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let root = mount_root(&document)?;

    let mount = Rc::new(HeatmapMount::new(&document, &root)?);
    mount.show_state(&LoadState::Loading)?;
    MOUNTED.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&mount)));

    spawn_local(load_heatmap(Rc::downgrade(&mount), mount.token(), DATA_URL));

    let teardown = Closure::<dyn FnMut()>::new(|| {
        if let Some(mount) = MOUNTED.with(|slot| slot.borrow_mut().take()) {
            mount.unmount();
        }
    });
    window.add_event_listener_with_callback("pagehide", teardown.as_ref().unchecked_ref())?;
    teardown.forget();

    Ok(())
}

fn mount_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(root) = document.get_element_by_id(ROOT_ID) {
        return Ok(root);
    }
    let root = document.create_element("div")?;
    root.set_id(ROOT_ID);
    document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&root)?;
    Ok(root)
}

async fn load_heatmap(mount: Weak<HeatmapMount>, token: LivenessToken, url: &'static str) {
    let state = match fetch_document(url).await {
        Ok(document) => LoadState::from_document(document, ChartLayout::default()),
        Err(message) => LoadState::Failed(message),
    };

    if state.is_ready() {
        web_sys::console::log_1(&format!("Loaded {url}: {state}").into());
    } else if let LoadState::Failed(message) = &state {
        web_sys::console::error_1(&format!("Failed to load {url}: {message}").into());
    }

    match apply_when_mounted(&mount, &token, |mount| mount.show_state(&state)) {
        Some(Ok(())) => {}
        Some(Err(error)) => web_sys::console::error_1(&error),
        None => web_sys::console::warn_1(&"Heatmap unmounted before data arrived".into()),
    }
}

/// Runs `apply` against the view only if it still exists and has not been closed.
fn apply_when_mounted<T, R>(
    view: &Weak<T>,
    token: &LivenessToken,
    apply: impl FnOnce(&T) -> R,
) -> Option<R> {
    token
        .run_if_alive(|| view.upgrade().map(|view| apply(&view)))
        .flatten()
}

async fn fetch_document(url: &str) -> Result<SourceDocument, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts).map_err(describe)?;
    let response_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(describe)?;
    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| "response was not a Response".to_string())?;

    if !response.ok() {
        return Err(format!("HTTP {} from {url}", response.status()));
    }

    let json = wasm_bindgen_futures::JsFuture::from(response.json().map_err(describe)?)
        .await
        .map_err(describe)?;

    serde_wasm_bindgen::from_value::<SourceDocument>(json).map_err(|error| error.to_string())
}

fn describe(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::apply_when_mounted;
    use std::rc::Rc;
    use temperature_heatmap::ViewLifetime;

    struct View {
        lifetime: ViewLifetime,
        cells: usize,
    }

    #[test]
    fn dropping_the_view_cancels_pending_updates() {
        let view = Rc::new(View {
            lifetime: ViewLifetime::new(),
            cells: 3,
        });
        let token = view.lifetime.token();
        let weak = Rc::downgrade(&view);

        assert_eq!(apply_when_mounted(&weak, &token, |view| view.cells), Some(3));

        drop(view);
        assert!(!token.is_alive());
        assert_eq!(apply_when_mounted(&weak, &token, |view| view.cells), None);
    }

    #[test]
    fn closed_view_is_skipped_while_still_allocated() {
        let view = Rc::new(View {
            lifetime: ViewLifetime::new(),
            cells: 3,
        });
        let token = view.lifetime.token();
        view.lifetime.close();

        assert_eq!(
            apply_when_mounted(&Rc::downgrade(&view), &token, |view| view.cells),
            None
        );
    }
}
