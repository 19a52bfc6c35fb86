use std::cell::RefCell;

use temperature_heatmap::tooltip::{panel_position, Tooltip, HIGHLIGHT_STYLE, RESTING_STYLE};
use temperature_heatmap::{HeatmapView, LivenessToken, LoadState, ViewLifetime};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, MouseEvent, SvgElement};

use crate::dom::build_svg;

type PointerHandler = Closure<dyn FnMut(MouseEvent)>;

/// The mounted heatmap and every element it writes to.
///
/// Handlers reach the tooltip and description through these handles rather
/// than looking them up by id on the page.
pub struct HeatmapMount {
    document: Document,
    container: Element,
    description: Element,
    status: Element,
    holder: Element,
    legend: Element,
    tooltip: HtmlElement,
    lifetime: ViewLifetime,
    handlers: RefCell<Vec<PointerHandler>>,
}

impl HeatmapMount {
    pub fn new(document: &Document, root: &Element) -> Result<Self, JsValue> {
        let container = document.create_element("div")?;
        container.set_class_name("heatmap");

        let title = document.create_element("h1")?;
        title.set_id("title");
        title.set_text_content(Some("Monthly Global Land-Surface Temperature"));

        let description = document.create_element("h3")?;
        description.set_id("description");

        let status = document.create_element("p")?;
        status.set_class_name("status");

        let holder = document.create_element("div")?;
        holder.set_id("holder");

        let legend = document.create_element("div")?;
        legend.set_id("legend");

        let tooltip: HtmlElement = document.create_element("div")?.dyn_into()?;
        tooltip.set_id("tooltip");
        let style = tooltip.style();
        style.set_property("position", "absolute")?;
        style.set_property("visibility", "hidden")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("padding", "6px 10px")?;

        for child in [&title, &description, &status, &holder, &legend] {
            container.append_child(child)?;
        }
        container.append_child(&tooltip)?;
        root.append_child(&container)?;

        Ok(Self {
            document: document.clone(),
            container,
            description,
            status,
            holder,
            legend,
            tooltip,
            lifetime: ViewLifetime::new(),
            handlers: RefCell::new(Vec::new()),
        })
    }

    pub fn token(&self) -> LivenessToken {
        self.lifetime.token()
    }

    pub fn show_state(&self, state: &LoadState) -> Result<(), JsValue> {
        match state {
            LoadState::Ready(view) => {
                self.status.set_text_content(None);
                self.render(view)
            }
            other => {
                self.status
                    .set_text_content(other.status_message().as_deref());
                Ok(())
            }
        }
    }

    fn render(&self, view: &HeatmapView) -> Result<(), JsValue> {
        let [range_line, base_line] = view.description.lines();
        append_lines(&self.document, &self.description, &[range_line, base_line])?;

        let plot = build_svg(&self.document, &view.plot)?;
        self.holder.append_child(&plot.root)?;

        let legend = build_svg(&self.document, &view.legend)?;
        self.legend.append_child(&legend.root)?;

        for (element, cell) in plot.cells.into_iter().zip(&view.cells) {
            self.bind_tooltip(element, cell.tooltip.clone())?;
        }
        Ok(())
    }

    fn bind_tooltip(&self, cell: Element, content: Tooltip) -> Result<(), JsValue> {
        let enter: PointerHandler = Closure::new({
            let document = self.document.clone();
            let panel = self.tooltip.clone();
            let cell = cell.clone();
            move |event: MouseEvent| {
                if let Err(error) = show_tooltip(&document, &panel, &cell, &content, &event) {
                    web_sys::console::error_1(&error);
                }
            }
        });

        let leave: PointerHandler = Closure::new({
            let panel = self.tooltip.clone();
            let cell = cell.clone();
            move |_event: MouseEvent| {
                if let Err(error) = hide_tooltip(&panel, &cell) {
                    web_sys::console::error_1(&error);
                }
            }
        });

        cell.add_event_listener_with_callback("mouseover", enter.as_ref().unchecked_ref())?;
        cell.add_event_listener_with_callback("mouseout", leave.as_ref().unchecked_ref())?;

        let mut handlers = self.handlers.borrow_mut();
        handlers.push(enter);
        handlers.push(leave);
        Ok(())
    }

    /// Removes the view from the page; pending loads see a dead token from here on.
    pub fn unmount(&self) {
        self.lifetime.close();
        self.container.remove();
        self.handlers.borrow_mut().clear();
    }
}

fn set_styles(element: &Element, styles: &[(&str, &str)]) -> Result<(), JsValue> {
    let Some(svg) = element.dyn_ref::<SvgElement>() else {
        return Ok(());
    };
    let style = svg.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(())
}

/// A line of text or the `<br>` between two lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinePiece<'a> {
    Text(&'a str),
    Break,
}

fn line_pieces(lines: &[String]) -> Vec<LinePiece<'_>> {
    let mut pieces = Vec::with_capacity(lines.len() * 2);
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            pieces.push(LinePiece::Break);
        }
        pieces.push(LinePiece::Text(line));
    }
    pieces
}

/// Replaces the children of `parent` with `lines` separated by `<br>` elements.
fn append_lines(document: &Document, parent: &Element, lines: &[String]) -> Result<(), JsValue> {
    parent.set_text_content(None);
    for piece in line_pieces(lines) {
        match piece {
            LinePiece::Text(text) => {
                let node = document.create_text_node(text);
                parent.append_child(&node)?;
            }
            LinePiece::Break => {
                let line_break = document.create_element("br")?;
                parent.append_child(&line_break)?;
            }
        }
    }
    Ok(())
}

/// Inline styles for the panel while it shows `content` next to the pointer.
pub fn panel_styles(content: &Tooltip, pointer: (f64, f64)) -> [(&'static str, String); 5] {
    let (left, top) = panel_position(pointer.0, pointer.1);
    [
        ("visibility", "visible".to_string()),
        ("color", content.color.to_string()),
        ("background-color", content.background.css().to_string()),
        ("left", format!("{left}px")),
        ("top", format!("{top}px")),
    ]
}

fn show_tooltip(
    document: &Document,
    panel: &HtmlElement,
    cell: &Element,
    content: &Tooltip,
    event: &MouseEvent,
) -> Result<(), JsValue> {
    set_styles(cell, &HIGHLIGHT_STYLE)?;

    append_lines(document, panel, &content.lines)?;
    panel.set_attribute("data-year", &content.year.to_string())?;

    let pointer = (f64::from(event.page_x()), f64::from(event.page_y()));
    let style = panel.style();
    for (property, value) in panel_styles(content, pointer) {
        style.set_property(property, &value)?;
    }
    Ok(())
}

fn hide_tooltip(panel: &HtmlElement, cell: &Element) -> Result<(), JsValue> {
    panel.style().set_property("visibility", "hidden")?;
    set_styles(cell, &RESTING_STYLE)
}
