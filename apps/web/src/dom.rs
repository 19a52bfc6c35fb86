use temperature_heatmap::scene::{Node, SVG_NAMESPACE};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

/// Live elements created for a scene, with the cell rectangles in scene order.
pub struct Built {
    pub root: Element,
    pub cells: Vec<Element>,
}

pub fn build_svg(document: &Document, node: &Node) -> Result<Built, JsValue> {
    let mut cells = Vec::new();
    let root = build_into(document, node, &mut cells)?;
    Ok(Built { root, cells })
}

fn build_into(document: &Document, node: &Node, cells: &mut Vec<Element>) -> Result<Element, JsValue> {
    let element = document.create_element_ns(Some(SVG_NAMESPACE), node.tag)?;
    for (name, value) in &node.attrs {
        // the namespace comes from create_element_ns
        if *name == "xmlns" {
            continue;
        }
        element.set_attribute(name, value)?;
    }

    if let Some(text) = &node.text {
        element.set_text_content(Some(text));
    }

    if is_cell(node) {
        cells.push(element.clone());
    }

    for child in &node.children {
        let child = build_into(document, child, cells)?;
        element.append_child(&child)?;
    }

    Ok(element)
}

fn is_cell(node: &Node) -> bool {
    node.tag == "rect" && node.get_attr("class") == Some("cell")
}

#[cfg(test)]
mod tests {
    use super::is_cell;
    use temperature_heatmap::scene::Node;

    #[test]
    fn only_cell_rects_are_collected() {
        assert!(is_cell(&Node::new("rect").attr("class", "cell")));
        assert!(!is_cell(&Node::new("rect").attr("class", "legend-swatch")));
        assert!(!is_cell(&Node::new("g").attr("class", "cell")));
    }
}
