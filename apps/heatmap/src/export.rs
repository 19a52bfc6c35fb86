//! Standalone documents for viewing the chart outside the web component.

use crate::render::{svg_document, HeatmapView};
use crate::scene::{escape_text, Node, SVG_NAMESPACE};
use crate::tooltip::{HIGHLIGHT_STYLE, POINTER_OFFSET, RESTING_STYLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Html,
}

impl ExportFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Html => "html",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn render(self, view: &HeatmapView) -> String {
        match self {
            Self::Svg => svg_document(view).to_markup(),
            Self::Html => html_page(view),
        }
    }
}

const PAGE_TITLE: &str = "Monthly Global Land-Surface Temperature";

const PAGE_STYLE: &str = "\
body { background: #222; color: white; font-family: sans-serif; text-align: center; }
#description { margin: 1em 0; }
#holder, #legend { display: flex; justify-content: center; }
#tooltip { position: absolute; visibility: hidden; padding: 6px 10px; border-radius: 4px; pointer-events: none; }
";

fn style_statements(styles: &[(&str, &str)]) -> String {
    styles
        .iter()
        .map(|(property, value)| format!("cell.style.setProperty(\"{property}\", \"{value}\");"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn tooltip_script() -> String {
    let highlight = style_statements(&HIGHLIGHT_STYLE);
    let resting = style_statements(&RESTING_STYLE);
    let (dx, dy) = POINTER_OFFSET;

    format!(
        r##"(() => {{
  const tooltip = document.getElementById("tooltip");
  document.querySelectorAll("#holder rect.cell").forEach((cell) => {{
    cell.addEventListener("mouseover", (event) => {{
      {highlight}
      tooltip.replaceChildren();
      cell.dataset.tooltip.split("\n").forEach((line, index) => {{
        if (index > 0) tooltip.appendChild(document.createElement("br"));
        tooltip.appendChild(document.createTextNode(line));
      }});
      tooltip.style.color = cell.dataset.tooltipColor;
      tooltip.style.backgroundColor = cell.dataset.tooltipBackground;
      tooltip.setAttribute("data-year", cell.dataset.year);
      tooltip.style.left = (event.pageX + {dx}) + "px";
      tooltip.style.top = (event.pageY + {dy}) + "px";
      tooltip.style.visibility = "visible";
    }});
    cell.addEventListener("mouseout", () => {{
      tooltip.style.visibility = "hidden";
      {resting}
    }});
  }});
}})();
"##
    )
}

/// Plot with tooltip data attached to every cell.
fn interactive_plot(view: &HeatmapView) -> Node {
    let mut plot = view.plot.clone().attr("xmlns", SVG_NAMESPACE);
    let mut cells = view.cells.iter();
    for node in &mut plot.children {
        if node.get_attr("class") != Some("cell") {
            continue;
        }
        if let Some(cell) = cells.next() {
            node.set_attr("data-tooltip", cell.tooltip.plain_text());
            node.set_attr("data-tooltip-color", cell.tooltip.color);
            node.set_attr("data-tooltip-background", cell.tooltip.background.css());
        }
    }
    plot
}

/// Self-contained page with description, plot, legend and a pointer tooltip.
pub fn html_page(view: &HeatmapView) -> String {
    let [range_line, base_line] = view.description.lines();
    let plot = interactive_plot(view).to_markup();
    let legend = view.legend.clone().attr("xmlns", SVG_NAMESPACE).to_markup();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>{PAGE_TITLE}</title>
<style>
{PAGE_STYLE}</style>
</head>
<body>
<h1 id="title">{PAGE_TITLE}</h1>
<h3 id="description">{range}<br />{base}</h3>
<div id="holder">
{plot}</div>
<div id="legend">
{legend}</div>
<div id="tooltip"></div>
<script>
{script}</script>
</body>
</html>
"##,
        range = escape_text(&range_line),
        base = escape_text(&base_line),
        script = tooltip_script(),
    )
}
