//! Binds the dataset and its scales to chart elements.

use std::ops::RangeInclusive;

use crate::domain::{format_number, Dataset, TemperatureRecord};
use crate::error::ScaleError;
use crate::layout::ChartLayout;
use crate::scales::{Rgb, Scales, Tick, LEGEND_TICK_COUNT, YEAR_TICK_STEP};
use crate::scene::{Node, SVG_NAMESPACE};
use crate::tooltip::{Tooltip, LINE_BREAK};

/// Temperatures shown as legend swatches, one per degree.
pub const LEGEND_BUCKETS: RangeInclusive<i32> = 2..=13;

pub const AXIS_COLOR: &str = "white";
const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// The heading above the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub year_range: (i32, i32),
    pub base_temperature: f64,
}

impl Description {
    pub fn lines(&self) -> [String; 2] {
        [
            format!("{} - {}", self.year_range.0, self.year_range.1),
            format!(
                "Base Temperature: {} \u{2103}",
                format_number(self.base_temperature)
            ),
        ]
    }

    pub fn markup(&self) -> String {
        self.lines().join(LINE_BREAK)
    }
}

/// One drawn rectangle and the record behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub record: TemperatureRecord,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgb,
    pub tooltip: Tooltip,
}

impl CellView {
    fn to_node(&self) -> Node {
        Node::new("rect")
            .attr("class", "cell")
            .attr("data-month", self.record.month_index())
            .attr("data-year", self.record.year)
            .attr("data-temp", format_number(self.record.temperature))
            .attr("x", self.x)
            .attr("y", self.y)
            .attr("width", self.width)
            .attr("height", self.height)
            .attr("fill", self.fill)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendSwatch {
    pub bucket: i32,
    pub x: f64,
    pub fill: Rgb,
}

/// Everything the chart shows, ready to be serialized or mounted.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapView {
    pub layout: ChartLayout,
    pub description: Description,
    pub cells: Vec<CellView>,
    pub swatches: Vec<LegendSwatch>,
    /// Main `<svg>`: axes, axis labels and cells.
    pub plot: Node,
    /// Legend `<svg id="legend-svg">`.
    pub legend: Node,
}

impl HeatmapView {
    pub fn from_dataset(dataset: &Dataset, layout: ChartLayout) -> Result<Self, ScaleError> {
        let scales = Scales::build(dataset, &layout)?;
        Self::build(dataset, &scales, layout)
    }

    pub fn build(dataset: &Dataset, scales: &Scales, layout: ChartLayout) -> Result<Self, ScaleError> {
        let cell_width = layout.width / f64::from(scales.year_columns());
        let cell_height = layout.plot_height() / 12.0;

        let cells = dataset
            .records
            .iter()
            .map(|record| {
                let fill = scales.color.apply(record.temperature);
                Ok(CellView {
                    record: record.clone(),
                    x: scales.x.year(record.year)? + layout.gutter,
                    y: scales.y.apply(record.month),
                    width: cell_width,
                    height: cell_height,
                    fill,
                    tooltip: Tooltip::for_record(record, fill),
                })
            })
            .collect::<Result<Vec<_>, ScaleError>>()?;

        let swatches: Vec<_> = LEGEND_BUCKETS
            .map(|bucket| LegendSwatch {
                bucket,
                x: scales.legend.apply(f64::from(bucket)),
                fill: scales.color.apply(f64::from(bucket)),
            })
            .collect();

        let plot = plot_node(&layout, scales, &cells);
        let legend = legend_node(&layout, scales, &swatches);

        Ok(Self {
            layout,
            description: Description {
                year_range: scales.year_range,
                base_temperature: dataset.base_temperature,
            },
            cells,
            swatches,
            plot,
            legend,
        })
    }
}

fn translate(x: f64, y: f64) -> String {
    format!("translate({x}, {y})")
}

fn plot_node(layout: &ChartLayout, scales: &Scales, cells: &[CellView]) -> Node {
    let x_axis = axis_bottom(&scales.x.year_ticks(YEAR_TICK_STEP), (0.0, layout.width))
        .attr("id", "x-axis")
        .attr("transform", translate(layout.gutter, layout.plot_height()))
        .attr("color", AXIS_COLOR);

    let y_axis = axis_left(&scales.y.ticks(), (0.0, layout.plot_height()))
        .attr("id", "y-axis")
        .attr("transform", translate(layout.gutter, 0.0))
        .attr("color", AXIS_COLOR);

    let year_label = Node::new("text")
        .attr("x", layout.width / 2.0)
        .attr("y", layout.height - 20.0)
        .attr("style", "font-size: 12px")
        .attr("fill", AXIS_COLOR)
        .text("Year");

    let label_y = layout.height / 2.0;
    let month_label = Node::new("text")
        .attr("x", 10)
        .attr("y", label_y)
        .attr("transform", format!("rotate(-90, 10, {label_y})"))
        .attr("style", "font-size: 12px")
        .attr("fill", AXIS_COLOR)
        .text("Month");

    Node::new("svg")
        .attr("width", layout.svg_width())
        .attr("height", layout.height)
        .child(x_axis)
        .child(y_axis)
        .child(year_label)
        .child(month_label)
        .children(cells.iter().map(CellView::to_node))
}

fn legend_node(layout: &ChartLayout, scales: &Scales, swatches: &[LegendSwatch]) -> Node {
    let axis = axis_bottom(
        &scales.legend.ticks(LEGEND_TICK_COUNT),
        (0.0, layout.legend_width),
    )
    .attr("transform", translate(0.0, layout.legend_axis_y()))
    .attr("color", AXIS_COLOR);

    let swatch_width = layout.legend_width / swatches.len().max(1) as f64;
    let rects = swatches.iter().map(|swatch| {
        Node::new("rect")
            .attr("class", "legend-swatch")
            .attr("data-temp", swatch.bucket)
            .attr("x", swatch.x)
            .attr("y", layout.legend_swatch_y())
            .attr("width", swatch_width)
            .attr("height", layout.legend_swatch_height)
            .attr("fill", swatch.fill)
    });

    Node::new("svg")
        .attr("id", "legend-svg")
        .attr("width", layout.legend_width)
        .attr("height", layout.legend_height)
        .child(axis)
        .children(rects)
}

fn axis_group(anchor: &str) -> Node {
    Node::new("g")
        .attr("fill", "none")
        .attr("font-size", 10)
        .attr("font-family", "sans-serif")
        .attr("text-anchor", anchor)
}

fn axis_bottom(ticks: &[Tick], range: (f64, f64)) -> Node {
    let (start, end) = range;
    let domain = Node::new("path")
        .attr("class", "domain")
        .attr("stroke", "currentColor")
        .attr("d", format!("M{start},{TICK_SIZE}V0H{end}V{TICK_SIZE}"));

    let ticks = ticks.iter().map(|tick| {
        Node::new("g")
            .attr("class", "tick")
            .attr("opacity", 1)
            .attr("transform", translate(tick.offset, 0.0))
            .child(
                Node::new("line")
                    .attr("stroke", "currentColor")
                    .attr("y2", TICK_SIZE),
            )
            .child(
                Node::new("text")
                    .attr("fill", "currentColor")
                    .attr("y", TICK_SIZE + TICK_PADDING)
                    .attr("dy", "0.71em")
                    .text(tick.label.clone()),
            )
    });

    axis_group("middle").child(domain).children(ticks)
}

fn axis_left(ticks: &[Tick], range: (f64, f64)) -> Node {
    let (start, end) = range;
    let domain = Node::new("path")
        .attr("class", "domain")
        .attr("stroke", "currentColor")
        .attr("d", format!("M-{TICK_SIZE},{start}H0V{end}H-{TICK_SIZE}"));

    let ticks = ticks.iter().map(|tick| {
        Node::new("g")
            .attr("class", "tick")
            .attr("opacity", 1)
            .attr("transform", translate(0.0, tick.offset))
            .child(
                Node::new("line")
                    .attr("stroke", "currentColor")
                    .attr("x2", -TICK_SIZE),
            )
            .child(
                Node::new("text")
                    .attr("fill", "currentColor")
                    .attr("x", -(TICK_SIZE + TICK_PADDING))
                    .attr("dy", "0.32em")
                    .text(tick.label.clone()),
            )
    });

    axis_group("end").child(domain).children(ticks)
}

/// Wraps plot and legend into one standalone SVG document.
///
/// Cells carry a `<title>` with their tooltip text since a static file has no
/// pointer handlers.
pub fn svg_document(view: &HeatmapView) -> Node {
    let layout = &view.layout;
    let heading_height = 50.0;
    let [range_line, base_line] = view.description.lines();

    let mut plot = view.plot.clone().attr("y", heading_height);
    let mut tooltips = view.cells.iter().map(|cell| cell.tooltip.plain_text());
    for node in &mut plot.children {
        if node.get_attr("class") == Some("cell") {
            if let Some(text) = tooltips.next() {
                node.children.push(Node::new("title").text(text));
            }
        }
    }

    let legend = view
        .legend
        .clone()
        .attr("x", layout.gutter)
        .attr("y", heading_height + layout.height);

    Node::new("svg")
        .attr("xmlns", SVG_NAMESPACE)
        .attr("width", layout.svg_width())
        .attr("height", heading_height + layout.height + layout.legend_height)
        .attr("style", "background: #222; font-family: sans-serif")
        .child(
            Node::new("text")
                .attr("id", "description")
                .attr("x", layout.svg_width() / 2.0)
                .attr("y", 20)
                .attr("text-anchor", "middle")
                .attr("fill", AXIS_COLOR)
                .child(Node::new("tspan").text(range_line))
                .child(
                    Node::new("tspan")
                        .attr("x", layout.svg_width() / 2.0)
                        .attr("dy", "1.2em")
                        .text(base_line),
                ),
        )
        .child(plot)
        .child(legend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Month;
    use crate::loader::parse_document;
    use crate::tooltip::TooltipBackground;

    fn sample() -> Dataset {
        let records = [
            (1753, Month::January, -6.0),
            (1753, Month::February, 0.0),
            (1900, Month::June, 3.0),
            (2015, Month::December, 5.0),
        ];
        Dataset {
            base_temperature: 8.0,
            records: records
                .into_iter()
                .map(|(year, month, variance)| TemperatureRecord::new(year, month, 8.0, variance))
                .collect(),
        }
    }

    #[test]
    fn renders_one_cell_per_record() -> Result<(), ScaleError> {
        let view = HeatmapView::from_dataset(&sample(), ChartLayout::default())?;
        assert_eq!(view.cells.len(), 4);
        assert_eq!(view.plot.find_by_class("cell").len(), 4);
        Ok(())
    }

    #[test]
    fn cells_expose_month_year_and_temperature() -> Result<(), ScaleError> {
        let view = HeatmapView::from_dataset(&sample(), ChartLayout::default())?;
        let cells = view.plot.find_by_class("cell");
        let first = cells[0];

        assert_eq!(first.get_attr("data-month"), Some("0"));
        assert_eq!(first.get_attr("data-year"), Some("1753"));
        assert_eq!(first.get_attr("data-temp"), Some("2"));
        assert_eq!(first.get_attr("x"), Some("70"));
        assert_eq!(first.get_attr("y"), Some("0"));
        Ok(())
    }

    #[test]
    fn cells_divide_the_plot_evenly() -> Result<(), ScaleError> {
        let layout = ChartLayout::default();
        let view = HeatmapView::from_dataset(&sample(), layout)?;
        let cell = &view.cells[0];

        assert!((cell.width - 1200.0 / 263.0).abs() < 1e-9);
        assert!((cell.height - 590.0 / 12.0).abs() < 1e-9);

        let last = &view.cells[3];
        assert!((last.x - (1200.0 + 70.0)).abs() < 1e-9);
        assert!((last.y - 590.0 / 12.0 * 11.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn cell_fill_matches_tooltip_color() -> Result<(), ScaleError> {
        let view = HeatmapView::from_dataset(&sample(), ChartLayout::default())?;
        for cell in &view.cells {
            assert_eq!(cell.fill, cell.tooltip.color);
        }
        assert_eq!(view.cells[0].tooltip.background, TooltipBackground::Opaque);
        assert_eq!(
            view.cells[2].tooltip.background,
            TooltipBackground::Transparent
        );
        Ok(())
    }

    #[test]
    fn axes_and_legend_are_tagged() -> Result<(), ScaleError> {
        let view = HeatmapView::from_dataset(&sample(), ChartLayout::default())?;

        let x_axis = view.plot.find_by_id("x-axis");
        assert_eq!(
            x_axis.and_then(|axis| axis.get_attr("transform")),
            Some("translate(70, 590)")
        );
        assert!(view.plot.find_by_id("y-axis").is_some());
        assert!(view.plot.find_by_id("legend-svg").is_none());
        assert_eq!(view.legend.get_attr("id"), Some("legend-svg"));

        let month_ticks = view
            .plot
            .find_by_id("y-axis")
            .map(|axis| axis.find_by_class("tick").len());
        assert_eq!(month_ticks, Some(12));
        Ok(())
    }

    #[test]
    fn legend_has_twelve_swatches_regardless_of_data() -> Result<(), ScaleError> {
        let view = HeatmapView::from_dataset(&sample(), ChartLayout::default())?;
        let buckets: Vec<_> = view.swatches.iter().map(|swatch| swatch.bucket).collect();
        assert_eq!(buckets, (2..=13).collect::<Vec<_>>());
        assert_eq!(view.legend.find_by_class("legend-swatch").len(), 12);

        let first = view.legend.find_by_class("legend-swatch")[0];
        assert_eq!(first.get_attr("width"), Some("50"));
        assert_eq!(first.get_attr("y"), Some("30"));
        assert_eq!(first.get_attr("x"), Some("0"));
        Ok(())
    }

    #[test]
    fn single_record_document_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = parse_document(
            r#"{"baseTemperature": 8.0, "monthlyVariance": [{"year": 2000, "month": 1, "variance": -0.5}]}"#,
        )?;
        let view = HeatmapView::from_dataset(&dataset, ChartLayout::default())?;

        assert_eq!(
            view.description.markup(),
            "2000 - 2000<br />Base Temperature: 8 \u{2103}"
        );
        assert_eq!(view.cells.len(), 1);
        assert_eq!(view.cells[0].record.month_name(), "January");
        assert!((view.cells[0].width - 1200.0).abs() < 1e-9);
        assert!((view.cells[0].x - 670.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn svg_document_attaches_titles_to_cells() -> Result<(), ScaleError> {
        let view = HeatmapView::from_dataset(&sample(), ChartLayout::default())?;
        let document = svg_document(&view);
        let markup = document.to_markup();

        assert!(markup.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(markup.contains("<title>January 1753\n2\u{2103}\nVariance: -6\u{2103}</title>"));
        assert!(markup.contains("id=\"legend-svg\""));
        assert_eq!(document.find_by_class("cell").len(), 4);
        Ok(())
    }
}
