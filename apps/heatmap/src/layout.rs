/// Fixed pixel geometry of the chart and its legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    /// Width of the plotting area, excluding the left gutter.
    pub width: f64,
    pub height: f64,
    /// Space reserved under the plot for the x-axis and its label.
    pub padding: f64,
    /// Horizontal shift of the plot to make room for the month axis.
    pub gutter: f64,
    /// Extra width added to the outer `<svg>` beyond `width`.
    pub margin_right: f64,
    pub legend_width: f64,
    pub legend_height: f64,
    pub legend_swatch_height: f64,
    /// Distance from the bottom of the legend to its axis.
    pub legend_axis_inset: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 650.0,
            padding: 60.0,
            gutter: 70.0,
            margin_right: 100.0,
            legend_width: 600.0,
            legend_height: 100.0,
            legend_swatch_height: 30.0,
            legend_axis_inset: 40.0,
        }
    }
}

impl ChartLayout {
    /// Vertical extent covered by the twelve month bands.
    pub fn plot_height(&self) -> f64 {
        self.height - self.padding
    }

    pub fn svg_width(&self) -> f64 {
        self.width + self.margin_right
    }

    pub fn legend_axis_y(&self) -> f64 {
        self.legend_height - self.legend_axis_inset
    }

    pub fn legend_swatch_y(&self) -> f64 {
        self.legend_axis_y() - self.legend_swatch_height
    }
}
