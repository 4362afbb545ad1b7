//! Scatter and strip charts over the midwest and mpg datasets.

use std::collections::BTreeMap;

use plotters::prelude::*;
use rand::Rng;

use crate::data::{MIDWEST, MPG};
use crate::error::{RenderError, Result};
use crate::render::Figure;
use crate::stats;

use super::style;
use super::{Chart, ChartContext};

/// `scatter.plot`: midwest county area vs population, one color per
/// category.
pub struct MidwestScatter;

impl Chart for MidwestScatter {
    fn name(&self) -> &'static str {
        "scatter"
    }

    fn title(&self) -> &'static str {
        "Midwest area vs population"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let midwest = ctx.data().get(MIDWEST)?;
        let area = midwest.f64s("area")?;
        let pop = midwest.f64s("poptotal")?;
        let cats = midwest.strs("category")?;

        let mut categories = midwest.categories("category")?;
        categories.sort_unstable();
        if categories.is_empty() {
            return Err(RenderError::EmptySeries { chart: self.name() }.into());
        }

        // The axis window is fixed; points beyond it are not drawn.
        let series: Vec<(String, Vec<(f64, f64)>)> = categories
            .into_iter()
            .map(|cat| {
                let pts = area
                    .iter()
                    .zip(&pop)
                    .zip(cats)
                    .filter(|(_, c)| c.as_str() == cat)
                    .map(|((&x, &y), _)| (x, y))
                    .filter(|&(x, y)| (0.0..=0.1).contains(&x) && (0.0..=90_000.0).contains(&y))
                    .collect();
                (cat, pts)
            })
            .collect();

        Ok(Figure::new(
            style::FIG_WIDE,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let mut chart = ChartBuilder::on(root)
                    .caption(
                        "Scatterplot of Midwest Area vs Population",
                        ("sans-serif", style::MED).into_font(),
                    )
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(80)
                    .build_cartesian_2d(0.0f64..0.1f64, 0.0f64..90_000.0f64)?;

                chart
                    .configure_mesh()
                    .x_desc("Area")
                    .y_desc("Population")
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                for (i, (cat, pts)) in series.iter().enumerate() {
                    let color = style::series_color(i);
                    chart
                        .draw_series(
                            pts.iter()
                                .map(move |&(x, y)| Circle::new((x, y), 3, color.filled())),
                        )?
                        .label(cat.clone())
                        .legend(move |(x, y)| Circle::new((x + 5, y), 3, color.filled()));
                }

                chart
                    .configure_series_labels()
                    .background_style(WHITE.mix(0.8))
                    .border_style(&BLACK)
                    .label_font(("sans-serif", style::MED).into_font())
                    .draw()?;

                Ok(())
            },
        ))
    }
}

/// `jittering.plot`: strip plot of highway mileage by city mileage with
/// +-0.25 jitter inside each column.
pub struct JitterStrip;

impl Chart for JitterStrip {
    fn name(&self) -> &'static str {
        "jittering"
    }

    fn title(&self) -> &'static str {
        "Jittered strip plot"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let mpg = ctx.data().get(MPG)?;
        let cty = mpg.f64s("cty")?;
        let hwy = mpg.f64s("hwy")?;
        if cty.is_empty() {
            return Err(RenderError::EmptySeries { chart: self.name() }.into());
        }

        let columns = numeric_categories(&cty);
        let mut rng = ctx.rng();

        // One colored series per city-mileage column.
        let series: Vec<Vec<(f64, f64)>> = columns
            .iter()
            .enumerate()
            .map(|(i, &col)| {
                cty.iter()
                    .zip(&hwy)
                    .filter(|(&c, _)| c == col)
                    .map(|(_, &h)| (i as f64 + rng.gen_range(-0.25..0.25), h))
                    .collect()
            })
            .collect();

        let (y_lo, y_hi) = stats::min_max(&hwy);
        let n = columns.len();

        Ok(Figure::new(
            style::FIG_WIDE,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let mut chart = ChartBuilder::on(root)
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(60)
                    .build_cartesian_2d(-0.5f64..n as f64 - 0.5, y_lo - 2.0..y_hi + 2.0)?;

                chart
                    .configure_mesh()
                    .x_desc("cty")
                    .y_desc("hwy")
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_labels(n.min(25))
                    .x_label_formatter(&|x| column_label(*x, &columns))
                    .x_label_style(("sans-serif", style::SMALL).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                for (i, pts) in series.into_iter().enumerate() {
                    let color = style::series_color(i);
                    chart.draw_series(
                        pts.into_iter()
                            .map(move |(x, y)| Circle::new((x, y), 4, color.filled())),
                    )?;
                }

                Ok(())
            },
        ))
    }
}

/// `counts.plot`: one circle per distinct (cty, hwy) pair, sized by how
/// many points overlap there.
pub struct CountsStrip;

impl Chart for CountsStrip {
    fn name(&self) -> &'static str {
        "counts"
    }

    fn title(&self) -> &'static str {
        "Overlap counts"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let mpg = ctx.data().get(MPG)?;
        let cty = mpg.f64s("cty")?;
        let hwy = mpg.f64s("hwy")?;
        if cty.is_empty() {
            return Err(RenderError::EmptySeries { chart: self.name() }.into());
        }

        let mut counts: BTreeMap<(i64, i64), u32> = BTreeMap::new();
        for (&c, &h) in cty.iter().zip(&hwy) {
            *counts
                .entry((c.round() as i64, h.round() as i64))
                .or_default() += 1;
        }

        let (x_lo, x_hi) = stats::min_max(&cty);
        let (y_lo, y_hi) = stats::min_max(&hwy);

        Ok(Figure::new(
            style::FIG_WIDE,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let mut chart = ChartBuilder::on(root)
                    .caption(
                        "Counts Plot - Size of circle is bigger as more points overlap",
                        ("sans-serif", style::MED).into_font(),
                    )
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(60)
                    .build_cartesian_2d(x_lo - 1.0..x_hi + 1.0, y_lo - 2.0..y_hi + 2.0)?;

                chart
                    .configure_mesh()
                    .x_desc("cty")
                    .y_desc("hwy")
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                let color = style::series_color(0);
                chart.draw_series(counts.into_iter().map(move |((c, h), n)| {
                    Circle::new((c as f64, h as f64), (n * 2) as i32, color.filled())
                }))?;

                Ok(())
            },
        ))
    }
}

/// Distinct values of a numeric column, sorted ascending.
fn numeric_categories(values: &[f64]) -> Vec<f64> {
    let mut cats = values.to_vec();
    cats.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    cats.dedup();
    cats
}

/// Tick label for a categorical x axis: the column value at integral
/// positions, nothing elsewhere.
fn column_label(x: f64, columns: &[f64]) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 || i as usize >= columns.len() {
        return String::new();
    }
    let v = columns[i as usize];
    if v.fract().abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}
