//! Box and violin charts of highway mileage by vehicle class.

use plotters::prelude::*;
use rand::Rng;

use crate::data::{Dataset, MPG};
use crate::error::{RenderError, Result};
use crate::render::Figure;
use crate::stats::{self, FiveNumber};

use super::style;
use super::{Chart, ChartContext};

/// Box half-width in category units.
const BOX_HALF: f64 = 0.3;

/// `box.plot`: box plot of highway mileage per vehicle class, fixed
/// 10..40 y window like the source chart.
pub struct ClassBox;

impl Chart for ClassBox {
    fn name(&self) -> &'static str {
        "box"
    }

    fn title(&self) -> &'static str {
        "Highway mileage by class"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let mpg = ctx.data().get(MPG)?;
        let summaries = class_summaries(mpg)?;
        if summaries.is_empty() {
            return Err(RenderError::EmptySeries { chart: self.name() }.into());
        }

        let n = summaries.len();
        let (y_lo, y_hi) = (10.0f64, 40.0f64);

        Ok(Figure::new(
            style::FIG_TALL,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let classes: Vec<String> =
                    summaries.iter().map(|(c, _)| c.clone()).collect();

                let mut chart = ChartBuilder::on(root)
                    .caption(
                        "Box Plot of Highway Mileage by Vehicle Class",
                        ("sans-serif", style::MED).into_font(),
                    )
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(60)
                    .build_cartesian_2d(-0.5f64..n as f64 - 0.5, y_lo..y_hi)?;

                chart
                    .configure_mesh()
                    .x_desc("class")
                    .y_desc("hwy")
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_labels(n)
                    .x_label_formatter(&|x| category_label(*x, &classes))
                    .x_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                let area = chart.plotting_area();

                // Column separators, as in the source chart.
                for i in 0..n.saturating_sub(1) {
                    let x = i as f64 + 0.5;
                    area.draw(&PathElement::new(
                        vec![(x, y_lo), (x, y_hi)],
                        ShapeStyle::from(&style::GRAY.mix(0.2)).stroke_width(1),
                    ))?;
                }

                for (i, (_, s)) in summaries.iter().enumerate() {
                    draw_box(area, i as f64, BOX_HALF, s, style::series_color(i))?;

                    for &v in s.outliers.iter().filter(|&&v| v > y_lo && v < y_hi) {
                        area.draw(&Circle::new((i as f64, v), 2, BLACK.filled()))?;
                    }
                }

                Ok(())
            },
        ))
    }
}

/// `dotbox.plot`: boxes per (class, cylinders) pair with a black strip
/// overlay of every observation.
pub struct DotBox;

impl Chart for DotBox {
    fn name(&self) -> &'static str {
        "dotbox"
    }

    fn title(&self) -> &'static str {
        "Highway mileage by class and cylinders"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let mpg = ctx.data().get(MPG)?;
        let hwy = mpg.f64s("hwy")?;
        let class = mpg.strs("class")?;
        let cyl = mpg.i64s("cyl")?;

        let mut classes = mpg.categories("class")?;
        classes.sort_unstable();
        let mut cylinders: Vec<i64> = cyl.to_vec();
        cylinders.sort_unstable();
        cylinders.dedup();
        if classes.is_empty() || hwy.is_empty() {
            return Err(RenderError::EmptySeries { chart: self.name() }.into());
        }

        // One box per (class, cylinder) pair that has data.
        let slot = 0.8 / cylinders.len() as f64;
        let mut boxes: Vec<(f64, FiveNumber, usize)> = Vec::new();
        for (ci, c) in classes.iter().enumerate() {
            for (hi, &k) in cylinders.iter().enumerate() {
                let values: Vec<f64> = hwy
                    .iter()
                    .zip(class)
                    .zip(cyl)
                    .filter(|((_, cl), k2)| cl.as_str() == c.as_str() && **k2 == k)
                    .map(|((&v, _), _)| v)
                    .collect();
                if let Some(s) = stats::five_number(&values) {
                    let center = ci as f64 - 0.4 + slot * (hi as f64 + 0.5);
                    boxes.push((center, s, hi));
                }
            }
        }

        let mut rng = ctx.rng();
        let dots: Vec<(f64, f64)> = hwy
            .iter()
            .zip(class)
            .map(|(&v, cl)| {
                let ci = classes.iter().position(|c| c == cl).unwrap_or(0);
                (ci as f64 + rng.gen_range(-0.4..0.4), v)
            })
            .collect();

        let (d_lo, d_hi) = stats::min_max(&hwy);
        let (y_lo, y_hi) = (d_lo - 3.0, d_hi + 3.0);
        let n = classes.len();
        let half = slot * 0.4;
        let cyl_labels: Vec<String> = cylinders.iter().map(|k| format!("Cyl={k}")).collect();

        Ok(Figure::new(
            style::FIG_TALL,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let mut chart = ChartBuilder::on(root)
                    .caption(
                        "Box Plot of Highway Mileage by Vehicle Class",
                        ("sans-serif", style::MED).into_font(),
                    )
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(60)
                    .build_cartesian_2d(-0.5f64..n as f64 - 0.5, y_lo..y_hi)?;

                chart
                    .configure_mesh()
                    .x_desc("class")
                    .y_desc("hwy")
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_labels(n)
                    .x_label_formatter(&|x| category_label(*x, &classes))
                    .x_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                for (hi, label) in cyl_labels.iter().enumerate() {
                    let color = style::series_color(hi);
                    chart
                        .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
                        .label(label.clone())
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
                        });
                }

                let area = chart.plotting_area();

                for i in 0..n.saturating_sub(1) {
                    let x = i as f64 + 0.5;
                    area.draw(&PathElement::new(
                        vec![(x, y_lo), (x, y_hi)],
                        ShapeStyle::from(&style::GRAY.mix(0.2)).stroke_width(1),
                    ))?;
                }

                for (center, s, hue) in &boxes {
                    draw_box(area, *center, half, s, style::series_color(*hue))?;
                }

                for &(x, y) in &dots {
                    area.draw(&Circle::new((x, y), 2, BLACK.filled()))?;
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

/// `violion.plot`: width-scaled violins of highway mileage per class,
/// quartile lines inside. The route keeps the source's spelling.
pub struct Violin;

impl Chart for Violin {
    fn name(&self) -> &'static str {
        "violion"
    }

    fn title(&self) -> &'static str {
        "Highway mileage violins by class"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let mpg = ctx.data().get(MPG)?;
        let mut classes = mpg.categories("class")?;
        classes.sort_unstable();

        struct ViolinShape {
            curve: Vec<(f64, f64)>, // (half width, y)
            summary: FiveNumber,
            bandwidth: f64,
            values: Vec<f64>,
        }

        let mut kept: Vec<String> = Vec::new();
        let mut shapes = Vec::new();
        for c in &classes {
            let values = mpg.f64s_where_str("hwy", "class", c)?;
            let Some(summary) = stats::five_number(&values) else {
                continue;
            };
            kept.push(c.clone());
            let bandwidth = stats::scott_bandwidth(&values);
            let (lo, hi) = stats::min_max(&values);
            let grid = stats::grid(lo - 2.0 * bandwidth, hi + 2.0 * bandwidth, 120);
            let dens = stats::gaussian_kde(&values, &grid, Some(bandwidth));
            let d_max = dens.iter().cloned().fold(0.0f64, f64::max).max(1e-9);
            // scale='width': every violin spans the same max half-width.
            let curve = grid
                .iter()
                .zip(&dens)
                .map(|(&y, &d)| (0.4 * d / d_max, y))
                .collect();
            shapes.push(ViolinShape {
                curve,
                summary,
                bandwidth,
                values,
            });
        }
        if shapes.is_empty() {
            return Err(RenderError::EmptySeries { chart: self.name() }.into());
        }

        let all: Vec<f64> = shapes.iter().flat_map(|s| s.values.iter().copied()).collect();
        let (d_lo, d_hi) = stats::min_max(&all);
        let pad = shapes
            .iter()
            .map(|s| s.bandwidth)
            .fold(0.0f64, f64::max)
            .max(1.0)
            * 2.5;
        let (y_lo, y_hi) = (d_lo - pad, d_hi + pad);
        let n = shapes.len();

        let violins: Vec<(Vec<(f64, f64)>, FiveNumber)> = shapes
            .into_iter()
            .map(|s| (s.curve, s.summary))
            .collect();
        let labels = kept;

        Ok(Figure::new(
            style::FIG_TALL,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let mut chart = ChartBuilder::on(root)
                    .caption(
                        "Violin Plot of Highway Mileage by Vehicle Class",
                        ("sans-serif", style::MED).into_font(),
                    )
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(60)
                    .build_cartesian_2d(-0.5f64..n as f64 - 0.5, y_lo..y_hi)?;

                chart
                    .configure_mesh()
                    .x_desc("class")
                    .y_desc("hwy")
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_labels(n)
                    .x_label_formatter(&|x| category_label(*x, &labels))
                    .x_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                let area = chart.plotting_area();

                for (i, (curve, summary)) in violins.iter().enumerate() {
                    let x = i as f64;
                    let color = style::series_color(i);

                    let mut outline: Vec<(f64, f64)> = curve
                        .iter()
                        .map(|&(half, y)| (x - half, y))
                        .collect();
                    outline.extend(curve.iter().rev().map(|&(half, y)| (x + half, y)));

                    area.draw(&Polygon::new(outline.clone(), color.mix(0.8).filled()))?;
                    outline.push(outline[0]);
                    area.draw(&PathElement::new(
                        outline,
                        ShapeStyle::from(&color).stroke_width(1),
                    ))?;

                    for (q, width) in [
                        (summary.q1, 1),
                        (summary.median, 2),
                        (summary.q3, 1),
                    ] {
                        let half = half_width_at(curve, q);
                        area.draw(&PathElement::new(
                            vec![(x - half, q), (x + half, q)],
                            ShapeStyle::from(&WHITE).stroke_width(width),
                        ))?;
                    }
                }

                Ok(())
            },
        ))
    }
}

/// The f64 x f64 plotting area every chart in this module draws on.
type PlotArea<'a> = DrawingArea<
    BitMapBackend<'a>,
    plotters::coord::cartesian::Cartesian2d<
        plotters::coord::types::RangedCoordf64,
        plotters::coord::types::RangedCoordf64,
    >,
>;

/// Draw one box glyph (box, median, whiskers, caps) at category center
/// `x`.
fn draw_box(
    area: &PlotArea<'_>,
    x: f64,
    half: f64,
    s: &FiveNumber,
    color: RGBColor,
) -> anyhow::Result<()> {
    let (x0, x1) = (x - half, x + half);
    let cap = half * 0.5;

    area.draw(&Rectangle::new([(x0, s.q1), (x1, s.q3)], color.mix(0.85).filled()))?;
    area.draw(&Rectangle::new(
        [(x0, s.q1), (x1, s.q3)],
        ShapeStyle::from(&BLACK).stroke_width(1),
    ))?;
    area.draw(&PathElement::new(
        vec![(x0, s.median), (x1, s.median)],
        ShapeStyle::from(&BLACK).stroke_width(2),
    ))?;
    area.draw(&PathElement::new(
        vec![(x, s.q3), (x, s.whisker_high)],
        ShapeStyle::from(&BLACK).stroke_width(1),
    ))?;
    area.draw(&PathElement::new(
        vec![(x, s.q1), (x, s.whisker_low)],
        ShapeStyle::from(&BLACK).stroke_width(1),
    ))?;
    area.draw(&PathElement::new(
        vec![(x - cap, s.whisker_high), (x + cap, s.whisker_high)],
        ShapeStyle::from(&BLACK).stroke_width(1),
    ))?;
    area.draw(&PathElement::new(
        vec![(x - cap, s.whisker_low), (x + cap, s.whisker_low)],
        ShapeStyle::from(&BLACK).stroke_width(1),
    ))?;

    Ok(())
}

/// Box summaries of highway mileage per vehicle class, classes sorted.
fn class_summaries(mpg: &Dataset) -> Result<Vec<(String, FiveNumber)>> {
    let mut classes = mpg.categories("class")?;
    classes.sort_unstable();

    let mut out = Vec::new();
    for c in classes {
        let values = mpg.f64s_where_str("hwy", "class", &c)?;
        if let Some(s) = stats::five_number(&values) {
            out.push((c, s));
        }
    }
    Ok(out)
}

/// Violin half-width at level `y`, interpolated from the sampled curve.
fn half_width_at(curve: &[(f64, f64)], y: f64) -> f64 {
    for pair in curve.windows(2) {
        let (h0, y0) = pair[0];
        let (h1, y1) = pair[1];
        if (y0..=y1).contains(&y) {
            if (y1 - y0).abs() < f64::EPSILON {
                return h0;
            }
            let t = (y - y0) / (y1 - y0);
            return h0 + t * (h1 - h0);
        }
    }
    0.0
}

/// Tick label for a categorical axis: the category name at integral
/// positions, nothing elsewhere.
fn category_label(x: f64, labels: &[String]) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 || i as usize >= labels.len() {
        String::new()
    } else {
        labels[i as usize].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, DatasetStore};

    const MPG_CSV: &str = "\
cyl,cty,hwy,class
4,21,29,compact
4,20,31,compact
4,19,27,compact
6,16,24,suv
6,15,22,suv
8,13,17,suv
6,17,24,minivan
6,16,23,minivan
";

    fn fixture() -> DatasetStore {
        let mut store = DatasetStore::new();
        store.insert(Dataset::from_csv(MPG, MPG_CSV).unwrap());
        store
    }

    #[test]
    fn class_summaries_are_sorted_by_class() {
        let store = fixture();
        let summaries = class_summaries(store.get(MPG).unwrap()).unwrap();
        let names: Vec<&str> = summaries.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["compact", "minivan", "suv"]);
    }

    #[test]
    fn half_width_interpolates_between_samples() {
        let curve = vec![(0.0, 0.0), (0.4, 1.0), (0.0, 2.0)];
        assert!((half_width_at(&curve, 0.5) - 0.2).abs() < 1e-12);
        assert!((half_width_at(&curve, 1.0) - 0.4).abs() < 1e-12);
        assert_eq!(half_width_at(&curve, 5.0), 0.0);
    }

    #[test]
    fn category_labels_fall_on_integral_positions() {
        let labels = vec!["compact".to_string(), "suv".to_string()];
        assert_eq!(category_label(1.0, &labels), "suv");
        assert_eq!(category_label(0.4, &labels), "");
    }

    #[test]
    fn box_chart_renders_against_fixture_data() {
        let store = fixture();
        let ctx = ChartContext::new(&store, Some(1));
        let figure = ClassBox.figure(&ctx).unwrap();
        assert_eq!((figure.width(), figure.height()), (1040, 800));
        assert!(figure.rasterize().is_ok());
    }
}
