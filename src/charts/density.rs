//! Distribution charts: histogram/density curves, the 2x2 demo panels,
//! and the per-cylinder KDE chart.

use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::data::MPG;
use crate::error::{RenderError, Result};
use crate::render::Figure;
use crate::stats;

use super::style;
use super::{Chart, ChartContext};

const KDE_GRID_POINTS: usize = 200;

/// `densitycurve.plot`: histogram plus KDE of city mileage for three
/// vehicle classes.
pub struct DensityCurve;

impl Chart for DensityCurve {
    fn name(&self) -> &'static str {
        "densitycurve"
    }

    fn title(&self) -> &'static str {
        "City mileage density by vehicle type"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let mpg = ctx.data().get(MPG)?;

        let classes = [
            ("compact", style::DODGERBLUE),
            ("suv", style::ORANGE),
            ("minivan", style::GREEN),
        ];
        let mut groups = Vec::new();
        for (class, color) in classes {
            let values = mpg.f64s_where_str("cty", "class", class)?;
            if !values.is_empty() {
                groups.push((values, color));
            }
        }
        if groups.is_empty() {
            return Err(RenderError::EmptySeries { chart: self.name() }.into());
        }

        let all: Vec<f64> = groups.iter().flat_map(|(v, _)| v.iter().copied()).collect();
        let (x_lo, x_hi) = stats::min_max(&all);
        let (x_lo, x_hi) = (x_lo - 3.0, x_hi + 3.0);
        let y_max = 0.35f64;

        Ok(Figure::new(
            style::FIG_WIDE,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let mut chart = ChartBuilder::on(root)
                    .caption(
                        "Density Plot of City Mileage by Vehicle Type",
                        ("sans-serif", style::MED).into_font(),
                    )
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(70)
                    .build_cartesian_2d(x_lo..x_hi, 0.0f64..y_max)?;

                chart
                    .configure_mesh()
                    .x_desc("cty")
                    .y_desc("density")
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                for (values, color) in &groups {
                    let bars = stats::density_histogram(values, None);
                    chart.draw_series(bars.iter().map(|&(a, b, d)| {
                        Rectangle::new([(a, 0.0), (b, d.min(y_max))], color.mix(0.7).filled())
                    }))?;

                    let grid = stats::grid(x_lo, x_hi, KDE_GRID_POINTS);
                    let dens = stats::gaussian_kde(values, &grid, None);
                    chart.draw_series(LineSeries::new(
                        grid.iter().zip(&dens).map(|(&x, &d)| (x, d.min(y_max))),
                        ShapeStyle::from(color).stroke_width(3),
                    ))?;
                }

                Ok(())
            },
        ))
    }
}

/// `distribution.plot`: 2x2 panels over one seeded normal sample, the
/// four classic histogram/KDE/rug combinations.
pub struct DistributionPanels;

/// The source demo fixes this seed, which keeps the route byte-stable.
const DISTRIBUTION_SEED: u64 = 10;

impl Chart for DistributionPanels {
    fn name(&self) -> &'static str {
        "distribution"
    }

    fn title(&self) -> &'static str {
        "Distribution panel demo"
    }

    fn figure(&self, _ctx: &ChartContext<'_>) -> Result<Figure> {
        let mut rng = StdRng::seed_from_u64(DISTRIBUTION_SEED);
        let samples: Vec<f64> = (0..100).map(|_| rng.sample(StandardNormal)).collect();

        let (lo, hi) = stats::min_max(&samples);
        let (x_lo, x_hi) = (lo - 1.0, hi + 1.0);

        Ok(Figure::new(
            style::FIG_SQUARE,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let panels = root.split_evenly((2, 2));
                let grid = stats::grid(x_lo, x_hi, KDE_GRID_POINTS);
                let dens = stats::gaussian_kde(&samples, &grid, None);
                let dens_max = dens.iter().cloned().fold(0.0f64, f64::max).max(1e-6);

                // Top left: histogram of raw counts.
                {
                    let bars = stats::count_histogram(&samples, None);
                    let top = bars.iter().map(|&(_, _, c)| c).fold(0.0f64, f64::max);
                    let mut chart = panel(&panels[0], x_lo..x_hi, 0.0..top * 1.15)?;
                    chart.draw_series(bars.iter().map(|&(a, b, c)| {
                        Rectangle::new([(a, 0.0), (b, c)], style::BLUE.mix(0.6).filled())
                    }))?;
                }

                // Top right: KDE curve with a rug.
                {
                    let mut chart = panel(&panels[1], x_lo..x_hi, 0.0..dens_max * 1.2)?;
                    chart.draw_series(LineSeries::new(
                        grid.iter().zip(&dens).map(|(&x, &d)| (x, d)),
                        ShapeStyle::from(&style::RED).stroke_width(2),
                    ))?;
                    let rug_h = dens_max * 0.06;
                    chart.draw_series(samples.iter().map(|&x| {
                        PathElement::new(
                            vec![(x, 0.0), (x, rug_h)],
                            ShapeStyle::from(&style::RED).stroke_width(1),
                        )
                    }))?;
                }

                // Bottom left: filled KDE.
                {
                    let mut chart = panel(&panels[2], x_lo..x_hi, 0.0..dens_max * 1.2)?;
                    chart.draw_series(
                        AreaSeries::new(
                            grid.iter().zip(&dens).map(|(&x, &d)| (x, d)),
                            0.0,
                            style::GREEN.mix(0.5).filled(),
                        )
                        .border_style(ShapeStyle::from(&style::GREEN).stroke_width(2)),
                    )?;
                }

                // Bottom right: density histogram with the KDE overlaid.
                {
                    let bars = stats::density_histogram(&samples, None);
                    let top = bars
                        .iter()
                        .map(|&(_, _, d)| d)
                        .fold(dens_max, f64::max);
                    let mut chart = panel(&panels[3], x_lo..x_hi, 0.0..top * 1.15)?;
                    chart.draw_series(bars.iter().map(|&(a, b, d)| {
                        Rectangle::new([(a, 0.0), (b, d)], style::MAGENTA.mix(0.5).filled())
                    }))?;
                    chart.draw_series(LineSeries::new(
                        grid.iter().zip(&dens).map(|(&x, &d)| (x, d)),
                        ShapeStyle::from(&style::MAGENTA).stroke_width(2),
                    ))?;
                }

                Ok(())
            },
        ))
    }
}

/// Build one panel chart with the shared mesh styling.
fn panel<'a, 'b>(
    area: &'a crate::render::Canvas<'b>,
    x: std::ops::Range<f64>,
    y: std::ops::Range<f64>,
) -> anyhow::Result<
    ChartContext2d<'a, 'b>,
> {
    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x, y)?;

    chart
        .configure_mesh()
        .light_line_style(&style::GRID)
        .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
        .x_label_style(("sans-serif", style::SMALL).into_font().color(&style::TEXT))
        .y_label_style(("sans-serif", style::SMALL).into_font().color(&style::TEXT))
        .draw()?;

    Ok(chart)
}

type ChartContext2d<'a, 'b> = plotters::chart::ChartContext<
    'a,
    BitMapBackend<'b>,
    plotters::coord::cartesian::Cartesian2d<
        plotters::coord::types::RangedCoordf64,
        plotters::coord::types::RangedCoordf64,
    >,
>;

/// `kde.plot`: filled density of city mileage per cylinder count.
pub struct KdeByCylinders;

impl Chart for KdeByCylinders {
    fn name(&self) -> &'static str {
        "kde"
    }

    fn title(&self) -> &'static str {
        "City mileage density by cylinders"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let mpg = ctx.data().get(MPG)?;

        let cylinders = [
            (4, "Cyl=4", style::GREEN),
            (5, "Cyl=5", style::DEEPPINK),
            (6, "Cyl=6", style::DODGERBLUE),
            (8, "Cyl=8", style::ORANGE),
        ];
        let mut groups = Vec::new();
        for (cyl, label, color) in cylinders {
            let values = mpg.f64s_where_i64("cty", "cyl", cyl)?;
            if !values.is_empty() {
                groups.push((values, label, color));
            }
        }
        if groups.is_empty() {
            return Err(RenderError::EmptySeries { chart: self.name() }.into());
        }

        let all: Vec<f64> = groups.iter().flat_map(|(v, _, _)| v.iter().copied()).collect();
        let (x_lo, x_hi) = stats::min_max(&all);
        let (x_lo, x_hi) = (x_lo - 4.0, x_hi + 4.0);
        let y_max = 0.35f64;

        Ok(Figure::new(
            style::FIG_TALL,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let mut chart = ChartBuilder::on(root)
                    .caption(
                        "Density Plot of City Mileage by n_Cylinders",
                        ("sans-serif", style::MED).into_font(),
                    )
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(70)
                    .build_cartesian_2d(x_lo..x_hi, 0.0f64..y_max)?;

                chart
                    .configure_mesh()
                    .x_desc("cty")
                    .y_desc("density")
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                for (values, label, color) in &groups {
                    let grid = stats::grid(x_lo, x_hi, KDE_GRID_POINTS);
                    let dens = stats::gaussian_kde(values, &grid, None);
                    let color = *color;
                    chart
                        .draw_series(
                            AreaSeries::new(
                                grid.iter().zip(&dens).map(|(&x, &d)| (x, d.min(y_max))),
                                0.0,
                                color.mix(0.7).filled(),
                            )
                            .border_style(ShapeStyle::from(&color).stroke_width(2)),
                        )?
                        .label(*label)
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
                        });
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
