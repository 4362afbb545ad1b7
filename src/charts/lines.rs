//! Line charts over generated data: the demo random line and the date
//! series.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use rand::Rng;

use crate::error::Result;
use crate::render::Figure;

use super::style;
use super::{Chart, ChartContext};

/// `simple.plot`: a line over 100 random integers in 1..=50.
pub struct Simple;

impl Chart for Simple {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn title(&self) -> &'static str {
        "Random line"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let mut rng = ctx.rng();
        let ys: Vec<i32> = (0..100).map(|_| rng.gen_range(1..=50)).collect();

        Ok(Figure::new(
            style::FIG_WIDE,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let mut chart = ChartBuilder::on(root)
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(60)
                    .build_cartesian_2d(0i32..99i32, 0i32..55i32)?;

                chart
                    .configure_mesh()
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                chart.draw_series(LineSeries::new(
                    ys.into_iter().enumerate().map(|(x, y)| (x as i32, y)),
                    ShapeStyle::from(&style::series_color(0)).stroke_width(2),
                ))?;

                Ok(())
            },
        ))
    }
}

/// `plotdate.plot`: ten daily values starting today, on a date axis.
pub struct DateSeries;

impl Chart for DateSeries {
    fn name(&self) -> &'static str {
        "plotdate"
    }

    fn title(&self) -> &'static str {
        "Date series"
    }

    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure> {
        let mut rng = ctx.rng();
        let start: NaiveDate = chrono::Local::now().date_naive();
        let end = start + Duration::days(9);
        let points: Vec<(NaiveDate, i64)> = (0..10)
            .map(|i| (start + Duration::days(i), rng.gen_range(0..1000)))
            .collect();

        Ok(Figure::new(
            style::FIG_WIDE,
            style::DPI,
            move |root| -> anyhow::Result<()> {
                let mut chart = ChartBuilder::on(root)
                    .margin(20)
                    .x_label_area_size(60)
                    .y_label_area_size(70)
                    .build_cartesian_2d(start..end, 0i64..1000i64)?;

                chart
                    .configure_mesh()
                    .light_line_style(&style::GRID)
                    .axis_style(ShapeStyle::from(&style::AXIS).stroke_width(1))
                    .x_labels(10)
                    .x_label_formatter(&|d| d.format("%Y-%m-%d").to_string())
                    .x_label_style(("sans-serif", style::SMALL).into_font().color(&style::TEXT))
                    .y_label_style(("sans-serif", style::MED).into_font().color(&style::TEXT))
                    .draw()?;

                let color = style::series_color(0);
                chart.draw_series(LineSeries::new(
                    points.iter().copied(),
                    ShapeStyle::from(&color).stroke_width(2),
                ))?;
                chart.draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                )?;

                Ok(())
            },
        ))
    }
}
