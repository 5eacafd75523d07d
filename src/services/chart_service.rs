//! SVG line chart of a student's cumulative presents.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::error::AppError;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 400;

/// Running count of presents, one point per record. `records` must be
/// sorted by date.
pub fn cumulative_presents(records: &[(NaiveDate, i32)]) -> Vec<(NaiveDate, i64)> {
    records
        .iter()
        .scan(0i64, |total, (date, present)| {
            if *present == 1 {
                *total += 1;
            }
            Some((*date, *total))
        })
        .collect()
}

/// Render the attendance chart as an SVG document.
pub fn attendance_chart_svg(records: &[(NaiveDate, i32)]) -> Result<String, AppError> {
    let points = cumulative_presents(records);
    let Some((start, _)) = points.first().copied() else {
        return Err(AppError::not_found("No attendance data."));
    };

    let mut svg = String::new();
    draw(&mut svg, start, &points)
        .map_err(|e| AppError::Internal(format!("chart rendering failed: {}", e)))?;
    Ok(svg)
}

fn draw(
    svg: &mut String,
    start: NaiveDate,
    points: &[(NaiveDate, i64)],
) -> Result<(), Box<dyn std::error::Error>> {
    let series: Vec<(i64, i64)> = points
        .iter()
        .map(|(date, total)| ((*date - start).num_days(), *total))
        .collect();
    let last_day = series.last().map(|(x, _)| *x).unwrap_or(0).max(1);
    let top = series.iter().map(|(_, y)| *y).max().unwrap_or(0).max(1);

    let day_label = |offset: &i64| (start + Duration::days(*offset)).format("%Y-%m-%d").to_string();

    let root = SVGBackend::with_string(svg, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("My Attendance Over Time", ("sans-serif", 22))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d(0i64..last_day, 0i64..top + 1)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Cumulative Presents")
        .x_labels(6)
        .x_label_formatter(&day_label)
        .draw()?;

    chart.draw_series(LineSeries::new(series.iter().copied(), &BLUE))?;
    chart.draw_series(
        series
            .iter()
            .map(|point| Circle::new(*point, 3, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    #[test]
    fn cumulative_counts_only_presents() {
        let records = [(day(1), 1), (day(2), 0), (day(4), 1), (day(5), 1)];

        assert_eq!(
            cumulative_presents(&records),
            vec![(day(1), 1), (day(2), 1), (day(4), 2), (day(5), 3)]
        );
    }

    #[test]
    fn renders_svg_with_title() {
        let svg = attendance_chart_svg(&[(day(1), 1), (day(3), 0), (day(6), 1)]).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("My Attendance Over Time"));
    }

    #[test]
    fn single_record_still_renders() {
        assert!(attendance_chart_svg(&[(day(9), 0)]).is_ok());
    }

    #[test]
    fn no_records_is_not_found() {
        let err = attendance_chart_svg(&[]).unwrap_err();
        assert_eq!(err.to_string(), "No attendance data.");
    }
}
