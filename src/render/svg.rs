//! Chart drawing with `plotters` into in-memory SVG strings.

use crate::calendar::WEEKDAY_NAMES;
use crate::charts::daily_trips::DailyTrips;
use crate::charts::distance::DistanceHistogram;
use crate::charts::heatmap::WeeklyHeatmap;
use crate::charts::hourly_fares::HourlyFares;
use crate::charts::payments::PaymentBreakdown;
use crate::charts::top_zones::TopZones;
use crate::dashboard::{ChartKind, DashboardView};
use crate::exceptions::DashboardResult;
use crate::settings::ChartSettings;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::{FRAC_PI_2, TAU};

const NO_DATA: &str = "No trips match the current filters";
const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(99, 110, 250);
const MAX_LABEL_CHARS: usize = 14;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Draws into a fresh white canvas and returns the SVG document.
fn render_svg<F>(size: ChartSettings, draw: F) -> DashboardResult<String>
where
    F: FnOnce(&Area<'_>) -> DashboardResult<()>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

fn draw_empty(root: &Area<'_>, title: &str) -> DashboardResult<()> {
    let area = root.titled(title, (FONT, 20))?;
    let (w, h) = area.dim_in_pixel();
    area.draw(&Text::new(
        NO_DATA,
        (w as i32 / 2 - 120, h as i32 / 2),
        (FONT, 16).into_font(),
    ))?;
    Ok(())
}

/// Upper bound of a count axis with some headroom above the tallest bar.
fn headroom(max: u64) -> u64 {
    max + max / 10 + 1
}

fn short_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let cut: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{}…", cut)
    }
}

/// Yellow-orange-red ramp for the heatmap.
fn heat_color(value: u64, max: u64) -> RGBColor {
    const LOW: (f64, f64, f64) = (255.0, 255.0, 204.0);
    const MID: (f64, f64, f64) = (253.0, 141.0, 60.0);
    const HIGH: (f64, f64, f64) = (189.0, 0.0, 38.0);
    let t = if max == 0 {
        0.0
    } else {
        value as f64 / max as f64
    };
    let (from, to, local) = if t < 0.5 {
        (LOW, MID, t * 2.0)
    } else {
        (MID, HIGH, (t - 0.5) * 2.0)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * local).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

pub fn top_zones_svg(data: &TopZones, title: &str, size: ChartSettings) -> DashboardResult<String> {
    render_svg(size, |root| {
        if data.zones.is_empty() {
            return draw_empty(root, title);
        }
        let names: Vec<String> = data.zones.iter().map(|z| short_label(&z.zone_name)).collect();
        let max = data.zones.iter().map(|z| z.trips).max().unwrap_or(0);
        let n = data.zones.len();

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d((0..n).into_segmented(), 0u64..headroom(max))?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_style((FONT, 10))
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => names.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc("Zone")
            .y_desc("trip_count")
            .draw()?;
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BAR_COLOR.filled())
                .margin(4)
                .data(data.zones.iter().enumerate().map(|(i, z)| (i, z.trips))),
        )?;
        Ok(())
    })
}

pub fn payment_breakdown_svg(
    data: &PaymentBreakdown,
    title: &str,
    size: ChartSettings,
) -> DashboardResult<String> {
    render_svg(size, |root| {
        if data.shares.is_empty() {
            return draw_empty(root, title);
        }
        let area = root.titled(title, (FONT, 20))?;
        let (w, h) = area.dim_in_pixel();
        let center = ((w as f64 * 0.35) as i32, (h / 2) as i32);
        let radius = f64::from(w.min(h)) * 0.4;
        let legend_x = (w as f64 * 0.7) as i32;

        let mut start = -FRAC_PI_2;
        for (i, share) in data.shares.iter().enumerate() {
            let color = Palette99::pick(i);
            let sweep = share.percentage / 100.0 * TAU;
            // One vertex per degree keeps the arc smooth.
            let steps = (sweep.to_degrees().ceil() as usize).max(2);
            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            for s in 0..=steps {
                let angle = start + sweep * s as f64 / steps as f64;
                points.push((
                    center.0 + (radius * angle.cos()).round() as i32,
                    center.1 + (radius * angle.sin()).round() as i32,
                ));
            }
            area.draw(&Polygon::new(points, color.filled()))?;

            let legend_y = 20 + i as i32 * 24;
            area.draw(&Rectangle::new(
                [(legend_x, legend_y), (legend_x + 14, legend_y + 14)],
                color.filled(),
            ))?;
            area.draw(&Text::new(
                format!("{} ({:.1}%)", share.label, share.percentage),
                (legend_x + 20, legend_y),
                (FONT, 14).into_font(),
            ))?;
            start += sweep;
        }
        Ok(())
    })
}

pub fn hourly_fares_svg(
    data: &HourlyFares,
    title: &str,
    size: ChartSettings,
) -> DashboardResult<String> {
    render_svg(size, |root| {
        if data.points.is_empty() {
            return draw_empty(root, title);
        }
        let max_fare = data.points.iter().map(|p| p.avg_fare).fold(0.0, f64::max);
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0u32..23u32, 0f64..(max_fare * 1.1).max(1.0))?;
        chart
            .configure_mesh()
            .x_labels(24)
            .x_desc("pickup_hour")
            .y_desc("avg_fare")
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()?;
        chart.draw_series(LineSeries::new(
            data.points.iter().map(|p| (p.hour, p.avg_fare)),
            &BAR_COLOR,
        ))?;
        chart.draw_series(
            data.points
                .iter()
                .map(|p| Circle::new((p.hour, p.avg_fare), 3, BAR_COLOR.filled())),
        )?;
        Ok(())
    })
}

pub fn distance_histogram_svg(
    data: &DistanceHistogram,
    title: &str,
    size: ChartSettings,
) -> DashboardResult<String> {
    render_svg(size, |root| {
        if data.bins.is_empty() {
            return draw_empty(root, title);
        }
        let (lo, hi) = data.display_range;
        let max = data.visible_bins().map(|b| b.count).max().unwrap_or(0);
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(lo..hi, 0u64..headroom(max))?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("trip_distance")
            .y_desc("count")
            .draw()?;
        chart.draw_series(data.visible_bins().map(|b| {
            Rectangle::new(
                [(b.lower.max(lo), 0u64), (b.upper.min(hi), b.count)],
                BAR_COLOR.mix(0.85).filled(),
            )
        }))?;
        Ok(())
    })
}

pub fn weekly_heatmap_svg(
    data: &WeeklyHeatmap,
    title: &str,
    size: ChartSettings,
) -> DashboardResult<String> {
    render_svg(size, |root| {
        let rows = data.counts.len() as i32;
        let cols = data.hours.len() as i32;
        let max = data.max_count();
        let x_label_area = 30;
        let y_label_area = 90;

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20))
            .margin(10)
            .x_label_area_size(x_label_area)
            .y_label_area_size(y_label_area)
            .build_cartesian_2d(0i32..cols, rows..0i32)?;

        // Labels sit on cell edges; shift them to the cell centers.
        let (plot_w, plot_h) = chart.plotting_area().dim_in_pixel();
        let half_cell_w = plot_w as i32 / cols.max(1) / 2;
        let half_cell_h = plot_h as i32 / rows.max(1) / 2;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(cols as usize)
            .y_labels(rows as usize)
            .x_label_offset(half_cell_w)
            .y_label_offset(half_cell_h)
            .x_label_formatter(&|x| {
                if *x < cols {
                    x.to_string()
                } else {
                    String::new()
                }
            })
            .y_label_formatter(&|y| {
                WEEKDAY_NAMES
                    .get(*y as usize)
                    .map(|d| d.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(data.counts.iter().enumerate().flat_map(|(row, counts)| {
            counts.iter().enumerate().map(move |(hour, n)| {
                let (x, y) = (hour as i32, row as i32);
                Rectangle::new([(x, y), (x + 1, y + 1)], heat_color(*n, max).filled())
            })
        }))?;
        Ok(())
    })
}

pub fn daily_trips_svg(
    data: &DailyTrips,
    title: &str,
    size: ChartSettings,
) -> DashboardResult<String> {
    render_svg(size, |root| {
        if data.points.is_empty() {
            return draw_empty(root, title);
        }
        let labels: Vec<String> = data
            .points
            .iter()
            .map(|p| p.date.format("%m-%d").to_string())
            .collect();
        let last = (data.points.len() as i32 - 1).max(1);
        let max = data.points.iter().map(|p| p.trips).max().unwrap_or(0);

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0i32..last, 0u64..headroom(max))?;
        chart
            .configure_mesh()
            .x_labels(10)
            .x_label_formatter(&|i| {
                usize::try_from(*i)
                    .ok()
                    .and_then(|i| labels.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .x_desc("pickup_date")
            .y_desc("trips")
            .draw()?;
        chart.draw_series(LineSeries::new(
            data.points
                .iter()
                .enumerate()
                .map(|(i, p)| (i as i32, p.trips)),
            &BAR_COLOR,
        ))?;
        Ok(())
    })
}

/// Renders one chart of `view` as an SVG document.
pub fn render_chart(
    kind: ChartKind,
    view: &DashboardView,
    size: ChartSettings,
) -> DashboardResult<String> {
    let title = kind.title();
    match kind {
        ChartKind::TopZones => top_zones_svg(&view.top_zones, title, size),
        ChartKind::PaymentBreakdown => payment_breakdown_svg(&view.payment_breakdown, title, size),
        ChartKind::HourlyFares => hourly_fares_svg(&view.hourly_fares, title, size),
        ChartKind::DistanceHistogram => {
            distance_histogram_svg(&view.distance_histogram, title, size)
        }
        ChartKind::WeeklyHeatmap => weekly_heatmap_svg(&view.weekly_heatmap, title, size),
        ChartKind::DailyTrips => daily_trips_svg(&view.daily_trips, title, size),
    }
}
