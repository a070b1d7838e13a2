//! Hand-built SVG charts for the aggregate tools
//!
//! Output is plain text so it can be diffed and edited by hand.
use std::fmt::Write;
use std::path::Path;

use crate::aggregate::{MonthlySummary, PeriodSummary};
use crate::rainfall_csv::LoadError;
use crate::series::{read_rainfall_csv, read_wind_csv};

const WIND_COLOR: &str = "#1f77b4";
const WIND_STROKE: &str = "#0b3d66";
const RAIN_COLOR: &str = "#ff7f0e";
const RAIN_STROKE: &str = "#8a3e00";

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Two bars side by side: mean wind speed and total rainfall for the period
pub fn summary_svg(summary: &PeriodSummary, title: &str) -> String {
    let (width, height) = (600.0, 240.0);
    let (left_x, right_x) = (50.0, 350.0);
    let (bar_top, bar_h) = (100.0, 120.0);
    let label_y = bar_top + bar_h + 20.0;

    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="24" font-size="18" text-anchor="middle" font-family="Arial" font-weight="bold">{}</text>"#,
        width / 2.0,
        xml_escape(title)
    );

    // Wind (left) is scaled against 1.4x its own value so the bar never fills the box
    let wind = summary.mean_wind.unwrap_or(0.0);
    let wind_bar_h = wind / (wind * 1.4).max(1.0) * bar_h;
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="60" font-size="14" text-anchor="middle">Mean Wind (km/h)</text>"#,
        left_x + 50.0
    );
    let _ = writeln!(
        svg,
        r#"<rect x="{left_x}" y="{:.1}" width="100" height="{:.1}" fill="{WIND_COLOR}" stroke="{WIND_STROKE}" stroke-width="1"/>"#,
        bar_top + (bar_h - wind_bar_h),
        wind_bar_h
    );
    let wind_label = summary
        .mean_wind
        .map(|v| format!("{v:.2} km/h"))
        .unwrap_or_else(|| "No data".to_string());
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{label_y:.1}" font-size="12" text-anchor="middle">{wind_label}</text>"#,
        left_x + 50.0
    );

    // Rain (right), scaled against 1.1x
    let rain = summary.total_rain.unwrap_or(0.0);
    let rain_bar_h = rain / (rain * 1.1).max(1.0) * bar_h;
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="60" font-size="14" text-anchor="middle">Total Rainfall (mm)</text>"#,
        right_x + 50.0
    );
    let _ = writeln!(
        svg,
        r#"<rect x="{right_x}" y="{:.1}" width="100" height="{:.1}" fill="{RAIN_COLOR}" stroke="{RAIN_STROKE}" stroke-width="1"/>"#,
        bar_top + (bar_h - rain_bar_h),
        rain_bar_h
    );
    let rain_label = summary
        .total_rain
        .map(|v| format!("{} mm", v.trunc() as i64))
        .unwrap_or_else(|| "No data".to_string());
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{label_y:.1}" font-size="12" text-anchor="middle">{rain_label}</text>"#,
        right_x + 50.0
    );

    svg.push_str("</svg>\n");
    svg
}

/// Read the daily wind and rainfall CSVs (either may be missing) and summarise the period
pub fn summarize_files(wind_csv: &Path, rainfall_csv: &Path) -> Result<PeriodSummary, LoadError> {
    let wind = read_wind_csv(wind_csv)?;
    let rain = read_rainfall_csv(rainfall_csv)?;
    Ok(PeriodSummary::from_series(&wind, &rain))
}

/// Monthly rainfall bars (left axis) with the monthly mean wind as a line (right axis).
/// Months without a wind mean break the line.
pub fn monthly_chart_svg(months: &[MonthlySummary], title: &str) -> String {
    let (width, height) = (1000.0, 360.0);
    let (left, right, top, bottom) = (70.0, 70.0, 40.0, 50.0);
    let plot_w = width - left - right;
    let plot_h = height - top - bottom;
    let base_y = top + plot_h;

    let max_rain = months
        .iter()
        .map(|m| m.rainfall_total_mm)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let max_wind = months
        .iter()
        .filter_map(|m| m.wind_mean)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let slot = plot_w / months.len().max(1) as f64;

    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="Arial">"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="24" font-size="16" text-anchor="middle" font-weight="bold">{}</text>"#,
        width / 2.0,
        xml_escape(title)
    );
    let _ = writeln!(
        svg,
        r##"<line x1="{left}" y1="{base_y}" x2="{:.1}" y2="{base_y}" stroke="#333"/>"##,
        width - right
    );
    let _ = writeln!(
        svg,
        r#"<text x="16" y="{:.1}" font-size="12" fill="{RAIN_COLOR}" transform="rotate(-90 16 {:.1})" text-anchor="middle">Monthly Rainfall (mm) max {max_rain:.0}</text>"#,
        top + plot_h / 2.0,
        top + plot_h / 2.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="12" fill="{WIND_COLOR}" transform="rotate(90 {:.1} {:.1})" text-anchor="middle">Mean Wind Speed (km/h) max {max_wind:.1}</text>"#,
        width - 16.0,
        top + plot_h / 2.0,
        width - 16.0,
        top + plot_h / 2.0
    );

    for (i, m) in months.iter().enumerate() {
        let x = left + i as f64 * slot;
        let h = m.rainfall_total_mm / max_rain * plot_h;
        let _ = writeln!(
            svg,
            r#"<rect x="{x:.1}" y="{:.1}" width="{:.1}" height="{h:.1}" fill="{RAIN_COLOR}" fill-opacity="0.6"/>"#,
            base_y - h,
            (slot * 0.8).max(0.5)
        );
        if m.month == 1 {
            let _ = writeln!(
                svg,
                r#"<text x="{x:.1}" y="{:.1}" font-size="11">{}</text>"#,
                base_y + 16.0,
                m.year
            );
        }
    }

    let mut segment: Vec<String> = Vec::new();
    for (i, m) in months.iter().enumerate() {
        match m.wind_mean {
            Some(v) => {
                let x = left + (i as f64 + 0.4) * slot;
                let y = base_y - v / max_wind * plot_h;
                segment.push(format!("{x:.1},{y:.1}"));
            }
            None => flush_segment(&mut svg, &mut segment),
        }
    }
    flush_segment(&mut svg, &mut segment);

    svg.push_str("</svg>\n");
    svg
}

fn flush_segment(svg: &mut String, segment: &mut Vec<String>) {
    if segment.is_empty() {
        return;
    }
    let _ = writeln!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{WIND_COLOR}" stroke-width="1.5"/>"#,
        segment.join(" ")
    );
    segment.clear();
}
