//! Clicks-over-time chart rendering (PNG and PDF)

use adreport_core::PerformanceRecord;
use chrono::{Duration, Local, NaiveDate};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CHART_PNG: &str = "ad_report_chart.png";
pub const CHART_PDF: &str = "ad_report_chart.pdf";

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;

/// Render one line per campaign with the anomaly threshold as a dashed
/// reference line. Writes the raster chart and a one-page PDF carrying the
/// same figure, both at fixed names under `out_dir`.
pub fn render(
    records: &[PerformanceRecord],
    threshold: f64,
    out_dir: &Path,
) -> Result<(PathBuf, PathBuf), Box<dyn Error>> {
    let png_path = out_dir.join(CHART_PNG);
    let pdf_path = out_dir.join(CHART_PDF);

    draw_png(records, threshold, &png_path)?;
    embed_pdf(&png_path, &pdf_path)?;

    info!(png = %png_path.display(), pdf = %pdf_path.display(), "chart saved");
    Ok((png_path, pdf_path))
}

fn draw_png(
    records: &[PerformanceRecord],
    threshold: f64,
    png_path: &Path,
) -> Result<(), Box<dyn Error>> {
    // one series per campaign, points in date order so the line is meaningful
    let mut series: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for record in records {
        series
            .entry(record.campaign_name.as_str())
            .or_default()
            .push((record.date, f64::from(record.clicks)));
    }
    for points in series.values_mut() {
        points.sort_by_key(|(date, _)| *date);
    }

    let (min_date, max_date) = date_range(records);
    let max_clicks = records
        .iter()
        .map(|r| f64::from(r.clicks))
        .fold(0.0, f64::max);
    let y_max = (max_clicks.max(threshold) * 1.15).max(1.0);

    let root = BitMapBackend::new(png_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Ad Performance - Clicks Over Time", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(min_date..max_date, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Clicks")
        .x_label_formatter(&|d| d.format("%Y-%m-%d").to_string())
        .draw()?;

    for (idx, (campaign, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(*campaign)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2)));
        chart.draw_series(
            points
                .iter()
                .map(|(date, clicks)| Circle::new((*date, *clicks), 3, Palette99::pick(idx).filled())),
        )?;
    }

    chart
        .draw_series(DashedLineSeries::new(
            [(min_date, threshold), (max_date, threshold)],
            6,
            4,
            RED.stroke_width(2),
        ))?
        .label("Anomaly Threshold")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

// same figure on a single A4 landscape page
fn embed_pdf(png_path: &Path, pdf_path: &Path) -> Result<(), Box<dyn Error>> {
    let (doc, page, layer) =
        PdfDocument::new("Ad Performance Report", Mm(297.0), Mm(210.0), "chart");

    let mut png_file = File::open(png_path)?;
    let image = Image::try_from(PngDecoder::new(&mut png_file)?)?;

    // 1000x600 px at 150 dpi is 169x102 mm, centered on the page
    let transform = ImageTransform {
        translate_x: Some(Mm(64.0)),
        translate_y: Some(Mm(54.0)),
        dpi: Some(150.0),
        ..Default::default()
    };
    image.add_to_layer(doc.get_page(page).get_layer(layer), transform);

    doc.save(&mut BufWriter::new(File::create(pdf_path)?))?;
    Ok(())
}

// x-axis bounds, widened so a single-day batch still has a non-empty range
fn date_range(records: &[PerformanceRecord]) -> (NaiveDate, NaiveDate) {
    let min = records.iter().map(|r| r.date).min();
    let max = records.iter().map(|r| r.date).max();
    match (min, max) {
        (Some(a), Some(b)) if a < b => (a, b),
        (Some(a), _) => (a - Duration::days(1), a + Duration::days(1)),
        _ => {
            let today = Local::now().date_naive();
            (today - Duration::days(7), today)
        }
    }
}
