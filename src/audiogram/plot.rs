use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use log::warn;
use plotters::prelude::*;
use crate::audiogram::error::AudiogramError;
use crate::audiogram::frequency::EarChannel;
use crate::audiogram::report::AudiogramReport;
/// Largest image edge accepted by the renderer, in pixels.
pub const MAX_IMAGE_EDGE: u32 = 8192;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub left: RGBColor,
    pub right: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            background: WHITE,
            foreground: BLACK,
            left: RED,
            right: BLUE,
        }
    }
}
impl PlotStyle {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
    fn ear_color(&self, channel: EarChannel) -> RGBColor {
        match channel {
            EarChannel::Left => self.left,
            EarChannel::Right => self.right,
        }
    }
}
/// Renders the audiogram with inverted level axis and log frequency axis.
///
/// Levels are drawn negated so the chart's natural upward axis reads
/// -20 dB at the top and 160 dB at the bottom.
pub fn render_audiogram_png(
    report: &AudiogramReport,
    style: &PlotStyle,
) -> Result<Vec<u8>, AudiogramError> {
    if report.audiogram.is_empty() {
        return Err(AudiogramError::Plot(format!(
            "{} has no points to plot",
            report.file_name
        )));
    }
    let axes = report.audiogram.axes();
    let mut buffer = vec![0u8; rgb_buffer_len(style.width, style.height)?];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let fg = style.foreground;
        for (idx, line) in report.title().lines().enumerate() {
            let size = if idx == 0 { 18 } else { 13 };
            root.draw(&Text::new(
                line.to_owned(),
                (15, 8 + idx as i32 * 22),
                ("sans-serif", size).into_font().color(&fg),
            ))?;
        }
        let y_low = -axes.y_bottom_db;
        let y_high = -axes.y_top_db;
        let mut chart = ChartBuilder::on(&root)
            .margin(15)
            .margin_top(55)
            .set_label_area_size(LabelAreaPosition::Left, 55)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d((axes.x_min_hz..axes.x_max_hz).log_scale(), y_low..y_high)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_labels(axes.y_ticks().len())
            .y_label_formatter(&|v| format!("{:.0}", -v))
            .y_desc(axes.y_label)
            .x_desc("Frequency (Hz)")
            .light_line_style(&fg.mix(0.08))
            .bold_line_style(&fg.mix(0.25))
            .draw()?;
        for hz in axes.x_ticks_hz {
            let x = hz as f64;
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(x, y_low), (x, y_high)],
                &fg.mix(0.25),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                hz.to_string(),
                (x, y_low + 6.0),
                ("sans-serif", 12).into_font().color(&fg),
            )))?;
        }
        for channel in EarChannel::BOTH {
            let points: Vec<(f64, f64)> = report
                .audiogram
                .points(channel)
                .iter()
                .map(|p| {
                    if !axes.contains_level(p.level_db) {
                        warn!("[Plot] {channel} {} at {:.1} dB is outside the chart", p.frequency, p.level_db);
                    }
                    (p.frequency.hz() as f64, -p.level_db.clamp(axes.y_top_db, axes.y_bottom_db))
                })
                .collect();
            if points.is_empty() {
                continue;
            }
            let color = style.ear_color(channel);
            let label = match channel {
                EarChannel::Left => "Left Ear",
                EarChannel::Right => "Right Ear",
            };
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            match channel {
                EarChannel::Left => {
                    chart.draw_series(points.iter().map(|&p| Circle::new(p, 5, color.filled())))?;
                }
                EarChannel::Right => {
                    chart.draw_series(points.iter().map(|&p| Cross::new(p, 5, color.stroke_width(2))))?;
                }
            }
            let offset = match channel {
                EarChannel::Left => -3.0,
                EarChannel::Right => 7.0,
            };
            chart.draw_series(points.iter().map(|&(x, y)| {
                Text::new(
                    format!("{:.1}", -y),
                    (x, y + offset),
                    ("sans-serif", 11).into_font().color(&color),
                )
            }))?;
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(&fg.mix(0.3))
            .background_style(&style.background.mix(0.9))
            .draw()?;
        let pta = format!(
            "PTA Left: {}   PTA Right: {}",
            report.pta_text(EarChannel::Left, 1),
            report.pta_text(EarChannel::Right, 1)
        );
        root.draw(&Text::new(
            pta,
            (80, style.height as i32 - 70),
            ("sans-serif", 13).into_font().color(&fg),
        ))?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn rgb_buffer_len(width: u32, height: u32) -> Result<usize, AudiogramError> {
    if width == 0 || height == 0 || width > MAX_IMAGE_EDGE || height > MAX_IMAGE_EDGE {
        return Err(AudiogramError::Plot(format!(
            "image size {width}x{height} outside 1..={MAX_IMAGE_EDGE} pixels"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| AudiogramError::Plot(format!("image size {width}x{height} is too large")))
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, AudiogramError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| AudiogramError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::audiogram::pipeline::AudiogramPipeline;
    use crate::audiogram::source::MemorySource;
    use crate::audiogram::frequency::SourceFormat;
    fn report(text: &str) -> Result<AudiogramReport, AudiogramError> {
        let mut source = MemorySource::new("pyco.txt", text);
        AudiogramPipeline::new(None).load(SourceFormat::Pychoacoustics, &mut source)
    }
    #[test]
    fn renders_png() {
        let r = report(
            "Ear: Left\nFrequency (Hz): 500\nturnpointMean = 23.5\nEar: Right\nFrequency (Hz): 8000\nturnpointMean = 60\n",
        )
        .unwrap();
        let png = render_audiogram_png(&r, &PlotStyle::with_size(400, 300)).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }
    #[test]
    fn empty_audiogram_is_not_plotted() {
        let r = report("Ear: Left\nFrequency (Hz): 750\nturnpointMean = 23.5\n").unwrap();
        assert!(r.audiogram.is_empty());
        let err = render_audiogram_png(&r, &PlotStyle::default()).unwrap_err();
        assert_eq!(err.kind(), "PlotError");
    }
    #[test]
    fn oversized_image_is_an_error() {
        let r = report("Ear: Left\nFrequency (Hz): 500\nturnpointMean = 23.5\n").unwrap();
        let err = render_audiogram_png(&r, &PlotStyle::with_size(70_000, 70_000)).unwrap_err();
        assert_eq!(err.kind(), "PlotError");
        let err = render_audiogram_png(&r, &PlotStyle::with_size(0, 300)).unwrap_err();
        assert_eq!(err.kind(), "PlotError");
        assert_eq!(rgb_buffer_len(400, 300).unwrap(), 360_000);
    }
}
