use crate::chart::layout::{Canvas, DrawPlan};
use std::fmt::Write;

const BULLISH: &str = "#26a69a";
const BEARISH: &str = "#ef5350";
const GRID: &str = "#2a2e39";
const LABEL: &str = "#9598a1";
const BACKGROUND: &str = "#131722";

pub fn render_svg(plan: &DrawPlan, canvas: &Canvas) -> String {
    let mut out = String::new();
    write_svg(&mut out, plan, canvas).expect("writing to a String");
    out
}

fn write_svg(out: &mut String, plan: &DrawPlan, canvas: &Canvas) -> std::fmt::Result {
    let (w, h) = (canvas.width, canvas.height);
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    )?;
    writeln!(out, r#"<rect width="{w}" height="{h}" fill="{BACKGROUND}"/>"#)?;

    let chart = match plan {
        DrawPlan::NoData => {
            writeln!(
                out,
                r#"<text x="{}" y="{}" fill="{LABEL}" font-size="14" text-anchor="middle">No chart data</text>"#,
                w / 2.0,
                h / 2.0
            )?;
            return writeln!(out, "</svg>");
        }
        DrawPlan::Chart(chart) => chart,
    };

    let right = chart.plot.x + chart.plot.width;
    for line in &chart.grid {
        writeln!(
            out,
            r#"<line class="grid" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{GRID}" stroke-width="1"/>"#,
            chart.plot.x, line.y, right, line.y
        )?;
        writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" fill="{LABEL}" font-size="11" dominant-baseline="middle">{}</text>"#,
            right + 6.0,
            line.y,
            line.label
        )?;
    }

    for glyph in &chart.candles {
        let color = if glyph.bullish { BULLISH } else { BEARISH };
        writeln!(
            out,
            r#"<line class="wick" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{color}" stroke-width="1"/>"#,
            glyph.x, glyph.wick_top, glyph.x, glyph.wick_bottom
        )?;
        writeln!(
            out,
            r#"<rect class="body" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{color}"/>"#,
            glyph.x - glyph.body_width / 2.0,
            glyph.body_top,
            glyph.body_width,
            glyph.body_height
        )?;
    }

    let baseline = chart.plot.bottom() + 18.0;
    for label in &chart.time_labels {
        writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" fill="{LABEL}" font-size="11" text-anchor="middle">{}</text>"#,
            label.x, baseline, label.label
        )?;
    }

    writeln!(out, "</svg>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::layout;
    use crate::data::Candle;

    #[test]
    fn no_data_placeholder() {
        let svg = render_svg(&DrawPlan::NoData, &Canvas::default());

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("No chart data"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn draws_one_body_and_wick_per_candle() {
        let candles = vec![
            Candle {
                time: 0,
                open: 10.0,
                high: 12.0,
                low: 9.0,
                close: 11.0,
            },
            Candle {
                time: 60_000,
                open: 11.0,
                high: 11.5,
                low: 8.0,
                close: 9.0,
            },
        ];
        let canvas = Canvas::default();
        let svg = render_svg(&layout(&candles, &canvas), &canvas);

        assert_eq!(svg.matches(r#"class="body""#).count(), 2);
        assert_eq!(svg.matches(r#"class="wick""#).count(), 2);
        assert_eq!(svg.matches(r#"class="grid""#).count(), canvas.ticks);
        assert!(svg.contains(BULLISH));
        assert!(svg.contains(BEARISH));
        assert!(svg.contains("12.00"));
    }
}
