use crate::chart::format_price;
use crate::data::Candle;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    /// Number of horizontal grid lines, both price extremes included.
    pub ticks: usize,
    pub min_body_height: f64,
    /// Body width as a fraction of the candle slot.
    pub body_ratio: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            width: 640.0,
            height: 320.0,
            margins: Margins {
                top: 16.0,
                right: 72.0,
                bottom: 28.0,
                left: 12.0,
            },
            ticks: 4,
            min_body_height: 1.0,
            body_ratio: 0.6,
        }
    }
}

impl Canvas {
    pub const TICK_RANGE: std::ops::RangeInclusive<usize> = 2..=20;

    pub fn validate(&self) -> Result<(), String> {
        let m = &self.margins;
        if !self.width.is_finite() || self.width <= m.left + m.right {
            return Err(format!("width {} leaves no room for the plot", self.width));
        }
        if !self.height.is_finite() || self.height <= m.top + m.bottom {
            return Err(format!("height {} leaves no room for the plot", self.height));
        }
        if !Self::TICK_RANGE.contains(&self.ticks) {
            return Err(format!(
                "{} grid ticks is outside {}..={}",
                self.ticks,
                Self::TICK_RANGE.start(),
                Self::TICK_RANGE.end()
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GridLine {
    pub y: f64,
    pub price: f64,
    pub label: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimeLabel {
    pub x: f64,
    pub label: String,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct CandleGlyph {
    /// Slot center.
    pub x: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub body_top: f64,
    pub body_height: f64,
    pub body_width: f64,
    pub bullish: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub min_price: f64,
    pub max_price: f64,
    pub span: f64,
    pub slot_width: f64,
    pub plot: Rect,
    pub grid: Vec<GridLine>,
    pub candles: Vec<CandleGlyph>,
    pub time_labels: Vec<TimeLabel>,
}

impl ChartPlan {
    /// Screen y of `price`; `max_price` maps to the top of the plot.
    pub fn y_for(&self, price: f64) -> f64 {
        self.plot.y + (self.max_price - price) / self.span * self.plot.height
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DrawPlan {
    NoData,
    Chart(ChartPlan),
}

pub fn layout(candles: &[Candle], canvas: &Canvas) -> DrawPlan {
    if candles.is_empty() {
        return DrawPlan::NoData;
    }

    let m = &canvas.margins;
    let plot = Rect {
        x: m.left,
        y: m.top,
        width: (canvas.width - m.left - m.right).max(0.0),
        height: (canvas.height - m.top - m.bottom).max(0.0),
    };

    let min_price = candles.iter().fold(f64::INFINITY, |min, c| min.min(c.low));
    let max_price = candles.iter().fold(f64::NEG_INFINITY, |max, c| max.max(c.high));
    let span = if max_price - min_price > 0.0 {
        max_price - min_price
    } else {
        1.0
    };

    let mut plan = ChartPlan {
        min_price,
        max_price,
        span,
        slot_width: plot.width / candles.len() as f64,
        plot,
        grid: Vec::with_capacity(canvas.ticks),
        candles: Vec::with_capacity(candles.len()),
        time_labels: vec![],
    };

    for i in 0..canvas.ticks {
        let step = if canvas.ticks > 1 {
            i as f64 / (canvas.ticks - 1) as f64
        } else {
            0.0
        };
        let price = max_price - span * step;
        plan.grid.push(GridLine {
            y: plan.y_for(price),
            price,
            label: format_price(price),
        });
    }

    let body_width = (plan.slot_width * canvas.body_ratio).max(1.0);
    for (i, candle) in candles.iter().enumerate() {
        let x = plot.x + plan.slot_width * (i as f64 + 0.5);
        let y_open = plan.y_for(candle.open);
        let y_close = plan.y_for(candle.close);

        let body_height = (y_open - y_close).abs().max(canvas.min_body_height);
        let mut body_top = y_open.min(y_close);
        // Keep floored bodies inside the plot.
        if body_top + body_height > plot.bottom() {
            body_top = (plot.bottom() - body_height).max(plot.y);
        }

        plan.candles.push(CandleGlyph {
            x,
            wick_top: plan.y_for(candle.high),
            wick_bottom: plan.y_for(candle.low),
            body_top,
            body_height,
            body_width,
            bullish: candle.is_bullish(),
        });
    }

    let mut label_at = vec![0, candles.len() / 2, candles.len() - 1];
    label_at.dedup();
    for i in label_at {
        if let Some(time) = DateTime::from_timestamp_millis(candles[i].time) {
            plan.time_labels.push(TimeLabel {
                x: plan.candles[i].x,
                label: time.format("%H:%M").to_string(),
            });
        }
    }

    DrawPlan::Chart(plan)
}
