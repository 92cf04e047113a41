pub mod layout;
pub mod svg;

pub use layout::{layout, Canvas, DrawPlan};
pub use svg::render_svg;

/// Fewer decimals for large prices, more for sub-dollar coins.
pub fn format_price(price: f64) -> String {
    let magnitude = price.abs();
    if magnitude >= 1000.0 {
        format!("{:.0}", price)
    } else if magnitude >= 1.0 {
        format!("{:.2}", price)
    } else {
        format!("{:.6}", price)
    }
}
