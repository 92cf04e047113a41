use serde::{Deserialize, Serialize};

/// Multipliers applied to the latest price. Each one is expected to sit within
/// one percent of 1.0.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BandFactors {
    pub aggressive_buy: f64,
    pub conservative_buy: f64,
    pub take_profit: f64,
    pub hard_stop: f64,
}

impl Default for BandFactors {
    fn default() -> Self {
        BandFactors {
            aggressive_buy: 0.998,
            conservative_buy: 0.995,
            take_profit: 1.004,
            hard_stop: 0.992,
        }
    }
}

impl BandFactors {
    pub const MAX_DEVIATION: f64 = 0.01;

    pub fn validate(&self) -> Result<(), String> {
        let factors = [
            ("aggressive_buy", self.aggressive_buy),
            ("conservative_buy", self.conservative_buy),
            ("take_profit", self.take_profit),
            ("hard_stop", self.hard_stop),
        ];

        for (name, factor) in factors {
            if !factor.is_finite() || (factor - 1.0).abs() > Self::MAX_DEVIATION + 1e-12 {
                return Err(format!("{} factor {} is out of range", name, factor));
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bands {
    pub aggressive_buy: f64,
    pub conservative_buy: f64,
    pub take_profit: f64,
    pub hard_stop: f64,
}

/// `None` until a price is known, so "not computed" never reads as zero.
pub fn bands(price: Option<f64>, factors: &BandFactors) -> Option<Bands> {
    let price = price?;
    Some(Bands {
        aggressive_buy: price * factors.aggressive_buy,
        conservative_buy: price * factors.conservative_buy,
        take_profit: price * factors.take_profit,
        hard_stop: price * factors.hard_stop,
    })
}
