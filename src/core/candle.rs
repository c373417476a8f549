use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// One OHLC candle. Its position in the series is its logical x index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    /// Unix time in seconds.
    pub time: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcBar {
    /// Builds a validated candle.
    ///
    /// Invariants:
    /// - all values are finite
    /// - `low <= high`
    /// - `open` and `close` are within `[low, high]`
    pub fn new(time: f64, open: f64, high: f64, low: f64, close: f64) -> ChartResult<Self> {
        if [time, open, high, low, close].iter().any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidData(
                "ohlc values must be finite".to_owned(),
            ));
        }
        if low > high {
            return Err(ChartError::InvalidData(
                "ohlc low must be <= high".to_owned(),
            ));
        }
        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "ohlc open/close must be within low/high range".to_owned(),
            ));
        }

        Ok(Self {
            time,
            open,
            high,
            low,
            close,
        })
    }

    /// Converts exchange-style decimal prices and a UTC timestamp.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            time.timestamp_millis() as f64 / 1000.0,
            price_to_f64(open, "open")?,
            price_to_f64(high, "high")?,
            price_to_f64(low, "low")?,
            price_to_f64(close, "close")?,
        )
    }

    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }

    /// Midpoint of the candle's range.
    #[must_use]
    pub fn average_price(self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

fn price_to_f64(value: Decimal, field: &str) -> ChartResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| ChartError::InvalidData(format!("{field} cannot be represented as f64")))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::OhlcBar;

    #[test]
    fn decimal_candle_converts_time_and_prices() {
        let time = Utc.with_ymd_and_hms(2021, 2, 3, 0, 0, 0).single().expect("time");
        let bar = OhlcBar::from_decimal_time(
            time,
            Decimal::new(1010, 1),
            Decimal::new(1055, 1),
            Decimal::new(995, 1),
            Decimal::new(1050, 1),
        )
        .expect("bar");

        assert_eq!(bar.time, 1_612_310_400.0);
        assert_eq!(bar.high, 105.5);
        assert!(bar.is_bullish());
        assert_eq!(bar.average_price(), 102.5);
    }

    #[test]
    fn inconsistent_candle_is_rejected() {
        assert!(OhlcBar::new(0.0, 10.0, 9.0, 11.0, 10.0).is_err());
        assert!(OhlcBar::new(0.0, 12.0, 11.0, 9.0, 10.0).is_err());
        assert!(OhlcBar::new(f64::NAN, 10.0, 11.0, 9.0, 10.0).is_err());
    }
}
