//! Growing degree day computation.

use crate::types::reading::{DailyAggregate, GddRecord};

/// Base temperature (°C) below which no growth is accumulated. Standard for
/// most field crops; override per call for other cultures.
pub const DEFAULT_BASE_TEMP: f64 = 10.0;

/// Computes daily and cumulative growing degree days over date-ordered
/// aggregates.
///
/// Per row, `gdd_day = max(0, (temp_min + temp_max) / 2 - base_temp)`; the
/// cumulative value is the running sum of all defined daily values. A date
/// missing either temperature extreme gets `None` for both GDD fields and
/// does not advance the running sum.
///
/// The function is pure: the same input slice and base temperature always
/// produce bit-identical output, and no rounding is applied here. Display
/// rounding is the presentation layer's concern.
pub fn compute_gdd(aggregates: &[DailyAggregate], base_temp: f64) -> Vec<GddRecord> {
    let mut cumulative = 0.0;
    aggregates
        .iter()
        .map(|aggregate| {
            let gdd_day = match (aggregate.temp_min, aggregate.temp_max) {
                (Some(min), Some(max)) => Some(((min + max) / 2.0 - base_temp).max(0.0)),
                _ => None,
            };
            let gdd_cumulative = gdd_day.map(|day| {
                cumulative += day;
                cumulative
            });
            GddRecord {
                date: aggregate.date,
                temp_min: aggregate.temp_min,
                temp_max: aggregate.temp_max,
                humidity_mean: aggregate.humidity_mean,
                gdd_day,
                gdd_cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn aggregate(day: u32, temp_min: Option<f64>, temp_max: Option<f64>) -> DailyAggregate {
        DailyAggregate {
            date: NaiveDate::from_ymd_opt(2023, 7, day).unwrap(),
            temp_min,
            temp_max,
            humidity_mean: Some(60.0),
        }
    }

    #[test]
    fn accumulates_over_the_month() {
        let records = compute_gdd(
            &[
                aggregate(1, Some(10.0), Some(20.0)),
                aggregate(2, Some(12.0), Some(18.0)),
            ],
            10.0,
        );

        assert_eq!(records[0].gdd_day, Some(5.0));
        assert_eq!(records[1].gdd_day, Some(5.0));
        assert_eq!(records[0].gdd_cumulative, Some(5.0));
        assert_eq!(records[1].gdd_cumulative, Some(10.0));
    }

    #[test]
    fn cold_days_clamp_to_zero() {
        let records = compute_gdd(&[aggregate(1, Some(-5.0), Some(5.0))], 10.0);
        assert_eq!(records[0].gdd_day, Some(0.0));
        assert_eq!(records[0].gdd_cumulative, Some(0.0));
    }

    #[test]
    fn gdd_is_never_negative_and_cumulative_never_decreases() {
        let records = compute_gdd(
            &[
                aggregate(1, Some(-10.0), Some(-2.0)),
                aggregate(2, Some(15.0), Some(25.0)),
                aggregate(3, Some(0.0), Some(4.0)),
                aggregate(4, Some(18.0), Some(30.0)),
            ],
            10.0,
        );

        let mut previous = 0.0;
        for record in &records {
            assert!(record.gdd_day.unwrap() >= 0.0);
            let cumulative = record.gdd_cumulative.unwrap();
            assert!(cumulative >= previous);
            previous = cumulative;
        }
    }

    #[test]
    fn missing_extremes_yield_undefined_gdd_without_breaking_the_sum() {
        let records = compute_gdd(
            &[
                aggregate(1, Some(10.0), Some(20.0)),
                aggregate(2, None, Some(18.0)),
                aggregate(3, Some(12.0), Some(18.0)),
            ],
            10.0,
        );

        assert_eq!(records[1].gdd_day, None);
        assert_eq!(records[1].gdd_cumulative, None);
        assert_eq!(records[2].gdd_cumulative, Some(10.0));
    }

    #[test]
    fn custom_base_temperature_shifts_the_result() {
        let records = compute_gdd(&[aggregate(1, Some(10.0), Some(20.0))], 5.0);
        assert_eq!(records[0].gdd_day, Some(10.0));
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let aggregates = vec![
            aggregate(1, Some(10.3), Some(21.7)),
            aggregate(2, Some(9.9), Some(17.2)),
            aggregate(3, Some(13.4), Some(26.1)),
        ];
        assert_eq!(
            compute_gdd(&aggregates, 10.0),
            compute_gdd(&aggregates, 10.0)
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(compute_gdd(&[], 10.0).is_empty());
    }
}
