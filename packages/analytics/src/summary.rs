//! Summary statistics for the selection versus the nation.

use std::collections::BTreeSet;

use accident_map_accident_models::{AccidentRecord, SexOfDriver, YearFilter};
use accident_map_analytics_models::{GroupStats, SummaryComparison};
use accident_map_database::Dataset;

/// Computes the summary table numbers for the selected districts and for
/// the whole nation, both restricted to `year`.
#[must_use]
pub fn summarize(
    dataset: &Dataset,
    selection: &BTreeSet<String>,
    year: YearFilter,
) -> SummaryComparison {
    let selected = group_stats(
        dataset
            .records_in(year)
            .filter(|r| selection.contains(&r.district_name)),
    );
    let nation = group_stats(dataset.records_in(year));
    let selection_share = percentage(selected.accident_count, nation.accident_count);

    SummaryComparison {
        year,
        selection: selected,
        nation,
        selection_share,
    }
}

/// Computes [`GroupStats`] over a group of records.
#[must_use]
pub fn group_stats<'a>(records: impl Iterator<Item = &'a AccidentRecord>) -> GroupStats {
    let mut accident_count = 0u64;
    let mut male_count = 0u64;
    let mut female_count = 0u64;
    let mut driver_age = Mean::default();
    let mut vehicle_age = Mean::default();

    for record in records {
        accident_count += 1;
        match record.sex_of_driver {
            Some(SexOfDriver::Male) => male_count += 1,
            Some(SexOfDriver::Female) => female_count += 1,
            Some(SexOfDriver::Unknown) | None => {}
        }
        if let Some(age) = record.age_of_driver {
            driver_age.push(age);
        }
        if let Some(age) = record.age_of_vehicle {
            vehicle_age.push(age);
        }
    }

    GroupStats {
        accident_count,
        male_count,
        female_count,
        percentage_male: percentage(male_count, accident_count),
        percentage_female: percentage(female_count, accident_count),
        mean_driver_age: driver_age.value(),
        mean_vehicle_age: vehicle_age.value(),
    }
}

/// `part / (total / 100)`, or `None` when `total` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| part as f64 / (total as f64 / 100.0))
}

#[derive(Default)]
struct Mean {
    sum: u64,
    count: u64,
}

impl Mean {
    fn push(&mut self, value: u16) {
        self.sum += u64::from(value);
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}
