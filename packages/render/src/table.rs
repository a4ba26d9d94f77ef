//! Summary table comparing the selected districts with the nation.

use accident_map_accident_models::YearFilter;
use accident_map_analytics::summary::summarize;
use accident_map_analytics_models::{GroupStats, SummaryComparison};
use accident_map_database::Dataset;
use accident_map_selection::SelectionState;
use serde::{Deserialize, Serialize};

/// Shown instead of the table while nothing is selected.
pub const EMPTY_SELECTION_MESSAGE: &str =
    "No districts are currently selected. Use the lasso tool to select districts";

/// Default heading of the national column.
pub const DEFAULT_NATION_LABEL: &str = "England";

const UNDEFINED: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Either the table or the empty-selection message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SummaryView {
    Table(SummaryTable),
    Message { text: String },
}

/// Renders the summary for the current selection and year.
#[must_use]
pub fn render_summary(
    dataset: &Dataset,
    selection: &SelectionState,
    year: YearFilter,
    nation_label: &str,
) -> SummaryView {
    selection.as_set().map_or_else(
        || SummaryView::Message {
            text: EMPTY_SELECTION_MESSAGE.to_string(),
        },
        |names| SummaryView::Table(summary_table(&summarize(dataset, names, year), nation_label)),
    )
}

/// Formats the summary numbers into rows.
#[must_use]
pub fn summary_table(summary: &SummaryComparison, nation_label: &str) -> SummaryTable {
    let selected = &summary.selection;
    let nation = &summary.nation;

    let row = |label: &str, format: fn(&GroupStats) -> String| {
        vec![label.to_string(), format(selected), format(nation)]
    };

    SummaryTable {
        header: vec![
            String::new(),
            "Selected districts".to_string(),
            nation_label.to_string(),
        ],
        rows: vec![
            vec![
                "Number of accidents".to_string(),
                format!(
                    "{} ({})",
                    selected.accident_count,
                    percent(summary.selection_share)
                ),
                nation.accident_count.to_string(),
            ],
            row("Male driving during accident", |s| percent(s.percentage_male)),
            row("Female driving during accident", |s| {
                percent(s.percentage_female)
            }),
            row("Average age of driver in accident", |s| {
                decimal(s.mean_driver_age)
            }),
            row("Average age of car in accident", |s| {
                decimal(s.mean_vehicle_age)
            }),
        ],
    }
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.2}%"))
}

fn decimal(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.2}"))
}

#[cfg(test)]
mod tests {
    use accident_map_accident_models::{AccidentRecord, Severity, SexOfDriver};

    use super::*;
    use crate::fixtures::{dataset, record};

    fn leeds() -> SelectionState {
        SelectionState::from_names(["Leeds".to_string()].into())
    }

    fn table(view: SummaryView) -> SummaryTable {
        match view {
            SummaryView::Table(table) => table,
            SummaryView::Message { text } => panic!("expected table, got message {text}"),
        }
    }

    #[test]
    fn empty_selection_shows_message() {
        let dataset = dataset(Vec::new());
        for state in [SelectionState::Pristine, SelectionState::Cleared] {
            assert_eq!(
                render_summary(&dataset, &state, YearFilter::Sum, DEFAULT_NATION_LABEL),
                SummaryView::Message {
                    text: EMPTY_SELECTION_MESSAGE.to_string()
                }
            );
        }
    }

    #[test]
    fn hundred_leeds_accidents_forty_percent_male() {
        let records: Vec<AccidentRecord> = (0..100)
            .map(|i| {
                let mut r = record("Leeds", 2018, Severity::Light);
                r.sex_of_driver = Some(if i < 40 {
                    SexOfDriver::Male
                } else {
                    SexOfDriver::Female
                });
                r
            })
            .collect();
        let dataset = dataset(records);

        let table = table(render_summary(
            &dataset,
            &leeds(),
            YearFilter::Year(2018),
            DEFAULT_NATION_LABEL,
        ));

        assert_eq!(table.header, vec!["", "Selected districts", "England"]);
        assert_eq!(table.rows[0], vec!["Number of accidents", "100 (100.00%)", "100"]);
        assert_eq!(table.rows[1], vec!["Male driving during accident", "40.00%", "40.00%"]);
        assert_eq!(table.rows[2][1], "60.00%");
        assert_eq!(table.rows[3], vec!["Average age of driver in accident", "30.00", "30.00"]);
        assert_eq!(table.rows.len(), 5);
    }

    #[test]
    fn undefined_statistics_render_as_na() {
        let dataset = dataset(vec![record("York", 2018, Severity::Light)]);
        let table = table(render_summary(&dataset, &leeds(), YearFilter::Year(2018), "Nation"));
        assert_eq!(table.header[2], "Nation");
        assert_eq!(table.rows[0][1], "0 (0.00%)");
        assert_eq!(table.rows[1][1], UNDEFINED);
        assert_eq!(table.rows[4][1], UNDEFINED);
        assert_eq!(table.rows[4][2], "5.00");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(SummaryView::Message {
            text: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "message");
    }
}
