//! The spending by tag chart on the reports page.
//!
//! Charts are built as ECharts options with `charming` and initialised by a small inline script.

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::html::HeadElement;

/// The URL of the ECharts library.
pub(super) const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// A pie chart of the user's own spending per tag.
pub(super) fn spending_by_tag_chart(totals: &BTreeMap<String, f64>) -> Chart {
    let data: Vec<(f64, String)> = totals
        .iter()
        .map(|(tag, total)| ((total * 100.0).round() / 100.0, tag.clone()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by tag").left("center"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("0"))
        .series(Pie::new().name("Spending").radius("65%").data(data))
}

/// Render the container for `chart`, or a message when there is nothing to plot.
pub(super) fn chart_view(chart: &ReportChart, is_empty: bool) -> Markup {
    html! {
        @if is_empty {
            p class="text-gray-500 dark:text-gray-400" { "No expenses to chart yet." }
        } @else {
            div id=(chart.id) class="min-h-[380px] w-full rounded dark:bg-gray-100" {}
        }
    }
}

/// JavaScript that initialises `chart` once the page has loaded.
pub(super) fn chart_script(chart: &ReportChart) -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{}");
            if (!chartDom) {{ return; }}
            const chart = echarts.init(chartDom);
            chart.setOption({});
            window.addEventListener('resize', chart.resize);
        }});"#,
        chart.id, chart.options
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::spending_by_tag_chart;

    #[test]
    fn chart_has_a_slice_per_tag() {
        let totals = BTreeMap::from([("food".to_owned(), 12.346), ("transport".to_owned(), 5.0)]);

        let options: serde_json::Value =
            serde_json::from_str(&spending_by_tag_chart(&totals).to_string()).unwrap();

        let data = options["series"][0]["data"]
            .as_array()
            .expect("want pie data");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "food");
        assert_eq!(data[0]["value"], 12.35);
        assert_eq!(data[1]["name"], "transport");
    }
}
