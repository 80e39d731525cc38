//! The dashboard page, rendered with an `askama` template.

use crate::dashboard::{DashboardView, DESCRIPTION, TABS, TITLE};
use crate::dataset::TripDataset;
use crate::exceptions::DashboardResult;
use crate::filter::{PaymentType, MAX_HOUR};
use crate::metrics::MetricCard;
use crate::render::svg::render_chart;
use crate::settings::ChartSettings;
use askama::Template;

pub struct HourOption {
    pub hour: u32,
    pub is_start: bool,
    pub is_end: bool,
}

pub struct PaymentOption {
    pub code: i64,
    pub label: &'static str,
    pub checked: bool,
}

pub struct ChartPanelView {
    pub title: &'static str,
    pub svg: String,
    pub insight: &'static str,
}

pub struct TabView {
    pub id: usize,
    pub title: &'static str,
    pub panels: Vec<ChartPanelView>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub title: &'static str,
    pub description: &'static str,
    pub min_date: String,
    pub max_date: String,
    pub start_date: String,
    pub end_date: String,
    pub hours: Vec<HourOption>,
    pub payments: Vec<PaymentOption>,
    pub cards: Vec<MetricCard>,
    pub tabs: Vec<TabView>,
}

impl DashboardPage {
    /// Assembles the page for `view`, drawing every chart.
    pub fn build(
        view: &DashboardView,
        dataset: &TripDataset,
        charts: ChartSettings,
    ) -> DashboardResult<Self> {
        let selection = &view.selection;
        let (min_date, max_date) = dataset
            .date_bounds()
            .map(|b| (b.min.to_string(), b.max.to_string()))
            .unwrap_or_default();

        let hours = (0..=MAX_HOUR)
            .map(|hour| HourOption {
                hour,
                is_start: hour == selection.start_hour,
                is_end: hour == selection.end_hour,
            })
            .collect();
        let payments = PaymentType::ALL
            .iter()
            .map(|p| PaymentOption {
                code: p.code(),
                label: p.label(),
                checked: selection.payment_types.contains(&p.code()),
            })
            .collect();

        let mut tabs = Vec::with_capacity(TABS.len());
        for (id, tab) in TABS.iter().enumerate() {
            let mut panels = Vec::with_capacity(tab.charts.len());
            for kind in tab.charts {
                panels.push(ChartPanelView {
                    title: kind.title(),
                    svg: render_chart(kind, view, charts)?,
                    insight: kind.insight(),
                });
            }
            tabs.push(TabView {
                id,
                title: tab.title,
                panels,
            });
        }

        Ok(Self {
            title: TITLE,
            description: DESCRIPTION,
            min_date,
            max_date,
            start_date: selection.start_date.to_string(),
            end_date: selection.end_date.to_string(),
            hours,
            payments,
            cards: view.metrics.cards(),
            tabs,
        })
    }
}

/// Renders the complete HTML page for `view`.
pub fn render_page(
    view: &DashboardView,
    dataset: &TripDataset,
    charts: ChartSettings,
) -> DashboardResult<String> {
    Ok(DashboardPage::build(view, dataset, charts)?.render()?)
}
