//! Payment breakdown: each payment type's share of the filtered trips.

use super::{ChartInput, ChartPanel};
use crate::batches::i64_values;
use crate::columns::PAYMENT_TYPE;
use crate::exceptions::DashboardResult;
use crate::filter::payment_label;
use async_trait::async_trait;
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentShare {
    pub code: i64,
    pub label: String,
    pub trips: u64,
    /// Share of all filtered trips, 0–100.
    pub percentage: f64,
}

/// Shares ordered by trip count, largest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PaymentBreakdown {
    pub shares: Vec<PaymentShare>,
}

impl PaymentBreakdown {
    /// Sum of all percentages; 100 for any non-empty view.
    pub fn total_percentage(&self) -> f64 {
        self.shares.iter().map(|s| s.percentage).sum()
    }

    pub fn share_of(&self, code: i64) -> Option<&PaymentShare> {
        self.shares.iter().find(|s| s.code == code)
    }
}

pub struct PaymentBreakdownPanel;

#[async_trait]
impl ChartPanel for PaymentBreakdownPanel {
    type Data = PaymentBreakdown;

    fn title(&self) -> &'static str {
        "Payment Type Breakdown"
    }

    fn insight(&self) -> &'static str {
        "Credit cards account for ~75-80% of trips, highlighting the rapid shift to cashless payments in NYC taxis during this period."
    }

    async fn compute(&self, input: &ChartInput) -> DashboardResult<PaymentBreakdown> {
        let batches = input
            .view
            .clone()
            .aggregate(vec![col(PAYMENT_TYPE)], vec![count(lit(1)).alias("trips")])?
            .collect()
            .await?;

        let codes = i64_values(&batches, PAYMENT_TYPE)?;
        let trips = i64_values(&batches, "trips")?;
        let mut counts: Vec<(i64, u64)> = codes
            .into_iter()
            .zip(trips)
            .filter_map(|(code, trips)| Some((code?, trips?.max(0) as u64)))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let total: u64 = counts.iter().map(|(_, n)| n).sum();
        let shares = counts
            .into_iter()
            .map(|(code, trips)| PaymentShare {
                code,
                label: payment_label(code),
                trips,
                percentage: if total == 0 {
                    0.0
                } else {
                    trips as f64 / total as f64 * 100.0
                },
            })
            .collect();
        Ok(PaymentBreakdown { shares })
    }
}
