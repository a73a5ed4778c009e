//! Summary figures over quotation history.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Quotation;

pub const TOP_CLIENTS: usize = 5;
pub const RECENT_ACTIVITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub name: String,
    pub count: usize,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_quotations: usize,
    /// Sum of grand totals.
    pub total_revenue: f64,
    pub average_quotation_value: f64,
    /// Clients by summed grand total, largest first.
    pub top_clients: Vec<ClientSummary>,
    /// Head of history order.
    pub recent_activity: Vec<Quotation>,
}

impl Analytics {
    pub fn from_history(history: &[Quotation]) -> Self {
        let total_quotations = history.len();
        let total_revenue = history.iter().fold(0.0, |acc, q| acc + q.grand_total);
        let average_quotation_value = if total_quotations > 0 {
            total_revenue / total_quotations as f64
        } else {
            0.0
        };

        // Grouped in first-seen order so ties keep a deterministic order.
        let mut clients: Vec<ClientSummary> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for quotation in history {
            let slot = *index.entry(quotation.client_name.as_str()).or_insert_with(|| {
                clients.push(ClientSummary {
                    name: quotation.client_name.clone(),
                    count: 0,
                    total: 0.0,
                });
                clients.len() - 1
            });
            clients[slot].count += 1;
            clients[slot].total += quotation.grand_total;
        }
        clients.sort_by(|a, b| b.total.total_cmp(&a.total));
        clients.truncate(TOP_CLIENTS);

        Self {
            total_quotations,
            total_revenue,
            average_quotation_value,
            top_clients: clients,
            recent_activity: history.iter().take(RECENT_ACTIVITY).cloned().collect(),
        }
    }
}
