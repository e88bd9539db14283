//! Aggregates derived from the project list for the dashboard header and
//! the analytics view. Pure folds; recomputed from scratch on every load.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{Project, ProjectStatus, ServiceType};

/// Headline numbers across the top of the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub new_leads: usize,
    /// Σ value across every project, whole dollars.
    pub pipeline_value: i64,
}

impl DashboardStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        Self {
            total_projects: projects.len(),
            active_projects: count_status(projects, ProjectStatus::Active),
            new_leads: count_status(projects, ProjectStatus::Lead),
            pipeline_value: projects.iter().map(|p| p.value).sum(),
        }
    }
}

fn count_status(projects: &[Project], status: ProjectStatus) -> usize {
    projects.iter().filter(|p| p.status == status).count()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBreakdown {
    pub service: ServiceType,
    pub count: usize,
    /// Revenue for this service, Cancelled projects excluded.
    pub revenue: i64,
}

/// The analytics view: distribution, revenue, satisfaction, conversion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub services: Vec<ServiceBreakdown>,
    /// Mean of rated projects, `None` when nothing is rated.
    pub average_rating: Option<f64>,
    /// (Active + Completed) / total, in percent, 0 for an empty board.
    pub conversion_rate: u32,
    pub total_active_value: i64,
}

impl Analytics {
    pub fn from_projects(projects: &[Project]) -> Self {
        let services = ServiceType::ALL
            .into_iter()
            .map(|service| ServiceBreakdown {
                service,
                count: projects.iter().filter(|p| p.service_type == service).count(),
                revenue: projects
                    .iter()
                    .filter(|p| p.service_type == service && p.status != ProjectStatus::Cancelled)
                    .map(|p| p.value)
                    .sum(),
            })
            .collect();

        let rated: Vec<u8> = projects.iter().filter_map(|p| p.rating).collect();
        let average_rating = if rated.is_empty() {
            None
        } else {
            Some(rated.iter().map(|&r| r as f64).sum::<f64>() / rated.len() as f64)
        };

        let conversion_rate = if projects.is_empty() {
            0
        } else {
            let converted = projects
                .iter()
                .filter(|p| matches!(p.status, ProjectStatus::Active | ProjectStatus::Completed))
                .count();
            ((converted as f64 / projects.len() as f64) * 100.0).round() as u32
        };

        let total_active_value = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .map(|p| p.value)
            .sum();

        Self {
            services,
            average_rating,
            conversion_rate,
            total_active_value,
        }
    }
}

/// Sorted, deduplicated client names. Feeds the quick-add autocomplete.
pub fn unique_clients(projects: &[Project]) -> Vec<String> {
    let set: BTreeSet<&str> = projects.iter().map(|p| p.client_name.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn project(name: &str, service: ServiceType, status: ProjectStatus, value: i64, rating: Option<u8>) -> Project {
        Project {
            id: name.to_lowercase(),
            client_name: name.to_string(),
            email: String::new(),
            phone: String::new(),
            service_type: service,
            status,
            value,
            deadline: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            notes: String::new(),
            rating,
        }
    }

    fn board() -> Vec<Project> {
        vec![
            project("Acme", ServiceType::WebDevelopment, ProjectStatus::Active, 3000, Some(4)),
            project("Birch", ServiceType::WebDevelopment, ProjectStatus::Lead, 1500, None),
            project("Cove", ServiceType::AiSolutions, ProjectStatus::Completed, 5000, Some(5)),
            project("Dune", ServiceType::AdCampaign, ProjectStatus::Cancelled, 1000, None),
        ]
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = DashboardStats::from_projects(&board());
        assert_eq!(stats.total_projects, 4);
        assert_eq!(stats.active_projects, 1);
        assert_eq!(stats.new_leads, 1);
        assert_eq!(stats.pipeline_value, 10500);
    }

    #[test]
    fn test_dashboard_stats_empty() {
        let stats = DashboardStats::from_projects(&[]);
        assert_eq!(stats.total_projects, 0);
        assert_eq!(stats.pipeline_value, 0);
    }

    #[test]
    fn test_analytics_revenue_excludes_cancelled() {
        let analytics = Analytics::from_projects(&board());
        let ads = analytics
            .services
            .iter()
            .find(|s| s.service == ServiceType::AdCampaign)
            .unwrap();
        assert_eq!(ads.count, 1);
        assert_eq!(ads.revenue, 0);
        let web = analytics
            .services
            .iter()
            .find(|s| s.service == ServiceType::WebDevelopment)
            .unwrap();
        assert_eq!(web.revenue, 4500);
    }

    #[test]
    fn test_analytics_average_rating() {
        let analytics = Analytics::from_projects(&board());
        assert_eq!(analytics.average_rating, Some(4.5));
        assert_eq!(Analytics::from_projects(&[]).average_rating, None);
    }

    #[test]
    fn test_analytics_conversion_rate() {
        // 2 of 4 are Active or Completed
        assert_eq!(Analytics::from_projects(&board()).conversion_rate, 50);
        assert_eq!(Analytics::from_projects(&[]).conversion_rate, 0);
    }

    #[test]
    fn test_total_active_value() {
        assert_eq!(Analytics::from_projects(&board()).total_active_value, 3000);
    }

    #[test]
    fn test_unique_clients_sorted_dedup() {
        let mut projects = board();
        projects.push(project("Acme", ServiceType::AdCampaign, ProjectStatus::Lead, 500, None));
        assert_eq!(unique_clients(&projects), vec!["Acme", "Birch", "Cove", "Dune"]);
    }
}
