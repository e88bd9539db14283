//! The smart pricing calculator behind the add-project form.
//!
//! All of this is pure and synchronous: static lookup tables plus a small
//! fold. The UI recomputes on every input change, so determinism and
//! freedom from side effects are part of the contract.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::ServiceType;

/// A flat-cost add-on from the static catalog. Defined at build time,
/// never persisted.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PricingFeature {
    pub id: &'static str,
    pub label: &'static str,
    /// Whole US dollars.
    pub cost: i64,
    /// `None` means the add-on is offered for every service type.
    pub category: Option<ServiceType>,
}

impl PricingFeature {
    pub fn applies_to(&self, service: ServiceType) -> bool {
        self.category.is_none() || self.category == Some(service)
    }
}

pub const FEATURE_CATALOG: &[PricingFeature] = &[
    // Web dev
    PricingFeature { id: "responsive", label: "Mobile Responsive", cost: 500, category: Some(ServiceType::WebDevelopment) },
    PricingFeature { id: "cms", label: "CMS Integration", cost: 1200, category: Some(ServiceType::WebDevelopment) },
    PricingFeature { id: "ecommerce", label: "E-commerce Functionality", cost: 2500, category: Some(ServiceType::WebDevelopment) },
    PricingFeature { id: "seo", label: "Advanced SEO Pack", cost: 800, category: Some(ServiceType::WebDevelopment) },
    // AI
    PricingFeature { id: "fine_tuning", label: "Model Fine-Tuning", cost: 3000, category: Some(ServiceType::AiSolutions) },
    PricingFeature { id: "rag", label: "RAG Implementation", cost: 2000, category: Some(ServiceType::AiSolutions) },
    PricingFeature { id: "voice", label: "Voice/Audio Interface", cost: 1500, category: Some(ServiceType::AiSolutions) },
    // Ads
    PricingFeature { id: "creatives", label: "Creative Asset Design", cost: 800, category: Some(ServiceType::AdCampaign) },
    PricingFeature { id: "ab_testing", label: "A/B Testing Setup", cost: 600, category: Some(ServiceType::AdCampaign) },
    PricingFeature { id: "multi_platform", label: "Multi-Platform Setup", cost: 1000, category: Some(ServiceType::AdCampaign) },
];

/// Standard package cost per service type.
pub fn base_cost(service: ServiceType) -> i64 {
    match service {
        ServiceType::WebDevelopment => 1500,
        ServiceType::AiSolutions => 2500,
        ServiceType::AdCampaign => 1000,
    }
}

/// Catalog entries offered for the given service type, in catalog order.
pub fn features_for(service: ServiceType) -> impl Iterator<Item = &'static PricingFeature> {
    FEATURE_CATALOG.iter().filter(move |f| f.applies_to(service))
}

pub fn feature_by_id(id: &str) -> Option<&'static PricingFeature> {
    FEATURE_CATALOG.iter().find(|f| f.id == id)
}

/// Full price breakdown for display next to the total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub base: i64,
    pub features: Vec<&'static PricingFeature>,
    pub features_subtotal: i64,
    pub adjustment: i64,
    pub rush: bool,
    pub total: i64,
}

impl Quote {
    /// Price an order: base cost, plus each selected add-on that exists in
    /// the catalog and is valid for `service` (anything else is silently
    /// ignored), plus the manual adjustment, all doubled at the end when
    /// the rush tariff is on.
    pub fn compute<S: AsRef<str>>(
        service: ServiceType,
        selected_ids: &[S],
        rush: bool,
        adjustment: i64,
    ) -> Self {
        let base = base_cost(service);
        let features: Vec<&'static PricingFeature> = features_for(service)
            .filter(|f| selected_ids.iter().any(|id| id.as_ref() == f.id))
            .collect();
        let features_subtotal: i64 = features.iter().map(|f| f.cost).sum();

        let mut total = base + features_subtotal + adjustment;
        if rush {
            // single global multiplier, applied after everything else
            total *= 2;
        }

        Self { base, features, features_subtotal, adjustment, rush, total }
    }
}

/// Total price for an order. See [`Quote::compute`] for the rules.
pub fn compute_total<S: AsRef<str>>(
    service: ServiceType,
    selected_ids: &[S],
    rush: bool,
    adjustment: i64,
) -> i64 {
    Quote::compute(service, selected_ids, rush, adjustment).total
}

/// Human-readable order summary, stored in the project notes.
pub fn describe_order<S: AsRef<str>>(
    service: ServiceType,
    selected_ids: &[S],
    rush: bool,
    adjustment: i64,
) -> String {
    let quote = Quote::compute(service, selected_ids, rush, adjustment);
    let labels: Vec<&str> = quote.features.iter().map(|f| f.label).collect();

    let features_part = if labels.is_empty() {
        "Standard Package".to_string()
    } else {
        labels.join(", ")
    };

    let adj_part = if adjustment != 0 {
        format!(" Manual Adj: {adjustment:+}.")
    } else {
        String::new()
    };

    let rush_part = if rush { " [RUSH ORDER APPLIED]" } else { "" };

    format!("Features: {features_part}.{adj_part}{rush_part}")
}

/// Mutable calculator state for an in-progress order. Keeps the selection
/// set category-scoped: changing the service type drops any selected ids
/// that are not valid for the new category.
#[derive(Debug, Clone)]
pub struct PricingSelection {
    service: ServiceType,
    selected: BTreeSet<String>,
    pub rush: bool,
    pub adjustment: i64,
}

impl PricingSelection {
    pub fn new(service: ServiceType) -> Self {
        Self {
            service,
            selected: BTreeSet::new(),
            rush: false,
            adjustment: 0,
        }
    }

    pub fn service(&self) -> ServiceType {
        self.service
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Toggle an add-on. Ids unknown to the catalog or not offered for the
    /// current service type are rejected at this input layer; the pricing
    /// functions themselves tolerate them anyway.
    pub fn toggle(&mut self, id: &str) -> bool {
        let valid = feature_by_id(id).is_some_and(|f| f.applies_to(self.service));
        if !valid {
            return false;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
        true
    }

    /// Switch service type, dropping selected ids invalid for the new one.
    pub fn set_service(&mut self, service: ServiceType) {
        self.service = service;
        self.selected
            .retain(|id| feature_by_id(id).is_some_and(|f| f.applies_to(service)));
    }

    pub fn quote(&self) -> Quote {
        let ids: Vec<&str> = self.selected.iter().map(String::as_str).collect();
        Quote::compute(self.service, &ids, self.rush, self.adjustment)
    }

    pub fn total(&self) -> i64 {
        self.quote().total
    }

    pub fn describe(&self) -> String {
        let ids: Vec<&str> = self.selected.iter().map(String::as_str).collect();
        describe_order(self.service, &ids, self.rush, self.adjustment)
    }
}
