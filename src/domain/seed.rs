//! Seed dataset for the simulated remote

use crate::domain::records::{Company, Country, GhgEmission, Post};
use chrono::{TimeZone, Utc};

fn country(code: &str, name: &str, region: &str) -> Country {
    Country {
        code: code.to_string(),
        name: name.to_string(),
        region: region.to_string(),
    }
}

fn emission(year_month: &str, source: &str, emissions: f64) -> GhgEmission {
    GhgEmission {
        year_month: year_month.to_string(),
        source: source.to_string(),
        emissions,
    }
}

/// Countries known to the dashboard
pub fn countries() -> Vec<Country> {
    vec![
        country("US", "United States", "North America"),
        country("DE", "Germany", "Europe"),
        country("KR", "South Korea", "Asia Pacific"),
    ]
}

/// Companies with their Q1 2024 emissions
pub fn companies() -> Vec<Company> {
    vec![
        Company {
            id: "c1".to_string(),
            name: "Acme Corp".to_string(),
            country: "US".to_string(),
            emissions: vec![
                emission("2024-01", "diesel", 120.0),
                emission("2024-02", "diesel", 110.0),
                emission("2024-03", "diesel", 95.0),
                emission("2024-03", "electricity", 45.0),
            ],
        },
        Company {
            id: "c2".to_string(),
            name: "Globex".to_string(),
            country: "DE".to_string(),
            emissions: vec![
                emission("2024-01", "gasoline", 80.0),
                emission("2024-02", "gasoline", 105.0),
                emission("2024-03", "gasoline", 120.0),
                emission("2024-03", "diesel", 38.0),
            ],
        },
        Company {
            id: "c3".to_string(),
            name: "Hana Manufacturing".to_string(),
            country: "KR".to_string(),
            emissions: vec![
                emission("2024-01", "lpg", 64.0),
                emission("2024-02", "lpg", 70.0),
                emission("2024-03", "lpg", 68.0),
                emission("2024-03", "electricity", 52.0),
            ],
        },
    ]
}

/// Posts already published
pub fn posts() -> Vec<Post> {
    let epoch = Utc.timestamp_opt(0, 0).single().unwrap_or_default();
    vec![
        Post {
            id: "p1".to_string(),
            title: "Sustainability Report".to_string(),
            resource_uid: "c1".to_string(),
            date_time: "2024-02".to_string(),
            content: "Quarterly CO2 update and mitigation plans.".to_string(),
            author: String::new(),
            created_at: epoch,
        },
        Post {
            id: "p2".to_string(),
            title: "Energy Efficiency Retrofits".to_string(),
            resource_uid: "c3".to_string(),
            date_time: "2024-03".to_string(),
            content: "Facility upgrades expected to cut LPG use by 12%.".to_string(),
            author: String::new(),
            created_at: epoch,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_reference_known_companies() {
        let companies = companies();
        for post in posts() {
            assert!(companies.iter().any(|c| c.id == post.resource_uid));
        }
    }

    #[test]
    fn companies_reference_known_countries() {
        let countries = countries();
        for company in companies() {
            assert!(countries.iter().any(|c| c.code == company.country));
        }
    }

    #[test]
    fn acme_totals() {
        let acme = &companies()[0];
        assert_eq!(acme.total_emissions(), 370.0);
    }
}
