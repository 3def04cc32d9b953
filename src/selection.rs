//! Country and company selection over the dropdown lookup, and the
//! membership filter applied to the reference table.

use crate::error::{Result, WizardError};
use crate::table::Table;
use itertools::Itertools;
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};

const COUNTRY: &str = "Country";
const COMPANY: &str = "Company";

/// Minimum similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Country → companies grouping built from the dropdown table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryDirectory {
    companies_by_country: BTreeMap<String, Vec<String>>,
}

impl CountryDirectory {
    /// Group the dropdown rows by country. Duplicate companies are kept per
    /// row; rows with a missing country or company are skipped.
    pub fn from_table(dropdown: &Table) -> Result<Self> {
        let mut companies_by_country: BTreeMap<String, Vec<String>> = BTreeMap::new();

        if let Some(df) = dropdown.frame() {
            let countries = df.column(COUNTRY)?.str()?;
            let companies = df.column(COMPANY)?.str()?;

            for (country, company) in countries.into_iter().zip(companies.into_iter()) {
                if let (Some(country), Some(company)) = (country, company) {
                    companies_by_country
                        .entry(country.to_string())
                        .or_default()
                        .push(company.to_string());
                }
            }
        }

        Ok(Self { companies_by_country })
    }

    /// Country options, sorted.
    pub fn countries(&self) -> Vec<&str> {
        self.companies_by_country.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, country: &str) -> bool {
        self.companies_by_country.contains_key(country)
    }

    pub fn companies_of(&self, country: &str) -> &[String] {
        self.companies_by_country
            .get(country)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Union of the companies under `countries`, deduplicated and sorted.
    /// Unknown countries contribute nothing.
    pub fn available_companies<S: AsRef<str>>(&self, countries: &[S]) -> Vec<String> {
        countries
            .iter()
            .flat_map(|country| self.companies_of(country.as_ref()))
            .cloned()
            .sorted()
            .dedup()
            .collect()
    }

    /// Closest known country by Jaro-Winkler similarity.
    pub fn suggest(&self, input: &str) -> Option<&str> {
        let needle = input.to_lowercase();
        self.companies_by_country
            .keys()
            .map(|country| (country, strsim::jaro_winkler(&needle, &country.to_lowercase())))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(country, _)| country.as_str())
    }
}

/// The user's current countries and companies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    countries: Vec<String>,
    companies: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    /// Replace the chosen countries. Chosen companies are cleared since the
    /// set they were picked from has changed.
    pub fn set_countries(&mut self, directory: &CountryDirectory, countries: Vec<String>) -> Result<()> {
        if let Some(unknown) = countries.iter().find(|c| !directory.contains(c)) {
            let hint = directory
                .suggest(unknown)
                .map(|s| format!(" (did you mean '{}'?)", s))
                .unwrap_or_default();
            return Err(WizardError::Selection(format!("unknown country '{}'{}", unknown, hint)));
        }

        self.countries = countries.into_iter().unique().collect();
        self.companies.clear();
        Ok(())
    }

    /// Replace the chosen companies. Each must be available under the
    /// chosen countries; on error the previous choice is kept.
    pub fn set_companies(&mut self, directory: &CountryDirectory, companies: Vec<String>) -> Result<()> {
        let available = self.available_companies(directory);
        let unavailable: Vec<&String> = companies
            .iter()
            .filter(|c| !available.contains(*c))
            .collect();
        if !unavailable.is_empty() {
            return Err(WizardError::Selection(format!(
                "not available for the chosen countries: {}",
                unavailable.iter().join(", ")
            )));
        }

        self.companies = companies.into_iter().unique().collect();
        Ok(())
    }

    pub fn available_companies(&self, directory: &CountryDirectory) -> Vec<String> {
        directory.available_companies(&self.countries)
    }

    /// Committing needs at least one country and one company.
    pub fn can_commit(&self) -> bool {
        !self.countries.is_empty() && !self.companies.is_empty()
    }
}

/// Rows of `reference` whose Country is among `countries` and whose Company
/// is among `companies`. The two tests are independent: a company is not
/// required to belong to the same country's group in the dropdown.
pub fn filter_reference<S: AsRef<str>>(
    reference: &Table,
    countries: &[S],
    companies: &[S],
) -> Result<Table> {
    let df = match reference.frame() {
        Some(df) => df,
        None => return Ok(reference.clone()),
    };

    let country_set: HashSet<&str> = countries.iter().map(AsRef::as_ref).collect();
    let company_set: HashSet<&str> = companies.iter().map(AsRef::as_ref).collect();

    let country_col = df.column(COUNTRY)?.str()?;
    let company_col = df.column(COMPANY)?.str()?;

    let mask: Vec<bool> = country_col
        .into_iter()
        .zip(company_col.into_iter())
        .map(|(country, company)| {
            country.is_some_and(|c| country_set.contains(c))
                && company.is_some_and(|c| company_set.contains(c))
        })
        .collect();
    let mask = BooleanChunked::new("mask", mask.as_slice());

    Ok(Table::from_frame(df.filter(&mask)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> CountryDirectory {
        let df = df![
            "Country" => ["US", "US", "UK"],
            "Company" => ["Acme", "Globex", "Acme"]
        ]
        .unwrap();
        CountryDirectory::from_table(&Table::from_frame(df)).unwrap()
    }

    #[test]
    fn test_countries_sorted() {
        assert_eq!(directory().countries(), vec!["UK", "US"]);
    }

    #[test]
    fn test_available_companies_union() {
        let dir = directory();
        assert_eq!(dir.available_companies(&["US"]), vec!["Acme", "Globex"]);
        assert_eq!(dir.available_companies(&["US", "UK"]), vec!["Acme", "Globex"]);
        assert_eq!(dir.available_companies(&["UK"]), vec!["Acme"]);
    }

    #[test]
    fn test_unknown_country_has_no_companies() {
        let dir = directory();
        assert!(dir.available_companies(&["FR"]).is_empty());
        assert!(dir.available_companies::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_duplicates_preserved_in_group() {
        let df = df![
            "Country" => ["US", "US"],
            "Company" => ["Acme", "Acme"]
        ]
        .unwrap();
        let dir = CountryDirectory::from_table(&Table::from_frame(df)).unwrap();
        assert_eq!(dir.companies_of("US").len(), 2);
        assert_eq!(dir.available_companies(&["US"]), vec!["Acme"]);
    }

    #[test]
    fn test_set_countries_clears_companies() {
        let dir = directory();
        let mut selection = Selection::new();
        selection.set_countries(&dir, vec!["US".into()]).unwrap();
        selection.set_companies(&dir, vec!["Globex".into()]).unwrap();
        assert!(selection.can_commit());

        selection.set_countries(&dir, vec!["UK".into()]).unwrap();
        assert!(selection.companies().is_empty());
        assert!(!selection.can_commit());
    }

    #[test]
    fn test_set_companies_rejects_unavailable() {
        let dir = directory();
        let mut selection = Selection::new();
        selection.set_countries(&dir, vec!["UK".into()]).unwrap();
        selection.set_companies(&dir, vec!["Acme".into()]).unwrap();

        let err = selection.set_companies(&dir, vec!["Globex".into()]);
        assert!(matches!(err, Err(WizardError::Selection(_))));
        assert_eq!(selection.companies(), &["Acme".to_string()]);
    }

    #[test]
    fn test_unknown_country_suggests_closest() {
        let df = df![
            "Country" => ["United States", "United Kingdom"],
            "Company" => ["Acme", "Acme"]
        ]
        .unwrap();
        let dir = CountryDirectory::from_table(&Table::from_frame(df)).unwrap();
        let mut selection = Selection::new();

        let err = selection
            .set_countries(&dir, vec!["united states".into()])
            .unwrap_err();
        assert!(err.to_string().contains("did you mean 'United States'"));
        assert!(selection.countries().is_empty());
    }

    #[test]
    fn test_filter_is_membership_and() {
        let reference = Table::from_frame(
            df![
                "Country" => ["US", "US", "UK", "FR"],
                "Company" => ["Acme", "Initech", "Globex", "Acme"],
                "Metric" => ["ARPU", "ARPU", "Subs", "Subs"]
            ]
            .unwrap(),
        );

        let view = filter_reference(&reference, &["US", "UK"], &["Acme", "Globex"]).unwrap();
        assert_eq!(view.height(), 2);
        let companies: Vec<Option<&str>> = view
            .frame()
            .unwrap()
            .column("Company")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(companies, vec![Some("Acme"), Some("Globex")]);
    }

    #[test]
    fn test_filter_with_no_match_is_empty_with_schema() {
        let reference = Table::from_frame(
            df!["Country" => ["US"], "Company" => ["Acme"]].unwrap(),
        );
        let view = filter_reference(&reference, &["UK"], &["Acme"]).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.column_names(), vec!["Country", "Company"]);
    }
}
