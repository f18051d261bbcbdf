use scraper::{ElementRef, Html, Selector};
use url::Url;
use log::debug;

/// One vacancy as it appears on a search results page. Missing fields are
/// kept as empty strings; only the title is mandatory.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Vacancy {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub url: String,
}

pub struct Extractor {
    // hh.ru marks serp elements with data-qa hooks; the CSS class names
    // are build-generated and change between deploys.
    card_selector: Selector,
    title_selector: Selector,
    company_selector: Selector,
    location_selector: Selector,
    salary_selector: Selector,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            // The card attribute carries extra tokens on promoted listings
            // ("vacancy-serp__vacancy vacancy-serp__vacancy_standard_plus"),
            // so match by word rather than by the exact value.
            card_selector: Selector::parse(r#"[data-qa~="vacancy-serp__vacancy"]"#).unwrap(),
            title_selector: Selector::parse(r#"[data-qa="serp-item__title"]"#).unwrap(),
            company_selector: Selector::parse(r#"[data-qa="vacancy-serp__vacancy-employer"]"#)
                .unwrap(),
            location_selector: Selector::parse(r#"[data-qa="vacancy-serp__vacancy-address"]"#)
                .unwrap(),
            salary_selector: Selector::parse(r#"[data-qa="vacancy-serp__vacancy-compensation"]"#)
                .unwrap(),
        }
    }

    /// Walks the parsed page and maps every listing card to a `Vacancy`,
    /// in document order. Cards without a title are invalid listings and
    /// are skipped; any other missing sub-element degrades to an empty
    /// field. Never fails.
    pub fn extract(&self, document: &Html, base_url: &Url) -> Vec<Vacancy> {
        let mut vacancies = Vec::new();

        for card in document.select(&self.card_selector) {
            // Sub-lookups stay scoped to the card, never the whole document.
            let title_node = card.select(&self.title_selector).next();

            let title = title_node.map(element_text).unwrap_or_default();
            if title.is_empty() {
                debug!("Skipping listing card without a title");
                continue;
            }

            let url = title_node
                .and_then(|node| node.value().attr("href"))
                .and_then(|href| base_url.join(href).ok())
                .map(|resolved| resolved.to_string())
                .unwrap_or_default();

            vacancies.push(Vacancy {
                title,
                company: self.select_text(&card, &self.company_selector),
                location: self.select_text(&card, &self.location_selector),
                salary: self.select_text(&card, &self.salary_selector),
                url,
            });
        }

        debug!("Extracted {} vacancies", vacancies.len());
        vacancies
    }

    fn select_text(&self, card: &ElementRef, selector: &Selector) -> String {
        card.select(selector).next().map(element_text).unwrap_or_default()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

// Joined text of the element's text nodes, whitespace runs collapsed.
// Salary figures carry NBSP padding, which split_whitespace also eats.
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
