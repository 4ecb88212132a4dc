//! HTML rendering for the prediction page.
//!
//! A single page serves the empty form, the result view and the error view.

use std::fmt::Write as _;

use crate::features::FeatureRecord;
use crate::prediction::{PredictionView, RiskLevel};

/// What the page shows below the form.
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    /// Bare input form.
    Form,
    /// A successful prediction and the record it was computed from.
    Result {
        /// Formatted prediction
        view: &'a PredictionView,
        /// Coerced input
        record: &'a FeatureRecord,
    },
    /// The form with an error message.
    Error(&'a str),
}

const CONTRACTS: [&str; 3] = ["Month-to-month", "One year", "Two year"];
const PAYMENT_METHODS: [&str; 4] = [
    "Electronic check",
    "Mailed check",
    "Bank transfer (automatic)",
    "Credit card (automatic)",
];
const INTERNET_SERVICES: [&str; 3] = ["DSL", "Fiber optic", "No"];
const YES_NO: [&str; 2] = ["Yes", "No"];

const STYLE: &str = "body{font-family:sans-serif;max-width:640px;margin:2em auto;}\
label{display:block;margin-top:.6em;}\
.result{margin-top:1.5em;padding:1em;border-radius:6px;background:#f3f6fa;}\
.risk-high{color:#b00020;}.risk-medium{color:#b26a00;}.risk-low{color:#1b7a1b;}\
.error{margin-top:1.5em;padding:1em;background:#fdecea;color:#611a15;}";

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render the full page.
pub fn render_page(page: Page<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Prédiction de Churn Client</title>\n");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    html.push_str("</head>\n<body>\n<h1>Prédiction de Churn Client</h1>\n");

    render_form(&mut html);

    match page {
        Page::Form => {}
        Page::Result { view, record } => render_result(&mut html, view, record),
        Page::Error(message) => {
            let _ = writeln!(
                html,
                "<div class=\"error\"><strong>Erreur :</strong> {}</div>",
                escape_html(message)
            );
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_form(html: &mut String) {
    html.push_str("<form method=\"post\" action=\"/predict\">\n");
    number_input(html, "tenure", "Ancienneté (mois)", "1");
    number_input(html, "monthly_charges", "Frais mensuels", "0.01");
    number_input(html, "total_charges", "Frais totaux", "0.01");
    select_input(html, "contract", "Type de contrat", &CONTRACTS);
    select_input(html, "payment_method", "Méthode de paiement", &PAYMENT_METHODS);
    select_input(html, "internet_service", "Service Internet", &INTERNET_SERVICES);
    select_input(html, "paperless_billing", "Facturation électronique", &YES_NO);
    html.push_str("<p><button type=\"submit\">Prédire</button></p>\n</form>\n");
}

fn number_input(html: &mut String, name: &str, label: &str, step: &str) {
    let _ = writeln!(
        html,
        "<label for=\"{name}\">{label}</label>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" step=\"{step}\" min=\"0\" required>"
    );
}

fn select_input(html: &mut String, name: &str, label: &str, options: &[&str]) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">"
    );
    for option in options {
        let option = escape_html(option);
        let _ = write!(html, "<option value=\"{option}\">{option}</option>");
    }
    html.push_str("</select>\n");
}

fn render_result(html: &mut String, view: &PredictionView, record: &FeatureRecord) {
    let risk_class = match view.risk_level {
        RiskLevel::High => "risk-high",
        RiskLevel::Medium => "risk-medium",
        RiskLevel::Low => "risk-low",
    };
    html.push_str("<div class=\"result\">\n<h2>Résultat</h2>\n");
    let _ = writeln!(html, "<p>Churn : <strong>{}</strong></p>", view.churn);
    let _ = writeln!(html, "<p>Probabilité : <strong>{}</strong></p>", view.probabilite);
    let _ = writeln!(
        html,
        "<p>Risque : <strong class=\"{risk_class}\">{}</strong></p>",
        view.risque
    );

    html.push_str("<table>\n");
    for (column, value) in record.columns() {
        let _ = writeln!(
            html,
            "<tr><th>{column}</th><td>{}</td></tr>",
            escape_html(&value.to_string())
        );
    }
    html.push_str("</table>\n</div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::{ChurnLabel, Prediction};

    fn record() -> FeatureRecord {
        FeatureRecord {
            tenure: 1,
            monthly_charges: 100.0,
            total_charges: 100.0,
            contract: "Month-to-month".to_string(),
            payment_method: "Electronic check".to_string(),
            internet_service: "Fiber optic".to_string(),
            paperless_billing: "Yes".to_string(),
        }
    }

    #[test]
    fn test_form_page_mentions_churn() {
        let html = render_page(Page::Form);
        assert!(html.contains("Churn"));
        for field in crate::form::FORM_FIELDS {
            assert!(html.contains(&format!("name=\"{field}\"")), "missing {field}");
        }
        assert!(!html.contains("class=\"result\""));
    }

    #[test]
    fn test_result_page() {
        let view = PredictionView::from_prediction(&Prediction::new(ChurnLabel::Churned, 0.75));
        let record = record();
        let html = render_page(Page::Result {
            view: &view,
            record: &record,
        });
        assert!(html.contains("75.0%"));
        assert!(html.contains("Élevé"));
        assert!(html.contains("risk-high"));
        assert!(html.contains("<th>PaperlessBilling</th>"));
    }

    #[test]
    fn test_error_page_is_escaped() {
        let html = render_page(Page::Error("bad <script>"));
        assert!(html.contains("bad &lt;script&gt;"));
        assert!(!html.contains("bad <script>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b\"c'"), "a&amp;b&quot;c&#39;");
    }
}
