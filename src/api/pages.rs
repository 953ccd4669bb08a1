//! Server-rendered HTML: the parameter form and the result page.

use crate::calculation::CalculationOutcome;
use crate::store::CalculationRecord;
use std::fmt::Write;

struct FormField {
    name: &'static str,
    label: &'static str,
    placeholder: &'static str,
}

const fn field(name: &'static str, label: &'static str, placeholder: &'static str) -> FormField {
    FormField {
        name,
        label,
        placeholder,
    }
}

const FORM_FIELDS: [FormField; 20] = [
    field("trips", "Trips per day (0 = use usage category)", "300"),
    field("usage_category", "Usage category (1-6)", "3"),
    field("stops", "Number of stops", "4"),
    field("type", "Elevator type (hydraulic, traction, other)", "traction"),
    field("counterbalance", "Counterbalance ratio (%)", "50"),
    field("load", "Rated load (kg)", "1000"),
    field("src", "Travel distance (m)", "30"),
    field("ssc", "Short trip distance (m)", "3"),
    field("xpzone", "Express zone (1 = yes, 2 = no)", "2"),
    field("sez", "Express zone length (m)", "75"),
    field("sfl", "Lowest floor above express zone (m)", "15"),
    field("energy_ref", "Energy of a reference trip (Wh)", "1.0"),
    field("energy_short", "Energy of a short trip (Wh)", "0.3"),
    field("speed", "Rated speed (m/s)", "1.0"),
    field("acceleration", "Rated acceleration (m/s²)", "0.8"),
    field("jerk", "Rated jerk (m/s³)", "1.0"),
    field("door_time", "Door cycle time (s)", "5"),
    field("idle_power", "Idle power (W)", "0.1"),
    field("standby5", "Standby power after 5 min (W)", "0.05"),
    field("standby30", "Standby power after 30 min (W)", "0.02"),
];

// `operating_days` is rendered separately so it closes the form.
const OPERATING_DAYS: FormField = field("operating_days", "Operating days per year", "300");

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

fn history_table(records: &[CalculationRecord]) -> String {
    if records.is_empty() {
        return "<p>No calculations recorded yet.</p>\n".to_string();
    }
    let mut html = String::from(
        "<table>\n<tr><th>#</th><th>Daily energy (kWh)</th><th>Yearly energy (kWh)</th><th>Recorded</th></tr>\n",
    );
    for record in records {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{}</td></tr>",
            record.id,
            record.daily_energy,
            record.yearly_energy,
            escape(&record.created_at)
        );
    }
    html.push_str("</table>\n");
    html
}

fn input_row(html: &mut String, field: &FormField) {
    let _ = writeln!(
        html,
        "<label>{} <input name=\"{}\" placeholder=\"{}\"></label><br>",
        escape(field.label),
        field.name,
        field.placeholder
    );
}

pub fn index_page(recent: &[CalculationRecord], error: Option<&str>) -> String {
    let mut body = String::from("<h1>Elevator energy estimate</h1>\n");
    if let Some(message) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(message));
    }
    body.push_str("<form method=\"post\" action=\"/calculate\">\n");
    for field in &FORM_FIELDS {
        input_row(&mut body, field);
    }
    input_row(&mut body, &OPERATING_DAYS);
    body.push_str("<button type=\"submit\">Calculate</button>\n</form>\n");
    body.push_str("<h2>Recent calculations</h2>\n");
    body.push_str(&history_table(recent));
    layout("Elevator energy estimate", &body)
}

pub fn result_page(outcome: &CalculationOutcome) -> String {
    let result = &outcome.estimate.result;
    let mut body = String::from("<h1>Estimated energy consumption</h1>\n");
    let _ = writeln!(
        body,
        "<p>Daily energy: <strong>{:.2} kWh</strong></p>\n<p>Yearly energy: <strong>{:.2} kWh</strong></p>\n<p>Trips per day: {}</p>",
        result.daily_energy_kwh,
        result.yearly_energy_kwh,
        outcome.estimate.breakdown.trips_per_day
    );
    if !outcome.estimate.warnings.is_empty() {
        body.push_str("<ul class=\"warnings\">\n");
        for warning in &outcome.estimate.warnings {
            let _ = writeln!(body, "<li>{}</li>", escape(&warning.to_string()));
        }
        body.push_str("</ul>\n");
    }
    body.push_str("<h2>Recent calculations</h2>\n");
    body.push_str(&history_table(&outcome.recent));
    body.push_str("<p><a href=\"/\">New calculation</a></p>\n");
    layout("Energy estimate result", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Calculation failed</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back</a></p>\n",
        escape(message)
    );
    layout("Calculation failed", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> CalculationRecord {
        CalculationRecord {
            id,
            daily_energy: 0.18,
            yearly_energy: 54.0,
            created_at: "2026-01-11T12:30:00Z".to_string(),
        }
    }

    #[test]
    fn index_page_lists_every_input() {
        let page = index_page(&[], None);
        for field in FORM_FIELDS.iter().chain(std::iter::once(&OPERATING_DAYS)) {
            assert!(
                page.contains(&format!("name=\"{}\"", field.name)),
                "missing {}",
                field.name
            );
        }
        assert!(page.contains("No calculations recorded yet."));
    }

    #[test]
    fn index_page_shows_history_rows() {
        let page = index_page(&[record(2), record(1)], None);
        assert!(page.contains("<td>2</td><td>0.18</td><td>54.00</td>"));
        assert!(page.contains("<td>1</td>"));
    }

    #[test]
    fn error_messages_are_escaped() {
        let page = error_page("field `load` has invalid value `<b>`");
        assert!(page.contains("&lt;b&gt;"));
        assert!(!page.contains("<b>"));
    }
}
