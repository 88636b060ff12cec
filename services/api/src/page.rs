use crate::infra::escape_html;
use chrono::NaiveDate;
use mediation_predictor::workflows::mediation::ResultPanel;
use std::fmt::Write;

/// What the area below the form shows.
#[derive(Debug, Clone)]
pub(crate) enum PageOutcome {
    Blank,
    Panels(Vec<ResultPanel>),
    Error(String),
}

/// Everything needed to draw the predictor page.
#[derive(Debug, Clone)]
pub(crate) struct PageModel<'a> {
    pub(crate) intake_options: &'a [String],
    pub(crate) dispute_options: &'a [String],
    pub(crate) date_registered: NaiveDate,
    pub(crate) selected_intake: Option<&'a str>,
    pub(crate) selected_dispute: Option<&'a str>,
    pub(crate) outcome: PageOutcome,
}

const STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:2rem auto;padding:0 1rem;}\
label{display:block;margin-top:1rem;font-weight:bold;}\
select,input{width:100%;padding:.4rem;margin-top:.3rem;}\
button{margin-top:1.2rem;padding:.6rem 1.2rem;}\
.panel{padding:20px;border-radius:10px;border:2px solid;margin-top:10px;}\
.panel h4{margin:0 0 10px 0;}\
.panel p{margin:0;}\
.panel p.note{margin-top:5px;}\
.error{padding:12px;border-radius:6px;background:#FFEBEE;color:#B71C1C;margin-top:1rem;}";

pub(crate) fn render(model: &PageModel<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<title>Mediation Case Predictor</title>");
    let _ = write!(html, "<style>{STYLE}</style></head><body>");
    html.push_str("<h1>Mediation Case Predictor</h1>");
    html.push_str(
        "<p>Predict the likelihood of a case proceeding to mediation and being settled \
         based on case attributes.</p><hr>",
    );

    render_form(&mut html, model);

    match &model.outcome {
        PageOutcome::Blank => {}
        PageOutcome::Panels(panels) => {
            html.push_str("<h2>Prediction Results</h2>");
            for panel in panels {
                render_panel(&mut html, panel);
            }
        }
        PageOutcome::Error(message) => {
            let _ = write!(
                html,
                "<div class=\"error\" role=\"alert\">{}</div>",
                escape_html(message)
            );
        }
    }

    html.push_str("</body></html>");
    html
}

fn render_form(html: &mut String, model: &PageModel<'_>) {
    html.push_str("<form method=\"post\" action=\"/predict\"><h2>Case Details</h2>");
    let _ = write!(
        html,
        "<label for=\"date_registered\">Date of Registration</label>\
         <input type=\"date\" id=\"date_registered\" name=\"date_registered\" value=\"{}\">",
        model.date_registered.format("%Y-%m-%d")
    );
    render_select(
        html,
        "type_of_intake",
        "Type of Intake",
        model.intake_options,
        model.selected_intake,
    );
    render_select(
        html,
        "type_of_dispute",
        "Type of Dispute",
        model.dispute_options,
        model.selected_dispute,
    );
    html.push_str("<button type=\"submit\">Predict Outcome</button></form>");
}

fn render_select(
    html: &mut String,
    name: &str,
    label: &str,
    options: &[String],
    selected: Option<&str>,
) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">"
    );
    for option in options {
        let value = escape_html(option);
        let marker = if selected == Some(option.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(html, "<option value=\"{value}\"{marker}>{value}</option>");
    }
    html.push_str("</select>");
}

fn render_panel(html: &mut String, panel: &ResultPanel) {
    let palette = panel.tone.palette();
    let _ = write!(
        html,
        "<div class=\"panel\" style=\"border-color:{};background-color:{};\">\
         <h4 style=\"color:{};\">{} {}</h4>\
         <p style=\"color:{};\">{}: <strong>{}</strong></p>",
        palette.border,
        palette.background,
        palette.heading,
        panel.icon,
        panel.headline,
        palette.body,
        panel.probability_label,
        panel.percentage,
    );
    for note in &panel.notes {
        let _ = write!(
            html,
            "<p class=\"note\" style=\"color:{};\">{}</p>",
            palette.body,
            escape_html(note)
        );
    }
    html.push_str("</div>");
}
