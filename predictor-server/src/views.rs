//! HTML rendering for the form page

use std::fmt::Write;

use student_predictor_core::logic::record::{
    FieldSpec, ABSENCES, AGE, FAILURES, FINAL_GRADE, MOTIVATION_LEVEL, PREVIOUS_SCORE,
    STRESS_LEVEL, STUDY_TIME,
};
use student_predictor_core::{constants, EducationLevel, Gender, Outcome, StudentRecord, YesNo};

/// Result banner shown above the form
#[derive(Debug, Clone, Copy)]
pub enum Banner<'a> {
    Outcome(Outcome),
    Error { title: &'a str, message: &'a str },
}

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.columns { display: flex; gap: 2rem; }
.column { flex: 1; }
label { display: block; margin-top: 0.75rem; font-weight: 600; }
input, select { width: 100%; padding: 0.35rem; margin-top: 0.25rem; }
button { margin-top: 1.5rem; padding: 0.5rem 1.5rem; }
.banner { padding: 0.75rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.success { background: #d4edda; color: #155724; }
.error { background: #f8d7da; color: #721c24; }
"#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
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

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = constants::APP_NAME,
    )
}

fn banner_html(banner: Banner<'_>) -> String {
    match banner {
        Banner::Outcome(outcome) => {
            let class = if outcome.is_pass() { "success" } else { "error" };
            format!(
                "<div class=\"banner {class}\" data-result=\"{outcome}\">{}</div>\n",
                escape(outcome.message())
            )
        }
        Banner::Error { title, message } => format!(
            "<div class=\"banner error\"><strong>{}</strong>: {}</div>\n",
            escape(title),
            escape(message)
        ),
    }
}

fn select<T: Copy + PartialEq>(
    out: &mut String,
    name: &str,
    label: &str,
    options: &[T],
    selected: T,
    option_label: fn(T) -> &'static str,
) {
    let _ = writeln!(out, "<label for=\"{name}\">{label}</label>");
    let _ = writeln!(out, "<select id=\"{name}\" name=\"{name}\">");
    for &option in options {
        let text = option_label(option);
        let attr = if option == selected { " selected" } else { "" };
        let _ = writeln!(out, "<option value=\"{text}\"{attr}>{text}</option>");
    }
    out.push_str("</select>\n");
}

fn number(out: &mut String, spec: FieldSpec, value: u8) {
    let _ = writeln!(
        out,
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{value}\" required>",
        name = spec.name,
        label = spec.label,
        min = spec.min,
        max = spec.max,
    );
}

/// Two-column form pre-filled with `record`
pub fn render_form(record: &StudentRecord, banner: Option<Banner<'_>>) -> String {
    let mut body = String::new();
    body.push_str("<p>Enter the student's details to predict whether they will pass.</p>\n");

    if let Some(banner) = banner {
        body.push_str(&banner_html(banner));
    }

    body.push_str("<form method=\"post\" action=\"/predict\">\n<div class=\"columns\">\n");

    body.push_str("<div class=\"column\">\n");
    select(&mut body, "Gender", "Gender", &Gender::ALL, record.gender, Gender::label);
    number(&mut body, AGE, record.age);
    select(
        &mut body,
        "Parent_Education_Level",
        "Parent Education Level",
        &EducationLevel::ALL,
        record.parent_education_level,
        EducationLevel::label,
    );
    number(&mut body, STUDY_TIME, record.study_time);
    number(&mut body, FAILURES, record.failures);
    number(&mut body, ABSENCES, record.absences);
    body.push_str("</div>\n");

    body.push_str("<div class=\"column\">\n");
    select(&mut body, "Tutoring", "Tutoring", &YesNo::ALL, record.tutoring, YesNo::label);
    select(
        &mut body,
        "Test_Preparation_Course",
        "Test Preparation Course",
        &YesNo::ALL,
        record.test_preparation_course,
        YesNo::label,
    );
    number(&mut body, PREVIOUS_SCORE, record.previous_score);
    number(&mut body, MOTIVATION_LEVEL, record.motivation_level);
    number(&mut body, STRESS_LEVEL, record.stress_level);
    number(&mut body, FINAL_GRADE, record.final_grade);
    body.push_str("</div>\n");

    body.push_str("</div>\n<button type=\"submit\">Predict Result</button>\n</form>\n");

    page(&body)
}

/// Error page for submissions that never produced a record
pub fn error_page(title: &str, message: &str) -> String {
    let mut body = banner_html(Banner::Error { title, message });
    body.push_str("<p><a href=\"/\">Back to the form</a></p>\n");
    page(&body)
}
