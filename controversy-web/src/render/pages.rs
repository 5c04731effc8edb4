//! Public pages: index, detail and error screens

use controversy_common::{Category, Controversy};

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{field_error, layout, submitted};
use crate::detail::DetailContext;
use crate::forms::{DataPointSubmission, FormErrors};

/// List of all controversies, already ordered by the caller
pub fn index_page(controversies: &[Controversy]) -> String {
    let body = if controversies.is_empty() {
        r#"<p class="empty">No controversies have been added yet.</p>"#.to_string()
    } else {
        let items: String = controversies
            .iter()
            .map(|c| {
                format!(
                    r#"<li><a href="{}">{}</a></li>"#,
                    encode_double_quoted_attribute(&c.absolute_url()),
                    encode_text(&c.name)
                )
            })
            .collect();
        format!(r#"<ul class="controversies">{}</ul>"#, items)
    };

    layout(
        "Controversies",
        &format!("<h1>Controversies</h1>\n{}", body),
    )
}

/// Detail screen: description, charts, point list and the add form
pub fn detail_page(
    detail: &DetailContext,
    form: &DataPointSubmission,
    errors: &FormErrors,
) -> String {
    let controversy = &detail.controversy;

    let charts: String = detail
        .charts
        .iter()
        .map(|chart| {
            format!(
                r#"<section class="chart" id="chart-{id}"><h2>{label}</h2>{markup}</section>"#,
                id = chart.category.as_str(),
                label = chart.label,
                markup = chart.markup,
            )
        })
        .collect();

    let points = if detail.points.is_empty() {
        r#"<p class="empty">No data points yet.</p>"#.to_string()
    } else {
        let rows: String = detail
            .points
            .iter()
            .map(|p| {
                format!(
                    r#"<li class="point {stance}"><a href="{url}" target="_blank" rel="noopener">{name}</a> <span class="category">{category}</span><p>{description}</p></li>"#,
                    stance = if p.boolean { "true" } else { "false" },
                    url = encode_double_quoted_attribute(&p.url),
                    name = encode_text(&p.name),
                    category = p.category.label(),
                    description = encode_text(&p.description),
                )
            })
            .collect();
        format!(r#"<ul class="points">{}</ul>"#, rows)
    };

    let body = format!(
        r#"<h1>{name}</h1>
<p class="description">{description}</p>
<div class="charts">{charts}</div>
<h2>Data points</h2>
{points}
<h2>Add a data point</h2>
{form}"#,
        name = encode_text(&controversy.name),
        description = encode_text(&controversy.description),
        charts = charts,
        points = points,
        form = add_point_form(controversy, form, errors),
    );

    layout(&controversy.name, &body)
}

/// Add form with the parent controversy shown but not editable
fn add_point_form(
    controversy: &Controversy,
    form: &DataPointSubmission,
    errors: &FormErrors,
) -> String {
    format!(
        r#"<form method="post" action="{action}" class="point-form">
<label>Controversy
<select name="controversy" disabled><option value="{id}" selected>{controversy}</option></select></label>
{point_fields}
<button type="submit">Add</button>
</form>"#,
        action = encode_double_quoted_attribute(&controversy.absolute_url()),
        id = controversy.id,
        controversy = encode_text(&controversy.name),
        point_fields = point_fields(form, errors),
    )
}

/// Shared name / description / url / category / boolean inputs
pub(crate) fn point_fields(form: &DataPointSubmission, errors: &FormErrors) -> String {
    let selected = form.data_set.as_deref().unwrap_or(Category::default().as_str());

    let options: String = Category::ALL
        .iter()
        .map(|c| {
            format!(
                r#"<option value="{v}"{sel}>{label}</option>"#,
                v = c.as_str(),
                sel = if c.as_str() == selected { " selected" } else { "" },
                label = c.label(),
            )
        })
        .collect();

    let checked = matches!(
        crate::forms::parse_checkbox(form.boolean.as_deref()),
        Ok(true)
    );

    format!(
        r#"<label>Name <input type="text" name="name" maxlength="32" value="{name}"></label>
{name_err}
<label>Description <textarea name="description">{description}</textarea></label>
{description_err}
<label>URL <input type="url" name="url" maxlength="200" value="{url}"></label>
{url_err}
<label>Category <select name="data_set">{options}</select></label>
{data_set_err}
<label><input type="checkbox" name="boolean"{checked}> Boolean</label>
{boolean_err}"#,
        name = encode_double_quoted_attribute(submitted(&form.name)),
        name_err = field_error(errors.get("name")),
        description = encode_text(submitted(&form.description)),
        description_err = field_error(errors.get("description")),
        url = encode_double_quoted_attribute(submitted(&form.url)),
        url_err = field_error(errors.get("url")),
        options = options,
        data_set_err = field_error(errors.get("data_set")),
        checked = if checked { " checked" } else { "" },
        boolean_err = field_error(errors.get("boolean")),
    )
}

/// Generic error screen
pub fn error_page(title: &str, message: &str) -> String {
    layout(
        title,
        &format!(
            r#"<h1>{}</h1><p class="error">{}</p><p><a href="/">Back to all controversies</a></p>"#,
            encode_text(title),
            encode_text(message)
        ),
    )
}
