//! Admin screens for controversies and data points

use controversy_common::db::DataPointListing;
use controversy_common::Controversy;

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::pages::point_fields;
use super::{field_error, layout, submitted};
use crate::forms::{ControversySubmission, DataPointSubmission, FormErrors};

pub fn admin_index_page(controversies: usize, points: usize) -> String {
    layout(
        "Administration",
        &format!(
            r#"<h1>Administration</h1>
<table class="admin">
<tr><th><a href="/admin/controversies/">Controversies</a></th><td>{controversies}</td><td><a href="/admin/controversies/add/">Add</a></td></tr>
<tr><th><a href="/admin/points/">Data points</a></th><td>{points}</td><td><a href="/admin/points/add/">Add</a></td></tr>
</table>"#
        ),
    )
}

pub fn controversy_list_page(controversies: &[Controversy]) -> String {
    let rows: String = controversies
        .iter()
        .map(|c| {
            format!(
                r#"<tr><td><a href="/admin/controversies/{id}/">{name}</a></td><td>{slug}</td></tr>"#,
                id = c.id,
                name = encode_text(&c.name),
                slug = encode_text(&c.slug),
            )
        })
        .collect();

    layout(
        "Controversies | Administration",
        &format!(
            r#"<h1>Controversies</h1>
<p><a href="/admin/controversies/add/">Add controversy</a></p>
<table class="admin"><tr><th>Name</th><th>Slug</th></tr>{rows}</table>"#
        ),
    )
}

/// Add/edit form; `delete_action` is set when editing an existing row
pub fn controversy_form_page(
    title: &str,
    action: &str,
    form: &ControversySubmission,
    errors: &FormErrors,
    delete_action: Option<&str>,
) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}" class="admin-form">
<label>Name <input type="text" name="name" maxlength="200" value="{name}"></label>
{name_err}
<label>Description <textarea name="description">{description}</textarea></label>
{description_err}
<label>Slug <input type="text" name="slug" maxlength="50" value="{slug}" placeholder="filled from name when blank"></label>
{slug_err}
<button type="submit">Save</button>
</form>
{delete}"#,
        title = encode_text(title),
        action = encode_double_quoted_attribute(action),
        name = encode_double_quoted_attribute(submitted(&form.name)),
        name_err = field_error(errors.get("name")),
        description = encode_text(submitted(&form.description)),
        description_err = field_error(errors.get("description")),
        slug = encode_double_quoted_attribute(submitted(&form.slug)),
        slug_err = field_error(errors.get("slug")),
        delete = delete_form(delete_action),
    );

    layout(&format!("{} | Administration", title), &body)
}

pub fn point_list_page(listing: &[DataPointListing]) -> String {
    let rows: String = listing
        .iter()
        .map(|entry| {
            format!(
                r#"<tr><td>{controversy}</td><td><a href="/admin/points/{id}/">{name}</a></td><td>{category}</td></tr>"#,
                controversy = encode_text(&entry.controversy_name),
                id = entry.point.id,
                name = encode_text(&entry.point.name),
                category = entry.point.category.label(),
            )
        })
        .collect();

    layout(
        "Data points | Administration",
        &format!(
            r#"<h1>Data points</h1>
<p><a href="/admin/points/add/">Add data point</a></p>
<table class="admin"><tr><th>Controversy</th><th>Name</th><th>Data set</th></tr>{rows}</table>"#
        ),
    )
}

/// Add/edit form with a selectable parent controversy
pub fn point_form_page(
    title: &str,
    action: &str,
    form: &DataPointSubmission,
    errors: &FormErrors,
    choices: &[Controversy],
    delete_action: Option<&str>,
) -> String {
    let selected = form.controversy.as_deref().unwrap_or("");
    let options: String = std::iter::once(r#"<option value="">---------</option>"#.to_string())
        .chain(choices.iter().map(|c| {
            let id = c.id.to_string();
            format!(
                r#"<option value="{id}"{sel}>{name}</option>"#,
                sel = if id == selected { " selected" } else { "" },
                name = encode_text(&c.name),
            )
        }))
        .collect();

    let body = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}" class="admin-form">
<label>Controversy <select name="controversy">{options}</select></label>
{controversy_err}
{fields}
<button type="submit">Save</button>
</form>
{delete}"#,
        title = encode_text(title),
        action = encode_double_quoted_attribute(action),
        controversy_err = field_error(errors.get("controversy")),
        fields = point_fields(form, errors),
        delete = delete_form(delete_action),
    );

    layout(&format!("{} | Administration", title), &body)
}

/// Explanation shown when a delete is refused
pub fn protected_page(message: &str, back: &str) -> String {
    layout(
        "Cannot delete | Administration",
        &format!(
            r#"<h1>Cannot delete</h1><p class="error">{}</p><p>Delete or move its data points first.</p><p><a href="{}">Back</a></p>"#,
            encode_text(message),
            encode_double_quoted_attribute(back)
        ),
    )
}

fn delete_form(action: Option<&str>) -> String {
    match action {
        Some(action) => format!(
            r#"<form method="post" action="{}" class="delete-form"><button type="submit">Delete</button></form>"#,
            encode_double_quoted_attribute(action)
        ),
        None => String::new(),
    }
}
