//! Assertions on forms rendered with [crate::form::view].

use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|error| panic!("bad selector {css:?}: {error}"))
}

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&selector("form"))
        .next()
        .expect("No form found")
}

/// Assert that `form` submits to `endpoint` with the HTMX `attribute`, e.g.
/// "hx-post" for create forms and "hx-put" for edit forms.
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form.value().attr(attribute);

    assert_eq!(
        got,
        Some(endpoint),
        "want form with {attribute}=\"{endpoint}\", got {got:?}"
    );
}

/// The first required input called `name` with the type `type_`.
///
/// Every such input must post itself for validation on change and target
/// the error paragraph of its field, which must be in the form too.
#[track_caller]
fn must_get_bound_input<'a>(form: &ElementRef<'a>, name: &str, type_: &str) -> ElementRef<'a> {
    let input = form
        .select(&selector(&format!("input[name=\"{name}\"][type=\"{type_}\"]")))
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\" and type \"{type_}\""));
    let attributes = input.value();

    assert!(
        attributes.attr("required").is_some(),
        "want input {name} to be required"
    );
    assert!(
        attributes
            .attr("hx-post")
            .is_some_and(|url| url.starts_with("/api/") && url.ends_with("/validate")),
        "want input {name} to post to a validation endpoint, got {:?}",
        attributes.attr("hx-post")
    );
    assert_eq!(attributes.attr("hx-trigger"), Some("change"));

    let error_id = format!("{name}-error");
    assert_eq!(
        attributes.attr("hx-target"),
        Some(format!("#{error_id}").as_str()),
        "want input {name} to replace its error paragraph"
    );
    assert!(
        form.select(&selector(&format!("p#{error_id}"))).next().is_some(),
        "want an error paragraph #{error_id} in the form"
    );

    input
}

#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    must_get_bound_input(form, name, type_);
}

/// Like [assert_form_input], and the input must also hold `value`.
///
/// For radio buttons, the checked option must be `value`.
#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    must_get_bound_input(form, name, type_);

    let got = if type_ == "radio" {
        form.select(&selector(&format!("input[name=\"{name}\"][checked]")))
            .next()
            .and_then(|input| input.value().attr("value"))
    } else {
        form.select(&selector(&format!("input[name=\"{name}\"]")))
            .next()
            .and_then(|input| input.value().attr("value"))
    };

    assert_eq!(got, Some(value), "want {name} to hold \"{value}\"");
}

/// Assert that the form is submitted with a button reading `text`.
#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let button = form
        .select(&selector("button[type=\"submit\"]"))
        .next()
        .expect("No submit button found");

    assert_eq!(button.text().collect::<String>().trim(), text);
}
