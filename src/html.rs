//! Shared page layout, style constants and small view helpers.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{navigation::NavBar, notification::AUTO_DISMISS_MILLIS};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full px-4 py-2 \
    text-sm font-medium text-gray-900 bg-white rounded border border-gray-200 \
    hover:bg-gray-100 hover:text-blue-700 focus:z-10 dark:bg-gray-800 \
    dark:text-gray-400 dark:border-gray-600 dark:hover:text-white \
    dark:hover:bg-gray-700";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_ERROR_STYLE: &str = "mt-1 text-sm text-red-600 dark:text-red-400";
pub const FORM_RADIO_GROUP_STYLE: &str = "flex gap-2";
pub const FORM_RADIO_INPUT_STYLE: &str = "peer h-4 w-4 shrink-0 cursor-pointer \
    text-blue-600 border-gray-300 dark:border-gray-600";
pub const FORM_RADIO_LABEL_STYLE: &str = "flex flex-1 items-center gap-2 rounded border \
    border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-700 px-3 py-2 text-sm \
    font-medium text-gray-700 dark:text-white cursor-pointer \
    hover:border-gray-400 hover:bg-gray-50 hover:dark:bg-gray-600";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Money
pub const POSITIVE_VALUE_STYLE: &str = "font-medium text-green-700 dark:text-green-500";

pub const NEGATIVE_VALUE_STYLE: &str = "font-medium text-red-600 dark:text-red-400";

/// The text style for a value that is good news when `is_positive`.
pub fn value_style(is_positive: bool) -> &'static str {
    if is_positive {
        POSITIVE_VALUE_STYLE
    } else {
        NEGATIVE_VALUE_STYLE
    }
}

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    #[allow(dead_code)]
    ScriptLink(String),
    /// JavaScript source code.
    #[allow(dead_code)]
    ScriptSource(PreEscaped<String>),
    #[allow(dead_code)]
    Style(PreEscaped<String>),
}

/// Removes alerts marked with `data-auto-dismiss` once their delay is over.
fn auto_dismiss_script() -> PreEscaped<String> {
    PreEscaped(format!(
        r#"
        htmx.onLoad(function (content) {{
            var alerts = Array.from(content.querySelectorAll("[data-auto-dismiss]"));

            if (content.matches && content.matches("[data-auto-dismiss]")) {{
                alerts.push(content);
            }}

            alerts.forEach(function (alert) {{
                var delay = parseInt(alert.dataset.autoDismiss, 10) || {AUTO_DISMISS_MILLIS};
                setTimeout(function () {{ alert.remove(); }}, delay);
            }});
        }});
        "#
    ))
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Bills" }
                link href="/static/main.css" rel="stylesheet";

                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js" {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                        HeadElement::Style(text) => style { (text) }
                    }
                }

                script { (auto_dismiss_script()) }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for notifications and out-of-band swaps
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Voltar para o início"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// The card layout shared by the log in and register pages.
pub fn log_in_register(form_title: &str, form: &Markup) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            span class="flex items-center mb-6 text-2xl font-semibold text-gray-900 dark:text-white"
            {
                "Bills"
            }

            div class="w-full bg-white rounded-lg shadow dark:border md:mt-0 sm:max-w-md xl:p-0 dark:bg-gray-800 dark:border-gray-700"
            {
                div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                    {
                        (form_title)
                    }

                    (form)
                }
            }
        }
    }
}

/// The edit link and delete button of a table row.
///
/// The delete button asks for confirmation with `confirm_message` and, on
/// success, swaps `hx_target` with `hx_swap`.
pub fn edit_delete_action_links(
    edit_url: &str,
    delete_url: &str,
    confirm_message: &str,
    hx_target: &str,
    hx_swap: &str,
) -> Markup {
    html! {
        a href=(edit_url) class=(LINK_STYLE) { "Editar" }

        button
            type="button"
            hx-delete=(delete_url)
            hx-confirm=(confirm_message)
            hx-target=(hx_target)
            hx-target-error="#alert-container"
            hx-swap=(hx_swap)
            class=(BUTTON_DELETE_STYLE)
        {
            "Excluir"
        }
    }
}

/// A page of the logged in app: the navigation bar, with the link to
/// `active_endpoint` highlighted, above `content`.
pub fn app_page(title: &str, active_endpoint: &str, content: &Markup) -> Markup {
    let content = html! {
        (NavBar::new(active_endpoint).into_html())

        main class=(PAGE_CONTAINER_STYLE) { (content) }
    };

    base(title, &[], &content)
}

/// A page with the navigation bar and a card holding `form`.
pub fn form_page(title: &str, active_endpoint: &str, form: &Markup) -> Markup {
    let content = html! {
        section class="w-full max-w-md space-y-4 p-6 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            h1 class="text-xl font-bold" { (title) }

            (form)
        }
    };

    app_page(title, active_endpoint, &content)
}

/// A plain GET form for the filters of the list page at `action`.
///
/// "Limpar" goes back to the unfiltered list.
pub fn filter_form(action: &str, fields: &Markup) -> Markup {
    html! {
        form method="get" action=(action) class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3 items-end"
        {
            (fields)

            div class="flex items-center gap-4"
            {
                a href=(action) class=(LINK_STYLE) { "Limpar" }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Aplicar" }
            }
        }
    }
}

/// A labelled filter input holding the current filter `value`.
pub fn filter_input(label: &str, name: &str, input_type: &str, value: Option<&str>) -> Markup {
    html! {
        div
        {
            label for={ "filter-" (name) } class=(FORM_LABEL_STYLE) { (label) }

            input
                id={ "filter-" (name) }
                type=(input_type)
                name=(name)
                value=(value.unwrap_or_default())
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// A labelled filter select of `(value, text)` options, where the first
/// option "Todos" means no filter.
pub fn filter_select(
    label: &str,
    name: &str,
    options: &[(String, String)],
    selected: Option<&str>,
) -> Markup {
    let selected = selected.unwrap_or_default();

    html! {
        div
        {
            label for={ "filter-" (name) } class=(FORM_LABEL_STYLE) { (label) }

            select id={ "filter-" (name) } name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[selected.is_empty()] { "Todos" }

                @for (value, text) in options {
                    option value=(value) selected[value == selected] { (text) }
                }
            }
        }
    }
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}
