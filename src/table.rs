//! A table of records with optional add, filter, edit and delete actions.

use std::str::FromStr;

use maud::{Markup, html};

use crate::html::{
    LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, edit_delete_action_links,
};

/// Shown in place of the rows when there are no records.
pub const EMPTY_TABLE_MESSAGE: &str = "Nenhum registro encontrado.";

/// A column of the table.
#[derive(Debug, Clone, Copy)]
pub struct HeadCell<'a> {
    /// The key passed to the cell formatter for this column.
    pub id: &'a str,
    /// The column heading.
    pub text: &'a str,
}

/// A record that can be shown as a table row.
pub trait TableRecord {
    /// The text of the cell in the column `id`.
    fn cell(&self, id: &str) -> String;
}

/// How to delete the record of one row.
#[derive(Debug, Clone)]
pub struct RowDelete {
    /// The URL to send the DELETE request to.
    pub url: String,
    /// The question the user must confirm first.
    pub confirm_message: String,
}

type CellFormatter<'a, T> = Box<dyn Fn(&T, &str) -> Markup + 'a>;
type EditUrl<'a, T> = Box<dyn Fn(&T) -> String + 'a>;
type DeleteAction<'a, T> = Box<dyn Fn(&T) -> RowDelete + 'a>;

/// Builds the HTML for a titled table of `T`.
pub struct Table<'a, T> {
    title: &'a str,
    head_cells: &'a [HeadCell<'a>],
    records: &'a [T],
    format: Option<CellFormatter<'a, T>>,
    add_url: Option<&'a str>,
    filter: Option<Markup>,
    edit_url: Option<EditUrl<'a, T>>,
    delete: Option<DeleteAction<'a, T>>,
}

impl<'a, T: TableRecord> Table<'a, T> {
    /// A table with one column per head cell and one row per record.
    pub fn new(title: &'a str, head_cells: &'a [HeadCell<'a>], records: &'a [T]) -> Self {
        Self {
            title,
            head_cells,
            records,
            format: None,
            add_url: None,
            filter: None,
            edit_url: None,
            delete: None,
        }
    }

    /// Render cells with `format` instead of [TableRecord::cell].
    pub fn format(mut self, format: impl Fn(&T, &str) -> Markup + 'a) -> Self {
        self.format = Some(Box::new(format));
        self
    }

    /// Show an "Adicionar" link to `url`.
    pub fn add_url(mut self, url: &'a str) -> Self {
        self.add_url = Some(url);
        self
    }

    /// Show `filter` in a collapsible "Filtrar" panel above the table.
    pub fn filter(mut self, filter: Markup) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Show an edit link on every row.
    pub fn edit_url(mut self, edit_url: impl Fn(&T) -> String + 'a) -> Self {
        self.edit_url = Some(Box::new(edit_url));
        self
    }

    /// Show a delete button on every row.
    pub fn delete(mut self, delete: impl Fn(&T) -> RowDelete + 'a) -> Self {
        self.delete = Some(Box::new(delete));
        self
    }

    fn has_actions(&self) -> bool {
        self.edit_url.is_some() || self.delete.is_some()
    }

    fn format_cell(&self, record: &T, id: &str) -> Markup {
        match &self.format {
            Some(format) => format(record, id),
            None => html!((record.cell(id))),
        }
    }

    fn actions(&self, record: &T) -> Markup {
        let edit_url = self.edit_url.as_ref().map(|edit_url| edit_url(record));
        let delete = self.delete.as_ref().map(|delete| delete(record));

        match (edit_url, delete) {
            (Some(edit_url), Some(delete)) => edit_delete_action_links(
                &edit_url,
                &delete.url,
                &delete.confirm_message,
                "closest tr",
                "delete",
            ),
            (Some(edit_url), None) => html!(a href=(edit_url) class=(LINK_STYLE) { "Editar" }),
            (None, Some(delete)) => html! {
                button
                    type="button"
                    hx-delete=(delete.url)
                    hx-confirm=(delete.confirm_message)
                    hx-target="closest tr"
                    hx-target-error="#alert-container"
                    hx-swap="delete"
                    class=(crate::html::BUTTON_DELETE_STYLE)
                {
                    "Excluir"
                }
            },
            (None, None) => html!(),
        }
    }

    pub fn into_html(self) -> Markup {
        let column_count = self.head_cells.len() + usize::from(self.has_actions());

        html! {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { (self.title) }

                    @if let Some(add_url) = self.add_url {
                        a href=(add_url) class=(LINK_STYLE) { "Adicionar" }
                    }
                }

                @if let Some(filter) = &self.filter {
                    details class="rounded border border-gray-200 bg-white px-4 py-3 dark:border-gray-700 dark:bg-gray-800"
                    {
                        summary class="cursor-pointer font-medium" { "Filtrar" }

                        div class="mt-4" { (filter) }
                    }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                @for head_cell in self.head_cells {
                                    th scope="col" class=(TABLE_CELL_STYLE) { (head_cell.text) }
                                }

                                @if self.has_actions() {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Ações" }
                                }
                            }
                        }

                        tbody
                        {
                            @for record in self.records {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    @for head_cell in self.head_cells {
                                        td class=(TABLE_CELL_STYLE) { (self.format_cell(record, head_cell.id)) }
                                    }

                                    @if self.has_actions() {
                                        td class=(TABLE_CELL_STYLE)
                                        {
                                            div class="flex gap-4" { (self.actions(record)) }
                                        }
                                    }
                                }
                            }

                            @if self.records.is_empty() {
                                tr
                                {
                                    td
                                        colspan=(column_count)
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        (EMPTY_TABLE_MESSAGE)
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Read an optional filter value from a query string, where blank or
/// unreadable input means "no filter".
pub fn parse_filter<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse().ok())
}

#[cfg(test)]
mod table_tests {
    use maud::html;
    use scraper::{Html, Selector};

    use crate::table::{EMPTY_TABLE_MESSAGE, HeadCell, RowDelete, Table, TableRecord, parse_filter};

    struct Fruit {
        id: i64,
        name: &'static str,
    }

    impl TableRecord for Fruit {
        fn cell(&self, id: &str) -> String {
            match id {
                "name" => self.name.to_owned(),
                _ => String::new(),
            }
        }
    }

    const HEAD_CELLS: &[HeadCell] = &[HeadCell {
        id: "name",
        text: "Nome",
    }];

    fn header_texts(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("th").unwrap())
            .map(|th| th.text().collect::<String>())
            .collect()
    }

    #[test]
    fn no_actions_column_without_edit_or_delete() {
        let records = [Fruit { id: 1, name: "Maçã" }];

        let markup = Table::new("Frutas", HEAD_CELLS, &records).into_html().into_string();

        let html = Html::parse_fragment(&markup);
        assert_eq!(header_texts(&html), vec!["Nome"]);
        assert!(markup.contains("Maçã"));
    }

    #[test]
    fn actions_column_with_edit_and_delete() {
        let records = [Fruit { id: 7, name: "Pera" }];

        let markup = Table::new("Frutas", HEAD_CELLS, &records)
            .edit_url(|fruit| format!("/fruits/{}/edit", fruit.id))
            .delete(|fruit| RowDelete {
                url: format!("/api/fruits/{}", fruit.id),
                confirm_message: "Excluir?".to_owned(),
            })
            .into_html()
            .into_string();

        let html = Html::parse_fragment(&markup);
        assert_eq!(header_texts(&html), vec!["Nome", "Ações"]);
        assert!(markup.contains(r#"href="/fruits/7/edit""#));
        assert!(markup.contains(r#"hx-delete="/api/fruits/7""#));
    }

    #[test]
    fn format_overrides_cell_text() {
        let records = [Fruit { id: 1, name: "Uva" }];

        let markup = Table::new("Frutas", HEAD_CELLS, &records)
            .format(|fruit, _| html!(strong { (fruit.name.to_uppercase()) }))
            .into_html()
            .into_string();

        assert!(markup.contains("<strong>UVA</strong>"));
    }

    #[test]
    fn add_and_filter_are_optional() {
        let records: [Fruit; 0] = [];

        let plain = Table::new("Frutas", HEAD_CELLS, &records).into_html().into_string();
        let full = Table::new("Frutas", HEAD_CELLS, &records)
            .add_url("/fruits/new")
            .filter(html!(form {}))
            .into_html()
            .into_string();

        assert!(!plain.contains("Adicionar"));
        assert!(!plain.contains("Filtrar"));
        assert!(full.contains("Adicionar"));
        assert!(full.contains("Filtrar"));
    }

    #[test]
    fn empty_table_shows_message() {
        let records: [Fruit; 0] = [];

        let markup = Table::new("Frutas", HEAD_CELLS, &records).into_html().into_string();

        assert!(markup.contains(EMPTY_TABLE_MESSAGE));
    }

    #[test]
    fn blank_filters_are_ignored() {
        assert_eq!(parse_filter::<i64>(Some(" 3 ")), Some(3));
        assert_eq!(parse_filter::<i64>(Some("")), None);
        assert_eq!(parse_filter::<i64>(Some("abc")), None);
        assert_eq!(parse_filter::<i64>(None), None);
    }
}
