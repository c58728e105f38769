use axum::response::Response;
use scraper::Html;

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read the response body");

    String::from_utf8(bytes.to_vec()).expect("Response body is not UTF-8")
}

/// Parse a full page, as rendered by [crate::html::base].
pub(crate) async fn parse_html_document(response: Response) -> Html {
    Html::parse_document(&body_text(response).await)
}

/// Parse an HTMX fragment, such as a re-rendered form or an alert.
pub(crate) async fn parse_html_fragment(response: Response) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}
