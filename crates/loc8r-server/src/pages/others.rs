use axum::response::Html;

use crate::views::GenericTextView;

pub(super) async fn about() -> Html<String> {
    Html(
        GenericTextView {
            title: "About Loc8r".to_string(),
            content: "Loc8r was created to help people find places to sit down and get a bit of \
                      work done."
                .to_string(),
        }
        .render(),
    )
}
