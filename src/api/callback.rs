use axum::{Extension, extract::Query, response::Html};

use crate::{server::CallbackSender, types::CallbackParams, warning};

/// Receives the authorization server's redirect and forwards the query to
/// the waiting CLI. The code is exchanged there, after the state check.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(sender): Extension<CallbackSender>,
) -> Html<&'static str> {
    if !params.is_present() {
        return Html("<h4>Missing authorization code.</h4>");
    }

    let denied = params.error.is_some();
    let Some(tx) = sender.lock().await.take() else {
        return Html("<h4>Authorization already received.</h4>");
    };

    if tx.send(params).is_err() {
        warning!("Authorization callback arrived after the CLI stopped waiting.");
        return Html("<h4>Authorization expired, run <code>tubelist auth</code> again.</h4>");
    }

    if denied {
        Html("<h4>Authorization denied.</h4>")
    } else {
        Html("<h2>Authorization received.</h2><p>Return to the terminal and close this window.</p>")
    }
}
